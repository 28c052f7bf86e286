//! Raster decode/encode through the `image` crate.
//!
//! Everything the measurement engine reads is an [`ImgVec<RGB8>`]; this
//! module is the only place that knows about files and formats.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use imgref::{ImgRef, ImgVec};
use rgb::RGB8;

use crate::error::{Error, Result};

/// Decoded image owned by the caller; the engine only ever reads it.
pub type PixelGrid = ImgVec<RGB8>;

/// Decode an image file into a [`PixelGrid`].
///
/// The format is sniffed from the file contents, not the extension.
pub fn decode(path: &Path) -> Result<PixelGrid> {
    let file = File::open(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = image::ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    let decoded = reader.decode().map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let rgb = decoded.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    let pixels: Vec<RGB8> = rgb.pixels().map(|p| RGB8::new(p[0], p[1], p[2])).collect();

    Ok(ImgVec::new(pixels, width, height))
}

/// Encode a [`PixelGrid`] to `path`. The format follows the file extension.
pub fn encode(grid: ImgRef<'_, RGB8>, path: &Path) -> Result<()> {
    let raw: Vec<u8> = grid.pixels().flat_map(|p| [p.r, p.g, p.b]).collect();

    let buffer = image::RgbImage::from_raw(grid.width() as u32, grid.height() as u32, raw)
        .ok_or_else(|| Error::Encode {
            path: path.to_path_buf(),
            reason: "pixel buffer does not match dimensions".to_string(),
        })?;

    buffer.save(path).map_err(|e| Error::Encode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.png");

        let pixels: Vec<RGB8> = (0..12u8).map(|i| RGB8::new(i, i * 2, i * 3)).collect();
        let grid = ImgVec::new(pixels, 4, 3);
        encode(grid.as_ref(), &path).unwrap();

        let back = decode(&path).unwrap();
        assert_eq!(back.width(), 4);
        assert_eq!(back.height(), 3);
        assert_eq!(back.buf(), grid.buf());
    }

    #[test]
    fn test_missing_file() {
        let result = decode(Path::new("/nonexistent/definitely-not-here.png"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.png");
        std::fs::write(&path, b"this is not a png").unwrap();

        let result = decode(&path);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}
