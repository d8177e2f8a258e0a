//! RGB image loading, saving, and directory listing helpers

use crate::io::configuration::IMAGE_EXTENSIONS;
use crate::io::error::{PipelineError, Result};
use ndarray::Array3;
use std::path::{Path, PathBuf};

/// Load an image file and decode it into an RGB pixel array
///
/// The returned array has shape (height, width, 3) with 8-bit channels.
/// Alpha channels and palette formats are flattened to RGB during decoding.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a decodable image
pub fn load_rgb_array<P: AsRef<Path>>(path: P) -> Result<Array3<u8>> {
    let path_buf = path.as_ref().to_path_buf();
    let img = image::open(&path_buf).map_err(|e| PipelineError::ImageLoad {
        path: path_buf,
        source: e,
    })?;
    let rgb = img.to_rgb8();

    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let mut pixels = Array3::zeros((height, width, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            let value = pixel.0.get(c).copied().unwrap_or(0);
            if let Some(cell) = pixels.get_mut((y as usize, x as usize, c)) {
                *cell = value;
            }
        }
    }

    Ok(pixels)
}

/// Encode an RGB pixel array and write it to disk
///
/// The output format is chosen by the file extension of `path`. An existing
/// file at the target path is overwritten.
///
/// # Errors
///
/// Returns an error if the array is not of shape (H, W, 3) or the encoded
/// image cannot be written
pub fn save_rgb_array<P: AsRef<Path>>(pixels: &Array3<u8>, path: P) -> Result<()> {
    let (height, width, channels) = pixels.dim();
    if channels != 3 {
        return Err(crate::io::error::invalid_parameter(
            "pixels",
            &format!("{height}x{width}x{channels}"),
            &"expected a (height, width, 3) RGB array",
        ));
    }

    let img = image::RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let sample = |c: usize| {
            pixels
                .get((y as usize, x as usize, c))
                .copied()
                .unwrap_or(0)
        };
        image::Rgb([sample(0), sample(1), sample(2)])
    });

    img.save(path.as_ref())
        .map_err(|e| PipelineError::ImageExport {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// List the image files in a directory, sorted by file name
///
/// Only regular files whose extension matches one of [`IMAGE_EXTENSIONS`]
/// (case-insensitively) are returned.
///
/// # Errors
///
/// Returns an error if the directory cannot be read
pub fn list_image_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .map_err(|e| crate::io::error::file_system(dir, "read directory", e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| crate::io::error::file_system(dir, "read directory entry", e))?
            .path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Check whether a path carries a recognized image extension
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let lowered = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|known| *known == lowered)
        })
}
