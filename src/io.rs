// SPDX-License-Identifier: MPL-2.0

//! Reading and writing pixel grids as image files.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{Error, Result};
use crate::grid::PixelGrid;

/// Open an image file, any format the `image` crate decodes, as RGB.
///
/// An image with a zero dimension is an [`Error::InvalidDimension`].
pub fn load(path: impl AsRef<Path>) -> Result<PixelGrid> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgb8();
    from_rgb_image(&img)
}

/// Write a grid to `path`, the format is picked from the extension.
pub fn save(grid: &PixelGrid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_rgb_image(grid)?.save(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy an RGB image buffer into a grid.
pub fn from_rgb_image(img: &RgbImage) -> Result<PixelGrid> {
    let (width, height) = img.dimensions();
    let pixels = img.pixels().map(|pix| pix.0).collect();
    PixelGrid::new(width as usize, height as usize, pixels)
}

/// Copy a grid into an RGB image buffer.
pub fn to_rgb_image(grid: &PixelGrid) -> Result<RgbImage> {
    let too_large = || Error::InvalidDimension {
        width: grid.width(),
        height: grid.height(),
    };
    let width = u32::try_from(grid.width()).map_err(|_| too_large())?;
    let height = u32::try_from(grid.height()).map_err(|_| too_large())?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        Rgb(grid.pixel(y as usize, x as usize))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_image_conversion_keeps_orientation() {
        let grid = PixelGrid::from_fn(3, 2, |row, col| [row as u8, col as u8, 9]).unwrap();
        let img = to_rgb_image(&grid).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [1, 2, 9]);
        assert_eq!(from_rgb_image(&img).unwrap(), grid);
    }

    #[test]
    fn empty_image_is_rejected() {
        let img = RgbImage::new(0, 5);
        assert!(matches!(
            from_rgb_image(&img),
            Err(Error::InvalidDimension { width: 0, height: 5 })
        ));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load("definitely/not/here.png").unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, Path::new("definitely/not/here.png")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
