use std::path::Path;

use crate::color::Color;
use crate::error::ImageError;

/// Read/write access to a host-owned pixel buffer.
///
/// Tools only ever see `&mut dyn Image` for the duration of one `apply` call.
/// Implementors provide the raw accessors; callers go through the
/// bounds-checked [`Image::get_pixel`] and [`Image::set_pixel`].
pub trait Image {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Raw read. Only called with `x < width()` and `y < height()`.
    fn read(&self, x: usize, y: usize) -> Color;

    /// Raw write. Only called with `x < width()` and `y < height()`.
    fn write(&mut self, x: usize, y: usize, color: Color);

    fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height()
    }

    fn get_pixel(&self, x: usize, y: usize) -> Result<Color, ImageError> {
        self.check_bounds(x, y)?;
        Ok(self.read(x, y))
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<(), ImageError> {
        self.check_bounds(x, y)?;
        self.write(x, y, color);
        Ok(())
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), ImageError> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(ImageError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
        }
    }
}

/// The host's own [`Image`] implementation, a row-major buffer of packed colors.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Allocates a `width`x`height` buffer filled with `fill`.
    ///
    /// Fails instead of aborting when the buffer cannot be allocated.
    pub fn new(width: usize, height: usize, fill: Color) -> Result<Self, ImageError> {
        let invalid = ImageError::InvalidDimensions { width, height };
        let len = width.checked_mul(height).ok_or(invalid.clone())?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| invalid)?;
        pixels.resize(len, fill);
        Ok(Self { width, height, pixels })
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Fills every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Copies `src` with its top-left corner at `(x, y)`, clipping whatever
    /// falls outside this buffer.
    pub fn blit(&mut self, src: &PixelBuffer, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let cols = src.width.min(self.width - x);
        let rows = src.height.min(self.height - y);
        for row in 0..rows {
            let dst_start = (y + row) * self.width + x;
            let src_start = row * src.width;
            self.pixels[dst_start..dst_start + cols]
                .copy_from_slice(&src.pixels[src_start..src_start + cols]);
        }
    }

    pub fn from_rgba_image(image: &image::RgbaImage) -> Self {
        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            pixels: image.pixels().map(|p| Color::from(*p)).collect(),
        }
    }

    pub fn to_rgba_image(&self) -> Result<image::RgbaImage, ImageError> {
        let invalid = || ImageError::InvalidDimensions {
            width: self.width,
            height: self.height,
        };
        let width = u32::try_from(self.width).map_err(|_| invalid())?;
        let height = u32::try_from(self.height).map_err(|_| invalid())?;
        let bytes = self.pixels.iter().flat_map(|c| c.to_rgba()).collect();
        image::RgbaImage::from_raw(width, height, bytes).ok_or_else(invalid)
    }

    /// Converts to an egui image so a GUI host can upload it as a texture.
    pub fn to_color_image(&self) -> egui::ColorImage {
        let bytes: Vec<u8> = self.pixels.iter().flat_map(|c| c.to_rgba()).collect();
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &bytes)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let decoded = image::open(path.as_ref())?;
        Ok(Self::from_rgba_image(&decoded.to_rgba8()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        self.to_rgba_image()?.save(path.as_ref())?;
        Ok(())
    }
}

impl Image for PixelBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn read(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    fn write(&mut self, x: usize, y: usize, color: Color) {
        self.pixels[y * self.width + x] = color;
    }
}
