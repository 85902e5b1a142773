use crate::core::dib::{try_vec, BYTES_PER_PIXEL};
use crate::error::{Result, SurfaceError};
use crate::traits::PresentImage;
use crate::types::{Extent2D, Extent3D, ImageAspect};

/// Pack 8-bit channels into a BGRA8 pixel (little-endian `0xAARRGGBB`)
pub const fn pack_bgra(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([b, g, r, a])
}

/// CPU-side BGRA8 image, the output of a software renderer.
///
/// Rows may be padded: `row_pitch` is in bytes and is at least `4 * width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareImage {
    extent: Extent2D,
    row_pitch: usize,
    pixels: Vec<u32>,
}

impl SoftwareImage {
    /// Tightly packed image cleared to transparent black
    pub fn new(extent: Extent2D) -> Self {
        Self {
            extent,
            row_pitch: extent.width as usize * BYTES_PER_PIXEL,
            pixels: vec![0; extent.pixel_count()],
        }
    }

    /// Image with padded rows. `row_pitch` must be a whole number of pixels
    /// no narrower than the image.
    pub fn with_row_pitch(extent: Extent2D, row_pitch: usize) -> Result<Self> {
        if row_pitch % BYTES_PER_PIXEL != 0 || row_pitch / BYTES_PER_PIXEL < extent.width as usize {
            return Err(SurfaceError::presentation(format!(
                "row pitch {row_pitch} invalid for width {}",
                extent.width
            )));
        }
        let len = row_pitch / BYTES_PER_PIXEL * extent.height as usize;
        let mut pixels = try_vec(len)?;
        pixels.resize(len, 0);
        Ok(Self {
            extent,
            row_pitch,
            pixels,
        })
    }

    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    pub fn row_pitch(&self) -> usize {
        self.row_pitch
    }

    fn row_pixels(&self) -> usize {
        self.row_pitch / BYTES_PER_PIXEL
    }

    /// Pixel at (x, y), `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        self.pixels.get(y as usize * self.row_pixels() + x as usize).copied()
    }

    /// Write a pixel; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, bgra: u32) {
        if x >= self.extent.width || y >= self.extent.height {
            return;
        }
        let idx = y as usize * self.row_pixels() + x as usize;
        if let Some(p) = self.pixels.get_mut(idx) {
            *p = bgra;
        }
    }

    /// Fill every visible pixel from `shade(x, y)`
    pub fn fill_with<F>(&mut self, mut shade: F)
    where
        F: FnMut(u32, u32) -> u32,
    {
        let row_pixels = self.row_pixels();
        if row_pixels == 0 {
            return;
        }
        for (y, row) in self.pixels.chunks_exact_mut(row_pixels).enumerate() {
            for (x, p) in row[..self.extent.width as usize].iter_mut().enumerate() {
                *p = shade(x as u32, y as u32);
            }
        }
    }

    /// Raw bytes in memory order
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl PresentImage for SoftwareImage {
    fn mip_level_extent(&self, aspect: ImageAspect, level: u32) -> Extent3D {
        match (aspect, level) {
            (ImageAspect::Color, 0) => Extent3D::new(self.extent.width, self.extent.height, 1),
            _ => Extent3D::default(),
        }
    }

    fn row_pitch_bytes(&self, aspect: ImageAspect, level: u32) -> usize {
        match (aspect, level) {
            (ImageAspect::Color, 0) => self.row_pitch,
            _ => 0,
        }
    }

    fn memory_at(&self, offset: usize) -> Option<&[u8]> {
        self.as_bytes().get(offset..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_bgra_memory_order() {
        let px = pack_bgra(0x11, 0x22, 0x33, 0x44);
        assert_eq!(px.to_le_bytes(), [0x33, 0x22, 0x11, 0x44]);
    }

    #[test]
    fn test_new_is_tightly_packed() {
        let image = SoftwareImage::new(Extent2D::new(640, 480));
        assert_eq!(image.row_pitch(), 640 * 4);
        assert_eq!(image.as_bytes().len(), 640 * 480 * 4);
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut image = SoftwareImage::new(Extent2D::new(4, 4));
        image.set_pixel(3, 2, 0xDEADBEEF);
        assert_eq!(image.pixel(3, 2), Some(0xDEADBEEF));
        assert_eq!(image.pixel(0, 0), Some(0));
        assert_eq!(image.pixel(4, 0), None);

        // Out of bounds write is a no-op
        image.set_pixel(100, 100, 1);
    }

    #[test]
    fn test_padded_rows_keep_padding_untouched() {
        let mut image = SoftwareImage::with_row_pitch(Extent2D::new(2, 2), 16).unwrap();
        image.fill_with(|_, _| 0xFFFF_FFFF);
        let bytes = image.as_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..8], &[0xFF; 8]);
        assert_eq!(&bytes[8..16], &[0; 8]);
        assert_eq!(&bytes[16..24], &[0xFF; 8]);
    }

    #[test]
    fn test_with_row_pitch_rejects_bad_pitch() {
        // Same error kind as the pitch checks made when presenting
        for pitch in [15, 12] {
            let err = SoftwareImage::with_row_pitch(Extent2D::new(4, 1), pitch).unwrap_err();
            assert!(matches!(err, SurfaceError::PresentationFailed(_)), "pitch {pitch}: {err}");
        }
    }

    #[test]
    fn test_present_image_reports_color_level_zero_only() {
        let image = SoftwareImage::new(Extent2D::new(8, 6));
        assert_eq!(
            image.mip_level_extent(ImageAspect::Color, 0),
            Extent3D::new(8, 6, 1)
        );
        assert_eq!(image.mip_level_extent(ImageAspect::Color, 1), Extent3D::default());
        assert_eq!(image.row_pitch_bytes(ImageAspect::Depth, 0), 0);
        assert_eq!(image.memory_at(0).map(<[u8]>::len), Some(8 * 6 * 4));
        assert_eq!(image.memory_at(8 * 6 * 4).map(<[u8]>::len), Some(0));
        assert!(image.memory_at(8 * 6 * 4 + 1).is_none());
    }

    #[test]
    fn test_fill_with_coordinates() {
        let mut image = SoftwareImage::new(Extent2D::new(3, 2));
        image.fill_with(|x, y| y * 10 + x);
        assert_eq!(image.pixel(2, 1), Some(12));
        assert_eq!(image.pixel(0, 1), Some(10));
    }
}
