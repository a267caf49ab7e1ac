use image::DynamicImage;

use crate::foundation::core::{PixelFormat, linearize_pixel_coords};
use crate::foundation::error::{InvertError, InvertResult};

/// A decoded, uncompressed image: `height` rows of `linesize` bytes each.
///
/// Rows may carry trailing padding (`linesize > width * bytes_per_pixel`); pixel
/// operations never touch those bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    linesize: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Allocate a zeroed, tightly packed frame.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> InvertResult<Self> {
        let row = packed_row_len(width, format)?;
        let len = row
            .checked_mul(height as usize)
            .ok_or_else(|| InvertError::validation("frame size overflows usize"))?;
        Self::from_raw(width, height, row, format, vec![0u8; len])
    }

    /// Wrap tightly packed rows (`linesize == width * bytes_per_pixel`).
    pub fn from_packed(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> InvertResult<Self> {
        let row = packed_row_len(width, format)?;
        if data.len() != row * height as usize {
            return Err(InvertError::validation(format!(
                "packed {format} frame {width}x{height} needs {} bytes, got {}",
                row * height as usize,
                data.len()
            )));
        }
        Self::from_raw(width, height, row, format, data)
    }

    /// Wrap a buffer with an explicit row stride.
    pub fn from_raw(
        width: u32,
        height: u32,
        linesize: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> InvertResult<Self> {
        if width == 0 || height == 0 {
            return Err(InvertError::validation("frame width/height must be non-zero"));
        }
        let row = packed_row_len(width, format)?;
        if linesize < row {
            return Err(InvertError::validation(format!(
                "linesize {linesize} is smaller than one {format} row of {width} pixels \
                 ({row} bytes)"
            )));
        }
        let required = linesize
            .checked_mul(height as usize - 1)
            .and_then(|n| n.checked_add(row))
            .ok_or_else(|| InvertError::validation("frame size overflows usize"))?;
        if data.len() < required {
            return Err(InvertError::validation(format!(
                "frame buffer too small: got {} bytes, need at least {required}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            linesize,
            format,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    pub fn linesize(&self) -> usize {
        self.linesize
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw buffer, including any row padding.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw buffer, including any row padding.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Whether rows carry no padding.
    pub fn is_packed(&self) -> bool {
        self.linesize == self.width as usize * self.format.bytes_per_pixel()
    }

    /// Pixel bytes of row `y`, without padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = linearize_pixel_coords(0, y as usize, self.linesize, 0);
        let len = self.width as usize * self.format.bytes_per_pixel();
        &self.data[start..start + len]
    }

    /// Bytes of pixel `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        let off = linearize_pixel_coords(x as usize, y as usize, self.linesize, bpp);
        &self.data[off..off + bpp]
    }

    /// Mutable bytes of pixel `(x, y)`. Panics when out of bounds.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let bpp = self.format.bytes_per_pixel();
        let off = linearize_pixel_coords(x as usize, y as usize, self.linesize, bpp);
        &mut self.data[off..off + bpp]
    }

    /// Re-lay rows so that `linesize` is a multiple of `align`; padding bytes are zero.
    pub fn with_alignment(self, align: usize) -> InvertResult<Self> {
        if align == 0 {
            return Err(InvertError::validation("row alignment must be >= 1"));
        }
        let row = self.width as usize * self.format.bytes_per_pixel();
        let linesize = row.div_ceil(align) * align;
        if linesize == self.linesize {
            return Ok(self);
        }
        let mut data = vec![0u8; linesize * self.height as usize];
        for (y, dst) in data.chunks_exact_mut(linesize).enumerate() {
            dst[..row].copy_from_slice(self.row(y as u32));
        }
        Self::from_raw(self.width, self.height, linesize, self.format, data)
    }

    /// Copy out the pixel rows without padding.
    pub fn to_packed(&self) -> Vec<u8> {
        if self.is_packed() {
            let len = self.linesize * self.height as usize;
            return self.data[..len].to_vec();
        }
        let row = self.width as usize * self.format.bytes_per_pixel();
        let mut out = Vec::with_capacity(row * self.height as usize);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }

    /// Convert to another layout, producing a packed frame.
    ///
    /// Added alpha is opaque; removed colour is reduced with Rec.601 luma weights.
    pub fn convert(&self, format: PixelFormat) -> Frame {
        if format == self.format {
            return Frame {
                width: self.width,
                height: self.height,
                linesize: self.width as usize * format.bytes_per_pixel(),
                format,
                data: self.to_packed(),
            };
        }

        let dst_bpp = format.bytes_per_pixel();
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * dst_bpp);
        let mut px = [0u8; 4];
        for y in 0..self.height {
            for src in self.row(y).chunks_exact(self.format.bytes_per_pixel()) {
                let rgba = to_rgba(src, self.format);
                let n = from_rgba(rgba, format, &mut px);
                data.extend_from_slice(&px[..n]);
            }
        }
        Frame {
            width: self.width,
            height: self.height,
            linesize: self.width as usize * dst_bpp,
            format,
            data,
        }
    }

    /// Build a frame from a decoded `image` buffer.
    ///
    /// 8-bit layouts are kept; deeper or float layouts are reduced to the nearest 8-bit one.
    pub fn from_dynamic_image(img: DynamicImage) -> InvertResult<Self> {
        let (width, height) = (img.width(), img.height());
        let (format, data) = match img {
            DynamicImage::ImageLuma8(buf) => (PixelFormat::Gray8, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (PixelFormat::GrayAlpha8, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (PixelFormat::Rgb8, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (PixelFormat::Rgba8, buf.into_raw()),
            DynamicImage::ImageLuma16(_) => (PixelFormat::Gray8, img.to_luma8().into_raw()),
            DynamicImage::ImageLumaA16(_) => {
                (PixelFormat::GrayAlpha8, img.to_luma_alpha8().into_raw())
            }
            DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgb32F(_) => {
                (PixelFormat::Rgb8, img.to_rgb8().into_raw())
            }
            other => (PixelFormat::Rgba8, other.to_rgba8().into_raw()),
        };
        Self::from_packed(width, height, format, data)
    }

    /// Copy into an `image` buffer; `Bgra8` becomes `Rgba8`.
    pub fn to_dynamic_image(&self) -> InvertResult<DynamicImage> {
        let bad = || InvertError::validation("frame buffer does not match its dimensions");
        let (w, h) = (self.width, self.height);
        let img = match self.format {
            PixelFormat::Gray8 => DynamicImage::ImageLuma8(
                image::GrayImage::from_raw(w, h, self.to_packed()).ok_or_else(bad)?,
            ),
            PixelFormat::GrayAlpha8 => DynamicImage::ImageLumaA8(
                image::GrayAlphaImage::from_raw(w, h, self.to_packed()).ok_or_else(bad)?,
            ),
            PixelFormat::Rgb8 => DynamicImage::ImageRgb8(
                image::RgbImage::from_raw(w, h, self.to_packed()).ok_or_else(bad)?,
            ),
            PixelFormat::Rgba8 => DynamicImage::ImageRgba8(
                image::RgbaImage::from_raw(w, h, self.to_packed()).ok_or_else(bad)?,
            ),
            PixelFormat::Bgra8 => return self.convert(PixelFormat::Rgba8).to_dynamic_image(),
        };
        Ok(img)
    }
}

/// Layout a decoded image of `color` type ends up in once reduced to 8 bits.
pub(crate) fn pixel_format_for(color: image::ColorType) -> PixelFormat {
    use image::ColorType;
    match color {
        ColorType::L8 | ColorType::L16 => PixelFormat::Gray8,
        ColorType::La8 | ColorType::La16 => PixelFormat::GrayAlpha8,
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => PixelFormat::Rgb8,
        _ => PixelFormat::Rgba8,
    }
}

fn packed_row_len(width: u32, format: PixelFormat) -> InvertResult<usize> {
    (width as usize)
        .checked_mul(format.bytes_per_pixel())
        .ok_or_else(|| InvertError::validation("frame row size overflows usize"))
}

fn to_rgba(px: &[u8], format: PixelFormat) -> [u8; 4] {
    match format {
        PixelFormat::Gray8 => [px[0], px[0], px[0], 255],
        PixelFormat::GrayAlpha8 => [px[0], px[0], px[0], px[1]],
        PixelFormat::Rgb8 => [px[0], px[1], px[2], 255],
        PixelFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
        PixelFormat::Bgra8 => [px[2], px[1], px[0], px[3]],
    }
}

fn from_rgba(rgba: [u8; 4], format: PixelFormat, out: &mut [u8; 4]) -> usize {
    let [r, g, b, a] = rgba;
    match format {
        PixelFormat::Gray8 => {
            out[0] = luma(r, g, b);
            1
        }
        PixelFormat::GrayAlpha8 => {
            out[0] = luma(r, g, b);
            out[1] = a;
            2
        }
        PixelFormat::Rgb8 => {
            out[..3].copy_from_slice(&[r, g, b]);
            3
        }
        PixelFormat::Rgba8 => {
            *out = rgba;
            4
        }
        PixelFormat::Bgra8 => {
            *out = [b, g, r, a];
            4
        }
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b) + 500) / 1000) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/media/frame.rs"]
mod tests;
