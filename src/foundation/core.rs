use crate::foundation::error::{InvertError, InvertResult};

/// Byte offset of pixel `(x, y)` in a row-major buffer with `linesize` bytes per row.
///
/// Unchecked: callers keep `y * linesize + x * pix_bytes` within `usize`, e.g. by validating
/// the buffer layout first as [`crate::invert_packed`] and [`crate::Frame`] do.
pub fn linearize_pixel_coords(x: usize, y: usize, linesize: usize, pix_bytes: usize) -> usize {
    y * linesize + x * pix_bytes
}

/// Packed 8-bit pixel layouts a [`crate::Frame`] can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// One luma byte.
    Gray8,
    /// Luma then alpha.
    GrayAlpha8,
    /// Red, green, blue.
    Rgb8,
    /// Red, green, blue, alpha.
    Rgba8,
    /// Blue, green, red, alpha.
    Bgra8,
}

impl PixelFormat {
    /// Every supported layout.
    pub const ALL: [PixelFormat; 5] = [
        PixelFormat::Gray8,
        PixelFormat::GrayAlpha8,
        PixelFormat::Rgb8,
        PixelFormat::Rgba8,
        PixelFormat::Bgra8,
    ];

    /// Size of one pixel in bytes.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::GrayAlpha8 => 2,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
        }
    }

    /// Index of the alpha byte inside a pixel, if the layout has one.
    pub fn alpha_index(self) -> Option<usize> {
        match self {
            PixelFormat::Gray8 | PixelFormat::Rgb8 => None,
            PixelFormat::GrayAlpha8 => Some(1),
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => Some(3),
        }
    }

    /// Byte indices inside a pixel that carry colour (everything except alpha).
    pub fn color_channels(self) -> &'static [usize] {
        match self {
            PixelFormat::Gray8 | PixelFormat::GrayAlpha8 => &[0],
            PixelFormat::Rgb8 | PixelFormat::Rgba8 | PixelFormat::Bgra8 => &[0, 1, 2],
        }
    }

    /// Whether the layout carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        self.alpha_index().is_some()
    }

    /// Whether the layout is single-channel luma (with or without alpha).
    pub fn is_gray(self) -> bool {
        matches!(self, PixelFormat::Gray8 | PixelFormat::GrayAlpha8)
    }

    /// Name of the equivalent `ffmpeg` `-pix_fmt`.
    pub fn ffmpeg_name(self) -> &'static str {
        match self {
            PixelFormat::Gray8 => "gray",
            PixelFormat::GrayAlpha8 => "ya8",
            PixelFormat::Rgb8 => "rgb24",
            PixelFormat::Rgba8 => "rgba",
            PixelFormat::Bgra8 => "bgra",
        }
    }

    /// Inverse of [`PixelFormat::ffmpeg_name`].
    pub fn from_ffmpeg_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.ffmpeg_name() == name)
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PixelFormat::Gray8 => "gray8",
            PixelFormat::GrayAlpha8 => "gray_alpha8",
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Rgba8 => "rgba8",
            PixelFormat::Bgra8 => "bgra8",
        };
        f.write_str(s)
    }
}

/// Positive rational number, used as an encoder time base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rational {
    /// Numerator.
    pub num: u32,
    /// Denominator (must be > 0).
    pub den: u32,
}

impl Rational {
    /// `1/1`, the nominal time base used for still images.
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Build a validated rational.
    pub fn new(num: u32, den: u32) -> InvertResult<Self> {
        if den == 0 {
            return Err(InvertError::validation("Rational den must be > 0"));
        }
        if num == 0 {
            return Err(InvertError::validation("Rational num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Value as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::ONE
    }
}

impl std::fmt::Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
