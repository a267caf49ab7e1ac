use std::path::Path;

use image::ImageFormat;

use crate::foundation::error::{InvertError, InvertResult};

/// Identifies the codec of an image stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecId {
    /// Portable Network Graphics.
    Png,
    /// JPEG / JFIF.
    Jpeg,
    /// Graphics Interchange Format (first frame only).
    Gif,
    /// WebP.
    WebP,
    /// Windows bitmap.
    Bmp,
    /// Tagged Image File Format.
    Tiff,
    /// Quite OK Image format.
    Qoi,
    /// Truevision TGA.
    Tga,
    /// Windows icon.
    Ico,
    /// Netpbm (PBM/PGM/PPM/PAM).
    Pnm,
}

impl CodecId {
    /// Every known codec.
    pub const ALL: [CodecId; 10] = [
        CodecId::Png,
        CodecId::Jpeg,
        CodecId::Gif,
        CodecId::WebP,
        CodecId::Bmp,
        CodecId::Tiff,
        CodecId::Qoi,
        CodecId::Tga,
        CodecId::Ico,
        CodecId::Pnm,
    ];

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            CodecId::Png => "png",
            CodecId::Jpeg => "jpeg",
            CodecId::Gif => "gif",
            CodecId::WebP => "webp",
            CodecId::Bmp => "bmp",
            CodecId::Tiff => "tiff",
            CodecId::Qoi => "qoi",
            CodecId::Tga => "tga",
            CodecId::Ico => "ico",
            CodecId::Pnm => "pnm",
        }
    }

    /// Parse a codec name or file extension (`"png"`, `"jpg"`, `"tif"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if let Some(c) = Self::ALL.into_iter().find(|c| c.name() == name) {
            return Some(c);
        }
        ImageFormat::from_extension(&name).and_then(Self::from_image_format)
    }

    /// Guess the codec from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_name)
    }

    /// The matching `image` crate format.
    pub fn image_format(self) -> ImageFormat {
        match self {
            CodecId::Png => ImageFormat::Png,
            CodecId::Jpeg => ImageFormat::Jpeg,
            CodecId::Gif => ImageFormat::Gif,
            CodecId::WebP => ImageFormat::WebP,
            CodecId::Bmp => ImageFormat::Bmp,
            CodecId::Tiff => ImageFormat::Tiff,
            CodecId::Qoi => ImageFormat::Qoi,
            CodecId::Tga => ImageFormat::Tga,
            CodecId::Ico => ImageFormat::Ico,
            CodecId::Pnm => ImageFormat::Pnm,
        }
    }

    /// Map an `image` crate format back to a codec, if it is one we handle.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.image_format() == format)
    }

    /// `ffmpeg` codec name used for decoding, as reported by `ffprobe`.
    pub fn ffmpeg_decoder_name(self) -> Option<&'static str> {
        match self {
            CodecId::Png => Some("png"),
            CodecId::Jpeg => Some("mjpeg"),
            CodecId::Gif => Some("gif"),
            CodecId::WebP => Some("webp"),
            CodecId::Bmp => Some("bmp"),
            CodecId::Tiff => Some("tiff"),
            CodecId::Qoi => Some("qoi"),
            CodecId::Tga => Some("targa"),
            CodecId::Pnm => Some("ppm"),
            CodecId::Ico => None,
        }
    }

    /// `ffmpeg` encoder name (`-c:v`).
    pub fn ffmpeg_encoder_name(self) -> Option<&'static str> {
        match self {
            CodecId::WebP => Some("libwebp"),
            other => other.ffmpeg_decoder_name(),
        }
    }

    /// Map an `ffprobe` `codec_name` back to a codec.
    pub fn from_ffmpeg_name(name: &str) -> Option<Self> {
        match name {
            "pgm" | "pgmyuv" | "pbm" | "pam" => Some(CodecId::Pnm),
            "jpegls" | "ljpeg" => Some(CodecId::Jpeg),
            _ => Self::ALL
                .into_iter()
                .find(|c| c.ffmpeg_decoder_name() == Some(name)),
        }
    }

    /// Whether this codec stores an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, CodecId::Jpeg | CodecId::Pnm)
    }
}

impl std::fmt::Display for CodecId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CodecId {
    type Err = InvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| InvertError::validation(format!("unknown codec '{s}'")))
    }
}

/// Look up a native decoder for `codec`.
pub fn find_decoder(codec: CodecId) -> InvertResult<CodecId> {
    if codec.image_format().reading_enabled() {
        Ok(codec)
    } else {
        Err(InvertError::decoder(format!(
            "no decoder available for codec '{codec}'"
        )))
    }
}

/// Look up a native encoder for `codec`.
pub fn find_encoder(codec: CodecId) -> InvertResult<CodecId> {
    if codec.image_format().writing_enabled() {
        Ok(codec)
    } else {
        Err(InvertError::encoder(format!(
            "no encoder available for codec '{codec}'"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/codec.rs"]
mod tests;
