use crate::assets::container::{InputContainer, StreamInfo};
use crate::assets::decode::{FrameDecoder, NativeDecoder};
use crate::encode::encoder::{EncoderConfig, FrameEncoder};
use crate::encode::native::{NativeEncoder, PngOptions};
use crate::foundation::error::{InvertError, InvertResult};

/// Which codec library does the probing, decoding and encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Pure-Rust codecs from the `image` crate.
    #[default]
    Native,
    /// The system `ffmpeg`/`ffprobe` binaries (requires the `media-ffmpeg` feature).
    Ffmpeg,
}

impl std::str::FromStr for BackendKind {
    type Err = InvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(BackendKind::Native),
            "ffmpeg" => Ok(BackendKind::Ffmpeg),
            other => Err(InvertError::validation(format!("unknown backend '{other}'"))),
        }
    }
}

/// Settings shared by all backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackendSettings {
    /// Native PNG encoder tuning.
    pub png: PngOptions,
}

/// A codec library: probes streams and opens decoders and encoders.
pub trait MediaBackend {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;
    /// Discover the stream to decode.
    fn find_stream_info(&mut self, input: &mut InputContainer) -> InvertResult<StreamInfo>;
    /// Open a decoder for `stream`.
    fn open_decoder(&mut self, stream: &StreamInfo) -> InvertResult<Box<dyn FrameDecoder>>;
    /// Open an encoder configured by `cfg`.
    fn open_encoder(&mut self, cfg: &EncoderConfig) -> InvertResult<Box<dyn FrameEncoder>>;
}

/// Backend over the `image` crate codecs.
#[derive(Clone, Debug, Default)]
pub struct NativeBackend {
    settings: BackendSettings,
}

impl NativeBackend {
    /// Create a native backend.
    pub fn new(settings: BackendSettings) -> Self {
        Self { settings }
    }
}

impl MediaBackend for NativeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn find_stream_info(&mut self, input: &mut InputContainer) -> InvertResult<StreamInfo> {
        input.find_stream_info().cloned()
    }

    fn open_decoder(&mut self, stream: &StreamInfo) -> InvertResult<Box<dyn FrameDecoder>> {
        Ok(Box::new(NativeDecoder::open(stream)?))
    }

    fn open_encoder(&mut self, cfg: &EncoderConfig) -> InvertResult<Box<dyn FrameEncoder>> {
        Ok(Box::new(NativeEncoder::open(cfg, self.settings.png)?))
    }
}

/// Backend over the system `ffmpeg`/`ffprobe` binaries.
#[cfg(feature = "media-ffmpeg")]
#[derive(Clone, Debug, Default)]
pub struct FfmpegBackend;

#[cfg(feature = "media-ffmpeg")]
impl FfmpegBackend {
    /// Create an ffmpeg backend, failing when `ffmpeg` is not on `PATH`.
    pub fn new() -> InvertResult<Self> {
        if !crate::encode::ffmpeg::is_ffmpeg_on_path() {
            return Err(InvertError::validation(
                "the ffmpeg backend requires ffmpeg, but it was not found on PATH",
            ));
        }
        Ok(Self)
    }
}

#[cfg(feature = "media-ffmpeg")]
impl MediaBackend for FfmpegBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Ffmpeg
    }

    fn find_stream_info(&mut self, input: &mut InputContainer) -> InvertResult<StreamInfo> {
        let stream = crate::assets::media::probe_stream(input.path())?;
        input.set_stream(stream.clone());
        Ok(stream)
    }

    fn open_decoder(&mut self, stream: &StreamInfo) -> InvertResult<Box<dyn FrameDecoder>> {
        Ok(Box::new(crate::assets::media::FfmpegDecoder::open(stream)?))
    }

    fn open_encoder(&mut self, cfg: &EncoderConfig) -> InvertResult<Box<dyn FrameEncoder>> {
        Ok(Box::new(crate::encode::ffmpeg::FfmpegEncoder::open(cfg)?))
    }
}

/// Create the backend selected by `kind`.
pub fn create_backend(
    kind: BackendKind,
    settings: &BackendSettings,
) -> InvertResult<Box<dyn MediaBackend>> {
    match kind {
        BackendKind::Native => Ok(Box::new(NativeBackend::new(*settings))),
        #[cfg(feature = "media-ffmpeg")]
        BackendKind::Ffmpeg => Ok(Box::new(FfmpegBackend::new()?)),
        #[allow(unreachable_patterns)]
        _ => Err(InvertError::validation(
            "the ffmpeg backend requires the 'media-ffmpeg' feature",
        )),
    }
}

#[cfg(test)]
#[path = "../tests/unit/backend.rs"]
mod tests;
