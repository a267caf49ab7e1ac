use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageDecoder, ImageReader};

use crate::foundation::core::{PixelFormat, Rational};
use crate::foundation::error::{InvertError, InvertResult};
use crate::media::codec::CodecId;
use crate::media::frame::pixel_format_for;
use crate::media::packet::Packet;

/// Options for [`InputContainer::open`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerOpts {
    /// Split the stream into packets of at most this many bytes.
    ///
    /// `None` yields the whole stream as a single packet, like a still-image demuxer.
    pub max_packet_size: Option<usize>,
}

/// Metadata of the stream selected for decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamInfo {
    /// Stream index inside the container.
    pub index: usize,
    /// Codec, when it is one this crate can name.
    pub codec: Option<CodecId>,
    /// Codec name as reported by the prober.
    pub codec_name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout decoded frames are delivered in.
    pub pixel_format: PixelFormat,
    /// Stream time base.
    pub time_base: Rational,
}

/// An opened input file, read as a single-stream container.
#[derive(Debug)]
pub struct InputContainer {
    path: PathBuf,
    data: Vec<u8>,
    cursor: usize,
    opts: ContainerOpts,
    stream: Option<StreamInfo>,
    packets_read: usize,
}

impl InputContainer {
    /// Open and read `path`.
    #[tracing::instrument(skip(opts))]
    pub fn open(path: &Path, opts: ContainerOpts) -> InvertResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| InvertError::open(format!("could not open '{}': {e}", path.display())))?;
        if data.is_empty() {
            return Err(InvertError::open(format!(
                "'{}' is empty",
                path.display()
            )));
        }
        tracing::debug!(bytes = data.len(), "opened input");
        Self::from_memory(path, data, opts)
    }

    /// Wrap bytes already in memory; `path` is only used for diagnostics and external probers.
    pub fn from_memory(
        path: impl Into<PathBuf>,
        data: Vec<u8>,
        opts: ContainerOpts,
    ) -> InvertResult<Self> {
        if opts.max_packet_size == Some(0) {
            return Err(InvertError::validation("max_packet_size must be >= 1"));
        }
        Ok(Self {
            path: path.into(),
            data,
            cursor: 0,
            opts,
            stream: None,
            packets_read: 0,
        })
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total size of the stream in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the stream holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stream info discovered by the last successful probe.
    pub fn stream(&self) -> Option<&StreamInfo> {
        self.stream.as_ref()
    }

    /// Record stream info discovered by an external prober.
    pub fn set_stream(&mut self, stream: StreamInfo) {
        self.stream = Some(stream);
    }

    /// Number of packets handed out so far.
    pub fn packets_read(&self) -> usize {
        self.packets_read
    }

    /// Sniff the container format and read the header of its first stream.
    pub fn find_stream_info(&mut self) -> InvertResult<&StreamInfo> {
        let format = image::guess_format(&self.data).map_err(|e| {
            InvertError::probe(format!(
                "could not find stream info for '{}': {e}",
                self.path.display()
            ))
        })?;
        let codec = CodecId::from_image_format(format).ok_or_else(|| {
            InvertError::probe(format!(
                "'{}' uses unsupported format {format:?}",
                self.path.display()
            ))
        })?;

        let decoder = ImageReader::with_format(Cursor::new(self.data.as_slice()), format)
            .into_decoder()
            .map_err(|e| {
                InvertError::probe(format!(
                    "could not read {codec} header of '{}': {e}",
                    self.path.display()
                ))
            })?;
        let (width, height) = decoder.dimensions();
        let pixel_format = pixel_format_for(decoder.color_type());

        tracing::debug!(%codec, width, height, %pixel_format, "found stream info");
        Ok(self.stream.insert(StreamInfo {
            index: 0,
            codec: Some(codec),
            codec_name: codec.name().to_string(),
            width,
            height,
            pixel_format,
            time_base: Rational::ONE,
        }))
    }

    /// Next packet of the stream, or `None` at end of stream.
    pub fn read_packet(&mut self) -> InvertResult<Option<Packet>> {
        if self.cursor >= self.data.len() {
            return Ok(None);
        }
        let remaining = self.data.len() - self.cursor;
        let size = self.opts.max_packet_size.unwrap_or(remaining).min(remaining);
        let data = self.data[self.cursor..self.cursor + size].to_vec();
        self.cursor += size;
        self.packets_read += 1;
        Ok(Some(Packet::new(0, data)))
    }

    /// Rewind to the first packet.
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.packets_read = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/container.rs"]
mod tests;
