use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::backend::{BackendKind, BackendSettings};
use crate::encode::native::PngOptions;
use crate::foundation::error::{InvertError, InvertResult};
use crate::media::codec::CodecId;

/// Input read when none is given.
pub const DEFAULT_INPUT: &str = "traffic_map_2020_12_01_03_40.png";
/// Output written when none is given.
pub const DEFAULT_OUTPUT: &str = "inverted.png";

/// Everything [`crate::run`] needs, loadable from JSON.
///
/// Missing fields take their defaults, so `{}` is a complete config.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvertConfig {
    /// Image to read.
    pub input: PathBuf,
    /// Where the inverted image is written.
    pub output: PathBuf,
    /// Codec library used for decode and encode.
    pub backend: BackendKind,
    /// Output codec; resolved from `output` and the source when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<CodecId>,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// Split the input into packets of at most this many bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_packet_size: Option<usize>,
    /// Row alignment (bytes) of the working frame.
    pub row_alignment: usize,
    /// Native PNG encoder tuning.
    pub png: PngOptions,
}

impl Default for InvertConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            backend: BackendKind::default(),
            codec: None,
            overwrite: true,
            max_packet_size: None,
            row_alignment: 1,
            png: PngOptions::default(),
        }
    }
}

impl InvertConfig {
    /// Load a JSON config file.
    pub fn from_path(path: &Path) -> InvertResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Reject configs the pipeline cannot run.
    pub fn validate(&self) -> InvertResult<()> {
        if self.input.as_os_str().is_empty() {
            return Err(InvertError::validation("input path must not be empty"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(InvertError::validation("output path must not be empty"));
        }
        if self.max_packet_size == Some(0) {
            return Err(InvertError::validation("max_packet_size must be >= 1"));
        }
        if self.row_alignment == 0 {
            return Err(InvertError::validation("row_alignment must be >= 1"));
        }
        Ok(())
    }

    /// Backend settings derived from this config.
    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings { png: self.png }
    }

    /// Output codec: explicit `codec`, else the output extension, else `source`, else PNG.
    pub fn resolve_output_codec(&self, source: Option<CodecId>) -> CodecId {
        self.codec
            .or_else(|| CodecId::from_path(&self.output))
            .or(source)
            .unwrap_or(CodecId::Png)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
