/// Convenience result type used across the crate.
pub type InvertResult<T> = Result<T, InvertError>;

/// Error taxonomy with one variant per pipeline stage (open, probe, decode, encode, write).
#[derive(thiserror::Error, Debug)]
pub enum InvertError {
    /// The input container could not be opened or read.
    #[error("open error: {0}")]
    Open(String),

    /// Stream information could not be discovered from the opened container.
    #[error("probe error: {0}")]
    Probe(String),

    /// Decoder lookup, packet submission or frame retrieval failed.
    #[error("decoder error: {0}")]
    Decoder(String),

    /// Encoder lookup, frame submission or packet retrieval failed.
    #[error("encoder error: {0}")]
    Encoder(String),

    /// The encoded output could not be written.
    #[error("write error: {0}")]
    Write(String),

    /// Invalid caller-provided data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InvertError {
    /// Build an [`InvertError::Open`] value.
    pub fn open(msg: impl Into<String>) -> Self {
        Self::Open(msg.into())
    }

    /// Build an [`InvertError::Probe`] value.
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Build an [`InvertError::Decoder`] value.
    pub fn decoder(msg: impl Into<String>) -> Self {
        Self::Decoder(msg.into())
    }

    /// Build an [`InvertError::Encoder`] value.
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }

    /// Build an [`InvertError::Write`] value.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Build an [`InvertError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable, lower-case name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::Probe(_) => "probe",
            Self::Decoder(_) => "decode",
            Self::Encoder(_) => "encode",
            Self::Write(_) => "write",
            Self::Validation(_) => "validate",
            Self::Other(_) => "other",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
