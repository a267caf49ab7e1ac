//! End-to-end inversion: configuration plus the decode → invert → encode → write run.

/// JSON-loadable run configuration.
pub(crate) mod config;
/// The pipeline itself.
pub(crate) mod run;
