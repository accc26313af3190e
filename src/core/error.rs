use thiserror::Error;

/// Errors that can occur around the tax engine.
///
/// Extraction, classification, and aggregation are total and never fail;
/// only configuration, provider intake, and report rendering do.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaxExportError {
    /// Export configuration is unusable (e.g. unknown company country).
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider invoice data could not be read.
    #[error("provider data error: {0}")]
    Provider(String),

    /// Report rendering failed.
    #[error("report error: {0}")]
    Report(String),
}
