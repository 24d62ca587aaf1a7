use thiserror::Error;

/// Failures inside the document composer. A render either completes and
/// returns the whole byte buffer, or fails with one of these; no partial
/// document is ever produced.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("quotation bundle is missing required data: {0}")]
    MissingBundleData(&'static str),

    #[error("failed to format the quote date: {0}")]
    DateFormat(#[from] time::error::Format),

    #[error("page index {0} is out of bounds")]
    PageOutOfBounds(usize),

    #[error("failed to serialize the PDF document: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to write the PDF document: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while assembling a quotation bundle from the hosted backend.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("backend returned status {status}: {message}")]
    Upstream { status: u16, message: String },
}

/// Failures surfaced at the request boundary. Every variant is converted
/// into the JSON error response with status 500; the caller may retry at
/// its own discretion since the operation is read-only.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Quote ID is required")]
    MissingIdentifier,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVariable(&'static str),

    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),
}
