//! Ticket rendering pipeline: template compositing, identifier stamping,
//! QR overlay, PNG output, and append-only CSV logging.
//!
//! The entry point is [`run_batch`], which renders every ticket in a
//! numeric range sequentially and reports progress through a callback.

pub mod batch;
pub mod compose;
pub mod config;
pub mod log;

// Re-exports for convenience
pub use batch::{BatchRequest, BatchSummary, Progress, run_batch};
pub use compose::generate_ticket;
pub use config::TicketConfig;
pub use log::{TicketLog, TicketRecord};

/// Errors that can occur while generating tickets.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("Invalid batch request: {0}")]
    InvalidRequest(String),

    #[error("Failed to load ticket template '{path}': {source}")]
    Template {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("No usable font found (configured font unavailable and no system fallback)")]
    Font,

    #[error(transparent)]
    Qr(#[from] qr_render::QrError),

    #[error("Failed to write ticket image '{path}': {source}")]
    ImageWrite {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid config file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
