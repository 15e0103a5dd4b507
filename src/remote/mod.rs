//! Typed clients for the two collaborating services
//!
//! - Audio processing service: `POST /process-audio` → transcription + answer
//! - Document indexing service: `POST /upload-pdf` → ingestion receipt,
//!   `GET /stats` → index statistics
//!
//! Both are treated as opaque HTTP collaborators; failures split into
//! service errors (non-2xx, optional `detail`) and transport errors.

mod audio;
mod error;
mod indexing;

pub use audio::{AudioProcessing, AudioServiceClient};
pub use error::RemoteError;
pub use indexing::{IndexReceipt, IndexStats, IndexingServiceClient};
