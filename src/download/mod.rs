// src/download/mod.rs
// =============================================================================
// This module downloads and validates preview images.
//
// Submodules:
// - transport: The network capability (trait + reqwest implementation)
// - queue: A serial callback queue results are delivered on
// - images: The concurrent downloader and its per-transfer handles
//
// This is the only concurrent part of the crate. Everything else runs
// synchronously on the caller's thread.
// =============================================================================

mod images;
mod queue;
mod transport;

pub use images::{is_accepted_image_type, DownloadHandle, ImageDownloader, ACCEPTED_IMAGE_TYPES};
pub use queue::{DeliveryQueue, QueueId};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
