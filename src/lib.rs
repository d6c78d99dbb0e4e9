// src/lib.rs
// =============================================================================
// og-preview turns a web page into a typed link preview.
//
// The pipeline:
//   markup --scanner--> (properties, images)
//          --model-->   PageDescription (validated, immutable)
//          --resolver-> LinkPreview (article, tweet, ...)
//
// Independently, the download module fetches the preview images and keeps
// only payloads declared as JPEG, PNG or GIF.
//
// Failures are never fatal: a page we can't understand gives `None`, an
// image we can't use gives `None`.
// =============================================================================

pub mod config;
pub mod download;
pub mod error;
pub mod fetch;
pub mod model;
pub mod scanner;

pub use config::Config;
pub use download::{DeliveryQueue, DownloadHandle, ImageDownloader, ReqwestTransport, Transport};
pub use error::TransportError;
pub use model::{LinkPreview, PageDescription, Resolver, SiteName};
pub use scanner::{scan, OpenGraphScanner, PropertyMapping, PropertyType};
