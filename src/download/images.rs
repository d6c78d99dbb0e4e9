// src/download/images.rs
// =============================================================================
// Downloads preview images and keeps only real JPEG/PNG/GIF payloads.
//
// How it works:
// 1. download_one() asks the Transport for the URL right away and spawns the
//    transfer on the worker runtime (nothing is deferred)
// 2. When the transfer finishes, the declared Content-Type is checked
//    against a fixed list (case-insensitive, exact match)
// 3. The result (Some(bytes) or None) is handed to the DeliveryQueue, which
//    runs the caller's callback
//
// download_many() is just download_one() per URL: every URL gets its own
// transfer, they all run at once, and the callback fires once per URL in
// whatever order the transfers finish. There is no concurrency cap and no
// retry here; that's the transport's business.
//
// Failures are not distinguished. Network errors, wrong content types and
// cancellations all arrive as None.
//
// Rust concepts:
// - tokio::select!: race the transfer against a cancel signal
// - oneshot channels: a one-time "please cancel" message
// - Arc<F>: share one callback between many spawned tasks
// =============================================================================

use std::sync::Arc;

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::queue::DeliveryQueue;
use super::transport::{Transport, TransportResponse};
use crate::error::TransportError;

/// Content types we accept as preview images
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Exact, ASCII case-insensitive match against ACCEPTED_IMAGE_TYPES.
/// Parameters like `; charset=...` are NOT stripped.
pub fn is_accepted_image_type(content_type: &str) -> bool {
    ACCEPTED_IMAGE_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(content_type))
}

/// Lets the holder cancel one in-flight download
#[derive(Debug)]
pub struct DownloadHandle {
    url: String,
    cancel: Option<oneshot::Sender<()>>,
}

impl DownloadHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Cancels the transfer. Its callback still runs, with None.
    /// Does nothing if the transfer already finished.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// True once the transfer has completed or been cancelled
    pub fn is_finished(&self) -> bool {
        self.cancel.as_ref().map_or(true, |cancel| cancel.is_closed())
    }
}

/// Fetches images through a Transport and delivers them on a DeliveryQueue
#[derive(Clone)]
pub struct ImageDownloader {
    transport: Arc<dyn Transport>,
    worker: Handle,
    results: DeliveryQueue,
}

impl ImageDownloader {
    // Parameters:
    //   transport: issues the actual HTTP requests
    //   worker: the runtime the transfers are driven on
    //   results: where completion callbacks run (may live on another runtime)
    pub fn new(transport: Arc<dyn Transport>, worker: Handle, results: DeliveryQueue) -> Self {
        ImageDownloader { transport, worker, results }
    }

    // Starts one download
    //
    // `on_complete` runs exactly once on the results queue with the image
    // bytes, or None if the download failed, was rejected or was cancelled
    pub fn download_one<F>(&self, url: &str, on_complete: F) -> DownloadHandle
    where
        F: FnOnce(Option<Bytes>) + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let transfer = self.transport.fetch(url);
        let results = self.results.clone();
        let task_url = url.to_string();

        self.worker.spawn(async move {
            let outcome = tokio::select! {
                outcome = transfer => outcome,
                // A dropped handle (Err) is not a cancellation
                Ok(()) = cancel_rx => Err(TransportError::Cancelled),
            };
            let image = accept_image(&task_url, outcome);
            results.dispatch(move || on_complete(image));
        });

        DownloadHandle {
            url: url.to_string(),
            cancel: Some(cancel_tx),
        }
    }

    // Starts one download per URL, all at once
    //
    // `on_each` runs once per URL (duplicates included) with that URL and
    // its result, in completion order
    pub fn download_many<I, S, F>(&self, urls: I, on_each: F) -> Vec<DownloadHandle>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(String, Option<Bytes>) + Send + Sync + 'static,
    {
        let on_each = Arc::new(on_each);

        urls.into_iter()
            .map(|url| {
                let url = url.as_ref();
                let on_each = Arc::clone(&on_each);
                let reported_url = url.to_string();
                self.download_one(url, move |image| on_each(reported_url, image))
            })
            .collect()
    }
}

// Collapses a transfer outcome into "image bytes or nothing"
fn accept_image(url: &str, outcome: Result<TransportResponse, TransportError>) -> Option<Bytes> {
    match outcome {
        Ok(response) => match response.content_type.as_deref() {
            Some(content_type) if is_accepted_image_type(content_type) => {
                debug!(url, content_type, bytes = response.body.len(), "image accepted");
                Some(response.body)
            }
            content_type => {
                debug!(url, ?content_type, "image rejected: unexpected content type");
                None
            }
        },
        Err(TransportError::Cancelled) => {
            debug!(url, "image download cancelled");
            None
        }
        Err(error) => {
            warn!(url, %error, "image download failed");
            None
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does download_one return before the download is done?
//    - The transfer is spawned onto the worker runtime and runs on its own
//    - The caller gets a DownloadHandle right away and the result later,
//      through the callback
//
// 2. Why Arc<dyn Transport> instead of a generic parameter?
//    - One downloader can be cloned and shared without carrying a type
//      parameter around
//    - Tests swap in a mock without changing any signatures
//
// 3. What does tokio::select! do here?
//    - It waits for whichever finishes first: the transfer or a cancel
//    - The branch that loses is dropped, which stops the transfer
//
// 4. Why is the callback Fn and not FnOnce in download_many?
//    - The same callback is called once per URL, so it must be callable
//      more than once (and from several tasks, hence Send + Sync)
// -----------------------------------------------------------------------------
