// src/fetch.rs
// =============================================================================
// Fetches the markup of a page so the scanner has something to read.
//
// This is the "HTTP client" side of the pipeline. The library core never
// calls it; the CLI does, and so can anyone who doesn't already have the
// page markup at hand.
//
// Rust concepts:
// - anyhow::Result and anyhow!: quick errors with a readable message
// - Url: parsing and validating user input before we hit the network
// =============================================================================

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

// Parses a page URL and makes sure we can fetch it
//
// Only http:// and https:// URLs are accepted; mailto:, file:, javascript:
// and friends have no markup to scan
pub fn validate_page_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| anyhow!("Invalid URL '{}': {}", url, e))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(anyhow!("Unsupported URL scheme '{}' in {}", scheme, url)),
    }

    if parsed.host_str().is_none() {
        return Err(anyhow!("URL has no host: {}", url));
    }

    Ok(parsed)
}

// Fetches a web page and returns its markup
//
// Returns an error for transport failures and non-2xx responses
pub async fn fetch_markup(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow!("HTTP {} for {}", response.status(), url));
    }

    let markup = response
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))?;
    debug!(%url, bytes = markup.len(), "fetched page markup");

    Ok(markup)
}
