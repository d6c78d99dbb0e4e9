// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so JSON on stdout stays clean)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = no preview / rejected image,
//    2 = error)
//
// The real work lives in the og_preview library; this file only fetches
// input, calls it, and prints what comes back.
// =============================================================================

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, PreviewArgs};
use og_preview::download::{DeliveryQueue, ImageDownloader, ReqwestTransport};
use og_preview::fetch::{fetch_markup, validate_page_url};
use og_preview::{Config, LinkPreview, OpenGraphScanner, PageDescription, Resolver};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.global.log_json);

    let config = Config::new(cli.global.timeout_secs, cli.global.user_agent);

    match cli.command {
        Commands::Preview { url, options } => handle_preview(&url, &options, &config).await,
        Commands::Scan { file, url, options } => handle_scan(&file, &url, &options).await,
        Commands::Images { urls, json } => handle_images(urls, json, &config).await,
    }
}

// Logs go to stderr; RUST_LOG overrides the default level
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("og_preview=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// Handles the 'preview' subcommand: fetch the page, then build the preview
async fn handle_preview(url: &str, options: &PreviewArgs, config: &Config) -> Result<i32> {
    let page_url = validate_page_url(url)?;
    info!(url = %page_url, "fetching page");

    let client = config.http_client().context("Failed to create HTTP client")?;
    let markup = fetch_markup(&client, &page_url).await?;

    Ok(report_preview(&markup, url, options))
}

// Handles the 'scan' subcommand: same as 'preview' with markup from disk
async fn handle_scan(file: &Path, url: &str, options: &PreviewArgs) -> Result<i32> {
    let markup = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    Ok(report_preview(&markup, url, options))
}

#[derive(Serialize)]
struct PreviewReport<'a> {
    page: &'a PageDescription,
    preview: &'a LinkPreview,
}

// Scans the markup, resolves the preview and prints it
//
// Returns the exit code: 0 if a preview was built, 1 if not
fn report_preview(markup: &str, url: &str, options: &PreviewArgs) -> i32 {
    let mut description = None;
    OpenGraphScanner::new(markup, url, |page| description = page).parse();

    let Some(page) = description else {
        println!("⚠️  No usable OpenGraph data found for {}", url);
        return 1;
    };

    let resolver = if options.site_specific {
        Resolver::with_site_specific()
    } else {
        Resolver::default()
    };
    let preview = resolver.resolve(&page, url, options.offset);

    if options.json {
        let report = PreviewReport { page: &page, preview: &preview };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 2;
            }
        }
    } else {
        print_preview(&page, &preview);
    }
    0
}

fn print_preview(page: &PageDescription, preview: &LinkPreview) {
    println!("{:<16} {}", "PREVIEW", preview.kind());
    println!("{}", "=".repeat(80));

    match preview {
        LinkPreview::Article(article) => {
            println!("{:<16} {}", "Title", article.title);
            println!("{:<16} {}", "Summary", article.summary.as_deref().unwrap_or("-"));
        }
        LinkPreview::SocialStatus(status) => {
            println!("{:<16} {}", "Author", status.author);
            println!("{:<16} {}", "Message", status.message.as_deref().unwrap_or("-"));
        }
        LinkPreview::Location(location) => {
            println!("{:<16} {}", "Title", location.title);
            println!("{:<16} {}", "Subtitle", location.subtitle.as_deref().unwrap_or("-"));
            if let (Some(latitude), Some(longitude)) = (location.latitude, location.longitude) {
                println!("{:<16} {}, {}", "Coordinates", latitude, longitude);
            }
        }
        LinkPreview::MediaPicture(picture) => {
            println!("{:<16} {}", "Title", picture.title);
            println!("{:<16} {}", "Subtitle", picture.subtitle.as_deref().unwrap_or("-"));
        }
    }

    println!("{:<16} {}", "Original URL", preview.original_url());
    println!("{:<16} {}", "Permanent URL", preview.permanent_url());
    println!("{:<16} {}", "Offset", preview.character_offset());
    println!("{:<16} {}", "Site", page.site_name_raw().unwrap_or("-"));
    println!("{:<16} {}", "Type", page.kind());
    for image in preview.image_urls() {
        println!("{:<16} {}", "Image", image);
    }
}

#[derive(Debug, Serialize)]
struct ImageResult {
    url: String,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<usize>,
}

// Handles the 'images' subcommand
//
// Every URL is downloaded at once; results are printed in completion order
async fn handle_images(urls: Vec<String>, json: bool, config: &Config) -> Result<i32> {
    let transport = ReqwestTransport::from_config(config).context("Failed to create HTTP client")?;
    let handle = Handle::current();
    let downloader = ImageDownloader::new(Arc::new(transport), handle.clone(), DeliveryQueue::new(&handle));

    info!(count = urls.len(), "downloading images");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handles = downloader.download_many(&urls, move |url, image| {
        let _ = tx.send(ImageResult {
            url,
            accepted: image.is_some(),
            bytes: image.map(|bytes| bytes.len()),
        });
    });

    let mut results = Vec::with_capacity(urls.len());
    while let Some(result) = rx.recv().await {
        results.push(result);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_images(&results);
    }

    let rejected = results.iter().filter(|r| !r.accepted).count();
    Ok(if rejected > 0 { 1 } else { 0 })
}

fn print_images(results: &[ImageResult]) {
    println!("{:<60} {:<12} {:>10}", "URL", "STATUS", "BYTES");
    println!("{}", "=".repeat(84));

    for result in results {
        // Truncate URL if too long for display
        let url_display = if result.url.chars().count() > 57 {
            format!("{}...", result.url.chars().take(57).collect::<String>())
        } else {
            result.url.clone()
        };
        let status = if result.accepted { "✅ IMAGE" } else { "❌ REJECTED" };
        let bytes = result.bytes.map(|b| b.to_string()).unwrap_or_default();

        println!("{:<60} {:<12} {:>10}", url_display, status, bytes);
    }

    println!();
    let accepted = results.iter().filter(|r| r.accepted).count();
    println!("📊 Summary:");
    println!("   ✅ Accepted: {}", accepted);
    println!("   ❌ Rejected: {}", results.len() - accepted);
    println!("   📋 Total: {}", results.len());
}
