// src/scanner/opengraph.rs
// =============================================================================
// Turns raw page markup into a PageDescription.
//
// The scan is a single synchronous pass:
// 1. TagScanner yields <meta> and <title> tokens in document order
// 2. Recognized meta properties go into a PropertyMapping (first one wins)
// 3. Every og:image is appended to a separate, ordered image list
// 4. Missing og:title / og:url are filled from <title> and the page URL
// 5. PageDescription::from_mapping validates the result
//
// The outcome (Some or None) is handed to a completion callback exactly
// once. Because parse() takes `self` by value, a scanner can't be run twice.
//
// Rust concepts:
// - FnOnce: a callback that may only be called a single time
// - HashMap::entry: insert-if-absent without a second lookup
// - Cow<str>: html_escape only allocates when there is something to decode
// =============================================================================

use tracing::debug;

use super::property::{PropertyMapping, PropertyType};
use super::tags::{TagScanner, Token};
use crate::model::PageDescription;

// Scans the markup and returns the recognized properties plus all images
//
// Parameters:
//   markup: the page markup (usually just the <head>)
//
// Returns: (mapping, images)
//   mapping: first value seen for each recognized property
//   images: every og:image value, in document order, duplicates kept
pub fn collect_properties(markup: &str) -> (PropertyMapping, Vec<String>) {
    let (mapping, images, _) = collect(markup);
    (mapping, images)
}

// Same as collect_properties, but also remembers the first <title> text
fn collect(markup: &str) -> (PropertyMapping, Vec<String>, Option<String>) {
    let mut mapping = PropertyMapping::new();
    let mut images = Vec::new();
    let mut title_element = None;

    for token in TagScanner::new(markup) {
        if let Token::Title(text) = token {
            if title_element.is_none() {
                title_element = Some(clean_value(text)).filter(|text| !text.is_empty());
            }
            continue;
        }

        let Some(property) = token
            .attribute("property")
            .and_then(PropertyType::from_markup_name)
            .or_else(|| token.attribute("name").and_then(PropertyType::from_markup_name))
        else {
            continue;
        };

        let Some(content) = token
            .attribute("content")
            .map(clean_value)
            .filter(|content| !content.is_empty())
        else {
            continue;
        };

        if property == PropertyType::Image {
            images.push(content);
        } else {
            mapping.entry(property).or_insert(content);
        }
    }

    (mapping, images, title_element)
}

// Trims and decodes HTML entities (named and numeric)
fn clean_value(raw: &str) -> String {
    html_escape::decode_html_entities(raw.trim()).trim().to_string()
}

/// Scans one page and reports the resulting description through a callback
pub struct OpenGraphScanner<'a, F>
where
    F: FnOnce(Option<PageDescription>),
{
    markup: &'a str,
    url: &'a str,
    completion: F,
}

impl<'a, F> OpenGraphScanner<'a, F>
where
    F: FnOnce(Option<PageDescription>),
{
    pub fn new(markup: &'a str, url: &'a str, completion: F) -> Self {
        OpenGraphScanner { markup, url, completion }
    }

    /// Runs the scan and calls the completion exactly once
    pub fn parse(self) {
        let (mut mapping, images, title_element) = collect(self.markup);

        if let Some(title) = title_element {
            mapping.entry(PropertyType::Title).or_insert(title);
        }
        let page_url = self.url.trim();
        if !page_url.is_empty() {
            mapping
                .entry(PropertyType::Url)
                .or_insert_with(|| page_url.to_string());
        }

        let description = PageDescription::from_mapping(&mapping, images);
        match &description {
            Some(page) => debug!(
                url = %self.url,
                kind = %page.kind(),
                site = ?page.site_name(),
                images = page.image_urls().len(),
                "scanned OpenGraph data"
            ),
            None => debug!(url = %self.url, "no usable OpenGraph data"),
        }

        (self.completion)(description);
    }
}

// Convenience wrapper when a callback isn't needed
pub fn scan(markup: &str, url: &str) -> Option<PageDescription> {
    let mut result = None;
    OpenGraphScanner::new(markup, url, |description| result = description).parse();
    result
}
