// src/scanner/mod.rs
// =============================================================================
// This module extracts OpenGraph metadata from page markup.
//
// Submodules:
// - property: The closed set of properties we recognize
// - tags: A forgiving, DOM-free lexer for <meta> and <title> tags
// - opengraph: The scanner that builds a PageDescription from the tokens
// =============================================================================

mod opengraph;
mod property;
mod tags;

pub use opengraph::{collect_properties, scan, OpenGraphScanner};
pub use property::{PropertyMapping, PropertyType};
