// src/scanner/property.rs
// =============================================================================
// The closed set of OpenGraph properties we understand.
//
// Pages carry dozens of meta tags (twitter:card, fb:app_id, article:author,
// ...). We only care about a handful of them, so instead of keeping an open
// map of String -> String we map every recognized markup name onto one
// variant of PropertyType. Anything else is ignored by the scanner.
//
// Rust concepts:
// - Enums as closed key sets: a `match` over PropertyType must be exhaustive
// - HashMap with an enum key: the type system rejects unknown keys
// =============================================================================

use std::collections::HashMap;

// Key-unique mapping from a recognized property to its raw string value
//
// The scanner fills this in document order with a first-wins policy,
// except for PropertyType::Image which is collected into a separate list.
pub type PropertyMapping = HashMap<PropertyType, String>;

/// A recognized OpenGraph (or vendor-specific) property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Title,
    Type,
    Url,
    Image,
    SiteName,
    Description,
    UserGeneratedImage,
    /// Foursquare venue latitude
    LatitudeFsq,
    /// Foursquare venue longitude
    LongitudeFsq,
}

impl PropertyType {
    /// All variants, in declaration order
    pub const ALL: [PropertyType; 9] = [
        PropertyType::Title,
        PropertyType::Type,
        PropertyType::Url,
        PropertyType::Image,
        PropertyType::SiteName,
        PropertyType::Description,
        PropertyType::UserGeneratedImage,
        PropertyType::LatitudeFsq,
        PropertyType::LongitudeFsq,
    ];

    /// The name this property uses in a `<meta property="...">` tag
    pub fn markup_name(self) -> &'static str {
        match self {
            PropertyType::Title => "og:title",
            PropertyType::Type => "og:type",
            PropertyType::Url => "og:url",
            PropertyType::Image => "og:image",
            PropertyType::SiteName => "og:site_name",
            PropertyType::Description => "og:description",
            PropertyType::UserGeneratedImage => "og:image:user_generated",
            PropertyType::LatitudeFsq => "playfoursquare:location:latitude",
            PropertyType::LongitudeFsq => "playfoursquare:location:longitude",
        }
    }

    // Looks up a property by its markup name, ignoring ASCII case
    //
    // Returns None for names we don't recognize (they are skipped)
    pub fn from_markup_name(name: &str) -> Option<PropertyType> {
        let name = name.trim();
        PropertyType::ALL
            .into_iter()
            .find(|property| property.markup_name().eq_ignore_ascii_case(name))
    }
}
