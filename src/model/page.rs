// src/model/page.rs
// =============================================================================
// The validated, immutable description of a scanned page.
//
// A PageDescription only exists if the page had both a title and a URL.
// Everything else is optional or has a default:
// - type defaults to "website"
// - the site name is classified into a small enum (unknown -> Other), but
//   the original text is kept as well
// - Foursquare coordinates are attached only if both numbers parse
//
// Rust concepts:
// - Private fields + getters: callers can read but never mutate
// - Option<T>::filter / and_then: chaining fallible steps without `if`s
// - Smart constructors returning Option<Self>
// =============================================================================

use serde::Serialize;

use crate::scanner::{PropertyMapping, PropertyType};

/// The OpenGraph type used when a page doesn't declare one
pub const DEFAULT_TYPE: &str = "website";

/// The platform a page comes from, used to pick a preview variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteName {
    Twitter,
    YouTube,
    Vimeo,
    Instagram,
    Foursquare,
    Other,
}

impl SiteName {
    // The registry of known site identifiers, compared case-insensitively
    const REGISTRY: [(&'static str, SiteName); 5] = [
        ("twitter", SiteName::Twitter),
        ("youtube", SiteName::YouTube),
        ("vimeo", SiteName::Vimeo),
        ("instagram", SiteName::Instagram),
        ("foursquare", SiteName::Foursquare),
    ];

    /// Classifies an `og:site_name` value; anything unknown is `Other`
    pub fn classify(raw: &str) -> SiteName {
        let raw = raw.trim();
        SiteName::REGISTRY
            .iter()
            .find(|(identifier, _)| identifier.eq_ignore_ascii_case(raw))
            .map(|(_, site)| *site)
            .unwrap_or(SiteName::Other)
    }
}

/// Location of a Foursquare venue
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoursquareCoordinates {
    pub latitude: f32,
    pub longitude: f32,
}

impl FoursquareCoordinates {
    // Reads both coordinates from the mapping
    //
    // Returns None if either one is missing or isn't a number. This never
    // affects the rest of the description.
    pub fn from_mapping(mapping: &PropertyMapping) -> Option<FoursquareCoordinates> {
        let parse = |property: PropertyType| {
            mapping
                .get(&property)
                .and_then(|value: &String| value.trim().parse::<f32>().ok())
                .filter(|number| number.is_finite())
        };

        Some(FoursquareCoordinates {
            latitude: parse(PropertyType::LatitudeFsq)?,
            longitude: parse(PropertyType::LongitudeFsq)?,
        })
    }
}

/// Everything we learned about a page from its OpenGraph tags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDescription {
    title: String,
    #[serde(rename = "type")]
    kind: String,
    url: String,
    image_urls: Vec<String>,
    site_name: SiteName,
    #[serde(skip_serializing_if = "Option::is_none")]
    site_name_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    is_user_generated_image: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    foursquare_coordinates: Option<FoursquareCoordinates>,
}

impl PageDescription {
    // Builds a description from scanned properties
    //
    // Parameters:
    //   mapping: recognized properties (og:image is NOT read from here)
    //   images: every og:image URL in document order
    //
    // Returns: None when the title or the URL is missing or empty
    pub fn from_mapping(mapping: &PropertyMapping, images: Vec<String>) -> Option<PageDescription> {
        let required = |property: PropertyType| {
            mapping
                .get(&property)
                .filter(|value: &&String| !value.trim().is_empty())
                .cloned()
        };
        let title = required(PropertyType::Title)?;
        let url = required(PropertyType::Url)?;

        let site_name_raw = mapping.get(&PropertyType::SiteName).cloned();
        let site_name = site_name_raw
            .as_deref()
            .map(SiteName::classify)
            .unwrap_or(SiteName::Other);

        Some(PageDescription {
            title,
            kind: mapping
                .get(&PropertyType::Type)
                .cloned()
                .unwrap_or_else(|| DEFAULT_TYPE.to_string()),
            url,
            image_urls: images,
            site_name,
            site_name_raw,
            description: mapping.get(&PropertyType::Description).cloned(),
            is_user_generated_image: mapping
                .get(&PropertyType::UserGeneratedImage)
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("true")),
            foursquare_coordinates: FoursquareCoordinates::from_mapping(mapping),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The OpenGraph `og:type` (e.g. "article", "video.other")
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The canonical URL of the page
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    pub fn site_name(&self) -> SiteName {
        self.site_name
    }

    /// The `og:site_name` exactly as the page wrote it
    pub fn site_name_raw(&self) -> Option<&str> {
        self.site_name_raw.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_user_generated_image(&self) -> bool {
        self.is_user_generated_image
    }

    pub fn foursquare_coordinates(&self) -> Option<FoursquareCoordinates> {
        self.foursquare_coordinates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(PropertyType, &str)]) -> PropertyMapping {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_builds_from_mapping() {
        let m = mapping(&[
            (PropertyType::Title, "title"),
            (PropertyType::Type, "article"),
            (PropertyType::Description, "about"),
            (PropertyType::Url, "www.example.com/url"),
        ]);
        let page = PageDescription::from_mapping(&m, vec!["www.example.com/image".into()]).unwrap();

        assert_eq!(page.title(), "title");
        assert_eq!(page.kind(), "article");
        assert_eq!(page.description(), Some("about"));
        assert_eq!(page.url(), "www.example.com/url");
        assert_eq!(page.image_urls(), ["www.example.com/image"]);
        assert_eq!(page.site_name_raw(), None);
        assert_eq!(page.site_name(), SiteName::Other);
        assert!(!page.is_user_generated_image());
        assert_eq!(page.foursquare_coordinates(), None);
    }

    #[test]
    fn test_type_defaults_to_website() {
        let m = mapping(&[(PropertyType::Title, "t"), (PropertyType::Url, "u")]);
        let page = PageDescription::from_mapping(&m, vec![]).unwrap();
        assert_eq!(page.kind(), "website");
    }

    #[test]
    fn test_requires_title_and_url() {
        let only_title = mapping(&[(PropertyType::Title, "t"), (PropertyType::Description, "d")]);
        let only_url = mapping(&[(PropertyType::Url, "u")]);
        let empty_title = mapping(&[(PropertyType::Title, "  "), (PropertyType::Url, "u")]);

        assert!(PageDescription::from_mapping(&only_title, vec!["i".into()]).is_none());
        assert!(PageDescription::from_mapping(&only_url, vec![]).is_none());
        assert!(PageDescription::from_mapping(&empty_title, vec![]).is_none());
        assert!(PageDescription::from_mapping(&PropertyMapping::new(), vec![]).is_none());
    }

    #[test]
    fn test_site_name_is_case_insensitive_and_keeps_raw_text() {
        let cases = [
            ("twitter", SiteName::Twitter),
            ("Twitter", SiteName::Twitter),
            ("YOUTUBE", SiteName::YouTube),
            ("YouTube", SiteName::YouTube),
            ("vimeo", SiteName::Vimeo),
            ("Instagram", SiteName::Instagram),
            ("foursquare", SiteName::Foursquare),
            ("The Verge", SiteName::Other),
        ];

        for (raw, expected) in cases {
            let m = mapping(&[
                (PropertyType::Title, "t"),
                (PropertyType::Url, "u"),
                (PropertyType::SiteName, raw),
            ]);
            let page = PageDescription::from_mapping(&m, vec![]).unwrap();
            assert_eq!(page.site_name(), expected, "{raw}");
            assert_eq!(page.site_name_raw(), Some(raw));
        }
    }

    #[test]
    fn test_user_generated_image_flag() {
        let m = mapping(&[
            (PropertyType::Title, "t"),
            (PropertyType::Url, "u"),
            (PropertyType::UserGeneratedImage, "true"),
        ]);
        assert!(PageDescription::from_mapping(&m, vec![]).unwrap().is_user_generated_image());

        let m = mapping(&[
            (PropertyType::Title, "t"),
            (PropertyType::Url, "u"),
            (PropertyType::UserGeneratedImage, "yes"),
        ]);
        assert!(!PageDescription::from_mapping(&m, vec![]).unwrap().is_user_generated_image());
    }

    #[test]
    fn test_foursquare_coordinates() {
        let m = mapping(&[
            (PropertyType::Title, "t"),
            (PropertyType::Url, "u"),
            (PropertyType::LatitudeFsq, "40.7"),
            (PropertyType::LongitudeFsq, "-74.0"),
        ]);
        let page = PageDescription::from_mapping(&m, vec![]).unwrap();
        assert_eq!(
            page.foursquare_coordinates(),
            Some(FoursquareCoordinates { latitude: 40.7, longitude: -74.0 })
        );
    }

    #[test]
    fn test_bad_coordinates_do_not_invalidate_the_page() {
        let m = mapping(&[
            (PropertyType::Title, "t"),
            (PropertyType::Url, "u"),
            (PropertyType::LatitudeFsq, "abc"),
            (PropertyType::LongitudeFsq, "-74.0"),
        ]);
        let page = PageDescription::from_mapping(&m, vec![]).unwrap();
        assert_eq!(page.foursquare_coordinates(), None);
        assert_eq!(page.title(), "t");

        let only_latitude = mapping(&[(PropertyType::LatitudeFsq, "40.7")]);
        assert_eq!(FoursquareCoordinates::from_mapping(&only_latitude), None);
    }
}
