// src/model/preview.rs
// =============================================================================
// Typed link previews and the resolver that picks one for a page.
//
// Every preview remembers:
// - the URL text exactly as it appeared in the message (original_url)
// - the canonical URL the page told us about (permanent_url)
// - the character offset of the link inside the message
//
// Resolution walks an ordered table of rules. The first rule whose
// predicate matches builds the preview; if none match we fall back to a
// plain Article, so resolving a valid PageDescription always succeeds.
//
// The default table only knows about Twitter statuses. The Foursquare and
// Instagram variants can be built on their own, or switched on through
// Resolver::with_site_specific().
// =============================================================================

use serde::Serialize;

use super::page::{PageDescription, SiteName};

/// `og:type` of a tweet page
pub const TYPE_ARTICLE: &str = "article";
/// `og:type` of a Foursquare venue page
pub const TYPE_FOURSQUARE_VENUE: &str = "playfoursquare:venue";
/// `og:type` of an Instagram photo page
pub const TYPE_INSTAGRAM_PHOTO: &str = "instapp:photo";

const TWITTER_TITLE_SUFFIX: &str = " on Twitter";

/// A generic web page: title, summary and at most one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub original_url: String,
    pub permanent_url: String,
    pub offset: usize,
    pub image_urls: Vec<String>,
}

/// A post on a social network (currently: a tweet)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialStatus {
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub original_url: String,
    pub permanent_url: String,
    pub offset: usize,
    pub image_urls: Vec<String>,
}

/// A Foursquare venue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationPreview {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f32>,
    pub original_url: String,
    pub permanent_url: String,
    pub offset: usize,
    pub image_urls: Vec<String>,
}

/// An Instagram picture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaPicturePreview {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub original_url: String,
    pub permanent_url: String,
    pub offset: usize,
    pub image_urls: Vec<String>,
}

/// The preview attached to a link in a message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkPreview {
    Article(Article),
    SocialStatus(SocialStatus),
    Location(LocationPreview),
    MediaPicture(MediaPicturePreview),
}

impl LinkPreview {
    pub fn original_url(&self) -> &str {
        match self {
            LinkPreview::Article(p) => &p.original_url,
            LinkPreview::SocialStatus(p) => &p.original_url,
            LinkPreview::Location(p) => &p.original_url,
            LinkPreview::MediaPicture(p) => &p.original_url,
        }
    }

    pub fn permanent_url(&self) -> &str {
        match self {
            LinkPreview::Article(p) => &p.permanent_url,
            LinkPreview::SocialStatus(p) => &p.permanent_url,
            LinkPreview::Location(p) => &p.permanent_url,
            LinkPreview::MediaPicture(p) => &p.permanent_url,
        }
    }

    /// Where the link starts in the message text, in characters
    pub fn character_offset(&self) -> usize {
        match self {
            LinkPreview::Article(p) => p.offset,
            LinkPreview::SocialStatus(p) => p.offset,
            LinkPreview::Location(p) => p.offset,
            LinkPreview::MediaPicture(p) => p.offset,
        }
    }

    pub fn image_urls(&self) -> &[String] {
        match self {
            LinkPreview::Article(p) => &p.image_urls,
            LinkPreview::SocialStatus(p) => &p.image_urls,
            LinkPreview::Location(p) => &p.image_urls,
            LinkPreview::MediaPicture(p) => &p.image_urls,
        }
    }

    /// A short label for tables and logs
    pub fn kind(&self) -> &'static str {
        match self {
            LinkPreview::Article(_) => "article",
            LinkPreview::SocialStatus(_) => "social_status",
            LinkPreview::Location(_) => "location",
            LinkPreview::MediaPicture(_) => "media_picture",
        }
    }
}

fn first_image(page: &PageDescription) -> Vec<String> {
    page.image_urls().iter().take(1).cloned().collect()
}

impl Article {
    // Always succeeds: any valid page can be shown as an article
    pub fn from_page(page: &PageDescription, original_url: &str, offset: usize) -> Article {
        Article {
            title: page.title().to_string(),
            summary: page.description().map(str::to_string),
            original_url: original_url.to_string(),
            permanent_url: page.url().to_string(),
            offset,
            image_urls: first_image(page),
        }
    }
}

impl SocialStatus {
    pub fn matches(page: &PageDescription) -> bool {
        page.kind() == TYPE_ARTICLE && page.site_name() == SiteName::Twitter
    }

    // Builds a tweet preview
    //
    // The author is the page title minus a trailing " on Twitter".
    // Images are only kept when the page marks them as user generated,
    // otherwise they are just avatars and site chrome.
    pub fn from_page(page: &PageDescription, original_url: &str, offset: usize) -> Option<SocialStatus> {
        if !SocialStatus::matches(page) {
            return None;
        }

        let title = page.title();
        let author = title.strip_suffix(TWITTER_TITLE_SUFFIX).unwrap_or(title);
        let image_urls = if page.is_user_generated_image() {
            page.image_urls().to_vec()
        } else {
            Vec::new()
        };

        Some(SocialStatus {
            author: author.to_string(),
            message: page.description().map(str::to_string),
            original_url: original_url.to_string(),
            permanent_url: page.url().to_string(),
            offset,
            image_urls,
        })
    }
}

impl LocationPreview {
    pub fn matches(page: &PageDescription) -> bool {
        page.kind() == TYPE_FOURSQUARE_VENUE && page.site_name() == SiteName::Foursquare
    }

    pub fn from_page(page: &PageDescription, original_url: &str, offset: usize) -> Option<LocationPreview> {
        if !LocationPreview::matches(page) {
            return None;
        }

        let coordinates = page.foursquare_coordinates();
        Some(LocationPreview {
            title: page.title().to_string(),
            subtitle: page.description().map(str::to_string),
            latitude: coordinates.map(|c| c.latitude),
            longitude: coordinates.map(|c| c.longitude),
            original_url: original_url.to_string(),
            permanent_url: page.url().to_string(),
            offset,
            image_urls: first_image(page),
        })
    }
}

impl MediaPicturePreview {
    pub fn matches(page: &PageDescription) -> bool {
        page.kind() == TYPE_INSTAGRAM_PHOTO && page.site_name() == SiteName::Instagram
    }

    pub fn from_page(page: &PageDescription, original_url: &str, offset: usize) -> Option<MediaPicturePreview> {
        if !MediaPicturePreview::matches(page) {
            return None;
        }

        Some(MediaPicturePreview {
            title: page.title().to_string(),
            subtitle: page.description().map(str::to_string),
            original_url: original_url.to_string(),
            permanent_url: page.url().to_string(),
            offset,
            image_urls: first_image(page),
        })
    }
}

/// One row of the resolution table: a predicate and the builder it guards
#[derive(Clone, Copy)]
pub struct PreviewRule {
    pub name: &'static str,
    pub matches: fn(&PageDescription) -> bool,
    pub build: fn(&PageDescription, &str, usize) -> Option<LinkPreview>,
}

impl PreviewRule {
    pub const SOCIAL_STATUS: PreviewRule = PreviewRule {
        name: "social_status",
        matches: SocialStatus::matches,
        build: build_social_status,
    };

    pub const LOCATION: PreviewRule = PreviewRule {
        name: "location",
        matches: LocationPreview::matches,
        build: build_location,
    };

    pub const MEDIA_PICTURE: PreviewRule = PreviewRule {
        name: "media_picture",
        matches: MediaPicturePreview::matches,
        build: build_media_picture,
    };
}

fn build_social_status(page: &PageDescription, url: &str, offset: usize) -> Option<LinkPreview> {
    SocialStatus::from_page(page, url, offset).map(LinkPreview::SocialStatus)
}

fn build_location(page: &PageDescription, url: &str, offset: usize) -> Option<LinkPreview> {
    LocationPreview::from_page(page, url, offset).map(LinkPreview::Location)
}

fn build_media_picture(page: &PageDescription, url: &str, offset: usize) -> Option<LinkPreview> {
    MediaPicturePreview::from_page(page, url, offset).map(LinkPreview::MediaPicture)
}

/// Picks the preview variant for a page, first matching rule wins
#[derive(Clone)]
pub struct Resolver {
    rules: Vec<PreviewRule>,
}

impl Default for Resolver {
    // Twitter status, then the Article fallback
    fn default() -> Self {
        Resolver::new(vec![PreviewRule::SOCIAL_STATUS])
    }
}

impl Resolver {
    /// Creates a resolver from rules in priority order.
    /// The Article fallback is always implied after the last rule.
    pub fn new(rules: Vec<PreviewRule>) -> Self {
        Resolver { rules }
    }

    /// Default rules plus the Foursquare and Instagram variants
    pub fn with_site_specific() -> Self {
        Resolver::new(vec![
            PreviewRule::SOCIAL_STATUS,
            PreviewRule::LOCATION,
            PreviewRule::MEDIA_PICTURE,
        ])
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    pub fn resolve(&self, page: &PageDescription, original_url: &str, offset: usize) -> LinkPreview {
        self.rules
            .iter()
            .filter(|rule| (rule.matches)(page))
            .find_map(|rule| (rule.build)(page, original_url, offset))
            .unwrap_or_else(|| LinkPreview::Article(Article::from_page(page, original_url, offset)))
    }
}

impl PageDescription {
    /// Resolves this page with the default rules
    pub fn link_preview(&self, original_url: &str, offset: usize) -> LinkPreview {
        Resolver::default().resolve(self, original_url, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{PropertyMapping, PropertyType};

    fn page(pairs: &[(PropertyType, &str)], images: &[&str]) -> PageDescription {
        let mut mapping: PropertyMapping = pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        mapping.entry(PropertyType::Title).or_insert_with(|| "title".into());
        mapping.entry(PropertyType::Url).or_insert_with(|| "https://example.com/permanent".into());
        PageDescription::from_mapping(&mapping, images.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn tweet(user_generated: bool) -> PageDescription {
        page(
            &[
                (PropertyType::Type, "article"),
                (PropertyType::SiteName, "Twitter"),
                (PropertyType::Title, "Example on Twitter"),
                (PropertyType::Description, "hello world"),
                (PropertyType::UserGeneratedImage, if user_generated { "true" } else { "false" }),
            ],
            &["https://pbs.twimg.com/1.jpg", "https://pbs.twimg.com/2.jpg"],
        )
    }

    #[test]
    fn test_twitter_resolves_to_social_status() {
        let preview = tweet(true).link_preview("twitter.com/x", 3);
        let LinkPreview::SocialStatus(status) = preview else {
            panic!("expected a social status");
        };
        assert_eq!(status.author, "Example");
        assert_eq!(status.message.as_deref(), Some("hello world"));
        assert_eq!(status.image_urls.len(), 2);
    }

    #[test]
    fn test_twitter_drops_images_unless_user_generated() {
        let preview = tweet(false).link_preview("twitter.com/x", 3);
        assert_eq!(preview.kind(), "social_status");
        assert!(preview.image_urls().is_empty());
    }

    #[test]
    fn test_author_suffix_is_only_removed_at_the_end() {
        let p = page(
            &[
                (PropertyType::Type, "article"),
                (PropertyType::SiteName, "twitter"),
                (PropertyType::Title, "Life on Twitter is fun"),
            ],
            &[],
        );
        let status = SocialStatus::from_page(&p, "u", 0).unwrap();
        assert_eq!(status.author, "Life on Twitter is fun");

        let p = page(
            &[
                (PropertyType::Type, "article"),
                (PropertyType::SiteName, "twitter"),
                (PropertyType::Title, "Someone ON TWITTER"),
            ],
            &[],
        );
        assert_eq!(SocialStatus::from_page(&p, "u", 0).unwrap().author, "Someone ON TWITTER");
    }

    #[test]
    fn test_twitter_profile_is_an_article() {
        let p = page(&[(PropertyType::Type, "profile"), (PropertyType::SiteName, "Twitter")], &[]);
        assert_eq!(p.link_preview("u", 0).kind(), "article");
    }

    #[test]
    fn test_article_keeps_only_the_first_image() {
        let p = page(
            &[(PropertyType::Type, "article"), (PropertyType::Description, "summary")],
            &["https://example.com/a.png", "https://example.com/b.png"],
        );
        let LinkPreview::Article(article) = p.link_preview("example.com", 7) else {
            panic!("expected an article");
        };
        assert_eq!(article.image_urls, vec!["https://example.com/a.png"]);
        assert_eq!(article.summary.as_deref(), Some("summary"));
    }

    #[test]
    fn test_uses_original_url_and_offset() {
        let p = page(&[], &[]);
        let preview = p.link_preview("www.example.com", 42);
        assert_eq!(preview.character_offset(), 42);
        assert_eq!(preview.original_url(), "www.example.com");
        assert_eq!(preview.permanent_url(), "https://example.com/permanent");
    }

    #[test]
    fn test_site_specific_variants_are_not_in_the_default_chain() {
        let venue = page(
            &[
                (PropertyType::Type, "playfoursquare:venue"),
                (PropertyType::SiteName, "Foursquare"),
                (PropertyType::LatitudeFsq, "40.7"),
                (PropertyType::LongitudeFsq, "-74.0"),
            ],
            &[],
        );
        let photo = page(
            &[(PropertyType::Type, "instapp:photo"), (PropertyType::SiteName, "Instagram")],
            &["https://instagram.com/p.jpg"],
        );

        assert_eq!(venue.link_preview("u", 0).kind(), "article");
        assert_eq!(photo.link_preview("u", 0).kind(), "article");

        let resolver = Resolver::with_site_specific();
        let LinkPreview::Location(location) = resolver.resolve(&venue, "u", 0) else {
            panic!("expected a location");
        };
        assert_eq!(location.latitude, Some(40.7));
        assert_eq!(location.longitude, Some(-74.0));
        assert_eq!(resolver.resolve(&photo, "u", 0).kind(), "media_picture");
    }

    #[test]
    fn test_site_specific_builders_check_their_predicates() {
        let plain = page(&[(PropertyType::SiteName, "Instagram")], &[]);
        assert!(MediaPicturePreview::from_page(&plain, "u", 0).is_none());
        assert!(LocationPreview::from_page(&plain, "u", 0).is_none());
        assert!(SocialStatus::from_page(&plain, "u", 0).is_none());
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(Resolver::default().rule_names(), vec!["social_status"]);
        assert_eq!(
            Resolver::with_site_specific().rule_names(),
            vec!["social_status", "location", "media_picture"]
        );
        // An empty table still resolves through the fallback
        assert_eq!(Resolver::new(vec![]).resolve(&tweet(true), "u", 0).kind(), "article");
    }
}
