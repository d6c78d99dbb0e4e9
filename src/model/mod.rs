// src/model/mod.rs
// =============================================================================
// The data model: what a page says about itself, and the preview we build
// from it.
//
// Submodules:
// - page: PageDescription, built and validated from scanned properties
// - preview: LinkPreview variants and the rule table that picks one
// =============================================================================

mod page;
mod preview;

pub use page::{FoursquareCoordinates, PageDescription, SiteName, DEFAULT_TYPE};
pub use preview::{
    Article, LinkPreview, LocationPreview, MediaPicturePreview, PreviewRule, Resolver, SocialStatus,
    TYPE_ARTICLE, TYPE_FOURSQUARE_VENUE, TYPE_INSTAGRAM_PHOTO,
};
