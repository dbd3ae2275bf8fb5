//! Content shown in the result overlay.
//!
//! Two sources implement `ContentSource`:
//! - `StaticContent`: the built-in fallback set
//! - `CmsContent`: a headless CMS queried over HTTP (feature: cms-live)
//!
//! Fetching never fails from the caller's point of view. Any CMS error is
//! logged and replaced by the fallback set.

#[cfg(feature = "cms-live")]
pub mod cms;
mod fallback;

use serde::{Deserialize, Serialize};

use crate::config::CmsSettings;

#[cfg(feature = "cms-live")]
pub use cms::CmsContent;
pub use fallback::{fallback_content, StaticContent};

/// One linkable piece of content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub url: String,
}

impl ContentItem {
    pub fn new(id: &str, title: &str, excerpt: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            url: url.to_string(),
        }
    }
}

/// Everything the overlay's content panel shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
    /// "Latest insights" (newsletters).
    pub primary_items: Vec<ContentItem>,
    /// "Premium ebooks".
    pub secondary_items: Vec<ContentItem>,
}

/// Supplies the overlay's content. Implementations never fail.
pub trait ContentSource {
    /// Source identifier.
    fn name(&self) -> &'static str;

    fn fetch_content(&self) -> ContentBundle;
}

/// Pick the live CMS when it is configured, the static set otherwise.
pub fn content_source(settings: &CmsSettings) -> Box<dyn ContentSource> {
    if !settings.is_configured() {
        log::info!("cms not configured; serving built-in content");
        return Box::new(StaticContent);
    }
    live_source(settings)
}

#[cfg(feature = "cms-live")]
fn live_source(settings: &CmsSettings) -> Box<dyn ContentSource> {
    match CmsContent::new(settings.clone()) {
        Ok(source) => Box::new(source),
        Err(e) => {
            log::warn!("cms client setup failed: {:#}; serving built-in content", e);
            Box::new(StaticContent)
        }
    }
}

#[cfg(not(feature = "cms-live"))]
fn live_source(_settings: &CmsSettings) -> Box<dyn ContentSource> {
    log::warn!("cms configured but the cms-live feature is disabled; serving built-in content");
    Box::new(StaticContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_project_selects_static_content() {
        let settings = CmsSettings {
            project_id: Some("mock_id".to_string()),
            ..CmsSettings::default()
        };
        let source = content_source(&settings);
        assert_eq!(source.name(), "static");
        assert_eq!(source.fetch_content(), fallback_content());
    }

    #[test]
    fn missing_project_selects_static_content() {
        let source = content_source(&CmsSettings::default());
        assert_eq!(source.name(), "static");
    }

    #[cfg(feature = "cms-live")]
    #[test]
    fn real_project_selects_cms() {
        let settings = CmsSettings {
            project_id: Some("abc123".to_string()),
            ..CmsSettings::default()
        };
        assert_eq!(content_source(&settings).name(), "cms");
    }

    #[cfg(feature = "cms-live")]
    #[test]
    fn invalid_project_id_falls_back_to_static() {
        let settings = CmsSettings {
            project_id: Some("not a host/name".to_string()),
            ..CmsSettings::default()
        };
        assert_eq!(content_source(&settings).name(), "static");
    }
}
