//! Headless CMS client.
//!
//! Queries a Sanity-style HTTP query endpoint:
//!
//! `GET https://<project>.<api|apicdn>.sanity.io/v<api_version>/data/query/<dataset>?query=<groq>`
//!
//! and expects `{"result": {"newsletters": [...], "ebooks": [...]}}` back.
//! Newest items first; the query caps how many of each kind come back.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use url::Url;

use super::{fallback_content, ContentBundle, ContentItem, ContentSource};
use crate::config::CmsSettings;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: Option<RawBundle>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBundle {
    newsletters: Option<Vec<RawItem>>,
    ebooks: Option<Vec<RawItem>>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "_id")]
    id: Option<String>,
    title: Option<String>,
    excerpt: Option<String>,
    url: Option<String>,
}

impl RawItem {
    /// Items without an id or title cannot be rendered and are dropped.
    fn into_item(self) -> Option<ContentItem> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let title = self.title.filter(|title| !title.is_empty())?;
        Some(ContentItem {
            id,
            title,
            excerpt: self.excerpt.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
        })
    }
}

/// Live CMS content source.
pub struct CmsContent {
    settings: CmsSettings,
    endpoint: Url,
    agent: ureq::Agent,
}

impl CmsContent {
    pub fn new(settings: CmsSettings) -> Result<Self> {
        let project_id = settings
            .project_id
            .as_deref()
            .ok_or_else(|| anyhow!("cms project id is not set"))?;
        if project_id.is_empty()
            || !project_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(anyhow!("invalid cms project id '{}'", project_id));
        }
        let host = if settings.use_cdn { "apicdn" } else { "api" };
        let endpoint = format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            project_id, host, settings.api_version, settings.dataset
        );
        Self::with_endpoint(settings, &endpoint)
    }

    /// Use an explicit query endpoint instead of the hosted one.
    pub fn with_endpoint(settings: CmsSettings, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).context("parse cms endpoint")?;
        match endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(anyhow!(
                    "unsupported cms scheme '{}'; expected http(s)",
                    other
                ))
            }
        }
        let agent = ureq::AgentBuilder::new().timeout(settings.timeout).build();
        Ok(Self {
            settings,
            endpoint,
            agent,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// GROQ query for both content kinds.
    pub fn query(&self) -> String {
        format!(
            concat!(
                "{{",
                "\"newsletters\": *[_type == \"newsletter\"] | order(_createdAt desc)[0...{}] ",
                "{{ _id, title, excerpt, \"url\": url.current }}, ",
                "\"ebooks\": *[_type == \"ebook\"] | order(_createdAt desc)[0...{}] ",
                "{{ _id, title, excerpt, \"url\": file.asset->url }}",
                "}}"
            ),
            self.settings.primary_limit, self.settings.secondary_limit
        )
    }

    /// Fetch without the fallback. Errors on transport, status or payload problems.
    pub fn try_fetch(&self) -> Result<ContentBundle> {
        let mut request = self
            .agent
            .get(self.endpoint.as_str())
            .query("query", &self.query());
        if let Some(token) = self.settings.token.as_deref() {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }
        let response = request
            .call()
            .with_context(|| format!("query cms at {}", self.endpoint))?;
        let body = response.into_string().context("read cms response")?;
        parse_response(
            &body,
            self.settings.primary_limit,
            self.settings.secondary_limit,
        )
    }
}

impl ContentSource for CmsContent {
    fn name(&self) -> &'static str {
        "cms"
    }

    fn fetch_content(&self) -> ContentBundle {
        match self.try_fetch() {
            Ok(bundle) => {
                log::info!(
                    "cms returned {} primary and {} secondary item(s)",
                    bundle.primary_items.len(),
                    bundle.secondary_items.len()
                );
                bundle
            }
            Err(e) => {
                log::warn!("cms fetch error: {:#}; serving built-in content", e);
                fallback_content()
            }
        }
    }
}

fn parse_response(body: &str, primary_limit: usize, secondary_limit: usize) -> Result<ContentBundle> {
    let response: QueryResponse =
        serde_json::from_str(body).context("invalid cms response")?;
    let raw = response
        .result
        .ok_or_else(|| anyhow!("cms response has no result"))?;
    Ok(ContentBundle {
        primary_items: collect_items(raw.newsletters, primary_limit),
        secondary_items: collect_items(raw.ebooks, secondary_limit),
    })
}

fn collect_items(raw: Option<Vec<RawItem>>, limit: usize) -> Vec<ContentItem> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(RawItem::into_item)
        .take(limit)
        .collect()
}
