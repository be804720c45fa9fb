use serde::{Deserialize, Deserializer};

use crate::digest::DigestFormatter;

/// Largest page size the Qiita API accepts.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub name: Option<String>,
}

/// One Qiita item. Every field may be missing from the API response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub comments_count: Option<u64>,
    #[serde(default)]
    pub stocks_count: Option<u64>,
    #[serde(default)]
    pub page_views_count: Option<u64>,
    #[serde(default)]
    pub reactions_count: Option<u64>,
}

impl Article {
    pub fn author_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.name.as_deref())
    }

    /// Tag names, skipping tags that have no usable name.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .iter()
            .filter_map(|t| t.name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .collect()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Tag>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Tag>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parameters for one `GET /items` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsQuery {
    pub page: u32,
    pub per_page: u32,
    pub query: Option<String>,
}

impl ItemsQuery {
    pub fn new(page: u32, per_page: u32, query: Option<&str>) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            query: query
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string),
        }
    }

    /// Query string pairs in the order they are sent.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.min(MAX_PER_PAGE).to_string()),
        ];
        if let Some(query) = &self.query {
            params.push(("query", query.clone()));
        }
        params
    }
}

/// Subject and body for one batch of articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

impl Digest {
    pub fn new(articles: &[Article], query: Option<&str>) -> Self {
        Self {
            subject: DigestFormatter::format_subject(articles, query),
            body: DigestFormatter::format_body(articles),
        }
    }
}
