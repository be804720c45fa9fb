use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::Article;

pub const NO_ARTICLES: &str = "No articles available.";
pub const UNKNOWN_DATE: &str = "unknown";

const NO_TITLE: &str = "No title";
const UNKNOWN_AUTHOR: &str = "Unknown";
const NO_TAGS: &str = "None";
const NO_URL: &str = "No URL";

pub struct DigestFormatter;

impl DigestFormatter {
    /// Render articles as plain-text blocks, numbered from 1 in input order.
    pub fn format_body(articles: &[Article]) -> String {
        if articles.is_empty() {
            return NO_ARTICLES.to_string();
        }

        let mut text = String::new();

        for (index, article) in articles.iter().enumerate() {
            let tag_names = article.tag_names();
            let tags = if tag_names.is_empty() {
                NO_TAGS.to_string()
            } else {
                tag_names.join(", ")
            };

            text.push_str(&format!(
                "■ {}. {}\n\n",
                index + 1,
                article.title.as_deref().unwrap_or(NO_TITLE)
            ));
            text.push_str(&format!(
                "Author: {}\n",
                article.author_name().unwrap_or(UNKNOWN_AUTHOR)
            ));
            text.push_str(&format!(
                "Published: {}\n",
                Self::format_datetime(article.created_at.as_deref())
            ));
            text.push_str(&format!("Tags: {}\n", tags));
            text.push_str(&format!(
                "URL: {}\n\n",
                article.url.as_deref().unwrap_or(NO_URL)
            ));

            text.push_str("Stats:\n");
            text.push_str(&format!("  👍 Likes: {}\n", article.likes_count.unwrap_or(0)));
            text.push_str(&format!(
                "  💬 Comments: {}\n",
                article.comments_count.unwrap_or(0)
            ));
            text.push_str(&format!("  ⭐ Stocks: {}\n", article.stocks_count.unwrap_or(0)));
            text.push_str(&format!(
                "  👀 Page views: {}\n",
                article.page_views_count.unwrap_or(0)
            ));
            text.push_str(&format!(
                "  😊 Reactions: {}\n\n",
                article.reactions_count.unwrap_or(0)
            ));
        }

        text
    }

    pub fn format_subject(articles: &[Article], query: Option<&str>) -> String {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => format!("{} articles for query {}", articles.len(), q),
            None => format!("{} articles", articles.len()),
        }
    }

    /// Render an ISO-8601 timestamp as `YYYY-MM-DD HH:MM` in its own offset.
    ///
    /// Missing input yields `"unknown"`; input that does not parse is
    /// returned as-is.
    pub fn format_datetime(date_str: Option<&str>) -> String {
        let raw = match date_str {
            Some(s) if !s.is_empty() => s,
            _ => return UNKNOWN_DATE.to_string(),
        };

        let normalized = match raw.trim().strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => raw.trim().to_string(),
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        // Offset without seconds, e.g. "2024-05-01T09:30+09:00"
        if let Ok(dt) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z") {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        for fmt in &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M",
        ] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
                return ndt.format("%Y-%m-%d %H:%M").to_string();
            }
        }
        if let Ok(nd) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
            return format!("{} 00:00", nd.format("%Y-%m-%d"));
        }

        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Tag, User};

    fn full_article() -> Article {
        Article {
            title: Some("Running LLMs locally".to_string()),
            user: Some(User {
                name: Some("Hanako".to_string()),
            }),
            created_at: Some("2024-05-01T09:30:00+09:00".to_string()),
            tags: vec![
                Tag {
                    name: Some("LLM".to_string()),
                },
                Tag {
                    name: Some("Rust".to_string()),
                },
            ],
            url: Some("https://qiita.com/hanako/items/abc".to_string()),
            likes_count: Some(12),
            comments_count: Some(3),
            stocks_count: Some(7),
            page_views_count: Some(450),
            reactions_count: Some(5),
        }
    }

    #[test]
    fn test_empty_body_is_sentinel() {
        assert_eq!(DigestFormatter::format_body(&[]), "No articles available.");
    }

    #[test]
    fn test_full_block() {
        let body = DigestFormatter::format_body(&[full_article()]);
        let expected = "■ 1. Running LLMs locally\n\n\
            Author: Hanako\n\
            Published: 2024-05-01 09:30\n\
            Tags: LLM, Rust\n\
            URL: https://qiita.com/hanako/items/abc\n\n\
            Stats:\n  \
            👍 Likes: 12\n  \
            💬 Comments: 3\n  \
            ⭐ Stocks: 7\n  \
            👀 Page views: 450\n  \
            😊 Reactions: 5\n\n";
        assert_eq!(body, expected);
    }

    #[test]
    fn test_blocks_keep_input_order() {
        let mut second = full_article();
        second.title = Some("Second".to_string());
        let mut third = full_article();
        third.title = Some("Third".to_string());

        let body = DigestFormatter::format_body(&[full_article(), second, third]);

        let first_pos = body.find("■ 1. Running LLMs locally").unwrap();
        let second_pos = body.find("■ 2. Second").unwrap();
        let third_pos = body.find("■ 3. Third").unwrap();
        assert!(first_pos < second_pos && second_pos < third_pos);
        assert_eq!(body.matches("■ ").count(), 3);
    }

    #[test]
    fn test_all_fields_missing_use_placeholders() {
        let body = DigestFormatter::format_body(&[Article::default()]);
        assert!(body.contains("■ 1. No title"));
        assert!(body.contains("Author: Unknown"));
        assert!(body.contains("Published: unknown"));
        assert!(body.contains("Tags: None"));
        assert!(body.contains("URL: No URL"));
        assert!(body.contains("👍 Likes: 0"));
        assert!(body.contains("💬 Comments: 0"));
        assert!(body.contains("⭐ Stocks: 0"));
        assert!(body.contains("👀 Page views: 0"));
        assert!(body.contains("😊 Reactions: 0"));
    }

    #[test]
    fn test_missing_fields_do_not_affect_others() {
        let mut article = full_article();
        article.tags.clear();
        article.page_views_count = None;
        article.user = Some(User { name: None });

        let body = DigestFormatter::format_body(&[article]);
        assert!(body.contains("Tags: None"));
        assert!(body.contains("👀 Page views: 0"));
        assert!(body.contains("Author: Unknown"));
        assert!(body.contains("■ 1. Running LLMs locally"));
        assert!(body.contains("Published: 2024-05-01 09:30"));
        assert!(body.contains("URL: https://qiita.com/hanako/items/abc"));
        assert!(body.contains("👍 Likes: 12"));
        assert!(body.contains("😊 Reactions: 5"));
    }

    #[test]
    fn test_unnamed_tags_use_placeholder() {
        let mut article = full_article();
        article.tags = vec![Tag { name: None }, Tag { name: Some(String::new()) }];

        let body = DigestFormatter::format_body(&[article]);
        assert!(body.contains("Tags: None"));
        assert!(body.contains("Author: Hanako"));
    }

    #[test]
    fn test_subject_without_query() {
        let articles = vec![full_article(); 3];
        assert_eq!(DigestFormatter::format_subject(&articles, None), "3 articles");
    }

    #[test]
    fn test_subject_with_query() {
        let articles = vec![full_article(); 2];
        assert_eq!(
            DigestFormatter::format_subject(&articles, Some("LLM")),
            "2 articles for query LLM"
        );
    }

    #[test]
    fn test_subject_empty_list() {
        assert_eq!(DigestFormatter::format_subject(&[], None), "0 articles");
        assert_eq!(
            DigestFormatter::format_subject(&[], Some("Rust")),
            "0 articles for query Rust"
        );
    }

    #[test]
    fn test_datetime_z_matches_utc_offset() {
        let zulu = DigestFormatter::format_datetime(Some("2024-01-15T08:05:00Z"));
        let offset = DigestFormatter::format_datetime(Some("2024-01-15T08:05:00+00:00"));
        assert_eq!(zulu, "2024-01-15 08:05");
        assert_eq!(zulu, offset);
    }

    #[test]
    fn test_datetime_keeps_own_offset() {
        assert_eq!(
            DigestFormatter::format_datetime(Some("2024-12-31T23:59:59+09:00")),
            "2024-12-31 23:59"
        );
    }

    #[test]
    fn test_datetime_naive_and_date_only() {
        assert_eq!(
            DigestFormatter::format_datetime(Some("2024-03-02T07:04:09.123")),
            "2024-03-02 07:04"
        );
        assert_eq!(
            DigestFormatter::format_datetime(Some("2024-03-02 07:04:09")),
            "2024-03-02 07:04"
        );
        assert_eq!(DigestFormatter::format_datetime(Some("2024-03-02")), "2024-03-02 00:00");
    }

    #[test]
    fn test_datetime_missing_is_unknown() {
        assert_eq!(DigestFormatter::format_datetime(None), "unknown");
        assert_eq!(DigestFormatter::format_datetime(Some("")), "unknown");
    }

    #[test]
    fn test_datetime_malformed_passes_through() {
        assert_eq!(DigestFormatter::format_datetime(Some("not-a-date")), "not-a-date");
        assert_eq!(
            DigestFormatter::format_datetime(Some("2024-13-45T99:00:00Z")),
            "2024-13-45T99:00:00Z"
        );
    }
}
