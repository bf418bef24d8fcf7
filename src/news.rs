//! News adapter for TheNewsAPI.
//!
//! Fetches the top technology headlines and folds them into a single
//! display payload, one field per article. Like the weather adapter, every
//! failure mode is converted to a user-facing message at this boundary.

use anyhow::Result;
use chrono::DateTime;
use log::{debug, error};
use serde::Deserialize;

use crate::interaction::{DisplayPayload, PayloadField, Reply};

const TOP_STORIES_URL: &str = "https://api.thenewsapi.com/v1/news/top";
const CATEGORY: &str = "tech";
const LOCALE: &str = "us";
const ARTICLE_COUNT: usize = 3;

/// Embed accent for news payloads.
const NEWS_COLOR: u32 = 0x0099FF;

/// Discord caps embed field values at 1024 characters.
const MAX_DESCRIPTION_LEN: usize = 1024;

#[derive(Debug, Deserialize)]
struct NewsResponse {
    meta: Meta,
    data: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    returned: u64,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
    description: Option<String>,
    url: String,
    source: String,
    published_at: Option<String>,
}

#[derive(Clone)]
pub struct NewsClient {
    client: reqwest::Client,
    api_key: String,
}

impl NewsClient {
    pub fn new(api_key: String) -> Self {
        NewsClient {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Fetches the latest top technology headlines.
    pub async fn fetch_top(&self) -> Reply {
        match self.request().await {
            Ok(reply) => reply,
            Err(e) => {
                error!("News lookup failed: {:#}", e);
                Reply::text(
                    "An error occurred while fetching the technology news. Please try again later.",
                )
            }
        }
    }

    async fn request(&self) -> Result<Reply> {
        debug!("Requesting top {} {} headlines", ARTICLE_COUNT, CATEGORY);
        let limit = ARTICLE_COUNT.to_string();
        let response = self
            .client
            .get(TOP_STORIES_URL)
            .query(&[
                ("api_token", self.api_key.as_str()),
                ("categories", CATEGORY),
                ("locale", LOCALE),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Ok(Reply::Text(error_message(status.as_u16(), &body)));
        }

        let news: NewsResponse = serde_json::from_str(&body)?;
        Ok(render(&news))
    }
}

/// Builds the user-facing message for a non-success provider response,
/// preferring the provider-supplied error text when present.
fn error_message(status: u16, body: &str) -> String {
    let provider_text = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|text| text.as_str())
                .map(str::to_string)
        });
    let reason = provider_text.unwrap_or_else(|| format!("Error: {} - Unknown error", status));
    format!("Failed to get the latest news: {}", reason)
}

/// Maps a successful provider response into the normalized display payload.
fn render(news: &NewsResponse) -> Reply {
    if news.meta.returned == 0 {
        return Reply::text("No technology news found at the moment. Please try again later.");
    }

    let fields = news
        .data
        .iter()
        .enumerate()
        .map(|(index, article)| {
            let description = truncate_description(
                article
                    .description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .unwrap_or("No description available."),
            );
            let mut value = format!(
                "[{}]({})\n**Source:** {}",
                description, article.url, article.source
            );
            if let Some(published) = format_published(article.published_at.as_deref()) {
                value.push_str(&format!("\n**Published:** {}", published));
            }
            PayloadField::block(format!("{}. {}", index + 1, article.title), value)
        })
        .collect();

    Reply::Embed(DisplayPayload {
        title: format!("📰 Top {} Technology News Headlines 📰", ARTICLE_COUNT),
        description: None,
        thumbnail: None,
        color: NEWS_COLOR,
        fields,
        footer: Some("Powered by TheNewsAPI.com".to_string()),
        timestamped: true,
    })
}

/// Trims a description to fit in an embed field, appending an ellipsis.
fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_LEN {
        return description.to_string();
    }
    let truncated: String = description.chars().take(MAX_DESCRIPTION_LEN - 3).collect();
    format!("{}...", truncated)
}

fn format_published(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|published| published.format("%Y-%m-%d %H:%M UTC").to_string())
}
