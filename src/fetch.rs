//! Channel fetch loop
//!
//! Retrieval sits behind a capability trait so the loop can be driven by
//! the live Telegram client or by an in-memory source in tests.

use chrono::{DateTime, Utc};
use grammers_client::Client;

use crate::error::{Error, Result};
use crate::reactions::reaction_summary;

/// Default number of most-recent messages requested per channel.
pub const DEFAULT_FETCH_LIMIT: usize = 100;

/// One raw message record as supplied by the platform.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub text: String,
    pub date: DateTime<Utc>,
    pub reactions: Option<String>,
}

/// One retained post: non-empty text plus its publication timestamp and,
/// when the platform sent one, a reaction summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub text: String,
    pub publication_time: DateTime<Utc>,
    pub reactions: Option<String>,
}

/// Provider of recent message records for a channel reference.
#[allow(async_fn_in_trait)]
pub trait MessageSource {
    /// Most recent messages of `channel`, newest first, at most `limit`.
    async fn recent_messages(&self, channel: &str, limit: usize) -> Result<Vec<RawMessage>>;
}

/// Message source backed by the live Telegram client.
pub struct ChannelSource<'a> {
    client: &'a Client,
}

impl<'a> ChannelSource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }
}

impl MessageSource for ChannelSource<'_> {
    async fn recent_messages(&self, channel: &str, limit: usize) -> Result<Vec<RawMessage>> {
        let handle = channel_stem(channel);
        let peer = self
            .client
            .resolve_username(handle)
            .await?
            .ok_or_else(|| Error::ChannelNotFound(channel.to_string()))?;

        let mut records = Vec::new();
        let mut iter = self.client.iter_messages(&peer);

        while let Some(msg) = iter.next().await? {
            records.push(RawMessage {
                text: msg.text().to_string(),
                date: msg.date(),
                reactions: reaction_summary(&msg),
            });
            if records.len() >= limit {
                break;
            }
        }

        Ok(records)
    }
}

/// Fetch up to `limit` recent messages from `channel` and keep the ones
/// that carry text. Order is exactly the retrieval order (newest first).
pub async fn fetch_posts<S: MessageSource>(
    source: &S,
    channel: &str,
    limit: usize,
) -> Result<Vec<Post>> {
    let mut posts = Vec::new();

    for record in source.recent_messages(channel, limit).await? {
        if record.text.is_empty() {
            continue;
        }

        posts.push(Post {
            text: record.text,
            publication_time: record.date,
            reactions: record.reactions,
        });
    }

    Ok(posts)
}

/// Last path segment of a channel reference, with any `@` stripped.
///
/// Accepts full links (`https://t.me/rustlang`), handles (`@rustlang`)
/// and bare names (`rustlang`).
pub fn channel_stem(link: &str) -> &str {
    let trimmed = link.trim_end_matches('/');
    let stem = trimmed.rsplit('/').next().unwrap_or(trimmed);
    stem.trim_start_matches('@')
}
