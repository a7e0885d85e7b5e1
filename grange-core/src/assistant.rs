//! Chat assistant over the site's own content.
//!
//! Each question rebuilds a JSON context blob from the store (upcoming
//! events, recent notes, homepage sections, finance totals), embeds it
//! in a system prompt and makes one call to the external chat-completion
//! API. No retries, no streaming, no memory beyond the history the
//! caller sends back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{GrangeError, GrangeResult};
use crate::ledger::monthly_summary;
use crate::store::Store;

/// How many events and notes the context blob carries at most.
const CONTEXT_EVENT_CAP: usize = 20;
const CONTEXT_NOTE_CAP: usize = 20;

/// One turn of a conversation, in the completion API's own shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`.
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage { role: "user".to_string(), content: content.into() }
    }
}

/// Chat-completion collaborator.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one conversation and return the reply text.
    async fn complete(&self, messages: Vec<ChatMessage>) -> GrangeResult<String>;
}

/// Assemble the context blob the assistant answers from.
///
/// Events with unparseable timestamps simply drop out, the same
/// tolerance the rollover pass applies.
pub async fn build_context<S>(store: &S, now: DateTime<Utc>) -> GrangeResult<serde_json::Value>
where
    S: Store + ?Sized,
{
    let mut upcoming: Vec<_> = store
        .list_events()
        .await?
        .into_iter()
        .filter_map(|e| e.start_time().map(|start| (start, e)))
        .filter(|(start, _)| *start >= now)
        .collect();
    upcoming.sort_by_key(|(start, _)| *start);
    upcoming.truncate(CONTEXT_EVENT_CAP);

    let mut notes = store.list_notes().await?;
    // Most recently updated first; RFC 3339 text compares in time order.
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    notes.truncate(CONTEXT_NOTE_CAP);

    let sections = store.list_sections().await?;
    let entries = store.list_entries().await?;

    Ok(json!({
        "upcoming_events": upcoming
            .iter()
            .map(|(_, e)| json!({
                "title": e.title,
                "starts_at": e.starts_at,
                "location": e.location,
                "description": e.description,
            }))
            .collect::<Vec<_>>(),
        "notes": notes
            .iter()
            .map(|n| json!({
                "title": n.title,
                "body": n.body,
                "tags": n.tags,
            }))
            .collect::<Vec<_>>(),
        "homepage": sections
            .iter()
            .map(|s| json!({
                "slug": s.slug,
                "heading": s.heading,
                "body": s.body,
            }))
            .collect::<Vec<_>>(),
        "finance": monthly_summary(&entries),
    }))
}

/// Answer one visitor message with the context blob plus the prior turns
/// the caller sends back.
pub async fn answer<S, M>(
    store: &S,
    model: &M,
    message: &str,
    history: Vec<ChatMessage>,
    now: DateTime<Utc>,
) -> GrangeResult<String>
where
    S: Store + ?Sized,
    M: ChatModel + ?Sized,
{
    let context = build_context(store, now).await?;
    let system = format!(
        "You are the assistant for a community organization's website. \
         Answer visitor questions using only the site data below. If the \
         answer is not in the data, say you don't know.\n\n{context}"
    );

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history);
    messages.push(ChatMessage::user(message));

    debug!(turns = messages.len(), "sending conversation to chat model");
    model.complete(messages).await
}

/// Passthrough to an OpenAI-compatible chat-completion API.
pub struct HttpChatModel {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl HttpChatModel {
    pub fn new(url: &str, api_key: &str, model: &str) -> Self {
        HttpChatModel {
            client: reqwest::Client::new(),
            url: url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for HttpChatModel {
    async fn complete(&self, messages: Vec<ChatMessage>) -> GrangeResult<String> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest { model: &self.model, messages: &messages })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GrangeError::Assistant(format!(
                "completion API returned {status}: {body}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GrangeError::Assistant(format!("could not decode completion: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GrangeError::Assistant("completion had no reply text".into()))
    }
}
