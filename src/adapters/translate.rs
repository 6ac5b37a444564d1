//! Pitch translation against a Lingo-style localization engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{AdapterError, Result};
use crate::types::Language;

const PROVIDER: &str = "lingo";
const DEFAULT_BASE_URL: &str = "https://engine.lingo.dev";

/// Boundary contract for translation.
///
/// All pitch copy originates in English; `translate` with an English target
/// returns the text unchanged without touching the network.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> Result<String>;
}

/// Localization-engine [`Translator`].
#[derive(Clone, Debug)]
pub struct LingoClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct LocalizeRequest<'a> {
    #[serde(rename = "sourceLocale")]
    source_locale: &'a str,
    #[serde(rename = "targetLocale")]
    target_locale: &'a str,
    data: LocalizePayload<'a>,
}

#[derive(Serialize)]
struct LocalizePayload<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct LocalizeResponse {
    data: LocalizedPayload,
}

#[derive(Deserialize)]
struct LocalizedPayload {
    text: String,
}

impl LingoClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Overrides the API base URL (test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Translator for LingoClient {
    #[instrument(skip(self, text), fields(provider = PROVIDER, target = %target, chars = text.len()))]
    async fn translate(&self, text: &str, target: Language) -> Result<String> {
        if target == Language::En {
            debug!("target is the source language, returning text unchanged");
            return Ok(text.to_string());
        }

        let body = LocalizeRequest {
            source_locale: Language::En.code(),
            target_locale: target.code(),
            data: LocalizePayload { text },
        };
        let resp = self
            .http
            .post(format!("{}/i18n", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let parsed: LocalizeResponse = resp.json().await?;
        if parsed.data.text.is_empty() {
            return Err(AdapterError::Provider {
                provider: PROVIDER,
                message: "empty translation".to_string(),
            });
        }
        debug!(chars = parsed.data.text.len(), "translation completed");
        Ok(parsed.data.text)
    }
}
