//! Pitch drafting against a Gemini-style generative-language endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::repo::RepoAnalysis;
use super::{AdapterError, Result};
use crate::types::{estimated_spoken_seconds, word_count, DurationClass};

const PROVIDER: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// One generated pitch variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PitchDraft {
    pub text: String,
    pub word_count: usize,
    /// Display estimate at ~150 words/minute, not measured audio length.
    pub estimated_seconds: u64,
}

impl PitchDraft {
    /// Builds a draft from raw text, deriving word count and the spoken
    /// duration estimate.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let words = word_count(&text);
        Self {
            estimated_seconds: estimated_spoken_seconds(words),
            word_count: words,
            text,
        }
    }
}

/// Boundary contract for pitch generation.
#[async_trait]
pub trait PitchGenerator: Send + Sync {
    /// Drafts a pitch for the analyzed repository at the given duration class.
    async fn draft(&self, repo: &RepoAnalysis, duration: DurationClass) -> Result<PitchDraft>;
}

/// Builds the drafting prompt for one duration class.
///
/// The structure, tone and guard rails are tuned for spoken delivery; length
/// targets come from [`DurationClass::word_range`].
#[must_use]
pub fn build_prompt(repo: &RepoAnalysis, duration: DurationClass) -> String {
    let (min_words, max_words) = duration.word_range();
    let focus = match duration {
        DurationClass::Short => "clear value proposition",
        DurationClass::Medium => "problem-solution-market narrative",
        DurationClass::Long => "complete startup story with product clarity",
    };
    let structure = match duration {
        DurationClass::Short => "1. Clear problem\n2. Practical solution\n3. Why it matters now",
        DurationClass::Medium => {
            "1. Problem context (15-20%)\n2. Product solution (40-50%)\n3. Market relevance or early validation (15-20%)\n4. Clear next step or vision (10-15%)"
        }
        DurationClass::Long => {
            "1. Opening hook (10%)\n2. Real-world problem (20%)\n3. Product explanation (40%)\n4. Differentiation (15%)\n5. Vision and growth direction (15%)"
        }
    };

    format!(
        "You are an experienced startup founder helping turn real public code repositories into credible startup pitches.\n\n\
         CONTEXT:\n\
         Repository: {name}\n\
         Description: {description}\n\
         Tech Stack: {stack}\n\
         Stars: {stars} | Forks: {forks}\n\
         Readme Summary: {readme}\n\n\
         TASK:\n\
         Create a {label} {focus} startup pitch based on this repository.\n\n\
         IMPORTANT:\n\
         This is NOT a technical explanation.\n\
         This is a realistic startup pitch grounded in what the product actually does.\n\
         Do not exaggerate traction or invent metrics.\n\
         Do not over-focus on the tech stack unless it directly strengthens the value proposition.\n\n\
         REQUIREMENTS:\n\
         - Length: Exactly {min_words}-{max_words} words for natural spoken delivery\n\
         - Focus: {focus}\n\
         - Make the product sound real, usable, and positioned in a believable market\n\
         - Emphasize user value, problem clarity, and practical impact\n\
         - Mention traction only if implied by stars/forks (without fabricating numbers)\n\
         - Keep technical references minimal and outcome-focused\n\n\
         STRUCTURE:\n\
         {structure}\n\n\
         TONE:\n\
         - Confident but grounded\n\
         - Clear and concise\n\
         - Investor-ready but not hype-driven\n\
         - Conversational and natural when spoken aloud\n\n\
         AVOID:\n\
         - Buzzwords (revolutionary, game-changing, cutting-edge, etc.)\n\
         - Unrealistic market domination claims\n\
         - Deep technical breakdowns\n\
         - Generic startup cliches\n\
         - Fabricated traction or metrics\n\n\
         OUTPUT FORMAT:\n\
         Return ONLY the pitch text.\n\
         No headings.\n\
         No labels.\n\
         No formatting.\n\
         Start directly with the first sentence of the pitch.\n\n\
         Generate the pitch now:",
        name = repo.name,
        description = repo.description.as_deref().unwrap_or("Not provided"),
        stack = repo.tech_stack.join(", "),
        stars = repo.stars,
        forks = repo.forks,
        readme = repo.readme_summary,
        label = duration.label(),
    )
}

/// Generative-language [`PitchGenerator`].
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overrides the model id.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the API base URL (test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PitchGenerator for GeminiClient {
    #[instrument(skip(self, repo), fields(provider = PROVIDER, repo = %repo.name, duration = %duration))]
    async fn draft(&self, repo: &RepoAnalysis, duration: DurationClass) -> Result<PitchDraft> {
        let prompt = build_prompt(repo, duration);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        let resp = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
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

        let parsed: GenerateResponse = resp.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(AdapterError::Provider {
                provider: PROVIDER,
                message: "empty completion".to_string(),
            })?;

        let draft = PitchDraft::from_text(text);
        debug!(words = draft.word_count, "pitch drafted");
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_repo() -> RepoAnalysis {
        RepoAnalysis {
            name: "demo".to_string(),
            description: Some("A demo project".to_string()),
            stars: 120,
            forks: 10,
            tech_stack: vec!["TypeScript".to_string()],
            readme_summary: "Demo readme".to_string(),
            recent_commit_count: 12,
            confidence_score: 40,
        }
    }

    #[test]
    fn draft_derives_counts() {
        let text = "alpha beta gamma delta".to_string();
        let draft = PitchDraft::from_text(text);
        assert_eq!(draft.word_count, 4);
        assert_eq!(draft.estimated_seconds, 2);
    }

    #[test]
    fn prompt_embeds_repository_context_and_length() {
        let prompt = build_prompt(&demo_repo(), DurationClass::Short);
        assert!(prompt.contains("Repository: demo"));
        assert!(prompt.contains("TypeScript"));
        assert!(prompt.contains("75-90 words"));
        assert!(prompt.contains("30s"));

        let prompt = build_prompt(&demo_repo(), DurationClass::Long);
        assert!(prompt.contains("225-270 words"));
        assert!(prompt.contains("Opening hook"));
    }
}
