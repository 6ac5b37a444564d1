//! External provider adapters.
//!
//! Every third-party service the pipeline touches is wrapped in exactly one
//! stateless adapter: repository metadata ([`repo`]), pitch drafting
//! ([`pitch`]), translation ([`translate`]), and speech synthesis
//! ([`speech`]). Each adapter is an `async_trait` object so controllers and
//! tests can substitute providers freely, plus one production client built
//! on `reqwest`.
//!
//! Adapters validate their inputs *before* any network activity (bad
//! repository references and unsupported language codes never leave the
//! process) and report every provider-side failure through [`AdapterError`].
//! Callers treat all rejections identically; retry and backoff policy is
//! the provider's business, not the core's.

use miette::Diagnostic;
use thiserror::Error;

pub mod pitch;
pub mod repo;
pub mod speech;
pub mod translate;

pub use pitch::{GeminiClient, PitchDraft, PitchGenerator};
pub use repo::{GithubClient, RepoAnalysis, RepoAnalyzer, RepoReference};
pub use speech::{AudioClip, ElevenLabsClient, SpeechSynthesizer};
pub use translate::{LingoClient, Translator};

/// Errors surfaced by provider adapters.
#[derive(Debug, Error, Diagnostic)]
pub enum AdapterError {
    /// The repository reference could not be parsed.
    #[error("invalid repository reference: {0}")]
    #[diagnostic(
        code(launchloom::adapters::invalid_reference),
        help("Use https://github.com/<owner>/<repo> or the <owner>/<repo> shorthand.")
    )]
    InvalidReference(String),

    /// A language code outside the supported six-code set.
    #[error("unsupported language code: {0}")]
    #[diagnostic(
        code(launchloom::adapters::unsupported_language),
        help("Supported codes: en, es, fr, ja, hi, de.")
    )]
    UnsupportedLanguage(String),

    /// The provider answered, but with something unusable.
    #[error("provider error ({provider}): {message}")]
    #[diagnostic(code(launchloom::adapters::provider))]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// Non-success HTTP status from a provider endpoint.
    #[error("{provider} returned HTTP {status}")]
    #[diagnostic(
        code(launchloom::adapters::status),
        help("Check provider credentials and request payload.")
    )]
    Status { provider: &'static str, status: u16 },

    /// Transport-level failure.
    #[error(transparent)]
    #[diagnostic(code(launchloom::adapters::http))]
    Http(#[from] reqwest::Error),

    /// Malformed provider response body.
    #[error(transparent)]
    #[diagnostic(code(launchloom::adapters::serde_json))]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
