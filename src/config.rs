//! Environment-backed configuration for provider clients.

use miette::Diagnostic;
use thiserror::Error;

use crate::adapters::{ElevenLabsClient, GeminiClient, GithubClient, LingoClient};

/// Missing or malformed configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("missing API credential: {what}")]
    #[diagnostic(
        code(launchloom::config::missing_credential),
        help("Set the variable in the environment or a .env file.")
    )]
    MissingCredential { what: &'static str },
}

/// Provider credentials and store location, read from the environment.
///
/// A `.env` file in the working directory is honored when present.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `GITHUB_TOKEN` — optional; lifts the anonymous API rate limit.
    pub github_token: Option<String>,
    /// `GEMINI_API_KEY`
    pub gemini_api_key: Option<String>,
    /// `LINGODOTDEV_API_KEY`, falling back to `LINGO_API_KEY`.
    pub lingo_api_key: Option<String>,
    /// `ELEVENLABS_API_KEY`
    pub elevenlabs_api_key: Option<String>,
    /// `LAUNCHLOOM_DB` — sqlite URL for the session store.
    pub database_url: Option<String>,
}

impl Config {
    /// Loads configuration from the process environment (and `.env`).
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            github_token: var(&["GITHUB_TOKEN"]),
            gemini_api_key: var(&["GEMINI_API_KEY"]),
            lingo_api_key: var(&["LINGODOTDEV_API_KEY", "LINGO_API_KEY"]),
            elevenlabs_api_key: var(&["ELEVENLABS_API_KEY"]),
            database_url: var(&["LAUNCHLOOM_DB"]),
        }
    }

    /// Repository client; works unauthenticated, so this never fails.
    #[must_use]
    pub fn github_client(&self) -> GithubClient {
        GithubClient::new(self.github_token.clone())
    }

    pub fn gemini_client(&self) -> Result<GeminiClient, ConfigError> {
        let key = self.gemini_api_key.clone().ok_or(ConfigError::MissingCredential {
            what: "GEMINI_API_KEY",
        })?;
        Ok(GeminiClient::new(key))
    }

    pub fn lingo_client(&self) -> Result<LingoClient, ConfigError> {
        let key = self.lingo_api_key.clone().ok_or(ConfigError::MissingCredential {
            what: "LINGODOTDEV_API_KEY",
        })?;
        Ok(LingoClient::new(key))
    }

    pub fn elevenlabs_client(&self) -> Result<ElevenLabsClient, ConfigError> {
        let key = self
            .elevenlabs_api_key
            .clone()
            .ok_or(ConfigError::MissingCredential {
                what: "ELEVENLABS_API_KEY",
            })?;
        Ok(ElevenLabsClient::new(key))
    }
}

fn var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .filter(|v| !v.is_empty())
}
