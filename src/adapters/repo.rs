//! Repository analysis against the GitHub REST API.
//!
//! [`GithubClient`] fetches repository metadata, the README, a set of
//! manifest probes for tech-stack detection, and recent commit activity,
//! then folds them into one [`RepoAnalysis`] with a heuristic investor
//! confidence score. The scoring formula is fixed and pure
//! ([`confidence_score`]) so it can be verified without network access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{AdapterError, Result};

const PROVIDER: &str = "github";
const DEFAULT_BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("launchloom/", env!("CARGO_PKG_VERSION"));

/// A parsed `owner/repo` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoReference {
    pub owner: String,
    pub repo: String,
}

impl RepoReference {
    /// Parses a repository reference.
    ///
    /// Accepts a full `https://github.com/<owner>/<repo>` URL (extra path
    /// segments and a trailing `.git` are tolerated) or the bare
    /// `<owner>/<repo>` shorthand.
    ///
    /// ```rust
    /// use launchloom::adapters::RepoReference;
    ///
    /// let r = RepoReference::parse("https://github.com/acme/demo.git").unwrap();
    /// assert_eq!((r.owner.as_str(), r.repo.as_str()), ("acme", "demo"));
    ///
    /// let r = RepoReference::parse("acme/demo").unwrap();
    /// assert_eq!(r.repo, "demo");
    /// ```
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        let path = match reference.find("github.com/") {
            Some(idx) => &reference[idx + "github.com/".len()..],
            None => reference,
        };
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next();
        let repo = segments.next();
        match (owner, repo) {
            (Some(owner), Some(repo)) if !owner.contains(':') => Ok(Self {
                owner: owner.to_string(),
                repo: repo.trim_end_matches(".git").to_string(),
            }),
            _ => Err(AdapterError::InvalidReference(reference.to_string())),
        }
    }
}

/// The analysis result attached to a source node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepoAnalysis {
    pub name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub tech_stack: Vec<String>,
    pub readme_summary: String,
    pub recent_commit_count: u32,
    /// Heuristic investor confidence, 0–100.
    pub confidence_score: u8,
}

/// Raw inputs to the confidence heuristic.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfidenceInputs {
    pub stars: u64,
    pub forks: u64,
    pub readme_length: usize,
    pub commit_activity: u32,
    pub tech_stack_size: usize,
}

/// Investor confidence score on a 0–100 scale.
///
/// Weighted caps: stars 30, README length 25, commit activity 20, tech-stack
/// diversity 15, forks 10. Each component saturates at its cap.
#[must_use]
pub fn confidence_score(inputs: ConfidenceInputs) -> u8 {
    let mut score = 0.0_f64;
    score += (inputs.stars as f64 / 100.0 * 30.0).min(30.0);
    score += (inputs.readme_length as f64 / 1000.0 * 25.0).min(25.0);
    score += (inputs.commit_activity as f64 / 20.0 * 20.0).min(20.0);
    score += (inputs.tech_stack_size as f64 / 5.0 * 15.0).min(15.0);
    score += (inputs.forks as f64 / 50.0 * 10.0).min(10.0);
    score.round() as u8
}

/// First five lines of the README, truncated to 300 characters.
#[must_use]
pub fn summarize_readme(readme: &str) -> String {
    if readme.is_empty() {
        return "No README available".to_string();
    }
    let head: Vec<&str> = readme.lines().take(5).collect();
    head.join("\n").chars().take(300).collect()
}

/// Boundary contract for repository analysis.
#[async_trait]
pub trait RepoAnalyzer: Send + Sync {
    /// Analyzes the referenced repository.
    ///
    /// Fails when the reference cannot be parsed or the repository cannot
    /// be found; partial metadata (missing README, empty manifests) is not
    /// an error.
    async fn analyze(&self, reference: &str) -> Result<RepoAnalysis>;
}

/// GitHub-backed [`RepoAnalyzer`].
#[derive(Clone, Debug)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct RepoSummary {
    name: String,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

impl GithubClient {
    /// Creates a client, optionally authenticated with a personal access
    /// token to lift the anonymous rate limit.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token,
        }
    }

    /// Overrides the API base URL (test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn get(&self, path: &str, accept: &'static str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, accept);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn fetch_repo(&self, r: &RepoReference) -> Result<RepoSummary> {
        let resp = self
            .get(
                &format!("/repos/{}/{}", r.owner, r.repo),
                "application/vnd.github+json",
            )
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await?)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(AdapterError::Provider {
                provider: PROVIDER,
                message: format!("repository {}/{} not found", r.owner, r.repo),
            })
        } else {
            Err(AdapterError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            })
        }
    }

    /// Fetches the raw README body; repositories without one yield an empty
    /// string rather than an error.
    async fn fetch_readme(&self, r: &RepoReference) -> String {
        let resp = self
            .get(
                &format!("/repos/{}/{}/readme", r.owner, r.repo),
                "application/vnd.github.raw+json",
            )
            .send()
            .await;
        match resp {
            Ok(resp) if resp.status().is_success() => resp.text().await.unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Fetches a repository file's raw content, `None` when absent.
    async fn probe_file(&self, r: &RepoReference, path: &str) -> Option<String> {
        let resp = self
            .get(
                &format!("/repos/{}/{}/contents/{path}", r.owner, r.repo),
                "application/vnd.github.raw+json",
            )
            .send()
            .await
            .ok()?;
        if resp.status().is_success() {
            resp.text().await.ok()
        } else {
            None
        }
    }

    async fn detect_tech_stack(&self, r: &RepoReference) -> Vec<String> {
        fn add(label: &str, stack: &mut Vec<String>) {
            if !stack.iter().any(|s| s == label) {
                stack.push(label.to_string());
            }
        }
        let mut stack: Vec<String> = Vec::new();

        if let Some(body) = self.probe_file(r, "package.json").await {
            if let Ok(manifest) = serde_json::from_str::<serde_json::Value>(&body) {
                let mut deps: Vec<String> = Vec::new();
                for table in ["dependencies", "devDependencies"] {
                    if let Some(map) = manifest.get(table).and_then(|v| v.as_object()) {
                        deps.extend(map.keys().cloned());
                    }
                }
                let known = [
                    ("next", "Next.js"),
                    ("react", "React"),
                    ("vue", "Vue"),
                    ("@angular/core", "Angular"),
                    ("express", "Express"),
                    ("typescript", "TypeScript"),
                    ("tailwindcss", "Tailwind CSS"),
                    ("@supabase/supabase-js", "Supabase"),
                    ("prisma", "Prisma"),
                    ("mongodb", "MongoDB"),
                    ("postgres", "PostgreSQL"),
                ];
                for (dep, label) in known {
                    if deps.iter().any(|d| d == dep) {
                        add(label, &mut stack);
                    }
                }
            }
        }

        if let Some(body) = self.probe_file(r, "requirements.txt").await {
            add("Python", &mut stack);
            for (marker, label) in [("django", "Django"), ("flask", "Flask"), ("fastapi", "FastAPI")]
            {
                if body.contains(marker) {
                    add(label, &mut stack);
                }
            }
        }

        if self.probe_file(r, "Gemfile").await.is_some() {
            add("Ruby", &mut stack);
            add("Rails", &mut stack);
        }
        if self.probe_file(r, "go.mod").await.is_some() {
            add("Go", &mut stack);
        }
        if self.probe_file(r, "Cargo.toml").await.is_some() {
            add("Rust", &mut stack);
        }

        stack
    }

    /// Recent commit count, capped at one page of 20.
    async fn recent_commit_count(&self, r: &RepoReference) -> u32 {
        let resp = self
            .get(
                &format!("/repos/{}/{}/commits?per_page=20", r.owner, r.repo),
                "application/vnd.github+json",
            )
            .send()
            .await;
        match resp {
            Ok(resp) if resp.status().is_success() => resp
                .json::<Vec<serde_json::Value>>()
                .await
                .map(|commits| commits.len() as u32)
                .unwrap_or(0),
            _ => 0,
        }
    }
}

#[async_trait]
impl RepoAnalyzer for GithubClient {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn analyze(&self, reference: &str) -> Result<RepoAnalysis> {
        let r = RepoReference::parse(reference)?;
        debug!(owner = %r.owner, repo = %r.repo, "analyzing repository");

        let (summary, readme, tech_stack, recent_commit_count) = tokio::join!(
            self.fetch_repo(&r),
            self.fetch_readme(&r),
            self.detect_tech_stack(&r),
            self.recent_commit_count(&r),
        );
        let summary = summary?;

        let score = confidence_score(ConfidenceInputs {
            stars: summary.stargazers_count,
            forks: summary.forks_count,
            readme_length: readme.len(),
            commit_activity: recent_commit_count,
            tech_stack_size: tech_stack.len(),
        });
        info!(
            repo = %summary.name,
            stars = summary.stargazers_count,
            confidence = score,
            "repository analyzed"
        );

        Ok(RepoAnalysis {
            name: summary.name,
            description: summary.description,
            stars: summary.stargazers_count,
            forks: summary.forks_count,
            tech_stack,
            readme_summary: summarize_readme(&readme),
            recent_commit_count,
            confidence_score: score,
        })
    }
}
