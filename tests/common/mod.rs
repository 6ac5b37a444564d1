//! Shared fixtures and call-counting provider mocks.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use launchloom::adapters::{
    AdapterError, AudioClip, PitchDraft, PitchGenerator, RepoAnalysis, RepoAnalyzer,
    SpeechSynthesizer, Translator,
};
use launchloom::types::{estimated_spoken_seconds, word_count, DurationClass, Language, VoiceStyle};

/// The analysis fixture used across scenarios.
pub fn demo_analysis() -> RepoAnalysis {
    RepoAnalysis {
        name: "demo".to_string(),
        description: Some("A demo project".to_string()),
        stars: 120,
        forks: 10,
        tech_stack: vec!["TypeScript".to_string()],
        readme_summary: "Demo readme".to_string(),
        recent_commit_count: 12,
        confidence_score: 49,
    }
}

/// A deterministic text of exactly `n` words.
pub fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

fn provider_error(message: &str) -> AdapterError {
    AdapterError::Provider {
        provider: "mock",
        message: message.to_string(),
    }
}

/// Repo analyzer returning a fixed analysis (or a scripted failure).
pub struct ScriptedAnalyzer {
    pub calls: AtomicUsize,
    analysis: RepoAnalysis,
    failure: Option<String>,
}

impl ScriptedAnalyzer {
    pub fn new(analysis: RepoAnalysis) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            analysis,
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            analysis: demo_analysis(),
            failure: Some(message.to_string()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepoAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, _reference: &str) -> Result<RepoAnalysis, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(provider_error(message)),
            None => Ok(self.analysis.clone()),
        }
    }
}

/// Pitch generator producing a fixed word count per duration class.
///
/// Short drafts are 80 words so the spoken estimate lands on 32 seconds.
pub struct ScriptedPitch {
    pub calls: AtomicUsize,
    fail_first: AtomicUsize,
}

impl ScriptedPitch {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_first: AtomicUsize::new(0),
        }
    }

    /// Fails the first `n` calls, then succeeds.
    pub fn failing_first(n: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_first: AtomicUsize::new(n),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn words_for(duration: DurationClass) -> usize {
        match duration {
            DurationClass::Short => 80,
            DurationClass::Medium => 150,
            DurationClass::Long => 225,
        }
    }
}

#[async_trait]
impl PitchGenerator for ScriptedPitch {
    async fn draft(
        &self,
        _repo: &RepoAnalysis,
        duration: DurationClass,
    ) -> Result<PitchDraft, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(provider_error("generation backend unavailable"));
        }
        Ok(PitchDraft::from_text(words(Self::words_for(duration))))
    }
}

/// Translator recording every requested target language.
pub struct RecordingTranslator {
    calls: Mutex<Vec<Language>>,
    failure: Option<String>,
}

impl RecordingTranslator {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn calls_for(&self, language: Language) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|l| **l == language)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Translator for RecordingTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, AdapterError> {
        self.calls.lock().unwrap().push(target);
        if let Some(message) = &self.failure {
            return Err(provider_error(message));
        }
        if target == Language::En {
            return Ok(text.to_string());
        }
        Ok(format!("[{}] {text}", target.code()))
    }
}

/// Speech synthesizer counting calls and yielding tiny fake clips.
pub struct CountingSpeech {
    pub calls: AtomicUsize,
    fail_first: AtomicUsize,
}

impl CountingSpeech {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_first: AtomicUsize::new(0),
        }
    }

    pub fn failing_first(n: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_first: AtomicUsize::new(n),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for CountingSpeech {
    async fn synthesize(
        &self,
        text: &str,
        _language: Language,
        _style: VoiceStyle,
    ) -> Result<AudioClip, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(provider_error("speech backend unavailable"));
        }
        Ok(AudioClip {
            audio: vec![0x1d, 0x3a, 0x7f],
            media_type: "audio/mpeg".to_string(),
            estimated_seconds: estimated_spoken_seconds(word_count(text)),
        })
    }
}
