//! Linear single-pipeline mode.
//!
//! A simplified, single-instance rendition of the node-controller contract
//! without branching: one active result per stage (analysis, pitch,
//! per-language text, per-language audio), driven top to bottom. The
//! per-language cache satisfies the same at-most-one-provider-call-per-key
//! guarantee as the graph controllers: switching to a cached language is
//! instant and touches no network; an uncached language is populated by a
//! translate-then-synthesize pair for that language only.
//!
//! Provider failures are absorbed into [`FlowStage::Failed`]; an `Err`
//! return is never used for them.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::adapters::{
    AudioClip, PitchDraft, PitchGenerator, RepoAnalysis, RepoAnalyzer, SpeechSynthesizer,
    Translator,
};
use crate::types::{DurationClass, Language, VoiceStyle};

/// Lifecycle of the linear pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowStage {
    /// Nothing generated yet.
    Idle,
    Analyzing,
    Drafting,
    Translating(Language),
    Synthesizing(Language),
    /// The active language has text (and audio, when synthesis succeeded).
    Ready,
    /// A provider call failed; retrying re-attempts the same operation.
    Failed { message: String },
}

impl FlowStage {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, FlowStage::Ready)
    }

    /// The failure message, if the pipeline is in its error state.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FlowStage::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Cached per-language results: localized text plus optional audio.
#[derive(Clone, Debug, PartialEq)]
pub struct LanguageTrack {
    pub text: String,
    pub audio: Option<AudioClip>,
}

/// The single-pipeline controller.
///
/// ```no_run
/// use std::sync::Arc;
/// use launchloom::config::Config;
/// use launchloom::flow::LinearFlow;
/// use launchloom::types::{DurationClass, Language};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_env();
/// let mut flow = LinearFlow::new(
///     Arc::new(config.github_client()),
///     Arc::new(config.gemini_client()?),
///     Arc::new(config.lingo_client()?),
///     Arc::new(config.elevenlabs_client()?),
/// )
/// .with_duration(DurationClass::Short)
/// .with_language(Language::Fr);
///
/// let stage = flow.generate("https://github.com/acme/demo").await;
/// if let Some(track) = flow.active_track() {
///     println!("{} ({:?})", track.text, stage);
/// }
/// # Ok(())
/// # }
/// ```
pub struct LinearFlow {
    analyzer: Arc<dyn RepoAnalyzer>,
    model: Arc<dyn PitchGenerator>,
    translator: Arc<dyn Translator>,
    speech: Arc<dyn SpeechSynthesizer>,

    duration: DurationClass,
    voice: VoiceStyle,
    language: Language,

    analysis: Option<RepoAnalysis>,
    pitch: Option<PitchDraft>,
    languages: FxHashMap<Language, LanguageTrack>,
    stage: FlowStage,
}

impl LinearFlow {
    #[must_use]
    pub fn new(
        analyzer: Arc<dyn RepoAnalyzer>,
        model: Arc<dyn PitchGenerator>,
        translator: Arc<dyn Translator>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            analyzer,
            model,
            translator,
            speech,
            duration: DurationClass::Medium,
            voice: VoiceStyle::ExecutiveFemale,
            language: Language::En,
            analysis: None,
            pitch: None,
            languages: FxHashMap::default(),
            stage: FlowStage::Idle,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: DurationClass) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_voice(mut self, voice: VoiceStyle) -> Self {
        self.voice = voice;
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub fn stage(&self) -> &FlowStage {
        &self.stage
    }

    #[must_use]
    pub fn analysis(&self) -> Option<&RepoAnalysis> {
        self.analysis.as_ref()
    }

    /// The original (English) pitch draft.
    #[must_use]
    pub fn pitch(&self) -> Option<&PitchDraft> {
        self.pitch.as_ref()
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// The cached track for a language, if populated.
    #[must_use]
    pub fn track(&self, language: Language) -> Option<&LanguageTrack> {
        self.languages.get(&language)
    }

    /// The track for the currently selected language.
    #[must_use]
    pub fn active_track(&self) -> Option<&LanguageTrack> {
        self.languages.get(&self.language)
    }

    /// Languages with a populated cache entry, for "already computed"
    /// indicators.
    pub fn cached_languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.languages.keys().copied()
    }

    /// Runs the full pipeline for a repository reference: analysis → pitch →
    /// translation (selected language) → audio. Resets all cached state
    /// first. Provider failures land in [`FlowStage::Failed`].
    #[instrument(skip(self), fields(language = %self.language, duration = %self.duration))]
    pub async fn generate(&mut self, reference: &str) -> FlowStage {
        self.analysis = None;
        self.pitch = None;
        self.languages.clear();

        self.stage = FlowStage::Analyzing;
        let analysis = match self.analyzer.analyze(reference).await {
            Ok(analysis) => analysis,
            Err(err) => return self.fail(err.to_string()),
        };

        self.stage = FlowStage::Drafting;
        let pitch = match self.model.draft(&analysis, self.duration).await {
            Ok(pitch) => pitch,
            Err(err) => {
                self.analysis = Some(analysis);
                return self.fail(err.to_string());
            }
        };
        self.analysis = Some(analysis);
        // The original English copy doubles as the `en` cache entry.
        self.languages.insert(
            Language::En,
            LanguageTrack {
                text: pitch.text.clone(),
                audio: None,
            },
        );
        self.pitch = Some(pitch);

        let language = self.language;
        self.ensure_language(language).await
    }

    /// Switches the selected language.
    ///
    /// A fully cached language is adopted instantly with no network
    /// activity. An uncached one triggers translate-then-synthesize for
    /// that language only; every other cache entry is left untouched.
    /// Before [`generate`](Self::generate) has produced a pitch this is a
    /// no-op.
    #[instrument(skip(self))]
    pub async fn switch_language(&mut self, language: Language) -> FlowStage {
        if self.pitch.is_none() {
            return self.stage.clone();
        }
        self.language = language;
        if let Some(track) = self.languages.get(&language) {
            if track.audio.is_some() {
                self.stage = FlowStage::Ready;
                return self.stage.clone();
            }
        }
        self.ensure_language(language).await
    }

    /// Populates the track for one language, reusing whatever half is
    /// already cached (text survives a failed synthesis and is not
    /// re-translated on retry).
    async fn ensure_language(&mut self, language: Language) -> FlowStage {
        let Some(pitch) = self.pitch.as_ref().map(|p| p.text.clone()) else {
            return self.stage.clone();
        };
        let text = match self.languages.get(&language) {
            Some(track) => track.text.clone(),
            None => {
                self.stage = FlowStage::Translating(language);
                let text = if language == Language::En {
                    pitch
                } else {
                    match self.translator.translate(&pitch, language).await {
                        Ok(text) => text,
                        Err(err) => return self.fail(err.to_string()),
                    }
                };
                self.languages.insert(
                    language,
                    LanguageTrack {
                        text: text.clone(),
                        audio: None,
                    },
                );
                text
            }
        };

        self.stage = FlowStage::Synthesizing(language);
        match self.speech.synthesize(&text, language, self.voice).await {
            Ok(clip) => {
                if let Some(track) = self.languages.get_mut(&language) {
                    track.audio = Some(clip);
                }
                info!(%language, "language track populated");
                self.stage = FlowStage::Ready;
            }
            Err(err) => return self.fail(err.to_string()),
        }
        self.stage.clone()
    }

    fn fail(&mut self, message: String) -> FlowStage {
        self.stage = FlowStage::Failed { message };
        self.stage.clone()
    }
}
