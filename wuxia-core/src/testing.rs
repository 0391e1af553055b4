//! Testing utilities.
//!
//! - `MockGenerator` for deterministic testing without API calls,
//!   including scripted failures for every backend error kind
//! - `RecordingStore` to assert which lookups a code path performs
//! - `FailingStore` to exercise persistence-failure handling

use crate::generate::Generator;
use crate::model::{
    EventSummary, GuidelineSet, KnownTechniqueLink, LoreFragment, ProtagonistSummary, RealmTier,
    RuleSet, TechniqueRecord,
};
use crate::store::{StoreError, WorldStore};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A generator that returns scripted responses in order.
///
/// Each call also records the persona and body it received, so tests
/// can assert on the composed prompt.
pub struct MockGenerator {
    script: Mutex<VecDeque<Result<String, openai::Error>>>,
    last_prompt: Mutex<Option<(String, String)>>,
    calls: AtomicUsize,
}

impl MockGenerator {
    /// Create a mock with scripted results.
    pub fn new(script: Vec<Result<String, openai::Error>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last_prompt: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock that always succeeds with the same narration.
    pub fn narrating(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(vec![Ok(text)])
    }

    /// A mock whose first call fails with the given error.
    pub fn failing(error: openai::Error) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Append a scripted result.
    pub fn queue(&self, result: Result<String, openai::Error>) {
        self.script.lock().unwrap().push_back(result);
    }

    /// The body of the most recent prompt, if any call was made.
    pub fn last_body(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().as_ref().map(|(_, b)| b.clone())
    }

    /// The persona of the most recent prompt, if any call was made.
    pub fn last_persona(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().as_ref().map(|(p, _)| p.clone())
    }

    /// Number of generation calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, persona: &str, body: &str) -> Result<String, openai::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some((persona.to_string(), body.to_string()));

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("The DM has no more scripted responses.".to_string()))
    }
}

/// Per-method lookup counters.
#[derive(Debug, Default)]
pub struct LookupCounts {
    pub guideline_set: usize,
    pub protagonist: usize,
    pub recent_events: usize,
    pub lore_fragment: usize,
    pub cultivation_tiers: usize,
    pub known_techniques: usize,
    pub technique: usize,
    pub rule_sets: usize,
    pub events_by_keyword: usize,
}

/// A store wrapper that counts every lookup before delegating.
pub struct RecordingStore<S> {
    inner: S,
    guideline_set: AtomicUsize,
    protagonist: AtomicUsize,
    recent_events: AtomicUsize,
    lore_fragment: AtomicUsize,
    cultivation_tiers: AtomicUsize,
    known_techniques: AtomicUsize,
    technique: AtomicUsize,
    rule_sets: AtomicUsize,
    events_by_keyword: AtomicUsize,
}

impl<S: WorldStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            guideline_set: AtomicUsize::new(0),
            protagonist: AtomicUsize::new(0),
            recent_events: AtomicUsize::new(0),
            lore_fragment: AtomicUsize::new(0),
            cultivation_tiers: AtomicUsize::new(0),
            known_techniques: AtomicUsize::new(0),
            technique: AtomicUsize::new(0),
            rule_sets: AtomicUsize::new(0),
            events_by_keyword: AtomicUsize::new(0),
        }
    }

    /// Snapshot the counters.
    pub fn counts(&self) -> LookupCounts {
        LookupCounts {
            guideline_set: self.guideline_set.load(Ordering::SeqCst),
            protagonist: self.protagonist.load(Ordering::SeqCst),
            recent_events: self.recent_events.load(Ordering::SeqCst),
            lore_fragment: self.lore_fragment.load(Ordering::SeqCst),
            cultivation_tiers: self.cultivation_tiers.load(Ordering::SeqCst),
            known_techniques: self.known_techniques.load(Ordering::SeqCst),
            technique: self.technique.load(Ordering::SeqCst),
            rule_sets: self.rule_sets.load(Ordering::SeqCst),
            events_by_keyword: self.events_by_keyword.load(Ordering::SeqCst),
        }
    }
}

impl<S: WorldStore> WorldStore for RecordingStore<S> {
    fn guideline_set(&self, name: &str) -> Result<Option<GuidelineSet>, StoreError> {
        self.guideline_set.fetch_add(1, Ordering::SeqCst);
        self.inner.guideline_set(name)
    }

    fn protagonist(&self, name: &str) -> Result<Option<ProtagonistSummary>, StoreError> {
        self.protagonist.fetch_add(1, Ordering::SeqCst);
        self.inner.protagonist(name)
    }

    fn recent_events(&self, limit: usize) -> Result<Vec<EventSummary>, StoreError> {
        self.recent_events.fetch_add(1, Ordering::SeqCst);
        self.inner.recent_events(limit)
    }

    fn lore_fragment(&self, name: &str) -> Result<Option<LoreFragment>, StoreError> {
        self.lore_fragment.fetch_add(1, Ordering::SeqCst);
        self.inner.lore_fragment(name)
    }

    fn cultivation_tiers(&self) -> Result<Vec<RealmTier>, StoreError> {
        self.cultivation_tiers.fetch_add(1, Ordering::SeqCst);
        self.inner.cultivation_tiers()
    }

    fn known_techniques(&self, character: &str) -> Result<Vec<KnownTechniqueLink>, StoreError> {
        self.known_techniques.fetch_add(1, Ordering::SeqCst);
        self.inner.known_techniques(character)
    }

    fn technique(&self, name: &str) -> Result<Option<TechniqueRecord>, StoreError> {
        self.technique.fetch_add(1, Ordering::SeqCst);
        self.inner.technique(name)
    }

    fn rule_sets(&self) -> Result<Vec<RuleSet>, StoreError> {
        self.rule_sets.fetch_add(1, Ordering::SeqCst);
        self.inner.rule_sets()
    }

    fn events_by_keyword(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<EventSummary>, StoreError> {
        self.events_by_keyword.fetch_add(1, Ordering::SeqCst);
        self.inner.events_by_keyword(keyword, limit)
    }
}

/// A store whose every lookup fails, for persistence-failure tests.
pub struct FailingStore;

impl FailingStore {
    fn err<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Unavailable("simulated store failure".into()))
    }
}

impl WorldStore for FailingStore {
    fn guideline_set(&self, _name: &str) -> Result<Option<GuidelineSet>, StoreError> {
        self.err()
    }

    fn protagonist(&self, _name: &str) -> Result<Option<ProtagonistSummary>, StoreError> {
        self.err()
    }

    fn recent_events(&self, _limit: usize) -> Result<Vec<EventSummary>, StoreError> {
        self.err()
    }

    fn lore_fragment(&self, _name: &str) -> Result<Option<LoreFragment>, StoreError> {
        self.err()
    }

    fn cultivation_tiers(&self) -> Result<Vec<RealmTier>, StoreError> {
        self.err()
    }

    fn known_techniques(&self, _character: &str) -> Result<Vec<KnownTechniqueLink>, StoreError> {
        self.err()
    }

    fn technique(&self, _name: &str) -> Result<Option<TechniqueRecord>, StoreError> {
        self.err()
    }

    fn rule_sets(&self) -> Result<Vec<RuleSet>, StoreError> {
        self.err()
    }

    fn events_by_keyword(
        &self,
        _keyword: &str,
        _limit: usize,
    ) -> Result<Vec<EventSummary>, StoreError> {
        self.err()
    }
}
