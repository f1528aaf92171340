// ABOUTME: Shared test utilities and scripted collaborators for integration tests
// ABOUTME: Provides fake LLM, keyword embeddings, failing index, counting media lookup, and a fixture corpus
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::redundant_closure_for_method_calls
)]
//! Shared test utilities for `exercise_swap`
//!
//! Collaborators here are deterministic so every pipeline path can be
//! driven without a network.

use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use exercise_swap::config::SwapConfig;
use exercise_swap::context::SwapContext;
use exercise_swap::embeddings::EmbeddingProvider;
use exercise_swap::errors::{AppError, AppResult};
use exercise_swap::llm::prompts::ANALYZER_SYSTEM_PROMPT;
use exercise_swap::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use exercise_swap::media::MediaLookup;
use exercise_swap::models::{
    CurrentExercise, ExerciseDocument, ExerciseMetadata, SwapRequest,
};
use exercise_swap::vector::{InMemoryVectorIndex, MetadataFilter, VectorIndex, VectorMatch};
use serde_json::json;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// LLM fakes
// ============================================================================

/// What a scripted call returns
#[derive(Debug, Clone)]
pub enum Script {
    /// Reply with this text
    Reply(String),
    /// Fail as an unreachable backend
    Fail,
}

/// LLM that answers analyzer and ranker prompts from fixed scripts
///
/// Calls are routed by system prompt, so concurrent runs see the same replies.
pub struct ScriptedLlm {
    analyze: Script,
    rank: Script,
    analyze_calls: AtomicUsize,
    rank_calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    /// Both stages fail until scripted
    pub fn new() -> Self {
        Self {
            analyze: Script::Fail,
            rank: Script::Fail,
            analyze_calls: AtomicUsize::new(0),
            rank_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn analyze_reply(mut self, reply: impl Into<String>) -> Self {
        self.analyze = Script::Reply(reply.into());
        self
    }

    pub fn rank_reply(mut self, reply: impl Into<String>) -> Self {
        self.rank = Script::Reply(reply.into());
        self
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn rank_calls(&self) -> usize {
        self.rank_calls.load(Ordering::SeqCst)
    }

    /// Every request received, in arrival order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// User prompt of the last ranking request
    pub fn last_rank_prompt(&self) -> Option<String> {
        self.requests()
            .into_iter()
            .rev()
            .find(|request| !is_analyzer(request))
            .and_then(|request| request.messages.last().map(|m| m.content.clone()))
    }
}

fn is_analyzer(request: &ChatRequest) -> bool {
    request
        .messages
        .first()
        .is_some_and(|m| m.content == ANALYZER_SYSTEM_PROMPT)
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let script = if is_analyzer(request) {
            self.analyze_calls.fetch_add(1, Ordering::SeqCst);
            &self.analyze
        } else {
            self.rank_calls.fetch_add(1, Ordering::SeqCst);
            &self.rank
        };
        match script {
            Script::Reply(text) => Ok(ChatResponse::text(text.clone(), "scripted-model")),
            Script::Fail => Err(AppError::external_unavailable(
                "scripted",
                "connection refused",
            )),
        }
    }
}

/// LLM that is always down
pub struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::text_only()
    }

    fn default_model(&self) -> &str {
        "none"
    }

    async fn complete(&self, _request: &ChatRequest) -> AppResult<ChatResponse> {
        Err(AppError::external_unavailable("failing", "timed out"))
    }
}

/// Analyzer reply JSON
pub fn intent_json(
    reason: &str,
    constraint: Option<&[&str]>,
    target: Option<&str>,
) -> String {
    json!({
        "swap_reason": reason,
        "equipment_constraint": constraint,
        "difficulty_preference": "similar",
        "target_muscle_group": target,
    })
    .to_string()
}

/// Ranker reply JSON naming `names` in order
pub fn ranked_json(names: &[&str], message: &str) -> String {
    let suggestions: Vec<_> = names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "reason": format!("{name} fits your request"),
                "tip": "Keep your core braced",
            })
        })
        .collect();
    json!({ "suggestions": suggestions, "message": message }).to_string()
}

// ============================================================================
// Embeddings and index
// ============================================================================

const VOCABULARY: &[&str] = &[
    "chest", "press", "push", "fly", "dip", "squat", "leg", "lunge", "quad", "glute",
    "shoulder", "delt", "raise", "row", "pull", "back", "lat", "curl", "bicep", "tricep",
    "core", "plank", "barbell", "dumbbell", "cable", "machine", "body weight", "band",
];

/// Bag-of-keywords embedding; a constant bias dimension keeps vectors non-zero
#[derive(Default)]
pub struct KeywordEmbeddings {
    calls: AtomicUsize,
}

impl KeywordEmbeddings {
    pub fn vector_for(text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let mut vector = vec![0.1];
        vector.extend(
            VOCABULARY
                .iter()
                .map(|word| lowered.matches(word).count() as f32),
        );
        vector
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbeddings {
    fn model(&self) -> &str {
        "keyword-bag"
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector_for(text))
    }
}

/// Embedding service that is always down
pub struct FailingEmbeddings;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddings {
    fn model(&self) -> &str {
        "failing"
    }

    async fn embed(&self, _text: &str) -> AppResult<Vec<f32>> {
        Err(AppError::external_unavailable("embeddings", "503 from upstream"))
    }
}

/// Vector index that always errors
pub struct FailingIndex;

#[async_trait]
impl VectorIndex for FailingIndex {
    async fn query(
        &self,
        _embedding: &[f32],
        _top_k: usize,
        _filter: Option<&MetadataFilter>,
    ) -> AppResult<Vec<VectorMatch>> {
        Err(AppError::external_service("vector index", "collection not loaded"))
    }
}

/// Vector index returning fixed matches regardless of the query
pub struct FixedIndex {
    pub matches: Vec<VectorMatch>,
}

#[async_trait]
impl VectorIndex for FixedIndex {
    async fn query(
        &self,
        _embedding: &[f32],
        top_k: usize,
        _filter: Option<&MetadataFilter>,
    ) -> AppResult<Vec<VectorMatch>> {
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }
}

// ============================================================================
// Media
// ============================================================================

/// Media table that counts lookups and can be switched to fail
pub struct CountingMediaLookup {
    assets: HashMap<String, String>,
    fail: bool,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl CountingMediaLookup {
    pub fn new(assets: &[(&str, &str)]) -> Self {
        Self {
            assets: assets
                .iter()
                .map(|(name, url)| ((*name).to_owned(), (*url).to_owned()))
                .collect(),
            fail: false,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every name forwarded to this lookup, in order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaLookup for CountingMediaLookup {
    async fn get_assets(&self, names: &[String]) -> AppResult<HashMap<String, String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().extend(names.iter().cloned());
        if self.fail {
            return Err(AppError::external_unavailable("media", "bucket offline"));
        }
        Ok(names
            .iter()
            .filter_map(|name| self.assets.get(name).map(|url| (name.clone(), url.clone())))
            .collect())
    }
}

// ============================================================================
// Fixture corpus and requests
// ============================================================================

/// `(name, target muscle, body part, equipment)`
pub const CORPUS: &[(&str, &str, &str, &str)] = &[
    ("Barbell Bench Press", "pectorals", "chest", "barbell"),
    ("Dumbbell Bench Press", "pectorals", "chest", "dumbbell"),
    ("Push Up", "pectorals", "chest", "body weight"),
    ("push up", "pectorals", "chest", "body weight"),
    ("Incline Push-Up", "pectorals", "chest", "body weight"),
    ("Cable Fly", "pectorals", "chest", "cable"),
    ("Dumbbell Fly", "pectorals", "chest", "dumbbell"),
    ("Chest Dip", "pectorals", "chest", "body weight"),
    ("Machine Chest Press", "pectorals", "chest", "leverage machine"),
    ("Band Chest Press", "pectorals", "chest", "band"),
    ("Floor Press", "pectorals", "chest", "barbell"),
    ("Svend Press", "pectorals", "chest", "dumbbell"),
    ("Barbell Back Squat", "quads", "upper legs", "barbell"),
    ("Goblet Squat", "quads", "upper legs", "dumbbell"),
    ("Bodyweight Squat", "quads", "upper legs", "body weight"),
    ("Leg Press", "quads", "upper legs", "sled machine"),
    ("Walking Lunge", "quads", "upper legs", "body weight"),
    ("Wall Sit", "quads", "upper legs", "body weight"),
    ("Overhead Press", "delts", "shoulders", "barbell"),
    ("Dumbbell Shoulder Press", "delts", "shoulders", "dumbbell"),
    ("Lateral Raise", "delts", "shoulders", "dumbbell"),
    ("Upright Row", "delts", "shoulders", "barbell"),
    ("Arnold Press", "delts", "shoulders", "dumbbell"),
    ("Face Pull", "delts", "shoulders", "cable"),
    ("Front Raise", "delts", "shoulders", "dumbbell"),
    ("Pike Push-Up", "delts", "shoulders", "body weight"),
    ("Band External Rotation", "rotator cuff", "shoulders", "band"),
    ("Y Raise", "delts", "shoulders", "body weight"),
    ("Pull-Up", "lats", "back", "body weight"),
    ("Lat Pulldown", "lats", "back", "cable"),
    ("Bent Over Row", "upper back", "back", "barbell"),
    ("Barbell Curl", "biceps", "upper arms", "barbell"),
    ("Plank", "abs", "waist", "body weight"),
];

pub fn corpus() -> Vec<ExerciseDocument> {
    CORPUS
        .iter()
        .enumerate()
        .map(|(i, (name, target, body_part, equipment))| {
            ExerciseDocument::new(
                format!("ex-{i:03}"),
                ExerciseMetadata {
                    name: (*name).to_owned(),
                    target_muscle: (*target).to_owned(),
                    body_part: (*body_part).to_owned(),
                    equipment: (*equipment).to_owned(),
                    instructions: format!("Perform the {name} with control."),
                    difficulty: Some("intermediate".to_owned()),
                },
            )
        })
        .collect()
}

/// Index over [`corpus`] with keyword embeddings
pub fn corpus_index() -> InMemoryVectorIndex {
    let mut index = InMemoryVectorIndex::new();
    for document in corpus() {
        let text = format!(
            "{} {} {} {}",
            document.metadata.name,
            document.metadata.target_muscle,
            document.metadata.body_part,
            document.metadata.equipment
        );
        index
            .insert(document, KeywordEmbeddings::vector_for(&text))
            .unwrap();
    }
    index
}

/// Matches with strictly decreasing similarity, in `names` order
pub fn ordered_matches(names: &[&str]) -> Vec<VectorMatch> {
    let documents = corpus();
    names
        .iter()
        .enumerate()
        .map(|(rank, name)| {
            let document = documents
                .iter()
                .find(|d| d.metadata.name == *name)
                .unwrap_or_else(|| panic!("{name} is not in the fixture corpus"));
            VectorMatch {
                id: document.id.clone(),
                metadata: document.metadata.clone(),
                distance: 0.02 * rank as f32,
            }
        })
        .collect()
}

pub fn current_exercise(name: &str, muscle_group: &str, equipment: &str) -> CurrentExercise {
    CurrentExercise {
        name: name.to_owned(),
        muscle_group: muscle_group.to_owned(),
        equipment: equipment.to_owned(),
        sets: Some(3),
        reps: Some("8-12".to_owned()),
    }
}

pub fn bench_press_request(message: &str) -> SwapRequest {
    SwapRequest::new(
        Uuid::new_v4(),
        current_exercise("Barbell Bench Press", "chest", "barbell"),
        message,
    )
}

pub fn overhead_press_request(message: &str) -> SwapRequest {
    SwapRequest::new(
        Uuid::new_v4(),
        current_exercise("Overhead Press", "shoulders", "barbell"),
        message,
    )
}

/// Context over the fixture corpus with default config
pub fn swap_context(llm: Arc<dyn LlmProvider>) -> SwapContext {
    init_test_logging();
    SwapContext::new(
        llm,
        Arc::new(KeywordEmbeddings::default()),
        Arc::new(corpus_index()),
        SwapConfig::default(),
    )
}

/// Context over a fixed list of matches
pub fn fixed_context(llm: Arc<dyn LlmProvider>, matches: Vec<VectorMatch>) -> SwapContext {
    init_test_logging();
    SwapContext::new(
        llm,
        Arc::new(KeywordEmbeddings::default()),
        Arc::new(FixedIndex { matches }),
        SwapConfig::default(),
    )
}
