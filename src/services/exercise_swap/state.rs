// ABOUTME: Typed run state threaded through the swap pipeline stages
// ABOUTME: Stage outcomes, explicit per-stage status, and the merge of partial updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::messages;
use crate::models::{Candidate, Suggestion, SwapIntent, SwapRequest, SwapResponse};

/// Position of a run in the fixed stage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Nothing has run yet
    Start,
    /// Intent extraction
    Analyzing,
    /// Candidate retrieval and filtering
    Retrieving,
    /// Ranking and explanation
    Ranking,
    /// Finished
    Done,
}

impl PipelineStage {
    /// Stage that follows this one
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Start => Self::Analyzing,
            Self::Analyzing => Self::Retrieving,
            Self::Retrieving => Self::Ranking,
            Self::Ranking | Self::Done => Self::Done,
        }
    }

    /// String representation for logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Analyzing => "analyzing",
            Self::Retrieving => "retrieving",
            Self::Ranking => "ranking",
            Self::Done => "done",
        }
    }
}

/// How the intent was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Extracted from the LLM reply
    Parsed,
    /// Context-derived default used after a failure
    Defaulted {
        /// What went wrong
        reason: String,
    },
}

/// How retrieval ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RetrievalStatus {
    /// At least one candidate survived filtering
    Found {
        /// Candidates kept
        count: usize,
    },
    /// Retrieval worked but nothing survived filtering
    Empty,
    /// Embedding or index query failed
    Failed {
        /// What went wrong
        reason: String,
    },
}

/// How the suggestions were produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankingStatus {
    /// Chosen and explained by the LLM
    Ranked {
        /// Suggestions kept after validation
        count: usize,
    },
    /// Top candidates by similarity, used after an LLM failure or an unusable reply
    Fallback {
        /// What went wrong
        reason: String,
    },
    /// No candidates to rank; the LLM was not called
    NoCandidates,
}

/// Analyzer result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    /// Resolved intent, never absent
    pub intent: SwapIntent,
    /// Parsed or defaulted
    pub status: AnalysisStatus,
}

/// Retriever result
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalOutcome {
    /// Filtered candidates, most similar first
    pub candidates: Vec<Candidate>,
    /// Found, empty or failed
    pub status: RetrievalStatus,
}

impl RetrievalOutcome {
    /// Outcome for a failed retrieval
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            status: RetrievalStatus::Failed {
                reason: reason.into(),
            },
        }
    }
}

/// Ranker result
#[derive(Debug, Clone, PartialEq)]
pub struct RankingOutcome {
    /// Final suggestions
    pub suggestions: Vec<Suggestion>,
    /// Message for the user
    pub message: String,
    /// Ranked, fallback or no candidates
    pub status: RankingStatus,
}

/// Partial state produced by one stage
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    /// Written by the analyzer
    Analysis(AnalysisOutcome),
    /// Written by the retriever
    Retrieval(RetrievalOutcome),
    /// Written by the ranker
    Ranking(RankingOutcome),
}

impl StateUpdate {
    /// Stage that produced this update
    #[must_use]
    pub const fn stage(&self) -> PipelineStage {
        match self {
            Self::Analysis(_) => PipelineStage::Analyzing,
            Self::Retrieval(_) => PipelineStage::Retrieving,
            Self::Ranking(_) => PipelineStage::Ranking,
        }
    }
}

impl From<AnalysisOutcome> for StateUpdate {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self::Analysis(outcome)
    }
}

impl From<RetrievalOutcome> for StateUpdate {
    fn from(outcome: RetrievalOutcome) -> Self {
        Self::Retrieval(outcome)
    }
}

impl From<RankingOutcome> for StateUpdate {
    fn from(outcome: RankingOutcome) -> Self {
        Self::Ranking(outcome)
    }
}

/// State of one pipeline run
///
/// Created per request and owned by the run; stages read it and return a
/// [`StateUpdate`] instead of writing fields they do not own.
#[derive(Debug, Clone)]
pub struct SwapState {
    /// The request being served
    pub request: SwapRequest,
    /// Current stage
    pub stage: PipelineStage,
    /// Resolved intent
    pub intent: Option<SwapIntent>,
    /// Filtered candidates
    pub candidates: Option<Vec<Candidate>>,
    /// Final suggestions
    pub suggestions: Option<Vec<Suggestion>>,
    /// Final message
    pub message: Option<String>,
    /// Analyzer status
    pub analysis: Option<AnalysisStatus>,
    /// Retriever status
    pub retrieval: Option<RetrievalStatus>,
    /// Ranker status
    pub ranking: Option<RankingStatus>,
}

impl SwapState {
    /// Fresh state at [`PipelineStage::Start`]
    #[must_use]
    pub const fn new(request: SwapRequest) -> Self {
        Self {
            request,
            stage: PipelineStage::Start,
            intent: None,
            candidates: None,
            suggestions: None,
            message: None,
            analysis: None,
            retrieval: None,
            ranking: None,
        }
    }

    /// Mark `stage` as running
    pub fn enter(&mut self, stage: PipelineStage) {
        self.stage = stage;
    }

    /// Merge a stage's update and advance past that stage
    pub fn apply(&mut self, update: StateUpdate) {
        self.stage = update.stage().next();
        match update {
            StateUpdate::Analysis(outcome) => {
                self.intent = Some(outcome.intent);
                self.analysis = Some(outcome.status);
            }
            StateUpdate::Retrieval(outcome) => {
                self.candidates = Some(outcome.candidates);
                self.retrieval = Some(outcome.status);
            }
            StateUpdate::Ranking(outcome) => {
                self.suggestions = Some(outcome.suggestions);
                self.message = Some(outcome.message);
                self.ranking = Some(outcome.status);
            }
        }
    }

    /// Intent from the analyzer, or the context-derived default when it is missing
    #[must_use]
    pub fn intent_or_default(&self) -> SwapIntent {
        self.intent
            .clone()
            .unwrap_or_else(|| SwapIntent::default_for(&self.request.current_exercise))
    }

    /// Candidates from the retriever, or none when they are missing
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        self.candidates.as_deref().unwrap_or_default()
    }

    /// Description of every collaborator failure that degraded this run
    #[must_use]
    pub fn degradation(&self) -> Option<String> {
        let mut problems = Vec::new();
        if let Some(AnalysisStatus::Defaulted { reason }) = &self.analysis {
            problems.push(format!("intent analysis defaulted: {reason}"));
        }
        if let Some(RetrievalStatus::Failed { reason }) = &self.retrieval {
            problems.push(format!("candidate retrieval failed: {reason}"));
        }
        if let Some(RankingStatus::Fallback { reason }) = &self.ranking {
            problems.push(format!("ranking fell back to similarity: {reason}"));
        }
        (!problems.is_empty()).then(|| problems.join("; "))
    }

    /// Build the outbound response
    #[must_use]
    pub fn to_response(&self) -> SwapResponse {
        SwapResponse {
            suggestions: self.suggestions.clone().unwrap_or_default(),
            message: self.message.clone().unwrap_or_else(|| {
                messages::no_alternatives(&self.request.current_exercise.name)
            }),
            error: self.degradation(),
        }
    }
}
