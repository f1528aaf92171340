// ABOUTME: Orchestrates analyze, retrieve, and rank over a per-run SwapState
// ABOUTME: Stages are trait objects run in fixed order; every run returns a SwapResponse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::state::{
    AnalysisStatus, PipelineStage, RankingStatus, RetrievalStatus, StateUpdate, SwapState,
};
use super::{analyzer, ranker, retriever};
use crate::constants::messages;
use crate::context::SwapContext;
use crate::models::{SwapIntent, SwapRequest, SwapResponse};

/// One step of the substitution pipeline
///
/// A stage reads the run state and returns the fields it owns. It must not
/// fail: collaborator errors are absorbed into a status on the update.
#[async_trait]
pub trait SwapStage: Send + Sync {
    /// Which stage this is
    fn stage(&self) -> PipelineStage;

    /// Compute this stage's update
    async fn run(&self, context: &SwapContext, state: &SwapState) -> StateUpdate;
}

/// Intent extraction stage
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeStage;

#[async_trait]
impl SwapStage for AnalyzeStage {
    fn stage(&self) -> PipelineStage {
        PipelineStage::Analyzing
    }

    async fn run(&self, context: &SwapContext, state: &SwapState) -> StateUpdate {
        analyzer::analyze(context, &state.request).await.into()
    }
}

/// Candidate retrieval stage
#[derive(Debug, Clone, Copy, Default)]
pub struct RetrieveStage;

#[async_trait]
impl SwapStage for RetrieveStage {
    fn stage(&self) -> PipelineStage {
        PipelineStage::Retrieving
    }

    async fn run(&self, context: &SwapContext, state: &SwapState) -> StateUpdate {
        let intent = state.intent_or_default();
        retriever::retrieve(context, &state.request, &intent)
            .await
            .into()
    }
}

/// Ranking and explanation stage
#[derive(Debug, Clone, Copy, Default)]
pub struct RankStage;

#[async_trait]
impl SwapStage for RankStage {
    fn stage(&self) -> PipelineStage {
        PipelineStage::Ranking
    }

    async fn run(&self, context: &SwapContext, state: &SwapState) -> StateUpdate {
        let intent = state.intent_or_default();
        ranker::rank(context, &state.request, &intent, state.candidates())
            .await
            .into()
    }
}

/// Everything a run produced, for callers and tests that need more than the response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapReport {
    /// Outbound response
    pub response: SwapResponse,
    /// Intent the run used
    pub intent: SwapIntent,
    /// How the intent was obtained
    pub analysis: AnalysisStatus,
    /// How retrieval ended
    pub retrieval: RetrievalStatus,
    /// How suggestions were produced
    pub ranking: RankingStatus,
}

/// The analyze, retrieve, rank pipeline
///
/// Holds no per-run data, so one instance can serve concurrent runs.
pub struct SubstitutionPipeline {
    stages: Vec<Box<dyn SwapStage>>,
}

impl Default for SubstitutionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SubstitutionPipeline {
    /// Pipeline with the standard stage order
    #[must_use]
    pub fn new() -> Self {
        Self {
            stages: vec![
                Box::new(AnalyzeStage),
                Box::new(RetrieveStage),
                Box::new(RankStage),
            ],
        }
    }

    /// Serve one swap request
    pub async fn run(&self, context: &SwapContext, request: &SwapRequest) -> SwapResponse {
        self.run_with_report(context, request).await.response
    }

    /// Serve one swap request and report per-stage statuses
    #[instrument(
        skip(self, context, request),
        fields(user_id = %request.user_id, exercise = %request.current_exercise.name)
    )]
    pub async fn run_with_report(&self, context: &SwapContext, request: &SwapRequest) -> SwapReport {
        if let Err(e) = request.validate() {
            warn!(error = %e, "Rejected swap request");
            return rejected(request, &e.message);
        }

        let mut state = SwapState::new(request.clone());
        for stage in &self.stages {
            state.enter(stage.stage());
            debug!(stage = stage.stage().as_str(), "Swap stage started");
            let update = stage.run(context, &state).await;
            state.apply(update);
        }
        state.enter(PipelineStage::Done);

        let report = SwapReport {
            response: state.to_response(),
            intent: state.intent_or_default(),
            analysis: state.analysis.clone().unwrap_or(AnalysisStatus::Parsed),
            retrieval: state.retrieval.clone().unwrap_or(RetrievalStatus::Empty),
            ranking: state.ranking.clone().unwrap_or(RankingStatus::NoCandidates),
        };
        info!(
            suggestions = report.response.suggestions.len(),
            analysis = ?report.analysis,
            retrieval = ?report.retrieval,
            ranking = ?report.ranking,
            degraded = report.response.error.is_some(),
            "Swap request completed"
        );
        report
    }
}

/// Report for a request that failed validation; no collaborator is called
fn rejected(request: &SwapRequest, reason: &str) -> SwapReport {
    let name = request.current_exercise.name.trim();
    let name = if name.is_empty() { "this exercise" } else { name };
    SwapReport {
        response: SwapResponse {
            suggestions: Vec::new(),
            message: messages::no_alternatives(name),
            error: Some(format!("invalid request: {reason}")),
        },
        intent: SwapIntent::default_for(&request.current_exercise),
        analysis: AnalysisStatus::Defaulted {
            reason: reason.to_owned(),
        },
        retrieval: RetrievalStatus::Failed {
            reason: reason.to_owned(),
        },
        ranking: RankingStatus::NoCandidates,
    }
}
