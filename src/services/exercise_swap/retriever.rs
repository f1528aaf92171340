// ABOUTME: Candidate retriever: semantic search over the exercise index plus deterministic filters
// ABOUTME: Drops the current exercise, duplicates, avoided names, off-target muscles, and unsafe or unavailable gear
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use super::state::{RetrievalOutcome, RetrievalStatus};
use crate::context::SwapContext;
use crate::errors::AppResult;
use crate::intelligence::{normalize, EquipmentPolicy, InjuryPolicy, MuscleCategory};
use crate::models::{Candidate, ExerciseDocument, SwapIntent, SwapReason, SwapRequest};
use crate::vector::VectorMatch;

/// Build the free-text query embedded for the similarity search
#[must_use]
pub fn build_query(request: &SwapRequest, intent: &SwapIntent) -> String {
    let mut parts = vec![format!(
        "Alternative to {}",
        request.current_exercise.name.trim()
    )];
    if let Some(target) = &intent.target_muscle_group {
        parts.push(format!("Target muscle: {target}"));
    }
    let message = request.message.trim();
    if !message.is_empty() {
        parts.push(message.to_owned());
    }
    parts.push(reason_phrase(intent.reason).to_owned());
    parts.join(". ")
}

const fn reason_phrase(reason: SwapReason) -> &'static str {
    match reason {
        SwapReason::Equipment => "exercises with different equipment",
        SwapReason::Injury => "safe exercises that avoid injury",
        SwapReason::Difficulty => "exercises with different difficulty level",
        SwapReason::Variety | SwapReason::Preference | SwapReason::Other => {
            "similar alternative exercises"
        }
    }
}

/// Retrieve and filter candidates for `request` under `intent`.
///
/// Never fails: an embedding or index error yields an empty list with a
/// [`RetrievalStatus::Failed`] status.
#[instrument(skip_all, fields(user_id = %request.user_id))]
pub async fn retrieve(
    context: &SwapContext,
    request: &SwapRequest,
    intent: &SwapIntent,
) -> RetrievalOutcome {
    let matches = match search(context, request, intent).await {
        Ok(matches) => matches,
        Err(e) => {
            warn!(
                user_id = %request.user_id,
                error = %e,
                "Candidate retrieval failed"
            );
            return RetrievalOutcome::failed(e.to_string());
        }
    };

    let candidates = filter_candidates(
        matches,
        request,
        intent,
        context.injury_policy(),
        context.config().max_candidates,
    );
    let status = if candidates.is_empty() {
        RetrievalStatus::Empty
    } else {
        RetrievalStatus::Found {
            count: candidates.len(),
        }
    };
    RetrievalOutcome { candidates, status }
}

async fn search(
    context: &SwapContext,
    request: &SwapRequest,
    intent: &SwapIntent,
) -> AppResult<Vec<VectorMatch>> {
    let query = build_query(request, intent);
    debug!(query = %query, "Embedding swap query");
    let embedding = context.embeddings().embed(&query).await?;
    context
        .index()
        .query(&embedding, context.config().retrieval_top_k, None)
        .await
}

/// Apply the deterministic filters, in order, to raw index matches.
///
/// Candidates come out most similar first, unique under name normalization,
/// and capped at `max_candidates`.
#[must_use]
pub fn filter_candidates(
    matches: Vec<VectorMatch>,
    request: &SwapRequest,
    intent: &SwapIntent,
    injuries: &InjuryPolicy,
    max_candidates: usize,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = matches
        .into_iter()
        .map(|m| {
            Candidate::new(
                ExerciseDocument::new(m.id, m.metadata),
                Candidate::similarity_from_distance(m.distance),
            )
        })
        .collect();
    // Stable, so equal scores keep index order
    candidates.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    let retrieved = candidates.len();

    let current = normalize(&request.current_exercise.name);
    let avoided: HashSet<String> = request
        .avoided_exercises
        .iter()
        .map(|name| normalize(name))
        .collect();
    let target = intent
        .target_muscle_group
        .as_deref()
        .map(MuscleCategory::categorize)
        .filter(MuscleCategory::is_known);
    let equipment = EquipmentPolicy::new(
        &request.user_equipment,
        intent.equipment_constraint.as_ref(),
    );

    let mut seen = HashSet::new();
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| {
            let name = normalize(c.name());
            name != current && !avoided.contains(&name) && seen.insert(name)
        })
        .filter(|c| target.is_none_or(|target| candidate_category(c) == target))
        .filter(|c| !equipment.excluded(c.exercise.equipment()))
        .filter(|c| equipment.available(c.exercise.equipment()))
        .filter(|c| !injuries.contraindicated(c.name(), &request.user_injuries))
        .take(max_candidates)
        .collect();

    debug!(
        retrieved,
        kept = kept.len(),
        target = target.map_or("any", |t| t.as_str()),
        "Filtered swap candidates"
    );
    kept
}

/// Category from the target muscle, falling back to the body part
fn candidate_category(candidate: &Candidate) -> MuscleCategory {
    let metadata = &candidate.exercise.metadata;
    let by_muscle = MuscleCategory::categorize(&metadata.target_muscle);
    if by_muscle.is_known() {
        by_muscle
    } else {
        MuscleCategory::categorize(&metadata.body_part)
    }
}
