// ABOUTME: Suggestion ranker asking the LLM to pick and explain alternatives from the candidate list
// ABOUTME: Rejects invented names, falls back to similarity order, and decorates results with media
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::state::{RankingOutcome, RankingStatus};
use crate::constants::messages;
use crate::context::SwapContext;
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{self, RankingPromptContext};
use crate::llm::{parse_json_object, ChatRequest};
use crate::media::resolve_asset;
use crate::models::{Candidate, Suggestion, SwapIntent, SwapRequest};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RankedReply {
    suggestions: Vec<RankedItem>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RankedItem {
    name: String,
    reason: String,
    tip: String,
}

/// Rank `candidates` into explained suggestions.
///
/// With no candidates the LLM is not called. Otherwise the top
/// `prompt_candidates` are shown to the model; names it returns are accepted
/// only when they match a shown candidate (trimmed, case-insensitive). An
/// LLM error or a reply with no valid names falls back to the top
/// `max_suggestions` candidates by similarity.
#[instrument(skip_all, fields(user_id = %request.user_id, candidates = candidates.len()))]
pub async fn rank(
    context: &SwapContext,
    request: &SwapRequest,
    intent: &SwapIntent,
    candidates: &[Candidate],
) -> RankingOutcome {
    if candidates.is_empty() {
        debug!("No candidates to rank");
        return RankingOutcome {
            suggestions: Vec::new(),
            message: messages::no_alternatives(&request.current_exercise.name),
            status: RankingStatus::NoCandidates,
        };
    }

    let config = context.config();
    let shown = &candidates[..candidates.len().min(config.prompt_candidates)];

    let mut outcome = match request_ranking(context, request, intent, shown).await {
        Ok((suggestions, message)) => {
            debug!(count = suggestions.len(), "LLM ranking accepted");
            RankingOutcome {
                status: RankingStatus::Ranked {
                    count: suggestions.len(),
                },
                suggestions,
                message,
            }
        }
        Err(e) => {
            warn!(
                user_id = %request.user_id,
                provider = context.llm().name(),
                error = %e,
                "Ranking failed, falling back to similarity order"
            );
            similarity_fallback(candidates, intent, config.max_suggestions, e.to_string())
        }
    };

    attach_media(context, &mut outcome.suggestions).await;
    outcome
}

async fn request_ranking(
    context: &SwapContext,
    request: &SwapRequest,
    intent: &SwapIntent,
    shown: &[Candidate],
) -> AppResult<(Vec<Suggestion>, String)> {
    let config = context.config();
    let prompt_context = RankingPromptContext {
        current: &request.current_exercise,
        intent,
        injuries: request.user_injuries.iter().map(String::as_str).collect(),
        fitness_level: request.user_fitness_level.as_str(),
        max_suggestions: config.max_suggestions,
    };
    let chat = ChatRequest::from_prompts(
        prompts::RANKER_SYSTEM_PROMPT,
        prompts::ranker_user_prompt(&prompt_context, shown),
    )
    .with_model(context.model())
    .with_temperature(config.ranker_temperature)
    .with_max_tokens(config.ranker_max_tokens)
    .with_json_mode();

    let response = context.llm().complete(&chat).await?;
    let reply: RankedReply = parse_json_object(&response.content)?;
    let returned = reply.suggestions.len();

    let suggestions = validate_suggestions(reply.suggestions, shown, config.max_suggestions);
    if suggestions.is_empty() {
        return Err(AppError::invalid_format(format!(
            "none of the {returned} ranked names matched a candidate"
        )));
    }
    if suggestions.len() < returned {
        debug!(
            returned,
            kept = suggestions.len(),
            "Dropped ranked names outside the candidate list"
        );
    }

    let message = reply
        .message
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| messages::DEFAULT_RANKED_MESSAGE.to_owned());
    Ok((suggestions, message))
}

/// Keep only names that exist among the shown candidates, each at most once
fn validate_suggestions(
    items: Vec<RankedItem>,
    shown: &[Candidate],
    max_suggestions: usize,
) -> Vec<Suggestion> {
    let mut used = HashSet::new();
    items
        .into_iter()
        .filter_map(|item| {
            let wanted = item.name.trim().to_lowercase();
            let index = shown
                .iter()
                .position(|c| c.name().trim().to_lowercase() == wanted)?;
            used.insert(index).then_some((index, item))
        })
        .take(max_suggestions)
        .map(|(index, item)| {
            let candidate = &shown[index];
            let reason = non_blank(&item.reason)
                .unwrap_or_else(|| messages::similarity_reason(fallback_muscle(candidate, None)));
            let tip = non_blank(&item.tip).unwrap_or_else(|| messages::GENERIC_TIP.to_owned());
            Suggestion::new(candidate.clone(), reason, tip)
        })
        .collect()
}

/// Top candidates by similarity with generic explanations
fn similarity_fallback(
    candidates: &[Candidate],
    intent: &SwapIntent,
    max_suggestions: usize,
    reason: String,
) -> RankingOutcome {
    let suggestions = candidates
        .iter()
        .take(max_suggestions)
        .map(|candidate| {
            let muscle = fallback_muscle(candidate, intent.target_muscle_group.as_deref());
            Suggestion::new(
                candidate.clone(),
                messages::similarity_reason(muscle),
                messages::GENERIC_TIP,
            )
        })
        .collect();
    RankingOutcome {
        suggestions,
        message: messages::SIMILARITY_FALLBACK_MESSAGE.to_owned(),
        status: RankingStatus::Fallback { reason },
    }
}

/// Body part for fallback reasons, then target muscle, then the intent target
fn fallback_muscle<'a>(candidate: &'a Candidate, target: Option<&'a str>) -> &'a str {
    let metadata = &candidate.exercise.metadata;
    [
        metadata.body_part.as_str(),
        metadata.target_muscle.as_str(),
        target.unwrap_or_default(),
    ]
    .into_iter()
    .map(str::trim)
    .find(|value| !value.is_empty())
    .unwrap_or("same muscles")
}

/// Best-effort asset decoration; lookup failures leave suggestions untouched
async fn attach_media(context: &SwapContext, suggestions: &mut [Suggestion]) {
    let Some(media) = context.media() else {
        return;
    };
    if suggestions.is_empty() {
        return;
    }

    let names: Vec<String> = suggestions.iter().map(|s| s.name().to_owned()).collect();
    match media.get_assets(&names).await {
        Ok(assets) => {
            for suggestion in suggestions.iter_mut() {
                suggestion.asset_url = resolve_asset(suggestion.name(), &assets).map(str::to_owned);
            }
        }
        Err(e) => warn!(error = %e, "Media lookup failed, returning suggestions without assets"),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
