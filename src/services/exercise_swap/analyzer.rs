// ABOUTME: Request analyzer turning a free-text swap message into a structured SwapIntent
// ABOUTME: One JSON-mode LLM call; any failure degrades to the context-derived default intent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::state::{AnalysisOutcome, AnalysisStatus};
use crate::context::SwapContext;
use crate::errors::AppResult;
use crate::llm::{parse_json_object, prompts, ChatRequest};
use crate::models::{CurrentExercise, DifficultyPreference, SwapIntent, SwapReason, SwapRequest};

/// Raw analyzer reply; every field is optional and loosely typed
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IntentReply {
    swap_reason: Option<String>,
    equipment_constraint: Value,
    difficulty_preference: Option<String>,
    target_muscle_group: Option<String>,
}

/// Extract the swap intent for `request`.
///
/// Never fails: an LLM error or an unparseable reply yields
/// [`SwapIntent::default_for`] with an [`AnalysisStatus::Defaulted`] status.
#[instrument(skip_all, fields(user_id = %request.user_id))]
pub async fn analyze(context: &SwapContext, request: &SwapRequest) -> AnalysisOutcome {
    match request_intent(context, request).await {
        Ok(intent) => {
            debug!(
                reason = %intent.reason,
                target = intent.target_muscle_group.as_deref().unwrap_or("none"),
                "Swap intent extracted"
            );
            AnalysisOutcome {
                intent,
                status: AnalysisStatus::Parsed,
            }
        }
        Err(e) => {
            warn!(
                user_id = %request.user_id,
                provider = context.llm().name(),
                error = %e,
                "Intent analysis failed, using default intent"
            );
            AnalysisOutcome {
                intent: SwapIntent::default_for(&request.current_exercise),
                status: AnalysisStatus::Defaulted {
                    reason: e.to_string(),
                },
            }
        }
    }
}

async fn request_intent(context: &SwapContext, request: &SwapRequest) -> AppResult<SwapIntent> {
    let config = context.config();
    let chat = ChatRequest::from_prompts(
        prompts::ANALYZER_SYSTEM_PROMPT,
        prompts::analyzer_user_prompt(&request.message, &request.current_exercise),
    )
    .with_model(context.model())
    .with_temperature(config.analyzer_temperature)
    .with_max_tokens(config.analyzer_max_tokens)
    .with_json_mode();

    let response = context.llm().complete(&chat).await?;
    let reply: IntentReply = parse_json_object(&response.content)?;
    Ok(intent_from_reply(reply, &request.current_exercise))
}

/// Convert a loosely typed reply into an intent, filling gaps from the current exercise
fn intent_from_reply(reply: IntentReply, current: &CurrentExercise) -> SwapIntent {
    let reason = reply
        .swap_reason
        .as_deref()
        .map_or(SwapReason::Other, SwapReason::from_str_lossy);

    let target_muscle_group = reply
        .target_muscle_group
        .as_deref()
        .and_then(non_blank)
        .or_else(|| non_blank(&current.muscle_group));

    SwapIntent {
        reason,
        equipment_constraint: constraint_list(&reply.equipment_constraint),
        difficulty_preference: reply
            .difficulty_preference
            .as_deref()
            .and_then(DifficultyPreference::parse),
        target_muscle_group,
    }
}

/// Accept a single string or a list of strings; anything else means no constraint
fn constraint_list(value: &Value) -> Option<Vec<String>> {
    let constraints: Vec<String> = match value {
        Value::String(single) => vec![single.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => return None,
    };
    let constraints: Vec<String> = constraints
        .into_iter()
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
        .collect();
    (!constraints.is_empty()).then_some(constraints)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
