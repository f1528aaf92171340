// ABOUTME: Prompt templates for the exercise swap intent analyzer and suggestion ranker
// ABOUTME: Strict JSON-only instructions plus user prompts rendered from request context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Swap Prompts
//!
//! Both prompts demand a single JSON object so the reply can go through
//! [`extract_json_object`](super::extract_json_object).

use std::fmt::Write;

use crate::models::{Candidate, CurrentExercise, SwapIntent};

/// System prompt for intent extraction
pub const ANALYZER_SYSTEM_PROMPT: &str = r#"You analyze why a user wants to swap an exercise in their workout.
Respond with ONLY a JSON object, no prose, using exactly these keys:
{
  "swap_reason": "equipment" | "injury" | "difficulty" | "variety" | "preference" | "other",
  "equipment_constraint": ["no dumbbells"] or null,
  "difficulty_preference": "easier" | "similar" | "harder" | null,
  "target_muscle_group": "muscle group the replacement should train" or null
}
Phrase equipment constraints the way the user did, for example "no barbell" or "without machines".
If the user does not name a muscle group, use the current exercise's muscle group."#;

/// System prompt for suggestion ranking
pub const RANKER_SYSTEM_PROMPT: &str = r#"You are a strength coach choosing replacement exercises.
Pick the best alternatives ONLY from the candidate list you are given.
Copy each exercise name EXACTLY as written in the list. Never invent exercises.
Respond with ONLY a JSON object:
{
  "suggestions": [
    {"name": "exact name from the list", "reason": "why it fits the request", "tip": "one coaching cue"}
  ],
  "message": "short friendly message for the user"
}"#;

/// User prompt for intent extraction
#[must_use]
pub fn analyzer_user_prompt(message: &str, current: &CurrentExercise) -> String {
    let mut prompt = format!(
        "Current exercise: {}\nMuscle group: {}\nEquipment: {}\n",
        current.name,
        display_or_unknown(&current.muscle_group),
        display_or_unknown(&current.equipment),
    );
    if let Some(sets) = current.sets {
        let _ = writeln!(prompt, "Sets: {sets}");
    }
    if let Some(reps) = &current.reps {
        let _ = writeln!(prompt, "Reps: {reps}");
    }
    let _ = write!(prompt, "\nUser message: \"{message}\"");
    prompt
}

/// Render one candidate line: `name (Equipment: …, Muscle: …)`
#[must_use]
pub fn candidate_line(candidate: &Candidate) -> String {
    format!(
        "{} (Equipment: {}, Muscle: {})",
        candidate.name(),
        display_or_unknown(candidate.exercise.equipment()),
        display_or_unknown(candidate.exercise.muscle()),
    )
}

/// Context shared by the ranking prompt
pub struct RankingPromptContext<'a> {
    /// Exercise being replaced
    pub current: &'a CurrentExercise,
    /// Resolved intent
    pub intent: &'a SwapIntent,
    /// Reported injuries
    pub injuries: Vec<&'a str>,
    /// Training experience
    pub fitness_level: &'a str,
    /// Maximum suggestions the model may return
    pub max_suggestions: usize,
}

/// User prompt for suggestion ranking over the shown candidates
#[must_use]
pub fn ranker_user_prompt(context: &RankingPromptContext<'_>, shown: &[Candidate]) -> String {
    let mut prompt = format!(
        "Replace: {} ({})\nSwap reason: {}\n",
        context.current.name,
        display_or_unknown(&context.current.muscle_group),
        context.intent.reason,
    );
    if let Some(target) = &context.intent.target_muscle_group {
        let _ = writeln!(prompt, "Target muscle group: {target}");
    }
    if let Some(difficulty) = context.intent.difficulty_preference {
        let _ = writeln!(prompt, "Difficulty preference: {}", difficulty.as_str());
    }
    if let Some(constraints) = &context.intent.equipment_constraint {
        let _ = writeln!(prompt, "Equipment constraints: {}", constraints.join(", "));
    }
    let injuries = if context.injuries.is_empty() {
        "none reported".to_owned()
    } else {
        context.injuries.join(", ")
    };
    let _ = writeln!(prompt, "Injuries: {injuries}");
    let _ = writeln!(prompt, "Fitness level: {}", context.fitness_level);

    let _ = writeln!(prompt, "\nCandidates:");
    for candidate in shown {
        let _ = writeln!(prompt, "- {}", candidate_line(candidate));
    }
    let _ = write!(
        prompt,
        "\nSelect at most {} exercises from the candidates above.",
        context.max_suggestions
    );
    prompt
}

fn display_or_unknown(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "unknown"
    } else {
        trimmed
    }
}
