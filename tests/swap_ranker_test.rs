// ABOUTME: Tests for the suggestion ranker stage of the swap pipeline
// ABOUTME: Name validation, similarity fallback, prompt bounds, and best-effort media decoration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{
    bench_press_request, corpus, ranked_json, swap_context, CountingMediaLookup, FailingLlm,
    ScriptedLlm,
};
use exercise_swap::constants::messages::{
    DEFAULT_RANKED_MESSAGE, GENERIC_TIP, SIMILARITY_FALLBACK_MESSAGE,
};
use exercise_swap::media::StaticMediaLookup;
use exercise_swap::models::{Candidate, SwapIntent, Suggestion};
use exercise_swap::services::exercise_swap::{rank, RankingStatus};
use serde_json::json;

/// Fixture corpus entries as candidates, most similar first
fn candidates(count: usize) -> Vec<Candidate> {
    corpus()
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, document)| Candidate::new(document, (i as f32).mul_add(-0.01, 0.95)))
        .collect()
}

fn chest_intent() -> SwapIntent {
    SwapIntent::default_for(&bench_press_request("").current_exercise)
}

fn names(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(Suggestion::name).collect()
}

#[tokio::test]
async fn test_no_candidates_skips_llm() {
    let llm = Arc::new(ScriptedLlm::new().rank_reply(ranked_json(&["Push Up"], "ok")));
    let context = swap_context(llm.clone());
    let request = bench_press_request("swap please");

    let outcome = rank(&context, &request, &chest_intent(), &[]).await;

    assert_eq!(outcome.status, RankingStatus::NoCandidates);
    assert!(outcome.suggestions.is_empty());
    assert!(outcome
        .message
        .contains("couldn't find any suitable alternatives for Barbell Bench Press"));
    assert_eq!(llm.rank_calls(), 0);
}

#[tokio::test]
async fn test_ranked_names_are_validated_against_candidates() {
    let reply = ranked_json(
        &["cable fly", " Push Up ", "Cable Fly", "Deadlift"],
        "Great picks for a chest day",
    );
    let llm = Arc::new(ScriptedLlm::new().rank_reply(reply));
    let context = swap_context(llm.clone());
    let request = bench_press_request("something new");

    let outcome = rank(&context, &request, &chest_intent(), &candidates(12)).await;

    assert_eq!(outcome.status, RankingStatus::Ranked { count: 2 });
    assert_eq!(names(&outcome.suggestions), ["Cable Fly", "Push Up"]);
    assert_eq!(outcome.message, "Great picks for a chest day");
    assert_eq!(outcome.suggestions[0].reason, "cable fly fits your request");
    assert_eq!(outcome.suggestions[0].tip, "Keep your core braced");
    assert_eq!(llm.rank_calls(), 1);
}

#[tokio::test]
async fn test_blank_message_reason_and_tip_get_defaults() {
    let reply = json!({
        "suggestions": [{ "name": "Chest Dip", "reason": " ", "tip": "" }],
        "message": "   ",
    })
    .to_string();
    let context = swap_context(Arc::new(ScriptedLlm::new().rank_reply(reply)));

    let outcome = rank(
        &context,
        &bench_press_request(""),
        &chest_intent(),
        &candidates(12),
    )
    .await;

    assert_eq!(outcome.message, DEFAULT_RANKED_MESSAGE);
    assert_eq!(
        outcome.suggestions[0].reason,
        "Similar exercise targeting the same muscle group (chest)"
    );
    assert_eq!(outcome.suggestions[0].tip, GENERIC_TIP);
}

#[tokio::test]
async fn test_ranked_suggestions_capped_at_five() {
    let reply = ranked_json(
        &[
            "Push Up",
            "Cable Fly",
            "Chest Dip",
            "Floor Press",
            "Svend Press",
            "Dumbbell Fly",
            "Band Chest Press",
        ],
        "Lots of options",
    );
    let context = swap_context(Arc::new(ScriptedLlm::new().rank_reply(reply)));

    let outcome = rank(
        &context,
        &bench_press_request(""),
        &chest_intent(),
        &candidates(12),
    )
    .await;

    assert_eq!(outcome.status, RankingStatus::Ranked { count: 5 });
    assert_eq!(
        names(&outcome.suggestions),
        ["Push Up", "Cable Fly", "Chest Dip", "Floor Press", "Svend Press"]
    );
}

#[tokio::test]
async fn test_hallucinated_names_fall_back_to_similarity() {
    let reply = ranked_json(&["Deadlift", "Kettlebell Swing"], "Try these");
    let context = swap_context(Arc::new(ScriptedLlm::new().rank_reply(reply)));

    let outcome = rank(
        &context,
        &bench_press_request(""),
        &chest_intent(),
        &candidates(12),
    )
    .await;

    assert_eq!(outcome.message, SIMILARITY_FALLBACK_MESSAGE);
    assert_eq!(outcome.suggestions.len(), 5);
    match &outcome.status {
        RankingStatus::Fallback { reason } => {
            assert!(reason.contains("none of the 2 ranked names"));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn test_llm_error_falls_back_to_top_five_by_similarity() {
    let pool = candidates(12);
    let context = swap_context(Arc::new(FailingLlm));

    let outcome = rank(&context, &bench_press_request(""), &chest_intent(), &pool).await;

    assert!(matches!(outcome.status, RankingStatus::Fallback { .. }));
    assert_eq!(outcome.message, SIMILARITY_FALLBACK_MESSAGE);
    let expected: Vec<&str> = pool.iter().take(5).map(Candidate::name).collect();
    assert_eq!(names(&outcome.suggestions), expected);
    for suggestion in &outcome.suggestions {
        assert_eq!(
            suggestion.reason,
            "Similar exercise targeting the same muscle group (chest)"
        );
        assert_eq!(suggestion.tip, GENERIC_TIP);
        assert!(suggestion.asset_url.is_none());
    }
}

#[tokio::test]
async fn test_prompt_shows_at_most_twenty_candidates() {
    let pool = candidates(33);
    // "Plank" is the last fixture entry, beyond the shown candidates
    let llm = Arc::new(ScriptedLlm::new().rank_reply(ranked_json(&["Plank"], "Core time")));
    let context = swap_context(llm.clone());

    let outcome = rank(&context, &bench_press_request(""), &chest_intent(), &pool).await;

    let prompt = llm.last_rank_prompt().unwrap();
    let listed = prompt.lines().filter(|line| line.starts_with("- ")).count();
    assert_eq!(listed, 20);
    assert!(prompt.contains("- Barbell Bench Press (Equipment: barbell, Muscle: pectorals)"));
    assert!(!prompt.contains("- Plank"));
    assert!(matches!(outcome.status, RankingStatus::Fallback { .. }));
}

#[tokio::test]
async fn test_ranker_request_parameters() {
    let llm = Arc::new(ScriptedLlm::new().rank_reply(ranked_json(&["Push Up"], "ok")));
    let context = swap_context(llm.clone());
    let mut request = bench_press_request("my wrist is sore");
    request.user_injuries.insert("sore wrist".to_owned());

    rank(&context, &request, &chest_intent(), &candidates(5)).await;

    let requests = llm.requests();
    let chat = requests.last().unwrap();
    assert!(chat.json_mode);
    assert!(chat
        .temperature
        .is_some_and(|t| (t - 0.3).abs() < f32::EPSILON));
    assert_eq!(chat.max_tokens, Some(1000));

    let prompt = llm.last_rank_prompt().unwrap();
    assert!(prompt.contains("Injuries: sore wrist"));
    assert!(prompt.contains("Fitness level: intermediate"));
    assert!(prompt.contains("Select at most 5 exercises"));
}

#[tokio::test]
async fn test_media_assets_are_attached() {
    let llm = Arc::new(ScriptedLlm::new().rank_reply(ranked_json(&["Cable Fly", "Push Up"], "ok")));
    let context = swap_context(llm).with_media(Arc::new(StaticMediaLookup::new([(
        "Cable Fly",
        "https://cdn.example/cable-fly.gif",
    )])));

    let outcome = rank(
        &context,
        &bench_press_request(""),
        &chest_intent(),
        &candidates(12),
    )
    .await;

    assert_eq!(
        outcome.suggestions[0].asset_url.as_deref(),
        Some("https://cdn.example/cable-fly.gif")
    );
    assert!(outcome.suggestions[1].asset_url.is_none());
}

#[tokio::test]
async fn test_media_failure_is_not_fatal() {
    let media = Arc::new(CountingMediaLookup::failing());
    let llm = Arc::new(ScriptedLlm::new().rank_reply(ranked_json(&["Cable Fly"], "ok")));
    let context = swap_context(llm).with_media(media.clone());

    let outcome = rank(
        &context,
        &bench_press_request(""),
        &chest_intent(),
        &candidates(12),
    )
    .await;

    assert_eq!(media.calls(), 1);
    assert_eq!(outcome.status, RankingStatus::Ranked { count: 1 });
    assert!(outcome.suggestions[0].asset_url.is_none());
}
