// ABOUTME: End-to-end tests for the analyze, retrieve, rank substitution pipeline
// ABOUTME: Output guarantees, degraded paths, request validation, stage statuses, and concurrent runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use common::{
    bench_press_request, corpus_index, current_exercise, fixed_context, init_test_logging,
    intent_json, ordered_matches, overhead_press_request, ranked_json, swap_context,
    FailingEmbeddings, FailingLlm, ScriptedLlm,
};
use exercise_swap::config::SwapConfig;
use exercise_swap::constants::messages::SIMILARITY_FALLBACK_MESSAGE;
use exercise_swap::context::SwapContext;
use exercise_swap::intelligence::{normalize, InjuryPolicy, MuscleCategory};
use exercise_swap::models::{SwapReason, SwapRequest, SwapResponse};
use exercise_swap::services::exercise_swap::{
    AnalysisStatus, RankingStatus, RetrievalStatus, SubstitutionPipeline,
};
use uuid::Uuid;

const CHEST_RANKING: &[&str] = &[
    "Push Up",
    "Cable Fly",
    "Dumbbell Fly",
    "Barbell Bench Press",
    "Chest Dip",
    "Floor Press",
    "Band Chest Press",
    "Incline Push-Up",
];

fn no_dumbbells_llm() -> ScriptedLlm {
    ScriptedLlm::new()
        .analyze_reply(intent_json(
            "equipment",
            Some(&["no dumbbells"]),
            Some("chest"),
        ))
        .rank_reply(ranked_json(CHEST_RANKING, "Here are some dumbbell-free options"))
}

/// Guarantees every response must hold regardless of collaborator behaviour
fn assert_well_formed(response: &SwapResponse, request: &SwapRequest) {
    assert!(response.suggestions.len() <= 5);
    assert!(!response.message.trim().is_empty());

    let current = normalize(&request.current_exercise.name);
    let avoided: HashSet<String> = request
        .avoided_exercises
        .iter()
        .map(|name| normalize(name))
        .collect();
    let mut seen = HashSet::new();
    for suggestion in &response.suggestions {
        let name = normalize(suggestion.name());
        assert_ne!(name, current, "current exercise suggested");
        assert!(!avoided.contains(&name), "avoided exercise {name} suggested");
        assert!(seen.insert(name.clone()), "duplicate suggestion {name}");
    }
}

#[tokio::test]
async fn test_equipment_swap_respects_every_filter() {
    let llm = Arc::new(no_dumbbells_llm());
    let context = swap_context(llm.clone());
    let mut request = bench_press_request("I don't have dumbbells today");
    request.avoided_exercises.insert("Incline Push-Up".to_owned());

    let response = SubstitutionPipeline::new().run(&context, &request).await;

    assert_well_formed(&response, &request);
    assert_eq!(response.suggestions.len(), 5);
    assert!(response.error.is_none());
    assert_eq!(response.message, "Here are some dumbbell-free options");
    for suggestion in &response.suggestions {
        assert!(!suggestion.equipment().contains("dumbbell"));
        assert_eq!(
            MuscleCategory::categorize(&suggestion.candidate.exercise.metadata.target_muscle),
            MuscleCategory::Chest
        );
    }
    assert_eq!(llm.analyze_calls(), 1);
    assert_eq!(llm.rank_calls(), 1);
}

#[tokio::test]
async fn test_report_statuses_for_clean_run() {
    let context = swap_context(Arc::new(no_dumbbells_llm()));
    let request = bench_press_request("I don't have dumbbells today");

    let report = SubstitutionPipeline::new()
        .run_with_report(&context, &request)
        .await;

    assert_eq!(report.analysis, AnalysisStatus::Parsed);
    assert_eq!(report.intent.reason, SwapReason::Equipment);
    // Chest entries minus the current exercise, one duplicate, and three dumbbell moves
    assert_eq!(report.retrieval, RetrievalStatus::Found { count: 7 });
    assert_eq!(report.ranking, RankingStatus::Ranked { count: 5 });
    assert!(report.response.error.is_none());
}

#[tokio::test]
async fn test_shoulder_injury_never_suggests_unsafe_movements() {
    let llm = Arc::new(
        ScriptedLlm::new().analyze_reply(intent_json("injury", None, Some("shoulders"))),
    );
    let context = swap_context(llm);
    let mut request = overhead_press_request("my shoulder hurts when I press");
    request.user_injuries.insert("shoulder pain".to_owned());

    let report = SubstitutionPipeline::new()
        .run_with_report(&context, &request)
        .await;
    let response = &report.response;

    assert_well_formed(response, &request);
    assert!(!response.suggestions.is_empty());
    let policy = InjuryPolicy::default();
    for suggestion in &response.suggestions {
        let lowered = suggestion.name().to_lowercase();
        for unsafe_name in [
            "overhead press",
            "lateral raise",
            "upright row",
            "shoulder press",
            "arnold",
        ] {
            assert!(!lowered.contains(unsafe_name), "{lowered} is unsafe");
        }
        assert!(!policy.contraindicated(suggestion.name(), &request.user_injuries));
    }
    // Ranker was down, so the safe candidates come back by similarity
    assert!(matches!(report.ranking, RankingStatus::Fallback { .. }));
    assert_eq!(response.message, SIMILARITY_FALLBACK_MESSAGE);
    assert!(response
        .error
        .as_deref()
        .is_some_and(|e| e.contains("ranking fell back to similarity")));
}

#[tokio::test]
async fn test_no_candidates_skips_ranking_call() {
    let llm = Arc::new(
        ScriptedLlm::new()
            .analyze_reply(intent_json("variety", None, Some("chest")))
            .rank_reply(ranked_json(&["Goblet Squat"], "ok")),
    );
    let context = fixed_context(
        llm.clone(),
        ordered_matches(&["Goblet Squat", "Wall Sit", "Barbell Bench Press"]),
    );
    let request = bench_press_request("something else");

    let report = SubstitutionPipeline::new()
        .run_with_report(&context, &request)
        .await;

    assert_eq!(report.retrieval, RetrievalStatus::Empty);
    assert_eq!(report.ranking, RankingStatus::NoCandidates);
    assert!(report.response.suggestions.is_empty());
    assert!(report
        .response
        .message
        .contains("couldn't find any suitable alternatives"));
    assert!(report.response.error.is_none());
    assert_eq!(llm.rank_calls(), 0);
}

#[tokio::test]
async fn test_ranker_failure_falls_back() {
    let llm = Arc::new(
        ScriptedLlm::new().analyze_reply(intent_json("variety", None, Some("chest"))),
    );
    let context = swap_context(llm.clone());
    let request = bench_press_request("mix it up");

    let response = SubstitutionPipeline::new().run(&context, &request).await;

    assert_well_formed(&response, &request);
    assert_eq!(response.suggestions.len(), 5);
    assert_eq!(response.message, SIMILARITY_FALLBACK_MESSAGE);
    assert!(response
        .suggestions
        .iter()
        .all(|s| s.reason == "Similar exercise targeting the same muscle group (chest)"));
    assert!(response.error.is_some());
    assert_eq!(llm.rank_calls(), 1);
}

#[tokio::test]
async fn test_total_degradation_still_returns_response() {
    init_test_logging();
    let context = SwapContext::new(
        Arc::new(FailingLlm),
        Arc::new(FailingEmbeddings),
        Arc::new(corpus_index()),
        SwapConfig::default(),
    );
    let request = bench_press_request("my shoulder hurts");

    let report = SubstitutionPipeline::new()
        .run_with_report(&context, &request)
        .await;

    assert_well_formed(&report.response, &request);
    assert!(report.response.suggestions.is_empty());
    assert!(report.response.message.contains("Barbell Bench Press"));
    assert!(matches!(report.analysis, AnalysisStatus::Defaulted { .. }));
    assert!(matches!(report.retrieval, RetrievalStatus::Failed { .. }));
    assert_eq!(report.ranking, RankingStatus::NoCandidates);

    let error = report.response.error.unwrap();
    assert!(error.contains("intent analysis defaulted"));
    assert!(error.contains("candidate retrieval failed"));
}

#[tokio::test]
async fn test_invalid_request_is_rejected_without_calls() {
    let llm = Arc::new(no_dumbbells_llm());
    let context = swap_context(llm.clone());
    let request = SwapRequest::new(
        Uuid::new_v4(),
        current_exercise("   ", "chest", "barbell"),
        "swap this",
    );

    let report = SubstitutionPipeline::new()
        .run_with_report(&context, &request)
        .await;

    assert!(report.response.suggestions.is_empty());
    assert!(report.response.message.contains("this exercise"));
    assert!(report
        .response
        .error
        .as_deref()
        .is_some_and(|e| e.starts_with("invalid request")));
    assert_eq!(report.ranking, RankingStatus::NoCandidates);
    assert_eq!(llm.analyze_calls(), 0);
    assert_eq!(llm.rank_calls(), 0);
}

#[tokio::test]
async fn test_response_serializes_without_empty_error() -> Result<()> {
    let context = swap_context(Arc::new(no_dumbbells_llm()));
    let response = SubstitutionPipeline::new()
        .run(&context, &bench_press_request("no dumbbells"))
        .await;

    let value = serde_json::to_value(&response)?;
    assert!(value.get("error").is_none());
    assert_eq!(value["suggestions"].as_array().map(Vec::len), Some(5));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_runs_share_one_pipeline() -> Result<()> {
    let llm = Arc::new(no_dumbbells_llm());
    let context = Arc::new(swap_context(llm.clone()));
    let pipeline = Arc::new(SubstitutionPipeline::new());

    let mut handles = Vec::new();
    for i in 0..8 {
        let context = Arc::clone(&context);
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            let request = bench_press_request(&format!("run {i}: I don't have dumbbells"));
            let response = pipeline.run(&context, &request).await;
            (request, response)
        }));
    }

    let mut first_names: Option<Vec<String>> = None;
    for handle in handles {
        let (request, response) = handle.await?;
        assert_well_formed(&response, &request);
        let names: Vec<String> = response
            .suggestions
            .iter()
            .map(|s| s.name().to_owned())
            .collect();
        match &first_names {
            Some(expected) => assert_eq!(&names, expected),
            None => first_names = Some(names),
        }
    }

    assert_eq!(llm.analyze_calls(), 8);
    assert_eq!(llm.rank_calls(), 8);
    Ok(())
}
