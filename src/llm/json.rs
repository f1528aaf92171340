// ABOUTME: Tolerant extraction of a JSON object from free-form LLM output
// ABOUTME: Fenced block, then outermost braces, then failure; shared by both LLM stages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::de::DeserializeOwned;

use crate::errors::{AppError, AppResult};

const FENCE: &str = "```";

/// Locate the JSON object inside an LLM reply.
///
/// 1. If a Markdown code fence is present, only its body is considered
///    (an optional language tag such as `json` on the opening line is skipped).
/// 2. The substring from the first `{` to the last `}` inclusive is returned.
/// 3. Anything else is `InvalidFormat`.
///
/// # Errors
///
/// Returns `InvalidFormat` when no brace-delimited object can be found.
pub fn extract_json_object(text: &str) -> AppResult<&str> {
    let scope = fenced_body(text).unwrap_or(text);

    let start = scope.find('{');
    let end = scope.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&scope[start..=end]),
        _ => Err(AppError::invalid_format(format!(
            "no JSON object found in LLM output ({} chars)",
            text.len()
        ))),
    }
}

/// Extract and deserialize the JSON object in an LLM reply
///
/// # Errors
///
/// Returns `InvalidFormat` when no object is found and `SerializationError`
/// when the object does not match `T`.
pub fn parse_json_object<T: DeserializeOwned>(text: &str) -> AppResult<T> {
    let object = extract_json_object(text)?;
    Ok(serde_json::from_str(object)?)
}

/// Body of the first fenced block, if the text contains one
fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];
    // Skip the language tag line (```json)
    let body_start = after_open.find('\n').map_or(0, |newline| {
        let tag = &after_open[..newline];
        if tag.trim().chars().all(char::is_alphanumeric) {
            newline + 1
        } else {
            0
        }
    });
    let body = &after_open[body_start..];
    let close = body.find(FENCE).unwrap_or(body.len());
    Some(&body[..close])
}
