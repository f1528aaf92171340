// ABOUTME: Best-effort lookup of demonstration assets (images, gifs) by exercise name
// ABOUTME: MediaLookup trait, an in-memory table, and name resolution for suggestions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Media Lookup
//!
//! Asset URLs decorate suggestions and never gate them: a failed lookup
//! leaves `asset_url` unset.

mod cache;

pub use cache::CachedMediaLookup;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::intelligence::normalize;

/// Exercise media table
#[async_trait]
pub trait MediaLookup: Send + Sync {
    /// Return the asset URL for every requested name that has one.
    /// Names without an asset are simply absent from the map.
    async fn get_assets(&self, names: &[String]) -> AppResult<HashMap<String, String>>;
}

#[async_trait]
impl<T: MediaLookup + ?Sized> MediaLookup for Arc<T> {
    async fn get_assets(&self, names: &[String]) -> AppResult<HashMap<String, String>> {
        (**self).get_assets(names).await
    }
}

/// Static in-memory media table keyed by exercise name
///
/// Requested names are resolved with [`resolve_asset`] and returned under
/// the name that was asked for.
#[derive(Debug, Clone, Default)]
pub struct StaticMediaLookup {
    assets: HashMap<String, String>,
}

impl StaticMediaLookup {
    /// Build from `(exercise name, asset url)` pairs
    pub fn new<I, N, U>(assets: I) -> Self
    where
        I: IntoIterator<Item = (N, U)>,
        N: Into<String>,
        U: Into<String>,
    {
        Self {
            assets: assets
                .into_iter()
                .map(|(name, url)| (name.into(), url.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl MediaLookup for StaticMediaLookup {
    async fn get_assets(&self, names: &[String]) -> AppResult<HashMap<String, String>> {
        Ok(names
            .iter()
            .filter_map(|name| {
                resolve_asset(name, &self.assets).map(|url| (name.clone(), url.to_owned()))
            })
            .collect())
    }
}

/// Pick the asset for `name` from a lookup result: exact key, then the
/// first key (in sorted order) with the same normalized name
///
/// Merely similar names never match.
#[must_use]
pub fn resolve_asset<'a>(name: &str, assets: &'a HashMap<String, String>) -> Option<&'a str> {
    if let Some(url) = assets.get(name) {
        return Some(url);
    }

    let wanted = normalize(name);
    let mut keys: Vec<&String> = assets.keys().collect();
    keys.sort();

    keys.into_iter()
        .find(|key| normalize(key) == wanted)
        .and_then(|key| assets.get(key))
        .map(String::as_str)
}
