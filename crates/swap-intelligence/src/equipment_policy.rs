// ABOUTME: Decides whether a candidate's equipment is usable for the requesting user
// ABOUTME: Composes general availability (inventory, full gym, bodyweight) with negation constraints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Phrases that turn a constraint into a forbidden-equipment token
const NEGATION_MARKERS: [&str; 3] = ["don't have ", "without ", "no "];

/// Equipment values that need nothing from the user's inventory
const BODYWEIGHT_VALUES: [&str; 4] = ["body weight", "bodyweight", "none", "no equipment"];

/// Inventory phrase that unlocks every equipment type
const FULL_GYM: &str = "full gym";

/// Equipment availability policy.
///
/// Two independent rules compose:
/// - general availability against the user's inventory
/// - negation constraints ("no dumbbells") from the swap intent
#[derive(Debug, Clone, Default)]
pub struct EquipmentPolicy {
    inventory: Vec<String>,
    forbidden: Vec<String>,
}

impl EquipmentPolicy {
    /// Build a policy from the user's inventory and the intent's constraints
    pub fn new<I, C>(user_equipment: I, constraints: Option<C>) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let inventory = user_equipment
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        let forbidden = constraints
            .map(|c| {
                c.into_iter()
                    .filter_map(|constraint| forbidden_token(constraint.as_ref()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            inventory,
            forbidden,
        }
    }

    /// Whether the candidate equipment passes both rules
    #[must_use]
    pub fn allowed(&self, candidate_equipment: &str) -> bool {
        self.available(candidate_equipment) && !self.excluded(candidate_equipment)
    }

    /// General availability.
    ///
    /// Bodyweight work is always available, an empty inventory is treated as
    /// unknown (everything available), a "full gym" entry unlocks everything,
    /// and otherwise some inventory entry must contain the candidate equipment.
    #[must_use]
    pub fn available(&self, candidate_equipment: &str) -> bool {
        let equipment = candidate_equipment.trim().to_lowercase();
        if is_bodyweight(&equipment) || self.inventory.is_empty() {
            return true;
        }
        self.inventory
            .iter()
            .any(|owned| owned.contains(FULL_GYM) || owned.contains(&equipment))
    }

    /// Whether a negation constraint forbids this equipment
    #[must_use]
    pub fn excluded(&self, candidate_equipment: &str) -> bool {
        let equipment = candidate_equipment.to_lowercase();
        self.forbidden
            .iter()
            .any(|token| token_matches(&equipment, token))
    }

    /// Forbidden-equipment tokens parsed from the constraints
    #[must_use]
    pub fn forbidden_tokens(&self) -> &[String] {
        &self.forbidden
    }
}

/// Whether an equipment value needs no equipment
#[must_use]
pub fn is_bodyweight(equipment: &str) -> bool {
    let lowered = equipment.trim().to_lowercase();
    lowered.is_empty() || BODYWEIGHT_VALUES.contains(&lowered.as_str())
}

/// Extract the forbidden equipment from a negated constraint.
///
/// Only `"no "`, `"don't have "` and `"without "` are recognized, at the start
/// of the constraint or after a space. Anything else yields `None`.
#[must_use]
pub fn forbidden_token(constraint: &str) -> Option<String> {
    let lowered = constraint.to_lowercase();
    NEGATION_MARKERS.iter().find_map(|marker| {
        let position = lowered
            .match_indices(marker)
            .map(|(index, _)| index)
            .find(|&index| index == 0 || lowered[..index].ends_with(' '))?;
        let token = lowered[position + marker.len()..]
            .trim()
            .trim_end_matches(['.', '!', ',', ';'])
            .trim();
        (!token.is_empty()).then(|| token.to_owned())
    })
}

/// Substring match that also accepts the singular of a plural token
fn token_matches(equipment: &str, token: &str) -> bool {
    if equipment.contains(token) {
        return true;
    }
    token
        .strip_suffix('s')
        .filter(|singular| singular.len() >= 3)
        .is_some_and(|singular| equipment.contains(singular))
}
