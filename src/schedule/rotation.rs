use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// First season year of the rotation; this year and earlier use the roster as-is
pub const DEFAULT_BASE_YEAR: i32 = 2020;

/// Households in the order they drafted in the base year
pub const DEFAULT_ROSTER: &[&str] = &[
    "Hartley",
    "Okafor & Reyes",
    "Lindqvist",
    "Marchetti",
    "Dubois & Kim",
    "Nakamura",
];

/// Seasons whose order was agreed by hand instead of rotated
pub const HISTORICAL_ORDERS: &[(i32, &[&str])] = &[(
    2022,
    &[
        "Lindqvist",
        "Hartley",
        "Nakamura",
        "Okafor & Reyes",
        "Marchetti",
        "Dubois & Kim",
    ],
)];

/// Base roster plus the years that break the rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPlan {
    pub base_year: i32,
    pub participants: Vec<String>,
    pub overrides: BTreeMap<i32, Vec<String>>,
}

impl Default for RotationPlan {
    fn default() -> Self {
        Self {
            base_year: DEFAULT_BASE_YEAR,
            participants: DEFAULT_ROSTER.iter().map(|p| p.to_string()).collect(),
            overrides: HISTORICAL_ORDERS
                .iter()
                .map(|(year, order)| (*year, order.iter().map(|p| p.to_string()).collect()))
                .collect(),
        }
    }
}

impl RotationPlan {
    pub fn new(base_year: i32, participants: Vec<String>) -> Self {
        Self {
            base_year,
            participants,
            overrides: BTreeMap::new(),
        }
    }

    /// Draft order for a season year.
    ///
    /// Each year after the base year shifts the roster left by one position;
    /// years listed in `overrides` use their recorded order instead.
    pub fn rotation_order(&self, year: i32) -> Vec<String> {
        if let Some(order) = self.overrides.get(&year) {
            return order.clone();
        }

        let count = self.participants.len();
        if year <= self.base_year || count == 0 {
            return self.participants.clone();
        }

        let rotation = ((year - self.base_year) as usize) % count;
        let mut order = self.participants[rotation..].to_vec();
        order.extend_from_slice(&self.participants[..rotation]);
        order
    }
}

/// Full two-round snake sequence: rotation order, then the same order reversed
pub fn turn_sequence(order: &[String]) -> Vec<String> {
    order.iter().chain(order.iter().rev()).cloned().collect()
}

/// Round (1 or 2) a slot index belongs to, given the rotation length
pub fn round_for_slot(index: usize, participant_count: usize) -> u8 {
    if index < participant_count {
        1
    } else {
        2
    }
}
