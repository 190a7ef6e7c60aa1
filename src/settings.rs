// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-deck settings: the raw, partial form stored per deck and the
//! resolved, validated form the scheduler and queue builder consume.
//!
//! Out-of-range values are rejected, never clamped. Every violation is
//! reported at once so the user can fix the whole file in one pass.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;

pub const DEFAULT_NEW_CARDS_PER_DAY: u32 = 20;
pub const DEFAULT_MAX_REVIEWS_PER_DAY: u32 = 200;
pub const DEFAULT_LEECH_THRESHOLD: u32 = 8;
/// Learning steps, in minutes.
pub const DEFAULT_LEARNING_STEPS: [u32; 2] = [1, 10];
/// Relearning steps, in minutes.
pub const DEFAULT_RELEARNING_STEPS: [u32; 1] = [10];
/// In days.
pub const DEFAULT_GRADUATING_INTERVAL: u32 = 1;
/// In days.
pub const DEFAULT_EASY_INTERVAL: u32 = 4;
/// The longest review interval, in days.
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36500;
/// The local hour at which a new study day begins.
pub const DEFAULT_DAY_START_HOUR: u32 = 4;

const NEW_CARDS_PER_DAY_RANGE: (i64, i64) = (1, 100);
const MAX_REVIEWS_PER_DAY_RANGE: (i64, i64) = (0, 9999);
const LEECH_THRESHOLD_RANGE: (i64, i64) = (1, 100);
const STEP_MINUTES_RANGE: (i64, i64) = (1, 1440);
const INTERVAL_RANGE: (i64, i64) = (1, 36500);
const DAY_START_HOUR_RANGE: (i64, i64) = (0, 23);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    /// Oldest due first.
    #[default]
    DueDate,
    /// Full shuffle.
    Random,
    /// Day by day, shuffled within each day.
    DueDateRandom,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewCardOrder {
    /// Creation order.
    #[default]
    Sequential,
    Random,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewReviewMix {
    #[default]
    ReviewFirst,
    NewFirst,
    /// Spread new cards evenly among the reviews.
    Mix,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeechAction {
    Suspend,
    #[default]
    Tag,
}

/// Deck settings as stored: any field may be missing.
///
/// Integer fields are signed so that negative values survive parsing and
/// are reported by [`validate`] instead of failing deserialization.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawDeckSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_cards_per_day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reviews_per_day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_sort: Option<ReviewSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_card_order: Option<NewCardOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_review_mix: Option<NewReviewMix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leech_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leech_action: Option<LeechAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_steps: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relearning_steps: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduating_interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easy_interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_start_hour: Option<i64>,
}

impl RawDeckSettings {
    pub fn from_toml(s: &str) -> Fallible<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json(s: &str) -> Fallible<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Fully populated, validated deck settings.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DeckSettings {
    pub new_cards_per_day: u32,
    /// Zero means unlimited.
    pub max_reviews_per_day: u32,
    pub review_sort: ReviewSort,
    pub new_card_order: NewCardOrder,
    pub new_review_mix: NewReviewMix,
    pub leech_threshold: u32,
    pub leech_action: LeechAction,
    /// In minutes. Never empty.
    pub learning_steps: Vec<u32>,
    /// In minutes. Never empty.
    pub relearning_steps: Vec<u32>,
    /// In days.
    pub graduating_interval: u32,
    /// In days.
    pub easy_interval: u32,
    /// In days. Review intervals never grow past this.
    pub maximum_interval: u32,
    pub day_start_hour: u32,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            new_cards_per_day: DEFAULT_NEW_CARDS_PER_DAY,
            max_reviews_per_day: DEFAULT_MAX_REVIEWS_PER_DAY,
            review_sort: ReviewSort::default(),
            new_card_order: NewCardOrder::default(),
            new_review_mix: NewReviewMix::default(),
            leech_threshold: DEFAULT_LEECH_THRESHOLD,
            leech_action: LeechAction::default(),
            learning_steps: DEFAULT_LEARNING_STEPS.to_vec(),
            relearning_steps: DEFAULT_RELEARNING_STEPS.to_vec(),
            graduating_interval: DEFAULT_GRADUATING_INTERVAL,
            easy_interval: DEFAULT_EASY_INTERVAL,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            day_start_hour: DEFAULT_DAY_START_HOUR,
        }
    }
}

impl DeckSettings {
    /// The raw form with every field present.
    pub fn to_raw(&self) -> RawDeckSettings {
        let steps = |steps: &[u32]| -> Vec<i64> { steps.iter().map(|s| *s as i64).collect() };
        RawDeckSettings {
            new_cards_per_day: Some(self.new_cards_per_day as i64),
            max_reviews_per_day: Some(self.max_reviews_per_day as i64),
            review_sort: Some(self.review_sort),
            new_card_order: Some(self.new_card_order),
            new_review_mix: Some(self.new_review_mix),
            leech_threshold: Some(self.leech_threshold as i64),
            leech_action: Some(self.leech_action),
            learning_steps: Some(steps(&self.learning_steps)),
            relearning_steps: Some(steps(&self.relearning_steps)),
            graduating_interval: Some(self.graduating_interval as i64),
            easy_interval: Some(self.easy_interval as i64),
            maximum_interval: Some(self.maximum_interval as i64),
            day_start_hour: Some(self.day_start_hour as i64),
        }
    }
}

/// A single out-of-range settings field.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Check every present field, returning all violations.
pub fn validate(raw: &RawDeckSettings) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_range(
        &mut violations,
        "new_cards_per_day",
        raw.new_cards_per_day,
        NEW_CARDS_PER_DAY_RANGE,
    );
    check_range(
        &mut violations,
        "max_reviews_per_day",
        raw.max_reviews_per_day,
        MAX_REVIEWS_PER_DAY_RANGE,
    );
    check_range(
        &mut violations,
        "leech_threshold",
        raw.leech_threshold,
        LEECH_THRESHOLD_RANGE,
    );
    check_steps(&mut violations, "learning_steps", raw.learning_steps.as_deref());
    check_steps(
        &mut violations,
        "relearning_steps",
        raw.relearning_steps.as_deref(),
    );
    check_range(
        &mut violations,
        "graduating_interval",
        raw.graduating_interval,
        INTERVAL_RANGE,
    );
    check_range(
        &mut violations,
        "easy_interval",
        raw.easy_interval,
        INTERVAL_RANGE,
    );
    let graduating = raw
        .graduating_interval
        .unwrap_or(DEFAULT_GRADUATING_INTERVAL as i64);
    let easy = raw.easy_interval.unwrap_or(DEFAULT_EASY_INTERVAL as i64);
    if easy < graduating {
        violations.push(Violation {
            field: "easy_interval",
            message: format!("must not be shorter than graduating_interval ({graduating})"),
        });
    }
    check_range(
        &mut violations,
        "maximum_interval",
        raw.maximum_interval,
        INTERVAL_RANGE,
    );
    let maximum = raw
        .maximum_interval
        .unwrap_or(DEFAULT_MAXIMUM_INTERVAL as i64);
    if maximum < easy {
        violations.push(Violation {
            field: "maximum_interval",
            message: format!("must not be shorter than easy_interval ({easy})"),
        });
    }
    check_range(
        &mut violations,
        "day_start_hour",
        raw.day_start_hour,
        DAY_START_HOUR_RANGE,
    );
    violations
}

/// Resolve possibly-absent raw settings against the defaults.
///
/// Fails with every violation listed if any field is out of range.
/// Resolving the output of [`DeckSettings::to_raw`] returns the same
/// settings.
pub fn resolve(raw: Option<&RawDeckSettings>) -> Fallible<DeckSettings> {
    let defaults = DeckSettings::default();
    let Some(raw) = raw else {
        return Ok(defaults);
    };
    let violations = validate(raw);
    if !violations.is_empty() {
        let list: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
        log::debug!("Rejected deck settings: {} violation(s).", list.len());
        return fail(format!("invalid deck settings: {}.", list.join("; ")));
    }
    let steps = |steps: &Option<Vec<i64>>, default: Vec<u32>| -> Vec<u32> {
        match steps {
            Some(steps) => steps.iter().map(|s| to_u32(*s)).collect(),
            None => default,
        }
    };
    Ok(DeckSettings {
        new_cards_per_day: raw
            .new_cards_per_day
            .map_or(defaults.new_cards_per_day, to_u32),
        max_reviews_per_day: raw
            .max_reviews_per_day
            .map_or(defaults.max_reviews_per_day, to_u32),
        review_sort: raw.review_sort.unwrap_or(defaults.review_sort),
        new_card_order: raw.new_card_order.unwrap_or(defaults.new_card_order),
        new_review_mix: raw.new_review_mix.unwrap_or(defaults.new_review_mix),
        leech_threshold: raw
            .leech_threshold
            .map_or(defaults.leech_threshold, to_u32),
        leech_action: raw.leech_action.unwrap_or(defaults.leech_action),
        learning_steps: steps(&raw.learning_steps, defaults.learning_steps),
        relearning_steps: steps(&raw.relearning_steps, defaults.relearning_steps),
        graduating_interval: raw
            .graduating_interval
            .map_or(defaults.graduating_interval, to_u32),
        easy_interval: raw.easy_interval.map_or(defaults.easy_interval, to_u32),
        maximum_interval: raw
            .maximum_interval
            .map_or(defaults.maximum_interval, to_u32),
        day_start_hour: raw.day_start_hour.map_or(defaults.day_start_hour, to_u32),
    })
}

fn check_range(
    violations: &mut Vec<Violation>,
    field: &'static str,
    value: Option<i64>,
    (min, max): (i64, i64),
) {
    if let Some(value) = value {
        if value < min || value > max {
            violations.push(Violation {
                field,
                message: format!("must be between {min} and {max}, got {value}"),
            });
        }
    }
}

fn check_steps(violations: &mut Vec<Violation>, field: &'static str, steps: Option<&[i64]>) {
    let Some(steps) = steps else {
        return;
    };
    if steps.is_empty() {
        violations.push(Violation {
            field,
            message: "must contain at least one step".to_string(),
        });
        return;
    }
    let (min, max) = STEP_MINUTES_RANGE;
    if let Some(step) = steps.iter().find(|s| **s < min || **s > max) {
        violations.push(Violation {
            field,
            message: format!("must be between {min} and {max} minutes each, got {step}"),
        });
    }
}

/// Only called on validated values.
fn to_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_new_cards(n: i64) -> RawDeckSettings {
        RawDeckSettings {
            new_cards_per_day: Some(n),
            ..Default::default()
        }
    }

    #[test]
    fn test_absent_settings_resolve_to_defaults() -> Fallible<()> {
        let settings = resolve(None)?;
        assert_eq!(settings, DeckSettings::default());
        assert_eq!(settings.learning_steps, vec![1, 10]);
        assert_eq!(settings.relearning_steps, vec![10]);
        assert_eq!(settings.graduating_interval, 1);
        assert_eq!(settings.easy_interval, 4);
        assert_eq!(settings.day_start_hour, 4);
        Ok(())
    }

    #[test]
    fn test_empty_settings_resolve_to_defaults() -> Fallible<()> {
        let settings = resolve(Some(&RawDeckSettings::default()))?;
        assert_eq!(settings, DeckSettings::default());
        Ok(())
    }

    #[test]
    fn test_partial_settings_keep_given_fields() -> Fallible<()> {
        let raw = RawDeckSettings {
            max_reviews_per_day: Some(0),
            review_sort: Some(ReviewSort::DueDateRandom),
            leech_action: Some(LeechAction::Suspend),
            ..Default::default()
        };
        let settings = resolve(Some(&raw))?;
        assert_eq!(settings.max_reviews_per_day, 0);
        assert_eq!(settings.review_sort, ReviewSort::DueDateRandom);
        assert_eq!(settings.leech_action, LeechAction::Suspend);
        assert_eq!(settings.new_cards_per_day, DEFAULT_NEW_CARDS_PER_DAY);
        Ok(())
    }

    #[test]
    fn test_new_cards_per_day_boundaries() -> Fallible<()> {
        assert_eq!(resolve(Some(&with_new_cards(1)))?.new_cards_per_day, 1);
        assert_eq!(resolve(Some(&with_new_cards(100)))?.new_cards_per_day, 100);
        assert!(resolve(Some(&with_new_cards(0))).is_err());
        assert!(resolve(Some(&with_new_cards(101))).is_err());
        Ok(())
    }

    #[test]
    fn test_out_of_range_is_rejected_not_clamped() {
        let err = resolve(Some(&with_new_cards(200))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error: invalid deck settings: new_cards_per_day must be between 1 and 100, got 200."
        );
    }

    #[test]
    fn test_every_violation_is_reported() {
        let raw = RawDeckSettings {
            new_cards_per_day: Some(-3),
            max_reviews_per_day: Some(-1),
            leech_threshold: Some(0),
            learning_steps: Some(vec![]),
            relearning_steps: Some(vec![10, 0]),
            day_start_hour: Some(24),
            ..Default::default()
        };
        let fields: Vec<&str> = validate(&raw).iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                "new_cards_per_day",
                "max_reviews_per_day",
                "leech_threshold",
                "learning_steps",
                "relearning_steps",
                "day_start_hour",
            ]
        );
    }

    #[test]
    fn test_easy_interval_must_not_undercut_graduating_interval() {
        let raw = RawDeckSettings {
            graduating_interval: Some(3),
            easy_interval: Some(2),
            ..Default::default()
        };
        let violations = validate(&raw);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "easy_interval");
    }

    #[test]
    fn test_maximum_interval() -> Fallible<()> {
        assert_eq!(resolve(None)?.maximum_interval, 36500);
        let raw = RawDeckSettings {
            maximum_interval: Some(365),
            ..Default::default()
        };
        assert_eq!(resolve(Some(&raw))?.maximum_interval, 365);
        let raw = RawDeckSettings {
            maximum_interval: Some(36501),
            ..Default::default()
        };
        assert!(resolve(Some(&raw)).is_err());
        let raw = RawDeckSettings {
            easy_interval: Some(10),
            maximum_interval: Some(5),
            ..Default::default()
        };
        let fields: Vec<&str> = validate(&raw).iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["maximum_interval"]);
        Ok(())
    }

    #[test]
    fn test_resolve_is_idempotent() -> Fallible<()> {
        let raw = RawDeckSettings {
            new_cards_per_day: Some(5),
            new_review_mix: Some(NewReviewMix::Mix),
            learning_steps: Some(vec![1, 5, 30]),
            ..Default::default()
        };
        let once = resolve(Some(&raw))?;
        let twice = resolve(Some(&once.to_raw()))?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn test_from_toml() -> Fallible<()> {
        let raw = RawDeckSettings::from_toml(
            r#"
            new_cards_per_day = 15
            review_sort = "due_date_random"
            new_review_mix = "mix"
            learning_steps = [1, 10, 60]
            "#,
        )?;
        let settings = resolve(Some(&raw))?;
        assert_eq!(settings.new_cards_per_day, 15);
        assert_eq!(settings.review_sort, ReviewSort::DueDateRandom);
        assert_eq!(settings.new_review_mix, NewReviewMix::Mix);
        assert_eq!(settings.learning_steps, vec![1, 10, 60]);
        Ok(())
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        assert!(RawDeckSettings::from_json(r#"{"new_cards": 10}"#).is_err());
        assert!(RawDeckSettings::from_json(r#"{"leech_action": "delete"}"#).is_err());
    }
}
