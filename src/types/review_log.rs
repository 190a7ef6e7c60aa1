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

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::day::same_study_day;
use crate::types::ease::Ease;
use crate::types::schedule::CardSchedule;
use crate::types::timestamp::Timestamp;

/// One grading event. Append-only: entries are never edited.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogEntry {
    pub learner_id: String,
    pub card_id: String,
    pub ease: Ease,
    /// The interval after the grading, in days.
    pub interval: u32,
    /// The interval before the grading, in days.
    pub previous_interval: u32,
    pub reviewed_at: Timestamp,
}

impl ReviewLogEntry {
    /// Record a grading from the schedules before and after it.
    pub fn from_grading(
        learner_id: impl Into<String>,
        card_id: impl Into<String>,
        ease: Ease,
        previous: Option<&CardSchedule>,
        next: &CardSchedule,
        reviewed_at: Timestamp,
    ) -> Self {
        Self {
            learner_id: learner_id.into(),
            card_id: card_id.into(),
            ease,
            interval: next.interval,
            previous_interval: previous.map_or(0, |s| s.interval),
            reviewed_at,
        }
    }
}

/// What a learner has already consumed of today's caps.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCounts {
    /// Cards studied for the first time today.
    pub new_cards_today: u32,
    /// Gradings today of cards first studied before today.
    pub reviews_today: u32,
    /// `Again` responses today on cards that had graduated.
    pub lapses_today: u32,
}

impl DailyCounts {
    /// Tally one learner's log for the study day containing `now`.
    pub fn tally(
        entries: &[ReviewLogEntry],
        learner_id: &str,
        now: Timestamp,
        day_start_hour: u32,
    ) -> Self {
        let entries: Vec<&ReviewLogEntry> =
            entries.iter().filter(|e| e.learner_id == learner_id).collect();
        let mut first_seen: HashMap<&str, Timestamp> = HashMap::new();
        for entry in &entries {
            first_seen
                .entry(entry.card_id.as_str())
                .and_modify(|ts| *ts = (*ts).min(entry.reviewed_at))
                .or_insert(entry.reviewed_at);
        }
        let today = |ts: Timestamp| same_study_day(ts, now, day_start_hour);
        let introduced_today = |card_id: &str| first_seen.get(card_id).is_some_and(|ts| today(*ts));

        let mut counts = DailyCounts {
            new_cards_today: first_seen.values().filter(|ts| today(**ts)).count() as u32,
            ..Default::default()
        };
        for entry in entries.iter().filter(|e| today(e.reviewed_at)) {
            if !introduced_today(entry.card_id.as_str()) {
                counts.reviews_today += 1;
            }
            if entry.ease == Ease::Again && entry.previous_interval >= 1 {
                counts.lapses_today += 1;
            }
        }
        counts
    }
}
