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

use serde::Deserialize;
use serde::Serialize;

use crate::queue::QueueCard;
use crate::types::card_state::CardState;
use crate::types::timestamp::Timestamp;

/// The starting ease factor for a card.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// The ease factor never drops below this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// A learner's scheduling state for one card.
///
/// Storage must uphold these before handing a schedule to the engine:
/// `ease_factor >= 1.3`, `interval >= 1` for `Review` and `Relearning`
/// cards, and `lapses` never decreasing.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSchedule {
    /// The instant at or after which the card is eligible for review.
    pub due: Timestamp,
    /// The last computed review interval, in days. Zero until the card
    /// first graduates.
    pub interval: u32,
    /// SM-2 multiplicative difficulty factor.
    pub ease_factor: f64,
    /// The number of graduations into or through the review state.
    pub repetitions: u32,
    pub state: CardState,
    /// Index into the step table of the current phase.
    pub learning_step: usize,
    /// The number of times the card lapsed from review.
    pub lapses: u32,
}

impl CardSchedule {
    /// The schedule of a card that has never been studied.
    pub fn new(now: Timestamp) -> Self {
        Self {
            due: now,
            interval: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            repetitions: 0,
            state: CardState::New,
            learning_step: 0,
            lapses: 0,
        }
    }
}

impl QueueCard for CardSchedule {
    fn due(&self) -> Timestamp {
        self.due
    }
}
