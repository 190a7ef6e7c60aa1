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

use serde::Serialize;

use crate::settings::DeckSettings;
use crate::settings::LeechAction;
use crate::types::card_state::CardState;
use crate::types::schedule::CardSchedule;

/// Raised when a lapse takes a card's lapse count to the deck's leech
/// threshold. The caller applies the action; the engine only signals.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeechSignal {
    pub lapses: u32,
    pub action: LeechAction,
}

/// Compare a card's schedule before and after a grading.
///
/// Fires only for a lapse out of `Review`, and only on the lapse that
/// crosses the threshold (`lapses >= leech_threshold` for the first time).
pub fn check_leech(
    previous: &CardSchedule,
    next: &CardSchedule,
    settings: &DeckSettings,
) -> Option<LeechSignal> {
    let lapsed = previous.state == CardState::Review && next.lapses > previous.lapses;
    if !lapsed {
        return None;
    }
    let threshold = settings.leech_threshold;
    if previous.lapses < threshold && next.lapses >= threshold {
        log::debug!(
            "Card became a leech after {} lapses; action: {:?}.",
            next.lapses,
            settings.leech_action
        );
        Some(LeechSignal {
            lapses: next.lapses,
            action: settings.leech_action,
        })
    } else {
        None
    }
}
