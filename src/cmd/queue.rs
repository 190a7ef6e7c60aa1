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

use std::fs::read_to_string;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::cmd::load_settings;
use crate::cmd::parse_now;
use crate::error::Fallible;
use crate::error::fail;
use crate::queue::QueueCard;
use crate::queue::StudyItem;
use crate::queue::build_queue;
use crate::types::card_state::CardState;
use crate::types::review_log::DailyCounts;
use crate::types::timestamp::Timestamp;

/// A card as listed in the cards file.
#[derive(Deserialize)]
struct CardRecord {
    id: String,
    #[serde(default)]
    state: CardState,
    due: Option<Timestamp>,
    #[serde(default)]
    suspended: bool,
}

struct SessionCard {
    id: String,
    due: Timestamp,
}

impl QueueCard for SessionCard {
    fn due(&self) -> Timestamp {
        self.due
    }
}

pub fn build_session(
    cards: &Path,
    settings: Option<&Path>,
    new_today: u32,
    reviews_today: u32,
    seed: Option<u64>,
    now: Option<&str>,
) -> Fallible<String> {
    if !cards.exists() {
        return fail(format!("cards file does not exist: {}", cards.display()));
    }
    let settings = load_settings(settings)?;
    let now = parse_now(now)?;
    let records: Vec<CardRecord> = serde_json::from_str(&read_to_string(cards)?)?;

    let mut due = Vec::new();
    let mut new = Vec::new();
    for record in records.into_iter().filter(|r| !r.suspended) {
        let card = SessionCard {
            id: record.id,
            due: record.due.unwrap_or(now),
        };
        if record.state == CardState::New {
            new.push(card);
        } else if card.is_due(now) {
            due.push(card);
        }
    }
    log::debug!("{} due and {} new candidate cards.", due.len(), new.len());

    let counts = DailyCounts {
        new_cards_today: new_today,
        reviews_today,
        ..Default::default()
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let queue = build_queue(due, new, counts, &settings, &mut rng);
    if queue.is_empty() {
        return Ok("No cards to study.".to_string());
    }
    let lines: Vec<String> = queue
        .into_iter()
        .map(|item| {
            let kind = match item {
                StudyItem::Review(_) => "review",
                StudyItem::New(_) => "new",
            };
            format!("{kind} {}", item.into_card().id)
        })
        .collect();
    Ok(lines.join("\n"))
}
