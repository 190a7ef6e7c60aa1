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

//! cardwheel: a spaced repetition scheduling and study queue engine.
//!
//! - [`settings`] resolves partial per-deck settings against defaults.
//! - [`scheduler`] computes a card's next schedule from a graded response.
//! - [`leech`] flags cards that keep lapsing.
//! - [`queue`] orders a session's due and new cards.
//! - [`day`] defines the study day used to bucket daily caps.
//!
//! The engine is pure: no I/O, no clock reads, no shared state.

pub mod cli;
pub mod cmd;
pub mod day;
pub mod error;
pub mod leech;
pub mod queue;
pub mod scheduler;
pub mod settings;
pub mod types;

pub use error::ErrorReport;
pub use error::Fallible;
pub use leech::LeechSignal;
pub use queue::QueueCard;
pub use queue::StudyItem;
pub use queue::build_queue;
pub use scheduler::GradeOutcome;
pub use scheduler::IntervalHint;
pub use scheduler::Preview;
pub use scheduler::grade;
pub use scheduler::preview;
pub use settings::DeckSettings;
pub use settings::RawDeckSettings;
pub use types::card_state::CardState;
pub use types::ease::Ease;
pub use types::review_log::DailyCounts;
pub use types::review_log::ReviewLogEntry;
pub use types::schedule::CardSchedule;
pub use types::timestamp::Timestamp;
