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

//! The per-card state machine.
//!
//! `New`, `Learning` and `Relearning` cards walk a table of minute steps;
//! `Review` cards are scheduled in whole local days with an SM-2 ease
//! factor. Every function here is pure: the input schedule is never
//! touched and a fresh one is returned.

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::Duration;
use serde::Serialize;

use crate::leech::LeechSignal;
use crate::leech::check_leech;
use crate::settings::DeckSettings;
use crate::types::card_state::CardState;
use crate::types::ease::Ease;
use crate::types::schedule::CardSchedule;
use crate::types::schedule::MIN_EASE_FACTOR;
use crate::types::timestamp::Timestamp;

/// Interval multiplier for `Hard` on a review card.
const HARD_MULTIPLIER: f64 = 1.2;

/// Extra multiplier for `Easy` on a review card, on top of the ease factor.
const EASY_BONUS: f64 = 1.3;

/// Applied to the interval of a lapsed card.
const LAPSE_MULTIPLIER: f64 = 0.5;

/// The result of grading a card.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct GradeOutcome {
    pub schedule: CardSchedule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leech: Option<LeechSignal>,
}

/// Grade a card. `None` stands for a card that has never been studied.
pub fn grade(
    schedule: Option<&CardSchedule>,
    ease: Ease,
    now: Timestamp,
    settings: &DeckSettings,
) -> GradeOutcome {
    let current = match schedule {
        Some(schedule) => schedule.clone(),
        None => CardSchedule::new(now),
    };
    let next = next_schedule(&current, ease, now, settings);
    let leech = check_leech(&current, &next, settings);
    GradeOutcome {
        schedule: next,
        leech,
    }
}

/// Compute a card's next schedule.
pub fn next_schedule(
    schedule: &CardSchedule,
    ease: Ease,
    now: Timestamp,
    settings: &DeckSettings,
) -> CardSchedule {
    let mut next = match schedule.state {
        CardState::New | CardState::Learning => step(
            schedule,
            ease,
            now,
            settings,
            &settings.learning_steps,
            CardState::Learning,
        ),
        CardState::Relearning => step(
            schedule,
            ease,
            now,
            settings,
            &settings.relearning_steps,
            CardState::Relearning,
        ),
        CardState::Review => review(schedule, ease, now, settings),
    };
    next.ease_factor = next.ease_factor.max(MIN_EASE_FACTOR);
    next
}

/// Walk the step table of the current phase.
fn step(
    schedule: &CardSchedule,
    ease: Ease,
    now: Timestamp,
    settings: &DeckSettings,
    steps: &[u32],
    phase: CardState,
) -> CardSchedule {
    let minutes = |index: usize| steps.get(index).copied().unwrap_or(0);
    // A step pointer past the end of the table means the table shrank
    // since the card was last graded.
    let current = schedule.learning_step.min(steps.len().saturating_sub(1));
    let stay = |index: usize| CardSchedule {
        state: phase,
        learning_step: index,
        due: now.plus_minutes(minutes(index)),
        ..schedule.clone()
    };
    match ease {
        Ease::Again => stay(0),
        Ease::Hard => stay(current),
        Ease::Good => {
            let next = current + 1;
            if next < steps.len() {
                stay(next)
            } else {
                graduate(schedule, now, settings.graduating_interval, settings)
            }
        }
        Ease::Easy => graduate(schedule, now, settings.easy_interval, settings),
    }
}

/// Move a card from its step table into `Review`.
///
/// The interval is always the fixed one passed in; for a relearning card
/// the interval halved at the lapse is discarded.
fn graduate(
    schedule: &CardSchedule,
    now: Timestamp,
    interval: u32,
    settings: &DeckSettings,
) -> CardSchedule {
    let interval = interval.clamp(1, settings.maximum_interval.max(1));
    log::debug!(
        "Card graduated from {} with an interval of {interval} day(s).",
        schedule.state
    );
    CardSchedule {
        state: CardState::Review,
        interval,
        due: now.plus_days(interval),
        repetitions: 1,
        learning_step: 0,
        ..schedule.clone()
    }
}

fn review(
    schedule: &CardSchedule,
    ease: Ease,
    now: Timestamp,
    settings: &DeckSettings,
) -> CardSchedule {
    let ease_factor = next_ease_factor(schedule.ease_factor, ease);
    let interval = schedule.interval as f64;
    let scaled = |factor: f64| scale(interval, factor, settings.maximum_interval);
    match ease {
        Ease::Again => {
            let lapses = schedule.lapses + 1;
            log::debug!("Card lapsed ({lapses} lapse(s) so far).");
            let step = settings.relearning_steps.first().copied().unwrap_or(0);
            CardSchedule {
                state: CardState::Relearning,
                learning_step: 0,
                due: now.plus_minutes(step),
                interval: scaled(LAPSE_MULTIPLIER),
                ease_factor,
                lapses,
                ..schedule.clone()
            }
        }
        Ease::Hard => advance(schedule, now, ease_factor, scaled(HARD_MULTIPLIER)),
        Ease::Good => advance(schedule, now, ease_factor, scaled(ease_factor)),
        Ease::Easy => advance(schedule, now, ease_factor, scaled(ease_factor * EASY_BONUS)),
    }
}

fn advance(
    schedule: &CardSchedule,
    now: Timestamp,
    ease_factor: f64,
    interval: u32,
) -> CardSchedule {
    CardSchedule {
        state: CardState::Review,
        interval,
        ease_factor,
        due: now.plus_days(interval),
        repetitions: schedule.repetitions + 1,
        ..schedule.clone()
    }
}

/// SM-2: `EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored.
pub fn next_ease_factor(ease_factor: f64, ease: Ease) -> f64 {
    let lack = 5.0 - ease.quality();
    let ease_factor = ease_factor + (0.1 - lack * (0.08 + lack * 0.02));
    ease_factor.max(MIN_EASE_FACTOR)
}

/// `max(1, round(interval * factor))`, capped at `maximum` days.
fn scale(interval: f64, factor: f64, maximum: u32) -> u32 {
    let maximum = maximum.max(1);
    let scaled = (interval * factor).round();
    if scaled < 1.0 {
        1
    } else if scaled >= maximum as f64 {
        maximum
    } else {
        scaled as u32
    }
}

/// A coarse, human-readable duration until a card comes back.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IntervalHint {
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Months(i64),
    Years(i64),
}

impl IntervalHint {
    pub fn from_duration(duration: Duration) -> Self {
        let minutes = duration.num_seconds().max(0) as f64 / 60.0;
        if minutes < 60.0 {
            return IntervalHint::Minutes(minutes.round() as i64);
        }
        let hours = minutes / 60.0;
        if hours < 24.0 {
            return IntervalHint::Hours(hours.round() as i64);
        }
        let days = hours / 24.0;
        if days < 30.0 {
            IntervalHint::Days(days.round() as i64)
        } else if days < 365.0 {
            IntervalHint::Months(((days / 30.0).round() as i64).max(1))
        } else {
            IntervalHint::Years(((days / 365.0).round() as i64).max(1))
        }
    }
}

impl Display for IntervalHint {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            IntervalHint::Minutes(n) => write!(f, "{n}m"),
            IntervalHint::Hours(n) => write!(f, "{n}h"),
            IntervalHint::Days(n) => write!(f, "{n}d"),
            IntervalHint::Months(n) => write!(f, "{n}mo"),
            IntervalHint::Years(n) => write!(f, "{n}y"),
        }
    }
}

/// How long until the card comes back, for each possible response.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Preview {
    pub again: IntervalHint,
    pub hard: IntervalHint,
    pub good: IntervalHint,
    pub easy: IntervalHint,
}

impl Preview {
    pub fn get(&self, ease: Ease) -> IntervalHint {
        match ease {
            Ease::Again => self.again,
            Ease::Hard => self.hard,
            Ease::Good => self.good,
            Ease::Easy => self.easy,
        }
    }
}

/// Compute the hint for each response without applying any of them.
pub fn preview(schedule: &CardSchedule, now: Timestamp, settings: &DeckSettings) -> Preview {
    let hint = |ease: Ease| {
        let next = next_schedule(schedule, ease, now, settings);
        IntervalHint::from_duration(next.due.since(now))
    };
    Preview {
        again: hint(Ease::Again),
        hard: hint(Ease::Hard),
        good: hint(Ease::Good),
        easy: hint(Ease::Easy),
    }
}
