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

//! The study day: a 24-hour bucket starting at a configurable local hour
//! rather than midnight, so a late-night session counts toward the day it
//! began. Callers use it to tally daily caps from their review logs.

use chrono::Local;
use chrono::TimeZone;
use chrono::Timelike;
use chrono::Utc;

use crate::types::date::Date;
use crate::types::timestamp::Timestamp;

/// The study day `now` belongs to. Before the start hour, that is the
/// previous calendar date.
pub fn study_day(now: Timestamp, day_start_hour: u32) -> Date {
    let local = now.into_inner().with_timezone(&Local);
    let date = local.date_naive();
    if local.hour() < day_start_hour {
        Date::new(date.pred_opt().unwrap_or(date))
    } else {
        Date::new(date)
    }
}

/// The instant the current study day began.
pub fn study_day_start(now: Timestamp, day_start_hour: u32) -> Timestamp {
    let day = study_day(now, day_start_hour).into_inner();
    // If the start hour falls in a DST gap, the day starts at the first
    // wall-clock hour that exists.
    let start = (day_start_hour..24).find_map(|hour| {
        let naive = day.and_hms_opt(hour, 0, 0)?;
        Local.from_local_datetime(&naive).earliest()
    });
    match start {
        Some(start) => Timestamp::new(start.with_timezone(&Utc)),
        None => now,
    }
}

/// Whether `ts` falls in the same study day as `now`.
pub fn same_study_day(ts: Timestamp, now: Timestamp, day_start_hour: u32) -> bool {
    study_day(ts, day_start_hour) == study_day(now, day_start_hour)
}
