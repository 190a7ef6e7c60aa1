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

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::DateTime;
use chrono::Days;
use chrono::Duration;
use chrono::Local;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::date::Date;

/// An instant in time, stored in UTC.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse an RFC 3339 timestamp, e.g. `2025-03-01T09:30:00Z`.
    pub fn parse(s: &str) -> Fallible<Self> {
        let ts = DateTime::parse_from_rfc3339(s.trim())?;
        Ok(Self(ts.with_timezone(&Utc)))
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    pub fn local_date(self) -> Date {
        let ts = self.0.with_timezone(&Local);
        Date::new(ts.date_naive())
    }

    /// Saturates at the latest representable instant.
    pub fn plus_minutes(self, minutes: u32) -> Self {
        self.plus_duration(Duration::try_minutes(minutes as i64))
    }

    /// Advance by whole local calendar days, keeping the wall-clock time.
    /// Across a DST change this is not a multiple of 24 hours. Saturates
    /// at the latest representable instant.
    pub fn plus_days(self, days: u32) -> Self {
        let local = self.0.with_timezone(&Local);
        match local.checked_add_days(Days::new(days as u64)) {
            Some(ts) => Self(ts.with_timezone(&Utc)),
            // The wall-clock time does not exist on the target day, or the
            // date is out of range.
            None => self.plus_duration(Duration::try_days(days as i64)),
        }
    }

    fn plus_duration(self, duration: Option<Duration>) -> Self {
        let ts = duration.and_then(|d| self.0.checked_add_signed(d));
        Self(ts.unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    /// The signed duration from `earlier` to `self`.
    pub fn since(self, earlier: Timestamp) -> Duration {
        self.0 - earlier.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
