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

use std::path::Path;

use crate::cmd::load_schedule;
use crate::cmd::load_settings;
use crate::cmd::parse_now;
use crate::error::Fallible;
use crate::scheduler::grade;
use crate::scheduler::preview;
use crate::types::ease::Ease;
use crate::types::schedule::CardSchedule;

pub fn grade_card(
    ease: &str,
    schedule: Option<&Path>,
    settings: Option<&Path>,
    now: Option<&str>,
) -> Fallible<String> {
    // Reject a bad response before touching any file.
    let ease: Ease = ease.parse()?;
    let settings = load_settings(settings)?;
    let schedule = load_schedule(schedule)?;
    let now = parse_now(now)?;
    let outcome = grade(schedule.as_ref(), ease, now, &settings);
    Ok(serde_json::to_string_pretty(&outcome)?)
}

pub fn preview_card(
    schedule: Option<&Path>,
    settings: Option<&Path>,
    now: Option<&str>,
) -> Fallible<String> {
    let settings = load_settings(settings)?;
    let now = parse_now(now)?;
    let schedule = load_schedule(schedule)?.unwrap_or_else(|| CardSchedule::new(now));
    let preview = preview(&schedule, now, &settings);
    let lines: Vec<String> = Ease::ALL
        .iter()
        .map(|ease| format!("{ease}: {}", preview.get(*ease)))
        .collect();
    Ok(lines.join("\n"))
}
