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

//! Command implementations. Each returns the text to print.

pub mod day;
pub mod grade;
pub mod queue;
pub mod settings;

use std::fs::read_to_string;
use std::path::Path;

use crate::error::Fallible;
use crate::error::fail;
use crate::settings::DeckSettings;
use crate::settings::RawDeckSettings;
use crate::settings::resolve;
use crate::types::schedule::CardSchedule;
use crate::types::timestamp::Timestamp;

/// Load and resolve deck settings. JSON files are recognised by their
/// extension; anything else is read as TOML.
pub(crate) fn load_settings(path: Option<&Path>) -> Fallible<DeckSettings> {
    let Some(path) = path else {
        return resolve(None);
    };
    if !path.exists() {
        return fail(format!("settings file does not exist: {}", path.display()));
    }
    let content = read_to_string(path)?;
    let raw = if path.extension().is_some_and(|ext| ext == "json") {
        RawDeckSettings::from_json(&content)?
    } else {
        RawDeckSettings::from_toml(&content)?
    };
    resolve(Some(&raw))
}

pub(crate) fn load_schedule(path: Option<&Path>) -> Fallible<Option<CardSchedule>> {
    let Some(path) = path else {
        return Ok(None);
    };
    if !path.exists() {
        return fail(format!("schedule file does not exist: {}", path.display()));
    }
    let content = read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

pub(crate) fn parse_now(now: Option<&str>) -> Fallible<Timestamp> {
    match now {
        Some(now) => Timestamp::parse(now),
        None => Ok(Timestamp::now()),
    }
}
