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

use crate::cmd::parse_now;
use crate::day::study_day;
use crate::day::study_day_start;
use crate::error::Fallible;
use crate::error::fail;

pub fn print_day_start(now: Option<&str>, hour: u32) -> Fallible<String> {
    if hour > 23 {
        return fail(format!("hour must be between 0 and 23, got {hour}"));
    }
    let now = parse_now(now)?;
    let day = study_day(now, hour);
    let start = study_day_start(now, hour);
    Ok(format!("{day} (started {start})"))
}
