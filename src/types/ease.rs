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
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

/// The learner's self-graded recall quality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ease {
    Again,
    Hard,
    Good,
    Easy,
}

impl Ease {
    pub const ALL: [Ease; 4] = [Ease::Again, Ease::Hard, Ease::Good, Ease::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ease::Again => "again",
            Ease::Hard => "hard",
            Ease::Good => "good",
            Ease::Easy => "easy",
        }
    }

    /// The response on the 1-4 button scale.
    pub fn value(self) -> u8 {
        match self {
            Ease::Again => 1,
            Ease::Hard => 2,
            Ease::Good => 3,
            Ease::Easy => 4,
        }
    }

    /// The response mapped onto SM-2's 2-5 quality scale.
    pub fn quality(self) -> f64 {
        (self.value() + 1) as f64
    }
}

impl TryFrom<u8> for Ease {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Ease::Again),
            2 => Ok(Ease::Hard),
            3 => Ok(Ease::Good),
            4 => Ok(Ease::Easy),
            _ => fail(format!("Invalid ease: {value}")),
        }
    }
}

impl FromStr for Ease {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Fallible<Self> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Ok(Ease::Again),
            "hard" | "2" => Ok(Ease::Hard),
            "good" | "3" => Ok(Ease::Good),
            "easy" | "4" => Ok(Ease::Easy),
            _ => fail(format!("Invalid ease: {s}")),
        }
    }
}

impl Display for Ease {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
