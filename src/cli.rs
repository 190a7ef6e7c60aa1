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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::day::print_day_start;
use crate::cmd::grade::grade_card;
use crate::cmd::grade::preview_card;
use crate::cmd::queue::build_session;
use crate::cmd::settings::check_settings;
use crate::error::Fallible;
use crate::settings::DEFAULT_DAY_START_HOUR;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Resolve a deck settings file and print the result.
    CheckSettings {
        /// Path to a TOML or JSON settings file.
        file: PathBuf,
    },
    /// Grade a card and print its next schedule.
    Grade {
        /// One of again, hard, good, easy (or 1-4).
        #[arg(long)]
        ease: String,
        /// Path to the card's current schedule as JSON. Omit for a new card.
        #[arg(long)]
        schedule: Option<PathBuf>,
        /// Path to the deck settings.
        #[arg(long)]
        settings: Option<PathBuf>,
        /// RFC 3339 timestamp to use as the current time.
        #[arg(long)]
        now: Option<String>,
    },
    /// Show when a card would come back for each response.
    Preview {
        #[arg(long)]
        schedule: Option<PathBuf>,
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long)]
        now: Option<String>,
    },
    /// Print the ordered cards of a study session.
    Queue {
        /// Path to a JSON list of cards.
        #[arg(long)]
        cards: PathBuf,
        #[arg(long)]
        settings: Option<PathBuf>,
        /// New cards already introduced today.
        #[arg(long, default_value_t = 0)]
        new_today: u32,
        /// Reviews already done today.
        #[arg(long, default_value_t = 0)]
        reviews_today: u32,
        /// Seed for the shuffles, for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        now: Option<String>,
    },
    /// Print when the current study day began.
    DayStart {
        #[arg(long)]
        now: Option<String>,
        /// Local hour at which the study day starts.
        #[arg(long, default_value_t = DEFAULT_DAY_START_HOUR)]
        hour: u32,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    let output = match cli {
        Command::CheckSettings { file } => check_settings(&file)?,
        Command::Grade {
            ease,
            schedule,
            settings,
            now,
        } => grade_card(
            &ease,
            schedule.as_deref(),
            settings.as_deref(),
            now.as_deref(),
        )?,
        Command::Preview {
            schedule,
            settings,
            now,
        } => preview_card(schedule.as_deref(), settings.as_deref(), now.as_deref())?,
        Command::Queue {
            cards,
            settings,
            new_today,
            reviews_today,
            seed,
            now,
        } => build_session(
            &cards,
            settings.as_deref(),
            new_today,
            reviews_today,
            seed,
            now.as_deref(),
        )?,
        Command::DayStart { now, hour } => print_day_start(now.as_deref(), hour)?,
    };
    println!("{output}");
    Ok(())
}
