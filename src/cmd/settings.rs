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

use crate::cmd::load_settings;
use crate::error::Fallible;

pub fn check_settings(path: &Path) -> Fallible<String> {
    let settings = load_settings(Some(path))?;
    Ok(serde_json::to_string_pretty(&settings)?)
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::check_settings;
    use crate::error::Fallible;

    #[test]
    fn test_valid_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck.toml");
        write(&path, "new_cards_per_day = 30\nleech_action = \"suspend\"\n")?;
        let output = check_settings(&path)?;
        assert!(output.contains("\"new_cards_per_day\": 30"));
        assert!(output.contains("\"leech_action\": \"suspend\""));
        Ok(())
    }

    #[test]
    fn test_invalid_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck.toml");
        write(&path, "new_cards_per_day = 101\nday_start_hour = -1\n")?;
        let err = check_settings(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error: invalid deck settings: new_cards_per_day must be between 1 and 100, got 101; day_start_hour must be between 0 and 23, got -1."
        );
        Ok(())
    }

    #[test]
    fn test_non_existent_file() {
        assert!(check_settings(std::path::Path::new("./derpherp.toml")).is_err());
    }
}
