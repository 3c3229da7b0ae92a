// This file is part of swiss-chess.
//
// swiss-chess is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// swiss-chess is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pairing::Match;

pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Round {
    pub name: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    pub matches: Vec<Match>,
}

impl Round {
    /// Round `number` (1-based), started now.
    #[must_use]
    pub fn new(number: usize, matches: Vec<Match>) -> Self {
        Self {
            name: format!("Round {number}"),
            start: Utc::now(),
            end: None,
            matches,
        }
    }

    pub fn finish(&mut self) {
        self.end = Some(Utc::now());
    }

    #[must_use]
    pub fn byes(&self) -> usize {
        self.matches.iter().filter(|game| game.is_bye()).count()
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = match self.end {
            Some(end) => end.format(TIMESTAMP_FORMAT).to_string(),
            None => "-".to_string(),
        };

        writeln!(
            f,
            "{} [{} - {end}]",
            self.name,
            self.start.format(TIMESTAMP_FORMAT)
        )?;

        for (index, game) in self.matches.iter().enumerate() {
            writeln!(f, "  {index}) {game}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_round_is_open() -> anyhow::Result<()> {
        let mut round = Round::new(
            3,
            vec![
                Match::pending("AA00001".parse()?, "BB00002".parse()?),
                Match::bye("CC00003".parse()?),
            ],
        );

        assert_eq!(round.name, "Round 3");
        assert!(round.end.is_none());
        assert_eq!(round.byes(), 1);

        round.finish();
        assert!(round.end.is_some_and(|end| end >= round.start));
        Ok(())
    }

    #[test]
    fn display_lists_matches() -> anyhow::Result<()> {
        let round = Round::new(1, vec![Match::bye("CC00003".parse()?)]);
        let text = round.to_string();

        assert!(text.starts_with("Round 1 ["));
        assert!(text.contains(" - -]"));
        assert!(text.contains("  0) CC00003 (1.0) vs BYE (0.0)"));
        Ok(())
    }
}
