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

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{player::NationalId, round::Round};

pub const DEFAULT_ROUNDS: usize = 4;

fn default_rounds() -> usize {
    DEFAULT_ROUNDS
}

/// A single Swiss event.
///
/// `current_round` always equals `rounds.len()`; rounds are only appended by
/// the [`Swiss`](crate::swiss::Swiss) engine. A loaded record takes its
/// counter from the rounds it holds.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(from = "TournamentRecord")]
pub struct Tournament {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_rounds: usize,
    pub(crate) current_round: usize,
    pub(crate) rounds: Vec<Round>,
    pub(crate) players: Vec<NationalId>,
    pub description: String,
}

/// The stored form of a [`Tournament`].
#[derive(Deserialize)]
struct TournamentRecord {
    name: String,
    location: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default = "default_rounds")]
    num_rounds: usize,
    #[serde(default)]
    current_round: Option<usize>,
    #[serde(default)]
    rounds: Vec<Round>,
    #[serde(default)]
    players: Vec<NationalId>,
    #[serde(default)]
    description: String,
}

impl From<TournamentRecord> for Tournament {
    fn from(record: TournamentRecord) -> Self {
        let current_round = record.rounds.len();

        if let Some(stored) = record.current_round
            && stored != current_round
        {
            warn!(
                "{}: stored current_round {stored} replaced by {current_round}",
                record.name
            );
        }

        Self {
            name: record.name,
            location: record.location,
            start_date: record.start_date,
            end_date: record.end_date,
            num_rounds: record.num_rounds,
            current_round,
            rounds: record.rounds,
            players: record.players,
            description: record.description,
        }
    }
}

impl Tournament {
    #[must_use]
    pub fn new(
        name: &str,
        location: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        description: &str,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            location: location.trim().to_string(),
            start_date,
            end_date,
            num_rounds: DEFAULT_ROUNDS,
            current_round: 0,
            rounds: Vec::new(),
            players: Vec::new(),
            description: description.trim().to_string(),
        }
    }

    #[must_use]
    pub fn with_rounds(mut self, num_rounds: usize) -> Self {
        self.num_rounds = num_rounds;
        self
    }

    /// Adds a player id. Returns `false` if it was already registered.
    ///
    /// Players added between rounds take part from the next generated round.
    pub fn register(&mut self, id: NationalId) -> bool {
        if self.players.contains(&id) {
            false
        } else {
            self.players.push(id);
            true
        }
    }

    /// Number of rounds generated so far.
    #[must_use]
    pub fn current_round(&self) -> usize {
        self.current_round
    }

    #[must_use]
    pub fn players(&self) -> &[NationalId] {
        &self.players
    }

    #[must_use]
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current_round >= self.num_rounds
    }

    pub(crate) fn push_round(&mut self, round: Round) {
        self.rounds.push(round);
        self.current_round = self.rounds.len();
    }
}

impl fmt::Display for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} - {}) Round {}/{}",
            self.name,
            self.location,
            self.start_date.format(crate::player::DATE_FORMAT),
            self.end_date.format(crate::player::DATE_FORMAT),
            self.current_round,
            self.num_rounds,
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use ron::ser::PrettyConfig;

    use super::*;
    use crate::{
        error::Error,
        pairing::Match,
        player::parse_date,
        swiss::{NoSave, Swiss},
    };

    #[test]
    fn register_once() -> anyhow::Result<()> {
        let mut tournament = Tournament::new(
            "Open",
            "Lyon",
            parse_date("01/05/2025")?,
            parse_date("02/05/2025")?,
            "",
        );

        assert!(tournament.register("AB12345".parse()?));
        assert!(!tournament.register("AB12345".parse()?));
        assert_eq!(tournament.players().len(), 1);
        assert_eq!(tournament.num_rounds, DEFAULT_ROUNDS);
        assert_eq!(tournament.current_round(), 0);
        assert!(!tournament.is_finished());
        Ok(())
    }

    #[test]
    fn missing_fields_take_defaults() -> anyhow::Result<()> {
        let tournament: Tournament = ron::from_str(concat!(
            r#"(name: "Blitz", location: "Paris", "#,
            r#"start_date: "2025-01-01", end_date: "2025-01-01")"#,
        ))?;

        assert_eq!(tournament.num_rounds, DEFAULT_ROUNDS);
        assert!(tournament.rounds().is_empty());
        assert!(tournament.description.is_empty());
        assert_eq!(tournament.current_round(), 0);
        Ok(())
    }

    fn one_round_record() -> anyhow::Result<String> {
        let mut tournament = Tournament::new(
            "Blitz",
            "Paris",
            parse_date("01/01/2025")?,
            parse_date("01/01/2025")?,
            "",
        );
        tournament.register("AA00001".parse()?);
        tournament.register("BB00002".parse()?);
        tournament.push_round(Round::new(
            1,
            vec![Match::pending("AA00001".parse()?, "BB00002".parse()?)],
        ));

        let record = ron::ser::to_string_pretty(&tournament, PrettyConfig::default())?;
        assert!(record.contains("current_round: 1,"));
        Ok(record)
    }

    #[test]
    fn current_round_follows_loaded_rounds() -> anyhow::Result<()> {
        let record = one_round_record()?;

        for stored in [
            record.replace("current_round: 1,", ""),
            record.replace("current_round: 1,", "current_round: 0,"),
            record.replace("current_round: 1,", "current_round: 3,"),
        ] {
            let mut tournament: Tournament = ron::from_str(&stored)?;
            assert_eq!(tournament.current_round(), 1);
            assert_eq!(tournament.rounds().len(), 1);

            let mut swiss = Swiss::new(StdRng::seed_from_u64(0), NoSave);
            assert!(matches!(
                swiss.generate_first_round(&mut tournament),
                Err(Error::AlreadyStarted)
            ));
            assert_eq!(tournament.rounds().len(), 1);
        }

        let tournament: Tournament = ron::from_str(&record)?;
        assert_eq!(tournament.current_round(), 1);
        Ok(())
    }
}
