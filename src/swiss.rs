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

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rand::{Rng, seq::SliceRandom};
use rustc_hash::FxHashSet;

use crate::{
    error::Error,
    pairing::Match,
    player::NationalId,
    round::Round,
    standings::{Standings, compute_standings},
    tournament::Tournament,
};

/// Called once after every successful state change.
pub trait Persist {
    /// # Errors
    ///
    /// If the tournament could not be written.
    fn save(&mut self, tournament: &Tournament) -> anyhow::Result<()>;
}

impl<P: Persist + ?Sized> Persist for &mut P {
    fn save(&mut self, tournament: &Tournament) -> anyhow::Result<()> {
        (**self).save(tournament)
    }
}

/// Keeps everything in memory.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSave;

impl Persist for NoSave {
    fn save(&mut self, _tournament: &Tournament) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Order independent key of two opponents.
type Pair = (NationalId, NationalId);

fn pair(a: &NationalId, b: &NationalId) -> Pair {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Every pairing of two real players in the rounds played so far.
fn played_pairs(tournament: &Tournament) -> FxHashSet<Pair> {
    tournament
        .rounds()
        .iter()
        .flat_map(|round| round.matches.iter())
        .filter_map(Match::players)
        .map(|(a, b)| pair(a, b))
        .collect()
}

/// Points descending, id ascending, then each run of equal points shuffled.
fn score_groups<R: Rng + ?Sized>(
    standings: &Standings,
    players: &[NationalId],
    rng: &mut R,
) -> Vec<NationalId> {
    let mut sorted: Vec<_> = players
        .iter()
        .map(|id| (id.clone(), standings.get(id).unwrap_or_default()))
        .collect();

    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    for group in sorted.chunk_by_mut(|a, b| a.1.total_cmp(&b.1).is_eq()) {
        group.shuffle(rng);
    }

    sorted.into_iter().map(|(id, _points)| id).collect()
}

/// Pairs neighbours in order; an odd player out gets the bye.
fn pair_in_order(players: Vec<NationalId>) -> Vec<Match> {
    let mut matches = Vec::with_capacity(players.len() / 2 + 1);
    let mut players = players.into_iter();

    while let Some(first) = players.next() {
        match players.next() {
            Some(second) => matches.push(Match::pending(first, second)),
            None => matches.push(Match::bye(first)),
        }
    }

    matches
}

/// The pairing and scoring engine.
///
/// `rng` drives every shuffle and `store` is called after each state change,
/// so a seeded generator and [`NoSave`] make the engine fully deterministic.
#[derive(Debug)]
pub struct Swiss<R, P> {
    rng: R,
    store: P,
}

impl<R: Rng, P: Persist> Swiss<R, P> {
    #[must_use]
    pub fn new(rng: R, store: P) -> Self {
        Self { rng, store }
    }

    #[must_use]
    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    fn save(&mut self, tournament: &Tournament) -> Result<(), Error> {
        self.store.save(tournament).map_err(Error::Save)
    }

    fn push_round(&mut self, tournament: &mut Tournament, round: &Round) -> Result<(), Error> {
        info!(
            "{}: {} generated with {} matches ({} byes)",
            tournament.name,
            round.name,
            round.matches.len(),
            round.byes()
        );

        tournament.push_round(round.clone());
        self.save(tournament)
    }

    /// Shuffles the registered players and pairs them two by two.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`] if a round exists,
    /// [`Error::RoundLimitReached`] for a tournament of zero rounds, or
    /// [`Error::Save`].
    pub fn generate_first_round(&mut self, tournament: &mut Tournament) -> Result<Round, Error> {
        if tournament.current_round() != 0 {
            return Err(Error::AlreadyStarted);
        }
        if tournament.num_rounds == 0 {
            return Err(Error::RoundLimitReached { num_rounds: 0 });
        }

        let mut players = tournament.players().to_vec();
        players.shuffle(&mut self.rng);

        let round = Round::new(1, pair_in_order(players));
        self.push_round(tournament, &round)?;

        Ok(round)
    }

    /// Pairs players within score groups, swapping in a later player when the
    /// natural opponent is a rematch.
    ///
    /// The swap is a single greedy pass. When every remaining player has
    /// already met the current one the rematch is kept.
    ///
    /// # Errors
    ///
    /// [`Error::RoundLimitReached`] once every round exists, or
    /// [`Error::Save`].
    pub fn generate_next_round(&mut self, tournament: &mut Tournament) -> Result<Round, Error> {
        if tournament.current_round() >= tournament.num_rounds {
            return Err(Error::RoundLimitReached {
                num_rounds: tournament.num_rounds,
            });
        }

        let number = tournament.current_round() + 1;
        let standings = compute_standings(tournament);
        let mut players = score_groups(&standings, tournament.players(), &mut self.rng);
        let mut played = played_pairs(tournament);
        let mut matches = Vec::with_capacity(players.len() / 2 + 1);

        let mut i = 0;
        while i + 1 < players.len() {
            if played.contains(&pair(&players[i], &players[i + 1])) {
                let swap = (i + 2..players.len())
                    .find(|&j| !played.contains(&pair(&players[i], &players[j])));

                if let Some(j) = swap {
                    debug!(
                        "Round {number}: {} already played {}, pairing with {} instead",
                        players[i],
                        players[i + 1],
                        players[j]
                    );
                    players.swap(i + 1, j);
                } else {
                    warn!(
                        "Round {number}: rematch {} vs {}, no other opponent is left",
                        players[i],
                        players[i + 1]
                    );
                }
            }

            played.insert(pair(&players[i], &players[i + 1]));
            matches.push(Match::pending(players[i].clone(), players[i + 1].clone()));
            i += 2;
        }

        if players.len() % 2 == 1
            && let Some(last) = players.pop()
        {
            matches.push(Match::bye(last));
        }

        let round = Round::new(number, matches);
        self.push_round(tournament, &round)?;

        Ok(round)
    }

    /// Writes `(first, second)` scores by match index and closes the round.
    ///
    /// Unknown match indices and byes are skipped. The end time is stamped
    /// whether or not every match got a result.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for an unknown round, or [`Error::Save`].
    pub fn record_results(
        &mut self,
        tournament: &mut Tournament,
        round_index: usize,
        scores: &BTreeMap<usize, (f64, f64)>,
    ) -> Result<(), Error> {
        let len = tournament.rounds.len();
        let Some(round) = tournament.rounds.get_mut(round_index) else {
            return Err(Error::IndexOutOfRange {
                index: round_index,
                len,
            });
        };

        let mut recorded = 0;
        for (&index, &(first, second)) in scores {
            match round.matches.get_mut(index) {
                Some(game) => {
                    if game.record(first, second) {
                        recorded += 1;
                    } else {
                        debug!("{}: match {index} is a bye, ignoring its result", round.name);
                    }
                }
                None => debug!("{}: there is no match {index}, ignoring it", round.name),
            }
        }

        round.finish();
        info!(
            "{}: {} results recorded for {}",
            tournament.name, recorded, round.name
        );

        self.save(tournament)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::player::parse_date;

    #[derive(Debug, Default)]
    struct Saves(usize);

    impl Persist for Saves {
        fn save(&mut self, _tournament: &Tournament) -> anyhow::Result<()> {
            self.0 += 1;
            Ok(())
        }
    }

    struct Broken;

    impl Persist for Broken {
        fn save(&mut self, _tournament: &Tournament) -> anyhow::Result<()> {
            Err(anyhow::Error::msg("disk full"))
        }
    }

    fn id(string: &str) -> NationalId {
        string.parse().unwrap()
    }

    fn tournament(players: &[&str]) -> Tournament {
        let date = parse_date("01/01/2025").unwrap();
        let mut tournament = Tournament::new("Test", "Here", date, date, "");

        for player in players {
            tournament.register(id(player));
        }

        tournament
    }

    fn engine(seed: u64) -> Swiss<StdRng, Saves> {
        Swiss::new(StdRng::seed_from_u64(seed), Saves::default())
    }

    fn pairs(round: &Round) -> FxHashSet<Pair> {
        round
            .matches
            .iter()
            .filter_map(Match::players)
            .map(|(a, b)| pair(a, b))
            .collect()
    }

    #[test]
    fn first_round_odd_field() -> anyhow::Result<()> {
        let mut swiss = engine(1);
        let mut tournament = tournament(&["AA00001", "BB00002", "CC00003", "DD00004", "EE00005"]);

        let round = swiss.generate_first_round(&mut tournament)?;

        assert_eq!(round.name, "Round 1");
        assert_eq!(round.matches.len(), 3);
        assert_eq!(round.byes(), 1);
        assert!(round.end.is_none());
        assert_eq!(tournament.current_round(), 1);
        assert_eq!(tournament.rounds().len(), 1);
        assert_eq!(swiss.store().0, 1);

        let bye = round.matches.last().unwrap();
        assert!(bye.is_bye());
        let lucky = bye.first().participant.player().unwrap();
        assert_eq!(tournament.standings().get(lucky), Some(1.0));

        let mut seen: Vec<_> = round
            .matches
            .iter()
            .flat_map(|game| [game.first(), game.second()])
            .filter_map(|slot| slot.participant.player())
            .collect();
        seen.sort();
        assert_eq!(seen.len(), 5);
        seen.dedup();
        assert_eq!(seen.len(), 5);
        Ok(())
    }

    #[test]
    fn first_round_only_once() -> anyhow::Result<()> {
        let mut swiss = engine(2);
        let mut tournament = tournament(&["AA00001", "BB00002"]);

        swiss.generate_first_round(&mut tournament)?;
        let result = swiss.generate_first_round(&mut tournament);

        assert!(matches!(result, Err(Error::AlreadyStarted)));
        assert_eq!(tournament.rounds().len(), 1);
        assert_eq!(tournament.current_round(), 1);
        assert_eq!(swiss.store().0, 1);
        Ok(())
    }

    #[test]
    fn next_round_follows_scores() -> anyhow::Result<()> {
        for seed in 0..20 {
            let mut swiss = engine(seed);
            let mut tournament = tournament(&["AA00001", "BB00002", "CC00003", "DD00004"]);

            let mut ab = Match::pending(id("AA00001"), id("BB00002"));
            ab.record(1.0, 0.0);
            let mut cd = Match::pending(id("CC00003"), id("DD00004"));
            cd.record(1.0, 0.0);
            tournament.push_round(Round::new(1, vec![ab, cd]));

            let round = swiss.generate_next_round(&mut tournament)?;

            assert_eq!(round.name, "Round 2");
            let expected: FxHashSet<_> = [
                pair(&id("AA00001"), &id("CC00003")),
                pair(&id("BB00002"), &id("DD00004")),
            ]
            .into_iter()
            .collect();
            assert_eq!(pairs(&round), expected);
            assert!(round.matches.iter().all(|game| !game.is_scored()));
            assert_eq!(tournament.current_round(), 2);
        }

        Ok(())
    }

    #[test]
    fn rematch_is_swapped_away() -> anyhow::Result<()> {
        for seed in 0..50 {
            let mut swiss = engine(seed);
            let mut tournament = tournament(&["AA00001", "BB00002", "CC00003", "DD00004"]);

            let mut ab = Match::pending(id("AA00001"), id("BB00002"));
            ab.record(0.5, 0.5);
            let mut cd = Match::pending(id("CC00003"), id("DD00004"));
            cd.record(0.5, 0.5);
            tournament.push_round(Round::new(1, vec![ab, cd]));

            let round = swiss.generate_next_round(&mut tournament)?;
            let played = pairs(&round);

            assert_eq!(played.len(), 2);
            assert!(!played.contains(&pair(&id("AA00001"), &id("BB00002"))));
            assert!(!played.contains(&pair(&id("CC00003"), &id("DD00004"))));
        }

        Ok(())
    }

    #[test]
    fn unavoidable_rematch_is_kept() -> anyhow::Result<()> {
        let mut swiss = engine(3);
        let mut tournament = tournament(&["AA00001", "BB00002"]);

        swiss.generate_first_round(&mut tournament)?;
        let round = swiss.generate_next_round(&mut tournament)?;

        assert_eq!(round.matches.len(), 1);
        assert_eq!(
            pairs(&round),
            [pair(&id("AA00001"), &id("BB00002"))].into_iter().collect()
        );
        Ok(())
    }

    #[test]
    fn odd_field_bye_goes_to_the_bottom() -> anyhow::Result<()> {
        for seed in 0..10 {
            let mut swiss = engine(seed);
            let mut tournament = tournament(&["AA00001", "BB00002", "CC00003"]);

            let mut ab = Match::pending(id("AA00001"), id("BB00002"));
            ab.record(1.0, 0.0);
            tournament.push_round(Round::new(1, vec![ab, Match::bye(id("CC00003"))]));

            let round = swiss.generate_next_round(&mut tournament)?;

            assert_eq!(round.matches.len(), 2);
            assert_eq!(
                pairs(&round),
                [pair(&id("AA00001"), &id("CC00003"))].into_iter().collect()
            );
            let bye = round.matches.last().unwrap();
            assert!(bye.is_bye());
            assert_eq!(bye.first().participant.player(), Some(&id("BB00002")));
        }

        Ok(())
    }

    #[test]
    fn round_limit() -> anyhow::Result<()> {
        let mut swiss = engine(4);
        let mut tournament = tournament(&["AA00001", "BB00002"]).with_rounds(2);

        swiss.generate_first_round(&mut tournament)?;
        swiss.generate_next_round(&mut tournament)?;
        assert!(tournament.is_finished());

        let result = swiss.generate_next_round(&mut tournament);
        assert!(matches!(
            result,
            Err(Error::RoundLimitReached { num_rounds: 2 })
        ));
        assert_eq!(tournament.rounds().len(), 2);
        assert_eq!(tournament.current_round(), 2);
        assert_eq!(swiss.store().0, 2);
        Ok(())
    }

    #[test]
    fn zero_rounds() {
        let mut swiss = engine(4);
        let mut tournament = tournament(&["AA00001", "BB00002"]).with_rounds(0);

        assert!(matches!(
            swiss.generate_first_round(&mut tournament),
            Err(Error::RoundLimitReached { num_rounds: 0 })
        ));
        assert!(matches!(
            swiss.generate_next_round(&mut tournament),
            Err(Error::RoundLimitReached { num_rounds: 0 })
        ));
        assert!(tournament.rounds().is_empty());
        assert_eq!(swiss.store().0, 0);
    }

    #[test]
    fn next_round_can_open_the_tournament() -> anyhow::Result<()> {
        let mut swiss = engine(5);
        let mut tournament = tournament(&["AA00001", "BB00002", "CC00003", "DD00004"]);

        let round = swiss.generate_next_round(&mut tournament)?;

        assert_eq!(round.name, "Round 1");
        assert_eq!(round.matches.len(), 2);
        assert!(matches!(
            swiss.generate_first_round(&mut tournament),
            Err(Error::AlreadyStarted)
        ));
        Ok(())
    }

    #[test]
    fn late_players_join_the_next_round() -> anyhow::Result<()> {
        let mut swiss = engine(6);
        let mut tournament = tournament(&["AA00001", "BB00002"]);

        swiss.generate_first_round(&mut tournament)?;
        tournament.register(id("CC00003"));
        tournament.register(id("DD00004"));

        assert_eq!(tournament.rounds()[0].matches.len(), 1);

        let round = swiss.generate_next_round(&mut tournament)?;
        assert_eq!(round.matches.len(), 2);
        assert_eq!(round.byes(), 0);

        let seated: FxHashSet<_> = round
            .matches
            .iter()
            .flat_map(|game| [game.first(), game.second()])
            .filter_map(|slot| slot.participant.player())
            .collect();
        assert_eq!(seated.len(), 4);
        Ok(())
    }

    #[test]
    fn record_results_overwrites_and_closes() -> anyhow::Result<()> {
        let mut swiss = engine(7);
        let mut tournament = tournament(&["AA00001", "BB00002", "CC00003", "DD00004", "EE00005"]);
        swiss.generate_first_round(&mut tournament)?;

        let scores = BTreeMap::from([(0, (1.0, 0.0)), (1, (0.5, 0.5))]);
        swiss.record_results(&mut tournament, 0, &scores)?;

        let round = &tournament.rounds()[0];
        assert!(round.end.is_some());
        assert_eq!(round.matches[0].first().score, Some(1.0));
        assert_eq!(round.matches[1].second().score, Some(0.5));

        let scores = BTreeMap::from([(0, (0.0, 1.0))]);
        swiss.record_results(&mut tournament, 0, &scores)?;

        let round = &tournament.rounds()[0];
        assert_eq!(round.matches[0].first().score, Some(0.0));
        assert_eq!(round.matches[0].second().score, Some(1.0));
        assert_eq!(round.matches[1].first().score, Some(0.5));
        assert_eq!(tournament.current_round(), 1);
        assert_eq!(swiss.store().0, 3);
        Ok(())
    }

    #[test]
    fn record_results_skips_unknown_matches_and_byes() -> anyhow::Result<()> {
        let mut swiss = engine(8);
        let mut tournament = tournament(&["AA00001", "BB00002", "CC00003"]);
        swiss.generate_first_round(&mut tournament)?;
        let before = tournament.rounds()[0].matches.clone();

        let scores = BTreeMap::from([(1, (0.0, 1.0)), (7, (1.0, 0.0))]);
        swiss.record_results(&mut tournament, 0, &scores)?;

        let round = &tournament.rounds()[0];
        assert_eq!(round.matches, before);
        assert!(round.end.is_some());
        Ok(())
    }

    #[test]
    fn record_results_bad_round() -> anyhow::Result<()> {
        let mut swiss = engine(9);
        let mut tournament = tournament(&["AA00001", "BB00002"]);
        swiss.generate_first_round(&mut tournament)?;

        let result = swiss.record_results(&mut tournament, 1, &BTreeMap::new());

        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(
            result.map_err(|error| error.to_string()),
            Err("round index 1 is out of range, there are 1 rounds".to_string())
        );
        assert!(tournament.rounds()[0].end.is_none());
        assert_eq!(swiss.store().0, 1);
        Ok(())
    }

    #[test]
    fn failed_save_is_reported() {
        let mut swiss = Swiss::new(StdRng::seed_from_u64(10), Broken);
        let mut tournament = tournament(&["AA00001", "BB00002"]);

        let result = swiss.generate_first_round(&mut tournament);

        assert!(matches!(result, Err(Error::Save(_))));
        assert_eq!(tournament.current_round(), tournament.rounds().len());
    }

    #[test]
    fn counters_stay_in_step() -> anyhow::Result<()> {
        let mut swiss = engine(11);
        let mut tournament = tournament(&[
            "AA00001", "BB00002", "CC00003", "DD00004", "EE00005", "FF00006",
        ]);

        swiss.generate_first_round(&mut tournament)?;
        for index in 0..tournament.num_rounds {
            let scores = BTreeMap::from([(0, (1.0, 0.0)), (1, (0.0, 1.0)), (2, (0.5, 0.5))]);
            swiss.record_results(&mut tournament, index, &scores)?;
            assert_eq!(tournament.current_round(), tournament.rounds().len());

            if !tournament.is_finished() {
                swiss.generate_next_round(&mut tournament)?;
            }
            assert_eq!(tournament.current_round(), tournament.rounds().len());
        }

        let total: f64 = tournament
            .standings()
            .ranked()
            .iter()
            .map(|(_, points)| points)
            .sum();
        assert_eq!(total, 12.0);
        Ok(())
    }
}
