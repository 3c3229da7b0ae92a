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

use std::{cmp::Ordering, fmt};

use rustc_hash::FxHashMap;

use crate::{
    pairing::{Match, Slot},
    player::NationalId,
    tournament::Tournament,
};

/// Match points: 1.0 for the higher score, 0.5 each for equal scores.
///
/// Scores compare numerically, so `0.0` and `-0.0` are a draw and a `NaN`
/// earns nothing on either side.
#[must_use]
pub fn match_points(own: f64, other: f64) -> f64 {
    match own.partial_cmp(&other) {
        Some(Ordering::Greater) => 1.0,
        Some(Ordering::Equal) => 0.5,
        Some(Ordering::Less) | None => 0.0,
    }
}

/// Cumulative points per registered player.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Standings(FxHashMap<NationalId, f64>);

impl Standings {
    /// Zero for a registered player without results, `None` for an unknown id.
    #[must_use]
    pub fn get(&self, id: &NationalId) -> Option<f64> {
        self.0.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Points descending, then id ascending.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&NationalId, f64)> {
        let mut ranked: Vec<_> = self.0.iter().map(|(id, points)| (id, *points)).collect();
        ranked.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    fn award(&mut self, own: &Slot, other: &Slot) {
        let (Some(id), Some(score)) = (own.participant.player(), own.score) else {
            return;
        };
        let Some(other) = other.score else {
            return;
        };

        // Ids that are no longer registered are not tracked.
        if let Some(total) = self.0.get_mut(id) {
            *total += match_points(score, other);
        }
    }

    fn add_match(&mut self, game: &Match) {
        self.award(game.first(), game.second());
        self.award(game.second(), game.first());
    }
}

impl fmt::Display for Standings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, points) in self.ranked() {
            writeln!(f, "{id}: {points:.1}")?;
        }

        Ok(())
    }
}

/// Totals every scored slot of every round. Unscored slots add nothing, so a
/// half-entered round can be tallied.
#[must_use]
pub fn compute_standings(tournament: &Tournament) -> Standings {
    let mut standings = Standings(
        tournament
            .players()
            .iter()
            .map(|id| (id.clone(), 0.0))
            .collect(),
    );

    for round in tournament.rounds() {
        for game in &round.matches {
            standings.add_match(game);
        }
    }

    standings
}

impl Tournament {
    #[must_use]
    pub fn standings(&self) -> Standings {
        compute_standings(self)
    }
}
