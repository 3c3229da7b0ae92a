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

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    error::Error,
    player::{NationalId, Player},
    storage::{PLAYERS_FILE, StorageError, read_ron, write_ron},
    tournament::Tournament,
};

/// Every known player, stored in `<data dir>/players.ron`.
#[derive(Clone, Debug)]
pub struct Roster {
    path: PathBuf,
    players: BTreeMap<NationalId, Player>,
}

impl Roster {
    /// Reads the roster, starting empty if there is no file yet.
    ///
    /// # Errors
    ///
    /// If the file exists but can't be read or parsed.
    pub fn load(data_dir: &Path) -> Result<Self, StorageError> {
        let path = data_dir.join(PLAYERS_FILE);
        let players: Vec<Player> = read_ron(&path)?.unwrap_or_default();

        Ok(Self {
            path,
            players: players
                .into_iter()
                .map(|player| (player.national_id.clone(), player))
                .collect(),
        })
    }

    /// Adds and saves a new player. Returns `false` if the id is taken.
    ///
    /// # Errors
    ///
    /// If saving fails.
    pub fn add(&mut self, player: Player) -> Result<bool, StorageError> {
        if self.players.contains_key(&player.national_id) {
            return Ok(false);
        }

        info!("adding player {player}");
        self.players.insert(player.national_id.clone(), player);
        self.save()?;

        Ok(true)
    }

    #[must_use]
    pub fn get(&self, id: &NationalId) -> Option<&Player> {
        self.players.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &NationalId) -> bool {
        self.players.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// By last name, then first name, ignoring case.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Player> {
        let mut players: Vec<_> = self.players.values().collect();
        players.sort_by_cached_key(|player| player.alphabetical_key());
        players
    }

    /// Enters a known player into `tournament`. Returns `false` if they are
    /// already registered.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPlayer`] if the id is not on the roster.
    pub fn register(&self, tournament: &mut Tournament, id: &NationalId) -> Result<bool, Error> {
        if !self.contains(id) {
            return Err(Error::UnknownPlayer(id.clone()));
        }

        Ok(tournament.register(id.clone()))
    }

    /// The registered players found on the roster, alphabetically.
    #[must_use]
    pub fn tournament_players(&self, tournament: &Tournament) -> Vec<&Player> {
        let mut players: Vec<_> = tournament
            .players()
            .iter()
            .filter_map(|id| self.get(id))
            .collect();

        players.sort_by_cached_key(|player| player.alphabetical_key());
        players
    }

    fn save(&self) -> Result<(), StorageError> {
        let players: Vec<_> = self.players.values().collect();
        write_ron(&self.path, &players)
    }
}
