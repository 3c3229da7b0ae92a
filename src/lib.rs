//! A Swiss-system chess tournament manager.
//!
//! Players are kept in a [`roster::Roster`], tournaments in a
//! [`storage::TournamentStore`], and rounds are produced by the
//! [`swiss::Swiss`] engine:
//!
//! * round 1 pairs a random shuffle of the field,
//! * later rounds pair within score groups and avoid rematches where a single
//!   swap can,
//! * an odd player out gets a bye worth one point.
//!
//! ## Example
//!
//! ```ignore
//! let mut swiss = Swiss::new(rand::rng(), TournamentStore::new(&data_dir)?);
//! swiss.generate_first_round(&mut tournament)?;
//! swiss.record_results(&mut tournament, 0, &BTreeMap::from([(0, (1.0, 0.0))]))?;
//! swiss.generate_next_round(&mut tournament)?;
//! println!("{}", tournament.standings());
//! ```

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

#![deny(clippy::panic)]
#![cfg_attr(not(test), deny(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod pairing;
pub mod player;
pub mod roster;
pub mod round;
pub mod standings;
pub mod storage;
pub mod swiss;
pub mod tournament;
pub mod utils;

pub use error::Error;
pub use pairing::{Match, Participant, Slot};
pub use player::{NationalId, Player};
pub use round::Round;
pub use standings::{Standings, compute_standings};
pub use swiss::{NoSave, Persist, Swiss};
pub use tournament::Tournament;

pub const HOME: &str = "swiss-chess";

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2025-2026 Developers of the swiss-chess project

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2025 Developers of the swiss-chess project
Licensed under the AGPLv3"
);
