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

use thiserror::Error;

use crate::player::NationalId;

/// Failures of the tournament engine and roster. Each one is raised before
/// any state changes, except [`Error::Save`] which follows a completed
/// mutation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("round 1 has already been generated")]
    AlreadyStarted,
    #[error("all {num_rounds} rounds have already been generated")]
    RoundLimitReached { num_rounds: usize },
    #[error("round index {index} is out of range, there are {len} rounds")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid national id '{0}', expected e.g. AB12345")]
    InvalidNationalId(String),
    #[error("unknown player {0}, add the player first")]
    UnknownPlayer(NationalId),
    #[error("save: {0:#}")]
    Save(anyhow::Error),
}
