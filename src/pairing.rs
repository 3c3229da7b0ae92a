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

use serde::{Deserialize, Serialize};

use crate::player::NationalId;

pub const BYE: &str = "BYE";

/// Who sits in one half of a match.
///
/// Stored as a bare string, `"BYE"` being the sentinel, so saved records
/// keep the `(participant, score)` shape.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Participant {
    Player(NationalId),
    Bye,
}

impl Participant {
    #[must_use]
    pub fn player(&self) -> Option<&NationalId> {
        match self {
            Self::Player(id) => Some(id),
            Self::Bye => None,
        }
    }
}

impl From<String> for Participant {
    fn from(string: String) -> Self {
        if string == BYE {
            Self::Bye
        } else {
            Self::Player(NationalId::from_stored(string))
        }
    }
}

impl From<Participant> for String {
    fn from(participant: Participant) -> Self {
        match participant {
            Participant::Player(id) => id.as_str().to_string(),
            Participant::Bye => BYE.to_string(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(id) => write!(f, "{id}"),
            Self::Bye => write!(f, "{BYE}"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Slot {
    pub participant: Participant,
    pub score: Option<f64>,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.score {
            Some(score) => write!(f, "{} ({score:.1})", self.participant),
            None => write!(f, "{} (-)", self.participant),
        }
    }
}

/// Two slots in a fixed order. Scores change only through [`Match::record`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Match {
    first: Slot,
    second: Slot,
}

impl Match {
    /// A match waiting for its result.
    #[must_use]
    pub fn pending(first: NationalId, second: NationalId) -> Self {
        Self {
            first: Slot {
                participant: Participant::Player(first),
                score: None,
            },
            second: Slot {
                participant: Participant::Player(second),
                score: None,
            },
        }
    }

    /// An automatic win: the player scores 1.0 and the bye 0.0.
    #[must_use]
    pub fn bye(player: NationalId) -> Self {
        Self {
            first: Slot {
                participant: Participant::Player(player),
                score: Some(1.0),
            },
            second: Slot {
                participant: Participant::Bye,
                score: Some(0.0),
            },
        }
    }

    #[must_use]
    pub fn first(&self) -> &Slot {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &Slot {
        &self.second
    }

    #[must_use]
    pub fn is_bye(&self) -> bool {
        self.first.participant == Participant::Bye || self.second.participant == Participant::Bye
    }

    /// Both scores have been entered.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.first.score.is_some() && self.second.score.is_some()
    }

    /// The two opponents, or `None` for a bye.
    #[must_use]
    pub fn players(&self) -> Option<(&NationalId, &NationalId)> {
        match (&self.first.participant, &self.second.participant) {
            (Participant::Player(first), Participant::Player(second)) => Some((first, second)),
            _ => None,
        }
    }

    /// Overwrites both scores. A bye keeps its fixed 1.0 / 0.0 and returns
    /// `false`.
    pub fn record(&mut self, first: f64, second: f64) -> bool {
        if self.is_bye() {
            return false;
        }

        self.first.score = Some(first);
        self.second.score = Some(second);
        true
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.first, self.second)
    }
}
