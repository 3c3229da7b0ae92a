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

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// A national chess federation id: two uppercase letters then five digits,
/// e.g. `AB12345`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ids read back from disk were validated when they entered the roster.
    pub(crate) fn from_stored(string: String) -> Self {
        Self(string)
    }

    #[must_use]
    pub fn is_valid(string: &str) -> bool {
        let bytes = string.as_bytes();

        bytes.len() == 7
            && bytes[..2].iter().all(u8::is_ascii_uppercase)
            && bytes[2..].iter().all(u8::is_ascii_digit)
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NationalId {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let string = string.trim();

        if Self::is_valid(string) {
            Ok(Self(string.to_string()))
        } else {
            Err(Error::InvalidNationalId(string.to_string()))
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub national_id: NationalId,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: NaiveDate,
}

impl Player {
    #[must_use]
    pub fn new(
        national_id: NationalId,
        last_name: &str,
        first_name: &str,
        birth_date: NaiveDate,
    ) -> Self {
        Self {
            national_id,
            last_name: last_name.trim().to_string(),
            first_name: first_name.trim().to_string(),
            birth_date,
        }
    }

    /// Sort key used for every alphabetical listing.
    #[must_use]
    pub fn alphabetical_key(&self) -> (String, String) {
        (self.last_name.to_lowercase(), self.first_name.to_lowercase())
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {} - {}",
            self.national_id,
            self.last_name,
            self.first_name,
            self.birth_date.format(DATE_FORMAT)
        )
    }
}

/// # Errors
///
/// If the date is not in the `DD/MM/YYYY` format.
pub fn parse_date(string: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(string.trim(), DATE_FORMAT)
        .map_err(|error| anyhow::Error::msg(format!("invalid date '{}': {error}", string.trim())))
}
