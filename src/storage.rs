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
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::debug;
use ron::ser::PrettyConfig;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{swiss::Persist, tournament::Tournament};

pub const PLAYERS_FILE: &str = "players.ron";
pub const TOURNAMENTS_DIR: &str = "tournaments";
const EXTENSION: &str = "ron";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("RON: {0}")]
    Serialize(#[from] ron::Error),
    #[error("RON: {}: {source}", path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("there is no tournament file {index}, {len} files are stored")]
    IndexOutOfRange { index: usize, len: usize },
}

pub(crate) fn write_ron<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let string = ron::ser::to_string_pretty(value, PrettyConfig::default())?;
    fs::write(path, string)?;
    debug!("wrote {}", path.display());

    Ok(())
}

/// `Ok(None)` when the file does not exist yet.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    match fs::read_to_string(path) {
        Ok(string) => match ron::from_str(&string) {
            Ok(value) => Ok(Some(value)),
            Err(source) => Err(StorageError::Deserialize {
                path: path.to_path_buf(),
                source,
            }),
        },
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// One RON file per tournament under `<data dir>/tournaments`.
#[derive(Clone, Debug)]
pub struct TournamentStore {
    dir: PathBuf,
}

impl TournamentStore {
    /// # Errors
    ///
    /// If the directory can't be created.
    pub fn new(data_dir: &Path) -> Result<Self, StorageError> {
        let dir = data_dir.join(TOURNAMENTS_DIR);
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `Spring Open` starting on 05/04/2025 is stored as
    /// `Spring_Open_05-04-2025.ron`.
    #[must_use]
    pub fn file_name(tournament: &Tournament) -> String {
        format!(
            "{}_{}.{EXTENSION}",
            tournament.name.replace([' ', '/', '\\'], "_"),
            tournament.start_date.format("%d-%m-%Y")
        )
    }

    /// # Errors
    ///
    /// If serializing or writing fails.
    pub fn write(&self, tournament: &Tournament) -> Result<PathBuf, StorageError> {
        let path = self.dir.join(Self::file_name(tournament));
        write_ron(&path, tournament)?;

        Ok(path)
    }

    /// # Errors
    ///
    /// If the file is missing or is not a tournament.
    pub fn load(&self, file_name: &str) -> Result<Tournament, StorageError> {
        let path = self.dir.join(file_name);

        read_ron(&path)?.ok_or_else(|| {
            StorageError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ))
        })
    }

    /// Stored file names, sorted.
    ///
    /// # Errors
    ///
    /// If the directory can't be read.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();

            if path.extension().is_some_and(|extension| extension == EXTENSION)
                && let Some(name) = path.file_name().and_then(|name| name.to_str())
            {
                files.push(name.to_string());
            }
        }

        files.sort_unstable();
        Ok(files)
    }

    /// Loads the `index`th entry of [`TournamentStore::list`].
    ///
    /// # Errors
    ///
    /// [`StorageError::IndexOutOfRange`], or if loading fails.
    pub fn load_by_index(&self, index: usize) -> Result<Tournament, StorageError> {
        let files = self.list()?;
        let Some(file_name) = files.get(index) else {
            return Err(StorageError::IndexOutOfRange {
                index,
                len: files.len(),
            });
        };

        self.load(file_name)
    }
}

impl Persist for TournamentStore {
    fn save(&mut self, tournament: &Tournament) -> anyhow::Result<()> {
        self.write(tournament)?;
        Ok(())
    }
}
