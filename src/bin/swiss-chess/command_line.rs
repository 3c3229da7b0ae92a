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

use std::{io::Write as _, path::PathBuf};

use clap::{CommandFactory, Parser, builder::TypedValueParser as _};
use swiss_chess::{COPYRIGHT, LONG_VERSION, tournament::DEFAULT_ROUNDS};

/// Swiss Chess
///
/// An interactive manager for Swiss-system chess tournaments.
#[derive(Parser, Debug)]
#[command(long_version = LONG_VERSION, about = "Swiss-system chess tournament manager")]
pub(crate) struct Args {
    /// Where players and tournaments are stored
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Number of rounds for tournaments created in this session
    #[arg(
        default_value_t = DEFAULT_ROUNDS,
        long,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from),
    )]
    pub rounds: usize,

    /// Whether to log on the debug level
    #[arg(long)]
    pub debug: bool,

    /// Build the manpage
    #[arg(long)]
    pub man: bool,
}

impl Args {
    pub(crate) fn generate_man_page() -> anyhow::Result<()> {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Self::command().name("swiss-chess").long_version(None);
        let man = clap_mangen::Man::new(cmd).date("2026-10-17");

        man.render(&mut buffer)?;
        write!(buffer, "{COPYRIGHT}")?;

        std::fs::write("swiss-chess.1", buffer)?;
        Ok(())
    }
}
