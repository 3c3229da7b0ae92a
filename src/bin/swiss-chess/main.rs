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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

mod command_line;

use std::{
    collections::BTreeMap,
    fs,
    io::{self, BufRead, StdinLock, Write},
};

use clap::Parser;
use log::{error, info};
use rand::rngs::ThreadRng;
use swiss_chess::{
    NationalId, Player, Swiss, Tournament,
    player::parse_date,
    roster::Roster,
    storage::TournamentStore,
    utils,
};

use crate::command_line::Args;

const MAIN_MENU: &str = "=== Swiss Chess ===
1) Add a player
2) List all players
3) Create a tournament
4) List tournaments
5) Load a tournament
6) Quit";

const TOURNAMENT_MENU: &str = "1) Show players (alphabetical)
2) Generate round 1
3) Generate the next round
4) Show rounds and matches
5) Enter results for a round
6) Show standings
7) Register a player
8) Save and return";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::init_logger(args.debug);

    if args.man {
        return Args::generate_man_page();
    }

    let data_dir = args.data_dir.unwrap_or_else(utils::default_data_dir);
    fs::create_dir_all(&data_dir)?;
    info!("data directory: {}", data_dir.display());

    let mut app = App {
        roster: Roster::load(&data_dir)?,
        swiss: Swiss::new(rand::rng(), TournamentStore::new(&data_dir)?),
        rounds: args.rounds,
        input: io::stdin().lock(),
    };

    app.run()
}

struct App {
    roster: Roster,
    swiss: Swiss<ThreadRng, TournamentStore>,
    rounds: usize,
    input: StdinLock<'static>,
}

impl App {
    /// `None` on end of input.
    fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;

        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }

        Ok(Some(buffer.trim().to_string()))
    }

    fn run(&mut self) -> anyhow::Result<()> {
        loop {
            println!("{MAIN_MENU}");
            let Some(choice) = self.prompt("Choice: ")? else {
                return Ok(());
            };

            let result: anyhow::Result<()> = match choice.as_str() {
                "1" => self.add_player(),
                "2" => {
                    self.list_players();
                    Ok(())
                }
                "3" => self.create_tournament(),
                "4" => self.list_tournaments(),
                "5" => self.load_tournament(),
                "6" => return Ok(()),
                _ => Err(anyhow::Error::msg(format!("unknown choice '{choice}'"))),
            };

            if let Err(error) = result {
                println!("? {error}\n");
            }
        }
    }

    fn add_player(&mut self) -> anyhow::Result<()> {
        let Some(id) = self.prompt("National id (e.g. AB12345): ")? else {
            return Ok(());
        };
        let id: NationalId = id.parse()?;

        if self.roster.contains(&id) {
            return Err(anyhow::Error::msg(format!("{id} already exists")));
        }

        let last_name = self.prompt("Last name: ")?.unwrap_or_default();
        let first_name = self.prompt("First name: ")?.unwrap_or_default();
        let birth_date = self.prompt("Birth date (DD/MM/YYYY): ")?.unwrap_or_default();
        let birth_date = parse_date(&birth_date)?;

        self.roster
            .add(Player::new(id, &last_name, &first_name, birth_date))?;
        println!("= player added\n");

        Ok(())
    }

    fn list_players(&self) {
        for player in self.roster.sorted() {
            println!("{player}");
        }
        println!();
    }

    fn register_players(&mut self, tournament: &mut Tournament) -> anyhow::Result<()> {
        println!("Register players (empty line to finish):");

        while let Some(id) = self.prompt("National id: ")? {
            if id.is_empty() {
                break;
            }

            let registered = id
                .parse::<NationalId>()
                .and_then(|id| self.roster.register(tournament, &id));

            match registered {
                Ok(true) => {}
                Ok(false) => println!("? {id} is already registered"),
                Err(error) => println!("? {error}"),
            }
        }

        self.swiss.store().write(tournament)?;
        Ok(())
    }

    fn create_tournament(&mut self) -> anyhow::Result<()> {
        let name = self.prompt("Tournament name: ")?.unwrap_or_default();
        if name.is_empty() {
            return Err(anyhow::Error::msg("a tournament needs a name"));
        }

        let location = self.prompt("Location: ")?.unwrap_or_default();
        let start_date = self.prompt("Start date (DD/MM/YYYY): ")?.unwrap_or_default();
        let start_date = parse_date(&start_date)?;
        let end_date = self.prompt("End date (DD/MM/YYYY): ")?.unwrap_or_default();
        let end_date = parse_date(&end_date)?;
        let description = self.prompt("Description: ")?.unwrap_or_default();

        let mut tournament = Tournament::new(&name, &location, start_date, end_date, &description)
            .with_rounds(self.rounds);

        self.register_players(&mut tournament)?;
        println!("= tournament created and saved\n");

        Ok(())
    }

    fn list_tournaments(&self) -> anyhow::Result<()> {
        let files = self.swiss.store().list()?;

        if files.is_empty() {
            println!("No tournaments found.");
        }
        for (index, file) in files.iter().enumerate() {
            println!("{index}) {file}");
        }
        println!();

        Ok(())
    }

    fn load_tournament(&mut self) -> anyhow::Result<()> {
        self.list_tournaments()?;

        let Some(index) = self.prompt("Number of the file to load: ")? else {
            return Ok(());
        };
        let mut tournament = self.swiss.store().load_by_index(index.parse()?)?;
        info!("loaded {}", tournament.name);

        self.tournament_menu(&mut tournament)
    }

    fn tournament_menu(&mut self, tournament: &mut Tournament) -> anyhow::Result<()> {
        loop {
            println!("--- {tournament} ---");
            println!("{TOURNAMENT_MENU}");

            let Some(choice) = self.prompt("Choice: ")? else {
                break;
            };

            let result: anyhow::Result<()> = match choice.as_str() {
                "1" => {
                    for player in self.roster.tournament_players(tournament) {
                        println!("{player}");
                    }
                    Ok(())
                }
                "2" => self
                    .swiss
                    .generate_first_round(tournament)
                    .map(|round| {
                        println!("= {} created with {} matches", round.name, round.matches.len());
                    })
                    .map_err(Into::into),
                "3" => self
                    .swiss
                    .generate_next_round(tournament)
                    .map(|round| println!("= {} created\n{round}", round.name))
                    .map_err(Into::into),
                "4" => {
                    for (index, round) in tournament.rounds().iter().enumerate() {
                        print!("{index}: {round}");
                    }
                    Ok(())
                }
                "5" => self.enter_results(tournament),
                "6" => {
                    print!("{}", tournament.standings());
                    Ok(())
                }
                "7" => self.register_players(tournament),
                "8" => break,
                _ => Err(anyhow::Error::msg(format!("unknown choice '{choice}'"))),
            };

            if let Err(error) = result {
                println!("? {error}");
            }
            println!();
        }

        if let Err(error) = self.swiss.store().write(tournament) {
            error!("save {}: {error}", tournament.name);
            return Err(error.into());
        }

        Ok(())
    }

    fn enter_results(&mut self, tournament: &mut Tournament) -> anyhow::Result<()> {
        let Some(index) = self.prompt("Round index: ")? else {
            return Ok(());
        };
        let round_index: usize = index.parse()?;

        let Some(matches) = tournament
            .rounds()
            .get(round_index)
            .map(|round| round.matches.clone())
        else {
            self.swiss
                .record_results(tournament, round_index, &BTreeMap::new())?;
            return Ok(());
        };

        println!("Enter 'score1 score2' for each match, or nothing to skip it.");
        let mut scores = BTreeMap::new();

        for (index, game) in matches.iter().enumerate() {
            if game.is_bye() {
                println!("  {index}) {game} (bye)");
                continue;
            }

            let Some(line) = self.prompt(&format!("  {index}) {game}: "))? else {
                break;
            };
            if line.is_empty() {
                continue;
            }

            match parse_scores(&line) {
                Ok(score) => {
                    scores.insert(index, score);
                }
                Err(error) => println!("? {error}, skipping"),
            }
        }

        self.swiss.record_results(tournament, round_index, &scores)?;
        println!("= results saved");

        Ok(())
    }
}

fn parse_scores(line: &str) -> anyhow::Result<(f64, f64)> {
    let words: Vec<_> = line.split_ascii_whitespace().collect();

    let [first, second] = words.as_slice() else {
        return Err(anyhow::Error::msg(format!("expected two scores, got '{line}'")));
    };

    Ok((first.parse()?, second.parse()?))
}
