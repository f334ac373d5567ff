use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use bracket_geometry::prelude::Point;
use log::warn;

use crate::{
    board::{ArcaneBoard, PlacementResult},
    data::{CellState, CharacterClass, RuneId},
    error::{Error, ScriptError},
    session::BoardSession,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Class(CharacterClass),
    Place(RuneId, Point),
    Remove(RuneId),
    Check(RuneId, Point),
    Apply,
    Reset,
    Save(Option<u8>),
    Load(Option<u8>),
    Grant(RuneId),
    Stats,
    Grid,
}

/// A queue of board commands read from a line-oriented script.
pub struct ScriptedCommands {
    commands: Vec<Command>,
    current_command_index: usize,
}

impl ScriptedCommands {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let file = File::open(path)?;
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            lines.push(line?);
        }
        Self::parse_lines(lines.iter().map(String::as_str))
    }

    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        Self::parse_lines(source.lines())
    }

    fn parse_lines<'a, I>(lines: I) -> Result<Self, ScriptError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut commands = Vec::new();
        for (idx, line) in lines.into_iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let command = parse_command(trimmed).map_err(|message| ScriptError::Parse {
                line: idx + 1,
                message,
            })?;
            commands.push(command);
        }
        Ok(Self {
            commands,
            current_command_index: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn next_command(&mut self) -> Option<Command> {
        let command = self.commands.get(self.current_command_index).cloned()?;
        self.current_command_index += 1;
        Some(command)
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match (verb.as_str(), args.as_slice()) {
        ("class", [name]) => Command::Class(name.parse()?),
        ("place", [id, x, y]) => Command::Place(parse_rune(id)?, parse_point(x, y)?),
        ("remove", [id]) => Command::Remove(parse_rune(id)?),
        ("check", [id, x, y]) => Command::Check(parse_rune(id)?, parse_point(x, y)?),
        ("apply", []) => Command::Apply,
        ("reset", []) => Command::Reset,
        ("save", []) => Command::Save(None),
        ("save", [preset]) => Command::Save(Some(parse_number(preset)?)),
        ("load", []) => Command::Load(None),
        ("load", [preset]) => Command::Load(Some(parse_number(preset)?)),
        ("grant", [id]) => Command::Grant(parse_rune(id)?),
        ("stats", []) => Command::Stats,
        ("grid", []) => Command::Grid,
        _ => return Err(format!("unrecognized command '{line}'")),
    };
    Ok(command)
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Result<T, String> {
    word.parse()
        .map_err(|_| format!("'{word}' is not a valid number"))
}

fn parse_rune(word: &str) -> Result<RuneId, String> {
    parse_number(word).map(RuneId)
}

fn parse_point(x: &str, y: &str) -> Result<Point, String> {
    Ok(Point::new(parse_number::<i32>(x)?, parse_number::<i32>(y)?))
}

/// Runs one command against the session and returns log lines describing it.
///
/// Rejected placements and removals are reported as lines rather than errors
/// so a script keeps going after a bad move.
pub fn execute(session: &mut BoardSession, command: &Command) -> Result<Vec<String>, Error> {
    let mut log = Vec::new();
    match command {
        Command::Class(class) => {
            session.change_class(*class)?;
            log.push(format!(
                "Class {} active, preset {}",
                class,
                session.current_preset_index()
            ));
        }
        Command::Place(rune, pos) => match session.board_mut().place_rune(*rune, *pos) {
            Ok(removed) if removed.is_empty() => {
                log.push(format!("Placed {} at {},{}", rune, pos.x, pos.y));
            }
            Ok(removed) => {
                let names: Vec<String> = removed.iter().map(RuneId::to_string).collect();
                log.push(format!(
                    "Placed {} at {},{} replacing {}",
                    rune,
                    pos.x,
                    pos.y,
                    names.join(", ")
                ));
            }
            Err(err) => log.push(format!("Rejected: {err}")),
        },
        Command::Remove(rune) => match session.board_mut().remove_rune(*rune) {
            Ok(()) => log.push(format!("Removed {rune}")),
            Err(err) => log.push(format!("Rejected: {err}")),
        },
        Command::Check(rune, pos) => {
            let check = session.board_mut().check_placement(*rune, *pos);
            let verdict = match check.result {
                PlacementResult::Valid => "fits".to_string(),
                PlacementResult::ReplaceExisting => format!("replaces {:?}", check.affected),
                PlacementResult::OutOfBounds => "out of bounds".to_string(),
            };
            log.push(format!("{} at {},{} {}", rune, pos.x, pos.y, verdict));
        }
        Command::Apply => {
            let stats = session.apply_board_changes()?;
            log.push(format!("Applied: {}", stats.rune_stats));
        }
        Command::Reset => match session.board_mut().reset_all_runes() {
            Some(_) => log.push("Board cleared".to_string()),
            None => log.push("Board already empty".to_string()),
        },
        Command::Save(preset) => {
            let index = session.save_board_config(*preset)?;
            log.push(format!("Saved preset {index}"));
        }
        Command::Load(preset) => {
            session.load_board_config(*preset)?;
            log.push(format!(
                "Loaded preset {} ({} runes)",
                session.current_preset_index(),
                session.board().placed_runes().len()
            ));
        }
        Command::Grant(rune) => {
            if session.add_rune_to_inventory(*rune)? {
                log.push(format!("Granted {rune}"));
            } else {
                warn!("Ignoring grant of reserved rune id");
            }
        }
        Command::Stats => {
            let board = session.board();
            let stats = board.current_stats();
            log.push(format!(
                "Base [{}] Bonus [{}] Connected {}{}",
                stats.rune_stats,
                stats.bonus_stats,
                board.connected_rune_count(),
                if board.has_unsaved_changes() { " (unsaved)" } else { "" }
            ));
            match serde_json::to_string(&stats) {
                Ok(json) => log.push(json),
                Err(err) => warn!("Could not encode stats: {err}"),
            }
        }
        Command::Grid => log.extend(grid_rows(session.board())),
    }
    Ok(log)
}

/// Text dump of the grid: `.` empty, `#` fixed, rune ids in hex, `*` marks a
/// connected cell, `@` the special cell, blank where no cell exists.
pub fn grid_rows(board: &ArcaneBoard) -> Vec<String> {
    let cells = board.cells();
    let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
        return Vec::new();
    };
    let min_x = cells.iter().map(|cell| cell.pos.x).min().unwrap_or(first.pos.x);
    let max_x = cells.iter().map(|cell| cell.pos.x).max().unwrap_or(last.pos.x);

    let mut rows = Vec::new();
    for y in first.pos.y..=last.pos.y {
        let mut row = String::new();
        for x in min_x..=max_x {
            let glyph = match board.cell(Point::new(x, y)) {
                None => "  ".to_string(),
                Some(cell) => {
                    let body = match (cell.state, cell.rune_id.is_none()) {
                        (CellState::Empty, _) if cell.is_special => '@',
                        (CellState::Empty, _) => '.',
                        (CellState::Occupied, true) => '#',
                        (CellState::Occupied, false) => {
                            std::char::from_digit(u32::from(cell.rune_id.0 % 16), 16)
                                .unwrap_or('?')
                        }
                    };
                    let mark = if cell.is_connected { '*' } else { ' ' };
                    format!("{body}{mark}")
                }
            };
            row.push_str(&glyph);
        }
        rows.push(row.trim_end().to_string());
    }
    rows
}
