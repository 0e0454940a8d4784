//! Text rendering of boards and parsing of typed coordinates.
//!
//! Columns are lettered from `A` and map to `x`; rows are numbered from 1
//! and map to `y`.

use std::fmt::Write;

use crate::board::Board;
use crate::cell::Cell;
use crate::config::BOARD_SIZE;
use crate::domain::SessionView;

/// Parse a coordinate like `"B7"` (case-insensitive) into a cell. Returns
/// `None` for malformed input or squares off the board.
pub fn parse_coord(input: &str) -> Option<Cell> {
    let input = input.trim();
    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_uppercase() {
        return None;
    }
    let x = (col_ch as u8 - b'A') as i32;
    let row: i32 = chars.as_str().parse().ok()?;
    let cell = Cell::new(x, row - 1);
    cell.is_valid().then_some(cell)
}

/// Inverse of [`parse_coord`].
pub fn format_coord(cell: Cell) -> String {
    format!("{}{}", (b'A' + cell.x as u8) as char, cell.y + 1)
}

fn render_grid(out: &mut String, symbol: impl Fn(Cell) -> char) {
    out.push_str("   ");
    for x in 0..BOARD_SIZE {
        let _ = write!(out, " {}", (b'A' + x as u8) as char);
    }
    out.push('\n');
    for y in 0..BOARD_SIZE {
        let _ = write!(out, "{:2} ", y + 1);
        for x in 0..BOARD_SIZE {
            let _ = write!(out, " {}", symbol(Cell::new(x, y)));
        }
        out.push('\n');
    }
}

/// Render a board the owner sees it: `S` ship, `X` hit segment, `#` segment
/// of a sunk ship, `o` miss, `.` water.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    render_grid(&mut out, |cell| {
        match board.ships().iter().find(|ship| ship.contains(cell)) {
            Some(ship) if ship.is_dead() => '#',
            Some(ship) => match ship.cells().iter().find(|c| **c == cell) {
                Some(segment) if segment.is_dead => 'X',
                _ => 'S',
            },
            None if board.missed_shots().contains(&cell) => 'o',
            None => '.',
        }
    });
    out
}

/// Render what the player knows of the computer's board.
pub fn render_tracking(view: &SessionView) -> String {
    let mut out = String::new();
    render_grid(&mut out, |cell| {
        if view
            .computer_dead_ships
            .iter()
            .any(|ship| ship.contains(cell))
        {
            '#'
        } else if view.computer_wounds.contains(&cell) {
            'X'
        } else if view.computer_misses.contains(&cell) {
            'o'
        } else {
            '.'
        }
    });
    out
}

/// Both boards of a session, the computer's first.
pub fn render_session(view: &SessionView) -> String {
    format!(
        "Computer board:\n{}\nYour board:\n{}",
        render_tracking(view),
        render_board(&view.player)
    )
}
