// Text rendering of adjacency tables: one line per room, doors 0 through 5.

use std::str::FromStr;

use super::config::*;
use super::table::{AdjacencyTable, Cell, Row};
use crate::error::{MapError, Result};

/// Output granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Destination room indices only, `-1` for unknown doors.
    #[default]
    Dense,
    /// `Room r: (room,door) ...` with `(?,?)` for unknown doors.
    Verbose,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dense" => Ok(RenderMode::Dense),
            "verbose" => Ok(RenderMode::Verbose),
            other => Err(format!("unknown render mode `{other}` (expected dense or verbose)")),
        }
    }
}

/// Formats tables in a chosen mode, optionally tagging verbose rows with room labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer<'a> {
    mode: RenderMode,
    labels: Option<&'a [u8]>,
}

impl<'a> Renderer<'a> {
    pub fn new(mode: RenderMode) -> Self {
        Renderer { mode, labels: None }
    }

    /// Attach per-room labels; shown in verbose mode only.
    pub fn with_labels(mut self, labels: &'a [u8]) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn render(&self, table: &AdjacencyTable) -> Vec<String> {
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(room, row)| self.render_row(room, row))
            .collect()
    }

    pub fn render_row(&self, room: usize, row: &Row) -> String {
        match self.mode {
            RenderMode::Dense => row
                .iter()
                .map(|cell| match cell.room() {
                    Some(r) => r.to_string(),
                    None => DENSE_UNRESOLVED.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
            RenderMode::Verbose => {
                let mut line = format!("Room {room}");
                if let Some(label) = self.labels.and_then(|l| l.get(room)) {
                    line.push_str(&format!(" ({label})"));
                }
                let cells = row
                    .iter()
                    .map(|cell| match *cell {
                        Cell::Resolved { room, door } => format!("({room},{door})"),
                        Cell::Unresolved => VERBOSE_UNRESOLVED.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{line}: {cells}")
            }
        }
    }
}

/// Render with no labels attached.
pub fn render(table: &AdjacencyTable, mode: RenderMode) -> Vec<String> {
    Renderer::new(mode).render(table)
}

/// Read back dense output: six destination rooms per non-blank line, `-1` for unknown.
pub fn parse_dense(text: &str) -> Result<Vec<[Option<usize>; DOORS_PER_ROOM]>> {
    let mut rows = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let location = format!("line {}", n + 1);
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != DOORS_PER_ROOM {
            return Err(MapError::malformed(
                location,
                format!(
                    "expected {DOORS_PER_ROOM} fields, found {}: `{line}`",
                    tokens.len()
                ),
            ));
        }
        let mut row = [None; DOORS_PER_ROOM];
        for (slot, token) in row.iter_mut().zip(&tokens) {
            if *token == DENSE_UNRESOLVED {
                continue;
            }
            let room = token.parse::<usize>().map_err(|_| {
                MapError::malformed(
                    location.clone(),
                    format!("expected a room index or {DENSE_UNRESOLVED}, found `{token}`"),
                )
            })?;
            *slot = Some(room);
        }
        rows.push(row);
    }
    Ok(rows)
}
