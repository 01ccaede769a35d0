// Tracing route plans through a table, and comparing two maps by their walks.

use rand::Rng;

use super::config::*;
use super::table::{AdjacencyTable, Cell};
use crate::error::{MapError, Result};

/// A table together with the label of each room and the room walks start from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledMap {
    pub table: AdjacencyTable,
    pub labels: Vec<u8>,
    pub starting_room: usize,
}

impl LabeledMap {
    pub fn new(table: AdjacencyTable, labels: Vec<u8>, starting_room: usize) -> Result<Self> {
        if labels.len() != table.room_count() {
            return Err(MapError::malformed(
                "rooms",
                format!(
                    "{} labels for {} rooms",
                    labels.len(),
                    table.room_count()
                ),
            ));
        }
        if starting_room >= table.room_count() {
            return Err(MapError::out_of_range(
                "starting room",
                starting_room as i64,
                table.room_count() as i64,
            ));
        }
        Ok(LabeledMap {
            table,
            labels,
            starting_room,
        })
    }

    pub fn walk(&self, plan: &[u8]) -> Result<Vec<u8>> {
        walk(&self.table, &self.labels, self.starting_room, plan)
    }
}

/// Labels seen while following `plan` from `start`, starting room included.
///
/// An unresolved door leaves the walker where it is; the current label is
/// recorded again for that step.
pub fn walk(table: &AdjacencyTable, labels: &[u8], start: usize, plan: &[u8]) -> Result<Vec<u8>> {
    let rooms = table.room_count();
    if labels.len() < rooms {
        return Err(MapError::malformed(
            "rooms",
            format!("{} labels for {rooms} rooms", labels.len()),
        ));
    }
    if start >= rooms {
        return Err(MapError::out_of_range("starting room", start as i64, rooms as i64));
    }

    let mut current = start;
    let mut seen = Vec::with_capacity(plan.len() + 1);
    seen.push(labels[current]);
    for (step, &door) in plan.iter().enumerate() {
        let door = door as usize;
        if door >= DOORS_PER_ROOM {
            return Err(MapError::out_of_range(
                format!("plan step {step}"),
                door as i64,
                DOORS_PER_ROOM as i64,
            ));
        }
        if let Some(Cell::Resolved { room, .. }) = table.cell(current, door) {
            current = room;
        }
        seen.push(labels[current]);
    }
    Ok(seen)
}

/// Outcome of [`check_equivalence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Equivalence {
    Equivalent,
    DifferentRoomCount { left: usize, right: usize },
    /// The first random plan whose walks disagreed.
    Diverged { plan: Vec<u8> },
}

impl Equivalence {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Equivalence::Equivalent)
    }
}

/// Compare two maps by walking `trials` random plans of `rooms * 18` doors on both.
pub fn check_equivalence<R: Rng>(
    left: &LabeledMap,
    right: &LabeledMap,
    rng: &mut R,
    trials: usize,
) -> Result<Equivalence> {
    let rooms = left.table.room_count();
    if rooms != right.table.room_count() {
        return Ok(Equivalence::DifferentRoomCount {
            left: rooms,
            right: right.table.room_count(),
        });
    }

    let plan_len = rooms * PLAN_LENGTH_PER_ROOM;
    for trial in 0..trials {
        let plan: Vec<u8> = (0..plan_len)
            .map(|_| rng.gen_range(0..DOORS_PER_ROOM as u8))
            .collect();
        if left.walk(&plan)? != right.walk(&plan)? {
            tracing::debug!(trial, plan_len, "Maps diverged");
            return Ok(Equivalence::Diverged { plan });
        }
    }
    Ok(Equivalence::Equivalent)
}
