use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::config::*;
use crate::error::{MapError, Result};

/// One door of one room, as it appears in connection records.
///
/// Fields are signed so that negative indices in the input surface as
/// range errors from [`AdjacencyTable::build`] rather than decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub room: i64,
    pub door: i64,
}

impl Endpoint {
    pub fn new(room: i64, door: i64) -> Self {
        Endpoint { room, door }
    }
}

/// A bidirectional edge: leaving `from` arrives at `to`, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn new(from_room: i64, from_door: i64, to_room: i64, to_door: i64) -> Self {
        Connection {
            from: Endpoint::new(from_room, from_door),
            to: Endpoint::new(to_room, to_door),
        }
    }
}

/// Destination of a single door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Unresolved,
    Resolved { room: usize, door: usize },
}

impl Cell {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Cell::Resolved { .. })
    }

    /// Destination room, if known.
    pub fn room(&self) -> Option<usize> {
        match *self {
            Cell::Resolved { room, .. } => Some(room),
            Cell::Unresolved => None,
        }
    }
}

pub type Row = [Cell; DOORS_PER_ROOM];

/// How many rows a table gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCount {
    /// Exactly this many rooms; indices at or above it are rejected.
    Fixed(NonZeroUsize),
    /// One more than the highest room index referenced by any connection.
    Inferred,
}

impl RoomCount {
    /// Shorthand for `Fixed`; `None` when `rooms` is zero.
    pub fn fixed(rooms: usize) -> Option<Self> {
        NonZeroUsize::new(rooms).map(RoomCount::Fixed)
    }

    fn resolve(self, connections: &[Connection]) -> Result<usize> {
        let rows = match self {
            RoomCount::Fixed(n) => n.get(),
            RoomCount::Inferred => connections
                .iter()
                .flat_map(|c| [c.from.room, c.to.room])
                .max()
                .map_or(0, |max| max.max(-1).saturating_add(1)) as usize,
        };
        if rows > MAX_ROOMS {
            return Err(MapError::out_of_range(
                "room count",
                rows as i64,
                MAX_ROOMS as i64 + 1,
            ));
        }
        Ok(rows)
    }
}

/// Per-room, per-door destinations with both directions of every edge filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyTable {
    rows: Vec<Row>,
}

impl AdjacencyTable {
    /// A table of `rooms` rows with every door unresolved.
    pub fn empty(rooms: usize) -> Self {
        AdjacencyTable {
            rows: vec![[Cell::Unresolved; DOORS_PER_ROOM]; rooms],
        }
    }

    /// Build a table from connection records in a single pass.
    ///
    /// Each connection writes `from → to` and `to → from`. When two records
    /// disagree about a door, the later one wins.
    pub fn build(connections: &[Connection], room_count: RoomCount) -> Result<Self> {
        let mut table = AdjacencyTable::empty(room_count.resolve(connections)?);

        for (i, conn) in connections.iter().enumerate() {
            let (fr, fd) = table.check(i, "from", conn.from)?;
            let (tr, td) = table.check(i, "to", conn.to)?;
            table.write(fr, fd, Cell::Resolved { room: tr, door: td }, i);
            table.write(tr, td, Cell::Resolved { room: fr, door: fd }, i);
        }

        tracing::debug!(
            rooms = table.rows.len(),
            connections = connections.len(),
            "Built adjacency table"
        );
        Ok(table)
    }

    fn check(&self, record: usize, side: &str, ep: Endpoint) -> Result<(usize, usize)> {
        let rooms = self.rows.len() as i64;
        if ep.room < 0 || ep.room >= rooms {
            return Err(MapError::out_of_range(
                format!("record {record} {side}.room"),
                ep.room,
                rooms,
            ));
        }
        if !(0..=MAX_DOOR).contains(&ep.door) {
            return Err(MapError::out_of_range(
                format!("record {record} {side}.door"),
                ep.door,
                DOORS_PER_ROOM as i64,
            ));
        }
        Ok((ep.room as usize, ep.door as usize))
    }

    fn write(&mut self, room: usize, door: usize, cell: Cell, record: usize) {
        let slot = &mut self.rows[room][door];
        if slot.is_resolved() && *slot != cell {
            tracing::debug!(
                room,
                door,
                record,
                previous = ?*slot,
                next = ?cell,
                "Conflicting connection overwrites door"
            );
        }
        *slot = cell;
    }

    pub fn room_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, room: usize) -> Option<&Row> {
        self.rows.get(room)
    }

    /// Cell for `(room, door)`; `None` when either index is outside the table.
    pub fn cell(&self, room: usize, door: usize) -> Option<Cell> {
        self.rows.get(room).and_then(|row| row.get(door)).copied()
    }

    /// True when no door is unresolved.
    pub fn is_complete(&self) -> bool {
        self.rows.iter().flatten().all(Cell::is_resolved)
    }

    /// Every door whose destination is unknown, in room then door order.
    pub fn unresolved(&self) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(room, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| !cell.is_resolved())
                    .map(move |(door, _)| (room, door))
            })
            .collect()
    }

    /// True when every resolved door is pointed back at by its destination.
    ///
    /// Only conflicting input can break this.
    pub fn is_symmetric(&self) -> bool {
        self.rows.iter().enumerate().all(|(room, row)| {
            row.iter().enumerate().all(|(door, cell)| match *cell {
                Cell::Resolved { room: r, door: d } => {
                    self.cell(r, d) == Some(Cell::Resolved { room, door })
                }
                Cell::Unresolved => true,
            })
        })
    }

    /// Each resolved edge once, with the lower endpoint as `from`.
    ///
    /// Stale halves left behind by conflicting input are not listed.
    pub fn connections(&self) -> Vec<Connection> {
        let mut out = Vec::new();
        for (room, row) in self.rows.iter().enumerate() {
            for (door, cell) in row.iter().enumerate() {
                if let Cell::Resolved { room: r, door: d } = *cell {
                    if (room, door) <= (r, d) {
                        out.push(Connection::new(room as i64, door as i64, r as i64, d as i64));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_across_threads() {
        assert_send_sync::<AdjacencyTable>();
        assert_send_sync::<Connection>();
        assert_send_sync::<RoomCount>();
        assert_send_sync::<crate::matrix::Renderer<'static>>();
        assert_send_sync::<crate::matrix::LabeledMap>();
        assert_send_sync::<crate::session::Session>();
        assert_send_sync::<crate::ingest::ConnectionSet>();
    }

    fn fixed(n: usize) -> RoomCount {
        RoomCount::fixed(n).unwrap()
    }

    fn resolved(room: usize, door: usize) -> Cell {
        Cell::Resolved { room, door }
    }

    #[test]
    fn test_empty_connections_fill_rows() {
        let t = AdjacencyTable::build(&[], fixed(4)).unwrap();
        assert_eq!(t.room_count(), 4);
        for row in t.rows() {
            assert!(row.iter().all(|c| *c == Cell::Unresolved));
        }
        assert_eq!(t.unresolved().len(), 24);
        assert!(!t.is_complete());
    }

    #[test]
    fn test_single_connection_fills_both_directions() {
        let conns = [Connection::new(0, 0, 1, 3)];
        let t = AdjacencyTable::build(&conns, fixed(2)).unwrap();
        assert_eq!(
            t.row(0).unwrap(),
            &[
                resolved(1, 3),
                Cell::Unresolved,
                Cell::Unresolved,
                Cell::Unresolved,
                Cell::Unresolved,
                Cell::Unresolved
            ]
        );
        assert_eq!(t.cell(1, 3), Some(resolved(0, 0)));
        assert_eq!(t.row(1).unwrap().iter().filter(|c| c.is_resolved()).count(), 1);
    }

    #[test]
    fn test_self_loop() {
        let conns = [Connection::new(2, 1, 2, 4)];
        let t = AdjacencyTable::build(&conns, fixed(3)).unwrap();
        assert_eq!(t.cell(2, 1), Some(resolved(2, 4)));
        assert_eq!(t.cell(2, 4), Some(resolved(2, 1)));
        assert!(t.row(0).unwrap().iter().all(|c| !c.is_resolved()));
        assert!(t.row(1).unwrap().iter().all(|c| !c.is_resolved()));
    }

    #[test]
    fn test_self_loop_same_door() {
        let t = AdjacencyTable::build(&[Connection::new(0, 2, 0, 2)], fixed(1)).unwrap();
        assert_eq!(t.cell(0, 2), Some(resolved(0, 2)));
        assert!(t.is_symmetric());
        assert_eq!(t.connections(), vec![Connection::new(0, 2, 0, 2)]);
    }

    #[test]
    fn test_idempotent() {
        let conns = vec![Connection::new(0, 0, 1, 3), Connection::new(1, 5, 2, 2)];
        let once = AdjacencyTable::build(&conns, fixed(3)).unwrap();
        let doubled: Vec<_> = conns.iter().chain(conns.iter()).copied().collect();
        let twice = AdjacencyTable::build(&doubled, fixed(3)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_last_write_wins() {
        let conns = [Connection::new(0, 0, 1, 1), Connection::new(0, 0, 2, 2)];
        let t = AdjacencyTable::build(&conns, fixed(3)).unwrap();
        assert_eq!(t.cell(0, 0), Some(resolved(2, 2)));
        // The first record's reverse half is left in place.
        assert_eq!(t.cell(1, 1), Some(resolved(0, 0)));
        assert!(!t.is_symmetric());

        let reversed = [conns[1], conns[0]];
        let t = AdjacencyTable::build(&reversed, fixed(3)).unwrap();
        assert_eq!(t.cell(0, 0), Some(resolved(1, 1)));
    }

    #[test]
    fn test_door_bounds() {
        assert!(AdjacencyTable::build(&[Connection::new(0, 0, 1, 5)], fixed(2)).is_ok());

        let err = AdjacencyTable::build(&[Connection::new(0, 6, 1, 0)], fixed(2)).unwrap_err();
        match err {
            MapError::OutOfRange { what, value, bound } => {
                assert_eq!(what, "record 0 from.door");
                assert_eq!(value, 6);
                assert_eq!(bound, 6);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = AdjacencyTable::build(&[Connection::new(0, 0, 1, -1)], fixed(2)).unwrap_err();
        assert!(matches!(err, MapError::OutOfRange { value: -1, .. }));
    }

    #[test]
    fn test_room_bounds() {
        let conns = [Connection::new(0, 0, 1, 0), Connection::new(0, 1, 2, 0)];
        let err = AdjacencyTable::build(&conns, fixed(2)).unwrap_err();
        match err {
            MapError::OutOfRange { what, value, bound } => {
                assert_eq!(what, "record 1 to.room");
                assert_eq!(value, 2);
                assert_eq!(bound, 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = AdjacencyTable::build(&[Connection::new(-1, 0, 0, 0)], RoomCount::Inferred)
            .unwrap_err();
        assert!(matches!(err, MapError::OutOfRange { value: -1, .. }));
    }

    #[test]
    fn test_inferred_room_count() {
        let conns = [Connection::new(0, 0, 4, 2)];
        let t = AdjacencyTable::build(&conns, RoomCount::Inferred).unwrap();
        assert_eq!(t.room_count(), 5);
        assert!(t.row(3).unwrap().iter().all(|c| !c.is_resolved()));

        let t = AdjacencyTable::build(&[], RoomCount::Inferred).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn test_fixed_zero_is_not_representable() {
        assert!(RoomCount::fixed(0).is_none());
        assert_eq!(RoomCount::fixed(6), Some(RoomCount::Fixed(NonZeroUsize::new(6).unwrap())));
    }

    #[test]
    fn test_room_count_cap() {
        let conns = [Connection::new(0, 0, MAX_ROOMS as i64, 0)];
        let err = AdjacencyTable::build(&conns, RoomCount::Inferred).unwrap_err();
        assert!(matches!(err, MapError::OutOfRange { .. }));
    }

    #[test]
    fn test_connections_rebuild() {
        let conns = [
            Connection::new(1, 3, 0, 0),
            Connection::new(2, 1, 2, 4),
            Connection::new(0, 5, 2, 0),
        ];
        let t = AdjacencyTable::build(&conns, fixed(3)).unwrap();
        let listed = t.connections();
        assert_eq!(
            listed,
            vec![
                Connection::new(0, 0, 1, 3),
                Connection::new(0, 5, 2, 0),
                Connection::new(2, 1, 2, 4),
            ]
        );
        assert_eq!(AdjacencyTable::build(&listed, fixed(3)).unwrap(), t);
    }

    #[test]
    fn test_cell_out_of_table() {
        let t = AdjacencyTable::empty(1);
        assert_eq!(t.cell(0, 5), Some(Cell::Unresolved));
        assert_eq!(t.cell(0, 6), None);
        assert_eq!(t.cell(1, 0), None);
    }

    #[test]
    fn test_complete_table() {
        let conns: Vec<_> = (0..3).map(|d| Connection::new(0, d, 0, d + 3)).collect();
        let t = AdjacencyTable::build(&conns, fixed(1)).unwrap();
        assert!(t.is_complete());
        assert!(t.unresolved().is_empty());
        assert!(t.is_symmetric());
    }

    #[test]
    fn test_connection_json_shape() {
        let c: Connection =
            serde_json::from_str(r#"{"from":{"room":0,"door":0},"to":{"room":1,"door":3}}"#)
                .unwrap();
        assert_eq!(c, Connection::new(0, 0, 1, 3));
        assert_eq!(
            serde_json::to_string(&c).unwrap(),
            r#"{"from":{"room":0,"door":0},"to":{"room":1,"door":3}}"#
        );
    }
}
