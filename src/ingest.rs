// Turning connection records, free-text room entries and route plans into
// validated inputs for the table builder.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MapError, Result};
use crate::matrix::config::*;
use crate::matrix::Connection;

lazy_static! {
    /// `(roomTo, doorTo)` with optional whitespace inside the parentheses.
    static ref DOOR_PAIR: Regex = Regex::new(r"\(\s*(\d+)\s*,\s*(\d+)\s*\)").unwrap();
}

/// Map document exchanged with the scoring service (`/guess` body, spoiler reply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessMap {
    /// One label per room.
    pub rooms: Vec<u8>,
    pub starting_room: usize,
    pub connections: Vec<Connection>,
}

/// Everything the batch converter can learn from its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSet {
    pub connections: Vec<Connection>,
    /// Room labels, when the input was a map document.
    pub labels: Option<Vec<u8>>,
    pub starting_room: Option<usize>,
}

/// How batch input is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// A JSON document when the text is one, line-delimited records otherwise.
    #[default]
    Auto,
    /// An array of records, or an object with a `connections` array.
    Json,
    /// One JSON record per non-blank line.
    Lines,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "json" => Ok(InputFormat::Json),
            "lines" | "jsonl" => Ok(InputFormat::Lines),
            other => Err(format!(
                "unknown input format `{other}` (expected auto, json or lines)"
            )),
        }
    }
}

pub fn parse_input(text: &str, format: InputFormat) -> Result<ConnectionSet> {
    match format {
        InputFormat::Json => parse_document(text),
        InputFormat::Lines => parse_lines(text),
        InputFormat::Auto => {
            let trimmed = text.trim_start();
            if trimmed.starts_with('[') {
                return parse_document(text);
            }
            match serde_json::from_str::<Value>(text) {
                Ok(value) if is_document(&value) => from_document(value),
                // An object whose first line is not a whole record is a broken
                // document, not line-delimited input.
                Err(e) if trimmed.starts_with('{') && !first_line_is_record(trimmed) => {
                    Err(e.into())
                }
                _ => parse_lines(text),
            }
        }
    }
}

fn first_line_is_record(text: &str) -> bool {
    text.lines()
        .next()
        .is_some_and(|line| serde_json::from_str::<Value>(line.trim()).is_ok())
}

fn is_document(value: &Value) -> bool {
    match value {
        Value::Array(_) => true,
        Value::Object(obj) => obj.contains_key("connections"),
        _ => false,
    }
}

/// Parse a whole JSON document of connection records.
pub fn parse_document(text: &str) -> Result<ConnectionSet> {
    let value: Value = serde_json::from_str(text)?;
    from_document(value)
}

fn from_document(value: Value) -> Result<ConnectionSet> {
    match value {
        Value::Array(records) => Ok(ConnectionSet {
            connections: decode_records(records)?,
            ..Default::default()
        }),
        Value::Object(mut obj) => {
            let records = match obj.remove("connections") {
                Some(Value::Array(records)) => records,
                Some(_) => {
                    return Err(MapError::malformed("connections", "expected an array"));
                }
                None => {
                    return Err(MapError::malformed(
                        "document",
                        "missing field `connections`",
                    ));
                }
            };
            let labels = obj
                .remove("rooms")
                .map(|v| {
                    serde_json::from_value::<Vec<u8>>(v)
                        .map_err(|e| MapError::malformed("rooms", e.to_string()))
                })
                .transpose()?;
            let starting_room = obj
                .remove("startingRoom")
                .map(|v| {
                    serde_json::from_value::<usize>(v)
                        .map_err(|e| MapError::malformed("startingRoom", e.to_string()))
                })
                .transpose()?;
            Ok(ConnectionSet {
                connections: decode_records(records)?,
                labels,
                starting_room,
            })
        }
        _ => Err(MapError::malformed(
            "document",
            "expected an array or an object with `connections`",
        )),
    }
}

fn decode_records(records: Vec<Value>) -> Result<Vec<Connection>> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value::<Connection>(record)
                .map_err(|e| MapError::malformed(format!("record {i}"), e.to_string()))
        })
        .collect()
}

/// Parse line-delimited JSON records, skipping blank lines.
pub fn parse_lines(text: &str) -> Result<ConnectionSet> {
    let mut connections = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let conn = serde_json::from_str::<Connection>(line).map_err(|e| {
            MapError::malformed(format!("line {}", n + 1), format!("{e}: `{line}`"))
        })?;
        connections.push(conn);
    }
    Ok(ConnectionSet {
        connections,
        ..Default::default()
    })
}

/// Parse one room's free-text entry: six `(roomTo, doorTo)` pairs for doors 0 through 5.
pub fn parse_room_entry(room: usize, text: &str) -> Result<Vec<Connection>> {
    let pairs = DOOR_PAIR
        .captures_iter(text)
        .map(|caps| -> Result<(i64, i64)> {
            let to_room = parse_index(room, &caps[1])?;
            let to_door = parse_index(room, &caps[2])?;
            Ok((to_room, to_door))
        })
        .collect::<Result<Vec<_>>>()?;

    if pairs.len() != DOORS_PER_ROOM {
        return Err(MapError::malformed(
            format!("room {room}"),
            format!(
                "expected exactly {DOORS_PER_ROOM} pairs of (roomTo, doorTo), found {}",
                pairs.len()
            ),
        ));
    }

    pairs
        .into_iter()
        .enumerate()
        .map(|(door, (to_room, to_door))| {
            if !(0..=MAX_DOOR).contains(&to_door) {
                return Err(MapError::out_of_range(
                    format!("room {room} door {door} destination door"),
                    to_door,
                    DOORS_PER_ROOM as i64,
                ));
            }
            Ok(Connection::new(room as i64, door as i64, to_room, to_door))
        })
        .collect()
}

fn parse_index(room: usize, digits: &str) -> Result<i64> {
    digits.parse::<i64>().map_err(|_| {
        MapError::malformed(format!("room {room}"), format!("`{digits}` is not a valid index"))
    })
}

/// Connections from a list of per-room entries, plus the rooms that had one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomEntries {
    pub connections: Vec<Connection>,
    pub rooms: Vec<usize>,
}

/// Parse each non-blank entry; entry `i` describes room `i`.
pub fn parse_room_entries<S: AsRef<str>>(entries: &[S]) -> Result<RoomEntries> {
    let mut out = RoomEntries::default();
    for (room, entry) in entries.iter().enumerate() {
        let entry = entry.as_ref().trim();
        if entry.is_empty() {
            continue;
        }
        out.connections.extend(parse_room_entry(room, entry)?);
        out.rooms.push(room);
    }
    Ok(out)
}

/// Parse route plans, one per non-blank line, each a string of doors 0-5.
pub fn parse_route_plans(text: &str) -> Result<Vec<Vec<u8>>> {
    let mut plans = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let doors = line
            .bytes()
            .map(|b| match b {
                b'0'..=b'5' => Some(b - b'0'),
                _ => None,
            })
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| {
                MapError::malformed(
                    format!("line {}", n + 1),
                    format!("invalid route `{line}`: must contain only digits 0-{MAX_DOOR}"),
                )
            })?;
        plans.push(doors);
    }
    Ok(plans)
}

/// The wire form of a plan, e.g. `[0, 1, 2]` → `"012"`.
pub fn plan_to_string(plan: &[u8]) -> String {
    plan.iter().map(|d| char::from(b'0' + d)).collect()
}
