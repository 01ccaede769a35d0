// Exploration session: what a player has asked the scoring service and what
// it answered, plus assembly of the final guess.
//
// A session is a plain value owned by the caller. Nothing here talks to the
// network or to storage; request/response types only describe the wire shape.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::ingest::{parse_room_entries, plan_to_string, GuessMap};
use crate::matrix::config::LABEL_COUNT;
use crate::matrix::{AdjacencyTable, RoomCount};

/// `/explore` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreRequest {
    pub id: String,
    pub plans: Vec<String>,
}

/// `/explore` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreResponse {
    pub results: Vec<Vec<u8>>,
    pub query_count: u64,
}

/// `/guess` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRequest {
    pub id: String,
    pub map: GuessMap,
}

/// `/guess` response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResponse {
    pub correct: bool,
}

/// One route plan and the room labels observed while following it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationRecord {
    pub route_plan: Vec<u8>,
    pub room_labels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub team_id: String,
    pub problem_name: String,
    pub query_count: u64,
    pub exploration_results: Vec<ExplorationRecord>,
}

impl Session {
    pub fn new(team_id: impl Into<String>, problem_name: impl Into<String>) -> Self {
        Session {
            team_id: team_id.into(),
            problem_name: problem_name.into(),
            query_count: 0,
            exploration_results: Vec::new(),
        }
    }

    pub fn explore_request(&self, plans: &[Vec<u8>]) -> ExploreRequest {
        ExploreRequest {
            id: self.team_id.clone(),
            plans: plans.iter().map(|p| plan_to_string(p)).collect(),
        }
    }

    /// Pair each plan with its result and append them to the history.
    ///
    /// A plan the service returned no result for is recorded with no labels.
    /// The service's running query count replaces the stored one.
    pub fn record_explorations(
        &mut self,
        plans: Vec<Vec<u8>>,
        response: ExploreResponse,
    ) -> &[ExplorationRecord] {
        let start = self.exploration_results.len();
        let mut results = response.results.into_iter();
        for route_plan in plans {
            let room_labels = results.next().unwrap_or_default();
            self.exploration_results.push(ExplorationRecord {
                route_plan,
                room_labels,
            });
        }
        self.query_count = response.query_count;
        tracing::debug!(
            team = %self.team_id,
            added = self.exploration_results.len() - start,
            query_count = self.query_count,
            "Recorded explorations"
        );
        &self.exploration_results[start..]
    }

    /// Assemble the map to submit from free-text per-room entries.
    ///
    /// `labels` gives one label per room; entry `i` describes room `i` and
    /// blank entries are skipped. The connections are checked by building a
    /// table of `labels.len()` rooms.
    pub fn guess_map<S: AsRef<str>>(
        &self,
        entries: &[S],
        labels: &[u8],
        starting_room: usize,
    ) -> Result<GuessMap> {
        if entries.len() != labels.len() {
            return Err(MapError::malformed(
                "rooms",
                format!("{} room entries for {} labels", entries.len(), labels.len()),
            ));
        }
        let room_count = RoomCount::fixed(labels.len())
            .ok_or_else(|| MapError::malformed("rooms", "at least one room is required"))?;
        if let Some((room, &label)) = labels.iter().enumerate().find(|&(_, &l)| l >= LABEL_COUNT) {
            return Err(MapError::out_of_range(
                format!("room {room} label"),
                label as i64,
                LABEL_COUNT as i64,
            ));
        }
        if starting_room >= labels.len() {
            return Err(MapError::out_of_range(
                "starting room",
                starting_room as i64,
                labels.len() as i64,
            ));
        }

        let parsed = parse_room_entries(entries)?;
        if parsed.rooms.is_empty() {
            return Err(MapError::malformed("rooms", "no room connections entered"));
        }
        AdjacencyTable::build(&parsed.connections, room_count)?;

        Ok(GuessMap {
            rooms: labels.to_vec(),
            starting_room,
            connections: parsed.connections,
        })
    }

    pub fn guess_request(&self, map: GuessMap) -> GuessRequest {
        GuessRequest {
            id: self.team_id.clone(),
            map,
        }
    }
}
