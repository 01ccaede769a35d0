// Batch converter configuration, loaded from CLI flags with environment fallbacks.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

use crate::ingest::InputFormat;
use crate::matrix::{RenderMode, RoomCount};

/// Read door-connection records and print the per-room door table.
#[derive(Debug, Clone, Parser)]
#[command(name = "doormap", version)]
pub struct Config {
    /// File to read records from; standard input when omitted.
    #[arg(short, long, env = "DOORMAP_INPUT")]
    pub input: Option<PathBuf>,

    /// Input layout: auto, json or lines.
    #[arg(short, long, env = "DOORMAP_FORMAT", default_value = "auto")]
    pub format: InputFormat,

    /// Fixed number of rooms. Defaults to the document's room list, else
    /// one more than the highest room index seen.
    #[arg(short, long, env = "DOORMAP_ROOMS")]
    pub rooms: Option<NonZeroUsize>,

    /// Output granularity: dense or verbose.
    #[arg(long, env = "DOORMAP_RENDER", default_value = "dense")]
    pub render: RenderMode,
}

impl Config {
    /// Load configuration from the process arguments and environment.
    ///
    /// Environment variables:
    /// - `DOORMAP_INPUT` - input file path
    /// - `DOORMAP_FORMAT` - `auto` (default), `json` or `lines`
    /// - `DOORMAP_ROOMS` - fixed room count
    /// - `DOORMAP_RENDER` - `dense` (default) or `verbose`
    pub fn load() -> Self {
        Config::parse()
    }

    /// Room-count policy: explicit flag, then the document's label count, then inference.
    pub fn room_count(&self, labels: Option<&[u8]>) -> RoomCount {
        if let Some(n) = self.rooms {
            return RoomCount::Fixed(n);
        }
        labels
            .and_then(|l| RoomCount::fixed(l.len()))
            .unwrap_or(RoomCount::Inferred)
    }
}
