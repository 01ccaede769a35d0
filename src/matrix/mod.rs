// Room/door adjacency tables: building, rendering and walking.

pub mod config;
pub mod render;
pub mod table;
pub mod walk;

pub use render::{parse_dense, render, RenderMode, Renderer};
pub use table::{AdjacencyTable, Cell, Connection, Endpoint, RoomCount, Row};
pub use walk::{check_equivalence, walk, Equivalence, LabeledMap};
