// Domain constants for room/door tables.

/// Every room has exactly this many doors, numbered 0..DOORS_PER_ROOM.
pub const DOORS_PER_ROOM: usize = 6;

/// Highest valid door number.
pub const MAX_DOOR: i64 = DOORS_PER_ROOM as i64 - 1;

/// Dense-mode token for a door whose destination is unknown.
pub const DENSE_UNRESOLVED: &str = "-1";

/// Verbose-mode token for a door whose destination is unknown.
pub const VERBOSE_UNRESOLVED: &str = "(?,?)";

/// Room labels are 2-bit values.
pub const LABEL_COUNT: u8 = 4;

/// Random plan length per room used by the equivalence check.
pub const PLAN_LENGTH_PER_ROOM: usize = 18;

/// Number of random plans the equivalence check walks by default.
pub const DEFAULT_EQUIVALENCE_TRIALS: usize = 100;

/// Upper bound on rows for either room-count policy.
pub const MAX_ROOMS: usize = 1 << 20;
