/// A counter record as persisted in the key-value table
///
/// The table holds a single record keyed by `id`. Its `count` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRecord {
    /// Record key
    pub id: String,
    /// Current count (never negative)
    pub count: u64,
}

/// ID of the singleton visit counter
pub const VISITS_COUNTER_ID: &str = "visits";

/// Partition key attribute name
pub const ID_ATTRIBUTE: &str = "id";

/// Numeric attribute holding the current count
pub const COUNT_ATTRIBUTE: &str = "count";

impl CounterRecord {
    /// Create a record with an arbitrary key
    pub fn new(id: impl Into<String>, count: u64) -> Self {
        Self {
            id: id.into(),
            count,
        }
    }

    /// Create the visit counter record
    pub fn visits(count: u64) -> Self {
        Self::new(VISITS_COUNTER_ID, count)
    }
}
