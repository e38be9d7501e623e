/// All database primary keys are SQLite INTEGER rowids.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Position of an event in the append-only store (strictly increasing).
pub type EventSeq = i64;
