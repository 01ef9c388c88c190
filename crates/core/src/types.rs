/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Audit timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Booking times are wall-clock times at the association's premises.
pub type LocalDateTime = chrono::NaiveDateTime;

/// Monetary amounts are stored and computed in euro cents.
pub type Cents = i64;
