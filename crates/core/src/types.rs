/// Supabase auth users and every row keyed by them use UUID primary keys.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
