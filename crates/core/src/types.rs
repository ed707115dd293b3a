/// Primary keys are SQLite `INTEGER PRIMARY KEY` values, allocated from 1.
pub type DbId = i64;

/// All audit timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (birth dates, exam dates) carry no time of day.
pub type Date = chrono::NaiveDate;
