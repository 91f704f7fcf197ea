/// `info.name` of the row holding the last-run timestamp.
pub const LAST_RUN_KEY: &str = "lastrun";

/// One row of the joke catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joke {
    pub id: i64,
    pub text: String,
    /// Number of times the joke has been told. Only ever increases.
    pub usage_count: i64,
}

/// The singleton last-run record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInfo {
    pub last_run: String,
}
