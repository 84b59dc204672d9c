//! Time related utils.

/// DateTime in UTC.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Get the current time in UTC.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Current Unix time in whole seconds.
///
/// This is the timestamp format the platform expects in request fields and
/// callback payloads.
pub fn now_unix() -> i64 {
    now().timestamp()
}
