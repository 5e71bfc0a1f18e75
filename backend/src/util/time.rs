/// current UTC time, the representation stored in every timestamp column
pub fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// format timestamp for display, second precision
pub fn display(time: &chrono::NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}
