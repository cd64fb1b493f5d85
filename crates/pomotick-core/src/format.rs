/// Render a second count as `MM:SS`.
///
/// Minutes are not wrapped into hours: one hour is `60:00`.
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(754), "12:34");
        assert_eq!(format_clock(1500), "25:00");
    }

    #[test]
    fn minutes_are_unbounded() {
        assert_eq!(format_clock(3600), "60:00");
        assert_eq!(format_clock(6001), "100:01");
    }
}
