/// Render whole seconds as "H hr M min", omitting zero segments; anything
/// under a minute collapses to "< 1 min".
pub fn seconds_to_human(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as i64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as i64;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{} hr", hours));
    }
    if minutes > 0 {
        parts.push(format!("{} min", minutes));
    }

    if parts.is_empty() {
        "< 1 min".to_owned()
    } else {
        parts.join(" ")
    }
}

pub fn minutes_rounded(seconds: f64) -> i64 {
    (seconds / 60.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_minute_collapses() {
        assert_eq!(seconds_to_human(0.0), "< 1 min");
        assert_eq!(seconds_to_human(59.0), "< 1 min");
    }

    #[test]
    fn whole_minutes() {
        assert_eq!(seconds_to_human(60.0), "1 min");
        assert_eq!(seconds_to_human(150.0), "2 min");
    }

    #[test]
    fn whole_hours_omit_minute_segment() {
        assert_eq!(seconds_to_human(3600.0), "1 hr");
        assert_eq!(seconds_to_human(7200.0), "2 hr");
    }

    #[test]
    fn hours_and_minutes() {
        assert_eq!(seconds_to_human(3661.0), "1 hr 1 min");
        assert_eq!(seconds_to_human(5400.0), "1 hr 30 min");
    }

    #[test]
    fn minutes_round_half_up() {
        assert_eq!(minutes_rounded(89.0), 1);
        assert_eq!(minutes_rounded(90.0), 2);
        assert_eq!(minutes_rounded(3661.0), 61);
    }
}
