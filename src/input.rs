//! Turning typed-in form fields into record payloads
//!
//! Invalid numbers are coerced rather than rejected. The only input that
//! turns a log action into a no-op is a negative duration.

use crate::exercises::MetricType;
use crate::workout::{Band, Payload};

/// Raw text of a log entry form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryForm {
    pub weight: String,
    pub reps: String,
    pub sets: String,
    pub band: String,
    pub seconds: String,
}

/// Build the payload for an exercise of type `kind`.
/// Returns None when the entry must not be stored.
pub fn parse_payload(kind: MetricType, form: &EntryForm) -> Option<Payload> {
    let payload = match kind {
        MetricType::Weighted => Payload::Weighted {
            weight: parse_weight(&form.weight),
            reps: parse_reps(&form.reps),
            sets: parse_sets(&form.sets),
        },
        MetricType::Bodyweight => Payload::Bodyweight {
            reps: parse_reps(&form.reps),
            sets: parse_sets(&form.sets),
            band: Band::parse(&form.band),
        },
        MetricType::Timed => Payload::Timed {
            seconds: parse_seconds(&form.seconds)?,
        },
    };
    Some(payload)
}

/// Blank, non-numeric or negative weight means "not tracked"
pub fn parse_weight(s: &str) -> Option<f64> {
    s.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
}

pub fn parse_reps(s: &str) -> u32 {
    s.trim().parse().unwrap_or(0)
}

/// At least one set
pub fn parse_sets(s: &str) -> u32 {
    s.trim().parse().ok().filter(|n| *n > 0).unwrap_or(1)
}

/// Seconds, or "m:ss". Garbage is 0, negative durations are rejected.
pub fn parse_seconds(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.starts_with('-') {
        return None;
    }
    if let Some((minutes, seconds)) = s.split_once(':') {
        let minutes: u32 = minutes.trim().parse().unwrap_or(0);
        let seconds: u32 = seconds.trim().parse().unwrap_or(0);
        return Some(minutes.saturating_mul(60).saturating_add(seconds));
    }
    Some(s.parse().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn form(weight: &str, reps: &str, sets: &str) -> EntryForm {
        EntryForm {
            weight: weight.to_string(),
            reps: reps.to_string(),
            sets: sets.to_string(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("100", Some(100.0))]
    #[case(" 82.5 ", Some(82.5))]
    #[case("82,5", Some(82.5))]
    #[case("", None)]
    #[case("heavy", None)]
    #[case("-5", None)]
    #[case("inf", None)]
    fn test_parse_weight(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_weight(input), expected);
    }

    #[rstest]
    #[case("45", Some(45))]
    #[case("1:30", Some(90))]
    #[case("", Some(0))]
    #[case("long", Some(0))]
    #[case("-10", None)]
    #[case(" -0:30", None)]
    fn test_parse_seconds(#[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_seconds(input), expected);
    }

    #[test]
    fn test_sets_default_to_one() {
        assert_eq!(parse_sets(""), 1);
        assert_eq!(parse_sets("0"), 1);
        assert_eq!(parse_sets("4"), 4);
    }

    #[test]
    fn test_weighted_payload() {
        let payload = parse_payload(MetricType::Weighted, &form("100", "5", "3"));
        assert_eq!(payload, Some(Payload::Weighted { weight: Some(100.0), reps: 5, sets: 3 }));

        let payload = parse_payload(MetricType::Weighted, &form("", "x", ""));
        assert_eq!(payload, Some(Payload::Weighted { weight: None, reps: 0, sets: 1 }));
    }

    #[test]
    fn test_bodyweight_payload_ignores_weight() {
        let mut f = form("20", "12", "3");
        f.band = "Light".to_string();
        let payload = parse_payload(MetricType::Bodyweight, &f);
        assert_eq!(payload, Some(Payload::Bodyweight { reps: 12, sets: 3, band: Band::Light }));
    }

    #[test]
    fn test_negative_duration_is_no_op() {
        let f = EntryForm {
            seconds: "-60".to_string(),
            ..Default::default()
        };
        assert_eq!(parse_payload(MetricType::Timed, &f), None);
    }
}
