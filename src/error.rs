use crate::exercises::{ExerciseId, MetricType};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TrackerError {
    #[error("unknown exercise {0}")]
    UnknownExercise(ExerciseId),
    #[error("{found} entry for a {expected} exercise")]
    PayloadMismatch {
        expected: MetricType,
        found: MetricType,
    },
    #[error("no free ids left for new {0}")]
    IdsExhausted(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TrackerError::UnknownExercise(ExerciseId(7)).to_string(),
            "unknown exercise 7"
        );
        assert_eq!(
            TrackerError::PayloadMismatch {
                expected: MetricType::Timed,
                found: MetricType::Weighted,
            }
            .to_string(),
            "weighted entry for a timed exercise"
        );
        assert_eq!(
            TrackerError::IdsExhausted("entries").to_string(),
            "no free ids left for new entries"
        );
    }
}
