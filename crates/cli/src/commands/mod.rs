//! CLI command implementations

pub mod interactive;
pub mod predict;
pub mod schema;

use expense_core::collector::Choice;
use expense_core::PredictorError;

/// Resolve a typed answer (label, alias or any casing) to the exact label
/// the predictor accepts, reporting failures under `field`
pub fn canonical_label<C: Choice>(
    field: &'static str,
    value: &str,
) -> Result<String, PredictorError> {
    C::parse_alias(value)
        .map(|choice| choice.label().to_string())
        .map_err(|_| PredictorError::invalid_input(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_core::collector::{EatOutFrequency, LivingArrangement, YesNo};

    #[test]
    fn test_aliases_become_labels() {
        assert_eq!(
            canonical_label::<LivingArrangement>("living", "rental").unwrap(),
            "Off-Campus Rental"
        );
        assert_eq!(
            canonical_label::<EatOutFrequency>("eat_out", "daily").unwrap(),
            "Often (daily)"
        );
        assert_eq!(canonical_label::<YesNo>("laptop", " YES ").unwrap(), "Yes");
    }

    #[test]
    fn test_unknown_answer_names_the_question() {
        match canonical_label::<YesNo>("track_expenses", "maybe") {
            Err(PredictorError::InvalidInput { field, value }) => {
                assert_eq!(field, "track_expenses");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
