//! Category filter: evaluates a declarative predicate against a raw record

use quarry_domain::{Literal, Predicate, RawEntry, TypedValue};

/// Whether a record satisfies a predicate
///
/// Runs before normalization, so an explicit `false` is still visible and
/// distinct from an absent field.
pub fn evaluate(predicate: &Predicate, entry: &RawEntry) -> bool {
    match predicate {
        Predicate::Always => true,
        Predicate::Equals { field, value } => entry
            .get(field)
            .is_some_and(|actual| literal_matches(value, actual)),
        Predicate::Present(field) => entry.get(field).is_some(),
        Predicate::Not(inner) => !evaluate(inner, entry),
        Predicate::All(parts) => parts.iter().all(|p| evaluate(p, entry)),
        Predicate::Any(parts) => parts.iter().any(|p| evaluate(p, entry)),
        Predicate::DefaultTrue(field) => !matches!(entry.get(field), Some(TypedValue::Bool(false))),
        Predicate::DefaultFalse(field) => matches!(entry.get(field), Some(TypedValue::Bool(true))),
    }
}

fn literal_matches(literal: &Literal, actual: &TypedValue) -> bool {
    match (literal, actual) {
        (Literal::Bool(expected), TypedValue::Bool(value)) => expected == value,
        (Literal::Int(expected), TypedValue::Int(value)) => expected == value,
        (Literal::Float(expected), TypedValue::Float(value)) => expected == value,
        (Literal::Float(expected), TypedValue::Int(value)) => *expected == *value as f64,
        (Literal::Str(expected), TypedValue::Str(value) | TypedValue::EnumRef(value)) => {
            expected == value
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> RawEntry {
        RawEntry::new("UNIT_WARRIOR")
            .with_field("iTier", TypedValue::Int(2))
            .with_field("bHidden", TypedValue::Bool(false))
            .with_field("bMelee", TypedValue::Bool(true))
            .with_field("eUnitType", TypedValue::EnumRef("UNITTYPE_INFANTRY".into()))
            .with_field("iTriggerSubject", TypedValue::Str("SUBJECT_LEADER".into()))
    }

    #[test]
    fn test_equals_literals() {
        let e = entry();
        let equals = |field: &str, value: Literal| Predicate::Equals {
            field: field.to_string(),
            value,
        };

        assert!(evaluate(&equals("iTier", Literal::Int(2)), &e));
        assert!(!evaluate(&equals("iTier", Literal::Int(3)), &e));
        assert!(evaluate(&equals("iTier", Literal::Float(2.0)), &e));
        assert!(evaluate(&equals("bMelee", Literal::Bool(true)), &e));
        assert!(evaluate(&equals("eUnitType", Literal::Str("UNITTYPE_INFANTRY".into())), &e));
        assert!(evaluate(&equals("iTriggerSubject", Literal::Str("SUBJECT_LEADER".into())), &e));
        // type mismatch never matches
        assert!(!evaluate(&equals("iTier", Literal::Str("2".into())), &e));
        assert!(!evaluate(&equals("iMissing", Literal::Int(0)), &e));
    }

    #[test]
    fn test_explicit_false_is_present() {
        let e = entry();
        assert!(evaluate(&Predicate::Present("bHidden".into()), &e));
        assert!(!evaluate(&Predicate::Present("bAbsent".into()), &e));
    }

    #[test]
    fn test_default_flags() {
        let e = entry();
        assert!(!evaluate(&Predicate::DefaultTrue("bHidden".into()), &e));
        assert!(evaluate(&Predicate::DefaultTrue("bAbsent".into()), &e));
        assert!(evaluate(&Predicate::DefaultFalse("bMelee".into()), &e));
        assert!(!evaluate(&Predicate::DefaultFalse("bHidden".into()), &e));
        assert!(!evaluate(&Predicate::DefaultFalse("bAbsent".into()), &e));
    }

    #[test]
    fn test_combinators() {
        let e = entry();
        let content_gated = Predicate::Not(Box::new(Predicate::Present(
            "GameContentRequired".into(),
        )));
        assert!(evaluate(&content_gated, &e));

        assert!(evaluate(&Predicate::All(vec![]), &e));
        assert!(!evaluate(&Predicate::Any(vec![]), &e));
        assert!(evaluate(
            &Predicate::Any(vec![
                Predicate::Present("bAbsent".into()),
                Predicate::DefaultFalse("bMelee".into()),
            ]),
            &e
        ));
        assert!(!evaluate(
            &Predicate::All(vec![Predicate::Always, Predicate::DefaultTrue("bHidden".into())]),
            &e
        ));
    }
}
