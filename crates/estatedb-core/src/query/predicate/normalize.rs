use crate::query::predicate::ast::{Predicate, RelationFilter};

///
/// Normalize a predicate into a canonical, deterministic form.
///
/// Normalization guarantees:
/// - Logical equivalence is preserved
/// - Nested AND / OR nodes are flattened
/// - Neutral elements are removed (True / False)
/// - Empty AND is vacuously True; empty OR is vacuously False
/// - Double negation is eliminated
/// - Child predicates are deterministically ordered
///
/// This is used to ensure:
/// - stable planner output
/// - consistent plan equality checks
/// - predictable test behavior
///
#[must_use]
pub fn normalize(predicate: &Predicate) -> Predicate {
    match predicate {
        Predicate::True => Predicate::True,
        Predicate::False => Predicate::False,

        Predicate::And(children) => normalize_and(children),
        Predicate::Or(children) => normalize_or(children),
        Predicate::Not(inner) => normalize_not(inner),

        Predicate::Compare(cmp) => Predicate::Compare(cmp.clone()),

        Predicate::IsNull { field } => Predicate::IsNull {
            field: field.clone(),
        },

        Predicate::Relation { field, filter } => Predicate::Relation {
            field: field.clone(),
            filter: normalize_relation(filter),
        },
    }
}

// Normalize the nested predicate carried by a relation quantifier.
fn normalize_relation(filter: &RelationFilter) -> RelationFilter {
    match filter {
        RelationFilter::Every(inner) => RelationFilter::Every(Box::new(normalize(inner))),
        RelationFilter::Some(inner) => RelationFilter::Some(Box::new(normalize(inner))),
        RelationFilter::None(inner) => RelationFilter::None(Box::new(normalize(inner))),
        RelationFilter::Is(inner) => RelationFilter::Is(Box::new(normalize(inner))),
        RelationFilter::IsNot(inner) => RelationFilter::IsNot(Box::new(normalize(inner))),
    }
}

///
/// Normalize a NOT expression.
///
/// Eliminates double negation:
///     NOT (NOT x)  →  x
///
fn normalize_not(inner: &Predicate) -> Predicate {
    let normalized = normalize(inner);

    if let Predicate::Not(double) = normalized {
        return normalize(&double);
    }

    Predicate::Not(Box::new(normalized))
}

///
/// Normalize an AND expression.
///
/// Rules:
/// - AND(True, x)        → x
/// - AND(False, x)       → False
/// - AND(AND(a, b), c)   → AND(a, b, c)
/// - AND()               → True
///
/// Children are sorted deterministically.
///
fn normalize_and(children: &[Predicate]) -> Predicate {
    let mut out = Vec::new();

    for child in children {
        match normalize(child) {
            Predicate::True => {}
            Predicate::False => return Predicate::False,
            Predicate::And(grandchildren) => out.extend(grandchildren),
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return Predicate::True;
    }
    if out.len() == 1 {
        return out.remove(0);
    }

    out.sort();
    Predicate::And(out)
}

///
/// Normalize an OR expression.
///
/// Rules:
/// - OR(False, x)       → x
/// - OR(True, x)        → True
/// - OR(OR(a, b), c)    → OR(a, b, c)
/// - OR()               → False
///
/// Children are sorted deterministically.
///
fn normalize_or(children: &[Predicate]) -> Predicate {
    let mut out = Vec::new();

    for child in children {
        match normalize(child) {
            Predicate::False => {}
            Predicate::True => return Predicate::True,
            Predicate::Or(grandchildren) => out.extend(grandchildren),
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return Predicate::False;
    }
    if out.len() == 1 {
        return out.remove(0);
    }

    out.sort();
    Predicate::Or(out)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::normalize;
    use crate::query::predicate::{FieldRef, ast::Predicate};
    use proptest::prelude::*;

    #[test]
    fn empty_and_is_vacuously_true() {
        assert_eq!(normalize(&Predicate::And(vec![])), Predicate::True);
    }

    #[test]
    fn empty_or_is_vacuously_false() {
        assert_eq!(normalize(&Predicate::Or(vec![])), Predicate::False);
    }

    #[test]
    fn nested_combinators_flatten() {
        let a = FieldRef::new("amount").gt(1i64);
        let b = FieldRef::new("amount").lt(9i64);
        let c = FieldRef::new("closed").eq(true);

        let nested = Predicate::And(vec![
            Predicate::And(vec![a.clone(), b.clone()]),
            c.clone(),
        ]);
        let flat = Predicate::And(vec![a, b, c]);

        assert_eq!(normalize(&nested), normalize(&flat));
    }

    #[test]
    fn double_negation_is_eliminated() {
        let inner = FieldRef::new("reference").contains("A-");
        let doubled = Predicate::not(Predicate::not(inner.clone()));

        assert_eq!(normalize(&doubled), normalize(&inner));
    }

    #[test]
    fn neutral_elements_are_removed() {
        let cmp = FieldRef::new("amount").gte(3i64);

        let with_true = Predicate::And(vec![Predicate::True, cmp.clone()]);
        assert_eq!(normalize(&with_true), normalize(&cmp));

        let with_false = Predicate::And(vec![Predicate::False, cmp.clone()]);
        assert_eq!(normalize(&with_false), Predicate::False);

        let or_short_circuit = Predicate::Or(vec![Predicate::True, cmp]);
        assert_eq!(normalize(&or_short_circuit), Predicate::True);
    }

    // Generate arbitrary predicate trees over a small field/value space.
    fn arb_predicate() -> impl Strategy<Value = Predicate> {
        let leaf = prop_oneof![
            Just(Predicate::True),
            Just(Predicate::False),
            (0i64..4).prop_map(|n| FieldRef::new("amount").gt(n)),
            (0i64..4).prop_map(|n| FieldRef::new("amount").lte(n)),
            any::<bool>().prop_map(|b| FieldRef::new("closed").eq(b)),
            Just(FieldRef::new("notes").is_null()),
        ];

        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Predicate::And),
                prop::collection::vec(inner.clone(), 0..4).prop_map(Predicate::Or),
                inner.prop_map(Predicate::not),
            ]
        })
    }

    proptest! {
        // Double negation law: NOT(NOT(p)) is observably equivalent to p
        // once both sides are brought to canonical form.
        #[test]
        fn double_negation_law_holds_under_normalization(predicate in arb_predicate()) {
            let doubled = Predicate::not(Predicate::not(predicate.clone()));

            prop_assert_eq!(normalize(&doubled), normalize(&predicate));
        }

        // Normalization is idempotent: a second pass changes nothing.
        #[test]
        fn normalization_is_idempotent(predicate in arb_predicate()) {
            let once = normalize(&predicate);
            let twice = normalize(&once);

            prop_assert_eq!(once, twice);
        }
    }
}
