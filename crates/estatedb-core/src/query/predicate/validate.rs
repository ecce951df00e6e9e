use crate::{
    model::{EntityModel, FieldModel, SchemaRegistry},
    query::predicate::ast::{CompareOp, ComparePredicate, Predicate, RelationFilter},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// FilterError
///
/// Schema-aware predicate validation failures. All of these indicate a
/// caller bug and are rejected before any plan reaches the execution
/// service.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum FilterError {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("unknown relation '{relation}'")]
    UnknownRelation { relation: String },

    #[error("operator {op} is not valid for {kind} field '{field}'")]
    FilterTypeMismatch {
        field: String,
        op: CompareOp,
        kind: String,
    },

    #[error("literal of kind {literal} does not match {kind} field '{field}'")]
    LiteralMismatch {
        field: String,
        kind: String,
        literal: &'static str,
    },

    #[error("null is not a legal value for required field '{field}'")]
    NullOnRequiredField { field: String },

    #[error("quantifier '{quantifier}' does not match the cardinality of relation '{relation}'")]
    RelationCardinality {
        relation: String,
        quantifier: &'static str,
    },
}

/// Validate a predicate against one entity's schema surface.
///
/// Relation filters recurse into the target entity's model through the
/// registry, so a single call covers the whole tree.
pub fn validate(
    registry: &SchemaRegistry,
    model: &EntityModel,
    predicate: &Predicate,
) -> Result<(), FilterError> {
    match predicate {
        Predicate::True | Predicate::False => Ok(()),
        Predicate::And(children) | Predicate::Or(children) => {
            for child in children {
                validate(registry, model, child)?;
            }
            Ok(())
        }
        Predicate::Not(inner) => validate(registry, model, inner),
        Predicate::Compare(cmp) => validate_compare(model, cmp),
        Predicate::IsNull { field } => {
            let field_model = ensure_field(model, field)?;
            if !field_model.nullable {
                return Err(FilterError::NullOnRequiredField {
                    field: field.clone(),
                });
            }
            Ok(())
        }
        Predicate::Relation { field, filter } => validate_relation(registry, model, field, filter),
    }
}

fn validate_compare(model: &EntityModel, cmp: &ComparePredicate) -> Result<(), FilterError> {
    let field_model = ensure_field(model, &cmp.field)?;

    match cmp.op {
        CompareOp::Eq | CompareOp::Ne => validate_eq_ne(field_model, cmp),
        CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte => {
            validate_ordering(field_model, cmp)
        }
        CompareOp::In | CompareOp::NotIn => validate_membership(field_model, cmp),
        CompareOp::Contains | CompareOp::StartsWith | CompareOp::EndsWith => {
            validate_text(field_model, cmp)
        }
    }
}

fn validate_eq_ne(field: &FieldModel, cmp: &ComparePredicate) -> Result<(), FilterError> {
    if cmp.value.is_null() {
        // CONTRACT: null comparisons are legal only on soft-nullable fields.
        if field.nullable {
            return Ok(());
        }
        return Err(FilterError::NullOnRequiredField {
            field: cmp.field.clone(),
        });
    }

    ensure_literal(field, &cmp.field, &cmp.value)
}

fn validate_ordering(field: &FieldModel, cmp: &ComparePredicate) -> Result<(), FilterError> {
    if !field.kind.is_orderable() {
        return Err(type_mismatch(field, cmp.op));
    }
    if cmp.value.is_null() || cmp.value.is_list() {
        return Err(literal_mismatch(field, &cmp.value));
    }

    ensure_literal(field, &cmp.field, &cmp.value)
}

fn validate_membership(field: &FieldModel, cmp: &ComparePredicate) -> Result<(), FilterError> {
    let Value::List(items) = &cmp.value else {
        return Err(literal_mismatch(field, &cmp.value));
    };

    for item in items {
        ensure_literal(field, &cmp.field, item)?;
    }

    Ok(())
}

fn validate_text(field: &FieldModel, cmp: &ComparePredicate) -> Result<(), FilterError> {
    if !field.kind.is_text() {
        return Err(type_mismatch(field, cmp.op));
    }
    if !matches!(cmp.value, Value::Text(_)) {
        return Err(literal_mismatch(field, &cmp.value));
    }

    Ok(())
}

fn validate_relation(
    registry: &SchemaRegistry,
    model: &EntityModel,
    field: &str,
    filter: &RelationFilter,
) -> Result<(), FilterError> {
    let Some(relation) = model.relation(field) else {
        return Err(FilterError::UnknownRelation {
            relation: field.to_string(),
        });
    };

    if relation.arity.is_many() != filter.is_to_many() {
        return Err(FilterError::RelationCardinality {
            relation: field.to_string(),
            quantifier: filter.quantifier(),
        });
    }

    // Registry construction guarantees the target resolves; an unknown
    // target here means the relation was never registered.
    let target = registry
        .entity(relation.target)
        .map_err(|_| FilterError::UnknownRelation {
            relation: field.to_string(),
        })?;

    validate(registry, target, filter.inner())
}

fn ensure_field<'a>(model: &'a EntityModel, field: &str) -> Result<&'a FieldModel, FilterError> {
    model.field(field).ok_or_else(|| FilterError::UnknownField {
        field: field.to_string(),
    })
}

fn ensure_literal(field: &FieldModel, name: &str, value: &Value) -> Result<(), FilterError> {
    if value.is_null() {
        if field.nullable {
            return Ok(());
        }
        return Err(FilterError::NullOnRequiredField {
            field: name.to_string(),
        });
    }
    if !field.kind.accepts(value) {
        return Err(literal_mismatch(field, value));
    }

    Ok(())
}

fn type_mismatch(field: &FieldModel, op: CompareOp) -> FilterError {
    FilterError::FilterTypeMismatch {
        field: field.name.to_string(),
        op,
        kind: field.kind.to_string(),
    }
}

fn literal_mismatch(field: &FieldModel, value: &Value) -> FilterError {
    FilterError::LiteralMismatch {
        field: field.name.to_string(),
        kind: field.kind.to_string(),
        literal: value.kind_name(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{FilterError, validate};
    use crate::{
        query::predicate::{
            FieldRef, RelationRef,
            ast::{CompareOp, Predicate},
        },
        test_support::{SALE_MODEL, STAGE_MODEL, registry},
        value::{Value, ValueEnum},
    };

    #[test]
    fn accepts_well_typed_scalar_predicates() {
        let registry = registry();

        let predicate = Predicate::And(vec![
            FieldRef::new("name").starts_with("North"),
            FieldRef::new("target").gte(1000i64),
            FieldRef::new("status").eq(ValueEnum::new("OPEN")),
            FieldRef::new("notes").is_null(),
        ]);

        assert!(validate(&registry, &STAGE_MODEL, &predicate).is_ok());
    }

    #[test]
    fn rejects_contains_on_numeric_field() {
        let registry = registry();

        let predicate = FieldRef::new("target").contains("10");

        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &predicate),
            Err(FilterError::FilterTypeMismatch { field, op, .. })
                if field == "target" && op == CompareOp::Contains
        ));
    }

    #[test]
    fn rejects_ordering_on_enum_field() {
        let registry = registry();

        let predicate = FieldRef::new("status").lt(ValueEnum::new("OPEN"));

        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &predicate),
            Err(FilterError::FilterTypeMismatch { field, op, .. })
                if field == "status" && op == CompareOp::Lt
        ));
    }

    #[test]
    fn rejects_unknown_enum_variant() {
        let registry = registry();

        let predicate = FieldRef::new("status").eq(ValueEnum::new("ARCHIVED"));

        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &predicate),
            Err(FilterError::LiteralMismatch { field, .. }) if field == "status"
        ));
    }

    #[test]
    fn rejects_null_on_required_field() {
        let registry = registry();

        let predicate = Predicate::compare("name", CompareOp::Eq, Value::Null);
        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &predicate),
            Err(FilterError::NullOnRequiredField { field }) if field == "name"
        ));

        let is_null = FieldRef::new("name").is_null();
        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &is_null),
            Err(FilterError::NullOnRequiredField { field }) if field == "name"
        ));
    }

    #[test]
    fn rejects_unknown_fields_anywhere_in_the_tree() {
        let registry = registry();

        let predicate = Predicate::Or(vec![
            FieldRef::new("name").contains("a"),
            Predicate::not(FieldRef::new("zone").eq("Z1")),
        ]);

        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &predicate),
            Err(FilterError::UnknownField { field }) if field == "zone"
        ));
    }

    #[test]
    fn relation_quantifiers_check_cardinality() {
        let registry = registry();

        // to-many quantifier on a to-many relation is fine
        let some = RelationRef::new("sales").some(FieldRef::new("amount").gt(10i64));
        assert!(validate(&registry, &STAGE_MODEL, &some).is_ok());

        // `is` belongs to to-one relations
        let is_on_many = RelationRef::new("sales").is(FieldRef::new("amount").gt(10i64));
        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &is_on_many),
            Err(FilterError::RelationCardinality { relation, quantifier })
                if relation == "sales" && quantifier == "is"
        ));

        // and `every` does not apply to a to-one relation
        let every_on_one = RelationRef::new("stage").every(FieldRef::new("name").contains("N"));
        assert!(matches!(
            validate(&registry, &SALE_MODEL, &every_on_one),
            Err(FilterError::RelationCardinality { relation, quantifier })
                if relation == "stage" && quantifier == "every"
        ));
    }

    #[test]
    fn relation_filters_validate_against_target_schema() {
        let registry = registry();

        // `target` exists on Stage but not on Sale
        let predicate = RelationRef::new("sales").some(FieldRef::new("target").gt(1i64));

        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &predicate),
            Err(FilterError::UnknownField { field }) if field == "target"
        ));
    }

    #[test]
    fn membership_requires_list_literals_of_field_type() {
        let registry = registry();

        let not_a_list = Predicate::compare("id", CompareOp::In, Value::Int(1));
        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &not_a_list),
            Err(FilterError::LiteralMismatch { field, .. }) if field == "id"
        ));

        let mixed = Predicate::compare(
            "id",
            CompareOp::In,
            Value::List(vec![Value::Int(1), Value::Text("2".to_string())]),
        );
        assert!(matches!(
            validate(&registry, &STAGE_MODEL, &mixed),
            Err(FilterError::LiteralMismatch { field, .. }) if field == "id"
        ));
    }
}
