use crate::{
    error::PlanError,
    model::SchemaRegistry,
    plan::{QueryMode, QueryPlan},
    query::{
        page::{Cursor, OrderKey, OrderSpec, PageSpec, effective_order, validate_cursor,
            validate_order},
        predicate::{Predicate, normalize, validate as validate_predicate},
        select::{SelectionInput, SelectionLimits, resolve},
        unique::{UniqueSelector, validate_unique_selector},
    },
    traits::EntityKind,
};
use std::marker::PhantomData;

///
/// FindQuery
///
/// Typed, declarative read intent for a specific entity type.
///
/// This intent is:
/// - schema-agnostic at construction
/// - normalized and validated only during planning
/// - free of execution decisions
///

#[derive(Clone, Debug, Default)]
pub struct FindQuery<E: EntityKind> {
    filter: Option<Predicate>,
    order: Option<OrderSpec>,
    page: Option<PageSpec>,
    cursor: Option<Cursor>,
    selection: SelectionInput,
    limits: SelectionLimits,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> FindQuery<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: None,
            order: None,
            page: None,
            cursor: None,
            selection: SelectionInput::new(),
            limits: SelectionLimits::default(),
            _marker: PhantomData,
        }
    }

    /// Add a predicate, implicitly AND-ing with any existing predicate.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = match self.filter.take() {
            Some(existing) => Some(Predicate::And(vec![existing, predicate])),
            None => Some(predicate),
        };
        self
    }

    /// Append an ascending sort key.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.push_order(OrderKey::asc(field));
        self
    }

    /// Append a descending sort key.
    #[must_use]
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.push_order(OrderKey::desc(field));
        self
    }

    #[must_use]
    pub fn skip(mut self, rows: u32) -> Self {
        let mut page = self.page.unwrap_or_default();
        page.skip = rows;
        self.page = Some(page);
        self
    }

    /// Signed take: negative values page backward from the cursor position.
    #[must_use]
    pub fn take(mut self, rows: i64) -> Self {
        let mut page = self.page.unwrap_or_default();
        page.take = Some(rows);
        self.page = Some(page);
        self
    }

    /// Anchor the window at a unique row instead of an absolute offset.
    #[must_use]
    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    #[must_use]
    pub fn selection(mut self, selection: SelectionInput) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn selection_limits(mut self, limits: SelectionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Plan this intent as a many-row read.
    pub fn plan(&self, registry: &SchemaRegistry) -> Result<QueryPlan, PlanError> {
        self.plan_with_mode(registry, QueryMode::Many)
    }

    /// Plan this intent as a first-match read.
    pub fn plan_first(&self, registry: &SchemaRegistry) -> Result<QueryPlan, PlanError> {
        self.plan_with_mode(registry, QueryMode::First)
    }

    fn plan_with_mode(
        &self,
        registry: &SchemaRegistry,
        mode: QueryMode,
    ) -> Result<QueryPlan, PlanError> {
        let model = E::MODEL;

        let filter = match &self.filter {
            Some(predicate) => {
                validate_predicate(registry, model, predicate)?;
                Some(normalize(predicate))
            }
            None => None,
        };

        let selection = resolve(registry, model, &self.selection, self.limits)?;

        if let Some(order) = &self.order {
            validate_order(model, order)?;
        }
        if let Some(cursor) = &self.cursor {
            validate_cursor(model, cursor)?;
        }

        // Paged and cursor reads demand a total order; impose the primary
        // key when the caller gave none.
        let windowed = self.page.is_some_and(|page| page.is_windowed()) || self.cursor.is_some();
        let order = if windowed || self.order.is_some() {
            Some(effective_order(model, self.order.clone()))
        } else {
            None
        };

        Ok(QueryPlan {
            entity: model.entity_name.to_string(),
            mode,
            unique: None,
            filter,
            selection,
            order,
            page: self.page,
            cursor: self.cursor.clone(),
        })
    }

    fn push_order(&mut self, key: OrderKey) {
        match &mut self.order {
            Some(order) => order.keys.push(key),
            None => self.order = Some(OrderSpec::new(vec![key])),
        }
    }
}

/// Plan a where-unique read.
pub fn plan_find_unique<E: EntityKind>(
    registry: &SchemaRegistry,
    selector: UniqueSelector,
    selection: &SelectionInput,
) -> Result<QueryPlan, PlanError> {
    let model = E::MODEL;

    validate_unique_selector(model, &selector)?;
    let selection = resolve(registry, model, selection, SelectionLimits::default())?;

    Ok(QueryPlan {
        entity: model.entity_name.to_string(),
        mode: QueryMode::Unique,
        unique: Some(selector),
        filter: None,
        selection,
        order: None,
        page: None,
        cursor: None,
    })
}

///
/// TESTS
///
