use crate::{
    error::PlanError,
    model::SchemaRegistry,
    plan::{AggregatePlan, GroupByPlan},
    query::{
        aggregate::{
            AggregateError, AggregateSelection, HavingExpr, validate_aggregate_selection,
            validate_group_by,
        },
        page::{OrderKey, OrderSpec, PageSpec, validate_order},
        predicate::{Predicate, normalize, validate as validate_predicate},
    },
    traits::EntityKind,
};
use std::marker::PhantomData;

///
/// AggregateQuery
/// Typed intent for whole-table (or filtered-window) aggregation.
///

#[derive(Clone, Debug)]
pub struct AggregateQuery<E: EntityKind> {
    filter: Option<Predicate>,
    aggregates: AggregateSelection,
    order: Option<OrderSpec>,
    page: Option<PageSpec>,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> AggregateQuery<E> {
    #[must_use]
    pub fn new(aggregates: AggregateSelection) -> Self {
        Self {
            filter: None,
            aggregates,
            order: None,
            page: None,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = match self.filter.take() {
            Some(existing) => Some(Predicate::And(vec![existing, predicate])),
            None => Some(predicate),
        };
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.push_order(OrderKey::asc(field));
        self
    }

    #[must_use]
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.push_order(OrderKey::desc(field));
        self
    }

    #[must_use]
    pub const fn page(mut self, page: PageSpec) -> Self {
        self.page = Some(page);
        self
    }

    pub fn plan(&self, registry: &SchemaRegistry) -> Result<AggregatePlan, PlanError> {
        let model = E::MODEL;

        if self.aggregates.is_empty() {
            return Err(AggregateError::EmptyAggregates.into());
        }
        validate_aggregate_selection(model, &self.aggregates)?;

        let filter = match &self.filter {
            Some(predicate) => {
                validate_predicate(registry, model, predicate)?;
                Some(normalize(predicate))
            }
            None => None,
        };

        if let Some(order) = &self.order {
            validate_order(model, order)?;
        }
        let windowed = self.page.is_some_and(|page| page.is_windowed());
        if windowed && self.order.is_none() {
            // Window selection over unordered rows is non-deterministic.
            return Err(AggregateError::MissingOrderBy.into());
        }

        Ok(AggregatePlan {
            entity: model.entity_name.to_string(),
            filter,
            aggregates: self.aggregates.clone(),
            order: self.order.clone(),
            page: self.page,
        })
    }

    fn push_order(&mut self, key: OrderKey) {
        match &mut self.order {
            Some(order) => order.keys.push(key),
            None => self.order = Some(OrderSpec::new(vec![key])),
        }
    }
}

///
/// GroupByQuery
/// Typed intent for bucketed aggregation with optional bucket filtering.
///

#[derive(Clone, Debug)]
pub struct GroupByQuery<E: EntityKind> {
    by: Vec<String>,
    filter: Option<Predicate>,
    having: Option<HavingExpr>,
    aggregates: AggregateSelection,
    order: Option<OrderSpec>,
    page: Option<PageSpec>,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> GroupByQuery<E> {
    #[must_use]
    pub fn new(by: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            by: by.into_iter().map(Into::into).collect(),
            filter: None,
            having: None,
            aggregates: AggregateSelection::new(),
            order: None,
            page: None,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = match self.filter.take() {
            Some(existing) => Some(Predicate::And(vec![existing, predicate])),
            None => Some(predicate),
        };
        self
    }

    #[must_use]
    pub fn having(mut self, having: HavingExpr) -> Self {
        self.having = Some(having);
        self
    }

    #[must_use]
    pub fn aggregates(mut self, aggregates: AggregateSelection) -> Self {
        self.aggregates = aggregates;
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.push_order(OrderKey::asc(field));
        self
    }

    #[must_use]
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.push_order(OrderKey::desc(field));
        self
    }

    #[must_use]
    pub const fn page(mut self, page: PageSpec) -> Self {
        self.page = Some(page);
        self
    }

    pub fn plan(&self, registry: &SchemaRegistry) -> Result<GroupByPlan, PlanError> {
        let model = E::MODEL;

        validate_group_by(
            model,
            &self.by,
            &self.aggregates,
            self.having.as_ref(),
            self.order.as_ref(),
            self.page.as_ref(),
        )?;

        let filter = match &self.filter {
            Some(predicate) => {
                validate_predicate(registry, model, predicate)?;
                Some(normalize(predicate))
            }
            None => None,
        };

        Ok(GroupByPlan {
            entity: model.entity_name.to_string(),
            by: self.by.clone(),
            filter,
            aggregates: self.aggregates.clone(),
            having: self.having.clone(),
            order: self.order.clone(),
            page: self.page,
        })
    }

    fn push_order(&mut self, key: OrderKey) {
        match &mut self.order {
            Some(order) => order.keys.push(key),
            None => self.order = Some(OrderSpec::new(vec![key])),
        }
    }
}

///
/// TESTS
///
