//! Session surface: the `Db` handle and per-entity typed clients.
//!
//! `Db` is the entry point for querying and mutating entities. It owns
//! nothing but handles: the read-only schema registry and the execution
//! service. Every operation builds a validated plan, records one metrics
//! event, and hands the plan across the service seam.

use crate::{
    error::Error,
    model::SchemaRegistry,
    mutation::{
        ScalarData, UpsertBuilder, WriteInput, plan_create, plan_create_many, plan_delete,
        plan_delete_many, plan_update, plan_update_many,
    },
    obs::{MetricsEvent, PlanKind, record},
    plan::Plan,
    query::{
        FindQuery,
        aggregate::{AggregateQuery, GroupByQuery},
        plan_find_unique,
        predicate::Predicate,
        select::SelectionInput,
        unique::UniqueSelector,
    },
    response::{Row, Rows},
    service::ExecutionService,
    traits::EntityKind,
    transaction::Coordinator,
};
use std::{marker::PhantomData, sync::Arc};

///
/// Db
///

#[derive(Clone)]
pub struct Db {
    registry: Arc<SchemaRegistry>,
    service: Arc<dyn ExecutionService>,
}

impl Db {
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>, service: Arc<dyn ExecutionService>) -> Self {
        Self { registry, service }
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Typed operation surface for one entity.
    #[must_use]
    pub const fn entity<E: EntityKind>(&self) -> EntityClient<'_, E> {
        EntityClient {
            db: self,
            _marker: PhantomData,
        }
    }

    /// Transaction coordinator bound to this session's service.
    #[must_use]
    pub fn transactions(&self) -> Coordinator {
        Coordinator::new(self.service.clone())
    }
}

///
/// EntityClient
///
/// Per-entity operation set. Typed decode (`find_*`, `create`, ...) expects
/// the full scalar selection; projected reads go through the `*_rows`
/// variants and stay untyped.
///

pub struct EntityClient<'a, E: EntityKind> {
    db: &'a Db,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> EntityClient<'_, E> {
    //
    // Unique reads
    //

    /// Look up at most one row by unique selector.
    pub fn find_unique(&self, selector: UniqueSelector) -> Result<Option<E>, Error> {
        let rows = self.run_unique(selector, &SelectionInput::new())?;

        rows.one_opt(E::MODEL.entity_name)?
            .map(|row| E::from_row(&row))
            .transpose()
            .map_err(Into::into)
    }

    /// Untyped unique read with a projected selection.
    pub fn find_unique_rows(
        &self,
        selector: UniqueSelector,
        selection: &SelectionInput,
    ) -> Result<Option<Row>, Error> {
        let rows = self.run_unique(selector, selection)?;

        rows.one_opt(E::MODEL.entity_name).map_err(Into::into)
    }

    /// Like `find_unique`, but a zero-row result is a typed
    /// `RecordNotFound` instead of `None`.
    pub fn find_unique_or_throw(&self, selector: UniqueSelector) -> Result<E, Error> {
        let rows = self.run_unique(selector, &SelectionInput::new())?;
        let row = rows.one(E::MODEL.entity_name)?;

        E::from_row(&row).map_err(Into::into)
    }

    //
    // Filtered reads
    //

    pub fn find_first(&self, query: FindQuery<E>) -> Result<Option<E>, Error> {
        let plan = self.built(PlanKind::Query, query.plan_first(self.db.registry()))?;
        let rows = self.run(Plan::Query(plan))?;

        rows.one_opt(E::MODEL.entity_name)?
            .map(|row| E::from_row(&row))
            .transpose()
            .map_err(Into::into)
    }

    pub fn find_first_or_throw(&self, query: FindQuery<E>) -> Result<E, Error> {
        let plan = self.built(PlanKind::Query, query.plan_first(self.db.registry()))?;
        let rows = self.run(Plan::Query(plan))?;
        let row = rows.one(E::MODEL.entity_name)?;

        E::from_row(&row).map_err(Into::into)
    }

    pub fn find_many(&self, query: FindQuery<E>) -> Result<Vec<E>, Error> {
        self.find_many_rows(query)?.decode::<E>().map_err(Into::into)
    }

    /// Untyped variant for projected selections (`select`/`include`).
    pub fn find_many_rows(&self, query: FindQuery<E>) -> Result<Rows, Error> {
        let plan = self.built(PlanKind::Query, query.plan(self.db.registry()))?;

        self.run(Plan::Query(plan))
    }

    //
    // Analytics
    //

    pub fn count(&self, filter: Option<Predicate>) -> Result<u64, Error> {
        let mut query = AggregateQuery::<E>::new(
            crate::query::aggregate::AggregateSelection::new().count_all(),
        );
        if let Some(filter) = filter {
            query = query.filter(filter);
        }

        let row = self.aggregate(query)?;
        let count = row.int(E::MODEL.entity_name, "_count")?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Run an aggregate plan; the service answers with one row of aggregate
    /// outputs keyed by pseudo-field (`_count`, `_avg.price`, ...).
    pub fn aggregate(&self, query: AggregateQuery<E>) -> Result<Row, Error> {
        let plan = self.built(PlanKind::Aggregate, query.plan(self.db.registry()))?;
        let rows = self.run(Plan::Aggregate(plan))?;

        rows.one(E::MODEL.entity_name).map_err(Into::into)
    }

    /// Run a group-by plan; one row per bucket.
    pub fn group_by(&self, query: GroupByQuery<E>) -> Result<Rows, Error> {
        let plan = self.built(PlanKind::GroupBy, query.plan(self.db.registry()))?;

        self.run(Plan::GroupBy(plan))
    }

    //
    // Single-row writes
    //

    pub fn create(&self, data: WriteInput) -> Result<E, Error> {
        let plan = self.built(
            PlanKind::Mutation,
            plan_create(self.db.registry(), E::MODEL, data),
        )?;

        self.one_written(Plan::Mutation(plan))
    }

    pub fn update(&self, selector: UniqueSelector, data: WriteInput) -> Result<E, Error> {
        let plan = self.built(
            PlanKind::Mutation,
            plan_update(self.db.registry(), E::MODEL, selector, data),
        )?;

        self.one_written(Plan::Mutation(plan))
    }

    pub fn upsert(&self, upsert: UpsertBuilder) -> Result<E, Error> {
        let plan = self.built(
            PlanKind::Mutation,
            upsert.build(self.db.registry(), E::MODEL),
        )?;

        self.one_written(Plan::Mutation(plan))
    }

    /// Delete one row and hand it back.
    pub fn delete(&self, selector: UniqueSelector) -> Result<E, Error> {
        let plan = self.built(PlanKind::Mutation, plan_delete(E::MODEL, selector))?;

        self.one_written(Plan::Mutation(plan))
    }

    //
    // Batch writes
    //

    pub fn create_many(&self, rows: Vec<ScalarData>) -> Result<u64, Error> {
        let plan = self.built(
            PlanKind::Mutation,
            plan_create_many(E::MODEL, rows, false),
        )?;

        self.run_batch(Plan::Mutation(plan))
    }

    pub fn create_many_and_return(&self, rows: Vec<ScalarData>) -> Result<Vec<E>, Error> {
        let plan = self.built(PlanKind::Mutation, plan_create_many(E::MODEL, rows, true))?;

        self.run(Plan::Mutation(plan))?.decode::<E>().map_err(Into::into)
    }

    pub fn update_many(
        &self,
        filter: Option<Predicate>,
        data: ScalarData,
        limit: Option<u32>,
    ) -> Result<u64, Error> {
        let plan = self.built(
            PlanKind::Mutation,
            plan_update_many(self.db.registry(), E::MODEL, filter, data, limit, false),
        )?;

        self.run_batch(Plan::Mutation(plan))
    }

    pub fn update_many_and_return(
        &self,
        filter: Option<Predicate>,
        data: ScalarData,
        limit: Option<u32>,
    ) -> Result<Vec<E>, Error> {
        let plan = self.built(
            PlanKind::Mutation,
            plan_update_many(self.db.registry(), E::MODEL, filter, data, limit, true),
        )?;

        self.run(Plan::Mutation(plan))?.decode::<E>().map_err(Into::into)
    }

    pub fn delete_many(
        &self,
        filter: Option<Predicate>,
        limit: Option<u32>,
    ) -> Result<u64, Error> {
        let plan = self.built(
            PlanKind::Mutation,
            plan_delete_many(self.db.registry(), E::MODEL, filter, limit, false),
        )?;

        self.run_batch(Plan::Mutation(plan))
    }

    pub fn delete_many_and_return(
        &self,
        filter: Option<Predicate>,
        limit: Option<u32>,
    ) -> Result<Vec<E>, Error> {
        let plan = self.built(
            PlanKind::Mutation,
            plan_delete_many(self.db.registry(), E::MODEL, filter, limit, true),
        )?;

        self.run(Plan::Mutation(plan))?.decode::<E>().map_err(Into::into)
    }

    //
    // Internals
    //

    fn run_unique(
        &self,
        selector: UniqueSelector,
        selection: &SelectionInput,
    ) -> Result<Rows, Error> {
        let plan = self.built(
            PlanKind::Query,
            plan_find_unique::<E>(self.db.registry(), selector, selection),
        )?;

        self.run(Plan::Query(plan))
    }

    // Record planner outcome as one metrics event either way.
    fn built<P, Source: Into<Error>>(
        &self,
        kind: PlanKind,
        result: Result<P, Source>,
    ) -> Result<P, Error> {
        match result {
            Ok(plan) => {
                record(MetricsEvent::PlanBuilt {
                    kind,
                    entity: E::MODEL.entity_name,
                });
                Ok(plan)
            }
            Err(err) => {
                record(MetricsEvent::PlanRejected {
                    kind,
                    entity: E::MODEL.entity_name,
                });
                Err(err.into())
            }
        }
    }

    fn run(&self, plan: Plan) -> Result<Rows, Error> {
        let rows = self.db.service.execute(&plan)?;
        record(MetricsEvent::Execution {
            entity: E::MODEL.entity_name,
            rows_returned: rows.count() as u64,
        });

        Ok(rows)
    }

    fn run_batch(&self, plan: Plan) -> Result<u64, Error> {
        let affected = self.db.service.execute_batch(&plan)?;
        record(MetricsEvent::BatchExecution {
            entity: E::MODEL.entity_name,
            affected,
        });

        Ok(affected)
    }

    // Mutations returning rows always yield exactly the affected row.
    fn one_written(&self, plan: Plan) -> Result<E, Error> {
        let rows = self.run(plan)?;
        let row = rows.one(E::MODEL.entity_name)?;

        E::from_row(&row).map_err(Into::into)
    }
}

///
/// TESTS
///
