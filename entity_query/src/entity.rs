//! Entity listing pipeline
//!
//! An entity is a type with a table schema. Its listing query is built in a
//! fixed stage order, each stage being an overridable hook:
//!
//! 1. `base_select` - `SELECT * FROM <table>`
//! 2. `apply_columns` - no-op by default
//! 3. `apply_filters` - one bound predicate per filter on a real column
//! 4. `apply_orders` - the rendered orders as ORDER BY
//! 5. `apply_params` - no-op by default
//!
//! `paginator` runs the pipeline and pages the result through an executor.

use crate::errors::EntityError;
use crate::executor::QueryExecutor;
use crate::paginator::{DataSource, PageResult, Paginator};
use crate::sanitize::{sanitize, Sanitizer, DEFAULT_SANITIZERS};
use crate::schema::{schema_of, Schema, TableSchema};
use crate::select::SelectQuery;
use async_trait::async_trait;
use rows_request::{Columns, Filter, Filters, Orders, RowsRequest};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[async_trait]
pub trait Entity: TableSchema + Sized {
    fn schema(&self) -> Arc<Schema> {
        schema_of::<Self>()
    }

    fn columns(&self) -> Vec<String> {
        self.schema().columns().to_vec()
    }

    fn primary(&self) -> Option<String> {
        self.schema().primary().map(str::to_string)
    }

    fn columns_full(&self) -> Vec<String> {
        self.schema().columns_full()
    }

    /// Sanitize incoming field values
    ///
    /// Fields with their own sanitizers use them, skipped fields pass
    /// through, everything else gets `strip_tags` then `trim`.
    fn filter_input(&self, data: Map<String, Value>) -> Map<String, Value> {
        let overrides: HashMap<&'static str, Vec<Sanitizer>> =
            Self::input_sanitizers().into_iter().collect();
        let skipped = Self::skip_sanitize_fields();

        let filtered = data
            .into_iter()
            .map(|(field, value)| {
                let value = if skipped.contains(&field.as_str()) {
                    value
                } else {
                    match overrides.get(field.as_str()) {
                        Some(chain) => sanitize(value, chain),
                        None => sanitize(value, &DEFAULT_SANITIZERS),
                    }
                };
                (field, value)
            })
            .collect();

        self.after_filter_input(filtered)
    }

    fn after_filter_input(&self, data: Map<String, Value>) -> Map<String, Value> {
        data
    }

    fn base_select(&self) -> Result<SelectQuery, EntityError> {
        let schema = self.schema();
        schema.validate()?;
        Ok(SelectQuery::from_table(schema.table()))
    }

    fn apply_columns(
        &self,
        _select: &mut SelectQuery,
        _columns: &Columns,
    ) -> Result<(), EntityError> {
        Ok(())
    }

    fn apply_filters(
        &self,
        select: &mut SelectQuery,
        filters: &mut Filters,
    ) -> Result<(), EntityError> {
        filters.remove_empty();
        for filter in filters.iter() {
            self.apply_filter(select, filter)?;
        }
        Ok(())
    }

    /// Equality or IN predicate on `<table>.<col>`; unknown columns are skipped
    fn apply_filter(&self, select: &mut SelectQuery, filter: &Filter) -> Result<(), EntityError> {
        let schema = self.schema();
        if !schema.has_column(filter.col()) {
            tracing::trace!(table = schema.table(), column = filter.col(), "skipping filter on unknown column");
            return Ok(());
        }

        let value = filter.to_db_value()?;
        let lhs = format!("{}.{}", schema.table(), filter.col());
        select.and_where(value.eq_expr_prepared(Some(&lhs)), value.bind());
        Ok(())
    }

    fn apply_orders(&self, select: &mut SelectQuery, orders: &Orders) -> Result<(), EntityError> {
        let rendered = orders.to_string();
        if !rendered.trim().is_empty() {
            select.order_by(rendered);
        }
        Ok(())
    }

    fn apply_params(
        &self,
        _select: &mut SelectQuery,
        _params: &BTreeMap<String, Value>,
    ) -> Result<(), EntityError> {
        Ok(())
    }

    /// Listing query for the request, without paging
    fn select_for_paginator(&self, request: &mut RowsRequest) -> Result<SelectQuery, EntityError> {
        let mut select = self.base_select()?;
        self.apply_columns(&mut select, request.columns())?;
        self.apply_filters(&mut select, request.filters_mut())?;
        self.apply_orders(&mut select, request.orders())?;
        self.apply_params(&mut select, request.params())?;

        tracing::debug!(sql = %select.to_sql(), "built listing query");
        Ok(select)
    }

    /// Page of rows for the request
    ///
    /// With pagination disabled the request is rewritten to a single page
    /// holding every row.
    async fn paginator<E>(
        &self,
        request: &mut RowsRequest,
        executor: &E,
    ) -> Result<PageResult<E::Row>, EntityError>
    where
        E: QueryExecutor,
    {
        let select = self.select_for_paginator(request)?;

        if request.pagination().is_enabled() {
            return Paginator::create(DataSource::Builder(select), request.pagination(), executor)
                .await;
        }

        let total = executor.count(&select).await?;
        request
            .pagination_mut()
            .set_start(0)
            .set_per_page(i64::try_from(total).unwrap_or(i64::MAX));
        Paginator::from_query(select, total, request.pagination(), executor).await
    }
}
