//! Rows request aggregate
//!
//! `RowsRequest` owns the pagination, orders, filters and columns of one
//! table view, plus an open bag of extra parameters. It is filled from one
//! of two wire protocols:
//!
//! - the generic protocol (`set_from_array`) with the reserved keys `start`,
//!   `length`, `order`, `f` and `columns`
//! - the grid widget protocol (`set_from_dt_request`) where orders refer to
//!   columns by position and a page size of `-1` turns pagination off
//!
//! Keys a protocol does not consume end up in the parameter bag. State can
//! be kept between calls through the configured `Storage`.

use crate::column::{Column, Columns};
use crate::errors::RequestError;
use crate::filter::{Filter, Filters};
use crate::order::{Order, Orders};
use crate::pagination::{Pagination, PER_PAGE_DEFAULT};
use crate::storage::{self, BlackHoleStorage, Storage};
use crate::wire::{as_int, indexed, non_empty_text, scalar_text, take_present};
use config::RequestConfig;
use serde_json::{Map, Value};
use session_store::SessionStore;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RowsRequest {
    config: RequestConfig,
    storage: Arc<dyn Storage>,
    pagination: Pagination,
    orders: Orders,
    filters: Filters,
    columns: Columns,
    params: BTreeMap<String, Value>,
}

impl Default for RowsRequest {
    fn default() -> Self {
        Self::ephemeral()
    }
}

impl RowsRequest {
    pub const KEY_START: &'static str = "start";
    pub const KEY_LENGTH: &'static str = "length";
    pub const KEY_ORDER: &'static str = "order";
    pub const KEY_FILTERS: &'static str = "f";
    pub const KEY_COLUMNS: &'static str = "columns";

    pub const RESERVED_KEYS: [&'static str; 5] = [
        Self::KEY_START,
        Self::KEY_LENGTH,
        Self::KEY_ORDER,
        Self::KEY_FILTERS,
        Self::KEY_COLUMNS,
    ];

    /// Create a request, apply the configured defaults, then load stored state
    pub fn new(config: RequestConfig, storage: Arc<dyn Storage>) -> Result<Self, RequestError> {
        let mut request = Self::bare(config, storage);
        request.reset()?;
        request.load()?;
        Ok(request)
    }

    /// Create a request with the storage named in `config`
    pub fn from_config(
        config: RequestConfig,
        sessions: Option<Arc<dyn SessionStore>>,
    ) -> Result<Self, RequestError> {
        let storage = storage::resolve(&config.storage, sessions)?;
        Self::new(config, storage)
    }

    /// Request without defaults or persistence
    pub fn ephemeral() -> Self {
        let mut request = Self::bare(RequestConfig::default(), Arc::new(BlackHoleStorage));
        request.reset_state();
        request
    }

    fn bare(config: RequestConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            storage,
            pagination: Pagination::default(),
            orders: Orders::new(),
            filters: Filters::new(),
            columns: Columns::new(),
            params: BTreeMap::new(),
        }
    }

    fn reset_state(&mut self) {
        self.pagination = Pagination::new(Some(1), Some(PER_PAGE_DEFAULT as i64));
        self.orders.clear();
        self.filters.clear();
        self.columns.clear();
        self.params.clear();
    }

    /// Back to the initial state plus the configured defaults
    pub fn reset(&mut self) -> Result<&mut Self, RequestError> {
        self.reset_state();
        if !self.config.defaults.is_empty() {
            let defaults = self.config.defaults.clone();
            self.set_from_array(defaults)?;
        }
        Ok(self)
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn set_storage(&mut self, storage: Arc<dyn Storage>) -> &mut Self {
        self.storage = storage;
        self
    }

    /// Ingest the generic protocol
    pub fn set_from_array(&mut self, input: Map<String, Value>) -> Result<&mut Self, RequestError> {
        let mut input = input;
        tracing::debug!(keys = input.len(), "ingesting rows request");

        if let Some(start) = take_present(&mut input, Self::KEY_START).as_ref().and_then(as_int) {
            self.pagination.set_start(start);
        }

        if let Some(length) = take_present(&mut input, Self::KEY_LENGTH).as_ref().and_then(as_int) {
            self.pagination.set_per_page(length);
        }

        if let Some(order) = take_present(&mut input, Self::KEY_ORDER) {
            self.orders.clear();
            self.orders.set_from_json(&order)?;
        }

        if let Some(filters) = take_present(&mut input, Self::KEY_FILTERS) {
            self.filters.clear();
            if let Value::Object(filters) = filters {
                self.filters.set_from_array(&filters, false)?;
            }
        }

        if let Some(columns) = take_present(&mut input, Self::KEY_COLUMNS) {
            self.columns.clear();
            self.columns.set_from_json(&columns)?;
        }

        self.set_params(input);
        Ok(self)
    }

    /// Ingest the grid widget protocol
    pub fn set_from_dt_request(
        &mut self,
        input: Map<String, Value>,
    ) -> Result<&mut Self, RequestError> {
        let mut input = input;
        tracing::debug!(keys = input.len(), "ingesting grid widget request");

        self.columns.clear();
        self.filters.clear();

        let columns = input
            .remove(Self::KEY_COLUMNS)
            .map(indexed)
            .unwrap_or_default();

        // position -> data name, for resolving orders
        let mut names: BTreeMap<usize, String> = BTreeMap::new();

        for (idx, entry) in &columns {
            let Some(data) = non_empty_text(entry.get("data")) else {
                continue;
            };
            let name = entry.get("name").and_then(scalar_text).filter(|n| !n.is_empty());

            let column = Column::new(&data, name.as_deref())?;
            self.columns.append(column);
            names.insert(*idx, data.clone());

            let search = entry.get("search").and_then(|s| s.get("value"));
            if let Some(search) = search.filter(|v| !is_blank_search(v)) {
                self.filters.add(Filter::new(&data, search.clone())?);
            }
        }

        if let Some(start) = take_present(&mut input, Self::KEY_START).as_ref().and_then(as_int) {
            self.pagination.set_start(start);
        }

        if let Some(length) = take_present(&mut input, Self::KEY_LENGTH).as_ref().and_then(as_int) {
            self.pagination.set_per_page(length);
            self.pagination.set_enabled(length != -1);
        }

        if let Some(order) = take_present(&mut input, Self::KEY_ORDER) {
            self.orders.clear();
            for entry in indexed(order).into_values() {
                let Some(idx) = entry.get("column").and_then(as_int) else {
                    continue;
                };
                let Some(col) = usize::try_from(idx).ok().and_then(|i| names.get(&i)) else {
                    tracing::trace!(column = idx, "skipping order on unknown column index");
                    continue;
                };
                let direction = entry.get("dir").and_then(Value::as_str);
                self.orders.append(Order::new(col, direction)?);
            }
        }

        self.set_params(input);
        Ok(self)
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    pub fn set_pagination(&mut self, pagination: Pagination) -> &mut Self {
        self.pagination = pagination;
        self
    }

    pub fn orders(&self) -> &Orders {
        &self.orders
    }

    pub fn orders_mut(&mut self) -> &mut Orders {
        &mut self.orders
    }

    pub fn set_orders(&mut self, orders: Orders) -> &mut Self {
        self.orders = orders;
        self
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut Filters {
        &mut self.filters
    }

    pub fn set_filters(&mut self, filters: Filters) -> &mut Self {
        self.filters = filters;
        self
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut Columns {
        &mut self.columns
    }

    pub fn set_columns(&mut self, columns: Columns) -> &mut Self {
        self.columns = columns;
        self
    }

    pub fn params(&self) -> &BTreeMap<String, Value> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Bag parameter or `default` when unset
    pub fn param_or(&self, key: &str, default: Value) -> Value {
        self.params.get(key).cloned().unwrap_or(default)
    }

    pub fn set_param(&mut self, key: &str, value: Value) -> &mut Self {
        self.params.insert(key.to_string(), value);
        self
    }

    pub fn set_params(&mut self, params: Map<String, Value>) -> &mut Self {
        self.params.extend(params);
        self
    }

    pub fn clear_param(&mut self, key: &str) -> &mut Self {
        self.params.remove(key);
        self
    }

    pub fn clear_params(&mut self) -> &mut Self {
        self.params.clear();
        self
    }

    /// Flattened state in the generic protocol, bag parameters merged in
    pub fn to_array(&self) -> Map<String, Value> {
        let mut data = Map::new();
        for (key, value) in &self.params {
            data.insert(key.clone(), value.clone());
        }

        data.insert(Self::KEY_START.into(), Value::from(self.pagination.start()));
        data.insert(Self::KEY_LENGTH.into(), Value::from(self.pagination.per_page()));
        data.insert(Self::KEY_ORDER.into(), Value::from(self.orders.to_array()));
        data.insert(Self::KEY_FILTERS.into(), Value::Object(self.filters.to_array()));
        data.insert(Self::KEY_COLUMNS.into(), Value::from(self.columns.to_array()));
        data
    }

    /// SHA-256 of the flattened state, usable as a cache key
    pub fn hash(&self) -> String {
        let canonical = Value::Object(self.to_array()).to_string();
        let digest = Sha256::digest(canonical.as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn serialize(&self) -> String {
        Value::Object(self.to_array()).to_string()
    }

    /// Restore state produced by `serialize`
    pub fn unserialize(&mut self, data: &str) -> Result<&mut Self, RequestError> {
        let parsed: Map<String, Value> = serde_json::from_str(data)?;
        self.reset_state();
        self.set_from_array(parsed)
    }

    pub fn save(&self) -> Result<&Self, RequestError> {
        self.storage.save(self)?;
        Ok(self)
    }

    pub fn load(&mut self) -> Result<&mut Self, RequestError> {
        let storage = Arc::clone(&self.storage);
        storage.load(self)?;
        Ok(self)
    }

    pub fn clear_storage(&self) -> Result<&Self, RequestError> {
        self.storage.clear()?;
        Ok(self)
    }
}

fn is_blank_search(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
