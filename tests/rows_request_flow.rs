//! End-to-end listing flow: configuration, request ingestion, session
//! persistence and the entity pipeline against an in-memory executor.

use gridquery::prelude::*;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};

const CONFIG: &str = r#"
[database]
host = "localhost"
port = 5432
database = "cms"
username = "postgres"
password = "secret"
min_connections = 1
max_connections = 5
connection_timeout_seconds = 30
idle_timeout_seconds = 600
max_lifetime_seconds = 3600

[session]
redis_url = "redis://localhost:6379"
key_prefix = "cms"

[requests.articles.storage]
adapter = "session"
namespace = "ArticlesTable"

[requests.articles.defaults]
length = 3
order = ["published_at desc"]

[requests.report]
"#;

#[allow(dead_code)]
#[derive(Debug, Default, TableSchema)]
#[table(name = "articles")]
struct Article {
    #[primary_key]
    id: i64,
    title: String,
    status: String,
    published_at: String,
}

impl Entity for Article {}

/// Rows held in memory; filters on `status` are honoured, everything else
/// is only recorded
struct FakeDatabase {
    rows: Vec<Value>,
    queries: Mutex<Vec<(String, Vec<Value>)>>,
}

impl FakeDatabase {
    fn new() -> Self {
        let rows = (1..=10)
            .map(|id| {
                let status = if id % 2 == 0 { "live" } else { "draft" };
                json!({"id": id, "status": status})
            })
            .collect();
        Self {
            rows,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn matching(&self, values: &[Value]) -> Vec<Value> {
        self.rows
            .iter()
            .filter(|row| values.is_empty() || values.contains(&row["status"]))
            .cloned()
            .collect()
    }

    fn queries(&self) -> Vec<(String, Vec<Value>)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl QueryExecutor for FakeDatabase {
    type Row = Value;

    async fn fetch(&self, query: &SelectQuery) -> Result<Vec<Value>, EntityError> {
        let (sql, values) = query.to_positional();
        let matching = self.matching(&values);
        self.queries.lock().unwrap().push((sql, values));

        let offset = query.offset().unwrap_or(0) as usize;
        let rows = matching.into_iter().skip(offset);
        Ok(match query.limit() {
            Some(limit) => rows.take(limit as usize).collect(),
            None => rows.collect(),
        })
    }

    async fn count(&self, query: &SelectQuery) -> Result<u64, EntityError> {
        let (sql, values) = query.to_positional_count();
        let total = self.matching(&values).len() as u64;
        self.queries.lock().unwrap().push((sql, values));
        Ok(total)
    }
}

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn grid() -> GridQuery {
    let config = AppConfig::from_toml_str(CONFIG).unwrap();
    GridQuery::from_config(&config)
}

#[tokio::test]
async fn test_grid_widget_request_to_page() {
    let grid = grid();
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let database = FakeDatabase::new();

    let mut request = grid.request("articles", Some(sessions.clone())).unwrap();
    assert_eq!(request.pagination().per_page(), 3);
    assert_eq!(request.orders().to_string(), "published_at desc");

    request
        .set_from_dt_request(obj(json!({
            "draw": 1,
            "columns": [
                {"data": "id"},
                {"data": "title", "search": {"value": ""}},
                {"data": "status", "search": {"value": "live"}}
            ],
            "order": [{"column": 0, "dir": "desc"}],
            "start": 3,
            "length": 3
        })))
        .unwrap();

    let page = Article::default()
        .paginator(&mut request, &database)
        .await
        .unwrap();

    assert_eq!(page.total_count, 5);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.page_count, 2);
    assert_eq!(page.items, vec![json!({"id": 8, "status": "live"}), json!({"id": 10, "status": "live"})]);

    let queries = database.queries();
    assert_eq!(
        queries[1].0,
        "SELECT * FROM articles WHERE articles.status = $1 ORDER BY id desc LIMIT 3 OFFSET 3"
    );
    assert_eq!(queries[1].1, vec![json!("live")]);

    let serialized = serde_json::to_value(&page).unwrap();
    assert_eq!(serialized["total_count"], json!(5));

    // state survives into the next request of the same session
    request.save().unwrap();
    let restored = grid.request("articles", Some(sessions)).unwrap();
    assert_eq!(restored.pagination().start(), 3);
    assert_eq!(restored.orders().to_array(), vec!["id desc"]);
    assert_eq!(restored.filters().to_array(), obj(json!({"status": "live"})));
    assert_eq!(restored.param("draw"), Some(&json!(1)));
    assert_eq!(restored.hash(), request.hash());
}

#[tokio::test]
async fn test_generic_request_without_pagination() {
    let grid = grid();
    let database = FakeDatabase::new();

    let mut request = grid
        .request_from_input("report", None, obj(json!({"f": {"status": "draft"}})))
        .unwrap();
    request.pagination_mut().set_enabled(false);

    let page = Article::default()
        .paginator(&mut request, &database)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_count, 5);
    assert_eq!(page.page_count, 1);
    assert_eq!(request.pagination().per_page(), 5);
    assert_eq!(request.storage().adapter_name(), "black_hole");
}

#[test]
fn test_invalid_client_input_is_rejected() {
    let grid = grid();

    let err = grid
        .request_from_input("report", None, obj(json!({"order": ["id;delete"]})))
        .unwrap_err();
    assert!(matches!(
        err,
        GridQueryError::Request(RequestError::InvalidColumnName(_))
    ));

    assert!(matches!(
        grid.request("missing", None),
        Err(GridQueryError::ProfileNotFound(_))
    ));
}

#[test]
fn test_clear_storage_restores_defaults() {
    let grid = grid();
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());

    let mut request = grid.request("articles", Some(sessions.clone())).unwrap();
    request
        .set_from_array(obj(json!({"start": 9, "f": {"status": "live"}})))
        .unwrap();
    request.save().unwrap();
    assert!(sessions.has("ArticlesTable", "f").unwrap());

    request.clear_storage().unwrap();
    let fresh = grid.request("articles", Some(sessions)).unwrap();
    assert_eq!(fresh.pagination().start(), 1);
    assert!(fresh.filters().is_empty());
    assert_eq!(fresh.pagination().per_page(), 3);
}
