//! An in-memory stand-in for an OpenSearch node.
//!
//! Serves the handful of endpoints the client tests exercise: cluster info,
//! document CRUD, search, bulk, cluster health and legacy templates. Every
//! response is JSON; `?pretty` switches to indented output and `?filter_path`
//! trims it. An incoming `X-Opaque-Id` is echoed on the response.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub mod bulk;
pub mod error;
pub mod filter;
pub mod store;

pub use error::ApiError;
pub use store::{Matcher, Store, StoredDoc, WriteOutcome};

pub const CLUSTER_NAME: &str = "mock-cluster";
pub const NODE_NAME: &str = "mock-node-1";
pub const VERSION: &str = "2.11.0";

/// Sent with every legacy template write.
pub const TEMPLATE_WARNING: &str = "299 OpenSearch-2.11.0 \"Legacy index templates are deprecated in favor of composable templates.\"";

pub const OPAQUE_ID: HeaderName = HeaderName::from_static("x-opaque-id");

const DEFAULT_SIZE: usize = 10;

pub type Db = Arc<RwLock<Store>>;

pub type Reply = Result<(StatusCode, Value), ApiError>;

/// Query parameters the mock understands. Anything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct Params {
    pub pretty: Option<String>,
    pub size: Option<usize>,
    pub from: Option<usize>,
    pub q: Option<String>,
    pub op_type: Option<String>,
    pub create: Option<String>,
    pub filter_path: Option<String>,
}

impl Params {
    /// A bare `?pretty` counts as set.
    pub fn pretty(&self) -> bool {
        flag(self.pretty.as_deref())
    }

    pub fn create(&self) -> bool {
        flag(self.create.as_deref())
    }
}

fn flag(value: Option<&str>) -> bool {
    matches!(value, Some(value) if value != "false")
}

pub fn app() -> Router {
    let db: Db = Db::default();
    Router::new()
        .route("/", get(cluster_info))
        .route("/_search", get(search_all).post(search_all))
        .route("/_bulk", post(bulk_all))
        .route("/_cluster/health", get(health_all))
        .route("/_cluster/health/{index}", get(health_index))
        .route("/_template", get(get_all_templates))
        .route("/_template/{name}", get(get_template).put(put_template))
        .route("/{index}/_doc", post(create_doc))
        .route(
            "/{index}/_doc/{id}",
            get(get_doc).put(put_doc).post(put_doc).delete(delete_doc),
        )
        .route("/{index}/_search", get(search_index).post(search_index))
        .route("/{index}/_bulk", post(bulk_index))
        .layer(middleware::from_fn(echo_opaque_id))
        .with_state(db)
}

async fn echo_opaque_id(request: Request, next: Next) -> Response {
    let opaque_id = request.headers().get(&OPAQUE_ID).cloned();
    let mut response = next.run(request).await;
    if let Some(opaque_id) = opaque_id {
        debug!(opaque_id = ?opaque_id, "echoing opaque id");
        response.headers_mut().insert(OPAQUE_ID, opaque_id);
    }
    response
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock OpenSearch listening");
    }
    axum::serve(listener, app()).await
}

/// Render a handler result as JSON, honoring `?filter_path` and `?pretty`.
pub fn render(params: &Params, reply: Reply) -> Response {
    let (status, body) = match reply {
        Ok(ok) => ok,
        Err(err) => {
            debug!(status = %err.status(), "request failed: {err}");
            (err.status(), err.body())
        }
    };
    let body = match params.filter_path.as_deref() {
        Some(filter) => filter::filter_path(body, filter),
        None => body,
    };
    let text = if params.pretty() {
        format!("{body:#}\n")
    } else {
        body.to_string()
    };
    (
        status,
        [(header::CONTENT_TYPE, "application/json; charset=UTF-8")],
        text,
    )
        .into_response()
}

fn optional_json(body: &[u8]) -> Result<Option<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|err| ApiError::parse(format!("failed to parse request body: {err}")))
}

fn required_json(body: &[u8]) -> Result<Value, ApiError> {
    optional_json(body)?.ok_or_else(|| ApiError::parse("request body is required"))
}

fn write_result(index: &str, id: &str, version: u64, result: &str) -> Value {
    json!({
        "_index": index,
        "_id": id,
        "_version": version,
        "result": result,
        "_shards": { "total": 1, "successful": 1, "failed": 0 },
    })
}

// --- cluster ---

async fn cluster_info(Query(params): Query<Params>) -> Response {
    let body = json!({
        "name": NODE_NAME,
        "cluster_name": CLUSTER_NAME,
        "cluster_uuid": "mock-cluster-uuid",
        "version": {
            "distribution": "opensearch",
            "number": VERSION,
            "lucene_version": "9.7.0",
        },
        "tagline": "The OpenSearch Project: https://opensearch.org/",
    });
    render(&params, Ok((StatusCode::OK, body)))
}

async fn health_all(State(db): State<Db>, Query(params): Query<Params>) -> Response {
    render(&params, health(&db, None).await)
}

async fn health_index(
    State(db): State<Db>,
    Path(index): Path<String>,
    Query(params): Query<Params>,
) -> Response {
    render(&params, health(&db, Some(&index)).await)
}

async fn health(db: &Db, target: Option<&str>) -> Reply {
    let store = db.read().await;
    let shards = store.resolve(target)?.len();
    Ok((
        StatusCode::OK,
        json!({
            "cluster_name": CLUSTER_NAME,
            "status": "green",
            "timed_out": false,
            "number_of_nodes": 1,
            "number_of_data_nodes": 1,
            "active_primary_shards": shards,
            "active_shards": shards,
            "relocating_shards": 0,
            "initializing_shards": 0,
            "unassigned_shards": 0,
            "number_of_pending_tasks": 0,
        }),
    ))
}

// --- documents ---

async fn get_doc(
    State(db): State<Db>,
    Path((index, id)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Response {
    let store = db.read().await;
    let reply = match store.get(&index, &id) {
        Some(doc) => (
            StatusCode::OK,
            json!({
                "_index": index,
                "_id": id,
                "_version": doc.version,
                "found": true,
                "_source": doc.source,
            }),
        ),
        None => (
            StatusCode::NOT_FOUND,
            json!({ "_index": index, "_id": id, "found": false }),
        ),
    };
    render(&params, Ok(reply))
}

async fn put_doc(
    State(db): State<Db>,
    Path((index, id)): Path<(String, String)>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Response {
    let create_only = params.op_type.as_deref() == Some("create");
    render(&params, write_doc(&db, &index, &id, &body, create_only).await)
}

async fn create_doc(
    State(db): State<Db>,
    Path(index): Path<String>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Response {
    let id = store::generate_id();
    render(&params, write_doc(&db, &index, &id, &body, false).await)
}

async fn write_doc(db: &Db, index: &str, id: &str, body: &[u8], create_only: bool) -> Reply {
    let source = required_json(body)?;
    let (version, outcome) = db.write().await.index(index, id, source, create_only)?;
    debug!(%index, %id, version, "document {}", outcome.as_str());
    Ok((outcome.status(), write_result(index, id, version, outcome.as_str())))
}

async fn delete_doc(
    State(db): State<Db>,
    Path((index, id)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Response {
    let deleted = db.write().await.delete(&index, &id);
    let reply = match deleted {
        Some(version) => {
            debug!(%index, %id, version, "document deleted");
            (StatusCode::OK, write_result(&index, &id, version, "deleted"))
        }
        None => (StatusCode::NOT_FOUND, write_result(&index, &id, 1, "not_found")),
    };
    render(&params, Ok(reply))
}

// --- search ---

async fn search_all(State(db): State<Db>, Query(params): Query<Params>, body: Bytes) -> Response {
    let reply = search(&db, None, &params, &body).await;
    render(&params, reply)
}

async fn search_index(
    State(db): State<Db>,
    Path(index): Path<String>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Response {
    let reply = search(&db, Some(&index), &params, &body).await;
    render(&params, reply)
}

async fn search(db: &Db, target: Option<&str>, params: &Params, body: &[u8]) -> Reply {
    let request = optional_json(body)?;
    let request = request.as_ref();
    let matcher = match &params.q {
        Some(q) => Matcher::query_string(q),
        None => Matcher::from_query(request.and_then(|r| r.get("query"))),
    };
    let body_usize = |key: &str| {
        request
            .and_then(|r| r.get(key))
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
    };
    let size = params.size.or_else(|| body_usize("size")).unwrap_or(DEFAULT_SIZE);
    let from = params.from.or_else(|| body_usize("from")).unwrap_or(0);

    let store = db.read().await;
    let indices = store.resolve(target)?;
    let matched = store.search(&indices, &matcher);
    let total = matched.len();
    let hits: Vec<Value> = matched
        .into_iter()
        .skip(from)
        .take(size)
        .map(|(index, id, doc)| {
            json!({
                "_index": index,
                "_id": id,
                "_score": 1.0,
                "_source": doc.source,
            })
        })
        .collect();
    let max_score = if hits.is_empty() { Value::Null } else { json!(1.0) };

    Ok((
        StatusCode::OK,
        json!({
            "took": 1,
            "timed_out": false,
            "_shards": { "total": indices.len(), "successful": indices.len(), "skipped": 0, "failed": 0 },
            "hits": {
                "total": { "value": total, "relation": "eq" },
                "max_score": max_score,
                "hits": hits,
            },
        }),
    ))
}

// --- bulk ---

async fn bulk_all(State(db): State<Db>, Query(params): Query<Params>, body: Bytes) -> Response {
    render(&params, bulk(&db, None, &body).await)
}

async fn bulk_index(
    State(db): State<Db>,
    Path(index): Path<String>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Response {
    render(&params, bulk(&db, Some(&index), &body).await)
}

async fn bulk(db: &Db, default_index: Option<&str>, body: &[u8]) -> Reply {
    let body = std::str::from_utf8(body)
        .map_err(|_| ApiError::parse("request body is not valid UTF-8"))?;
    let ops = bulk::parse(body, default_index)?;
    let mut store = db.write().await;
    let items: Vec<Value> = ops
        .into_iter()
        .map(|op| bulk::apply(&mut store, op))
        .collect();
    let errors = bulk::has_errors(&items);
    debug!(items = items.len(), errors, "bulk applied");
    Ok((
        StatusCode::OK,
        json!({ "took": 1, "errors": errors, "items": items }),
    ))
}

// --- templates ---

async fn get_all_templates(State(db): State<Db>, Query(params): Query<Params>) -> Response {
    let templates = db.read().await.templates(None);
    render(&params, Ok((StatusCode::OK, Value::Object(templates))))
}

async fn get_template(
    State(db): State<Db>,
    Path(name): Path<String>,
    Query(params): Query<Params>,
) -> Response {
    let templates = db.read().await.templates(Some(&name));
    let status = if templates.is_empty() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    render(&params, Ok((status, Value::Object(templates))))
}

async fn put_template(
    State(db): State<Db>,
    Path(name): Path<String>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Response {
    let reply = match required_json(&body) {
        Ok(template) => db
            .write()
            .await
            .put_template(&name, template, params.create())
            .map(|()| (StatusCode::OK, json!({ "acknowledged": true }))),
        Err(err) => Err(err),
    };
    let mut response = render(&params, reply);
    response
        .headers_mut()
        .insert(header::WARNING, HeaderValue::from_static(TEMPLATE_WARNING));
    response
}
