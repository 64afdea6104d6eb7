//! HTTP handlers for the generation endpoints.
//!
//! Each handler is a single linear pipeline: resolve parameters, seed the
//! per-request RNG, build pools where linkage is needed, wire builders into a
//! lazy record set, and hand it to the serializer. Terminal states are "200
//! with body" or "400 with `{error}`".

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::domain::ApiError;
use crate::generation::{builders, fields, params, pool, serialize};
use crate::generation::{CsvColumn, RecordSet, UserField};
use crate::persistence::RequestLog;

/// Shared application state across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub request_log: Option<RequestLog>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, request_log: Option<RequestLog>) -> Self {
        Self {
            settings,
            request_log,
            started_at: Instant::now(),
        }
    }

    /// Fire-and-forget request logging; never blocks the response.
    fn record_request(&self, endpoint: &'static str) {
        if let Some(log) = &self.request_log {
            let log = log.clone();
            tokio::spawn(async move {
                if let Err(e) = log.record(endpoint).await {
                    tracing::warn!("failed to log request for {}: {}", endpoint, e);
                }
            });
        }
    }
}

pub async fn users(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    state.record_request("/users");
    let limits = &state.settings.generation;
    let config = params::resolve(&query, limits)?;

    let columns = user_columns(&config.fields);
    let requested = config.fields.clone();
    let age_range = config.age_range;
    let locale = config.locale;

    let records = RecordSet::new(config.rng(), config.count, move |rng| {
        serialize::record(&builders::user(rng, &requested, age_range, locale))
    });
    Ok(serialize::respond(
        records,
        config.format,
        columns,
        limits.streaming_threshold,
    ))
}

pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    state.record_request("/products");
    let limits = &state.settings.generation;
    let config = params::resolve(&query, limits)?;

    let records = RecordSet::new(config.rng(), config.count, move |rng| {
        serialize::record(&builders::product(rng))
    });
    Ok(serialize::respond(
        records,
        config.format,
        product_columns(),
        limits.streaming_threshold,
    ))
}

pub async fn companies(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    state.record_request("/companies");
    let limits = &state.settings.generation;
    let config = params::resolve(&query, limits)?;

    let locale = config.locale;
    let records = RecordSet::new(config.rng(), config.count, move |rng| {
        serialize::record(&builders::company(rng, locale))
    });
    Ok(serialize::respond(
        records,
        config.format,
        company_columns(),
        limits.streaming_threshold,
    ))
}

pub async fn transactions(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    state.record_request("/transactions");
    let limits = &state.settings.generation;
    let config = params::resolve(&query, limits)?;

    // Pools are built from the same RNG before record generation starts, so
    // seeded requests stay reproducible end to end.
    let mut rng = config.rng();
    let users = pool::build_user_pool(
        &mut rng,
        config.count,
        limits.user_pool_cap,
        config.age_range,
        config.locale,
    );
    let products = pool::build_product_pool(&mut rng, config.count, limits.product_pool_cap);
    let reference = config.reference_time;

    let records = RecordSet::new(rng, config.count, move |rng| {
        let user = pool::sample_user_ref(rng, &users);
        let product = pool::sample_product_ref(rng, &products);
        serialize::record(&builders::transaction(rng, user, product, reference))
    });
    Ok(serialize::respond(
        records,
        config.format,
        transaction_columns(),
        limits.streaming_threshold,
    ))
}

pub async fn dataset(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    state.record_request("/dataset");
    let limits = &state.settings.generation;
    let config = params::resolve(&query, limits)?;

    let mut rng = config.rng();
    let users = pool::build_user_pool(
        &mut rng,
        config.count,
        limits.user_pool_cap,
        config.age_range,
        config.locale,
    );
    let products = pool::build_product_pool(&mut rng, config.count, limits.product_pool_cap);
    let reference = config.reference_time;

    let records = RecordSet::new(rng, config.count, move |rng| {
        let user = pool::sample_user_ref(rng, &users);
        let product = pool::sample_product_ref(rng, &products);
        serialize::record(&builders::dataset_record(rng, user, product, reference))
    });
    Ok(serialize::respond(
        records,
        config.format,
        dataset_columns(),
        limits.streaming_threshold,
    ))
}

pub async fn timeseries(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    state.record_request("/timeseries");
    let limits = &state.settings.generation;
    let config = params::resolve(&query, limits)?;

    let mut rng = config.rng();
    // Absent start: a random date within the past year.
    let start = config
        .start
        .unwrap_or_else(|| fields::timestamp_within_past_days(&mut rng, config.reference_time, 365));
    let step = config.interval.step();

    let mut next = start;
    let records = RecordSet::new(rng, config.count, move |rng| {
        let point = builders::time_series_point(rng, next);
        next = next + step;
        serialize::record(&point)
    });
    Ok(serialize::respond(
        records,
        config.format,
        timeseries_columns(),
        limits.streaming_threshold,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CustomRequest {
    #[serde(default)]
    pub schema: BTreeMap<String, String>,
}

pub async fn custom(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: Option<Json<CustomRequest>>,
) -> Result<Response, ApiError> {
    state.record_request("/custom");
    let limits = &state.settings.generation;
    let config = params::resolve(&query, limits)?;

    let Some(Json(request)) = body else {
        return Err(ApiError::MissingSchema);
    };
    let schema = params::resolve_schema(&request.schema)?;

    let columns = schema
        .keys()
        .map(|field| CsvColumn::new(field.clone(), field))
        .collect();
    let locale = config.locale;
    let records = RecordSet::new(config.rng(), config.count, move |rng| {
        Value::Object(builders::custom_record(rng, &schema, locale))
    });
    Ok(serialize::respond(
        records,
        config.format,
        columns,
        limits.streaming_threshold,
    ))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    match &state.request_log {
        Some(log) => {
            let counts = log
                .counts()
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(Json(json!({ "requests": counts })))
        }
        // The sink is an optional collaborator; without it the endpoint still
        // answers with empty counts.
        None => Ok(Json(json!({ "requests": [] }))),
    }
}

fn user_columns(requested: &[UserField]) -> Vec<CsvColumn> {
    let mut columns = Vec::new();
    for field in requested {
        match field {
            // `address` expands in place to its sub-columns.
            UserField::Address => {
                columns.push(CsvColumn::new("street", "address.street"));
                columns.push(CsvColumn::new("city", "address.city"));
                columns.push(CsvColumn::new("country", "address.country"));
            }
            other => columns.push(CsvColumn::new(other.as_str(), other.as_str())),
        }
    }
    columns
}

fn product_columns() -> Vec<CsvColumn> {
    // Variant rows have no flat representation and are left out of CSV.
    ["id", "name", "price", "category", "inStock"]
        .iter()
        .map(|c| CsvColumn::new(*c, c))
        .collect()
}

fn company_columns() -> Vec<CsvColumn> {
    ["name", "industry", "employees", "location"]
        .iter()
        .map(|c| CsvColumn::new(*c, c))
        .collect()
}

fn transaction_columns() -> Vec<CsvColumn> {
    [
        "id",
        "user.id",
        "user.name",
        "product.id",
        "product.name",
        "product.price",
        "amount",
        "currency",
        "date",
        "status",
    ]
    .iter()
    .map(|c| CsvColumn::new(*c, c))
    .collect()
}

fn dataset_columns() -> Vec<CsvColumn> {
    [
        "id",
        "user.id",
        "product.id",
        "quantity",
        "rating",
        "purchased",
        "timestamp",
    ]
    .iter()
    .map(|c| CsvColumn::new(*c, c))
    .collect()
}

fn timeseries_columns() -> Vec<CsvColumn> {
    ["timestamp", "value"]
        .iter()
        .map(|c| CsvColumn::new(*c, c))
        .collect()
}
