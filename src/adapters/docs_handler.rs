//! Static endpoints: the root welcome payload and the `/docs` contract
//! description.

use axum::Json;
use serde_json::{json, Value};

pub async fn welcome() -> Json<Value> {
    Json(json!({
        "name": "plasma",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Synthetic data API - fabricates plausible fake records",
        "docs": "/docs",
    }))
}

pub async fn docs() -> Json<Value> {
    Json(json!({
        "endpoints": {
            "GET /users": {
                "description": "Generate synthetic users",
                "parameters": {
                    "count": "number of records, default 5, clamped to [1, 10000]",
                    "fields": "comma-separated subset of name,email,age,address,phone,job",
                    "ageRange": "min-max bounds for the age field, e.g. 20-30",
                    "locale": "localization tag (en, fr, zh); unsupported tags fall back to en",
                    "seed": "integer seed for reproducible output",
                    "format": "json (default) or csv",
                },
            },
            "GET /products": {
                "description": "Generate synthetic products with per-size variants",
                "parameters": { "count": "see /users", "seed": "see /users", "format": "see /users" },
            },
            "GET /companies": {
                "description": "Generate synthetic companies with departments",
                "parameters": { "count": "see /users", "seed": "see /users", "locale": "see /users", "format": "see /users" },
            },
            "GET /transactions": {
                "description": "Generate transactions referencing pooled users and products",
                "parameters": { "count": "see /users", "seed": "see /users", "format": "see /users" },
            },
            "GET /dataset": {
                "description": "Generate user/product interaction rows from shared pools",
                "parameters": { "count": "see /users", "seed": "see /users", "format": "see /users" },
            },
            "GET /timeseries": {
                "description": "Generate evenly spaced time series points",
                "parameters": {
                    "count": "see /users",
                    "interval": "day (default), hour, or minute",
                    "start": "ISO date for the first point; default is a random date within the past year",
                    "seed": "see /users",
                    "format": "see /users",
                },
            },
            "POST /custom": {
                "description": "Generate records from a caller-supplied schema",
                "body": { "schema": "object mapping field name to one of name,email,number,address" },
                "parameters": { "count": "see /users", "seed": "see /users", "format": "see /users" },
            },
            "GET /stats": { "description": "Per-endpoint request counts" },
            "GET /health": { "description": "Service health and uptime" },
        },
        "formats": {
            "json": "application/json array; responses past the streaming threshold are emitted incrementally",
            "csv": "text/csv with a header row; nested address flattens to street,city,country; no quoting of embedded delimiters",
        },
        "errors": {
            "400": "{\"error\": message} for invalid parameters or a missing schema",
            "500": "{\"error\": message} for unexpected generation failures",
        },
    }))
}
