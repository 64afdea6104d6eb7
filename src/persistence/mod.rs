//! Optional request-log collaborator: records one `{endpoint, timestamp}`
//! row per call and serves aggregate counts for `/stats`.

pub mod request_log;

pub use request_log::{EndpointCount, RequestLog, RequestLogError};
