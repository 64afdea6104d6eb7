//! Record generation core: field generators, entity builders, request-scoped
//! pools, parameter resolution, and output serialization.
//!
//! Control flow per request: [`params::resolve`] produces a
//! [`params::GenerationConfig`], which seeds a per-request RNG; handlers wire
//! builders (and pools, where linkage is needed) into a lazy
//! [`serialize::RecordSet`] that the serializer drains as JSON, streamed
//! JSON, or CSV.

pub mod builders;
pub mod fields;
pub mod params;
pub mod pool;
pub mod serialize;

pub use fields::Locale;
pub use params::{FieldKind, GenerationConfig, Interval, OutputFormat, UserField};
pub use serialize::{CsvColumn, RecordSet};
