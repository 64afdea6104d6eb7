//! Request parameter resolver: validates and normalizes raw query/body
//! parameters into a canonical [`GenerationConfig`].
//!
//! Resolution happens before any record is built, so a malformed request is
//! rejected with a 400 before the response body is touched.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};

use crate::config::GenerationSettings;
use crate::domain::ApiError;
use crate::generation::fields::Locale;

/// Default age bounds matching the classic faker `18..=80` range.
pub const DEFAULT_AGE_RANGE: (u32, u32) = (18, 80);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    Day,
    Hour,
    Minute,
}

impl Interval {
    pub fn step(self) -> Duration {
        match self {
            Interval::Day => Duration::days(1),
            Interval::Hour => Duration::hours(1),
            Interval::Minute => Duration::minutes(1),
        }
    }
}

/// Optional user fields a request may select. The resolver preserves request
/// order so CSV columns come out in the order they were asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Email,
    Age,
    Address,
    Phone,
    Job,
}

impl UserField {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "name" => Some(UserField::Name),
            "email" => Some(UserField::Email),
            "age" => Some(UserField::Age),
            "address" => Some(UserField::Address),
            "phone" => Some(UserField::Phone),
            "job" => Some(UserField::Job),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserField::Name => "name",
            UserField::Email => "email",
            UserField::Age => "age",
            UserField::Address => "address",
            UserField::Phone => "phone",
            UserField::Job => "job",
        }
    }
}

/// Default field subset for `/users` when no `fields` parameter is given.
pub const DEFAULT_USER_FIELDS: [UserField; 4] = [
    UserField::Name,
    UserField::Email,
    UserField::Age,
    UserField::Address,
];

/// Closed set of type tags supported by the `/custom` schema. Unknown tags
/// are rejected outright rather than silently skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Email,
    Number,
    Address,
}

impl FieldKind {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "name" => Some(FieldKind::Name),
            "email" => Some(FieldKind::Email),
            "number" => Some(FieldKind::Number),
            "address" => Some(FieldKind::Address),
            _ => None,
        }
    }
}

/// Canonical generation configuration for one request.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub count: usize,
    pub fields: Vec<UserField>,
    pub format: OutputFormat,
    pub age_range: (u32, u32),
    pub locale: Locale,
    pub seed: Option<u64>,
    pub interval: Interval,
    pub start: Option<DateTime<Utc>>,
    /// Anchor for "within the past N days" generators: midnight UTC of the
    /// current day, so seeded requests repeated within a day stay identical.
    pub reference_time: DateTime<Utc>,
}

impl GenerationConfig {
    /// Build the per-request random generator. Seeded requests get a
    /// deterministic generator; unseeded ones draw from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Resolve raw query parameters into a [`GenerationConfig`].
pub fn resolve(
    params: &HashMap<String, String>,
    limits: &GenerationSettings,
) -> Result<GenerationConfig, ApiError> {
    let count = resolve_count(params.get("count"), limits)?;
    let fields = resolve_fields(params.get("fields"));
    let format = resolve_format(params.get("format"));
    let age_range = resolve_age_range(params.get("ageRange"))?;
    let locale = params
        .get("locale")
        .map(|tag| Locale::parse(tag))
        .unwrap_or_default();
    let seed = resolve_seed(params.get("seed"))?;
    let interval = resolve_interval(params.get("interval"))?;
    let start = resolve_start(params.get("start"))?;

    Ok(GenerationConfig {
        count,
        fields,
        format,
        age_range,
        locale,
        seed,
        interval,
        start,
        reference_time: midnight_today(),
    })
}

/// Resolve and validate a `/custom` schema body. The map is ordered so that
/// generation and output key order stay deterministic.
pub fn resolve_schema(
    schema: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, FieldKind>, ApiError> {
    if schema.is_empty() {
        return Err(ApiError::MissingSchema);
    }
    let mut resolved = BTreeMap::new();
    for (field, tag) in schema {
        let kind = FieldKind::parse(tag).ok_or(ApiError::InvalidParameter("schema"))?;
        resolved.insert(field.clone(), kind);
    }
    Ok(resolved)
}

fn resolve_count(raw: Option<&String>, limits: &GenerationSettings) -> Result<usize, ApiError> {
    match raw.map(|s| s.trim()) {
        None | Some("") => Ok(limits.default_count),
        Some(value) => {
            let parsed: i64 = value
                .parse()
                .map_err(|_| ApiError::InvalidParameter("count"))?;
            // Out-of-range counts are clamped, never rejected.
            Ok(parsed.clamp(1, limits.max_count as i64) as usize)
        }
    }
}

fn resolve_fields(raw: Option<&String>) -> Vec<UserField> {
    match raw {
        None => DEFAULT_USER_FIELDS.to_vec(),
        Some(list) => {
            let mut fields = Vec::new();
            for token in list.split(',') {
                // Unrecognized tokens are silently dropped.
                if let Some(field) = UserField::parse(token.trim()) {
                    if !fields.contains(&field) {
                        fields.push(field);
                    }
                }
            }
            fields
        }
    }
}

fn resolve_format(raw: Option<&String>) -> OutputFormat {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("csv") => OutputFormat::Csv,
        // Unrecognized formats fall back to JSON.
        _ => OutputFormat::Json,
    }
}

fn resolve_age_range(raw: Option<&String>) -> Result<(u32, u32), ApiError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_AGE_RANGE);
    };
    let mut parts = raw.splitn(2, '-');
    let min: u32 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or(ApiError::InvalidParameter("ageRange"))?;
    let max: u32 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or(ApiError::InvalidParameter("ageRange"))?;
    if min > max {
        return Err(ApiError::InvalidParameter("ageRange"));
    }
    Ok((min, max))
}

fn resolve_seed(raw: Option<&String>) -> Result<Option<u64>, ApiError> {
    match raw.map(|s| s.trim()) {
        None | Some("") => Ok(None),
        Some(value) => {
            let parsed: i64 = value
                .parse()
                .map_err(|_| ApiError::InvalidParameter("seed"))?;
            Ok(Some(parsed as u64))
        }
    }
}

fn resolve_interval(raw: Option<&String>) -> Result<Interval, ApiError> {
    match raw.map(|s| s.trim()) {
        None => Ok(Interval::default()),
        Some("day") => Ok(Interval::Day),
        Some("hour") => Ok(Interval::Hour),
        Some("minute") => Ok(Interval::Minute),
        Some(_) => Err(ApiError::InvalidParameter("interval")),
    }
}

fn resolve_start(raw: Option<&String>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date.and_time(NaiveTime::MIN).and_utc()));
    }
    Err(ApiError::InvalidParameter("start"))
}

fn midnight_today() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}
