//! Entity builders: compose field generators into fully-formed records.
//!
//! Each builder returns exactly one record. Users honor the requested field
//! subset; products, companies, transactions and dataset rows have fixed
//! shapes.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::{
    Company, CompanyDepartment, DatasetRecord, Product, ProductRef, ProductVariant,
    TimeSeriesPoint, Transaction, TransactionStatus, User, UserRef,
};
use crate::generation::fields::{self, Locale};
use crate::generation::params::{FieldKind, UserField};

const VARIANT_SIZES: [&str; 4] = ["S", "M", "L", "XL"];

const DEPARTMENT_ROSTER: [&str; 6] = [
    "Engineering",
    "Marketing",
    "Sales",
    "Human Resources",
    "Finance",
    "Operations",
];

/// Build one user with exactly the requested optional fields populated.
///
/// The `job` descriptor depends on age; when `age` is not in the requested
/// set an ephemeral age is drawn only to pick the descriptor and never
/// attached to the record.
pub fn user(
    rng: &mut StdRng,
    requested: &[UserField],
    age_range: (u32, u32),
    locale: Locale,
) -> User {
    let needs_age = requested
        .iter()
        .any(|f| matches!(f, UserField::Age | UserField::Job));
    let age = needs_age.then(|| fields::age(rng, age_range));

    let mut user = User {
        id: fields::uuid(rng),
        name: None,
        email: None,
        age: None,
        address: None,
        phone: None,
        job: None,
    };

    for field in requested {
        match field {
            UserField::Name => user.name = Some(fields::full_name(rng, locale)),
            UserField::Email => user.email = Some(fields::email(rng, locale)),
            UserField::Age => user.age = age,
            UserField::Address => user.address = Some(fields::address(rng, locale)),
            UserField::Phone => user.phone = Some(fields::phone_number(rng, locale)),
            UserField::Job => {
                if let Some(age) = age {
                    user.job = Some(fields::job_title(rng, age, locale));
                }
            }
        }
    }

    user
}

/// Build one product with one variant per size, in S,M,L,XL order.
pub fn product(rng: &mut StdRng) -> Product {
    let variants = VARIANT_SIZES
        .iter()
        .map(|size| ProductVariant {
            size: size.to_string(),
            color: fields::color(rng),
            stock: rng.gen_range(0..=100),
        })
        .collect();

    Product {
        id: fields::uuid(rng),
        name: fields::product_name(rng),
        price: fields::price(rng),
        category: fields::category(rng),
        in_stock: rng.gen_bool(0.8),
        variants,
    }
}

/// Build one company with 2-4 departments drawn without replacement from a
/// fixed roster, preserving roster order.
pub fn company(rng: &mut StdRng, locale: Locale) -> Company {
    let department_count = rng.gen_range(2..=4);
    let mut picked = rand::seq::index::sample(rng, DEPARTMENT_ROSTER.len(), department_count)
        .into_vec();
    picked.sort_unstable();

    let departments = picked
        .into_iter()
        .map(|index| CompanyDepartment {
            name: DEPARTMENT_ROSTER[index].to_string(),
            head: fields::full_name(rng, locale),
            budget: fields::round2(rng.gen_range(10_000.0..500_000.0)),
        })
        .collect();

    Company {
        name: fields::company_name(rng, locale),
        industry: fields::industry(rng, locale),
        employees: rng.gen_range(10..=10_000),
        location: fields::city(rng, locale),
        departments,
    }
}

/// Build one transaction linking pre-sampled pool references. The amount is
/// the product price times a small quantity, and the date falls within the 30
/// days before `reference`.
pub fn transaction(
    rng: &mut StdRng,
    user: UserRef,
    product: ProductRef,
    reference: DateTime<Utc>,
) -> Transaction {
    let quantity = rng.gen_range(1..=5) as f64;
    let amount = fields::round2(product.price * quantity);
    let status = match rng.gen_range(0..3) {
        0 => TransactionStatus::Completed,
        1 => TransactionStatus::Pending,
        _ => TransactionStatus::Failed,
    };

    Transaction {
        id: fields::uuid(rng),
        user,
        product,
        amount,
        currency: fields::currency_code(rng),
        date: fields::timestamp_within_past_days(rng, reference, 30),
        status,
    }
}

/// Build one dataset row: a user/product interaction within the last 90 days.
pub fn dataset_record(
    rng: &mut StdRng,
    user: UserRef,
    product: ProductRef,
    reference: DateTime<Utc>,
) -> DatasetRecord {
    DatasetRecord {
        id: fields::uuid(rng),
        user,
        product,
        quantity: rng.gen_range(1..=10),
        rating: rng.gen_range(1..=5),
        purchased: rng.gen_bool(0.5),
        timestamp: fields::timestamp_within_past_days(rng, reference, 90),
    }
}

pub fn time_series_point(rng: &mut StdRng, timestamp: DateTime<Utc>) -> TimeSeriesPoint {
    TimeSeriesPoint {
        timestamp,
        value: fields::round2(rng.gen_range(0.0..100.0)),
    }
}

/// Build one record for the `/custom` endpoint from a resolved schema. Keys
/// are emitted in schema order (sorted by field name) so seeded output stays
/// stable.
pub fn custom_record(
    rng: &mut StdRng,
    schema: &BTreeMap<String, FieldKind>,
    locale: Locale,
) -> Map<String, Value> {
    let mut record = Map::new();
    for (field, kind) in schema {
        let value = match kind {
            FieldKind::Name => Value::String(fields::full_name(rng, locale)),
            FieldKind::Email => Value::String(fields::email(rng, locale)),
            FieldKind::Number => Value::from(rng.gen_range(1..=100)),
            FieldKind::Address => Value::String(fields::street_address(rng, locale)),
        };
        record.insert(field.clone(), value);
    }
    record
}
