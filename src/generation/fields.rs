//! Field generators: pure functions producing one semantically-typed random
//! value from an explicit RNG.
//!
//! Every generator takes `&mut StdRng` so that a request carrying `seed`
//! reproduces byte-identical output without touching process-wide state.
//! Localized values dispatch over a closed [`Locale`] set and fall back to
//! English data for locales the faker tables do not cover.

use chrono::{DateTime, Duration, Utc};
use fake::faker::address::raw::{BuildingNumber, CityName, CountryName, PostCode, StreetName};
use fake::faker::company::raw::{Buzzword, CompanyName, Industry};
use fake::faker::currency::raw::CurrencyCode;
use fake::faker::internet::raw::SafeEmail;
use fake::faker::job::raw::{Position, Seniority};
use fake::faker::lorem::raw::Word;
use fake::faker::name::raw::Name;
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{EN, FR_FR, ZH_CN};
use fake::Fake;
use rand::rngs::StdRng;
use rand::Rng;
use uuid::Uuid;

use crate::domain::Address;

/// Localization table selector for the underlying faker data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
    Zh,
}

impl Locale {
    /// Parse a free-form locale tag. Unsupported tags fall back to English
    /// without erroring.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.split(['-', '_']).next().unwrap_or("") {
            "fr" => Locale::Fr,
            "zh" => Locale::Zh,
            _ => Locale::En,
        }
    }
}

macro_rules! localized {
    ($faker:ident, $locale:expr, $rng:expr) => {
        match $locale {
            Locale::En => $faker(EN).fake_with_rng($rng),
            Locale::Fr => $faker(FR_FR).fake_with_rng($rng),
            Locale::Zh => $faker(ZH_CN).fake_with_rng($rng),
        }
    };
}

pub fn uuid(rng: &mut StdRng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

pub fn full_name(rng: &mut StdRng, locale: Locale) -> String {
    localized!(Name, locale, rng)
}

pub fn email(rng: &mut StdRng, locale: Locale) -> String {
    localized!(SafeEmail, locale, rng)
}

pub fn age(rng: &mut StdRng, range: (u32, u32)) -> u32 {
    let (min, max) = range;
    rng.gen_range(min..=max)
}

pub fn address(rng: &mut StdRng, locale: Locale) -> Address {
    Address {
        street: street_address(rng, locale),
        city: city(rng, locale),
        country: country(rng, locale),
        zip_code: localized!(PostCode, locale, rng),
    }
}

pub fn street_address(rng: &mut StdRng, locale: Locale) -> String {
    let number: String = localized!(BuildingNumber, locale, rng);
    let street: String = localized!(StreetName, locale, rng);
    format!("{} {}", number, street)
}

pub fn city(rng: &mut StdRng, locale: Locale) -> String {
    localized!(CityName, locale, rng)
}

pub fn country(rng: &mut StdRng, locale: Locale) -> String {
    localized!(CountryName, locale, rng)
}

pub fn phone_number(rng: &mut StdRng, locale: Locale) -> String {
    localized!(PhoneNumber, locale, rng)
}

/// Job descriptor derived from age: under 30 gets a junior-style descriptor,
/// 30 and over a seniority-prefixed title.
pub fn job_title(rng: &mut StdRng, age: u32, locale: Locale) -> String {
    let position: String = localized!(Position, locale, rng);
    if age < 30 {
        format!("Junior {}", position)
    } else {
        let seniority: String = localized!(Seniority, locale, rng);
        format!("{} {}", seniority, position)
    }
}

pub fn company_name(rng: &mut StdRng, locale: Locale) -> String {
    localized!(CompanyName, locale, rng)
}

pub fn industry(rng: &mut StdRng, locale: Locale) -> String {
    localized!(Industry, locale, rng)
}

pub fn currency_code(rng: &mut StdRng) -> String {
    CurrencyCode(EN).fake_with_rng(rng)
}

pub fn product_name(rng: &mut StdRng) -> String {
    let adjective: String = Buzzword(EN).fake_with_rng(rng);
    let noun: String = Word(EN).fake_with_rng(rng);
    format!("{} {}", capitalize(&adjective), capitalize(&noun))
}

const CATEGORIES: &[&str] = &["Electronics", "Clothing", "Home", "Sports", "Toys", "Books"];

pub fn category(rng: &mut StdRng) -> String {
    CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string()
}

const COLORS: &[&str] = &["Black", "White", "Red", "Blue", "Green", "Yellow"];

pub fn color(rng: &mut StdRng) -> String {
    COLORS[rng.gen_range(0..COLORS.len())].to_string()
}

/// Monetary amount in [1, 1000) rounded to two decimal places.
pub fn price(rng: &mut StdRng) -> f64 {
    round2(rng.gen_range(1.0..1000.0))
}

/// A timestamp uniformly distributed inside the `days` preceding `reference`,
/// at whole-second resolution.
pub fn timestamp_within_past_days(
    rng: &mut StdRng,
    reference: DateTime<Utc>,
    days: i64,
) -> DateTime<Utc> {
    reference - Duration::seconds(rng.gen_range(0..days * 86_400))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
