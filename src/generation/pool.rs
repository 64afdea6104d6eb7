//! Pool manager: bounded, request-scoped pools of pre-generated entities.
//!
//! Pools give linked records referential plausibility: every transaction or
//! dataset row points at an entity that actually exists in the response's
//! pool. Pools are built once per request, read-only afterward, and dropped
//! with the response. Sampling is uniform with replacement, so the same
//! pooled entity may back several records.

use rand::rngs::StdRng;
use rand::Rng;

use crate::domain::{Product, ProductRef, User, UserRef};
use crate::generation::builders;
use crate::generation::fields::Locale;
use crate::generation::params::DEFAULT_USER_FIELDS;

/// Build a user pool of size `min(count, cap)`. Pool users carry the default
/// field set so references always have a name to point at.
pub fn build_user_pool(
    rng: &mut StdRng,
    count: usize,
    cap: usize,
    age_range: (u32, u32),
    locale: Locale,
) -> Vec<User> {
    let size = count.min(cap).max(1);
    (0..size)
        .map(|_| builders::user(rng, &DEFAULT_USER_FIELDS, age_range, locale))
        .collect()
}

/// Build a product pool of size `min(count, cap)`.
pub fn build_product_pool(rng: &mut StdRng, count: usize, cap: usize) -> Vec<Product> {
    let size = count.min(cap).max(1);
    (0..size).map(|_| builders::product(rng)).collect()
}

pub fn sample_user_ref(rng: &mut StdRng, pool: &[User]) -> UserRef {
    let user = &pool[rng.gen_range(0..pool.len())];
    UserRef {
        id: user.id,
        name: user.name.clone().unwrap_or_default(),
    }
}

pub fn sample_product_ref(rng: &mut StdRng, pool: &[Product]) -> ProductRef {
    let product = &pool[rng.gen_range(0..pool.len())];
    ProductRef {
        id: product.id,
        name: product.name.clone(),
        price: product.price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn pool_size_is_min_of_count_and_cap() {
        let mut rng = rng(1);
        assert_eq!(build_user_pool(&mut rng, 5, 100, (18, 80), Locale::En).len(), 5);
        assert_eq!(build_user_pool(&mut rng, 500, 100, (18, 80), Locale::En).len(), 100);
        assert_eq!(build_product_pool(&mut rng, 3, 50).len(), 3);
        assert_eq!(build_product_pool(&mut rng, 75, 50).len(), 50);
    }

    #[test]
    fn sampled_refs_point_at_pool_members() {
        let mut rng = rng(2);
        let users = build_user_pool(&mut rng, 10, 100, (18, 80), Locale::En);
        let products = build_product_pool(&mut rng, 10, 50);
        for _ in 0..100 {
            let user_ref = sample_user_ref(&mut rng, &users);
            assert!(users.iter().any(|u| u.id == user_ref.id));
            let product_ref = sample_product_ref(&mut rng, &products);
            assert!(products.iter().any(|p| p.id == product_ref.id));
        }
    }

    #[test]
    fn pool_users_always_carry_a_name() {
        let mut rng = rng(3);
        let users = build_user_pool(&mut rng, 20, 100, (18, 80), Locale::En);
        assert!(users.iter().all(|u| u.name.is_some()));
    }
}
