//! Synthetic bar series for tests and benches that don't depend on real data.

use crate::domain::Bar;
use chrono::NaiveDate;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

const BASE_DATE: (i32, u32, u32) = (2024, 1, 2);

fn base_date() -> NaiveDate {
    let (y, m, d) = BASE_DATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bar_at(symbol: &str, day: usize, price: f64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        datetime: base_date() + chrono::Duration::days(day as i64),
        open: price,
        high: price * 1.01,
        low: price * 0.99,
        close: price,
        adj_close: price,
        volume: 1000,
        returns: 0.0,
    }
}

/// `n` consecutive daily bars at a constant price.
pub fn constant_bars(symbol: &str, n: usize, price: f64) -> Vec<Bar> {
    (0..n).map(|i| bar_at(symbol, i, price)).collect()
}

/// `n` consecutive daily bars following a seeded random walk.
///
/// Deterministic for a given seed so tests and benches are reproducible.
pub fn random_walk_bars(symbol: &str, n: usize, start_price: f64, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let step = Uniform::new(-1.0, 1.0);

    let mut price = start_price;
    (0..n)
        .map(|i| {
            price = (price + step.sample(&mut rng)).max(1.0);
            bar_at(symbol, i, price)
        })
        .collect()
}
