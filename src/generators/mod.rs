// Entity Generators - one module per table
//
// Every generator follows the same contract: build records in insertion
// order, wire foreign keys to already-generated parents, and hand each fresh
// record to the Defect Injector exactly once. The small helpers here keep
// id allocation, vocabulary sampling, and date handling uniform across them.

pub mod account;
pub mod audit;
pub mod branch;
pub mod card;
pub mod customer;
pub mod employee;
pub mod exchange;
pub mod fraud;
pub mod investment;
pub mod loan;
pub mod login;
pub mod merchant;
pub mod transaction;

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

pub(crate) const DATE_FMT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

pub(crate) fn fmt_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(DATETIME_FMT).to_string()
}

/// Parse a stored date, falling back when the value was corrupted.
pub(crate) fn parse_date_or(raw: &str, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::parse_from_str(raw, DATE_FMT).unwrap_or(fallback)
}

pub(crate) fn parse_datetime_or(raw: &str, fallback: NaiveDateTime) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, DATETIME_FMT).unwrap_or(fallback)
}

/// Uniform pick from a non-empty slice.
pub(crate) fn pick<T: Copy>(rng: &mut ChaCha8Rng, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

/// Weighted pick; weights are relative and need not sum to 1.
pub(crate) fn weighted_pick<T: Copy>(rng: &mut ChaCha8Rng, items: &[T], weights: &[f64]) -> T {
    let total: f64 = weights.iter().sum();
    let mut draw = rng.gen::<f64>() * total;
    for (item, weight) in items.iter().zip(weights) {
        if draw < *weight {
            return *item;
        }
        draw -= *weight;
    }
    items[items.len() - 1]
}

/// Allocate a prefixed numeric id not seen before in this generator run.
pub(crate) fn unique_id(
    rng: &mut ChaCha8Rng,
    taken: &mut HashSet<String>,
    prefix: &str,
    low: u64,
    high: u64,
) -> String {
    loop {
        let candidate = format!("{prefix}{}", rng.gen_range(low..=high));
        if taken.insert(candidate.clone()) {
            return candidate;
        }
    }
}

/// Prefixed numeric id without uniqueness tracking; single-record synthesis
/// relies on the id space being large enough that collisions surface as
/// ordinary (non-fatal) insert failures.
pub(crate) fn random_id(rng: &mut ChaCha8Rng, prefix: &str, low: u64, high: u64) -> String {
    format!("{prefix}{}", rng.gen_range(low..=high))
}

pub(crate) fn random_time(rng: &mut ChaCha8Rng) -> NaiveTime {
    NaiveTime::from_hms_opt(
        rng.gen_range(0..24),
        rng.gen_range(0..60),
        rng.gen_range(0..60),
    )
    .unwrap_or(NaiveTime::MIN)
}

/// A timestamp between `min_days` and `max_days` in the past.
pub(crate) fn datetime_days_back(
    rng: &mut ChaCha8Rng,
    today: NaiveDate,
    min_days: i64,
    max_days: i64,
) -> NaiveDateTime {
    let days = rng.gen_range(min_days..=max_days);
    (today - Duration::days(days)).and_time(random_time(rng))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_unique_id_never_repeats() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut taken = HashSet::new();
        // Tight id space to force retries.
        for _ in 0..90 {
            unique_id(&mut rng, &mut taken, "T", 0, 99);
        }
        assert_eq!(taken.len(), 90);
    }

    #[test]
    fn test_weighted_pick_respects_zero_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        for _ in 0..200 {
            let picked = weighted_pick(&mut rng, &["a", "b", "c"], &[0.0, 1.0, 0.0]);
            assert_eq!(picked, "b");
        }
    }

    #[test]
    fn test_parse_date_falls_back_on_garbage() {
        let fallback = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_date_or("2024/13/45", fallback), fallback);
        assert_eq!(
            parse_date_or("2023-06-15", fallback),
            NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()
        );
    }
}
