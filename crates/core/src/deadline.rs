//! Deadline policy for seeded grants.
//!
//! Seeded deadlines are cosmetic sample data: a future date a bounded,
//! random number of days after the run.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

/// Fewest days between the run and a seeded deadline.
pub const MIN_OFFSET_DAYS: i64 = 30;

/// Most days between the run and a seeded deadline.
pub const MAX_OFFSET_DAYS: i64 = 180;

/// Pick a deadline `MIN_OFFSET_DAYS..=MAX_OFFSET_DAYS` days after `today`
/// using the supplied RNG.
pub fn deadline_from<R: Rng>(today: NaiveDate, rng: &mut R) -> NaiveDate {
    let offset = rng.random_range(MIN_OFFSET_DAYS..=MAX_OFFSET_DAYS);
    today + Duration::days(offset)
}

/// Pick a deadline relative to the current UTC date.
pub fn seed_deadline() -> NaiveDate {
    deadline_from(Utc::now().date_naive(), &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn deadline_stays_within_bounds() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let days = (deadline_from(today, &mut rng) - today).num_days();
            assert!(
                (MIN_OFFSET_DAYS..=MAX_OFFSET_DAYS).contains(&days),
                "offset {days} out of range"
            );
        }
    }

    #[test]
    fn seed_deadline_is_in_the_future() {
        assert!(seed_deadline() > Utc::now().date_naive());
    }
}
