use crate::domain::attempt::CardLabel;
use crate::error::SimError;
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_POOL_SIZE: usize = 100;
pub const MAX_POOL_SIZE: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomePool {
    success_percent: u8,
    cards: Vec<CardLabel>,
}

impl OutcomePool {
    pub fn build(success_percent: i64) -> Result<Self, SimError> {
        Self::with_size(success_percent, DEFAULT_POOL_SIZE)
    }

    pub fn with_size(success_percent: i64, size: usize) -> Result<Self, SimError> {
        let percent = validate_percent(success_percent)?;
        if size == 0 || size > MAX_POOL_SIZE {
            return Err(SimError::InvalidConfiguration(format!(
                "outcome pool size must be within [1,{}], got {}",
                MAX_POOL_SIZE, size
            )));
        }

        let successes = size
            .checked_mul(percent as usize)
            .map(|n| n / 100)
            .ok_or_else(|| {
                SimError::InvalidConfiguration(format!("outcome pool size {} overflows", size))
            })?;
        let mut cards = vec![CardLabel::Success; successes];
        cards.resize(size, CardLabel::Fail);

        Ok(Self {
            success_percent: percent,
            cards,
        })
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> CardLabel {
        *self.cards.choose(rng).unwrap_or(&CardLabel::Fail)
    }

    pub fn success_percent(&self) -> u8 {
        self.success_percent
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.cards.iter().filter(|c| **c == CardLabel::Success).count()
    }
}

pub fn validate_percent(value: i64) -> Result<u8, SimError> {
    if (0..=100).contains(&value) {
        Ok(value as u8)
    } else {
        Err(SimError::InvalidConfiguration(format!(
            "success percent must be within [0,100], got {}",
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn composition_matches_percent_for_every_value() {
        for p in 0..=100_i64 {
            let pool = OutcomePool::build(p).unwrap();
            assert_eq!(pool.len(), 100);
            assert_eq!(pool.success_count(), p as usize);
        }
    }

    #[test]
    fn rejects_out_of_range_percent() {
        assert!(matches!(
            OutcomePool::build(101),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            OutcomePool::build(-1),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn custom_size_scales_success_count() {
        let pool = OutcomePool::with_size(60, 10).unwrap();
        assert_eq!(pool.len(), 10);
        assert_eq!(pool.success_count(), 6);
        assert!(OutcomePool::with_size(60, 0).is_err());
    }

    #[test]
    fn oversized_pool_is_a_configuration_error() {
        assert!(matches!(
            OutcomePool::with_size(60, usize::MAX),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            OutcomePool::with_size(100, MAX_POOL_SIZE + 1),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert_eq!(OutcomePool::with_size(100, MAX_POOL_SIZE).unwrap().success_count(), MAX_POOL_SIZE);
    }

    #[test]
    fn zero_percent_pool_always_fails() {
        let pool = OutcomePool::build(0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..500).all(|_| pool.draw(&mut rng) == CardLabel::Fail));
    }

    #[test]
    fn draws_are_reproducible_with_seed() {
        let pool = OutcomePool::build(60).unwrap();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let left: Vec<_> = (0..50).map(|_| pool.draw(&mut a)).collect();
        let right: Vec<_> = (0..50).map(|_| pool.draw(&mut b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn draw_rate_tracks_composition() {
        let pool = OutcomePool::build(60).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let hits = (0..10_000)
            .filter(|_| pool.draw(&mut rng) == CardLabel::Success)
            .count();
        assert!(hits > 5_600 && hits < 6_400, "hits = {}", hits);
    }
}
