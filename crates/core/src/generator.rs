use crate::domain::{Comment, DateRange, Program, Sentiment};
use crate::error::{Result, SentimentError};
use moka::sync::Cache;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::Arc;

/// Comments per day are drawn from `MIN..MAX` (upper bound exclusive).
pub const MIN_COMMENTS_PER_DAY: usize = 10;
pub const MAX_COMMENTS_PER_DAY: usize = 20;

pub const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Longest range the generator will build, about ten years.
pub const MAX_RANGE_DAYS: i64 = 3660;

/// Builds a synthetic dataset covering every day of `range`.
pub fn generate_comments<R: Rng>(
    program: Program,
    range: DateRange,
    rng: &mut R,
) -> Vec<Comment> {
    let sentiments = sentiment_distribution();
    let mut out = Vec::new();

    for date in range.days() {
        let n = rng.random_range(MIN_COMMENTS_PER_DAY..MAX_COMMENTS_PER_DAY);
        for _ in 0..n {
            out.push(Comment {
                date,
                program,
                text: format!("Comment on {program} on {date}"),
                sentiment: Sentiment::ALL[sentiments.sample(rng)],
            });
        }
    }

    out
}

fn sentiment_distribution() -> WeightedIndex<f64> {
    // Weights are positive constants, so construction cannot fail.
    WeightedIndex::new(Sentiment::ALL.map(Sentiment::weight))
        .expect("sentiment weights must be positive")
}

/// Up to `n` comments picked at random, without replacement.
pub fn sample_comments<R: Rng>(comments: &[Comment], n: usize, rng: &mut R) -> Vec<Comment> {
    comments.choose_multiple(rng, n).cloned().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GenerationKey {
    program: Program,
    range: DateRange,
}

/// Memoizing front for [`generate_comments`]: identical `(program, start, end)`
/// arguments return the same dataset until evicted, so re-renders stay stable.
pub struct MockDataGenerator {
    cache: Cache<GenerationKey, Arc<[Comment]>>,
}

impl MockDataGenerator {
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::new(capacity.max(1)),
        }
    }

    pub fn comments(&self, program: Program, range: DateRange) -> Result<Arc<[Comment]>> {
        let days = range.len_days();
        if days > MAX_RANGE_DAYS {
            return Err(SentimentError::RangeTooLong {
                days,
                max: MAX_RANGE_DAYS,
            });
        }

        Ok(self.cache.get_with(GenerationKey { program, range }, || {
            let comments = generate_comments(program, range, &mut rand::rng());
            tracing::debug!(
                %program,
                start = %range.start,
                end = %range.end,
                comments_len = comments.len(),
                "generated mock comments"
            );
            comments.into()
        }))
    }
}

impl Default for MockDataGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn per_day_counts(comments: &[Comment]) -> BTreeMap<NaiveDate, usize> {
        let mut out = BTreeMap::new();
        for c in comments {
            *out.entry(c.date).or_insert(0) += 1;
        }
        out
    }

    #[test]
    fn single_day_range_stays_on_that_day() {
        let day = d(2025, 5, 1);
        let mut rng = StdRng::seed_from_u64(7);
        let comments = generate_comments(Program::MasterChef, DateRange::single(day), &mut rng);

        assert!((MIN_COMMENTS_PER_DAY..MAX_COMMENTS_PER_DAY).contains(&comments.len()));
        assert!(comments.iter().all(|c| c.date == day));
        assert!(comments.iter().all(|c| c.program == Program::MasterChef));
    }

    #[test]
    fn covers_every_day_with_bounded_counts() {
        let range = DateRange::new(d(2025, 5, 1), d(2025, 5, 31));
        let mut rng = StdRng::seed_from_u64(42);
        let comments = generate_comments(Program::TheVoice, range, &mut rng);

        let counts = per_day_counts(&comments);
        assert_eq!(counts.len(), 31);
        for n in counts.values() {
            assert!((MIN_COMMENTS_PER_DAY..MAX_COMMENTS_PER_DAY).contains(n));
        }
    }

    #[test]
    fn placeholder_text_names_program_and_date() {
        let mut rng = StdRng::seed_from_u64(1);
        let comments =
            generate_comments(Program::TheVoice, DateRange::single(d(2025, 5, 3)), &mut rng);
        assert_eq!(comments[0].text, "Comment on The Voice on 2025-05-03");
    }

    #[test]
    fn empty_range_generates_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let range = DateRange::new(d(2025, 5, 2), d(2025, 5, 1));
        assert!(generate_comments(Program::MasterChef, range, &mut rng).is_empty());
    }

    #[test]
    fn sentiment_mix_roughly_follows_weights() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 12, 31));
        let mut rng = StdRng::seed_from_u64(2024);
        let comments = generate_comments(Program::MasterChef, range, &mut rng);

        let total = comments.len() as f64;
        for s in Sentiment::ALL {
            let share = comments.iter().filter(|c| c.sentiment == s).count() as f64 / total;
            assert!((share - s.weight()).abs() < 0.03, "{s}: {share}");
        }
    }

    #[test]
    fn repeated_calls_hit_the_cache() {
        let generator = MockDataGenerator::default();
        let range = DateRange::new(d(2025, 5, 1), d(2025, 5, 7));

        let first = generator.comments(Program::MasterChef, range).unwrap();
        let second = generator.comments(Program::MasterChef, range).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(per_day_counts(&first), per_day_counts(&second));
    }

    #[test]
    fn different_arguments_are_cached_separately() {
        let generator = MockDataGenerator::default();
        let week = DateRange::new(d(2025, 5, 1), d(2025, 5, 7));

        let chef = generator.comments(Program::MasterChef, week).unwrap();
        let voice = generator.comments(Program::TheVoice, week).unwrap();
        let shorter = generator
            .comments(Program::MasterChef, DateRange::single(d(2025, 5, 1)))
            .unwrap();

        assert!(!Arc::ptr_eq(&chef, &voice));
        assert!(voice.iter().all(|c| c.program == Program::TheVoice));
        assert_eq!(per_day_counts(&shorter).len(), 1);
    }

    #[test]
    fn oversized_range_is_rejected_before_generation() {
        let generator = MockDataGenerator::default();
        let range = DateRange::new(d(1, 1, 1), d(9999, 12, 31));

        let err = generator.comments(Program::MasterChef, range).unwrap_err();
        assert!(matches!(err, SentimentError::RangeTooLong { max: MAX_RANGE_DAYS, .. }));
        assert_eq!(generator.cache.entry_count(), 0);
    }

    #[test]
    fn longest_supported_range_is_accepted() {
        let start = d(2015, 1, 1);
        let range = DateRange::new(start, start + chrono::Duration::days(MAX_RANGE_DAYS - 1));
        assert_eq!(range.len_days(), MAX_RANGE_DAYS);
        assert!(MockDataGenerator::default().comments(Program::TheVoice, range).is_ok());
    }

    #[test]
    fn sample_is_capped_by_dataset_size() {
        let mut rng = StdRng::seed_from_u64(5);
        let single = DateRange::single(d(2025, 5, 1));
        let comments = generate_comments(Program::MasterChef, single, &mut rng);

        assert_eq!(sample_comments(&comments, 5, &mut rng).len(), 5);
        assert_eq!(sample_comments(&comments[..2], 5, &mut rng).len(), 2);
    }
}
