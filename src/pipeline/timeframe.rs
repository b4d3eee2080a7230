//! Adjacency of consecutive timestamps.

use serde::Serialize;

// ---

/// Two consecutive points of an ordered timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Timeframe<T> {
    pub start: T,
    pub end: T,
}

/// Pair every element of an ordered, distinct sequence with its successor.
///
/// Returns `len - 1` timeframes; fewer than two values yield none.
pub fn consecutive_pairs<T: Copy>(ordered: &[T]) -> Vec<Timeframe<T>> {
    // ---
    ordered
        .windows(2)
        .map(|w| Timeframe {
            start: w[0],
            end: w[1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_consecutive_pairs() {
        // ---
        let pairs = consecutive_pairs(&[1, 2, 5, 9]);
        assert_eq!(
            pairs,
            vec![
                Timeframe { start: 1, end: 2 },
                Timeframe { start: 2, end: 5 },
                Timeframe { start: 5, end: 9 },
            ]
        );
    }

    #[test]
    fn test_short_sequences_have_no_pairs() {
        // ---
        assert!(consecutive_pairs::<u32>(&[]).is_empty());
        assert!(consecutive_pairs(&[7]).is_empty());
    }
}
