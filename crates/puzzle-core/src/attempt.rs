//! The bounded generate-validate-retry loop shared by every generator.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a bounded generation run ended.
///
/// Generators that keep a best-effort artifact after exhausting their
/// attempt budget return `Degraded` instead of silently substituting it,
/// so callers and tests can tell the two apart. Generators with no
/// fallback return `Result<Puzzle, GenerateError>` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<T> {
    /// The validator accepted this candidate.
    Valid(T),
    /// The attempt budget ran out; this artifact may violate the
    /// uniqueness property its validator checks for.
    Degraded(T),
}

impl<T> Outcome<T> {
    /// The contained puzzle, valid or not.
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Valid(value) | Outcome::Degraded(value) => value,
        }
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Outcome::Valid(value) | Outcome::Degraded(value) => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(_))
    }
}

/// Generation failure for puzzle types that have no fallback artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateError {
    /// The retry budget completed without a single accepted candidate.
    Exhausted { attempts: usize },
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Exhausted { attempts } => {
                write!(f, "no valid puzzle found in {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for GenerateError {}

/// Run `build` up to `max_attempts` times, returning the first candidate it
/// accepts along with the number of attempts spent. Attempts are strictly
/// sequential; the first success wins.
pub fn run<T, R, F>(max_attempts: usize, rng: &mut R, mut build: F) -> Option<(T, usize)>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Option<T>,
{
    for attempt in 1..=max_attempts {
        if let Some(value) = build(rng) {
            return Some((value, attempt));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_success_wins() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut calls = 0;
        let result = run(10, &mut rng, |_| {
            calls += 1;
            if calls == 3 {
                Some(calls)
            } else {
                None
            }
        });
        assert_eq!(result, Some((3, 3)));
    }

    #[test]
    fn exhaustion_returns_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let result: Option<((), usize)> = run(5, &mut rng, |_| None);
        assert!(result.is_none());
    }

    #[test]
    fn outcome_tags_are_distinguishable() {
        let valid = Outcome::Valid(7);
        let degraded = Outcome::Degraded(7);
        assert!(!valid.is_degraded());
        assert!(degraded.is_degraded());
        assert_eq!(valid.into_inner(), degraded.into_inner());
    }
}
