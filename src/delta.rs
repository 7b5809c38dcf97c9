//! Arrival/departure tracking between consecutive kept sets.

use ahash::AHashSet as HashSet;

/// Pids that appeared and disappeared relative to the previous cycle.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SetDelta {
    pub arrivals: HashSet<u32>,
    pub departures: HashSet<u32>,
}

/// Plain set differences: arrivals = current − previous,
/// departures = previous − current. The caller persists `current` as the new
/// previous set for the next cycle.
pub fn diff(current: &HashSet<u32>, previous: &HashSet<u32>) -> SetDelta {
    SetDelta {
        arrivals: current.difference(previous).copied().collect(),
        departures: previous.difference(current).copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> HashSet<u32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_first_cycle_all_arrivals() {
        let delta = diff(&set(&[1, 2, 3]), &set(&[]));
        assert_eq!(delta.arrivals, set(&[1, 2, 3]));
        assert!(delta.departures.is_empty());
    }

    #[test]
    fn test_mixed_delta() {
        let delta = diff(&set(&[2, 3, 4]), &set(&[1, 2, 3]));
        assert_eq!(delta.arrivals, set(&[4]));
        assert_eq!(delta.departures, set(&[1]));
    }

    #[test]
    fn test_identical_sets_no_delta() {
        let delta = diff(&set(&[5, 6]), &set(&[5, 6]));
        assert!(delta.arrivals.is_empty());
        assert!(delta.departures.is_empty());
    }

    #[test]
    fn test_arrivals_and_departures_disjoint() {
        let delta = diff(&set(&[1, 4, 9]), &set(&[2, 4, 8]));
        assert!(delta.arrivals.is_disjoint(&delta.departures));
    }
}
