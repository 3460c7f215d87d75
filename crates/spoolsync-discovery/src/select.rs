//! Duplicate entity resolution
//!
//! After an integration upgrade the registry may hold several entities for
//! the same tray (or AMS unit, or status sensor), distinguished only by a
//! trailing `_<n>` suffix. One total order decides which one is used.

use std::cmp::Ordering;

use spoolsync_core::EntityState;

/// An entity competing to represent one logical unit
#[derive(Debug, Clone)]
pub struct Candidate<'a, T = ()> {
    pub state: &'a EntityState,
    /// Disambiguation suffix from the entity id (0 when absent)
    pub suffix: u32,
    /// Data carried along with the candidate
    pub value: T,
}

impl<'a> Candidate<'a> {
    pub fn new(state: &'a EntityState, suffix: u32) -> Self {
        Self {
            state,
            suffix,
            value: (),
        }
    }
}

impl<'a, T> Candidate<'a, T> {
    pub fn with_value(state: &'a EntityState, suffix: u32, value: T) -> Self {
        Self {
            state,
            suffix,
            value,
        }
    }
}

/// Preference order between two candidates; `Greater` means `a` is preferred
///
/// Available beats unavailable/unknown, then the higher suffix wins, then
/// the lexicographically smaller entity id.
pub fn preference<T>(a: &Candidate<'_, T>, b: &Candidate<'_, T>) -> Ordering {
    a.state
        .is_available()
        .cmp(&b.state.is_available())
        .then_with(|| a.suffix.cmp(&b.suffix))
        .then_with(|| b.state.entity_id.cmp(&a.state.entity_id))
}

/// Pick the preferred candidate, or `None` for an empty set
pub fn select_best<'a, T>(
    candidates: impl IntoIterator<Item = Candidate<'a, T>>,
) -> Option<Candidate<'a, T>> {
    candidates.into_iter().max_by(preference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn state(id: &str, value: &str) -> EntityState {
        EntityState::new(id.parse().unwrap(), value, HashMap::new())
    }

    #[test]
    fn test_available_beats_higher_suffix() {
        let old = state("sensor.x1c_ams_1_tray_1", "PLA");
        let new = state("sensor.x1c_ams_1_tray_1_2", "unavailable");
        let best = select_best([Candidate::new(&new, 2), Candidate::new(&old, 0)]).unwrap();
        assert_eq!(best.state.entity_id.to_string(), "sensor.x1c_ams_1_tray_1");
    }

    #[test]
    fn test_higher_suffix_wins_when_both_available() {
        let a = state("sensor.x1c_ams_1_tray_1_2", "PLA");
        let b = state("sensor.x1c_ams_1_tray_1_3", "PETG");
        for candidates in [
            [Candidate::new(&a, 2), Candidate::new(&b, 3)],
            [Candidate::new(&b, 3), Candidate::new(&a, 2)],
        ] {
            let best = select_best(candidates).unwrap();
            assert_eq!(best.suffix, 3);
        }
    }

    #[test]
    fn test_unknown_counts_as_unavailable() {
        let a = state("sensor.x1c_ams_1_tray_1_5", "unknown");
        let b = state("sensor.x1c_ams_1_tray_1", "Empty");
        let best = select_best([Candidate::new(&a, 5), Candidate::new(&b, 0)]).unwrap();
        assert_eq!(best.suffix, 0);
    }

    #[test]
    fn test_order_independent_on_full_tie() {
        let a = state("sensor.a_ams_1_tray_1", "PLA");
        let b = state("sensor.b_ams_1_tray_1", "PLA");
        let first = select_best([Candidate::new(&a, 0), Candidate::new(&b, 0)]).unwrap();
        let second = select_best([Candidate::new(&b, 0), Candidate::new(&a, 0)]).unwrap();
        assert_eq!(first.state.entity_id, second.state.entity_id);
        assert_eq!(first.state.entity_id.to_string(), "sensor.a_ams_1_tray_1");
    }

    #[test]
    fn test_empty() {
        assert!(select_best(Vec::<Candidate<'_>>::new()).is_none());
    }
}
