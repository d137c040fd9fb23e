use log::debug;

use crate::config::Place;

/// The places assigned so far in the open category.
///
/// Invariant: no two entries hold the same place, and an entry holds at most
/// one place. Entries are kept in the order they were first given a place.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Ballot {
    assignments: Vec<(String, Place)>,
}

impl Ballot {
    pub fn new() -> Ballot {
        Ballot::default()
    }

    /// Gives `place` to `entry_id`, or takes it back if the entry already
    /// holds it.
    ///
    /// When assigning, the previous holder of `place` loses it and the entry
    /// drops whatever place it held before.
    pub fn toggle_place(&mut self, entry_id: &str, place: Place) {
        if self.get_place(entry_id) == Some(place) {
            debug!("toggle_place: {} deselects {}", entry_id, place);
            self.assignments.retain(|(id, _)| id != entry_id);
        } else {
            self.assign(entry_id, place);
        }
    }

    /// Assigns without the deselect path. Used to seed a ballot from stored
    /// votes, where a repeated record must not cancel the previous one.
    pub(crate) fn assign(&mut self, entry_id: &str, place: Place) {
        if let Some(holder) = self.holder(place) {
            debug!("assign: {} takes {} from {}", entry_id, place, holder);
        }
        self.assignments.retain(|(id, p)| *p != place || id == entry_id);
        match self.assignments.iter_mut().find(|(id, _)| id == entry_id) {
            Some(slot) => slot.1 = place,
            None => self.assignments.push((entry_id.to_string(), place)),
        }
    }

    pub fn is_place_taken(&self, place: Place) -> bool {
        self.assignments.iter().any(|(_, p)| *p == place)
    }

    pub fn get_place(&self, entry_id: &str) -> Option<Place> {
        self.assignments
            .iter()
            .find(|(id, _)| id == entry_id)
            .map(|(_, p)| *p)
    }

    /// The entry currently holding `place`.
    pub fn holder(&self, place: Place) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(_, p)| *p == place)
            .map(|(id, _)| id.as_str())
    }

    /// All three places are assigned.
    pub fn is_ready(&self) -> bool {
        self.assignments.len() == Place::ALL.len()
    }

    pub fn places_assigned(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Place)> + '_ {
        self.assignments.iter().map(|(id, p)| (id.as_str(), *p))
    }

    pub fn clear(&mut self) {
        self.assignments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(b: &Ballot) -> Vec<(String, u8)> {
        b.iter().map(|(id, p)| (id.to_string(), p.rank())).collect()
    }

    fn assert_injective(b: &Ballot) {
        for place in Place::ALL {
            assert!(b.iter().filter(|(_, p)| *p == place).count() <= 1);
        }
        let mut ids: Vec<&str> = b.iter().map(|(id, _)| id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), b.places_assigned());
    }

    #[test]
    fn assigning_a_taken_place_moves_it() {
        let mut b = Ballot::new();
        b.toggle_place("a", Place::First);
        b.toggle_place("b", Place::First);
        assert_eq!(b.get_place("a"), None);
        assert_eq!(b.get_place("b"), Some(Place::First));
        assert_eq!(b.holder(Place::First), Some("b"));
        assert_eq!(b.places_assigned(), 1);
    }

    #[test]
    fn reassigning_an_entry_frees_its_old_place() {
        let mut b = Ballot::new();
        b.toggle_place("a", Place::Third);
        b.toggle_place("a", Place::Second);
        assert!(!b.is_place_taken(Place::Third));
        assert!(b.is_place_taken(Place::Second));
        assert_eq!(pairs(&b), vec![("a".to_string(), 2)]);
    }

    #[test]
    fn toggling_twice_restores_the_ballot() {
        let mut b = Ballot::new();
        b.toggle_place("a", Place::First);
        b.toggle_place("b", Place::Second);
        let before = b.clone();
        b.toggle_place("c", Place::Third);
        b.toggle_place("c", Place::Third);
        assert_eq!(b, before);
        b.toggle_place("b", Place::Second);
        b.toggle_place("b", Place::Second);
        assert_eq!(pairs(&b), pairs(&before));
    }

    #[test]
    fn ready_only_with_three_places() {
        let mut b = Ballot::new();
        assert!(!b.is_ready());
        b.toggle_place("a", Place::First);
        b.toggle_place("b", Place::Second);
        assert!(!b.is_ready());
        b.toggle_place("c", Place::Third);
        assert!(b.is_ready());
        b.toggle_place("a", Place::Third);
        assert!(!b.is_ready());
        assert_eq!(b.holder(Place::Third), Some("a"));
        assert!(b.get_place("c").is_none());
    }

    #[test]
    fn injective_over_toggle_sequences() {
        let ids = ["e0", "e1", "e2", "e3", "e4"];
        // Small LCG, enough to walk through many interleavings.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut b = Ballot::new();
        for _ in 0..5000 {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let id = ids[((state >> 33) % ids.len() as u64) as usize];
            let place = Place::ALL[((state >> 17) % 3) as usize];
            b.toggle_place(id, place);
            assert_injective(&b);
            assert_eq!(b.is_ready(), b.places_assigned() == 3);
        }
    }

    #[test]
    fn place_conversions() {
        assert_eq!(Place::try_from(2u8), Ok(Place::Second));
        assert!(Place::try_from(0u8).is_err());
        assert!(Place::try_from(4u8).is_err());
        assert_eq!(u8::from(Place::Third), 3);
        assert_eq!(Place::First.label(), "1st Place");
    }
}
