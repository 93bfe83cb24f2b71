use std::collections::{HashMap, hash_map::Entry};

use crate::{event::mouse::Button, geom::Point, key::ViewKey};

/// Mouse hit-test registrations for one frame. The first claim on a
/// coordinate and button wins; later claims there are ignored.
#[derive(Debug, Default, Clone)]
pub struct Claims {
    /// Owner of each claimed (point, button) pair.
    owners: HashMap<(Point, Button), ViewKey>,
}

impl Claims {
    /// Claim a point for a button. Returns false if it was already taken.
    pub fn claim(&mut self, p: Point, button: Button, key: &ViewKey) -> bool {
        match self.owners.entry((p, button)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                e.insert(key.clone());
                true
            }
        }
    }

    /// The owner of a point for a button.
    pub fn owner(&self, p: Point, button: Button) -> Option<&ViewKey> {
        self.owners.get(&(p, button))
    }

    /// Fold another claim set into this one. Existing claims keep priority.
    pub fn merge(&mut self, other: Self) {
        for ((p, b), key) in other.owners {
            self.owners.entry((p, b)).or_insert(key);
        }
    }

    /// Number of claimed (point, button) pairs.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Is nothing claimed?
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_wins() {
        let p = Point { x: 1, y: 1 };
        let (a, b) = (ViewKey::key("a"), ViewKey::key("b"));
        let mut c = Claims::default();
        assert!(c.claim(p, Button::Left, &a));
        assert!(!c.claim(p, Button::Left, &b));
        assert!(c.claim(p, Button::Right, &b));
        assert_eq!(c.owner(p, Button::Left), Some(&a));
        assert_eq!(c.owner(p, Button::Right), Some(&b));
        assert_eq!(c.owner(p, Button::None), None);
    }

    #[test]
    fn merge_keeps_existing() {
        let p = Point::zero();
        let q = Point { x: 1, y: 0 };
        let mut top = Claims::default();
        top.claim(p, Button::Left, &ViewKey::key("top"));
        let mut bottom = Claims::default();
        bottom.claim(p, Button::Left, &ViewKey::key("bottom"));
        bottom.claim(q, Button::Left, &ViewKey::key("bottom"));
        top.merge(bottom);
        assert_eq!(top.owner(p, Button::Left), Some(&ViewKey::key("top")));
        assert_eq!(top.owner(q, Button::Left), Some(&ViewKey::key("bottom")));
        assert_eq!(top.len(), 2);
    }
}
