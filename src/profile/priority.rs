use log::debug;

use crate::profile::Profile;

/// The profiles of one user: the locked default profile plus the rest in priority
/// order, highest first. Priorities are as stored until the order is changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileList {
    default: Option<Profile>,
    ordered: Vec<Profile>,
}

impl ProfileList {
    /// Split out the default profile and sort the rest by priority, highest first.
    pub fn from_profiles(profiles: Vec<Profile>) -> Self {
        let mut default = None;
        let mut ordered = Vec::with_capacity(profiles.len());
        for profile in profiles {
            if profile.is_default() && default.is_none() {
                default = Some(profile);
            } else {
                ordered.push(profile);
            }
        }
        ordered.sort_by(|a, b| b.get_priority().cmp(&a.get_priority()));
        Self { default, ordered }
    }

    pub fn get_default(&self) -> Option<&Profile> {
        self.default.as_ref()
    }

    /// Every profile but the default, highest priority first.
    pub fn get_ordered(&self) -> &[Profile] {
        &self.ordered
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.ordered.iter().chain(self.default.iter())
    }

    pub fn find(&self, key: &str) -> Option<&Profile> {
        self.iter().find(|profile| profile.get_key() == key)
    }

    pub fn len(&self) -> usize {
        self.ordered.len() + usize::from(self.default.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Priority to give a brand new profile, one above every existing one.
    pub fn next_priority(&self) -> i64 {
        self.iter().map(Profile::get_priority).max().unwrap_or(0).max(0) + 1
    }

    /// Move the profile `key` to where the profile `onto_key` currently sits,
    /// shifting the ones in between, then renumber `n` down to `1`.
    /// Returns false, changing nothing, if either key is unknown or they are the same.
    pub fn move_profile(&mut self, key: &str, onto_key: &str) -> bool {
        if key == onto_key {
            return false;
        }
        let from = self.ordered.iter().position(|p| p.get_key() == key);
        let to = self.ordered.iter().position(|p| p.get_key() == onto_key);
        let (Some(from), Some(to)) = (from, to) else {
            return false;
        };

        let moved = self.ordered.remove(from);
        debug!("Moving {} from position {} to {}", moved, from, to);
        self.ordered.insert(to, moved);
        self.renumber();
        true
    }

    /// Priority of the profile at `position` once the order is written back, `n` down to `1`.
    pub fn position_priority(&self, position: usize) -> i64 {
        (self.ordered.len() - position) as i64
    }

    fn renumber(&mut self) {
        for position in 0..self.ordered.len() {
            let priority = self.position_priority(position);
            self.ordered[position].set_priority(priority);
        }
    }
}
