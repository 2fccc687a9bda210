//! The in-memory project registry.
//!
//! An ordered, capacity-bounded sequence of projects keyed by canonical
//! token UID. Insertion order is display order; removal compacts the
//! sequence and preserves the relative order of the remaining entries.
//! Lookup is a linear scan, acceptable at this capacity.

use crate::error::{CoreError, Result};
use crate::project::Project;
use crate::uid::TokenUid;
use std::time::Duration;

#[derive(Debug)]
pub struct Registry {
    projects: Vec<Project>,
    capacity: usize,
}

impl Registry {
    pub fn with_capacity(capacity: usize) -> Self {
        Registry {
            projects: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.projects.len() >= self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Project> {
        self.projects.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    /// Index of the first project with the given UID.
    pub fn find_by_uid(&self, uid: &TokenUid) -> Option<usize> {
        self.projects.iter().position(|p| &p.uid == uid)
    }

    /// Index of the running project, if any. The single-active invariant
    /// guarantees at most one.
    pub fn running_index(&self) -> Option<usize> {
        self.projects.iter().position(|p| p.is_running())
    }

    /// Appends a new idle project. Duplicate UIDs are rejected; the
    /// controller's registration flow only reaches this through the
    /// unknown-token branch, so the guard never fires in normal operation.
    pub fn insert(&mut self, uid: TokenUid, name: impl Into<String>) -> Result<usize> {
        if self.is_full() {
            return Err(CoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if self.find_by_uid(&uid).is_some() {
            return Err(CoreError::DuplicateUid(uid.to_string()));
        }
        self.projects.push(Project::new(uid, name));
        Ok(self.projects.len() - 1)
    }

    /// Removes and returns the project at `index`, compacting the sequence.
    pub fn remove(&mut self, index: usize) -> Result<Project> {
        if index >= self.projects.len() {
            return Err(CoreError::IndexOutOfBounds(index));
        }
        Ok(self.projects.remove(index))
    }

    /// Stops every running session. Called before starting a project so at
    /// most one session is ever open.
    pub fn stop_all(&mut self, now: Duration) {
        for project in &mut self.projects {
            project.stop_session(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(value: &str) -> TokenUid {
        TokenUid::from(value)
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn insert_appends_idle_projects_in_order() {
        let mut registry = Registry::with_capacity(10);
        registry.insert(uid("aa"), "A").unwrap();
        registry.insert(uid("bb"), "B").unwrap();

        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(registry.iter().all(|p| !p.is_running()));
        assert!(registry
            .iter()
            .all(|p| p.accumulated() == Duration::ZERO));
    }

    #[test]
    fn insert_rejects_when_full() {
        let mut registry = Registry::with_capacity(2);
        registry.insert(uid("aa"), "A").unwrap();
        registry.insert(uid("bb"), "B").unwrap();

        let err = registry.insert(uid("cc"), "C").unwrap_err();
        assert!(matches!(err, CoreError::CapacityExceeded { capacity: 2 }));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn insert_rejects_duplicate_uid() {
        let mut registry = Registry::with_capacity(10);
        registry.insert(uid("aa"), "A").unwrap();

        let err = registry.insert(uid("aa"), "A again").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateUid(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn find_by_uid_returns_first_match() {
        let mut registry = Registry::with_capacity(10);
        registry.insert(uid("aa"), "A").unwrap();
        registry.insert(uid("bb"), "B").unwrap();

        assert_eq!(registry.find_by_uid(&uid("bb")), Some(1));
        assert_eq!(registry.find_by_uid(&uid("zz")), None);
    }

    #[test]
    fn remove_preserves_order_of_remaining() {
        let mut registry = Registry::with_capacity(10);
        registry.insert(uid("aa"), "A").unwrap();
        registry.insert(uid("bb"), "B").unwrap();
        registry.insert(uid("cc"), "C").unwrap();

        let removed = registry.remove(1).unwrap();
        assert_eq!(removed.name, "B");

        let names: Vec<_> = registry.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(registry.find_by_uid(&uid("cc")), Some(1));
    }

    #[test]
    fn remove_out_of_bounds_fails() {
        let mut registry = Registry::with_capacity(10);
        registry.insert(uid("aa"), "A").unwrap();
        assert!(matches!(
            registry.remove(1),
            Err(CoreError::IndexOutOfBounds(1))
        ));
    }

    #[test]
    fn stop_all_closes_open_sessions() {
        let mut registry = Registry::with_capacity(10);
        registry.insert(uid("aa"), "A").unwrap();
        registry.insert(uid("bb"), "B").unwrap();
        registry.get_mut(0).unwrap().start_session(ms(1_000));

        registry.stop_all(ms(4_000));

        assert_eq!(registry.running_index(), None);
        assert_eq!(registry.get(0).unwrap().accumulated(), ms(3_000));
        assert_eq!(registry.get(1).unwrap().accumulated(), Duration::ZERO);
    }
}
