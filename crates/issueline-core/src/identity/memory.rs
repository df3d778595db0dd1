use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::{IdentityResolver, ResolvedPerson};
use crate::error::ResolverError;
use crate::model::identity::IdentityKey;

/// Embedded resolver: every distinct `(name, email)` pair becomes a person
/// with the next sequential id, unless an alias was registered up front.
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    people: RefCell<HashMap<(String, String), ResolvedPerson>>,
    next_id: Cell<u64>,
    calls: Cell<usize>,
}

impl InMemoryResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `(name, email)` as an alias of a canonical person.
    pub fn alias(&self, name: &str, email: &str, canonical_name: &str, canonical_email: &str) {
        let person = self.find_or_allocate(canonical_name, canonical_email);
        self.people
            .borrow_mut()
            .insert((name.to_string(), email.to_string()), person);
    }

    /// Number of `resolve` calls served so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    fn find_or_allocate(&self, name: &str, email: &str) -> ResolvedPerson {
        let key = (name.to_string(), email.to_string());
        if let Some(person) = self.people.borrow().get(&key) {
            return person.clone();
        }

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let person = ResolvedPerson {
            id: IdentityKey(id),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.people.borrow_mut().insert(key, person.clone());
        person
    }
}

impl IdentityResolver for InMemoryResolver {
    fn resolve(&self, display_name: &str, email: &str) -> Result<ResolvedPerson, ResolverError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.find_or_allocate(display_name, email))
    }
}
