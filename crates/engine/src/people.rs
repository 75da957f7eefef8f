//! The roster of people sharing expenses.
//!
//! A person is identified by its display name only. Names are compared with
//! exact string equality everywhere in the engine; the only normalization is
//! trimming done by [`Roster::add`] on user input.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, util::normalize_required_name};

/// Ordered set of participant names.
///
/// Insertion order is preserved and is the deterministic order used by the
/// balance tables and by the settlement planner to break ties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a person, returning the stored (trimmed) name.
    pub fn add(&mut self, name: &str) -> ResultEngine<String> {
        let name = normalize_required_name(name, "person")?;
        if self.contains(&name) {
            return Err(EngineError::ExistingKey(name));
        }
        self.names.push(name.clone());
        Ok(name)
    }

    /// Removes a person. Transactions that mention them are left untouched and
    /// simply stop contributing to balances.
    pub fn remove(&mut self, name: &str) -> ResultEngine<()> {
        let index = self
            .position(name)
            .ok_or_else(|| EngineError::KeyNotFound(name.to_string()))?;
        self.names.remove(index);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Index of `name` in roster order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Fails with [`EngineError::InvalidPerson`] if `name` is not listed.
    pub(crate) fn require(&self, name: &str) -> ResultEngine<()> {
        if !self.contains(name) {
            return Err(EngineError::InvalidPerson(format!(
                "\"{name}\" is not in the roster"
            )));
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for Roster {
    /// Builds a fixed roster, keeping the first occurrence of duplicated names.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for name in iter {
            let name = name.into();
            if !name.is_empty() && !roster.contains(&name) {
                roster.names.push(name);
            }
        }
        roster
    }
}

impl From<Vec<String>> for Roster {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.names
    }
}
