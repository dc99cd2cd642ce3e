//! Center-person navigation history.
//!
//! Each entry remembers its own scroll position, so going back lands on
//! the exact view that was left, not just the same person. Choosing a
//! new center while back in the chain drops the forward entries.

use crate::ir::PersonId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub person: PersonId,
    pub horz: i32,
    pub vert: i32,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<NavEntry>,
    cur: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&NavEntry> {
        self.entries.get(self.cur)
    }

    pub fn current_mut(&mut self) -> Option<&mut NavEntry> {
        self.entries.get_mut(self.cur)
    }

    /// Makes `person` the current entry. Re-selecting the current person
    /// keeps its entry; anything else truncates the forward chain and
    /// appends.
    pub fn visit(&mut self, person: PersonId, horz: i32, vert: i32) {
        match self.current() {
            Some(entry) if entry.person == person => {}
            Some(_) => {
                self.entries.truncate(self.cur + 1);
                self.entries.push(NavEntry { person, horz, vert });
                self.cur = self.entries.len() - 1;
                return;
            }
            None => {
                self.entries.push(NavEntry { person, horz, vert });
                self.cur = 0;
                return;
            }
        }
        // Same person: only the scroll is refreshed.
        if let Some(entry) = self.current_mut() {
            entry.horz = horz;
            entry.vert = vert;
        }
    }

    pub fn back(&mut self) -> bool {
        if self.cur > 0 {
            self.cur -= 1;
            true
        } else {
            false
        }
    }

    pub fn forward(&mut self) -> bool {
        if self.cur + 1 < self.entries.len() {
            self.cur += 1;
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
