//! In-memory person graph: the data model the layout passes read.
//!
//! A `PersonRecord` is pure genealogy data; where a person lands on screen
//! lives in the layout arena, never here. Records may be incomplete while
//! data is still arriving: lookups treat an incomplete record as "no such
//! person" so a partially loaded graph lays out cleanly and a later rebuild
//! picks up the new arrivals.

use serde::{Deserialize, Serialize};

/// Index of a person in the graph. Stable across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(pub u32);

/// Index of a family (one marriage/union) in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FamilyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Default for Sex {
    fn default() -> Self {
        // The original data format leaves sex implicit for most records.
        Sex::Male
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonRecord {
    /// External identifier from the source file (e.g. "I12").
    pub xref: String,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    /// Display name, derived on completion.
    pub full_name: String,
    pub life_dates: Option<String>,
    pub details: Option<String>,
    pub sex: Sex,
    pub father: Option<PersonId>,
    pub mother: Option<PersonId>,
    /// Families in which this person is a parent, in source order.
    pub families: Vec<FamilyId>,
    pub hidden: bool,
    /// False until a full record for this xref has been seen.
    pub complete: bool,
}

impl PersonRecord {
    /// Derives the display strings and marks the record complete.
    pub fn complete(&mut self) {
        self.full_name = match (self.given_name.as_deref(), self.surname.as_deref()) {
            (Some(given), Some(sur)) => format!("{given} {sur}"),
            (None, Some(sur)) => sur.to_string(),
            (Some(given), None) => given.to_string(),
            (None, None) => "no name".to_string(),
        };
        if self.details.is_none() {
            self.details = match &self.life_dates {
                Some(dates) => Some(format!("{}\n{dates}", self.full_name)),
                None => Some(self.full_name.clone()),
            };
        }
        self.complete = true;
    }
}

#[derive(Debug, Clone, Default)]
pub struct FamilyRecord {
    pub xref: Option<String>,
    pub father: Option<PersonId>,
    pub mother: Option<PersonId>,
    /// Children in source order; this order drives vertical placement.
    pub children: Vec<PersonId>,
    pub complete: bool,
}

/// The full set of people and families, with the hidden-record gate.
///
/// `person()` and `family()` apply the visibility filter; the `record*`
/// accessors bypass it for the parser and for tooling.
#[derive(Debug, Clone, Default)]
pub struct PersonGraph {
    people: Vec<PersonRecord>,
    families: Vec<FamilyRecord>,
    show_hidden: bool,
}

impl PersonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, record: PersonRecord) -> PersonId {
        let id = PersonId(self.people.len() as u32);
        self.people.push(record);
        id
    }

    pub fn add_family(&mut self, record: FamilyRecord) -> FamilyId {
        let id = FamilyId(self.families.len() as u32);
        self.families.push(record);
        id
    }

    /// A person, or `None` if the record is incomplete or hidden.
    pub fn person(&self, id: PersonId) -> Option<&PersonRecord> {
        let record = self.people.get(id.0 as usize)?;
        if !record.complete || (record.hidden && !self.show_hidden) {
            return None;
        }
        Some(record)
    }

    /// Like `person`, for optional relative links.
    pub fn relative(&self, id: Option<PersonId>) -> Option<(PersonId, &PersonRecord)> {
        let id = id?;
        Some((id, self.person(id)?))
    }

    /// A family, or `None` while its record is still incomplete.
    pub fn family(&self, id: FamilyId) -> Option<&FamilyRecord> {
        let record = self.families.get(id.0 as usize)?;
        if !record.complete {
            return None;
        }
        Some(record)
    }

    /// The spouse of `person` within `family`: the parent of the opposite
    /// sex, subject to the visibility filter.
    pub fn spouse_in(&self, person: &PersonRecord, family: &FamilyRecord) -> Option<PersonId> {
        let spouse = match person.sex {
            Sex::Male => family.mother,
            Sex::Female => family.father,
        };
        self.relative(spouse).map(|(id, _)| id)
    }

    /// Raw record access, ignoring the visibility filter.
    pub fn record(&self, id: PersonId) -> Option<&PersonRecord> {
        self.people.get(id.0 as usize)
    }

    pub fn record_mut(&mut self, id: PersonId) -> Option<&mut PersonRecord> {
        self.people.get_mut(id.0 as usize)
    }

    pub fn family_record_mut(&mut self, id: FamilyId) -> Option<&mut FamilyRecord> {
        self.families.get_mut(id.0 as usize)
    }

    pub fn person_by_xref(&self, xref: &str) -> Option<PersonId> {
        self.people
            .iter()
            .position(|p| p.xref == xref)
            .map(|idx| PersonId(idx as u32))
    }

    pub fn people(&self) -> impl Iterator<Item = (PersonId, &PersonRecord)> {
        self.people
            .iter()
            .enumerate()
            .map(|(idx, record)| (PersonId(idx as u32), record))
    }

    /// The first person that passes the visibility filter, in file order.
    pub fn first_visible(&self) -> Option<PersonId> {
        self.people().find_map(|(id, _)| {
            self.person(id)?;
            Some(id)
        })
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Reveals hidden records to all subsequent lookups.
    pub fn show_hidden(&mut self) {
        self.show_hidden = true;
    }

    pub fn hidden_shown(&self) -> bool {
        self.show_hidden
    }
}
