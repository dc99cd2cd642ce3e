//! Person-graph loader for the JSON interchange format.
//!
//! References may point at people that have no entry of their own; those
//! become incomplete placeholder records, which keeps partially exported
//! files loadable. A second entry for the same id is an error.

use crate::ir::{FamilyRecord, PersonGraph, PersonId, PersonRecord, Sex};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid person graph JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate person id {0:?}")]
    DuplicatePerson(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphFile {
    #[serde(default)]
    people: Vec<PersonEntry>,
    #[serde(default)]
    families: Vec<FamilyEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonEntry {
    id: String,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    surname: Option<String>,
    #[serde(default)]
    life_dates: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    sex: Option<String>,
    #[serde(default)]
    father: Option<String>,
    #[serde(default)]
    mother: Option<String>,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FamilyEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    father: Option<String>,
    #[serde(default)]
    mother: Option<String>,
    #[serde(default)]
    children: Vec<String>,
}

pub fn parse_graph(input: &str) -> Result<PersonGraph, GraphError> {
    let file: GraphFile = serde_json::from_str(input)?;
    let mut graph = PersonGraph::new();
    let mut ids: HashMap<String, PersonId> = HashMap::new();

    for entry in &file.people {
        let id = intern(&mut graph, &mut ids, &entry.id);
        let record = graph
            .record_mut(id)
            .ok_or_else(|| GraphError::DuplicatePerson(entry.id.clone()))?;
        if record.complete {
            return Err(GraphError::DuplicatePerson(entry.id.clone()));
        }
        record.given_name = entry.given_name.clone();
        record.surname = entry.surname.clone();
        record.life_dates = entry.life_dates.clone();
        record.details = entry.details.clone();
        record.sex = parse_sex(entry.sex.as_deref());
        record.hidden = entry.hidden;

        let father = entry
            .father
            .as_deref()
            .map(|xref| intern(&mut graph, &mut ids, xref));
        let mother = entry
            .mother
            .as_deref()
            .map(|xref| intern(&mut graph, &mut ids, xref));
        if let Some(record) = graph.record_mut(id) {
            record.father = father;
            record.mother = mother;
            record.complete();
        }
    }

    for entry in &file.families {
        let father = entry
            .father
            .as_deref()
            .map(|xref| intern(&mut graph, &mut ids, xref));
        let mother = entry
            .mother
            .as_deref()
            .map(|xref| intern(&mut graph, &mut ids, xref));
        let children = entry
            .children
            .iter()
            .map(|xref| intern(&mut graph, &mut ids, xref))
            .collect();
        let family = graph.add_family(FamilyRecord {
            xref: entry.id.clone(),
            father,
            mother,
            children,
            complete: true,
        });
        for parent in [father, mother].into_iter().flatten() {
            if let Some(record) = graph.record_mut(parent) {
                record.families.push(family);
            }
        }
    }

    Ok(graph)
}

fn intern(graph: &mut PersonGraph, ids: &mut HashMap<String, PersonId>, xref: &str) -> PersonId {
    if let Some(&id) = ids.get(xref) {
        return id;
    }
    let id = graph.add_person(PersonRecord {
        xref: xref.to_string(),
        ..PersonRecord::default()
    });
    ids.insert(xref.to_string(), id);
    id
}

fn parse_sex(raw: Option<&str>) -> Sex {
    match raw {
        Some(value) if value.eq_ignore_ascii_case("f") || value.eq_ignore_ascii_case("female") => {
            Sex::Female
        }
        _ => Sex::Male,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_graph() {
        let graph = parse_graph(
            r#"{
                "people": [
                    {"id": "I1", "givenName": "John", "surname": "Smith", "lifeDates": "1840-1902"},
                    {"id": "I2", "givenName": "Mary", "sex": "F"}
                ],
                "families": [
                    {"father": "I1", "mother": "I2", "children": []}
                ]
            }"#,
        )
        .unwrap();
        let john = graph.person_by_xref("I1").unwrap();
        let record = graph.person(john).unwrap();
        assert_eq!(record.full_name, "John Smith");
        assert_eq!(record.families.len(), 1);
        let mary = graph.person_by_xref("I2").unwrap();
        assert_eq!(graph.person(mary).unwrap().sex, Sex::Female);
    }

    #[test]
    fn undeclared_references_become_placeholders() {
        let graph = parse_graph(
            r#"{
                "people": [
                    {"id": "I1", "givenName": "Kid", "father": "I9"}
                ]
            }"#,
        )
        .unwrap();
        let kid = graph.person_by_xref("I1").unwrap();
        let father = graph.person(kid).unwrap().father.unwrap();
        // The placeholder exists but is filtered out until its entry arrives.
        assert!(graph.record(father).is_some());
        assert!(graph.person(father).is_none());
    }

    #[test]
    fn duplicate_person_entries_are_rejected() {
        let err = parse_graph(
            r#"{
                "people": [
                    {"id": "I1", "givenName": "A"},
                    {"id": "I1", "givenName": "B"}
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicatePerson(id) if id == "I1"));
    }

    #[test]
    fn family_order_is_preserved_per_parent() {
        let graph = parse_graph(
            r#"{
                "people": [
                    {"id": "I1", "givenName": "John"},
                    {"id": "I2", "givenName": "Mary", "sex": "F"},
                    {"id": "I3", "givenName": "Ann", "sex": "F"}
                ],
                "families": [
                    {"father": "I1", "mother": "I2", "children": []},
                    {"father": "I1", "mother": "I3", "children": []}
                ]
            }"#,
        )
        .unwrap();
        let john = graph.person_by_xref("I1").unwrap();
        let families = &graph.person(john).unwrap().families;
        assert_eq!(families.len(), 2);
        let first = graph.family(families[0]).unwrap();
        assert_eq!(first.mother, graph.person_by_xref("I2"));
    }
}
