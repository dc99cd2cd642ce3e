//! Builds the occurrence arena for a center person.
//!
//! The descendant side walks families depth-first: one occurrence per
//! spouse, children hung off the spouse they belong to (or off the owner
//! when the spouse is unknown or filtered out). The ancestor side walks
//! father then mother. Every path gets a fresh occurrence, so a person
//! reachable twice appears twice. Depth is capped so cyclic data
//! terminates.

use crate::ir::{PersonGraph, PersonId};
use crate::layout::types::{GenId, Generation, LayoutTree, OccId, Occurrence, Side};

struct Builder<'a> {
    graph: &'a PersonGraph,
    arena: Vec<Occurrence>,
    max_depth: u32,
}

/// Builds the tree around `center`, or `None` when the center person is
/// missing, incomplete, or hidden.
pub fn build(graph: &PersonGraph, center: PersonId, max_depth: u32) -> Option<LayoutTree> {
    graph.person(center)?;

    let mut builder = Builder {
        graph,
        arena: Vec::new(),
        max_depth: max_depth.max(1),
    };
    let center_occ = builder.alloc(center, Side::Descendant);
    builder.build_descendants(center_occ, 0);
    builder.build_ancestors(center_occ, 0);

    let mut tree = LayoutTree {
        occurrences: builder.arena,
        descendant_gens: Vec::new(),
        ancestor_gens: Vec::new(),
        center: center_occ,
        leftmost_visible: None,
        rightmost_visible: None,
    };
    register_descendants(&mut tree, center_occ, 0);
    let (father, mother) = {
        let center = tree.occ(center_occ);
        (center.father, center.mother)
    };
    if let Some(father) = father {
        register_ancestors(&mut tree, father, 0);
    }
    if let Some(mother) = mother {
        register_ancestors(&mut tree, mother, 0);
    }
    Some(tree)
}

impl Builder<'_> {
    fn alloc(&mut self, person: PersonId, side: Side) -> OccId {
        let id = OccId(self.arena.len());
        self.arena
            .push(Occurrence::new(person, GenId { side, index: 0 }));
        id
    }

    fn build_descendants(&mut self, occ: OccId, depth: u32) {
        let person = self.arena[occ.0].person;
        let Some(record) = self.graph.person(person) else {
            return;
        };
        let families = record.families.clone();
        for family_id in families {
            let Some(family) = self.graph.family(family_id) else {
                continue;
            };
            let record = match self.graph.person(person) {
                Some(record) => record,
                None => return,
            };
            let spouse = self.graph.spouse_in(record, family);
            let children: Vec<PersonId> = family
                .children
                .iter()
                .filter_map(|&child| self.graph.person(child).map(|_| child))
                .collect();

            let parent_occ = match spouse {
                Some(spouse) => {
                    let spouse_occ = self.alloc(spouse, Side::Descendant);
                    self.arena[occ.0].spouses.push(spouse_occ);
                    spouse_occ
                }
                None => occ,
            };

            for child in children {
                let child_occ = self.alloc(child, Side::Descendant);
                self.arena[parent_occ.0].children.push(child_occ);
                if depth + 1 < self.max_depth {
                    self.build_descendants(child_occ, depth + 1);
                }
            }
        }
    }

    fn build_ancestors(&mut self, occ: OccId, depth: u32) {
        if depth >= self.max_depth {
            return;
        }
        let person = self.arena[occ.0].person;
        let Some(record) = self.graph.person(person) else {
            return;
        };
        let father = record.father;
        let mother = record.mother;
        if let Some((father, _)) = self.graph.relative(father) {
            let father_occ = self.alloc(father, Side::Ancestor);
            self.arena[occ.0].father = Some(father_occ);
            self.build_ancestors(father_occ, depth + 1);
        }
        if let Some((mother, _)) = self.graph.relative(mother) {
            let mother_occ = self.alloc(mother, Side::Ancestor);
            self.arena[occ.0].mother = Some(mother_occ);
            self.build_ancestors(mother_occ, depth + 1);
        }
    }
}

/// Assigns `occ` and its subtree to descendant generation columns.
/// Spouses share the owner's column without becoming members of it.
fn register_descendants(tree: &mut LayoutTree, occ: OccId, index: usize) {
    while tree.descendant_gens.len() <= index {
        tree.descendant_gens.push(Generation::new(Side::Descendant));
    }
    let gen_id = GenId {
        side: Side::Descendant,
        index,
    };
    tree.occ_mut(occ).gen_id = gen_id;
    tree.descendant_gens[index].members.push(occ);

    let children = tree.occ(occ).children.clone();
    for child in children {
        register_descendants(tree, child, index + 1);
    }
    let spouses = tree.occ(occ).spouses.clone();
    for spouse in spouses {
        tree.occ_mut(spouse).gen_id = gen_id;
        let children = tree.occ(spouse).children.clone();
        for child in children {
            register_descendants(tree, child, index + 1);
        }
    }
}

fn register_ancestors(tree: &mut LayoutTree, occ: OccId, index: usize) {
    while tree.ancestor_gens.len() <= index {
        tree.ancestor_gens.push(Generation::new(Side::Ancestor));
    }
    tree.occ_mut(occ).gen_id = GenId {
        side: Side::Ancestor,
        index,
    };
    tree.ancestor_gens[index].members.push(occ);

    let (father, mother) = {
        let occ = tree.occ(occ);
        (occ.father, occ.mother)
    };
    if let Some(father) = father {
        register_ancestors(tree, father, index + 1);
    }
    if let Some(mother) = mother {
        register_ancestors(tree, mother, index + 1);
    }
}
