//! Render-facing scene: everything on screen after a layout pass, in
//! screen coordinates.
//!
//! The walk mirrors the placement passes: descendant blocks from the
//! center outward (skipping generations scrolled off the left edge),
//! then the ancestor lines (skipping generations off the right edge).
//! A pruned branch leaves a stub line running to the screen edge to say
//! more people lie that way.

use crate::ir::{PersonGraph, PersonId};
use crate::layout::types::{LayoutTree, OccId, Rect};
use crate::viewport::ViewportState;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub boxes: Vec<SceneBox>,
    pub connectors: Vec<Connector>,
    pub spouse_links: Vec<SpouseLink>,
    pub stubs: Vec<Stub>,
    pub screen_width: i32,
    pub screen_height: i32,
}

/// One person box, ready to draw and hit-test.
#[derive(Debug, Clone)]
pub struct SceneBox {
    pub occ: OccId,
    pub person: PersonId,
    pub name: String,
    pub life_dates: Option<String>,
    pub rect: Rect,
    pub selected: bool,
}

/// Parent-to-child elbow: out from the parent, down the drop line, in to
/// the child.
#[derive(Debug, Clone)]
pub struct Connector {
    pub points: [(i32, i32); 4],
}

/// The joining line between two spouses stacked in one column.
#[derive(Debug, Clone)]
pub struct SpouseLink {
    pub x: i32,
    pub top_y: i32,
    pub bottom_y: i32,
}

/// A line to the screen edge marking a pruned branch.
#[derive(Debug, Clone)]
pub struct Stub {
    pub from: (i32, i32),
    pub to_x: i32,
}

impl Scene {
    pub fn empty(screen_width: i32, screen_height: i32) -> Self {
        Self {
            screen_width,
            screen_height,
            ..Self::default()
        }
    }

    /// The topmost box under a screen point.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<&SceneBox> {
        self.boxes.iter().find(|b| b.rect.contains(x, y))
    }
}

pub fn build_scene(
    tree: &mut LayoutTree,
    graph: &PersonGraph,
    viewport: &ViewportState,
    scroll: (i32, i32),
    selected: Option<OccId>,
) -> Scene {
    let mut scene = Scene::empty(viewport.screen_width, viewport.screen_height);
    let shift = (-scroll.0, -scroll.1);
    let mut walk = Walk {
        tree,
        graph,
        viewport,
        horz_scroll: scroll.0,
        shift,
        selected,
        scene: &mut scene,
    };
    let center = walk.tree.center;
    walk.descendants(center);
    walk.ancestors(center);
    scene
}

struct Walk<'a> {
    tree: &'a mut LayoutTree,
    graph: &'a PersonGraph,
    viewport: &'a ViewportState,
    horz_scroll: i32,
    shift: (i32, i32),
    selected: Option<OccId>,
    scene: &'a mut Scene,
}

impl Walk<'_> {
    fn push_box(&mut self, occ: OccId) {
        let entry = self.tree.occ(occ);
        let (name, life_dates) = match self.graph.person(entry.person) {
            Some(record) => (record.full_name.clone(), record.life_dates.clone()),
            None => (String::new(), None),
        };
        self.scene.boxes.push(SceneBox {
            occ,
            person: entry.person,
            name,
            life_dates,
            rect: Rect {
                x: entry.rect.x + self.shift.0,
                y: entry.rect.y + self.shift.1,
                width: entry.rect.width,
                height: entry.rect.height,
            },
            selected: self.selected == Some(occ),
        });
    }

    fn descendants(&mut self, occ: OccId) {
        let gen_id = self.tree.occ(occ).gen_id;
        // The column pass learns its own left edge only after looping
        // its members, so member X is finalized here instead.
        let x = {
            let generation = self.tree.generation(gen_id);
            generation.left_x + generation.max_line_offset + self.viewport.metrics.trunk_len
        };
        self.tree.occ_mut(occ).set_x(x);
        self.push_box(occ);

        let draw_children = self
            .tree
            .next_generation(gen_id)
            .is_some_and(|next| {
                self.tree
                    .generation(next)
                    .visible_as_descendant(self.horz_scroll)
            });

        let children = self.tree.occ(occ).children.clone();
        self.child_branches(occ, &children, draw_children);

        let spouses = self.tree.occ(occ).spouses.clone();
        let mut prev = occ;
        for spouse in spouses {
            self.tree.occ_mut(spouse).set_x(x);
            self.push_box(spouse);
            self.spouse_link(prev, spouse);
            prev = spouse;

            let children = self.tree.occ(spouse).children.clone();
            self.child_branches(spouse, &children, draw_children);
        }
    }

    fn child_branches(&mut self, parent: OccId, children: &[OccId], draw_children: bool) {
        if draw_children {
            for &child in children {
                self.descendants(child);
                self.connector(parent, child);
            }
        } else if !children.is_empty() {
            let anchor = self.tree.occ(parent).left_anchor();
            self.scene.stubs.push(Stub {
                from: (anchor.0 + self.shift.0, anchor.1 + self.shift.1),
                to_x: 0,
            });
        }
    }

    fn ancestors(&mut self, occ: OccId) {
        let (father, mother) = {
            let entry = self.tree.occ(occ);
            (entry.father, entry.mother)
        };
        let mut pruned = false;
        for parent in [father, mother].into_iter().flatten() {
            let parent_gen = self.tree.occ(parent).gen_id;
            let visible = self
                .tree
                .generation(parent_gen)
                .visible_as_ancestor(self.horz_scroll, self.viewport.screen_width);
            if visible {
                self.push_box(parent);
                self.connector(parent, occ);
                self.ancestors(parent);
            } else {
                pruned = true;
            }
        }
        if pruned {
            let anchor = self.tree.occ(occ).right_anchor();
            self.scene.stubs.push(Stub {
                from: (anchor.0 + self.shift.0, anchor.1 + self.shift.1),
                to_x: self.viewport.screen_width,
            });
        }
    }

    fn connector(&mut self, parent: OccId, child: OccId) {
        let parent_entry = self.tree.occ(parent);
        let child_entry = self.tree.occ(child);
        if parent_entry.rect.x <= child_entry.rect.x {
            warn!(
                parent = parent_entry.person.0,
                child = child_entry.person.0,
                parent_x = parent_entry.rect.x,
                child_x = child_entry.rect.x,
                "skipping backwards connector"
            );
            return;
        }
        let source = parent_entry.left_anchor();
        let dest = child_entry.right_anchor();
        let source = (source.0 + self.shift.0 - 1, source.1 + self.shift.1);
        let dest = (dest.0 + self.shift.0 + 1, dest.1 + self.shift.1);
        let generation = self.tree.generation(parent_entry.gen_id);
        let elbow_x = source.0 - self.viewport.metrics.trunk_len - generation.max_line_offset
            + parent_entry.child_line_offset;
        self.scene.connectors.push(Connector {
            points: [
                source,
                (elbow_x, source.1),
                (elbow_x, dest.1),
                dest,
            ],
        });
    }

    fn spouse_link(&mut self, upper: OccId, lower: OccId) {
        let generation = self.tree.generation(self.tree.occ(upper).gen_id);
        let x = self.tree.occ(upper).rect.x + generation.spouse_line_x_offset + self.shift.0 - 1;
        let top = self.tree.occ(upper).bottom_anchor();
        let bottom = self.tree.occ(lower).top_anchor();
        self.scene.spouse_links.push(SpouseLink {
            x,
            top_y: top.1 + self.shift.1,
            bottom_y: bottom.1 + self.shift.1,
        });
    }
}
