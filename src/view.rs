//! `TreeView`: the engine facade a UI drives.
//!
//! Owns the person graph, the navigation history, the viewport, and the
//! current layout. Every mutation ends with a fresh scene, so callers
//! can redraw from `scene()` at any time.

use crate::config::Config;
use crate::history::History;
use crate::ir::{PersonGraph, PersonId};
use crate::layout::{self, LayoutTree, OccId, Scene};
use crate::text_metrics::Typesetter;
use crate::viewport::{ScrollRange, Scrolled, ViewportState};
use std::collections::HashSet;
use tracing::debug;

const ZOOM_STEP: i32 = 2;
const MIN_FONT_SIZE: i32 = 2;

pub struct TreeView {
    graph: PersonGraph,
    config: Config,
    font_size: i32,
    typesetter: Typesetter,
    viewport: ViewportState,
    history: History,
    tree: Option<LayoutTree>,
    scene: Scene,
    selected: Option<OccId>,
    /// People present in the current tree; drives `needs_rebuild`.
    in_tree: HashSet<PersonId>,
}

impl TreeView {
    pub fn new(graph: PersonGraph, config: Config) -> Self {
        let font_size = config.layout.font_size;
        let typesetter = Typesetter::new(
            &config.layout.font_family,
            font_size,
            config.layout.use_system_fonts,
        );
        let viewport = ViewportState::new(config.screen.width, config.screen.height);
        let scene = Scene::empty(viewport.screen_width, viewport.screen_height);
        Self {
            graph,
            config,
            font_size,
            typesetter,
            viewport,
            history: History::new(),
            tree: None,
            scene,
            selected: None,
            in_tree: HashSet::new(),
        }
    }

    pub fn graph(&self) -> &PersonGraph {
        &self.graph
    }

    /// Mutable graph access for incremental data arrival; follow up with
    /// `rebuild()` once the batch is in.
    pub fn graph_mut(&mut self) -> &mut PersonGraph {
        &mut self.graph
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn font_size(&self) -> i32 {
        self.font_size
    }

    pub fn center_person(&self) -> Option<PersonId> {
        self.history.current().map(|entry| entry.person)
    }

    pub fn selected_person(&self) -> Option<PersonId> {
        let occ = self.selected?;
        Some(self.tree.as_ref()?.occ(occ).person)
    }

    pub fn set_screen_size(&mut self, width: i32, height: i32) {
        self.viewport.screen_width = width;
        self.viewport.screen_height = height;
        self.calculate();
        self.sync_scene();
    }

    /// Centers the tree on `person`. Returns false when the person is
    /// unknown, incomplete, or hidden.
    pub fn set_center_person(&mut self, person: PersonId) -> bool {
        if self.graph.person(person).is_none() {
            return false;
        }
        let (horz, vert) = self.viewport.centered_scroll();
        self.history.visit(person, horz, vert);
        self.rebuild_tree();
        true
    }

    pub fn back(&mut self) -> bool {
        if self.history.back() {
            self.rebuild_tree();
            true
        } else {
            false
        }
    }

    pub fn forward(&mut self) -> bool {
        if self.history.forward() {
            self.rebuild_tree();
            true
        } else {
            false
        }
    }

    /// Re-centers the current view without touching the history.
    pub fn home(&mut self) -> bool {
        let (horz, vert) = self.viewport.centered_scroll();
        let Some(entry) = self.history.current_mut() else {
            return false;
        };
        entry.horz = horz;
        entry.vert = vert;
        self.calculate();
        self.sync_scene();
        true
    }

    pub fn set_horz(&mut self, pos: i32) -> Scrolled {
        if self.tree.is_none() || self.history.current().is_none() {
            return Scrolled::Unchanged;
        }
        let pos = self.viewport.clamp_horz(pos);
        let cur = self.history.current().map_or(0, |entry| entry.horz);
        if pos == cur {
            return Scrolled::Unchanged;
        }
        if let Some(entry) = self.history.current_mut() {
            entry.horz = pos;
        }
        // Horizontal movement changes which generations are visible, so
        // the whole layout shifts and the vertical position may have
        // become invalid.
        self.calculate();
        let vert = self.history.current().map_or(0, |entry| entry.vert);
        self.apply_vert(vert);
        self.sync_scene();
        Scrolled::Changed
    }

    pub fn set_vert(&mut self, pos: i32) -> Scrolled {
        if self.tree.is_none() || self.history.current().is_none() {
            return Scrolled::Unchanged;
        }
        let scrolled = self.apply_vert(pos);
        if scrolled.changed() {
            self.sync_scene();
        }
        scrolled
    }

    pub fn page_left(&mut self) -> Scrolled {
        // Make the leftmost visible generation the rightmost one.
        match self.generation_width(|tree| tree.leftmost_visible) {
            Some(width) => {
                let amount = self.viewport.screen_width - width;
                self.set_horz(self.cur_horz() - amount)
            }
            None => Scrolled::Unchanged,
        }
    }

    pub fn page_right(&mut self) -> Scrolled {
        match self.generation_width(|tree| tree.rightmost_visible) {
            Some(width) => {
                let amount = self.viewport.screen_width - width;
                self.set_horz(self.cur_horz() + amount)
            }
            None => Scrolled::Unchanged,
        }
    }

    pub fn inc_left(&mut self) -> Scrolled {
        match self.generation_width(|tree| tree.leftmost_visible) {
            Some(width) => self.set_horz(self.cur_horz() - width),
            None => Scrolled::Unchanged,
        }
    }

    pub fn inc_right(&mut self) -> Scrolled {
        match self.generation_width(|tree| tree.rightmost_visible) {
            Some(width) => self.set_horz(self.cur_horz() + width),
            None => Scrolled::Unchanged,
        }
    }

    pub fn page_up(&mut self) -> Scrolled {
        let amount = self.viewport.metrics.vert_page(self.viewport.screen_height);
        self.set_vert(self.cur_vert() - amount)
    }

    pub fn page_down(&mut self) -> Scrolled {
        let amount = self.viewport.metrics.vert_page(self.viewport.screen_height);
        self.set_vert(self.cur_vert() + amount)
    }

    pub fn inc_up(&mut self) -> Scrolled {
        self.set_vert(self.cur_vert() - self.viewport.metrics.vert_inc)
    }

    pub fn inc_down(&mut self) -> Scrolled {
        self.set_vert(self.cur_vert() + self.viewport.metrics.vert_inc)
    }

    pub fn zoom_in(&mut self) {
        self.set_font_size(self.font_size + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) -> bool {
        if self.font_size > MIN_FONT_SIZE {
            self.set_font_size(self.font_size - ZOOM_STEP);
            true
        } else {
            false
        }
    }

    pub fn horz_range(&self) -> ScrollRange {
        ScrollRange {
            min: self.viewport.bounds.horz_min,
            max: self.viewport.bounds.horz_max,
            cur: self.cur_horz(),
        }
    }

    pub fn vert_range(&self) -> ScrollRange {
        ScrollRange {
            min: self.viewport.bounds.vert_min,
            max: self.viewport.bounds.vert_max,
            cur: self.cur_vert(),
        }
    }

    /// The person under a screen point, if any.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<PersonId> {
        self.scene.hit_test(x, y).map(|b| b.person)
    }

    /// Moves the selection to the box under a screen point.
    pub fn select_at(&mut self, x: i32, y: i32) -> Option<PersonId> {
        let (occ, person) = {
            let hit = self.scene.hit_test(x, y)?;
            (hit.occ, hit.person)
        };
        self.selected = Some(occ);
        self.sync_scene();
        Some(person)
    }

    /// Reveals hidden people and rebuilds the current view.
    pub fn show_hidden(&mut self) {
        self.graph.show_hidden();
        self.rebuild();
    }

    /// Rebuilds the tree from the graph, picking up records that arrived
    /// since the last build.
    pub fn rebuild(&mut self) {
        if self.history.current().is_some() {
            self.rebuild_tree();
        }
    }

    /// True when people reachable from the center are missing from the
    /// current tree, i.e. a `rebuild()` would change the picture.
    pub fn needs_rebuild(&self) -> bool {
        let Some(center) = self.center_person() else {
            return true;
        };
        self.descendants_changed(center, 0) || self.ancestors_changed(center, 0)
    }

    fn descendants_changed(&self, person: PersonId, depth: u32) -> bool {
        if !self.in_tree.contains(&person) {
            return true;
        }
        if depth >= self.config.layout.max_generations {
            return false;
        }
        let Some(record) = self.graph.person(person) else {
            return false;
        };
        for &family_id in &record.families {
            let Some(family) = self.graph.family(family_id) else {
                continue;
            };
            if let Some(spouse) = self.graph.spouse_in(record, family)
                && !self.in_tree.contains(&spouse)
            {
                return true;
            }
            for &child in &family.children {
                if self.graph.person(child).is_some() && self.descendants_changed(child, depth + 1)
                {
                    return true;
                }
            }
        }
        false
    }

    fn ancestors_changed(&self, person: PersonId, depth: u32) -> bool {
        if !self.in_tree.contains(&person) {
            return true;
        }
        if depth >= self.config.layout.max_generations {
            return false;
        }
        let Some(record) = self.graph.person(person) else {
            return false;
        };
        for parent in [record.father, record.mother] {
            if let Some((parent, _)) = self.graph.relative(parent)
                && self.ancestors_changed(parent, depth + 1)
            {
                return true;
            }
        }
        false
    }

    fn cur_horz(&self) -> i32 {
        self.history.current().map_or(0, |entry| entry.horz)
    }

    fn cur_vert(&self) -> i32 {
        self.history.current().map_or(0, |entry| entry.vert)
    }

    fn generation_width(&self, pick: impl Fn(&LayoutTree) -> Option<crate::layout::GenId>) -> Option<i32> {
        let tree = self.tree.as_ref()?;
        let gen_id = pick(tree)?;
        Some(tree.generation(gen_id).width)
    }

    fn apply_vert(&mut self, pos: i32) -> Scrolled {
        let pos = self.viewport.clamp_vert(pos);
        let Some(entry) = self.history.current_mut() else {
            return Scrolled::Unchanged;
        };
        if pos == entry.vert {
            Scrolled::Unchanged
        } else {
            entry.vert = pos;
            Scrolled::Changed
        }
    }

    fn set_font_size(&mut self, size: i32) {
        self.font_size = size;
        self.typesetter = Typesetter::new(
            &self.config.layout.font_family,
            size,
            self.config.layout.use_system_fonts,
        );
        debug!(font_size = size, "tree font changed");
        self.calculate();
        self.sync_scene();
    }

    fn rebuild_tree(&mut self) {
        let Some(entry) = self.history.current().copied() else {
            self.tree = None;
            self.selected = None;
            self.in_tree.clear();
            self.sync_scene();
            return;
        };
        self.tree = layout::build_tree(
            &self.graph,
            entry.person,
            self.config.layout.max_generations,
        );
        self.selected = self.tree.as_ref().map(|tree| tree.center);
        self.in_tree = self
            .tree
            .as_ref()
            .map(|tree| tree.occurrences.iter().map(|occ| occ.person).collect())
            .unwrap_or_default();
        self.calculate();
        self.sync_scene();
    }

    fn calculate(&mut self) {
        let Some(entry) = self.history.current().copied() else {
            return;
        };
        if let Some(tree) = self.tree.as_mut() {
            layout::compute_layout(
                tree,
                &self.graph,
                &self.typesetter,
                self.config.layout.box_border_width,
                &mut self.viewport,
                entry.horz,
            );
        }
    }

    fn sync_scene(&mut self) {
        self.scene = match (self.tree.as_mut(), self.history.current()) {
            (Some(tree), Some(entry)) => layout::build_scene(
                tree,
                &self.graph,
                &self.viewport,
                (entry.horz, entry.vert),
                self.selected,
            ),
            _ => Scene::empty(self.viewport.screen_width, self.viewport.screen_height),
        };
    }
}
