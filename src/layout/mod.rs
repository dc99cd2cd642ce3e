//! Pedigree tree layout.
//!
//! The pipeline per pass: measure boxes, size columns (pass 1), place
//! vertically, then size columns again with drop-line collision offsets
//! (pass 2). Pass 2 can shift columns slightly without re-running the
//! vertical pass; the alternative is a fixed-point iteration that is not
//! worth its cost for the rare case it improves.

pub mod dimensions;
pub mod position;
pub mod scene;
pub mod spacing;
pub mod tree;
pub mod types;

pub use scene::{Connector, Scene, SceneBox, SpouseLink, Stub, build_scene};
pub use tree::build as build_tree;
pub use types::{Bounds, GenId, LayoutTree, OccId, Occurrence, Rect, Side};

use crate::ir::PersonGraph;
use crate::text_metrics::Typesetter;
use crate::viewport::{Metrics, ViewportState};
use tracing::debug;

/// Runs a full layout over an already-built tree, updating the
/// viewport's metrics and content bounds for the given horizontal
/// scroll.
pub fn compute_layout(
    tree: &mut LayoutTree,
    graph: &PersonGraph,
    typesetter: &Typesetter,
    box_border_width: i32,
    viewport: &mut ViewportState,
    horz_scroll: i32,
) {
    viewport.metrics = Metrics::from_char_cell(typesetter.char_width(), typesetter.line_height());
    let metrics = viewport.metrics;

    dimensions::measure_boxes(tree, graph, typesetter, box_border_width);

    let mut bounds = Bounds::default();
    let (horz_min, horz_max) = dimensions::horizontal_pass(tree, &metrics, false);
    bounds.horz_min = horz_min;
    bounds.horz_max = horz_max;

    position::vertical_pass(
        tree,
        &metrics,
        horz_scroll,
        viewport.screen_width,
        &mut bounds,
    );

    let (horz_min, horz_max) = dimensions::horizontal_pass(tree, &metrics, true);
    bounds.horz_min = horz_min;
    bounds.horz_max = horz_max;

    viewport.bounds = bounds;
    debug!(
        horz_min = bounds.horz_min,
        horz_max = bounds.horz_max,
        vert_min = bounds.vert_min,
        vert_max = bounds.vert_max,
        occurrences = tree.occurrences.len(),
        "layout pass complete"
    );
}
