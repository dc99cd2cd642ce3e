//! Top-down vertical placement.
//!
//! Hands each occurrence the top of the band its space claim reserved,
//! centers the smaller of couple-versus-children within it, and stacks
//! recursively. Folds every placed box into the vertical bounds and
//! tracks the outermost visible generations for paging.

use crate::layout::spacing;
use crate::layout::types::{Bounds, GenId, LayoutTree, OccId};
use crate::viewport::Metrics;

/// Runs the whole vertical pass: space claims, then placement of the
/// descendant tree and both ancestor lines around the origin.
pub fn vertical_pass(
    tree: &mut LayoutTree,
    metrics: &Metrics,
    horz_scroll: i32,
    screen_width: i32,
    bounds: &mut Bounds,
) {
    bounds.vert_min = 0;
    bounds.vert_max = 0;
    tree.leftmost_visible = None;
    tree.rightmost_visible = None;

    let child_height = spacing::descendant_spacing(tree, metrics, horz_scroll);
    descendant_y(
        tree,
        tree.center,
        -(child_height / 2),
        metrics,
        horz_scroll,
        screen_width,
        bounds,
    );

    if tree.ancestor_gens.is_empty() {
        return;
    }
    let (father, mother) = {
        let center = tree.occ(tree.center);
        (center.father, center.mother)
    };
    let mut parent_height = 0;
    if let Some(father) = father {
        parent_height += spacing::ancestor_spacing(tree, father, metrics, horz_scroll, screen_width);
    }
    if let Some(mother) = mother {
        parent_height += spacing::ancestor_spacing(tree, mother, metrics, horz_scroll, screen_width);
    }
    let mut parent_y = -(parent_height / 2);
    if let Some(father) = father {
        parent_y += ancestor_y(
            tree,
            father,
            parent_y,
            metrics,
            horz_scroll,
            screen_width,
            bounds,
        );
    }
    if let Some(mother) = mother {
        ancestor_y(
            tree,
            mother,
            parent_y,
            metrics,
            horz_scroll,
            screen_width,
            bounds,
        );
    }
}

fn place_y(tree: &mut LayoutTree, occ: OccId, top_y: i32, metrics: &Metrics, bounds: &mut Bounds) {
    let height = tree.occ(occ).rect.height;
    tree.occ_mut(occ).set_y(top_y);
    bounds.include_box(top_y, height, metrics.vert_space);
}

fn note_leftmost(tree: &mut LayoutTree, gen_id: GenId) {
    let left_x = tree.generation(gen_id).left_x;
    let beats = tree
        .leftmost_visible
        .map_or(true, |cur| left_x < tree.generation(cur).left_x);
    if beats {
        tree.leftmost_visible = Some(gen_id);
    }
}

fn note_rightmost(tree: &mut LayoutTree, gen_id: GenId) {
    let left_x = tree.generation(gen_id).left_x;
    let beats = tree
        .rightmost_visible
        .map_or(true, |cur| left_x > tree.generation(cur).left_x);
    if beats {
        tree.rightmost_visible = Some(gen_id);
    }
}

/// Places one descendant block (a person, their spouses, and all their
/// children) into the band starting at `top_y`. Returns the band height.
fn descendant_y(
    tree: &mut LayoutTree,
    occ: OccId,
    top_y: i32,
    metrics: &Metrics,
    horz_scroll: i32,
    screen_width: i32,
    bounds: &mut Bounds,
) -> i32 {
    let (gen_id, spouses_height, children_height, cumulative) = {
        let entry = tree.occ(occ);
        (
            entry.gen_id,
            entry.spouses_height,
            entry.children_height,
            entry.cumulative_height,
        )
    };

    // Center the smaller side of the block within the band.
    let (own_y, mut child_y);
    if children_height < spouses_height {
        own_y = top_y + metrics.vert_space / 2;
        child_y = top_y + (spouses_height - children_height) / 2;
    } else {
        own_y = top_y + (children_height - spouses_height + metrics.vert_space) / 2;
        child_y = top_y;
    }
    place_y(tree, occ, own_y, metrics, bounds);
    let mut spouse_y = own_y;

    let draw_children = tree
        .next_generation(gen_id)
        .is_some_and(|next| tree.generation(next).visible_as_descendant(horz_scroll));

    note_leftmost(tree, gen_id);

    if draw_children {
        let children = tree.occ(occ).children.clone();
        for child in children {
            child_y += descendant_y(
                tree,
                child,
                child_y,
                metrics,
                horz_scroll,
                screen_width,
                bounds,
            );
        }
    }

    let spouses = tree.occ(occ).spouses.clone();
    let mut prev = occ;
    for spouse in spouses {
        spouse_y += tree.occ(prev).rect.height + metrics.vert_spouse_space;
        place_y(tree, spouse, spouse_y, metrics, bounds);
        prev = spouse;

        if draw_children {
            let children = tree.occ(spouse).children.clone();
            for child in children {
                child_y += descendant_y(
                    tree,
                    child,
                    child_y,
                    metrics,
                    horz_scroll,
                    screen_width,
                    bounds,
                );
            }
        }
    }

    // After the recursion, so nearer-center columns win the tie.
    if tree
        .generation(gen_id)
        .visible_as_ancestor(horz_scroll, screen_width)
    {
        note_rightmost(tree, gen_id);
    }

    cumulative
}

/// Places one ancestor box centered in its claimed band, then its
/// parents above and below. Returns the band height.
fn ancestor_y(
    tree: &mut LayoutTree,
    occ: OccId,
    top_y: i32,
    metrics: &Metrics,
    horz_scroll: i32,
    screen_width: i32,
    bounds: &mut Bounds,
) -> i32 {
    let (gen_id, cumulative, height) = {
        let entry = tree.occ(occ);
        (entry.gen_id, entry.cumulative_height, entry.rect.height)
    };
    place_y(tree, occ, top_y + (cumulative - height) / 2, metrics, bounds);

    note_rightmost(tree, gen_id);

    let (father, mother) = {
        let entry = tree.occ(occ);
        (entry.father, entry.mother)
    };
    let mut parent_y = top_y;
    for parent in [father, mother].into_iter().flatten() {
        let parent_gen = tree.occ(parent).gen_id;
        if tree
            .generation(parent_gen)
            .visible_as_ancestor(horz_scroll, screen_width)
        {
            parent_y += ancestor_y(
                tree,
                parent,
                parent_y,
                metrics,
                horz_scroll,
                screen_width,
                bounds,
            );
        }
    }

    if tree.generation(gen_id).visible_as_descendant(horz_scroll) {
        note_leftmost(tree, gen_id);
    }

    cumulative
}
