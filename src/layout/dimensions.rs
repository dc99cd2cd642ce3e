//! Horizontal sizing: per-box measurement and per-generation column
//! widths.
//!
//! The column pass runs twice per layout. The first run knows no Y
//! positions and just sizes columns, which decides generation visibility.
//! After vertical placement the second run additionally detects spouse
//! connector drop lines that would overlap (all of a spouse's children
//! pushed far above or far below them by another spouse's children) and
//! widens the column to give each such line its own offset. Columns may
//! shift a little left as a result; that is accepted rather than
//! iterating to a fixed point.

use crate::ir::PersonGraph;
use crate::layout::types::{LayoutTree, OccId, SELECTION_BORDER_WIDTH};
use crate::text_metrics::Typesetter;
use crate::viewport::Metrics;

/// Sets every occurrence's natural box size from the person's name and
/// life dates.
pub fn measure_boxes(tree: &mut LayoutTree, graph: &PersonGraph, ts: &Typesetter, border: i32) {
    let chrome_w = 2 * border + 2 + 2 * SELECTION_BORDER_WIDTH;
    let chrome_h = 2 * border + 2 * SELECTION_BORDER_WIDTH;
    for occ in &mut tree.occurrences {
        let (text_width, lines) = match graph.person(occ.person) {
            Some(record) => {
                let name_width = ts.text_width(&record.full_name);
                match &record.life_dates {
                    Some(dates) => (name_width.max(ts.text_width(dates)), 2),
                    None => (name_width, 1),
                }
            }
            // A record that vanished mid-session still gets an empty
            // one-line box.
            None => (0, 1),
        };
        occ.rect.width = text_width + chrome_w;
        occ.rect.height = lines * ts.line_height() + chrome_h;
    }
}

/// Sizes and places every generation column. Returns the horizontal tree
/// extent `(horz_min, horz_max)`.
pub fn horizontal_pass(
    tree: &mut LayoutTree,
    metrics: &Metrics,
    with_line_offsets: bool,
) -> (i32, i32) {
    let mut horz_min = 0;
    let mut is_first = true;
    for index in 0..tree.descendant_gens.len() {
        horz_min = descendant_column(tree, index, is_first, with_line_offsets, horz_min, metrics);
        is_first = false;
    }

    let mut horz_max = 0;
    if let Some(center_gen) = tree.descendant_gens.first() {
        horz_max = center_gen.left_x + center_gen.width;
    }
    for index in 0..tree.ancestor_gens.len() {
        horz_max = ancestor_column(tree, index, horz_max, metrics);
    }
    (horz_min, horz_max)
}

/// Sizes one descendant column. Takes the previous column's `left_x`
/// (the side nearest the center) and returns this column's own.
fn descendant_column(
    tree: &mut LayoutTree,
    index: usize,
    is_first: bool,
    with_line_offsets: bool,
    left_x: i32,
    metrics: &Metrics,
) -> i32 {
    let members = tree.descendant_gens[index].members.clone();
    let mut width = 0;
    let mut min_width = i32::MAX;
    let mut max_offset_count = 0usize;

    for &member in &members {
        let member_width = tree.occ(member).rect.width;
        width = width.max(member_width);
        min_width = min_width.min(member_width);

        let spouses = tree.occ(member).spouses.clone();
        let mut pushed_above: Vec<OccId> = Vec::new();
        let mut pushed_below: Vec<OccId> = Vec::new();

        for &spouse in &spouses {
            let spouse_width = tree.occ(spouse).rect.width;
            width = width.max(spouse_width);
            min_width = min_width.min(spouse_width);
            tree.occ_mut(spouse).child_line_offset = 0;

            if with_line_offsets {
                let spouse_y = tree.occ(spouse).rect.y;
                let mut child_above = false;
                let mut child_below = false;
                let mut child_even = false;
                for &child in &tree.occ(spouse).children {
                    let child_y = tree.occ(child).rect.y;
                    if child_y < spouse_y - metrics.vert_space {
                        child_above = true;
                    } else if child_y > spouse_y + metrics.vert_space {
                        child_below = true;
                    } else {
                        child_even = true;
                    }
                }
                // A spouse level with any child, or pulled both ways,
                // keeps a straight drop line.
                if !child_even {
                    if child_above && !child_below {
                        pushed_above.push(spouse);
                    } else if child_below && !child_above {
                        pushed_below.push(spouse);
                    }
                }
            }
        }

        if with_line_offsets {
            max_offset_count = max_offset_count.max(pushed_above.len().max(pushed_below.len()));
            // Last spouse found gets the largest offset.
            for stack in [&pushed_above, &pushed_below] {
                let mut offset = stack.len() as i32 * metrics.line_offset;
                for &spouse in stack.iter().rev() {
                    tree.occ_mut(spouse).child_line_offset = offset;
                    offset -= metrics.line_offset;
                }
            }
        }
    }

    // All boxes in a column share the column width.
    for &member in &members {
        tree.occ_mut(member).rect.width = width;
        let spouses = tree.occ(member).spouses.clone();
        for spouse in spouses {
            tree.occ_mut(spouse).rect.width = width;
        }
    }

    let max_line_offset = max_offset_count as i32 * metrics.line_offset;
    let generation = &mut tree.descendant_gens[index];
    generation.max_line_offset = max_line_offset;
    generation.width = width + max_line_offset + metrics.horz_space;
    generation.left_x = if is_first {
        left_x - generation.width / 2
    } else {
        left_x - generation.width
    };
    generation.spouse_line_x_offset = if min_width == i32::MAX {
        0
    } else {
        min_width / 2
    };
    generation.left_x
}

/// Sizes one ancestor column. Takes the column's own `left_x` and
/// returns the next column's (the side away from the center).
fn ancestor_column(tree: &mut LayoutTree, index: usize, left_x: i32, metrics: &Metrics) -> i32 {
    let members = tree.ancestor_gens[index].members.clone();
    let mut width = 0;
    for &member in &members {
        let occ = tree.occ_mut(member);
        occ.set_x(left_x + metrics.trunk_len);
        occ.child_line_offset = 0;
        width = width.max(occ.rect.width);
    }
    for &member in &members {
        tree.occ_mut(member).rect.width = width;
    }

    let generation = &mut tree.ancestor_gens[index];
    generation.left_x = left_x;
    generation.max_line_offset = 0;
    generation.width = width + metrics.horz_space;
    left_x + generation.width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PersonId;
    use crate::layout::types::{GenId, Generation, Occurrence, Side};

    fn metrics() -> Metrics {
        Metrics::from_char_cell(5, 12)
    }

    fn gen_id(side: Side, index: usize) -> GenId {
        GenId { side, index }
    }

    fn occ(person: u32, gen_id: GenId, width: i32, height: i32, y: i32) -> Occurrence {
        let mut occ = Occurrence::new(PersonId(person), gen_id);
        occ.rect.width = width;
        occ.rect.height = height;
        occ.rect.y = y;
        occ
    }

    /// Center person with two spouses; each spouse has one child whose
    /// block was pushed far above the spouse by the other's children.
    fn two_spouse_tree() -> LayoutTree {
        let g0 = gen_id(Side::Descendant, 0);
        let g1 = gen_id(Side::Descendant, 1);
        let mut owner = occ(0, g0, 60, 34, 0);
        let mut spouse_a = occ(1, g0, 50, 34, 46);
        let mut spouse_b = occ(2, g0, 40, 34, 92);
        let child_a = occ(3, g1, 44, 34, -100);
        let child_b = occ(4, g1, 44, 34, 10);
        owner.spouses = vec![OccId(1), OccId(2)];
        spouse_a.children = vec![OccId(3)];
        spouse_b.children = vec![OccId(4)];

        let mut gen0 = Generation::new(Side::Descendant);
        gen0.members = vec![OccId(0)];
        let mut gen1 = Generation::new(Side::Descendant);
        gen1.members = vec![OccId(3), OccId(4)];

        LayoutTree {
            occurrences: vec![owner, spouse_a, spouse_b, child_a, child_b],
            descendant_gens: vec![gen0, gen1],
            ancestor_gens: Vec::new(),
            center: OccId(0),
            leftmost_visible: None,
            rightmost_visible: None,
        }
    }

    #[test]
    fn first_column_is_centered_and_uniform() {
        let mut tree = two_spouse_tree();
        let (horz_min, _) = horizontal_pass(&mut tree, &metrics(), false);
        let gen0 = &tree.descendant_gens[0];
        // Widest box 60 plus column padding 20.
        assert_eq!(gen0.width, 80);
        assert_eq!(gen0.left_x, -40);
        assert_eq!(gen0.spouse_line_x_offset, 20);
        for id in [OccId(0), OccId(1), OccId(2)] {
            assert_eq!(tree.occ(id).rect.width, 60);
        }
        // Second column hangs left of the first.
        assert_eq!(tree.descendant_gens[1].left_x, -40 - 64);
        assert_eq!(horz_min, -104);
    }

    #[test]
    fn pass_one_assigns_no_drop_line_offsets() {
        let mut tree = two_spouse_tree();
        horizontal_pass(&mut tree, &metrics(), false);
        assert_eq!(tree.descendant_gens[0].max_line_offset, 0);
        assert_eq!(tree.occ(OccId(1)).child_line_offset, 0);
        assert_eq!(tree.occ(OccId(2)).child_line_offset, 0);
    }

    #[test]
    fn spouses_pushed_the_same_way_get_distinct_offsets() {
        let mut tree = two_spouse_tree();
        // spouse_b at y=92 with its child at y=10: 10 < 92 - 24, so both
        // spouses' children sit far above them.
        let m = metrics();
        let (_, _) = horizontal_pass(&mut tree, &m, false);
        let plain_width = tree.descendant_gens[0].width;
        horizontal_pass(&mut tree, &m, true);
        // Later spouse gets the larger offset.
        assert_eq!(tree.occ(OccId(1)).child_line_offset, m.line_offset);
        assert_eq!(tree.occ(OccId(2)).child_line_offset, 2 * m.line_offset);
        let gen0 = &tree.descendant_gens[0];
        assert_eq!(gen0.max_line_offset, 2 * m.line_offset);
        assert_eq!(gen0.width, plain_width + 2 * m.line_offset);
    }

    #[test]
    fn spouses_pushed_opposite_ways_each_get_one_offset() {
        let mut tree = two_spouse_tree();
        // spouse_a's child stays far above it; push spouse_b's child far
        // below. The above and below stacks are counted separately, so a
        // lone pushed spouse on each side still gets a one-step offset.
        tree.occ_mut(OccId(4)).rect.y = 200;
        let m = metrics();
        horizontal_pass(&mut tree, &m, false);
        let plain_width = tree.descendant_gens[0].width;
        horizontal_pass(&mut tree, &m, true);
        assert_eq!(tree.occ(OccId(1)).child_line_offset, m.line_offset);
        assert_eq!(tree.occ(OccId(2)).child_line_offset, m.line_offset);
        let gen0 = &tree.descendant_gens[0];
        assert_eq!(gen0.max_line_offset, m.line_offset);
        assert_eq!(gen0.width, plain_width + m.line_offset);
    }

    #[test]
    fn level_children_suppress_the_offset() {
        let mut tree = two_spouse_tree();
        // Put spouse_a's child level with spouse_a: no offset for either
        // side of that couple.
        tree.occ_mut(OccId(3)).rect.y = 40;
        let m = metrics();
        horizontal_pass(&mut tree, &m, true);
        assert_eq!(tree.occ(OccId(1)).child_line_offset, 0);
        // spouse_b's child is still far above it.
        assert_eq!(tree.occ(OccId(2)).child_line_offset, m.line_offset);
        assert_eq!(tree.descendant_gens[0].max_line_offset, m.line_offset);
    }

    #[test]
    fn children_on_both_sides_suppress_the_offset() {
        let mut tree = two_spouse_tree();
        tree.occ_mut(OccId(1)).children = vec![OccId(3), OccId(4)];
        tree.occ_mut(OccId(2)).children = Vec::new();
        // child_a far above spouse_a, child_b far below.
        tree.occ_mut(OccId(4)).rect.y = 200;
        let m = metrics();
        horizontal_pass(&mut tree, &m, true);
        assert_eq!(tree.occ(OccId(1)).child_line_offset, 0);
        assert_eq!(tree.descendant_gens[0].max_line_offset, 0);
    }

    #[test]
    fn ancestor_columns_grow_rightward() {
        let g0 = gen_id(Side::Ancestor, 0);
        let g1 = gen_id(Side::Ancestor, 1);
        let father = occ(1, g0, 50, 34, 0);
        let mother = occ(2, g0, 40, 34, 60);
        let grandpa = occ(3, g1, 30, 34, 0);
        let mut gen0 = Generation::new(Side::Ancestor);
        gen0.members = vec![OccId(1), OccId(2)];
        let mut gen1 = Generation::new(Side::Ancestor);
        gen1.members = vec![OccId(3)];
        let mut center = occ(0, gen_id(Side::Descendant, 0), 20, 34, 0);
        center.father = Some(OccId(1));
        center.mother = Some(OccId(2));
        let mut center_gen = Generation::new(Side::Descendant);
        center_gen.members = vec![OccId(0)];
        let mut tree = LayoutTree {
            occurrences: vec![center, father, mother, grandpa],
            descendant_gens: vec![center_gen],
            ancestor_gens: vec![gen0, gen1],
            center: OccId(0),
            leftmost_visible: None,
            rightmost_visible: None,
        };

        let m = metrics();
        let (_, horz_max) = horizontal_pass(&mut tree, &m, false);
        // Center column: width 20 + 20 padding, centered on the origin.
        assert_eq!(tree.descendant_gens[0].left_x, -20);
        // First ancestor column starts at the center column's right edge.
        assert_eq!(tree.ancestor_gens[0].left_x, 20);
        assert_eq!(tree.occ(OccId(1)).rect.x, 20 + m.trunk_len);
        assert_eq!(tree.occ(OccId(1)).rect.width, 50);
        assert_eq!(tree.occ(OccId(2)).rect.width, 50);
        // 20 + (50 + 20) + (30 + 20).
        assert_eq!(tree.ancestor_gens[1].left_x, 90);
        assert_eq!(horz_max, 140);
    }
}
