//! Bottom-up vertical space accounting.
//!
//! Each occurrence claims the larger of two heights: its own box stacked
//! with its spouses, or the sum of all its children's claims. Generations
//! scrolled off screen claim nothing, which compacts the remainder.
//! X positions fall out of this walk too, from the column geometry the
//! first horizontal pass produced.

use crate::layout::types::{LayoutTree, OccId, Side};
use crate::viewport::Metrics;

/// Computes the space claim of the center person's whole descendant tree.
pub fn descendant_spacing(tree: &mut LayoutTree, metrics: &Metrics, horz_scroll: i32) -> i32 {
    let center = tree.center;
    claim_descendant(tree, center, metrics, horz_scroll)
}

fn claim_descendant(
    tree: &mut LayoutTree,
    occ: OccId,
    metrics: &Metrics,
    horz_scroll: i32,
) -> i32 {
    let gen_id = tree.occ(occ).gen_id;
    debug_assert_eq!(gen_id.side, Side::Descendant);
    let generation = tree.generation(gen_id);
    let x = generation.left_x + generation.max_line_offset + metrics.trunk_len;
    let visible = generation.visible_as_descendant(horz_scroll);
    tree.occ_mut(occ).set_x(x);

    if !visible {
        let entry = tree.occ_mut(occ);
        entry.spouses_height = 0;
        entry.children_height = 0;
        entry.cumulative_height = 0;
        return 0;
    }

    let mut spouses_height = tree.occ(occ).rect.height + metrics.vert_space;
    let mut children_height = 0;

    let children = tree.occ(occ).children.clone();
    for child in children {
        children_height += claim_descendant(tree, child, metrics, horz_scroll);
    }

    let spouses = tree.occ(occ).spouses.clone();
    for spouse in spouses {
        tree.occ_mut(spouse).set_x(x);
        spouses_height += tree.occ(spouse).rect.height + metrics.vert_spouse_space;
        let children = tree.occ(spouse).children.clone();
        for child in children {
            children_height += claim_descendant(tree, child, metrics, horz_scroll);
        }
    }

    let cumulative = spouses_height.max(children_height);
    let entry = tree.occ_mut(occ);
    entry.spouses_height = spouses_height;
    entry.children_height = children_height;
    entry.cumulative_height = cumulative;
    cumulative
}

/// Computes the space claim of one ancestor line. Parents count only
/// while their generation is on screen; a box with no counted parents
/// claims its own height.
pub fn ancestor_spacing(
    tree: &mut LayoutTree,
    occ: OccId,
    metrics: &Metrics,
    horz_scroll: i32,
    screen_width: i32,
) -> i32 {
    let gen_id = tree.occ(occ).gen_id;
    debug_assert_eq!(gen_id.side, Side::Ancestor);

    let mut cumulative = 0;
    if tree.next_generation(gen_id).is_some() {
        let (father, mother) = {
            let entry = tree.occ(occ);
            (entry.father, entry.mother)
        };
        for parent in [father, mother].into_iter().flatten() {
            let parent_gen = tree.occ(parent).gen_id;
            if tree
                .generation(parent_gen)
                .visible_as_ancestor(horz_scroll, screen_width)
            {
                cumulative += ancestor_spacing(tree, parent, metrics, horz_scroll, screen_width);
            }
        }
    }

    if cumulative == 0 {
        cumulative = tree.occ(occ).rect.height + metrics.vert_space;
    }
    tree.occ_mut(occ).cumulative_height = cumulative;
    cumulative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PersonId;
    use crate::layout::types::{GenId, Generation, Occurrence};

    fn metrics() -> Metrics {
        Metrics::from_char_cell(5, 12)
    }

    fn occ(person: u32, side: Side, index: usize, height: i32) -> Occurrence {
        let mut occ = Occurrence::new(PersonId(person), GenId { side, index });
        occ.rect.width = 40;
        occ.rect.height = height;
        occ
    }

    fn descendant_fixture() -> LayoutTree {
        // Center (h 34) + spouse (h 34); spouse has two children (h 34,
        // h 22) and the second child has a child of its own (h 22).
        let mut center = occ(0, Side::Descendant, 0, 34);
        let mut spouse = occ(1, Side::Descendant, 0, 34);
        let child_a = occ(2, Side::Descendant, 1, 34);
        let mut child_b = occ(3, Side::Descendant, 1, 22);
        let grandchild = occ(4, Side::Descendant, 2, 22);
        center.spouses = vec![OccId(1)];
        spouse.children = vec![OccId(2), OccId(3)];
        child_b.children = vec![OccId(4)];

        let mut gen0 = Generation::new(Side::Descendant);
        gen0.members = vec![OccId(0)];
        gen0.left_x = -40;
        gen0.width = 80;
        let mut gen1 = Generation::new(Side::Descendant);
        gen1.members = vec![OccId(2), OccId(3)];
        gen1.left_x = -104;
        gen1.width = 64;
        let mut gen2 = Generation::new(Side::Descendant);
        gen2.members = vec![OccId(4)];
        gen2.left_x = -168;
        gen2.width = 64;

        LayoutTree {
            occurrences: vec![center, spouse, child_a, child_b, grandchild],
            descendant_gens: vec![gen0, gen1, gen2],
            ancestor_gens: Vec::new(),
            center: OccId(0),
            leftmost_visible: None,
            rightmost_visible: None,
        }
    }

    #[test]
    fn leaf_claims_box_height_plus_gap() {
        let mut tree = descendant_fixture();
        let m = metrics();
        descendant_spacing(&mut tree, &m, -400);
        // Leaf grandchild: 22 + 24.
        assert_eq!(tree.occ(OccId(4)).cumulative_height, 46);
        // child_a leaf: 34 + 24.
        assert_eq!(tree.occ(OccId(2)).cumulative_height, 58);
    }

    #[test]
    fn claim_is_max_of_couple_and_children() {
        let mut tree = descendant_fixture();
        let m = metrics();
        let total = descendant_spacing(&mut tree, &m, -400);
        // child_b: own 22+24 = 46 vs grandchild 46: equal.
        assert_eq!(tree.occ(OccId(3)).cumulative_height, 46);
        // Center couple: 34+24 + 34+12 = 104; children: 58 + 46 = 104.
        let center = tree.occ(OccId(0));
        assert_eq!(center.spouses_height, 104);
        assert_eq!(center.children_height, 104);
        assert_eq!(total, 104);
    }

    #[test]
    fn x_positions_come_from_the_column() {
        let mut tree = descendant_fixture();
        let m = metrics();
        descendant_spacing(&mut tree, &m, -400);
        // left_x + max_line_offset + trunk_len.
        assert_eq!(tree.occ(OccId(0)).rect.x, -40 + 10);
        assert_eq!(tree.occ(OccId(1)).rect.x, -30);
        assert_eq!(tree.occ(OccId(2)).rect.x, -104 + 10);
    }

    #[test]
    fn off_screen_generations_claim_nothing() {
        let mut tree = descendant_fixture();
        let m = metrics();
        // Scroll far right: gen2 ends at -104, so with scroll -103 it is
        // off the left screen edge.
        descendant_spacing(&mut tree, &m, -103);
        assert_eq!(tree.occ(OccId(4)).cumulative_height, 0);
        // child_b now claims only its couple height.
        assert_eq!(tree.occ(OccId(3)).cumulative_height, 46);
    }

    #[test]
    fn ancestor_claim_sums_visible_parents() {
        // Center -> father/mother -> father's father.
        let mut center = occ(0, Side::Descendant, 0, 34);
        let mut father = occ(1, Side::Ancestor, 0, 34);
        let mother = occ(2, Side::Ancestor, 0, 22);
        let grandpa = occ(3, Side::Ancestor, 1, 22);
        center.father = Some(OccId(1));
        center.mother = Some(OccId(2));
        father.father = Some(OccId(3));

        let mut center_gen = Generation::new(Side::Descendant);
        center_gen.members = vec![OccId(0)];
        let mut gen0 = Generation::new(Side::Ancestor);
        gen0.members = vec![OccId(1), OccId(2)];
        gen0.left_x = 20;
        gen0.width = 70;
        let mut gen1 = Generation::new(Side::Ancestor);
        gen1.members = vec![OccId(3)];
        gen1.left_x = 90;
        gen1.width = 50;

        let mut tree = LayoutTree {
            occurrences: vec![center, father, mother, grandpa],
            descendant_gens: vec![center_gen],
            ancestor_gens: vec![gen0, gen1],
            center: OccId(0),
            leftmost_visible: None,
            rightmost_visible: None,
        };
        let m = metrics();
        let father_claim = ancestor_spacing(&mut tree, OccId(1), &m, -400, 800);
        let mother_claim = ancestor_spacing(&mut tree, OccId(2), &m, -400, 800);
        // Father inherits grandpa's claim (22+24); mother is a leaf line.
        assert_eq!(father_claim, 46);
        assert_eq!(mother_claim, 46);

        // Push the grandparent column off the right edge: the father
        // line falls back to its own height.
        let father_claim = ancestor_spacing(&mut tree, OccId(1), &m, -711, 800);
        assert_eq!(father_claim, 34 + 24);
    }
}
