//! Arena types for a laid-out pedigree tree.
//!
//! A person can appear in more than one place at a time (remarriage into
//! the same line, cousin unions), so placement data lives on per-path
//! `Occurrence` values rather than on the person records themselves.
//! Occurrences reference each other by arena index.

use crate::ir::PersonId;

/// Index of an occurrence in the layout arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OccId(pub usize);

/// Which side of the center column a generation extends toward.
/// Descendants run left, ancestors run right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Descendant,
    Ancestor,
}

/// Identifies a generation column: a side plus the distance from the
/// center column on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenId {
    pub side: Side,
    pub index: usize,
}

/// Extra frame drawn around the selected box; part of every box's size so
/// selecting never reflows the tree.
pub const SELECTION_BORDER_WIDTH: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Edge-inclusive point test.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// One placement of one person. Tree coordinates, origin at the center
/// point of the layout.
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub person: PersonId,
    pub gen_id: GenId,
    pub rect: Rect,
    /// Children hanging off this occurrence. For a married couple the
    /// children hang off the spouse occurrence; only when the spouse is
    /// unknown do they hang off the owner directly.
    pub children: Vec<OccId>,
    /// Spouse occurrences stacked below this one, in family order.
    pub spouses: Vec<OccId>,
    pub father: Option<OccId>,
    pub mother: Option<OccId>,
    /// Horizontal nudge for this occurrence's child-connector drop line,
    /// assigned by the collision pass.
    pub child_line_offset: i32,
    /// Vertical space claimed by this occurrence and everything below it.
    pub cumulative_height: i32,
    pub spouses_height: i32,
    pub children_height: i32,
}

impl Occurrence {
    pub fn new(person: PersonId, gen_id: GenId) -> Self {
        Self {
            person,
            gen_id,
            rect: Rect::default(),
            children: Vec::new(),
            spouses: Vec::new(),
            father: None,
            mother: None,
            child_line_offset: 0,
            cumulative_height: 0,
            spouses_height: 0,
            children_height: 0,
        }
    }

    pub fn set_x(&mut self, left_x: i32) {
        self.rect.x = left_x;
    }

    pub fn set_y(&mut self, top_y: i32) {
        self.rect.y = top_y;
    }

    /// Connector attachment points, midway along each edge.
    pub fn left_anchor(&self) -> (i32, i32) {
        (self.rect.x, self.rect.y + self.rect.height / 2)
    }

    pub fn right_anchor(&self) -> (i32, i32) {
        (self.rect.right(), self.rect.y + self.rect.height / 2)
    }

    pub fn top_anchor(&self) -> (i32, i32) {
        (self.rect.x + self.rect.width / 2, self.rect.y)
    }

    pub fn bottom_anchor(&self) -> (i32, i32) {
        (self.rect.x + self.rect.width / 2, self.rect.bottom())
    }
}

/// One vertical column of the tree.
#[derive(Debug, Clone)]
pub struct Generation {
    pub side: Side,
    /// Primary members only; spouse occurrences are reached through their
    /// owner and share the owner's column.
    pub members: Vec<OccId>,
    /// Column width including connector offsets and inter-column space.
    pub width: i32,
    /// X of the column's left edge, tree coordinates.
    pub left_x: i32,
    /// Where the spouse joining line sits within a box of this column.
    pub spouse_line_x_offset: i32,
    /// Total width reserved for offset child-connector drop lines.
    pub max_line_offset: i32,
}

impl Generation {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            members: Vec::new(),
            width: 0,
            left_x: 0,
            spouse_line_x_offset: 0,
            max_line_offset: 0,
        }
    }

    /// A descendant column is drawn while any part of it is right of the
    /// screen's left edge.
    pub fn visible_as_descendant(&self, horz_scroll: i32) -> bool {
        self.left_x + self.width - horz_scroll >= 0
    }

    /// An ancestor column is drawn while its left edge is left of the
    /// screen's right edge.
    pub fn visible_as_ancestor(&self, horz_scroll: i32, screen_width: i32) -> bool {
        self.left_x - horz_scroll <= screen_width
    }
}

/// The layout arena: every occurrence of the current tree plus the two
/// generation chains, ordered center-outward.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    pub occurrences: Vec<Occurrence>,
    pub descendant_gens: Vec<Generation>,
    pub ancestor_gens: Vec<Generation>,
    pub center: OccId,
    /// Visible-column extremes found during the last vertical pass; these
    /// drive paging amounts.
    pub leftmost_visible: Option<GenId>,
    pub rightmost_visible: Option<GenId>,
}

impl LayoutTree {
    pub fn occ(&self, id: OccId) -> &Occurrence {
        &self.occurrences[id.0]
    }

    pub fn occ_mut(&mut self, id: OccId) -> &mut Occurrence {
        &mut self.occurrences[id.0]
    }

    pub fn generation(&self, id: GenId) -> &Generation {
        match id.side {
            Side::Descendant => &self.descendant_gens[id.index],
            Side::Ancestor => &self.ancestor_gens[id.index],
        }
    }

    pub fn generation_mut(&mut self, id: GenId) -> &mut Generation {
        match id.side {
            Side::Descendant => &mut self.descendant_gens[id.index],
            Side::Ancestor => &mut self.ancestor_gens[id.index],
        }
    }

    /// The next generation outward from `id`, if one was registered.
    pub fn next_generation(&self, id: GenId) -> Option<GenId> {
        let len = match id.side {
            Side::Descendant => self.descendant_gens.len(),
            Side::Ancestor => self.ancestor_gens.len(),
        };
        let index = id.index + 1;
        (index < len).then_some(GenId {
            side: id.side,
            index,
        })
    }
}

/// Tree extents relative to the center point. The horizontal pair covers
/// the whole tree; the vertical pair covers only the slice reachable at
/// the current horizontal position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub horz_min: i32,
    pub horz_max: i32,
    pub vert_min: i32,
    pub vert_max: i32,
}

impl Bounds {
    /// Folds one placed box into the vertical extent, with breathing room.
    pub fn include_box(&mut self, top_y: i32, height: i32, vert_space: i32) {
        if top_y < 0 {
            self.vert_min = self.vert_min.min(top_y - vert_space);
        }
        if top_y + height > 0 {
            self.vert_max = self.vert_max.max(top_y + height + vert_space);
        }
    }
}
