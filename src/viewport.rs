//! Screen state: spacing metrics, content bounds, and scroll clamping.

use serde::Serialize;

/// Spacing constants derived from the character cell of the current tree
/// font. Recomputed whenever the font changes (zoom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metrics {
    pub font_width: i32,
    pub font_height: i32,
    /// Horizontal run from a parent box to the connector drop line.
    pub trunk_len: i32,
    /// Horizontal run from the drop line to a child box.
    pub branch_len: i32,
    /// Vertical gap between sibling blocks; also the collision dead band.
    pub vert_space: i32,
    /// Vertical gap between a box and the spouse stacked below it.
    pub vert_spouse_space: i32,
    /// Step between offset connector drop lines.
    pub line_offset: i32,
    /// Horizontal padding added to every generation column.
    pub horz_space: i32,
    /// Vertical distance of one scroll increment.
    pub vert_inc: i32,
}

impl Metrics {
    pub fn from_char_cell(font_width: i32, font_height: i32) -> Self {
        let trunk_len = 2 * font_width;
        let branch_len = 2 * font_width;
        let vert_space = 2 * font_height;
        Self {
            font_width,
            font_height,
            trunk_len,
            branch_len,
            vert_space,
            vert_spouse_space: font_height,
            line_offset: font_width,
            horz_space: trunk_len + branch_len,
            vert_inc: 2 * vert_space,
        }
    }

    /// Vertical paging distance: one screen minus an increment of overlap.
    pub fn vert_page(&self, screen_height: i32) -> i32 {
        screen_height - self.vert_inc
    }
}

/// Screen size plus the extents of the laid-out tree. Scroll positions
/// are clamped against this; the current scroll itself lives with the
/// navigation history so back/forward restores it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportState {
    pub screen_width: i32,
    pub screen_height: i32,
    pub metrics: Metrics,
    pub bounds: crate::layout::types::Bounds,
}

impl ViewportState {
    pub fn new(screen_width: i32, screen_height: i32) -> Self {
        Self {
            screen_width,
            screen_height,
            ..Self::default()
        }
    }

    pub fn clamp_horz(&self, pos: i32) -> i32 {
        clamp_scroll(
            pos,
            self.bounds.horz_min,
            self.bounds.horz_max,
            self.screen_width,
        )
    }

    pub fn clamp_vert(&self, pos: i32) -> i32 {
        clamp_scroll(
            pos,
            self.bounds.vert_min,
            self.bounds.vert_max,
            self.screen_height,
        )
    }

    /// Scroll that centers the origin on screen; the position every new
    /// center person starts at.
    pub fn centered_scroll(&self) -> (i32, i32) {
        (-(self.screen_width / 2), -(self.screen_height / 2))
    }
}

/// Clamps a scroll position (screen's leading edge) against content
/// `[lo, hi]`. A tree larger than the screen stays flush with the screen
/// edges; a smaller tree is kept fully on screen instead.
pub fn clamp_scroll(pos: i32, lo: i32, hi: i32, screen: i32) -> i32 {
    if hi - lo > screen {
        if pos < lo {
            lo
        } else if pos + screen > hi {
            hi - screen
        } else {
            pos
        }
    } else if lo < pos {
        lo
    } else if hi > pos + screen {
        hi - screen
    } else {
        pos
    }
}

/// Whether a scroll request moved the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scrolled {
    Changed,
    Unchanged,
}

impl Scrolled {
    pub fn changed(self) -> bool {
        self == Scrolled::Changed
    }
}

/// One scroll axis as exposed to scrollbar widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRange {
    pub min: i32,
    pub max: i32,
    pub cur: i32,
}
