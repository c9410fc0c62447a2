//! Parameterises the viewport engine over direction.
//!
//! The engine is written once, against [`Axis`], and instantiated twice:
//! [`Vertical`] stacks widgets top-to-bottom and shares width across them
//! (the ordinary scrolling list); [`Horizontal`] stacks widgets
//! left-to-right and shares height. The original the algorithm is modelled
//! on ships a hand-transcribed horizontal twin with leftover vertical
//! variable names and at least one dead branch; rather than port that,
//! [`Horizontal`] is derived independently from the same generic core.

use ratatui_core::layout::{Rect, Size};

/// A direction along which the viewport scrolls.
///
/// `along` is the scrolling direction (rows for [`Vertical`], columns for
/// [`Horizontal`]); `across` is the direction shared uniformly by every
/// child (width for `Vertical`, height for `Horizontal`).
pub trait Axis: Copy + Clone + std::fmt::Debug + Default + 'static {
    /// Extent of `area` along the scrolling direction.
    fn along(area: Rect) -> u16;
    /// Extent of `area` across the scrolling direction.
    fn across(area: Rect) -> u16;
    /// Builds a `Size` from an along/across pair, in the axis' own order.
    fn size(along: u16, across: u16) -> Size;
    /// The starting coordinate of `area` along the scrolling direction.
    fn along_start(area: Rect) -> u16;
    /// Offsets `area` by `delta` along the scrolling direction.
    fn translate_along(area: Rect, delta: i32) -> Rect;

    /// Composes a terminal `(column, row)` pair from `cross`/`along`
    /// coordinates, in whichever order this axis assigns them.
    fn compose(cross: u16, along: u16) -> (u16, u16);

    /// Inverse of [`compose`](Axis::compose): splits a terminal
    /// `(column, row)` point, relative to `area`'s origin, back into
    /// `(cross, along)`.
    fn decompose(area: Rect, column: u16, row: u16) -> (u16, u16);

    /// A signed `(x, y)` splice offset for a widget whose leading edge
    /// sits `along` rows/cols from the destination canvas's own leading
    /// edge.
    fn along_offset(along: i32) -> (i32, i32);
}

/// Ordinary top-to-bottom scrolling list: `along` = rows, `across` = width.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Vertical;

impl Axis for Vertical {
    fn along(area: Rect) -> u16 {
        area.height
    }

    fn across(area: Rect) -> u16 {
        area.width
    }

    fn size(along: u16, across: u16) -> Size {
        Size::new(across, along)
    }

    fn along_start(area: Rect) -> u16 {
        area.y
    }

    fn translate_along(area: Rect, delta: i32) -> Rect {
        Rect {
            y: (area.y as i32 + delta).max(0) as u16,
            ..area
        }
    }

    fn compose(cross: u16, along: u16) -> (u16, u16) {
        (cross, along)
    }

    fn decompose(area: Rect, column: u16, row: u16) -> (u16, u16) {
        (column.saturating_sub(area.x), row.saturating_sub(area.y))
    }

    fn along_offset(along: i32) -> (i32, i32) {
        (0, along)
    }
}

/// Left-to-right scrolling list: `along` = columns, `across` = height.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Horizontal;

impl Axis for Horizontal {
    fn along(area: Rect) -> u16 {
        area.width
    }

    fn across(area: Rect) -> u16 {
        area.height
    }

    fn size(along: u16, across: u16) -> Size {
        Size::new(along, across)
    }

    fn along_start(area: Rect) -> u16 {
        area.x
    }

    fn translate_along(area: Rect, delta: i32) -> Rect {
        Rect {
            x: (area.x as i32 + delta).max(0) as u16,
            ..area
        }
    }

    fn compose(cross: u16, along: u16) -> (u16, u16) {
        (along, cross)
    }

    fn decompose(area: Rect, column: u16, row: u16) -> (u16, u16) {
        (row.saturating_sub(area.y), column.saturating_sub(area.x))
    }

    fn along_offset(along: i32) -> (i32, i32) {
        (along, 0)
    }
}
