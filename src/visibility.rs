//! Computes which widgets are visible given the current
//! [`crate::state::ViewportState`], and how far the topmost/bottommost of
//! them are trimmed.

use crate::axis::Axis;
use crate::entry::ListEntry;
use crate::error::ListBoxError;
use crate::state::ViewportState;
use crate::walker::ListWalker;
use std::cell::RefCell;
use std::rc::Rc;

type Entry<A> = Rc<RefCell<dyn ListEntry<A>>>;

/// The focus widget plus its position relative to the viewport's leading
/// edge.
pub struct Middle<A: Axis, Pos> {
    /// Signed offset of the focus widget's leading edge from the
    /// viewport's leading edge (negative means inset/cut off).
    pub row_offset: i32,
    pub focus: Entry<A>,
    pub focus_pos: Pos,
    pub focus_extent: u16,
    pub cursor: Option<(u16, u16)>,
}

/// Widgets above the focus, nearest-to-focus first (bottom-to-top).
pub struct Above<A: Axis, Pos> {
    pub trim: u16,
    pub widgets: Vec<(Entry<A>, Pos, u16)>,
}

/// Widgets below the focus, nearest-to-focus first (top-to-bottom).
pub struct Below<A: Axis, Pos> {
    pub trim: u16,
    pub widgets: Vec<(Entry<A>, Pos, u16)>,
}

/// Runs the 7-step visibility calculation: force at least one row of focus
/// visible, adjust for the focus cursor, collect widgets above and below,
/// then refill from the top if the bottom ran out before filling the
/// viewport and there's still trimmed space above to reclaim.
///
/// Returns `Ok(None)` if the walker is empty -- not an error, just nothing
/// to show.
pub fn calculate_visible<A, W>(
    walker: &W,
    state: &ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
    want_cursor: bool,
) -> Result<Option<(Middle<A, W::Position>, Above<A, W::Position>, Below<A, W::Position>)>, ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    // 1. start with the focus widget.
    let (focus_widget, focus_pos) = walker.get_focus();
    let (focus_widget, focus_pos) = match (focus_widget, focus_pos) {
        (Some(w), Some(p)) => (w, p),
        _ => return Ok(None),
    };

    let focus_extent = focus_widget.borrow().extent(across);
    let (mut offset_rows, mut inset_rows) = state.offset_inset(focus_extent)?;

    // force at least one line of focus to be visible.
    if viewport_extent != 0 && offset_rows >= viewport_extent {
        offset_rows = viewport_extent - 1;
    }

    // adjust position so the cursor remains visible.
    let mut cursor = None;
    if viewport_extent != 0 && want_cursor && focus_widget.borrow().selectable() {
        cursor = focus_widget.borrow().cursor_coords(across);
    }
    if let Some((cx, cy)) = cursor {
        let effective = cy as i32 + offset_rows as i32 - inset_rows as i32;
        if effective < 0 {
            inset_rows = cy;
        } else if effective >= viewport_extent as i32 {
            offset_rows = (viewport_extent as i32 - cy as i32 - 1).max(0) as u16;
        }
        cursor = Some((cx, cy));
    }

    let mut trim_top = inset_rows;

    // 2. collect the widgets above the focus.
    let mut pos = focus_pos.clone();
    let mut fill = offset_rows as i32;
    let mut above = Vec::new();
    let mut top_pos = focus_pos.clone();
    while fill > 0 {
        let (prev, prev_pos) = walker.get_prev(&pos);
        let (prev, prev_pos) = match (prev, prev_pos) {
            (Some(w), Some(p)) => (w, p),
            _ => {
                offset_rows -= fill as u16;
                break;
            }
        };
        top_pos = prev_pos.clone();
        pos = prev_pos.clone();
        let p_extent = prev.borrow().extent(across);
        above.push((prev, prev_pos, p_extent));
        if p_extent as i32 > fill {
            trim_top = p_extent - fill as u16;
            break;
        }
        fill -= p_extent as i32;
    }
    let _ = top_pos;

    let mut trim_bottom = focus_extent as i32 + offset_rows as i32 - inset_rows as i32 - viewport_extent as i32;
    if trim_bottom < 0 {
        trim_bottom = 0;
    }

    // 3. collect the widgets below the focus.
    let mut pos = focus_pos.clone();
    let mut fill = viewport_extent as i32 - focus_extent as i32 - offset_rows as i32 + inset_rows as i32;
    let mut below = Vec::new();
    while fill > 0 {
        let (next, next_pos) = walker.get_next(&pos);
        let (next, next_pos) = match (next, next_pos) {
            (Some(w), Some(p)) => (w, p),
            _ => break,
        };
        pos = next_pos.clone();
        let n_extent = next.borrow().extent(across);
        below.push((next, next_pos, n_extent));
        if n_extent as i32 > fill {
            trim_bottom = n_extent as i32 - fill;
            fill -= n_extent as i32;
            break;
        }
        fill -= n_extent as i32;
    }

    // 4. fill from the top again if there's still room and trimmed rows to
    // reclaim.
    let mut fill = fill.max(0);
    if fill > 0 && trim_top > 0 {
        log::debug!("calculate_visible: reclaiming {} trimmed rows above focus", fill.min(trim_top as i32));
        if fill <= trim_top as i32 {
            trim_top -= fill as u16;
            offset_rows += fill as u16;
            fill = 0;
        } else {
            fill -= trim_top as i32;
            offset_rows += trim_top;
            trim_top = 0;
        }
    }
    let mut pos = top_pos;
    while fill > 0 {
        let (prev, prev_pos) = walker.get_prev(&pos);
        let (prev, prev_pos) = match (prev, prev_pos) {
            (Some(w), Some(p)) => (w, p),
            _ => break,
        };
        pos = prev_pos.clone();
        let p_extent = prev.borrow().extent(across);
        above.push((prev, prev_pos, p_extent));
        if p_extent as i32 > fill {
            trim_top = p_extent - fill as u16;
            offset_rows += fill as u16;
            break;
        }
        fill -= p_extent as i32;
        offset_rows += p_extent;
    }

    Ok(Some((
        Middle {
            row_offset: offset_rows as i32 - inset_rows as i32,
            focus: focus_widget,
            focus_pos,
            focus_extent,
            cursor,
        },
        Above {
            trim: trim_top,
            widgets: above,
        },
        Below {
            trim: trim_bottom as u16,
            widgets: below,
        },
    )))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::axis::Vertical;
    use crate::walker::PollingWalker;
    use ratatui_core::buffer::Buffer;
    use ratatui_core::layout::Rect;

    struct Row {
        extent: u16,
        selectable: bool,
        cursor: Option<(u16, u16)>,
    }

    impl ListEntry<Vertical> for Row {
        fn extent(&self, _across: u16) -> u16 {
            self.extent
        }

        fn render(&mut self, _area: Rect, _buf: &mut Buffer) {}

        fn selectable(&self) -> bool {
            self.selectable
        }

        fn cursor_coords(&self, _across: u16) -> Option<(u16, u16)> {
            self.cursor
        }
    }

    fn row(extent: u16, selectable: bool) -> Rc<RefCell<dyn ListEntry<Vertical>>> {
        Rc::new(RefCell::new(Row {
            extent,
            selectable,
            cursor: None,
        }))
    }

    #[test]
    fn empty_walker_yields_none() {
        let walker = PollingWalker::<Vertical>::new(Vec::new()).unwrap();
        let state = ViewportState::<usize>::default();
        let result = calculate_visible::<Vertical, _>(&walker, &state, 20, 5, true).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn single_widget_fills_only_its_own_row() {
        let walker = PollingWalker::<Vertical>::new(vec![row(1, true)]).unwrap();
        let state = ViewportState::<usize>::default();
        let (middle, above, below) =
            calculate_visible::<Vertical, _>(&walker, &state, 20, 5, true)
                .unwrap()
                .unwrap();
        assert_eq!(middle.row_offset, 0);
        assert_eq!(middle.focus_extent, 1);
        assert_eq!(above.widgets.len(), 0);
        assert_eq!(below.widgets.len(), 0);
        assert_eq!(above.trim, 0);
        assert_eq!(below.trim, 0);
    }

    #[test]
    fn default_state_reclaims_rows_above_to_fill_the_whole_viewport() {
        // a freshly focused widget starts at offset_rows == 0, but if
        // there's enough sequence above it, calculate_visible pulls earlier
        // widgets in to fill the viewport rather than leaving it short.
        let items = vec![
            row(1, true),
            row(1, true),
            row(1, true),
            row(1, true),
            row(1, true),
        ];
        let mut walker = PollingWalker::<Vertical>::new(items).unwrap();
        walker.set_focus(2);
        let state = ViewportState::<usize>::default();
        let (middle, above, below) =
            calculate_visible::<Vertical, _>(&walker, &state, 20, 5, true)
                .unwrap()
                .unwrap();
        assert_eq!(above.widgets.len(), 2);
        assert_eq!(below.widgets.len(), 2);
        assert_eq!(middle.row_offset, above.widgets.len() as i32);
        let total: u16 = middle.focus_extent
            + above.widgets.iter().map(|(_, _, r)| r).sum::<u16>()
            + below.widgets.iter().map(|(_, _, r)| r).sum::<u16>();
        assert_eq!(total - above.trim - below.trim, 5);
    }

    #[test]
    fn explicit_offset_pulls_exactly_that_many_rows_above_into_view() {
        let items = vec![row(1, true), row(1, true), row(1, true)];
        let mut walker = PollingWalker::<Vertical>::new(items).unwrap();
        walker.set_focus(2);
        let mut state = ViewportState::<usize>::default();
        state.set_offset(2, 5).unwrap();
        let (middle, above, _below) =
            calculate_visible::<Vertical, _>(&walker, &state, 20, 5, true)
                .unwrap()
                .unwrap();
        assert_eq!(middle.row_offset, 2);
        assert_eq!(above.widgets.len(), 2);
    }

    #[test]
    fn cursor_past_the_bottom_edge_keeps_the_viewport_biased_into_view() {
        let focus: Rc<RefCell<dyn ListEntry<Vertical>>> = Rc::new(RefCell::new(Row {
            extent: 3,
            selectable: true,
            cursor: Some((0, 2)),
        }));
        let walker = PollingWalker::<Vertical>::new(vec![focus]).unwrap();
        let mut state = ViewportState::<usize>::default();
        state.set_offset(3, 5).unwrap();
        let (middle, _above, _below) =
            calculate_visible::<Vertical, _>(&walker, &state, 20, 5, true)
                .unwrap()
                .unwrap();
        assert_eq!(middle.cursor, Some((0, 2)));
        let cursor_row = middle.row_offset + 2;
        assert!((0..5).contains(&cursor_row));
    }
}
