//! Cursor movement, paging, and the `change_focus`/`shift_focus`/
//! `make_cursor_visible` primitives everything else is built from.

use crate::axis::Axis;
use crate::error::ListBoxError;
use crate::state::{Direction, PrefCross, ViewportState};
use crate::visibility::calculate_visible;
use crate::walker::ListWalker;

/// Moves the focus widget relative to the viewport's leading edge without
/// changing which widget has focus.
///
/// `offset_inset >= 0` means that many rows/cols of empty space before the
/// focus widget; `offset_inset < 0` means that many rows/cols of the focus
/// widget are cut off the leading edge.
pub fn shift_focus<A, W>(
    walker: &W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
    offset_inset: i32,
) -> Result<(), ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    if offset_inset >= 0 {
        state.set_offset(offset_inset, viewport_extent)
    } else {
        let (focus, _) = walker.get_focus();
        let extent = focus.map(|w| w.borrow().extent(across)).unwrap_or(0);
        state.set_inset(offset_inset, extent)
    }
}

fn update_pref_cross_from_focus<A, W>(walker: &W, state: &mut ViewportState<W::Position>, across: u16)
where
    A: Axis,
    W: ListWalker<A>,
{
    let (focus, _) = walker.get_focus();
    let Some(focus) = focus else { return };
    let focus = focus.borrow();
    if let Some(col) = focus.pref_cross(across) {
        state.set_pref_cross(PrefCross::At(col));
        return;
    }
    if let Some((cx, _)) = focus.cursor_coords(across) {
        state.set_pref_cross(PrefCross::At(cx));
    }
}

/// Moves the current focus to `position`, placing it `offset_inset`
/// rows/cols from the viewport's leading edge (subject to "snapping" a
/// selectable target into full view when `coming_from` is known), and
/// attempts to place its cursor at `cursor_coords` if given.
///
/// `cursor_coords` is `(column, row)`; `row = None` means "closest edge
/// to `coming_from`". `snap_rows` bounds how far the target may be
/// nudged to bring it fully into view; it defaults to `viewport_extent - 1`.
#[allow(clippy::too_many_arguments)]
pub fn change_focus<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
    position: W::Position,
    mut offset_inset: i32,
    coming_from: Option<Direction>,
    cursor_coords: Option<(u16, Option<u16>)>,
    snap_rows: Option<u16>,
) -> Result<(), ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    if let Some((col, _)) = cursor_coords {
        state.set_pref_cross(PrefCross::At(col));
    } else {
        update_pref_cross_from_focus::<A, W>(walker, state, across);
    }

    walker.set_focus(position);
    let (target, _) = walker.get_focus();
    let Some(target) = target else { return Ok(()) };
    let target_extent = target.borrow().extent(across);
    let snap_rows = snap_rows.unwrap_or(viewport_extent.saturating_sub(1));

    let align_top: i32 = 0;
    let align_bottom: i32 = viewport_extent as i32 - target_extent as i32;

    if coming_from == Some(Direction::Above)
        && target.borrow().selectable()
        && offset_inset > align_bottom
        && align_bottom >= offset_inset - snap_rows as i32
    {
        offset_inset = align_bottom;
    }
    if coming_from == Some(Direction::Below)
        && target.borrow().selectable()
        && offset_inset < align_top
        && align_top <= offset_inset + snap_rows as i32
    {
        offset_inset = align_top;
    }

    if offset_inset >= 0 {
        state.set_offset(offset_inset, viewport_extent)?;
    } else {
        state.set_inset(offset_inset, target_extent)?;
    }

    let cursor_coords = match cursor_coords {
        Some(c) => c,
        None => match coming_from {
            None => return Ok(()),
            Some(_) => {
                let col = match state.pref_cross() {
                    PrefCross::At(c) => c,
                    PrefCross::Left => 0,
                    PrefCross::Right => across.saturating_sub(1),
                };
                (col, None)
            }
        },
    };

    let mut target_mut = target.borrow_mut();
    let (pref_col, attempt_rows): (u16, Vec<u16>) = match cursor_coords {
        (pref_col, None) => {
            let rows: Vec<u16> = if coming_from == Some(Direction::Above) {
                (0..target_extent).collect()
            } else {
                (0..=target_extent).rev().collect()
            };
            (pref_col, rows)
        }
        (pref_col, Some(pref_row)) => {
            if pref_row >= target_extent {
                return Err(ListBoxError::CursorCoordsOutOfRange {
                    requested: pref_row,
                    target_extent,
                });
            }
            let rows = match coming_from {
                Some(Direction::Above) => (0..=pref_row).rev().collect(),
                Some(Direction::Below) => (pref_row..target_extent).collect(),
                None => vec![pref_row],
            };
            (pref_col, rows)
        }
    };

    for row in attempt_rows {
        if target_mut.move_cursor_to_coords(across, pref_col, row) {
            break;
        }
    }
    Ok(())
}

/// Shifts the focus widget so its cursor (if any) is inside the viewport.
pub fn make_cursor_visible<A, W>(
    walker: &W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
) -> Result<(), ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    let (focus, _) = walker.get_focus();
    let Some(focus) = focus else { return Ok(()) };
    if !focus.borrow().selectable() {
        return Ok(());
    }
    let cursor = focus.borrow().cursor_coords(across);
    let Some((_, cy)) = cursor else { return Ok(()) };

    let focus_extent = focus.borrow().extent(across);
    let (offset_rows, inset_rows) = state.offset_inset(focus_extent)?;

    if cy < inset_rows {
        return shift_focus::<A, W>(walker, state, across, viewport_extent, -(cy as i32));
    }
    if offset_rows as i32 - inset_rows as i32 + cy as i32 >= viewport_extent as i32 {
        return shift_focus::<A, W>(
            walker,
            state,
            across,
            viewport_extent,
            viewport_extent as i32 - cy as i32 - 1,
        );
    }
    Ok(())
}

/// `true` if the keypress was handled (focus moved or scrolled); `false`
/// if there was nowhere left to go (caller should propagate the key).
pub fn keypress_up<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
) -> Result<bool, ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    let Some((middle, above, _below)) =
        calculate_visible::<A, W>(walker, state, across, viewport_extent, true)?
    else {
        return Ok(false);
    };

    let mut row_offset = middle.row_offset;
    let mut pos = middle.focus_pos.clone();
    // tracks the last widget visited above, the way urwid's `widget`/`pos`
    // loop variables stay bound to their final value once the `for`
    // completes without a `break` -- the fallback below reuses it as the
    // "last non-selectable candidate" rather than treating "looked but
    // found nothing selectable" the same as "nothing was above at all".
    let mut candidate: Option<(W::Position, u16)> = None;
    for (widget, p, extent) in &above.widgets {
        row_offset -= *extent as i32;
        if widget.borrow().selectable() {
            change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                p.clone(),
                row_offset,
                Some(Direction::Below),
                None,
                None,
            )?;
            return Ok(true);
        }
        pos = p.clone();
        candidate = Some((p.clone(), *extent));
    }

    row_offset += 1;
    if row_offset > 0 {
        let (prev, prev_pos) = walker.get_prev(&pos);
        match (prev, prev_pos) {
            (Some(w), Some(p)) => {
                let extent = w.borrow().extent(across);
                row_offset -= extent as i32;
                if w.borrow().selectable() {
                    change_focus::<A, W>(
                        walker,
                        state,
                        across,
                        viewport_extent,
                        p,
                        row_offset,
                        Some(Direction::Below),
                        None,
                        None,
                    )?;
                    return Ok(true);
                }
                candidate = Some((p, extent));
            }
            _ => return Ok(false),
        }
    }

    if !middle.focus.borrow().selectable() || middle.row_offset + 1 >= viewport_extent as i32 {
        return match candidate {
            None => {
                shift_focus::<A, W>(walker, state, across, viewport_extent, row_offset)?;
                Ok(true)
            }
            Some((p, _)) => {
                change_focus::<A, W>(
                    walker,
                    state,
                    across,
                    viewport_extent,
                    p,
                    row_offset,
                    Some(Direction::Below),
                    None,
                    None,
                )?;
                Ok(true)
            }
        };
    }

    if let Some((_, cy)) = middle.cursor {
        if cy as i32 + middle.row_offset + 1 >= viewport_extent as i32 {
            let (p, extent) = match candidate {
                Some(pe) => pe,
                None => {
                    let (prev, prev_pos) = walker.get_prev(&pos);
                    match (prev, prev_pos) {
                        (Some(w), Some(p)) => {
                            let extent = w.borrow().extent(across);
                            row_offset -= extent as i32;
                            (p, extent)
                        }
                        _ => return Ok(false),
                    }
                }
            };
            if -row_offset >= extent as i32 {
                row_offset = -(extent as i32 - 1);
            }
            change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                p,
                row_offset,
                Some(Direction::Below),
                None,
                None,
            )?;
            return Ok(true);
        }
    }

    shift_focus::<A, W>(walker, state, across, viewport_extent, middle.row_offset + 1)?;
    Ok(true)
}

pub fn keypress_down<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
) -> Result<bool, ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    let Some((middle, _above, below)) =
        calculate_visible::<A, W>(walker, state, across, viewport_extent, true)?
    else {
        return Ok(false);
    };

    let mut row_offset = middle.row_offset + middle.focus_extent as i32;
    let mut pos = middle.focus_pos.clone();
    // see the matching comment in `keypress_up`: this keeps the last
    // non-selectable widget seen below as the fallback target, rather than
    // collapsing "found nothing selectable" into "found nothing at all".
    let mut candidate: Option<(W::Position, u16)> = None;
    for (widget, p, extent) in &below.widgets {
        if widget.borrow().selectable() {
            change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                p.clone(),
                row_offset,
                Some(Direction::Above),
                None,
                None,
            )?;
            return Ok(true);
        }
        row_offset += *extent as i32;
        pos = p.clone();
        candidate = Some((p.clone(), *extent));
    }

    row_offset -= 1;
    if row_offset < viewport_extent as i32 {
        let (next, next_pos) = walker.get_next(&pos);
        match (next, next_pos) {
            (Some(w), Some(p)) => {
                if w.borrow().selectable() {
                    change_focus::<A, W>(
                        walker,
                        state,
                        across,
                        viewport_extent,
                        p,
                        row_offset,
                        Some(Direction::Above),
                        None,
                        None,
                    )?;
                    return Ok(true);
                }
                let extent = w.borrow().extent(across);
                row_offset += extent as i32;
                candidate = Some((p, extent));
            }
            _ => return Ok(false),
        }
    }

    if !middle.focus.borrow().selectable()
        || middle.row_offset + middle.focus_extent as i32 - 1 <= 0
    {
        return match candidate {
            None => {
                shift_focus::<A, W>(walker, state, across, viewport_extent, row_offset)?;
                Ok(true)
            }
            Some((p, extent)) => {
                change_focus::<A, W>(
                    walker,
                    state,
                    across,
                    viewport_extent,
                    p,
                    row_offset - extent as i32,
                    Some(Direction::Above),
                    None,
                    None,
                )?;
                Ok(true)
            }
        };
    }

    if let Some((_, cy)) = middle.cursor {
        if cy as i32 + middle.row_offset - 1 < 0 {
            let (p, extent) = match candidate {
                Some((p, extent)) => {
                    row_offset -= extent as i32;
                    (p, extent)
                }
                None => {
                    let (next, next_pos) = walker.get_next(&pos);
                    match (next, next_pos) {
                        (Some(w), Some(p)) => (p, w.borrow().extent(across)),
                        _ => return Ok(false),
                    }
                }
            };
            let _ = extent;
            if row_offset >= viewport_extent as i32 {
                row_offset = viewport_extent as i32 - 1;
            }
            change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                p,
                row_offset,
                Some(Direction::Above),
                None,
                None,
            )?;
            return Ok(true);
        }
    }

    shift_focus::<A, W>(walker, state, across, viewport_extent, middle.row_offset - 1)?;
    Ok(true)
}

/// Scrolls up by roughly one viewport extent, preferring to land focus on
/// a selectable widget newly brought into (or kept within `snap_rows` of)
/// view.
pub fn keypress_page_up<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
) -> Result<bool, ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    let Some((middle, above, _below)) =
        calculate_visible::<A, W>(walker, state, across, viewport_extent, true)?
    else {
        return Ok(false);
    };

    let topmost_visible = middle.row_offset;
    let scroll_from_row = if !middle.focus.borrow().selectable() {
        topmost_visible
    } else if let Some((_, cy)) = middle.cursor {
        -(cy as i32)
    } else if middle.row_offset >= 0 {
        0
    } else {
        topmost_visible
    };
    let snap_rows = (topmost_visible - scroll_from_row).max(0) as u16;

    let mut row_offset = scroll_from_row + viewport_extent as i32;

    let mut candidates: Vec<(i32, W::Position, u16, bool)> = Vec::new();
    candidates.push((
        row_offset,
        middle.focus_pos.clone(),
        middle.focus_extent,
        middle.focus.borrow().selectable(),
    ));
    let mut pos = middle.focus_pos.clone();
    for (widget, p, extent) in &above.widgets {
        row_offset -= *extent as i32;
        candidates.push((row_offset, p.clone(), *extent, widget.borrow().selectable()));
        pos = p.clone();
    }
    let mut snap_region_start = candidates.len();
    while row_offset > -(snap_rows as i32) {
        let (prev, prev_pos) = walker.get_prev(&pos);
        let (prev, prev_pos) = match (prev, prev_pos) {
            (Some(w), Some(p)) => (w, p),
            _ => break,
        };
        pos = prev_pos.clone();
        let extent = prev.borrow().extent(across);
        row_offset -= extent as i32;
        candidates.push((row_offset, prev_pos, extent, prev.borrow().selectable()));
    }

    if let Some(&(last_offset, _, _, _)) = candidates.last() {
        if last_offset > 0 {
            let adjust = -last_offset;
            for c in candidates.iter_mut() {
                c.0 += adjust;
            }
        }
    }
    if let Some(&(row_offset0, _, _, _)) = candidates.first() {
        if row_offset0 >= viewport_extent as i32 {
            candidates.remove(0);
            snap_region_start = snap_region_start.saturating_sub(1);
        }
    }

    update_pref_cross_from_focus::<A, W>(walker, state, across);

    // search within the snap region first, then the rest of the visible
    // region, choosing the first selectable candidate.
    let search_order: Vec<usize> = (snap_region_start..candidates.len())
        .chain((0..snap_region_start).rev())
        .collect();

    for i in search_order {
        let (row_offset, pos, extent, selectable) = candidates[i].clone();
        if !selectable {
            continue;
        }
        let pref_row = (-row_offset).max(0) as u16;
        let pref_row = pref_row.min(extent.saturating_sub(1));
        change_focus::<A, W>(
            walker,
            state,
            across,
            viewport_extent,
            pos,
            row_offset,
            Some(Direction::Below),
            Some((pref_col_for(state), Some(pref_row))),
            Some(snap_rows),
        )?;
        return Ok(true);
    }

    // nothing selectable within reach of the snap region -- a run of
    // non-selectable widgets longer than one page must not strand focus on
    // one of them, so keep walking back past what was gathered above until
    // a selectable widget turns up, and pull it fully into view regardless
    // of distance (same technique `resolve_first_selectable` uses for the
    // tall-widget case).
    let mut extra_pos = pos;
    let mut extra_offset = row_offset;
    loop {
        let (prev, prev_pos) = walker.get_prev(&extra_pos);
        let (prev, prev_pos) = match (prev, prev_pos) {
            (Some(w), Some(p)) => (w, p),
            _ => break,
        };
        let extent = prev.borrow().extent(across);
        extra_offset -= extent as i32;
        if prev.borrow().selectable() {
            change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                prev_pos,
                extra_offset,
                Some(Direction::Below),
                None,
                Some(u16::MAX),
            )?;
            return Ok(true);
        }
        extra_pos = prev_pos;
    }

    // nothing selectable found; just scroll, landing on whatever is at the
    // new topmost row.
    if let Some((row_offset, pos, _, _)) = candidates.into_iter().next() {
        if pos == middle.focus_pos {
            shift_focus::<A, W>(walker, state, across, viewport_extent, row_offset)?;
        } else {
            change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                pos,
                row_offset,
                Some(Direction::Below),
                None,
                Some(snap_rows),
            )?;
        }
        return Ok(true);
    }
    Ok(false)
}

/// Scrolls down by roughly one viewport extent. Derived from
/// [`keypress_page_up`] by flipping every row coordinate through
/// `y' = viewport_extent - 1 - y` (so "above"/"prev" becomes "below"/
/// "next"), running the identical search, then flipping the winning
/// offset back -- rather than transcribing a second, independently
/// bug-prone copy of the algorithm.
pub fn keypress_page_down<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
) -> Result<bool, ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    let Some((middle, _above, below)) =
        calculate_visible::<A, W>(walker, state, across, viewport_extent, true)?
    else {
        return Ok(false);
    };

    // flipped offset of the focus widget's (flipped) leading edge, i.e.
    // how much room is visible below its real bottom edge.
    let focus_flipped = viewport_extent as i32 - middle.row_offset - middle.focus_extent as i32;

    let scroll_from_row = if !middle.focus.borrow().selectable() {
        focus_flipped
    } else if let Some((_, cy)) = middle.cursor {
        let cy_flipped = middle.focus_extent as i32 - 1 - cy as i32;
        -cy_flipped
    } else if focus_flipped >= 0 {
        0
    } else {
        focus_flipped
    };
    let snap_rows = (focus_flipped - scroll_from_row).max(0) as u16;

    let mut row_offset = scroll_from_row + viewport_extent as i32;

    let mut candidates: Vec<(i32, W::Position, u16, bool)> = Vec::new();
    candidates.push((
        row_offset,
        middle.focus_pos.clone(),
        middle.focus_extent,
        middle.focus.borrow().selectable(),
    ));
    let mut pos = middle.focus_pos.clone();
    for (widget, p, extent) in &below.widgets {
        row_offset -= *extent as i32;
        candidates.push((row_offset, p.clone(), *extent, widget.borrow().selectable()));
        pos = p.clone();
    }
    let mut snap_region_start = candidates.len();
    while row_offset > -(snap_rows as i32) {
        let (next, next_pos) = walker.get_next(&pos);
        let (next, next_pos) = match (next, next_pos) {
            (Some(w), Some(p)) => (w, p),
            _ => break,
        };
        pos = next_pos.clone();
        let extent = next.borrow().extent(across);
        row_offset -= extent as i32;
        candidates.push((row_offset, next_pos, extent, next.borrow().selectable()));
    }

    if let Some(&(last_offset, _, _, _)) = candidates.last() {
        if last_offset > 0 {
            let adjust = -last_offset;
            for c in candidates.iter_mut() {
                c.0 += adjust;
            }
        }
    }
    if let Some(&(row_offset0, _, _, _)) = candidates.first() {
        if row_offset0 >= viewport_extent as i32 {
            candidates.remove(0);
            snap_region_start = snap_region_start.saturating_sub(1);
        }
    }

    update_pref_cross_from_focus::<A, W>(walker, state, across);

    let search_order: Vec<usize> = (snap_region_start..candidates.len())
        .chain((0..snap_region_start).rev())
        .collect();

    for i in search_order {
        let (row_offset_flipped, pos, extent, selectable) = candidates[i].clone();
        if !selectable {
            continue;
        }
        let row_offset = viewport_extent as i32 - row_offset_flipped - extent as i32;
        let pref_row_flipped = (-row_offset_flipped).max(0) as u16;
        let pref_row = extent
            .saturating_sub(1)
            .saturating_sub(pref_row_flipped.min(extent.saturating_sub(1)));
        change_focus::<A, W>(
            walker,
            state,
            across,
            viewport_extent,
            pos,
            row_offset,
            Some(Direction::Above),
            Some((pref_col_for(state), Some(pref_row))),
            Some(snap_rows),
        )?;
        return Ok(true);
    }

    // nothing selectable within reach of the snap region -- keep walking
    // forward past what was gathered above (see the matching block in
    // `keypress_page_up`) until a selectable widget turns up, landing it
    // fully in view regardless of distance.
    let mut extra_pos = pos;
    let mut extra_offset_flipped = row_offset;
    loop {
        let (next, next_pos) = walker.get_next(&extra_pos);
        let (next, next_pos) = match (next, next_pos) {
            (Some(w), Some(p)) => (w, p),
            _ => break,
        };
        let extent = next.borrow().extent(across);
        extra_offset_flipped -= extent as i32;
        if next.borrow().selectable() {
            let row_offset = viewport_extent as i32 - extra_offset_flipped - extent as i32;
            change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                next_pos,
                row_offset,
                Some(Direction::Above),
                None,
                Some(u16::MAX),
            )?;
            return Ok(true);
        }
        extra_pos = next_pos;
    }

    if let Some((row_offset_flipped, pos, extent, _)) = candidates.into_iter().next() {
        let row_offset = viewport_extent as i32 - row_offset_flipped - extent as i32;
        if pos == middle.focus_pos {
            shift_focus::<A, W>(walker, state, across, viewport_extent, row_offset)?;
        } else {
            change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                pos,
                row_offset,
                Some(Direction::Above),
                None,
                Some(snap_rows),
            )?;
        }
        return Ok(true);
    }
    Ok(false)
}

fn pref_col_for<Pos>(state: &ViewportState<Pos>) -> u16 {
    match state.pref_cross() {
        PrefCross::At(c) => c,
        PrefCross::Left => 0,
        PrefCross::Right => u16::MAX,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::axis::{Horizontal, Vertical};
    use crate::walker::PollingWalker;
    use ratatui_core::buffer::Buffer;
    use ratatui_core::layout::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

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

    fn cursor_row(extent: u16, cursor: (u16, u16)) -> Rc<RefCell<dyn ListEntry<Vertical>>> {
        Rc::new(RefCell::new(Row {
            extent,
            selectable: true,
            cursor: Some(cursor),
        }))
    }

    struct Cell {
        extent: u16,
    }

    impl ListEntry<Horizontal> for Cell {
        fn extent(&self, _across: u16) -> u16 {
            self.extent
        }

        fn render(&mut self, _area: Rect, _buf: &mut Buffer) {}

        fn selectable(&self) -> bool {
            true
        }
    }

    fn cell(extent: u16) -> Rc<RefCell<dyn ListEntry<Horizontal>>> {
        Rc::new(RefCell::new(Cell { extent }))
    }

    #[test]
    fn horizontal_axis_steps_through_five_columns_the_same_way_vertical_steps_through_rows() {
        // same shape as `cursor_down_steps_through_five_rows_then_reports_unhandled`,
        // but walked column-by-column: the navigation engine is written
        // once against `Axis` and should behave identically either way.
        let items: Vec<_> = (0..5).map(|_| cell(1)).collect();
        let mut walker = PollingWalker::<Horizontal>::new(items).unwrap();
        let mut state = ViewportState::default();

        let mut downs = 0;
        while keypress_down::<Horizontal, _>(&mut walker, &mut state, 20, 5).unwrap() {
            downs += 1;
            assert!(downs <= 10, "runaway loop");
        }

        assert_eq!(downs, 4);
        assert_eq!(walker.get_focus().1, Some(4));
        assert_eq!(state.offset_rows(), 4);
    }

    #[test]
    fn cursor_down_steps_through_five_rows_then_reports_unhandled() {
        let items: Vec<_> = (0..5).map(|_| row(1, true)).collect();
        let mut walker = PollingWalker::<Vertical>::new(items).unwrap();
        let mut state = ViewportState::default();

        let mut downs = 0;
        while keypress_down::<Vertical, _>(&mut walker, &mut state, 20, 5).unwrap() {
            downs += 1;
            assert!(downs <= 10, "runaway loop");
        }

        assert_eq!(downs, 4);
        assert_eq!(walker.get_focus().1, Some(4));
        assert_eq!(state.offset_rows(), 4);
    }

    #[test]
    fn cursor_up_walks_back_to_the_first_row_then_reports_unhandled() {
        let items: Vec<_> = (0..5).map(|_| row(1, true)).collect();
        let mut walker = PollingWalker::<Vertical>::new(items).unwrap();
        walker.set_focus(4);
        let mut state = ViewportState::default();
        state.set_offset(4, 5).unwrap();

        let mut ups = 0;
        while keypress_up::<Vertical, _>(&mut walker, &mut state, 20, 5).unwrap() {
            ups += 1;
            assert!(ups <= 10, "runaway loop");
        }

        assert_eq!(ups, 4);
        assert_eq!(walker.get_focus().1, Some(0));
        assert_eq!(state.offset_rows(), 0);
    }

    #[test]
    fn page_down_snaps_past_a_run_of_non_selectable_rows() {
        // [sel A, non-sel x4, sel B] in a 5-row viewport: a page down must
        // not strand focus on one of the non-selectable rows in between.
        let mut items = vec![row(1, true)];
        items.extend((0..4).map(|_| row(1, false)));
        items.push(row(1, true));
        let mut walker = PollingWalker::<Vertical>::new(items).unwrap();
        let mut state = ViewportState::default();

        let handled = keypress_page_down::<Vertical, _>(&mut walker, &mut state, 20, 5).unwrap();
        assert!(handled);

        let (widget, pos) = walker.get_focus();
        assert_eq!(pos, Some(5));
        assert!(widget.unwrap().borrow().selectable());
    }

    #[test]
    fn page_up_snaps_past_a_run_of_non_selectable_rows() {
        let mut items = vec![row(1, true)];
        items.extend((0..4).map(|_| row(1, false)));
        items.push(row(1, true));
        let mut walker = PollingWalker::<Vertical>::new(items).unwrap();
        walker.set_focus(5);
        let mut state = ViewportState::default();
        state.set_offset(0, 5).unwrap();

        let handled = keypress_page_up::<Vertical, _>(&mut walker, &mut state, 20, 5).unwrap();
        assert!(handled);

        let (widget, pos) = walker.get_focus();
        assert_eq!(pos, Some(0));
        assert!(widget.unwrap().borrow().selectable());
    }

    #[test]
    fn make_cursor_visible_is_a_no_op_for_a_non_selectable_focus() {
        let walker = PollingWalker::<Vertical>::new(vec![row(3, false)]).unwrap();
        let mut state = ViewportState::default();
        state.set_offset(2, 5).unwrap();
        make_cursor_visible::<Vertical, _>(&walker, &mut state, 20, 5).unwrap();
        assert_eq!(state.offset_rows(), 2);
    }

    #[test]
    fn make_cursor_visible_pulls_an_out_of_view_cursor_back_into_the_viewport() {
        // an edit box of height 3 with its cursor at row 2, sitting at
        // offset_rows = 3 in a 5-row viewport: cy + offset_rows == 5 crosses
        // the bottom edge, so the offset is pulled back to maxrow - cy - 1.
        let walker = PollingWalker::<Vertical>::new(vec![cursor_row(3, (0, 2))]).unwrap();
        let mut state = ViewportState::default();
        state.set_offset(3, 5).unwrap();

        make_cursor_visible::<Vertical, _>(&walker, &mut state, 20, 5).unwrap();

        assert_eq!(state.offset_rows(), 2);
    }
}
