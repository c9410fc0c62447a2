//! Resolves a [`crate::state::PendingFocus`] into concrete
//! `offset_rows`/`inset_fraction` state, now that a viewport size is
//! known.

use crate::axis::Axis;
use crate::error::ListBoxError;
use crate::navigation::change_focus;
use crate::state::{Direction, PendingFocus, Valign, ViewportState};
use crate::visibility::calculate_visible;
use crate::walker::ListWalker;

/// Resolves whatever is pending in `state.pending_focus()`, mutating
/// `state` (and, for `Restore`, possibly `walker`'s focus) so that a
/// subsequent [`calculate_visible`] sees concrete offset/inset values.
///
/// Idempotent: if nothing is pending, this is a no-op.
pub fn resolve_pending_focus<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
    focus: bool,
) -> Result<(), ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    match state.take_pending_focus() {
        PendingFocus::None => Ok(()),
        PendingFocus::FirstSelectable => {
            resolve_first_selectable(walker, state, across, viewport_extent, focus)
        }
        PendingFocus::AlignValign(valign) => {
            resolve_valign(walker, state, across, viewport_extent, valign)
        }
        PendingFocus::Restore {
            coming_from,
            old_pos,
        } => resolve_restore(
            walker,
            state,
            across,
            viewport_extent,
            focus,
            coming_from,
            old_pos,
        ),
    }
}

fn resolve_first_selectable<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
    focus: bool,
) -> Result<(), ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    let (current, current_pos) = walker.get_focus();
    let (current, current_pos) = match (current, current_pos) {
        (Some(w), Some(p)) => (w, p),
        _ => return Ok(()),
    };
    if current.borrow().selectable() {
        return Ok(());
    }

    let current_extent = current.borrow().extent(across);
    let (off_rows, inset_rows) = state.offset_inset(current_extent)?;
    let start_row = off_rows as i32 - inset_rows as i32;

    // scan forward first, then backward, for the nearest selectable widget,
    // tracking the running row offset each candidate would land at -- this
    // is urwid's `new_row_offset = row_offset + focus_rows` generalised
    // past the visible region, since the tall-widget case needs a target
    // `calculate_visible` alone would never surface. `change_focus`'s
    // snap-to-edge clamp (unconditional here via `snap_rows = u16::MAX`)
    // then pulls whatever is found into view.
    let mut pos = current_pos.clone();
    let mut running = start_row + current_extent as i32;
    loop {
        let (next, next_pos) = walker.get_next(&pos);
        match (next, next_pos) {
            (Some(w), Some(p)) => {
                if w.borrow().selectable() {
                    return change_focus::<A, W>(
                        walker,
                        state,
                        across,
                        viewport_extent,
                        p,
                        running,
                        Some(Direction::Above),
                        None,
                        Some(u16::MAX),
                    );
                }
                running += w.borrow().extent(across) as i32;
                pos = p;
            }
            _ => break,
        }
    }

    let mut pos = current_pos;
    let mut running = start_row;
    loop {
        let (prev, prev_pos) = walker.get_prev(&pos);
        match (prev, prev_pos) {
            (Some(w), Some(p)) => {
                running -= w.borrow().extent(across) as i32;
                if w.borrow().selectable() {
                    return change_focus::<A, W>(
                        walker,
                        state,
                        across,
                        viewport_extent,
                        p,
                        running,
                        Some(Direction::Below),
                        None,
                        Some(u16::MAX),
                    );
                }
                pos = p;
            }
            _ => break,
        }
    }
    let _ = focus;
    Ok(())
}

fn resolve_valign<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
    valign: Valign,
) -> Result<(), ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    let (focus, _) = walker.get_focus();
    let focus_extent = match focus {
        Some(w) => w.borrow().extent(across),
        None => return Ok(()),
    };

    let offset_inset: i32 = match valign {
        Valign::Top => 0,
        Valign::Bottom => viewport_extent as i32 - focus_extent as i32,
        Valign::Middle => (viewport_extent as i32 - focus_extent as i32) / 2,
        Valign::FixedTop(n) => n as i32,
        Valign::FixedBottom(n) => viewport_extent as i32 - focus_extent as i32 - n as i32,
        Valign::Relative(pct) => {
            ((viewport_extent as i32 - focus_extent as i32) * pct.min(100) as i32) / 100
        }
    };

    if offset_inset >= 0 {
        state.set_offset(offset_inset, viewport_extent)
    } else {
        state.set_inset(offset_inset, focus_extent)
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_restore<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
    focus: bool,
    coming_from: Option<Direction>,
    old_pos: W::Position,
) -> Result<(), ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    let (_, new_pos) = walker.get_focus();
    let new_pos = match new_pos {
        Some(p) => p,
        None => return Ok(()),
    };
    if old_pos == new_pos {
        return Ok(());
    }

    // temporarily restore the old focus so we can see what's around it.
    walker.set_focus(old_pos.clone());
    let visible = calculate_visible::<A, W>(walker, state, across, viewport_extent, focus)?;
    walker.set_focus(new_pos.clone());

    let Some((middle, above, below)) = visible else {
        return Ok(());
    };

    let mut offset = middle.row_offset;
    for (_, pos, extent) in &above.widgets {
        offset -= *extent as i32;
        if *pos == new_pos {
            return change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                new_pos,
                offset,
                Some(Direction::Below),
                None,
                None,
            );
        }
    }

    let mut offset = middle.row_offset + middle.focus_extent as i32;
    for (_, pos, extent) in &below.widgets {
        if *pos == new_pos {
            return change_focus::<A, W>(
                walker,
                state,
                across,
                viewport_extent,
                new_pos,
                offset,
                Some(Direction::Above),
                None,
                None,
            );
        }
        offset += *extent as i32;
    }

    // the new focus wasn't among what was visible around the old one;
    // align it using the direction it's coming from.
    let (focus_widget, _) = walker.get_focus();
    let extent = focus_widget.map(|w| w.borrow().extent(across)).unwrap_or(0);
    let offset_inset = match coming_from {
        Some(Direction::Below) => 0,
        Some(Direction::Above) => viewport_extent as i32 - extent as i32,
        None => (viewport_extent as i32 - extent as i32) / 2,
    };
    if offset_inset >= 0 {
        state.set_offset(offset_inset, viewport_extent)
    } else {
        state.set_inset(offset_inset, extent)
    }
}
