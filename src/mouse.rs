//! Maps a `(col, row)` click onto a child widget and, for a selectable
//! target, arms a focus change.

use crate::axis::Axis;
use crate::entry::ListEntry;
use crate::error::ListBoxError;
use crate::navigation::change_focus;
use crate::state::ViewportState;
use crate::visibility::calculate_visible;
use crate::walker::ListWalker;
use ratatui_crossterm::crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::cell::RefCell;
use std::rc::Rc;

/// One widget's position within the visible, display-ordered list: its
/// start row (already adjusted for `trim_top`, so negative starts are
/// possible for a partially scrolled-off widget) and its extent.
struct Hit<A: Axis, Pos> {
    start: i32,
    extent: u16,
    pos: Pos,
    widget: Rc<RefCell<dyn ListEntry<A>>>,
}

/// Routes a mouse event at `(cross, along)` to whichever visible widget
/// occupies that row (or column, for a horizontal list). Returns `false`
/// if `along` falls outside every visible widget -- above the topmost
/// trimmed row, or below the last rendered one.
///
/// On a left-button press landing on a selectable widget, focus moves
/// there first (`change_focus` at the widget's current on-screen
/// position, `coming_from = None` since a click isn't "coming from"
/// either edge). The event is then forwarded to the hit widget's own
/// `mouse_event`, translated into its local coordinate space, whether or
/// not focus moved.
pub fn route_mouse<A, W>(
    walker: &mut W,
    state: &mut ViewportState<W::Position>,
    across: u16,
    viewport_extent: u16,
    cross: u16,
    along: u16,
    event: &MouseEvent,
) -> Result<bool, ListBoxError>
where
    A: Axis,
    W: ListWalker<A>,
{
    let Some((middle, above, below)) =
        calculate_visible::<A, W>(walker, state, across, viewport_extent, true)?
    else {
        return Ok(false);
    };

    // above.widgets is nearest-to-focus first (bottom-to-top); walk it in
    // that order subtracting extents to get each widget's start row, then
    // reverse so the display list reads top-to-bottom.
    let mut above_hits = Vec::new();
    let mut start = middle.row_offset;
    for (widget, pos, extent) in &above.widgets {
        start -= *extent as i32;
        above_hits.push(Hit {
            start,
            extent: *extent,
            pos: pos.clone(),
            widget: widget.clone(),
        });
    }
    above_hits.reverse();

    let mut display: Vec<Hit<A, W::Position>> = above_hits;
    display.push(Hit {
        start: middle.row_offset,
        extent: middle.focus_extent,
        pos: middle.focus_pos.clone(),
        widget: middle.focus.clone(),
    });

    let mut start = middle.row_offset + middle.focus_extent as i32;
    for (widget, pos, extent) in &below.widgets {
        display.push(Hit {
            start,
            extent: *extent,
            pos: pos.clone(),
            widget: widget.clone(),
        });
        start += *extent as i32;
    }

    let along = along as i32;
    let Some(hit) = display
        .into_iter()
        .find(|h| along >= h.start && along < h.start + h.extent as i32)
    else {
        return Ok(false);
    };

    let is_left_press = matches!(event.kind, MouseEventKind::Down(MouseButton::Left));
    if is_left_press && hit.widget.borrow().selectable() {
        change_focus::<A, W>(
            walker,
            state,
            across,
            viewport_extent,
            hit.pos,
            hit.start,
            None,
            None,
            None,
        )?;
    }

    let local_along = (along - hit.start) as u16;
    let (column, row) = A::compose(cross, local_along);
    let local_event = MouseEvent {
        column,
        row,
        ..*event
    };
    hit.widget.borrow_mut().mouse_event(across, &local_event);

    Ok(true)
}
