//! The capability surface a widget must expose to live inside a
//! scrolling list.

use crate::axis::Axis;
use rat_event::Outcome;
use ratatui_core::buffer::Buffer;
use ratatui_core::layout::Rect;
use ratatui_crossterm::crossterm::event::{Event, MouseEvent};

/// A widget that can be placed inside a [`crate::listbox::ListBoxState`].
///
/// Only [`extent`](ListEntry::extent) and [`render`](ListEntry::render) are
/// required; everything else has a default that makes the widget behave as
/// a plain, non-interactive, non-selectable item, the same way
/// `rat_focus::HasFocus` only requires `build`/`focus`/`area` and defaults
/// the rest.
pub trait ListEntry<A: Axis> {
    /// How much space this widget occupies along the scrolling axis, given
    /// `across` (the width of a vertical list, the height of a horizontal
    /// one).
    fn extent(&self, across: u16) -> u16;

    /// Renders into `buf` at `area`. `area`'s extent along the axis is
    /// exactly the value this widget last reported from
    /// [`extent`](ListEntry::extent).
    fn render(&mut self, area: Rect, buf: &mut Buffer);

    /// Whether this widget accepts focus and keyboard input.
    fn selectable(&self) -> bool {
        false
    }

    /// Cursor position relative to this widget's own render area, if it is
    /// currently showing a cursor.
    fn cursor_coords(&self, _across: u16) -> Option<(u16, u16)> {
        None
    }

    /// This widget's own idea of the preferred across-axis coordinate for
    /// cursor movement (e.g. the column an edit box's cursor currently
    /// sits in), used to seed [`crate::state::PrefCross`] when the widget
    /// doesn't expose `cursor_coords`.
    fn pref_cross(&self, _across: u16) -> Option<u16> {
        None
    }

    /// Attempts to place the cursor at `(cross, along)` relative to this
    /// widget's render area. Returns `true` if a cursor position was
    /// found and set.
    fn move_cursor_to_coords(&mut self, _across: u16, _cross: u16, _along: u16) -> bool {
        false
    }

    /// Offers a key event to this widget before the list box's own
    /// navigation commands see it. Returning `Outcome::Continue` means the
    /// widget didn't use the event and the list box should handle it.
    fn keypress(&mut self, _across: u16, _event: &Event) -> Outcome {
        Outcome::Continue
    }

    /// Offers a mouse event already translated into this widget's local
    /// coordinate space.
    fn mouse_event(&mut self, _across: u16, _event: &MouseEvent) -> Outcome {
        Outcome::Continue
    }
}
