//! A scrolling list viewport over a lazily walked, variable-height
//! sequence of widgets.
//!
//! [`listbox::ListBoxState`] owns the walker and the viewport's
//! positioning state; [`listbox::ListBox`] is the zero-sized
//! `StatefulWidget` that renders it. A child only needs to implement
//! [`entry::ListEntry`] -- report how much space it needs along the
//! scrolling axis and how to render itself -- everything else (focus,
//! cursor, paging, mouse routing) is optional and defaults to "plain,
//! non-interactive item".
//!
//! The sequence itself is abstracted behind [`walker::ListWalker`], so
//! the viewport never needs to see more of it than what's on screen:
//! [`walker::PollingWalker`] adapts a fixed `Vec`, [`walker::ObservableWalker`]
//! adds mutation with change notification, and a caller with its own
//! backing store (a database cursor, a generator) can implement the
//! trait directly.
//!
//! Both a vertically stacked list ([`axis::Vertical`]) and a
//! horizontally stacked one ([`axis::Horizontal`]) are first-class --
//! the whole engine is written once against [`axis::Axis`] and
//! instantiated twice.

pub mod axis;
pub mod canvas;
pub mod entry;
pub mod error;
pub mod focus_resolver;
pub mod listbox;
pub mod mouse;
pub mod navigation;
pub mod state;
pub mod visibility;
pub mod walker;

pub use crate::axis::{Axis, Horizontal, Vertical};
pub use crate::canvas::ListCanvas;
pub use crate::entry::ListEntry;
pub use crate::error::ListBoxError;
pub use crate::listbox::{Command, CommandMap, DefaultCommandMap, Edge, ListBox, ListBoxState};
pub use crate::state::{Direction, PendingFocus, PrefCross, Valign};
pub use crate::walker::{ListWalker, ModifiedFlag, ModifiedSignal, ObservableWalker, PollingWalker};

/// Re-exports of the event-handling traits and types a caller wires up
/// `ListBoxState` with -- the same facade shape `rat_widget::event`
/// presents over `rat_event`.
pub mod event {
    pub use rat_event::*;
}
