//! The public surface: [`ListBoxState`] owns everything a list box needs
//! between renders; [`ListBox`] is the zero-sized `StatefulWidget` that
//! renders it, the same `List`/`ListState` split `rat_widget::list` uses.

use crate::axis::{Axis, Vertical};
use crate::canvas::ListCanvas;
use crate::entry::ListEntry;
use crate::error::ListBoxError;
use crate::focus_resolver::resolve_pending_focus;
use crate::mouse::route_mouse;
use crate::navigation::{
    change_focus, keypress_down, keypress_page_down, keypress_page_up, keypress_up,
    make_cursor_visible, shift_focus,
};
use crate::state::{Direction, PendingFocus, PrefCross, Valign, ViewportState};
use crate::visibility::calculate_visible;
use crate::walker::{ListWalker, ModifiedFlag, ModifiedSignal, PollingWalker};
use rat_cursor::HasScreenCursor;
use rat_event::{ct_event, ConsumedEvent, HandleEvent, MouseOnly, Outcome, Regular};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use rat_reloc::RelocatableState;
use ratatui_core::buffer::Buffer;
use ratatui_core::layout::{Rect, Size};
use ratatui_core::style::Style;
use ratatui_core::widgets::StatefulWidget;
use ratatui_crossterm::crossterm::event::{Event, MouseEvent};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

/// Which edge of the visible region [`ListBoxState::ends_visible`] reports
/// as touching the actual start/end of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Commands the navigation engine understands, decoupled from any
/// particular keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    /// Jump to the first widget in the sequence (walking the whole way
    /// there via `get_prev`, same cost as a user holding `Up`).
    Home,
    /// Jump to the last widget in the sequence (via `get_next`).
    End,
}

/// Maps an input event to a [`Command`], or `None` if the list box should
/// leave the event for the focus widget / caller.
pub trait CommandMap {
    fn map(&self, event: &Event) -> Option<Command>;
}

/// `Up`/`Down`/`PageUp`/`PageDown` for scrolling, `Ctrl+Up`/`Home` and
/// `Ctrl+Down`/`End` for jumping to either end -- the same keys the
/// teacher's own `rat_widget::list` binds for `RowSelection`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCommandMap;

impl CommandMap for DefaultCommandMap {
    fn map(&self, event: &Event) -> Option<Command> {
        match event {
            ct_event!(keycode press Up) => Some(Command::CursorUp),
            ct_event!(keycode press Down) => Some(Command::CursorDown),
            ct_event!(keycode press PageUp) => Some(Command::PageUp),
            ct_event!(keycode press PageDown) => Some(Command::PageDown),
            ct_event!(keycode press CONTROL-Up) | ct_event!(keycode press Home) => {
                Some(Command::Home)
            }
            ct_event!(keycode press CONTROL-Down) | ct_event!(keycode press End) => {
                Some(Command::End)
            }
            _ => None,
        }
    }
}

/// Mutable state for a scrolling list viewport: the walker, the viewport
/// positioning state, focus-handling, and the command map used to
/// interpret keys.
pub struct ListBoxState<W, A = Vertical, C = DefaultCommandMap>
where
    A: Axis,
    W: ListWalker<A>,
{
    /// Outer render area, set by [`ListBox::render`].
    pub area: Rect,
    /// Inner render area (identical to `area`; there's no block/border --
    /// see Non-goals on rich styling).
    pub inner: Rect,
    walker: W,
    state: ViewportState<W::Position>,
    focus: FocusFlag,
    modified: ModifiedFlag,
    command_map: C,
    _axis: PhantomData<A>,
}

impl<W, A, C> std::fmt::Debug for ListBoxState<W, A, C>
where
    A: Axis,
    W: ListWalker<A>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListBoxState")
            .field("area", &self.area)
            .field("inner", &self.inner)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl<A, W> ListBoxState<W, A, DefaultCommandMap>
where
    A: Axis,
    W: ListWalker<A>,
{
    /// Wraps an existing walker, using the default command map.
    pub fn new(walker: W) -> Self {
        Self::with_command_map(walker, DefaultCommandMap)
    }
}

impl<A> ListBoxState<PollingWalker<A>, A, DefaultCommandMap>
where
    A: Axis,
{
    /// Adapts a plain `Vec` of widgets via [`PollingWalker`] -- the "adapt
    /// a raw sequence" half of the public `new(body)` entry point.
    pub fn from_items(
        items: Vec<Rc<RefCell<dyn ListEntry<A>>>>,
    ) -> Result<Self, ListBoxError> {
        Ok(Self::new(PollingWalker::new(items)?))
    }
}

impl<A, W, C> ListBoxState<W, A, C>
where
    A: Axis,
    W: ListWalker<A>,
    C: CommandMap,
{
    pub fn with_command_map(walker: W, command_map: C) -> Self {
        Self {
            area: Rect::default(),
            inner: Rect::default(),
            walker,
            state: ViewportState::default(),
            focus: FocusFlag::default(),
            modified: ModifiedFlag::new(),
            command_map,
            _axis: PhantomData,
        }
    }

    /// Subscribes this list box's invalidation flag to `signal` (an
    /// [`crate::walker::ObservableWalker`]'s `signal()`), so
    /// [`Self::take_modified`] reports reentrant mutations.
    pub fn subscribe_modified(&self, signal: &ModifiedSignal) {
        signal.subscribe(&self.modified);
    }

    /// Reads and clears the modified flag. A caller that caches rendered
    /// canvases around this list box should discard that cache whenever
    /// this returns `true`.
    pub fn take_modified(&self) -> bool {
        self.modified.take()
    }

    fn extents(&self, size: Size) -> (u16, u16) {
        let rect = Rect::new(0, 0, size.width, size.height);
        (A::across(rect), A::along(rect))
    }

    /// Delegates to the walker.
    pub fn get_focus(&self) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<W::Position>) {
        self.walker.get_focus()
    }

    /// Arms a `Restore` pending focus change: the walker's focus moves to
    /// `position` immediately, but the viewport doesn't reposition until
    /// the next size-aware call, which tries to keep the *old* focus's
    /// visual position intact if the new one isn't already visible.
    pub fn set_focus(&mut self, position: W::Position, coming_from: Option<Direction>) {
        let (_, old_pos) = self.walker.get_focus();
        self.walker.set_focus(position);
        if let Some(old_pos) = old_pos {
            self.state.set_pending_focus(PendingFocus::Restore {
                coming_from,
                old_pos,
            });
        }
    }

    /// Arms an `AlignValign` pending focus change.
    pub fn set_focus_valign(&mut self, valign: Valign) {
        self.state.set_pending_focus(PendingFocus::AlignValign(valign));
    }

    /// See [`crate::navigation::shift_focus`].
    pub fn shift_focus(&mut self, size: Size, offset_inset: i32) -> Result<(), ListBoxError> {
        let (across, viewport_extent) = self.extents(size);
        shift_focus::<A, W>(&self.walker, &mut self.state, across, viewport_extent, offset_inset)
    }

    /// See [`crate::navigation::change_focus`].
    #[allow(clippy::too_many_arguments)]
    pub fn change_focus(
        &mut self,
        size: Size,
        position: W::Position,
        offset_inset: i32,
        coming_from: Option<Direction>,
        cursor_coords: Option<(u16, Option<u16>)>,
        snap_rows: Option<u16>,
    ) -> Result<(), ListBoxError> {
        let (across, viewport_extent) = self.extents(size);
        change_focus::<A, W>(
            &mut self.walker,
            &mut self.state,
            across,
            viewport_extent,
            position,
            offset_inset,
            coming_from,
            cursor_coords,
            snap_rows,
        )
    }

    /// See [`crate::navigation::make_cursor_visible`].
    pub fn make_cursor_visible(&mut self, size: Size) -> Result<(), ListBoxError> {
        let (across, viewport_extent) = self.extents(size);
        make_cursor_visible::<A, W>(&self.walker, &mut self.state, across, viewport_extent)
    }

    /// Which edges of the whole sequence are currently within the visible
    /// region. Resolves any pending focus first. An empty list has no edges
    /// to report -- there's nothing visible for `top`/`bottom` to describe.
    pub fn ends_visible(&mut self, size: Size, focus: bool) -> Result<Vec<Edge>, ListBoxError> {
        let (across, viewport_extent) = self.extents(size);
        resolve_pending_focus::<A, W>(&mut self.walker, &mut self.state, across, viewport_extent, focus)?;
        let Some((middle, above, below)) =
            calculate_visible::<A, W>(&self.walker, &self.state, across, viewport_extent, focus)?
        else {
            return Ok(Vec::new());
        };

        let mut edges = Vec::new();
        if above.trim == 0 {
            let topmost = above
                .widgets
                .last()
                .map(|(_, p, _)| p.clone())
                .unwrap_or_else(|| middle.focus_pos.clone());
            if self.walker.get_prev(&topmost).0.is_none() {
                edges.push(Edge::Top);
            }
        }
        if below.trim == 0 {
            let bottommost = below
                .widgets
                .last()
                .map(|(_, p, _)| p.clone())
                .unwrap_or_else(|| middle.focus_pos.clone());
            if self.walker.get_next(&bottommost).0.is_none() {
                edges.push(Edge::Bottom);
            }
        }
        Ok(edges)
    }

    /// §4.5's keypress contract: resolves pending focus, then -- unless the
    /// key is one of the paging/jump commands, which are always the list
    /// box's own -- offers the key to a selectable focus widget first (an
    /// edit box wants `Up`/`Down` for its own cursor before the list box
    /// scrolls). Only once the widget declines does the mapped [`Command`]
    /// run. Returns the event back (`Some`) if nothing consumed it, `None`
    /// if it was handled.
    pub fn keypress(&mut self, size: Size, event: Event) -> Result<Option<Event>, ListBoxError> {
        let (across, viewport_extent) = self.extents(size);
        resolve_pending_focus::<A, W>(&mut self.walker, &mut self.state, across, viewport_extent, true)?;

        if self.walker.get_focus().0.is_none() {
            return Ok(Some(event));
        }

        let command = self.command_map.map(&event);
        let is_paging = matches!(
            command,
            Some(Command::PageUp) | Some(Command::PageDown) | Some(Command::Home) | Some(Command::End)
        );

        if !is_paging {
            let (focus, _) = self.walker.get_focus();
            if let Some(focus) = focus {
                let consumed = focus.borrow().selectable()
                    && focus.borrow_mut().keypress(across, &event).is_consumed();
                if consumed {
                    make_cursor_visible::<A, W>(&self.walker, &mut self.state, across, viewport_extent)?;
                    return Ok(None);
                }
            }
        }

        match command {
            None => Ok(Some(event)),
            Some(command) => {
                let handled = match command {
                    Command::CursorUp => {
                        keypress_up::<A, W>(&mut self.walker, &mut self.state, across, viewport_extent)?
                    }
                    Command::CursorDown => {
                        keypress_down::<A, W>(&mut self.walker, &mut self.state, across, viewport_extent)?
                    }
                    Command::PageUp => keypress_page_up::<A, W>(
                        &mut self.walker,
                        &mut self.state,
                        across,
                        viewport_extent,
                    )?,
                    Command::PageDown => keypress_page_down::<A, W>(
                        &mut self.walker,
                        &mut self.state,
                        across,
                        viewport_extent,
                    )?,
                    Command::Home => self.jump_to_edge(across, viewport_extent, false)?,
                    Command::End => self.jump_to_edge(across, viewport_extent, true)?,
                };
                Ok(if handled { None } else { Some(event) })
            }
        }
    }

    /// Walks all the way to one end of the sequence via repeated
    /// `get_next`/`get_prev`, then aligns the nearest selectable widget
    /// there to the matching edge of the viewport.
    fn jump_to_edge(
        &mut self,
        across: u16,
        viewport_extent: u16,
        forward: bool,
    ) -> Result<bool, ListBoxError> {
        let (focus, focus_pos) = self.walker.get_focus();
        let (mut widget, mut pos) = match (focus, focus_pos) {
            (Some(w), Some(p)) => (w, p),
            _ => return Ok(false),
        };
        loop {
            let (next, next_pos) = if forward {
                self.walker.get_next(&pos)
            } else {
                self.walker.get_prev(&pos)
            };
            match (next, next_pos) {
                (Some(w), Some(p)) => {
                    widget = w;
                    pos = p;
                }
                _ => break,
            }
        }

        // the widget at the edge may not be selectable; scan back inward
        // for the nearest one that is, the same way FirstSelectable does.
        if !widget.borrow().selectable() {
            let mut search_pos = pos.clone();
            loop {
                let (candidate, candidate_pos) = if forward {
                    self.walker.get_prev(&search_pos)
                } else {
                    self.walker.get_next(&search_pos)
                };
                match (candidate, candidate_pos) {
                    (Some(w), Some(p)) => {
                        if w.borrow().selectable() {
                            widget = w;
                            pos = p;
                            break;
                        }
                        search_pos = p;
                    }
                    _ => break,
                }
            }
        }

        let extent = widget.borrow().extent(across);
        let (offset_inset, coming_from) = if forward {
            (
                viewport_extent as i32 - extent as i32,
                Some(Direction::Above),
            )
        } else {
            (0, Some(Direction::Below))
        };
        change_focus::<A, W>(
            &mut self.walker,
            &mut self.state,
            across,
            viewport_extent,
            pos,
            offset_inset,
            coming_from,
            None,
            None,
        )?;
        Ok(true)
    }

    /// Routes a mouse event landing at `(event.column, event.row)` onto a
    /// visible child, translating the coordinate into the widget's local
    /// space. Returns `false` if the event fell outside `self.inner`.
    pub fn mouse_event(&mut self, event: &MouseEvent) -> Result<bool, ListBoxError> {
        if event.column < self.inner.left()
            || event.column >= self.inner.right()
            || event.row < self.inner.top()
            || event.row >= self.inner.bottom()
        {
            return Ok(false);
        }
        let size = Size::new(self.inner.width, self.inner.height);
        let (across, viewport_extent) = self.extents(size);
        let (cross, along) = A::decompose(self.inner, event.column, event.row);
        route_mouse::<A, W>(
            &mut self.walker,
            &mut self.state,
            across,
            viewport_extent,
            cross,
            along,
            event,
        )
    }

    /// Runs the visibility calculation (resolving pending focus first) and
    /// composes the result into an off-screen [`ListCanvas`] -- the
    /// `render(size, focus)` entry of the public surface.
    pub fn render_canvas(&mut self, size: Size, focus: bool) -> Result<ListCanvas, ListBoxError> {
        let (across, viewport_extent) = self.extents(size);
        resolve_pending_focus::<A, W>(&mut self.walker, &mut self.state, across, viewport_extent, focus)?;

        let dest_size = A::size(viewport_extent, across);
        let dest_rect = Rect::new(0, 0, dest_size.width, dest_size.height);

        let Some((middle, above, below)) =
            calculate_visible::<A, W>(&self.walker, &self.state, across, viewport_extent, focus)?
        else {
            return Ok(ListCanvas::solid(dest_rect, " ", Style::default()));
        };

        let mut buf = Buffer::empty(dest_rect);
        let mut cursor = None;

        let want_focus_cursor = focus && middle.cursor.is_some();
        if let Some(pos) = splice_entry::<A>(
            &middle.focus,
            across,
            middle.row_offset,
            middle.focus_extent,
            want_focus_cursor,
            middle.cursor,
            dest_rect,
            &mut buf,
        )? {
            cursor = Some(pos);
        }

        let mut pos_along = middle.row_offset;
        for (widget, _, extent) in &above.widgets {
            pos_along -= *extent as i32;
            splice_entry::<A>(widget, across, pos_along, *extent, false, None, dest_rect, &mut buf)?;
        }

        let mut pos_along = middle.row_offset + middle.focus_extent as i32;
        for (widget, _, extent) in &below.widgets {
            splice_entry::<A>(widget, across, pos_along, *extent, false, None, dest_rect, &mut buf)?;
            pos_along += *extent as i32;
        }

        Ok(ListCanvas::new(buf, cursor))
    }

    /// Column to the immediate left of the cursor's preferred cross-axis
    /// position -- exposed mainly for tests asserting on `change_focus`'s
    /// `pref_col` bookkeeping.
    pub fn pref_cross(&self) -> PrefCross {
        self.state.pref_cross()
    }
}

/// Renders `widget` into a temporary canvas and splices it into `buf` at
/// `pos_along`. Re-measures the widget against the `extent` the visibility
/// calculation cached for it -- a mismatch means the calculator laid out
/// the viewport against a height the widget no longer reports, so every
/// widget below it in the canvas would be misplaced; that's
/// [`ListBoxError::WidgetHeightMismatch`], not a recoverable condition.
/// Similarly, when `want_cursor` is set, `expected_cursor` is the cursor
/// coordinate [`crate::visibility::calculate_visible`] already adjusted the
/// viewport around; if the widget reports something else at render time,
/// the cursor calculate_visible biased the scroll toward is not the one
/// actually drawn, so that's [`ListBoxError::CursorMismatch`].
fn splice_entry<A>(
    widget: &Rc<RefCell<dyn ListEntry<A>>>,
    across: u16,
    pos_along: i32,
    extent: u16,
    want_cursor: bool,
    expected_cursor: Option<(u16, u16)>,
    dest_rect: Rect,
    buf: &mut Buffer,
) -> Result<Option<(u16, u16)>, ListBoxError>
where
    A: Axis,
{
    let actual_extent = widget.borrow().extent(across);
    if actual_extent != extent {
        return Err(ListBoxError::WidgetHeightMismatch {
            expected: extent,
            actual: actual_extent,
        });
    }

    let entry_size = A::size(extent, across);
    let entry_rect = Rect::new(0, 0, entry_size.width, entry_size.height);
    let mut entry_buf = Buffer::empty(entry_rect);
    widget.borrow_mut().render(entry_rect, &mut entry_buf);

    let entry_cursor = if want_cursor {
        widget.borrow().cursor_coords(across)
    } else {
        None
    };
    if want_cursor && entry_cursor != expected_cursor {
        return Err(ListBoxError::CursorMismatch);
    }
    let canvas = ListCanvas::new(entry_buf, entry_cursor);
    let offset = A::along_offset(pos_along);
    canvas.splice(buf, dest_rect, offset);

    if want_cursor {
        Ok(canvas
            .cursor_in(dest_rect, offset)
            .map(|pos| (pos.x, pos.y)))
    } else {
        Ok(None)
    }
}

impl<W, A, C> HasFocus for ListBoxState<W, A, C>
where
    A: Axis,
    W: ListWalker<A>,
{
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.area
    }
}

impl<W, A, C> HasScreenCursor for ListBoxState<W, A, C>
where
    A: Axis,
    W: ListWalker<A>,
    C: CommandMap,
{
    fn screen_cursor(&self) -> Option<(u16, u16)> {
        if !self.focus.get() {
            return None;
        }
        let (focus, _) = self.walker.get_focus();
        let focus = focus?;
        let focus = focus.borrow();
        if !focus.selectable() {
            return None;
        }
        let across = A::across(self.inner);
        let (cx, cy) = focus.cursor_coords(across)?;
        let (offset_rows, inset_rows) = self
            .state
            .offset_inset(focus.extent(across))
            .ok()?;
        let along = offset_rows as i32 - inset_rows as i32 + cy as i32;
        if along < 0 || along >= A::along(self.inner) as i32 {
            return None;
        }
        let (col, row) = A::compose(cx, along as u16);
        Some((self.inner.x + col, self.inner.y + row))
    }
}

impl<W, A, C> RelocatableState for ListBoxState<W, A, C>
where
    A: Axis,
    W: ListWalker<A>,
{
    fn relocate(&mut self, shift: (i16, i16), clip: Rect) {
        self.area = rat_reloc::relocate_area(self.area, shift, clip);
        self.inner = rat_reloc::relocate_area(self.inner, shift, clip);
    }
}

/// Zero-sized `StatefulWidget`: renders [`ListBoxState`] into a frame
/// buffer by composing the visibility calculation's output and splicing
/// it in, same technique [`ListBoxState::render_canvas`] uses for the
/// off-screen variant.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListBox<A = Vertical> {
    _axis: PhantomData<A>,
}

impl<A> ListBox<A>
where
    A: Axis,
{
    pub fn new() -> Self {
        Self { _axis: PhantomData }
    }
}

impl<W, A, C> StatefulWidget for ListBox<A>
where
    A: Axis,
    W: ListWalker<A>,
    C: CommandMap,
{
    type State = ListBoxState<W, A, C>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.area = area;
        state.inner = area;
        let size = Size::new(area.width, area.height);
        let canvas = match state.render_canvas(size, state.focus.get()) {
            Ok(canvas) => canvas,
            Err(err) => {
                log::warn!("ListBox::render: {err}");
                return;
            }
        };
        canvas.splice(buf, area, (0, 0));
    }
}

impl<W, A, C> HandleEvent<Event, Regular, Outcome> for ListBoxState<W, A, C>
where
    A: Axis,
    W: ListWalker<A>,
    C: CommandMap,
{
    fn handle(&mut self, event: &Event, _keymap: Regular) -> Outcome {
        if !self.focus.get() {
            return self.handle(event, MouseOnly);
        }
        let size = Size::new(self.inner.width, self.inner.height);
        match self.keypress(size, event.clone()) {
            Ok(None) => Outcome::Changed,
            Ok(Some(_)) => self.handle(event, MouseOnly),
            Err(err) => {
                log::warn!("ListBoxState::handle: {err}");
                Outcome::Continue
            }
        }
    }
}

impl<W, A, C> HandleEvent<Event, MouseOnly, Outcome> for ListBoxState<W, A, C>
where
    A: Axis,
    W: ListWalker<A>,
    C: CommandMap,
{
    fn handle(&mut self, event: &Event, _keymap: MouseOnly) -> Outcome {
        let Event::Mouse(mouse) = event else {
            return Outcome::Continue;
        };
        match self.mouse_event(mouse) {
            Ok(true) => Outcome::Changed,
            Ok(false) => Outcome::Continue,
            Err(err) => {
                log::warn!("ListBoxState::handle(MouseOnly): {err}");
                Outcome::Continue
            }
        }
    }
}
