//! Integration-level scenario tests for [`rat_listbox::listbox::ListBoxState`],
//! exercising the public surface the way a caller would: render, then feed
//! it keys and mouse events.

use rat_listbox::axis::{Horizontal, Vertical};
use rat_listbox::entry::ListEntry;
use rat_listbox::listbox::{Edge, ListBoxState};
use rat_listbox::walker::PollingWalker;
use ratatui_core::buffer::Buffer;
use ratatui_core::layout::{Rect, Size};
use ratatui_crossterm::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::cell::RefCell;
use std::rc::Rc;

struct TextRow {
    label: &'static str,
    selectable: bool,
}

impl ListEntry<Vertical> for TextRow {
    fn extent(&self, _across: u16) -> u16 {
        1
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if let Some(cell) = buf.cell_mut((area.x, area.y)) {
            cell.set_symbol(self.label);
        }
    }

    fn selectable(&self) -> bool {
        self.selectable
    }
}

fn row(label: &'static str, selectable: bool) -> Rc<RefCell<dyn ListEntry<Vertical>>> {
    Rc::new(RefCell::new(TextRow { label, selectable }))
}

fn down_key() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE))
}

#[test]
fn empty_list_renders_blank_and_leaves_keys_unhandled() {
    let mut state =
        ListBoxState::<PollingWalker<Vertical>, Vertical>::from_items(Vec::new()).unwrap();
    let size = Size::new(20, 5);

    let canvas = state.render_canvas(size, true).unwrap();
    assert_eq!(canvas.area().width, 20);
    assert_eq!(canvas.area().height, 5);

    let result = state.keypress(size, down_key()).unwrap();
    assert!(result.is_some());

    assert!(state.ends_visible(size, true).unwrap().is_empty());
}

#[test]
fn single_widget_fills_the_top_row_and_touches_both_edges() {
    let mut state =
        ListBoxState::<PollingWalker<Vertical>, Vertical>::from_items(vec![row("A", true)])
            .unwrap();
    let size = Size::new(20, 5);

    let canvas = state.render_canvas(size, true).unwrap();
    assert_eq!(canvas.area().height, 5);

    let edges = state.ends_visible(size, true).unwrap();
    assert!(edges.contains(&Edge::Top));
    assert!(edges.contains(&Edge::Bottom));

    // the only widget is already fully in view, so scrolling further
    // down leaves the key unhandled.
    let result = state.keypress(size, down_key()).unwrap();
    assert!(result.is_some());
}

#[test]
fn five_selectable_widgets_step_down_then_report_unhandled_at_the_end() {
    let items = vec![
        row("A", true),
        row("B", true),
        row("C", true),
        row("D", true),
        row("E", true),
    ];
    let mut state = ListBoxState::<PollingWalker<Vertical>, Vertical>::from_items(items).unwrap();
    let size = Size::new(20, 5);

    for _ in 0..4 {
        let result = state.keypress(size, down_key()).unwrap();
        assert!(result.is_none(), "down should be handled while E is unreached");
    }

    assert_eq!(state.get_focus().1, Some(4));

    let result = state.keypress(size, down_key()).unwrap();
    assert!(result.is_some(), "a sixth down has nowhere left to go");
}

#[test]
fn mouse_click_on_a_selectable_row_moves_focus_there() {
    let items = vec![row("A", true), row("B", true), row("C", true)];
    let mut state = ListBoxState::<PollingWalker<Vertical>, Vertical>::from_items(items).unwrap();
    let size = Size::new(20, 5);
    // force the pending FirstSelectable resolution and lay out the
    // viewport before routing a click against it.
    state.render_canvas(size, true).unwrap();
    state.area = Rect::new(0, 0, 20, 5);
    state.inner = state.area;

    let event = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 0,
        row: 2,
        modifiers: KeyModifiers::NONE,
    };
    assert!(state.mouse_event(&event).unwrap());
    assert_eq!(state.get_focus().1, Some(2));
}

struct TextCol {
    label: &'static str,
    selectable: bool,
}

impl ListEntry<Horizontal> for TextCol {
    fn extent(&self, _across: u16) -> u16 {
        1
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if let Some(cell) = buf.cell_mut((area.x, area.y)) {
            cell.set_symbol(self.label);
        }
    }

    fn selectable(&self) -> bool {
        self.selectable
    }
}

fn col(label: &'static str, selectable: bool) -> Rc<RefCell<dyn ListEntry<Horizontal>>> {
    Rc::new(RefCell::new(TextCol { label, selectable }))
}

#[test]
fn horizontal_axis_swaps_the_rendered_canvas_dimensions_relative_to_vertical() {
    let mut state =
        ListBoxState::<PollingWalker<Horizontal>, Horizontal>::from_items(vec![col("A", true)])
            .unwrap();
    // `Horizontal::size` builds `Size::new(along, across)`, the opposite
    // argument order from `Vertical`, but both are asked for the same
    // `Size` and must hand back exactly that area.
    let size = Size::new(20, 5);

    let canvas = state.render_canvas(size, true).unwrap();
    assert_eq!(canvas.area().width, 20);
    assert_eq!(canvas.area().height, 5);

    let edges = state.ends_visible(size, true).unwrap();
    assert!(edges.contains(&Edge::Top));
    assert!(edges.contains(&Edge::Bottom));
}

#[test]
fn horizontal_axis_click_on_a_column_moves_focus_there() {
    let items = vec![col("A", true), col("B", true), col("C", true)];
    let mut state =
        ListBoxState::<PollingWalker<Horizontal>, Horizontal>::from_items(items).unwrap();
    let size = Size::new(5, 20);
    state.render_canvas(size, true).unwrap();
    state.area = Rect::new(0, 0, 5, 20);
    state.inner = state.area;

    // column 2, row 0: `Horizontal::decompose` reads the along coordinate
    // off the column, the mirror of the vertical test reading it off the
    // row.
    let event = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 2,
        row: 0,
        modifiers: KeyModifiers::NONE,
    };
    assert!(state.mouse_event(&event).unwrap());
    assert_eq!(state.get_focus().1, Some(2));
}
