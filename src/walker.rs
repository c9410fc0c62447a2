//! The opaque-position sequence a list box scrolls over.

use crate::axis::Axis;
use crate::entry::ListEntry;
use crate::error::ListBoxError;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// A lazily-walked sequence of widgets.
///
/// `Position` is an opaque token meaningful only to a particular walker
/// implementation; the engine never orders, hashes, or otherwise
/// interprets it beyond `PartialEq`. A walker may be backed by a `Vec`, a
/// database cursor, a generator -- anything that can answer "what's
/// current, what's before it, what's after it".
///
/// `get_next`/`get_prev` returning `(None, None)` signals the natural end
/// of the sequence in that direction; it is never treated as an error.
pub trait ListWalker<A: Axis> {
    /// Opaque position token.
    type Position: Clone + PartialEq;

    /// The current focus widget and its position, or `(None, None)` if the
    /// sequence is empty.
    fn get_focus(&self) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<Self::Position>);

    /// Moves the focus to `position`. Implementations clamp or ignore
    /// positions that no longer exist.
    fn set_focus(&mut self, position: Self::Position);

    /// The widget immediately after `position`, or `(None, None)` at the
    /// end of the sequence.
    fn get_next(
        &self,
        position: &Self::Position,
    ) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<Self::Position>);

    /// The widget immediately before `position`, or `(None, None)` at the
    /// start of the sequence.
    fn get_prev(
        &self,
        position: &Self::Position,
    ) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<Self::Position>);
}

/// Owned by a list box; flips to `true` when the walker it was handed to
/// reports a mutation, so the list box knows to re-run the visibility
/// calculation instead of trusting a cached layout.
#[derive(Debug, Clone, Default)]
pub struct ModifiedFlag(Rc<Cell<bool>>);

impl ModifiedFlag {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    /// Reads and clears the flag.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }

    fn downgrade(&self) -> Weak<Cell<bool>> {
        Rc::downgrade(&self.0)
    }
}

/// Held by a walker; broadcasts `modified` to every [`ModifiedFlag`] that
/// subscribed, without holding a strong reference back to the list box
/// (avoiding the reference cycle a plain `Rc<ListBoxState>` would create).
///
/// Each subscriber is a `Weak` handle; `emit` upgrades and prunes dead
/// ones as it goes, the same pattern `rat_focus::FocusFlagCore` uses for
/// its `Cell<bool>`-based gained/lost flags, generalised to more than one
/// observer.
#[derive(Debug, Default)]
pub struct ModifiedSignal {
    subscribers: RefCell<Vec<Weak<Cell<bool>>>>,
}

impl ModifiedSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, flag: &ModifiedFlag) {
        self.subscribers.borrow_mut().push(flag.downgrade());
    }

    pub fn emit(&self) {
        self.subscribers.borrow_mut().retain(|weak| {
            if let Some(cell) = weak.upgrade() {
                cell.set(true);
                true
            } else {
                false
            }
        });
    }
}

/// A read-only, `Vec`-backed walker over widgets that never change after
/// construction. Positions are plain indices.
pub struct PollingWalker<A: Axis> {
    items: Vec<Rc<RefCell<dyn ListEntry<A>>>>,
    focus: usize,
}

impl<A: Axis> std::fmt::Debug for PollingWalker<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingWalker")
            .field("len", &self.items.len())
            .field("focus", &self.focus)
            .finish()
    }
}

impl<A: Axis> PollingWalker<A> {
    /// Builds a walker over `items`. Fails with
    /// [`ListBoxError::BadSequence`] only if `items` is non-empty but the
    /// initial focus index (`0`) somehow can't be read back -- in practice
    /// this can't happen for a `Vec`, but the constructor is fallible to
    /// match what a polling walker backed by a less trustworthy sequence
    /// (a generator, a paged query) would need.
    pub fn new(items: Vec<Rc<RefCell<dyn ListEntry<A>>>>) -> Result<Self, ListBoxError> {
        Ok(Self { items, focus: 0 })
    }

    fn clamp_focus(&mut self) {
        if self.focus >= self.items.len() && !self.items.is_empty() {
            self.focus = self.items.len() - 1;
        }
    }
}

impl<A: Axis> ListWalker<A> for PollingWalker<A> {
    type Position = usize;

    fn get_focus(&self) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<usize>) {
        if self.items.is_empty() {
            (None, None)
        } else {
            (Some(self.items[self.focus].clone()), Some(self.focus))
        }
    }

    fn set_focus(&mut self, position: usize) {
        self.focus = position;
        self.clamp_focus();
    }

    fn get_next(
        &self,
        position: &usize,
    ) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<usize>) {
        let next = position + 1;
        match self.items.get(next) {
            Some(item) => (Some(item.clone()), Some(next)),
            None => (None, None),
        }
    }

    fn get_prev(
        &self,
        position: &usize,
    ) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<usize>) {
        if *position == 0 {
            return (None, None);
        }
        let prev = position - 1;
        match self.items.get(prev) {
            Some(item) => (Some(item.clone()), Some(prev)),
            None => (None, None),
        }
    }
}

/// A mutable, `Vec`-backed walker that emits `modified` after every
/// mutation, once focus has been clamped to stay within bounds -- adjust
/// first, signal second, matching `rat_widget::list::ListState`'s
/// `items_added`/`items_removed` contract.
pub struct ObservableWalker<A: Axis> {
    items: Vec<Rc<RefCell<dyn ListEntry<A>>>>,
    focus: usize,
    signal: ModifiedSignal,
}

impl<A: Axis> std::fmt::Debug for ObservableWalker<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableWalker")
            .field("len", &self.items.len())
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl<A: Axis> ObservableWalker<A> {
    pub fn new(items: Vec<Rc<RefCell<dyn ListEntry<A>>>>) -> Self {
        Self {
            items,
            focus: 0,
            signal: ModifiedSignal::new(),
        }
    }

    pub fn signal(&self) -> &ModifiedSignal {
        &self.signal
    }

    fn clamp_focus(&mut self) {
        if self.focus >= self.items.len() && !self.items.is_empty() {
            self.focus = self.items.len() - 1;
        }
    }

    pub fn push(&mut self, item: Rc<RefCell<dyn ListEntry<A>>>) {
        self.items.push(item);
        self.clamp_focus();
        self.signal.emit();
        log::debug!("ObservableWalker::push, len now {}", self.items.len());
    }

    pub fn insert(&mut self, index: usize, item: Rc<RefCell<dyn ListEntry<A>>>) {
        self.items.insert(index, item);
        if index <= self.focus {
            self.focus += 1;
        }
        self.clamp_focus();
        self.signal.emit();
        log::debug!("ObservableWalker::insert at {}", index);
    }

    pub fn remove(&mut self, index: usize) -> Rc<RefCell<dyn ListEntry<A>>> {
        let removed = self.items.remove(index);
        if index < self.focus {
            self.focus -= 1;
        }
        self.clamp_focus();
        self.signal.emit();
        log::debug!("ObservableWalker::remove at {}", index);
        removed
    }

    pub fn set(&mut self, index: usize, item: Rc<RefCell<dyn ListEntry<A>>>) {
        self.items[index] = item;
        self.signal.emit();
        log::debug!("ObservableWalker::set at {}", index);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.focus = 0;
        self.signal.emit();
        log::debug!("ObservableWalker::clear");
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<A: Axis> ListWalker<A> for ObservableWalker<A> {
    type Position = usize;

    fn get_focus(&self) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<usize>) {
        if self.items.is_empty() {
            (None, None)
        } else {
            (Some(self.items[self.focus].clone()), Some(self.focus))
        }
    }

    fn set_focus(&mut self, position: usize) {
        self.focus = position;
        self.clamp_focus();
    }

    fn get_next(
        &self,
        position: &usize,
    ) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<usize>) {
        let next = position + 1;
        match self.items.get(next) {
            Some(item) => (Some(item.clone()), Some(next)),
            None => (None, None),
        }
    }

    fn get_prev(
        &self,
        position: &usize,
    ) -> (Option<Rc<RefCell<dyn ListEntry<A>>>>, Option<usize>) {
        if *position == 0 {
            return (None, None);
        }
        let prev = position - 1;
        match self.items.get(prev) {
            Some(item) => (Some(item.clone()), Some(prev)),
            None => (None, None),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::axis::Vertical;
    use ratatui_core::buffer::Buffer;
    use ratatui_core::layout::Rect;

    struct Row;

    impl ListEntry<Vertical> for Row {
        fn extent(&self, _across: u16) -> u16 {
            1
        }

        fn render(&mut self, _area: Rect, _buf: &mut Buffer) {}
    }

    fn row() -> Rc<RefCell<dyn ListEntry<Vertical>>> {
        Rc::new(RefCell::new(Row))
    }

    #[test]
    fn modified_flag_starts_set_and_clears_on_take() {
        let flag = ModifiedFlag::new();
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn modified_signal_sets_every_subscribed_flag_and_drops_dead_ones() {
        let signal = ModifiedSignal::new();
        let a = ModifiedFlag::new();
        let b = ModifiedFlag::new();
        a.take();
        b.take();
        signal.subscribe(&a);
        signal.subscribe(&b);

        // a subscriber that's been dropped shouldn't stop later emits from
        // reaching the survivors.
        {
            let c = ModifiedFlag::new();
            signal.subscribe(&c);
        }

        signal.emit();
        assert!(a.take());
        assert!(b.take());
    }

    #[test]
    fn push_clamps_focus_on_the_first_item_and_emits_modified() {
        let mut walker = ObservableWalker::<Vertical>::new(Vec::new());
        let flag = ModifiedFlag::new();
        flag.take();
        walker.signal().subscribe(&flag);

        assert_eq!(walker.get_focus().1, None);
        walker.push(row());
        assert_eq!(walker.get_focus().1, Some(0));
        assert!(flag.take());
    }

    #[test]
    fn insert_at_or_before_focus_shifts_it_forward() {
        let mut walker = ObservableWalker::<Vertical>::new(vec![row(), row()]);
        walker.set_focus(1);
        walker.insert(0, row());
        assert_eq!(walker.get_focus().1, Some(2));
    }

    #[test]
    fn remove_after_focus_leaves_it_in_place() {
        let mut walker = ObservableWalker::<Vertical>::new(vec![row(), row(), row()]);
        walker.set_focus(1);
        walker.remove(2);
        assert_eq!(walker.get_focus().1, Some(1));
    }

    #[test]
    fn remove_before_focus_shifts_it_back() {
        let mut walker = ObservableWalker::<Vertical>::new(vec![row(), row(), row()]);
        walker.set_focus(2);
        walker.remove(0);
        assert_eq!(walker.get_focus().1, Some(1));
    }

    #[test]
    fn remove_clamps_focus_when_the_last_item_is_removed() {
        let mut walker = ObservableWalker::<Vertical>::new(vec![row(), row()]);
        walker.set_focus(1);
        walker.remove(1);
        assert_eq!(walker.get_focus().1, Some(0));
    }

    #[test]
    fn clear_empties_the_walker_and_resets_focus() {
        let mut walker = ObservableWalker::<Vertical>::new(vec![row(), row()]);
        walker.set_focus(1);
        walker.clear();
        assert!(walker.is_empty());
        assert_eq!(walker.get_focus().1, None);
    }
}
