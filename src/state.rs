//! The small piece of state a list box keeps between renders: where the
//! focus widget sits relative to the viewport, the preferred cross-axis
//! cursor column, and any focus change still waiting for a viewport size
//! to resolve against.

use crate::error::ListBoxError;

/// Preferred cross-axis cursor position, used when moving focus between
/// widgets that expose a cursor (edit boxes and the like) but the incoming
/// keypress didn't specify an exact column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefCross {
    Left,
    Right,
    At(u16),
}

impl Default for PrefCross {
    fn default() -> Self {
        PrefCross::Left
    }
}

/// Where focus should end up once a viewport size is known. Vertical
/// alignment requested by [`crate::listbox::ListBoxState::set_focus_valign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valign {
    Top,
    Middle,
    Bottom,
    FixedTop(u16),
    FixedBottom(u16),
    Relative(u16),
}

/// A focus change requested before the engine had a viewport size to
/// resolve it against (e.g. at construction, or from a mutation callback
/// that ran outside a render pass).
#[derive(Debug, Clone, PartialEq)]
pub enum PendingFocus<Pos> {
    /// Nothing pending.
    None,
    /// Focus the first selectable widget, scrolling as little as
    /// necessary.
    FirstSelectable,
    /// Focus the current widget, aligned per `Valign`.
    AlignValign(Valign),
    /// A focus change is underway and, if the target position isn't found
    /// among the widgets [`crate::visibility`] reaches while searching
    /// near `old_pos`, falls back to re-aligning using `coming_from`.
    Restore {
        /// `"above"`/`"below"`/neither -- direction focus is moving from,
        /// used both to search preferentially and, on fallback, to choose
        /// top/bottom/centre alignment.
        coming_from: Option<Direction>,
        old_pos: Pos,
    },
}

impl<Pos> Default for PendingFocus<Pos> {
    fn default() -> Self {
        PendingFocus::FirstSelectable
    }
}

/// Which side of the viewport a focus change is arriving from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Above,
    Below,
}

/// The mutable layout state of a list box: where the focus widget sits
/// relative to the viewport's leading edge.
///
/// Exactly one of `offset_rows`/`inset_fraction` is meaningful at a time:
/// a non-zero `offset_rows` means the focus widget starts `offset_rows`
/// past the viewport's leading edge; a non-default `inset_fraction`
/// means the focus widget starts *before* the leading edge, with
/// `inset_fraction` of its own extent cut off. Both can't be active at
/// once -- setting one resets the other, mirroring how the algorithm this
/// is modelled on never populates both `self.offset_rows` and
/// `self.inset_fraction` away from their defaults simultaneously.
#[derive(Debug, Clone)]
pub struct ViewportState<Pos> {
    offset_rows: u16,
    inset_fraction: (u32, u32),
    pref_cross: PrefCross,
    pending_focus: PendingFocus<Pos>,
}

impl<Pos> Default for ViewportState<Pos> {
    fn default() -> Self {
        Self {
            offset_rows: 0,
            inset_fraction: (0, 1),
            pref_cross: PrefCross::default(),
            pending_focus: PendingFocus::default(),
        }
    }
}

impl<Pos: Clone> ViewportState<Pos> {
    pub fn offset_rows(&self) -> u16 {
        self.offset_rows
    }

    pub fn inset_fraction(&self) -> (u32, u32) {
        self.inset_fraction
    }

    pub fn pref_cross(&self) -> PrefCross {
        self.pref_cross
    }

    pub fn set_pref_cross(&mut self, pref: PrefCross) {
        self.pref_cross = pref;
    }

    pub fn pending_focus(&self) -> &PendingFocus<Pos> {
        &self.pending_focus
    }

    pub fn set_pending_focus(&mut self, pending: PendingFocus<Pos>) {
        self.pending_focus = pending;
    }

    pub fn take_pending_focus(&mut self) -> PendingFocus<Pos> {
        std::mem::replace(&mut self.pending_focus, PendingFocus::None)
    }

    /// Sets a non-negative offset: `offset_inset` rows/cols between the
    /// viewport's leading edge and the start of the focus widget.
    ///
    /// `viewport_extent` bounds the value (an offset that consumes the
    /// whole viewport would leave no room for the focus widget at all).
    pub fn set_offset(&mut self, offset_inset: i32, viewport_extent: u16) -> Result<(), ListBoxError> {
        if offset_inset >= 0 {
            if viewport_extent != 0 && offset_inset as u16 >= viewport_extent {
                return Err(ListBoxError::InvalidOffsetInset {
                    offset_inset,
                    viewport_extent,
                });
            }
            self.offset_rows = offset_inset as u16;
            self.inset_fraction = (0, 1);
            Ok(())
        } else {
            Err(ListBoxError::InvalidOffsetInset {
                offset_inset,
                viewport_extent,
            })
        }
    }

    /// Sets a negative offset (inset): `-offset_inset` rows/cols of
    /// `target_extent` are cut off the leading edge of the focus widget.
    pub fn set_inset(&mut self, offset_inset: i32, target_extent: u16) -> Result<(), ListBoxError> {
        if offset_inset + target_extent as i32 <= 0 {
            return Err(ListBoxError::InvalidOffsetInset {
                offset_inset,
                viewport_extent: target_extent,
            });
        }
        self.offset_rows = 0;
        self.inset_fraction = ((-offset_inset) as u32, target_extent as u32);
        Ok(())
    }

    /// Computes `(offset_rows, inset_rows)` for a focus widget of
    /// `focus_extent`, validating `inset_fraction`'s invariant.
    pub fn offset_inset(&self, focus_extent: u16) -> Result<(u16, u16), ListBoxError> {
        if self.offset_rows != 0 {
            return Ok((self.offset_rows, 0));
        }
        let (num, den) = self.inset_fraction;
        if den == 0 || num >= den {
            return Err(ListBoxError::InvalidInsetFraction { num, den });
        }
        let inset_rows = ((focus_extent as u64 * num as u64) / den as u64) as u16;
        Ok((0, inset_rows))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_state_has_no_offset_and_pending_first_selectable() {
        let state = ViewportState::<usize>::default();
        assert_eq!(state.offset_rows(), 0);
        assert_eq!(state.inset_fraction(), (0, 1));
        assert_eq!(state.pref_cross(), PrefCross::Left);
        assert_eq!(state.pending_focus(), &PendingFocus::FirstSelectable);
    }

    #[test]
    fn set_offset_then_set_inset_are_mutually_exclusive() {
        let mut state = ViewportState::<usize>::default();
        state.set_offset(3, 10).unwrap();
        assert_eq!(state.offset_inset(5).unwrap(), (3, 0));

        // setting an inset afterward must reset offset_rows back to zero.
        state.set_inset(-2, 5).unwrap();
        assert_eq!(state.offset_rows(), 0);
        assert_eq!(state.offset_inset(5).unwrap(), (0, 2));
    }

    #[test]
    fn set_offset_rejects_offset_at_or_past_viewport_extent() {
        let mut state = ViewportState::<usize>::default();
        assert!(state.set_offset(10, 10).is_err());
        assert!(state.set_offset(-1, 10).is_err());
    }

    #[test]
    fn set_inset_rejects_an_inset_that_hides_the_whole_widget() {
        let mut state = ViewportState::<usize>::default();
        assert!(state.set_inset(-5, 5).is_err());
        assert!(state.set_inset(-4, 5).is_ok());
    }

    #[test]
    fn inset_fraction_survives_a_width_change_that_resizes_the_focus_widget() {
        let mut state = ViewportState::<usize>::default();
        // half of a 10-row widget is cut off above the viewport...
        state.set_inset(-5, 10).unwrap();
        assert_eq!(state.offset_inset(10).unwrap(), (0, 5));
        // ...re-measuring the same widget at a width where it's 20 rows tall
        // re-derives the absolute inset from the stored fraction.
        assert_eq!(state.offset_inset(20).unwrap(), (0, 10));
    }

    #[test]
    fn offset_inset_invariant_keeps_inset_below_focus_extent() {
        let mut state = ViewportState::<usize>::default();
        state.set_inset(-5, 10).unwrap();
        // `num < den` always floors to an inset strictly below whatever
        // extent it's re-derived against, even a much smaller one.
        let (offset, inset) = state.offset_inset(4).unwrap();
        assert_eq!(offset, 0);
        assert!(inset < 4);
    }

    #[test]
    fn offset_inset_rejects_an_invalid_fraction() {
        let mut state = ViewportState::<usize>::default();
        state.set_offset(0, 10).unwrap();
        // forcing offset_rows to 0 so the fraction path is taken, then
        // corrupting it directly to simulate a desynced caller.
        state.inset_fraction = (3, 3);
        assert!(matches!(
            state.offset_inset(10),
            Err(ListBoxError::InvalidInsetFraction { num: 3, den: 3 })
        ));
    }
}
