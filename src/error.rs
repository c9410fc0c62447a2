use std::fmt;

/// Contract violations detected by the viewport engine.
///
/// None of these are recovered from automatically; the caller is expected
/// to have violated an invariant documented on the method that returned the
/// error. A walker's own end-of-sequence `(None, None)` is never reported
/// as an error here -- it's a normal outcome of `ListWalker::get_next`/
/// `get_prev`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ListBoxError {
    /// A [`crate::walker::PollingWalker`] was built over a sequence that
    /// could not be walked at all (e.g. the initial position produced no
    /// widget although the backing sequence is non-empty).
    BadSequence,
    /// `offset_rows` and `inset_fraction` were both non-default at once, or
    /// `offset_rows` was set to a value outside `0..viewport_extent`.
    InvalidOffsetInset {
        /// The offending `offset_inset` value.
        offset_inset: i32,
        /// The viewport extent it was checked against.
        viewport_extent: u16,
    },
    /// `inset_fraction`'s numerator/denominator pair failed
    /// `0 <= num < den`.
    InvalidInsetFraction {
        /// Offending numerator.
        num: u32,
        /// Offending denominator.
        den: u32,
    },
    /// A widget's `rows`/`extent` at render time did not match what it
    /// reported when the visibility calculation measured it.
    WidgetHeightMismatch {
        /// Extent the calculator measured.
        expected: u16,
        /// Extent the widget actually rendered at.
        actual: u16,
    },
    /// The focus widget claims to be selectable and reports cursor
    /// coordinates, but `calculate_visible`'s cursor-adjustment pass and the
    /// widget's own coordinates disagree after the fact.
    CursorMismatch,
    /// `cursor_coords` passed to `change_focus` names a row outside
    /// `0..target_extent`.
    CursorCoordsOutOfRange {
        /// The out-of-range row/column requested.
        requested: u16,
        /// The target widget's extent along the axis.
        target_extent: u16,
    },
}

impl fmt::Display for ListBoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ListBoxError {}
