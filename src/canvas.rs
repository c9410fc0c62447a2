//! The temporary, off-screen composition surface the visibility calculator
//! renders each visible widget into before the list box splices it onto
//! the frame buffer.

use ratatui_core::buffer::Buffer;
use ratatui_core::layout::{Position, Rect};
use ratatui_core::style::Style;

/// A rendered widget plus its cursor, ready to be composed into a list
/// box's final canvas.
#[derive(Debug, Clone)]
pub struct ListCanvas {
    buf: Buffer,
    cursor: Option<(u16, u16)>,
}

impl ListCanvas {
    /// A canvas of the given size, filled with `symbol`/`style`.
    pub fn solid(area: Rect, symbol: &str, style: Style) -> Self {
        let mut buf = Buffer::empty(area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_symbol(symbol);
                    cell.set_style(style);
                }
            }
        }
        Self { buf, cursor: None }
    }

    /// Wraps an already-rendered buffer, with an optional cursor position
    /// given in the buffer's own coordinate space.
    pub fn new(buf: Buffer, cursor: Option<(u16, u16)>) -> Self {
        Self { buf, cursor }
    }

    /// The area this canvas occupies.
    pub fn area(&self) -> Rect {
        self.buf.area
    }

    /// Number of rows (or, for a horizontal list, columns) this canvas
    /// covers along its own axis -- callers pick `.height` or `.width`.
    pub fn rows(&self) -> u16 {
        self.buf.area.height
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Splices `self` into `target` at `target_area`, shifted by `offset`
    /// (the list box's own top-left corner minus the canvas's logical
    /// position), clipping whatever falls outside `target_area`.
    ///
    /// Row-by-row slice copy into the destination buffer's backing
    /// `content` array, the same technique used to fold a view's temporary
    /// buffer into the frame buffer.
    pub fn splice(&self, target: &mut Buffer, target_area: Rect, offset: (i32, i32)) {
        let src_area = self.buf.area;

        let off_x0 = (offset.0.max(0)) as u16;
        let off_y0 = (offset.1.max(0)) as u16;
        let cut_x0 = (-offset.0).max(0) as u16;
        let cut_y0 = (-offset.1).max(0) as u16;

        let len_src = src_area.width.saturating_sub(cut_x0);
        let len_tgt = target_area.width.saturating_sub(off_x0);
        let len = len_src.min(len_tgt) as usize;
        if len == 0 {
            return;
        }

        let height_src = src_area.height.saturating_sub(cut_y0);
        let height_tgt = target_area.height.saturating_sub(off_y0);
        let height = height_src.min(height_tgt);

        for y in 0..height {
            let src_0 = self
                .buf
                .index_of(src_area.x + cut_x0, src_area.y + cut_y0 + y);
            let tgt_0 = target.index_of(target_area.x + off_x0, target_area.y + off_y0 + y);

            let src = &self.buf.content[src_0..src_0 + len];
            let tgt = &mut target.content[tgt_0..tgt_0 + len];
            tgt.clone_from_slice(src);
        }
    }

    /// Cursor position translated into `target_area`'s coordinate space,
    /// or `None` if the cursor fell outside the spliced region.
    pub fn cursor_in(&self, target_area: Rect, offset: (i32, i32)) -> Option<Position> {
        let (cx, cy) = self.cursor?;
        let x = target_area.x as i32 + offset.0 + cx as i32;
        let y = target_area.y as i32 + offset.1 + cy as i32;
        if x < 0 || y < 0 {
            return None;
        }
        let pos = Position::new(x as u16, y as u16);
        if pos.x >= target_area.right() || pos.y >= target_area.bottom() {
            return None;
        }
        Some(pos)
    }
}
