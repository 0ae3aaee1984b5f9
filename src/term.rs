use crate::canvas::PixelCanvas;
use crate::color::{mix, Rgb};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Rgb,
    pub(crate) bg: Rgb,
}

impl Cell {
    pub(crate) fn blank(bg: Rgb) -> Self {
        Self { ch: ' ', fg: bg, bg }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Rgb::BLACK)
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
}

/// Write `text` starting at cell `(x, y)`, its color blended over each cell's
/// background by `opacity`. Fully transparent text leaves cells untouched.
pub(crate) fn draw_text(buf: &mut CellBuffer, x: i32, y: i32, text: &str, fg: Rgb, opacity: f32) {
    if opacity <= 0.0 || y < 0 || y >= buf.h as i32 {
        return;
    }
    for (i, ch) in text.chars().enumerate() {
        let xx = x + i as i32;
        if xx < 0 || xx >= buf.w as i32 {
            continue;
        }
        if let Some(under) = buf.get(xx as u16, y as u16) {
            buf.set(
                xx as u16,
                y as u16,
                Cell {
                    ch,
                    fg: mix(under.bg, fg, opacity),
                    bg: under.bg,
                },
            );
        }
    }
}

/// Column where `text` must start to be centred in `width` cells.
pub(crate) fn centered_x(width: u16, text: &str) -> i32 {
    (width as i32 - text.chars().count() as i32) / 2
}

pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
    scale: f32,
}

impl Terminal {
    pub(crate) fn begin(scale: f32) -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        let mut term = Self {
            out,
            cols: 0,
            rows: 0,
            prev: CellBuffer::new(0, 0),
            cur: CellBuffer::new(0, 0),
            canvas: PixelCanvas::for_cells(0, 0, scale),
            scale,
        };
        term.resize(cols, rows);
        Ok(term)
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Surface-unit viewport of the current canvas.
    pub(crate) fn viewport(&self) -> (f32, f32) {
        self.canvas.extent()
    }

    /// Surface point at the centre of cell `(col, row)`.
    pub(crate) fn cell_to_surface(&self, col: u16, row: u16) -> (f32, f32) {
        cell_center(col, row, self.scale)
    }

    pub(crate) fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.prev = CellBuffer::new(cols, rows);
        self.cur = CellBuffer::new(cols, rows);
        self.canvas = PixelCanvas::for_cells(cols, rows, self.scale);
        // force a full repaint
        self.prev.cells.fill(Cell {
            ch: '\0',
            ..Cell::default()
        });
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let cols = self.cols as usize;

        for y in 0..self.rows {
            let mut x = 0usize;
            while x < cols {
                let i = y as usize * cols + x;
                if self.cur.cells[i] == self.prev.cells[i] {
                    x += 1;
                    continue;
                }
                let mut x2 = x + 1;
                while x2 < cols {
                    let j = y as usize * cols + x2;
                    if self.cur.cells[j] == self.prev.cells[j] {
                        break;
                    }
                    x2 += 1;
                }

                queue!(self.out, cursor::MoveTo(x as u16, y))?;
                for xx in x..x2 {
                    let c = self.cur.cells[y as usize * cols + xx];
                    if last_bg != Some(c.bg) {
                        queue!(self.out, SetBackgroundColor(to_term(c.bg)))?;
                        last_bg = Some(c.bg);
                    }
                    if last_fg != Some(c.fg) {
                        queue!(self.out, SetForegroundColor(to_term(c.fg)))?;
                        last_fg = Some(c.fg);
                    }
                    queue!(self.out, Print(c.ch))?;
                }
                x = x2;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

pub(crate) fn cell_center(col: u16, row: u16, scale: f32) -> (f32, f32) {
    use crate::canvas::{SUB_X, SUB_Y};
    (
        (col as f32 + 0.5) * SUB_X as f32 * scale,
        (row as f32 + 0.5) * SUB_Y as f32 * scale,
    )
}

fn to_term(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_maps_to_cell_centre() {
        assert_eq!(cell_center(0, 0, 4.0), (4.0, 8.0));
        assert_eq!(cell_center(50, 18, 4.0), (404.0, 296.0));
    }

    #[test]
    fn text_blends_over_existing_background() {
        let mut buf = CellBuffer::new(10, 2);
        let sky = Rgb::new(13, 13, 29);
        for c in &mut buf.cells {
            *c = Cell::blank(sky);
        }
        draw_text(&mut buf, 2, 1, "hi", Rgb::WHITE, 1.0);
        assert_eq!(buf.get(2, 1).map(|c| c.ch), Some('h'));
        assert_eq!(buf.get(3, 1).map(|c| c.fg), Some(Rgb::WHITE));
        assert_eq!(buf.get(3, 1).map(|c| c.bg), Some(sky));
    }

    #[test]
    fn invisible_text_and_overflow_are_ignored() {
        let mut buf = CellBuffer::new(4, 1);
        draw_text(&mut buf, 0, 0, "gone", Rgb::WHITE, 0.0);
        assert!(buf.cells.iter().all(|c| c.ch == ' '));

        draw_text(&mut buf, 2, 0, "abcd", Rgb::WHITE, 1.0);
        let row: String = buf.cells.iter().map(|c| c.ch).collect();
        assert_eq!(row, "  ab");
        draw_text(&mut buf, 0, 5, "x", Rgb::WHITE, 1.0);
    }

    #[test]
    fn centring() {
        assert_eq!(centered_x(20, "hello"), 7);
        assert_eq!(centered_x(3, "hello"), -1);
    }
}
