//! Character framebuffer for the HUD.
//!
//! Cells carry a semantic [`Tone`] instead of raw colors; the renderer owns the
//! palette.

/// Semantic styling of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    Title,
    Label,
    Value,
    Banner,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub tone: Tone,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        tone: Tone::Plain,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize, keeping the allocation when it is large enough.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::BLANK);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn put(&mut self, x: u16, y: u16, ch: char, tone: Tone) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { ch, tone };
        }
    }

    /// Write `s` from `(x, y)`, clipped at the right edge. Returns the column after the text.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, tone: Tone) -> u16 {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.put(cx, y, ch, tone);
            cx += 1;
        }
        cx
    }

    /// Write `n` right-aligned so its last digit lands in column `right`.
    pub fn put_number(&mut self, right: u16, y: u16, mut n: u32, tone: Tone) {
        let mut x = right;
        loop {
            // n % 10 < 10, so the digit always exists
            let digit = char::from_digit(n % 10, 10).unwrap_or('0');
            self.put(x, y, digit, tone);
            n /= 10;
            if n == 0 || x == 0 {
                break;
            }
            x -= 1;
        }
    }

    /// Text of row `y` with trailing blanks trimmed (tests, debugging).
    pub fn row_text(&self, y: u16) -> String {
        let row: String = (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|cell| cell.ch)
            .collect();
        row.trim_end().to_string()
    }
}
