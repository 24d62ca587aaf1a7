use crate::fonts::{self, Face};

/// One fixed page size (ISO A4 proportions in user units) and margin.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 50.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// An abstract draw command: one run of text at an absolute position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub face: Face,
    pub size: f32,
    pub color: [f32; 3],
}

/// The layout cursor: owns the accumulated pages and the vertical position,
/// which starts at `PAGE_HEIGHT - MARGIN` and decreases monotonically within
/// a page. All pagination goes through [`PageCursor::ensure_room`].
#[derive(Debug)]
pub struct PageCursor {
    completed_pages: Vec<Vec<TextRun>>,
    current_page: Vec<TextRun>,
    y: f32,
}

impl PageCursor {
    pub fn new() -> Self {
        PageCursor {
            completed_pages: Vec::new(),
            current_page: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// The greedy fits-check: if the upcoming block of the given height would
    /// cross the bottom margin, start a new page first. Returns whether a new
    /// page was started. There is no lookahead beyond the given height and no
    /// widow control; callers that need a room title kept with its first item
    /// pass a height covering both.
    pub fn ensure_room(&mut self, height: f32) -> bool {
        if self.y - height < MARGIN {
            self.completed_pages
                .push(std::mem::take(&mut self.current_page));
            self.y = PAGE_HEIGHT - MARGIN;
            true
        } else {
            false
        }
    }

    /// Emits a text run at the cursor's current vertical position.
    pub fn write(&mut self, x: f32, text: impl Into<String>, face: Face, size: f32, color: [f32; 3]) {
        self.current_page.push(TextRun {
            x,
            y: self.y,
            text: text.into(),
            face,
            size,
            color,
        });
    }

    /// Moves the cursor down by `height`.
    pub fn advance(&mut self, height: f32) {
        self.y -= height;
    }

    pub fn into_pages(mut self) -> Vec<Vec<TextRun>> {
        self.completed_pages.push(self.current_page);
        self.completed_pages
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Greedy word-wrap of a multi-line description. The text is split on
/// explicit newlines into paragraphs; blank paragraphs contribute nothing.
/// Within a paragraph, words accumulate with a trailing space until the
/// accumulated run would exceed `max_width`, at which point the run is
/// flushed trimmed of its trailing space and the word starts the next run.
/// A single word wider than `max_width` is never split.
pub fn wrap_paragraphs(text: &str, face: Face, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            continue;
        }

        let mut current_line = String::new();
        for word in paragraph.split(' ') {
            let candidate = format!("{current_line}{word} ");
            if fonts::text_width(face, &candidate, font_size) > max_width
                && !current_line.is_empty()
            {
                lines.push(current_line.trim_end().to_string());
                current_line = format!("{word} ");
            } else {
                current_line = candidate;
            }
        }
        if !current_line.trim().is_empty() {
            lines.push(current_line.trim_end().to_string());
        }
    }

    lines
}
