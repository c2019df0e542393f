//! Fixtures for exercising the engine against a reference buffer and layout.
//!
//! Fixture markup is plain text with cursor markers: `|` is a caret and
//! `[`…`]` is a selection. `"a|b[cd]"` is the text `abcd` with a caret at 1
//! and the range `2..4` selected.

use crate::{CursorEngine, GridLayout, Host, RopeBuffer, TextBuffer, TextRange, UndoStack};

/// Split markup into its text and the ranges it marks, in marker order.
///
/// # Panics
///
/// On nested or unbalanced brackets.
pub fn parse(markup: &str) -> (String, Vec<TextRange>) {
    let mut text = String::new();
    let mut ranges = Vec::new();
    let mut open = None;
    let mut offset = 0;
    for c in markup.chars() {
        match c {
            '|' => ranges.push(TextRange::caret(offset)),
            '[' => {
                assert!(open.is_none(), "nested selection in {markup:?}");
                open = Some(offset);
            }
            ']' => {
                let Some(start) = open.take() else {
                    panic!("unbalanced ] in {markup:?}");
                };
                ranges.push(TextRange::new(start, offset));
            }
            _ => {
                text.push(c);
                offset += 1;
            }
        }
    }
    assert!(open.is_none(), "unclosed [ in {markup:?}");
    (text, ranges)
}

/// Render text and ranges as markup.
pub fn render(text: &str, ranges: &[TextRange]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 2);
    for i in 0..=chars.len() {
        for _ in ranges.iter().filter(|r| !r.is_empty() && r.end == i) {
            out.push(']');
        }
        for _ in ranges.iter().filter(|r| r.is_empty() && r.start == i) {
            out.push('|');
        }
        for _ in ranges.iter().filter(|r| !r.is_empty() && r.start == i) {
            out.push('[');
        }
        if let Some(c) = chars.get(i) {
            out.push(*c);
        }
    }
    out
}

/// A buffer, layout, history and engine built from markup.
#[derive(Debug)]
pub struct Fixture {
    /// Text storage.
    pub buffer: RopeBuffer,
    /// Geometry.
    pub layout: GridLayout,
    /// History.
    pub undo: UndoStack,
    /// The engine under test.
    pub engine: CursorEngine,
}

impl Fixture {
    /// A fixture with an unwrapped layout and default settings. Markup
    /// without markers puts a caret at 0.
    pub fn new(markup: &str) -> Self {
        Self::build(markup, GridLayout::new(), CursorEngine::new())
    }

    /// A fixture with a custom layout.
    pub fn with_layout(markup: &str, layout: GridLayout) -> Self {
        Self::build(markup, layout, CursorEngine::new())
    }

    /// A fixture with a preconfigured engine.
    pub fn with_engine(markup: &str, engine: CursorEngine) -> Self {
        Self::build(markup, GridLayout::new(), engine)
    }

    /// Assemble the parts and place the marked ranges.
    fn build(markup: &str, mut layout: GridLayout, mut engine: CursorEngine) -> Self {
        let (text, ranges) = parse(markup);
        let mut buffer = RopeBuffer::new(text);
        let mut undo = UndoStack::new();
        let host = Host::new(&mut buffer, &mut layout, &mut undo);
        engine.set_ranges(&host, ranges);
        Self {
            buffer,
            layout,
            undo,
            engine,
        }
    }

    /// Run `f` with the engine and a host borrowing the fixture's parts.
    pub fn run<T>(&mut self, f: impl FnOnce(&mut CursorEngine, &mut Host<'_>) -> T) -> T {
        let mut host = Host::new(&mut self.buffer, &mut self.layout, &mut self.undo);
        f(&mut self.engine, &mut host)
    }

    /// Buffer contents.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// The buffer with the engine's ranges marked.
    pub fn render(&self) -> String {
        render(&self.text(), self.engine.ranges())
    }

    /// The buffer with arbitrary ranges marked.
    pub fn render_ranges(&self, ranges: &[TextRange]) -> String {
        render(&self.text(), ranges)
    }
}
