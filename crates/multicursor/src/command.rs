use geom::Direction;
use serde::{Deserialize, Serialize};

use crate::{ClipboardContents, Towards, segment};

/// The unit a movement or deletion operates on.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One grapheme cluster horizontally, one visual line vertically.
    Character,
    /// Word boundaries.
    Word,
    /// Visual line edges.
    Line,
    /// Paragraph (logical line) edges.
    Paragraph,
    /// One page of visual lines.
    Page,
    /// The whole document.
    Document,
}

/// A case conversion applied to whole words.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseTransform {
    /// Upper case.
    Upper,
    /// Lower case.
    Lower,
    /// Title case for each word.
    Capitalize,
}

impl CaseTransform {
    /// Convert one word.
    pub fn apply(self, word: &str) -> String {
        match self {
            Self::Upper => word.to_uppercase(),
            Self::Lower => word.to_lowercase(),
            Self::Capitalize => segment::capitalize_first(&word.to_lowercase()),
        }
    }
}

/// A standard editing verb, dispatched with
/// [`CursorEngine::perform`](crate::CursorEngine::perform).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move every range, collapsing selections.
    Translate(Direction, Granularity),
    /// Grow every range in a direction.
    Extend(Direction, Granularity),
    /// Insert text at every range.
    InsertText(String),
    /// Insert a line break at every range.
    InsertNewline,
    /// Insert one indentation unit at every range.
    InsertTab,
    /// Delete towards a boundary at every caret; selections are deleted as-is.
    Delete(Towards, Granularity),
    /// Delete non-empty ranges only.
    DeleteSelection,
    /// Remove the last scalar value before every caret.
    DeleteBackwardDecomposing,
    /// Change the case of the words under every range.
    Transform(CaseTransform),
    /// Swap the graphemes around every caret.
    Transpose,
    /// Indent every paragraph a range touches.
    Indent,
    /// Outdent every paragraph a range touches.
    Outdent,
    /// Copy ranges to a clipboard payload.
    Copy,
    /// Copy ranges, then delete them.
    Cut,
    /// Paste a clipboard payload.
    Paste(ClipboardContents),
    /// Add a caret on the adjacent visual line.
    AddCursor(Direction),
    /// Return to a single selection.
    Cancel,
    /// Revert the last undo group.
    Undo,
    /// Reapply the last undone group.
    Redo,
}

/// The result of performing a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// True if the cursor set or the buffer changed.
    pub changed: bool,
    /// A payload for the host to place on the clipboard.
    pub clipboard: Option<ClipboardContents>,
}

impl Outcome {
    /// An outcome carrying only a change flag.
    pub fn changed(changed: bool) -> Self {
        Self {
            changed,
            clipboard: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms() {
        assert_eq!(CaseTransform::Upper.apply("straße"), "STRASSE");
        assert_eq!(CaseTransform::Lower.apply("ÀB"), "àb");
        assert_eq!(CaseTransform::Capitalize.apply("hELLO"), "Hello");
    }

    #[test]
    fn granularity_names() {
        let g: Granularity = serde_json::from_str(r#""paragraph""#).unwrap();
        assert_eq!(g, Granularity::Paragraph);
    }
}
