//! The cursor engine: owns the range set and runs every command across it.

/// IME composition state.
mod compose;
/// Buffer-mutating commands.
mod edit;
/// Translation and extension.
mod movement;
/// Grouped copy and paste.
mod paste;

use std::time::Instant;

use geom::{Direction, Point, Rect};
use tracing::{debug, trace, warn};

use self::compose::Composition;
use crate::{
    CaseTransform, ClipboardContents, Command, CursorSet, EngineConfig, Granularity, Host,
    Inverse, Outcome, TextRange, Towards,
    cursors::resync_all,
    gesture::{self, ClickTracker, DragState, Mods},
};

/// Multi-range selection state, and the commands that act on it.
///
/// The engine owns only the cursor set and transient gesture state. The text,
/// its layout and the undo history are borrowed through a [`Host`] for each
/// call. Every command works in single mode too, operating on the one range.
#[derive(Debug, Clone)]
pub struct CursorEngine {
    /// Settings.
    config: EngineConfig,
    /// The current ranges.
    cursors: CursorSet,
    /// Pointer drag in progress.
    drag: Option<DragState>,
    /// IME composition in progress.
    composition: Option<Composition>,
    /// Click counting for presses.
    clicks: ClickTracker,
}

impl Default for CursorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorEngine {
    /// An engine with a caret at offset 0 and default settings.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// An engine with the given settings.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            clicks: ClickTracker::new(config.double_click()),
            config,
            cursors: CursorSet::default(),
            drag: None,
            composition: None,
        }
    }

    /// The engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The cursor set.
    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    /// All ranges, ascending.
    pub fn ranges(&self) -> &[TextRange] {
        self.cursors.ranges()
    }

    /// Is multi-cursor mode active?
    pub fn is_multi(&self) -> bool {
        self.cursors.is_multi()
    }

    /// The ranges the host should draw as engine selections. `None` in
    /// single mode, where the host draws its own selection.
    pub fn active_ranges(&self) -> Option<&[TextRange]> {
        self.cursors.is_multi().then(|| self.cursors.ranges())
    }

    /// Replace the cursor set. Ranges are normalised and merged. An empty
    /// input leaves the set unchanged.
    ///
    /// # Panics
    ///
    /// If a range reaches past the end of the buffer.
    pub fn set_ranges(
        &mut self,
        host: &Host<'_>,
        ranges: impl IntoIterator<Item = TextRange>,
    ) -> bool {
        self.commit(ranges.into_iter().collect(), host.len())
    }

    /// One-cell rectangles for every caret, for drawing in multi mode.
    pub fn caret_rects(&self, host: &Host<'_>) -> Vec<Rect> {
        let Some(ranges) = self.active_ranges() else {
            return Vec::new();
        };
        ranges
            .iter()
            .filter(|r| r.is_empty())
            .filter_map(|&r| host.layout.rect_for(r))
            .map(|rect| Rect { w: 1, ..rect })
            .collect()
    }

    /// Leave multi mode, keeping the last range.
    pub fn cancel(&mut self) -> bool {
        if !self.cursors.is_multi() {
            return false;
        }
        let before = self.cursors.len();
        self.cursors = CursorSet::Single(self.cursors.last());
        self.drag = None;
        debug!(command = "cancel", before, "cursors");
        true
    }

    /// Move every range, collapsing selections.
    pub fn translate(
        &mut self,
        host: &Host<'_>,
        direction: Direction,
        granularity: Granularity,
    ) -> bool {
        let ranges = movement::translate(
            &*host.layout,
            host.len(),
            self.ranges(),
            direction,
            granularity,
        );
        self.moved(host, "translate", ranges)
    }

    /// Grow every range in a direction.
    pub fn extend(&mut self, host: &Host<'_>, direction: Direction, granularity: Granularity) -> bool {
        let ranges =
            movement::extend(&*host.layout, host.len(), self.ranges(), direction, granularity);
        self.moved(host, "extend", ranges)
    }

    /// Insert text at every range. While IME text is marked this commits the
    /// composition at every saved cursor instead.
    pub fn insert_text(&mut self, host: &mut Host<'_>, text: &str) -> bool {
        if let Some(composition) = self.composition.take() {
            self.cursors = composition.revert(host);
        }
        self.edit(host, "insert_text", |host, ranges| {
            edit::insert(host, ranges, text)
        })
    }

    /// Insert a line break at every range.
    pub fn insert_newline(&mut self, host: &mut Host<'_>) -> bool {
        self.insert_text(host, "\n")
    }

    /// Insert one indentation unit at every range.
    pub fn insert_tab(&mut self, host: &mut Host<'_>) -> bool {
        let unit = self.config.tab_text();
        self.insert_text(host, &unit)
    }

    /// Delete every selection, and from every caret towards a boundary.
    pub fn delete(&mut self, host: &mut Host<'_>, towards: Towards, granularity: Granularity) -> bool {
        self.edit(host, "delete", |host, ranges| {
            edit::delete(host, ranges, towards, granularity)
        })
    }

    /// Delete selections, leaving carets alone.
    pub fn delete_selection(&mut self, host: &mut Host<'_>) -> bool {
        self.edit(host, "delete_selection", edit::delete_selection)
    }

    /// Backspace that strips one scalar value, so a base character keeps its
    /// remaining combining marks.
    pub fn delete_backward_decomposing(&mut self, host: &mut Host<'_>) -> bool {
        self.edit(host, "delete_backward_decomposing", edit::delete_decomposing)
    }

    /// Change the case of the words under every range.
    pub fn transform(&mut self, host: &mut Host<'_>, case: CaseTransform) -> bool {
        self.edit(host, "transform", |host, ranges| {
            edit::transform(host, ranges, case)
        })
    }

    /// Swap the graphemes around every caret.
    pub fn transpose(&mut self, host: &mut Host<'_>) -> bool {
        self.edit(host, "transpose", edit::transpose)
    }

    /// Indent every paragraph a range touches.
    pub fn indent(&mut self, host: &mut Host<'_>) -> bool {
        let unit = self.config.tab_text();
        self.edit(host, "indent", |host, ranges| edit::indent(host, ranges, &unit))
    }

    /// Outdent every paragraph a range touches.
    pub fn outdent(&mut self, host: &mut Host<'_>) -> bool {
        let tab_stop = self.config.tab_stop;
        self.edit(host, "outdent", |host, ranges| {
            edit::outdent(host, ranges, tab_stop)
        })
    }

    /// Copy every range.
    pub fn copy(&self, host: &Host<'_>) -> ClipboardContents {
        paste::copy(host, self.ranges())
    }

    /// Copy every range, then delete the selections.
    pub fn cut(&mut self, host: &mut Host<'_>) -> ClipboardContents {
        let contents = self.copy(host);
        self.delete_selection(host);
        contents
    }

    /// Paste clipboard contents. A group side channel hands one group to each
    /// cursor, placing surplus groups on the lines below; otherwise the text
    /// goes in at every range.
    pub fn paste(&mut self, host: &mut Host<'_>, contents: &ClipboardContents) -> bool {
        let groups = match contents.groups() {
            Ok(groups) => groups,
            Err(e) => {
                warn!(error = %e, "ignoring clipboard groups");
                None
            }
        };
        match groups {
            Some(groups) => self.edit(host, "paste", |host, ranges| {
                paste::paste_groups(host, ranges, &groups)
            }),
            _ => self.edit(host, "paste", |host, ranges| {
                edit::insert(host, ranges, &contents.text)
            }),
        }
    }

    /// Replace an arbitrary range on the host's behalf. Every cursor moves so
    /// it keeps denoting the same text; cursors inside a deleted span are
    /// dropped.
    pub fn replace_characters(&mut self, host: &mut Host<'_>, range: TextRange, text: &str) -> bool {
        let snapshot = self.cursors.clone();
        let ranges = host.grouped(&snapshot, |host| {
            let new = host.replace(range, text)?;
            let out = resync_all(snapshot.ranges(), range, new);
            Some(if out.is_empty() {
                vec![TextRange::caret(new.end)]
            } else {
                out
            })
        });
        let Some(ranges) = ranges else {
            return false;
        };
        self.commit(ranges, host.len());
        debug!(
            command = "replace_characters",
            before = snapshot.len(),
            after = self.cursors.len(),
            "edit"
        );
        true
    }

    /// Show provisional IME text at the first cursor. The full cursor set is
    /// saved and comes back when the composition ends.
    pub fn set_marked_text(&mut self, host: &mut Host<'_>, text: &str) -> bool {
        let mut composition = match self.composition.take() {
            Some(composition) => composition,
            None => Composition::begin(host, &self.cursors),
        };
        let marked = composition.mark(host, text);
        self.cursors = CursorSet::Single(TextRange::caret(composition.marked.end));
        self.composition = Some(composition);
        debug!(command = "set_marked_text", marked, "compose");
        marked
    }

    /// Is IME text marked?
    pub fn has_marked_text(&self) -> bool {
        self.composition.is_some()
    }

    /// The range of the marked text.
    pub fn marked_range(&self) -> Option<TextRange> {
        self.composition.as_ref().map(|c| c.marked)
    }

    /// Commit the marked text as typed.
    pub fn unmark_text(&mut self, host: &mut Host<'_>) -> bool {
        let Some(composition) = &self.composition else {
            return false;
        };
        let text = host.substring(composition.marked);
        self.insert_text(host, &text)
    }

    /// Drop the marked text and restore the saved cursors.
    pub fn abandon_marked_text(&mut self, host: &mut Host<'_>) -> bool {
        let Some(composition) = self.composition.take() else {
            return false;
        };
        self.cursors = composition.revert(host);
        debug!(command = "abandon_marked_text", "compose");
        true
    }

    /// Add a caret on the display line above or below the last cursor, at
    /// the same column. Landing on an existing caret changes nothing.
    pub fn add_cursor(&mut self, host: &Host<'_>, direction: Direction) -> bool {
        let from = self.cursors.last().end;
        let Some(offset) = host.layout.offset_on_adjacent_line(from, direction) else {
            trace!(from, ?direction, "no adjacent line");
            return false;
        };
        let mut ranges = self.ranges().to_vec();
        ranges.push(TextRange::caret(offset));
        self.moved(host, "add_cursor", ranges)
    }

    /// Handle a key press. Only ctrl+shift with a vertical arrow is claimed;
    /// it adds a cursor on the adjacent line.
    pub fn key_down(&mut self, host: &Host<'_>, direction: Direction, mods: Mods) -> bool {
        if mods.is_additive() && direction.is_vertical() {
            self.add_cursor(host, direction)
        } else {
            false
        }
    }

    /// Register a pointer press, counting repeated clicks, and begin a drag.
    pub fn press(&mut self, host: &Host<'_>, point: Point, mods: Mods, now: Instant) -> bool {
        let clicks = self.clicks.click(point, now);
        self.begin_drag(host, point, mods, clicks)
    }

    /// Begin a drag at `point`.
    ///
    /// Alt alone starts a rectangular selection. Ctrl+shift adds a cursor,
    /// widened to a word or paragraph on a double or triple click. Without
    /// modifiers the set collapses to the clicked caret, word or paragraph.
    pub fn begin_drag(&mut self, host: &Host<'_>, point: Point, mods: Mods, clicks: u8) -> bool {
        if mods.is_rectangular() {
            self.drag = Some(DragState::Rectangle {
                anchor: point,
                current: point,
            });
            self.drag_rectangle(host, point, point);
            return true;
        }
        let Some(offset) = host.layout.offset_at(point) else {
            trace!(?point, "press outside text");
            return false;
        };
        let granularity = gesture::granularity_for_clicks(clicks);
        let range = gesture::expand_at(&*host.layout, offset, granularity);
        let base: Vec<TextRange> = if mods.is_additive() {
            self.ranges()
                .iter()
                .copied()
                .filter(|r| clicks <= 1 || !r.touches(offset))
                .collect()
        } else {
            Vec::new()
        };
        let mut ranges = base.clone();
        ranges.push(range);
        self.drag = Some(DragState::Extend {
            anchor: range,
            granularity,
            base,
        });
        self.moved(host, "press", ranges);
        true
    }

    /// Follow the pointer during a drag. The dragged range is merged afresh
    /// with the cursors that existed before the press on every motion.
    pub fn continue_drag(&mut self, host: &Host<'_>, point: Point) -> bool {
        match &mut self.drag {
            Some(DragState::Rectangle { anchor, current }) => {
                *current = point;
                let anchor = *anchor;
                self.drag_rectangle(host, anchor, point)
            }
            Some(DragState::Extend {
                anchor,
                granularity,
                base,
            }) => {
                let offset = gesture::drag_offset(&*host.layout, point, host.len());
                let range = gesture::extend_to(&*host.layout, *anchor, offset, *granularity);
                let mut ranges = base.clone();
                ranges.push(range);
                self.moved(host, "drag", ranges)
            }
            None => false,
        }
    }

    /// Finish a drag.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Is a drag in progress?
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Revert the last undo group, restoring text and cursors.
    pub fn undo(&mut self, host: &mut Host<'_>) -> bool {
        match host.undo.take_undo() {
            Some(group) => {
                self.replay(host, "undo", group);
                true
            }
            None => false,
        }
    }

    /// Reapply the last undone group.
    pub fn redo(&mut self, host: &mut Host<'_>) -> bool {
        match host.undo.take_redo() {
            Some(group) => {
                self.replay(host, "redo", group);
                true
            }
            None => false,
        }
    }

    /// Run a command.
    pub fn perform(&mut self, host: &mut Host<'_>, command: &Command) -> Outcome {
        let changed = match command {
            Command::Translate(direction, granularity) => {
                self.translate(host, *direction, *granularity)
            }
            Command::Extend(direction, granularity) => self.extend(host, *direction, *granularity),
            Command::InsertText(text) => self.insert_text(host, text),
            Command::InsertNewline => self.insert_newline(host),
            Command::InsertTab => self.insert_tab(host),
            Command::Delete(towards, granularity) => self.delete(host, *towards, *granularity),
            Command::DeleteSelection => self.delete_selection(host),
            Command::DeleteBackwardDecomposing => self.delete_backward_decomposing(host),
            Command::Transform(case) => self.transform(host, *case),
            Command::Transpose => self.transpose(host),
            Command::Indent => self.indent(host),
            Command::Outdent => self.outdent(host),
            Command::Copy => {
                return Outcome {
                    changed: false,
                    clipboard: Some(self.copy(host)),
                };
            }
            Command::Cut => {
                let revision = host.buffer.revision();
                let clipboard = self.cut(host);
                return Outcome {
                    changed: host.buffer.revision() != revision,
                    clipboard: Some(clipboard),
                };
            }
            Command::Paste(contents) => self.paste(host, contents),
            Command::AddCursor(direction) => self.add_cursor(host, *direction),
            Command::Cancel => self.cancel(),
            Command::Undo => self.undo(host),
            Command::Redo => self.redo(host),
        };
        Outcome::changed(changed)
    }

    /// Run a buffer-mutating command as one undo group and store the ranges
    /// it returns. A pending composition is committed first.
    fn edit(
        &mut self,
        host: &mut Host<'_>,
        command: &'static str,
        f: impl FnOnce(&mut Host<'_>, &[TextRange]) -> Vec<TextRange>,
    ) -> bool {
        if self.composition.is_some() {
            self.unmark_text(host);
        }
        let snapshot = self.cursors.clone();
        let revision = host.buffer.revision();
        let ranges = host.grouped(&snapshot, |host| f(host, snapshot.ranges()));
        let edited = host.buffer.revision() != revision;
        let moved = self.commit(ranges, host.len());
        debug!(
            command,
            before = snapshot.len(),
            after = self.cursors.len(),
            multi = self.cursors.is_multi(),
            edited,
            "edit"
        );
        edited || moved
    }

    /// Store ranges produced by a command that does not touch the text.
    fn moved(&mut self, host: &Host<'_>, command: &'static str, ranges: Vec<TextRange>) -> bool {
        let before = self.cursors.len();
        let moved = self.commit(ranges, host.len());
        debug!(
            command,
            before,
            after = self.cursors.len(),
            multi = self.cursors.is_multi(),
            "move"
        );
        moved
    }

    /// Apply an undo or redo group in reverse, inside a group of its own so
    /// the opposite history receives the inverses.
    fn replay(&mut self, host: &mut Host<'_>, command: &'static str, group: Vec<Inverse>) {
        if let Some(composition) = self.composition.take() {
            self.cursors = composition.revert(host);
        }
        let snapshot = self.cursors.clone();
        let restored = host.grouped(&snapshot, |host| {
            let mut restored = None;
            for inverse in group.into_iter().rev() {
                match inverse {
                    Inverse::Cursors(set) => restored = Some(set),
                    Inverse::Replace { range, text } => {
                        if host.replace(range, &text).is_none() {
                            trace!(range = %range, "replay step vetoed");
                        }
                    }
                }
            }
            restored
        });
        let len = host.len();
        let ranges = restored
            .as_ref()
            .unwrap_or(&snapshot)
            .ranges()
            .iter()
            .map(|&r| r.clamp(len))
            .collect();
        self.commit(ranges, len);
        debug!(
            command,
            after = self.cursors.len(),
            multi = self.cursors.is_multi(),
            "replay"
        );
    }

    /// Replace the set with a rectangular drag's ranges.
    fn drag_rectangle(&mut self, host: &Host<'_>, anchor: Point, current: Point) -> bool {
        let ranges = gesture::rectangle_ranges(&*host.layout, anchor, current);
        if ranges.is_empty() {
            trace!(?anchor, ?current, "rectangle covers no text");
            return false;
        }
        self.moved(host, "rectangle", ranges)
    }

    /// Normalise and store `ranges`. An empty list keeps the current set.
    ///
    /// # Panics
    ///
    /// If a range reaches past `len`.
    fn commit(&mut self, ranges: Vec<TextRange>, len: usize) -> bool {
        let Some(set) = CursorSet::from_ranges(ranges) else {
            trace!("no ranges left; keeping the current set");
            return false;
        };
        assert!(
            set.fits(len),
            "cursor set {set:?} reaches past buffer end {len}"
        );
        if set == self.cursors {
            return false;
        }
        self.cursors = set;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridLayout, TextBuffer, WrapMode, gesture::Alt, testing::Fixture};

    #[test]
    fn scenario_word_movement() {
        let mut fx = Fixture::new("foo| bar| baz|");
        fx.run(|e, host| e.translate(host, Direction::Left, Granularity::Word));
        assert_eq!(fx.render(), "|foo |bar |baz");
    }

    #[test]
    fn collapse_reverts_to_single() {
        let mut fx = Fixture::new("a|b|c");
        fx.run(|e, host| e.delete(host, Towards::Start, Granularity::Character));
        assert_eq!(fx.render(), "|c");
        assert!(!fx.engine.is_multi());
        assert_eq!(fx.engine.active_ranges(), None);
        fx.run(|e, host| e.translate(host, Direction::Right, Granularity::Character));
        assert_eq!(fx.render(), "c|");
    }

    #[test]
    fn vertical_extend_drops_stuck_ranges() {
        let mut fx = Fixture::new("a|bc\nd|ef");
        fx.run(|e, host| e.extend(host, Direction::Down, Granularity::Character));
        assert_eq!(fx.render(), "a[bc\nd]ef");
    }

    #[test]
    fn insert_tab_uses_configured_stop() {
        let engine = CursorEngine::with_config(EngineConfig::new().with_tab_stop(2));
        let mut fx = Fixture::with_engine("a|\nb|", engine);
        fx.run(|e, host| e.insert_tab(host));
        assert_eq!(fx.render(), "a  |\nb  |");
    }

    #[test]
    fn add_cursor_follows_wrapped_rows() {
        let layout = GridLayout::new().with_wrap(WrapMode::Soft, 4);
        let mut fx = Fixture::with_layout("ab|cdefgh", layout);
        assert!(fx.run(|e, host| e.add_cursor(host, Direction::Down)));
        assert_eq!(fx.render(), "ab|cdef|gh");
        assert!(!fx.run(|e, host| e.add_cursor(host, Direction::Down)));
    }

    #[test]
    fn cancel_keeps_last() {
        let mut fx = Fixture::new("a|b[c]");
        assert!(fx.engine.cancel());
        assert_eq!(fx.render(), "ab[c]");
        assert!(!fx.engine.cancel());
    }

    #[test]
    fn caret_rects_in_multi_mode() {
        let mut fx = Fixture::new("a|b\n[c]d|");
        let rects = fx.run(|e, host| e.caret_rects(host));
        assert_eq!(rects, vec![Rect::new(1, 0, 1, 1), Rect::new(2, 1, 1, 1)]);
        let mut fx = Fixture::new("a|b");
        assert!(fx.run(|e, host| e.caret_rects(host)).is_empty());
    }

    #[test]
    fn undo_restores_text_and_cursors() {
        let mut fx = Fixture::new("a|b|c");
        fx.run(|e, host| e.insert_text(host, "xy"));
        assert_eq!(fx.render(), "axy|bxy|c");
        fx.run(|e, host| e.translate(host, Direction::Right, Granularity::Document));
        assert!(fx.run(|e, host| e.undo(host)));
        assert_eq!(fx.render(), "a|b|c");
        assert!(fx.run(|e, host| e.redo(host)));
        assert_eq!(fx.render(), "axybxyc|");
        assert!(fx.run(|e, host| e.undo(host)));
        assert!(!fx.run(|e, host| e.undo(host)));
    }

    #[test]
    fn composition_commits_everywhere() {
        let mut fx = Fixture::new("a|b|");
        fx.run(|e, host| e.set_marked_text(host, "n"));
        assert_eq!(fx.text(), "anb");
        assert!(fx.engine.has_marked_text());
        fx.run(|e, host| e.set_marked_text(host, "ñ"));
        assert_eq!(fx.engine.marked_range(), Some(TextRange::new(1, 2)));
        fx.run(|e, host| e.insert_text(host, "ñ"));
        assert_eq!(fx.render(), "añ|bñ|");
        assert!(!fx.engine.has_marked_text());
        assert_eq!(fx.undo.undo_len(), 1);
        fx.run(|e, host| e.undo(host));
        assert_eq!(fx.render(), "a|b|");
    }

    #[test]
    fn unmark_commits_marked_text() {
        let mut fx = Fixture::new("|x|");
        fx.run(|e, host| e.set_marked_text(host, "k"));
        fx.run(|e, host| e.unmark_text(host));
        assert_eq!(fx.render(), "k|xk|");
        fx.run(|e, host| e.set_marked_text(host, "z"));
        fx.run(|e, host| e.abandon_marked_text(host));
        assert_eq!(fx.render(), "k|xk|");
    }

    #[test]
    fn replace_characters_resyncs() {
        let mut fx = Fixture::new("ab|cd[ef]gh|");
        fx.run(|e, host| e.replace_characters(host, TextRange::new(0, 1), "XYZ"));
        assert_eq!(fx.render(), "XYZb|cd[ef]gh|");
        fx.run(|e, host| e.replace_characters(host, TextRange::new(5, 10), ""));
        assert_eq!(fx.render(), "XYZb|c|");
        let mut fx = Fixture::new("ab[cd]");
        fx.run(|e, host| e.replace_characters(host, TextRange::new(2, 4), ""));
        assert_eq!(fx.render(), "ab|");
    }

    #[test]
    fn cut_and_paste_round_trip() {
        let mut fx = Fixture::new("[one] [two\nthree] x|");
        let outcome = fx.run(|e, host| e.perform(host, &Command::Cut));
        assert!(outcome.changed);
        let clipboard = outcome.clipboard.unwrap();
        assert_eq!(fx.render(), "| | x|");
        fx.run(|e, host| e.paste(host, &clipboard));
        assert_eq!(fx.render(), "one| two\nthree| x|");
        assert_eq!(fx.buffer.text(), "one two\nthree x");
    }

    #[test]
    fn malformed_groups_fall_back_to_plain() {
        let mut fx = Fixture::new("|a|");
        let c = ClipboardContents {
            text: "x".into(),
            groups: Some(vec![2]),
        };
        fx.run(|e, host| e.paste(host, &c));
        assert_eq!(fx.render(), "x|ax|");
    }

    #[test]
    fn add_cursor_steps_from_last() {
        let mut fx = Fixture::new("abc\nabc\na|bc\nabc");
        fx.run(|e, host| e.key_down(host, Direction::Up, Mods::default()));
        assert!(!fx.engine.is_multi());
        let ctrl_shift = Mods {
            ctrl: true,
            shift: true,
            alt: false,
        };
        assert!(fx.run(|e, host| e.key_down(host, Direction::Up, ctrl_shift)));
        assert_eq!(fx.render(), "abc\na|bc\na|bc\nabc");
        assert!(!fx.run(|e, host| e.key_down(host, Direction::Up, ctrl_shift)));
        assert!(fx.run(|e, host| e.key_down(host, Direction::Down, ctrl_shift)));
        assert_eq!(fx.render(), "abc\na|bc\na|bc\na|bc");
        assert!(!fx.run(|e, host| e.key_down(host, Direction::Down, ctrl_shift)));
    }

    #[test]
    fn grouped_paste_at_single_caret() {
        let mut fx = Fixture::new("|xy");
        let c = ClipboardContents::from_groups(&["a", "b"]);
        assert!(fx.run(|e, host| e.paste(host, &c)));
        assert_eq!(fx.render(), "a|xy\nb|");
        assert!(fx.engine.is_multi());
    }

    #[test]
    fn rectangle_drag() {
        let mut fx = Fixture::new("|abcd\nabcd\nabcd");
        fx.run(|e, host| {
            assert!(e.begin_drag(host, Point { x: 1, y: 0 }, Alt, 1));
            assert!(e.continue_drag(host, Point { x: 3, y: 2 }));
        });
        assert_eq!(fx.render(), "a[bc]d\na[bc]d\na[bc]d");
        fx.run(|e, host| e.continue_drag(host, Point { x: 1, y: 1 }));
        assert_eq!(fx.render(), "a|bcd\na|bcd\nabcd");
        assert!(fx.engine.end_drag());
        assert!(!fx.engine.is_dragging());
    }

    #[test]
    fn drag_releases_cursors_it_swept_over() {
        let ctrl_shift = Mods {
            ctrl: true,
            shift: true,
            alt: false,
        };
        let mut fx = Fixture::new("one |two three");
        fx.run(|e, host| {
            e.begin_drag(host, Point { x: 8, y: 0 }, ctrl_shift, 1);
            e.continue_drag(host, Point { x: 2, y: 0 });
        });
        assert_eq!(fx.render(), "on[e two ]three");
        fx.run(|e, host| {
            e.continue_drag(host, Point { x: 10, y: 0 });
            e.end_drag();
        });
        assert_eq!(fx.render(), "one |two [th]ree");
    }

    #[test]
    fn additive_clicks() {
        let ctrl_shift = Mods {
            ctrl: true,
            shift: true,
            alt: false,
        };
        let mut fx = Fixture::new("|one two three");
        fx.run(|e, host| {
            e.begin_drag(host, Point { x: 5, y: 0 }, ctrl_shift, 1);
            e.end_drag();
        });
        assert_eq!(fx.render(), "|one t|wo three");
        fx.run(|e, host| {
            e.begin_drag(host, Point { x: 5, y: 0 }, ctrl_shift, 2);
            e.continue_drag(host, Point { x: 10, y: 0 });
            e.end_drag();
        });
        assert_eq!(fx.render(), "|one [two three]");
        fx.run(|e, host| {
            e.begin_drag(host, Point { x: 2, y: 0 }, Mods::default(), 1);
            e.continue_drag(host, Point { x: 6, y: 0 });
        });
        assert_eq!(fx.render(), "on[e tw]o three");
        assert!(!fx.run(|e, host| e.begin_drag(host, Point { x: 0, y: 4 }, ctrl_shift, 1)));
    }
}
