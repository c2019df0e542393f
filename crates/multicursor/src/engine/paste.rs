//! Distributing grouped clipboard text across cursors.

use geom::Direction;

use crate::{ClipboardContents, Host, TextRange, cursors::resync};

/// Copy every range. Multiple ranges carry the group side channel.
pub fn copy(host: &Host<'_>, ranges: &[TextRange]) -> ClipboardContents {
    match ranges {
        [range] => ClipboardContents::plain(host.substring(*range)),
        _ => {
            let values: Vec<String> = ranges.iter().map(|&r| host.substring(r)).collect();
            ClipboardContents::from_groups(&values)
        }
    }
}

/// Replace the first ranges with one group each. Ranges beyond the group
/// count are left alone, and groups beyond the range count are placed on
/// successive lines below the last cursor, appending lines as needed.
pub fn paste_groups(host: &mut Host<'_>, ranges: &[TextRange], groups: &[String]) -> Vec<TextRange> {
    let mut cursors = ranges.to_vec();
    for (i, group) in groups.iter().enumerate().take(ranges.len()) {
        let target = cursors[i];
        let Some(new) = host.replace(target, group) else {
            continue;
        };
        let caret = TextRange::caret(new.end);
        cursors = cursors
            .iter()
            .enumerate()
            .map(|(j, &c)| {
                if j == i {
                    caret
                } else {
                    resync(c, target, new).unwrap_or(caret)
                }
            })
            .collect();
    }

    let mut anchor = cursors.last().map_or(0, |c| c.end);
    for group in groups.iter().skip(ranges.len()) {
        let at = match host.layout.offset_on_adjacent_line(anchor, Direction::Down) {
            Some(at) => at,
            None => {
                let end = TextRange::caret(host.len());
                match host.replace(end, "\n") {
                    Some(newline) => newline.end,
                    None => break,
                }
            }
        };
        let Some(new) = host.replace(TextRange::caret(at), group) else {
            break;
        };
        cursors.push(TextRange::caret(new.end));
        anchor = new.end;
    }
    cursors
}
