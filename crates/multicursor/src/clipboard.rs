//! Clipboard payloads for multi-range copy and paste.
//!
//! The primary representation is plain text: every copied range joined by a
//! newline. Alongside it travels an optional side channel listing how many
//! lines each range contributed, so a paste into several cursors can split
//! the text back into its original groups.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Text placed on, or read from, the system clipboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardContents {
    /// Plain-text payload.
    pub text: String,
    /// Line count of each copied range, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<usize>>,
}

impl ClipboardContents {
    /// Contents without a group side channel.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            groups: None,
        }
    }

    /// Join `values` with newlines and record each value's line count.
    pub fn from_groups<S: AsRef<str>>(values: &[S]) -> Self {
        let text = values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n");
        let groups = values
            .iter()
            .map(|v| v.as_ref().split('\n').count())
            .collect();
        Self {
            text,
            groups: Some(groups),
        }
    }

    /// Split the text back into its groups. Returns `Ok(None)` when there is
    /// no side channel, and an error when the counts do not match the text.
    pub fn groups(&self) -> Result<Option<Vec<String>>> {
        let Some(counts) = &self.groups else {
            return Ok(None);
        };
        if counts.is_empty() {
            return if self.text.is_empty() {
                Ok(Some(Vec::new()))
            } else {
                Err(Error::Clipboard("text present but no groups".into()))
            };
        }
        let lines: Vec<&str> = self.text.split('\n').collect();
        let total: usize = counts.iter().sum();
        if total != lines.len() || counts.contains(&0) {
            return Err(Error::Clipboard(format!(
                "group counts sum to {total}, text has {} lines",
                lines.len()
            )));
        }
        let mut out = Vec::with_capacity(counts.len());
        let mut idx = 0;
        for &n in counts {
            out.push(lines[idx..idx + n].join("\n"));
            idx += n;
        }
        Ok(Some(out))
    }

    /// Serialize for hosts that carry the side channel as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse contents serialized with [`ClipboardContents::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_follow_line_counts() {
        let c = ClipboardContents::from_groups(&["alpha", "beta\ngamma"]);
        assert_eq!(c.text, "alpha\nbeta\ngamma");
        assert_eq!(c.groups, Some(vec![1, 2]));
        assert_eq!(
            c.groups().unwrap(),
            Some(vec!["alpha".to_string(), "beta\ngamma".to_string()])
        );
    }

    #[test]
    fn empty_values_survive() {
        let c = ClipboardContents::from_groups(&["", "x", ""]);
        assert_eq!(c.text, "\nx\n");
        assert_eq!(
            c.groups().unwrap(),
            Some(vec![String::new(), "x".into(), String::new()])
        );
    }

    #[test]
    fn plain_has_no_groups() {
        assert_eq!(ClipboardContents::plain("a\nb").groups().unwrap(), None);
    }

    #[test]
    fn mismatched_counts_are_rejected() {
        let c = ClipboardContents {
            text: "a\nb".into(),
            groups: Some(vec![1, 2]),
        };
        assert!(matches!(c.groups(), Err(Error::Clipboard(_))));
        let c = ClipboardContents {
            text: "a".into(),
            groups: Some(vec![0, 1]),
        };
        assert!(c.groups().is_err());
    }

    #[test]
    fn json() {
        let c = ClipboardContents::from_groups(&["one", "two"]);
        let json = c.to_json().unwrap();
        assert_eq!(json, r#"{"text":"one\ntwo","groups":[1,1]}"#);
        assert_eq!(ClipboardContents::from_json(&json).unwrap(), c);
        let plain = ClipboardContents::from_json(r#"{"text":"x"}"#).unwrap();
        assert_eq!(plain, ClipboardContents::plain("x"));
        assert!(matches!(
            ClipboardContents::from_json("{"),
            Err(Error::Json(_))
        ));
    }
}
