use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{ChangeEntry, ChangeKind};
use std::fmt::Write as _;
use std::str::FromStr;

/// Output style for a change list
///
/// Each variant is one rendering of the same ordered entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// `<path> <KIND>` per line
    #[default]
    Standard,
    /// `<path>` per line, every entry (input for `rsync --files-from`)
    RsyncAll,
    /// `<path>` per line, deletions left out
    Rsync,
    /// Structured content diff; not implemented yet
    Differ,
    /// JSON array of `{"name", "type"}` records
    Json,
}

impl OutputStyle {
    pub const ALL: [OutputStyle; 5] = [
        OutputStyle::Standard,
        OutputStyle::RsyncAll,
        OutputStyle::Rsync,
        OutputStyle::Differ,
        OutputStyle::Json,
    ];

    /// Name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            OutputStyle::Standard => "standard",
            OutputStyle::RsyncAll => "rsync-all",
            OutputStyle::Rsync => "rsync",
            OutputStyle::Differ => "differ",
            OutputStyle::Json => "json",
        }
    }

    /// Render `entries` in this style
    ///
    /// # Errors
    ///
    /// - `NotImplemented` for [`OutputStyle::Differ`]
    /// - `Serialization` if JSON encoding fails
    pub fn render(&self, entries: &[ChangeEntry]) -> Result<Vec<u8>> {
        let text = match self {
            OutputStyle::Standard => lines(entries, |e| Some(format!("{} {}", e.path, e.kind))),
            OutputStyle::RsyncAll => lines(entries, |e| Some(e.path.clone())),
            OutputStyle::Rsync => lines(entries, |e| {
                (e.kind != ChangeKind::Delete).then(|| e.path.clone())
            }),
            OutputStyle::Differ => {
                return Err(ExError::new(ExErrorKind::NotImplemented)
                    .with_op("render")
                    .with_message("the differ output style is not supported yet"))
            }
            OutputStyle::Json => {
                let mut json = serde_json::to_string(entries).map_err(|e| {
                    ExError::new(ExErrorKind::Serialization)
                        .with_op("render")
                        .with_message(e.to_string())
                })?;
                json.push('\n');
                json
            }
        };
        Ok(text.into_bytes())
    }
}

impl FromStr for OutputStyle {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self> {
        OutputStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("parse_style")
                    .with_message(format!("not support {} style", s))
            })
    }
}

fn lines<F>(entries: &[ChangeEntry], line: F) -> String
where
    F: Fn(&ChangeEntry) -> Option<String>,
{
    let mut out = String::new();
    for text in entries.iter().filter_map(line) {
        let _ = writeln!(out, "{}", text);
    }
    out
}
