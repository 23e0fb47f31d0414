use std::borrow::Cow;
use std::collections::BTreeMap;

/// Mapping from absolute filesystem paths to the build-relative form the caller passed in.
///
/// The table is frozen once built; lookups never fail and hand back the queried string when
/// no mapping is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRewriteTable {
    entries: BTreeMap<String, String>,
}

/// Accumulates absolute/relative pairs before freezing them into a [`PathRewriteTable`].
#[derive(Debug, Default)]
pub struct PathRewriteTableBuilder {
    entries: BTreeMap<String, String>,
}

impl PathRewriteTable {
    /// Start recording entries for a new table.
    pub fn builder() -> PathRewriteTableBuilder {
        PathRewriteTableBuilder::default()
    }

    /// Return the relative form of `absolute`, or `absolute` itself when unknown.
    pub fn lookup<'a>(&'a self, absolute: &'a str) -> &'a str {
        self.entries
            .get(absolute)
            .map(String::as_str)
            .unwrap_or(absolute)
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no paths were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PathRewriteTableBuilder {
    /// Record that `absolute` should be reported as `relative`. Later records win.
    pub fn record(mut self, absolute: impl Into<String>, relative: impl Into<String>) -> Self {
        self.entries.insert(absolute.into(), relative.into());
        self
    }

    /// In-place variant of [`record`](Self::record) for loops.
    pub fn insert(&mut self, absolute: impl Into<String>, relative: impl Into<String>) {
        self.entries.insert(absolute.into(), relative.into());
    }

    /// Freeze the recorded entries.
    pub fn build(self) -> PathRewriteTable {
        PathRewriteTable {
            entries: self.entries,
        }
    }
}

impl FromIterator<(String, String)> for PathRewriteTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Replace the file path leading `line` (everything before the first `:`) with its relative
/// form.
///
/// Only the prefix is ever touched; the colon and the rest of the message are kept verbatim.
/// Lines without a colon, or whose prefix is unknown, come back unchanged.
pub fn fix_absolute_path_in_line<'a>(line: &'a str, table: &PathRewriteTable) -> Cow<'a, str> {
    let Some((absolute, rest)) = line.split_once(':') else {
        return Cow::Borrowed(line);
    };

    let relative = table.lookup(absolute);
    if relative == absolute {
        return Cow::Borrowed(line);
    }

    Cow::Owned(format!("{relative}:{rest}"))
}
