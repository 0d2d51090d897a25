//! Linear undo/redo history over a single text buffer.
//!
//! [`EditHistory`] keeps every accepted revision of an app's source code and a
//! cursor pointing at the revision currently shown. Committing after an undo
//! truncates the forward revisions: there is one past/future chain, never a
//! tree.
//!
//! The free functions [`commit`], [`undo`] and [`redo`] are the same
//! transitions expressed over borrowed `(log, cursor)` pairs, for callers that
//! keep the log themselves.

use crate::requirements::normalize_requirements;

/// Revision log plus cursor for one code buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditHistory {
    /// Snapshots in commit order, oldest first.
    ///
    /// **Invariant**: never empty.
    entries: Vec<String>,
    /// Index of the snapshot currently shown.
    ///
    /// **Invariant**: `cursor < entries.len()`.
    cursor: usize,
    /// Oldest snapshots are evicted once the log grows past this many entries.
    max_entries: Option<usize>,
}

impl EditHistory {
    /// Creates a history whose only entry is `seed`.
    pub fn new(seed: impl Into<String>) -> Self {
        EditHistory {
            entries: vec![seed.into()],
            cursor: 0,
            max_entries: None,
        }
    }

    /// Creates a history that keeps at most `max_entries` snapshots.
    ///
    /// A limit of zero is treated as one: the current snapshot is always kept.
    pub fn with_max_entries(seed: impl Into<String>, max_entries: usize) -> Self {
        let mut history = EditHistory::new(seed);
        history.set_max_entries(max_entries);
        history
    }

    /// Rebuilds a history from a previously captured log and cursor.
    ///
    /// Panics in debug builds if the log is empty or the cursor is out of range.
    pub fn from_parts(entries: Vec<String>, cursor: usize) -> Self {
        debug_assert_valid(&entries, cursor);
        EditHistory {
            entries,
            cursor,
            max_entries: None,
        }
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// All snapshots, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Records `value` as a new revision if it differs from the current one.
    ///
    /// Entries after the cursor are discarded before appending. Returns `false`
    /// when `value` equals the current snapshot, in which case nothing changes.
    pub fn commit(&mut self, value: &str) -> bool {
        if self.entries[self.cursor] == value {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(value.to_string());
        self.cursor = self.entries.len() - 1;
        self.evict_overflow();
        true
    }

    /// Caps the log at `max_entries` snapshots, evicting the oldest now.
    ///
    /// Entries at or after the cursor are never evicted.
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = Some(max_entries.max(1));
        self.evict_overflow();
    }

    fn evict_overflow(&mut self) {
        if let Some(max) = self.max_entries {
            let overflow = self.entries.len().saturating_sub(max).min(self.cursor);
            self.entries.drain(..overflow);
            self.cursor -= overflow;
        }
    }

    /// Steps back one revision. Returns `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Steps forward one revision. Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// Splits the history back into its log and cursor.
    pub fn into_parts(self) -> (Vec<String>, usize) {
        (self.entries, self.cursor)
    }
}

/// Result of [`commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutput {
    /// Requirements, blank lines dropped, sorted and newline-joined.
    pub requirements: String,
    /// The sandbox error passed in, unchanged.
    pub last_error: Option<String>,
    pub log: Vec<String>,
    pub cursor: usize,
}

/// Commits `code` against `(log, cursor)` and normalizes the requirements.
///
/// The requirements text is renormalized on every call, whether or not the
/// code changed. `last_error` passes through untouched.
pub fn commit(
    code: &str,
    requirements: &str,
    last_error: Option<String>,
    log: &[String],
    cursor: usize,
) -> CommitOutput {
    let mut history = EditHistory::from_parts(log.to_vec(), cursor);
    history.commit(code);
    let (log, cursor) = history.into_parts();
    CommitOutput {
        requirements: normalize_requirements(requirements),
        last_error,
        log,
        cursor,
    }
}

/// Moves the cursor back one entry and returns the value to display.
///
/// At the oldest entry `current` and `cursor` come back unchanged.
pub fn undo(current: &str, log: &[String], cursor: usize) -> (String, usize) {
    debug_assert_valid(log, cursor);
    if cursor > 0 {
        (log[cursor - 1].clone(), cursor - 1)
    } else {
        (current.to_string(), cursor)
    }
}

/// Moves the cursor forward one entry and returns the value to display.
///
/// At the newest entry `current` and `cursor` come back unchanged.
pub fn redo(current: &str, log: &[String], cursor: usize) -> (String, usize) {
    debug_assert_valid(log, cursor);
    if cursor + 1 < log.len() {
        (log[cursor + 1].clone(), cursor + 1)
    } else {
        (current.to_string(), cursor)
    }
}

fn debug_assert_valid(log: &[String], cursor: usize) {
    debug_assert!(!log.is_empty(), "edit history must hold at least one entry");
    debug_assert!(
        cursor < log.len(),
        "history cursor {} out of range for {} entries",
        cursor,
        log.len()
    );
}
