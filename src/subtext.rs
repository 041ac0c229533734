//! The in-memory subtitle file: an ordered list of [`Entry`] values.
//!
//! Ordering is not enforced while editing. [`Subtext::check`] reports what is
//! wrong; every mutating operation validates its arguments before it touches
//! any entry, so a failed call leaves the collection as it was.

use crate::error::{Result, SrtError};
use crate::parser::Parser;
use crate::serialiser::Numbered;
use crate::srt::Entry;
use crate::time::{to_secs, TimeArg};

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Starts before the previous entry.
    OutOfOrder,
    /// Ends before it starts.
    NegativeDuration,
    /// Starts before the previous entry ends.
    Overlap,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViolationKind::OutOfOrder => write!(fmt, "starts before the previous entry"),
            ViolationKind::NegativeDuration => write!(fmt, "duration < 0"),
            ViolationKind::Overlap => write!(fmt, "overlaps the previous entry"),
        }
    }
}

/// One integrity problem found by [`Subtext::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// Zero-based position of the offending entry.
    pub index: usize,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subtext {
    entries: Vec<Entry>,
}

impl Subtext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses SubRip text.
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new().parse(input)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entry> {
        self.entries.iter_mut()
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Inserts `entry` at `index`, shifting everything after it up by one.
    pub fn insert(&mut self, index: usize, entry: Entry) -> Result<()> {
        if index > self.entries.len() {
            return Err(SrtError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.entries.insert(index, entry);
        Ok(())
    }

    /// Inserts `entry` after every entry that starts no later than it does
    /// and returns the index it landed at.
    ///
    /// No other entry is changed; an overlap with a neighbour is left for
    /// [`Subtext::check`] to report.
    pub fn insert_by_time(&mut self, entry: Entry) -> usize {
        let index = self
            .entries
            .iter()
            .position(|e| e.intime() > entry.intime())
            .unwrap_or(self.entries.len());
        self.entries.insert(index, entry);
        index
    }

    /// Reports every ordering, duration and overlap problem.
    ///
    /// Ordering and overlap are reported on the later entry of a pair. A
    /// pair that is out of order is not also reported as overlapping.
    pub fn check(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                let prev = &self.entries[index - 1];
                if entry.intime() < prev.intime() {
                    violations.push(Violation {
                        index,
                        kind: ViolationKind::OutOfOrder,
                    });
                } else if prev.outtime() > entry.intime() {
                    violations.push(Violation {
                        index,
                        kind: ViolationKind::Overlap,
                    });
                }
            }
            if entry.outtime() < entry.intime() {
                violations.push(Violation {
                    index,
                    kind: ViolationKind::NegativeDuration,
                });
            }
        }
        violations
    }

    /// Shifts the entries at `indices` (all entries when `None`) by `offset`.
    pub fn move_by<T: TimeArg>(&mut self, offset: T, indices: Option<&[usize]>) -> Result<()> {
        let offset = to_secs(offset)?;
        match indices {
            None => {
                for entry in &mut self.entries {
                    entry.move_by(offset)?;
                }
            }
            Some(indices) => {
                let mut indices = indices.to_vec();
                indices.sort_unstable();
                indices.dedup();
                if let Some(&index) = indices.last() {
                    self.check_index(index)?;
                }
                for index in indices {
                    self.entries[index].move_by(offset)?;
                }
            }
        }
        Ok(())
    }

    /// Shifts every entry starting at or after `from` by `offset`.
    pub fn move_by_from<T: TimeArg, F: TimeArg>(&mut self, offset: T, from: F) -> Result<()> {
        let offset = to_secs(offset)?;
        let from = to_secs(from)?;
        for entry in self.entries.iter_mut().filter(|e| e.intime() >= from) {
            entry.move_by(offset)?;
        }
        Ok(())
    }

    /// Moves the entry at `index` alone; see [`Entry::move_to`].
    pub fn move_to<I: TimeArg, O: TimeArg>(
        &mut self,
        index: usize,
        intime: I,
        outtime: Option<O>,
    ) -> Result<()> {
        self.check_index(index)?;
        self.entries[index].move_to(intime, outtime)
    }

    /// Shifts every entry starting at or after `from` so that the first of
    /// them starts at `pos`.
    pub fn move_all_to<T: TimeArg, F: TimeArg>(&mut self, pos: T, from: F) -> Result<()> {
        let pos = to_secs(pos)?;
        let from = to_secs(from)?;
        let first = self
            .entries
            .iter()
            .find(|e| e.intime() >= from)
            .ok_or(SrtError::NoEntriesFrom(from))?;
        let offset = pos - first.intime();
        self.move_by_from(offset, from)
    }

    /// Re-times entries `start_index..=end_index` linearly so that the entry
    /// at `start_index` starts at `start_time` and the one at `end_index`
    /// starts at `end_time`.
    ///
    /// Entries in between keep their relative position between the two
    /// anchors, and every entry keeps its duration. Entries outside the
    /// range are not touched.
    pub fn sync<S: TimeArg, E: TimeArg>(
        &mut self,
        start_index: usize,
        start_time: S,
        end_index: usize,
        end_time: E,
    ) -> Result<()> {
        if start_index > end_index {
            return Err(SrtError::InvalidRange {
                start: start_index,
                end: end_index,
            });
        }
        self.check_index(end_index)?;
        let s0 = to_secs(start_time)?;
        let s1 = to_secs(end_time)?;
        let t0 = self.entries[start_index].intime();
        let t1 = self.entries[end_index].intime();
        if t1 == t0 {
            return Err(SrtError::DegenerateInterval {
                index: end_index,
                time: t1,
            });
        }
        debug!(
            "Syncing entries {}..={}: {}s..{}s onto {}s..{}s",
            start_index, end_index, t0, t1, s0, s1
        );

        for entry in &mut self.entries[start_index..=end_index] {
            let intime = s0 + (entry.intime() - t0) / (t1 - t0) * (s1 - s0);
            entry.move_to(intime, None::<f64>)?;
        }
        Ok(())
    }

    /// Stretches the whole file so that the first entry starts at
    /// `start_time` and the last one at `end_time`.
    pub fn sync_all<S: TimeArg, E: TimeArg>(&mut self, start_time: S, end_time: E) -> Result<()> {
        if self.entries.is_empty() {
            return Err(SrtError::EmptyCollection);
        }
        let last = self.entries.len() - 1;
        self.sync(0, start_time, last, end_time)
    }

    /// A view that serialises with sequence numbers starting at `start`.
    pub fn numbered_from(&self, start: usize) -> Numbered<'_> {
        Numbered::new(self, start)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(SrtError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Subtext {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.numbered_from(1), fmt)
    }
}

impl FromStr for Subtext {
    type Err = SrtError;

    fn from_str(input: &str) -> Result<Self> {
        Self::parse(input)
    }
}

impl From<Vec<Entry>> for Subtext {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<Entry> for Subtext {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Subtext {
    type Output = Entry;

    fn index(&self, index: usize) -> &Entry {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a Subtext {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
