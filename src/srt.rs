use crate::error::{Result, SrtError};
use crate::time::{to_secs, to_timestr, TimeArg};

use std::fmt;

/// A single subtitle: when it is shown, when it is hidden, and its text.
///
/// Times are seconds and may be negative. Nothing here enforces
/// `intime <= outtime`; see [`Subtext::check`](crate::Subtext::check).
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    intime: f64,
    outtime: f64,
    lines: Vec<String>,
}

impl Entry {
    /// Creates an entry, splitting `text` into lines on `\n`.
    ///
    /// Every line must have visible content: a blank line would end the
    /// entry when the file is read back.
    pub fn new<I: TimeArg, O: TimeArg>(intime: I, outtime: O, text: &str) -> Result<Self> {
        let lines = split_lines(text);
        check_lines(&lines)?;
        Ok(Self::from_parts(to_secs(intime)?, to_secs(outtime)?, lines))
    }

    /// Creates an entry from already separated lines. A line that itself
    /// contains `\n` is split further.
    pub fn with_lines<I, O, L, S>(intime: I, outtime: O, lines: L) -> Result<Self>
    where
        I: TimeArg,
        O: TimeArg,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .map(Into::<String>::into)
            .flat_map(|line| split_lines(&line))
            .collect();
        check_lines(&lines)?;
        Ok(Self::from_parts(to_secs(intime)?, to_secs(outtime)?, lines))
    }

    pub(crate) fn from_parts(intime: f64, outtime: f64, lines: Vec<String>) -> Self {
        Self {
            intime,
            outtime,
            lines,
        }
    }

    pub fn intime(&self) -> f64 {
        self.intime
    }

    pub fn outtime(&self) -> f64 {
        self.outtime
    }

    pub fn set_intime<T: TimeArg>(&mut self, intime: T) -> Result<()> {
        self.intime = to_secs(intime)?;
        Ok(())
    }

    pub fn set_outtime<T: TimeArg>(&mut self, outtime: T) -> Result<()> {
        self.outtime = to_secs(outtime)?;
        Ok(())
    }

    /// Display duration; negative when the entry is malformed.
    pub fn dur(&self) -> f64 {
        self.outtime - self.intime
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Appends one line of text.
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        let lines = split_lines(line);
        check_lines(&lines)?;
        self.lines.extend(lines);
        Ok(())
    }

    /// The lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replaces the lines with `text` split on `\n`. On error the old
    /// lines are kept.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        let lines = split_lines(text);
        check_lines(&lines)?;
        self.lines = lines;
        Ok(())
    }

    /// Shifts both times by `offset` seconds. The result may be negative.
    pub fn move_by<T: TimeArg>(&mut self, offset: T) -> Result<()> {
        let offset = to_secs(offset)?;
        self.intime += offset;
        self.outtime += offset;
        Ok(())
    }

    /// Moves the entry to start at `intime`.
    ///
    /// Without an `outtime` the duration is kept; with one, both ends are
    /// set as given.
    pub fn move_to<I: TimeArg, O: TimeArg>(&mut self, intime: I, outtime: Option<O>) -> Result<()> {
        let intime = to_secs(intime)?;
        let outtime = match outtime {
            Some(outtime) => to_secs(outtime)?,
            None => self.outtime + (intime - self.intime),
        };
        self.intime = intime;
        self.outtime = outtime;
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{} --> {}",
            to_timestr(self.intime),
            to_timestr(self.outtime)
        )?;
        for line in &self.lines {
            write!(fmt, "\n{}", line)?;
        }
        Ok(())
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(String::from).collect()
}

fn check_lines(lines: &[String]) -> Result<()> {
    if lines.is_empty() || lines.iter().any(|line| line.trim().is_empty()) {
        return Err(SrtError::EmptyText);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_splits_text() {
        let entry = Entry::new("00:00:01,000", 2.5, "Hello\nworld").unwrap();
        assert_eq!(entry.intime(), 1.0);
        assert_eq!(entry.outtime(), 2.5);
        assert_eq!(entry.lines(), ["Hello", "world"]);
        assert_eq!(entry.text(), "Hello\nworld");
        assert_eq!(entry.dur(), 1.5);
    }

    #[test]
    fn with_lines_rejects_empty() {
        let lines: Vec<String> = Vec::new();
        assert!(matches!(
            Entry::with_lines(0.0, 1.0, lines),
            Err(SrtError::EmptyText)
        ));
    }

    #[test]
    fn bad_time_is_rejected() {
        assert!(matches!(
            Entry::new("00:00:aa,000", 1.0, "x"),
            Err(SrtError::Time(_))
        ));
    }

    #[test]
    fn blank_lines_are_rejected() {
        assert!(matches!(Entry::new(1.0, 2.0, ""), Err(SrtError::EmptyText)));
        assert!(matches!(
            Entry::new(1.0, 2.0, "Hello\n\nWorld"),
            Err(SrtError::EmptyText)
        ));
        assert!(matches!(
            Entry::with_lines(1.0, 2.0, vec![""]),
            Err(SrtError::EmptyText)
        ));
        assert!(matches!(
            Entry::with_lines(1.0, 2.0, vec!["Hello", "  \t"]),
            Err(SrtError::EmptyText)
        ));
    }

    #[test]
    fn with_lines_splits_embedded_newlines() {
        let entry = Entry::with_lines(0.0, 1.0, vec!["a\nb", "c"]).unwrap();
        assert_eq!(entry.lines(), ["a", "b", "c"]);
    }

    #[test]
    fn set_text_replaces_lines() {
        let mut entry = Entry::with_lines(0.0, 1.0, vec!["a", "b", "c"]).unwrap();
        entry.set_text("one\ntwo").unwrap();
        assert_eq!(entry.lines(), ["one", "two"]);
        entry.push_line("three").unwrap();
        assert_eq!(entry.text(), "one\ntwo\nthree");
    }

    #[test]
    fn set_text_keeps_lines_on_blank_text() {
        let mut entry = Entry::new(0.0, 1.0, "keep\nme").unwrap();
        assert!(matches!(entry.set_text("one\n\ntwo"), Err(SrtError::EmptyText)));
        assert!(matches!(entry.set_text(" "), Err(SrtError::EmptyText)));
        assert!(matches!(entry.push_line(""), Err(SrtError::EmptyText)));
        assert_eq!(entry.text(), "keep\nme");
    }

    #[test]
    fn move_by_allows_negative_times() {
        let mut entry = Entry::new(1.0, 2.0, "x").unwrap();
        entry.move_by("-1,500").unwrap();
        assert_eq!(entry.intime(), -0.5);
        assert_eq!(entry.outtime(), 0.5);
        entry.move_by(1.5).unwrap();
        assert_eq!(entry.intime(), 1.0);
        assert_eq!(entry.outtime(), 2.0);
    }

    #[test]
    fn move_to_keeps_duration() {
        let mut entry = Entry::new(10.0, 12.5, "x").unwrap();
        entry.move_to(20.0, None::<f64>).unwrap();
        assert_eq!(entry.intime(), 20.0);
        assert_eq!(entry.outtime(), 22.5);
    }

    #[test]
    fn move_to_sets_both_ends() {
        let mut entry = Entry::new(10.0, 12.5, "x").unwrap();
        entry.move_to("00:00:30,000", Some("00:00:31,000")).unwrap();
        assert_eq!(entry.intime(), 30.0);
        assert_eq!(entry.dur(), 1.0);

        entry.move_to("00:00:40,000", Some(42.5)).unwrap();
        assert_eq!(entry.intime(), 40.0);
        assert_eq!(entry.outtime(), 42.5);
    }

    #[test]
    fn failed_move_leaves_entry_alone() {
        let mut entry = Entry::new(10.0, 12.5, "x").unwrap();
        assert!(entry.move_to("30", Some("nope")).is_err());
        assert_eq!(entry.intime(), 10.0);
        assert_eq!(entry.outtime(), 12.5);
    }

    #[test]
    fn display() {
        let entry = Entry::new(-1.0, 3723.004, "Hello\nworld").unwrap();
        assert_eq!(
            entry.to_string(),
            "-00:00:01,000 --> 01:02:03,004\nHello\nworld"
        );
    }
}
