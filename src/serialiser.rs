use crate::srt::Entry;
use crate::subtext::Subtext;

use std::fmt;
use std::io::{self, Write};

/// A [`Subtext`] paired with the number its first entry is written with.
///
/// Sequence numbers are positional; they exist only in the output.
#[derive(Debug, Clone, Copy)]
pub struct Numbered<'a> {
    subs: &'a Subtext,
    start: usize,
}

impl<'a> Numbered<'a> {
    pub fn new(subs: &'a Subtext, start: usize) -> Self {
        Self { subs, start }
    }
}

impl fmt::Display for Numbered<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for (offset, entry) in self.subs.iter().enumerate() {
            write_sub(fmt, self.start + offset, entry)?;
        }
        Ok(())
    }
}

fn write_sub(fmt: &mut fmt::Formatter, number: usize, entry: &Entry) -> fmt::Result {
    writeln!(fmt, "{}", number)?;
    writeln!(fmt, "{}", entry)?;
    writeln!(fmt)
}

/// Writes `subs` as SubRip text, numbering from `start`.
pub fn write_subs<W: Write>(buf: &mut W, subs: &Subtext, start: usize) -> io::Result<()> {
    write!(buf, "{}", subs.numbered_from(start))
}
