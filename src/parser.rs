use crate::error::{Expected, Result, SrtError};
use crate::srt::Entry;
use crate::subtext::Subtext;
use crate::time::timestamp;

use nom::bytes::complete::tag;
use nom::character::complete::{multispace0, space0};
use nom::combinator::all_consuming;
use nom::error::VerboseError;
use nom::IResult;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between entries: blank lines or a sequence number.
    Number,
    /// Right after a sequence number.
    Times,
    /// Right after the time range; at least one line of text must follow.
    FirstText,
    /// Inside the text; a blank line ends the entry.
    Text,
}

/// Line-oriented SubRip reader.
///
/// Sequence numbers are checked for shape and then dropped; the order of the
/// entries in the file is what counts.
pub struct Parser {
    state: State,
    intime: f64,
    outtime: f64,
    lines: Vec<String>,
    subs: Subtext,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::Number,
            intime: 0.0,
            outtime: 0.0,
            lines: Vec::new(),
            subs: Subtext::new(),
        }
    }

    /// Parses a whole file. On error nothing is returned, not even the
    /// entries that were complete before the offending line.
    pub fn parse(&mut self, input: &str) -> Result<Subtext> {
        *self = Self::new();
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);

        let mut line_count = 0;
        for (index, line) in input.lines().enumerate() {
            line_count = index + 1;
            if let Err(err) = self.feed(line_count, line) {
                *self = Self::new();
                return Err(err);
            }
        }
        if let Err(err) = self.finish(line_count + 1) {
            *self = Self::new();
            return Err(err);
        }

        let subs = std::mem::take(&mut self.subs);
        debug!("Parsed {} entries from {} lines", subs.len(), line_count);
        Ok(subs)
    }

    fn feed(&mut self, line_no: usize, line: &str) -> Result<()> {
        let blank = line.trim().is_empty();
        match self.state {
            State::Number => {
                if blank {
                    return Ok(());
                }
                if !is_seq_num(line.trim()) {
                    return Err(SrtError::unexpected(
                        line_no,
                        Expected::SequenceNumber,
                        Some(line),
                    ));
                }
                self.state = State::Times;
            }
            State::Times => {
                let (_, (intime, outtime)) = all_consuming(time_range)(line)
                    .map_err(|_| SrtError::unexpected(line_no, Expected::TimeRange, Some(line)))?;
                self.intime = intime as f64 / 1000.0;
                self.outtime = outtime as f64 / 1000.0;
                self.state = State::FirstText;
            }
            State::FirstText => {
                if blank {
                    return Err(SrtError::unexpected(line_no, Expected::Text, Some(line)));
                }
                self.lines.push(line.to_string());
                self.state = State::Text;
            }
            State::Text => {
                if blank {
                    self.finish_entry();
                } else {
                    self.lines.push(line.to_string());
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self, line_no: usize) -> Result<()> {
        match self.state {
            State::Number => Ok(()),
            State::Times => Err(SrtError::unexpected(line_no, Expected::TimeRange, None)),
            State::FirstText => Err(SrtError::unexpected(line_no, Expected::Text, None)),
            State::Text => {
                self.finish_entry();
                Ok(())
            }
        }
    }

    fn finish_entry(&mut self) {
        let lines = std::mem::take(&mut self.lines);
        trace!(
            "Entry {}: {}s --> {}s, {} line(s)",
            self.subs.len() + 1,
            self.intime,
            self.outtime,
            lines.len()
        );
        self.subs.push(Entry::from_parts(self.intime, self.outtime, lines));
        self.state = State::Number;
    }
}

fn is_seq_num(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

/// `<time> --> <time>`, in milliseconds.
fn time_range(input: &str) -> IResult<&str, (i64, i64), VerboseError<&str>> {
    let (input, _) = space0(input)?;
    let (input, show_at) = timestamp(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space0(input)?;
    let (input, hide_at) = timestamp(input)?;
    let (input, _) = multispace0(input)?;

    Ok((input, (show_at, hide_at)))
}
