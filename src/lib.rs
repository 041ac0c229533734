//! Read, check, shift, resynchronise and write SubRip (`.srt`) subtitles.
//!
//! ```
//! use srtedit::Subtext;
//!
//! let mut subs: Subtext = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n".parse().unwrap();
//! subs.move_by("-0,500", None).unwrap();
//! assert!(subs.check().is_empty());
//! assert_eq!(subs.to_string(), "1\n00:00:00,500 --> 00:00:01,500\nHello\n\n");
//! ```

mod error;
pub mod io;
mod parser;
mod serialiser;
mod srt;
mod subtext;
mod time;

pub use crate::error::{ErrorKind, Expected, Result, SrtError};
pub use crate::parser::Parser;
pub use crate::serialiser::{write_subs, Numbered};
pub use crate::srt::Entry;
pub use crate::subtext::{Subtext, Violation, ViolationKind};
pub use crate::time::{to_secs, to_timestr, TimeArg};
