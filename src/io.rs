//! Reading and writing subtitle files.

use crate::error::{Result, SrtError};
use crate::parser::Parser;
use crate::serialiser::write_subs;
use crate::subtext::Subtext;

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use encoding_rs::{Encoding, ISO_8859_15, UTF_8};
use tracing::{debug, warn};

/// Reads and parses the subtitle file at `path`.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Subtext> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| SrtError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from '{}'", bytes.len(), path.display());
    Parser::new().parse(&decode(&bytes))
}

/// Decodes raw subtitle bytes.
///
/// A byte-order mark picks the encoding. Without one the bytes are read as
/// UTF-8, or as ISO-8859-15 if they are not valid UTF-8.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        debug!("Found {} byte-order mark", encoding.name());
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => {
            warn!("Input is not valid UTF-8, reading it as ISO-8859-15");
            let (text, _) = ISO_8859_15.decode_without_bom_handling(bytes);
            text
        }
    }
}

/// Writes `subs` to `path`, numbering entries from `start`.
pub fn write<P: AsRef<Path>>(path: P, subs: &Subtext, start: usize) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| SrtError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_subs(&mut writer, subs, start).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    debug!("Wrote {} entries to '{}'", subs.len(), path.display());
    Ok(())
}
