//! Reading work items from the input stream.

use std::io::{self, BufRead};

/// The longest item fed into the pipeline. Longer lines split here, the
/// remainder becoming the next item.
pub const MAX_LINE: usize = 1024;

/// Reads the next item: up to [`MAX_LINE`] bytes, ending at a newline.
///
/// The newline is consumed but not returned, and a single `\r` directly
/// before it is stripped. A final line without a newline is returned
/// as-is. Returns `Ok(None)` at end of input. Bytes that are not valid
/// UTF-8 are replaced.
pub fn read_item(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut saw_newline = false;

    while buffer.len() < MAX_LINE {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            break;
        }

        let room = MAX_LINE - buffer.len();
        let window = &available[..available.len().min(room)];
        match window.iter().position(|&b| b == b'\n') {
            Some(at) => {
                buffer.extend_from_slice(&window[..at]);
                reader.consume(at + 1);
                saw_newline = true;
                break;
            }
            None => {
                let taken = window.len();
                buffer.extend_from_slice(window);
                reader.consume(taken);
            }
        }
    }

    if buffer.is_empty() && !saw_newline {
        return Ok(None);
    }

    if saw_newline && buffer.last() == Some(&b'\r') {
        buffer.pop();
    }

    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}
