//! Program images: one binary byte literal per line, `#` starts a comment.
//!
//! ```text
//! # print 8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! ```

use crate::error::LoadError;

const COMMENT: char = '#';
const MAX_DIGITS: usize = 8;

/// Parse a program image into the bytes it describes, in order
pub fn parse(source: &str) -> Result<Vec<u8>, LoadError> {
    let mut bytes = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let text = line.split(COMMENT).next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        bytes.push(parse_literal(text).ok_or_else(|| LoadError::InvalidLiteral {
            line: idx + 1,
            text: text.to_owned(),
        })?);
    }
    Ok(bytes)
}

fn parse_literal(text: &str) -> Option<u8> {
    if text.len() > MAX_DIGITS || !text.chars().all(|c| c == '0' || c == '1') {
        return None;
    }
    u8::from_str_radix(text, 2).ok()
}
