//! 8.3 short-name codec: validates a user-supplied name, encodes it into the
//! 11-byte on-disk form, and decodes an on-disk form back for display.

use crate::error::{FatError, FatResult};
use crate::SHORT_NAME_PROHIBITED;

/// Validates and splits `input` into (base, extension) without touching the
/// prohibited-character set yet. Rejects:
/// - a leading `.` (including `.` and `..` themselves — there is no reserved
///   token carve-out; those names are built directly via `dot_entries`
///   instead of going through this codec)
/// - more than one `.`
/// - base longer than 8, extension longer than 3
/// - length > 13, or exactly 13 with no dot
fn split(input: &str) -> FatResult<(&str, &str)> {
    if input.is_empty() || input.len() > 13 || input.starts_with('.') {
        return Err(FatError::InvalidName);
    }
    let dot_count = input.matches('.').count();
    if dot_count > 1 {
        return Err(FatError::InvalidName);
    }
    let (base, ext) = match input.find('.') {
        Some(i) => (&input[..i], &input[i + 1..]),
        None => {
            if input.len() == 13 {
                return Err(FatError::InvalidName);
            }
            (input, "")
        }
    };
    if base.len() > 8 || ext.len() > 3 {
        return Err(FatError::InvalidName);
    }
    Ok((base, ext))
}

fn substitute_prohibited(out: &mut [u8]) {
    for b in out.iter_mut() {
        if SHORT_NAME_PROHIBITED.contains(b) {
            *b = b'_';
        }
    }
}

/// Encodes `input` into the 11-byte short-name field: base left-justified
/// and space-padded to 8, extension left-justified and space-padded to 3,
/// both uppercased, both filtered through the prohibited-character
/// substitution.
pub fn encode(input: &str) -> FatResult<[u8; 11]> {
    let (base, ext) = split(input)?;
    let mut out = [b' '; 11];
    let base_upper = base.to_ascii_uppercase();
    let ext_upper = ext.to_ascii_uppercase();
    out[0..base_upper.len()].copy_from_slice(base_upper.as_bytes());
    out[8..8 + ext_upper.len()].copy_from_slice(ext_upper.as_bytes());
    substitute_prohibited(&mut out[0..8]);
    substitute_prohibited(&mut out[8..11]);
    Ok(out)
}

/// Decodes an 11-byte short-name field for display: base chars up to the
/// first space, then `.` and extension chars up to its first space when the
/// extension is present.
pub fn decode(name_bytes: &[u8; 11]) -> String {
    let base_len = name_bytes[0..8]
        .iter()
        .position(|&b| b == b' ')
        .unwrap_or(8);
    let mut out = String::from_utf8_lossy(&name_bytes[0..base_len]).into_owned();
    if name_bytes[8] != b' ' && name_bytes[8] != 0 {
        let ext_len = name_bytes[8..11]
            .iter()
            .position(|&b| b == b' ')
            .unwrap_or(3);
        out.push('.');
        out.push_str(&String::from_utf8_lossy(&name_bytes[8..8 + ext_len]));
    }
    out
}
