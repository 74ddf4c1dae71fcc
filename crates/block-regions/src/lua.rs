//! Excluded-region scanner for Lua.

use crate::common::{is_ident_byte, line_end, quoted_with_backslash_escape};
use block_token::ExcludedRegion;

pub fn find_excluded(source: &str) -> Vec<ExcludedRegion> {
    let bytes = source.as_bytes();
    let mut regions = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        if let Some(end) = match_rule(bytes, pos) {
            regions.push(ExcludedRegion::new(pos, end));
            pos = end;
            continue;
        }
        if bytes[pos] == b'[' {
            if let Some(level) = long_bracket_open(bytes, pos) {
                let end = scan_long_bracket_body(bytes, pos, level);
                regions.push(ExcludedRegion::new(pos, end));
                pos = end;
                continue;
            }
        }
        if bytes[pos] == b':' && bytes.get(pos + 1) == Some(&b':') {
            let end = scan_goto_label(bytes, pos);
            regions.push(ExcludedRegion::new(pos, end));
            pos = end;
            continue;
        }
        pos += 1;
    }
    regions
}

fn match_rule(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes[pos..].starts_with(b"--") {
        let after = pos + 2;
        if let Some(level) = long_bracket_open(bytes, after) {
            return Some(scan_long_bracket_body(bytes, after, level));
        }
        return Some(line_end(bytes, pos));
    }
    if bytes[pos] == b'"' {
        return Some(quoted_with_backslash_escape(bytes, pos + 1, b'"'));
    }
    if bytes[pos] == b'\'' {
        return Some(quoted_with_backslash_escape(bytes, pos + 1, b'\''));
    }
    None
}

/// Recognizes a long-bracket opener `[=*[` at `pos`, returning its `=` level.
fn long_bracket_open(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes.get(pos) != Some(&b'[') {
        return None;
    }
    let mut i = pos + 1;
    let mut level = 0;
    while bytes.get(i) == Some(&b'=') {
        level += 1;
        i += 1;
    }
    if bytes.get(i) == Some(&b'[') {
        Some(level)
    } else {
        None
    }
}

/// Scans the body of a long bracket (string or comment) starting right after
/// its opener, until a matching `]=*]` of the same level, or EOF.
fn scan_long_bracket_body(bytes: &[u8], opener_pos: usize, level: usize) -> usize {
    let body_start = opener_pos + 2 + level;
    let mut i = body_start;
    // A newline immediately following the opener is skipped (Lua convention);
    // it does not affect region boundaries so we do not special-case it here.
    while i < bytes.len() {
        if bytes[i] == b']' {
            let mut j = i + 1;
            let mut eq = 0;
            while bytes.get(j) == Some(&b'=') {
                eq += 1;
                j += 1;
            }
            if eq == level && bytes.get(j) == Some(&b']') {
                return j + 1;
            }
        }
        i += 1;
    }
    bytes.len()
}

fn scan_goto_label(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos + 2;
    let name_start = i;
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    if i == name_start || !bytes[i..].starts_with(b"::") {
        // Not a well-formed label; treat the leading `::` alone as excluded
        // so it cannot be mistaken for anything else, and let the tokenizer
        // see the rest normally.
        return pos + 2;
    }
    i + 2
}
