//! Excluded-region scanner for Elixir.
//!
//! Deliberately simpler than the Ruby/Crystal scanner: Elixir has no regex
//! literal, no percent literals, and no heredoc keyword suppression relevant
//! to block matching (its `"""`/`'''` triple-quoted strings are handled
//! directly rather than through the two-phase heredoc collector, since the
//! closing delimiter appears inline rather than on its own declared line).
//! This is a documented simplification: sigils (`~r//`, `~s//`, ...) are not
//! modeled, since they do not interact with block-keyword matching either.

use crate::common::{is_ident_byte, line_end};
use block_token::ExcludedRegion;

const MAX_INTERP_DEPTH: usize = 256;

pub fn find_excluded(source: &str) -> Vec<ExcludedRegion> {
    let bytes = source.as_bytes();
    let mut regions = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        if let Some(end) = match_rule(bytes, pos, &mut regions, 0) {
            pos = end;
        } else {
            pos += 1;
        }
    }
    regions
}

fn match_rule(bytes: &[u8], pos: usize, regions: &mut Vec<ExcludedRegion>, depth: usize) -> Option<usize> {
    let b = bytes[pos];
    if b == b'#' {
        let end = line_end(bytes, pos);
        regions.push(ExcludedRegion::new(pos, end));
        return Some(end);
    }
    if b == b'"' && bytes[pos..].starts_with(b"\"\"\"") {
        return Some(scan_delimited(bytes, pos, pos + 3, b"\"\"\"", regions, depth));
    }
    if b == b'\'' && bytes[pos..].starts_with(b"'''") {
        return Some(scan_delimited(bytes, pos, pos + 3, b"'''", regions, depth));
    }
    if b == b'"' {
        return Some(scan_delimited(bytes, pos, pos + 1, b"\"", regions, depth));
    }
    if b == b'\'' {
        return Some(scan_delimited(bytes, pos, pos + 1, b"'", regions, depth));
    }
    if b == b':' && pos + 1 < bytes.len() {
        if let Some(end) = scan_atom(bytes, pos, regions, depth) {
            return Some(end);
        }
    }
    None
}

/// Scans a string body delimited by `closer` (one, or three stacked, quote
/// bytes), honoring backslash escapes and `#{...}` interpolation.
fn scan_delimited(
    bytes: &[u8],
    region_start: usize,
    mut i: usize,
    closer: &[u8],
    regions: &mut Vec<ExcludedRegion>,
    depth: usize,
) -> usize {
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            i += 2;
            continue;
        }
        if bytes[i..].starts_with(b"#{") && depth < MAX_INTERP_DEPTH {
            i = scan_interpolation_brace(bytes, i + 2, regions, depth + 1);
            continue;
        }
        if bytes[i..].starts_with(closer) {
            let end = i + closer.len();
            regions.push(ExcludedRegion::new(region_start, end));
            return end;
        }
        i += 1;
    }
    regions.push(ExcludedRegion::new(region_start, bytes.len()));
    bytes.len()
}

fn scan_interpolation_brace(bytes: &[u8], start: usize, regions: &mut Vec<ExcludedRegion>, depth: usize) -> usize {
    let mut i = start;
    let mut brace_depth = 1usize;
    while i < bytes.len() && brace_depth > 0 {
        match bytes[i] {
            b'{' => {
                brace_depth += 1;
                i += 1;
            }
            b'}' => {
                brace_depth -= 1;
                i += 1;
            }
            _ => {
                if let Some(end) = match_rule(bytes, i, regions, depth) {
                    i = end;
                } else {
                    i += 1;
                }
            }
        }
    }
    i
}

/// `:atom`, `:"quoted atom"`, `:'quoted atom'`. Rejects `::` (module alias
/// separator appears as `Alias.function` not via `:`, but `:` directly
/// followed by another `:` or whitespace is never an atom start).
fn scan_atom(bytes: &[u8], pos: usize, regions: &mut Vec<ExcludedRegion>, depth: usize) -> Option<usize> {
    let next = *bytes.get(pos + 1)?;
    if next == b':' || next.is_ascii_whitespace() {
        return None;
    }
    if next == b'"' || next == b'\'' {
        let end = scan_delimited(bytes, pos + 1, pos + 2, std::slice::from_ref(&next), regions, depth);
        if let Some(last) = regions.last_mut() {
            last.start = pos;
        }
        return Some(end);
    }
    if is_ident_byte(next) {
        let mut i = pos + 1;
        while i < bytes.len() && (is_ident_byte(bytes[i]) || bytes[i] == b'?' || bytes[i] == b'!') {
            i += 1;
        }
        regions.push(ExcludedRegion::new(pos, i));
        return Some(i);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comment_excluded() {
        let regions = find_excluded("x = 1 # do end\ny");
        assert_eq!(regions, vec![ExcludedRegion::new(6, 14)]);
    }

    #[test]
    fn double_quoted_string_hides_keywords() {
        let regions = find_excluded(r#"x = "do end""#);
        assert_eq!(regions, vec![ExcludedRegion::new(4, 12)]);
    }

    #[test]
    fn triple_quoted_string_is_one_region() {
        let src = "\"\"\"\ndo\nend\n\"\"\"";
        let regions = find_excluded(src);
        assert_eq!(regions, vec![ExcludedRegion::new(0, src.len())]);
    }

    #[test]
    fn interpolation_nested_string_both_excluded() {
        let src = r#""a#{"b"}c""#;
        let regions = find_excluded(src);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0], ExcludedRegion::new(0, src.len()));
    }

    #[test]
    fn atom_excluded() {
        let regions = find_excluded(":ok");
        assert_eq!(regions, vec![ExcludedRegion::new(0, 3)]);
    }

    #[test]
    fn module_separator_is_not_an_atom() {
        let regions = find_excluded("a::b");
        assert!(regions.is_empty());
    }
}
