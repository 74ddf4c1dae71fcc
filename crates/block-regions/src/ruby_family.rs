//! Excluded-region scanner shared by Ruby and Crystal.
//!
//! The two languages diverge only in a handful of spots — which quote style
//! is a char literal versus a plain string, and whether bare `<<TAG`
//! heredocs are accepted — captured by [`Flavor`]. Everything else (line
//! comments, `=begin`/`=end` block comments, regex-vs-division, percent
//! literals, `#{...}` interpolation, symbols) is identical.

use crate::common::{is_ident_byte, line_end, paired_close, quoted_with_backslash_escape, skip_line_terminator};
use crate::heredoc::{self, PendingHeredoc};
use block_token::ExcludedRegion;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Ruby,
    Crystal,
}

const MAX_INTERP_DEPTH: usize = 256;

pub fn find_excluded(source: &str, flavor: Flavor) -> Vec<ExcludedRegion> {
    let bytes = source.as_bytes();
    let mut regions = Vec::new();
    let mut pos = 0;
    let mut pending_heredocs: VecDeque<PendingHeredoc> = VecDeque::new();

    while pos < bytes.len() {
        if (bytes[pos] == b'\n' || bytes[pos] == b'\r') && !pending_heredocs.is_empty() {
            let after_nl = skip_line_terminator(bytes, pos);
            let (bodies, next) = heredoc::collect_bodies(bytes, after_nl, std::mem::take(&mut pending_heredocs));
            regions.extend(bodies);
            pos = next;
            continue;
        }

        if let Some(end) = match_rule(bytes, pos, flavor, &mut regions, &mut pending_heredocs, 0) {
            pos = end;
            continue;
        }
        pos += 1;
    }
    regions
}

/// Tries each match rule at `pos` in priority order. Returns the offset just
/// past the match, having pushed any excluded region(s) it recognized, or
/// `None` if nothing matched here.
fn match_rule(
    bytes: &[u8],
    pos: usize,
    flavor: Flavor,
    regions: &mut Vec<ExcludedRegion>,
    pending_heredocs: &mut VecDeque<PendingHeredoc>,
    depth: usize,
) -> Option<usize> {
    let b = bytes[pos];

    if b == b'#' {
        let end = line_end(bytes, pos);
        regions.push(ExcludedRegion::new(pos, end));
        return Some(end);
    }

    if b == b'=' && at_line_start(bytes, pos) && bytes[pos..].starts_with(b"=begin") {
        return Some(scan_begin_end_comment(bytes, pos, regions));
    }

    if b == b'<' && bytes[pos..].starts_with(b"<<") {
        if let Some(end) = try_heredoc_opener(bytes, pos, flavor, pending_heredocs) {
            return Some(end);
        }
    }

    if b == b'/' && regex_allowed_here(bytes, pos) {
        return Some(scan_regex(bytes, pos, regions, depth));
    }

    if b == b'%' && percent_allowed_here(bytes, pos) {
        if let Some(end) = scan_percent_literal(bytes, pos, regions, depth) {
            return Some(end);
        }
    }

    if b == b'"' {
        return Some(scan_interpolating_string(bytes, pos + 1, b'"', regions, depth) );
    }

    if b == b'`' {
        return Some(scan_interpolating_string(bytes, pos + 1, b'`', regions, depth));
    }

    if b == b'\'' {
        return Some(match flavor {
            Flavor::Ruby => scan_single_quote_string(bytes, pos, regions),
            Flavor::Crystal => scan_char_literal(bytes, pos, regions),
        });
    }

    if b == b':' && pos + 1 < bytes.len() {
        if let Some(end) = scan_symbol(bytes, pos, regions) {
            return Some(end);
        }
    }

    None
}

fn at_line_start(bytes: &[u8], pos: usize) -> bool {
    pos == 0 || bytes[pos - 1] == b'\n'
}

fn scan_begin_end_comment(bytes: &[u8], start: usize, regions: &mut Vec<ExcludedRegion>) -> usize {
    let mut i = start;
    loop {
        let eol = line_end(bytes, i);
        if eol >= bytes.len() {
            regions.push(ExcludedRegion::new(start, bytes.len()));
            return bytes.len();
        }
        let next_line = skip_line_terminator(bytes, eol);
        if at_line_start(bytes, next_line) && bytes[next_line..].starts_with(b"=end") {
            let end = line_end(bytes, next_line);
            regions.push(ExcludedRegion::new(start, end));
            return end;
        }
        i = next_line;
    }
}

/// Recognizes a heredoc opener `<<[-~]["'`]TAG["'`]` inline. Crystal requires
/// the `-`/`~` form; Ruby accepts the bare form too (Open Question b: follow
/// the stricter rule for new implementations, applied only where the
/// language actually requires it).
fn try_heredoc_opener(
    bytes: &[u8],
    pos: usize,
    flavor: Flavor,
    pending: &mut VecDeque<PendingHeredoc>,
) -> Option<usize> {
    let mut i = pos + 2;
    let allow_indent = match bytes.get(i) {
        Some(b'-') | Some(b'~') => {
            i += 1;
            true
        }
        _ => false,
    };
    if flavor == Flavor::Crystal && !allow_indent {
        return None;
    }
    let quote = match bytes.get(i) {
        Some(&q @ (b'"' | b'\'' | b'`')) => {
            i += 1;
            Some(q)
        }
        _ => None,
    };
    let label_start = i;
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    if i == label_start {
        return None;
    }
    let label = String::from_utf8_lossy(&bytes[label_start..i]).into_owned();
    if let Some(q) = quote {
        if bytes.get(i) != Some(&q) {
            return None;
        }
        i += 1;
    }
    pending.push_back(PendingHeredoc { label, allow_indent });
    Some(i)
}

/// Division-vs-regex heuristic: a `/` begins a regex unless the preceding
/// non-whitespace token looks like the end of a value (identifier, number,
/// closing bracket, closing quote/backtick) — in which case it is division.
/// Certain keywords force regex interpretation even though they end in an
/// identifier character.
fn regex_allowed_here(bytes: &[u8], pos: usize) -> bool {
    let mut j = pos;
    while j > 0 && matches!(bytes[j - 1], b' ' | b'\t') {
        j -= 1;
    }
    if j == 0 {
        return true;
    }
    let prev = bytes[j - 1];
    match prev {
        b')' | b']' | b'"' | b'\'' | b'`' => false,
        b if b.is_ascii_alphanumeric() || b == b'_' => {
            let word_start = {
                let mut k = j;
                while k > 0 && is_ident_byte(bytes[k - 1]) {
                    k -= 1;
                }
                k
            };
            let word = &bytes[word_start..j];
            const FORCE_REGEX: &[&[u8]] = &[
                b"if", b"unless", b"while", b"when", b"return", b"yield", b"and", b"or", b"not",
                b"case", b"elsif",
            ];
            FORCE_REGEX.contains(&word)
        }
        _ => true,
    }
}

fn scan_regex(bytes: &[u8], pos: usize, regions: &mut Vec<ExcludedRegion>, depth: usize) -> usize {
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b'\n' => {
                regions.push(ExcludedRegion::new(pos, i));
                return i;
            }
            b'#' if bytes.get(i + 1) == Some(&b'{') && depth < MAX_INTERP_DEPTH => {
                i = scan_interpolation_brace(bytes, i + 2, regions, depth + 1);
            }
            b'/' => {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                regions.push(ExcludedRegion::new(pos, i));
                return i;
            }
            _ => i += 1,
        }
    }
    regions.push(ExcludedRegion::new(pos, bytes.len()));
    bytes.len()
}

/// Reuses the same "preceding context looks like a value" heuristic as
/// [`regex_allowed_here`]: modulo after a value, percent-literal at
/// expression start.
fn percent_allowed_here(bytes: &[u8], pos: usize) -> bool {
    let mut j = pos;
    while j > 0 && matches!(bytes[j - 1], b' ' | b'\t') {
        j -= 1;
    }
    if j == 0 {
        return true;
    }
    let prev = bytes[j - 1];
    !(prev.is_ascii_alphanumeric() || prev == b'_' || matches!(prev, b')' | b']' | b'"' | b'\''))
}

/// `%[specifier]delim ... delim`, with paired delimiters nesting by depth.
/// Interpolation (`#{...}`) applies to all specifiers except `q`/`w`-style
/// literal ones would exclude it in full Ruby, but we keep this best-effort:
/// any specifier other than a bare `q`/single-quote-like body is interpolated.
fn scan_percent_literal(
    bytes: &[u8],
    pos: usize,
    regions: &mut Vec<ExcludedRegion>,
    depth: usize,
) -> Option<usize> {
    let mut i = pos + 1;
    let spec_start = i;
    if i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    let specifier = &bytes[spec_start..i];
    let interpolates = !matches!(specifier, b"q" | b"w" | b"i");
    let Some(&open) = bytes.get(i) else { return None };
    if open.is_ascii_alphanumeric() {
        return None;
    }
    i += 1;
    let close = paired_close(open).unwrap_or(open);
    let nests = close != open;
    let mut nest_depth = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b'#' if interpolates && bytes.get(i + 1) == Some(&b'{') && depth < MAX_INTERP_DEPTH => {
                i = scan_interpolation_brace(bytes, i + 2, regions, depth + 1);
            }
            b if b == open && nests => {
                nest_depth += 1;
                i += 1;
            }
            b if b == close => {
                nest_depth -= 1;
                i += 1;
                if nest_depth == 0 {
                    regions.push(ExcludedRegion::new(pos, i));
                    return Some(i);
                }
            }
            _ => i += 1,
        }
    }
    regions.push(ExcludedRegion::new(pos, bytes.len()));
    Some(bytes.len())
}

fn scan_interpolating_string(
    bytes: &[u8],
    start: usize,
    quote: u8,
    regions: &mut Vec<ExcludedRegion>,
    depth: usize,
) -> usize {
    let region_start = start - 1;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b'#' if bytes.get(i + 1) == Some(&b'{') && depth < MAX_INTERP_DEPTH => {
                i = scan_interpolation_brace(bytes, i + 2, regions, depth + 1);
            }
            b if b == quote => {
                regions.push(ExcludedRegion::new(region_start, i + 1));
                return i + 1;
            }
            _ => i += 1,
        }
    }
    regions.push(ExcludedRegion::new(region_start, bytes.len()));
    bytes.len()
}

/// Scans `#{...}` body (brace depth tracked, nested strings/comments/regex
/// skipped recursively) and returns the offset just past the closing `}`.
fn scan_interpolation_brace(
    bytes: &[u8],
    start: usize,
    regions: &mut Vec<ExcludedRegion>,
    depth: usize,
) -> usize {
    let mut i = start;
    let mut brace_depth = 1usize;
    while i < bytes.len() {
        if brace_depth == 0 {
            break;
        }
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
                let mut dummy_pending = VecDeque::new();
                if let Some(end) =
                    match_rule(bytes, i, Flavor::Ruby, regions, &mut dummy_pending, depth)
                {
                    i = end;
                } else {
                    i += 1;
                }
            }
        }
    }
    i
}

fn scan_single_quote_string(bytes: &[u8], pos: usize, regions: &mut Vec<ExcludedRegion>) -> usize {
    // Ruby: only `\\` and `\'` are recognized escapes; scan with the general
    // backslash-escape routine since it treats every `\X` as an escape pair,
    // which is a safe superset for region purposes.
    let end = quoted_with_backslash_escape(bytes, pos + 1, b'\'');
    regions.push(ExcludedRegion::new(pos, end));
    end
}

/// Crystal char literal: `'c'`, `'\n'`, `'\uXXXX'`, `'\u{...}'`, `'\xNN'`, `'\oNNN'`.
fn scan_char_literal(bytes: &[u8], pos: usize, regions: &mut Vec<ExcludedRegion>) -> usize {
    let mut i = pos + 1;
    if bytes.get(i) == Some(&b'\\') {
        i += 1;
        match bytes.get(i) {
            Some(b'u') if bytes.get(i + 1) == Some(&b'{') => {
                i += 2;
                while i < bytes.len() && bytes[i] != b'}' {
                    i += 1;
                }
                if i < bytes.len() {
                    i += 1;
                }
            }
            Some(b'u') => {
                i += 1;
                for _ in 0..4 {
                    if bytes.get(i).is_some_and(|b| b.is_ascii_hexdigit()) {
                        i += 1;
                    }
                }
            }
            Some(b'x') => {
                i += 1;
                for _ in 0..2 {
                    if bytes.get(i).is_some_and(|b| b.is_ascii_hexdigit()) {
                        i += 1;
                    }
                }
            }
            Some(b'o') => {
                i += 1;
                for _ in 0..3 {
                    if bytes.get(i).is_some_and(|b| b.is_ascii_digit()) {
                        i += 1;
                    }
                }
            }
            Some(_) => i += 1,
            None => {}
        }
    } else if i < bytes.len() {
        i += 1;
    }
    if bytes.get(i) == Some(&b'\'') {
        i += 1;
    }
    regions.push(ExcludedRegion::new(pos, i));
    i
}

/// `:name`, `:"quoted sym"`, `:'quoted sym'`, Julia-style `:(op)` is not used
/// here (Julia has its own scanner); Ruby/Crystal only need the plain and
/// quoted forms. Returns `None` (not a symbol) when `:` is immediately
/// followed by another `:` (the `::` namespace operator) or whitespace.
fn scan_symbol(bytes: &[u8], pos: usize, regions: &mut Vec<ExcludedRegion>) -> Option<usize> {
    let next = *bytes.get(pos + 1)?;
    if next == b':' || next.is_ascii_whitespace() {
        return None;
    }
    if next == b'"' {
        let end = scan_interpolating_string(bytes, pos + 2, b'"', regions, 0);
        // Replace the pushed string-only region with one covering the `:` too.
        if let Some(last) = regions.last_mut() {
            last.start = pos;
        }
        return Some(end);
    }
    if next == b'\'' {
        let end = quoted_with_backslash_escape(bytes, pos + 2, b'\'');
        regions.push(ExcludedRegion::new(pos, end));
        return Some(end);
    }
    if is_ident_byte(next) {
        let mut i = pos + 1;
        while i < bytes.len() && (is_ident_byte(bytes[i]) || bytes[i] == b'?' || bytes[i] == b'!' || bytes[i] == b'=') {
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
        let regions = find_excluded("x = 1 # if end\ny", Flavor::Ruby);
        assert_eq!(regions, vec![ExcludedRegion::new(6, 14)]);
    }

    #[test]
    fn begin_end_comment_excluded() {
        let src = "a\n=begin\nif end\n=end\nb";
        let regions = find_excluded(src, Flavor::Ruby);
        assert_eq!(regions.len(), 1);
        assert!(regions[0].start == 2);
    }

    #[test]
    fn ruby_single_quote_is_plain_string() {
        let regions = find_excluded(r"'if end'", Flavor::Ruby);
        assert_eq!(regions, vec![ExcludedRegion::new(0, 8)]);
    }

    #[test]
    fn crystal_single_quote_is_char_literal() {
        let regions = find_excluded(r"'x'", Flavor::Crystal);
        assert_eq!(regions, vec![ExcludedRegion::new(0, 3)]);
    }

    #[test]
    fn crystal_requires_dash_heredoc() {
        // Bare `<<TAG` is not a heredoc opener in Crystal, so `<<` is left
        // untouched (no excluded region produced for it) and `TAG` tokenizes
        // as an ordinary identifier, not a suppressed heredoc label.
        let regions = find_excluded("x = <<TAG\nTAG\n", Flavor::Crystal);
        assert!(regions.is_empty());
    }

    #[test]
    fn ruby_heredoc_hides_keywords_in_body() {
        let src = "x = <<-EOF\nif then fi\nEOF\nif true\n  y\nend";
        let regions = find_excluded(src, Flavor::Ruby);
        assert_eq!(regions.len(), 1);
        let body = &src[regions[0].start..regions[0].end];
        assert_eq!(body, "if then fi");
    }

    #[test]
    fn interpolation_is_excluded_with_nested_string() {
        let src = r#""a#{"b"}c""#;
        let regions = find_excluded(src, Flavor::Ruby);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0], ExcludedRegion::new(0, src.len()));
    }

    #[test]
    fn division_after_identifier_is_not_regex() {
        let regions = find_excluded("a / b / c", Flavor::Ruby);
        assert!(regions.is_empty());
    }

    #[test]
    fn regex_at_start_of_expression() {
        let regions = find_excluded("x = /abc/", Flavor::Ruby);
        assert_eq!(regions.len(), 1);
    }
}
