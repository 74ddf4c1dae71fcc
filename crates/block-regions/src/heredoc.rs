//! Shared heredoc-body collector, used by Bash and Crystal.
//!
//! Grounded on the teacher's heredoc collector: declarations are recognized
//! inline by each language's scanner (the `<<TAG` opener itself is not an
//! excluded region), then every pending declaration on a line has its body
//! collected, in declaration order, starting on the following line.

use block_token::ExcludedRegion;
use std::collections::VecDeque;

/// One heredoc declaration recognized on the current line, awaiting its body.
#[derive(Debug, Clone)]
pub struct PendingHeredoc {
    pub label: String,
    /// `<<-TAG` / `<<~TAG`: terminator line may be indented, and for Bash's
    /// `<<-` the same indentation is stripped from every content line too.
    pub allow_indent: bool,
}

/// Collects every pending heredoc's body starting at `offset` (the byte just
/// after the line's terminator). Bodies are consumed in FIFO declaration
/// order, sharing the single opener line. Returns one [`ExcludedRegion`] per
/// heredoc (covering its full body, terminator line excluded) and the byte
/// offset immediately after the last terminator line.
pub fn collect_bodies(
    source: &[u8],
    mut offset: usize,
    mut pending: VecDeque<PendingHeredoc>,
) -> (Vec<ExcludedRegion>, usize) {
    let mut regions = Vec::with_capacity(pending.len());
    while let Some(hd) = pending.pop_front() {
        let (region, next) = collect_one(source, offset, &hd);
        regions.push(region);
        offset = next;
    }
    (regions, offset)
}

fn collect_one(source: &[u8], mut off: usize, hd: &PendingHeredoc) -> (ExcludedRegion, usize) {
    let body_start = off;
    let mut body_end = off;
    while off < source.len() {
        let (line_start, line_end, next) = next_line_bounds(source, off);
        let line = &source[line_start..line_end];
        let (lead_ws, rest) = split_leading_ws(line);
        let rest = strip_trailing_cr(rest);

        if rest == hd.label.as_bytes() && (hd.allow_indent || lead_ws == 0) {
            return (ExcludedRegion::new(body_start, body_end), next);
        }

        body_end = line_end;
        off = next;
    }
    // Unterminated: the heredoc body extends to EOF.
    (ExcludedRegion::new(body_start, source.len()), source.len())
}

fn next_line_bounds(source: &[u8], mut off: usize) -> (usize, usize, usize) {
    let start = off;
    while off < source.len() && source[off] != b'\n' && source[off] != b'\r' {
        off += 1;
    }
    let end_no_eol = off;
    if off < source.len() {
        if source[off] == b'\r' {
            off += 1;
            if off < source.len() && source[off] == b'\n' {
                off += 1;
            }
        } else {
            off += 1;
        }
    }
    (start, end_no_eol, off)
}

fn split_leading_ws(s: &[u8]) -> (usize, &[u8]) {
    let mut i = 0;
    while i < s.len() && (s[i] == b' ' || s[i] == b'\t') {
        i += 1;
    }
    (i, &s[i..])
}

fn strip_trailing_cr(s: &[u8]) -> &[u8] {
    if s.last().copied() == Some(b'\r') { &s[..s.len() - 1] } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_single_heredoc_body() {
        let src = b"if then fi\nEOF\nrest";
        let mut pending = VecDeque::new();
        pending.push_back(PendingHeredoc { label: "EOF".into(), allow_indent: false });
        let (regions, next) = collect_bodies(src, 0, pending);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0], ExcludedRegion::new(0, 10));
        assert_eq!(&src[next..], b"rest");
    }

    #[test]
    fn indented_terminator_allowed_with_dash() {
        let src = b"body\n  EOF\nrest";
        let mut pending = VecDeque::new();
        pending.push_back(PendingHeredoc { label: "EOF".into(), allow_indent: true });
        let (regions, next) = collect_bodies(src, 0, pending);
        assert_eq!(regions[0], ExcludedRegion::new(0, 4));
        assert_eq!(&src[next..], b"rest");
    }

    #[test]
    fn indented_terminator_rejected_without_dash() {
        let src = b"body\n  EOF\nEOF\nrest";
        let mut pending = VecDeque::new();
        pending.push_back(PendingHeredoc { label: "EOF".into(), allow_indent: false });
        let (regions, next) = collect_bodies(src, 0, pending);
        assert_eq!(regions[0], ExcludedRegion::new(0, 10));
        assert_eq!(&src[next..], b"rest");
    }

    #[test]
    fn multiple_heredocs_share_one_opener_line() {
        let src = b"AAA\nBBB\nONE\nBBB\nTWO\nrest";
        let mut pending = VecDeque::new();
        pending.push_back(PendingHeredoc { label: "ONE".into(), allow_indent: false });
        pending.push_back(PendingHeredoc { label: "TWO".into(), allow_indent: false });
        let (regions, next) = collect_bodies(src, 0, pending);
        assert_eq!(regions.len(), 2);
        assert_eq!(&src[next..], b"rest");
    }

    #[test]
    fn unterminated_heredoc_extends_to_eof() {
        let src = b"body forever";
        let mut pending = VecDeque::new();
        pending.push_back(PendingHeredoc { label: "EOF".into(), allow_indent: false });
        let (regions, next) = collect_bodies(src, 0, pending);
        assert_eq!(regions[0], ExcludedRegion::new(0, src.len()));
        assert_eq!(next, src.len());
    }
}
