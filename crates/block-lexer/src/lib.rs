//! Keyword-boundary tokenizer and per-language validity predicates.
//!
//! [`tokenize`] turns a source buffer into the time-ordered sequence of
//! classified [`Token`]s the block matcher consumes. It composes three
//! things: the excluded-region list from `block-regions` (keyword
//! candidates starting inside one are rejected outright), a longest-match-
//! first keyword-boundary scan driven by `block-lang`'s per-language
//! keyword sets, and the validity predicates in [`validators`] that encode
//! each language's variation points (postfix conditionals, one-liners,
//! loop-connector `do`, comprehension suppression, and so on).

mod compound_end;
mod validators;

use block_lang::{keywords, LanguageTag};
use block_position::LineIndex;
use block_token::{ExcludedRegion, Token, TokenKind};
use validators::BracketDepth;

/// Scans `source` for `lang`'s block keywords, honoring `excluded` (as
/// produced by `block_regions::find_excluded`), and returns the tokens in
/// ascending start-offset order.
pub fn tokenize(source: &str, lang: LanguageTag, excluded: &[ExcludedRegion]) -> Vec<Token> {
    let bytes = source.as_bytes();
    let line_index = LineIndex::new(source);
    let descriptor = keywords(lang);
    let case_insensitive = lang.case_insensitive();

    let mut candidates: Vec<&'static str> = descriptor.all().collect();
    candidates.sort_by_key(|s| std::cmp::Reverse(s.len()));
    candidates.dedup();

    let compound_ends = compound_end::prescan(source, excluded, lang);
    let mut compound_idx = 0usize;

    let mut tokens = Vec::new();
    let mut depth = BracketDepth::default();
    let mut i = 0usize;

    while i < bytes.len() {
        if is_in(excluded, i) {
            i += 1;
            continue;
        }

        match bytes[i] {
            b'[' => {
                depth.square += 1;
                i += 1;
                continue;
            }
            b']' => {
                depth.square = depth.square.saturating_sub(1);
                i += 1;
                continue;
            }
            b'(' => {
                depth.paren += 1;
                i += 1;
                continue;
            }
            b')' => {
                depth.paren = depth.paren.saturating_sub(1);
                i += 1;
                continue;
            }
            _ => {}
        }

        while compound_idx < compound_ends.len() && compound_ends[compound_idx].start < i {
            compound_idx += 1;
        }
        if compound_idx < compound_ends.len() && compound_ends[compound_idx].start == i {
            let ce = &compound_ends[compound_idx];
            let (line, column) = line_index.line_col(source, ce.start);
            tokens.push(Token::new(
                TokenKind::Close,
                format!("end {}", ce.type_text),
                ce.start,
                ce.end,
                line,
                column,
            ));
            i = ce.end;
            compound_idx += 1;
            continue;
        }

        if word_boundary_before(bytes, i) {
            if let Some((kw, end)) = match_keyword(bytes, i, &candidates, case_insensitive) {
                if word_boundary_after(bytes, end) {
                    let base_kind = classify(descriptor, kw);
                    if let Some(kind) = base_kind {
                        let scan = Scan { source, bytes, start: i, end, lang };
                        if is_valid(lang, kind, kw, &scan, &tokens, &depth) {
                            let text: std::borrow::Cow<str> =
                                if case_insensitive { kw.to_ascii_lowercase().into() } else { kw.into() };
                            let (line, column) = line_index.line_col(source, i);
                            tokens.push(Token::new(kind, text.as_ref(), i, end, line, column));
                            i = end;
                            continue;
                        }
                    }
                }
            }
        }

        i += 1;
    }

    tokens
}

/// Matching context passed to a validity predicate: the raw candidate span
/// plus enough of the surrounding source to answer lookback/lookahead
/// questions without re-deriving them per predicate.
pub(crate) struct Scan<'a> {
    pub source: &'a str,
    pub bytes: &'a [u8],
    pub start: usize,
    pub end: usize,
    #[allow(dead_code)]
    pub lang: LanguageTag,
}

impl<'a> Scan<'a> {
    pub(crate) fn prev_byte(&self) -> Option<u8> {
        if self.start == 0 {
            None
        } else {
            Some(self.bytes[self.start - 1])
        }
    }

    pub(crate) fn line_start_of(&self, pos: usize) -> usize {
        let mut i = pos;
        while i > 0 && self.bytes[i - 1] != b'\n' && self.bytes[i - 1] != b'\r' {
            i -= 1;
        }
        i
    }

    pub(crate) fn line_end_from(&self, pos: usize) -> usize {
        let mut i = pos;
        while i < self.bytes.len() && self.bytes[i] != b'\n' && self.bytes[i] != b'\r' {
            i += 1;
        }
        i
    }

    pub(crate) fn at_line_start_ignoring_ws(&self) -> bool {
        let line_start = self.line_start_of(self.start);
        self.source[line_start..self.start].chars().all(|c| c == ' ' || c == '\t')
    }
}

pub(crate) fn is_in(regions: &[ExcludedRegion], offset: usize) -> bool {
    block_regions::contains(regions, offset)
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

fn word_boundary_before(bytes: &[u8], pos: usize) -> bool {
    pos == 0 || !is_ident_byte(bytes[pos - 1])
}

fn word_boundary_after(bytes: &[u8], pos: usize) -> bool {
    pos >= bytes.len() || !is_ident_byte(bytes[pos])
}

/// Tries every candidate keyword (already sorted longest-first) at `pos`,
/// allowing compound keywords' internal single spaces to stretch across
/// any run of spaces/tabs in the source. Returns the matched descriptor
/// string and the end offset of the match.
fn match_keyword<'k>(
    bytes: &[u8],
    pos: usize,
    candidates: &[&'k str],
    case_insensitive: bool,
) -> Option<(&'k str, usize)> {
    for &kw in candidates {
        if let Some(end) = matches_at(bytes, pos, kw, case_insensitive) {
            return Some((kw, end));
        }
    }
    None
}

fn matches_at(bytes: &[u8], pos: usize, kw: &str, case_insensitive: bool) -> Option<usize> {
    let mut words = kw.split(' ');
    let mut i = pos;
    let first = words.next()?;
    i = match_literal(bytes, i, first, case_insensitive)?;
    for word in words {
        let before = i;
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        if i == before {
            return None;
        }
        i = match_literal(bytes, i, word, case_insensitive)?;
    }
    Some(i)
}

fn match_literal(bytes: &[u8], pos: usize, lit: &str, case_insensitive: bool) -> Option<usize> {
    let lit_bytes = lit.as_bytes();
    if pos + lit_bytes.len() > bytes.len() {
        return None;
    }
    let slice = &bytes[pos..pos + lit_bytes.len()];
    let matched = if case_insensitive {
        slice.eq_ignore_ascii_case(lit_bytes)
    } else {
        slice == lit_bytes
    };
    matched.then_some(pos + lit_bytes.len())
}

fn classify(descriptor: &block_lang::KeywordSet, kw: &str) -> Option<TokenKind> {
    if descriptor.close.contains(&kw) {
        Some(TokenKind::Close)
    } else if descriptor.open.contains(&kw) {
        Some(TokenKind::Open)
    } else if descriptor.middle.contains(&kw) {
        Some(TokenKind::Middle)
    } else {
        None
    }
}

fn is_valid(
    lang: LanguageTag,
    kind: TokenKind,
    kw: &str,
    scan: &Scan,
    tokens: &[Token],
    depth: &BracketDepth,
) -> bool {
    match lang {
        LanguageTag::Lua => match kw {
            "do" if kind == TokenKind::Open => validators::lua_do_is_opener(scan, tokens),
            _ => true,
        },
        LanguageTag::Ruby | LanguageTag::Crystal => match kw {
            "if" | "unless" | "while" | "until" if kind == TokenKind::Open => {
                validators::ruby_postfix_conditional_is_opener(scan)
                    && validators::ruby_not_method_call_or_hash_key(scan)
            }
            "do" if kind == TokenKind::Open => {
                validators::ruby_do_is_opener(tokens) && validators::ruby_not_method_call_or_hash_key(scan)
            }
            "rescue" if kind == TokenKind::Middle => validators::ruby_rescue_is_middle(scan),
            _ => validators::ruby_not_method_call_or_hash_key(scan),
        },
        LanguageTag::Julia => match kw {
            "for" | "if" if kind == TokenKind::Open => validators::julia_not_in_brackets(depth),
            "end" if kind == TokenKind::Close => validators::julia_not_in_brackets(depth),
            _ => true,
        },
        LanguageTag::Bash => {
            let in_command_position = validators::bash_command_position(scan);
            match kw {
                "{" if kind == TokenKind::Open => in_command_position && validators::bash_brace_open(scan),
                "}" if kind == TokenKind::Close => validators::bash_brace_close(scan),
                "if" | "case" | "for" | "while" | "until" | "select" if kind == TokenKind::Open => {
                    in_command_position && validators::bash_not_case_pattern(scan)
                }
                _ => in_command_position,
            }
        }
        LanguageTag::AppleScript => match kw {
            "tell" if kind == TokenKind::Open => validators::applescript_tell_is_opener(scan),
            "if" if kind == TokenKind::Open => validators::applescript_if_is_opener(scan),
            "on" | "to" if kind == TokenKind::Open => validators::applescript_on_to_at_line_start(scan),
            _ => true,
        },
        LanguageTag::Ada => match kw {
            "loop" if kind == TokenKind::Open => validators::ada_loop_is_opener(tokens),
            _ => true,
        },
        LanguageTag::Vhdl => match kw {
            "loop" if kind == TokenKind::Open => validators::vhdl_loop_is_opener(tokens),
            "for" if kind == TokenKind::Open => validators::vhdl_for_not_after_wait(scan),
            "entity" if kind == TokenKind::Open => validators::vhdl_entity_not_instantiation(scan),
            "function" | "procedure" if kind == TokenKind::Open => validators::vhdl_subprogram_has_body(scan),
            "when" | "else" if kind == TokenKind::Middle => validators::vhdl_when_else_not_signal_assignment(scan),
            _ => true,
        },
        LanguageTag::Pascal => match kw {
            "case" if kind == TokenKind::Open => validators::pascal_case_not_variant_tag(tokens),
            "class" | "object" | "interface" if kind == TokenKind::Open => {
                validators::pascal_class_is_type_definition(scan)
            }
            _ => true,
        },
        LanguageTag::Verilog => match kw {
            "default" if kind == TokenKind::Middle => validators::verilog_default_followed_by_colon(scan),
            _ if kind == TokenKind::Open && is_verilog_control_keyword(kw) => {
                validators::verilog_control_precedes_begin(scan)
            }
            _ => true,
        },
        LanguageTag::Elixir => true,
    }
}

fn is_verilog_control_keyword(kw: &str) -> bool {
    !matches!(kw, "begin" | "module" | "function" | "task" | "class" | "fork" | "generate" | "specify" | "`ifdef" | "`ifndef")
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_lang::LanguageTag;

    fn toks(src: &str, lang: LanguageTag) -> Vec<Token> {
        let excluded = block_regions::find_excluded(src, lang);
        tokenize(src, lang, &excluded)
    }

    #[test]
    fn lua_repeat_if_end_until() {
        let t = toks("repeat\n  if x then a end\nuntil y", LanguageTag::Lua);
        let words: Vec<_> = t.iter().map(|tok| tok.text.as_ref()).collect();
        assert_eq!(words, vec!["repeat", "if", "end", "until"]);
    }

    #[test]
    fn ruby_postfix_if_is_not_an_opener() {
        let t = toks("return x if cond\nif y\n  z\nend", LanguageTag::Ruby);
        let words: Vec<_> = t.iter().map(|tok| tok.text.as_ref()).collect();
        assert_eq!(words, vec!["if", "end"]);
    }

    #[test]
    fn bash_heredoc_hides_keywords() {
        let t = toks("cat <<EOF\nif then fi\nEOF\nif true; then :; fi", LanguageTag::Bash);
        let words: Vec<_> = t.iter().map(|tok| tok.text.as_ref()).collect();
        assert_eq!(words, vec!["if", "fi"]);
    }

    #[test]
    fn verilog_control_keyword_needs_begin() {
        let t = toks("always @(posedge clk) begin\n  if (x) begin a; end\nend", LanguageTag::Verilog);
        let words: Vec<_> = t.iter().map(|tok| tok.text.as_ref()).collect();
        assert_eq!(words, vec!["always", "begin", "if", "begin", "end", "end"]);
    }

    #[test]
    fn ada_compound_end_closes_procedure_by_name() {
        let t = toks("procedure P is\nbegin\n  null;\nend P;", LanguageTag::Ada);
        let words: Vec<_> = t.iter().map(|tok| tok.text.as_ref()).collect();
        assert_eq!(words, vec!["procedure", "begin", "end"]);
    }

    #[test]
    fn julia_comprehension_keywords_suppressed() {
        let t = toks("x = [i for i in 1:10 if i>3]\nfor j in v\n  g(j)\nend", LanguageTag::Julia);
        let words: Vec<_> = t.iter().map(|tok| tok.text.as_ref()).collect();
        assert_eq!(words, vec!["for", "end"]);
    }

    #[test]
    fn tokens_are_start_offset_ordered() {
        let t = toks("if x then\n  if y then\n    z\n  end\nend", LanguageTag::Lua);
        for w in t.windows(2) {
            assert!(w[0].start < w[1].start);
        }
    }
}
