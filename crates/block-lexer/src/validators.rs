//! Per-language validity predicates: the §4.2 "variation points" table.
//!
//! Every function here answers one question — "does this keyword match,
//! recognized at `start..end`, actually count as a token here?" — given the
//! raw source, the tokens already emitted (for lookback), and running
//! bracket-depth counters the tokenizer maintains as it scans. A predicate
//! returning `false` means the candidate is dropped entirely, not
//! reclassified; it never becomes a different `TokenKind`.
//!
//! These are deliberately best-effort. §9 says so explicitly for the
//! regex/division and transpose/char-literal heuristics in `block-regions`,
//! and the same spirit applies here: a handful of rules (Verilog's
//! control-keyword lookahead, VHDL's conditional-signal-assignment
//! suppression) approximate the real grammar rather than reimplement it.

use crate::{is_ident_byte, Scan};
use block_token::{Token, TokenKind};

/// Running counters the tokenizer threads through the scan for predicates
/// that need more than local text context.
#[derive(Debug, Default)]
pub struct BracketDepth {
    pub square: u32,
    pub paren: u32,
}

pub fn lua_do_is_opener(scan: &Scan, tokens: &[Token]) -> bool {
    !matches!(last_open_text(tokens), Some("while") | Some("for"))
}

fn last_open_text(tokens: &[Token]) -> Option<&str> {
    tokens.last().filter(|t| t.kind == TokenKind::Open).map(|t| t.text.as_ref())
}

/// Ruby/Crystal postfix `if`/`unless`/`while`/`until`: not an opener when the
/// text before it on the same logical line is non-empty, doesn't end in an
/// operator that still expects an expression, and isn't itself a block
/// keyword.
pub fn ruby_postfix_conditional_is_opener(scan: &Scan) -> bool {
    let prefix = logical_line_prefix(scan);
    let trimmed = prefix.trim_end();
    if trimmed.is_empty() {
        return true;
    }
    if ends_in_expression_operator(trimmed) {
        return true;
    }
    let last_word = trailing_word(trimmed);
    matches!(last_word, "elsif" | "else" | "when" | "do" | "then" | "begin")
}

/// `rescue` used postfix (`expr rescue fallback`) is not a middle keyword.
pub fn ruby_rescue_is_middle(scan: &Scan) -> bool {
    logical_line_prefix(scan).trim_end().is_empty()
}

/// `do` as a loop connector (`while cond do`, `for x in y do`) is not an
/// opener in Ruby/Crystal, same rule as Lua.
pub fn ruby_do_is_opener(tokens: &[Token]) -> bool {
    !matches!(last_open_text(tokens), Some("while") | Some("until") | Some("for"))
}

/// Suppress a keyword immediately preceded by `.` (method call syntax,
/// `obj.class`) or immediately followed by `:` (named-tuple/hash key,
/// `{if: 1}`), but not `::`.
pub fn ruby_not_method_call_or_hash_key(scan: &Scan) -> bool {
    if scan.prev_byte() == Some(b'.') {
        return false;
    }
    let bytes = scan.bytes;
    if scan.end < bytes.len() && bytes[scan.end] == b':' {
        let is_double_colon = scan.end + 1 < bytes.len() && bytes[scan.end + 1] == b':';
        if !is_double_colon {
            return false;
        }
    }
    true
}

pub fn julia_not_in_brackets(depth: &BracketDepth) -> bool {
    depth.square == 0
}

/// Bash command position: start of buffer, after a line break, or after one
/// of `; | & ( { \` ! }`, or after the word `then`/`do`/`else`/`elif`/`in`.
pub fn bash_command_position(scan: &Scan) -> bool {
    let bytes = scan.bytes;
    let mut i = scan.start;
    while i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
        i -= 1;
    }
    if i == 0 {
        return true;
    }
    match bytes[i - 1] {
        b'\n' | b'\r' | b';' | b'|' | b'&' | b'(' | b'{' | b'`' | b'!' | b'}' => return true,
        _ => {}
    }
    if is_ident_byte(bytes[i - 1]) {
        let mut word_start = i;
        while word_start > 0 && is_ident_byte(bytes[word_start - 1]) {
            word_start -= 1;
        }
        let word = &scan.source[word_start..i];
        return matches!(word, "then" | "do" | "else" | "elif" | "in");
    }
    false
}

/// A bash keyword followed directly by `)` is a case-pattern word, not a
/// block keyword.
pub fn bash_not_case_pattern(scan: &Scan) -> bool {
    scan.bytes.get(scan.end) != Some(&b')')
}

/// Command-grouping `{` requires following whitespace; `}` requires a
/// preceding `;`, newline, or close keyword.
pub fn bash_brace_open(scan: &Scan) -> bool {
    matches!(scan.bytes.get(scan.end), Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | None)
}

pub fn bash_brace_close(scan: &Scan) -> bool {
    let bytes = scan.bytes;
    let mut i = scan.start;
    while i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
        i -= 1;
    }
    i == 0 || matches!(bytes[i - 1], b';' | b'\n' | b'\r')
}

/// `tell ... to` and `if ... then ACTION` one-liners are not blocks: look
/// for the relevant connective word followed by non-whitespace content
/// before the next line break.
pub fn applescript_tell_is_opener(scan: &Scan) -> bool {
    !line_contains_one_liner_body(scan, "to")
}

pub fn applescript_if_is_opener(scan: &Scan) -> bool {
    !line_contains_one_liner_body(scan, "then")
}

/// `on`/`to` only open a block at line start (ignoring leading whitespace).
pub fn applescript_on_to_at_line_start(scan: &Scan) -> bool {
    scan.at_line_start_ignoring_ws()
}

fn line_contains_one_liner_body(scan: &Scan, connective: &str) -> bool {
    let rest_end = scan.line_end_from(scan.end);
    let rest = &scan.source[scan.end..rest_end];
    if let Some(pos) = find_word(rest, connective) {
        let after = rest[pos + connective.len()..].trim_start();
        return !after.is_empty();
    }
    false
}

fn find_word(haystack: &str, word: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let wlen = word.len();
    let mut i = 0;
    while i + wlen <= bytes.len() {
        if &haystack[i..i + wlen] == word
            && (i == 0 || !is_ident_byte(bytes[i - 1]))
            && bytes.get(i + wlen).map(|b| !is_ident_byte(*b)).unwrap_or(true)
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Ada `loop` is a standalone opener unless it is the loop-connector of a
/// preceding `for`/`while` header on the same logical construct (the
/// nearest previously opened, still-unclosed block is that `for`/`while`).
pub fn ada_loop_is_opener(tokens: &[Token]) -> bool {
    !matches!(last_open_text(tokens), Some("for") | Some("while"))
}

pub fn vhdl_loop_is_opener(tokens: &[Token]) -> bool {
    ada_loop_is_opener(tokens)
}

/// VHDL `for` preceded by `wait` on the same statement (`wait for 10 ns;`)
/// is not a block opener.
pub fn vhdl_for_not_after_wait(scan: &Scan) -> bool {
    let prefix = logical_line_prefix(scan);
    trailing_word(prefix.trim_end()) != "wait"
}

/// VHDL `entity` preceded by `use` (`use entity work.foo;`) or a label
/// colon is not a block opener.
pub fn vhdl_entity_not_instantiation(scan: &Scan) -> bool {
    let prefix = logical_line_prefix(scan);
    let trimmed = prefix.trim_end();
    if trailing_word(trimmed) == "use" {
        return false;
    }
    !trimmed.ends_with(':')
}

/// Bare `function`/`procedure` declarations (ending `;` with no `is`) are
/// not block openers; only bodies (eventually followed by `is`) are.
pub fn vhdl_subprogram_has_body(scan: &Scan) -> bool {
    let bytes = scan.bytes;
    let mut i = scan.end;
    let mut depth: i32 = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b';' if depth <= 0 => return false,
            b'i' if depth <= 0 && bytes[i..].starts_with(b"is") => {
                let boundary_before = i == 0 || !is_ident_byte(bytes[i - 1]);
                let boundary_after = bytes.get(i + 2).map(|b| !is_ident_byte(*b)).unwrap_or(true);
                if boundary_before && boundary_after {
                    return true;
                }
            }
            _ => {}
        }
        i += 1;
    }
    false
}

/// `when`/`else` inside a conditional signal assignment (`sig <= a when c
/// else b;`) are not block middles: look back for a `<=` before any
/// statement boundary (`;`).
pub fn vhdl_when_else_not_signal_assignment(scan: &Scan) -> bool {
    let bytes = scan.bytes;
    let mut i = scan.start;
    while i > 0 {
        i -= 1;
        match bytes[i] {
            b';' => return true,
            b'<' if bytes.get(i + 1) == Some(&b'=') => return false,
            _ => {}
        }
    }
    true
}

/// Pascal `case` is a variant-record tag, not an opener, when the nearest
/// currently-open block is a `record`.
pub fn pascal_case_not_variant_tag(tokens: &[Token]) -> bool {
    last_open_text(tokens) != Some("record")
}

/// `class`/`object`/`interface` are type-definition openers only directly
/// after `=`; `class of`, `class;`, and `class(Parent);` forward
/// declarations are suppressed.
pub fn pascal_class_is_type_definition(scan: &Scan) -> bool {
    let prefix = logical_line_prefix(scan);
    if trailing_word_or_char(prefix.trim_end()) != "=" {
        return false;
    }
    let bytes = scan.bytes;
    let mut i = scan.end;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    if bytes[i..].starts_with(b"of") {
        return false;
    }
    if bytes.get(i) == Some(&b';') {
        return false;
    }
    if bytes.get(i) == Some(&b'(') {
        let mut depth = 1i32;
        let mut j = i + 1;
        while j < bytes.len() && depth > 0 {
            match bytes[j] {
                b'(' => depth += 1,
                b')' => depth -= 1,
                _ => {}
            }
            j += 1;
        }
        let mut k = j;
        while k < bytes.len() && (bytes[k] == b' ' || bytes[k] == b'\t') {
            k += 1;
        }
        if bytes.get(k) == Some(&b';') {
            return false;
        }
    }
    true
}

/// Verilog control keywords (`if`, `for`, `always*`, ...) only open a block
/// when a `begin` follows (skipping event controls `@(...)`, condition
/// parens, and chained control keywords) before any statement terminator.
pub fn verilog_control_precedes_begin(scan: &Scan) -> bool {
    let bytes = scan.bytes;
    let mut i = scan.end;
    let limit = bytes.len().min(scan.end + 4096);
    loop {
        while i < limit && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i >= limit {
            return false;
        }
        match bytes[i] {
            b'@' => {
                i += 1;
                while i < limit && bytes[i] != b'(' {
                    if bytes[i] == b';' {
                        return false;
                    }
                    i += 1;
                }
                match skip_balanced(bytes, i, b'(', b')') {
                    Some(end) => i = end,
                    None => return false,
                }
            }
            b'(' => match skip_balanced(bytes, i, b'(', b')') {
                Some(end) => i = end,
                None => return false,
            },
            b';' => return false,
            _ if bytes[i..].starts_with(b"begin")
                && bytes.get(i + 5).map(|b| !is_ident_byte(*b)).unwrap_or(true) =>
            {
                return true;
            }
            _ if is_ident_byte(bytes[i]) => {
                let word_start = i;
                while i < limit && is_ident_byte(bytes[i]) {
                    i += 1;
                }
                let word = &scan.source[word_start..i];
                if !is_verilog_control_word(word) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

fn is_verilog_control_word(word: &str) -> bool {
    matches!(
        word,
        "always" | "always_comb" | "always_ff" | "always_latch" | "initial" | "final" | "if"
            | "else" | "for" | "while" | "repeat" | "forever"
    )
}

fn skip_balanced(bytes: &[u8], open_pos: usize, open: u8, close: u8) -> Option<usize> {
    if bytes.get(open_pos) != Some(&open) {
        return None;
    }
    let mut depth = 0i32;
    let mut i = open_pos;
    while i < bytes.len() {
        if bytes[i] == open {
            depth += 1;
        } else if bytes[i] == close {
            depth -= 1;
            if depth == 0 {
                return Some(i + 1);
            }
        }
        i += 1;
    }
    None
}

/// Verilog `default` is a middle keyword only when followed by `:`.
pub fn verilog_default_followed_by_colon(scan: &Scan) -> bool {
    let bytes = scan.bytes;
    let mut i = scan.end;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    bytes.get(i) == Some(&b':')
}

fn logical_line_prefix(scan: &Scan) -> &str {
    let bytes = scan.bytes;
    let line_start = scan.line_start_of(scan.start);
    let mut seg_start = line_start;
    let mut i = line_start;
    while i < scan.start {
        if bytes[i] == b';' {
            seg_start = i + 1;
        }
        i += 1;
    }
    &scan.source[seg_start..scan.start]
}

fn ends_in_expression_operator(s: &str) -> bool {
    match s.chars().next_back() {
        Some(c) => "=+-*/%<>!&|^~:,([{".contains(c),
        None => true,
    }
}

fn trailing_word(s: &str) -> &str {
    let end = s.len();
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(end);
    &s[start..end]
}

fn trailing_word_or_char(s: &str) -> &str {
    let w = trailing_word(s);
    if !w.is_empty() {
        return w;
    }
    match s.char_indices().next_back() {
        Some((i, _)) => &s[i..],
        None => "",
    }
}
