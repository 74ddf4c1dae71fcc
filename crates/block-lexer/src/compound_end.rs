//! Compound-end pre-scanning for Ada, VHDL, and AppleScript.
//!
//! All three close certain openers with `end TYPE` rather than a bare
//! `end` — `end if;`, `end loop;`, `end process;`, AppleScript's `end tell` —
//! where `TYPE` is itself
//! one of the language's opening keywords. This module finds those compound
//! spans ahead of the generic keyword-boundary scan so the tokenizer can
//! emit a single close token for the whole phrase and skip the inner `TYPE`
//! word the generic scanner would otherwise (mis)tokenize on its own.
//!
//! `end <name>` where `<name>` is an arbitrary identifier (an Ada procedure
//! or package name, say `end P;`) is deliberately *not* a compound end here:
//! `TYPE` must equal one of the language's opening keywords, exactly as
//! spec's close-resolution rule requires ("resolves the nearest opener
//! whose keyword equals TYPE"). Such bare-identifier forms fall through to
//! the ordinary bare-`end` token and are resolved by the begin-context merge
//! rule in `block-matcher` instead.

use block_lang::{keywords, LanguageTag};
use block_token::ExcludedRegion;

/// A pre-recorded `end TYPE` span.
#[derive(Debug, Clone)]
pub struct CompoundEnd {
    pub start: usize,
    pub end: usize,
    /// The `TYPE` word, lowercased, e.g. `"if"`, `"loop"`, `"process"`.
    pub type_text: String,
}

/// Finds every `end TYPE` occurrence outside `excluded`, for `TYPE` drawn
/// from `lang`'s opening-keyword set. Only meaningful for [`LanguageTag::Ada`],
/// [`LanguageTag::Vhdl`], and [`LanguageTag::AppleScript`]; other languages
/// return an empty vector.
pub fn prescan(source: &str, excluded: &[ExcludedRegion], lang: LanguageTag) -> Vec<CompoundEnd> {
    if !matches!(lang, LanguageTag::Ada | LanguageTag::Vhdl | LanguageTag::AppleScript) {
        return Vec::new();
    }
    let bytes = source.as_bytes();
    let opens = keywords(lang).open;
    let mut out = Vec::new();
    let mut i = 0;
    while i + 3 <= bytes.len() {
        if !eq_ci(&bytes[i..i + 3], b"end") {
            i += 1;
            continue;
        }
        if crate::is_in(excluded, i) || !word_boundary_before(bytes, i) {
            i += 1;
            continue;
        }
        let after_kw = i + 3;
        if after_kw < bytes.len() && crate::is_ident_byte(bytes[after_kw]) {
            i += 1;
            continue;
        }
        let mut j = after_kw;
        while j < bytes.len() && (bytes[j] == b' ' || bytes[j] == b'\t') {
            j += 1;
        }
        if j == after_kw {
            // `end` not followed by at least one space before the candidate word.
            i += 1;
            continue;
        }
        let word_start = j;
        while j < bytes.len() && crate::is_ident_byte(bytes[j]) {
            j += 1;
        }
        if j == word_start {
            i += 1;
            continue;
        }
        let word = &source[word_start..j];
        if opens.iter().any(|o| o.eq_ignore_ascii_case(word)) && !crate::is_in(excluded, word_start) {
            out.push(CompoundEnd { start: i, end: j, type_text: word.to_ascii_lowercase() });
            i = j;
            continue;
        }
        i += 1;
    }
    out
}

fn word_boundary_before(bytes: &[u8], pos: usize) -> bool {
    pos == 0 || !crate::is_ident_byte(bytes[pos - 1])
}

fn eq_ci(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_ascii_lowercase() == y.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_ada_end_if_and_end_loop() {
        let src = "if x then\n  null;\nend if;\nloop\n  null;\nend loop;";
        let spans = prescan(src, &[], LanguageTag::Ada);
        let words: Vec<_> = spans.iter().map(|s| s.type_text.as_str()).collect();
        assert_eq!(words, vec!["if", "loop"]);
    }

    #[test]
    fn skips_arbitrary_identifier_after_end() {
        let src = "procedure P is\nbegin\n  null;\nend P;";
        let spans = prescan(src, &[], LanguageTag::Ada);
        assert!(spans.is_empty());
    }

    #[test]
    fn vhdl_end_process_and_end_generate() {
        let src = "process\nbegin\nend process;\nfor i in 0 to 1 generate\nend generate;";
        let spans = prescan(src, &[], LanguageTag::Vhdl);
        let words: Vec<_> = spans.iter().map(|s| s.type_text.as_str()).collect();
        assert_eq!(words, vec!["process", "generate"]);
    }
}
