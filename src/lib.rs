//! Lexical block-pair matcher for syntactically irregular, block-terminated
//! languages.
//!
//! `block-match` pairs up structural keywords — `if`/`end`, `begin`/`end`,
//! `do`/`done`, `repeat`/`until`, and their per-language cousins — across
//! eleven languages that do not offer a uniform bracket-matching story:
//! Ruby, Crystal, Elixir, Lua, Julia, Bash, Pascal/Delphi, Ada, VHDL,
//! Verilog/SystemVerilog, and AppleScript. It works purely on keyword
//! boundaries and lexical context, never a full grammar, so it stays cheap
//! enough for on-keystroke use in an editor.
//!
//! The pipeline is four stages, each its own crate:
//!
//! 1. [`block_regions::find_excluded`] — finds comments, string/char
//!    literals, heredoc bodies, and interpolations, so the tokenizer never
//!    matches a keyword inside one.
//! 2. [`block_lexer::tokenize`] — a longest-match-first keyword-boundary
//!    scan, filtered through each language's variation points (postfix
//!    conditionals, one-liners, loop connectors, comprehension
//!    suppression).
//! 3. [`block_matcher::match_tokens`] — a LIFO stack matcher whose
//!    close-to-open resolution rule is the one place per-language behavior
//!    lives (generic pop, `until`/`repeat`, compound `end TYPE`, shared
//!    Verilog/VHDL merges).
//! 4. [`block_matcher::recompute_levels`] — fixes up nest levels as an
//!    exact containment count, independent of matcher stack depth.
//!
//! [`parse`] runs all four stages and returns the resulting [`BlockPair`]s,
//! sorted by closing position. It is total: every input, however malformed,
//! produces a result — there is no `Result`-returning entry point and no
//! logging at this layer (see `demos/dump_pairs.rs` for an instrumented
//! wrapper used during manual inspection).

pub use block_lang::LanguageTag;
pub use block_token::{BlockPair, ExcludedRegion, Token, TokenKind};

/// Runs the full four-stage pipeline and returns the matched block pairs,
/// sorted by closing position with nest levels filled in.
pub fn parse(source: &str, language: LanguageTag) -> Vec<BlockPair> {
    let excluded = block_regions::find_excluded(source, language);
    let tokens = block_lexer::tokenize(source, language, &excluded);
    block_matcher::match_tokens(&tokens, language)
}

/// Runs only the excluded-region and tokenizer stages, returning the
/// classified keyword tokens in source order. Exposed as ordinary public
/// API — not test-gated — since the corpus crate and external test suites
/// use it directly to assert on tokenization independent of matching.
pub fn tokens_of(source: &str, language: LanguageTag) -> Vec<Token> {
    let excluded = block_regions::find_excluded(source, language);
    block_lexer::tokenize(source, language, &excluded)
}

/// Runs only the excluded-region stage.
pub fn excluded_regions_of(source: &str, language: LanguageTag) -> Vec<ExcludedRegion> {
    block_regions::find_excluded(source, language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lua_repeat_until_with_nested_if() {
        let pairs = parse("repeat\n  if x then a end\nuntil y", LanguageTag::Lua);
        assert_eq!(pairs.len(), 2);
        let repeat_pair = pairs.iter().find(|p| p.open.text.as_ref() == "repeat").unwrap();
        assert_eq!(repeat_pair.close.text.as_ref(), "until");
        assert_eq!(repeat_pair.nest, 0);
        let if_pair = pairs.iter().find(|p| p.open.text.as_ref() == "if").unwrap();
        assert_eq!(if_pair.nest, 1);
    }

    #[test]
    fn ruby_postfix_if_does_not_open_a_block() {
        let pairs = parse("return x if cond\nif y\n  z\nend", LanguageTag::Ruby);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].open.start, 17);
    }

    #[test]
    fn bash_heredoc_body_keywords_are_inert() {
        let pairs = parse("cat <<EOF\nif then fi\nEOF\nif true; then :; fi", LanguageTag::Bash);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].open.text.as_ref(), "if");
    }

    #[test]
    fn verilog_end_merges_control_keyword_and_begin() {
        let pairs = parse("always @(posedge clk) begin\n  if (x) begin a; end\nend", LanguageTag::Verilog);
        // always/begin and if/begin each get their own pair, sharing a close
        // token with the control keyword that headed them.
        assert_eq!(pairs.len(), 4);
        let closes: std::collections::BTreeSet<_> = pairs.iter().map(|p| p.close.start).collect();
        assert_eq!(closes.len(), 2);
        assert_eq!(pairs.iter().map(|p| p.nest).max().unwrap(), 3);
    }

    #[test]
    fn ada_compound_end_and_bare_end_share_close_token() {
        let pairs = parse("procedure P is\nbegin\n  null;\nend P;", LanguageTag::Ada);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.close.start == pairs[0].close.start));
    }

    #[test]
    fn julia_comprehension_for_if_are_suppressed() {
        let pairs = parse("x = [i for i in 1:10 if i>3]\nfor j in v\n  g(j)\nend", LanguageTag::Julia);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].open.start, 29);
    }

    #[test]
    fn excluded_regions_of_matches_parse_stage_one() {
        let src = "# if end\nif x\n  y\nend";
        let regions = excluded_regions_of(src, LanguageTag::Ruby);
        assert_eq!(regions.len(), 1);
        let pairs = parse(src, LanguageTag::Ruby);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn tokens_of_is_consistent_with_parse() {
        let src = "if x\n  y\nend";
        let tokens = tokens_of(src, LanguageTag::Ruby);
        assert_eq!(tokens.len(), 2);
        let pairs = parse(src, LanguageTag::Ruby);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].open.start, tokens[0].start);
        assert_eq!(pairs[0].close.start, tokens[1].start);
    }
}
