//! Stack-based block matcher and nest-level recomputation.
//!
//! [`match_tokens`] consumes a time-ordered token sequence and emits
//! [`BlockPair`]s using a LIFO stack of [`OpenBlock`]s; only the
//! close-to-open resolution rule varies per language (§4.3's "variation
//! point"), everything else — push on open, append on middle, splice and
//! emit on close — is shared. [`recompute_levels`] then fixes up nest
//! levels independently of stack depth during matching, since unmatched
//! opens left on the stack at EOF would otherwise inflate them.

use block_lang::LanguageTag;
use block_token::{BlockPair, OpenBlock, Token, TokenKind};

/// Matches `tokens` (as produced by `block_lexer::tokenize`) into block
/// pairs for `lang`, sorted by closing position with nest levels filled in.
pub fn match_tokens(tokens: &[Token], lang: LanguageTag) -> Vec<BlockPair> {
    let mut stack: Vec<OpenBlock> = Vec::new();
    let mut pairs: Vec<BlockPair> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Open => {
                if lang == LanguageTag::Verilog && token.text.as_ref() == "begin" {
                    promote_preceding_else(tokens, i, &mut stack);
                }
                stack.push(OpenBlock::new(token.clone()));
            }
            TokenKind::Middle => {
                if let Some(top) = stack.last_mut() {
                    top.middle.push(token.clone());
                }
            }
            TokenKind::Close => resolve_close(lang, token, &mut stack, &mut pairs),
        }
    }

    pairs.sort_by_key(|p| p.close.start);
    recompute_levels(&mut pairs);
    pairs
}

/// Recomputes every pair's nest level as the exact count of other pairs
/// that strictly contain it: `Q.open.start < P.open.start && Q.close.start
/// >= P.close.start`. O(n^2) in pair count, deliberately independent of the
/// stack depth seen during matching.
pub fn recompute_levels(pairs: &mut [BlockPair]) {
    let opens_closes: Vec<(usize, usize)> =
        pairs.iter().map(|p| (p.open.start, p.close.start)).collect();
    for i in 0..pairs.len() {
        let (open_i, close_i) = opens_closes[i];
        let nest = opens_closes
            .iter()
            .enumerate()
            .filter(|&(j, &(open_j, close_j))| j != i && open_j < open_i && close_j >= close_i)
            .count();
        pairs[i].nest = nest;
    }
}

fn resolve_close(lang: LanguageTag, close: &Token, stack: &mut Vec<OpenBlock>, pairs: &mut Vec<BlockPair>) {
    match lang {
        LanguageTag::Ruby | LanguageTag::Crystal | LanguageTag::Elixir | LanguageTag::Julia => {
            generic_pop(close, stack, pairs)
        }
        LanguageTag::Lua | LanguageTag::Pascal => lua_pascal_close(close, stack, pairs),
        LanguageTag::Bash => bash_close(close, stack, pairs),
        LanguageTag::Verilog => verilog_close(close, stack, pairs),
        LanguageTag::Ada => ada_close(close, stack, pairs),
        LanguageTag::Vhdl => vhdl_close(close, stack, pairs),
        LanguageTag::AppleScript => applescript_close(close, stack, pairs),
    }
}

/// Pops the topmost open frame unconditionally. The policy for Ruby,
/// Crystal, Elixir, and Julia — each has exactly one close keyword (`end`)
/// and no compound or cross-frame resolution rule.
fn generic_pop(close: &Token, stack: &mut Vec<OpenBlock>, pairs: &mut Vec<BlockPair>) {
    if let Some(ob) = stack.pop() {
        pairs.push(BlockPair::new(ob.open, close.clone(), ob.middle));
    }
}

/// Splices out the nearest open frame (from the top) whose keyword matches
/// `pred`, wherever it sits in the stack — not necessarily the top.
fn splice_matching(
    stack: &mut Vec<OpenBlock>,
    pred: impl Fn(&str) -> bool,
) -> Option<OpenBlock> {
    let idx = stack.iter().rposition(|b| pred(b.open.text.as_ref()))?;
    Some(stack.remove(idx))
}

/// `until` resolves the nearest `repeat`; `end` resolves the nearest
/// non-`repeat` frame from the top, but only if the topmost frame is itself
/// not `repeat` — this stops `end` from skipping over an unmatched
/// `repeat` still waiting for its `until`.
fn lua_pascal_close(close: &Token, stack: &mut Vec<OpenBlock>, pairs: &mut Vec<BlockPair>) {
    if close.text.as_ref() == "until" {
        if let Some(ob) = splice_matching(stack, |t| t == "repeat") {
            pairs.push(BlockPair::new(ob.open, close.clone(), ob.middle));
        }
        return;
    }
    if stack.last().map(|b| b.open.text.as_ref() == "repeat").unwrap_or(false) {
        return;
    }
    generic_pop(close, stack, pairs);
}

/// `fi`→`if`, `esac`→`case`, `done`→last of `for`/`while`/`until`/`select`,
/// `}`→`{`.
fn bash_close(close: &Token, stack: &mut Vec<OpenBlock>, pairs: &mut Vec<BlockPair>) {
    let targets: &[&str] = match close.text.as_ref() {
        "fi" => &["if"],
        "esac" => &["case"],
        "done" => &["for", "while", "until", "select"],
        "}" => &["{"],
        _ => return,
    };
    if let Some(ob) = splice_matching(stack, |t| targets.contains(&t)) {
        pairs.push(BlockPair::new(ob.open, close.clone(), ob.middle));
    }
}

const VERILOG_CONTROL: &[&str] =
    &["always", "always_comb", "always_ff", "always_latch", "initial", "final", "if", "for", "while", "repeat", "forever"];

/// Promotes a `middle`-classified `else` that directly precedes a `begin`
/// into its own open frame, since a Verilog `else` branch gets its own
/// `begin...end` region just like the control keyword that headed the
/// branch it follows. Ordinary (non-`begin`-headed) `else` stays a plain
/// middle token on whatever frame was open when it was seen.
fn promote_preceding_else(tokens: &[Token], begin_idx: usize, stack: &mut Vec<OpenBlock>) {
    if begin_idx == 0 {
        return;
    }
    let prev = &tokens[begin_idx - 1];
    if prev.kind != TokenKind::Middle || prev.text.as_ref() != "else" {
        return;
    }
    if let Some(top) = stack.last_mut() {
        if top.middle.last().map(|m| m.start) == Some(prev.start) {
            top.middle.pop();
            stack.push(OpenBlock::new(prev.clone()));
        }
    }
}

/// Compound closes (`endmodule`, `endcase`, `join*`, ...) resolve their
/// declared opener set directly. Bare `end` closes the nearest `begin`;
/// when the frame immediately below is a control keyword (`always*`, `if`,
/// `for`, ...) that frame is closed by the same `end` token too, and if the
/// frame below *that* is a promoted `else`, it is merged in as well.
fn verilog_close(close: &Token, stack: &mut Vec<OpenBlock>, pairs: &mut Vec<BlockPair>) {
    let text = close.text.as_ref();
    if text == "end" {
        resolve_verilog_begin(close, stack, pairs);
        return;
    }
    let targets: &[&str] = match text {
        "endmodule" => &["module"],
        "endfunction" => &["function"],
        "endtask" => &["task"],
        "endclass" => &["class"],
        "endcase" => &["case", "casex", "casez"],
        "endgenerate" => &["generate"],
        "endspecify" => &["specify"],
        "join" | "join_any" | "join_none" => &["fork"],
        "`endif" => &["`ifdef", "`ifndef"],
        _ => return,
    };
    if let Some(ob) = splice_matching(stack, |t| targets.contains(&t)) {
        pairs.push(BlockPair::new(ob.open, close.clone(), ob.middle));
    }
}

fn resolve_verilog_begin(close: &Token, stack: &mut Vec<OpenBlock>, pairs: &mut Vec<BlockPair>) {
    let idx = match stack.iter().rposition(|b| b.open.text.as_ref() == "begin") {
        Some(idx) => idx,
        None => return,
    };
    let ob = stack.remove(idx);
    pairs.push(BlockPair::new(ob.open, close.clone(), ob.middle));
    if idx == 0 {
        return;
    }
    let below_idx = idx - 1;
    let below_text = stack[below_idx].open.text.clone();
    if VERILOG_CONTROL.contains(&below_text.as_ref()) {
        let ob2 = stack.remove(below_idx);
        pairs.push(BlockPair::new(ob2.open, close.clone(), ob2.middle));
        if below_idx > 0 && stack[below_idx - 1].open.text.as_ref() == "else" {
            let ob3 = stack.remove(below_idx - 1);
            pairs.push(BlockPair::new(ob3.open, close.clone(), ob3.middle));
        }
    } else if below_text.as_ref() == "else" {
        let ob2 = stack.remove(below_idx);
        pairs.push(BlockPair::new(ob2.open, close.clone(), ob2.middle));
    }
}

const ADA_BEGIN_CONTEXT: &[&str] =
    &["declare", "procedure", "function", "task", "protected", "package", "entry", "accept"];

/// `end TYPE` resolves the nearest opener whose keyword equals `TYPE`
/// (`end loop` additionally accepts `for`/`while`, Ada's anonymous loop
/// headers). Bare `end` closes the nearest `begin`, and if the frame below
/// it is a begin-context keyword, that frame is closed by the same token.
fn ada_close(close: &Token, stack: &mut Vec<OpenBlock>, pairs: &mut Vec<BlockPair>) {
    if let Some(rest) = close.text.strip_prefix("end ") {
        let rest = rest.to_string();
        let ob = splice_matching(stack, |t| t == rest || (rest == "loop" && matches!(t, "for" | "while")));
        if let Some(ob) = ob {
            pairs.push(BlockPair::new(ob.open, close.clone(), ob.middle));
        }
        return;
    }
    close_begin_with_context(close, stack, pairs, ADA_BEGIN_CONTEXT);
}

fn close_begin_with_context(
    close: &Token,
    stack: &mut Vec<OpenBlock>,
    pairs: &mut Vec<BlockPair>,
    context: &[&str],
) {
    let idx = match stack.iter().rposition(|b| b.open.text.as_ref() == "begin") {
        Some(idx) => idx,
        None => return,
    };
    let mergeable = idx > 0 && context.contains(&stack[idx - 1].open.text.as_ref());
    let ob = stack.remove(idx);
    pairs.push(BlockPair::new(ob.open, close.clone(), ob.middle));
    if mergeable {
        let ob2 = stack.remove(idx - 1);
        pairs.push(BlockPair::new(ob2.open, close.clone(), ob2.middle));
    }
}

/// `end TYPE` resolves the nearest opener whose keyword equals `TYPE`;
/// `end generate` additionally closes a preceding `for`/`while`/`if`
/// generate-scheme opener, mirroring Verilog's control-keyword merge.
fn vhdl_close(close: &Token, stack: &mut Vec<OpenBlock>, pairs: &mut Vec<BlockPair>) {
    let Some(rest) = close.text.strip_prefix("end ") else {
        generic_pop(close, stack, pairs);
        return;
    };
    let rest = rest.to_string();
    let idx = stack.iter().rposition(|b| b.open.text.as_ref() == rest);
    let Some(idx) = idx else { return };
    let ob = stack.remove(idx);
    pairs.push(BlockPair::new(ob.open, close.clone(), ob.middle));
    if rest == "generate" && idx > 0 && matches!(stack[idx - 1].open.text.as_ref(), "for" | "while" | "if") {
        let ob2 = stack.remove(idx - 1);
        pairs.push(BlockPair::new(ob2.open, close.clone(), ob2.middle));
    }
}

/// Compound `end X` resolves its mapped opener (`end tell`, `end if`, `end
/// repeat`, `end try`); bare `end` pops the top, matching a handler's `end
/// handlerName` or a plain `end`.
fn applescript_close(close: &Token, stack: &mut Vec<OpenBlock>, pairs: &mut Vec<BlockPair>) {
    let Some(rest) = close.text.strip_prefix("end ") else {
        generic_pop(close, stack, pairs);
        return;
    };
    let rest = rest.to_string();
    if let Some(ob) = splice_matching(stack, |t| t == rest) {
        pairs.push(BlockPair::new(ob.open, close.clone(), ob.middle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_token::TokenKind;

    fn tok(kind: TokenKind, text: &str, start: usize, end: usize) -> Token {
        Token::new(kind, text, start, end, 0, 0)
    }

    #[test]
    fn generic_pop_pairs_nested_ends() {
        let tokens = vec![
            tok(TokenKind::Open, "if", 0, 2),
            tok(TokenKind::Open, "if", 3, 5),
            tok(TokenKind::Close, "end", 6, 9),
            tok(TokenKind::Close, "end", 10, 13),
        ];
        let pairs = match_tokens(&tokens, LanguageTag::Ruby);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].open.start, 3);
        assert_eq!(pairs[0].nest, 1);
        assert_eq!(pairs[1].open.start, 0);
        assert_eq!(pairs[1].nest, 0);
    }

    #[test]
    fn lua_until_skips_to_repeat_and_end_does_not_cross_it() {
        let tokens = vec![
            tok(TokenKind::Open, "repeat", 0, 6),
            tok(TokenKind::Open, "if", 10, 12),
            tok(TokenKind::Close, "end", 20, 23),
            tok(TokenKind::Close, "until", 24, 29),
        ];
        let pairs = match_tokens(&tokens, LanguageTag::Lua);
        assert_eq!(pairs.len(), 2);
        let if_pair = pairs.iter().find(|p| p.open.text.as_ref() == "if").unwrap();
        assert_eq!(if_pair.close.start, 20);
        let repeat_pair = pairs.iter().find(|p| p.open.text.as_ref() == "repeat").unwrap();
        assert_eq!(repeat_pair.close.start, 24);
    }

    #[test]
    fn ada_bare_end_merges_begin_and_procedure() {
        let tokens = vec![
            tok(TokenKind::Open, "procedure", 0, 9),
            tok(TokenKind::Open, "begin", 20, 25),
            tok(TokenKind::Close, "end", 40, 43),
        ];
        let pairs = match_tokens(&tokens, LanguageTag::Ada);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.close.start == 40));
        let begin_pair = pairs.iter().find(|p| p.open.text.as_ref() == "begin").unwrap();
        assert_eq!(begin_pair.nest, 1);
        let proc_pair = pairs.iter().find(|p| p.open.text.as_ref() == "procedure").unwrap();
        assert_eq!(proc_pair.nest, 0);
    }

    #[test]
    fn verilog_end_merges_begin_and_control_keyword_two_levels() {
        let tokens = vec![
            tok(TokenKind::Open, "always", 0, 6),
            tok(TokenKind::Open, "begin", 25, 30),
            tok(TokenKind::Open, "if", 35, 37),
            tok(TokenKind::Open, "begin", 45, 50),
            tok(TokenKind::Close, "end", 55, 58),
            tok(TokenKind::Close, "end", 60, 63),
        ];
        let pairs = match_tokens(&tokens, LanguageTag::Verilog);
        // Every control keyword and the `begin` it heads gets its own pair;
        // pairs merge only in sharing a close token, not in collapsing into one.
        assert_eq!(pairs.len(), 4);
        let inner_begin = pairs.iter().find(|p| p.open.start == 45).unwrap();
        assert_eq!(inner_begin.close.start, 55);
        assert_eq!(inner_begin.nest, 3);
        let if_pair = pairs.iter().find(|p| p.open.start == 35).unwrap();
        assert_eq!(if_pair.close.start, 55);
        assert_eq!(if_pair.nest, 2);
        let outer_begin = pairs.iter().find(|p| p.open.start == 25).unwrap();
        assert_eq!(outer_begin.close.start, 63);
        assert_eq!(outer_begin.nest, 1);
        let outer = pairs.iter().find(|p| p.open.start == 0).unwrap();
        assert_eq!(outer.close.start, 63);
        assert_eq!(outer.nest, 0);
    }

    #[test]
    fn recompute_levels_ignores_unmatched_opens_left_on_stack() {
        let tokens = vec![
            tok(TokenKind::Open, "if", 0, 2),
            tok(TokenKind::Open, "if", 5, 7),
            tok(TokenKind::Close, "end", 10, 13),
        ];
        let pairs = match_tokens(&tokens, LanguageTag::Ruby);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].nest, 0);
    }
}
