//! §8's six worked scenarios, each asserted against its documented exact
//! pair count, keyword sequence, and nest level.

use block_corpus::{ada, bash, julia, lua, ruby, verilog};
use block_match::{parse, LanguageTag};

#[test]
fn lua_repeat_with_nested_if() {
    let pairs = parse(lua::REPEAT_WITH_NESTED_IF.source, LanguageTag::Lua);
    assert_eq!(pairs.len(), 2);
    let repeat_pair = pairs.iter().find(|p| p.open.text.as_ref() == "repeat").unwrap();
    assert_eq!(repeat_pair.close.text.as_ref(), "until");
    assert_eq!(repeat_pair.nest, 0);
    let if_pair = pairs.iter().find(|p| p.open.text.as_ref() == "if").unwrap();
    assert_eq!(if_pair.close.text.as_ref(), "end");
    assert_eq!(if_pair.nest, 1);
}

#[test]
fn ruby_postfix_if_does_not_count_as_an_opener() {
    let pairs = parse(ruby::POSTFIX_IF.source, LanguageTag::Ruby);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].open.text.as_ref(), "if");
    assert_eq!(pairs[0].close.text.as_ref(), "end");
    assert_eq!(pairs[0].nest, 0);
}

#[test]
fn bash_heredoc_hides_its_body_keywords() {
    let pairs = parse(bash::HEREDOC_HIDES_KEYWORDS.source, LanguageTag::Bash);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].open.text.as_ref(), "if");
    assert_eq!(pairs[0].close.text.as_ref(), "fi");
}

#[test]
fn verilog_control_and_begin_merge_under_one_end() {
    let fixture = verilog::CONTROL_AND_BEGIN_MERGE;
    let pairs = parse(fixture.source, LanguageTag::Verilog);
    assert_eq!(pairs.len(), 4);
    let max_nest = pairs.iter().map(|p| p.nest).max().unwrap();
    assert_eq!(max_nest, 3);
    let closes: std::collections::BTreeSet<_> = pairs.iter().map(|p| p.close.start).collect();
    assert_eq!(closes.len(), 2, "each end token closes a control keyword together with its begin");
}

#[test]
fn ada_compound_end_resolves_procedure_by_implicit_name() {
    let pairs = parse(ada::COMPOUND_END.source, LanguageTag::Ada);
    assert_eq!(pairs.len(), 2);
    let first_close = pairs[0].close.start;
    assert!(pairs.iter().all(|p| p.close.start == first_close));
    let begin_pair = pairs.iter().find(|p| p.open.text.as_ref() == "begin").unwrap();
    assert_eq!(begin_pair.nest, 1);
    let proc_pair = pairs.iter().find(|p| p.open.text.as_ref() == "procedure").unwrap();
    assert_eq!(proc_pair.nest, 0);
}

#[test]
fn julia_comprehension_keywords_are_suppressed() {
    let pairs = parse(julia::COMPREHENSION_SUPPRESSION.source, LanguageTag::Julia);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].open.text.as_ref(), "for");
    assert_eq!(pairs[0].close.text.as_ref(), "end");
}

#[test]
fn all_scenarios_round_trip_through_the_public_spec_scenarios_list() {
    for (lang, fixture) in block_corpus::spec_scenarios() {
        let pairs = parse(fixture.source, lang);
        assert!(!pairs.is_empty(), "{} produced no pairs", fixture.name);
    }
}
