//! Property tests over every corpus fixture across all eleven languages,
//! plus a free-form proptest fuzz pass checking the pipeline never panics
//! and always produces internally consistent output.

use block_match::{excluded_regions_of, parse, tokens_of, LanguageTag};
use proptest::prelude::*;

fn all_languages() -> Vec<LanguageTag> {
    LanguageTag::ALL.to_vec()
}

#[test]
fn excluded_regions_are_sorted_and_non_overlapping() {
    for (lang, fixture) in block_corpus::all() {
        let regions = excluded_regions_of(fixture.source, lang);
        for w in regions.windows(2) {
            assert!(w[0].end <= w[1].start, "{}: overlapping or unsorted regions", fixture.name);
        }
    }
}

#[test]
fn tokens_never_start_inside_an_excluded_region() {
    for (lang, fixture) in block_corpus::all() {
        let regions = excluded_regions_of(fixture.source, lang);
        let tokens = tokens_of(fixture.source, lang);
        for t in &tokens {
            assert!(
                !block_regions::contains(&regions, t.start),
                "{}: token {:?} starts inside an excluded region",
                fixture.name,
                t.text
            );
        }
    }
}

#[test]
fn tokens_are_strictly_start_offset_ordered() {
    for (lang, fixture) in block_corpus::all() {
        let tokens = tokens_of(fixture.source, lang);
        for w in tokens.windows(2) {
            assert!(w[0].start < w[1].start, "{}: tokens out of order", fixture.name);
        }
    }
}

#[test]
fn every_pair_has_open_before_close() {
    for (lang, fixture) in block_corpus::all() {
        let pairs = parse(fixture.source, lang);
        for p in &pairs {
            assert!(p.open.start < p.close.start, "{}: pair with open after close", fixture.name);
            for m in &p.middle {
                assert!(
                    m.start > p.open.start && m.start < p.close.start,
                    "{}: middle token outside its pair's span",
                    fixture.name
                );
            }
        }
    }
}

#[test]
fn pairs_are_sorted_by_close_position() {
    for (lang, fixture) in block_corpus::all() {
        let pairs = parse(fixture.source, lang);
        for w in pairs.windows(2) {
            assert!(w[0].close.start <= w[1].close.start, "{}: pairs not close-sorted", fixture.name);
        }
    }
}

#[test]
fn nest_level_equals_strict_containment_count() {
    for (lang, fixture) in block_corpus::all() {
        let pairs = parse(fixture.source, lang);
        for (i, p) in pairs.iter().enumerate() {
            let expected = pairs
                .iter()
                .enumerate()
                .filter(|&(j, q)| j != i && q.open.start < p.open.start && q.close.start >= p.close.start)
                .count();
            assert_eq!(p.nest, expected, "{}: nest mismatch for pair at {}", fixture.name, p.open.start);
        }
    }
}

#[test]
fn parse_is_deterministic() {
    for (lang, fixture) in block_corpus::all() {
        let a = parse(fixture.source, lang);
        let b = parse(fixture.source, lang);
        assert_eq!(a, b, "{}: parse is not deterministic", fixture.name);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn parse_never_panics_on_arbitrary_input(s in ".{0,400}") {
        for lang in all_languages() {
            let pairs = parse(&s, lang);
            for p in &pairs {
                prop_assert!(p.open.start < p.close.start);
                prop_assert!(p.open.start <= s.len());
                prop_assert!(p.close.end <= s.len());
            }
        }
    }

    #[test]
    fn tokenize_never_panics_and_stays_in_bounds(s in ".{0,400}") {
        for lang in all_languages() {
            let tokens = tokens_of(&s, lang);
            for t in &tokens {
                prop_assert!(t.start < t.end);
                prop_assert!(t.end <= s.len());
            }
        }
    }

    #[test]
    fn excluded_regions_never_exceed_source_bounds(s in ".{0,400}") {
        for lang in all_languages() {
            let regions = excluded_regions_of(&s, lang);
            for r in &regions {
                prop_assert!(r.start <= r.end);
                prop_assert!(r.end <= s.len());
            }
        }
    }
}
