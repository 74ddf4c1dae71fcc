//! Per-language excluded-region scanners.
//!
//! Each language module exposes a `find_excluded(source) -> Vec<ExcludedRegion>`
//! function; [`find_excluded`] dispatches to the right one by [`LanguageTag`]
//! and sorts the result, which every downstream consumer relies on to do
//! binary-search membership tests.

mod ada;
mod applescript;
mod bash;
mod common;
mod elixir;
mod heredoc;
mod julia;
mod lua;
mod pascal;
mod ruby_family;
mod tick_family;
mod verilog;
mod vhdl;

use block_lang::LanguageTag;
use block_token::ExcludedRegion;

/// Finds every excluded region (comments, string/char literals, heredoc
/// bodies, interpolations) in `source` for `lang`, sorted by start offset.
pub fn find_excluded(source: &str, lang: LanguageTag) -> Vec<ExcludedRegion> {
    let mut regions = match lang {
        LanguageTag::Ruby => ruby_family::find_excluded(source, ruby_family::Flavor::Ruby),
        LanguageTag::Crystal => ruby_family::find_excluded(source, ruby_family::Flavor::Crystal),
        LanguageTag::Elixir => elixir::find_excluded(source),
        LanguageTag::Lua => lua::find_excluded(source),
        LanguageTag::Julia => julia::find_excluded(source),
        LanguageTag::Bash => bash::find_excluded(source),
        LanguageTag::Pascal => pascal::find_excluded(source),
        LanguageTag::Ada => ada::find_excluded(source),
        LanguageTag::Vhdl => vhdl::find_excluded(source),
        LanguageTag::Verilog => verilog::find_excluded(source),
        LanguageTag::AppleScript => applescript::find_excluded(source),
    };
    regions.sort_by_key(|r| r.start);
    regions
}

/// Binary-search membership test against a sorted, non-overlapping region
/// list, as produced by [`find_excluded`].
pub fn contains(regions: &[ExcludedRegion], offset: usize) -> bool {
    regions
        .binary_search_by(|r| {
            if offset < r.start {
                std::cmp::Ordering::Greater
            } else if offset >= r.end {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}
