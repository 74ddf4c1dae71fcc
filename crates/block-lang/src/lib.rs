//! Per-language keyword descriptors.
//!
//! This crate holds no behavior, only data: which language a scan targets
//! ([`LanguageTag`]), and which literal keywords classify as block openers,
//! closers, or middles for that language ([`KeywordSet`] via [`keywords`]).
//! The excluded-region rules, validity predicates, and close-resolution
//! policy that interpret this data live downstream in `block-regions`,
//! `block-lexer`, and `block-matcher` respectively, each dispatching on
//! [`LanguageTag`] the way the design notes describe: "a tagged variant per
//! language plus a table of function pointers" — realized here as a `match`
//! over the tag rather than a literal stored closure, since the functions
//! that would populate such a table live in crates downstream of this one
//! and storing them here would create a dependency cycle.

/// The languages this scanner family understands.
///
/// This is the set named consistently across the predicate table, the
/// close-resolution policy table, and the worked scenarios: a wider
/// "exact set per repo" list exists in some specs' external-interface
/// section but carries no rules of its own and is not implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageTag {
    Ada,
    AppleScript,
    Bash,
    Crystal,
    Elixir,
    Julia,
    Lua,
    Pascal,
    Ruby,
    Verilog,
    Vhdl,
}

impl LanguageTag {
    pub const ALL: [LanguageTag; 11] = [
        LanguageTag::Ada,
        LanguageTag::AppleScript,
        LanguageTag::Bash,
        LanguageTag::Crystal,
        LanguageTag::Elixir,
        LanguageTag::Julia,
        LanguageTag::Lua,
        LanguageTag::Pascal,
        LanguageTag::Ruby,
        LanguageTag::Verilog,
        LanguageTag::Vhdl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LanguageTag::Ada => "ada",
            LanguageTag::AppleScript => "applescript",
            LanguageTag::Bash => "bash",
            LanguageTag::Crystal => "crystal",
            LanguageTag::Elixir => "elixir",
            LanguageTag::Julia => "julia",
            LanguageTag::Lua => "lua",
            LanguageTag::Pascal => "pascal",
            LanguageTag::Ruby => "ruby",
            LanguageTag::Verilog => "verilog",
            LanguageTag::Vhdl => "vhdl",
        }
    }

    /// Ada, VHDL, and Pascal/Delphi match keywords case-insensitively and
    /// normalize the stored token text to lowercase; the rest are case-sensitive.
    pub fn case_insensitive(self) -> bool {
        matches!(self, LanguageTag::Ada | LanguageTag::Vhdl | LanguageTag::Pascal)
    }
}

impl std::str::FromStr for LanguageTag {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageTag::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown language tag: {0}")]
pub struct UnknownLanguage(String);

/// Static per-language keyword descriptor.
///
/// `open`, `close`, and `middle` are the literal keyword spellings the
/// tokenizer's keyword-boundary matcher compiles into a longest-match-first
/// table; membership here only says "this text, if it survives the
/// language's validity predicates, classifies this way" — it says nothing
/// about the predicates themselves.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    pub open: &'static [&'static str],
    pub close: &'static [&'static str],
    pub middle: &'static [&'static str],
}

impl KeywordSet {
    /// All keyword spellings across the three sets, for building the
    /// tokenizer's keyword-boundary matcher. Not deduplicated — a keyword may
    /// legitimately belong to more than one set in the same language (e.g.
    /// Verilog's `end` is always a close, but `else` is a middle with its own
    /// compound-close cousins).
    pub fn all(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.open.iter().chain(self.close.iter()).chain(self.middle.iter()).copied()
    }
}

const ADA: KeywordSet = KeywordSet {
    open: &[
        "begin", "declare", "procedure", "function", "task", "protected", "package", "entry",
        "accept", "if", "case", "loop", "for", "while",
    ],
    close: &["end"],
    middle: &["else", "elsif", "when", "exception"],
};

const APPLESCRIPT: KeywordSet = KeywordSet {
    open: &["if", "tell", "repeat", "try", "using terms from", "on", "to"],
    close: &["end"],
    middle: &["else"],
};

const BASH: KeywordSet = KeywordSet {
    open: &["if", "case", "for", "while", "until", "select", "{"],
    close: &["fi", "esac", "done", "}"],
    middle: &["else", "elif"],
};

const CRYSTAL: KeywordSet = KeywordSet {
    open: &["if", "unless", "while", "until", "def", "class", "module", "struct", "do", "begin", "case"],
    close: &["end"],
    middle: &["else", "elsif", "when", "rescue", "ensure"],
};

const ELIXIR: KeywordSet = KeywordSet {
    open: &["do", "fn"],
    close: &["end"],
    middle: &["else", "rescue", "catch", "after"],
};

const JULIA: KeywordSet = KeywordSet {
    open: &[
        "if", "while", "for", "function", "module", "baremodule", "struct", "try", "let",
        "quote", "begin", "do", "abstract type", "primitive type",
    ],
    close: &["end"],
    middle: &["else", "elseif", "catch", "finally"],
};

const LUA: KeywordSet = KeywordSet {
    open: &["if", "while", "for", "function", "do", "repeat"],
    close: &["end", "until"],
    middle: &["else", "elseif"],
};

const PASCAL: KeywordSet = KeywordSet {
    open: &["begin", "case", "record", "try", "class", "object", "interface", "repeat"],
    close: &["end", "until"],
    middle: &["else", "except", "finally"],
};

const RUBY: KeywordSet = KeywordSet {
    open: &["if", "unless", "while", "until", "for", "def", "class", "module", "do", "begin", "case"],
    close: &["end"],
    middle: &["else", "elsif", "when", "rescue", "ensure"],
};

const VERILOG: KeywordSet = KeywordSet {
    open: &[
        "always", "always_comb", "always_ff", "always_latch", "initial", "final", "if", "for",
        "while", "repeat", "forever", "case", "casex", "casez", "module", "function", "task",
        "class", "fork", "generate", "specify", "begin", "`ifdef", "`ifndef",
    ],
    close: &[
        "end", "endmodule", "endfunction", "endtask", "endclass", "endcase", "endgenerate",
        "endspecify", "join", "join_any", "join_none", "`endif",
    ],
    middle: &["else", "default", "`elsif", "`else"],
};

const VHDL: KeywordSet = KeywordSet {
    open: &["entity", "architecture", "process", "if", "case", "loop", "for", "while", "function", "procedure", "package", "generate"],
    close: &["end"],
    middle: &["else", "elsif", "when"],
};

/// Returns the static keyword descriptor for `tag`.
pub fn keywords(tag: LanguageTag) -> &'static KeywordSet {
    match tag {
        LanguageTag::Ada => &ADA,
        LanguageTag::AppleScript => &APPLESCRIPT,
        LanguageTag::Bash => &BASH,
        LanguageTag::Crystal => &CRYSTAL,
        LanguageTag::Elixir => &ELIXIR,
        LanguageTag::Julia => &JULIA,
        LanguageTag::Lua => &LUA,
        LanguageTag::Pascal => &PASCAL,
        LanguageTag::Ruby => &RUBY,
        LanguageTag::Verilog => &VERILOG,
        LanguageTag::Vhdl => &VHDL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_from_str() {
        for tag in LanguageTag::ALL {
            let parsed: LanguageTag = tag.name().parse().unwrap();
            assert_eq!(parsed.name(), tag.name());
        }
    }

    #[test]
    fn unknown_language_is_an_error() {
        assert!("cobol".parse::<LanguageTag>().is_err());
    }

    #[test]
    fn case_insensitive_languages_match_spec() {
        assert!(LanguageTag::Ada.case_insensitive());
        assert!(LanguageTag::Vhdl.case_insensitive());
        assert!(LanguageTag::Pascal.case_insensitive());
        assert!(!LanguageTag::Ruby.case_insensitive());
        assert!(!LanguageTag::Bash.case_insensitive());
        assert!(!LanguageTag::Verilog.case_insensitive());
    }

    #[test]
    fn every_language_has_at_least_one_open_and_close() {
        for tag in LanguageTag::ALL {
            let k = keywords(tag);
            assert!(!k.open.is_empty(), "{tag} has no openers");
            assert!(!k.close.is_empty(), "{tag} has no closers");
        }
    }
}
