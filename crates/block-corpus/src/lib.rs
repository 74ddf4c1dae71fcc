//! Literal fixture programs, one module per language, shared by the
//! property and integration tests across the workspace. A dev-dependency
//! only — nothing here is part of the published API of any other crate.

use block_lang::LanguageTag;

/// A named fixture: a short label plus the literal source text.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    pub name: &'static str,
    pub source: &'static str,
}

/// §8's six worked scenarios, in order, each paired with its language.
pub fn spec_scenarios() -> Vec<(LanguageTag, Fixture)> {
    vec![
        (LanguageTag::Lua, lua::REPEAT_WITH_NESTED_IF),
        (LanguageTag::Ruby, ruby::POSTFIX_IF),
        (LanguageTag::Bash, bash::HEREDOC_HIDES_KEYWORDS),
        (LanguageTag::Verilog, verilog::CONTROL_AND_BEGIN_MERGE),
        (LanguageTag::Ada, ada::COMPOUND_END),
        (LanguageTag::Julia, julia::COMPREHENSION_SUPPRESSION),
    ]
}

/// Every fixture across every language, for broad smoke/property coverage.
pub fn all() -> Vec<(LanguageTag, Fixture)> {
    let mut v = Vec::new();
    for f in ruby::ALL {
        v.push((LanguageTag::Ruby, *f));
    }
    for f in crystal::ALL {
        v.push((LanguageTag::Crystal, *f));
    }
    for f in elixir::ALL {
        v.push((LanguageTag::Elixir, *f));
    }
    for f in lua::ALL {
        v.push((LanguageTag::Lua, *f));
    }
    for f in julia::ALL {
        v.push((LanguageTag::Julia, *f));
    }
    for f in bash::ALL {
        v.push((LanguageTag::Bash, *f));
    }
    for f in pascal::ALL {
        v.push((LanguageTag::Pascal, *f));
    }
    for f in ada::ALL {
        v.push((LanguageTag::Ada, *f));
    }
    for f in vhdl::ALL {
        v.push((LanguageTag::Vhdl, *f));
    }
    for f in verilog::ALL {
        v.push((LanguageTag::Verilog, *f));
    }
    for f in applescript::ALL {
        v.push((LanguageTag::AppleScript, *f));
    }
    v
}

pub mod ruby {
    use super::Fixture;

    pub const POSTFIX_IF: Fixture = Fixture {
        name: "postfix_if",
        source: "return x if cond\nif y\n  z\nend",
    };
    pub const METHOD_CLASS_AND_RESCUE_MODIFIER: Fixture = Fixture {
        name: "method_class_and_rescue_modifier",
        source: "def risky\n  safe_call rescue nil\nend\n\nclass Foo\n  def bar\n    if x\n      1\n    elsif y\n      2\n    else\n      3\n    end\n  end\nend",
    };
    pub const WHILE_DO_LOOP_CONNECTOR: Fixture = Fixture {
        name: "while_do_loop_connector",
        source: "i = 0\nwhile i < 3 do\n  i += 1\nend",
    };
    pub const HASH_KEY_NOT_A_TOKEN: Fixture = Fixture {
        name: "hash_key_not_a_token",
        source: "h = { if: 1, while: 2 }\nif h[:if] == 1\n  puts h\nend",
    };

    pub const ALL: &[Fixture] =
        &[POSTFIX_IF, METHOD_CLASS_AND_RESCUE_MODIFIER, WHILE_DO_LOOP_CONNECTOR, HASH_KEY_NOT_A_TOKEN];
}

pub mod crystal {
    use super::Fixture;

    pub const HEREDOC_TAG_REQUIRES_DASH: Fixture = Fixture {
        name: "heredoc_tag_requires_dash",
        source: "text = <<-EOF\n  if end fi\n  EOF\nif x\n  y\nend",
    };
    pub const CASE_WHEN_ENSURE: Fixture = Fixture {
        name: "case_when_ensure",
        source: "begin\n  case x\n  when 1\n    a\n  when 2\n    b\n  else\n    c\n  end\nensure\n  cleanup\nend",
    };

    pub const ALL: &[Fixture] = &[HEREDOC_TAG_REQUIRES_DASH, CASE_WHEN_ENSURE];
}

pub mod elixir {
    use super::Fixture;

    pub const DO_END_WITH_RESCUE_AFTER: Fixture = Fixture {
        name: "do_end_with_rescue_after",
        source: "def run do\n  risky()\nrescue\n  e -> handle(e)\nafter\n  cleanup()\nend",
    };
    pub const ANONYMOUS_FN: Fixture = Fixture {
        name: "anonymous_fn",
        source: "add = fn a, b ->\n  a + b\nend",
    };

    pub const ALL: &[Fixture] = &[DO_END_WITH_RESCUE_AFTER, ANONYMOUS_FN];
}

pub mod lua {
    use super::Fixture;

    pub const REPEAT_WITH_NESTED_IF: Fixture = Fixture {
        name: "repeat_with_nested_if",
        source: "repeat\n  if x then a end\nuntil y",
    };
    pub const LONG_BRACKET_STRING_HIDES_KEYWORDS: Fixture = Fixture {
        name: "long_bracket_string_hides_keywords",
        source: "s = [==[\nif x then end\n]==]\nif y then\n  z\nend",
    };
    pub const WHILE_DO_IS_LOOP_CONNECTOR: Fixture = Fixture {
        name: "while_do_is_loop_connector",
        source: "while x do\n  if y then\n    z\n  end\nend",
    };

    pub const ALL: &[Fixture] =
        &[REPEAT_WITH_NESTED_IF, LONG_BRACKET_STRING_HIDES_KEYWORDS, WHILE_DO_IS_LOOP_CONNECTOR];
}

pub mod julia {
    use super::Fixture;

    pub const COMPREHENSION_SUPPRESSION: Fixture = Fixture {
        name: "comprehension_suppression",
        source: "x = [i for i in 1:10 if i>3]\nfor j in v\n  g(j)\nend",
    };
    pub const TRY_CATCH_FINALLY: Fixture = Fixture {
        name: "try_catch_finally",
        source: "function f(x)\n  try\n    risky(x)\n  catch e\n    handle(e)\n  finally\n    cleanup()\n  end\nend",
    };

    pub const ALL: &[Fixture] = &[COMPREHENSION_SUPPRESSION, TRY_CATCH_FINALLY];
}

pub mod bash {
    use super::Fixture;

    pub const HEREDOC_HIDES_KEYWORDS: Fixture = Fixture {
        name: "heredoc_hides_keywords",
        source: "cat <<EOF\nif then fi\nEOF\nif true; then :; fi",
    };
    pub const CASE_ESAC_WITH_PATTERN_PARENS: Fixture = Fixture {
        name: "case_esac_with_pattern_parens",
        source: "case $1 in\n  start)\n    echo starting\n    ;;\n  stop)\n    echo stopping\n    ;;\nesac",
    };
    pub const BRACE_GROUP_AND_SUBSHELL: Fixture = Fixture {
        name: "brace_group_and_subshell",
        source: "if [ -f x ]; then\n  { echo a; echo b; }\nfi",
    };

    pub const ALL: &[Fixture] = &[HEREDOC_HIDES_KEYWORDS, CASE_ESAC_WITH_PATTERN_PARENS, BRACE_GROUP_AND_SUBSHELL];
}

pub mod pascal {
    use super::Fixture;

    pub const RECORD_VARIANT_CASE_TAG: Fixture = Fixture {
        name: "record_variant_case_tag",
        source: "type\n  TShape = record\n    case kind: Integer of\n      0: (radius: Real);\n      1: (side: Real);\n  end;",
    };
    pub const CLASS_TYPE_DEFINITION_AND_FORWARD_DECL: Fixture = Fixture {
        name: "class_type_definition_and_forward_decl",
        source: "type\n  TBase = class;\n  TFoo = class(TBase)\n  public\n    procedure Run;\n  end;",
    };
    pub const REPEAT_UNTIL: Fixture = Fixture {
        name: "repeat_until",
        source: "repeat\n  i := i + 1;\nuntil i > 10;",
    };

    pub const ALL: &[Fixture] =
        &[RECORD_VARIANT_CASE_TAG, CLASS_TYPE_DEFINITION_AND_FORWARD_DECL, REPEAT_UNTIL];
}

pub mod ada {
    use super::Fixture;

    pub const COMPOUND_END: Fixture = Fixture {
        name: "compound_end",
        source: "procedure P is\nbegin\n  null;\nend P;",
    };
    pub const LOOP_FOR_AND_CASE: Fixture = Fixture {
        name: "loop_for_and_case",
        source: "for i in 1 .. 10 loop\n  case i is\n    when 1 =>\n      null;\n    when others =>\n      null;\n  end case;\nend loop;",
    };
    pub const DECLARE_BLOCK: Fixture = Fixture {
        name: "declare_block",
        source: "declare\n  X : Integer;\nbegin\n  X := 1;\nend;",
    };

    pub const ALL: &[Fixture] = &[COMPOUND_END, LOOP_FOR_AND_CASE, DECLARE_BLOCK];
}

pub mod vhdl {
    use super::Fixture;

    pub const PROCESS_AND_IF: Fixture = Fixture {
        name: "process_and_if",
        source: "process(clk)\nbegin\n  if rising_edge(clk) then\n    q <= d;\n  end if;\nend process;",
    };
    pub const GENERATE_WITH_FOR: Fixture = Fixture {
        name: "generate_with_for",
        source: "gen_block: for i in 0 to 7 generate\n  u: my_entity port map (a => b);\nend generate;",
    };
    pub const CONDITIONAL_SIGNAL_ASSIGNMENT_ELSE: Fixture = Fixture {
        name: "conditional_signal_assignment_else",
        source: "y <= a when sel = '0' else b;",
    };

    pub const ALL: &[Fixture] = &[PROCESS_AND_IF, GENERATE_WITH_FOR, CONDITIONAL_SIGNAL_ASSIGNMENT_ELSE];
}

pub mod verilog {
    use super::Fixture;

    pub const CONTROL_AND_BEGIN_MERGE: Fixture = Fixture {
        name: "control_and_begin_merge",
        source: "always @(posedge clk) begin\n  if (x) begin a; end\nend",
    };
    pub const MODULE_WITH_FORK_JOIN: Fixture = Fixture {
        name: "module_with_fork_join",
        source: "module m;\n  initial begin\n    fork\n      a();\n      b();\n    join\n  end\nendmodule",
    };
    pub const PREPROCESSOR_IFDEF: Fixture = Fixture {
        name: "preprocessor_ifdef",
        source: "`ifdef SIM\n  initial $display(\"sim\");\n`else\n  initial $display(\"synth\");\n`endif",
    };

    pub const ALL: &[Fixture] = &[CONTROL_AND_BEGIN_MERGE, MODULE_WITH_FORK_JOIN, PREPROCESSOR_IFDEF];
}

pub mod applescript {
    use super::Fixture;

    pub const TELL_ONE_LINER_VS_BLOCK: Fixture = Fixture {
        name: "tell_one_liner_vs_block",
        source: "tell application \"Finder\" to activate\ntell application \"Finder\"\n  activate\nend tell",
    };
    pub const IF_THEN_ONE_LINER_VS_BLOCK: Fixture = Fixture {
        name: "if_then_one_liner_vs_block",
        source: "if x > 0 then return x\nif x > 0 then\n  return x\nend if",
    };

    pub const ALL: &[Fixture] = &[TELL_ONE_LINER_VS_BLOCK, IF_THEN_ONE_LINER_VS_BLOCK];
}
