//! Manual-inspection tool: dumps the block pairs found in a source file.
//!
//! Not a supported CLI surface — a dev-only aid mirroring
//! `perl-lexer/examples/debug_lexer.rs`, kept out of `[[bin]]` on purpose.
//!
//! Usage: `cargo run --example dump_pairs -- <path> <language>`

use std::env;
use std::fs;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use block_match::LanguageTag;
use tracing::debug;

fn main() -> ExitCode {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let (Some(path), Some(lang_name)) = (args.next(), args.next()) else {
        eprintln!("usage: dump_pairs <path> <language>");
        return ExitCode::FAILURE;
    };

    let language = match LanguageTag::from_str(&lang_name) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let source = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("reading {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let t0 = Instant::now();
    let excluded = block_match::excluded_regions_of(&source, language);
    debug!(regions = excluded.len(), elapsed = ?t0.elapsed(), "excluded regions found");

    let t1 = Instant::now();
    let tokens = block_match::tokens_of(&source, language);
    debug!(tokens = tokens.len(), elapsed = ?t1.elapsed(), "tokenized");

    let t2 = Instant::now();
    let pairs = block_match::parse(&source, language);
    debug!(pairs = pairs.len(), elapsed = ?t2.elapsed(), "matched");
    debug!(total_elapsed = ?t0.elapsed(), "pipeline complete");

    for pair in &pairs {
        println!(
            "{:width$}{} ({}:{}) .. {} ({}:{})  [nest {}]",
            "",
            pair.open.text,
            pair.open.line,
            pair.open.column,
            pair.close.text,
            pair.close.line,
            pair.close.column,
            pair.nest,
            width = pair.nest * 2,
        );
        for middle in &pair.middle {
            println!("{:width$}  {} ({}:{})", "", middle.text, middle.line, middle.column, width = pair.nest * 2);
        }
    }

    ExitCode::SUCCESS
}
