//! Command line front end: grep-like approximate matching of DNA/RNA sequence files.

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use seqscan::{
    Framing, LineScanner, MatchOptions, Matcher, MatcherBuilder, NonDnaPolicy, Reporting, Result,
};

const RESET: &str = "\x1b[0m";
const BOLD_RED: &str = "\x1b[1m\x1b[31m";
const BOLD_GREEN: &str = "\x1b[1m\x1b[32m";

/// How bytes outside the DNA/RNA alphabet are treated.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum NonDna {
    /// Stop scanning the line.
    #[default]
    Fail,
    /// Fold the byte to 'N'.
    Convert,
    /// Skip the byte.
    Ignore,
}

impl From<NonDna> for NonDnaPolicy {
    fn from(value: NonDna) -> Self {
        match value {
            NonDna::Fail => NonDnaPolicy::Fail,
            NonDna::Convert => NonDnaPolicy::Convert,
            NonDna::Ignore => NonDnaPolicy::Ignore,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "seqscan",
    version,
    about = "Approximate matching of DNA/RNA patterns in sequence files"
)]
struct Cli {
    /// The pattern: a sequence of A, C, G, T/U and N, with bracket groups like [AT]
    pattern: String,

    /// The input file; standard input is read when absent
    file: Option<PathBuf>,

    /// Maximum Levenshtein distance
    #[arg(short, long, default_value_t = 0)]
    distance: usize,

    /// Scan the whole line and keep only the best match
    #[arg(short, long)]
    best: bool,

    /// Report all matches of each line (implies --match-only)
    #[arg(short, long)]
    all: bool,

    /// Print only the lines without a match
    #[arg(short, long)]
    invert: bool,

    /// Treatment of bytes outside the DNA/RNA alphabet
    #[arg(short = 'x', long, value_enum, default_value = "fail")]
    non_dna: NonDna,

    /// Treat newlines as whitespace and scan across them
    #[arg(short = 'u', long)]
    stream: bool,

    /// Print only the count of matching lines
    #[arg(short, long)]
    count: bool,

    /// Print only the matched sequence
    #[arg(short, long)]
    match_only: bool,

    /// Do not print the matched line
    #[arg(short = 'n', long)]
    no_printline: bool,

    /// Print the line number of each match
    #[arg(short, long)]
    lines: bool,

    /// Print the position of each match
    #[arg(short, long)]
    positions: bool,

    /// Print the Levenshtein distance of each match
    #[arg(short = 'k', long)]
    print_dist: bool,

    /// Print matches in the compact format line:start-end:distance
    #[arg(short = 'f', long)]
    compact: bool,

    /// Print only the end of the line, starting after the match
    #[arg(short, long)]
    end: bool,

    /// Print only the beginning of the line, ending before the match
    #[arg(short = 'r', long)]
    prefix: bool,

    /// Print prefix, match and suffix separated by tabs
    #[arg(short = 's', long)]
    split: bool,

    /// DFA memory limit in MB, unbounded when absent
    #[arg(short = 'y', long)]
    memory: Option<usize>,

    /// Print scan statistics to stderr
    #[arg(short = 'z', long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("seqscan: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut matcher = MatcherBuilder::new()
        .memory_limit(cli.memory.map_or(0, |mb| mb * 1024 * 1024))
        .build(&cli.pattern, cli.distance)?;

    let reporting = if cli.best {
        Reporting::Best
    } else if cli.all {
        Reporting::All
    } else {
        Reporting::First
    };
    let options = MatchOptions::new()
        .with_reporting(reporting)
        .with_non_dna(cli.non_dna.into())
        .with_framing(if cli.stream {
            Framing::Stream
        } else {
            Framing::Lines
        });

    match &cli.file {
        Some(path) => drive(cli, &mut matcher, LineScanner::from_path(path)?, options),
        None => drive(cli, &mut matcher, LineScanner::from_stdin(), options),
    }
}

fn drive<R: BufRead>(
    cli: &Cli,
    matcher: &mut Matcher,
    mut scanner: LineScanner<R>,
    options: MatchOptions,
) -> Result<()> {
    if cli.count {
        println!("{}", scanner.count_lines(matcher, options)?);
    } else if cli.invert {
        while scanner.next_non_matching_line(matcher, options)? {
            if cli.lines {
                print!("{} ", scanner.line_number());
            }
            println!("{}", matcher.last_string());
        }
    } else {
        while scanner.next_matching_line(matcher, options)?.is_some() {
            print_line_matches(cli, matcher, scanner.line_number());
        }
    }

    if cli.verbose {
        let (forward, reverse) = matcher.state_counts();
        let (forward_nodes, reverse_nodes) = matcher.trie_node_counts();
        eprintln!(
            "states: {forward} forward, {reverse} reverse; trie nodes: {forward_nodes} forward, {reverse_nodes} reverse"
        );
        eprintln!(
            "memory: {:.2} MB",
            matcher.memory_footprint() as f64 / (1024.0 * 1024.0)
        );
    }
    Ok(())
}

fn print_line_matches(cli: &Cli, matcher: &Matcher, line_number: usize) {
    let text = matcher.last_string();
    let match_only = cli.match_only || cli.all;
    for hit in matcher.match_iter() {
        if cli.compact {
            println!(
                "{}:{}-{}:{}",
                line_number,
                hit.start(),
                hit.end().saturating_sub(1),
                hit.distance()
            );
            continue;
        }
        if cli.lines {
            print!("{line_number} ");
        }
        if cli.positions {
            print!("{}-{} ", hit.start(), hit.end().saturating_sub(1));
        }
        if cli.print_dist {
            print!("{} ", hit.distance());
        }
        if match_only {
            println!("{}", slice(text, hit.start(), hit.end()));
        } else if cli.prefix {
            println!("{}", slice(text, 0, hit.start()));
        } else if cli.end {
            println!("{}", slice(text, hit.end(), text.len()));
        } else if cli.split {
            println!(
                "{}\t{}\t{}",
                slice(text, 0, hit.start()),
                slice(text, hit.start(), hit.end()),
                slice(text, hit.end(), text.len())
            );
        } else if !cli.no_printline {
            if std::io::stdout().is_terminal() {
                let color = if hit.distance() == 0 {
                    BOLD_GREEN
                } else {
                    BOLD_RED
                };
                println!(
                    "{}{}{}{}{}",
                    slice(text, 0, hit.start()),
                    color,
                    slice(text, hit.start(), hit.end()),
                    RESET,
                    slice(text, hit.end(), text.len())
                );
            } else {
                println!("{text}");
            }
        } else {
            println!();
        }
    }
}

// Match offsets are byte offsets; slice lossily so that stray non-UTF-8 input cannot
// panic the printer.
fn slice(text: &str, start: usize, end: usize) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(&text.as_bytes()[start.min(text.len())..end.min(text.len())])
}
