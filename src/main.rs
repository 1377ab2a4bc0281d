use clap::Parser;

use symbolic_regex::{ConcreteStr, Evaluate, Flags, Match, Outcome, Regex};

/// symre - match a pattern the way the symbolic engine does, on a concrete string
#[derive(Debug, Parser)]
#[command(name = "symre", version, about, long_about = None)]
struct Cli {
    /// Pattern, in Python `re` syntax.
    pattern: String,

    /// String to match against.
    input: String,

    /// Offset to start matching at.
    #[arg(long, default_value_t = 0)]
    pos: usize,

    /// Offset to stop matching at.
    #[arg(long)]
    endpos: Option<usize>,

    /// Require the match to cover everything up to the end.
    #[arg(long)]
    full: bool,

    /// ASCII-only classes and case folding.
    #[arg(short = 'a', long)]
    ascii: bool,

    /// Ignore case.
    #[arg(short = 'i', long)]
    ignorecase: bool,

    /// Let `.` match a newline.
    #[arg(short = 's', long)]
    dotall: bool,

    /// `^` and `$` match at line boundaries.
    #[arg(short = 'm', long)]
    multiline: bool,

    /// Ignore whitespace and `#` comments in the pattern.
    #[arg(short = 'x', long)]
    verbose_pattern: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn flags(&self) -> Flags {
        let mut flags = Flags::empty();
        flags.set(Flags::ASCII, self.ascii);
        flags.set(Flags::IGNORECASE, self.ignorecase);
        flags.set(Flags::DOTALL, self.dotall);
        flags.set(Flags::MULTILINE, self.multiline);
        flags.set(Flags::VERBOSE, self.verbose_pattern);
        flags
    }
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables debug; RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_module("symbolic_regex", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();

    let regex = match Regex::new(&cli.pattern, cli.flags()) {
        Ok(regex) => regex,
        Err(e) => {
            println!("ERROR:{}", e);
            return;
        }
    };

    let input = ConcreteStr::new(&cli.input);
    let mut oracle = Evaluate::new();
    let outcome = if cli.full {
        regex.symbolic_fullmatch(&input, &mut oracle, cli.pos, cli.endpos)
    } else {
        regex.symbolic_match(&input, &mut oracle, cli.pos, cli.endpos)
    };
    log::debug!("{} decisions", oracle.forks());

    match outcome {
        Ok(Outcome::Decided(Some(found))) => print_match(&found),
        Ok(Outcome::Decided(None)) => println!("NO_MATCH"),
        Ok(Outcome::Unsupported(construct)) => println!("UNSUPPORTED:{}", construct),
        Err(e) => println!("ERROR:{}", e),
    }
}

fn print_match(found: &Match<'_, ConcreteStr>) {
    let entries = found.entries();
    if let Some(text) = &entries[0].text {
        println!("MATCH:{}", text);
    }
    for (i, group) in entries.iter().enumerate().skip(1) {
        match &group.text {
            Some(text) => println!("GROUP {}:{}", i, text),
            None => println!("GROUP {}:", i),
        }
    }
}
