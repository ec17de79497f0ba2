mod report;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

use beni::{Options, Registry, StallPolicy, tokenize_reader};
use report::Printer;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let level = if config.options.trace { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(&config) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    inputs: Vec<String>,
    language: Option<String>,
    options: Options,
    stats: bool,
    color: bool,
}

fn run(config: &CliConfig) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut printer = Printer::new(stdout.lock(), config.color);

    if config.inputs.is_empty() {
        // parse_args guarantees a language when reading stdin
        let language = config.language.as_deref().unwrap_or_default();
        let metrics = tokenize_reader(language, io::stdin().lock(), &config.options, &mut printer)?;
        if config.stats {
            printer.metrics(&metrics)?;
        }
        printer.flush()?;
        return Ok(());
    }

    for path in &config.inputs {
        let language = match &config.language {
            Some(language) => language.as_str(),
            None => Registry::global()
                .find_by_filename(path)
                .map(|def| def.descriptor.name)
                .ok_or_else(|| format!("{path}: no lexer matches this file name (use --lang)"))?,
        };

        printer.header(path)?;
        let file = File::open(path).map_err(|err| format!("{path}: {err}"))?;
        let metrics = tokenize_reader(language, BufReader::new(file), &config.options, &mut printer)?;
        if config.stats {
            printer.metrics(&metrics)?;
        }
    }
    printer.flush()?;
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut inputs = Vec::new();
    let mut language: Option<String> = None;
    let mut options = Options::default();
    let mut stats = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("beni {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--list" => {
                for lang in Registry::global().languages() {
                    println!("{:<12} {}  [{}]", lang.name, lang.description, lang.filenames.join(", "));
                }
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--lenient" => options.stall = StallPolicy::Lenient,
            "--trace" => options.trace = true,
            "--stats" => stats = true,
            "--lang" | "-l" => {
                let value = args.next().ok_or_else(|| "error: --lang expects a value".to_string())?;
                language = Some(value);
            }
            "--max-depth" => {
                let value = args.next().ok_or_else(|| "error: --max-depth expects a value".to_string())?;
                options.max_depth = parse_depth(&value)?;
            }
            "--" => {
                inputs.extend(args.by_ref());
                break;
            }
            _ if arg.starts_with("--lang=") => {
                language = Some(arg.trim_start_matches("--lang=").to_string());
            }
            _ if arg.starts_with("--max-depth=") => {
                options.max_depth = parse_depth(arg.trim_start_matches("--max-depth="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => inputs.push(arg),
        }
    }

    if let Some(name) = &language {
        if Registry::global().find(name).is_none() {
            return Err(format!("error: unknown language '{name}' (see --list)"));
        }
    }

    if inputs.is_empty() && language.is_none() {
        return Err(format!("error: reading stdin requires --lang\n\n{}", help_text()));
    }

    Ok(CliConfig { inputs, language, options, stats, color })
}

fn parse_depth(value: &str) -> Result<usize, String> {
    value.parse().map_err(|_| format!("error: invalid --max-depth '{value}' (expected a non-negative integer)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "beni {version}

Tokenize source files and print one classified token per line.

Usage:
  beni [OPTIONS] [--] <file...>
  beni [OPTIONS] --lang <name> < input

Options:
  -l, --lang <name>          Language name or alias. Default: picked from each
                             file name.
  --lenient                  Emit Error tokens for uncovered input instead of
                             stopping at the first one.
  --max-depth <n>            Maximum nesting of delegated lexer runs.
                             Default: {max_depth}
  --trace                    Log every rule selection (RUST_LOG overrides).
  --stats                    Print token/step counts after each input.
  --list                     List known languages.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Tokenizing or I/O error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        max_depth = Options::default().max_depth
    )
}
