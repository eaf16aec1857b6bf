mod debug_report;

use chemsect::{Document, Mode};
use std::io::{self, IsTerminal, Read};
use std::str::FromStr;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let document = match &config.input {
        Input::File(path) => match Document::open(path, config.mode) {
            Ok(document) => document,
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        },
        Input::Stdin(text) => Document::from_text(text.clone(), config.mode),
    };

    debug_report::print_run(&document, config.show_metrics, config.color);
}

enum Input {
    File(String),
    Stdin(String),
}

struct CliConfig {
    input: Input,
    mode: Mode,
    color: bool,
    show_metrics: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut file: Option<String> = None;
    let mut mode = Mode::Orca;
    let mut color = io::stdout().is_terminal();
    let mut show_metrics = false;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("chemsect {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--metrics" => show_metrics = true,
            "--mode" | "-m" => {
                let value = args.next().ok_or_else(|| "error: --mode expects a value".to_string())?;
                mode = parse_mode(&value)?;
            }
            _ if arg.starts_with("--mode=") => {
                mode = parse_mode(arg.trim_start_matches("--mode="))?;
            }
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                if file.is_some() {
                    return Err("error: input file provided multiple times".to_string());
                }
                file = Some(arg);
            }
        }
    }

    let input = match file {
        Some(path) if path != "-" => Input::File(path),
        _ => Input::Stdin(read_stdin_input()?),
    };

    if let Input::Stdin(text) = &input {
        if text.is_empty() {
            return Err(format!("error: no input provided\n\n{}", help_text()));
        }
    }

    Ok(CliConfig { input, mode, color, show_metrics })
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    Mode::from_str(value).map_err(|err| format!("error: {err}"))
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "chemsect {version}

Segmentation engine CLI for computational-chemistry output files.

Usage:
  chemsect [OPTIONS] <file>
  chemsect [OPTIONS] -          Read the output text from stdin.

Options:
  -m, --mode <mode>          Program mode: ORCA, GPAW or VASP. Default: ORCA.
  --metrics                  Print per-pattern pass metrics after the element table.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  File or configuration error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
