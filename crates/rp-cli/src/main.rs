//! `rp`: headless tool for RoomPlan layout documents.
//!
//! ```text
//! rp [--config <file>] summary <layout.json>
//! rp [--config <file>] check   <layout.json>
//! rp [--config <file>] prune   <layout.json> [-o <out.json>]
//! rp [--config <file>] svg     <layout.json> [-o <out.svg>]
//! rp [--config <file>] graph   <layout.json>
//! ```
//!
//! Logging goes to stderr via `RUST_LOG`.

mod commands;

use commands::Command;
use rp_core::EditorConfig;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: rp [--config <file>] <summary|check|prune|svg|graph> <layout.json> [-o <out>]";

#[derive(Debug, PartialEq)]
struct Args {
    command: Command,
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut command = None;
    let mut input = None;
    let mut output = None;
    let mut config = None;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = it.next().ok_or("missing path after -o")?;
                output = Some(PathBuf::from(path));
            }
            "--config" => {
                let path = it.next().ok_or("missing path after --config")?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => return Err(format!("unknown flag '{flag}'")),
            word if command.is_none() => {
                command = Some(Command::parse(word).ok_or_else(|| format!("unknown command '{word}'"))?);
            }
            word if input.is_none() => input = Some(PathBuf::from(word)),
            word => return Err(format!("unexpected argument '{word}'")),
        }
    }

    let command = command.ok_or("missing command")?;
    let input = input.ok_or("missing layout file")?;
    if output.is_some() && !command.writes_output() {
        return Err(format!("'{}' does not take -o", command.name()));
    }
    Ok(Args {
        command,
        input,
        output,
        config,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<EditorConfig, String> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    EditorConfig::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn run(args: &Args) -> Result<ExitCode, String> {
    let config = load_config(args.config.as_ref())?;
    let text = std::fs::read_to_string(&args.input).map_err(|e| format!("{}: {e}", args.input.display()))?;
    log::debug!("read {} bytes from {}", text.len(), args.input.display());

    let report = commands::execute(args.command, &text, &config).map_err(|e| format!("{}: {e}", args.input.display()))?;

    if let Some(notice) = &report.notice {
        eprintln!("{notice}");
    }
    match &args.output {
        Some(path) => std::fs::write(path, &report.stdout).map_err(|e| format!("{}: {e}", path.display()))?,
        None => print!("{}", report.stdout),
    }

    Ok(if report.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    env_logger::init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.is_empty() || raw.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!("{USAGE}");
        return if raw.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("rp: {e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("rp: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn argv(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn parses_command_file_and_output() {
        let args = parse_args(&argv("--config cfg.json svg plan.json -o plan.svg")).unwrap();
        assert_eq!(
            args,
            Args {
                command: Command::Svg,
                input: PathBuf::from("plan.json"),
                output: Some(PathBuf::from("plan.svg")),
                config: Some(PathBuf::from("cfg.json")),
            }
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&argv("explode plan.json")).is_err());
        assert!(parse_args(&argv("summary")).is_err());
        assert!(parse_args(&argv("summary a.json b.json")).is_err());
        assert!(parse_args(&argv("check plan.json -o out.json")).is_err());
        assert!(parse_args(&argv("prune plan.json -o")).is_err());
        assert!(parse_args(&argv("prune --verbose plan.json")).is_err());
    }
}
