//! shnake: parse bash-like command lines into pipelines.
//!
//! Reads FILE (or stdin) and prints every parsed pipeline as one JSON line:
//! the alternating list `[command, connector, command, ...]`.
//!
//! Handles:
//!   - Quoting and escapes: '...', "...", \x
//!   - Line continuation: trailing \, open quotes, dangling && / ||
//!   - Connectors: &&, ||, |, ;
//!   - Redirection: <, >, >>, <>, &>, >&, <<, <<-, <<<, N>&M
//!   - Comments and blank lines
//!
//! When stdin is a terminal the configured prompts are shown and syntax
//! errors are reported without leaving the loop.

use std::io::{self, BufRead, BufReader, IsTerminal};
use std::process;

use shnake::config::Config;
use shnake::error::Error;
use shnake::parse::Pipeline;
use shnake::session::{BufferSource, Interpreter, LineSource, Step};

const USAGE: &str = "usage: shnake [--no-redirectors] [--dump-config] [FILE]";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    no_redirectors: bool,
    dump_config: bool,
    help: bool,
    file: Option<String>,
}

fn parse_args<I>(args: I) -> Result<Args, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    for arg in args {
        match arg.as_str() {
            "--no-redirectors" => parsed.no_redirectors = true,
            "--dump-config" => parsed.dump_config = true,
            "-h" | "--help" => parsed.help = true,
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("unknown option: {flag}"));
            }
            path => {
                if parsed.file.is_some() {
                    return Err(format!("unexpected argument: {path}"));
                }
                parsed.file = Some(path.to_string());
            }
        }
    }
    Ok(parsed)
}

fn emit(pipeline: &Pipeline) {
    match serde_json::to_string(pipeline) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("shnake: cannot encode pipeline: {e}"),
    }
}

/// Parse a whole script; stop at the first error.
fn batch<S: LineSource>(interpreter: &Interpreter, mut source: S) -> i32 {
    match interpreter.run(&mut source, |pipeline| emit(&pipeline)) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("shnake: {e}");
            1
        }
    }
}

/// Prompt for input until end of file; syntax errors do not end the session.
fn interactive(interpreter: &Interpreter, config: &Config) -> i32 {
    let stdin = io::stdin();
    let mut source = config.prompt_source(stdin.lock(), io::stderr());
    loop {
        match interpreter.read_pipeline(&mut source) {
            Ok(Step::Pipeline(pipeline)) => emit(&pipeline),
            Ok(Step::Blank) => {}
            Ok(Step::Exhausted) => return 0,
            Err(Error::Syntax(e)) => eprintln!("shnake: {e}"),
            Err(e) => {
                eprintln!("shnake: {e}");
                return 1;
            }
        }
    }
}

fn open(path: &str) -> io::Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = std::fs::File::open(shnake::config::expand_path(path))?;
    Ok(Box::new(BufReader::new(file)))
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("shnake: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return;
    }

    let mut config = Config::load();
    if args.no_redirectors {
        config.parser.redirectors = false;
    }

    if args.dump_config {
        match toml::to_string_pretty(&config) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("shnake: cannot encode config: {e}");
                process::exit(1);
            }
        }
        return;
    }

    shnake::logging::init(&config.log);
    let interpreter = config.interpreter();

    let code = match args.file.as_deref() {
        Some(path) => match open(path) {
            Ok(reader) => batch(&interpreter, BufferSource::new(reader)),
            Err(e) => {
                eprintln!("shnake: {path}: {e}");
                1
            }
        },
        None if io::stdin().is_terminal() => interactive(&interpreter, &config),
        None => batch(&interpreter, BufferSource::new(io::stdin().lock())),
    };
    process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments() {
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn flags_and_file() {
        let a = args(&["--no-redirectors", "script.sh"]).unwrap();
        assert!(a.no_redirectors);
        assert!(!a.dump_config);
        assert_eq!(a.file.as_deref(), Some("script.sh"));
    }

    #[test]
    fn dash_is_a_file() {
        assert_eq!(args(&["-"]).unwrap().file.as_deref(), Some("-"));
    }

    #[test]
    fn unknown_flag() {
        assert!(args(&["--verbose"]).is_err());
    }

    #[test]
    fn two_files() {
        assert!(args(&["a", "b"]).is_err());
    }

    #[test]
    fn batch_reports_errors() {
        let interpreter = Interpreter::default();
        assert_eq!(batch(&interpreter, BufferSource::from_text("ls\n")), 0);
        assert_eq!(batch(&interpreter, BufferSource::from_text("ls &\n")), 1);
        assert_eq!(batch(&interpreter, BufferSource::from_text("echo 'open\n")), 1);
    }
}
