//! setter-expand - run the `@setterFunction` macro over Swift source files
//!
//! The binary is a thin wrapper: [`command`] defines the arguments,
//! [`Options::from_matches`] reads them and [`run`] does the work without
//! touching the process's stdout, stderr or exit status.

use std::{
    fmt,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use setter_core::{
    expand_source, parse_source, render_diagnostics, Diagnostic, MacroRegistry, SourceFile,
    SourceGenConfig, ToSource,
};
use tracing::{debug, info};

/// Exit status when expansion reported diagnostics
pub const EXIT_DIAGNOSTICS: i32 = 1;
/// Exit status when the input could not be read or parsed
pub const EXIT_FAILURE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Source,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "source" => Ok(OutputFormat::Source),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("unknown output format '{other}'"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Source => "source",
            OutputFormat::Json => "json",
        })
    }
}

/// Command line options
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Input file; stdin when `None`
    pub input: Option<PathBuf>,
    pub format: OutputFormat,
    pub source_gen: SourceGenConfig,
    /// Only report diagnostics
    pub check: bool,
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            input: None,
            format: OutputFormat::default(),
            source_gen: SourceGenConfig::default(),
            check: false,
            debug: false,
        }
    }
}

impl Options {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let input = matches
            .get_one::<String>("file")
            .filter(|path| path.as_str() != "-")
            .map(PathBuf::from);
        let format = matches
            .get_one::<String>("format")
            .map(|f| f.parse::<OutputFormat>())
            .transpose()?
            .unwrap_or_default();
        let indent_width = matches
            .get_one::<usize>("indent")
            .copied()
            .unwrap_or(SourceGenConfig::default().indent_width);

        Ok(Self {
            input,
            format,
            source_gen: SourceGenConfig { indent_width },
            check: matches.get_flag("check"),
            debug: matches.get_flag("debug"),
        })
    }

    /// Name used in diagnostics
    pub fn display_name(&self) -> String {
        self.input
            .as_deref()
            .map(Path::display)
            .map(|path| path.to_string())
            .unwrap_or_else(|| "<stdin>".to_string())
    }
}

/// Argument definitions for the `setter-expand` binary
pub fn command() -> Command {
    Command::new("setter-expand")
        .version(setter_core::VERSION)
        .about("Expand @setterFunction attributes in Swift source")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Source file to expand; reads stdin when absent or '-'")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["source", "json"])
                .default_value("source"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .value_name("N")
                .help("Spaces per nesting level in printed source")
                .value_parser(clap::value_parser!(usize))
                .default_value("4"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Only report diagnostics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

/// What the process should print and how it should exit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file_name: &'a str,
    expanded: &'a str,
    file: &'a SourceFile,
    diagnostics: &'a [Diagnostic],
}

/// Read the input named by `options` (or `stdin`), expand it and describe
/// the result. Read and parse failures are returned as errors.
pub fn run(options: &Options, stdin: &mut dyn Read) -> Result<Outcome> {
    let name = options.display_name();
    let source = match &options.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut source = String::new();
            stdin
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            source
        }
    };
    debug!(file = %name, bytes = source.len(), "read input");

    let file = parse_source(&source).with_context(|| format!("failed to parse {name}"))?;
    let expansion = expand_source(&file, &MacroRegistry::standard());
    info!(
        file = %name,
        diagnostics = expansion.diagnostics.len(),
        "expanded"
    );

    let mut outcome = Outcome {
        stderr: render_diagnostics(&source, &name, &expansion.diagnostics),
        exit_code: if expansion.diagnostics.is_empty() {
            0
        } else {
            EXIT_DIAGNOSTICS
        },
        ..Outcome::default()
    };
    if options.check {
        return Ok(outcome);
    }

    let expanded = expansion.file.to_source_with(&options.source_gen);
    outcome.stdout = match options.format {
        OutputFormat::Source => expanded,
        OutputFormat::Json => {
            let report = JsonReport {
                file_name: &name,
                expanded: &expanded,
                file: &expansion.file,
                diagnostics: &expansion.diagnostics,
            };
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            json
        }
    };
    Ok(outcome)
}
