// alvara CLI - CNAE risk triage, headless
// Extract activity codes from documents, reconcile them against a fixed
// reference table, classify risk, and export the result.

mod base;
mod check;
mod exit_codes;
mod extract;
mod table;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use alvara_engine::SessionError;
use alvara_recon::{Profile, ReconError};

use exit_codes::{
    EXIT_ERROR, EXIT_EXTRACT_ERROR, EXIT_INPUT_TYPE_ERROR, EXIT_IO_ERROR, EXIT_SCHEMA_ERROR,
    EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "alvara")]
#[command(about = "CNAE risk triage: extract, reconcile, classify (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: extract codes, reconcile, classify
    #[command(after_help = "\
Exit code 0 covers the zero-match outcome; it is reported as a note, not
an error.

Examples:
  alvara check --base base.xlsx --pdf alvara.pdf
  alvara check --base base.csv --text '47.21-1-02 e 56.11-2-01'
  cat codigos.txt | alvara check --base base.xlsx --text-file -
  alvara check --base base.xlsx --pdf doc.pdf --filter GRAU_RISCO=alto
  alvara check --base base.xlsx --pdf doc.pdf --sort CNAE:desc -o resultado.xlsx
  alvara check --base base.xlsx --pdf doc.pdf --json | jq .summary")]
    Check(CheckArgs),

    /// Extract codes only (no reconciliation)
    #[command(after_help = "\
Examples:
  alvara extract --pdf alvara.pdf
  alvara extract --text 'CNAE 47.21-1-02' --profile sanitario --json")]
    Extract(ExtractArgs),

    /// Reference-table operations
    Base {
        #[command(subcommand)]
        command: BaseCommands,
    },
}

#[derive(Args)]
struct CheckArgs {
    /// Reference table (xlsx, xls, ods, or csv)
    #[arg(long, short = 'b')]
    base: PathBuf,

    /// PDF document to scan
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Raw text to scan
    #[arg(long)]
    text: Option<String>,

    /// File with raw text to scan (- for stdin)
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Profile: pmf, sanitario, or a path to a profile TOML
    #[arg(long, default_value = "pmf")]
    profile: String,

    /// Column filter. Repeatable; filters AND together.
    #[arg(long, value_name = "COL=SUBSTR")]
    filter: Vec<String>,

    /// Sort column; repeat (or append :desc) to flip direction
    #[arg(long, value_name = "COL[:asc|desc]")]
    sort: Vec<String>,

    /// Output JSON to stdout instead of a table
    #[arg(long)]
    json: bool,

    /// Export the reconciled rows to an XLSX file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Suppress stderr status lines
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Args)]
struct ExtractArgs {
    /// PDF document to scan
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Raw text to scan
    #[arg(long)]
    text: Option<String>,

    /// File with raw text to scan (- for stdin)
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Profile: pmf, sanitario, or a path to a profile TOML
    #[arg(long, default_value = "pmf")]
    profile: String,

    /// Output JSON to stdout
    #[arg(long)]
    json: bool,

    /// Suppress stderr status lines
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Subcommand)]
enum BaseCommands {
    /// Load and schema-validate a reference file
    #[command(after_help = "\
Examples:
  alvara base validate base.xlsx
  alvara base validate base.csv --profile sanitario")]
    Validate {
        /// Reference table (xlsx, xls, ods, or csv)
        base: PathBuf,

        /// Profile: pmf, sanitario, or a path to a profile TOML
        #[arg(long, default_value = "pmf")]
        profile: String,
    },
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub(crate) struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO_ERROR, message: msg.into(), hint: None }
    }

    pub fn extract(msg: impl Into<String>) -> Self {
        Self { code: EXIT_EXTRACT_ERROR, message: msg.into(), hint: None }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self { code: EXIT_SCHEMA_ERROR, message: msg.into(), hint: None }
    }

    pub fn input_type(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT_TYPE_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Map a session failure onto the exit-code registry.
    pub fn from_session(err: SessionError) -> Self {
        match err {
            SessionError::ReferenceNotLoaded => Self::schema(err.to_string()),
            SessionError::NoInput => Self::args(err.to_string()),
            SessionError::Busy => Self {
                code: EXIT_ERROR,
                message: err.to_string(),
                hint: None,
            },
            SessionError::InvalidInputFile { .. } => Self::input_type(err.to_string()),
            SessionError::DocumentRead(msg) => Self::extract(msg),
            SessionError::Recon(recon) => match recon {
                ReconError::MissingColumn { .. }
                | ReconError::EmptyReference
                | ReconError::RowWidth { .. } => Self::schema(recon.to_string()),
                ReconError::ProfileParse(_) | ReconError::ProfileValidation(_) => {
                    Self::args(recon.to_string())
                }
                ReconError::Io(msg) => Self::io(msg),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Shared argument resolution
// ---------------------------------------------------------------------------

pub(crate) enum RawInput {
    Pdf(PathBuf),
    Text(String),
}

/// Exactly one of --pdf / --text / --text-file must be active.
pub(crate) fn resolve_input(
    pdf: Option<PathBuf>,
    text: Option<String>,
    text_file: Option<PathBuf>,
) -> Result<RawInput, CliError> {
    let provided =
        usize::from(pdf.is_some()) + usize::from(text.is_some()) + usize::from(text_file.is_some());
    if provided == 0 {
        return Err(
            CliError::args("no input provided")
                .with_hint("pass --pdf <file>, --text <string>, or --text-file <file|->"),
        );
    }
    if provided > 1 {
        return Err(CliError::args(
            "conflicting inputs: use exactly one of --pdf, --text, --text-file",
        ));
    }

    if let Some(path) = pdf {
        return Ok(RawInput::Pdf(path));
    }
    if let Some(text) = text {
        return Ok(RawInput::Text(text));
    }

    match text_file {
        Some(path) if path.to_str() == Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| CliError::io(format!("cannot read stdin: {e}")))?;
            Ok(RawInput::Text(buffer))
        }
        Some(path) => {
            let content = alvara_io::reference::read_file_as_utf8(&path)
                .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
            Ok(RawInput::Text(content))
        }
        None => Err(CliError::args("no input provided")),
    }
}

/// A profile name is either a built-in or a TOML file path.
pub(crate) fn resolve_profile(name: &str) -> Result<Profile, CliError> {
    if let Some(profile) = Profile::builtin(name) {
        return Ok(profile);
    }

    let path = std::path::Path::new(name);
    if path.extension().and_then(|e| e.to_str()) == Some("toml") {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::io(format!("cannot read profile {}: {e}", path.display())))?;
        return Profile::from_toml(&content).map_err(|e| CliError::args(e.to_string()));
    }

    Err(CliError::args(format!("unknown profile: {name}"))
        .with_hint("use pmf, sanitario, or a path to a .toml profile"))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check(args) => check::cmd_check(args),
        Commands::Extract(args) => extract::cmd_extract(args),
        Commands::Base { command } => match command {
            BaseCommands::Validate { base, profile } => base::cmd_base_validate(&base, &profile),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}
