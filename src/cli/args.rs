//! Command-line argument parsing for the examprep CLI.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// List groups and subjects
    Subjects,
    /// List the exams of a subject
    Exams { subject: String },
    /// List generation and grading jobs of a subject
    Jobs { subject: String },
    /// Upload PDFs to a subject, in order
    Upload { subject: String, files: Vec<PathBuf> },
    /// Show the graded result of an exam
    Result { subject: String, exam: String },
    /// Show the signed-in user's profile
    Profile,
    /// Arguments that do not form a command
    Invalid(String),
}

/// Usage text printed by `--help` and after invalid arguments.
pub const USAGE: &str = "\
Usage: examprep <command> [args]

Commands:
  subjects                     List groups and subjects
  exams <subject>              List the exams of a subject
  jobs <subject>               List generation and grading jobs
  upload <subject> <file>...   Upload PDF files in order
  result <subject> <exam>      Show an exam's graded result
  profile                      Show your profile

Options:
  -h, --help                   Show this help
  -V, --version                Show the version

Environment:
  EXAMPREP_TOKEN               Bearer token to use
  EXAMPREP_EMAIL, EXAMPREP_PASSWORD
                               Sign in with email and password
  EXAMPREP_API_URL             Backend URL (default http://localhost:8000)";

/// Parse command-line arguments (including the program name).
///
/// # Examples
///
/// ```
/// use examprep::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["examprep".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();

    // flags win wherever they appear
    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }

    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Help;
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    match (command.as_str(), rest.as_slice()) {
        ("subjects", []) => CliCommand::Subjects,
        ("profile", []) => CliCommand::Profile,
        ("exams", [subject]) => CliCommand::Exams {
            subject: subject.to_string(),
        },
        ("jobs", [subject]) => CliCommand::Jobs {
            subject: subject.to_string(),
        },
        ("result", [subject, exam]) => CliCommand::Result {
            subject: subject.to_string(),
            exam: exam.to_string(),
        },
        ("upload", [subject, files @ ..]) if !files.is_empty() => CliCommand::Upload {
            subject: subject.to_string(),
            files: files.iter().map(|f| PathBuf::from(*f)).collect(),
        },
        ("subjects" | "profile" | "exams" | "jobs" | "result" | "upload", _) => {
            CliCommand::Invalid(format!("wrong number of arguments for '{}'", command))
        }
        (other, _) => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}
