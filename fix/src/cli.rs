//! The command-line arguments and configuration loading for the `autofix` binary.

use autofix_core::config::Config;
use autofix_core::diagnostic::DiagnosticFormat;
use clap::{Parser, ValueEnum};
use config::FileFormat::Toml;
use std::path::{Path, PathBuf};

/// Diagnostic formats accepted by `--type`. The producing tool names are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    #[value(alias = "eslint")]
    Lint,
    #[value(aliases = ["typescript", "tsc"])]
    Typecheck,
    #[value(alias = "semgrep")]
    Structured,
}

impl From<FormatArg> for DiagnosticFormat {
    fn from(arg: FormatArg) -> DiagnosticFormat {
        match arg {
            FormatArg::Lint => DiagnosticFormat::Lint,
            FormatArg::Typecheck => DiagnosticFormat::TypeCheck,
            FormatArg::Structured => DiagnosticFormat::Structured,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "autofix")]
#[command(about = "Fix lint, type-check and security diagnostics using an LLM", long_about = None)]
pub struct Args {
    /// Diagnostic output file to parse.
    // Should always be present unless using --print-config-path
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Format of the diagnostic output.
    #[arg(long = "type", short = 't', value_enum, default_value = "lint")]
    pub format: FormatArg,

    /// Generate fixes but do not apply them.
    #[arg(long)]
    pub dry_run: bool,

    /// Set a configuration value; format $NAME=$VALUE.
    #[arg(long, short)]
    pub config: Vec<String>,

    /// Time limit for each repair request, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Lines of context on each side of the offending line.
    #[arg(long, value_name = "N")]
    pub context_lines: Option<usize>,

    /// Directory that relative paths in the diagnostics are resolved against.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Write a JSON summary of every attempted fix to this file.
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Prints out the location of the config file.
    #[arg(long)]
    pub print_config_path: bool,
}

/// Builds the run configuration. Later sources override earlier ones: built-in defaults, the
/// user's config file, `./autofix.toml`, `--config` values, then dedicated flags.
pub fn load_config(args: &Args, config_dir: &Path) -> Result<Config, config::ConfigError> {
    let mut settings = config::Config::builder()
        .add_source(config::File::from_str(
            include_str!("../default_config.toml"),
            Toml,
        ))
        .add_source(config::File::from(config_file(config_dir)).required(false))
        .add_source(config::File::from(PathBuf::from("autofix.toml")).required(false));
    for config_arg in &args.config {
        let Some((name, value)) = config_arg.split_once('=') else {
            return Err(config::ConfigError::Message(format!(
                "failed to parse config value {config_arg:?}; no '=' found"
            )));
        };
        settings = settings.set_override(name, value)?;
    }

    if args.dry_run {
        settings = settings.set_override("dry_run", true)?;
    }
    if let Some(timeout) = args.timeout {
        settings = settings.set_override("timeout_secs", timeout)?;
    }
    if let Some(lines) = args.context_lines {
        settings = settings.set_override("context_lines", lines as u64)?;
    }

    settings.build()?.try_deserialize()
}

/// Returns the config file path, given the config directory.
pub fn config_file(config_dir: &Path) -> PathBuf {
    [config_dir, "autofix.toml".as_ref()].iter().collect()
}

#[cfg(test)]
mod tests {
    #[cfg(not(miri))]
    #[test]
    fn load_config_test() {
        use super::*;
        use autofix_core::test_util::tempdir;
        use std::{fs, io::Write as _};
        let config_dir = tempdir().unwrap();

        let config = load_config(&Args::parse_from(["", "lint.txt"]), config_dir.path()).unwrap();
        assert!(!config.dry_run);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.context_lines, 10);
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.repair.backend, "anthropic");

        fs::File::create(config_file(config_dir.path()))
            .unwrap()
            .write_all(
                br#"
                    timeout_secs = 30
                    [repair]
                    backend = "ollama"
                    address = "http://[::1]:11434"
                    model = "qwen2.5-coder"
                "#,
            )
            .unwrap();
        let config = load_config(&Args::parse_from(["", "lint.txt"]), config_dir.path()).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.repair.backend, "ollama");
        assert_eq!(config.repair.address.as_deref(), Some("http://[::1]:11434"));
        // Values the user file does not set keep their defaults.
        assert_eq!(config.repair.max_tokens, 8192);

        // Verify the --config flag overrides the user's config file.
        let config = load_config(
            &Args::parse_from(["", "--config", "repair.model=other", "lint.txt"]),
            config_dir.path(),
        )
        .unwrap();
        assert_eq!(config.repair.model, "other");

        // Verify dedicated flags override everything else.
        let config = load_config(
            &Args::parse_from([
                "",
                "--config",
                "timeout_secs=45",
                "--timeout",
                "5",
                "--context-lines",
                "3",
                "--dry-run",
                "lint.txt",
            ]),
            config_dir.path(),
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.context_lines, 3);
        assert!(config.dry_run);

        assert!(
            load_config(
                &Args::parse_from(["", "--config", "no-equals-sign", "lint.txt"]),
                config_dir.path()
            )
            .is_err()
        );
    }

    #[test]
    fn format_aliases() {
        use super::*;
        let format = |name: &str| Args::parse_from(["", "--type", name, "in.txt"]).format;
        assert_eq!(format("lint"), FormatArg::Lint);
        assert_eq!(format("eslint"), FormatArg::Lint);
        assert_eq!(format("typecheck"), FormatArg::Typecheck);
        assert_eq!(format("typescript"), FormatArg::Typecheck);
        assert_eq!(format("tsc"), FormatArg::Typecheck);
        assert_eq!(format("semgrep"), FormatArg::Structured);
        assert_eq!(DiagnosticFormat::from(format("structured")), DiagnosticFormat::Structured);
        assert_eq!(Args::parse_from(["", "in.txt"]).format, FormatArg::Lint);
    }
}
