//! Checks a workspace's locale files: each must load, and all must share one key set.
//!
//! Usage: `oneterm-i18n [WORKSPACE]` (defaults to the current directory).

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use oneterm_i18n::config::{
    ConfigError,
    MatcherError,
    Workspace,
};
use oneterm_i18n::coverage::CoverageReport;
use oneterm_i18n::loader::{
    LoadError,
    find_locale_files,
    load_bundle_file,
};
use oneterm_i18n::registry::Registry;

/// Failures that stop the check before a report can be produced.
#[derive(Debug, thiserror::Error)]
enum CheckError {
    /// Settings could not be loaded or are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Locale file patterns are invalid
    #[error(transparent)]
    Matcher(#[from] MatcherError),
    /// The locale directory could not be walked
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The report could not be written
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let root = std::env::args().nth(1).map_or_else(|| PathBuf::from("."), PathBuf::from);
    let mut stdout = std::io::stdout().lock();

    match run(root, &mut stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(2)
        }
    }
}

/// Loads every locale file, writes a report to `out` and returns whether everything is clean.
fn run(root: PathBuf, out: &mut impl Write) -> Result<bool, CheckError> {
    let workspace = Workspace::open(root)?;
    let settings = workspace.settings();

    let matcher = workspace.locale_file_matcher()?;
    let files = find_locale_files(&matcher)?;
    match workspace.config_file() {
        Some(path) => writeln!(out, "Settings: {}", path.display())?,
        None => writeln!(out, "Settings: defaults")?,
    }
    writeln!(out, "Locale directory: {}", matcher.locale_dir().display())?;

    let mut clean = true;
    let mut bundles = Vec::new();
    for file in files {
        match load_bundle_file(&file) {
            Ok(bundle) => {
                writeln!(out, "  {:<8} {} keys", bundle.locale(), bundle.len())?;
                bundles.push(bundle);
            }
            Err(e) => {
                clean = false;
                writeln!(out, "  FAILED   {}: {e}", file.display())?;
            }
        }
    }

    let report = CoverageReport::compare(&bundles);
    writeln!(out, "Key coverage ({} distinct keys):", report.total_keys)?;
    for locale in &report.locales {
        writeln!(out, "  {:<8} {}/{}", locale.locale, locale.present, report.total_keys)?;
        for key in &locale.missing {
            writeln!(out, "    missing {key}")?;
        }
    }
    clean &= report.is_consistent();

    match Registry::from_settings(bundles, settings) {
        Ok(registry) => writeln!(
            out,
            "Registry: active '{}', fallback {}",
            registry.active_locale(),
            registry.fallback_locale().map_or_else(|| "none".to_string(), |f| format!("'{f}'"))
        )?,
        Err(e) => {
            clean = false;
            writeln!(out, "Registry: {e}")?;
        }
    }

    Ok(clean)
}
