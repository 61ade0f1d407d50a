use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::DeployResult;

/// A synchronous yes/no gate in front of destructive actions.
pub trait Confirm {
    /// Show `prompt` and return the raw answer.
    fn ask(&self, prompt: &str) -> DeployResult<String>;
}

/// Reads the answer from standard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn ask(&self, prompt: &str) -> DeployResult<String> {
        eprint!("{prompt}");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input)
    }
}

/// Only a `y` (surrounding whitespace and case ignored) counts as
/// consent.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Sibling path the data directory is moved to.
#[must_use]
pub fn backup_path(data_dir: &Path, timestamp: i64) -> PathBuf {
    let mut name = data_dir.as_os_str().to_os_string();
    name.push(format!(".backup.{timestamp}"));
    PathBuf::from(name)
}

/// Move the database data directory aside after confirmation so
/// the database is reinitialized on the next start.
///
/// Returns the backup path when the directory was moved.
pub fn reset_database(
    data_dir: &Path,
    confirm: &dyn Confirm,
) -> DeployResult<Option<PathBuf>> {
    if !data_dir.exists() {
        return Ok(None);
    }

    eprintln!("Found existing Supabase database data.");
    eprintln!(
        "If you're experiencing analytics startup issues, \
         you may need to reset the database."
    );
    eprintln!("This will delete all existing data and reinitialize the database.");

    let answer = confirm.ask("Reset Supabase database? (y/N): ")?;
    if !is_affirmative(&answer) {
        eprintln!("Database reset skipped.");
        return Ok(None);
    }

    eprintln!("Backing up and removing database data...");
    let backup = backup_path(data_dir, chrono::Utc::now().timestamp());
    std::fs::rename(data_dir, &backup)?;

    eprintln!("Database data backed up to: {}", backup.display());
    eprintln!("Database will be reinitialized on next startup.");

    Ok(Some(backup))
}
