use std::path::Path;

use crate::cmd::{Invocation, Runner};
use crate::config::SearxngConfig;
use crate::error::DeployResult;

/// The capability-hardening directive in its active form.
pub const ACTIVE: &str = "cap_drop: - ALL";

/// The same directive while disabled for a first run.
pub const DISABLED: &str = "# cap_drop: - ALL  # Temporarily commented out for first run";

/// Whether the search container has finished its first start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    FirstRun,
    Initialized,
}

/// What [`apply`] did to the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The directive was commented out.
    Disabled,
    /// The directive was re-enabled.
    Restored,
    Unchanged,
}

/// Inspect the running search container. Anything short of a
/// positive answer from inside the container, errors included,
/// counts as a first run.
pub fn detect(runner: &dyn Runner, config: &SearxngConfig) -> InitState {
    match probe(runner, config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error checking Docker container: {e} - assuming first run");
            InitState::FirstRun
        }
    }
}

fn probe(runner: &dyn Runner, config: &SearxngConfig) -> DeployResult<InitState> {
    let names = runner.output(
        &Invocation::new("docker")
            .args(["ps", "--filter"])
            .arg(format!("name={}", config.container_filter))
            .args(["--format", "{{.Names}}"]),
    )?;

    let Some(container) = names.lines().map(str::trim).find(|n| !n.is_empty()) else {
        eprintln!("No running SearXNG container found - assuming first run");
        return Ok(InitState::FirstRun);
    };
    eprintln!("Found running SearXNG container: {container}");

    let check = format!(
        "[ -f {} ] && echo 'found' || echo 'not_found'",
        config.marker_file
    );
    let answer = runner.output(
        &Invocation::new("docker")
            .args(["exec", container, "sh", "-c"])
            .arg(check),
    )?;

    if answer.trim() == "found" {
        eprintln!(
            "Found {} inside the SearXNG container - not first run",
            config.marker_file
        );
        Ok(InitState::Initialized)
    } else {
        eprintln!(
            "{} not found inside the SearXNG container - first run",
            config.marker_file
        );
        Ok(InitState::FirstRun)
    }
}

/// Rewrite manifest text for `state`. On a first run every active
/// directive outside a comment is commented out, keeping whatever
/// follows it on the line. Once initialized, every disabled form is
/// turned back into the active one. Applying the same state twice
/// is a no-op.
#[must_use]
pub fn toggle(content: &str, state: InitState) -> (String, Toggle) {
    let change = match state {
        InitState::FirstRun => Toggle::Disabled,
        InitState::Initialized => Toggle::Restored,
    };

    let mut changed = false;
    let mut out = String::with_capacity(content.len() + DISABLED.len());

    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        let ending = &line[body.len()..];

        let rewritten = match state {
            InitState::FirstRun if uncommented(body).contains(ACTIVE) => {
                Some(body.replacen(ACTIVE, DISABLED, 1))
            }
            InitState::Initialized if body.contains(DISABLED) => {
                Some(body.replace(DISABLED, ACTIVE))
            }
            _ => None,
        };

        changed |= rewritten.is_some();
        out.push_str(rewritten.as_deref().unwrap_or(body));
        out.push_str(ending);
    }

    if changed {
        (out, change)
    } else {
        (content.to_string(), Toggle::Unchanged)
    }
}

/// The part of a manifest line before any `#`.
fn uncommented(line: &str) -> &str {
    line.find('#').map_or(line, |i| &line[..i])
}

/// Apply the toggle for `state` to the manifest on disk. A
/// missing manifest or a file error is reported, not raised.
pub fn apply(manifest: &Path, state: InitState) -> Toggle {
    if !manifest.exists() {
        eprintln!(
            "Warning: Docker Compose file not found at {}",
            manifest.display()
        );
        return Toggle::Unchanged;
    }

    match rewrite(manifest, state) {
        Ok(result) => result,
        Err(e) => {
            eprintln!(
                "Error checking/modifying {} for SearXNG: {e}",
                manifest.display()
            );
            Toggle::Unchanged
        }
    }
}

fn rewrite(manifest: &Path, state: InitState) -> DeployResult<Toggle> {
    let content = std::fs::read_to_string(manifest)?;
    let (updated, result) = toggle(&content, state);

    match result {
        Toggle::Disabled => {
            eprintln!(
                "First run detected for SearXNG. Temporarily removing '{ACTIVE}' directive..."
            );
            std::fs::write(manifest, updated)?;
            eprintln!(
                "Note: After the first run completes successfully, \
                 re-add '{ACTIVE}' to {} for security reasons.",
                manifest.display()
            );
        }
        Toggle::Restored => {
            eprintln!(
                "SearXNG has been initialized. Re-enabling '{ACTIVE}' directive for security..."
            );
            std::fs::write(manifest, updated)?;
        }
        Toggle::Unchanged => {}
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_indentation_and_line_endings() {
        let content = "services:\n  searxng:\n    cap_drop: - ALL\r\n    image: searxng\n";

        let (out, result) = toggle(content, InitState::FirstRun);

        assert_eq!(result, Toggle::Disabled);
        assert_eq!(
            out,
            format!("services:\n  searxng:\n    {DISABLED}\r\n    image: searxng\n")
        );
    }

    #[test]
    fn content_without_trailing_newline() {
        let (out, result) = toggle(ACTIVE, InitState::FirstRun);

        assert_eq!(result, Toggle::Disabled);
        assert_eq!(out, DISABLED);
    }
}
