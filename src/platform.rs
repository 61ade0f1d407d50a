use std::path::Path;

use crate::cmd::{Invocation, Runner};
use crate::error::{DeployError, DeployResult};

/// Random bytes in a generated settings key.
pub const KEY_BYTES: usize = 32;

/// In-place replacement of a literal token in a file with a
/// freshly generated hex key, using whatever tool the host OS
/// ships with.
pub trait Substitution {
    /// Human-readable tool name for progress output.
    fn name(&self) -> &'static str;

    /// Replace every `placeholder` in `file` (relative to `root`)
    /// with a random `KEY_BYTES`-byte hex key.
    fn replace_with_random_key(
        &self,
        runner: &dyn Runner,
        root: &Path,
        file: &str,
        placeholder: &str,
    ) -> DeployResult<()>;
}

/// Host operating system family, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    #[must_use]
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value. Anything that is
    /// neither Windows nor macOS is treated as a GNU userland.
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            _ => Self::Linux,
        }
    }

    #[must_use]
    pub fn substitution(self) -> Box<dyn Substitution> {
        match self {
            Self::Windows => Box::new(PowerShell),
            Self::MacOs => Box::new(BsdSed),
            Self::Linux => Box::new(GnuSed),
        }
    }
}

/// Generates the key and rewrites the file in one PowerShell
/// script block.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerShell;

/// `openssl rand` followed by `sed -i ''`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BsdSed;

/// `openssl rand` followed by `sed -i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GnuSed;

impl Substitution for PowerShell {
    fn name(&self) -> &'static str {
        "PowerShell"
    }

    fn replace_with_random_key(
        &self,
        runner: &dyn Runner,
        root: &Path,
        file: &str,
        placeholder: &str,
    ) -> DeployResult<()> {
        let invocation = Invocation::new("powershell")
            .arg("-Command")
            .arg(powershell_script(file, placeholder))
            .current_dir(root);
        runner.status(&invocation)
    }
}

impl Substitution for BsdSed {
    fn name(&self) -> &'static str {
        "BSD sed"
    }

    fn replace_with_random_key(
        &self,
        runner: &dyn Runner,
        root: &Path,
        file: &str,
        placeholder: &str,
    ) -> DeployResult<()> {
        let key = openssl_hex_key(runner, root)?;
        let invocation = Invocation::new("sed")
            .args(["-i", ""])
            .arg(sed_expression(placeholder, &key))
            .arg(file)
            .current_dir(root);
        runner.status(&invocation)
    }
}

impl Substitution for GnuSed {
    fn name(&self) -> &'static str {
        "GNU sed"
    }

    fn replace_with_random_key(
        &self,
        runner: &dyn Runner,
        root: &Path,
        file: &str,
        placeholder: &str,
    ) -> DeployResult<()> {
        let key = openssl_hex_key(runner, root)?;
        let invocation = Invocation::new("sed")
            .arg("-i")
            .arg(sed_expression(placeholder, &key))
            .arg(file)
            .current_dir(root);
        runner.status(&invocation)
    }
}

#[must_use]
pub fn sed_expression(placeholder: &str, replacement: &str) -> String {
    format!("s|{placeholder}|{replacement}|g")
}

#[must_use]
pub fn powershell_script(file: &str, placeholder: &str) -> String {
    format!(
        "$randomBytes = New-Object byte[] {KEY_BYTES}; \
         (New-Object Security.Cryptography.RNGCryptoServiceProvider).GetBytes($randomBytes); \
         $secretKey = -join ($randomBytes | ForEach-Object {{ \"{{0:x2}}\" -f $_ }}); \
         (Get-Content {file}) -replace '{placeholder}', $secretKey | Set-Content {file}"
    )
}

/// Manual fallback commands, one line per entry, for when the
/// automatic substitution fails.
#[must_use]
pub fn manual_instructions(file: &str, placeholder: &str) -> Vec<String> {
    vec![
        format!(
            "  - Linux: sed -i \"s|{placeholder}|$(openssl rand -hex {KEY_BYTES})|g\" {file}"
        ),
        format!(
            "  - macOS: sed -i '' \"s|{placeholder}|$(openssl rand -hex {KEY_BYTES})|g\" {file}"
        ),
        "  - Windows (PowerShell):".to_string(),
        format!("    $randomBytes = New-Object byte[] {KEY_BYTES}"),
        "    (New-Object Security.Cryptography.RNGCryptoServiceProvider).GetBytes($randomBytes)"
            .to_string(),
        "    $secretKey = -join ($randomBytes | ForEach-Object { \"{0:x2}\" -f $_ })".to_string(),
        format!(
            "    (Get-Content {file}) -replace '{placeholder}', $secretKey | Set-Content {file}"
        ),
    ]
}

/// Ask `openssl` for a hex key. The output is checked so a
/// surprising answer never ends up inside a sed expression.
fn openssl_hex_key(runner: &dyn Runner, root: &Path) -> DeployResult<String> {
    let bytes = KEY_BYTES.to_string();
    let key = runner.output(
        &Invocation::new("openssl")
            .args(["rand", "-hex"])
            .arg(bytes)
            .current_dir(root),
    )?;

    if key.len() != KEY_BYTES * 2 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DeployError::Other(format!(
            "openssl returned an unexpected key: {key:?}"
        )));
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_detection() {
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
        assert_eq!(Platform::from_os("freebsd"), Platform::Linux);
    }

    #[test]
    fn strategy_per_platform() {
        assert_eq!(Platform::Windows.substitution().name(), "PowerShell");
        assert_eq!(Platform::MacOs.substitution().name(), "BSD sed");
        assert_eq!(Platform::Linux.substitution().name(), "GNU sed");
    }

    #[test]
    fn powershell_script_formats_bytes_as_hex() {
        let script = powershell_script("searxng/settings.yml", "ultrasecretkey");

        assert!(script.contains("New-Object byte[] 32"));
        assert!(script.contains("\"{0:x2}\" -f $_"));
        assert!(script.contains(
            "(Get-Content searxng/settings.yml) -replace 'ultrasecretkey', $secretKey \
             | Set-Content searxng/settings.yml"
        ));
    }

    #[test]
    fn manual_instructions_name_the_file_and_placeholder() {
        let lines = manual_instructions("conf/search.yml", "changeme");

        assert_eq!(
            lines[0],
            "  - Linux: sed -i \"s|changeme|$(openssl rand -hex 32)|g\" conf/search.yml"
        );
        assert_eq!(
            lines[1],
            "  - macOS: sed -i '' \"s|changeme|$(openssl rand -hex 32)|g\" conf/search.yml"
        );
        assert_eq!(
            lines.last().map(String::as_str),
            Some(
                "    (Get-Content conf/search.yml) -replace 'changeme', $secretKey \
                 | Set-Content conf/search.yml"
            )
        );
        assert!(lines.iter().all(|l| !l.contains("ultrasecretkey")));
    }
}
