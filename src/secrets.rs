use std::path::Path;

use rand::Rng;
use rand::distr::Alphanumeric;

use crate::error::DeployResult;

/// Length of generated alphanumeric secrets.
pub const ALPHANUMERIC_LEN: usize = 32;

/// Random bytes behind a hex secret (rendered as twice as many
/// hex digits).
pub const HEX_BYTES: usize = 32;

/// Character class of a generated secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    /// `[A-Za-z0-9]{32}`
    Alphanumeric,
    /// `[0-9a-f]{64}`
    Hex,
}

impl SecretKind {
    #[must_use]
    pub fn generate<R: Rng>(self, rng: &mut R) -> String {
        match self {
            Self::Alphanumeric => alphanumeric(rng, ALPHANUMERIC_LEN),
            Self::Hex => hex_secret(rng, HEX_BYTES),
        }
    }
}

/// A default credential shipped in the template `.env`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub key: &'static str,
    pub value: &'static str,
    pub kind: SecretKind,
}

impl Placeholder {
    const fn new(key: &'static str, value: &'static str, kind: SecretKind) -> Self {
        Self { key, value, kind }
    }

    /// The exact `KEY=VALUE` text searched for in the env file.
    #[must_use]
    pub fn entry(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// Every placeholder the env template is known to ship with.
pub const PLACEHOLDERS: &[Placeholder] = &[
    Placeholder::new(
        "LOGFLARE_PUBLIC_ACCESS_TOKEN",
        "your-super-secret-and-long-logflare-key-public",
        SecretKind::Hex,
    ),
    Placeholder::new(
        "LOGFLARE_PRIVATE_ACCESS_TOKEN",
        "your-super-secret-and-long-logflare-key-private",
        SecretKind::Hex,
    ),
    Placeholder::new(
        "VAULT_ENC_KEY",
        "your-vault-encryption-key-32-chars-min",
        SecretKind::Alphanumeric,
    ),
    Placeholder::new("N8N_ENCRYPTION_KEY", "super-secret-key", SecretKind::Hex),
    Placeholder::new(
        "N8N_USER_MANAGEMENT_JWT_SECRET",
        "even-more-secret",
        SecretKind::Hex,
    ),
    Placeholder::new(
        "CLICKHOUSE_PASSWORD",
        "super-secret-key-1",
        SecretKind::Alphanumeric,
    ),
    Placeholder::new(
        "MINIO_ROOT_PASSWORD",
        "super-secret-key-2",
        SecretKind::Alphanumeric,
    ),
    Placeholder::new("LANGFUSE_SALT", "super-secret-key-3", SecretKind::Hex),
    Placeholder::new("NEXTAUTH_SECRET", "super-secret-key-4", SecretKind::Hex),
    Placeholder::new("ENCRYPTION_KEY", "generate-with-openssl", SecretKind::Hex),
];

/// Random string of `len` ASCII letters and digits.
#[must_use]
pub fn alphanumeric<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// `bytes` random bytes, lowercase hex encoded.
#[must_use]
pub fn hex_secret<R: Rng>(rng: &mut R, bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rng.fill(buf.as_mut_slice());
    hex::encode(buf)
}

/// What [`provision`] did to the env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsOutcome {
    /// The env file does not exist; nothing was touched.
    MissingFile,
    /// No placeholder was found verbatim.
    AlreadyConfigured,
    /// Keys whose placeholder was replaced, in table order.
    Updated(Vec<&'static str>),
}

/// Replace every placeholder entry found verbatim in `content`.
/// Returns the new content and the keys that changed.
#[must_use]
pub fn replace_placeholders<R: Rng>(
    content: &str,
    placeholders: &[Placeholder],
    rng: &mut R,
) -> (String, Vec<&'static str>) {
    let mut content = content.to_string();
    let mut updated = Vec::new();

    for placeholder in placeholders {
        let entry = placeholder.entry();
        if content.contains(&entry) {
            let fresh = format!("{}={}", placeholder.key, placeholder.kind.generate(rng));
            content = content.replace(&entry, &fresh);
            updated.push(placeholder.key);
        }
    }

    (content, updated)
}

/// Swap placeholder secrets in the env file at `path` for fresh
/// random values. The file is only rewritten when something
/// changed.
pub fn provision<R: Rng>(path: &Path, rng: &mut R) -> DeployResult<SecretsOutcome> {
    if !path.exists() {
        eprintln!("Warning: {} file not found", path.display());
        return Ok(SecretsOutcome::MissingFile);
    }

    eprintln!("Checking and updating environment secrets...");

    let content = std::fs::read_to_string(path)?;
    let (content, updated) = replace_placeholders(&content, PLACEHOLDERS, rng);

    if updated.is_empty() {
        eprintln!("Environment secrets are already configured.");
        return Ok(SecretsOutcome::AlreadyConfigured);
    }

    for key in &updated {
        eprintln!("Updated: {key}");
    }
    std::fs::write(path, content)?;
    eprintln!("Environment secrets updated successfully!");

    Ok(SecretsOutcome::Updated(updated))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn placeholder_entry_is_key_equals_value() {
        let p = Placeholder::new("A", "b", SecretKind::Hex);
        assert_eq!(p.entry(), "A=b");
    }

    #[test]
    fn same_seed_same_secret() {
        let a = alphanumeric(&mut StdRng::seed_from_u64(7), 32);
        let b = alphanumeric(&mut StdRng::seed_from_u64(7), 32);
        assert_eq!(a, b);
    }

    #[test]
    fn placeholder_keys_are_unique() {
        let mut keys: Vec<&str> = PLACEHOLDERS.iter().map(|p| p.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), PLACEHOLDERS.len());
    }
}
