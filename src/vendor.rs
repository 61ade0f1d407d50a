use std::path::Path;

use crate::cmd::{Invocation, Runner};
use crate::config::VendorConfig;
use crate::error::{DeployError, DeployResult};

/// Which branch [`sync`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Cloned,
    Pulled,
}

/// The blob-less sparse clone sequence, in execution order.
#[must_use]
pub fn clone_invocations(vendor: &VendorConfig, root: &Path) -> Vec<Invocation> {
    let checkout = root.join(&vendor.dir);
    vec![
        Invocation::new("git")
            .args(["clone", "--filter=blob:none", "--no-checkout"])
            .arg(&vendor.repo_url)
            .arg(&vendor.dir)
            .current_dir(root),
        Invocation::new("git")
            .args(["sparse-checkout", "init", "--cone"])
            .current_dir(&checkout),
        Invocation::new("git")
            .args(["sparse-checkout", "set"])
            .arg(&vendor.sparse_path)
            .current_dir(&checkout),
        Invocation::new("git")
            .arg("checkout")
            .arg(&vendor.branch)
            .current_dir(&checkout),
    ]
}

/// Clone the vendored manifests if absent, otherwise pull.
/// The first failing git call aborts; a half-finished clone is
/// left as is.
pub fn sync(
    runner: &dyn Runner,
    vendor: &VendorConfig,
    root: &Path,
) -> DeployResult<SyncAction> {
    let checkout = root.join(&vendor.dir);

    if checkout.exists() {
        eprintln!("{} repository already exists, updating...", vendor.dir);
        runner.status(&Invocation::new("git").arg("pull").current_dir(&checkout))?;
        return Ok(SyncAction::Pulled);
    }

    eprintln!("Cloning {} ({} only)...", vendor.repo_url, vendor.sparse_path);
    for invocation in clone_invocations(vendor, root) {
        runner.status(&invocation)?;
    }

    Ok(SyncAction::Cloned)
}

/// Copy the root env file into the vendored stack, overwriting
/// whatever is there.
pub fn propagate_env(source: &Path, destination: &Path) -> DeployResult<()> {
    if !source.exists() {
        return Err(DeployError::FileNotFound(source.display().to_string()));
    }

    eprintln!(
        "Copying {} to {}...",
        source.display(),
        destination.display()
    );
    std::fs::copy(source, destination)?;
    Ok(())
}
