use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::cmd::Invocation;
use crate::config::ComposeConfig;

/// Compose profile selecting the accelerator variant of the AI
/// services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Profile {
    #[default]
    Cpu,
    GpuNvidia,
    GpuAmd,
    /// Start without any `--profile`.
    None,
}

impl Profile {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::GpuNvidia => "gpu-nvidia",
            Self::GpuAmd => "gpu-amd",
            Self::None => "none",
        }
    }

    /// Value for `docker compose --profile`, if any.
    #[must_use]
    pub const fn compose_profile(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network exposure of the started services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    /// Ports bound to localhost only.
    #[default]
    Private,
    /// Ports reachable from other hosts.
    Public,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds `docker compose` invocations that all share one
/// project name, so both stacks show up as a single group.
#[derive(Debug, Clone, Copy)]
pub struct ComposeProject<'a> {
    name: &'a str,
    files: &'a ComposeConfig,
    root: &'a Path,
}

impl<'a> ComposeProject<'a> {
    #[must_use]
    pub const fn new(name: &'a str, files: &'a ComposeConfig, root: &'a Path) -> Self {
        Self { name, files, root }
    }

    /// Stop and remove every container of the project.
    #[must_use]
    pub fn down(&self, profile: Profile) -> Invocation {
        self.base(Some(profile))
            .args(["-f", self.files.manifest.as_str()])
            .arg("down")
    }

    /// Start stack A (the backend platform).
    #[must_use]
    pub fn stack_a_up(&self, environment: Environment, rebuild: bool) -> Invocation {
        let mut inv = self
            .base(None)
            .args(["-f", self.files.stack_a_manifest.as_str()]);
        if environment == Environment::Public {
            inv = inv.args(["-f", self.files.stack_a_public_overlay.as_str()]);
        }
        up(inv, rebuild)
    }

    /// Start stack B (the AI tools) with the overlay for
    /// `environment`.
    #[must_use]
    pub fn stack_b_up(
        &self,
        profile: Profile,
        environment: Environment,
        rebuild: bool,
    ) -> Invocation {
        let overlay = match environment {
            Environment::Private => &self.files.private_overlay,
            Environment::Public => &self.files.public_overlay,
        };
        let inv = self
            .base(Some(profile))
            .args(["-f", self.files.manifest.as_str()])
            .args(["-f", overlay.as_str()]);
        up(inv, rebuild)
    }

    fn base(&self, profile: Option<Profile>) -> Invocation {
        let mut inv = Invocation::new("docker")
            .args(["compose", "-p", self.name])
            .current_dir(self.root);
        if let Some(p) = profile.and_then(Profile::compose_profile) {
            inv = inv.args(["--profile", p]);
        }
        inv
    }
}

fn up(inv: Invocation, rebuild: bool) -> Invocation {
    let inv = inv.args(["up", "-d"]);
    if rebuild { inv.arg("--build") } else { inv }
}
