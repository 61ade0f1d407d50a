//! Sequenced startup of a Supabase stack and a local AI stack.
//!
//! `stackup` brings up two independently maintained docker
//! compose stacks under one project name (`localai` by default),
//! so they show up as a single group in Docker Desktop. Every real
//! piece of work is done by external tools (`git`, `docker`,
//! `sed`, `openssl`, `powershell`); this crate decides what to run
//! and in which order.
//!
//! # Sequence
//!
//! A [`Sequencer`] runs these steps top to bottom:
//!
//! 1. **Secrets** - replace known placeholder credentials in
//!    `.env` with random values ([`secrets`])
//! 2. **Reset** - with `--reset-db`, move the database data
//!    directory to a timestamped backup after confirmation
//!    ([`reset`])
//! 3. **Sync** - sparse-clone the Supabase `docker/` directory, or
//!    pull it when already present ([`vendor`])
//! 4. **Propagate** - copy `.env` into the vendored stack
//! 5. **Search settings** - seed `searxng/settings.yml` and give it
//!    a random secret key ([`searxng`], [`platform`])
//! 6. **Hardening** - comment out `cap_drop: - ALL` until SearXNG
//!    has completed its first start, restore it afterwards
//!    ([`hardening`])
//! 7. **Start** - tear the project down, start stack A, wait,
//!    start stack B ([`compose`])
//!
//! Failures of external tools abort the run, except in the
//! search-settings step, which reports what to do by hand and
//! carries on.
//!
//! # Example
//!
//! ```rust,no_run
//! use stackup::{Config, Options, Profile, Sequencer};
//!
//! fn main() -> anyhow::Result<()> {
//!     let options = Options {
//!         profile: Profile::GpuNvidia,
//!         ..Options::default()
//!     };
//!
//!     Sequencer::new(Config::default(), ".").run(&options)?;
//!     Ok(())
//! }
//! ```
//!
//! The `stackup` binary exposes the same through
//! `--profile`, `--environment`, `--rebuild` and `--reset-db`.

// Allow noisy pedantic lints that don't add value for a
// deployment tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod cmd;
pub mod compose;
pub mod config;
pub mod error;
pub mod hardening;
pub mod platform;
pub mod reset;
pub mod searxng;
pub mod secrets;
pub mod sequencer;
pub mod vendor;

pub use cli::Cli;
pub use cmd::{Invocation, Runner, SystemRunner};
pub use compose::{Environment, Profile};
pub use config::Config;
pub use error::{DeployError, DeployResult};
pub use platform::Platform;
pub use reset::{Confirm, StdinConfirm};
pub use sequencer::{Options, Report, Sequencer};
