use std::path::PathBuf;
use std::thread;

use rand::Rng;

use crate::cmd::{Runner, SystemRunner};
use crate::compose::{ComposeProject, Environment, Profile};
use crate::config::Config;
use crate::error::DeployResult;
use crate::hardening::{self, InitState, Toggle};
use crate::platform::{Platform, Substitution};
use crate::reset::{self, Confirm, StdinConfirm};
use crate::searxng::{self, SettingsOutcome};
use crate::secrets::{self, SecretsOutcome};
use crate::vendor::{self, SyncAction};

/// Per-run switches, usually straight from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub profile: Profile,
    pub environment: Environment,
    /// Pass `--build` to both `up` calls.
    pub rebuild: bool,
    /// Offer to move the database data directory aside.
    pub reset_db: bool,
}

/// What each step of a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub secrets: SecretsOutcome,
    pub database_backup: Option<PathBuf>,
    pub sync: SyncAction,
    pub settings: SettingsOutcome,
    pub init_state: InitState,
    pub hardening: Toggle,
}

/// Runs the startup sequence top to bottom: secrets, optional
/// database reset, manifest sync, env propagation, search
/// settings, capability toggle, teardown, stack A, wait,
/// stack B.
///
/// External tools, the confirmation prompt and the in-place
/// substitution tool are pluggable; the defaults talk to the real
/// system.
pub struct Sequencer {
    config: Config,
    root: PathBuf,
    runner: Box<dyn Runner>,
    confirm: Box<dyn Confirm>,
    substitution: Box<dyn Substitution>,
}

impl Sequencer {
    #[must_use]
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
            runner: Box::new(SystemRunner::new()),
            confirm: Box::new(StdinConfirm),
            substitution: Platform::detect().substitution(),
        }
    }

    #[must_use]
    pub fn runner(mut self, runner: impl Runner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    #[must_use]
    pub fn confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    /// Override the detected platform.
    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.substitution = platform.substitution();
        self
    }

    /// Run the whole sequence with secrets drawn from the thread
    /// RNG.
    pub fn run(&self, options: &Options) -> DeployResult<Report> {
        self.run_with_rng(options, &mut rand::rng())
    }

    pub fn run_with_rng<R: Rng>(&self, options: &Options, rng: &mut R) -> DeployResult<Report> {
        let secrets = secrets::provision(&self.path(&self.config.env_file), rng)?;

        let database_backup = if options.reset_db {
            reset::reset_database(&self.path(&self.config.db_data_dir), self.confirm.as_ref())?
        } else {
            None
        };

        let sync = vendor::sync(self.runner.as_ref(), &self.config.vendor, &self.root)?;
        vendor::propagate_env(
            &self.path(&self.config.env_file),
            &self.path(&self.config.vendored_env_dir()).join(".env"),
        )?;

        let settings = searxng::prepare_settings(
            self.runner.as_ref(),
            self.substitution.as_ref(),
            &self.root,
            &self.config.searxng,
        );

        let init_state = hardening::detect(self.runner.as_ref(), &self.config.searxng);
        let toggle = hardening::apply(&self.path(&self.config.compose.manifest), init_state);

        self.start(options)?;

        Ok(Report {
            secrets,
            database_backup,
            sync,
            settings,
            init_state,
            hardening: toggle,
        })
    }

    fn start(&self, options: &Options) -> DeployResult<()> {
        let compose = ComposeProject::new(&self.config.project, &self.config.compose, &self.root);

        eprintln!(
            "Stopping and removing existing containers for the unified project '{}'...",
            self.config.project
        );
        self.runner.status(&compose.down(options.profile))?;

        eprintln!("Starting Supabase services...");
        if options.rebuild {
            eprintln!("Rebuilding Supabase containers to pick up environment changes...");
        }
        self.runner
            .status(&compose.stack_a_up(options.environment, options.rebuild))?;

        let delay = self.config.startup_delay();
        if !delay.is_zero() {
            eprintln!(
                "Waiting {}s for Supabase to initialize...",
                delay.as_secs()
            );
            thread::sleep(delay);
        }

        eprintln!("Starting local AI services...");
        if options.rebuild {
            eprintln!("Rebuilding local AI containers to pick up environment changes...");
        }
        self.runner.status(&compose.stack_b_up(
            options.profile,
            options.environment,
            options.rebuild,
        ))?;

        self.print_endpoints();
        Ok(())
    }

    fn print_endpoints(&self) {
        let rule = "=".repeat(60);
        eprintln!();
        eprintln!("{rule}");
        eprintln!("Services are starting up!");
        for endpoint in &self.config.endpoints {
            eprintln!("  {}: {}", endpoint.name, endpoint.url);
        }
        eprintln!("{rule}");
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}
