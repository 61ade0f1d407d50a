use std::path::PathBuf;

use clap::Parser;

use crate::compose::{Environment, Profile};
use crate::sequencer::Options;

#[derive(Debug, Parser)]
#[command(name = "stackup")]
#[command(version)]
#[command(about = "Start the local AI and Supabase services")]
pub struct Cli {
    /// Profile to use for Docker Compose
    #[arg(long, value_enum, default_value_t)]
    pub profile: Profile,

    /// Environment to use for Docker Compose
    #[arg(long, value_enum, default_value_t)]
    pub environment: Environment,

    /// Rebuild containers to pick up environment variable changes
    #[arg(long)]
    pub rebuild: bool,

    /// Reset Supabase database data (use if analytics fails to start)
    #[arg(long)]
    pub reset_db: bool,

    /// Directory holding the compose files and `.env`
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// YAML file overriding the default layout
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub const fn options(&self) -> Options {
        Options {
            profile: self.profile,
            environment: self.environment,
            rebuild: self.rebuild,
            reset_db: self.reset_db,
        }
    }
}
