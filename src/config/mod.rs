pub mod seed;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "roadworks")]
#[command(about = "Municipal road-repair request tracking portal")]
pub struct CliConfig {
    /// TOML seed file with users, resources and requests. Without it a
    /// built-in demo data set is used.
    #[arg(long)]
    pub seed: Option<String>,

    #[arg(long, default_value = "./output")]
    pub out: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("out", &self.out)?;
        if let Some(seed) = &self.seed {
            validate_path("seed", seed)?;
        }
        Ok(())
    }
}
