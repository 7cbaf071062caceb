pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::seed::SeedConfig;
pub use config::CliConfig;
pub use crate::core::portal::Portal;
pub use domain::ports::{Clock, FixedClock, IdGen, SequentialIds, SystemClock};
pub use utils::error::{PortalError, Result};
