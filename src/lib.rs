pub mod banner;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::settings::DockrSettings;
pub use core::{collection::Collection, module::Module};
pub use domain::model::{ModuleSpec, ModuleState};
pub use domain::ports::{Supervised, DEFAULT_STOP_TIMEOUT};
pub use utils::error::{DockrError, Result};
