pub mod config;
mod locale;
mod machine;
mod mount;
mod orchestrator;

pub use config::BootConfig;
pub use locale::{LocaleApplication, UnchangedReason, apply_locale};
pub use machine::{BootPath, BootState, FallbackReason};
pub use mount::{MountContext, Mounter};
pub use orchestrator::{BootOrchestrator, BootReport};
