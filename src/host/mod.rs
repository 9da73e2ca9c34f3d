mod injection;
mod settings_bridge;

pub use injection::inject_after;
pub use settings_bridge::JsonSettingsBridge;
