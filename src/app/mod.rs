pub mod console;
pub mod state;
