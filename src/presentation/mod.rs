pub mod cli;
pub mod config;
pub mod handlers;
pub mod state;

pub use cli::{Cli, Commands};
pub use config::{Environment, Settings, SettingsError};
pub use handlers::{CommandError, dispatch};
pub use state::{AppState, AppStateError};
