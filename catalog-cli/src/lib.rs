//! Configuration, command parsing and rendering for the `catalog` binary.

mod command;
mod config;
mod render;
mod session;

pub use command::{Command, CommandError, execute};
pub use config::{CliConfig, StoreConfig, build_store};
pub use render::{render_product, render_state};
pub use session::run_session;
