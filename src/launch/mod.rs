//! Running the wrapped executable with the current profile applied.

mod command;
mod env;

pub use command::{
    build_spawn_params, resolve_command, run, SpawnParams, COMMAND_ENV, DEFAULT_COMMAND,
};
pub use env::project_env;
