mod state_builder;
mod storage;

pub use state_builder::{build_app_state, build_token_codec};
pub use storage::{Repositories, build_repositories, connect_and_migrate};
