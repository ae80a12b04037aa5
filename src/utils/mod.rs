pub mod environment;

pub use environment::{REPO_ENV_VAR, get_repo_dir};
