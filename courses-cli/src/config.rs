//! Environment loading
//!
//! Priority: process environment, then `./.env`, then `~/.courses/.env`.
//! dotenvy never overwrites a variable that is already set.
//!
//! Runs before tracing is installed, so it returns what it loaded instead
//! of logging.

use std::path::PathBuf;

/// Load `.env` files from the current directory and `~/.courses`.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    if let Some(env_file) = dirs::home_dir().map(|home| home.join(".courses").join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded.push(env_file);
        }
    }

    loaded
}
