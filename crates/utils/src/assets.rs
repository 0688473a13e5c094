use std::{env, path::PathBuf};

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");
const ASSET_DIR_ENV: &str = "SPY_CATS_ASSET_DIR";

pub fn asset_dir() -> PathBuf {
    let path = if let Ok(custom_dir) = env::var(ASSET_DIR_ENV) {
        PathBuf::from(custom_dir)
    } else if cfg!(debug_assertions) {
        PathBuf::from(PROJECT_ROOT).join("../../dev_assets")
    } else {
        ProjectDirs::from("io", "sca", "spy-cats")
            .expect("OS didn't give us a home directory")
            .data_dir()
            .to_path_buf()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).expect("Failed to create asset directory");
    }

    path
    // ✔ macOS → ~/Library/Application Support/spy-cats
    // ✔ Linux → ~/.local/share/spy-cats   (respects XDG_DATA_HOME)
    // ✔ Windows → %APPDATA%\sca\spy-cats
}

pub fn config_path() -> std::path::PathBuf {
    asset_dir().join("config.json")
}

pub fn db_path() -> std::path::PathBuf {
    asset_dir().join("db.sqlite")
}
