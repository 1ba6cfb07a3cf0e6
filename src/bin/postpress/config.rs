use std::env;
use std::path::PathBuf;

use postpress::config::{read_config, Config};
use postpress::logger::default_log_location;

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|path| path.exists())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(get_config_path) {
        None => return Err("Could not find Postpress configuration".to_string()),
        Some(x) => x,
    };

    println!("Reading config from {}", config_path.display());
    let config = match read_config(&config_path) {
        Ok(config) => config,
        Err(e) => return Err(e.to_string()),
    };

    if let Some(ref log) = config.log {
        let location = log.location.clone().unwrap_or_else(default_log_location);
        println!("Log enabled. Files will be written in {}", location.display());
    } else {
        println!("Log disabled. Using stdout");
    }

    Ok(config)
}
