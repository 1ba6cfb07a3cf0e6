use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;

use crate::publish::publisher::PublishRoots;
use crate::publish::render_client::RenderSettings;

#[derive(Deserialize)]
pub struct Paths {
    pub markdown_root: PathBuf,
    pub html_root: PathBuf,
    pub theme_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct Site {
    pub theme: String,
}

#[derive(Deserialize, Default)]
pub struct Render {
    /// When unset, the render endpoint is resolved against the Host of the publish request
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub paths: Paths,
    pub site: Site,
    #[serde(default)]
    pub render: Render,
    pub server: Server,
    pub log: Option<Log>,
}

impl Config {
    pub fn publish_roots(&self) -> PublishRoots {
        PublishRoots {
            markdown_root: self.paths.markdown_root.clone(),
            html_root: self.paths.html_root.clone(),
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        let mut settings = RenderSettings::default();
        if let Some(secs) = self.render.timeout_secs {
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.render.connect_timeout_secs {
            settings.connect_timeout = Duration::from_secs(secs);
        }
        settings
    }
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let Some(exe_dir) = cur_exe.parent() else {
        return Err(io::Error::new(ErrorKind::NotFound, "Executable has no parent directory"));
    };
    let Ok(rest) = path.strip_prefix("${exe_dir}") else {
        return Ok(path);
    };
    Ok(exe_dir.join(rest))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        markdown_root: parse_path(cfg.paths.markdown_root)?,
        html_root: parse_path(cfg.paths.html_root)?,
        theme_dir: parse_path(cfg.paths.theme_dir)?,
    };

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
