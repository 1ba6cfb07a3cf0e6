use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::InitArgs;

const CONFIG_SAMPLE: &str = r#"# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[paths]
markdown_root = "{{OUT_DIR}}/published/markdown"
html_root = "{{OUT_DIR}}/published/html"
theme_dir = "{{OUT_DIR}}/themes"

[site]
theme = "default"

# base_url is optional. Without it, the renderer is reached through the Host of the publish request
[render]
timeout_secs = 30

[server]
address = "0.0.0.0"
port = 8001

[log]
level = "Info"
log_to_console = true
"#;

const DEFAULT_THEME: &str = include_str!("../../../themes/default.tpl");

fn get_sample_cfg(out_dir: &Path) -> String {
    let out_dir = out_dir.to_string_lossy();
    let out_dir = out_dir.trim_end_matches('/');
    CONFIG_SAMPLE.replace("{{OUT_DIR}}", out_dir)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Error creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(())
}

pub fn init_cmd(args: InitArgs) -> Result<()> {
    let out_dir = Path::new(&args.out_dir);
    let theme_dir = out_dir.join("themes");
    fs::create_dir_all(&theme_dir)
        .with_context(|| format!("Error creating {}", theme_dir.display()))?;

    let cfg_path = out_dir.join("postpress.toml");
    println!("Writing sample config to {}", cfg_path.display());
    write_file(&cfg_path, &get_sample_cfg(out_dir))?;

    let theme_path = theme_dir.join("default.tpl");
    println!("Writing default theme to {}", theme_path.display());
    write_file(&theme_path, DEFAULT_THEME)?;

    Ok(())
}
