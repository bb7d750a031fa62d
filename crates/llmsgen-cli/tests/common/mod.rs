#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Create an `llmsgen` command isolated from the caller's environment.
#[allow(dead_code)]
pub fn llmsgen_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("llmsgen"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("LLMSGEN_CONFIG");
    cmd.env_remove("GATEWAY_INTERFACE");
    cmd.env_remove("REQUEST_METHOD");
    cmd
}

/// Site layout inside a temp dir: `site/` web root, `site/llms` output,
/// an OpenAI key file and `llmsgen.toml` pointing at `server_uri`.
#[allow(dead_code)]
pub struct Site {
    pub root: PathBuf,
    pub config: PathBuf,
    pub web_root: PathBuf,
    pub output_dir: PathBuf,
}

#[allow(dead_code)]
impl Site {
    pub fn new(dir: &Path, server_uri: &str) -> Self {
        let web_root = dir.join("site");
        let output_dir = web_root.join("llms");
        fs::create_dir_all(dir.join("keys")).unwrap();
        fs::write(dir.join("keys").join("openai.key"), "sk-test\n").unwrap();

        let config = dir.join("llmsgen.toml");
        fs::write(
            &config,
            format!(
                r#"sitemap_url = "{server_uri}/sitemap.xml"
backend = "openai"
endpoint = "{server_uri}/v1/chat/completions"
output_dir = "site/llms"
web_root = "site"
project_name = "Example"
project_summary = "Developer documentation for Example."
cache_max_age_days = 30

[api_keys]
openai = "keys/openai.key"

[logging]
mode = "both"
file = "logs/llmsgen.log"
"#
            ),
        )
        .unwrap();

        Self {
            root: dir.to_path_buf(),
            config,
            web_root,
            output_dir,
        }
    }

    pub fn index(&self) -> PathBuf {
        self.web_root.join("llms.txt")
    }

    pub fn artifacts(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.output_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
