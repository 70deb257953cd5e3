use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Verifier script: matches photos whose name contains "alice", fails on
/// photos whose name contains "broken", rejects everything else.
pub const VERIFIER_SCRIPT: &str = r#"case "$2" in
  *alice*) echo '{"verified": true, "distance": 0.21, "threshold": 0.68}' ;;
  *broken*) echo 'Face could not be detected' >&2; exit 2 ;;
  *) echo '{"verified": false, "distance": 0.93, "threshold": 0.68}' ;;
esac"#;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub photos: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let photos = tmp.path().join("photos");
        fs::create_dir_all(&photos).expect("create photo dir");

        Self {
            _tmp: tmp,
            home,
            photos,
        }
    }

    /// Binary with HOME and XDG dirs isolated so no user settings or
    /// cached models leak into the run.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("face-matcher");
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env("XDG_CACHE_HOME", self.home.join(".cache"))
            .env("RUST_LOG", "warn");
        cmd
    }

    /// Binary wired to the shell verifier.
    pub fn scripted(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.args(["--verifier-command", "sh", "--verifier-arg=-c"])
            .arg("--verifier-arg")
            .arg(VERIFIER_SCRIPT)
            .args(["--verifier-arg", "verifier"]);
        cmd
    }

    /// Create an (empty) photo file and return its path.
    pub fn photo(&self, name: &str) -> PathBuf {
        let path = self.photos.join(name);
        fs::write(&path, b"").expect("write photo");
        path
    }

    pub fn missing_photo(&self, name: &str) -> PathBuf {
        self.photos.join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.home.join(name);
        fs::write(&path, contents).expect("write file");
        path
    }
}

pub fn report(name: &str, age: u64, photo: &Path) -> Value {
    json!({
        "fullName": name,
        "approximateAge": age,
        "photo": photo.to_string_lossy(),
    })
}

pub fn parse_stdout(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("valid json output")
}
