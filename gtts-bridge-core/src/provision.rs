//! Makes sure the external synthesis client can be run.
//!
//! Only the `gtts-cli` backend needs this. Installing is opt-in through
//! `auto_install`; without it the ensurer just probes and reports.

use std::io::Write;
use std::time::Duration;

use crate::cmd::{run_cmd, split_command};
use crate::error::TtsError;
use crate::settings::Settings;

const STATUS_PREFIX: &str = "[gtts-bridge]";

#[derive(Debug, Clone)]
pub struct DependencyEnsurer {
    probe: Vec<String>,
    installers: Vec<Vec<String>>,
    timeout: Duration,
    auto_install: bool,
}

impl DependencyEnsurer {
    pub fn new(
        probe: Vec<String>,
        installers: Vec<Vec<String>>,
        timeout: Duration,
        auto_install: bool,
    ) -> Self {
        Self {
            probe,
            installers,
            timeout,
            auto_install,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.probe_command(),
            settings.provision.installers.clone(),
            Duration::from_secs(settings.provision.timeout_secs),
            settings.auto_install,
        )
    }

    /// Run the probe command. Available iff it starts and exits 0 in time.
    pub async fn is_available(&self) -> bool {
        let Ok((program, args)) = split_command(&self.probe) else {
            return false;
        };
        match run_cmd(program, args, None, self.timeout).await {
            Ok(result) => result.success(),
            Err(e) => {
                tracing::debug!(error = %e, "Probe failed");
                false
            }
        }
    }

    /// Probe, and when allowed, try each installer in turn until one exits 0
    /// and the probe passes afterwards. Progress goes to `status`. Never
    /// fails: the answer is the returned flag.
    pub async fn ensure<W: Write>(&self, status: &mut W) -> bool {
        if self.is_available().await {
            return true;
        }

        if !self.auto_install {
            tracing::info!("Client missing and auto-install is disabled");
            return false;
        }

        status_line(status, "gtts-cli not found - installing...");

        for cmd in &self.installers {
            let Ok((program, args)) = split_command(cmd) else {
                continue;
            };

            match run_cmd(program, args, None, self.timeout).await {
                Ok(result) if result.success() => {
                    if self.is_available().await {
                        status_line(status, "gtts-cli installed successfully");
                        return true;
                    }
                    tracing::warn!(
                        ?cmd,
                        "Installer succeeded but client is still unavailable"
                    );
                }
                Ok(result) => {
                    tracing::warn!(
                        ?cmd,
                        code = result.code,
                        "Installer exited with non-zero status"
                    );
                    tracing::debug!(?cmd, stderr = %result.err.trim(), "Installer stderr");
                }
                Err(e) => {
                    tracing::warn!(?cmd, error = %e, "Installer could not run");
                }
            }
        }

        status_line(status, "gtts-cli installation failed");
        false
    }

    /// The error reported when `ensure` returned false.
    pub fn unavailable_error(&self) -> TtsError {
        let reason = if self.auto_install {
            "installation failed"
        } else {
            "auto-install is disabled (pass --auto-install or install gtts)"
        };
        TtsError::Dependency(format!("gtts-cli is not available and {reason}"))
    }
}

fn status_line<W: Write>(status: &mut W, message: &str) {
    // Status output is best effort.
    let _ = writeln!(status, "{STATUS_PREFIX} {message}");
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cmd(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn ensurer(
        probe: Vec<String>,
        installers: Vec<Vec<String>>,
        auto_install: bool,
    ) -> DependencyEnsurer {
        DependencyEnsurer::new(probe, installers, Duration::from_secs(5), auto_install)
    }

    #[tokio::test]
    async fn test_available_client_needs_no_install() {
        let e = ensurer(cmd(&["true"]), vec![cmd(&["false"])], true);
        let mut status = Vec::new();

        assert!(e.ensure(&mut status).await);
        assert!(status.is_empty());
    }

    #[tokio::test]
    async fn test_availability_check_uses_configured_program() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let program = dir.path().join("my-gtts");
        std::fs::write(&program, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut settings = Settings::default();
        settings.gtts_cli.program = program;
        let e = DependencyEnsurer::from_settings(&settings);
        let mut status = Vec::new();

        assert!(e.ensure(&mut status).await);
        assert!(status.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_auto_install_fails_fast() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("ran");
        let installer = cmd(&["touch", marker.to_str().unwrap()]);
        let e = ensurer(cmd(&["false"]), vec![installer], false);
        let mut status = Vec::new();

        assert!(!e.ensure(&mut status).await);
        assert!(!marker.exists(), "installer must not run when disabled");
        assert!(status.is_empty());
        assert!(e
            .unavailable_error()
            .to_string()
            .contains("auto-install is disabled"));
    }

    #[tokio::test]
    async fn test_all_installers_failing() {
        let e = ensurer(
            cmd(&["no-such-gtts-cli-xyz", "--version"]),
            vec![
                cmd(&["no-such-python-xyz", "-m", "pip", "install", "gtts", "-q"]),
                cmd(&["false"]),
                cmd(&["no-such-pip-xyz", "install", "gtts", "-q"]),
            ],
            true,
        );
        let mut status = Vec::new();

        assert!(!e.ensure(&mut status).await);
        let status = String::from_utf8(status).unwrap();
        assert!(status.contains("[gtts-bridge] gtts-cli not found - installing..."));
        assert!(status.contains("[gtts-bridge] gtts-cli installation failed"));

        let err = e.unavailable_error();
        assert!(matches!(err, TtsError::Dependency(_)));
        assert_eq!(
            err.to_string(),
            "gtts-cli is not available and installation failed"
        );
    }

    #[tokio::test]
    async fn test_stops_at_first_working_installer() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("installed");
        let second = dir.path().join("second-ran");
        let e = ensurer(
            cmd(&["test", "-f", marker.to_str().unwrap()]),
            vec![
                cmd(&["false"]),
                cmd(&["touch", marker.to_str().unwrap()]),
                cmd(&["touch", second.to_str().unwrap()]),
            ],
            true,
        );
        let mut status = Vec::new();

        assert!(e.ensure(&mut status).await);
        assert!(!second.exists());
        let status = String::from_utf8(status).unwrap();
        assert!(status.contains("gtts-cli installed successfully"));
    }

    #[tokio::test]
    async fn test_installer_success_without_client_moves_on() {
        let e = ensurer(cmd(&["false"]), vec![cmd(&["true"]), cmd(&["true"])], true);
        let mut status = Vec::new();

        assert!(!e.ensure(&mut status).await);
    }

    #[tokio::test]
    async fn test_installer_timeout_moves_on() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("installed");
        let e = DependencyEnsurer::new(
            cmd(&["test", "-f", marker.to_str().unwrap()]),
            vec![
                cmd(&["sleep", "5"]),
                cmd(&["touch", marker.to_str().unwrap()]),
            ],
            Duration::from_millis(500),
            true,
        );
        let mut status = Vec::new();

        assert!(e.ensure(&mut status).await);
    }
}
