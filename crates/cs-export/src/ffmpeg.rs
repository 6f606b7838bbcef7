// ffmpeg est utilisé en subprocess (std::process::Command), jamais lié.
// Le chemin est injecté par la config ou la CLI ; sinon on le cherche dans le PATH.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use cs_core::error::CoreError;

/// Nom de l'exécutable recherché dans le PATH.
const FFMPEG_NAME: &str = if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" };

/// Locate the ffmpeg executable.
///
/// A configured path wins; it may be a full path or a bare name looked up on
/// `PATH`. Without one, `ffmpeg` is looked up on `PATH`.
///
/// # Errors
/// Returns [`CoreError::DependencyUnavailable`] when nothing is found.
///
/// # Example
/// ```no_run
/// use cs_export::ffmpeg::resolve_ffmpeg;
/// let ffmpeg = resolve_ffmpeg(None).unwrap();
/// ```
pub fn resolve_ffmpeg(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        if let Ok(found) = which::which(path) {
            return Ok(found);
        }
        return Err(CoreError::DependencyUnavailable {
            name: path.display().to_string(),
            hint: "le chemin ffmpeg configuré n'existe pas".into(),
        }
        .into());
    }

    which::which(FFMPEG_NAME).map_err(|_| {
        CoreError::DependencyUnavailable {
            name: "ffmpeg".into(),
            hint: "installez ffmpeg ou renseignez [codec] ffmpeg_path / --ffmpeg".into(),
        }
        .into()
    })
}

/// Run `ffmpeg -version` and return its first line.
///
/// # Errors
/// Returns [`CoreError::DependencyUnavailable`] if the binary cannot be run.
pub fn ffmpeg_version(ffmpeg: &Path) -> Result<String> {
    let output = Command::new(ffmpeg)
        .arg("-version")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| CoreError::DependencyUnavailable {
            name: ffmpeg.display().to_string(),
            hint: format!("impossible de lancer l'exécutable : {e}"),
        })
        .context("ffmpeg -version")?;

    if !output.status.success() {
        return Err(CoreError::DependencyUnavailable {
            name: ffmpeg.display().to_string(),
            hint: format!("`-version` a échoué ({})", output.status),
        }
        .into());
    }

    let text = String::from_utf8_lossy(&output.stdout);
    Ok(text.lines().next().unwrap_or_default().trim().to_string())
}

/// Resolve ffmpeg and check that it runs. Called once at startup.
///
/// # Errors
/// Returns [`CoreError::DependencyUnavailable`] with a diagnostic.
pub fn require_ffmpeg(configured: Option<&Path>) -> Result<PathBuf> {
    let path = resolve_ffmpeg(configured)?;
    let version = ffmpeg_version(&path)?;
    log::info!("Encodeur : {} ({version})", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configured_path_is_reported() {
        let err = resolve_ffmpeg(Some(Path::new("/nonexistent/bin/ffmpeg-xyz"))).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<CoreError>(),
                Some(CoreError::DependencyUnavailable { .. })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn non_executable_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("ffmpeg");
        std::fs::write(&fake, b"not a program").unwrap();
        // The file exists, so it resolves; running it must fail cleanly.
        let resolved = resolve_ffmpeg(Some(&fake)).unwrap();
        assert_eq!(resolved, fake);
        assert!(ffmpeg_version(&resolved).is_err());
    }
}
