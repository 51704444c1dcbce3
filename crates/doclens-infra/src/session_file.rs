//! Persisted session cookie for the CLI.
//!
//! Each `doclens` invocation is a fresh process, so the cookie set by
//! sign-in is saved to `{config_dir}/session` and restored into the
//! [`ApiClient`](crate::http::ApiClient) cookie store on the next run.

use std::path::{Path, PathBuf};

use anyhow::Context;

const SESSION_FILE: &str = "session";

/// Path of the saved session cookie: `{config_dir}/session`.
pub fn session_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SESSION_FILE)
}

/// Read the saved `Cookie` header, if one exists and is non-empty.
pub async fn load_session_cookie(config_dir: &Path) -> Option<String> {
    let path = session_path(config_dir);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            let trimmed = content.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}", path.display());
            None
        }
    }
}

/// Save the `Cookie` header, readable by the current user only.
pub async fn save_session_cookie(config_dir: &Path, header: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(config_dir)
        .await
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let path = session_path(config_dir);
    tokio::fs::write(&path, header)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
            .await
            .with_context(|| format!("Failed to restrict {}", path.display()))?;
    }

    Ok(())
}

/// Remove the saved cookie. Missing file is not an error.
pub async fn clear_session_cookie(config_dir: &Path) -> anyhow::Result<()> {
    let path = session_path(config_dir);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
