use anyhow::{bail, Context};
use log::{debug, info};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "forecast_views_cache";
/// Overrides the platform cache directory for every client built with [`get_cache_dir`].
pub const CACHE_DIR_ENV: &str = "FORECAST_VIEWS_CACHE_DIR";

/// `$FORECAST_VIEWS_CACHE_DIR` if set and non-empty, otherwise
/// `<platform cache dir>/forecast_views_cache`.
pub fn get_cache_dir() -> anyhow::Result<PathBuf> {
    pick_cache_dir(env::var_os(CACHE_DIR_ENV), dirs::cache_dir())
}

fn pick_cache_dir(
    overridden: Option<OsString>,
    platform: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    if let Some(dir) = overridden.filter(|d| !d.is_empty()) {
        debug!("Using cache directory from {}", CACHE_DIR_ENV);
        return Ok(PathBuf::from(dir));
    }
    platform
        .map(|p| p.join(CACHE_DIR_NAME))
        .context("Could not determine system cache directory")
}

/// Creates `path` (and parents) unless it already is a directory.
pub async fn ensure_cache_dir_exists(path: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => return Ok(()),
        Ok(_) => bail!("Cache path exists but is not a directory: {}", path.display()),
        Err(_) => {}
    }
    info!("Creating cache directory: {}", path.display());
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create cache directory: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_platform_dir() -> anyhow::Result<()> {
        let platform = Some(PathBuf::from("/home/u/.cache"));
        assert_eq!(
            pick_cache_dir(Some("/srv/cache".into()), platform.clone())?,
            PathBuf::from("/srv/cache")
        );
        assert_eq!(
            pick_cache_dir(Some(OsString::new()), platform.clone())?,
            PathBuf::from("/home/u/.cache/forecast_views_cache")
        );
        assert!(pick_cache_dir(None, None).is_err());
        Ok(())
    }

    #[tokio::test]
    async fn creates_missing_directory() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let nested = root.path().join("a").join("b");
        ensure_cache_dir_exists(&nested).await?;
        assert!(nested.is_dir());
        // second call is a no-op
        ensure_cache_dir_exists(&nested).await?;
        Ok(())
    }

    #[tokio::test]
    async fn rejects_a_file_in_the_way() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let file = root.path().join("cache");
        std::fs::write(&file, b"not a dir")?;
        assert!(ensure_cache_dir_exists(&file).await.is_err());
        Ok(())
    }
}
