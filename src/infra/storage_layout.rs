use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "chatlists";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub config_dir: PathBuf,
    pub store_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl StorageLayout {
    /// Resolves the layout; `store_override` replaces the default store directory.
    pub fn resolve(store_override: Option<&Path>) -> Result<Self, AppError> {
        let config_base = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve config base directory (XDG_CONFIG_HOME/HOME)".into(),
            })?;

        let config_dir = config_base.join(APP_DIR_NAME);
        let store_dir = store_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config_dir.join("store"));
        let logs_dir = config_dir.join("logs");

        Ok(Self {
            config_dir,
            store_dir,
            logs_dir,
        })
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.config_dir, &self.store_dir, &self.logs_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env_lock;

    #[test]
    fn store_and_logs_are_under_config_dir_by_default() {
        let _guard = env_lock();
        let layout = StorageLayout::resolve(None).expect("layout should resolve");

        assert!(layout.config_dir.ends_with(APP_DIR_NAME));
        assert!(layout.store_dir.starts_with(&layout.config_dir));
        assert!(layout.logs_dir.starts_with(&layout.config_dir));
    }

    #[test]
    fn store_override_replaces_default_store_dir() {
        let _guard = env_lock();
        let layout = StorageLayout::resolve(Some(Path::new("/tmp/chatlists-data")))
            .expect("layout should resolve");

        assert_eq!(layout.store_dir, PathBuf::from("/tmp/chatlists-data"));
        assert!(layout.logs_dir.starts_with(&layout.config_dir));
    }

    #[test]
    fn ensure_dirs_creates_every_directory() {
        let _guard = env_lock();
        let root = tempfile::tempdir().expect("temp dir");
        let old_xdg = env::var_os("XDG_CONFIG_HOME");
        // SAFETY: env is guarded by process-wide test mutex.
        unsafe { env::set_var("XDG_CONFIG_HOME", root.path()) };

        let layout = StorageLayout::resolve(None).expect("layout should resolve");
        layout.ensure_dirs().expect("dirs should be created");

        assert!(layout.store_dir.is_dir());
        assert!(layout.logs_dir.is_dir());
        assert!(layout.config_dir.starts_with(root.path()));

        match old_xdg {
            Some(value) => {
                // SAFETY: restoring env while guard is held.
                unsafe { env::set_var("XDG_CONFIG_HOME", value) }
            }
            None => {
                // SAFETY: restoring env while guard is held.
                unsafe { env::remove_var("XDG_CONFIG_HOME") }
            }
        }
    }
}
