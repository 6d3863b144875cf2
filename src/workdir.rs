//! Scoped working-directory changes
//!
//! The frontend stage runs inside the frontend directory; every later stage
//! must see the directory the pipeline started in. `WorkdirGuard` makes the
//! restore unconditional: it happens on drop, on success and failure alike.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{ProvisError, ProvisResult};

/// RAII guard around a working-directory change.
///
/// Entering records the current directory and changes into `dir`; dropping
/// the guard changes back. Holding two guards at once is not supported -
/// the working directory is process-global state.
#[derive(Debug)]
pub struct WorkdirGuard {
    original: PathBuf,
}

impl WorkdirGuard {
    /// Change into `dir`, remembering where we came from.
    pub fn enter(dir: &Path) -> ProvisResult<Self> {
        if !dir.is_dir() {
            return Err(ProvisError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let original = env::current_dir()?;
        env::set_current_dir(dir).map_err(|e| ProvisError::Workdir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        Ok(Self { original })
    }

    /// The directory that will be restored on drop
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        // Nothing sensible to do if the original directory vanished mid-run;
        // the process is about to surface a stage error anyway.
        let _ = env::set_current_dir(&self.original);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::CWD_LOCK;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn enter_and_drop_restores_original() {
        let _cwd = CWD_LOCK.lock().unwrap();

        let dir = tempdir().unwrap();
        let before = env::current_dir().unwrap();

        {
            let guard = WorkdirGuard::enter(dir.path()).unwrap();
            assert_eq!(guard.original(), before.as_path());
            assert_eq!(
                env::current_dir().unwrap().canonicalize().unwrap(),
                dir.path().canonicalize().unwrap()
            );
        }

        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn restore_happens_on_panic_unwind() {
        let _cwd = CWD_LOCK.lock().unwrap();

        let dir = tempdir().unwrap();
        let before = env::current_dir().unwrap();

        let result = std::panic::catch_unwind(|| {
            let _guard = WorkdirGuard::enter(dir.path()).unwrap();
            panic!("stage blew up");
        });
        assert!(result.is_err());

        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = WorkdirGuard::enter(Path::new("/provis-test-missing-dir")).unwrap_err();
        assert!(matches!(err, ProvisError::DirectoryNotFound { .. }));
    }
}
