use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::Error;

pub const DESCRIPTION_ENV_NAME: &str = "OPENARM_DESCRIPTION_PATH";

/// Searched in order, relative to the base directory, when no path is given.
pub const DEFAULT_DESCRIPTION_CANDIDATES: [&str; 2] = [
    "openarm_mujoco/v1/openarm_bimanual.xml",
    "openarm_mujoco/v1/openarm.xml",
];

/// Resolves the description file from the given path, the
/// `OPENARM_DESCRIPTION_PATH` environment variable, or the default
/// candidates under `base_dir`, in that order.
pub fn resolve_description<B: AsRef<Path>>(
    explicit: Option<PathBuf>,
    base_dir: B,
) -> Result<PathBuf, Error> {
    let from_env = std::env::var_os(DESCRIPTION_ENV_NAME).map(PathBuf::from);
    resolve_description_from(explicit, from_env, base_dir)
}

/// Same as [`resolve_description`] with the environment value passed in.
pub fn resolve_description_from<B: AsRef<Path>>(
    explicit: Option<PathBuf>,
    from_env: Option<PathBuf>,
    base_dir: B,
) -> Result<PathBuf, Error> {
    let given = explicit.or_else(|| {
        from_env.map(|path| {
            warn!("### ENV VAR {} is used ###", DESCRIPTION_ENV_NAME);
            path
        })
    });
    if let Some(path) = given {
        return match std::fs::metadata(&path) {
            Ok(_) => Ok(path),
            Err(e) => Err(Error::NoFile(path, e)),
        };
    }

    let searched: Vec<_> = DEFAULT_DESCRIPTION_CANDIDATES
        .iter()
        .map(|candidate| base_dir.as_ref().join(candidate))
        .collect();
    for path in &searched {
        debug!("checking {:?}", path);
        if path.is_file() {
            return Ok(path.clone());
        }
    }
    Err(Error::NoDescription { searched })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<mujoco/>").unwrap();
        path
    }

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = touch(dir.path(), "custom.xml");
        touch(dir.path(), DEFAULT_DESCRIPTION_CANDIDATES[0]);
        let env = touch(dir.path(), "env.xml");
        let resolved =
            resolve_description_from(Some(explicit.clone()), Some(env), dir.path()).unwrap();
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn env_before_defaults() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), DEFAULT_DESCRIPTION_CANDIDATES[0]);
        let env = touch(dir.path(), "env.xml");
        let resolved = resolve_description_from(None, Some(env.clone()), dir.path()).unwrap();
        assert_eq!(resolved, env);
    }

    #[test]
    fn bimanual_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let bimanual = touch(dir.path(), DEFAULT_DESCRIPTION_CANDIDATES[0]);
        touch(dir.path(), DEFAULT_DESCRIPTION_CANDIDATES[1]);
        assert_eq!(
            resolve_description_from(None, None, dir.path()).unwrap(),
            bimanual
        );
    }

    #[test]
    fn single_arm_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let single = touch(dir.path(), DEFAULT_DESCRIPTION_CANDIDATES[1]);
        assert_eq!(resolve_description_from(None, None, dir.path()).unwrap(), single);
    }

    #[test]
    fn nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_description_from(None, None, dir.path()).unwrap_err();
        match &err {
            Error::NoDescription { searched } => {
                assert_eq!(searched.len(), 2);
                assert_eq!(searched[0], dir.path().join(DEFAULT_DESCRIPTION_CANDIDATES[0]));
            }
            e => panic!("unexpected {e:?}"),
        }
        assert!(err.to_string().contains("openarm_bimanual.xml"));
    }

    #[test]
    fn missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.xml");
        let err = resolve_description_from(Some(missing.clone()), None, dir.path()).unwrap_err();
        assert!(matches!(&err, Error::NoFile(path, _) if *path == missing));
        assert!(err.to_string().contains("missing.xml"));
    }
}
