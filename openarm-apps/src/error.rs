use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(
        "openarm-apps: Could not find a description file (searched {:?}). Please supply --xml <PATH>.",
        searched
    )]
    NoDescription { searched: Vec<PathBuf> },
    #[error("openarm-apps: No File {:?} is found ({}).", .0, .1)]
    NoFile(PathBuf, #[source] std::io::Error),
    #[error("openarm-apps: Failed to parse {:?} as toml ({}).", .0, .1)]
    TomlParseFailure(PathBuf, #[source] toml::de::Error),
    #[error("openarm-apps: No ParentDirectory {:?} is found.", .0)]
    NoParentDirectory(PathBuf),
    #[error("openarm-apps: Invalid config: {}", .0)]
    InvalidConfig(String),
    #[error("openarm-apps: {} backend is not available (rebuild with `--features {}`).", .0, .0)]
    BackendUnavailable(&'static str),
    #[error("openarm-apps: openarm-control: {:?}", .0)]
    Control(#[from] openarm_control::Error),
    #[cfg(feature = "mujoco")]
    #[error("openarm-apps: openarm-mujoco: {}", .0)]
    Mujoco(#[from] openarm_mujoco::Error),
}
