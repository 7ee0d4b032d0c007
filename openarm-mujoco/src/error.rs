use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("openarm-mujoco: description file not found: {}", .0.display())]
    NoFile(PathBuf),
    #[error("openarm-mujoco: Failed to load {:?} ({}).", path, message)]
    Load { path: PathBuf, message: String },
    #[error("openarm-mujoco: Viewer error : {}", .0)]
    Viewer(String),
    #[error("openarm-mujoco: openarm-control: {:?}", .0)]
    Control(#[from] openarm_control::Error),
}
