use std::path::Path;

use mujoco_rs::{prelude::*, wrappers::MjtTrn};
use openarm_control::{JointAddress, JointId, Model, Transmission};
use tracing::debug;

use crate::Error;

/// Reads an MJCF description into a model.
///
/// A missing file is reported as [`Error::NoFile`] before MuJoCo is called.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<MjModel, Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NoFile(path.to_owned()));
    }
    let model = MjModel::from_xml(path).map_err(|e| Error::Load {
        path: path.to_owned(),
        message: e.to_string(),
    })?;
    debug!(
        nq = model.ffi().nq,
        nv = model.ffi().nv,
        nu = model.ffi().nu,
        njnt = model.ffi().njnt,
        "loaded {}",
        path.display()
    );
    Ok(model)
}

/// [`Model`] view over a loaded MuJoCo model.
#[derive(Debug, Clone, Copy)]
pub struct MujocoModel<'m> {
    model: &'m MjModel,
}

impl<'m> MujocoModel<'m> {
    pub fn new(model: &'m MjModel) -> Self {
        Self { model }
    }

    pub fn raw(&self) -> &'m MjModel {
        self.model
    }
}

fn to_transmission(trntype: MjtTrn, trnid: [i32; 2]) -> Transmission {
    let joint = JointId(trnid[0].max(0) as usize);
    match trntype {
        MjtTrn::mjTRN_JOINT => Transmission::Joint(joint),
        MjtTrn::mjTRN_JOINTINPARENT => Transmission::JointInParent(joint),
        MjtTrn::mjTRN_SLIDERCRANK => Transmission::SliderCrank,
        MjtTrn::mjTRN_TENDON => Transmission::Tendon,
        MjtTrn::mjTRN_SITE => Transmission::Site,
        MjtTrn::mjTRN_BODY => Transmission::Body,
        other => Transmission::Other(other as i32),
    }
}

impl Model for MujocoModel<'_> {
    fn actuator_count(&self) -> usize {
        self.model.ffi().nu as usize
    }

    fn transmission(&self, actuator: usize) -> Transmission {
        to_transmission(
            self.model.actuator_trntype()[actuator],
            self.model.actuator_trnid()[actuator],
        )
    }

    fn joint_address(&self, joint: JointId) -> JointAddress {
        JointAddress {
            qpos: self.model.jnt_qposadr()[joint.0] as usize,
            dof: self.model.jnt_dofadr()[joint.0] as usize,
        }
    }
}
