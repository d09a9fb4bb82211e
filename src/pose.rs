// pose.rs
// The renderer's hand pose document and its transformation by an arm delta.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::digit::{Digit, Finger, Thumb};
use crate::error::{HandshapeError, Result};
use crate::hand::{ArmConfiguration, ArmDelta, Hand};
use crate::joint::{Joint, JointDelta};

pub const METACARPALS: &str = "metacarpals";
pub const CARPALS: &str = "carpals";

/// Share of the wrist pronation delta applied to the carpals' second and third axes.
const CARPAL_ABDUCTION_SCALE: f64 = -0.75;
const CARPAL_ROTATION_SCALE: f64 = 1.25;

/// Renderer pose: every joint maps to three radian angles. Keys other than
/// `hand_joints` are carried through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseDocument {
    pub hand_joints: BTreeMap<String, [f64; 3]>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Digit addressed by `fingerN` in the pose document.
fn pose_digit(finger: &str) -> Option<Digit> {
    match finger {
        "finger1" => Some(Digit::Pinky),
        "finger2" => Some(Digit::Ring),
        "finger3" => Some(Digit::Middle),
        "finger4" => Some(Digit::Index),
        "finger5" => Some(Digit::Thumb),
        _ => None,
    }
}

/// Position (0..3) of `jointM` along the digit, proximal first.
fn pose_joint(joint: &str) -> Option<usize> {
    match joint {
        "joint1" => Some(0),
        "joint2" => Some(1),
        "joint3" => Some(2),
        _ => None,
    }
}

fn radians(deg: i32) -> f64 {
    f64::from(deg).to_radians()
}

fn joint_matrix(delta: &JointDelta) -> [f64; 3] {
    let [flex, abd, rot, _] = delta.axes_or_zero();
    [radians(flex), radians(abd), radians(rot)]
}

fn subtract(value: &mut [f64; 3], matrix: [f64; 3]) {
    for (v, m) in value.iter_mut().zip(matrix) {
        *v -= m;
    }
}

impl PoseDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| HandshapeError::Table { name: "pose document".into(), source })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| HandshapeError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|source| HandshapeError::Table { name: path.display().to_string(), source })
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)
            .map_err(|source| HandshapeError::Table { name: path.display().to_string(), source })?;
        std::fs::write(path, text).map_err(|e| HandshapeError::io(path, e))
    }

    fn hand_joint_mut(&mut self, key: &str) -> Result<&mut [f64; 3]> {
        self.hand_joints.get_mut(key).ok_or_else(|| HandshapeError::lookup("pose joint", key))
    }

    /// New document with `base - target` subtracted from every finger joint, the
    /// metacarpals and the carpals. `self` must be the pose that renders `base`.
    pub fn apply(&self, base: &ArmConfiguration, target: &ArmConfiguration) -> Result<Self> {
        let diff: ArmDelta = base - target;
        let mut out = self.clone();

        for (key, value) in out.hand_joints.iter_mut() {
            let Some((finger, joint)) = key.split_once(' ') else { continue };
            if !finger.starts_with("finger") || !joint.starts_with("joint") {
                continue;
            }
            let (Some(digit), Some(position)) = (pose_digit(finger), pose_joint(joint)) else {
                return Err(HandshapeError::lookup("pose joint", key.as_str()));
            };
            subtract(value, joint_matrix(diff.hand().digit_joints(digit)[position]));
        }

        let [flex, _, _, pro] = diff.wrist().axes_or_zero();
        let pro = radians(pro);
        subtract(out.hand_joint_mut(METACARPALS)?, [radians(flex), 0.0, pro]);
        subtract(out.hand_joint_mut(CARPALS)?, [0.0, pro * CARPAL_ABDUCTION_SCALE, pro * CARPAL_ROTATION_SCALE]);

        tracing::debug!(weighted = diff.weighted_degrees_different(), "applied arm delta to pose");
        Ok(out)
    }
}

/// The resting arm the stock renderer pose depicts: fingers extended and
/// slightly spread, wrist neutral.
pub fn base_arm() -> Result<ArmConfiguration> {
    let hand = Hand::new(
        Finger::new((180, 5), 180, 180)?,
        Finger::new((180, 2), 180, 180)?,
        Finger::new((180, -2), 180, 180)?,
        Finger::new((180, -4), 180, 180)?,
        Thumb::new(Joint::new(None, Some(9), Some(27), None), 180, 180)?,
    );
    ArmConfiguration::new(hand, Joint::new(Some(0), None, Some(0), Some(0)))
}
