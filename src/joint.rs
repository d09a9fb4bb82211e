// joint.rs
// Angle-valued joints with up to four degrees of freedom.
//
// Angles are integer degrees. 180° at a flexion axis is a fully extended joint.

use core::fmt;
use core::ops::Sub;

use crate::error::{HandshapeError, Result};

/// A joint with optional flexion, abduction, rotation and pronation axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Joint {
    pub flexion: Option<i32>,
    pub abduction: Option<i32>,
    pub rotation: Option<i32>,
    pub pronation: Option<i32>,
}

/// Signed per-axis difference between two joints. An axis is absent when
/// either operand left it unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JointDelta {
    pub flexion: Option<i32>,
    pub abduction: Option<i32>,
    pub rotation: Option<i32>,
    pub pronation: Option<i32>,
}

impl Joint {
    pub const fn new(
        flexion: Option<i32>,
        abduction: Option<i32>,
        rotation: Option<i32>,
        pronation: Option<i32>,
    ) -> Self {
        Self { flexion, abduction, rotation, pronation }
    }

    /// Single-axis joint (PIP, DIP, IP, thumb MCP).
    pub const fn flexion(deg: i32) -> Self {
        Self::new(Some(deg), None, None, None)
    }

    /// Number of axes that carry a value.
    pub fn degrees_of_freedom(&self) -> usize {
        [self.flexion, self.abduction, self.rotation, self.pronation]
            .iter()
            .filter(|axis| axis.is_some())
            .count()
    }

    pub fn difference(&self, other: &Joint) -> JointDelta {
        let axis = |a: Option<i32>, b: Option<i32>| match (a, b) {
            (Some(a), Some(b)) => Some(a.saturating_sub(b)),
            _ => None,
        };
        JointDelta {
            flexion: axis(self.flexion, other.flexion),
            abduction: axis(self.abduction, other.abduction),
            rotation: axis(self.rotation, other.rotation),
            pronation: axis(self.pronation, other.pronation),
        }
    }

    /// Checks the joint against the DOF count its anatomical role requires.
    pub fn check_role(self, role: JointRole) -> Result<Self> {
        let df = self.degrees_of_freedom();
        if df != role.required_dof() {
            return Err(HandshapeError::Validation(format!(
                "the {role} joint needs {} degrees of freedom, got {df} instead",
                role.required_dof()
            )));
        }
        Ok(self)
    }
}

impl JointDelta {
    /// Sum of absolute axis differences, absent axes counted as zero.
    pub fn total_degrees_different(&self) -> i32 {
        [self.flexion, self.abduction, self.rotation, self.pronation]
            .iter()
            .map(|axis| axis.unwrap_or(0).saturating_abs())
            .fold(0, i32::saturating_add)
    }

    /// Axes as `[flexion, abduction, rotation, pronation]`, absent read as zero.
    pub fn axes_or_zero(&self) -> [i32; 4] {
        [
            self.flexion.unwrap_or(0),
            self.abduction.unwrap_or(0),
            self.rotation.unwrap_or(0),
            self.pronation.unwrap_or(0),
        ]
    }
}

impl Sub for Joint {
    type Output = JointDelta;
    fn sub(self, rhs: Self) -> JointDelta {
        self.difference(&rhs)
    }
}

impl Sub for &Joint {
    type Output = JointDelta;
    fn sub(self, rhs: Self) -> JointDelta {
        self.difference(rhs)
    }
}

impl From<i32> for Joint {
    fn from(flexion: i32) -> Self {
        Joint::flexion(flexion)
    }
}

impl From<(i32, i32)> for Joint {
    fn from((flexion, abduction): (i32, i32)) -> Self {
        Joint::new(Some(flexion), Some(abduction), None, None)
    }
}

fn fmt_axis(f: &mut fmt::Formatter<'_>, name: &str, axis: Option<i32>) -> fmt::Result {
    match axis {
        Some(v) => write!(f, "{name}={v}"),
        None => write!(f, "{name}=-"),
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt_axis(f, "flex", self.flexion)?;
        f.write_str(" ")?;
        fmt_axis(f, "abd", self.abduction)?;
        f.write_str(" ")?;
        fmt_axis(f, "rot", self.rotation)?;
        f.write_str(" ")?;
        fmt_axis(f, "pro", self.pronation)?;
        f.write_str(")")
    }
}

impl fmt::Display for JointDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Joint::new(self.flexion, self.abduction, self.rotation, self.pronation), f)
    }
}

/// Anatomical role of a joint inside a digit or arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointRole {
    /// Finger metacarpophalangeal joint.
    Mcp,
    Pip,
    Dip,
    /// Thumb carpometacarpal joint.
    Cm,
    /// Thumb metacarpophalangeal joint (flexion only).
    ThumbMcp,
    Ip,
    Wrist,
}

impl JointRole {
    pub const fn required_dof(self) -> usize {
        match self {
            Self::Mcp | Self::Cm => 2,
            Self::Pip | Self::Dip | Self::ThumbMcp | Self::Ip => 1,
            Self::Wrist => 3,
        }
    }

    /// Anatomical importance used by the weighted reducer.
    pub const fn weight(self) -> i32 {
        match self {
            Self::Wrist => 4,
            Self::Cm | Self::Mcp | Self::ThumbMcp => 3,
            Self::Pip => 2,
            Self::Dip | Self::Ip => 1,
        }
    }
}

impl fmt::Display for JointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mcp | Self::ThumbMcp => "MCP",
            Self::Pip => "PIP",
            Self::Dip => "DIP",
            Self::Cm => "CM",
            Self::Ip => "IP",
            Self::Wrist => "wrist",
        })
    }
}

/// Largest angle magnitude a table may hold.
pub const MAX_DEGREES: i32 = 360;

/// Parses a table cell holding an angle. Only integer degrees within
/// `±MAX_DEGREES` are accepted.
pub fn parse_degrees(raw: &str) -> Result<i32> {
    let deg = raw.trim().parse::<i32>().map_err(|_| {
        HandshapeError::Validation(format!("the angle must be a single integer, got '{raw}' instead"))
    })?;
    if !(-MAX_DEGREES..=MAX_DEGREES).contains(&deg) {
        return Err(HandshapeError::Validation(format!(
            "the angle {deg} is outside -{MAX_DEGREES}..={MAX_DEGREES} degrees"
        )));
    }
    Ok(deg)
}
