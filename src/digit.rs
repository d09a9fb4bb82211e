// digit.rs
//
// `Finger<Joint>` / `Thumb<Joint>` are validated postures; `Finger<JointDelta>` /
// `Thumb<JointDelta>` are the differences produced by subtraction.

use core::fmt;
use core::ops::Sub;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::{HandshapeError, Result};
use crate::joint::{Joint, JointDelta, JointRole};

/// The five digits of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Digit {
    Index,
    Middle,
    Ring,
    Pinky,
    Thumb,
}

impl Digit {
    pub const ALL: [Digit; 5] = [Self::Index, Self::Middle, Self::Ring, Self::Pinky, Self::Thumb];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
            Self::Thumb => "thumb",
        }
    }

    /// Single-letter digit code used by the prosodic-model finger key (`IMRPT`).
    pub fn from_code(code: char) -> Result<Self> {
        match code.to_ascii_uppercase() {
            'I' => Ok(Self::Index),
            'M' => Ok(Self::Middle),
            'R' => Ok(Self::Ring),
            'P' => Ok(Self::Pinky),
            'T' => Ok(Self::Thumb),
            _ => Err(HandshapeError::Digit(format!("'{code}' is not a digit code"))),
        }
    }

    /// Full digit set.
    pub fn all() -> BTreeSet<Digit> {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Digit {
    type Err = HandshapeError;
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s.trim())
            .ok_or_else(|| HandshapeError::Digit(format!("'{s}' is not in the digits set")))
    }
}

/// Parses a comma-separated member list such as `"index,middle"`.
pub fn parse_members(list: &str) -> Result<BTreeSet<Digit>> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Digit::from_str)
        .collect()
}

/// Expands a code string such as `"IMR"` into digits.
pub fn members_from_codes(codes: &str) -> Result<BTreeSet<Digit>> {
    codes.chars().map(Digit::from_code).collect()
}

fn digit_joint(joint: Joint, role: JointRole) -> Result<Joint> {
    joint.check_role(role).map_err(|_| {
        HandshapeError::Digit(format!(
            "the {role} joint needs {} degrees of freedom, got {} instead",
            role.required_dof(),
            joint.degrees_of_freedom()
        ))
    })
}

// ── Finger ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finger<J = Joint> {
    mcp: J,
    pip: J,
    dip: J,
}

pub type FingerDelta = Finger<JointDelta>;

impl Finger<Joint> {
    /// Builds a finger; MCP needs 2 DOF, PIP and DIP need 1.
    pub fn new(mcp: impl Into<Joint>, pip: impl Into<Joint>, dip: impl Into<Joint>) -> Result<Self> {
        Ok(Self {
            mcp: digit_joint(mcp.into(), JointRole::Mcp)?,
            pip: digit_joint(pip.into(), JointRole::Pip)?,
            dip: digit_joint(dip.into(), JointRole::Dip)?,
        })
    }

    pub fn difference(&self, other: &Self) -> FingerDelta {
        Finger {
            mcp: self.mcp - other.mcp,
            pip: self.pip - other.pip,
            dip: self.dip - other.dip,
        }
    }
}

impl<J> Finger<J> {
    pub fn mcp(&self) -> &J { &self.mcp }
    pub fn pip(&self) -> &J { &self.pip }
    pub fn dip(&self) -> &J { &self.dip }

    /// Joints in proximal-to-distal order.
    pub fn joints(&self) -> [&J; 3] {
        [&self.mcp, &self.pip, &self.dip]
    }
}

impl FingerDelta {
    pub fn total_degrees_different(&self) -> i32 {
        self.joints().iter().map(|j| j.total_degrees_different()).sum()
    }

    pub fn weighted_degrees_different(&self) -> i32 {
        self.mcp.total_degrees_different() * JointRole::Mcp.weight()
            + self.pip.total_degrees_different() * JointRole::Pip.weight()
            + self.dip.total_degrees_different() * JointRole::Dip.weight()
    }
}

impl Sub for &Finger<Joint> {
    type Output = FingerDelta;
    fn sub(self, rhs: Self) -> FingerDelta {
        self.difference(rhs)
    }
}

impl<J: fmt::Display> fmt::Display for Finger<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "finger(MCP={}, PIP={}, DIP={})", self.mcp, self.pip, self.dip)
    }
}

// ── Thumb ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumb<J = Joint> {
    cm: J,
    mcp: J,
    ip: J,
}

pub type ThumbDelta = Thumb<JointDelta>;

impl Thumb<Joint> {
    /// Builds a thumb; CM needs 2 DOF, MCP and IP need 1.
    pub fn new(cm: impl Into<Joint>, mcp: impl Into<Joint>, ip: impl Into<Joint>) -> Result<Self> {
        Ok(Self {
            cm: digit_joint(cm.into(), JointRole::Cm)?,
            mcp: digit_joint(mcp.into(), JointRole::ThumbMcp)?,
            ip: digit_joint(ip.into(), JointRole::Ip)?,
        })
    }

    pub fn difference(&self, other: &Self) -> ThumbDelta {
        Thumb {
            cm: self.cm - other.cm,
            mcp: self.mcp - other.mcp,
            ip: self.ip - other.ip,
        }
    }
}

impl<J> Thumb<J> {
    pub fn cm(&self) -> &J { &self.cm }
    pub fn mcp(&self) -> &J { &self.mcp }
    pub fn ip(&self) -> &J { &self.ip }

    pub fn joints(&self) -> [&J; 3] {
        [&self.cm, &self.mcp, &self.ip]
    }
}

impl ThumbDelta {
    pub fn total_degrees_different(&self) -> i32 {
        self.joints().iter().map(|j| j.total_degrees_different()).sum()
    }

    pub fn weighted_degrees_different(&self) -> i32 {
        self.cm.total_degrees_different() * JointRole::Cm.weight()
            + self.mcp.total_degrees_different() * JointRole::ThumbMcp.weight()
            + self.ip.total_degrees_different() * JointRole::Ip.weight()
    }
}

impl Sub for &Thumb<Joint> {
    type Output = ThumbDelta;
    fn sub(self, rhs: Self) -> ThumbDelta {
        self.difference(rhs)
    }
}

impl<J: fmt::Display> fmt::Display for Thumb<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thumb(CM={}, MCP={}, IP={})", self.cm, self.mcp, self.ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_accepts_raw_values() {
        let f = Finger::new((180, 5), 180, 180).unwrap();
        assert_eq!(f.mcp().abduction, Some(5));
        assert_eq!(f.dip().flexion, Some(180));
    }

    #[test]
    fn finger_rejects_dof_mismatch() {
        let err = Finger::new(180, 180, 180).unwrap_err();
        assert!(matches!(err, HandshapeError::Digit(_)));
        assert!(Finger::new((180, 0), (180, 0), 180).is_err());
    }

    #[test]
    fn thumb_rejects_dof_mismatch() {
        let cm = Joint::new(None, Some(90), Some(0), None);
        assert!(Thumb::new(cm, 180, 180).is_ok());
        let three = Joint::new(Some(15), Some(9), Some(27), None);
        assert!(matches!(Thumb::new(three, 180, 180), Err(HandshapeError::Digit(_))));
        assert!(Thumb::new(cm, (180, 0), 180).is_err());
    }

    #[test]
    fn weighted_scales_by_joint_role() {
        let open = Finger::new((180, 5), 180, 180).unwrap();
        let fist = Finger::new((90, 5), 90, 90).unwrap();
        let d = &open - &fist;
        assert_eq!(d.total_degrees_different(), 270);
        assert_eq!(d.weighted_degrees_different(), 90 * 3 + 90 * 2 + 90);
        assert_eq!((&fist - &open).total_degrees_different(), 270);
    }

    #[test]
    fn thumb_weighted_uses_cm_weight() {
        let a = Thumb::new(Joint::new(None, Some(0), Some(0), None), 180, 180).unwrap();
        let b = Thumb::new(Joint::new(None, Some(90), Some(0), None), 180, 120).unwrap();
        let d = &a - &b;
        assert_eq!(d.total_degrees_different(), 150);
        assert_eq!(d.weighted_degrees_different(), 90 * 3 + 60);
    }

    #[test]
    fn member_lists_parse_and_reject_unknown_names() {
        let members = parse_members("index, middle,thumb").unwrap();
        assert_eq!(members.len(), 3);
        assert!(members.contains(&Digit::Thumb));
        assert!(matches!(parse_members("index,elbow"), Err(HandshapeError::Digit(_))));
        assert_eq!(members_from_codes("IMRP").unwrap().len(), 4);
        assert!(members_from_codes("IX").is_err());
    }
}
