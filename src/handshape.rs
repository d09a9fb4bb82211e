// handshape.rs
// Articulatory-model handshapes and their resolution to joint angles.
//
// A handshape names its finger groups by phonological feature ("ext", "flex",
// "abducted", ...). `resolve` turns those features into numeric joints through
// the notation tables.

use core::fmt;
use std::collections::BTreeSet;

use crate::digit::{Digit, Finger, Thumb};
use crate::error::{HandshapeError, Result};
use crate::hand::{ArmConfiguration, Hand, HandConfiguration};
use crate::joint::Joint;
use crate::tables::NotationTables;

/// A selected (or secondary-selected) finger group. DIP always follows PIP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerGroup {
    members: BTreeSet<Digit>,
    mcp: String,
    pip: String,
    abduction: Option<String>,
}

impl FingerGroup {
    /// `abduction: None` falls back to the table default when resolved.
    pub fn new(
        members: impl IntoIterator<Item = Digit>,
        mcp: impl Into<String>,
        pip: impl Into<String>,
        abduction: Option<String>,
    ) -> Self {
        Self { members: members.into_iter().collect(), mcp: mcp.into(), pip: pip.into(), abduction }
    }

    pub fn members(&self) -> &BTreeSet<Digit> { &self.members }
    pub fn mcp(&self) -> &str { &self.mcp }
    pub fn pip(&self) -> &str { &self.pip }
    pub fn abduction(&self) -> Option<&str> { self.abduction.as_deref() }
}

/// The non-selected fingers. Membership is always derived by `Handshape`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonSelectedFingers {
    members: BTreeSet<Digit>,
    joints: Option<String>,
}

impl NonSelectedFingers {
    pub fn members(&self) -> &BTreeSet<Digit> { &self.members }
    pub fn joints(&self) -> Option<&str> { self.joints.as_deref() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Selected,
    Secondary,
    NonSelected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshape {
    selected: FingerGroup,
    secondary: Option<FingerGroup>,
    thumb: Option<String>,
    non_selected: Option<NonSelectedFingers>,
}

impl Handshape {
    /// `thumb` is the opposition feature; `nsf_joints` the non-selected joint
    /// feature. Fails with a digit error when the selected group is empty or the
    /// two selected groups overlap.
    pub fn new(
        selected: FingerGroup,
        secondary: Option<FingerGroup>,
        thumb: Option<String>,
        nsf_joints: Option<String>,
    ) -> Result<Self> {
        if selected.members.is_empty() {
            return Err(HandshapeError::Digit("the selected finger group has no members".into()));
        }
        let secondary = secondary.filter(|ssf| !ssf.members.is_empty());
        if let Some(ssf) = &secondary {
            if !selected.members.is_disjoint(&ssf.members) {
                return Err(HandshapeError::Digit(
                    "the members of selected and secondary selected finger groups overlap".into(),
                ));
            }
        }

        let mut taken = selected.members.clone();
        if let Some(ssf) = &secondary {
            taken.extend(ssf.members.iter().copied());
        }
        let rest: BTreeSet<Digit> = Digit::all().difference(&taken).copied().collect();
        let non_selected = (!rest.is_empty()).then(|| NonSelectedFingers { members: rest, joints: nsf_joints });

        Ok(Self { selected, secondary, thumb, non_selected })
    }

    pub fn selected(&self) -> &FingerGroup { &self.selected }
    pub fn secondary(&self) -> Option<&FingerGroup> { self.secondary.as_ref() }
    pub fn thumb(&self) -> Option<&str> { self.thumb.as_deref() }
    pub fn non_selected(&self) -> Option<&NonSelectedFingers> { self.non_selected.as_ref() }

    fn group_of(&self, digit: Digit) -> Option<Group> {
        if self.selected.members.contains(&digit) {
            Some(Group::Selected)
        } else if self.secondary.as_ref().is_some_and(|g| g.members.contains(&digit)) {
            Some(Group::Secondary)
        } else if self.non_selected.as_ref().is_some_and(|g| g.members.contains(&digit)) {
            Some(Group::NonSelected)
        } else {
            None
        }
    }

    /// MCP, PIP and abduction features that apply to a digit.
    fn features<'a>(&'a self, digit: Digit, tables: &'a NotationTables) -> Result<(&'a str, &'a str, &'a str)> {
        let defaults = tables.defaults();
        let from_group = |g: &'a FingerGroup| {
            (g.mcp.as_str(), g.pip.as_str(), g.abduction.as_deref().unwrap_or(defaults.abduction.as_str()))
        };
        match self.group_of(digit) {
            Some(Group::Selected) => Ok(from_group(&self.selected)),
            Some(Group::Secondary) => self.secondary.as_ref().map(from_group).ok_or_else(|| unassigned(digit)),
            Some(Group::NonSelected) => {
                let joints = self.non_selected.as_ref()
                    .and_then(|g| g.joints.as_deref())
                    .unwrap_or(defaults.nsf_joints.as_str());
                Ok((joints, joints, defaults.nsf_abduction.as_str()))
            }
            None => Err(unassigned(digit)),
        }
    }

    fn resolve_finger(&self, digit: Digit, tables: &NotationTables) -> Result<Finger> {
        let (mcp, pip, abd) = self.features(digit, tables)?;
        let pip = tables.flexion(pip, digit)?;
        Finger::new((tables.flexion(mcp, digit)?, tables.abduction(abd, digit)?), pip, pip)
    }

    fn resolve_thumb(&self, tables: &NotationTables) -> Result<Thumb> {
        let (mcp, ip, abd) = self.features(Digit::Thumb, tables)?;
        let opposition = self.thumb.as_deref().unwrap_or(tables.defaults().opposition.as_str());
        Thumb::new(
            tables.thumb_cm(abd, opposition)?,
            tables.flexion(mcp, Digit::Thumb)?,
            tables.flexion(ip, Digit::Thumb)?,
        )
    }

    /// Numeric hand configuration for this handshape.
    pub fn resolve_hand(&self, tables: &NotationTables) -> Result<HandConfiguration> {
        let hand = Hand::new(
            self.resolve_finger(Digit::Index, tables)?,
            self.resolve_finger(Digit::Middle, tables)?,
            self.resolve_finger(Digit::Ring, tables)?,
            self.resolve_finger(Digit::Pinky, tables)?,
            self.resolve_thumb(tables)?,
        );
        tracing::debug!(handshape = %self, "resolved hand configuration");
        Ok(hand)
    }

    /// Arm configuration with the default orientation preset as wrist.
    pub fn resolve(&self, tables: &NotationTables) -> Result<ArmConfiguration> {
        let wrist = tables.orientation(&tables.defaults().orientation)?;
        ArmConfiguration::new(self.resolve_hand(tables)?, wrist)
    }
}

fn unassigned(digit: Digit) -> HandshapeError {
    HandshapeError::Digit(format!("the {digit} belongs to no finger group"))
}

fn fmt_members(f: &mut fmt::Formatter<'_>, members: &BTreeSet<Digit>) -> fmt::Result {
    let names: Vec<&str> = members.iter().map(|d| d.name()).collect();
    write!(f, "{{{}}}", names.join(","))
}

impl fmt::Display for FingerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_members(f, &self.members)?;
        write!(f, " MCP={} PIP={} abd={}", self.mcp, self.pip, self.abduction.as_deref().unwrap_or("-"))
    }
}

impl fmt::Display for Handshape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SF[{}]", self.selected)?;
        if let Some(ssf) = &self.secondary {
            write!(f, " SSF[{ssf}]")?;
        }
        write!(f, " thumb={}", self.thumb.as_deref().unwrap_or("-"))?;
        if let Some(nsf) = &self.non_selected {
            f.write_str(" NSF[")?;
            fmt_members(f, &nsf.members)?;
            write!(f, " joints={}]", nsf.joints.as_deref().unwrap_or("-"))?;
        }
        Ok(())
    }
}

/// A handshape placed on an arm with a named wrist orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arm {
    pub handshape: Handshape,
    pub orientation: String,
}

impl Arm {
    pub fn new(handshape: Handshape, orientation: impl Into<String>) -> Self {
        Self { handshape, orientation: orientation.into() }
    }

    pub fn resolve(&self, tables: &NotationTables) -> Result<ArmConfiguration> {
        let wrist: Joint = tables.orientation(&self.orientation)?;
        ArmConfiguration::new(self.handshape.resolve_hand(tables)?, wrist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> NotationTables {
        NotationTables::embedded().unwrap()
    }

    fn group(members: &[Digit], mcp: &str, pip: &str) -> FingerGroup {
        FingerGroup::new(members.iter().copied(), mcp, pip, None)
    }

    #[test]
    fn non_selected_is_the_complement() {
        let hs = Handshape::new(
            group(&[Digit::Index], "ext", "ext"),
            Some(group(&[Digit::Middle, Digit::Thumb], "mid", "flex")),
            None,
            Some("flex".into()),
        )
        .unwrap();
        let nsf = hs.non_selected().unwrap();
        assert_eq!(nsf.members().iter().copied().collect::<Vec<_>>(), vec![Digit::Ring, Digit::Pinky]);
        assert_eq!(nsf.joints(), Some("flex"));
    }

    #[test]
    fn full_selection_leaves_no_non_selected_group() {
        let hs = Handshape::new(group(&Digit::ALL, "mid", "mid"), None, None, Some("flex".into())).unwrap();
        assert!(hs.non_selected().is_none());
    }

    #[test]
    fn overlapping_groups_are_rejected() {
        let err = Handshape::new(
            group(&[Digit::Index, Digit::Middle], "ext", "ext"),
            Some(group(&[Digit::Middle], "flex", "flex")),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, HandshapeError::Digit(_)));
    }

    #[test]
    fn empty_selected_group_is_rejected() {
        assert!(matches!(Handshape::new(group(&[], "ext", "ext"), None, None, None), Err(HandshapeError::Digit(_))));
    }

    #[test]
    fn empty_secondary_group_is_dropped() {
        let hs = Handshape::new(group(&[Digit::Index], "ext", "ext"), Some(group(&[], "ext", "ext")), None, None).unwrap();
        assert!(hs.secondary().is_none());
        assert_eq!(hs.non_selected().unwrap().members().len(), 4);
    }

    #[test]
    fn resolve_uses_group_features_and_defaults() {
        let t = tables();
        let hs = Handshape::new(
            FingerGroup::new([Digit::Index, Digit::Middle], "ext", "ext", Some("abducted".into())),
            None,
            Some("unopposed".into()),
            Some("flex".into()),
        )
        .unwrap();
        let hand = hs.resolve_hand(&t).unwrap();
        assert_eq!(*hand.index.mcp(), Joint::from((180, 20)));
        assert_eq!(*hand.middle.dip(), Joint::flexion(180));
        // non-selected fingers take the non-selected abduction default
        assert_eq!(*hand.ring.mcp(), Joint::from((90, -6)));
        assert_eq!(*hand.pinky.pip(), Joint::flexion(90));
        assert_eq!(*hand.thumb.cm(), Joint::new(None, Some(45), Some(0), None));
        assert_eq!(*hand.thumb.ip(), Joint::flexion(120));
    }

    #[test]
    fn missing_non_selected_joints_default_to_extended() {
        let t = tables();
        let hs = Handshape::new(group(&[Digit::Index], "flex", "flex"), None, None, None).unwrap();
        let hand = hs.resolve_hand(&t).unwrap();
        assert_eq!(hand.ring.mcp().flexion, Some(180));
        assert_eq!(*hand.thumb.cm(), Joint::new(None, Some(60), Some(75), None));
    }

    #[test]
    fn unknown_feature_is_a_lookup_error() {
        let t = tables();
        let hs = Handshape::new(group(&[Digit::Index], "bent", "ext"), None, None, None).unwrap();
        assert!(matches!(hs.resolve_hand(&t), Err(HandshapeError::Lookup { .. })));
        let arm = Arm::new(Handshape::new(group(&[Digit::Index], "ext", "ext"), None, None, None).unwrap(), "upside");
        assert!(matches!(arm.resolve(&t), Err(HandshapeError::Lookup { kind: "orientation", .. })));
    }

    #[test]
    fn arm_uses_its_orientation() {
        let t = tables();
        let arm = Arm::new(Handshape::new(group(&[Digit::Index], "ext", "ext"), None, None, None).unwrap(), "down");
        let resolved = arm.resolve(&t).unwrap();
        assert_eq!(resolved.wrist().flexion, Some(60));
        let neutral = arm.handshape.resolve(&t).unwrap();
        assert_eq!(neutral.wrist().pronation, Some(0));
    }
}
