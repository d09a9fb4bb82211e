// hand.rs

use core::fmt;
use core::ops::Sub;

use crate::digit::{Digit, Finger, Thumb};
use crate::error::Result;
use crate::joint::{Joint, JointDelta, JointRole};

/// Four fingers and a thumb. Composition is structural; the digits validate themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hand<J = Joint> {
    pub index: Finger<J>,
    pub middle: Finger<J>,
    pub ring: Finger<J>,
    pub pinky: Finger<J>,
    pub thumb: Thumb<J>,
}

pub type HandConfiguration = Hand<Joint>;
pub type HandDelta = Hand<JointDelta>;

impl<J> Hand<J> {
    pub fn new(index: Finger<J>, middle: Finger<J>, ring: Finger<J>, pinky: Finger<J>, thumb: Thumb<J>) -> Self {
        Self { index, middle, ring, pinky, thumb }
    }

    pub fn finger(&self, digit: Digit) -> Option<&Finger<J>> {
        match digit {
            Digit::Index => Some(&self.index),
            Digit::Middle => Some(&self.middle),
            Digit::Ring => Some(&self.ring),
            Digit::Pinky => Some(&self.pinky),
            Digit::Thumb => None,
        }
    }

    /// The three joints of a digit, proximal first.
    pub fn digit_joints(&self, digit: Digit) -> [&J; 3] {
        match self.finger(digit) {
            Some(finger) => finger.joints(),
            None => self.thumb.joints(),
        }
    }

    fn fingers(&self) -> [&Finger<J>; 4] {
        [&self.index, &self.middle, &self.ring, &self.pinky]
    }
}

impl HandConfiguration {
    pub fn difference(&self, other: &Self) -> HandDelta {
        Hand {
            index: self.index.difference(&other.index),
            middle: self.middle.difference(&other.middle),
            ring: self.ring.difference(&other.ring),
            pinky: self.pinky.difference(&other.pinky),
            thumb: self.thumb.difference(&other.thumb),
        }
    }
}

impl HandDelta {
    pub fn total_degrees_different(&self) -> i32 {
        self.fingers().iter().map(|f| f.total_degrees_different()).sum::<i32>()
            + self.thumb.total_degrees_different()
    }

    pub fn weighted_degrees_different(&self) -> i32 {
        self.fingers().iter().map(|f| f.weighted_degrees_different()).sum::<i32>()
            + self.thumb.weighted_degrees_different()
    }
}

impl Sub for &HandConfiguration {
    type Output = HandDelta;
    fn sub(self, rhs: Self) -> HandDelta {
        self.difference(rhs)
    }
}

impl<J: fmt::Display> fmt::Display for Hand<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "index:  {}", self.index)?;
        writeln!(f, "middle: {}", self.middle)?;
        writeln!(f, "ring:   {}", self.ring)?;
        writeln!(f, "pinky:  {}", self.pinky)?;
        write!(f, "thumb:  {}", self.thumb)
    }
}

/// A hand configuration together with a 3-DOF wrist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmConfiguration<J = Joint> {
    hand: Hand<J>,
    wrist: J,
}

pub type ArmDelta = ArmConfiguration<JointDelta>;

impl ArmConfiguration<Joint> {
    pub fn new(hand: HandConfiguration, wrist: Joint) -> Result<Self> {
        Ok(Self { hand, wrist: wrist.check_role(JointRole::Wrist)? })
    }

    pub fn difference(&self, other: &Self) -> ArmDelta {
        ArmConfiguration {
            hand: self.hand.difference(&other.hand),
            wrist: self.wrist - other.wrist,
        }
    }
}

impl<J> ArmConfiguration<J> {
    pub fn hand(&self) -> &Hand<J> { &self.hand }
    pub fn wrist(&self) -> &J { &self.wrist }
}

impl ArmDelta {
    pub fn total_degrees_different(&self) -> i32 {
        self.hand.total_degrees_different() + self.wrist.total_degrees_different()
    }

    pub fn weighted_degrees_different(&self) -> i32 {
        self.hand.weighted_degrees_different()
            + self.wrist.total_degrees_different() * JointRole::Wrist.weight()
    }
}

impl Sub for &ArmConfiguration<Joint> {
    type Output = ArmDelta;
    fn sub(self, rhs: Self) -> ArmDelta {
        self.difference(rhs)
    }
}

impl<J: fmt::Display> fmt::Display for ArmConfiguration<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.hand)?;
        write!(f, "wrist:  {}", self.wrist)
    }
}
