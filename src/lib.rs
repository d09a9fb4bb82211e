//! Sign-language handshapes as joint-angle configurations.
//!
//! Handshapes come in three notations: articulatory-model feature groups
//! ([`handshape`]), prosodic-model strings ([`prosodic`]) and the fingerspelling
//! letter table ([`letters`]). All of them resolve through [`tables`] into numeric
//! [`hand::ArmConfiguration`]s, which [`distance`] compares and [`pose`] turns into
//! renderer input.

pub mod digit;
pub mod distance;
pub mod error;
pub mod hand;
pub mod handshape;
pub mod joint;
pub mod json_loader;
pub mod letters;
pub mod logging;
pub mod pose;
pub mod prosodic;
pub mod render;
pub mod tables;

pub use digit::{Digit, Finger, Thumb};
pub use distance::{measure_contour, similarity, Method};
pub use error::{HandshapeError, Result};
pub use hand::{ArmConfiguration, ArmDelta, HandConfiguration, HandDelta};
pub use handshape::{Arm, FingerGroup, Handshape};
pub use joint::{Joint, JointDelta, JointRole};
pub use letters::{letter_to_arm, letter_to_pm};
pub use prosodic::PmHandshape;
pub use tables::NotationTables;
