// letters.rs
// Fingerspelling letters in both notations.

use crate::digit::parse_members;
use crate::error::{HandshapeError, Result};
use crate::handshape::{Arm, FingerGroup, Handshape};
use crate::prosodic::PmHandshape;
use crate::tables::{LetterRow, NotationTables};

fn letter_to_handshape(row: &LetterRow) -> Result<Handshape> {
    let selected = FingerGroup::new(
        parse_members(&row.psf_members)?,
        row.psf_mcp.as_str(),
        row.psf_pip.as_str(),
        Some(row.psf_abd.clone()),
    );
    let secondary = match &row.ssf_members {
        None => None,
        Some(members) => {
            let feature = |value: &Option<String>, column: &str| {
                value.clone().ok_or_else(|| {
                    HandshapeError::Digit(format!("letter '{}' has secondary members but no {column}", row.letter))
                })
            };
            Some(FingerGroup::new(
                parse_members(members)?,
                feature(&row.ssf_mcp, "ssf-mcp")?,
                feature(&row.ssf_pip, "ssf-pip")?,
                row.ssf_abd.clone(),
            ))
        }
    };
    Handshape::new(selected, secondary, row.thumb_oppos.clone(), row.nsf_joints.clone())
}

/// Articulatory-model arm for a letter, oriented by the letter's wrist preset.
pub fn letter_to_arm(tables: &NotationTables, letter: &str) -> Result<Arm> {
    let row = tables.letter(letter)?;
    Ok(Arm::new(letter_to_handshape(row)?, row.orientation.as_str()))
}

/// The letter's prosodic-model string, parsed.
pub fn letter_to_pm(tables: &NotationTables, letter: &str) -> Result<PmHandshape> {
    PmHandshape::parse(&tables.letter(letter)?.pm, tables)
}

/// Unweighted distance between the hand a letter's articulatory row describes and
/// the hand its prosodic-model string describes.
pub fn notation_gap(tables: &NotationTables, letter: &str) -> Result<i32> {
    let am = letter_to_arm(tables, letter)?.handshape.resolve_hand(tables)?;
    let pm = letter_to_pm(tables, letter)?.to_am_handshape(tables)?.resolve_hand(tables)?;
    Ok((&am - &pm).total_degrees_different())
}

/// Whether both notations of a letter resolve to the same hand within `tolerance` degrees.
pub fn notations_agree(tables: &NotationTables, letter: &str, tolerance: i32) -> Result<bool> {
    Ok(notation_gap(tables, letter)? <= tolerance)
}

/// Outcome of cross-validating one letter.
#[derive(Debug)]
pub struct LetterCheck {
    pub letter: String,
    pub outcome: Result<i32>,
}

impl LetterCheck {
    pub fn passed(&self, tolerance: i32) -> bool {
        matches!(self.outcome, Ok(gap) if gap <= tolerance)
    }
}

/// Cross-validates every letter in the table; failures are collected per letter.
pub fn validate_all(tables: &NotationTables) -> Vec<LetterCheck> {
    tables.letters().iter()
        .map(|row| {
            let outcome = notation_gap(tables, &row.letter);
            if let Err(err) = &outcome {
                tracing::warn!(letter = %row.letter, error = %err, "letter failed to resolve");
            }
            LetterCheck { letter: row.letter.clone(), outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digit::Digit;

    fn tables() -> NotationTables {
        NotationTables::embedded().unwrap()
    }

    #[test]
    fn letter_rows_build_handshapes() {
        let t = tables();
        let f = letter_to_arm(&t, "f").unwrap();
        assert_eq!(f.orientation, "forward");
        let ssf = f.handshape.secondary().unwrap();
        assert!(ssf.members().contains(&Digit::Thumb));
        assert!(f.handshape.non_selected().is_none());

        let a = letter_to_arm(&t, "a").unwrap();
        assert_eq!(a.handshape.thumb(), Some("unopposed"));
        assert_eq!(a.handshape.non_selected().unwrap().members().len(), 4);
    }

    #[test]
    fn unknown_letter_is_a_lookup_error() {
        let t = tables();
        assert!(matches!(letter_to_arm(&t, "?"), Err(HandshapeError::Lookup { kind: "letter", .. })));
        assert!(letter_to_pm(&t, "").is_err());
    }

    #[test]
    fn both_notations_agree_for_every_letter() {
        let t = tables();
        for check in validate_all(&t) {
            assert!(check.passed(0), "{}: {:?}", check.letter, check.outcome);
        }
    }

    #[test]
    fn letters_share_shapes_across_orientation() {
        let t = tables();
        let d = letter_to_arm(&t, "d").unwrap();
        let z = letter_to_arm(&t, "z").unwrap();
        assert_eq!(d.handshape, z.handshape);
        assert_ne!(d.orientation, z.orientation);
    }
}
