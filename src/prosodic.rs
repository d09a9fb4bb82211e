// prosodic.rs
// Prosodic-model handshape notation (Eccarius & Brentari 2008).
//
// Grammar, one segment per finger group, separated by ';':
//
//   selected   := base ['T'] ['-'] [abduction] [joint]
//   secondary  := base ['T'] ['-'] [abduction] [joint]
//   non-sel    := [joint]
//   handshape  := selected [';' (non-sel | secondary [';' non-sel])]
//
// Each optional field peeks at the next character and only advances when the
// character belongs to its alphabet; otherwise the same character is offered to
// the next field.

use core::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::digit::{members_from_codes, Digit};
use crate::error::{HandshapeError, Result};
use crate::handshape::{FingerGroup, Handshape};
use crate::tables::{NotationTables, Role, EMPTY_SYMBOL};

const THUMB_MARK: char = 'T';
const UNOPPOSED_MARK: char = '-';

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { chars: input.chars().peekable() }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Consumes the next character only if `accept` maps it to a value.
    fn advance_if<T>(&mut self, accept: impl FnOnce(char) -> Option<T>) -> Option<T> {
        let value = accept(self.peek()?)?;
        self.advance();
        Some(value)
    }

    fn rest(self) -> String {
        self.chars.collect()
    }
}

/// Parsed selected or secondary-selected segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSegment {
    /// Base finger symbol; `None` for a thumb-only segment (`T...`).
    pub fingers: Option<String>,
    pub thumb: bool,
    pub unopposed: bool,
    pub abduction: Option<String>,
    pub joint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonSelectedSegment {
    pub joint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmHandshape {
    pub selected: SelectedSegment,
    pub secondary: Option<SelectedSegment>,
    pub non_selected: Option<NonSelectedSegment>,
}

impl SelectedSegment {
    fn parse(segment: &str, role: Role, tables: &NotationTables) -> Result<Self> {
        let mut cur = Cursor::new(segment);

        let base = cur.peek()
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| HandshapeError::Notation(format!("empty {} segment", role.describe())))?;
        if tables.base_symbol(&base.to_string()).is_none() {
            return Err(HandshapeError::Notation(format!("unknown base symbol '{base}' in {}", role.describe())));
        }
        // A leading 'T' is the thumb marker itself and is left for the thumb field.
        let fingers = if base == THUMB_MARK {
            None
        } else {
            cur.advance();
            Some(base.to_string())
        };

        let thumb = cur.advance_if(|c| (c.to_ascii_uppercase() == THUMB_MARK).then_some(())).is_some();
        let unopposed = cur.advance_if(|c| (c == UNOPPOSED_MARK).then_some(())).is_some();
        let abduction = cur.advance_if(|c| {
            let sym = c.to_ascii_lowercase().to_string();
            tables.abduction_code(role, &sym).map(|_| sym)
        });
        let joint = cur.advance_if(|c| {
            let sym = c.to_ascii_lowercase().to_string();
            tables.joint_code(role, &sym).map(|_| sym)
        });

        let rest = cur.rest();
        if !rest.is_empty() {
            return Err(HandshapeError::Notation(format!(
                "unparsed '{rest}' left in the {} substring '{segment}'",
                role.describe()
            )));
        }
        Ok(Self { fingers, thumb, unopposed, abduction, joint })
    }

    fn members(&self, tables: &NotationTables) -> Result<Vec<Digit>> {
        let mut members = match &self.fingers {
            Some(sym) => {
                let row = tables.base_symbol(sym).ok_or_else(|| HandshapeError::lookup("base symbol", sym.as_str()))?;
                members_from_codes(&row.fingers)?.into_iter().collect()
            }
            None => Vec::new(),
        };
        if self.thumb {
            members.push(Digit::Thumb);
        }
        Ok(members)
    }

    fn to_group(&self, role: Role, tables: &NotationTables) -> Result<FingerGroup> {
        let symbol = self.joint.as_deref().unwrap_or(EMPTY_SYMBOL);
        let joints = tables.joint_code(role, symbol)
            .ok_or_else(|| HandshapeError::lookup("joint symbol", symbol))?;
        let abduction = match &self.abduction {
            Some(sym) => Some(
                tables.abduction_code(role, sym)
                    .ok_or_else(|| HandshapeError::lookup("abduction symbol", sym.as_str()))?
                    .abduction
                    .clone(),
            ),
            None => None,
        };
        Ok(FingerGroup::new(self.members(tables)?, joints.mcp.clone(), joints.pip.clone(), abduction))
    }
}

impl NonSelectedSegment {
    fn parse(segment: &str, tables: &NotationTables) -> Result<Self> {
        if segment.is_empty() {
            return Err(HandshapeError::Notation(format!("empty {} segment", Role::NonSelected.describe())));
        }
        let mut cur = Cursor::new(segment);
        let joint = cur.advance_if(|c| {
            let sym = c.to_string();
            tables.joint_code(Role::NonSelected, &sym).map(|_| sym)
        });
        let rest = cur.rest();
        if !rest.is_empty() {
            return Err(HandshapeError::Notation(format!(
                "unknown joint symbol or unparsed '{rest}' in the nonselected finger substring"
            )));
        }
        Ok(Self { joint })
    }

    fn is_symbol(segment: &str, tables: &NotationTables) -> bool {
        tables.joint_code(Role::NonSelected, segment).is_some()
    }
}

impl PmHandshape {
    pub fn parse(input: &str, tables: &NotationTables) -> Result<Self> {
        let mut segments = input.split(';');
        let first = segments.next().unwrap_or_default();
        let selected = SelectedSegment::parse(first, Role::Selected, tables)?;

        let (secondary, non_selected) = match segments.next() {
            None => (None, None),
            Some(seg) if NonSelectedSegment::is_symbol(seg, tables) => {
                (None, Some(NonSelectedSegment::parse(seg, tables)?))
            }
            Some(seg) => {
                let ssf = SelectedSegment::parse(seg, Role::SecondarySelected, tables)?;
                let nsf = segments.next().map(|s| NonSelectedSegment::parse(s, tables)).transpose()?;
                (Some(ssf), nsf)
            }
        };

        let left: Vec<&str> = segments.collect();
        if !left.is_empty() {
            return Err(HandshapeError::Notation(format!("unparsed segments left: '{}'", left.join(";"))));
        }
        let pm = Self { selected, secondary, non_selected };
        tracing::debug!(input, parsed = %pm, "parsed prosodic-model handshape");
        Ok(pm)
    }

    /// Translates the notation into an articulatory-model handshape.
    ///
    /// Opposition comes from the selected segment (unopposed only when marked with
    /// '-'); a marked secondary segment overrides it.
    pub fn to_am_handshape(&self, tables: &NotationTables) -> Result<Handshape> {
        let selected = self.selected.to_group(Role::Selected, tables)?;
        let secondary = self.secondary.as_ref()
            .map(|seg| seg.to_group(Role::SecondarySelected, tables))
            .transpose()?;

        let mut unopposed = self.selected.unopposed;
        if self.secondary.as_ref().is_some_and(|seg| seg.unopposed) {
            unopposed = true;
        }
        let opposition = if unopposed { "unopposed" } else { "opposed" };

        let nsf_joints = match self.non_selected.as_ref().and_then(|n| n.joint.as_deref()) {
            Some(sym) => Some(
                tables.joint_code(Role::NonSelected, sym)
                    .ok_or_else(|| HandshapeError::lookup("nonselected joint symbol", sym))?
                    .mcp
                    .clone(),
            ),
            None => None,
        };

        Handshape::new(selected, secondary, Some(opposition.to_string()), nsf_joints)
    }
}

impl fmt::Display for SelectedSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(base) = &self.fingers { f.write_str(base)?; }
        if self.thumb { write!(f, "{THUMB_MARK}")?; }
        if self.unopposed { write!(f, "{UNOPPOSED_MARK}")?; }
        if let Some(abd) = &self.abduction { f.write_str(abd)?; }
        if let Some(joint) = &self.joint { f.write_str(joint)?; }
        Ok(())
    }
}

impl fmt::Display for PmHandshape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selected)?;
        if let Some(ssf) = &self.secondary { write!(f, ";{ssf}")?; }
        if let Some(nsf) = &self.non_selected {
            write!(f, ";{}", nsf.joint.as_deref().unwrap_or(""))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> NotationTables {
        NotationTables::embedded().unwrap()
    }

    #[test]
    fn index_with_closed_non_selected() {
        let t = tables();
        let pm = PmHandshape::parse("1;#", &t).unwrap();
        assert_eq!(pm.selected.fingers.as_deref(), Some("1"));
        assert!(pm.secondary.is_none());
        assert_eq!(pm.non_selected.as_ref().unwrap().joint.as_deref(), Some("#"));

        let hs = pm.to_am_handshape(&t).unwrap();
        assert_eq!(hs.selected().members().iter().copied().collect::<Vec<_>>(), vec![Digit::Index]);
        assert_eq!(hs.selected().mcp(), "ext");
        let nsf = hs.non_selected().unwrap();
        assert_eq!(nsf.joints(), Some("flex"));
        assert_eq!(nsf.members().len(), 4);
    }

    #[test]
    fn thumb_and_joint_fields_without_leftovers() {
        let t = tables();
        let pm = PmHandshape::parse("DT@;/", &t).unwrap();
        assert_eq!(pm.selected.fingers.as_deref(), Some("D"));
        assert!(pm.selected.thumb);
        assert!(!pm.selected.unopposed);
        assert_eq!(pm.selected.abduction, None);
        assert_eq!(pm.selected.joint.as_deref(), Some("@"));
        assert_eq!(pm.non_selected.unwrap().joint.as_deref(), Some("/"));
    }

    #[test]
    fn every_field_in_order() {
        let t = tables();
        let seg = SelectedSegment::parse("1T-^x", Role::Selected, &t).unwrap();
        assert!(seg.thumb && seg.unopposed);
        assert_eq!(seg.abduction.as_deref(), Some("^"));
        assert_eq!(seg.joint.as_deref(), Some("x"));
    }

    #[test]
    fn unmatched_character_is_offered_to_later_fields() {
        let t = tables();
        // 'c' is neither thumb, opposition nor abduction; the joint field takes it.
        let seg = SelectedSegment::parse("Bc", Role::Selected, &t).unwrap();
        assert!(!seg.thumb && !seg.unopposed);
        assert_eq!(seg.abduction, None);
        assert_eq!(seg.joint.as_deref(), Some("c"));
    }

    #[test]
    fn thumb_only_segment_keeps_the_t() {
        let t = tables();
        let pm = PmHandshape::parse("T-;#", &t).unwrap();
        assert_eq!(pm.selected.fingers, None);
        assert!(pm.selected.thumb && pm.selected.unopposed);
        let hs = pm.to_am_handshape(&t).unwrap();
        assert_eq!(hs.selected().members().iter().copied().collect::<Vec<_>>(), vec![Digit::Thumb]);
        assert_eq!(hs.thumb(), Some("unopposed"));
    }

    #[test]
    fn lowercase_base_symbols_are_accepted() {
        let t = tables();
        assert_eq!(PmHandshape::parse("b;#", &t).unwrap().selected.fingers.as_deref(), Some("B"));
    }

    #[test]
    fn secondary_segment_and_trailing_non_selected() {
        let t = tables();
        let pm = PmHandshape::parse("F^;1T@;#", &t).unwrap();
        let ssf = pm.secondary.as_ref().unwrap();
        assert!(ssf.thumb);
        assert_eq!(ssf.joint.as_deref(), Some("@"));
        let hs = pm.to_am_handshape(&t).unwrap();
        assert_eq!(hs.selected().abduction(), Some("abducted"));
        assert_eq!(hs.secondary().unwrap().pip(), "flex");
        assert!(hs.non_selected().is_none());
    }

    #[test]
    fn secondary_unopposed_mark_overrides() {
        let t = tables();
        // 'U' and '1' share the index finger.
        let overlap = PmHandshape::parse("U;1T-", &t).unwrap();
        assert!(matches!(overlap.to_am_handshape(&t), Err(HandshapeError::Digit(_))));
        let hs = PmHandshape::parse("I;1T-", &t).unwrap().to_am_handshape(&t).unwrap();
        assert_eq!(hs.thumb(), Some("unopposed"));
    }

    #[test]
    fn malformed_strings_are_notation_errors() {
        let t = tables();
        for bad in ["", "Q", "1Tk", "1;#;#", "1;U;#;#", "1;Uxx", "1;", "1;U;", "B^^"] {
            let err = PmHandshape::parse(bad, &t).unwrap_err();
            assert!(matches!(err, HandshapeError::Notation(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn display_round_trips_the_input() {
        let t = tables();
        for input in ["1;#", "DT@;/", "F^;1T@", "IT-^;#"] {
            assert_eq!(PmHandshape::parse(input, &t).unwrap().to_string(), input);
        }
    }
}
