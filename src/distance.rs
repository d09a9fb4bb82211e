// distance.rs
// Letter-to-letter distances and contour costs.

use core::fmt;
use std::str::FromStr;

use crate::error::{HandshapeError, Result};
use crate::hand::{ArmConfiguration, ArmDelta};
use crate::letters::letter_to_arm;
use crate::tables::NotationTables;

/// How a configuration delta is reduced to one number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Sum of absolute degree differences.
    #[default]
    Unweighted,
    /// Same sum with each joint scaled by its anatomical weight.
    Weighted,
}

impl Method {
    pub fn reduce(self, delta: &ArmDelta) -> i32 {
        match self {
            Self::Unweighted => delta.total_degrees_different(),
            Self::Weighted => delta.weighted_degrees_different(),
        }
    }
}

impl FromStr for Method {
    type Err = HandshapeError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unweighted" => Ok(Self::Unweighted),
            "weighted" => Ok(Self::Weighted),
            other => Err(HandshapeError::Specification(format!("no recognized method '{other}' for measuring distance"))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unweighted => "unweighted",
            Self::Weighted => "weighted",
        })
    }
}

/// Cyclic n-gram windows: one window starting at every position, wrapping at the end.
pub fn cyclic_windows<T: Clone>(items: &[T], n: usize) -> Vec<Vec<T>> {
    if items.is_empty() || n == 0 {
        return Vec::new();
    }
    (0..items.len())
        .map(|start| (0..n).map(|k| items[(start + k) % items.len()].clone()).collect())
        .collect()
}

fn resolve_letter(tables: &NotationTables, letter: char) -> Result<ArmConfiguration> {
    letter_to_arm(tables, &letter.to_string())?.resolve(tables)
}

/// Distance between two single letters.
pub fn letter_distance(tables: &NotationTables, a: char, b: char, method: Method) -> Result<i32> {
    let delta = &resolve_letter(tables, a)? - &resolve_letter(tables, b)?;
    Ok(method.reduce(&delta))
}

/// Sum of distances between aligned letters of two equally long strings.
pub fn similarity(tables: &NotationTables, a: &str, b: &str, method: Method) -> Result<i32> {
    let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
    if a.len() != b.len() {
        return Err(HandshapeError::Specification(
            "the strings are not of the same length, cannot compare without some sort of editing".into(),
        ));
    }
    a.iter().zip(&b).map(|(&x, &y)| letter_distance(tables, x, y, method)).sum()
}

/// Per-pair costs between each letter and its successor, wrapping at the end.
pub fn contour_costs(tables: &NotationTables, s: &str, method: Method) -> Result<Vec<i32>> {
    let letters: Vec<char> = s.chars().collect();
    cyclic_windows(&letters, 2)
        .into_iter()
        .map(|pair| letter_distance(tables, pair[0], pair[1], method))
        .collect()
}

/// Total contour cost of a string.
pub fn measure_contour(tables: &NotationTables, s: &str, method: Method) -> Result<i32> {
    let costs = contour_costs(tables, s, method)?;
    tracing::debug!(input = s, %method, pairs = costs.len(), "measured contour");
    Ok(costs.iter().sum())
}
