// tables.rs
// Notation symbol tables, loaded once and shared read-only.
//
// Typed rows are built from the generic string tables of json_loader.rs. Parsers
// and resolvers take `&NotationTables`; `global()` hands out one process-wide copy.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::digit::Digit;
use crate::error::{HandshapeError, Result};
use crate::joint::Joint;
use crate::json_loader::{self as loader, FromRow, Row, TableSource};

/// Key of the joint-coding row used when a segment carries no joint symbol.
pub const EMPTY_SYMBOL: &str = "empty";

/// Env var naming a directory that overrides the embedded tables.
pub const TABLES_ENV: &str = "HANDSHAPE_TABLES";

// ── Rows ──────────────────────────────────────────────────────────────────────

/// Joint feature → flexion degrees per digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlexionRow {
    pub feature: String,
    pub index: i32, pub middle: i32, pub ring: i32, pub pinky: i32, pub thumb: i32,
}

impl FromRow for FlexionRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            feature: loader::text(row, "feature")?.to_string(),
            index:  loader::degrees(row, "index")?,
            middle: loader::degrees(row, "middle")?,
            ring:   loader::degrees(row, "ring")?,
            pinky:  loader::degrees(row, "pinky")?,
            thumb:  loader::degrees(row, "thumb")?,
        })
    }
}

impl FlexionRow {
    pub fn degrees(&self, digit: Digit) -> i32 {
        match digit {
            Digit::Index => self.index, Digit::Middle => self.middle,
            Digit::Ring => self.ring,   Digit::Pinky => self.pinky,
            Digit::Thumb => self.thumb,
        }
    }
}

/// Abduction feature → MCP abduction per finger. Each finger has its own axis offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbductionRow {
    pub feature: String,
    pub index: i32, pub middle: i32, pub ring: i32, pub pinky: i32,
}

impl FromRow for AbductionRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            feature: loader::text(row, "feature")?.to_string(),
            index:  loader::degrees(row, "index")?,
            middle: loader::degrees(row, "middle")?,
            ring:   loader::degrees(row, "ring")?,
            pinky:  loader::degrees(row, "pinky")?,
        })
    }
}

impl AbductionRow {
    pub fn degrees(&self, digit: Digit) -> Option<i32> {
        match digit {
            Digit::Index => Some(self.index), Digit::Middle => Some(self.middle),
            Digit::Ring => Some(self.ring),   Digit::Pinky => Some(self.pinky),
            Digit::Thumb => None,
        }
    }
}

/// Abduction × opposition → thumb CM angles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbCmRow {
    pub abduction: String,
    pub opposition: String,
    pub flexion: Option<i32>,
    pub spread: Option<i32>,
    pub rotation: Option<i32>,
}

impl FromRow for ThumbCmRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            abduction:  loader::text(row, "abduction")?.to_string(),
            opposition: loader::text(row, "opposition")?.to_string(),
            flexion:  loader::optional_degrees(row, "flexion")?,
            spread:   loader::optional_degrees(row, "spread")?,
            rotation: loader::optional_degrees(row, "rotation")?,
        })
    }
}

impl ThumbCmRow {
    pub fn joint(&self) -> Joint {
        Joint::new(self.flexion, self.spread, self.rotation, None)
    }
}

/// Named wrist preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientationRow {
    pub orientation: String,
    pub flexion: i32, pub rotation: i32, pub pronation: i32,
}

impl FromRow for OrientationRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            orientation: loader::text(row, "orientation")?.to_string(),
            flexion:   loader::degrees(row, "flexion")?,
            rotation:  loader::degrees(row, "rotation")?,
            pronation: loader::degrees(row, "pronation")?,
        })
    }
}

impl OrientationRow {
    pub fn wrist(&self) -> Joint {
        Joint::new(Some(self.flexion), None, Some(self.rotation), Some(self.pronation))
    }
}

/// Prosodic-model base symbol → digit codes (`IMRPT`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerCodeRow {
    pub symbol: String,
    pub fingers: String,
}

impl FromRow for FingerCodeRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            symbol:  loader::text(row, "base symbol")?.to_string(),
            fingers: loader::optional(row, "fingers")?.unwrap_or_default().to_string(),
        })
    }
}

/// Prosodic-model joint symbol per role → MCP / PIP features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointCodeRow {
    pub psf: Option<String>,
    pub ssf: Option<String>,
    pub nsf: Option<String>,
    pub mcp: String,
    pub pip: String,
}

impl FromRow for JointCodeRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            psf: loader::optional(row, "psf")?.map(str::to_string),
            ssf: loader::optional(row, "ssf")?.map(str::to_string),
            nsf: loader::optional(row, "nsf")?.map(str::to_string),
            mcp: loader::text(row, "MCP")?.to_string(),
            pip: loader::text(row, "PIP")?.to_string(),
        })
    }
}

/// Prosodic-model abduction symbol per role → abduction feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbductionCodeRow {
    pub psf: Option<String>,
    pub ssf: Option<String>,
    pub abduction: String,
}

impl FromRow for AbductionCodeRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            psf: loader::optional(row, "psf")?.map(str::to_string),
            ssf: loader::optional(row, "ssf")?.map(str::to_string),
            abduction: loader::text(row, "abd")?.to_string(),
        })
    }
}

/// One fingerspelling letter in both notations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterRow {
    pub letter: String,
    pub psf_members: String,
    pub psf_mcp: String,
    pub psf_pip: String,
    pub psf_abd: String,
    pub ssf_members: Option<String>,
    pub ssf_mcp: Option<String>,
    pub ssf_pip: Option<String>,
    pub ssf_abd: Option<String>,
    pub thumb_oppos: Option<String>,
    pub nsf_joints: Option<String>,
    pub orientation: String,
    pub pm: String,
}

impl FromRow for LetterRow {
    fn from_row(row: &Row) -> Result<Self> {
        let opt = |col: &str| loader::optional(row, col).map(|v| v.map(str::to_string));
        Ok(Self {
            letter:      loader::text(row, "letter")?.to_string(),
            psf_members: loader::text(row, "psf-members")?.to_string(),
            psf_mcp:     loader::text(row, "psf-mcp")?.to_string(),
            psf_pip:     loader::text(row, "psf-pip")?.to_string(),
            psf_abd:     loader::text(row, "psf-abd")?.to_string(),
            ssf_members: opt("ssf-members")?,
            ssf_mcp:     opt("ssf-mcp")?,
            ssf_pip:     opt("ssf-pip")?,
            ssf_abd:     opt("ssf-abd")?,
            thumb_oppos: opt("thumb-oppos")?,
            nsf_joints:  opt("nsf-joints")?,
            orientation: loader::text(row, "orientation")?.to_string(),
            pm:          loader::text(row, "pm")?.to_string(),
        })
    }
}

/// Feature values used where a notation leaves a slot unmarked.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default = "default_abduction")]     pub abduction: String,
    #[serde(default = "default_opposition")]    pub opposition: String,
    #[serde(default = "default_nsf_joints")]    pub nsf_joints: String,
    #[serde(default = "default_nsf_abduction")] pub nsf_abduction: String,
    #[serde(default = "default_orientation")]   pub orientation: String,
}

fn default_abduction() -> String { "adducted".into() }
fn default_opposition() -> String { "opposed".into() }
fn default_nsf_joints() -> String { "ext".into() }
fn default_nsf_abduction() -> String { "neutralAbducted".into() }
fn default_orientation() -> String { "neutral".into() }

impl Default for Defaults {
    fn default() -> Self {
        Self {
            abduction: default_abduction(),
            opposition: default_opposition(),
            nsf_joints: default_nsf_joints(),
            nsf_abduction: default_nsf_abduction(),
            orientation: default_orientation(),
        }
    }
}

// ── Tables ────────────────────────────────────────────────────────────────────

/// Finger-group role inside a prosodic-model string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Selected,
    SecondarySelected,
    NonSelected,
}

impl Role {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Selected => "selected fingers",
            Self::SecondarySelected => "secondary selected fingers",
            Self::NonSelected => "nonselected fingers",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotationTables {
    flexion: HashMap<String, FlexionRow>,
    abduction: HashMap<String, AbductionRow>,
    thumb_cm: HashMap<(String, String), ThumbCmRow>,
    orientations: HashMap<String, OrientationRow>,
    fingers: HashMap<String, FingerCodeRow>,
    joint_codes: HashMap<(Role, String), JointCodeRow>,
    abduction_codes: HashMap<(Role, String), AbductionCodeRow>,
    letters: Vec<LetterRow>,
    letter_index: HashMap<String, usize>,
    defaults: Defaults,
}

impl NotationTables {
    pub fn embedded() -> Result<Self> {
        Self::load(&TableSource::Embedded)
    }

    pub fn from_dir(dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        Self::load(&TableSource::Dir(dir.into()))
    }

    /// Embedded tables unless `HANDSHAPE_TABLES` names a directory.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(TABLES_ENV) {
            Some(dir) if !dir.is_empty() => Self::from_dir(dir),
            _ => Self::embedded(),
        }
    }

    pub fn load(source: &TableSource) -> Result<Self> {
        let rows_of = |name: &str| -> Result<Vec<Row>> { source.load_table(name) };

        let flexion = loader::rows::<FlexionRow>(&rows_of("flexion.json")?)?
            .into_iter().map(|r| (r.feature.clone(), r)).collect();
        let abduction = loader::rows::<AbductionRow>(&rows_of("abduction.json")?)?
            .into_iter().map(|r| (r.feature.clone(), r)).collect();
        let thumb_cm = loader::rows::<ThumbCmRow>(&rows_of("thumb_cm.json")?)?
            .into_iter().map(|r| ((r.abduction.clone(), r.opposition.clone()), r)).collect();
        let orientations = loader::rows::<OrientationRow>(&rows_of("orientation.json")?)?
            .into_iter().map(|r| (r.orientation.clone(), r)).collect();
        let fingers = loader::rows::<FingerCodeRow>(&rows_of("fingerCodingKey.json")?)?
            .into_iter().map(|r| (r.symbol.clone(), r)).collect();

        let mut joint_codes = HashMap::new();
        for row in loader::rows::<JointCodeRow>(&rows_of("jointCodingKey.json")?)? {
            for (role, symbol) in [(Role::Selected, &row.psf), (Role::SecondarySelected, &row.ssf), (Role::NonSelected, &row.nsf)] {
                if let Some(symbol) = symbol {
                    joint_codes.insert((role, symbol.clone()), row.clone());
                }
            }
        }

        let mut abduction_codes = HashMap::new();
        for row in loader::rows::<AbductionCodeRow>(&rows_of("abdCodingKey.json")?)? {
            for (role, symbol) in [(Role::Selected, &row.psf), (Role::SecondarySelected, &row.ssf)] {
                if let Some(symbol) = symbol {
                    abduction_codes.insert((role, symbol.clone()), row.clone());
                }
            }
        }

        let letters = loader::rows::<LetterRow>(&rows_of("letters.json")?)?;
        let letter_index = letters.iter().enumerate().map(|(i, r)| (r.letter.clone(), i)).collect();
        let defaults: Defaults = source.load("defaults.json")?;

        let tables = Self {
            flexion, abduction, thumb_cm, orientations, fingers,
            joint_codes, abduction_codes, letters, letter_index, defaults,
        };
        tracing::debug!(
            letters = tables.letters.len(),
            base_symbols = tables.fingers.len(),
            "notation tables loaded"
        );
        Ok(tables)
    }

    pub fn defaults(&self) -> &Defaults { &self.defaults }

    pub fn flexion(&self, feature: &str, digit: Digit) -> Result<i32> {
        self.flexion.get(feature)
            .map(|row| row.degrees(digit))
            .ok_or_else(|| HandshapeError::lookup("joint feature", feature))
    }

    pub fn abduction(&self, feature: &str, digit: Digit) -> Result<i32> {
        let row = self.abduction.get(feature)
            .ok_or_else(|| HandshapeError::lookup("abduction feature", feature))?;
        row.degrees(digit)
            .ok_or_else(|| HandshapeError::lookup("finger abduction", format!("{feature}/{digit}")))
    }

    pub fn thumb_cm(&self, abduction: &str, opposition: &str) -> Result<Joint> {
        self.thumb_cm.get(&(abduction.to_string(), opposition.to_string()))
            .map(ThumbCmRow::joint)
            .ok_or_else(|| HandshapeError::lookup("thumb abduction/opposition", format!("{abduction}/{opposition}")))
    }

    pub fn orientation(&self, name: &str) -> Result<Joint> {
        self.orientations.get(name)
            .map(OrientationRow::wrist)
            .ok_or_else(|| HandshapeError::lookup("orientation", name))
    }

    pub fn base_symbol(&self, symbol: &str) -> Option<&FingerCodeRow> {
        self.fingers.get(symbol)
    }

    pub fn joint_code(&self, role: Role, symbol: &str) -> Option<&JointCodeRow> {
        self.joint_codes.get(&(role, symbol.to_string()))
    }

    pub fn abduction_code(&self, role: Role, symbol: &str) -> Option<&AbductionCodeRow> {
        self.abduction_codes.get(&(role, symbol.to_string()))
    }

    pub fn letter(&self, letter: &str) -> Result<&LetterRow> {
        self.letter_index.get(letter)
            .map(|&i| &self.letters[i])
            .ok_or_else(|| HandshapeError::lookup("letter", letter))
    }

    /// Letters in table order.
    pub fn letters(&self) -> &[LetterRow] { &self.letters }
}

static TABLES: OnceLock<NotationTables> = OnceLock::new();

/// Installs the process-wide tables. Fails if they were already set.
pub fn install(tables: NotationTables) -> Result<&'static NotationTables> {
    TABLES.set(tables)
        .map_err(|_| HandshapeError::Specification("notation tables are already installed".into()))?;
    global()
}

/// Process-wide tables; loads them from the environment on first use.
pub fn global() -> Result<&'static NotationTables> {
    if let Some(tables) = TABLES.get() {
        return Ok(tables);
    }
    let loaded = NotationTables::from_env()?;
    Ok(TABLES.get_or_init(|| loaded))
}
