//! Spelling tables mapping old-library names to mp-units expressions.
//!
//! Every list is ordered: earlier entries are rewritten first, which matters
//! when one literal suffix is a prefix of another (`_mps` / `_mps_sq`).

use crate::buffer::is_ident;
use crate::error::{Result, RewriteError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which header a rewritten symbol needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Available through the base units include
    Base,

    /// US customary units, gated behind the extra include
    Usc,
}

/// One old spelling and its replacement expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub old: String,
    pub new: String,
}

/// Entries that all belong to one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub tier: Tier,
    pub entries: Vec<SymbolEntry>,
}

/// A unit object spelled by name (`meter` / `meters`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareUnit {
    pub singular: String,
    pub plural: String,
    pub unit: String,
}

/// Namespace-relative rename, optionally reported to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub old: String,
    pub new: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// All the spellings the rewrite passes know about.
///
/// Sections missing from a TOML override keep their built-in contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSymbolTable {
    /// `<ns>{old}_t` type templates, per tier
    pub types: Vec<TierTable>,

    /// `_{old}` literal suffixes, per tier
    pub literals: Vec<TierTable>,

    /// `<ns>{name}` unit objects
    pub units: Vec<BareUnit>,

    /// `<ns>{old}` function renames, applied in order
    pub functions: Vec<Rename>,

    /// `<ns>{old}` concept and trait renames
    pub concepts: Vec<Rename>,

    /// Literal text replacements run after everything else
    pub simplifications: Vec<SymbolEntry>,
}

const BASE_TYPES: &[(&str, &str)] = &[
    ("scalar", "mp::one"),
    ("meter", "mp::m"),
    ("degree", "mp::deg"),
    ("radian", "mp::rad"),
    ("turn", "mp::rev"),
    ("second", "mp::s"),
    ("millisecond", "mp::ms"),
    ("microsecond", "mp::µs"),
    ("nanosecond", "mp::ns"),
    ("kilogram", "mp::kg"),
    ("volt", "mp::V"),
    ("ampere", "mp::A"),
    ("ohm", "mp::ohm"),
    ("hertz", "mp::Hz"),
    ("square_meter", "mp::m2"),
    ("meters_per_second", "mp::m / mp::s"),
    ("meters_per_second_squared", "mp::m / mp::s2"),
    ("radians_per_second", "mp::rad / mp::s"),
    ("degrees_per_second", "mp::deg / mp::s"),
    ("turns_per_second", "mp::rev / mp::s"),
    ("revolutions_per_minute", "mp::rev / mp::min"),
    ("radians_per_second_squared", "mp::rad / mp::s2"),
    ("turns_per_second_squared", "mp::rev / mp::s2"),
    ("curvature", "mp::rad / mp::m"),
    ("newton_meter", "mp::N * mp::m"),
    ("kilogram_square_meter", "mp::kg * mp::m2"),
];

const USC_TYPES: &[(&str, &str)] = &[("pounds_per_square_inch", "mp::lb / mp::in / mp::in")];

const BASE_LITERALS: &[(&str, &str)] = &[
    ("m", "mp::m"),
    ("cm", "mp::cm"),
    ("mm", "mp::mm"),
    ("s", "mp::s"),
    ("ms", "mp::ms"),
    ("us", "mp::µs"),
    ("rad", "mp::rad"),
    ("deg", "mp::deg"),
    ("tr", "mp::rev"),
    ("kg", "mp::kg"),
    ("V", "mp::V"),
    ("A", "mp::A"),
    ("Hz", "mp::Hz"),
    ("Ohm", "mp::ohm"),
    ("mps", "mp::m / mp::s"),
    ("mps_sq", "mp::m / mp::s2"),
    ("rad_per_s", "mp::rad / mp::s"),
    ("tps", "mp::rev / mp::s"),
    ("rad_per_s_sq", "mp::rad / mp::s2"),
    ("deg_per_s", "mp::deg / mp::s"),
    ("deg_per_s_sq", "mp::deg / mp::s2"),
    ("rev_per_m_per_s", "mp::rev / mp::min / mp::s"),
    ("rpm", "mp::rev / mp::min"),
    ("Nm", "mp::N * mp::m"),
    ("kg_sq_m", "mp::kg * mp::m2"),
];

const USC_LITERALS: &[(&str, &str)] = &[
    ("ft", "mp::ft"),
    ("in", "mp::in"),
    ("lb", "mp::lb"),
    ("fps", "mp::ft / mp::s"),
    ("fps_sq", "mp::ft / mp::s2"),
    ("psi", "mp::lb / mp::in / mp::in"),
];

const BARE_UNITS: &[(&str, &str, &str)] = &[
    ("scalar", "scalar", "mp::one"),
    ("meter", "meters", "mp::m"),
    ("centimeter", "centimeters", "mp::cm"),
    ("radian", "radians", "mp::rad"),
    ("degree", "degrees", "mp::deg"),
    ("second", "seconds", "mp::s"),
    ("volt", "volts", "mp::V"),
    ("ampere", "amperes", "mp::A"),
    ("radian_per_second", "radians_per_second", "mp::rad / mp::s"),
];

const ALGORITHM_NOTICE: &str = "<algorithm> include may need to be added";

fn entries(pairs: &[(&str, &str)]) -> Vec<SymbolEntry> {
    pairs
        .iter()
        .map(|(old, new)| SymbolEntry {
            old: (*old).to_string(),
            new: (*new).to_string(),
        })
        .collect()
}

fn rename(old: &str, new: &str, notice: Option<&str>) -> Rename {
    Rename {
        old: old.to_string(),
        new: new.to_string(),
        notice: notice.map(str::to_string),
    }
}

impl Default for UnitSymbolTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl UnitSymbolTable {
    /// The standard migration tables
    pub fn builtin() -> Self {
        Self {
            types: vec![
                TierTable {
                    tier: Tier::Base,
                    entries: entries(BASE_TYPES),
                },
                TierTable {
                    tier: Tier::Usc,
                    entries: entries(USC_TYPES),
                },
            ],
            literals: vec![
                TierTable {
                    tier: Tier::Base,
                    entries: entries(BASE_LITERALS),
                },
                TierTable {
                    tier: Tier::Usc,
                    entries: entries(USC_LITERALS),
                },
            ],
            units: BARE_UNITS
                .iter()
                .map(|(singular, plural, unit)| BareUnit {
                    singular: (*singular).to_string(),
                    plural: (*plural).to_string(),
                    unit: (*unit).to_string(),
                })
                .collect(),
            functions: vec![
                rename("math::max", "std::max", Some(ALGORITHM_NOTICE)),
                rename("math::min", "std::min", Some(ALGORITHM_NOTICE)),
                rename("math", "mp", None),
            ],
            concepts: vec![
                rename("angle_unit auto", "mp::QuantityOf<mp::angle> auto", None),
                rename("traits::is_unit_t_v", "mp::Quantity", None),
            ],
            simplifications: entries(&[("/ mp::s / mp::s", "/ mp::s2")]),
        }
    }

    /// Parse a TOML override; absent sections fall back to the built-in tables
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: Self =
            toml::from_str(text).map_err(|e| RewriteError::InvalidSymbols(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Load a TOML override from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loaded symbol table from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Every literal suffix regardless of tier
    pub fn all_literals(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.literals.iter().flat_map(|table| table.entries.iter())
    }

    pub fn validate(&self) -> Result<()> {
        for table in self.types.iter().chain(&self.literals) {
            for entry in &table.entries {
                if entry.old.is_empty() || !entry.old.bytes().all(is_ident) {
                    return Err(RewriteError::InvalidSymbols(format!(
                        "{:?} is not an identifier",
                        entry.old
                    )));
                }
                if entry.new.trim().is_empty() {
                    return Err(RewriteError::InvalidSymbols(format!(
                        "{:?} has an empty replacement",
                        entry.old
                    )));
                }
            }
        }

        for unit in &self.units {
            if unit.singular.is_empty() || unit.plural.is_empty() {
                return Err(RewriteError::InvalidSymbols(format!(
                    "bare unit {:?} needs both spellings",
                    unit.unit
                )));
            }
        }

        let mut renames = self.functions.iter().chain(&self.concepts);
        if let Some(empty) = renames.find(|r| r.old.is_empty()) {
            return Err(RewriteError::InvalidSymbols(format!(
                "rename to {:?} has an empty source",
                empty.new
            )));
        }

        if self.simplifications.iter().any(|s| s.old.is_empty()) {
            return Err(RewriteError::InvalidSymbols(
                "simplification with an empty pattern".to_string(),
            ));
        }

        Ok(())
    }
}
