//! USDA texture classification.
//!
//! Twelve threshold rules evaluated in a fixed order; the first rule that
//! matches wins and Sandy Loam catches everything left over. Several rules
//! share boundaries, so the order is part of the definition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::composition::Composition;
use crate::error::TextureError;

/// USDA soil texture class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextureClass {
    Clay,
    SiltyClay,
    SandyClay,
    SiltyClayLoam,
    ClayLoam,
    SandyClayLoam,
    Loam,
    SiltLoam,
    Silt,
    Sand,
    LoamySand,
    SandyLoam,
}

impl TextureClass {
    /// Every class, in rule-evaluation order.
    pub const ALL: [TextureClass; 12] = [
        TextureClass::Clay,
        TextureClass::SiltyClay,
        TextureClass::SandyClay,
        TextureClass::SiltyClayLoam,
        TextureClass::ClayLoam,
        TextureClass::SandyClayLoam,
        TextureClass::Loam,
        TextureClass::SiltLoam,
        TextureClass::Silt,
        TextureClass::Sand,
        TextureClass::LoamySand,
        TextureClass::SandyLoam,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TextureClass::Clay          => "Clay",
            TextureClass::SiltyClay     => "Silty Clay",
            TextureClass::SandyClay     => "Sandy Clay",
            TextureClass::SiltyClayLoam => "Silty Clay Loam",
            TextureClass::ClayLoam      => "Clay Loam",
            TextureClass::SandyClayLoam => "Sandy Clay Loam",
            TextureClass::Loam          => "Loam",
            TextureClass::SiltLoam      => "Silt Loam",
            TextureClass::Silt          => "Silt",
            TextureClass::Sand          => "Sand",
            TextureClass::LoamySand     => "Loamy Sand",
            TextureClass::SandyLoam     => "Sandy Loam",
        }
    }
}

impl fmt::Display for TextureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts display names ("Silty Clay Loam") as well as snake/kebab forms
/// ("silty_clay_loam", "silty-clay-loam"), case-insensitively.
impl FromStr for TextureClass {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        TextureClass::ALL
            .into_iter()
            .find(|class| class.name().replace(' ', "").eq_ignore_ascii_case(&key))
            .ok_or_else(|| TextureError::UnknownClass(s.to_string()))
    }
}

impl TryFrom<String> for TextureClass {
    type Error = TextureError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TextureClass> for String {
    fn from(class: TextureClass) -> Self {
        class.name().to_string()
    }
}

// ── Rules ─────────────────────────────────────────────────────────────────────

/// Classify a composition given as three fractions summing to 1.
pub fn classify(clay: f64, silt: f64, sand: f64) -> TextureClass {
    let (c, si, sa) = (clay, silt, sand);

    if c >= 0.40 && si <= 0.40 && sa <= 0.45 {
        TextureClass::Clay
    } else if c >= 0.40 && si >= 0.40 {
        TextureClass::SiltyClay
    } else if c >= 0.35 && sa > 0.45 {
        TextureClass::SandyClay
    } else if (0.27..0.40).contains(&c) && sa <= 0.20 {
        TextureClass::SiltyClayLoam
    } else if (0.27..0.40).contains(&c) && sa > 0.20 && sa <= 0.45 {
        TextureClass::ClayLoam
    } else if (0.20..0.35).contains(&c) && si < 0.28 && sa > 0.45 {
        TextureClass::SandyClayLoam
    } else if (0.07..0.27).contains(&c) && (0.28..0.50).contains(&si) && sa < 0.52 {
        TextureClass::Loam
    } else if (si >= 0.50 && (0.12..0.27).contains(&c)) || ((0.50..0.80).contains(&si) && c < 0.12) {
        TextureClass::SiltLoam
    } else if si >= 0.80 && c < 0.12 {
        TextureClass::Silt
    } else if si + 1.5 * c < 0.15 {
        TextureClass::Sand
    } else if si + 2.0 * c < 0.30 {
        // si + 1.5c >= 0.15 holds here: the Sand rule did not match.
        TextureClass::LoamySand
    } else {
        TextureClass::SandyLoam
    }
}

/// Classify a [`Composition`].
pub fn classify_composition(c: Composition) -> TextureClass {
    classify(c.clay, c.silt, c.sand)
}
