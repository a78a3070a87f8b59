//! Region table: where each texture class lives in composition space.
//!
//! The polygons encode the same USDA boundaries as the classifier but are
//! authored independently. They drive fills, outlines, label anchors and the
//! legend "jump to class" centroid; class assignment always goes through
//! [`crate::classifier::classify`].

use std::fmt;

use serde::{Serialize, Serializer};

use crate::classifier::TextureClass;
use crate::composition::Composition;
use crate::error::TextureError;

// ── Colour ────────────────────────────────────────────────────────────────────

/// sRGB 8-bit colour. Serializes as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fill colours for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionColors {
    pub base: Color,
    /// Used while the current composition falls in this class.
    pub highlight: Color,
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// One texture class region: boundary vertices as (clay, silt, sand)
/// percentages plus display colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub class: TextureClass,
    pub vertices: &'static [[f64; 3]],
    pub colors: RegionColors,
}

const fn colors(base: [u8; 3], highlight: [u8; 3]) -> RegionColors {
    RegionColors {
        base: Color::new(base[0], base[1], base[2]),
        highlight: Color::new(highlight[0], highlight[1], highlight[2]),
    }
}

/// Vertices in percent, (clay, silt, sand). Adjacent regions repeat shared
/// corners so their outlines coincide.
pub static REGIONS: [Region; 12] = [
    Region {
        class: TextureClass::Clay,
        vertices: &[[100.0, 0.0, 0.0], [55.0, 0.0, 45.0], [40.0, 15.0, 45.0], [40.0, 40.0, 20.0], [60.0, 40.0, 0.0]],
        colors: colors([0xe8, 0xc4, 0x9a], [0xd9, 0x9a, 0x52]),
    },
    Region {
        class: TextureClass::SiltyClay,
        vertices: &[[60.0, 40.0, 0.0], [40.0, 40.0, 20.0], [40.0, 60.0, 0.0]],
        colors: colors([0xd8, 0xc8, 0xe8], [0xa9, 0x8c, 0xd0]),
    },
    Region {
        class: TextureClass::SandyClay,
        vertices: &[[55.0, 0.0, 45.0], [35.0, 0.0, 65.0], [35.0, 20.0, 45.0], [40.0, 15.0, 45.0]],
        colors: colors([0xf2, 0xb8, 0xb0], [0xe0, 0x7a, 0x6c]),
    },
    Region {
        class: TextureClass::SiltyClayLoam,
        vertices: &[[40.0, 40.0, 20.0], [27.0, 53.0, 20.0], [27.0, 73.0, 0.0], [40.0, 60.0, 0.0]],
        colors: colors([0xc4, 0xd8, 0xf0], [0x7e, 0xa8, 0xdc]),
    },
    Region {
        class: TextureClass::ClayLoam,
        vertices: &[[40.0, 15.0, 45.0], [27.0, 28.0, 45.0], [27.0, 50.0, 23.0], [27.0, 53.0, 20.0], [40.0, 40.0, 20.0]],
        colors: colors([0xf0, 0xd8, 0xa8], [0xdc, 0xb0, 0x5c]),
    },
    Region {
        class: TextureClass::SandyClayLoam,
        vertices: &[[35.0, 20.0, 45.0], [27.0, 28.0, 45.0], [20.0, 28.0, 52.0], [20.0, 0.0, 80.0], [35.0, 0.0, 65.0]],
        colors: colors([0xf6, 0xc8, 0xc8], [0xe6, 0x8a, 0x8a]),
    },
    Region {
        class: TextureClass::Loam,
        vertices: &[[27.0, 28.0, 45.0], [20.0, 28.0, 52.0], [7.0, 41.0, 52.0], [7.0, 50.0, 43.0], [27.0, 50.0, 23.0]],
        colors: colors([0xd4, 0xe8, 0xb8], [0x9c, 0xc8, 0x64]),
    },
    Region {
        class: TextureClass::SiltLoam,
        vertices: &[
            [27.0, 50.0, 23.0],
            [27.0, 73.0, 0.0],
            [12.0, 88.0, 0.0],
            [12.0, 80.0, 8.0],
            [0.0, 80.0, 20.0],
            [0.0, 50.0, 50.0],
            [7.0, 50.0, 43.0],
        ],
        colors: colors([0xc8, 0xe8, 0xe0], [0x78, 0xc4, 0xb4]),
    },
    Region {
        class: TextureClass::Silt,
        vertices: &[[12.0, 80.0, 8.0], [12.0, 88.0, 0.0], [0.0, 100.0, 0.0], [0.0, 80.0, 20.0]],
        colors: colors([0xd0, 0xe0, 0xf8], [0x8c, 0xb0, 0xf0]),
    },
    Region {
        class: TextureClass::Sand,
        vertices: &[[0.0, 0.0, 100.0], [10.0, 0.0, 90.0], [0.0, 15.0, 85.0]],
        colors: colors([0xfa, 0xf0, 0xc0], [0xf0, 0xd8, 0x60]),
    },
    Region {
        class: TextureClass::LoamySand,
        vertices: &[[10.0, 0.0, 90.0], [15.0, 0.0, 85.0], [0.0, 30.0, 70.0], [0.0, 15.0, 85.0]],
        colors: colors([0xf4, 0xe4, 0xc4], [0xe4, 0xbc, 0x78]),
    },
    Region {
        class: TextureClass::SandyLoam,
        vertices: &[
            [15.0, 0.0, 85.0],
            [20.0, 0.0, 80.0],
            [20.0, 28.0, 52.0],
            [7.0, 41.0, 52.0],
            [7.0, 50.0, 43.0],
            [0.0, 50.0, 50.0],
            [0.0, 30.0, 70.0],
        ],
        colors: colors([0xec, 0xdc, 0xb0], [0xd4, 0xb0, 0x5c]),
    },
];

impl Region {
    /// Boundary as compositions (fractions).
    pub fn polygon(&self) -> Vec<Composition> {
        self.vertices
            .iter()
            .map(|&[c, si, sa]| Composition::from_percent(c, si, sa))
            .collect()
    }

    /// Unweighted vertex mean, renormalized to sum to 1.
    pub fn centroid(&self) -> Composition {
        let n = self.vertices.len() as f64;
        let [c, si, sa] = self.vertices.iter().fold([0.0; 3], |acc, v| {
            [acc[0] + v[0], acc[1] + v[1], acc[2] + v[2]]
        });
        let mean = Composition::from_percent(c / n, si / n, sa / n);
        // Table vertices always sum to 100, so the total is never zero.
        mean.normalized().unwrap_or(mean)
    }
}

/// Region entry for `class`.
pub fn region(class: TextureClass) -> &'static Region {
    // REGIONS is laid out in TextureClass::ALL order.
    let idx = TextureClass::ALL
        .iter()
        .position(|&c| c == class)
        .unwrap_or_default();
    &REGIONS[idx]
}

/// Region entry for a class display name, as sent by legend clicks.
pub fn region_of(name: &str) -> Result<&'static Region, TextureError> {
    name.parse::<TextureClass>().map(region)
}

pub fn polygon_for(class: TextureClass) -> Vec<Composition> {
    region(class).polygon()
}

pub fn centroid_of(class: TextureClass) -> Composition {
    region(class).centroid()
}

pub fn colors_for(class: TextureClass) -> RegionColors {
    region(class).colors
}
