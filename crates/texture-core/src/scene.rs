//! Render snapshot handed to the rendering surface.
//!
//! All geometry is already projected to surface pixels. Grid lines, ticks
//! and crosshairs are built from (possibly partial) compositions pushed
//! through the forward mapping.

use serde::Serialize;

use crate::classifier::TextureClass;
use crate::composition::{Axis, Composition};
use crate::config::DiagramConfig;
use crate::controller::DiagramState;
use crate::geometry::{ScreenPoint, Triangle};
use crate::regions::{colors_for, Color, RegionColors, REGIONS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub axis: Axis,
    pub from: ScreenPoint,
    pub to: ScreenPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub axis: Axis,
    pub percent: u32,
    /// On the triangle edge.
    pub from: ScreenPoint,
    /// Outside the triangle; labels go here.
    pub to: ScreenPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionShape {
    pub class: TextureClass,
    pub points: Vec<ScreenPoint>,
    pub label_at: ScreenPoint,
    pub fill: Color,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisControl {
    pub axis: Axis,
    pub label: &'static str,
    pub color: Color,
    pub value: f64,
    pub input: String,
    pub locked: bool,
    pub slider_enabled: bool,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub composition: Composition,
    pub class: TextureClass,
    pub colors: RegionColors,
    pub triangle: Triangle,
    pub grid: Vec<Segment>,
    pub ticks: Vec<Tick>,
    pub regions: Vec<RegionShape>,
    pub dot: ScreenPoint,
    /// Clay, silt, sand reading lines from the dot to the edges.
    pub crosshairs: [Segment; 3],
    pub controls: [AxisControl; 3],
    pub dragging: bool,
}

// ── Construction ──────────────────────────────────────────────────────────────

/// Point where a reading line for `axis` at fraction `f` meets its edge.
/// Clay is read on the left edge, silt on the right edge, sand on the base.
fn edge_point(axis: Axis, f: f64) -> Composition {
    match axis {
        Axis::Clay => Composition::new(f, 0.0, 1.0 - f),
        Axis::Silt => Composition::new(1.0 - f, f, 0.0),
        Axis::Sand => Composition::new(0.0, 1.0 - f, f),
    }
}

/// Constant-`axis` line at fraction `f`, edge to edge.
fn grid_line(tri: &Triangle, axis: Axis, f: f64) -> Segment {
    let (a, b) = match axis {
        Axis::Clay => (Composition::new(f, 0.0, 1.0 - f), Composition::new(f, 1.0 - f, 0.0)),
        Axis::Silt => (Composition::new(0.0, f, 1.0 - f), Composition::new(1.0 - f, f, 0.0)),
        Axis::Sand => (Composition::new(0.0, 1.0 - f, f), Composition::new(1.0 - f, 0.0, f)),
    };
    Segment { axis, from: tri.forward(a), to: tri.forward(b) }
}

/// Tick continuing the reading line for `axis` past its edge by `len`.
fn tick(tri: &Triangle, axis: Axis, f: f64, len: f64, percent: u32) -> Tick {
    let on_edge = edge_point(axis, f);
    let beyond = match axis {
        Axis::Clay => Composition::new(f, -len, 1.0 - f + len),
        Axis::Silt => Composition::new(1.0 - f + len, f, -len),
        Axis::Sand => Composition::new(-len, 1.0 - f + len, f),
    };
    Tick { axis, percent, from: tri.forward(on_edge), to: tri.forward(beyond) }
}

pub fn grid_lines(config: &DiagramConfig) -> Vec<Segment> {
    let tri = config.triangle();
    let n = config.grid_divisions();
    (1..n)
        .flat_map(|i| {
            let f = i as f64 / n as f64;
            Axis::ALL.map(|axis| grid_line(&tri, axis, f))
        })
        .collect()
}

pub fn ticks(config: &DiagramConfig) -> Vec<Tick> {
    let tri = config.triangle();
    let n = config.grid_divisions();
    (0..=n)
        .flat_map(|i| {
            let f = i as f64 / n as f64;
            let percent = (f * 100.0).round() as u32;
            Axis::ALL.map(|axis| tick(&tri, axis, f, config.tick_length, percent))
        })
        .collect()
}

pub fn crosshairs(tri: &Triangle, c: Composition) -> [Segment; 3] {
    let dot = tri.forward(c);
    Axis::ALL.map(|axis| Segment {
        axis,
        from: dot,
        to: tri.forward(edge_point(axis, c.get(axis))),
    })
}

pub fn region_shapes(tri: &Triangle, current: TextureClass) -> Vec<RegionShape> {
    REGIONS
        .iter()
        .map(|r| {
            let highlighted = r.class == current;
            RegionShape {
                class: r.class,
                points: r.polygon().into_iter().map(|v| tri.forward(v)).collect(),
                label_at: tri.forward(r.centroid()),
                fill: if highlighted { r.colors.highlight } else { r.colors.base },
                highlighted,
            }
        })
        .collect()
}

pub fn build_scene(config: &DiagramConfig, state: &DiagramState) -> Scene {
    let tri = Triangle::new(state.center, state.size);
    let class = state.class();
    let c = state.composition;

    Scene {
        composition: c,
        class,
        colors: colors_for(class),
        triangle: tri,
        grid: grid_lines(config),
        ticks: ticks(config),
        regions: region_shapes(&tri, class),
        dot: tri.forward(c),
        crosshairs: crosshairs(&tri, c),
        controls: Axis::ALL.map(|axis| AxisControl {
            axis,
            label: axis.label(),
            color: axis.info().color,
            value: c.get(axis),
            input: state.input(axis).to_string(),
            locked: state.locks.is_locked(axis),
            slider_enabled: state.slider_enabled(axis),
        }),
        dragging: state.dragging,
    }
}
