//! Core types for circuit representation.

use std::fmt;

/// Integer grid coordinates of a junction point.
///
/// Coordinates are the identity key of a node: at most one node exists per
/// point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Stable handle of a node in the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Stable handle of a component owned by a circuit.
///
/// Unlike positional indices, handles survive the removal of other
/// components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Identifier of one propagation wave.
///
/// Every voltage-affecting event starts a new wave; a pass-through component
/// forwards at most once per wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveId(pub u64);

impl fmt::Display for WaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// Stable per-variant tag, used for lookups and by presentation layers to
/// decide how to draw a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Ground,
    Wire,
    Resistor,
    Switch,
    DcVoltage,
    Clock,
}

impl ComponentKind {
    /// All variants, in display order.
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Ground,
        ComponentKind::Wire,
        ComponentKind::Resistor,
        ComponentKind::Switch,
        ComponentKind::DcVoltage,
        ComponentKind::Clock,
    ];

    /// The string tag of this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Ground => "ground",
            ComponentKind::Wire => "wire",
            ComponentKind::Resistor => "resistor",
            ComponentKind::Switch => "switch",
            ComponentKind::DcVoltage => "voltage",
            ComponentKind::Clock => "clock",
        }
    }

    /// Human-readable variant name used in display names ("Resistor 3").
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentKind::Ground => "Ground",
            ComponentKind::Wire => "Wire",
            ComponentKind::Resistor => "Resistor",
            ComponentKind::Switch => "Switch",
            ComponentKind::DcVoltage => "DCVoltage",
            ComponentKind::Clock => "Clock",
        }
    }

    /// Parse a string tag back into a variant.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    /// Number of terminal slots for this variant.
    pub fn terminal_count(&self) -> usize {
        match self {
            ComponentKind::Ground => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare two voltages within `tolerance`.
pub fn voltages_equal(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ComponentKind::from_tag("capacitor"), None);
    }

    #[test]
    fn test_voltages_equal_tolerance() {
        assert!(voltages_equal(5.0, 5.000_009, 1e-5));
        assert!(!voltages_equal(5.0, 5.000_02, 1e-5));
    }

    #[test]
    fn test_point_display() {
        assert_eq!(Point::new(-1, 4).to_string(), "(-1, 4)");
    }
}
