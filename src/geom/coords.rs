use serde::{Deserialize, Serialize};

use crate::common::round_half_up;

/// Number of decimal places kept on x/y after normalization (~0.11 m at mid-latitudes).
pub const COORD_PRECISION: i32 = 6;

/// Arbitrarily nested GeoJSON coordinate array.
///
/// A `Position` is the leaf level (`[x, y]` or `[x, y, z]`); every other level
/// is `Nested`. Nesting depth depends on the geometry type and is never fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coords {
    Position(Vec<f64>),
    Nested(Vec<Coords>),
}

impl Coords {
    /// Depth of nesting above the position level (0 for a point).
    pub fn depth(&self) -> usize {
        match self {
            Coords::Position(_) => 0,
            Coords::Nested(children) => 1 + children.first().map_or(0, Coords::depth),
        }
    }

    /// Total number of positions.
    pub fn num_positions(&self) -> usize {
        match self {
            Coords::Position(_) => 1,
            Coords::Nested(children) => children.iter().map(Coords::num_positions).sum(),
        }
    }

    /// Round to [`COORD_PRECISION`] decimals. See [`round_coordinates`].
    pub fn rounded(&self) -> Coords { round_coordinates(self) }
}

/// Round x and y of every position to six decimal places.
///
/// Any further ordinates (elevation, measure) pass through untouched. The
/// output has exactly the same nesting as the input; rounding an already
/// rounded array is a no-op.
pub fn round_coordinates(coords: &Coords) -> Coords {
    let scale = 10f64.powi(COORD_PRECISION);
    match coords {
        Coords::Position(position) => Coords::Position(
            position.iter().enumerate()
                .map(|(i, &c)| if i < 2 { round_half_up(c * scale) / scale } else { c })
                .collect()
        ),
        Coords::Nested(children) => Coords::Nested(children.iter().map(round_coordinates).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Coords { serde_json::from_str(s).unwrap() }

    #[test]
    fn point_rounds_xy_only() {
        let c = parse("[-121.83751234567, 39.72850049, 123.456789123]");
        assert_eq!(round_coordinates(&c), Coords::Position(vec![-121.837512, 39.7285, 123.456789123]));
    }

    #[test]
    fn already_rounded_is_fixed_point() {
        let c = parse("[-121.837500, 39.728500]");
        assert_eq!(round_coordinates(&c), c);

        let poly = parse("[[[-121.8375, 39.7285], [-121.8374, 39.7286], [-121.8375, 39.7285]]]");
        let once = round_coordinates(&poly);
        assert_eq!(round_coordinates(&once), once);
    }

    #[test]
    fn multipolygon_keeps_structure() {
        let mp = parse("[[[[0.1234567, 1.7654321], [2.0, 3.0], [0.1234567, 1.7654321]]], [[[5, 6], [7, 8], [5, 6]]]]");
        let rounded = round_coordinates(&mp);
        assert_eq!(rounded.depth(), 3);
        assert_eq!(rounded.num_positions(), 6);
        let Coords::Nested(polys) = &rounded else { panic!("expected nested") };
        let Coords::Nested(rings) = &polys[0] else { panic!("expected nested") };
        let Coords::Nested(ring) = &rings[0] else { panic!("expected nested") };
        assert_eq!(ring[0], Coords::Position(vec![0.123457, 1.765432]));
    }

    #[test]
    fn empty_arrays_survive() {
        let c = parse("[]");
        assert_eq!(round_coordinates(&c), c);
    }
}
