use serde::{Deserialize, Serialize};

use super::Coords;

/// GeoJSON geometry, opaque apart from its coordinate arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coords>,
    /// Members of a `GeometryCollection`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometries: Option<Vec<Geometry>>,
}

impl Geometry {
    pub fn new(ty: impl Into<String>, coordinates: Coords) -> Self {
        Self { ty: ty.into(), coordinates: Some(coordinates), geometries: None }
    }

    /// Copy of this geometry with every coordinate rounded to six decimals.
    pub fn rounded(&self) -> Self {
        Self {
            ty: self.ty.clone(),
            coordinates: self.coordinates.as_ref().map(Coords::rounded),
            geometries: self.geometries.as_ref()
                .map(|members| members.iter().map(Geometry::rounded).collect()),
        }
    }
}
