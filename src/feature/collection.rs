use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};
use serde_json::Value;

use crate::{geom::Geometry, io::FormatError};
use super::Properties;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureTag { Feature }

/// One geographic record: a geometry plus its property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    tag: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Properties) -> Self {
        Self { tag: FeatureTag::Feature, id: None, geometry, properties }
    }

    /// Same feature with a replaced property bag; geometry and id are kept.
    pub fn with_properties(&self, properties: Properties) -> Self {
        Self { tag: FeatureTag::Feature, id: self.id.clone(), geometry: self.geometry.clone(), properties }
    }

    /// Same feature with coordinates rounded to six decimals.
    pub fn rounded(&self) -> Self {
        Self { geometry: self.geometry.as_ref().map(Geometry::rounded), ..self.clone() }
    }
}

/// Ordered sequence of features sharing one property schema.
///
/// Order is meaningful: after priority scoring it is the adoption order, and it
/// is preserved through serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self { Self { features } }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> { self.features.iter() }

    /// Build from parsed JSON.
    ///
    /// The top level must be `{"type": "FeatureCollection", "features": [...]}`.
    /// Individual features that fail to parse are skipped with a warning so one
    /// bad record cannot take the whole layer down.
    pub fn from_value(value: Value) -> Result<Self, FormatError> {
        let Value::Object(mut obj) = value else {
            return Err(FormatError::NotFeatureCollection { found: "non-object".into() });
        };
        match obj.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {}
            other => return Err(FormatError::NotFeatureCollection {
                found: other.unwrap_or("missing").to_string(),
            }),
        }
        let Some(Value::Array(raw)) = obj.remove("features") else {
            return Err(FormatError::MissingFeatures);
        };

        let features = raw.into_iter().enumerate()
            .filter_map(|(i, raw)| match serde_json::from_value::<Feature>(raw) {
                Ok(feature) => Some(feature),
                Err(e) => {
                    tracing::warn!(index = i, error = %e, "skipping malformed feature");
                    None
                }
            })
            .collect();

        Ok(Self { features })
    }

    /// Stable sort by the given key.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Feature, &Feature) -> std::cmp::Ordering,
    {
        self.features.sort_by(compare);
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self { features: iter.into_iter().collect() }
    }
}

impl Serialize for FeatureCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FeatureCollection", 2)?;
        s.serialize_field("type", "FeatureCollection")?;
        s.serialize_field("features", &self.features)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_wrong_type() {
        let err = FeatureCollection::from_value(json!({"type": "Feature", "features": []})).unwrap_err();
        assert!(matches!(err, FormatError::NotFeatureCollection { ref found } if found == "Feature"));
        assert!(FeatureCollection::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn rejects_missing_features() {
        let err = FeatureCollection::from_value(json!({"type": "FeatureCollection"})).unwrap_err();
        assert!(matches!(err, FormatError::MissingFeatures));
        let err = FeatureCollection::from_value(json!({"type": "FeatureCollection", "features": {}})).unwrap_err();
        assert!(matches!(err, FormatError::MissingFeatures));
    }

    #[test]
    fn skips_malformed_features() {
        let fc = FeatureCollection::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null, "properties": {"id": "a"}},
                {"type": "NotAFeature"},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]}, "properties": null}
            ]
        })).unwrap();
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].properties.text("id"), Some("a"));
        assert!(fc.features[1].properties.is_empty());
    }

    #[test]
    fn drops_extra_members_on_write() {
        let fc = FeatureCollection::from_value(json!({
            "type": "FeatureCollection",
            "name": "Chico",
            "crs": {"type": "name"},
            "features": [{"type": "Feature", "geometry": null, "properties": {"a": 1}}]
        })).unwrap();
        assert_eq!(
            serde_json::to_string(&fc).unwrap(),
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null,"properties":{"a":1}}]}"#
        );
    }
}
