use crate::feature::{Feature, FeatureCollection, FieldValue, Properties};
use super::{ColumnType, JoinIndex};

/// Where an output property is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    Primary(String),
    Secondary(String),
}

/// Value used when a field's source has nothing to offer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fallback {
    #[default]
    Null,
    Zero,
    Literal(FieldValue),
    /// Reuse a primary property (coerced like the field), or `default` when it is blank.
    Primary { property: String, default: FieldValue },
}

/// What an unmatched primary record receives for its secondary fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissPolicy {
    /// Secondary fields default to zero. Misses are expected and not reported.
    ZeroFill,
    /// Each field falls back to its declared [`Fallback`]; every miss is logged.
    Defaults,
}

/// One property of the merged output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputField {
    pub name: String,
    pub source: FieldSource,
    pub coerce: Option<ColumnType>,
    pub fallback: Fallback,
}

impl OutputField {
    pub fn primary(name: impl Into<String>, property: impl Into<String>) -> Self {
        Self { name: name.into(), source: FieldSource::Primary(property.into()), coerce: None, fallback: Fallback::Null }
    }

    pub fn secondary(name: impl Into<String>, property: impl Into<String>) -> Self {
        Self { name: name.into(), source: FieldSource::Secondary(property.into()), coerce: None, fallback: Fallback::Null }
    }

    pub fn coerce(mut self, ty: ColumnType) -> Self {
        self.coerce = Some(ty);
        self
    }

    pub fn or(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    fn coerced(&self, value: &FieldValue) -> FieldValue {
        self.coerce.as_ref().map_or_else(|| value.clone(), |ty| ty.coerce_value(value))
    }

    fn fallback_value(&self, primary: &Properties) -> FieldValue {
        match &self.fallback {
            Fallback::Null => FieldValue::Null,
            Fallback::Zero => FieldValue::zero(),
            Fallback::Literal(value) => value.clone(),
            Fallback::Primary { property, default } => match primary.get(property) {
                Some(value) if !value.is_blank() => self.coerced(value),
                _ => default.clone(),
            },
        }
    }

    fn resolve(&self, primary: &Properties, secondary: Option<&Properties>, policy: MissPolicy) -> FieldValue {
        match &self.source {
            FieldSource::Primary(property) => match primary.get(property) {
                Some(value) if !value.is_blank() => self.coerced(value),
                _ => self.fallback_value(primary),
            },
            FieldSource::Secondary(property) => {
                let found = secondary.and_then(|record| record.get(property));
                match (policy, found) {
                    (MissPolicy::ZeroFill, Some(value)) if !value.is_null() => self.coerced(value),
                    (MissPolicy::ZeroFill, _) => FieldValue::zero(),
                    (MissPolicy::Defaults, Some(value)) => self.coerced(value),
                    (MissPolicy::Defaults, None) if secondary.is_some() => FieldValue::Null,
                    (MissPolicy::Defaults, None) => self.fallback_value(primary),
                }
            }
        }
    }
}

/// Declaration of one merge: the primary join key, the output schema and the miss policy.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    pub primary_key: String,
    pub fields: Vec<OutputField>,
    pub policy: MissPolicy,
}

/// Outcome counts of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub matched: usize,
    /// Keys of primary records without a secondary match, in primary order.
    /// Records with no key at all appear as an empty string.
    pub unmatched: Vec<String>,
}

impl MergeReport {
    #[inline] pub fn total(&self) -> usize { self.matched + self.unmatched.len() }
}

/// Join `primary` against `secondary`.
///
/// Every primary feature yields exactly one output feature, in input order,
/// with its geometry untouched. Misses are handled per record according to
/// `spec.policy` and never abort the merge.
pub fn merge(primary: &FeatureCollection, secondary: &JoinIndex, spec: &JoinSpec) -> (FeatureCollection, MergeReport) {
    let mut report = MergeReport::default();

    let features = primary.iter().enumerate()
        .map(|(i, feature)| {
            let key = feature.properties.key(&spec.primary_key);
            let record = key.as_deref().and_then(|k| secondary.get(k));

            match (&key, record) {
                (_, Some(_)) => report.matched += 1,
                (Some(k), None) => {
                    if spec.policy == MissPolicy::Defaults {
                        tracing::warn!(key = %k, "no match for primary record");
                    } else {
                        tracing::debug!(key = %k, "no match for primary record; zero-filled");
                    }
                    report.unmatched.push(k.clone());
                }
                (None, None) => {
                    tracing::warn!(index = i, property = %spec.primary_key, "primary record has no join key");
                    report.unmatched.push(String::new());
                }
            }

            build(feature, &spec.fields, record, spec.policy)
        })
        .collect();

    tracing::info!(matched = report.matched, unmatched = report.unmatched.len(), "merged {} records", report.total());
    (features, report)
}

/// Rename and coerce the properties of every feature without a secondary source.
///
/// Secondary-sourced fields take their fallback.
pub fn project(collection: &FeatureCollection, fields: &[OutputField]) -> FeatureCollection {
    collection.iter()
        .map(|feature| build(feature, fields, None, MissPolicy::Defaults))
        .collect()
}

fn build(feature: &Feature, fields: &[OutputField], record: Option<&Properties>, policy: MissPolicy) -> Feature {
    let properties = fields.iter()
        .map(|field| (field.name.as_str(), field.resolve(&feature.properties, record, policy)))
        .collect::<Properties>();
    feature.with_properties(properties)
}
