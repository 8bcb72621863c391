use ahash::AHashMap;
use anyhow::{Result, anyhow};

use crate::{feature::{FeatureCollection, Properties}, io::TextTable};
use super::CsvSchema;

/// Secondary records keyed by one declared property, built once per merge.
#[derive(Debug, Clone, Default)]
pub struct JoinIndex {
    key: String,
    records: AHashMap<String, Properties>,
}

impl JoinIndex {
    /// Index the properties of every feature by `key`.
    ///
    /// Features without a usable key are skipped; on duplicate keys the later
    /// feature wins.
    pub fn from_collection(collection: &FeatureCollection, key: &str) -> Self {
        let mut index = Self { key: key.to_string(), records: AHashMap::with_capacity(collection.len()) };
        for (i, feature) in collection.iter().enumerate() {
            match feature.properties.key(key) {
                Some(k) => index.put(k, feature.properties.clone()),
                None => tracing::warn!(index = i, key, "secondary feature has no join key"),
            }
        }
        index
    }

    /// Index the rows of a text table by the `key` column, coercing every cell
    /// with its declared type from `schema`.
    pub fn from_table(table: &TextTable, key: &str, schema: &CsvSchema) -> Result<Self> {
        table.column_index(key)
            .ok_or_else(|| anyhow!("[join::index] key column {:?} not found in table", key))?;

        let mut index = Self { key: key.to_string(), records: AHashMap::with_capacity(table.len()) };
        for (i, record) in table.records().enumerate() {
            let props = record
                .map(|(column, cell)| {
                    let ty = schema.type_of(column);
                    let value = ty.coerce_text(cell);
                    if ty.is_numeric() && value.is_null() && cell.is_some_and(|c| !c.trim().is_empty()) {
                        tracing::warn!(row = i + 1, column, cell, "unparsable numeric cell");
                    }
                    (column, value)
                })
                .collect::<Properties>();

            match props.key(key) {
                Some(k) => index.put(k, props),
                None => tracing::warn!(row = i + 1, key, "row has no join key"),
            }
        }
        Ok(index)
    }

    fn put(&mut self, key: String, props: Properties) {
        if self.records.insert(key.clone(), props).is_some() {
            tracing::warn!(key = %key, "duplicate join key; keeping the later record");
        }
    }

    /// Name of the property the records are keyed by.
    #[inline] pub fn key(&self) -> &str { &self.key }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    #[inline] pub fn get(&self, key: &str) -> Option<&Properties> { self.records.get(key) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{feature::FieldValue, io::csv::read_csv_text_string, join::ColumnType};

    #[test]
    fn indexes_collection_by_key() {
        let fc = crate::io::parse_feature_collection(r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,"properties":{"PRECINCT":"0101","YES_Total":10}},
            {"type":"Feature","geometry":null,"properties":{"PRECINCT":"0102","YES_Total":20}},
            {"type":"Feature","geometry":null,"properties":{"YES_Total":30}}
        ]}"#).unwrap();
        let index = JoinIndex::from_collection(&fc, "PRECINCT");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("0102").unwrap().number("YES_Total"), Some(20.0));
        assert!(index.get("0103").is_none());
    }

    #[test]
    fn indexes_table_with_schema() {
        let table = read_csv_text_string("site_id,name,acres,parks_5min\n1,Downtown,12.5,True\n2,Airport,x,False\n").unwrap();
        let schema = CsvSchema::new()
            .column("site_id", ColumnType::Integer)
            .column("acres", ColumnType::Float)
            .column("parks_5min", ColumnType::boolean("True"));
        let index = JoinIndex::from_table(&table, "name", &schema).unwrap();

        let downtown = index.get("Downtown").unwrap();
        assert_eq!(downtown.get("site_id"), Some(&FieldValue::from(1i64)));
        assert_eq!(downtown.number("acres"), Some(12.5));
        assert_eq!(downtown.get("parks_5min"), Some(&FieldValue::Bool(true)));

        let airport = index.get("Airport").unwrap();
        assert_eq!(airport.get("acres"), Some(&FieldValue::Null));
        assert_eq!(airport.get("parks_5min"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn missing_key_column_is_error() {
        let table = read_csv_text_string("a,b\n1,2\n").unwrap();
        assert!(JoinIndex::from_table(&table, "name", &CsvSchema::new()).is_err());
    }

    #[test]
    fn duplicate_keys_keep_later_row() {
        let table = read_csv_text_string("name,units\nA,1\nA,2\n").unwrap();
        let schema = CsvSchema::new().column("units", ColumnType::Integer);
        let index = JoinIndex::from_table(&table, "name", &schema).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("A").unwrap().number("units"), Some(2.0));
    }
}
