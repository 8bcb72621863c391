mod collection;
mod properties;
mod value;

pub use collection::{Feature, FeatureCollection};
pub use properties::Properties;
pub use value::{FieldValue, MISSING};
