pub mod field_map;
pub mod flatten;

pub use field_map::FieldMap;
pub use flatten::{flatten_detail, flatten_details, FlatRecord, FlatTable};
