use crate::cleaning::{flatten_details, FieldMap, FlatTable};
use crate::spreadsheets::write_flat_table_xlsx;
use crate::tests::utils::sample_detail;
use serde_json::json;

#[test]
fn exports_booleans_numbers_and_nulls() {
    let table = flatten_details(&[sample_detail(1), json!({})], &FieldMap::default());
    assert_eq!(table.cell(0, "Amenities.Pool"), Some(&json!(false)));

    let bytes = write_flat_table_xlsx(&table).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn empty_table_still_produces_a_workbook() {
    let bytes = write_flat_table_xlsx(&FlatTable::default()).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
