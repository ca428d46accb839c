use crate::cleaning::field_map::FieldMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One output row: column name -> value, in mapping order. Never nested once
/// normalized.
pub type FlatRecord = Map<String, Value>;

/// Cleaned listings, one record per detail document. Every record carries
/// every column in `columns`; missing cells are null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatTable {
    pub columns: Vec<String>,
    pub records: Vec<FlatRecord>,
}

impl FlatTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cell lookup; `None` only when the row or column does not exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        self.records.get(row)?.get(column)
    }
}

/// Absent or falsy: null, `false`, zero, and empty strings, arrays and objects.
fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

/// Applies `map` to one raw detail document. Total: missing or oddly shaped
/// input degrades to nulls.
pub fn flatten_detail(document: &Value, map: &FieldMap) -> FlatRecord {
    let mut record = FlatRecord::new();

    for field in map.top_level() {
        let value = document.get(field);

        if is_empty(value) {
            record.insert(field.clone(), Value::Null);
        } else if let Some(rules) = map.nested_rules(field) {
            for (source, target) in rules {
                let inner = value.and_then(|v| v.get(source)).cloned();
                record.insert(target.clone(), inner.unwrap_or(Value::Null));
            }
        } else if map.is_groups_field(field) {
            extract_groups(value, map, &mut record);
        } else if let Some(v) = value {
            record.insert(field.clone(), v.clone());
        }
    }

    record
}

// Entries are keyed by their own name, not the group's, so the same name in
// two mapped groups lands in one column and the later group wins.
fn extract_groups(groups: Option<&Value>, map: &FieldMap, record: &mut FlatRecord) {
    let Some(groups) = groups.and_then(Value::as_array) else {
        return;
    };

    for group in groups {
        let Some(wanted) = group
            .get("Name")
            .and_then(Value::as_str)
            .and_then(|name| map.group_fields(name))
        else {
            continue;
        };

        let entries = group.get("Fields").and_then(Value::as_array);
        for entry in entries.into_iter().flatten() {
            let Some(name) = entry.get("Name").and_then(Value::as_str) else {
                continue;
            };
            if wanted.iter().any(|w| w == name) {
                let value = entry.get("Value").cloned().unwrap_or(Value::Null);
                record.insert(name.to_string(), value);
            }
        }
    }
}

/// Expands nested objects into dotted column names:
/// `{"Amenities": {"Pool": true}}` -> `{"Amenities.Pool": true}`.
/// Arrays are left as cell values.
pub fn normalize(record: &FlatRecord) -> Vec<(String, Value)> {
    let mut out = Vec::with_capacity(record.len());
    for (key, value) in record {
        push_normalized(key.clone(), value, &mut out);
    }
    out
}

fn push_normalized(prefix: String, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(inner) if !inner.is_empty() => {
            for (key, v) in inner {
                push_normalized(format!("{prefix}.{key}"), v, out);
            }
        }
        Value::Object(_) => out.push((prefix, Value::Null)),
        other => out.push((prefix, other.clone())),
    }
}

/// Flattens every document and unions the columns into one table. Columns
/// appear in first-seen order, followed by any column `map` declares that no
/// document produced.
pub fn flatten_details(documents: &[Value], map: &FieldMap) -> FlatTable {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<(String, Value)>> = Vec::with_capacity(documents.len());

    for document in documents {
        let row = normalize(&flatten_detail(document, map));
        for (column, _) in &row {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
        rows.push(row);
    }

    for column in map.declared_columns() {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }

    let records = rows
        .into_iter()
        .map(|row| {
            let mut record: FlatRecord = columns
                .iter()
                .map(|c| (c.clone(), Value::Null))
                .collect();
            record.extend(row);
            record
        })
        .collect();

    FlatTable { columns, records }
}
