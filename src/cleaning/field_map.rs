use std::collections::BTreeMap;

/// Which parts of a listing detail document end up as columns.
///
/// Treat this as versioned data: when the upstream document shape changes,
/// edit the tables here rather than the flattening code.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap {
    /// Top-level fields, in output order. Duplicates are ignored.
    top_level: Vec<String>,
    /// field -> [(subfield, column)]
    nested: BTreeMap<String, Vec<(String, String)>>,
    /// group name -> fields to pull out of that group
    groups: BTreeMap<String, Vec<String>>,
    /// The top-level field holding the list of named groups.
    groups_field: String,
}

pub const DETAILS_FIELD: &str = "Details";

const TOP_LEVEL: &[&str] = &[
    "ListingID",
    "DefaultParentArea",
    "Zip",
    "Url",
    "Building",
    "BathsFull",
    "BathsHalf",
    "Beds",
    "CurrentPrice",
    "Days",
    "FullStreetAddress",
    "Latitude",
    "Longitude",
    "ListDate",
    "LotSize",
    "OriginalPrice",
    "Ownership",
    "PropertyStyle",
    "PropertyType",
    "Remarks",
    "SqFt",
    "TownhouseType",
    "UnitCount",
    "WalkScore",
    "WalkScoreDescription",
    "YearBuilt",
    "Zip",
    DETAILS_FIELD,
    "Amenities",
    "BuildingAmenities",
];

const NESTED: &[(&str, &[(&str, &str)])] = &[
    ("DefaultParentArea", &[("Name", "Neighborhood")]),
    (
        "Building",
        &[("UnitCount", "BuildingUnitCount"), ("Name", "BuildingName")],
    ),
];

const GROUPS: &[(&str, &[&str])] = &[
    (
        "Interior Features",
        &[
            "Accessibility Features",
            "AllRoom Features",
            "Elevator",
            "Interior Features",
            "Kitchen Appliances",
            "Master Bedroom",
            "Bedroom 2",
            "Dining Room",
            "Living Room",
        ],
    ),
    (
        "Utilities",
        &[
            "Fuel Description",
            "Hot Water",
            "Sewer",
            "Water Description",
            "Cooling Description",
            "Heating Description",
        ],
    ),
    (
        "Green Features",
        &[
            "Green Energy Supplement",
            "Green Verification HES Metric",
            "Green Verification HES Year",
            // trailing space matches the upstream label
            "Green Verification HES ",
        ],
    ),
];

impl Default for FieldMap {
    fn default() -> Self {
        let mut map = FieldMap::new(DETAILS_FIELD);
        for field in TOP_LEVEL {
            map = map.field(field);
        }
        for (field, pairs) in NESTED {
            map = map.nested(field, pairs);
        }
        for (group, fields) in GROUPS {
            map = map.group(group, fields);
        }
        map
    }
}

impl FieldMap {
    /// An empty map whose group list lives under `groups_field`.
    pub fn new(groups_field: impl Into<String>) -> Self {
        Self {
            top_level: Vec::new(),
            nested: BTreeMap::new(),
            groups: BTreeMap::new(),
            groups_field: groups_field.into(),
        }
    }

    pub fn field(mut self, name: &str) -> Self {
        if !self.top_level.iter().any(|f| f == name) {
            self.top_level.push(name.to_string());
        }
        self
    }

    pub fn nested(mut self, field: &str, pairs: &[(&str, &str)]) -> Self {
        let entry = self.nested.entry(field.to_string()).or_default();
        entry.extend(pairs.iter().map(|(s, t)| (s.to_string(), t.to_string())));
        self
    }

    pub fn group(mut self, group: &str, fields: &[&str]) -> Self {
        let entry = self.groups.entry(group.to_string()).or_default();
        for f in fields {
            if !entry.iter().any(|e| e == f) {
                entry.push(f.to_string());
            }
        }
        self
    }

    pub fn top_level(&self) -> &[String] {
        &self.top_level
    }

    pub fn nested_rules(&self, field: &str) -> Option<&[(String, String)]> {
        self.nested.get(field).map(Vec::as_slice)
    }

    pub fn group_fields(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    pub fn is_groups_field(&self, field: &str) -> bool {
        self.groups_field == field
    }

    /// Every column the map can produce for a fully populated document.
    pub fn declared_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        let mut push = |c: &str| {
            if !columns.iter().any(|e| e == c) {
                columns.push(c.to_string());
            }
        };

        for field in &self.top_level {
            if let Some(rules) = self.nested_rules(field) {
                rules.iter().for_each(|(_, target)| push(target.as_str()));
            } else if self.is_groups_field(field) {
                self.groups.values().flatten().for_each(|f| push(f.as_str()));
            } else {
                push(field.as_str());
            }
        }
        columns
    }
}
