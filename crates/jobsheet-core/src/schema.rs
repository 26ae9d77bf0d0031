//! Table schema (ordered field list)

/// Canonical field names for the job table, in column order.
///
/// This is the header the store writes when it creates a fresh table file.
pub const CANONICAL_FIELDS: [&str; 25] = [
    "S.O.#",
    "Dwg.",
    "REP",
    "Customer",
    "Contact",
    "P.O.#",
    "Quantity",
    "Description",
    "Cost Each",
    "Start Date",
    "Due Date",
    "Completion Date",
    "Total $'s",
    "NOTES",
    "Received in Engineering",
    "Engineer Start Date",
    "Released Date",
    "Customer Number",
    "Engineer Status",
    "machine type",
    "Tooling type",
    "Tube O.D.",
    "Tube C.L.R.",
    "Tube W.T.",
    "Unit",
];

/// An ordered list of field names (the table header).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// The canonical job-table schema
    pub fn canonical() -> Self {
        Self::from_fields(CANONICAL_FIELDS)
    }

    /// Build a schema from a header row
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The field names in stored order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if a field name is part of the schema
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Column position of a field, if present
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }
}
