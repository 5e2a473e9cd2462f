//! Read-only table metadata consumed by the loader.
//!
//! The catalog describes, for each table, the key column and the non-key
//! columns the loader must fill. It is normally supplied by the benchmark
//! driver; [`Catalog`] is a YAML-loadable implementation.
//!
//! ## YAML Format
//!
//! ```yaml
//! tables:
//!   - name: usertable
//!     key:
//!       name: ycsb_key
//!       type: int
//!     columns:
//!       - name: field1
//!         type:
//!           type: var_char
//!           length: 100
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Error reading catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Table not found in catalog
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Table declared twice
    #[error("Duplicate table in catalog: {0}")]
    DuplicateTable(String),
}

// ============================================================================
// Column Types
// ============================================================================

/// Column type as far as value generation is concerned.
///
/// Simple types are written as strings (`type: int`); sized types use the
/// object form (`type: { type: var_char, length: 100 }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColumnTypeRepr", into = "ColumnTypeRepr")]
pub enum ColumnType {
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 64-bit float
    Float64,
    /// Unbounded text
    Text,
    /// Variable-length string of at most `length` characters
    VarChar { length: u32 },
    /// Fixed-length string of exactly `length` characters
    Char { length: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ColumnTypeRepr {
    Simple(String),
    Sized {
        #[serde(rename = "type")]
        kind: String,
        length: u32,
    },
}

impl TryFrom<ColumnTypeRepr> for ColumnType {
    type Error = String;

    fn try_from(repr: ColumnTypeRepr) -> Result<Self, Self::Error> {
        match repr {
            ColumnTypeRepr::Simple(kind) => match kind.as_str() {
                "int" | "int32" | "integer" => Ok(ColumnType::Int32),
                "bigint" | "int64" => Ok(ColumnType::Int64),
                "float" | "float64" | "double" => Ok(ColumnType::Float64),
                "text" => Ok(ColumnType::Text),
                other => Err(format!("unknown column type '{other}'")),
            },
            ColumnTypeRepr::Sized { kind, length } => match kind.as_str() {
                "var_char" | "varchar" => Ok(ColumnType::VarChar { length }),
                "char" => Ok(ColumnType::Char { length }),
                other => Err(format!("column type '{other}' does not take a length")),
            },
        }
    }
}

impl From<ColumnType> for ColumnTypeRepr {
    fn from(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int32 => ColumnTypeRepr::Simple("int".to_string()),
            ColumnType::Int64 => ColumnTypeRepr::Simple("bigint".to_string()),
            ColumnType::Float64 => ColumnTypeRepr::Simple("float".to_string()),
            ColumnType::Text => ColumnTypeRepr::Simple("text".to_string()),
            ColumnType::VarChar { length } => ColumnTypeRepr::Sized {
                kind: "var_char".to_string(),
                length,
            },
            ColumnType::Char { length } => ColumnTypeRepr::Sized {
                kind: "char".to_string(),
                length,
            },
        }
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// A single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A table: its key column followed by its value columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name
    pub name: String,

    /// Key column, always the first value of a staged row
    pub key: ColumnDescriptor,

    /// Non-key columns, in insert order
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Create a new table descriptor.
    pub fn new(
        name: impl Into<String>,
        key: ColumnDescriptor,
        columns: Vec<ColumnDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            key,
            columns,
        }
    }

    /// Number of values in one row, key included.
    pub fn width(&self) -> usize {
        self.columns.len() + 1
    }

    /// Column names in insert order, key first.
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(self.key.name.as_str())
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Source of table metadata.
pub trait TableCatalog {
    /// Look up a table by name.
    fn table(&self, name: &str) -> Option<&TableDescriptor>;

    /// Every table, in declaration order.
    fn tables(&self) -> &[TableDescriptor];
}

/// In-memory catalog, usually loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub tables: Vec<TableDescriptor>,
}

impl Catalog {
    /// Build a catalog from descriptors, rejecting duplicate names.
    pub fn new(tables: Vec<TableDescriptor>) -> Result<Self, CatalogError> {
        let catalog = Self { tables };
        catalog.check_unique()?;
        Ok(catalog)
    }

    /// Load catalog from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse catalog from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.check_unique()?;
        Ok(catalog)
    }

    /// Look up a table, failing with [`CatalogError::TableNotFound`].
    pub fn get_table(&self, name: &str) -> Result<&TableDescriptor, CatalogError> {
        self.table(name)
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    /// Table names in declaration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    fn check_unique(&self) -> Result<(), CatalogError> {
        for (idx, table) in self.tables.iter().enumerate() {
            if self.tables[..idx].iter().any(|t| t.name == table.name) {
                return Err(CatalogError::DuplicateTable(table.name.clone()));
            }
        }
        Ok(())
    }
}

impl TableCatalog for Catalog {
    fn table(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|t| t.name == name)
    }

    fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }
}
