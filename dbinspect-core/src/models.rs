//! Data models produced by a schema walk.
//!
//! The model is write-once, read-once: a `TableReport` is built per table,
//! handed to the reporter and then discarded with the rest of the walk.

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseType {
    /// MySQL or MariaDB
    MySQL,
    /// PostgreSQL
    PostgreSQL,
}

impl DatabaseType {
    /// Default TCP port of the server
    pub const fn default_port(self) -> u16 {
        match self {
            Self::MySQL => 3306,
            Self::PostgreSQL => 5432,
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MySQL => write!(f, "MySQL"),
            Self::PostgreSQL => write!(f, "PostgreSQL"),
        }
    }
}

/// One column as returned by the dialect's describe query.
///
/// Every attribute is optional: `None` is SQL NULL and is distinct from an
/// empty string. For PostgreSQL the `key_role` slot carries `is_identity` and
/// `extra` carries the ordinal position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name
    pub field: Option<String>,
    /// Declared type
    pub data_type: Option<String>,
    /// Nullability, usually `YES` or `NO`
    pub nullable: Option<String>,
    /// Key role (`PRI`, `UNI`, `MUL`) or identity flag
    pub key_role: Option<String>,
    /// Default expression
    pub default_value: Option<String>,
    /// Extra metadata (`auto_increment`, ordinal position, ...)
    pub extra: Option<String>,
}

impl ColumnDescriptor {
    /// Builds a descriptor from the six describe cells in column order.
    pub fn from_cells(cells: [Option<String>; 6]) -> Self {
        let [field, data_type, nullable, key_role, default_value, extra] = cells;
        Self {
            field,
            data_type,
            nullable,
            key_role,
            default_value,
            extra,
        }
    }

    /// Returns the cells in report column order.
    pub fn cells(&self) -> [Option<&str>; 6] {
        [
            self.field.as_deref(),
            self.data_type.as_deref(),
            self.nullable.as_deref(),
            self.key_role.as_deref(),
            self.default_value.as_deref(),
            self.extra.as_deref(),
        ]
    }
}

/// Column metadata of one table, in the order the server returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    /// Table name as listed by the server
    pub table_name: String,
    /// Columns in server order
    pub columns: Vec<ColumnDescriptor>,
    /// Set when the describe query failed; `columns` is then empty
    pub failure: Option<String>,
}

impl TableReport {
    /// Report for a successfully described table.
    pub const fn described(table_name: String, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            table_name,
            columns,
            failure: None,
        }
    }

    /// Report for a table whose describe query failed.
    pub const fn failed(table_name: String, failure: String) -> Self {
        Self {
            table_name,
            columns: Vec::new(),
            failure: Some(failure),
        }
    }

    /// Whether describing this table failed
    pub const fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Result of walking one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWalk {
    /// The selected database
    pub database: String,
    /// One report per listed table, in listing order
    pub tables: Vec<TableReport>,
}

impl SchemaWalk {
    /// Number of tables whose describe query failed
    pub fn failed_tables(&self) -> usize {
        self.tables.iter().filter(|t| t.is_failed()).count()
    }
}
