/// Scalar or structural type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Real,
    Text,
    Boolean,
    /// Nested table kept as-is or mapped by a sub-record
    Table,
    /// Table whose integer-keyed entries form a list
    List,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Table => "table",
            FieldType::List => "list",
        }
    }
}

/// Field definition: internal name plus the key used in the export
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Override Lua key name (default: same as `name`)
    pub lua_key: Option<&'static str>,
}

impl Field {
    /// Create an optional field (defaults when absent)
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            lua_key: None,
        }
    }

    /// Create a required field
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
            lua_key: None,
        }
    }

    /// Set the Lua key (for when it differs from the internal name)
    pub const fn lua(self, key: &'static str) -> Self {
        Self {
            lua_key: Some(key),
            ..self
        }
    }

    /// Key to look up in the raw table
    pub fn source_key(&self) -> &'static str {
        self.lua_key.unwrap_or(self.name)
    }
}

/// Field table for one kind of record in the export
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields whose Lua key differs from the internal name
    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.fields
            .iter()
            .filter_map(|f| f.lua_key.map(|key| (key, f.name)))
    }
}
