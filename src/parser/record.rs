use super::value::{LuaKey, LuaTable, LuaValue};
use crate::error::ValidationError;
use crate::schema::{Field, FieldType, RecordSchema};

/// A field value coerced to its declared type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    Table(&'a LuaTable),
}

/// Typed view of a raw table through a record schema
///
/// Fields are addressed by their internal name; the schema decides which
/// Lua key is read and whether a missing value is an error.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    schema: &'static RecordSchema,
    table: &'a LuaTable,
    path: String,
}

impl<'a> Record<'a> {
    pub fn new(schema: &'static RecordSchema, table: &'a LuaTable, path: impl Into<String>) -> Self {
        Self {
            schema,
            table,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn error(&self, field: &Field, reason: impl Into<String>) -> ValidationError {
        ValidationError::new(self.path.clone(), field.source_key(), reason)
    }

    fn field(&self, name: &str) -> Result<&'static Field, ValidationError> {
        self.schema.field(name).ok_or_else(|| {
            ValidationError::new(
                self.path.clone(),
                name,
                format!("no such field in {} schema", self.schema.name),
            )
        })
    }

    /// Look up a field by its Lua key; numeric keys match integer entries
    fn raw(&self, field: &Field) -> Option<&'a LuaValue> {
        let key = field.source_key();
        self.table.get(key).or_else(|| {
            key.parse::<i64>()
                .ok()
                .and_then(|i| self.table.get_key(&LuaKey::Integer(i)))
        })
    }

    /// Coerced value, `None` when an optional field is absent
    fn value(&self, name: &str) -> Result<Option<FieldValue<'a>>, ValidationError> {
        let field = self.field(name)?;
        match self.raw(field) {
            None if field.required => Err(self.error(field, "field required")),
            None => Ok(None),
            Some(value) => extract_value(value, field.field_type)
                .map(Some)
                .ok_or_else(|| {
                    self.error(
                        field,
                        format!(
                            "expected {}, got {}",
                            field.field_type.as_str(),
                            describe(value)
                        ),
                    )
                }),
        }
    }

    fn mismatch(&self, name: &str, expected: FieldType) -> ValidationError {
        ValidationError::new(
            self.path.clone(),
            name,
            format!("field is not declared as {}", expected.as_str()),
        )
    }

    pub fn opt_integer(&self, name: &str) -> Result<Option<i64>, ValidationError> {
        match self.value(name)? {
            None => Ok(None),
            Some(FieldValue::Integer(i)) => Ok(Some(i)),
            Some(_) => Err(self.mismatch(name, FieldType::Integer)),
        }
    }

    /// Integer field, 0 when an optional field is absent
    pub fn integer(&self, name: &str) -> Result<i64, ValidationError> {
        Ok(self.opt_integer(name)?.unwrap_or_default())
    }

    pub fn opt_real(&self, name: &str) -> Result<Option<f64>, ValidationError> {
        match self.value(name)? {
            None => Ok(None),
            Some(FieldValue::Real(r)) => Ok(Some(r)),
            Some(_) => Err(self.mismatch(name, FieldType::Real)),
        }
    }

    pub fn real(&self, name: &str) -> Result<f64, ValidationError> {
        Ok(self.opt_real(name)?.unwrap_or_default())
    }

    /// Strict: only Lua `true`/`false`; a numeric `0`/`1` is rejected
    pub fn boolean(&self, name: &str) -> Result<bool, ValidationError> {
        match self.value(name)? {
            None => Ok(false),
            Some(FieldValue::Boolean(b)) => Ok(b),
            Some(_) => Err(self.mismatch(name, FieldType::Boolean)),
        }
    }

    pub fn opt_text(&self, name: &str) -> Result<Option<String>, ValidationError> {
        match self.value(name)? {
            None => Ok(None),
            Some(FieldValue::Text(s)) => Ok(Some(s)),
            Some(_) => Err(self.mismatch(name, FieldType::Text)),
        }
    }

    pub fn text(&self, name: &str) -> Result<String, ValidationError> {
        Ok(self.opt_text(name)?.unwrap_or_default())
    }

    /// Nested table, `None` when an optional field is absent
    pub fn opt_table(&self, name: &str) -> Result<Option<&'a LuaTable>, ValidationError> {
        match self.value(name)? {
            None => Ok(None),
            Some(FieldValue::Table(t)) => Ok(Some(t)),
            Some(_) => Err(self.mismatch(name, FieldType::Table)),
        }
    }

    /// Nested table read through another schema
    pub fn record(
        &self,
        name: &str,
        schema: &'static RecordSchema,
    ) -> Result<Option<Record<'a>>, ValidationError> {
        Ok(self
            .opt_table(name)?
            .map(|table| Record::new(schema, table, format!("{}.{}", self.path, name))))
    }

    /// Entries of a list field, each read through `schema`
    ///
    /// An absent optional list is empty.
    pub fn records(
        &self,
        name: &str,
        schema: &'static RecordSchema,
    ) -> Result<Vec<Record<'a>>, ValidationError> {
        let Some(table) = self.opt_table(name)? else {
            return Ok(Vec::new());
        };

        let field = self.field(name)?;
        table
            .iter()
            .filter(|(key, _)| matches!(key, LuaKey::Integer(_)))
            .map(|(key, value)| match value {
                LuaValue::Table(item) => Ok(Record::new(
                    schema,
                    item,
                    format!("{}.{}[{}]", self.path, name, key),
                )),
                other => Err(self.error(
                    field,
                    format!("entry {} is {}, expected table", key, describe(other)),
                )),
            })
            .collect()
    }
}

/// Coerce a raw value to the given field type
pub fn extract_value(value: &LuaValue, field_type: FieldType) -> Option<FieldValue<'_>> {
    match field_type {
        FieldType::Integer => value.as_i64().map(FieldValue::Integer),
        FieldType::Real => value.as_f64().map(FieldValue::Real),
        FieldType::Text => match value {
            LuaValue::String(s) => Some(FieldValue::Text(s.clone())),
            LuaValue::Integer(i) => Some(FieldValue::Text(i.to_string())),
            LuaValue::Number(n) => Some(FieldValue::Text(n.to_string())),
            _ => None,
        },
        FieldType::Boolean => value.as_bool().map(FieldValue::Boolean),
        FieldType::Table | FieldType::List => value.as_table().map(FieldValue::Table),
    }
}

fn describe(value: &LuaValue) -> String {
    match value {
        LuaValue::Boolean(b) => format!("boolean {}", b),
        LuaValue::Integer(i) => format!("number {}", i),
        LuaValue::Number(n) => format!("number {}", n),
        LuaValue::String(s) => format!("string {:?}", s),
        LuaValue::Table(_) => "table".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_value;
    use crate::schema::{ACCOUNTS, MISSION, PLAYER_STATS, POSITION, SITAC};

    fn table(src: &str) -> LuaTable {
        match parse_value(src).unwrap() {
            Some(LuaValue::Table(t)) => t,
            other => panic!("not a table: {:?}", other),
        }
    }

    #[test]
    fn test_aliased_fields() {
        let t = table(r#"{ ["title"] = "CAP", ["description"] = "d", ["isEscortMission"] = true, ["isRunning"] = false }"#);
        let record = Record::new(&MISSION, &t, "mission");
        assert_eq!(record.text("title").unwrap(), "CAP");
        assert!(record.boolean("is_escort_mission").unwrap());
        assert!(!record.boolean("is_running").unwrap());
    }

    #[test]
    fn test_boolean_rejects_numbers() {
        let t = table(r#"{ ["isEscortMission"] = 1, ["isRunning"] = 0 }"#);
        let record = Record::new(&MISSION, &t, "mission");
        let err = record.boolean("is_escort_mission").unwrap_err();
        assert_eq!(err.field, "isEscortMission");
        assert_eq!(err.reason, "expected boolean, got number 1");
        assert!(record.boolean("is_running").is_err());
    }

    #[test]
    fn test_missing_required_field() {
        let t = table(r#"{ ["latitude"] = 33.5 }"#);
        let err = Record::new(&POSITION, &t, "zones.A.lat_long")
            .real("longitude")
            .unwrap_err();
        assert_eq!(err.record, "zones.A.lat_long");
        assert_eq!(err.field, "longitude");
        assert_eq!(err.reason, "field required");
    }

    #[test]
    fn test_optional_fields_default_individually() {
        let t = table(r#"{ ["Air"] = 3, ["Points"] = 12.5 }"#);
        let record = Record::new(&PLAYER_STATS, &t, "playerStats.Bob");
        assert_eq!(record.integer("air").unwrap(), 3);
        assert_eq!(record.real("points").unwrap(), 12.5);
        assert_eq!(record.integer("deaths").unwrap(), 0);
        assert_eq!(record.integer("ground_units").unwrap(), 0);
    }

    #[test]
    fn test_type_coercion() {
        let t = table(r#"{ ["Air"] = 2.0, ["SAM"] = 2.5 }"#);
        let record = Record::new(&PLAYER_STATS, &t, "stats");
        assert_eq!(record.integer("air").unwrap(), 2);
        let err = record.integer("sam").unwrap_err();
        assert!(err.reason.contains("expected integer"));
    }

    #[test]
    fn test_integer_keys_match_numeric_lua_keys() {
        let t = table("{ [1] = 736, [2] = 33218.5 }");
        let record = Record::new(&ACCOUNTS, &t, "accounts");
        assert_eq!(record.real("red").unwrap(), 736.0);
        assert_eq!(record.real("blue").unwrap(), 33218.5);
    }

    #[test]
    fn test_records_of_list() {
        let t = table(
            r#"{ ["zones"] = {}, ["missions"] = {
                [2] = { ["title"] = "second", ["description"] = "", ["isEscortMission"] = false, ["isRunning"] = true },
                [1] = { ["title"] = "first", ["description"] = "", ["isEscortMission"] = false, ["isRunning"] = true },
            } }"#,
        );
        let root = Record::new(&SITAC, &t, "sitac");
        let missions = root.records("missions", &MISSION).unwrap();
        let titles: Vec<_> = missions.iter().map(|m| m.text("title").unwrap()).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert_eq!(missions[1].path(), "sitac.missions[2]");

        assert!(root.records("players", &MISSION).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_field_is_reported() {
        let t = table("{}");
        let err = Record::new(&MISSION, &t, "mission").text("nope").unwrap_err();
        assert!(err.reason.contains("no such field"));
    }
}
