use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Key of a Lua table entry
///
/// Integer keys sort before string keys, so positional entries of a
/// sequence come out in order when iterating a table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LuaKey {
    Integer(i64),
    String(String),
}

impl LuaKey {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaKey::String(s) => Some(s),
            LuaKey::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LuaKey::Integer(i) => Some(*i),
            LuaKey::String(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for LuaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaKey::Integer(i) => write!(f, "{}", i),
            LuaKey::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for LuaKey {
    fn from(s: &str) -> Self {
        LuaKey::String(s.to_string())
    }
}

impl From<String> for LuaKey {
    fn from(s: String) -> Self {
        LuaKey::String(s)
    }
}

impl From<i64> for LuaKey {
    fn from(i: i64) -> Self {
        LuaKey::Integer(i)
    }
}

/// A non-nil Lua value as found in a data chunk
#[derive(Debug, Clone, PartialEq)]
pub enum LuaValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Table(LuaTable),
}

impl LuaValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            LuaValue::Boolean(_) => "boolean",
            LuaValue::Integer(_) | LuaValue::Number(_) => "number",
            LuaValue::String(_) => "string",
            LuaValue::Table(_) => "table",
        }
    }

    pub fn as_table(&self) -> Option<&LuaTable> {
        match self {
            LuaValue::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LuaValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view, accepting floats with no fractional part
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LuaValue::Integer(i) => Some(*i),
            LuaValue::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LuaValue::Integer(i) => Some(*i as f64),
            LuaValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert to JSON; table keys become object keys
    pub fn to_json(&self) -> Value {
        match self {
            LuaValue::Boolean(b) => Value::Bool(*b),
            LuaValue::Integer(i) => Value::Number((*i).into()),
            LuaValue::Number(n) => Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            LuaValue::String(s) => Value::String(s.clone()),
            LuaValue::Table(t) => t.to_json(),
        }
    }
}

/// Lua table: an ordered mapping from key to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LuaTable {
    entries: BTreeMap<LuaKey, LuaValue>,
}

impl LuaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a field; `None` removes it, as assigning nil does in Lua
    pub fn set(&mut self, key: LuaKey, value: Option<LuaValue>) {
        match value {
            Some(v) => {
                self.entries.insert(key, v);
            }
            None => {
                self.entries.remove(&key);
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<LuaKey>, value: LuaValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<LuaValue> {
        self.entries.remove(&LuaKey::String(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&LuaValue> {
        self.entries.get(&LuaKey::String(key.to_string()))
    }

    pub fn get_key(&self, key: &LuaKey) -> Option<&LuaValue> {
        self.entries.get(key)
    }

    pub(crate) fn get_key_mut(&mut self, key: &LuaKey) -> Option<&mut LuaValue> {
        self.entries.get_mut(key)
    }

    pub fn get_index(&self, index: i64) -> Option<&LuaValue> {
        self.entries.get(&LuaKey::Integer(index))
    }

    pub fn get_table(&self, key: &str) -> Option<&LuaTable> {
        self.get(key).and_then(LuaValue::as_table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LuaKey, &LuaValue)> {
        self.entries.iter()
    }

    /// Values stored under integer keys, in key order
    ///
    /// Exports write lists as `{ [1] = ..., [2] = ... }` and the keys are not
    /// always contiguous after entries get removed, so gaps are skipped.
    pub fn sequence(&self) -> impl Iterator<Item = &LuaValue> {
        self.entries
            .iter()
            .filter(|(k, _)| matches!(k, LuaKey::Integer(_)))
            .map(|(_, v)| v)
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (k, v) in &self.entries {
            map.insert(k.to_string(), v.to_json());
        }
        Value::Object(map)
    }
}

impl FromIterator<(LuaKey, LuaValue)> for LuaTable {
    fn from_iter<I: IntoIterator<Item = (LuaKey, LuaValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_skips_string_keys_and_gaps() {
        let mut table = LuaTable::new();
        table.insert(3, LuaValue::String("c".into()));
        table.insert("name", LuaValue::Boolean(true));
        table.insert(1, LuaValue::String("a".into()));

        let seq: Vec<_> = table.sequence().filter_map(LuaValue::as_str).collect();
        assert_eq!(seq, vec!["a", "c"]);
    }

    #[test]
    fn test_set_nil_removes_entry() {
        let mut table = LuaTable::new();
        table.set("x".into(), Some(LuaValue::Integer(1)));
        table.set("x".into(), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_integral_float_reads_as_integer() {
        assert_eq!(LuaValue::Number(2.0).as_i64(), Some(2));
        assert_eq!(LuaValue::Number(2.5).as_i64(), None);
        assert_eq!(LuaValue::Integer(7).as_f64(), Some(7.0));
    }

    #[test]
    fn test_to_json_stringifies_integer_keys() {
        let mut inner = LuaTable::new();
        inner.insert(1, LuaValue::String("T-72B3".into()));
        let mut table = LuaTable::new();
        table.insert("units", LuaValue::Table(inner));

        let json = table.to_json();
        assert_eq!(json["units"]["1"], "T-72B3");
    }
}
