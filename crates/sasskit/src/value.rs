//! Sass runtime values and their literal rendering.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Values exchanged with the engine (custom function arguments and
//! results, map and list manipulation) form a closed tagged set.
//! [`Value::render`] produces the exact textual syntax the engine accepts
//! as an expression, so a rendered value can be spliced back into source
//! as a drop-in literal.
//!
//! [`Value::Error`] is terminal: any traversal that meets one stops and
//! propagates the message instead of recursing into it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind tags matching the engine's enumeration of value types.
///
/// The numbering is stable and part of the exchange contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ValueKind {
    Null = 0,
    Boolean = 1,
    Number = 2,
    Color = 3,
    String = 4,
    List = 5,
    Error = 6,
    Map = 7,
}

impl ValueKind {
    /// The small-integer tag the engine uses for this kind.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// List separator kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Comma,
    Space,
    /// Separator not yet determined; renders like a comma list.
    Undetermined,
}

impl Separator {
    fn join_str(self) -> &'static str {
        match self {
            Separator::Space => " ",
            Separator::Comma | Separator::Undetermined => ", ",
        }
    }
}

/// An error value met while rendering or converting values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValueError {
    pub message: String,
}

/// Insertion-ordered mapping from rendered keys to values.
///
/// Iteration and rendering follow insertion order; equality ignores it,
/// so two maps holding the same pairs compare equal however they were
/// built. Inserting an existing key overwrites the value in place and
/// keeps the key's original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SassMap {
    entries: IndexMap<String, Value>,
}

impl SassMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a key/value pair, returning the previous value for the key
    /// if one existed.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Render as an engine-compatible `(key: value, ...)` literal.
    ///
    /// The empty map renders as `()`. Keys are emitted as stored; values
    /// render through their own literal form.
    pub fn render(&self) -> Result<String, ValueError> {
        let mut rendered = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            rendered.push(format!("{}: {}", key, value.render()?));
        }
        Ok(format!("({})", rendered.join(", ")))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for SassMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = SassMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K: Into<String>> Extend<(K, Value)> for SassMap {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for SassMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a SassMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A Sass runtime value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The Sass `null` literal.
    Null,
    Boolean(bool),
    /// A number with a unit suffix; the unit is empty for unitless numbers.
    Number { value: f64, unit: String },
    /// Red, green and blue channels in 0-255, alpha in 0.0-1.0.
    Color {
        red: f64,
        green: f64,
        blue: f64,
        alpha: f64,
    },
    String { text: String, quoted: bool },
    List {
        items: Vec<Value>,
        separator: Separator,
    },
    /// Terminal error value; propagates through value algorithms.
    Error { message: String },
    Map(SassMap),
}

impl Value {
    /// An unquoted string value.
    pub fn string(text: impl Into<String>) -> Self {
        Value::String {
            text: text.into(),
            quoted: false,
        }
    }

    /// A quoted string value.
    pub fn quoted(text: impl Into<String>) -> Self {
        Value::String {
            text: text.into(),
            quoted: true,
        }
    }

    /// A unitless number.
    pub fn number(value: f64) -> Self {
        Value::Number {
            value,
            unit: String::new(),
        }
    }

    pub fn number_with_unit(value: f64, unit: impl Into<String>) -> Self {
        Value::Number {
            value,
            unit: unit.into(),
        }
    }

    /// An opaque color. Channels are clamped to 0-255.
    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// A color with alpha. Channels are clamped to 0-255, alpha to 0-1.
    pub fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Value::Color {
            red: red.clamp(0.0, 255.0),
            green: green.clamp(0.0, 255.0),
            blue: blue.clamp(0.0, 255.0),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn list(items: Vec<Value>, separator: Separator) -> Self {
        Value::List { items, separator }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Value::Error {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Number { .. } => ValueKind::Number,
            Value::Color { .. } => ValueKind::Color,
            Value::String { .. } => ValueKind::String,
            Value::List { .. } => ValueKind::List,
            Value::Error { .. } => ValueKind::Error,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// The small-integer tag the engine uses for this value's kind.
    pub fn tag(&self) -> u8 {
        self.kind().tag()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error { .. })
    }

    /// Render this value as an engine-compatible literal.
    ///
    /// Quoted strings wrap in double quotes without further escaping:
    /// callers supply already-valid literal text. Meeting an error value
    /// anywhere in the tree short-circuits the rendering.
    pub fn render(&self) -> Result<String, ValueError> {
        match self {
            Value::Null => Ok("null".to_string()),
            Value::Boolean(value) => Ok(value.to_string()),
            Value::Number { value, unit } => Ok(format!("{}{}", format_number(*value), unit)),
            Value::Color {
                red,
                green,
                blue,
                alpha,
            } => {
                let (red, green, blue) = (
                    format_number(*red),
                    format_number(*green),
                    format_number(*blue),
                );
                if (*alpha - 1.0).abs() < f64::EPSILON {
                    Ok(format!("rgb({red}, {green}, {blue})"))
                } else {
                    Ok(format!(
                        "rgba({red}, {green}, {blue}, {})",
                        format_number(*alpha)
                    ))
                }
            }
            Value::String { text, quoted } => {
                if *quoted {
                    Ok(format!("\"{text}\""))
                } else {
                    Ok(text.clone())
                }
            }
            Value::List { items, separator } => {
                if items.is_empty() {
                    return Ok("()".to_string());
                }
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(item.render()?);
                }
                Ok(rendered.join(separator.join_str()))
            }
            Value::Error { message } => Err(ValueError {
                message: message.clone(),
            }),
            Value::Map(map) => map.render(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::string(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::string(text)
    }
}

impl From<SassMap> for Value {
    fn from(map: SassMap) -> Self {
        Value::Map(map)
    }
}

/// Integral values print without a decimal point; everything else uses
/// the shortest round-trip form.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_renders_unit() {
        assert_eq!(SassMap::new().render().unwrap(), "()");
    }

    #[test]
    fn test_map_renders_in_insertion_order() {
        let mut map = SassMap::new();
        map.insert("a", Value::number(1.0));
        map.insert("b", Value::string("x"));

        assert_eq!(map.render().unwrap(), "(a: 1, b: x)");
    }

    #[test]
    fn test_map_equality_ignores_insertion_order() {
        let mut forward = SassMap::new();
        forward.insert("a", Value::number(1.0));
        forward.insert("b", Value::string("x"));

        let mut reverse = SassMap::new();
        reverse.insert("b", Value::string("x"));
        reverse.insert("a", Value::number(1.0));

        assert_eq!(forward, reverse);
        assert_ne!(forward.render().unwrap(), reverse.render().unwrap());
        assert_eq!(reverse.render().unwrap(), "(b: x, a: 1)");
    }

    #[test]
    fn test_map_duplicate_key_overwrites_in_place() {
        let mut map = SassMap::new();
        map.insert("a", Value::number(1.0));
        map.insert("b", Value::number(2.0));
        let previous = map.insert("a", Value::number(3.0));

        assert_eq!(previous, Some(Value::number(1.0)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.render().unwrap(), "(a: 3, b: 2)");
    }

    #[test]
    fn test_nested_values_render_recursively() {
        let mut inner = SassMap::new();
        inner.insert("weight", Value::number(400.0));
        inner.insert(
            "stack",
            Value::list(
                vec![Value::quoted("Inter"), Value::string("sans-serif")],
                Separator::Comma,
            ),
        );

        let mut map = SassMap::new();
        map.insert("font", Value::Map(inner));

        assert_eq!(
            map.render().unwrap(),
            "(font: (weight: 400, stack: \"Inter\", sans-serif))"
        );
    }

    #[test]
    fn test_error_short_circuits_list_rendering() {
        let list = Value::list(
            vec![Value::number(1.0), Value::error("boom"), Value::number(2.0)],
            Separator::Space,
        );

        let err = list.render().unwrap_err();
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn test_error_short_circuits_map_rendering() {
        let mut map = SassMap::new();
        map.insert("ok", Value::number(1.0));
        map.insert("bad", Value::error("invalid argument"));

        let err = Value::Map(map).render().unwrap_err();
        assert_eq!(err.message, "invalid argument");
    }

    #[test]
    fn test_number_rendering() {
        assert_eq!(Value::number(1.0).render().unwrap(), "1");
        assert_eq!(Value::number(0.5).render().unwrap(), "0.5");
        assert_eq!(Value::number(-3.0).render().unwrap(), "-3");
        assert_eq!(
            Value::number_with_unit(42.0, "px").render().unwrap(),
            "42px"
        );
        assert_eq!(
            Value::number_with_unit(1.25, "em").render().unwrap(),
            "1.25em"
        );
    }

    #[test]
    fn test_color_rendering() {
        assert_eq!(
            Value::rgb(255.0, 128.0, 0.0).render().unwrap(),
            "rgb(255, 128, 0)"
        );
        assert_eq!(
            Value::rgba(0.0, 0.0, 0.0, 0.5).render().unwrap(),
            "rgba(0, 0, 0, 0.5)"
        );
    }

    #[test]
    fn test_color_channels_clamp() {
        let color = Value::rgba(300.0, -4.0, 12.0, 1.5);
        assert_eq!(color.render().unwrap(), "rgb(255, 0, 12)");
    }

    #[test]
    fn test_string_rendering() {
        assert_eq!(Value::quoted("hello").render().unwrap(), "\"hello\"");
        assert_eq!(Value::string("hello").render().unwrap(), "hello");
    }

    #[test]
    fn test_list_separators() {
        let items = vec![Value::number(1.0), Value::number(2.0)];

        assert_eq!(
            Value::list(items.clone(), Separator::Comma).render().unwrap(),
            "1, 2"
        );
        assert_eq!(
            Value::list(items.clone(), Separator::Space).render().unwrap(),
            "1 2"
        );
        assert_eq!(
            Value::list(items, Separator::Undetermined).render().unwrap(),
            "1, 2"
        );
        assert_eq!(
            Value::list(Vec::new(), Separator::Comma).render().unwrap(),
            "()"
        );
    }

    #[test]
    fn test_null_and_boolean_rendering() {
        assert_eq!(Value::Null.render().unwrap(), "null");
        assert_eq!(Value::Boolean(true).render().unwrap(), "true");
        assert_eq!(Value::Boolean(false).render().unwrap(), "false");
    }

    #[test]
    fn test_tags_match_engine_enumeration() {
        assert_eq!(Value::Null.tag(), 0);
        assert_eq!(Value::Boolean(true).tag(), 1);
        assert_eq!(Value::number(1.0).tag(), 2);
        assert_eq!(Value::rgb(0.0, 0.0, 0.0).tag(), 3);
        assert_eq!(Value::string("s").tag(), 4);
        assert_eq!(Value::list(Vec::new(), Separator::Comma).tag(), 5);
        assert_eq!(Value::error("e").tag(), 6);
        assert_eq!(Value::Map(SassMap::new()).tag(), 7);
    }

    #[test]
    fn test_map_from_iterator_keeps_overwrite_semantics() {
        let map: SassMap = [
            ("a", Value::number(1.0)),
            ("b", Value::number(2.0)),
            ("a", Value::number(9.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.render().unwrap(), "(a: 9, b: 2)");
    }

    #[test]
    fn test_value_serde_roundtrip() {
        let mut map = SassMap::new();
        map.insert("size", Value::number_with_unit(2.0, "rem"));
        map.insert("shade", Value::rgba(10.0, 20.0, 30.0, 0.9));
        let value = Value::Map(map);

        let json = serde_json::to_string(&value).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, parsed);
    }
}
