//! Tagged value type for header fields that have no fixed schema.

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value as YamlValue;
use std::fmt;
use thiserror::Error;

/// A single value stored under a metadata key.
///
/// Known keys (`title`, `labels`, ...) and custom keys share this
/// representation so that the header keeps its original key order. Typed
/// access to the known keys lives on [`Metadata`](crate::domain::Metadata).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<MetaValue>),
    Map(IndexMap<String, MetaValue>),
}

/// Error returned when a YAML value has no `MetaValue` equivalent.
#[derive(Debug, Error)]
pub enum MetaValueError {
    #[error("mapping keys must be strings, found {0}")]
    NonStringKey(String),

    #[error("tagged values are not supported: {0}")]
    Tagged(String),
}

impl MetaValue {
    /// Returns true for values the serializer drops: null, `""` and `[]`.
    pub fn is_blank(&self) -> bool {
        match self {
            MetaValue::Null => true,
            MetaValue::String(s) => s.is_empty(),
            MetaValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Parses a YAML fragment such as `true`, `42`, `[a, b]` or `plain text`.
    ///
    /// An empty fragment yields `Null`.
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        let value: YamlValue = serde_yaml::from_str(s)?;
        MetaValue::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<YamlValue> for MetaValue {
    type Error = MetaValueError;

    fn try_from(value: YamlValue) -> Result<Self, Self::Error> {
        Ok(match value {
            YamlValue::Null => MetaValue::Null,
            YamlValue::Bool(b) => MetaValue::Bool(b),
            YamlValue::Number(n) => match n.as_i64() {
                Some(i) => MetaValue::Integer(i),
                None => MetaValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            YamlValue::String(s) => MetaValue::String(s),
            YamlValue::Sequence(items) => MetaValue::List(
                items
                    .into_iter()
                    .map(MetaValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            YamlValue::Mapping(mapping) => {
                let mut map = IndexMap::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let YamlValue::String(key) = key else {
                        return Err(MetaValueError::NonStringKey(format!("{key:?}")));
                    };
                    map.insert(key, MetaValue::try_from(value)?);
                }
                MetaValue::Map(map)
            }
            YamlValue::Tagged(tagged) => {
                return Err(MetaValueError::Tagged(tagged.tag.to_string()));
            }
        })
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::String(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::String(s)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

impl From<i64> for MetaValue {
    fn from(n: i64) -> Self {
        MetaValue::Integer(n)
    }
}

impl From<f64> for MetaValue {
    fn from(n: f64) -> Self {
        MetaValue::Float(n)
    }
}

impl<T: Into<MetaValue>> From<Vec<T>> for MetaValue {
    fn from(items: Vec<T>) -> Self {
        MetaValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<MetaValue>> From<Option<T>> for MetaValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(MetaValue::Null, Into::into)
    }
}

/// Human-oriented rendering used by the CLI.
impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Null => Ok(()),
            MetaValue::Bool(b) => write!(f, "{b}"),
            MetaValue::Integer(n) => write!(f, "{n}"),
            MetaValue::Float(n) => write!(f, "{n}"),
            MetaValue::String(s) => f.write_str(s),
            MetaValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            MetaValue::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}
