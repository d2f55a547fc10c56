//! Managed object names of the form `domain:key=value[,key=value]*`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Why a string is not a valid object name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectNameError {
    #[error("object name `{0}` has no domain separator")]
    MissingDomain(String),
    #[error("object name `{0}` has an empty domain")]
    EmptyDomain(String),
    #[error("object name `{0}` has no properties")]
    NoProperties(String),
    #[error("object name `{name}` has a malformed property `{property}`")]
    MalformedProperty { name: String, property: String },
    #[error("object name `{name}` repeats the key `{key}`")]
    DuplicateKey { name: String, key: String },
}

/// The address of a managed object in a registry.
///
/// Property order does not matter for equality; `Display` renders the
/// canonical form with keys sorted.
///
/// ```
/// use collector_bridge::management::ObjectName;
///
/// let a: ObjectName = "java.lang:type=Memory,name=heap".parse().unwrap();
/// let b: ObjectName = "java.lang:name=heap,type=Memory".parse().unwrap();
///
/// assert_eq!(a, b);
/// assert_eq!(a.domain(), "java.lang");
/// assert_eq!(a.property("type"), Some("Memory"));
/// assert_eq!(a.to_string(), "java.lang:name=heap,type=Memory");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectName {
    domain: String,
    properties: BTreeMap<String, String>,
}

impl ObjectName {
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn is_reserved(c: char) -> bool {
    matches!(c, ':' | ',' | '=')
}

impl FromStr for ObjectName {
    type Err = ObjectNameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let (domain, list) = name
            .split_once(':')
            .ok_or_else(|| ObjectNameError::MissingDomain(name.to_string()))?;
        if domain.is_empty() {
            return Err(ObjectNameError::EmptyDomain(name.to_string()));
        }
        if list.is_empty() {
            return Err(ObjectNameError::NoProperties(name.to_string()));
        }

        let mut properties = BTreeMap::new();
        for property in list.split(',') {
            let malformed = || ObjectNameError::MalformedProperty {
                name: name.to_string(),
                property: property.to_string(),
            };
            let (key, value) = property.split_once('=').ok_or_else(malformed)?;
            if key.is_empty() || key.contains(is_reserved) || value.contains(is_reserved) {
                return Err(malformed());
            }
            if properties
                .insert(key.to_string(), value.to_string())
                .is_some()
            {
                return Err(ObjectNameError::DuplicateKey {
                    name: name.to_string(),
                    key: key.to_string(),
                });
            }
        }

        Ok(Self {
            domain: domain.to_string(),
            properties,
        })
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}
