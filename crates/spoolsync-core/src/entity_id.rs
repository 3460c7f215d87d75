//! Entity ids as assigned by the Home Assistant registry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a string is not a valid entity id
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityIdError {
    #[error("expected exactly one '.' between domain and object id")]
    InvalidFormat,

    #[error("domain is empty")]
    EmptyDomain,

    #[error("object id is empty")]
    EmptyObjectId,

    #[error("domain must be [a-z0-9_], without leading, trailing or doubled underscores")]
    InvalidDomainChars,

    #[error("object id must be [a-z0-9_], without leading or trailing underscores")]
    InvalidObjectIdChars,
}

/// A registry entity id such as `sensor.x1c_ams_1_tray_1`
///
/// The registry lowercases and transliterates friendly names before it
/// assigns ids, so both parts are `[a-z0-9_]`. Every pattern SpoolSync
/// builds matches against that normalized space. Ordering is plain string
/// ordering, which discovery relies on as its last tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    full: String,
    dot: usize,
}

fn valid_part(part: &str) -> bool {
    !part.starts_with('_')
        && !part.ends_with('_')
        && part
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

impl EntityId {
    /// Build an id from its two parts
    pub fn new(domain: &str, object_id: &str) -> Result<Self, EntityIdError> {
        if domain.is_empty() {
            return Err(EntityIdError::EmptyDomain);
        }
        if object_id.is_empty() {
            return Err(EntityIdError::EmptyObjectId);
        }
        if !valid_part(domain) || domain.contains("__") {
            return Err(EntityIdError::InvalidDomainChars);
        }
        if !valid_part(object_id) {
            return Err(EntityIdError::InvalidObjectIdChars);
        }
        Ok(Self {
            full: format!("{}.{}", domain, object_id),
            dot: domain.len(),
        })
    }

    /// The full id
    pub fn as_str(&self) -> &str {
        &self.full
    }

    pub fn domain(&self) -> &str {
        &self.full[..self.dot]
    }

    /// Everything after the domain, e.g. `x1c_ams_1_tray_1`
    pub fn object_id(&self) -> &str {
        &self.full[self.dot + 1..]
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((domain, object_id)) if !object_id.contains('.') => Self::new(domain, object_id),
            _ => Err(EntityIdError::InvalidFormat),
        }
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> String {
        id.full
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let id: EntityId = "sensor.x1c_ams_1_tray_1".parse().unwrap();
        assert_eq!(id.domain(), "sensor");
        assert_eq!(id.object_id(), "x1c_ams_1_tray_1");
        assert_eq!(id.as_str(), "sensor.x1c_ams_1_tray_1");
        assert_eq!(EntityId::new("sensor", "x1c_ams_1_tray_1").unwrap(), id);
    }

    #[test]
    fn test_rejected() {
        let cases = [
            ("x1c_print_status", EntityIdError::InvalidFormat),
            ("sensor.x1c.print_status", EntityIdError::InvalidFormat),
            (".x1c", EntityIdError::EmptyDomain),
            ("sensor.", EntityIdError::EmptyObjectId),
            ("Sensor.x1c", EntityIdError::InvalidDomainChars),
            ("input__number.x1c", EntityIdError::InvalidDomainChars),
            ("sensor.X1C_print_status", EntityIdError::InvalidObjectIdChars),
            ("sensor.x1c_état", EntityIdError::InvalidObjectIdChars),
            ("sensor.x1c_", EntityIdError::InvalidObjectIdChars),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<EntityId>().unwrap_err(), expected, "{}", input);
        }
    }

    #[test]
    fn test_double_underscore_allowed_in_object_id() {
        assert!("sensor.x1c__tray_1".parse::<EntityId>().is_ok());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a: EntityId = "sensor.x1c_ams_1_tray_1".parse().unwrap();
        let b: EntityId = "sensor.x1c_ams_1_tray_1_2".parse().unwrap();
        let c: EntityId = "sensor.x1c_ams_2_tray_1".parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_serde_as_string() {
        let id: EntityId = "sensor.x1c_external_spool".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sensor.x1c_external_spool\"");
        assert_eq!(serde_json::from_str::<EntityId>(&json).unwrap(), id);
        assert!(serde_json::from_str::<EntityId>("\"not an id\"").is_err());
    }
}
