//! Ordered transportation-mode class set

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Class order used by the reference models
pub const DEFAULT_CLASSES: [&str; 5] = ["walk", "car", "train", "bus", "bike"];

/// Errors raised by class lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassError {
    /// Label not present in the configured set
    #[error("Unknown class '{0}'")]
    Unknown(String),

    /// The same label listed twice
    #[error("Duplicate class '{0}'")]
    Duplicate(String),
}

/// Fixed, ordered set of class labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ClassSet {
    names: Vec<String>,
}

impl ClassSet {
    /// Build a class set, rejecting duplicates
    pub fn new<I, S>(names: I) -> Result<Self, ClassError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if collected.contains(&name) {
                return Err(ClassError::Duplicate(name));
            }
            collected.push(name);
        }
        Ok(Self { names: collected })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, class: &str) -> bool {
        self.names.iter().any(|n| n == class)
    }

    /// Position of `class` in the set
    pub fn index_of(&self, class: &str) -> Result<usize, ClassError> {
        self.names
            .iter()
            .position(|n| n == class)
            .ok_or_else(|| ClassError::Unknown(class.to_string()))
    }

    /// One-hot indicator of `class` over the set
    pub fn one_hot(&self, class: &str) -> Result<Vec<f64>, ClassError> {
        let idx = self.index_of(class)?;
        let mut mask = vec![0.0; self.names.len()];
        mask[idx] = 1.0;
        Ok(mask)
    }
}

impl Default for ClassSet {
    fn default() -> Self {
        Self {
            names: DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for ClassSet {
    type Error = ClassError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<ClassSet> for Vec<String> {
    fn from(set: ClassSet) -> Self {
        set.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let classes = ClassSet::default();
        assert_eq!(classes.index_of("walk").unwrap(), 0);
        assert_eq!(classes.index_of("bike").unwrap(), 4);
        assert_eq!(classes.len(), 5);
    }

    #[test]
    fn test_one_hot() {
        let classes = ClassSet::default();
        assert_eq!(classes.one_hot("train").unwrap(), vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unknown_class() {
        let classes = ClassSet::default();
        assert_eq!(
            classes.one_hot("taxi"),
            Err(ClassError::Unknown("taxi".to_string()))
        );
    }

    #[test]
    fn test_duplicates_rejected() {
        assert!(matches!(
            ClassSet::new(["walk", "car", "walk"]),
            Err(ClassError::Duplicate(_))
        ));
    }

    #[test]
    fn test_deserialize_from_list() {
        let classes: ClassSet = serde_json::from_str(r#"["bus","walk"]"#).unwrap();
        assert_eq!(classes.index_of("walk").unwrap(), 1);
        assert!(serde_json::from_str::<ClassSet>(r#"["bus","bus"]"#).is_err());
    }
}
