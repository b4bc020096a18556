//! Pattern registry.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CoreError, ErrorSeverity};
use crate::pattern::{Pattern, PatternId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("pattern {0} is already registered")]
    Duplicate(PatternId),

    #[error("pattern {0} is not registered")]
    Unknown(PatternId),
}

impl CoreError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::Duplicate(_) => ErrorSeverity::Validation,
            CatalogError::Unknown(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Duplicate(_) => "CATALOG_DUPLICATE",
            CatalogError::Unknown(_) => "CATALOG_UNKNOWN",
        }
    }
}

/// Pattern implementations keyed by id.
#[derive(Default)]
pub struct PatternCatalog {
    patterns: BTreeMap<PatternId, Box<dyn Pattern>>,
}

impl PatternCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, pattern: Box<dyn Pattern>) -> Result<(), CatalogError> {
        let id = pattern.id();
        if self.patterns.contains_key(&id) {
            return Err(CatalogError::Duplicate(id));
        }
        self.patterns.insert(id, pattern);
        Ok(())
    }

    /// Registers or overwrites, returning the previous implementation.
    pub fn replace(&mut self, pattern: Box<dyn Pattern>) -> Option<Box<dyn Pattern>> {
        self.patterns.insert(pattern.id(), pattern)
    }

    pub fn remove(&mut self, id: PatternId) -> Result<Box<dyn Pattern>, CatalogError> {
        self.patterns.remove(&id).ok_or(CatalogError::Unknown(id))
    }

    pub fn get(&self, id: PatternId) -> Option<&dyn Pattern> {
        self.patterns.get(&id).map(|p| p.as_ref())
    }

    pub fn contains(&self, id: PatternId) -> bool {
        self.patterns.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PatternId> + '_ {
        self.patterns.keys().copied()
    }

    /// Registered shared patterns unlocked at `phase`.
    pub fn unlocked_for_phase(&self, phase: u8) -> Vec<PatternId> {
        PatternId::unlocked_at(phase)
            .filter(|id| self.contains(*id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl fmt::Debug for PatternCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.patterns.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::shapes::{ProjectileSpec, TimedBurst};

    fn volley() -> Box<dyn Pattern> {
        Box::new(TimedBurst::new(
            PatternId::AimedVolley,
            ProjectileSpec::new(300.0, 1.0),
        ))
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut catalog = PatternCatalog::new();
        catalog.register(volley()).unwrap();
        let err = catalog.register(volley()).unwrap_err();
        assert_eq!(err, CatalogError::Duplicate(PatternId::AimedVolley));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn unlocked_only_lists_registered_patterns() {
        let mut catalog = PatternCatalog::new();
        catalog.register(volley()).unwrap();
        assert_eq!(catalog.unlocked_for_phase(3), vec![PatternId::AimedVolley]);
    }

    #[test]
    fn removing_unknown_pattern_fails() {
        let mut catalog = PatternCatalog::new();
        assert!(matches!(
            catalog.remove(PatternId::Leap),
            Err(CatalogError::Unknown(PatternId::Leap))
        ));
    }
}
