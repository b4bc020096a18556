//! Ordered storage of the combatants in an encounter.

use crate::error::{CoreError, ErrorSeverity};
use crate::state::{Combatant, EntityId};

/// Errors from roster mutation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("entity {0} is already in the roster")]
    Duplicate(EntityId),

    #[error("entity {0} not found")]
    NotFound(EntityId),

    #[error("entity id space exhausted")]
    Exhausted,
}

impl CoreError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RosterError::Duplicate(_) => ErrorSeverity::Validation,
            RosterError::NotFound(_) => ErrorSeverity::Recoverable,
            RosterError::Exhausted => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RosterError::Duplicate(_) => "ROSTER_DUPLICATE",
            RosterError::NotFound(_) => "ROSTER_NOT_FOUND",
            RosterError::Exhausted => "ROSTER_EXHAUSTED",
        }
    }
}

/// Combatants in stable insertion order.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    entries: Vec<Combatant>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id not used by any current or past insertion.
    ///
    /// [`EntityId::ENVIRONMENT`] is reserved and never handed out.
    pub fn allocate_id(&mut self) -> Result<EntityId, RosterError> {
        loop {
            let candidate = EntityId(self.next_id);
            if candidate.is_environment() {
                return Err(RosterError::Exhausted);
            }
            self.next_id += 1;
            if !self.contains(candidate) {
                return Ok(candidate);
            }
        }
    }

    pub fn insert(&mut self, combatant: Combatant) -> Result<EntityId, RosterError> {
        let id = combatant.id;
        if self.contains(id) {
            return Err(RosterError::Duplicate(id));
        }
        if id.0 >= self.next_id && !id.is_environment() {
            self.next_id = id.0.saturating_add(1);
        }
        self.entries.push(combatant);
        Ok(id)
    }

    pub fn remove(&mut self, id: EntityId) -> Result<Combatant, RosterError> {
        let index = self.index_of(id).ok_or(RosterError::NotFound(id))?;
        Ok(self.entries.remove(index))
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entries.iter().position(|c| c.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.entries.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.entries.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.entries.iter_mut()
    }

    pub fn as_slice(&self) -> &[Combatant] {
        &self.entries
    }

    pub fn as_mut_slice(&mut self) -> &mut [Combatant] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
