//! Attack resolution.
//!
//! # Architecture
//!
//! - **Descriptors**: AI emits [`AttackDescriptor`] values, never live objects
//! - **Pipeline**: [`ResolutionPipeline`] owns every projectile, hitbox, and
//!   zone and adjudicates collisions in stable insertion order
//! - **Targets**: anything implementing [`CombatTarget`] can be hit
//!
//! # Core Functions
//!
//! - `calculate_damage`: `max(1, incoming - defense * 0.3)`
//! - `splash_damage`: flat 0.7x for chained explosions

pub mod damage;
pub mod descriptor;
pub mod objects;
pub mod pipeline;
pub mod target;

pub use damage::{DamageOutcome, Element, calculate_damage, splash_damage};
pub use descriptor::{
    Aim, AttackDescriptor, AttackKind, AttackQueue, AttackShape, HitPayload, OnHit, Owner,
    ZoneSpec,
};
pub use objects::{AreaZone, LiveObject, MeleeHitbox, ObjectBody, ObjectId, Projectile};
pub use pipeline::{HitKind, HitRecord, ResolutionPipeline};
pub use target::CombatTarget;
