//! Combatant template loader.
//!
//! Templates are keyed by the same strings that appear in
//! [`SpawnRequest::kind`](deluge_core::SpawnRequest), so a host fulfils a
//! request by looking the key up and instantiating it `count` times.

use std::collections::BTreeMap;
use std::path::Path;

use deluge_core::{
    Ability, AbilityKind, ArchetypeId, BossState, CombatStats, Combatant, Element, EntityId, Side,
    Vec2,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub kind: AbilityKind,
    pub cooldown: f32,
    pub range: f32,
}

/// Everything needed to build a fresh combatant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantTemplate {
    pub name: String,
    pub side: Side,
    /// Health always starts at `max_health`.
    pub stats: CombatStats,
    pub radius: f32,
    /// Bosses take their archetype's element when this is unset.
    pub element: Option<Element>,
    pub boss: Option<ArchetypeId>,
    pub line_of_sight: bool,
    pub abilities: Vec<AbilitySpec>,
}

impl Default for CombatantTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            side: Side::Hostile,
            stats: CombatStats::default(),
            radius: 14.0,
            element: None,
            boss: None,
            line_of_sight: false,
            abilities: Vec::new(),
        }
    }
}

impl CombatantTemplate {
    pub fn instantiate(&self, kind: &str, id: EntityId, position: Vec2) -> Combatant {
        let mut stats = self.stats;
        stats.health = stats.max_health;
        let name = if self.name.is_empty() { kind } else { &self.name };

        let mut combatant = Combatant::new(id, name, self.side, stats)
            .with_kind(kind)
            .with_radius(self.radius)
            .at(position);
        if let Some(archetype) = self.boss {
            combatant = combatant.with_boss(BossState::new(archetype));
        }
        if let Some(element) = self.element {
            combatant = combatant.with_element(element);
        }
        if self.line_of_sight {
            combatant = combatant.with_line_of_sight();
        }
        for spec in &self.abilities {
            combatant = combatant.with_ability(Ability::new(spec.kind, spec.cooldown, spec.range));
        }
        combatant
    }
}

/// Templates by key.
#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, CombatantTemplate>,
}

impl TemplateRegistry {
    pub fn get(&self, kind: &str) -> Option<&CombatantTemplate> {
        self.templates.get(kind)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Builds a combatant from the template named `kind`.
    pub fn spawn(&self, kind: &str, id: EntityId, position: Vec2) -> Option<Combatant> {
        self.get(kind).map(|t| t.instantiate(kind, id, position))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Loader for combatant templates from RON files.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load templates from a RON file.
    ///
    /// RON format: `Vec<(String, CombatantTemplate)>`. Duplicate keys are an
    /// error.
    pub fn load(path: &Path) -> LoadResult<TemplateRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TemplateRegistry> {
        let entries: Vec<(String, CombatantTemplate)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse template RON: {}", e))?;

        let mut templates = BTreeMap::new();
        for (kind, template) in entries {
            if template.stats.max_health <= 0.0 {
                anyhow::bail!("Template '{}' has non-positive max_health", kind);
            }
            if templates.insert(kind.clone(), template).is_some() {
                anyhow::bail!("Duplicate template '{}'", kind);
            }
        }
        Ok(TemplateRegistry { templates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TEMPLATES: &str = r#"[
        ("flame_warden", (
            name: "Flame Warden",
            stats: (max_health: 1000.0, damage: 18.0, attack_range: 120.0, aggro_range: 600.0),
            radius: 28.0,
            boss: Some(FlameWarden),
        )),
        ("ember_imp", (
            stats: (max_health: 40.0, damage: 6.0, attack_range: 200.0),
            abilities: [(kind: Bolt, cooldown: 4.0, range: 220.0)],
            line_of_sight: true,
        )),
    ]"#;

    #[test]
    fn loads_and_instantiates_templates() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{TEMPLATES}").unwrap();
        let registry = TemplateLoader::load(file.path()).unwrap();
        assert_eq!(registry.len(), 2);

        let boss = registry
            .spawn("flame_warden", EntityId(1), Vec2::new(10.0, 20.0))
            .unwrap();
        assert!(boss.is_boss());
        assert_eq!(boss.name, "Flame Warden");
        assert_eq!(boss.kind, "flame_warden");
        assert_eq!(boss.stats.health, 1000.0);
        assert_eq!(boss.element, Element::Fire);
        assert_eq!(boss.position, Vec2::new(10.0, 20.0));

        let imp = registry.spawn("ember_imp", EntityId(2), Vec2::ZERO).unwrap();
        assert_eq!(imp.name, "ember_imp");
        assert_eq!(imp.side, Side::Hostile);
        assert_eq!(imp.stats.health, 40.0);
        assert_eq!(imp.abilities.len(), 1);
        assert!(imp.requires_los);
    }

    #[test]
    fn unknown_key_yields_none() {
        let registry = TemplateLoader::parse(TEMPLATES).unwrap();
        assert!(registry.spawn("dragon", EntityId(1), Vec2::ZERO).is_none());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let doubled = r#"[("imp", (name: "a")), ("imp", (name: "b"))]"#;
        assert!(TemplateLoader::parse(doubled).is_err());
    }

    #[test]
    fn unknown_archetype_is_rejected() {
        let bad = r#"[("boss", (boss: Some(LichKing)))]"#;
        assert!(TemplateLoader::parse(bad).is_err());
    }
}
