//! Boss phase transitions, enrage, minion healing, and reinforcements.

use tracing::{debug, info};

use crate::ai::SpawnRequest;
use crate::config::PhaseConfig;
use crate::pattern::PatternCatalog;
use crate::state::{BossState, Combatant, PhaseTriggers};

/// What happened to a boss's phase state this tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhaseEvents {
    /// New phase number, if a transition fired.
    pub transitioned: Option<u8>,
    /// Enrage fired this tick.
    pub enraged: bool,
    /// Health restored by bound minions.
    pub healed: f32,
    pub spawn_requests: Vec<SpawnRequest>,
}

#[derive(Clone, Debug, Default)]
pub struct PhaseController {
    config: PhaseConfig,
}

impl PhaseController {
    pub fn new(config: PhaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    /// Evaluates thresholds, then heals and schedules reinforcements.
    ///
    /// At most one phase threshold fires per call; a boss whose health skips
    /// several thresholds at once catches up over the following ticks.
    /// Enrage is only considered on a call where no transition fired, since a
    /// transition restores health above the enrage line.
    pub fn update(
        &self,
        me: &mut Combatant,
        catalog: &PatternCatalog,
        live_bound_minions: u32,
        dt: f32,
    ) -> PhaseEvents {
        let mut events = PhaseEvents::default();
        if !me.is_alive() {
            return events;
        }
        let Some(mut boss) = me.boss.take() else {
            return events;
        };

        let ratio = me.stats.health_ratio();
        if let Some(next) = self.pending_transition(&boss, ratio) {
            self.transition(me, &mut boss, catalog, next, &mut events);
        } else if ratio <= self.config.enrage_threshold && !boss.is_enraged() {
            boss.triggers.insert(PhaseTriggers::ENRAGE);
            boss.cooldown_multiplier *= self.config.enrage_cooldown_multiplier;
            events.enraged = true;
            info!(entity = %me.id, archetype = %boss.archetype, "boss enraged");
        }

        if live_bound_minions > 0 && self.config.transition_minions > 0 {
            let share = (live_bound_minions as f32 / self.config.transition_minions as f32).min(1.0);
            let amount = me.stats.max_health * self.config.minion_heal_rate * share * dt;
            events.healed = me.heal(amount);
        }

        if boss.phase >= 2 {
            boss.reinforcement_timer += dt;
            let interval = if boss.is_enraged() {
                self.config.enraged_reinforcement_interval
            } else {
                self.config.reinforcement_interval
            };
            if interval > 0.0 && boss.reinforcement_timer >= interval {
                boss.reinforcement_timer = 0.0;
                debug!(entity = %me.id, count = self.config.reinforcement_count, "reinforcements");
                events.spawn_requests.push(SpawnRequest {
                    kind: boss.archetype.info().minion.to_string(),
                    count: self.config.reinforcement_count,
                    position: Some(me.position),
                    summoner: me.id,
                    bound_to_phase: false,
                });
            }
        }

        me.boss = Some(boss);
        events
    }

    fn pending_transition(&self, boss: &BossState, ratio: f32) -> Option<(u8, PhaseTriggers)> {
        let [to_two, to_three] = self.config.thresholds;
        if !boss.triggers.contains(PhaseTriggers::PHASE_TWO) && ratio <= to_two {
            Some((2, PhaseTriggers::PHASE_TWO))
        } else if !boss.triggers.contains(PhaseTriggers::PHASE_THREE) && ratio <= to_three {
            Some((3, PhaseTriggers::PHASE_THREE))
        } else {
            None
        }
    }

    fn transition(
        &self,
        me: &mut Combatant,
        boss: &mut BossState,
        catalog: &PatternCatalog,
        (phase, trigger): (u8, PhaseTriggers),
        events: &mut PhaseEvents,
    ) {
        boss.triggers.insert(trigger);
        boss.phase = boss.phase.max(phase);
        boss.stage = boss.stage.saturating_add(1);
        boss.unlocked = catalog.unlocked_for_phase(boss.phase);
        boss.reinforcement_timer = 0.0;

        me.stats.health = me.stats.max_health;
        me.invulnerable = me.invulnerable.max(self.config.invulnerability);

        events.transitioned = Some(boss.phase);
        if self.config.transition_minions > 0 {
            events.spawn_requests.push(SpawnRequest {
                kind: boss.archetype.info().minion.to_string(),
                count: self.config.transition_minions,
                position: Some(me.position),
                summoner: me.id,
                bound_to_phase: true,
            });
        }
        info!(
            entity = %me.id,
            archetype = %boss.archetype,
            phase = boss.phase,
            unlocked = boss.unlocked.len(),
            "phase transition"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{ArchetypeId, PatternId, standard_catalog};
    use crate::state::{CombatStats, EntityId, Side};

    fn boss() -> Combatant {
        let stats = CombatStats {
            health: 1000.0,
            max_health: 1000.0,
            ..CombatStats::default()
        };
        Combatant::new(EntityId(1), "warden", Side::Hostile, stats)
            .with_boss(BossState::new(ArchetypeId::FlameWarden))
    }

    fn phase_of(me: &Combatant) -> u8 {
        me.boss.as_ref().map(|b| b.phase).unwrap_or(0)
    }

    #[test]
    fn crossing_first_threshold_transitions_once() {
        let catalog = standard_catalog().unwrap();
        let controller = PhaseController::default();
        let mut me = boss();
        me.stats.health = 660.0;

        let events = controller.update(&mut me, &catalog, 0, 0.05);
        assert_eq!(events.transitioned, Some(2));
        assert_eq!(me.stats.health, 1000.0);
        assert!(me.is_invulnerable());
        assert_eq!(events.spawn_requests.len(), 1);
        assert_eq!(events.spawn_requests[0].count, 10);
        assert_eq!(events.spawn_requests[0].kind, "ember_imp");
        assert!(events.spawn_requests[0].bound_to_phase);
        assert!(me.boss.as_ref().unwrap().unlocked.contains(&PatternId::MeteorRain));

        me.stats.health = 660.0;
        let again = controller.update(&mut me, &catalog, 0, 0.05);
        assert_eq!(again.transitioned, None);
        assert_eq!(phase_of(&me), 2);
    }

    #[test]
    fn one_threshold_per_tick() {
        let catalog = standard_catalog().unwrap();
        let controller = PhaseController::default();
        let mut me = boss();
        me.stats.health = 100.0;

        let first = controller.update(&mut me, &catalog, 0, 0.05);
        assert_eq!(first.transitioned, Some(2));
        assert!(!first.enraged);

        me.stats.health = 100.0;
        let second = controller.update(&mut me, &catalog, 0, 0.05);
        assert_eq!(second.transitioned, Some(3));
        assert_eq!(me.boss.as_ref().unwrap().stage, 2);

        me.stats.health = 100.0;
        let third = controller.update(&mut me, &catalog, 0, 0.05);
        assert!(third.enraged);
        assert!(me.boss.as_ref().unwrap().is_enraged());
        assert!((me.boss.as_ref().unwrap().cooldown_multiplier - 0.7).abs() < 1e-6);
    }

    #[test]
    fn bound_minions_heal_proportionally() {
        let catalog = standard_catalog().unwrap();
        let controller = PhaseController::default();
        let mut me = boss();
        me.stats.health = 800.0;

        let events = controller.update(&mut me, &catalog, 5, 1.0);
        // 1000 * 0.02 * 0.5 * 1.0
        assert!((events.healed - 10.0).abs() < 1e-3);

        let capped = controller.update(&mut me, &catalog, 40, 1.0);
        assert!((capped.healed - 20.0).abs() < 1e-3);
    }

    #[test]
    fn reinforcements_start_in_phase_two() {
        let catalog = standard_catalog().unwrap();
        let controller = PhaseController::default();
        let mut me = boss();

        let quiet = controller.update(&mut me, &catalog, 0, 25.0);
        assert!(quiet.spawn_requests.is_empty());

        me.stats.health = 600.0;
        controller.update(&mut me, &catalog, 0, 0.05);
        let events = controller.update(&mut me, &catalog, 0, 20.0);
        assert_eq!(events.spawn_requests.len(), 1);
        assert_eq!(events.spawn_requests[0].count, 2);
        assert!(!events.spawn_requests[0].bound_to_phase);
    }

    #[test]
    fn non_boss_is_ignored() {
        let catalog = standard_catalog().unwrap();
        let mut grunt = Combatant::new(EntityId(2), "grunt", Side::Hostile, CombatStats::default());
        grunt.stats.health = 1.0;
        let events = PhaseController::default().update(&mut grunt, &catalog, 0, 0.05);
        assert_eq!(events, PhaseEvents::default());
    }
}
