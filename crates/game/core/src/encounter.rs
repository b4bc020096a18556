//! Encounter orchestration.
//!
//! [`Encounter`] owns the roster, the resolution pipeline, and both AI
//! drivers, and advances them in a fixed order every tick:
//!
//! 1. status timers and damage over time
//! 2. world snapshot (combatants plus live hostile projectiles)
//! 3. AI for every living AI-controlled combatant, in roster order
//! 4. descriptors submitted to the pipeline
//! 5. movement integration
//! 6. pipeline tick
//! 7. deaths: [`EncounterHooks::on_death`], then removal
//!
//! Spawning is always external: the encounter reports [`SpawnRequest`]s and
//! the host calls [`Encounter::spawn`].

use tracing::{debug, info};

use crate::ai::{BasicAi, BossDirector, SpawnRequest, VisualIntent};
use crate::combat::{AttackDescriptor, HitKind, HitRecord, ResolutionPipeline};
use crate::config::CombatConfig;
use crate::env::{PcgRng, TileOracle, compute_seed};
use crate::pattern::PatternCatalog;
use crate::state::{Combatant, Control, EntityId, Roster, RosterError, WorldView};

/// RNG stream discriminators.
const AI_STREAM: u32 = 0;
const RESOLUTION_STREAM: u32 = 1;

/// Host callbacks invoked during a tick.
pub trait EncounterHooks {
    /// Called once per death, before the combatant is removed.
    fn on_death(&mut self, _dead: &Combatant, _killer: Option<EntityId>) {}
}

impl EncounterHooks for () {}

#[derive(Clone, Debug, PartialEq)]
pub struct Death {
    pub id: EntityId,
    pub kind: String,
    pub killer: Option<EntityId>,
    pub was_boss: bool,
}

/// Everything that happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub hits: Vec<HitRecord>,
    pub spawn_requests: Vec<SpawnRequest>,
    pub intents: Vec<VisualIntent>,
    pub deaths: Vec<Death>,
}

pub struct Encounter {
    config: CombatConfig,
    roster: Roster,
    pipeline: ResolutionPipeline,
    director: BossDirector,
    basic: BasicAi,
    rng: PcgRng,
    clock: f32,
}

impl Encounter {
    pub fn new(config: CombatConfig, catalog: PatternCatalog, seed: u64) -> Self {
        let stream = |context| PcgRng::new(compute_seed(seed, EntityId::ENVIRONMENT.0, context));
        Self {
            pipeline: ResolutionPipeline::new(config.resolution.clone(), stream(RESOLUTION_STREAM)),
            director: BossDirector::new(&config, catalog),
            basic: BasicAi::new(config.targeting.clone()),
            rng: stream(AI_STREAM),
            roster: Roster::new(),
            clock: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn pipeline(&self) -> &ResolutionPipeline {
        &self.pipeline
    }

    pub fn director(&self) -> &BossDirector {
        &self.director
    }

    /// Simulated seconds since the encounter started.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.roster.get(id)
    }

    /// Reserves an id for a combatant the host is about to build.
    pub fn allocate_id(&mut self) -> Result<EntityId, RosterError> {
        self.roster.allocate_id()
    }

    /// Adds a combatant to the encounter.
    pub fn spawn(&mut self, combatant: Combatant) -> Result<EntityId, RosterError> {
        let id = self.roster.insert(combatant)?;
        debug!(entity = %id, "spawned");
        Ok(id)
    }

    /// Queues an attack from outside the AI (player input, traps).
    pub fn submit(&mut self, descriptor: AttackDescriptor) {
        self.pipeline.submit(descriptor);
    }

    pub fn tick(
        &mut self,
        dt: f32,
        tiles: Option<&dyn TileOracle>,
        hooks: &mut impl EncounterHooks,
    ) -> TickReport {
        let mut report = TickReport::default();
        if !(dt.is_finite() && dt > 0.0) {
            return report;
        }
        self.clock += dt;

        self.tick_status(dt, &mut report);

        let world = WorldView::from_combatants(self.roster.iter())
            .with_threats(self.pipeline.threats());
        for me in self.roster.iter_mut() {
            if !me.is_alive() || me.control == Control::External {
                continue;
            }
            let output = if me.is_boss() {
                self.director.tick(me, &world, tiles, &mut self.rng, dt)
            } else {
                self.basic.tick(me, &world, tiles, &mut self.rng, dt)
            };
            for descriptor in output.attacks {
                self.pipeline.submit(descriptor);
            }
            report.spawn_requests.extend(output.spawn_requests);
            report.intents.extend(output.intent);
        }

        let decay = self.config.movement.knockback_decay;
        for me in self.roster.iter_mut().filter(|c| c.is_alive()) {
            me.integrate(dt, decay);
        }

        report.hits.extend(self.pipeline.tick(dt, self.roster.as_mut_slice()));

        self.reap(hooks, &mut report);
        report
    }

    fn tick_status(&mut self, dt: f32, report: &mut TickReport) {
        for me in self.roster.iter_mut().filter(|c| c.is_alive()) {
            let owed = me.tick_timers(dt);
            if owed <= 0.0 {
                continue;
            }
            let source = me.status.dot_source().unwrap_or(EntityId::ENVIRONMENT);
            let outcome = me.take_damage(owed, source);
            report.hits.push(HitRecord {
                target: me.id,
                source,
                object: None,
                kind: HitKind::DamageOverTime,
                amount: outcome.dealt,
                is_crit: false,
                killed: outcome.killed,
            });
        }
    }

    fn reap(&mut self, hooks: &mut impl EncounterHooks, report: &mut TickReport) {
        let dead: Vec<EntityId> = self
            .roster
            .iter()
            .filter(|c| !c.is_alive())
            .map(|c| c.id)
            .collect();

        for id in dead {
            let Ok(combatant) = self.roster.remove(id) else {
                continue;
            };
            let killer = combatant.last_attacker;
            info!(entity = %id, kind = %combatant.kind, killer = ?killer, "combatant died");
            hooks.on_death(&combatant, killer);
            report.deaths.push(Death {
                id,
                kind: combatant.kind.clone(),
                killer,
                was_boss: combatant.is_boss(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::pattern::{ArchetypeId, standard_catalog};
    use crate::state::{BossState, CombatStats, Side, StatusEffect};

    fn encounter() -> Encounter {
        Encounter::new(CombatConfig::default(), standard_catalog().unwrap(), 7)
    }

    fn hero(id: u32, x: f32) -> Combatant {
        let stats = CombatStats {
            health: 300.0,
            max_health: 300.0,
            ..CombatStats::default()
        };
        Combatant::new(EntityId(id), "hero", Side::Players, stats)
            .at(Vec2::new(x, 0.0))
            .with_control(Control::External)
    }

    #[derive(Default)]
    struct Graveyard(Vec<(EntityId, Option<EntityId>)>);

    impl EncounterHooks for Graveyard {
        fn on_death(&mut self, dead: &Combatant, killer: Option<EntityId>) {
            self.0.push((dead.id, killer));
        }
    }

    #[test]
    fn duplicate_spawn_is_rejected() {
        let mut encounter = encounter();
        encounter.spawn(hero(1, 0.0)).unwrap();
        assert_eq!(
            encounter.spawn(hero(1, 0.0)),
            Err(RosterError::Duplicate(EntityId(1)))
        );
    }

    #[test]
    fn poison_kill_reports_source_and_removes() {
        let mut encounter = encounter();
        let mut victim = hero(1, 0.0);
        victim.stats.health = 5.0;
        victim.apply_status(StatusEffect::poison(200.0), 1.0, Some(EntityId(9)));
        encounter.spawn(victim).unwrap();

        let mut graveyard = Graveyard::default();
        let report = encounter.tick(0.05, None, &mut graveyard);

        assert!(report.hits.iter().any(|h| h.kind == HitKind::DamageOverTime && h.killed));
        assert_eq!(graveyard.0, vec![(EntityId(1), Some(EntityId(9)))]);
        assert_eq!(report.deaths.len(), 1);
        assert!(encounter.get(EntityId(1)).is_none());
    }

    #[test]
    fn melee_grunt_damages_adjacent_hero() {
        let mut encounter = encounter();
        encounter.spawn(hero(1, 30.0)).unwrap();
        let stats = CombatStats {
            attack_range: 40.0,
            damage: 12.0,
            ..CombatStats::default()
        };
        encounter
            .spawn(Combatant::new(EntityId(2), "grunt", Side::Hostile, stats))
            .unwrap();

        let mut dealt = 0.0;
        for _ in 0..10 {
            let report = encounter.tick(0.05, None, &mut ());
            dealt += report
                .hits
                .iter()
                .filter(|h| h.target == EntityId(1))
                .map(|h| h.amount)
                .sum::<f32>();
        }
        assert!(dealt >= 12.0);
    }

    #[test]
    fn boss_emits_intent_every_tick() {
        let mut encounter = encounter();
        encounter.spawn(hero(1, 150.0)).unwrap();
        let boss = Combatant::new(EntityId(2), "warden", Side::Hostile, CombatStats::default())
            .with_boss(BossState::new(ArchetypeId::FlameWarden));
        encounter.spawn(boss).unwrap();

        for _ in 0..20 {
            let report = encounter.tick(0.05, None, &mut ());
            assert_eq!(report.intents.len(), 1);
            assert_eq!(report.intents[0].entity, EntityId(2));
        }
    }

    #[test]
    fn invalid_dt_is_a_no_op() {
        let mut encounter = encounter();
        encounter.spawn(hero(1, 0.0)).unwrap();
        let report = encounter.tick(f32::NAN, None, &mut ());
        assert_eq!(report, TickReport::default());
        assert_eq!(encounter.clock(), 0.0);
    }
}
