//! Encounter setup and the fixed-timestep loop.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use deluge_content::{Arena, ContentFactory, TemplateRegistry};
use deluge_core::{
    Combatant, Encounter, EncounterHooks, EntityId, HitKind, PatternId, Side, SpawnRequest,
    TickReport, TileOracle, Vec2, standard_catalog,
};
use tracing::{debug, info, warn};

/// Spacing between combatants spawned from the same point.
const SPAWN_SPREAD: f32 = 24.0;

#[derive(Clone, Copy, Debug)]
pub struct SimulationOptions {
    pub seconds: f32,
    pub dt: f32,
    pub seed: u64,
    pub max_combatants: usize,
}

pub struct Simulation {
    encounter: Encounter,
    templates: TemplateRegistry,
    arena: Arena,
    options: SimulationOptions,
}

impl Simulation {
    /// Loads content and places the arena's initial combatants.
    pub fn load(data_dir: &Path, arena_name: &str, options: SimulationOptions) -> Result<Self> {
        if !(options.dt.is_finite() && options.dt > 0.0) {
            anyhow::bail!("dt must be positive, got {}", options.dt);
        }

        let factory = ContentFactory::new(data_dir);
        let config = factory.load_config().context("Failed to load combat config")?;
        let templates = factory
            .load_templates()
            .context("Failed to load combatant templates")?;
        let arena = factory
            .load_arena(arena_name)
            .with_context(|| format!("Failed to load arena '{arena_name}'"))?;
        let catalog = standard_catalog().context("Failed to build pattern catalog")?;

        let mut encounter = Encounter::new(config, catalog, options.seed);
        for point in &arena.spawns {
            let center = arena.spawn_position(point);
            for index in 0..point.count {
                let id = encounter.allocate_id()?;
                let position = center + spread(index, point.count);
                let combatant = templates
                    .spawn(&point.template, id, position)
                    .with_context(|| format!("Unknown template '{}'", point.template))?;
                encounter.spawn(combatant)?;
            }
        }
        info!(
            arena = arena_name,
            combatants = encounter.roster().len(),
            seed = options.seed,
            "encounter ready"
        );

        Ok(Self {
            encounter,
            templates,
            arena,
            options,
        })
    }

    /// Runs until one side is wiped out or time runs out.
    pub fn run(&mut self) -> Summary {
        let dt = self.options.dt;
        let ticks = (self.options.seconds / dt).ceil().max(0.0) as u64;
        let mut log = CombatLog::default();

        let mut outcome = Outcome::Timeout;
        for _ in 0..ticks {
            let tiles: &dyn TileOracle = &self.arena.tiles;
            let report = self.encounter.tick(dt, Some(tiles), &mut log);
            log.record(&report);
            for request in &report.spawn_requests {
                self.fulfil(request);
            }

            if let Some(winner) = self.decided() {
                outcome = winner;
                break;
            }
        }

        Summary {
            outcome,
            elapsed: self.encounter.clock(),
            survivors: self
                .encounter
                .roster()
                .iter()
                .map(|c| (c.kind.clone(), c.stats.health))
                .collect(),
            log,
        }
    }

    fn decided(&self) -> Option<Outcome> {
        let alive = |side: Side| self.encounter.roster().iter().any(|c| c.side == side);
        match (alive(Side::Players), alive(Side::Hostile)) {
            (true, false) => Some(Outcome::PlayersWon),
            (false, true) => Some(Outcome::HostilesWon),
            (false, false) => Some(Outcome::Draw),
            (true, true) => None,
        }
    }

    /// Spawns what a request asks for, within the combatant cap.
    fn fulfil(&mut self, request: &SpawnRequest) {
        let room = self
            .options
            .max_combatants
            .saturating_sub(self.encounter.roster().len());
        let count = (request.count as usize).min(room);
        if count < request.count as usize {
            warn!(
                kind = %request.kind,
                requested = request.count,
                granted = count,
                "combatant cap reached, trimming spawn request"
            );
        }
        let Some(template) = self.templates.get(&request.kind) else {
            warn!(kind = %request.kind, "no template for spawn request");
            return;
        };

        let center = request
            .position
            .or_else(|| self.encounter.get(request.summoner).map(|c| c.position))
            .unwrap_or(Vec2::ZERO);
        for index in 0..count {
            let mut position = center + spread(index as u32, count as u32);
            let (cx, cy) = self.arena.tiles.cell_of(position);
            if self.arena.tiles.is_opaque(cx, cy) {
                position = center;
            }
            let id = match self.encounter.allocate_id() {
                Ok(id) => id,
                Err(err) => {
                    warn!(%err, "spawn request dropped");
                    return;
                }
            };
            let minion: Combatant = template
                .instantiate(&request.kind, id, position)
                .summoned_by(request.summoner, request.bound_to_phase);
            if let Err(err) = self.encounter.spawn(minion) {
                warn!(%err, "spawn rejected");
            }
        }
        debug!(kind = %request.kind, count, summoner = %request.summoner, "spawn request fulfilled");
    }
}

/// Offset for the `index`-th of `count` combatants around a point.
fn spread(index: u32, count: u32) -> Vec2 {
    if count <= 1 {
        return Vec2::ZERO;
    }
    Vec2::from_angle(std::f32::consts::TAU * index as f32 / count as f32) * SPAWN_SPREAD
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    PlayersWon,
    HostilesWon,
    Draw,
    Timeout,
}

/// Running tallies collected from tick reports and death hooks.
#[derive(Debug, Default)]
pub struct CombatLog {
    damage_dealt: BTreeMap<EntityId, f32>,
    crits: u32,
    healed: f32,
    kills: BTreeMap<EntityId, u32>,
    deaths: Vec<(String, Option<EntityId>)>,
    patterns: BTreeMap<PatternId, u32>,
    last_pattern: BTreeMap<EntityId, PatternId>,
    phase_transitions: u32,
}

impl CombatLog {
    fn record(&mut self, report: &TickReport) {
        for hit in &report.hits {
            match hit.kind {
                HitKind::Heal => self.healed += hit.amount,
                _ => *self.damage_dealt.entry(hit.source).or_default() += hit.amount,
            }
            if hit.is_crit {
                self.crits += 1;
            }
        }
        for intent in &report.intents {
            if intent.phase_flash {
                self.phase_transitions += 1;
            }
            match intent.pattern {
                Some(id) if self.last_pattern.get(&intent.entity) != Some(&id) => {
                    self.last_pattern.insert(intent.entity, id);
                    *self.patterns.entry(id).or_default() += 1;
                }
                Some(_) => {}
                None => {
                    self.last_pattern.remove(&intent.entity);
                }
            }
        }
    }
}

impl EncounterHooks for CombatLog {
    fn on_death(&mut self, dead: &Combatant, killer: Option<EntityId>) {
        if let Some(killer) = killer {
            *self.kills.entry(killer).or_default() += 1;
        }
        self.deaths.push((dead.kind.clone(), killer));
    }
}

pub struct Summary {
    pub outcome: Outcome,
    pub elapsed: f32,
    pub survivors: Vec<(String, f32)>,
    pub log: CombatLog,
}

impl Summary {
    pub fn log(&self) {
        info!(outcome = ?self.outcome, elapsed = self.elapsed, "encounter finished");
        info!(
            deaths = self.log.deaths.len(),
            phase_transitions = self.log.phase_transitions,
            crits = self.log.crits,
            healed = self.log.healed,
            "totals"
        );
        for (source, amount) in &self.log.damage_dealt {
            let kills = self.log.kills.get(source).copied().unwrap_or(0);
            info!(%source, damage = amount, kills, "damage by source");
        }
        for (pattern, count) in &self.log.patterns {
            info!(%pattern, count, "pattern usage");
        }
        for (kind, health) in &self.survivors {
            info!(%kind, health, "survivor");
        }
    }
}
