//! Pattern execution engine.
//!
//! Runs the active pattern's step logic once per tick and enforces two
//! watchdogs that hold whether or not a pattern is active:
//!
//! - **idle**: if no pattern has been active for longer than
//!   `idle_timeout`, selection is forced even if recovery has not elapsed
//! - **stall**: a pattern active for `pattern_timeout` is force-ended
//!
//! Every end path clears the run and the telegraph, zeroes velocity, starts
//! a short recovery, and resets the idle timer.

use glam::Vec2;
use tracing::{debug, warn};

use crate::config::{SelectionConfig, WatchdogConfig};
use crate::env::RngOracle;
use crate::pattern::{
    PatternCatalog, PatternContext, PatternId, PatternOutput, PatternRun, Progress,
    select_pattern,
};
use crate::state::BossState;

/// Why a pattern stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    Completed,
    /// Stall watchdog fired.
    Timeout,
    TargetLost,
    Stunned,
    /// Id not present in the catalog.
    Unregistered,
}

/// Result of one engine tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineTick {
    pub output: PatternOutput,
    pub selected: Option<PatternId>,
    pub ended: Option<(PatternId, EndReason)>,
}

#[derive(Clone, Debug, Default)]
pub struct PatternEngine {
    watchdog: WatchdogConfig,
    selection: SelectionConfig,
}

impl PatternEngine {
    pub fn new(watchdog: WatchdogConfig, selection: SelectionConfig) -> Self {
        Self {
            watchdog,
            selection,
        }
    }

    pub fn watchdog(&self) -> &WatchdogConfig {
        &self.watchdog
    }

    /// Advances the boss's pattern state by `ctx.dt`.
    ///
    /// `stunned` force-ends the active pattern and blocks selection.
    pub fn tick(
        &self,
        boss: &mut BossState,
        catalog: &PatternCatalog,
        ctx: &PatternContext,
        rng: &mut dyn RngOracle,
        stunned: bool,
    ) -> EngineTick {
        let dt = ctx.dt;
        boss.recovery = (boss.recovery - dt).max(0.0);
        boss.signature_cooldown = (boss.signature_cooldown - dt).max(0.0);

        let mut result = EngineTick::default();

        match boss.active.take() {
            Some(run) => self.advance(boss, catalog, ctx, rng, stunned, run, &mut result),
            None => {
                boss.idle_timer += dt;
                let ready = boss.recovery <= 0.0 || boss.idle_timer > self.watchdog.idle_timeout;
                if ready && !stunned && ctx.target.is_some() {
                    self.start(boss, catalog, ctx, rng, &mut result);
                }
            }
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn advance(
        &self,
        boss: &mut BossState,
        catalog: &PatternCatalog,
        ctx: &PatternContext,
        rng: &mut dyn RngOracle,
        stunned: bool,
        mut run: PatternRun,
        result: &mut EngineTick,
    ) {
        run.elapsed += ctx.dt;

        let reason = if stunned {
            Some(EndReason::Stunned)
        } else if run.elapsed >= self.watchdog.pattern_timeout - 1e-4 {
            Some(EndReason::Timeout)
        } else {
            match catalog.get(run.id) {
                None => {
                    warn!(pattern = %run.id, "unregistered pattern, ending");
                    Some(EndReason::Unregistered)
                }
                Some(pattern) if pattern.meta().requires_target && ctx.target.is_none() => {
                    Some(EndReason::TargetLost)
                }
                Some(pattern) => match pattern.tick(&mut run, ctx, rng, &mut result.output) {
                    Progress::Done => Some(EndReason::Completed),
                    Progress::Continue => None,
                },
            }
        };

        match reason {
            Some(reason) => {
                self.end(boss, run.id, reason, result);
            }
            None => {
                boss.telegraph = result.output.telegraph;
                boss.idle_timer = 0.0;
                boss.active = Some(run);
            }
        }
    }

    fn start(
        &self,
        boss: &mut BossState,
        catalog: &PatternCatalog,
        ctx: &PatternContext,
        rng: &mut dyn RngOracle,
        result: &mut EngineTick,
    ) {
        let Some(id) = select_pattern(boss, catalog, &self.selection, rng) else {
            return;
        };
        let Some(pattern) = catalog.get(id) else {
            return;
        };
        let state = pattern.enter(ctx, rng);
        boss.active = Some(PatternRun::new(id, state));
        boss.idle_timer = 0.0;
        boss.selections += 1;
        result.selected = Some(id);
    }

    fn end(&self, boss: &mut BossState, id: PatternId, reason: EndReason, result: &mut EngineTick) {
        debug!(pattern = %id, %reason, "pattern ended");
        boss.active = None;
        boss.telegraph = None;
        boss.recovery = self.watchdog.recovery * boss.cooldown_multiplier;
        boss.idle_timer = 0.0;
        result.output.velocity = Some(Vec2::ZERO);
        result.output.telegraph = None;
        result.ended = Some((id, reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;
    use crate::pattern::shapes::testing::ctx_with_target;
    use crate::pattern::{ArchetypeId, Pattern, PatternState, standard_catalog};

    /// Never finishes on its own.
    struct Stall;

    impl Pattern for Stall {
        fn id(&self) -> PatternId {
            PatternId::AimedVolley
        }

        fn enter(&self, _ctx: &PatternContext, _rng: &mut dyn RngOracle) -> PatternState {
            PatternState::Choreography {
                step_elapsed: 0.0,
                locked: None,
            }
        }

        fn tick(
            &self,
            _run: &mut PatternRun,
            _ctx: &PatternContext,
            _rng: &mut dyn RngOracle,
            _out: &mut PatternOutput,
        ) -> Progress {
            Progress::Continue
        }
    }

    fn stall_catalog() -> PatternCatalog {
        let mut catalog = PatternCatalog::new();
        catalog.register(Box::new(Stall)).unwrap();
        catalog
    }

    #[test]
    fn stalled_pattern_is_force_ended() {
        let engine = PatternEngine::default();
        let catalog = stall_catalog();
        let mut boss = BossState::new(ArchetypeId::FlameWarden);
        let ctx = ctx_with_target(Vec2::new(100.0, 0.0));
        let mut rng = PcgRng::new(1);

        let first = engine.tick(&mut boss, &catalog, &ctx, &mut rng, false);
        assert_eq!(first.selected, Some(PatternId::AimedVolley));

        let mut active_for = 0.0;
        loop {
            let step = engine.tick(&mut boss, &catalog, &ctx, &mut rng, false);
            active_for += ctx.dt;
            if let Some((_, reason)) = step.ended {
                assert_eq!(reason, EndReason::Timeout);
                assert_eq!(step.output.velocity, Some(Vec2::ZERO));
                break;
            }
            assert!(active_for <= 3.0 + 1e-3, "pattern outlived the watchdog");
        }
        assert!(boss.active.is_none());
        assert!(boss.telegraph.is_none());
    }

    #[test]
    fn lost_target_aborts_next_tick() {
        let engine = PatternEngine::default();
        let catalog = stall_catalog();
        let mut boss = BossState::new(ArchetypeId::FlameWarden);
        let mut ctx = ctx_with_target(Vec2::new(100.0, 0.0));
        let mut rng = PcgRng::new(1);

        engine.tick(&mut boss, &catalog, &ctx, &mut rng, false);
        ctx.target = None;
        let step = engine.tick(&mut boss, &catalog, &ctx, &mut rng, false);
        assert_eq!(step.ended, Some((PatternId::AimedVolley, EndReason::TargetLost)));
    }

    #[test]
    fn unregistered_active_pattern_ends_as_no_op() {
        let engine = PatternEngine::default();
        let catalog = stall_catalog();
        let mut boss = BossState::new(ArchetypeId::FlameWarden);
        boss.active = Some(PatternRun::new(
            PatternId::Pentagram,
            PatternState::Choreography {
                step_elapsed: 0.0,
                locked: None,
            },
        ));
        let ctx = ctx_with_target(Vec2::new(100.0, 0.0));
        let mut rng = PcgRng::new(1);

        let step = engine.tick(&mut boss, &catalog, &ctx, &mut rng, false);
        assert_eq!(step.ended, Some((PatternId::Pentagram, EndReason::Unregistered)));
        assert!(step.output.attacks.is_empty());
    }

    #[test]
    fn stun_ends_and_blocks_selection() {
        let engine = PatternEngine::default();
        let catalog = stall_catalog();
        let mut boss = BossState::new(ArchetypeId::FlameWarden);
        let ctx = ctx_with_target(Vec2::new(100.0, 0.0));
        let mut rng = PcgRng::new(1);

        engine.tick(&mut boss, &catalog, &ctx, &mut rng, false);
        let step = engine.tick(&mut boss, &catalog, &ctx, &mut rng, true);
        assert_eq!(step.ended.map(|(_, r)| r), Some(EndReason::Stunned));

        for _ in 0..40 {
            let step = engine.tick(&mut boss, &catalog, &ctx, &mut rng, true);
            assert!(step.selected.is_none());
        }
    }

    #[test]
    fn new_pattern_starts_within_idle_timeout() {
        let engine = PatternEngine::default();
        let catalog = standard_catalog().unwrap();
        let mut boss = BossState::new(ArchetypeId::ShadowReaver);
        let ctx = ctx_with_target(Vec2::new(150.0, 0.0));
        let mut rng = PcgRng::new(21);

        let mut idle = 0.0f32;
        let mut worst = 0.0f32;
        for _ in 0..2000 {
            let step = engine.tick(&mut boss, &catalog, &ctx, &mut rng, false);
            if boss.active.is_none() {
                idle += ctx.dt;
                worst = worst.max(idle);
            } else {
                idle = 0.0;
            }
            let _ = step;
        }
        assert!(worst <= 0.5 + 1e-3, "idle for {worst}s");
        assert!(boss.selections > 10);
    }

    #[test]
    fn enrage_shortens_recovery() {
        let engine = PatternEngine::default();
        let catalog = stall_catalog();
        let mut boss = BossState::new(ArchetypeId::FlameWarden);
        boss.cooldown_multiplier = 0.7;
        let ctx = ctx_with_target(Vec2::new(100.0, 0.0));
        let mut rng = PcgRng::new(1);

        engine.tick(&mut boss, &catalog, &ctx, &mut rng, false);
        engine.tick(&mut boss, &catalog, &ctx, &mut rng, true);
        assert!((boss.recovery - 0.25 * 0.7).abs() < 1e-6);
    }
}
