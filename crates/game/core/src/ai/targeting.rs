//! Target acquisition and aggro retention.

use tracing::debug;

use crate::config::TargetingConfig;
use crate::env::{TileOracle, line_of_sight};
use crate::state::{AiState, Combatant, TargetInfo, WorldView};

/// Validates the current target and acquires a new one if needed.
///
/// - A target that died, left the world, or stopped being hostile is dropped.
/// - Bosses never drop a live target for distance.
/// - Others drop it beyond `aggro_range * leash_factor`.
/// - Acquisition picks the nearest opposing combatant within `aggro_range`
///   (and in sight, when the combatant requires it) and switches to `Chase`.
pub fn update_target(
    me: &mut Combatant,
    world: &WorldView,
    tiles: Option<&dyn TileOracle>,
    config: &TargetingConfig,
) -> Option<TargetInfo> {
    if let Some(id) = me.target {
        let kept = world
            .get(id)
            .filter(|t| t.active && me.side.is_opposed(t.side))
            .filter(|t| {
                me.is_boss()
                    || me.position.distance(t.position) <= me.stats.aggro_range * config.leash_factor
            })
            .copied();
        match kept {
            Some(target) => return Some(target),
            None => {
                debug!(entity = %me.id, target = %id, "target dropped");
                me.target = None;
            }
        }
    }

    let acquired = world
        .opponents_of(me.side)
        .filter(|t| me.position.distance(t.position) <= me.stats.aggro_range)
        .filter(|t| match (me.requires_los, tiles) {
            (true, Some(tiles)) => line_of_sight(me.position, t.position, tiles, config.los_step),
            _ => true,
        })
        .min_by(|a, b| {
            me.position
                .distance_squared(a.position)
                .total_cmp(&me.position.distance_squared(b.position))
        })
        .copied();

    if let Some(target) = acquired {
        debug!(entity = %me.id, target = %target.id, "target acquired");
        me.target = Some(target.id);
        me.ai_state = AiState::Chase;
    }
    acquired
}
