//! Pattern identifiers and unlock tiers.

use crate::pattern::ArchetypeId;

/// Every named attack pattern.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PatternId {
    // ========================================================================
    // Always available
    // ========================================================================
    AimedVolley,
    SpreadShot,
    RadialBurst,
    ChargeSlam,
    CleaveCombo,
    GroundPound,
    TargetedBlast,
    SpiralBarrage,
    Leap,

    // ========================================================================
    // Phase 2
    // ========================================================================
    RingCollapse,
    CrossFire,
    MeteorRain,
    DoubleCharge,
    PillarLine,
    Shockwave,

    // ========================================================================
    // Phase 3
    // ========================================================================
    Pentagram,
    BulletHell,
    Annihilation,
    GridLockdown,
    BlinkStrike,

    // ========================================================================
    // Archetype uniques and signatures
    // ========================================================================
    FlameWave,
    Firewall,
    Inferno,

    IceShards,
    FrozenPrison,
    Blizzard,

    ChainLightning,
    ThunderStrike,
    Tempest,

    ToxicPools,
    VenomSpray,
    Plague,

    ShadowClones,
    VoidRift,
    Eclipse,

    Earthquake,
    BoulderToss,
    Avalanche,
}

/// When a pattern becomes eligible for selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Always,
    PhaseTwo,
    PhaseThree,
    /// Added to the pool of one archetype in every phase.
    Unique(ArchetypeId),
    /// Chosen only through the signature roll of one archetype.
    Signature(ArchetypeId),
}

impl Tier {
    /// Phase at which a shared tier unlocks. Archetype tiers return `None`.
    pub const fn unlock_phase(self) -> Option<u8> {
        match self {
            Tier::Always => Some(1),
            Tier::PhaseTwo => Some(2),
            Tier::PhaseThree => Some(3),
            Tier::Unique(_) | Tier::Signature(_) => None,
        }
    }
}

impl PatternId {
    pub const fn tier(self) -> Tier {
        use ArchetypeId::*;
        use PatternId::*;
        match self {
            AimedVolley | SpreadShot | RadialBurst | ChargeSlam | CleaveCombo | GroundPound
            | TargetedBlast | SpiralBarrage | Leap => Tier::Always,

            RingCollapse | CrossFire | MeteorRain | DoubleCharge | PillarLine | Shockwave => {
                Tier::PhaseTwo
            }

            Pentagram | BulletHell | Annihilation | GridLockdown | BlinkStrike => Tier::PhaseThree,

            FlameWave | Firewall => Tier::Unique(FlameWarden),
            Inferno => Tier::Signature(FlameWarden),
            IceShards | FrozenPrison => Tier::Unique(FrostMatriarch),
            Blizzard => Tier::Signature(FrostMatriarch),
            ChainLightning | ThunderStrike => Tier::Unique(StormHerald),
            Tempest => Tier::Signature(StormHerald),
            ToxicPools | VenomSpray => Tier::Unique(VenomQueen),
            Plague => Tier::Signature(VenomQueen),
            ShadowClones | VoidRift => Tier::Unique(ShadowReaver),
            Eclipse => Tier::Signature(ShadowReaver),
            Earthquake | BoulderToss => Tier::Unique(StoneColossus),
            Avalanche => Tier::Signature(StoneColossus),
        }
    }

    /// Shared patterns unlocked at or below `phase`.
    pub fn unlocked_at(phase: u8) -> impl Iterator<Item = PatternId> {
        use strum::IntoEnumIterator;
        PatternId::iter().filter(move |id| {
            id.tier()
                .unlock_phase()
                .is_some_and(|unlock| unlock <= phase)
        })
    }
}
