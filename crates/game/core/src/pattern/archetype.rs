//! Boss archetype table.
//!
//! An archetype fixes a boss's element, signature move, unique pattern pool,
//! and minion kind. This is the only place that mapping lives.

use std::str::FromStr;

use crate::combat::Element;
use crate::error::{CoreError, ErrorSeverity};
use crate::pattern::PatternId;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ArchetypeId {
    FlameWarden,
    FrostMatriarch,
    StormHerald,
    VenomQueen,
    ShadowReaver,
    StoneColossus,
}

/// Static description of an archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchetypeInfo {
    pub element: Element,
    pub signature: PatternId,
    pub uniques: &'static [PatternId],
    /// Template key of the minion spawned on phase transitions.
    pub minion: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArchetypeError {
    #[error("unknown archetype '{0}'")]
    Unknown(String),
}

impl CoreError for ArchetypeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "ARCHETYPE_UNKNOWN"
    }
}

const FLAME_WARDEN: ArchetypeInfo = ArchetypeInfo {
    element: Element::Fire,
    signature: PatternId::Inferno,
    uniques: &[PatternId::FlameWave, PatternId::Firewall],
    minion: "ember_imp",
};

const FROST_MATRIARCH: ArchetypeInfo = ArchetypeInfo {
    element: Element::Frost,
    signature: PatternId::Blizzard,
    uniques: &[PatternId::IceShards, PatternId::FrozenPrison],
    minion: "frost_wisp",
};

const STORM_HERALD: ArchetypeInfo = ArchetypeInfo {
    element: Element::Lightning,
    signature: PatternId::Tempest,
    uniques: &[PatternId::ChainLightning, PatternId::ThunderStrike],
    minion: "storm_sprite",
};

const VENOM_QUEEN: ArchetypeInfo = ArchetypeInfo {
    element: Element::Poison,
    signature: PatternId::Plague,
    uniques: &[PatternId::ToxicPools, PatternId::VenomSpray],
    minion: "venom_spiderling",
};

const SHADOW_REAVER: ArchetypeInfo = ArchetypeInfo {
    element: Element::Shadow,
    signature: PatternId::Eclipse,
    uniques: &[PatternId::ShadowClones, PatternId::VoidRift],
    minion: "shade",
};

const STONE_COLOSSUS: ArchetypeInfo = ArchetypeInfo {
    element: Element::Physical,
    signature: PatternId::Avalanche,
    uniques: &[PatternId::Earthquake, PatternId::BoulderToss],
    minion: "rockling",
};

impl ArchetypeId {
    pub const fn info(self) -> &'static ArchetypeInfo {
        match self {
            ArchetypeId::FlameWarden => &FLAME_WARDEN,
            ArchetypeId::FrostMatriarch => &FROST_MATRIARCH,
            ArchetypeId::StormHerald => &STORM_HERALD,
            ArchetypeId::VenomQueen => &VENOM_QUEEN,
            ArchetypeId::ShadowReaver => &SHADOW_REAVER,
            ArchetypeId::StoneColossus => &STONE_COLOSSUS,
        }
    }

    /// Parses a snake_case archetype name.
    pub fn from_name(name: &str) -> Result<Self, ArchetypeError> {
        Self::from_str(name).map_err(|_| ArchetypeError::Unknown(name.to_string()))
    }
}
