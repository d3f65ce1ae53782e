//! Summoner snapshots and the game rules the dashboard needs from them

use serde::{Deserialize, Serialize};
use std::fmt;

/// 18-decimal fixed point scale used for xp and gold balances
pub const WEI_PER_UNIT: u128 = 1_000_000_000_000_000_000;

/// Opaque summoner identifier (string form of the on-chain token id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummonerId(String);

impl SummonerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for SummonerId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for SummonerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SummonerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Character classes, numbered as on-chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SummonerClass {
    Barbarian = 1,
    Bard = 2,
    Cleric = 3,
    Druid = 4,
    Fighter = 5,
    Monk = 6,
    Paladin = 7,
    Ranger = 8,
    Rogue = 9,
    Sorcerer = 10,
    Wizard = 11,
}

impl SummonerClass {
    pub fn name(&self) -> &'static str {
        match self {
            SummonerClass::Barbarian => "Barbarian",
            SummonerClass::Bard => "Bard",
            SummonerClass::Cleric => "Cleric",
            SummonerClass::Druid => "Druid",
            SummonerClass::Fighter => "Fighter",
            SummonerClass::Monk => "Monk",
            SummonerClass::Paladin => "Paladin",
            SummonerClass::Ranger => "Ranger",
            SummonerClass::Rogue => "Rogue",
            SummonerClass::Sorcerer => "Sorcerer",
            SummonerClass::Wizard => "Wizard",
        }
    }
}

impl TryFrom<u8> for SummonerClass {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            1 => SummonerClass::Barbarian,
            2 => SummonerClass::Bard,
            3 => SummonerClass::Cleric,
            4 => SummonerClass::Druid,
            5 => SummonerClass::Fighter,
            6 => SummonerClass::Monk,
            7 => SummonerClass::Paladin,
            8 => SummonerClass::Ranger,
            9 => SummonerClass::Rogue,
            10 => SummonerClass::Sorcerer,
            11 => SummonerClass::Wizard,
            other => return Err(format!("Unknown summoner class: {}", other)),
        })
    }
}

impl From<SummonerClass> for u8 {
    fn from(value: SummonerClass) -> Self {
        value as u8
    }
}

impl fmt::Display for SummonerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bulk helper actions a summoner can be a candidate for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Adventure,
    LevelUp,
    ClaimGold,
    Cellar,
}

impl Activity {
    pub const ALL: [Activity; 4] = [
        Activity::Adventure,
        Activity::LevelUp,
        Activity::ClaimGold,
        Activity::Cellar,
    ];
}

/// Point-in-time snapshot of one summoner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summoner {
    pub id: SummonerId,
    #[serde(default)]
    pub name: String,
    pub class: SummonerClass,
    pub level: u32,
    /// Experience, wei-scaled
    #[serde(with = "wei")]
    pub xp: u128,
    /// Unix seconds after which the next adventure is allowed
    pub adventure_log: u64,
    /// Unix seconds after which the next cellar run is allowed
    #[serde(default)]
    pub cellar_log: u64,
    /// Expected cellar reward; zero means the run yields nothing
    #[serde(default)]
    pub scout: u64,
    /// Claimable gold, wei-scaled
    #[serde(default, with = "wei")]
    pub claimable_gold: u128,
    /// Days already paid in the daycare
    #[serde(default)]
    pub daycare_days: u32,
}

impl Summoner {
    pub fn can_adventure(&self, now: u64) -> bool {
        self.adventure_log < now
    }

    pub fn can_level_up(&self) -> bool {
        self.xp_units() >= xp_required(self.level)
    }

    pub fn can_claim_gold(&self) -> bool {
        self.claimable_gold / WEI_PER_UNIT > 0
    }

    pub fn can_enter_cellar(&self, now: u64) -> bool {
        self.cellar_log < now && self.scout != 0
    }

    /// Whether this summoner is a candidate for `activity` at `now`
    pub fn is_candidate(&self, activity: Activity, now: u64) -> bool {
        match activity {
            Activity::Adventure => self.can_adventure(now),
            Activity::LevelUp => self.can_level_up(),
            Activity::ClaimGold => self.can_claim_gold(),
            Activity::Cellar => self.can_enter_cellar(now),
        }
    }

    /// Whole xp units
    pub fn xp_units(&self) -> u128 {
        self.xp / WEI_PER_UNIT
    }
}

/// Experience needed to leave `level`, in whole units
pub fn xp_required(level: u32) -> u128 {
    let level = level as u128;
    1000 * level * (level + 1) / 2
}

/// Wei amounts travel as decimal strings; they overflow JSON-safe integers
pub mod wei {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u128>().map_err(D::Error::custom)
    }
}
