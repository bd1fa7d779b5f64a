use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

// ────────────────────────────────────────────────────────────────────────────
// Raw wire shape (per-entity record documents)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RawCreature {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: Vec<RawTypeSlot>,
    #[serde(default)]
    pub stats: Vec<RawStat>,
    #[serde(default)]
    pub moves: Vec<RawMoveSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStat {
    pub base_stat: u32,
    pub stat: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMoveSlot {
    #[serde(rename = "move")]
    pub move_ref: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Domain records
// ────────────────────────────────────────────────────────────────────────────

/// The six fixed base stats. Stats absent from the raw record read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

/// A catalog entity, loaded once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub id: u32,
    pub name: String,
    /// Type tags in record order.
    pub types: Vec<String>,
    pub stats: BaseStats,
    /// Move references in record order; duplicates are kept.
    pub moves: Vec<String>,
}

impl Creature {
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t == type_name)
    }
}

impl From<RawCreature> for Creature {
    fn from(raw: RawCreature) -> Self {
        let mut stats = BaseStats::default();
        for entry in &raw.stats {
            let value = entry.base_stat;
            match entry.stat.name.trim() {
                "hp" => stats.hp = value,
                "attack" => stats.attack = value,
                "defense" => stats.defense = value,
                "special-attack" => stats.special_attack = value,
                "special-defense" => stats.special_defense = value,
                "speed" => stats.speed = value,
                _ => {}
            }
        }

        Creature {
            id: raw.id,
            name: raw.name.trim().to_string(),
            types: non_blank(raw.types.iter().map(|t| t.kind.name.as_str())),
            stats,
            moves: non_blank(raw.moves.iter().map(|m| m.move_ref.name.as_str())),
        }
    }
}

fn non_blank<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Move metadata
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageClass {
    Physical,
    Special,
    Status,
    /// Anything the metadata file carries that is none of the above.
    #[serde(other)]
    Unknown,
}

impl DamageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageClass::Physical => "physical",
            DamageClass::Special => "special",
            DamageClass::Status => "status",
            DamageClass::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoveMeta {
    #[serde(rename = "type")]
    pub move_type: String,
    /// 0 means the move has no direct power.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub power: u32,
    pub damage_class: DamageClass,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Read-only move name → metadata mapping shared by every entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MoveCatalog {
    moves: HashMap<String, MoveMeta>,
}

impl MoveCatalog {
    pub fn get(&self, name: &str) -> Option<&MoveMeta> {
        self.moves.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.moves.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl FromIterator<(String, MoveMeta)> for MoveCatalog {
    fn from_iter<I: IntoIterator<Item = (String, MoveMeta)>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

/// Entity id → curated move names. Ordered so every snapshot serializes identically.
pub type CuratedMap = BTreeMap<u32, Vec<String>>;
