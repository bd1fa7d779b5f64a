// Deterministic curation pipeline pieces:
// candidates → ranking → optional shuffle → oracle-assisted selection → validation.
// All oracle calls go through llm_client; nothing here talks HTTP directly.

pub mod candidates;
pub mod prompts;
pub mod ranking;
pub mod selector;
pub mod shuffle;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::catalog::models::{BaseStats, Creature, DamageClass, MoveCatalog, MoveMeta};

    pub fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    pub fn creature(id: u32, types: &[&str], moves: &[&str]) -> Creature {
        Creature {
            id,
            name: format!("creature-{id}"),
            types: names(types),
            stats: BaseStats {
                hp: 78,
                attack: 84,
                defense: 78,
                special_attack: 109,
                special_defense: 85,
                speed: 100,
            },
            moves: names(moves),
        }
    }

    fn meta(move_type: &str, power: u32, damage_class: DamageClass) -> MoveMeta {
        MoveMeta {
            move_type: move_type.to_string(),
            power,
            damage_class,
        }
    }

    pub fn catalog() -> MoveCatalog {
        [
            ("flamethrower", meta("fire", 90, DamageClass::Special)),
            ("ember", meta("fire", 40, DamageClass::Special)),
            ("tackle", meta("normal", 40, DamageClass::Physical)),
            ("pound", meta("normal", 40, DamageClass::Physical)),
            ("growl", meta("normal", 0, DamageClass::Status)),
            ("swords-dance", meta("normal", 0, DamageClass::Status)),
            ("hyper-beam", meta("normal", 150, DamageClass::Special)),
            ("odd-jab", meta("normal", 42, DamageClass::Physical)),
            ("wing-attack", meta("flying", 60, DamageClass::Physical)),
            ("surf", meta("water", 90, DamageClass::Special)),
        ]
        .into_iter()
        .map(|(name, m)| (name.to_string(), m))
        .collect()
    }
}
