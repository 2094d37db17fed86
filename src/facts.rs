//! Constellation facts shown between levels
//!
//! The fact for a level cycles through the table: level 1 is Orion,
//! level 6 is Orion again.

/// One constellation fact card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstellationFact {
    pub constellation: &'static str,
    pub fact: &'static str,
    pub emoji: &'static str,
}

/// The fact table, in level order
pub const CONSTELLATION_FACTS: [ConstellationFact; 5] = [
    ConstellationFact {
        constellation: "Orion",
        fact: "Orion is one of the most recognizable constellations in the night sky. \
               It contains two of the brightest stars: Betelgeuse and Rigel.",
        emoji: "\u{1F31F}",
    },
    ConstellationFact {
        constellation: "Ursa Major",
        fact: "Also known as the Big Dipper, this constellation has been used for \
               navigation for thousands of years.",
        emoji: "\u{2B50}",
    },
    ConstellationFact {
        constellation: "Cassiopeia",
        fact: "This W-shaped constellation is named after a vain queen from Greek \
               mythology who was placed in the sky as punishment.",
        emoji: "\u{2728}",
    },
    ConstellationFact {
        constellation: "Leo",
        fact: "The Lion constellation contains the bright star Regulus, which was \
               considered one of the four 'royal stars' by ancient Persians.",
        emoji: "\u{1F981}",
    },
    ConstellationFact {
        constellation: "Scorpius",
        fact: "This constellation resembles a scorpion and contains the bright red \
               star Antares, which means 'rival of Mars'.",
        emoji: "\u{1F982}",
    },
];

/// Fact for the given level (1-based), cycling through the table
pub fn fact_for_level(level: u32) -> &'static ConstellationFact {
    let index = level.saturating_sub(1) as usize % CONSTELLATION_FACTS.len();
    &CONSTELLATION_FACTS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_is_orion() {
        assert_eq!(fact_for_level(1).constellation, "Orion");
    }

    #[test]
    fn test_facts_cycle() {
        assert_eq!(fact_for_level(5).constellation, "Scorpius");
        assert_eq!(fact_for_level(6).constellation, "Orion");
        assert_eq!(fact_for_level(12).constellation, "Ursa Major");
    }

    #[test]
    fn test_constellations_are_unique() {
        for (i, a) in CONSTELLATION_FACTS.iter().enumerate() {
            for b in &CONSTELLATION_FACTS[i + 1..] {
                assert_ne!(a.constellation, b.constellation);
            }
        }
    }
}
