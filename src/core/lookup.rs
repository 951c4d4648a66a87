// this file contains the static lookup tables and per-gym predicates the icon rules consult

use std::collections::BTreeSet;
use std::{fs, path::Path};

use lazy_static::lazy_static;
use serde::Deserialize;

use crate::core::json::JsonGym;
use crate::FinderError;

lazy_static! {
    /// the map page's `gymTypes` order: 0 neutral, 1 Mystic, 2 Valor, 3 Instinct
    static ref DEFAULT_TEAM_TOKENS: Vec<String> = ["Uncontested", "Mystic", "Valor", "Instinct"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    /// raid bosses shipped with their own marker image
    static ref DEFAULT_SPECIES_WITH_IMAGES: BTreeSet<u16> = [
        3, 6, 9, 26, 59, 65, 68, 76, 89, 94, 103, 105, 110, 112, 125, 126, 129, 131, 143, 144,
        145, 146, 150, 151, 153, 156, 159, 210, 221, 229, 243, 244, 245, 248, 249, 250, 302,
        303, 306, 319, 320, 333, 359, 377, 378, 379, 380, 381, 382, 383, 384, 386,
    ]
    .into_iter()
    .collect();
}

/// team id to the display token used in icon filenames; id 0 is the neutral team
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct TeamTokens(Vec<String>);

impl TeamTokens {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn token(&self, team_id: u8) -> &str {
        match self.0.get(usize::from(team_id)) {
            Some(token) => token,
            None => {
                tracing::warn!(team_id, "unknown team id, using the neutral team token");
                self.0.first().map(String::as_str).unwrap_or("Uncontested")
            }
        }
    }
}

impl Default for TeamTokens {
    fn default() -> Self {
        Self(DEFAULT_TEAM_TOKENS.clone())
    }
}

/// species that have a custom raid image
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct SpeciesImages(BTreeSet<u16>);

impl SpeciesImages {
    pub fn contains(&self, species: u16) -> bool {
        self.0.contains(&species)
    }
}

impl FromIterator<u16> for SpeciesImages {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Default for SpeciesImages {
    fn default() -> Self {
        Self(DEFAULT_SPECIES_WITH_IMAGES.clone())
    }
}

/// the static tables, loadable from a JSON file; anything left out keeps its default
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Lookups {
    pub team_tokens: TeamTokens,
    pub species_with_images: SpeciesImages,
}

impl Lookups {
    pub fn from_file(path: &Path) -> Result<Self, FinderError> {
        let text = fs::read_to_string(path).map_err(|source| FinderError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| FinderError::Deserialize {
            context: path.display().to_string(),
            source,
        })
    }
}

/// derived per-gym state the icon rules need but do not compute themselves
pub trait GymTraits {
    /// prestige tier shown on the gym marker
    fn level(&self, gym: &JsonGym) -> u8;
    fn is_in_battle(&self, gym: &JsonGym) -> bool;
    fn is_ex_raid_eligible(&self, gym: &JsonGym) -> bool;
}

/// reads the traits straight off the record the server sends
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordGymTraits;

impl RecordGymTraits {
    const MAX_SLOTS: i64 = 6;
}

impl GymTraits for RecordGymTraits {
    fn level(&self, gym: &JsonGym) -> u8 {
        match gym.slots_available {
            Some(free) => (Self::MAX_SLOTS - free.clamp(0, Self::MAX_SLOTS)) as u8,
            None => 0,
        }
    }

    fn is_in_battle(&self, gym: &JsonGym) -> bool {
        gym.is_in_battle
    }

    fn is_ex_raid_eligible(&self, gym: &JsonGym) -> bool {
        gym.is_ex_raid_eligible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_tokens_fall_back_to_neutral() {
        let tokens = TeamTokens::default();
        assert_eq!(tokens.token(1), "Mystic");
        assert_eq!(tokens.token(2), "Valor");
        assert_eq!(tokens.token(3), "Instinct");
        assert_eq!(tokens.token(9), "Uncontested");
        assert_eq!(TeamTokens::new(Vec::new()).token(0), "Uncontested");
    }

    #[test]
    fn gym_level_counts_taken_slots() {
        let mut gym = JsonGym {
            slots_available: Some(3),
            ..JsonGym::default()
        };
        assert_eq!(RecordGymTraits.level(&gym), 3);
        gym.slots_available = Some(0);
        assert_eq!(RecordGymTraits.level(&gym), 6);
        gym.slots_available = Some(-2);
        assert_eq!(RecordGymTraits.level(&gym), 6);
        gym.slots_available = None;
        assert_eq!(RecordGymTraits.level(&gym), 0);
    }

    #[test]
    fn lookups_file_keeps_defaults_for_missing_tables() {
        let lookups: Lookups =
            serde_json::from_str(r#"{ "species_with_images": [1, 2] }"#).unwrap();
        assert!(lookups.species_with_images.contains(2));
        assert!(!lookups.species_with_images.contains(150));
        assert_eq!(lookups.team_tokens, TeamTokens::default());
    }
}
