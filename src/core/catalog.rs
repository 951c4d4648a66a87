// this file turns snapshot records into typed points and decides which icon each one shows

use chrono::{DateTime, Utc};

use crate::core::data::{
    FormSuffix, GymIcon, GymIconKind, Icon, Kind, PointOfInterest, RaidState, StopIcon,
};
use crate::core::json::{is_truthy, JsonGym, JsonPokestop, JsonSnapshot};
use crate::core::lookup::{GymTraits, Lookups};
use crate::FinderError;

/// everything besides the record itself that the gym icon depends on
#[derive(Clone, Copy)]
pub struct CatalogContext<'a> {
    pub lookups: &'a Lookups,
    pub gym_traits: &'a dyn GymTraits,
    pub now: DateTime<Utc>,
}

/// the moment raid timers are judged against: the given epoch milliseconds, or the current time
pub fn evaluation_time(millis: Option<i64>) -> Result<DateTime<Utc>, FinderError> {
    match millis {
        Some(millis) => {
            DateTime::from_timestamp_millis(millis).ok_or(FinderError::InvalidNow(millis))
        }
        None => Ok(Utc::now()),
    }
}

pub fn build_stop_catalog(snapshot: &JsonSnapshot) -> Vec<PointOfInterest> {
    snapshot.pokestops.iter().map(stop_point).collect()
}

pub fn build_gym_catalog(snapshot: &JsonSnapshot, ctx: &CatalogContext<'_>) -> Vec<PointOfInterest> {
    snapshot.gyms.iter().map(|gym| gym_point(gym, ctx)).collect()
}

fn stop_point(stop: &JsonPokestop) -> PointOfInterest {
    PointOfInterest {
        kind: Kind::Stop,
        name: stop.name.clone().unwrap_or_default(),
        latitude: stop.latitude,
        longitude: stop.longitude,
        icon: Icon::Stop(stop_icon(stop)),
        quest_text: quest_text(stop),
    }
}

fn gym_point(gym: &JsonGym, ctx: &CatalogContext<'_>) -> PointOfInterest {
    PointOfInterest {
        kind: Kind::Gym,
        name: gym.name.clone().unwrap_or_default(),
        latitude: gym.latitude,
        longitude: gym.longitude,
        icon: Icon::Gym(gym_icon(gym, ctx)),
        quest_text: None,
    }
}

/// prompt and reward on separate lines, only when the stop carries a quest prompt
pub fn quest_text(stop: &JsonPokestop) -> Option<String> {
    let quest = stop.quest.as_ref()?;
    let prompt = quest.quest_text.as_deref().filter(|text| !text.is_empty())?;
    let reward = quest.reward_text.as_deref().unwrap_or_default();
    Some(format!("{prompt}\n{reward}"))
}

pub fn stop_icon(stop: &JsonPokestop) -> StopIcon {
    StopIcon {
        lured: stop.lure_expiration.as_ref().is_some_and(is_truthy),
        nearby: !stop.pokemon.is_empty(),
        quest: stop
            .quest
            .as_ref()
            .and_then(|quest| quest.reward_type.as_ref())
            .is_some_and(is_truthy),
    }
}

pub fn gym_icon(gym: &JsonGym, ctx: &CatalogContext<'_>) -> GymIcon {
    let team = ctx.lookups.team_tokens.token(gym.team_id).to_owned();
    let ex_raid_eligible = ctx.gym_traits.is_ex_raid_eligible(gym);
    let state = RaidState::classify(gym.raid.as_ref(), ctx.now);

    let kind = match (state, gym.raid.as_ref()) {
        (RaidState::Ongoing | RaidState::Scheduled, Some(raid)) => {
            match raid.pokemon_id.filter(|species| *species != 0) {
                Some(species) if ctx.lookups.species_with_images.contains(species) => {
                    GymIconKind::Boss {
                        species,
                        form: FormSuffix::from_form(raid.form),
                    }
                }
                Some(_) => GymIconKind::UnknownBoss {
                    raid_level: raid.level,
                },
                None if state == RaidState::Ongoing => GymIconKind::UnknownBoss {
                    raid_level: raid.level,
                },
                None => GymIconKind::Egg {
                    gym_level: ctx.gym_traits.level(gym),
                    raid_level: raid.level,
                    in_battle: ctx.gym_traits.is_in_battle(gym),
                },
            }
        }
        _ => GymIconKind::Gym {
            level: ctx.gym_traits.level(gym),
            in_battle: ctx.gym_traits.is_in_battle(gym),
        },
    };

    GymIcon {
        team,
        kind,
        ex_raid_eligible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::json::{JsonQuest, JsonRaid};
    use crate::core::lookup::{RecordGymTraits, SpeciesImages, TeamTokens};
    use serde_json::json;

    const NOW: i64 = 1_600_000_000_000;

    fn lookups() -> Lookups {
        Lookups {
            team_tokens: TeamTokens::default(),
            species_with_images: [150, 382].into_iter().collect::<SpeciesImages>(),
        }
    }

    fn icon_for(gym: &JsonGym, lookups: &Lookups) -> String {
        let ctx = CatalogContext {
            lookups,
            gym_traits: &RecordGymTraits,
            now: DateTime::from_timestamp_millis(NOW).unwrap(),
        };
        gym_icon(gym, &ctx).to_string()
    }

    fn gym(team_id: u8, slots_available: i64, raid: Option<JsonRaid>) -> JsonGym {
        JsonGym {
            name: Some("Gym".to_owned()),
            team_id,
            slots_available: Some(slots_available),
            raid,
            ..JsonGym::default()
        }
    }

    fn raid(start: i64, end: i64, pokemon_id: Option<u16>, form: Option<i64>) -> JsonRaid {
        JsonRaid {
            level: 5,
            start: Some(NOW + start),
            end: Some(NOW + end),
            pokemon_id,
            form,
        }
    }

    #[test]
    fn evaluation_time_rejects_out_of_range_millis() {
        assert_eq!(evaluation_time(Some(NOW)).unwrap().timestamp_millis(), NOW);
        assert!(matches!(
            evaluation_time(Some(i64::MAX)),
            Err(FinderError::InvalidNow(i64::MAX))
        ));
        assert!(evaluation_time(None).is_ok());
    }

    #[test]
    fn quest_text_requires_prompt() {
        let mut stop = JsonPokestop {
            quest: Some(JsonQuest {
                quest_text: Some("Catch 5 Pokemon".to_owned()),
                reward_text: Some("3 Great Balls".to_owned()),
                ..JsonQuest::default()
            }),
            ..JsonPokestop::default()
        };
        assert_eq!(
            quest_text(&stop).as_deref(),
            Some("Catch 5 Pokemon\n3 Great Balls")
        );

        stop.quest.as_mut().unwrap().quest_text = Some(String::new());
        assert_eq!(quest_text(&stop), None);

        stop.quest = None;
        assert_eq!(quest_text(&stop), None);
    }

    #[test]
    fn stop_icon_flags() {
        let stop = JsonPokestop {
            lure_expiration: Some(json!(NOW)),
            pokemon: vec![json!({ "pokemon_id": 1 })],
            quest: Some(JsonQuest {
                reward_type: Some(json!("ITEM")),
                ..JsonQuest::default()
            }),
            ..JsonPokestop::default()
        };
        assert_eq!(
            stop_icon(&stop).to_string(),
            "pokestop/PokestopLured_Nearby_Quest.png"
        );

        let bare = JsonPokestop {
            lure_expiration: Some(json!(0)),
            quest: Some(JsonQuest::default()),
            ..JsonPokestop::default()
        };
        assert_eq!(stop_icon(&bare).to_string(), "pokestop/Pokestop.png");
    }

    #[test]
    fn gym_without_raid() {
        let swapped = Lookups {
            team_tokens: TeamTokens::new(
                ["Uncontested", "Valor", "Mystic", "Instinct"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            ..lookups()
        };
        assert_eq!(icon_for(&gym(2, 3, None), &swapped), "gym/Mystic_3.png");

        let mut contested = gym(1, 1, None);
        contested.is_in_battle = true;
        contested.is_ex_raid_eligible = true;
        assert_eq!(
            icon_for(&contested, &lookups()),
            "gym/Mystic_5_isInBattle_ExRaidEligible.png"
        );
    }

    #[test]
    fn ended_raid_shows_plain_gym() {
        let ended = gym(3, 6, Some(raid(-7_200_000, -1, Some(150), None)));
        assert_eq!(icon_for(&ended, &lookups()), "gym/Instinct_0.png");
    }

    #[test]
    fn ongoing_raid_returns_boss_icon() {
        let ongoing = gym(2, 2, Some(raid(-60_000, 60_000, Some(150), Some(50))));
        assert_eq!(icon_for(&ongoing, &lookups()), "raid/Valor_150A.png");

        let odd_form = gym(2, 2, Some(raid(-60_000, 60_000, Some(150), Some(47))));
        assert_eq!(icon_for(&odd_form, &lookups()), "raid/Valor_150_47.png");

        let mut eligible = gym(2, 2, Some(raid(-60_000, 60_000, Some(382), None)));
        eligible.is_ex_raid_eligible = true;
        assert_eq!(
            icon_for(&eligible, &lookups()),
            "raid/Valor_382_ExRaidEligible.png"
        );
    }

    #[test]
    fn form_outside_regional_range_adds_nothing() {
        let ongoing = gym(1, 2, Some(raid(-60_000, 60_000, Some(150), Some(120))));
        assert_eq!(icon_for(&ongoing, &lookups()), "raid/Mystic_150.png");
    }

    #[test]
    fn boss_without_image_is_unknown() {
        let ongoing = gym(1, 2, Some(raid(-60_000, 60_000, Some(25), Some(50))));
        assert_eq!(icon_for(&ongoing, &lookups()), "raid/Mystic_5_unknown.png");

        let unidentified = gym(1, 2, Some(raid(-60_000, 60_000, None, None)));
        assert_eq!(
            icon_for(&unidentified, &lookups()),
            "raid/Mystic_5_unknown.png"
        );
    }

    #[test]
    fn egg_uses_gym_and_raid_level() {
        let mut egg = gym(0, 4, Some(raid(60_000, 120_000, None, None)));
        egg.is_in_battle = true;
        egg.is_ex_raid_eligible = true;
        assert_eq!(
            icon_for(&egg, &lookups()),
            "raid/Uncontested_2_5_isInBattle_ExRaidEligible.png"
        );

        let known_boss_egg = gym(0, 4, Some(raid(60_000, 120_000, Some(150), Some(46))));
        assert_eq!(
            icon_for(&known_boss_egg, &lookups()),
            "raid/Uncontested_150A.png"
        );
    }

    #[test]
    fn egg_boss_follows_shared_form_rule() {
        let no_image = gym(1, 4, Some(raid(60_000, 120_000, Some(25), Some(50))));
        assert_eq!(icon_for(&no_image, &lookups()), "raid/Mystic_5_unknown.png");

        let odd_form = gym(1, 4, Some(raid(60_000, 120_000, Some(150), Some(47))));
        assert_eq!(icon_for(&odd_form, &lookups()), "raid/Mystic_150_47.png");

        let outside_range = gym(1, 4, Some(raid(60_000, 120_000, Some(150), Some(120))));
        assert_eq!(icon_for(&outside_range, &lookups()), "raid/Mystic_150.png");
    }

    #[test]
    fn raid_without_start_is_an_egg() {
        let mut egg = gym(2, 3, Some(raid(0, 60_000, None, None)));
        egg.raid.as_mut().unwrap().start = None;
        assert_eq!(icon_for(&egg, &lookups()), "raid/Valor_3_5.png");

        let mut no_end = gym(2, 3, Some(raid(-60_000, 60_000, Some(150), None)));
        no_end.raid.as_mut().unwrap().end = None;
        assert_eq!(icon_for(&no_end, &lookups()), "gym/Valor_3.png");
    }

    #[test]
    fn fractional_lure_expiration_still_lures() {
        let stop = JsonPokestop {
            lure_expiration: Some(json!(1.6e12)),
            ..JsonPokestop::default()
        };
        assert_eq!(stop_icon(&stop).to_string(), "pokestop/PokestopLured.png");
    }

    #[test]
    fn catalogs_keep_every_record() {
        let snapshot: JsonSnapshot = serde_json::from_value(json!({
            "pokestops": {
                "s1": { "name": "Fountain", "latitude": 1.0, "longitude": 2.0, "quest": {} },
                "s2": { "latitude": 1.1, "longitude": 2.1 },
            },
            "gyms": {
                "g1": { "name": "Church", "latitude": 1.5, "longitude": 2.5, "team_id": 1, "slots_available": 3 },
            },
        }))
        .unwrap();
        let lookups = lookups();
        let ctx = CatalogContext {
            lookups: &lookups,
            gym_traits: &RecordGymTraits,
            now: DateTime::from_timestamp_millis(NOW).unwrap(),
        };

        let stops = build_stop_catalog(&snapshot);
        assert_eq!(stops.len(), 2);
        assert!(stops.iter().all(|s| s.kind == Kind::Stop && s.quest_text.is_none()));
        assert!(stops.iter().any(|s| s.name.is_empty()));

        let gyms = build_gym_catalog(&snapshot, &ctx);
        assert_eq!(gyms.len(), 1);
        assert_eq!(gyms[0].icon.to_string(), "gym/Mystic_3.png");
    }
}
