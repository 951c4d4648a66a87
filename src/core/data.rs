// this file contains type/data definitions for internal use

use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::core::json::JsonRaid;

/// which kind of map feature a point is
#[derive(Serialize, PartialEq, Eq, Hash, Copy, Clone, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Stop,
    Gym,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Stop => "stop",
            Kind::Gym => "gym",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// a cleaner, typed view of a stop or gym record, rebuilt from the snapshot on every render
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PointOfInterest {
    pub kind: Kind,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub icon: Icon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quest_text: Option<String>,
}

impl PointOfInterest {
    /// the text the lists sort on: kind followed directly by name
    pub fn sort_key(&self) -> String {
        format!("{}{}", self.kind, self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Icon {
    Stop(StopIcon),
    Gym(GymIcon),
}

impl Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Icon::Stop(icon) => Display::fmt(icon, f),
            Icon::Gym(icon) => Display::fmt(icon, f),
        }
    }
}

impl Serialize for Icon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StopIcon {
    pub lured: bool,
    pub nearby: bool,
    pub quest: bool,
}

impl StopIcon {
    /// suffixes in the order they are appended to the base token
    fn suffixes(&self) -> [(bool, &'static str); 3] {
        [
            (self.lured, "Lured"),
            (self.nearby, "_Nearby"),
            (self.quest, "_Quest"),
        ]
    }
}

impl Display for StopIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pokestop/Pokestop")?;
        for (_, suffix) in self.suffixes().iter().filter(|(on, _)| *on) {
            f.write_str(suffix)?;
        }
        write!(f, ".png")
    }
}

/// where a gym's raid window stands relative to "now"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaidState {
    None,
    /// egg: the window has not opened yet
    Scheduled,
    Ongoing,
}

impl RaidState {
    pub fn classify(raid: Option<&JsonRaid>, now: DateTime<Utc>) -> Self {
        let now = now.timestamp_millis();
        let Some(raid) = raid else {
            return RaidState::None;
        };
        match raid.end {
            // a window without a start time has not opened yet
            Some(end) if now < end && raid.start.is_some_and(|start| start < now) => {
                RaidState::Ongoing
            }
            Some(end) if now < end => RaidState::Scheduled,
            _ => RaidState::None,
        }
    }
}

/// suffix contributed by a raid boss form id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormSuffix {
    None,
    /// even form ids in the regional range get the `A` image
    Alolan,
    Numbered(i64),
    /// a form outside the regional range; no image variant exists, so nothing is appended
    OutOfRange(i64),
}

impl FormSuffix {
    pub const REGIONAL_RANGE: std::ops::RangeInclusive<i64> = 45..=80;

    pub fn from_form(form: Option<i64>) -> Self {
        match form {
            Some(form) if form > 0 && Self::REGIONAL_RANGE.contains(&form) => {
                if form % 2 == 0 {
                    FormSuffix::Alolan
                } else {
                    FormSuffix::Numbered(form)
                }
            }
            Some(form) if form > 0 => FormSuffix::OutOfRange(form),
            _ => FormSuffix::None,
        }
    }
}

impl Display for FormSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormSuffix::Alolan => f.write_str("A"),
            FormSuffix::Numbered(form) => write!(f, "_{form}"),
            FormSuffix::None | FormSuffix::OutOfRange(_) => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GymIconKind {
    /// no active raid
    Gym { level: u8, in_battle: bool },
    /// raid boss with its own image
    Boss { species: u16, form: FormSuffix },
    /// raid boss we have no image for, or a hatched boss that was not identified
    UnknownBoss { raid_level: i64 },
    Egg {
        gym_level: u8,
        raid_level: i64,
        in_battle: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GymIcon {
    pub team: String,
    pub kind: GymIconKind,
    pub ex_raid_eligible: bool,
}

impl Display for GymIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let team = &self.team;
        match &self.kind {
            GymIconKind::Gym { level, in_battle } => {
                write!(f, "gym/{team}_{level}")?;
                if *in_battle {
                    f.write_str("_isInBattle")?;
                }
            }
            GymIconKind::Boss { species, form } => write!(f, "raid/{team}_{species}{form}")?,
            GymIconKind::UnknownBoss { raid_level } => {
                write!(f, "raid/{team}_{raid_level}_unknown")?
            }
            GymIconKind::Egg {
                gym_level,
                raid_level,
                in_battle,
            } => {
                write!(f, "raid/{team}_{gym_level}_{raid_level}")?;
                if *in_battle {
                    f.write_str("_isInBattle")?;
                }
            }
        }
        if self.ex_raid_eligible {
            f.write_str("_ExRaidEligible")?;
        }
        write!(f, ".png")
    }
}
