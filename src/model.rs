use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub type SessionId = u32;
pub type CandidateId = u32;
pub type PeriodId = u32;

/// Hours of attendance expected per calendar day of a period.
pub const HOURS_PER_DAY: u32 = 7;

/// Display format for every date printed on a sheet.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    #[serde(rename = "Saint-Pierre")]
    SaintPierre,
    #[serde(rename = "Saint-André")]
    SaintAndre,
    #[serde(rename = "St-Pierre & St-André")]
    SaintPierreEtSaintAndre,
}

impl Site {
    pub const ALL: [Site; 3] = [Site::SaintPierre, Site::SaintAndre, Site::SaintPierreEtSaintAndre];

    pub fn label(self) -> &'static str {
        match self {
            Site::SaintPierre => "Saint-Pierre",
            Site::SaintAndre => "Saint-André",
            Site::SaintPierreEtSaintAndre => "St-Pierre & St-André",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formation {
    #[serde(rename = "TP CTRMP")]
    TpCtrmp,
    #[serde(rename = "TP CLVUL")]
    TpClvul,
    #[serde(rename = "TP CTRMTV")]
    TpCtrmtv,
    #[serde(rename = "TP CTCR")]
    TpCtcr,
    #[serde(rename = "Cariste d'entrepôt")]
    CaristeEntrepot,
    #[serde(rename = "Conducteur d'engins de Chantier")]
    ConducteurEngins,
}

impl Formation {
    pub const ALL: [Formation; 6] = [
        Formation::TpCtrmp,
        Formation::TpClvul,
        Formation::TpCtrmtv,
        Formation::TpCtcr,
        Formation::CaristeEntrepot,
        Formation::ConducteurEngins,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Formation::TpCtrmp => "TP CTRMP",
            Formation::TpClvul => "TP CLVUL",
            Formation::TpCtrmtv => "TP CTRMTV",
            Formation::TpCtcr => "TP CTCR",
            Formation::CaristeEntrepot => "Cariste d'entrepôt",
            Formation::ConducteurEngins => "Conducteur d'engins de Chantier",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Site {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Site::ALL
            .into_iter()
            .find(|site| site.label() == s)
            .ok_or_else(|| Error::InvalidRoster(format!("unknown site {s:?}")))
    }
}

impl FromStr for Formation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Formation::ALL
            .into_iter()
            .find(|formation| formation.label() == s)
            .ok_or_else(|| Error::InvalidRoster(format!("unknown formation {s:?}")))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Short unique reference, `CS-` followed by six hex digits.
    #[serde(default)]
    pub code: String,
    pub site: Site,
    pub formation: Formation,
    #[serde(default)]
    pub cancelled: bool,
}

impl Session {
    /// Code given to the session created with `id`.
    pub fn code_for(id: SessionId) -> String {
        format!("CS-{:06X}", id)
    }

    /// `"{id} - {formation} {site}"`, printed under the sheet title.
    pub fn display_name(&self) -> String {
        format!("{} - {} {}", self.id, self.formation, self.site)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub session_id: SessionId,
    pub surname: String,
    pub given_name: String,
}

impl Candidate {
    /// Given name first, as printed on the sheet.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    pub id: PeriodId,
    pub session_id: SessionId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
struct RawPeriod {
    id: PeriodId,
    session_id: SessionId,
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawPeriod> for Period {
    type Error = Error;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Period::new(raw.id, raw.session_id, raw.start, raw.end)
    }
}

impl Period {
    pub fn new(
        id: PeriodId,
        session_id: SessionId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, Error> {
        check_range(start, end)?;
        Ok(Self {
            id,
            session_id,
            start,
            end,
        })
    }

    /// Calendar days covered, both ends included.
    pub fn day_count(&self) -> u32 {
        day_count(self.start, self.end)
    }

    pub fn duration_hours(&self) -> u32 {
        self.day_count() * HOURS_PER_DAY
    }

    /// `"du 08/01/2024 au 12/01/2024"`
    pub fn range_label(&self) -> String {
        format!(
            "du {} au {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), Error> {
    if end < start {
        return Err(Error::InvalidRange { start, end });
    }
    Ok(())
}

pub(crate) fn day_count(start: NaiveDate, end: NaiveDate) -> u32 {
    ((end - start).num_days() + 1).max(0) as u32
}

/// Which records of a session take part in a generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    All,
    Only(Vec<u32>),
}

impl Selection {
    /// Build a selection from an "all" flag and an optional explicit id.
    /// The flag wins when both are given.
    pub fn from_flags(all: bool, id: Option<u32>, what: &str) -> Result<Self, Error> {
        match (all, id) {
            (true, _) => Ok(Selection::All),
            (false, Some(id)) => Ok(Selection::Only(vec![id])),
            (false, None) => Err(Error::InvalidSelection(format!(
                "no {what} selected (give an id or select all)"
            ))),
        }
    }
}
