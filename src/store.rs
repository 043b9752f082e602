use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{
    Candidate, CandidateId, Formation, Period, PeriodId, Selection, Session, SessionId, Site,
};

/// Read side of the roster, as consumed by sheet generation. Implementations
/// return records in insertion order.
pub trait Repository {
    fn session(&self, id: SessionId) -> Result<Session, Error>;

    fn periods(&self, session_id: SessionId, selection: &Selection) -> Result<Vec<Period>, Error>;

    fn candidates(
        &self,
        session_id: SessionId,
        selection: &Selection,
    ) -> Result<Vec<Candidate>, Error>;
}

/// In-memory roster, persisted as one JSON file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterStore {
    sessions: Vec<Session>,
    candidates: Vec<Candidate>,
    periods: Vec<Period>,
}

/// Resolve `selection` against the records of one session. Explicit ids keep
/// the order they were given in.
fn select<T: Clone>(
    records: &[T],
    selection: &Selection,
    session_id: SessionId,
    what: &str,
    owner: impl Fn(&T) -> SessionId,
    id_of: impl Fn(&T) -> u32,
) -> Result<Vec<T>, Error> {
    match selection {
        Selection::All => Ok(records
            .iter()
            .filter(|r| owner(r) == session_id)
            .cloned()
            .collect()),
        Selection::Only(ids) => ids
            .iter()
            .map(|&id| {
                records
                    .iter()
                    .find(|r| id_of(r) == id && owner(r) == session_id)
                    .cloned()
                    .ok_or_else(|| {
                        Error::InvalidSelection(format!(
                            "{what} {id} does not exist in session {session_id}"
                        ))
                    })
            })
            .collect(),
    }
}

impl Repository for RosterStore {
    fn session(&self, id: SessionId) -> Result<Session, Error> {
        self.sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::InvalidSelection(format!("session {id} does not exist")))
    }

    fn periods(&self, session_id: SessionId, selection: &Selection) -> Result<Vec<Period>, Error> {
        self.session(session_id)?;
        select(
            &self.periods,
            selection,
            session_id,
            "period",
            |p| p.session_id,
            |p| p.id,
        )
    }

    fn candidates(
        &self,
        session_id: SessionId,
        selection: &Selection,
    ) -> Result<Vec<Candidate>, Error> {
        self.session(session_id)?;
        select(
            &self.candidates,
            selection,
            session_id,
            "candidate",
            |c| c.session_id,
            |c| c.id,
        )
    }
}

fn duplicate_free<T>(what: &str, items: impl Iterator<Item = T>) -> Result<(), Error>
where
    T: std::hash::Hash + Eq + std::fmt::Debug,
{
    let mut seen = HashSet::new();
    for item in items {
        if seen.contains(&item) {
            return Err(Error::InvalidRoster(format!("duplicate {what} {item:?}")));
        }
        seen.insert(item);
    }
    Ok(())
}

fn next_id(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().unwrap_or(0) + 1
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        let mut store: RosterStore = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidRoster(format!("{}: {e}", path.display())))?;
        for session in store.sessions.iter_mut().filter(|s| s.code.is_empty()) {
            session.code = Session::code_for(session.id);
        }
        store.check_integrity()?;
        Ok(store)
    }

    /// Open `path`, or start an empty roster when the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the roster next to `path` first, then move it into place, so a
    /// failed write never leaves a truncated roster behind.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidRoster(format!("cannot serialize roster: {e}")))?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Ids unique per entity kind, session codes unique, every child attached
    /// to a known session, and no candidate enrolled twice in one session.
    fn check_integrity(&self) -> Result<(), Error> {
        duplicate_free("session id", self.sessions.iter().map(|s| s.id))?;
        duplicate_free("session code", self.sessions.iter().map(|s| s.code.as_str()))?;
        duplicate_free("candidate id", self.candidates.iter().map(|c| c.id))?;
        duplicate_free("period id", self.periods.iter().map(|p| p.id))?;
        duplicate_free(
            "candidate",
            self.candidates
                .iter()
                .map(|c| (c.session_id, c.surname.as_str(), c.given_name.as_str())),
        )?;

        let known = |id: SessionId| self.sessions.iter().any(|s| s.id == id);
        if let Some(c) = self.candidates.iter().find(|c| !known(c.session_id)) {
            return Err(Error::InvalidRoster(format!(
                "candidate {} refers to unknown session {}",
                c.id, c.session_id
            )));
        }
        if let Some(p) = self.periods.iter().find(|p| !known(p.session_id)) {
            return Err(Error::InvalidRoster(format!(
                "period {} refers to unknown session {}",
                p.id, p.session_id
            )));
        }
        Ok(())
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut Session, Error> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::InvalidRoster(format!("session {id} does not exist")))
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn candidate_count(&self, session_id: SessionId) -> usize {
        self.candidates
            .iter()
            .filter(|c| c.session_id == session_id)
            .count()
    }

    pub fn period_count(&self, session_id: SessionId) -> usize {
        self.periods
            .iter()
            .filter(|p| p.session_id == session_id)
            .count()
    }

    pub fn create_session(&mut self, site: Site, formation: Formation) -> SessionId {
        let id = next_id(self.sessions.iter().map(|s| s.id));
        self.sessions.push(Session {
            id,
            code: Session::code_for(id),
            site,
            formation,
            cancelled: false,
        });
        log::info!("Created session {id}: {formation} {site}");
        id
    }

    /// Enrol a candidate. Names are trimmed; a blank name or a (surname,
    /// given name) pair already present in the session is rejected.
    pub fn add_candidate(
        &mut self,
        session_id: SessionId,
        surname: &str,
        given_name: &str,
    ) -> Result<CandidateId, Error> {
        let (surname, given_name) = (surname.trim(), given_name.trim());
        if surname.is_empty() || given_name.is_empty() {
            return Err(Error::InvalidRoster(
                "candidate surname and given name are required".into(),
            ));
        }
        self.session_mut(session_id)?;
        if self.candidates.iter().any(|c| {
            c.session_id == session_id && c.surname == surname && c.given_name == given_name
        }) {
            return Err(Error::InvalidRoster(format!(
                "{given_name} {surname} is already enrolled in session {session_id}"
            )));
        }
        let id = next_id(self.candidates.iter().map(|c| c.id));
        self.candidates.push(Candidate {
            id,
            session_id,
            surname: surname.to_string(),
            given_name: given_name.to_string(),
        });
        Ok(id)
    }

    pub fn remove_candidate(&mut self, id: CandidateId) -> Result<Candidate, Error> {
        let pos = self
            .candidates
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::InvalidRoster(format!("candidate {id} does not exist")))?;
        Ok(self.candidates.remove(pos))
    }

    pub fn add_period(
        &mut self,
        session_id: SessionId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PeriodId, Error> {
        self.session_mut(session_id)?;
        let id = next_id(self.periods.iter().map(|p| p.id));
        let period = Period::new(id, session_id, start, end)?;
        self.periods.push(period);
        Ok(id)
    }

    /// Mark a session cancelled. Returns false when it already was.
    pub fn cancel_session(&mut self, id: SessionId) -> Result<bool, Error> {
        let session = self.session_mut(id)?;
        if session.cancelled {
            return Ok(false);
        }
        session.cancelled = true;
        Ok(true)
    }

    /// Remove a session along with its candidates and periods.
    pub fn delete_session(&mut self, id: SessionId) -> Result<Session, Error> {
        let pos = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::InvalidRoster(format!("session {id} does not exist")))?;
        self.candidates.retain(|c| c.session_id != id);
        self.periods.retain(|p| p.session_id != id);
        Ok(self.sessions.remove(pos))
    }

    /// Rename from a `"Formation - Site"` string; both halves must be known options.
    pub fn rename_session(&mut self, id: SessionId, name: &str) -> Result<(), Error> {
        let (formation, site) = name.split_once(" - ").ok_or_else(|| {
            Error::InvalidRoster(format!("expected \"Formation - Site\", got {name:?}"))
        })?;
        let formation: Formation = formation.parse()?;
        let site: Site = site.parse()?;
        let session = self.session_mut(id)?;
        session.formation = formation;
        session.site = site;
        Ok(())
    }
}
