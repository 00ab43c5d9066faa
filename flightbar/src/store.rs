//! Persisted last-query store.
//!
//! The poller writes the normalized flight number here on each successful
//! manual subscribe, and the front end reads it back to prefill the search
//! on launch. The store also keeps the short list of recently searched
//! flights. File-backed storage shares the `~/.flightbar/config.ini` file
//! with the poller configuration, under its own `[flight]` section.

use std::path::PathBuf;
use std::sync::Mutex;

use ini::Ini;
use thiserror::Error;

/// INI section owned by the store.
const SECTION: &str = "flight";

/// Key holding the last searched flight number.
const KEY_LAST_FLIGHT: &str = "last_flight_number";

/// Key holding the comma-separated recent flight list.
const KEY_RECENT_FLIGHTS: &str = "recent_flights";

/// Maximum number of recent flights retained.
const RECENT_FLIGHTS_CAP: usize = 5;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read or parse the store file
    #[error("failed to read store file: {0}")]
    Read(#[from] ini::Error),

    /// Failed to write the store file
    #[error("failed to write store file: {0}")]
    Write(#[from] std::io::Error),

    /// The home directory could not be resolved
    #[error("could not resolve home directory")]
    NoHomeDir,
}

/// Key-value slot for the last searched flight and the recent history.
///
/// Implementations handle their own interior mutability; the poller only
/// ever holds a shared reference.
pub trait FlightStore: Send + Sync {
    /// The last flight number persisted by a manual subscribe.
    fn last_flight_number(&self) -> Option<String>;

    /// Persist the last searched flight number.
    fn set_last_flight_number(&self, flight_no: &str) -> Result<(), StoreError>;

    /// Recently searched flight numbers, most recent first.
    fn recent_flights(&self) -> Vec<String>;

    /// Record a flight at the front of the recent list.
    ///
    /// Re-searching a known flight moves it to the front rather than
    /// duplicating it; the list is capped at five entries.
    fn push_recent_flight(&self, flight_no: &str) -> Result<(), StoreError>;
}

/// File-backed store using the shared INI configuration file.
pub struct IniFlightStore {
    path: PathBuf,
    doc: Mutex<Ini>,
}

impl IniFlightStore {
    /// Open the store at the given path.
    ///
    /// A missing file starts the store empty; it is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let doc = if path.exists() {
            Ini::load_from_file(&path)?
        } else {
            Ini::new()
        };

        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    /// Open the store at the default `~/.flightbar/config.ini` location.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = crate::config::config_file_path().ok_or(StoreError::NoHomeDir)?;
        Self::open(path)
    }

    /// Write the document back to disk, creating parent directories.
    fn save(&self, doc: &Ini) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        doc.write_to_file(&self.path)?;
        Ok(())
    }
}

impl FlightStore for IniFlightStore {
    fn last_flight_number(&self) -> Option<String> {
        self.doc
            .lock()
            .unwrap()
            .section(Some(SECTION))
            .and_then(|section| section.get(KEY_LAST_FLIGHT))
            .map(str::to_string)
    }

    fn set_last_flight_number(&self, flight_no: &str) -> Result<(), StoreError> {
        let mut doc = self.doc.lock().unwrap();
        doc.with_section(Some(SECTION))
            .set(KEY_LAST_FLIGHT, flight_no);
        self.save(&doc)
    }

    fn recent_flights(&self) -> Vec<String> {
        self.doc
            .lock()
            .unwrap()
            .section(Some(SECTION))
            .and_then(|section| section.get(KEY_RECENT_FLIGHTS))
            .map(parse_recent)
            .unwrap_or_default()
    }

    fn push_recent_flight(&self, flight_no: &str) -> Result<(), StoreError> {
        let mut doc = self.doc.lock().unwrap();
        let mut recent = doc
            .section(Some(SECTION))
            .and_then(|section| section.get(KEY_RECENT_FLIGHTS))
            .map(parse_recent)
            .unwrap_or_default();

        promote(&mut recent, flight_no);

        doc.with_section(Some(SECTION))
            .set(KEY_RECENT_FLIGHTS, recent.join(","));
        self.save(&doc)
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryFlightStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    last: Option<String>,
    recent: Vec<String>,
}

impl MemoryFlightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlightStore for MemoryFlightStore {
    fn last_flight_number(&self) -> Option<String> {
        self.inner.lock().unwrap().last.clone()
    }

    fn set_last_flight_number(&self, flight_no: &str) -> Result<(), StoreError> {
        self.inner.lock().unwrap().last = Some(flight_no.to_string());
        Ok(())
    }

    fn recent_flights(&self) -> Vec<String> {
        self.inner.lock().unwrap().recent.clone()
    }

    fn push_recent_flight(&self, flight_no: &str) -> Result<(), StoreError> {
        promote(&mut self.inner.lock().unwrap().recent, flight_no);
        Ok(())
    }
}

fn parse_recent(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Move (or insert) `flight_no` to the front, keeping the list capped.
fn promote(recent: &mut Vec<String>, flight_no: &str) {
    recent.retain(|entry| entry != flight_no);
    recent.insert(0, flight_no.to_string());
    recent.truncate(RECENT_FLIGHTS_CAP);
}
