//! The add/edit hike flow, minus the widgets.
//!
//! A screen owns a `HikeForm`, binds its inputs to the public fields and calls
//! [`HikeForm::save`] when the user confirms.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::models::{
    Difficulty, Hike, HikeFields, NewObservation, WriteOutcome, COVER_PHOTO_NOTE,
    PHOTO_UPDATED_NOTE,
};
use crate::photos::{PhotoImport, PhotoLibrary, PickerResult};
use crate::store::HikeStore;

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

pub fn format_hike_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_hike_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveOutcome {
    Created { id: i64 },
    Updated { id: i64, outcome: WriteOutcome },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HikeForm {
    /// Set when editing an existing hike.
    pub editing: Option<i64>,
    pub name: String,
    pub location: String,
    pub date: NaiveDate,
    pub parking: bool,
    pub length: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub photo: Option<String>,
    original_photo: Option<String>,
}

impl HikeForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            editing: None,
            name: String::new(),
            location: String::new(),
            date: today,
            parking: true,
            length: String::new(),
            difficulty: Difficulty::default(),
            description: String::new(),
            photo: None,
            original_photo: None,
        }
    }

    /// Pre-fills the form from a stored hike and its current cover photo.
    pub fn edit(store: &HikeStore, hike: &Hike, today: NaiveDate) -> Result<Self> {
        let cover = store.cover_photo(hike.id)?;
        let fields = &hike.fields;
        let date = parse_hike_date(&fields.date).unwrap_or_else(|| {
            log::debug!("Hike {} has unreadable date {:?}", hike.id, fields.date);
            today
        });

        Ok(Self {
            editing: Some(hike.id),
            name: fields.name.clone(),
            location: fields.location.clone(),
            date,
            parking: fields.parking,
            length: fields.length.clone(),
            difficulty: fields.difficulty,
            description: fields.description.clone().unwrap_or_default(),
            photo: cover.clone(),
            original_photo: cover,
        })
    }

    pub fn set_photo(&mut self, import: PhotoImport) {
        self.photo = Some(import.stored_path());
    }

    /// Imports a picker result. A canceled pick leaves the photo untouched.
    pub fn apply_pick(&mut self, library: &PhotoLibrary, picked: &PickerResult) {
        if let Some(import) = library.import(picked) {
            self.set_photo(import);
        }
    }

    pub fn photo_changed(&self) -> bool {
        self.photo.is_some() && self.photo != self.original_photo
    }

    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("location", &self.location),
            ("length", &self.length),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(missing))
        }
    }

    pub fn to_fields(&self) -> HikeFields {
        HikeFields {
            name: self.name.clone(),
            location: self.location.clone(),
            date: format_hike_date(self.date),
            parking: self.parking,
            length: self.length.clone(),
            difficulty: self.difficulty,
            description: Some(self.description.clone()),
        }
    }

    pub fn save(&self, store: &HikeStore) -> Result<SaveOutcome> {
        self.save_at(store, Local::now().naive_local())
    }

    /// Validates, writes the hike, then records the photo observation.
    ///
    /// The photo observation is a second statement; if it fails the hike row
    /// is already written and the error is returned.
    pub fn save_at(&self, store: &HikeStore, now: NaiveDateTime) -> Result<SaveOutcome> {
        self.validate()?;
        let fields = self.to_fields();
        let time = now.format(TIMESTAMP_FORMAT).to_string();

        match self.editing {
            Some(id) => {
                let outcome = store.update_hike(id, &fields)?;
                if outcome == WriteOutcome::Applied && self.photo_changed() {
                    store.delete_image_observations(id)?;
                    self.record_photo(store, id, PHOTO_UPDATED_NOTE, time)?;
                }
                Ok(SaveOutcome::Updated { id, outcome })
            }
            None => {
                let id = store.add_hike(&fields)?;
                if self.photo.is_some() {
                    self.record_photo(store, id, COVER_PHOTO_NOTE, time)?;
                }
                Ok(SaveOutcome::Created { id })
            }
        }
    }

    fn record_photo(&self, store: &HikeStore, hike_id: i64, note: &str, time: String) -> Result<()> {
        store.add_observation(&NewObservation {
            hike_id,
            observation: note.to_string(),
            time,
            image_path: self.photo.clone(),
        })?;
        Ok(())
    }
}
