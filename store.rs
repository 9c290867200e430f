use crate::config::{AppPaths, StoreConfig};
use crate::db::{self, DbPool};
use crate::error::Result;
use crate::models::{Hike, HikeDetail, HikeFields, NewObservation, Observation, WriteOutcome};
use std::path::Path;

/// Shared handle to the hike database.
///
/// Cloning is cheap; every clone draws from the same connection pool. The
/// schema is in place before `open` returns, so no operation needs to check
/// for initialization.
#[derive(Clone)]
pub struct HikeStore {
    pool: DbPool,
}

impl HikeStore {
    pub fn open(paths: &AppPaths, config: &StoreConfig) -> Result<Self> {
        Self::open_at(&paths.db_path, config)
    }

    pub fn open_at(db_path: &Path, config: &StoreConfig) -> Result<Self> {
        let pool = db::init_database(db_path, config)?;
        Ok(Self { pool })
    }

    pub fn add_hike(&self, fields: &HikeFields) -> Result<i64> {
        let conn = self.pool.get()?;
        let id = db::add_hike(&conn, fields)?;
        log::info!("Added hike {id} ({})", fields.name);
        Ok(id)
    }

    /// All hikes, newest first.
    pub fn get_hikes(&self) -> Result<Vec<Hike>> {
        let conn = self.pool.get()?;
        db::get_hikes(&conn)
    }

    pub fn get_hike(&self, id: i64) -> Result<Option<Hike>> {
        let conn = self.pool.get()?;
        db::get_hike(&conn, id)
    }

    /// Replaces all editable fields. A missing id is reported, not an error.
    pub fn update_hike(&self, id: i64, fields: &HikeFields) -> Result<WriteOutcome> {
        let conn = self.pool.get()?;
        let outcome = db::update_hike(&conn, id, fields)?;
        if outcome == WriteOutcome::NotFound {
            log::debug!("Update skipped: no hike with id {id}");
        }
        Ok(outcome)
    }

    /// Deletes the hike together with all of its observations.
    pub fn delete_hike(&self, id: i64) -> Result<WriteOutcome> {
        let mut conn = self.pool.get()?;
        let outcome = db::delete_hike(&mut conn, id)?;
        match outcome {
            WriteOutcome::Applied => log::info!("Deleted hike {id}"),
            WriteOutcome::NotFound => log::debug!("Delete skipped: no hike with id {id}"),
        }
        Ok(outcome)
    }

    pub fn add_observation(&self, observation: &NewObservation) -> Result<i64> {
        let conn = self.pool.get()?;
        db::add_observation(&conn, observation)
    }

    /// Observations for a hike, newest first.
    pub fn get_observations(&self, hike_id: i64) -> Result<Vec<Observation>> {
        let conn = self.pool.get()?;
        db::get_observations(&conn, hike_id)
    }

    /// Drops the photo-bearing observations of a hike, keeping text-only notes.
    pub fn delete_image_observations(&self, hike_id: i64) -> Result<usize> {
        let conn = self.pool.get()?;
        let removed = db::delete_image_observations(&conn, hike_id)?;
        log::debug!("Removed {removed} photo observations from hike {hike_id}");
        Ok(removed)
    }

    pub fn cover_photo(&self, hike_id: i64) -> Result<Option<String>> {
        let conn = self.pool.get()?;
        db::cover_photo(&conn, hike_id)
    }

    /// Hikes whose name or location contains `query`, ignoring case.
    pub fn search_hikes(&self, query: &str) -> Result<Vec<Hike>> {
        let hikes = self.get_hikes()?;
        if query.is_empty() {
            return Ok(hikes);
        }
        Ok(hikes.into_iter().filter(|h| h.matches(query)).collect())
    }

    pub fn hike_detail(&self, id: i64) -> Result<Option<HikeDetail>> {
        let conn = self.pool.get()?;
        let Some(hike) = db::get_hike(&conn, id)? else {
            return Ok(None);
        };
        let observations = db::get_observations(&conn, id)?;
        Ok(Some(HikeDetail { hike, observations }))
    }

    /// Every hike with its observations, newest hike first.
    pub fn all_details(&self) -> Result<Vec<HikeDetail>> {
        let conn = self.pool.get()?;
        db::get_hikes(&conn)?
            .into_iter()
            .map(|hike| -> Result<HikeDetail> {
                let observations = db::get_observations(&conn, hike.id)?;
                Ok(HikeDetail { hike, observations })
            })
            .collect()
    }
}
