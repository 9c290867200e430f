/// MIGRATION 0001: Initial database schema.
///
/// Table and column names match databases written by the mobile app, so an
/// existing `MHikeExpo.db` opens without conversion.
pub const MIGRATION_0001: &str = r#"
-- Hikes Table: One row per recorded trip. Required fields are checked by callers.
CREATE TABLE IF NOT EXISTS Hikes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    location TEXT,
    date TEXT,        -- DD/MM/YYYY
    parking TEXT,     -- 'Yes' or 'No'
    length TEXT,      -- kilometers, as entered
    difficulty TEXT,  -- 'Easy', 'Medium' or 'Hard'
    description TEXT
);

-- Observations Table: Timestamped notes, optionally carrying a photo.
CREATE TABLE IF NOT EXISTS Observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hike_id INTEGER,
    observation TEXT,
    time TEXT,
    image_path TEXT,
    FOREIGN KEY (hike_id) REFERENCES Hikes (id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_observations_hike_id ON Observations (hike_id);
"#;
