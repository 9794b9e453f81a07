use crate::analysis::totals::recompute_scores;
use crate::error::ScorecardError;
use crate::models::scale::{ScaleVersion, CURRENT_SCALE_VERSION};
use crate::models::scorecard::{Category, Competitor, Metric, Scorecard, MAX_COMPETITORS};
use crate::models::view::StoreStatus;
use crate::session::{lock_session, SharedSession};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;

const DB_SCHEMA_VERSION: i64 = 1;

const META_SCALE_VERSION: &str = "scale_version";
const META_SAVED_AT: &str = "saved_at";

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        log::warn!("store schema version {version} is newer than {DB_SCHEMA_VERSION}");
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS competitors (
            position INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS categories (
            position INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS metrics (
            category_position INTEGER NOT NULL,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (category_position, position)
        );

        CREATE TABLE IF NOT EXISTS scores (
            category_position INTEGER NOT NULL,
            metric_position INTEGER NOT NULL,
            competitor_position INTEGER NOT NULL,
            value INTEGER,
            PRIMARY KEY (category_position, metric_position, competitor_position)
        );

        CREATE TABLE IF NOT EXISTS store_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )
}

pub fn open_store(path: &Path) -> std::result::Result<Connection, ScorecardError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    initialize_schema(&conn)?;
    Ok(conn)
}

/// Replaces the stored aggregate in one transaction.
pub fn save_scorecard(conn: &Connection, scorecard: &Scorecard) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "DELETE FROM scores;
         DELETE FROM metrics;
         DELETE FROM categories;
         DELETE FROM competitors;",
    )?;

    {
        let mut insert_competitor =
            tx.prepare("INSERT INTO competitors (position, name) VALUES (?1, ?2)")?;
        for (position, competitor) in scorecard.competitors.iter().enumerate() {
            insert_competitor.execute(params![position as i64, competitor.name])?;
        }

        let mut insert_category =
            tx.prepare("INSERT INTO categories (position, name) VALUES (?1, ?2)")?;
        let mut insert_metric = tx.prepare(
            "INSERT INTO metrics (category_position, position, name, description) VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut insert_score = tx.prepare(
            "INSERT INTO scores (category_position, metric_position, competitor_position, value) VALUES (?1, ?2, ?3, ?4)",
        )?;

        for (category_pos, category) in scorecard.categories.iter().enumerate() {
            insert_category.execute(params![category_pos as i64, category.name])?;
            for (metric_pos, metric) in category.metrics.iter().enumerate() {
                insert_metric.execute(params![
                    category_pos as i64,
                    metric_pos as i64,
                    metric.name,
                    metric.description
                ])?;
                for (competitor_pos, value) in metric.scores.iter().enumerate() {
                    insert_score.execute(params![
                        category_pos as i64,
                        metric_pos as i64,
                        competitor_pos as i64,
                        value.map(i64::from)
                    ])?;
                }
            }
        }
    }

    set_meta(&tx, META_SCALE_VERSION, &CURRENT_SCALE_VERSION.to_string())?;
    set_meta(&tx, META_SAVED_AT, &chrono::Utc::now().to_rfc3339())?;
    tx.commit()
}

fn set_meta(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO store_meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM store_meta WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

fn stored_scale_version(conn: &Connection) -> std::result::Result<ScaleVersion, ScorecardError> {
    let Some(raw) = get_meta(conn, META_SCALE_VERSION)? else {
        return Ok(ScaleVersion::Unified);
    };
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(ScaleVersion::from_stored)
        .ok_or_else(|| {
            ScorecardError::StoreUnavailable(format!("unsupported score scale version `{raw}`"))
        })
}

/// Reads the stored aggregate as written, without migration or validation.
/// `None` when the store holds no competitors.
pub fn load_raw_scorecard(conn: &Connection) -> std::result::Result<Option<Scorecard>, ScorecardError> {
    let mut stmt = conn.prepare("SELECT name FROM competitors ORDER BY position ASC")?;
    let competitors: Vec<Competitor> = stmt
        .query_map([], |row| {
            Ok(Competitor {
                name: row.get(0)?,
                score: 0,
            })
        })?
        .collect::<Result<_>>()?;

    if competitors.is_empty() {
        return Ok(None);
    }
    let competitor_count = competitors.len();

    let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY position ASC")?;
    let mut categories: Vec<Category> = stmt
        .query_map([], |row| {
            Ok(Category {
                name: row.get(0)?,
                metrics: Vec::new(),
            })
        })?
        .collect::<Result<_>>()?;

    let mut stmt = conn.prepare(
        "SELECT category_position, name, description FROM metrics ORDER BY category_position ASC, position ASC",
    )?;
    let metric_rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>>>()?;

    for (category_pos, name, description) in metric_rows {
        let category = slot_mut(&mut categories, category_pos, "category")?;
        category.metrics.push(Metric {
            name,
            description,
            scores: vec![None; competitor_count],
        });
    }

    let mut stmt = conn.prepare(
        "SELECT category_position, metric_position, competitor_position, value FROM scores",
    )?;
    let score_rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>>>()?;

    for (category_pos, metric_pos, competitor_pos, value) in score_rows {
        let category = slot_mut(&mut categories, category_pos, "category")?;
        let metric = slot_mut(&mut category.metrics, metric_pos, "metric")?;
        let cell = slot_mut(&mut metric.scores, competitor_pos, "competitor")?;
        *cell = value
            .map(|v| {
                u8::try_from(v).map_err(|_| {
                    ScorecardError::StoreUnavailable(format!("stored score {v} is not a score"))
                })
            })
            .transpose()?;
    }

    Ok(Some(Scorecard {
        competitors,
        categories,
    }))
}

fn slot_mut<'a, T>(
    items: &'a mut [T],
    position: i64,
    target: &str,
) -> std::result::Result<&'a mut T, ScorecardError> {
    let len = items.len();
    usize::try_from(position)
        .ok()
        .and_then(move |idx| items.get_mut(idx))
        .ok_or_else(|| {
            ScorecardError::StoreUnavailable(format!(
                "stored {target} position {position} is out of range (have {len})"
            ))
        })
}

/// Loads the store at `path`, migrating an older score scale exactly once.
///
/// `Ok(None)` means there is nothing saved yet; errors mean the file exists
/// but cannot be trusted.
pub fn load_scorecard_from_path(path: &Path) -> std::result::Result<Option<Scorecard>, ScorecardError> {
    if !path.exists() {
        return Ok(None);
    }

    let conn = open_store(path)?;
    let Some(mut scorecard) = load_raw_scorecard(&conn)? else {
        return Ok(None);
    };

    let scale_version = stored_scale_version(&conn)?;
    if scale_version < ScaleVersion::Unified {
        let changed = scorecard.migrate_scale(scale_version);
        log::info!(
            "migrated store from score scale {:?} to {:?} ({changed} cells changed)",
            scale_version,
            ScaleVersion::Unified
        );
    }

    scorecard
        .validate(MAX_COMPETITORS)
        .map_err(ScorecardError::StoreUnavailable)?;
    recompute_scores(&mut scorecard);

    if scale_version < ScaleVersion::Unified {
        save_scorecard(&conn, &scorecard)?;
    }

    Ok(Some(scorecard))
}

pub fn save_scorecard_to_path(path: &Path, scorecard: &Scorecard) -> std::result::Result<(), ScorecardError> {
    let conn = open_store(path)?;
    save_scorecard(&conn, scorecard)?;
    Ok(())
}

pub fn read_store_status(path: &Path) -> std::result::Result<StoreStatus, ScorecardError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Ok(StoreStatus {
            path: display,
            exists: false,
            schema_version: DB_SCHEMA_VERSION,
            scale_version: None,
            saved_at: None,
        });
    }

    let conn = open_store(path)?;
    let schema_version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let scale_version = get_meta(&conn, META_SCALE_VERSION)?.and_then(|raw| raw.parse().ok());

    Ok(StoreStatus {
        path: display,
        exists: true,
        schema_version,
        scale_version,
        saved_at: get_meta(&conn, META_SAVED_AT)?,
    })
}

#[tauri::command]
pub async fn get_store_status(
    session: tauri::State<'_, SharedSession>,
) -> std::result::Result<StoreStatus, ScorecardError> {
    get_store_status_internal(session.inner())
}

pub fn get_store_status_internal(
    session: &SharedSession,
) -> std::result::Result<StoreStatus, ScorecardError> {
    let path = lock_session(session).paths.store_file.clone();
    read_store_status(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::defaults::default_scorecard;

    #[test]
    fn schema_initializes_with_expected_version() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");
        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("schema version");
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn scorecard_round_trip_preserves_order_and_nulls() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");

        let mut card = default_scorecard();
        card.categories[1].metrics[0].scores[3] = None;
        recompute_scores(&mut card);
        save_scorecard(&conn, &card).expect("save");

        let mut loaded = load_raw_scorecard(&conn).expect("load").expect("stored card");
        recompute_scores(&mut loaded);
        assert_eq!(loaded, card);
        assert_eq!(
            get_meta(&conn, META_SCALE_VERSION).expect("meta").as_deref(),
            Some("3")
        );
    }

    #[test]
    fn save_replaces_previous_aggregate() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");

        let mut card = default_scorecard();
        save_scorecard(&conn, &card).expect("first save");
        card.remove_competitor(0).expect("remove");
        save_scorecard(&conn, &card).expect("second save");

        let loaded = load_raw_scorecard(&conn).expect("load").expect("stored card");
        assert_eq!(loaded.competitors.len(), 5);
        assert_eq!(loaded.competitors[0].name, "Grainger");
    }

    #[test]
    fn empty_store_loads_nothing() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");
        assert!(load_raw_scorecard(&conn).expect("load").is_none());
    }

    #[test]
    fn stray_score_rows_are_reported() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");
        save_scorecard(&conn, &default_scorecard()).expect("save");
        conn.execute(
            "INSERT INTO scores (category_position, metric_position, competitor_position, value) VALUES (0, 0, 42, 1)",
            [],
        )
        .expect("insert stray row");

        let err = load_raw_scorecard(&conn).unwrap_err();
        assert!(matches!(err, ScorecardError::StoreUnavailable(_)));
    }

    #[test]
    fn missing_file_loads_nothing_and_garbage_is_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scorecard.db");
        assert!(load_scorecard_from_path(&path).expect("load").is_none());

        std::fs::write(&path, "not a database ".repeat(512)).expect("write");
        let err = load_scorecard_from_path(&path).unwrap_err();
        assert_eq!(err.kind(), "StoreUnavailable");
    }

    #[test]
    fn legacy_scale_is_migrated_once_and_resaved() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scorecard.db");

        let mut card = crate::models::scorecard::tests::two_by_one();
        card.categories[0].metrics[0].scores = vec![Some(0), Some(4)];
        {
            let conn = open_store(&path).expect("open");
            save_scorecard(&conn, &card).expect("save");
            set_meta(&conn, META_SCALE_VERSION, "1").expect("downgrade scale");
        }

        let loaded = load_scorecard_from_path(&path).expect("load").expect("card");
        assert_eq!(loaded.categories[0].metrics[0].scores, vec![Some(1), Some(5)]);
        assert_eq!(loaded.competitors[1].score, 5);

        let status = read_store_status(&path).expect("status");
        assert_eq!(status.scale_version, Some(CURRENT_SCALE_VERSION));
        assert!(status.saved_at.is_some());

        // A second load must not lift the values again.
        let again = load_scorecard_from_path(&path).expect("load").expect("card");
        assert_eq!(again.categories[0].metrics[0].scores, vec![Some(1), Some(5)]);
    }

    #[test]
    fn unknown_scale_version_is_rejected() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");
        set_meta(&conn, META_SCALE_VERSION, "7").expect("meta");
        assert!(stored_scale_version(&conn).is_err());
        set_meta(&conn, META_SCALE_VERSION, "1").expect("meta");
        assert_eq!(stored_scale_version(&conn).unwrap(), ScaleVersion::Legacy);
    }
}
