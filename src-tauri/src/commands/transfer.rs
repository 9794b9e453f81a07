use crate::analysis::totals::recompute_scores;
use crate::error::ScorecardError;
use crate::models::scorecard::{Scorecard, MAX_COMPETITORS};
use crate::models::view::{EditorResponse, Notice};
use crate::session::{lock_session, SharedSession};
use serde_json::Value;
use std::path::{Path, PathBuf};

const DOCUMENT_KEYS: [&str; 2] = ["competitors", "categories"];

/// Pretty JSON of `{competitors, categories}` with fresh totals.
pub fn export_document(scorecard: &Scorecard) -> Result<String, ScorecardError> {
    let mut snapshot = scorecard.clone();
    recompute_scores(&mut snapshot);
    serde_json::to_string_pretty(&snapshot).map_err(|e| {
        ScorecardError::ExportFailed(format!("failed to serialize scorecard: {e}"))
    })
}

/// Parses and validates a transfer document without touching any session.
///
/// Documents are checked against the hard competitor limit, never the
/// configured cap, so anything this app exported can be imported again.
pub fn parse_document(raw: &str) -> Result<Scorecard, ScorecardError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ScorecardError::ImportRejected(format!("not valid JSON: {e}")))?;

    let Some(object) = value.as_object() else {
        return Err(ScorecardError::ImportRejected(
            "top level must be an object".to_string(),
        ));
    };
    for key in DOCUMENT_KEYS {
        if !object.contains_key(key) {
            return Err(ScorecardError::ImportRejected(format!(
                "missing `{key}` key"
            )));
        }
    }
    if let Some(extra) = object.keys().find(|k| !DOCUMENT_KEYS.contains(&k.as_str())) {
        return Err(ScorecardError::ImportRejected(format!(
            "unexpected top-level key `{extra}`"
        )));
    }

    let mut scorecard: Scorecard = serde_json::from_value(value)
        .map_err(|e| ScorecardError::ImportRejected(format!("malformed scorecard: {e}")))?;
    scorecard
        .validate(MAX_COMPETITORS)
        .map_err(ScorecardError::ImportRejected)?;
    recompute_scores(&mut scorecard);
    Ok(scorecard)
}

#[tauri::command]
pub async fn export_scorecard(
    session: tauri::State<'_, SharedSession>,
) -> Result<String, ScorecardError> {
    export_scorecard_internal(session.inner())
}

pub fn export_scorecard_internal(session: &SharedSession) -> Result<String, ScorecardError> {
    let mut guard = lock_session(session);
    guard.disarm_reset();
    export_document(&guard.scorecard)
}

#[tauri::command]
pub async fn export_scorecard_to_file(
    path: String,
    session: tauri::State<'_, SharedSession>,
) -> Result<String, ScorecardError> {
    export_scorecard_to_file_internal(session.inner(), Path::new(&path))
}

/// Writes the document beside `path` first, then renames it into place.
pub fn export_scorecard_to_file_internal(
    session: &SharedSession,
    path: &Path,
) -> Result<String, ScorecardError> {
    let document = export_scorecard_internal(session)?;
    let temp = temp_sibling(path);
    let written = std::fs::write(&temp, document)
        .map_err(|e| format!("could not write {}: {e}", temp.display()))
        .and_then(|()| {
            std::fs::rename(&temp, path)
                .map_err(|e| format!("could not replace {}: {e}", path.display()))
        });
    if let Err(message) = written {
        let _ = std::fs::remove_file(&temp);
        log::warn!("export failed: {message}");
        return Err(ScorecardError::ExportFailed(message));
    }
    log::info!("exported scorecard to {}", path.display());
    Ok(path.display().to_string())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "scorecard.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[tauri::command]
pub async fn import_scorecard(
    document: String,
    session: tauri::State<'_, SharedSession>,
) -> Result<EditorResponse, ScorecardError> {
    import_scorecard_internal(session.inner(), &document)
}

/// Replaces the live scorecard only when the whole document is valid.
pub fn import_scorecard_internal(
    session: &SharedSession,
    raw: &str,
) -> Result<EditorResponse, ScorecardError> {
    let mut guard = lock_session(session);
    guard.disarm_reset();

    let scorecard = parse_document(raw).map_err(|err| {
        log::warn!("{err}");
        err
    })?;

    let mut notices = vec![Notice::info(format!(
        "Imported {} competitors across {} categories.",
        scorecard.competitors.len(),
        scorecard.categories.len()
    ))];
    log::info!("{}", notices[0].message);
    notices.extend(guard.replace_scorecard(scorecard));

    Ok(EditorResponse {
        state: guard.editor_state(),
        notices,
    })
}

#[tauri::command]
pub async fn import_scorecard_file(
    path: String,
    session: tauri::State<'_, SharedSession>,
) -> Result<EditorResponse, ScorecardError> {
    import_file_internal(session.inner(), Path::new(&path)).await
}

pub async fn import_file_internal(
    session: &SharedSession,
    path: &Path,
) -> Result<EditorResponse, ScorecardError> {
    let raw = match read_transfer_file(path).await {
        Ok(raw) => raw,
        Err(err) => {
            lock_session(session).disarm_reset();
            return Err(err);
        }
    };
    import_scorecard_internal(session, &raw)
}

async fn read_transfer_file(path: &Path) -> Result<String, ScorecardError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        ScorecardError::ImportRejected(format!("could not read {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::settings::StorePaths;
    use crate::models::defaults::default_scorecard;
    use crate::models::scorecard::tests::two_by_one;
    use crate::session::ScorecardSession;
    use serde_json::json;

    #[test]
    fn export_then_parse_restores_the_model() {
        let mut card = default_scorecard();
        card.categories[2].metrics[1].scores[4] = None;
        recompute_scores(&mut card);

        let document = export_document(&card).expect("export");
        assert!(document.contains("\n  \"competitors\""));
        assert_eq!(parse_document(&document).expect("parse"), card);
    }

    #[test]
    fn stale_totals_in_a_document_are_recomputed() {
        let mut value = serde_json::to_value(two_by_one()).expect("to value");
        value["competitors"][0]["score"] = json!(999);
        let card = parse_document(&value.to_string()).expect("parse");
        assert_eq!(card.competitors[0].score, 3);
    }

    #[test]
    fn missing_or_extra_keys_are_rejected() {
        let missing = json!({ "competitors": [] }).to_string();
        let err = parse_document(&missing).unwrap_err();
        assert_eq!(err.to_string(), "import rejected: missing `categories` key");

        let mut extra = serde_json::to_value(two_by_one()).expect("to value");
        extra["version"] = json!(2);
        assert!(matches!(
            parse_document(&extra.to_string()),
            Err(ScorecardError::ImportRejected(_))
        ));

        assert!(parse_document("[1, 2]").is_err());
        assert!(parse_document("{not json").is_err());
    }

    #[test]
    fn invariant_breaches_are_rejected() {
        let mut value = serde_json::to_value(two_by_one()).expect("to value");
        value["categories"][0]["metrics"][0]["scores"] = json!([3, 9]);
        let err = parse_document(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("out-of-range score 9"));

        let mut value = serde_json::to_value(two_by_one()).expect("to value");
        value["categories"][0]["metrics"][0]["scores"] = json!([3]);
        assert!(parse_document(&value.to_string()).is_err());

        let mut value = serde_json::to_value(two_by_one()).expect("to value");
        value["competitors"] = json!([]);
        value["categories"] = json!([]);
        assert!(parse_document(&value.to_string()).is_err());

        let mut value = serde_json::to_value(two_by_one()).expect("to value");
        for i in 0..9 {
            value["competitors"]
                .as_array_mut()
                .expect("competitors")
                .push(json!({ "name": format!("Extra {i}"), "score": 0 }));
            value["categories"][0]["metrics"][0]["scores"]
                .as_array_mut()
                .expect("scores")
                .push(json!(1));
        }
        let err = parse_document(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("11 competitors exceeds the maximum of 10"));
    }

    #[test]
    fn nested_records_must_match_the_document_shape() {
        let mut value = serde_json::to_value(two_by_one()).expect("to value");
        value["categories"][0]["metrics"][0]["weight"] = json!(2);
        assert!(matches!(
            parse_document(&value.to_string()),
            Err(ScorecardError::ImportRejected(_))
        ));

        let mut value = serde_json::to_value(two_by_one()).expect("to value");
        value["competitors"][1]
            .as_object_mut()
            .expect("competitor")
            .remove("score");
        assert!(parse_document(&value.to_string()).is_err());

        let mut value = serde_json::to_value(two_by_one()).expect("to value");
        value["categories"][0]["metrics"][0]
            .as_object_mut()
            .expect("metric")
            .remove("description");
        assert!(parse_document(&value.to_string()).is_err());

        let mut value = serde_json::to_value(two_by_one()).expect("to value");
        value["categories"][0]["icon"] = json!("star");
        assert!(parse_document(&value.to_string()).is_err());
    }

    #[test]
    fn failed_file_export_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let session = ScorecardSession::open(StorePaths::in_dir(&dir.path().join("store"))).shared();

        // Renaming a file over a directory fails after the temp file is written.
        let occupied = dir.path().join("matrix.json");
        std::fs::create_dir(&occupied).expect("create dir");
        let err = export_scorecard_to_file_internal(&session, &occupied).unwrap_err();
        assert_eq!(err.kind(), "ExportFailed");
        assert!(err.to_string().starts_with("export failed: could not replace"));
        assert!(!dir.path().join("matrix.json.tmp").exists());

        let missing_dir = dir.path().join("nowhere").join("matrix.json");
        let err = export_scorecard_to_file_internal(&session, &missing_dir).unwrap_err();
        assert_eq!(err.kind(), "ExportFailed");
    }

    #[test]
    fn temp_file_sits_beside_target() {
        let temp = temp_sibling(Path::new("/tmp/out/matrix.json"));
        assert_eq!(temp, PathBuf::from("/tmp/out/matrix.json.tmp"));
    }
}
