use crate::editor::EditAction;
use crate::error::ScorecardError;
use crate::models::view::{EditorResponse, EditorState};
use crate::session::{lock_session, SharedSession};

#[tauri::command]
pub async fn get_editor_state(
    session: tauri::State<'_, SharedSession>,
) -> Result<EditorState, ScorecardError> {
    let state = lock_session(session.inner()).editor_state();
    Ok(state)
}

#[tauri::command]
pub async fn add_competitor(
    name: String,
    session: tauri::State<'_, SharedSession>,
) -> Result<EditorResponse, ScorecardError> {
    apply_edit_internal(session.inner(), EditAction::AddCompetitor { name })
}

#[tauri::command]
pub async fn rename_competitor(
    index: usize,
    name: String,
    session: tauri::State<'_, SharedSession>,
) -> Result<EditorResponse, ScorecardError> {
    apply_edit_internal(session.inner(), EditAction::RenameCompetitor { index, name })
}

#[tauri::command]
pub async fn remove_competitor(
    index: usize,
    session: tauri::State<'_, SharedSession>,
) -> Result<EditorResponse, ScorecardError> {
    apply_edit_internal(session.inner(), EditAction::RemoveCompetitor { index })
}

#[tauri::command]
pub async fn set_score(
    category: usize,
    metric: usize,
    competitor: usize,
    value: Option<i64>,
    session: tauri::State<'_, SharedSession>,
) -> Result<EditorResponse, ScorecardError> {
    apply_edit_internal(
        session.inner(),
        EditAction::SetScore {
            category,
            metric,
            competitor,
            value,
        },
    )
}

#[tauri::command]
pub async fn reset_to_default(
    session: tauri::State<'_, SharedSession>,
) -> Result<EditorResponse, ScorecardError> {
    apply_edit_internal(session.inner(), EditAction::ResetToDefault)
}

pub fn apply_edit_internal(
    session: &SharedSession,
    action: EditAction,
) -> Result<EditorResponse, ScorecardError> {
    let mut guard = lock_session(session);
    let outcome = guard.dispatch(action).map_err(|err| {
        log::warn!("edit rejected: {err}");
        err
    })?;
    Ok(EditorResponse {
        state: guard.editor_state(),
        notices: outcome.notices,
    })
}
