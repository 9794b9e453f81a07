use crate::analysis::totals::recompute_scores;
use crate::error::ScorecardError;
use crate::models::view::{DashboardPayload, RadarPayload};
use crate::render::matrix::{build_dashboard, render_dashboard_html};
use crate::render::radar::{build_radar, render_radar_svg};
use crate::session::{lock_session, SharedSession};

#[tauri::command]
pub async fn get_dashboard(
    session: tauri::State<'_, SharedSession>,
) -> Result<DashboardPayload, ScorecardError> {
    get_dashboard_internal(session.inner())
}

/// Full re-render from a snapshot of the live scorecard. Drains queued notices.
pub fn get_dashboard_internal(session: &SharedSession) -> Result<DashboardPayload, ScorecardError> {
    let mut guard = lock_session(session);
    let mut snapshot = guard.scorecard.clone();
    recompute_scores(&mut snapshot);

    let view = build_dashboard(&snapshot, guard.settings.color_scheme);
    let html = render_dashboard_html(&view);

    Ok(DashboardPayload {
        view,
        html,
        show_radar: guard.settings.show_radar_on_load,
        notices: guard.take_notices(),
    })
}

#[tauri::command]
pub async fn get_radar_chart(
    session: tauri::State<'_, SharedSession>,
) -> Result<RadarPayload, ScorecardError> {
    get_radar_chart_internal(session.inner())
}

pub fn get_radar_chart_internal(session: &SharedSession) -> Result<RadarPayload, ScorecardError> {
    let guard = lock_session(session);
    let chart = build_radar(&guard.scorecard);
    let svg = render_radar_svg(&chart);
    Ok(RadarPayload { chart, svg })
}
