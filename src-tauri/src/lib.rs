pub mod analysis;
pub mod commands;
pub mod editor;
pub mod error;
pub mod models;
pub mod render;
pub mod session;

use commands::{
    dashboard::{get_dashboard, get_radar_chart},
    db::get_store_status,
    editor::{
        add_competitor, get_editor_state, remove_competitor, rename_competitor, reset_to_default,
        set_score,
    },
    settings::{get_settings, save_settings, StorePaths, STORE_PATH_ENV},
    transfer::{export_scorecard, export_scorecard_to_file, import_scorecard, import_scorecard_file},
};
use session::ScorecardSession;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir()?;
            let paths = StorePaths::resolve(std::env::var(STORE_PATH_ENV).ok(), &app_data_dir);
            log::info!("scorecard store at {}", paths.store_file.display());
            app.manage(ScorecardSession::open(paths).shared());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_dashboard,
            get_radar_chart,
            get_editor_state,
            add_competitor,
            rename_competitor,
            remove_competitor,
            set_score,
            reset_to_default,
            export_scorecard,
            export_scorecard_to_file,
            import_scorecard,
            import_scorecard_file,
            get_settings,
            save_settings,
            get_store_status,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
