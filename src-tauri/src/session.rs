use crate::analysis::totals::recompute_scores;
use crate::commands::db::{load_scorecard_from_path, save_scorecard_to_path};
use crate::commands::settings::{load_effective_settings, ScorecardSettings, StorePaths};
use crate::editor::ResetConfirmation;
use crate::models::defaults::default_scorecard;
use crate::models::scale::score_levels;
use crate::models::scorecard::Scorecard;
use crate::models::view::{EditorState, Notice};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type SharedSession = Arc<Mutex<ScorecardSession>>;

/// Everything one running window owns. The scorecard is the source of truth;
/// the store only mirrors it.
#[derive(Debug)]
pub struct ScorecardSession {
    pub scorecard: Scorecard,
    pub settings: ScorecardSettings,
    pub paths: StorePaths,
    pub(crate) reset: ResetConfirmation,
    notices: Vec<Notice>,
}

/// A panicked command must not lock the user out of their data.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, ScorecardSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScorecardSession {
    /// Loads settings and the stored scorecard, falling back to the defaults.
    pub fn open(paths: StorePaths) -> Self {
        let settings = load_effective_settings(&paths.settings_file);
        let mut notices = Vec::new();

        let scorecard = match load_scorecard_from_path(&paths.store_file) {
            Ok(Some(scorecard)) => {
                log::info!(
                    "loaded scorecard from {} ({} competitors)",
                    paths.store_file.display(),
                    scorecard.competitors.len()
                );
                scorecard
            }
            Ok(None) => {
                log::info!(
                    "no saved scorecard at {}, starting from defaults",
                    paths.store_file.display()
                );
                notices.push(Notice::warning(
                    "No saved scorecard found. Loaded the default dataset.",
                ));
                default_scorecard()
            }
            Err(err) => {
                log::warn!("falling back to defaults: {err}");
                notices.push(Notice::warning(format!(
                    "Saved scorecard could not be loaded ({err}). Loaded the default dataset."
                )));
                default_scorecard()
            }
        };

        Self::with_scorecard(scorecard, settings, paths, notices)
    }

    pub(crate) fn with_scorecard(
        mut scorecard: Scorecard,
        settings: ScorecardSettings,
        paths: StorePaths,
        notices: Vec<Notice>,
    ) -> Self {
        recompute_scores(&mut scorecard);
        Self {
            scorecard,
            settings,
            paths,
            reset: ResetConfirmation::Idle,
            notices,
        }
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Hands out queued notices once.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn reset_pending(&self) -> bool {
        self.reset == ResetConfirmation::PendingConfirm
    }

    /// Writes the live scorecard. A failed save is reported, never rolled back.
    pub fn persist(&self) -> Option<Notice> {
        match save_scorecard_to_path(&self.paths.store_file, &self.scorecard) {
            Ok(()) => None,
            Err(err) => {
                log::warn!("save failed, keeping in-memory changes: {err}");
                Some(Notice::error(format!(
                    "Changes are kept for this session but could not be saved: {err}"
                )))
            }
        }
    }

    /// Swaps in a whole new scorecard and persists it.
    pub fn replace_scorecard(&mut self, mut scorecard: Scorecard) -> Option<Notice> {
        recompute_scores(&mut scorecard);
        self.scorecard = scorecard;
        self.persist()
    }

    pub fn editor_state(&self) -> EditorState {
        EditorState {
            scorecard: Scorecard {
                competitors: self.scorecard.list_competitors().to_vec(),
                categories: self.scorecard.list_categories().to_vec(),
            },
            levels: score_levels(),
            reset_pending: self.reset_pending(),
            max_competitors: self.settings.max_competitors,
        }
    }
}
