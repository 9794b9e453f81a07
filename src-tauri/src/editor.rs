use crate::analysis::totals::recompute_scores;
use crate::error::ScorecardError;
use crate::models::defaults::default_scorecard;
use crate::models::scorecard::Removal;
use crate::models::view::Notice;
use crate::session::ScorecardSession;
use serde::{Deserialize, Serialize};

pub const RESET_WARNING: &str =
    "Click again to confirm reset. This will erase all customizations.";

/// Reset needs two consecutive requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetConfirmation {
    #[default]
    Idle,
    PendingConfirm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
    AddCompetitor {
        name: String,
    },
    RenameCompetitor {
        index: usize,
        name: String,
    },
    RemoveCompetitor {
        index: usize,
    },
    SetScore {
        category: usize,
        metric: usize,
        competitor: usize,
        value: Option<i64>,
    },
    ResetToDefault,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub changed: bool,
    pub notices: Vec<Notice>,
}

impl EditOutcome {
    fn unchanged(notice: Notice) -> Self {
        Self {
            changed: false,
            notices: vec![notice],
        }
    }
}

impl ScorecardSession {
    /// Disarms a pending reset for anything other than another reset request.
    pub(crate) fn disarm_reset(&mut self) {
        if self.reset == ResetConfirmation::PendingConfirm {
            log::debug!("pending reset cancelled");
        }
        self.reset = ResetConfirmation::Idle;
    }

    /// Applies one user mutation, then recomputes totals and saves.
    ///
    /// Precondition failures leave the scorecard untouched. A failed save
    /// keeps the mutation and comes back as an error notice.
    pub fn dispatch(&mut self, action: EditAction) -> Result<EditOutcome, ScorecardError> {
        if !matches!(action, EditAction::ResetToDefault) {
            self.disarm_reset();
        }

        let mut outcome = match action {
            EditAction::AddCompetitor { name } => {
                let idx = self.scorecard.add_competitor(
                    &name,
                    self.settings.default_score,
                    self.settings.max_competitors,
                )?;
                log::info!(
                    "added competitor `{}` at {idx}",
                    self.scorecard.competitors[idx].name
                );
                EditOutcome {
                    changed: true,
                    notices: Vec::new(),
                }
            }
            EditAction::RenameCompetitor { index, name } => {
                self.scorecard.rename_competitor(index, &name)?;
                log::info!(
                    "renamed competitor {index} to `{}`",
                    self.scorecard.competitors[index].name
                );
                EditOutcome {
                    changed: true,
                    notices: Vec::new(),
                }
            }
            EditAction::RemoveCompetitor { index } => {
                match self.scorecard.remove_competitor(index)? {
                    Removal::Removed(competitor) => {
                        log::info!("removed competitor `{}`", competitor.name);
                        EditOutcome {
                            changed: true,
                            notices: vec![Notice::info(format!("Removed {}", competitor.name))],
                        }
                    }
                    Removal::Refused => EditOutcome::unchanged(Notice::warning(
                        "At least one competitor is required.",
                    )),
                }
            }
            EditAction::SetScore {
                category,
                metric,
                competitor,
                value,
            } => {
                let previous = self
                    .scorecard
                    .set_score(category, metric, competitor, value)?;
                log::info!(
                    "score [{category}][{metric}][{competitor}] {previous:?} -> {value:?}"
                );
                EditOutcome {
                    changed: previous.map(i64::from) != value,
                    notices: Vec::new(),
                }
            }
            EditAction::ResetToDefault => self.request_reset(),
        };

        if outcome.changed {
            recompute_scores(&mut self.scorecard);
            outcome.notices.extend(self.persist());
        }

        Ok(outcome)
    }

    fn request_reset(&mut self) -> EditOutcome {
        match self.reset {
            ResetConfirmation::Idle => {
                self.reset = ResetConfirmation::PendingConfirm;
                EditOutcome::unchanged(Notice::warning(RESET_WARNING))
            }
            ResetConfirmation::PendingConfirm => {
                self.reset = ResetConfirmation::Idle;
                self.scorecard = default_scorecard();
                log::info!("scorecard reset to defaults");
                EditOutcome {
                    changed: true,
                    notices: vec![Notice::info("Data reset to defaults.")],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::settings::{ScorecardSettings, StorePaths};
    use crate::models::scorecard::tests::two_by_one;
    use crate::models::view::NoticeLevel;

    fn session_in(dir: &std::path::Path) -> ScorecardSession {
        ScorecardSession::with_scorecard(
            two_by_one(),
            ScorecardSettings::default(),
            StorePaths::in_dir(dir),
            Vec::new(),
        )
    }

    #[test]
    fn edits_recompute_totals_and_save() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_in(dir.path());

        let outcome = session
            .dispatch(EditAction::SetScore {
                category: 0,
                metric: 0,
                competitor: 0,
                value: Some(4),
            })
            .expect("set score");
        assert!(outcome.changed);
        assert!(outcome.notices.is_empty());
        assert_eq!(session.scorecard.competitors[0].score, 4);

        session
            .dispatch(EditAction::AddCompetitor {
                name: "X".to_string(),
            })
            .expect("add");
        assert_eq!(
            session.scorecard.categories[0].metrics[0].scores,
            vec![Some(4), Some(5), Some(0)]
        );
        assert_eq!(session.scorecard.competitors[0].score, 4);
        assert!(session.paths.store_file.exists());
    }

    #[test]
    fn settings_drive_default_score_and_cap() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_in(dir.path());
        session.settings.default_score = 2;
        session.settings.max_competitors = 3;

        session
            .dispatch(EditAction::AddCompetitor {
                name: "Gamma".to_string(),
            })
            .expect("add");
        assert_eq!(session.scorecard.competitors[2].score, 2);

        let err = session
            .dispatch(EditAction::AddCompetitor {
                name: "Delta".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ScorecardError::CapacityExceeded { max: 3 }));
    }

    #[test]
    fn reset_needs_two_consecutive_requests() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_in(dir.path());

        let first = session.dispatch(EditAction::ResetToDefault).expect("arm");
        assert!(!first.changed);
        assert_eq!(first.notices[0].message, RESET_WARNING);
        assert!(session.reset_pending());
        assert_eq!(session.scorecard.competitors.len(), 2);

        let second = session.dispatch(EditAction::ResetToDefault).expect("confirm");
        assert!(second.changed);
        assert!(!session.reset_pending());
        assert_eq!(session.scorecard, default_scorecard());
    }

    #[test]
    fn other_actions_disarm_pending_reset() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_in(dir.path());

        session.dispatch(EditAction::ResetToDefault).expect("arm");
        session
            .dispatch(EditAction::RenameCompetitor {
                index: 0,
                name: "Alpha Two".to_string(),
            })
            .expect("rename");
        assert!(!session.reset_pending());

        let again = session.dispatch(EditAction::ResetToDefault).expect("arm again");
        assert!(!again.changed);
        assert_eq!(session.scorecard.competitors[0].name, "Alpha Two");

        // A failed action still counts as a different action.
        let _ = session.dispatch(EditAction::RemoveCompetitor { index: 9 });
        assert!(!session.reset_pending());
    }

    #[test]
    fn refusing_last_removal_is_a_warning_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_in(dir.path());
        session
            .dispatch(EditAction::RemoveCompetitor { index: 0 })
            .expect("remove");

        let outcome = session
            .dispatch(EditAction::RemoveCompetitor { index: 0 })
            .expect("refused removal");
        assert!(!outcome.changed);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Warning);
        assert_eq!(session.scorecard.competitors[0].name, "Beta");
    }

    #[test]
    fn unwritable_store_keeps_mutation_and_reports_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").expect("write");

        let mut session = ScorecardSession::with_scorecard(
            two_by_one(),
            ScorecardSettings::default(),
            StorePaths::for_store_file(blocker.join("scorecard.db")),
            Vec::new(),
        );
        let outcome = session
            .dispatch(EditAction::SetScore {
                category: 0,
                metric: 0,
                competitor: 1,
                value: None,
            })
            .expect("set score");
        assert!(outcome.changed);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Error);
        assert_eq!(session.scorecard.competitors[1].score, 0);
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: EditAction = serde_json::from_value(serde_json::json!({
            "action": "set_score",
            "category": 1,
            "metric": 2,
            "competitor": 0,
            "value": null
        }))
        .expect("decode action");
        assert_eq!(
            action,
            EditAction::SetScore {
                category: 1,
                metric: 2,
                competitor: 0,
                value: None
            }
        );
    }
}
