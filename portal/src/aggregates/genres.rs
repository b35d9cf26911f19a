//! Literary genre picker for vendors.

use super::announce;
use crate::environment::PortalEnvironment;
use crate::state::{GenreState, PortalState};
use crate::types::Notification;
use bookfair_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Genres offered by the picker
pub const LITERARY_GENRES: [&str; 20] = [
    "Fiction",
    "Poetry",
    "Biography",
    "Children's Books",
    "Mystery & Thriller",
    "Science Fiction",
    "Fantasy",
    "Romance",
    "Historical Fiction",
    "Self-Help",
    "Business",
    "Philosophy",
    "Travel",
    "Cookbooks",
    "Art & Photography",
    "Religion & Spirituality",
    "Science & Nature",
    "Comics & Graphic Novels",
    "Young Adult",
    "Literary Criticism",
];

/// Actions for the genre picker
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenreAction {
    // ========== Commands ==========
    /// Command: Pick or unpick a genre
    ToggleGenre {
        /// Genre name
        name: String,
    },

    /// Command: Pick a genre that is not in the fixed list
    AddCustomGenre {
        /// Genre name, trimmed before use
        name: String,
    },

    /// Command: Filter the available list
    SetGenreSearch {
        /// Filter text
        query: String,
    },

    /// Command: Store the picked genres on the vendor
    SaveGenres,

    /// Command: Forget the signed-out vendor's picks
    EndSession,

    // ========== Events ==========
    /// Event: Genre picked
    GenreAdded {
        /// Genre name
        name: String,
        /// Entered by the vendor rather than taken from the list
        custom: bool,
    },

    /// Event: Genre unpicked
    GenreRemoved {
        /// Genre name
        name: String,
    },

    /// Event: Filter text changed
    GenreSearchChanged {
        /// Filter text
        query: String,
    },

    /// Event: Picked genres stored
    GenresSaved {
        /// Stored genres
        genres: Vec<String>,
    },

    /// Event: Picker reset for the next vendor
    GenresCleared,

    /// Event: Command validation failed
    ValidationFailed {
        /// Error message
        error: String,
    },
}

/// Reducer for the genre picker
#[derive(Clone, Debug, Default)]
pub struct GenreReducer;

impl GenreReducer {
    /// Creates a new `GenreReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolves a toggle to an add or a remove
    fn toggle_event(state: &PortalState, name: &str) -> Result<GenreAction, String> {
        let name = name.trim();
        if let Some(picked) = state.genres.selected.iter().find(|g| g.eq_ignore_ascii_case(name)) {
            return Ok(GenreAction::GenreRemoved {
                name: picked.clone(),
            });
        }

        LITERARY_GENRES
            .iter()
            .find(|genre| genre.eq_ignore_ascii_case(name))
            .map(|genre| GenreAction::GenreAdded {
                name: (*genre).to_string(),
                custom: false,
            })
            .ok_or_else(|| format!("Unknown genre '{name}', add it as a custom genre"))
    }

    /// Validates an `AddCustomGenre` command
    ///
    /// `Ok(None)` means the input was blank and is silently ignored.
    fn validate_custom(state: &PortalState, name: &str) -> Result<Option<String>, String> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        if state.genres.is_selected(name) {
            return Err("Genre already added".to_string());
        }
        Ok(Some(name.to_string()))
    }

    /// Applies an event to state
    fn apply_event(state: &mut PortalState, action: &GenreAction) {
        match action {
            GenreAction::GenreAdded { name, custom } => {
                state.genres.selected.push(name.clone());
                if *custom {
                    state.last_notification = Some(Notification::success("Custom genre added"));
                }
            },
            GenreAction::GenreRemoved { name } => {
                state.genres.selected.retain(|g| g != name);
            },
            GenreAction::GenreSearchChanged { query } => {
                state.genres.search.clone_from(query);
            },
            GenreAction::GenresSaved { genres } => {
                state.genres.saved.clone_from(genres);
                state.last_notification = Some(Notification::success(format!(
                    "{} genres saved successfully!",
                    genres.len()
                )));
            },
            GenreAction::GenresCleared => {
                state.genres = GenreState::default();
            },
            GenreAction::ValidationFailed { error } => {
                state.last_notification = Some(Notification::error(error.clone()));
            },
            // Commands are not applied to state
            GenreAction::ToggleGenre { .. }
            | GenreAction::AddCustomGenre { .. }
            | GenreAction::SetGenreSearch { .. }
            | GenreAction::SaveGenres
            | GenreAction::EndSession => {},
        }
    }

    fn reject(
        state: &mut PortalState,
        env: &PortalEnvironment,
        error: String,
    ) -> SmallVec<[Effect<GenreAction>; 4]> {
        Self::apply_event(state, &GenreAction::ValidationFailed { error: error.clone() });
        smallvec![announce(env, Notification::error(error))]
    }
}

impl Reducer for GenreReducer {
    type State = PortalState;
    type Action = GenreAction;
    type Environment = PortalEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            GenreAction::ToggleGenre { name } => match Self::toggle_event(state, &name) {
                Ok(event) => {
                    Self::apply_event(state, &event);
                    SmallVec::new()
                },
                Err(error) => Self::reject(state, env, error),
            },

            GenreAction::AddCustomGenre { name } => match Self::validate_custom(state, &name) {
                Ok(Some(name)) => {
                    Self::apply_event(state, &GenreAction::GenreAdded { name, custom: true });
                    smallvec![announce(env, Notification::success("Custom genre added"))]
                },
                Ok(None) => SmallVec::new(),
                Err(error) => Self::reject(state, env, error),
            },

            GenreAction::SetGenreSearch { query } => {
                Self::apply_event(state, &GenreAction::GenreSearchChanged { query });
                SmallVec::new()
            },

            GenreAction::SaveGenres => {
                if state.genres.selected.is_empty() {
                    return Self::reject(state, env, "Please select at least one genre".to_string());
                }

                let event = GenreAction::GenresSaved {
                    genres: state.genres.selected.clone(),
                };
                Self::apply_event(state, &event);
                tracing::info!(genres = state.genres.saved.len(), "Vendor genres saved");

                match state.last_notification.clone() {
                    Some(notification) => smallvec![announce(env, notification)],
                    None => SmallVec::new(),
                }
            },

            GenreAction::EndSession => {
                Self::apply_event(state, &GenreAction::GenresCleared);
                SmallVec::new()
            },

            // ========== Events ==========
            GenreAction::GenreAdded { .. }
            | GenreAction::GenreRemoved { .. }
            | GenreAction::GenreSearchChanged { .. }
            | GenreAction::GenresSaved { .. }
            | GenreAction::GenresCleared
            | GenreAction::ValidationFailed { .. } => {
                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::RecordingNotifier;
    use bookfair_testing::{ReducerTest, assertions, test_clock};
    use std::sync::Arc;

    fn env() -> PortalEnvironment {
        PortalEnvironment::new(Arc::new(test_clock()), Arc::new(RecordingNotifier::new()))
    }

    fn toggle(name: &str) -> GenreAction {
        GenreAction::ToggleGenre {
            name: name.to_string(),
        }
    }

    fn custom(name: &str) -> GenreAction {
        GenreAction::AddCustomGenre {
            name: name.to_string(),
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        ReducerTest::new(GenreReducer::new())
            .with_env(env())
            .given_state(PortalState::default())
            .given_actions(vec![toggle("Poetry"), toggle("fantasy")])
            .when_action(toggle("poetry"))
            .then_state(|state| {
                assert_eq!(state.genres.selected, vec!["Fantasy"]);
                assert!(state.genres.available().contains(&"Poetry"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn unknown_genre_needs_custom_entry() {
        ReducerTest::new(GenreReducer::new())
            .with_env(env())
            .given_state(PortalState::default())
            .when_action(toggle("Zines"))
            .then_state(|state| {
                assert!(state.genres.selected.is_empty());
                assert!(state.last_notification.as_ref().is_some_and(Notification::is_error));
            })
            .run();
    }

    #[test]
    fn custom_genre_is_trimmed_and_announced() {
        ReducerTest::new(GenreReducer::new())
            .with_env(env())
            .given_state(PortalState::default())
            .when_action(custom("  Zines  "))
            .then_state(|state| {
                assert_eq!(state.genres.selected, vec!["Zines"]);
                assert_eq!(
                    state.last_notification,
                    Some(Notification::success("Custom genre added"))
                );
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn duplicate_custom_genre_is_rejected() {
        ReducerTest::new(GenreReducer::new())
            .with_env(env())
            .given_state(PortalState::default())
            .given_actions(vec![custom("Zines")])
            .when_action(custom("Zines"))
            .then_state(|state| {
                assert_eq!(state.genres.selected.len(), 1);
                assert_eq!(
                    state.last_notification,
                    Some(Notification::error("Genre already added"))
                );
            })
            .run();
    }

    #[test]
    fn blank_custom_genre_is_ignored() {
        ReducerTest::new(GenreReducer::new())
            .with_env(env())
            .given_state(PortalState::default())
            .when_action(custom("   "))
            .then_state(|state| {
                assert!(state.genres.selected.is_empty());
                assert_eq!(state.last_notification, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn search_narrows_available_list() {
        ReducerTest::new(GenreReducer::new())
            .with_env(env())
            .given_state(PortalState::default())
            .when_action(GenreAction::SetGenreSearch {
                query: "sci".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.genres.available(), vec!["Science Fiction", "Science & Nature"]);
            })
            .run();
    }

    #[test]
    fn saving_nothing_is_rejected() {
        ReducerTest::new(GenreReducer::new())
            .with_env(env())
            .given_state(PortalState::default())
            .when_action(GenreAction::SaveGenres)
            .then_state(|state| {
                assert!(state.genres.saved.is_empty());
                assert_eq!(
                    state.last_notification,
                    Some(Notification::error("Please select at least one genre"))
                );
            })
            .run();
    }

    #[test]
    fn saving_reports_count() {
        ReducerTest::new(GenreReducer::new())
            .with_env(env())
            .given_state(PortalState::default())
            .given_actions(vec![toggle("Travel"), custom("Zines")])
            .when_action(GenreAction::SaveGenres)
            .then_state(|state| {
                assert_eq!(state.genres.saved, vec!["Travel", "Zines"]);
                assert_eq!(
                    state.last_notification,
                    Some(Notification::success("2 genres saved successfully!"))
                );
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn ending_session_clears_picks() {
        ReducerTest::new(GenreReducer::new())
            .with_env(env())
            .given_state(PortalState::default())
            .given_actions(vec![
                custom("Zines"),
                toggle("Poetry"),
                GenreAction::SaveGenres,
                GenreAction::SetGenreSearch {
                    query: "fic".to_string(),
                },
            ])
            .when_action(GenreAction::EndSession)
            .then_state(|state| {
                assert_eq!(state.genres, GenreState::default());
                assert!(state.genres.available().contains(&"Poetry"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
