//! Line-oriented shell over the portal.
//!
//! Each input line parses into a [`Command`]; [`PortalApp::execute`] checks
//! the session the command needs, sends actions to the store, and renders the
//! resulting page.

use crate::aggregates::{BookingAction, GenreAction, PortalAction, StaffAction};
use crate::catalog::SizeFilter;
use crate::config::{Config, ConfigError};
use crate::environment::{Notifier, PortalEnvironment};
use crate::projections::{OccupancyStats, ReservationPage, VendorDashboard, reservation_list};
use crate::routes::Route;
use crate::session::{
    AuthError, KeyValueStore, LoginForm, RegistrationForm, Role, SessionContext, SessionError,
    StorageError,
};
use crate::state::PortalState;
use crate::types::{Notification, ParseError, StallId, VendorProfile};
use crate::views::{StaffHeader, VendorHeader, staff, vendor};
use crate::{PortalReducer, PortalStore};
use bookfair_runtime::StoreError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Commands shown by `help`
pub const HELP: &str = "\
Vendor
  login <email> <password>          sign in
  register <business>|<contact>|<email>|<phone>|<password>|<confirm>|<yes/no>
  logout                            sign out
  dashboard                         reservation progress
  map                               stall map and prices
  filter <all|small|medium|large>   narrow the map
  toggle <stall>                    select or deselect a stall
  reserve                           review the selection
  confirm | cancel                  finish or leave the review
  success                           last confirmed reservation
  my-reservations                   your reservations
  genres                            genre picker
  genre <name>                      pick or unpick a listed genre
  custom-genre <name>               add your own genre
  genre-search [text]               filter the genre list
  save-genres                       store picked genres
Staff
  staff-login <email> <password>    sign in
  staff-logout                      sign out
  stats                             occupancy dashboard
  stalls [search]                   stall list
  stall <stall>                     stall detail
  release <stall>                   free a reserved stall
  manual-reserve <stall>            reserve an available stall
  reservations [page] [search]      reservation list
General
  help | quit";

/// Shown after a successful sign-in
pub const LOGIN_SUCCESS: &str = "Login successful!";

/// Shown after a successful vendor registration
pub const REGISTRATION_SUCCESS: &str = "Registration successful!";

/// Errors from parsing or running a command
#[derive(Error, Debug)]
pub enum CommandError {
    /// First word is not a command
    #[error("unknown command '{0}', try `help`")]
    Unknown(String),

    /// Arguments missing or malformed
    #[error("usage: {0}")]
    Usage(&'static str),

    /// An argument could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The page needs a session
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Session storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The store rejected the action
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A parsed shell command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Vendor sign-in
    Login(LoginForm),
    /// Vendor registration
    Register(RegistrationForm),
    /// Vendor sign-out
    Logout,
    /// Staff sign-in
    StaffLogin(LoginForm),
    /// Staff sign-out
    StaffLogout,
    /// Stall map
    Map,
    /// Size filter
    Filter(SizeFilter),
    /// Select or deselect a stall
    Toggle(StallId),
    /// Open the confirmation step
    Reserve,
    /// Confirm the reservation
    Confirm,
    /// Close the confirmation step
    Cancel,
    /// Success page
    Success,
    /// Genre picker
    Genres,
    /// Pick or unpick a listed genre
    Genre(String),
    /// Add a custom genre
    CustomGenre(String),
    /// Filter the genre list
    GenreSearch(String),
    /// Store picked genres
    SaveGenres,
    /// Vendor's reservations
    MyReservations,
    /// Vendor dashboard
    Dashboard,
    /// Staff occupancy dashboard
    Stats,
    /// Staff stall list
    Stalls(String),
    /// Staff stall detail
    Stall(StallId),
    /// Staff release
    Release(StallId),
    /// Staff manual reservation
    ManualReserve(StallId),
    /// Staff reservation list
    Reservations {
        /// 1-based page
        page: usize,
        /// Vendor or id filter
        query: String,
    },
    /// Command list
    Help,
    /// Leave the shell
    Quit,
}

fn login_form(args: &str, usage: &'static str) -> Result<LoginForm, CommandError> {
    let mut words = args.split_whitespace();
    let email = words.next().ok_or(CommandError::Usage(usage))?;
    Ok(LoginForm {
        email: email.to_string(),
        password: words.next().unwrap_or_default().to_string(),
    })
}

fn registration_form(args: &str) -> Result<RegistrationForm, CommandError> {
    let fields: Vec<&str> = args.split('|').map(str::trim).collect();
    let [business, contact, email, phone, password, confirm, terms] = fields.as_slice() else {
        return Err(CommandError::Usage(
            "register <business>|<contact>|<email>|<phone>|<password>|<confirm>|<yes/no>",
        ));
    };
    Ok(RegistrationForm {
        business_name: (*business).to_string(),
        contact_person: (*contact).to_string(),
        email: (*email).to_string(),
        phone: (*phone).to_string(),
        password: (*password).to_string(),
        confirm_password: (*confirm).to_string(),
        accept_terms: matches!(terms.to_ascii_lowercase().as_str(), "yes" | "y" | "true"),
    })
}

fn stall_arg(args: &str, usage: &'static str) -> Result<StallId, CommandError> {
    if args.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok(args.parse()?)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let args = args.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "login" => Self::Login(login_form(args, "login <email> <password>")?),
            "register" => Self::Register(registration_form(args)?),
            "logout" => Self::Logout,
            "staff-login" => Self::StaffLogin(login_form(args, "staff-login <email> <password>")?),
            "staff-logout" => Self::StaffLogout,
            "map" => Self::Map,
            "filter" => {
                if args.is_empty() {
                    return Err(CommandError::Usage("filter <all|small|medium|large>"));
                }
                Self::Filter(args.parse()?)
            },
            "toggle" => Self::Toggle(stall_arg(args, "toggle <stall>")?),
            "reserve" => Self::Reserve,
            "confirm" => Self::Confirm,
            "cancel" => Self::Cancel,
            "success" => Self::Success,
            "genres" => Self::Genres,
            "genre" => {
                if args.is_empty() {
                    return Err(CommandError::Usage("genre <name>"));
                }
                Self::Genre(args.to_string())
            },
            "custom-genre" => Self::CustomGenre(args.to_string()),
            "genre-search" => Self::GenreSearch(args.to_string()),
            "save-genres" => Self::SaveGenres,
            "my-reservations" => Self::MyReservations,
            "dashboard" => Self::Dashboard,
            "stats" => Self::Stats,
            "stalls" => Self::Stalls(args.to_string()),
            "stall" => Self::Stall(stall_arg(args, "stall <stall>")?),
            "release" => Self::Release(stall_arg(args, "release <stall>")?),
            "manual-reserve" => Self::ManualReserve(stall_arg(args, "manual-reserve <stall>")?),
            "reservations" => {
                let (first, rest) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
                match first.parse::<usize>() {
                    Ok(page) => Self::Reservations {
                        page,
                        query: rest.trim().to_string(),
                    },
                    Err(_) => Self::Reservations {
                        page: 1,
                        query: args.to_string(),
                    },
                }
            },
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

impl Command {
    /// Page the command acts on, which decides the session it needs
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::Help | Self::Quit => Route::Home,
            Self::Login(_) | Self::Register(_) | Self::Logout => Route::Login,
            Self::StaffLogin(_) | Self::StaffLogout => Route::StaffLogin,
            Self::Map
            | Self::Filter(_)
            | Self::Toggle(_)
            | Self::Reserve
            | Self::Confirm
            | Self::Cancel => Route::Reserve,
            Self::Success => Route::Success,
            Self::Genres
            | Self::Genre(_)
            | Self::CustomGenre(_)
            | Self::GenreSearch(_)
            | Self::SaveGenres => Route::Genres,
            Self::MyReservations => Route::MyReservations,
            Self::Dashboard => Route::Dashboard,
            Self::Stats => Route::StaffDashboard,
            Self::Stalls(_) | Self::Stall(_) | Self::Release(_) | Self::ManualReserve(_) => {
                Route::StaffStalls
            },
            Self::Reservations { .. } => Route::StaffReservations,
        }
    }
}

/// What the shell does after a command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print this page and read the next line
    Continue(String),
    /// Leave the shell
    Quit,
}

/// Builds the shared store from configuration
///
/// With `BOOKFAIR_SEED` set the hall is reproducible.
///
/// # Errors
///
/// Returns [`ConfigError`] for invalid settings.
pub fn build_store(
    config: &Config,
    environment: PortalEnvironment,
) -> Result<PortalStore, ConfigError> {
    let generator = config.generator()?;
    let mut rng = config
        .catalog
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let catalog = generator.generate(&mut rng);
    let state = PortalState::bootstrap(catalog, config.max_selection, environment.clock.now());
    tracing::info!(
        stalls = state.catalog.len(),
        reservations = state.ledger.len(),
        "Portal state ready"
    );
    Ok(PortalStore::new(state, PortalReducer::new(), environment))
}

/// The portal as seen from one terminal
pub struct PortalApp<S> {
    store: PortalStore,
    sessions: SessionContext<S>,
    notifier: Arc<dyn Notifier>,
    profile: Option<VendorProfile>,
    page_size: usize,
}

impl<S: KeyValueStore> PortalApp<S> {
    /// Creates the app over a store and loaded sessions
    #[must_use]
    pub fn new(
        store: PortalStore,
        sessions: SessionContext<S>,
        notifier: Arc<dyn Notifier>,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            sessions,
            notifier,
            profile: None,
            page_size: page_size.max(1),
        }
    }

    /// The shared store
    #[must_use]
    pub const fn store(&self) -> &PortalStore {
        &self.store
    }

    /// Current sessions
    #[must_use]
    pub const fn sessions(&self) -> &SessionContext<S> {
        &self.sessions
    }

    /// Profile captured at registration this run
    #[must_use]
    pub const fn profile(&self) -> Option<&VendorProfile> {
        self.profile.as_ref()
    }

    /// Sends an action and waits for its effects (notifications) to finish
    async fn dispatch(&self, action: impl Into<PortalAction>) -> Result<(), CommandError> {
        let handle = self.store.send(action.into()).await?;
        handle.wait().await?;
        Ok(())
    }

    /// Shows a form error as a toast; storage errors propagate
    fn form_rejected(&self, error: SessionError) -> Result<Outcome, CommandError> {
        match error {
            SessionError::Form(form) => {
                self.notifier.notify(&Notification::error(form.to_string()));
                Ok(Outcome::Continue(String::new()))
            },
            SessionError::Storage(storage) => Err(storage.into()),
        }
    }

    /// Checks whether `email` would replace the signed-in vendor
    fn is_new_vendor(&self, email: &str) -> bool {
        self.sessions
            .current(Role::Vendor)
            .is_none_or(|session| !session.email.eq_ignore_ascii_case(email.trim()))
    }

    /// Clears the shared selection and genre picks left by the last vendor
    async fn end_vendor_session(&mut self) -> Result<(), CommandError> {
        self.dispatch(BookingAction::EndSession).await?;
        self.dispatch(GenreAction::EndSession).await?;
        self.profile = None;
        Ok(())
    }

    fn vendor_email(&self) -> Result<String, CommandError> {
        Ok(self.sessions.require(Role::Vendor)?.email.clone())
    }

    async fn vendor_page<F>(&self, render: F) -> Outcome
    where
        F: FnOnce(&PortalState) -> String,
    {
        let header = VendorHeader {
            email: self.sessions.current(Role::Vendor).map(|s| s.email.as_str()),
        }
        .render();
        let body = self.store.state(render).await;
        Outcome::Continue(format!("{header}\n{body}"))
    }

    async fn staff_page<F>(&self, render: F) -> Outcome
    where
        F: FnOnce(&PortalState) -> String,
    {
        let header = StaffHeader {
            email: self.sessions.current(Role::Staff).map(|s| s.email.as_str()),
        }
        .render();
        let body = self.store.state(render).await;
        Outcome::Continue(format!("{header}\n{body}"))
    }

    /// Runs one command
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Auth`] when the command's page needs a session
    /// that is not there, or a storage or store error. Rejected input is
    /// reported through the notifier instead.
    pub async fn execute(&mut self, command: Command) -> Result<Outcome, CommandError> {
        self.sessions.authorize(command.route())?;

        let outcome = match command {
            Command::Help => Outcome::Continue(HELP.to_string()),
            Command::Quit => Outcome::Quit,

            // ========== Sessions ==========
            Command::Login(form) => {
                let new_vendor = self.is_new_vendor(&form.email);
                if let Err(error) = self.sessions.login(Role::Vendor, &form) {
                    return self.form_rejected(error);
                }
                if new_vendor {
                    self.end_vendor_session().await?;
                }
                self.notifier.notify(&Notification::success(LOGIN_SUCCESS));
                self.vendor_page(vendor::stall_map).await
            },
            Command::Register(form) => {
                let new_vendor = self.is_new_vendor(&form.email);
                let profile = match self.sessions.register(&form) {
                    Ok(profile) => profile,
                    Err(error) => return self.form_rejected(error),
                };
                if new_vendor {
                    self.end_vendor_session().await?;
                }
                self.profile = Some(profile);
                self.notifier.notify(&Notification::success(REGISTRATION_SUCCESS));
                self.vendor_page(vendor::stall_map).await
            },
            Command::Logout => {
                let next = self.sessions.logout(Role::Vendor)?;
                self.end_vendor_session().await?;
                Outcome::Continue(format!("Signed out, back to {next}"))
            },
            Command::StaffLogin(form) => {
                if let Err(error) = self.sessions.login(Role::Staff, &form) {
                    return self.form_rejected(error);
                }
                self.notifier.notify(&Notification::success(LOGIN_SUCCESS));
                self.staff_page(occupancy).await
            },
            Command::StaffLogout => {
                let next = self.sessions.logout(Role::Staff)?;
                Outcome::Continue(format!("Signed out, back to {next}"))
            },

            // ========== Booking ==========
            Command::Map => {
                self.vendor_page(|state| {
                    format!("{}\n\n{}", vendor::stall_map(state), vendor::pricing())
                })
                .await
            },
            Command::Filter(filter) => {
                self.dispatch(BookingAction::SetSizeFilter { filter }).await?;
                self.vendor_page(vendor::stall_map).await
            },
            Command::Toggle(id) => {
                self.dispatch(BookingAction::ToggleStall { id }).await?;
                self.vendor_page(|state| {
                    format!("{}\n{}", vendor::stall_map(state), vendor::selection_summary(state))
                })
                .await
            },
            Command::Reserve => {
                self.dispatch(BookingAction::RequestReservation).await?;
                self.vendor_page(|state| {
                    if state.booking.confirmation_open {
                        vendor::confirmation(state)
                    } else {
                        vendor::selection_summary(state)
                    }
                })
                .await
            },
            Command::Confirm => {
                let vendor = self.vendor_email()?;
                let before = self.store.state(|state| state.ledger.len()).await;
                self.dispatch(BookingAction::ConfirmReservation { vendor }).await?;
                self.vendor_page(move |state| {
                    if state.ledger.len() > before {
                        vendor::success(&state.success_snapshot())
                    } else {
                        vendor::confirmation(state)
                    }
                })
                .await
            },
            Command::Cancel => {
                self.dispatch(BookingAction::CancelConfirmation).await?;
                self.vendor_page(vendor::selection_summary).await
            },
            Command::Success => {
                self.vendor_page(|state| vendor::success(&state.success_snapshot()))
                    .await
            },

            // ========== Genres ==========
            Command::Genres => self.vendor_page(|state| vendor::genre_page(&state.genres)).await,
            Command::Genre(name) => self.genre_action(GenreAction::ToggleGenre { name }).await?,
            Command::CustomGenre(name) => {
                self.genre_action(GenreAction::AddCustomGenre { name }).await?
            },
            Command::GenreSearch(query) => {
                self.genre_action(GenreAction::SetGenreSearch { query }).await?
            },
            Command::SaveGenres => {
                let outcome = self.genre_action(GenreAction::SaveGenres).await?;
                let saved = self.store.state(|state| state.genres.saved.clone()).await;
                if let Some(profile) = self.profile.as_mut() {
                    profile.genres = saved;
                }
                outcome
            },

            // ========== Vendor reservations ==========
            Command::Dashboard => {
                let email = self.vendor_email()?;
                self.vendor_page(move |state| {
                    let max = state.booking.max_selection;
                    let board = VendorDashboard::for_vendor(&state.ledger, &email, max);
                    vendor::dashboard(&board, &state.genres.saved)
                })
                .await
            },
            Command::MyReservations => {
                let email = self.vendor_email()?;
                self.vendor_page(move |state| {
                    let max = state.booking.max_selection;
                    let board = VendorDashboard::for_vendor(&state.ledger, &email, max);
                    vendor::my_reservations(&board)
                })
                .await
            },

            // ========== Staff ==========
            Command::Stats => self.staff_page(occupancy).await,
            Command::Stalls(query) => {
                self.staff_page(move |state| staff::stall_list(state.catalog.search(&query)))
                    .await
            },
            Command::Stall(id) => self.staff_page(move |state| stall_or_missing(state, &id)).await,
            Command::Release(id) => {
                self.dispatch(StaffAction::ReleaseStall { id: id.clone() }).await?;
                self.staff_page(move |state| stall_or_missing(state, &id)).await
            },
            Command::ManualReserve(id) => {
                self.dispatch(StaffAction::ManuallyReserve { id: id.clone() }).await?;
                self.staff_page(move |state| stall_or_missing(state, &id)).await
            },
            Command::Reservations { page, query } => {
                let page_size = self.page_size;
                self.staff_page(move |state| {
                    let matches = reservation_list::search(&state.ledger, &query);
                    staff::reservation_page(&ReservationPage::paginate(&matches, page, page_size))
                })
                .await
            },
        };
        Ok(outcome)
    }

    async fn genre_action(&self, action: GenreAction) -> Result<Outcome, CommandError> {
        self.dispatch(action).await?;
        Ok(self.vendor_page(|state| vendor::genre_page(&state.genres)).await)
    }
}

fn occupancy(state: &PortalState) -> String {
    staff::dashboard(&OccupancyStats::from_catalog(&state.catalog))
}

fn stall_or_missing(state: &PortalState, id: &StallId) -> String {
    state
        .catalog
        .get(id)
        .map_or_else(|| format!("Stall {id} not found"), staff::stall_detail)
}
