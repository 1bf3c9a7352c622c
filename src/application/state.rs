//! Top-level application state.
//!
//! `App` owns one state object per screen plus the notification queue. It
//! handles navigation and notifications itself and hands every other
//! [`Command`] back to the runtime.

use std::time::Instant;
use tracing::info;

use super::commands::{Command, Outcome, Screen};
use super::home::HomeScreen;
use super::notifications::{Notification, Notifications};
use super::verification::{FlowPolicy, VerificationFlow};
use crate::domain::Session;

/// Main application state.
///
/// # Examples
///
/// ```
/// use fastor::application::{App, FlowPolicy, Screen};
///
/// let (app, effects) = App::new(FlowPolicy::default(), None);
/// assert_eq!(app.screen, Screen::Register);
/// assert!(effects.is_empty());
/// ```
#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub flow: VerificationFlow,
    /// Present only while the home screen is mounted.
    pub home: Option<HomeScreen>,
    pub session: Option<Session>,
    /// Shown in front of the phone field.
    pub dial_code: String,
    pub notifications: Notifications,
    pub help_visible: bool,
    pub should_quit: bool,
}

impl App {
    /// Builds the initial state. A stored session skips registration.
    pub fn new(policy: FlowPolicy, session: Option<Session>) -> (Self, Vec<Command>) {
        let mut app = Self {
            screen: Screen::Register,
            flow: VerificationFlow::new(policy),
            home: None,
            session,
            dial_code: "+91".to_string(),
            notifications: Notifications::default(),
            help_visible: false,
            should_quit: false,
        };

        let effects = if app.session.is_some() {
            app.apply(vec![Command::Navigate(Screen::Home)])
        } else {
            Vec::new()
        };
        (app, effects)
    }

    /// Runs the commands that only change in-memory state and returns the
    /// rest, in order, for the runtime.
    pub fn apply(&mut self, commands: Vec<Command>) -> Vec<Command> {
        let mut effects = Vec::new();
        for command in commands {
            match command {
                Command::Navigate(screen) => effects.extend(self.navigate(screen)),
                Command::Notify(notification) => self.notify(notification),
                Command::PersistSession(session) => {
                    self.session = Some(session.clone());
                    effects.push(Command::PersistSession(session));
                }
                Command::ClearSession => {
                    self.session = None;
                    effects.push(Command::ClearSession);
                }
                other => effects.push(other),
            }
        }
        effects
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification, Instant::now());
    }

    fn navigate(&mut self, screen: Screen) -> Vec<Command> {
        if self.screen == screen && (screen == Screen::Register || self.home.is_some()) {
            return Vec::new();
        }
        info!(from = ?self.screen, to = ?screen, "navigate");
        self.screen = screen;

        match screen {
            Screen::Register => {
                self.home = None;
                Vec::new()
            }
            Screen::Home => {
                let token = self
                    .session
                    .as_ref()
                    .and_then(Session::bearer)
                    .map(str::to_string);
                let (home, commands) = HomeScreen::mount(token);
                self.home = Some(home);
                commands
            }
        }
    }

    /// Applies the result of a finished request.
    pub fn on_outcome(&mut self, outcome: Outcome) -> Vec<Command> {
        let commands = match outcome {
            Outcome::Registered(result) => self.flow.on_register(result),
            Outcome::Verified(result) => self.flow.on_verify(result),
            Outcome::Resent(result) => self.flow.on_resend(result),
            Outcome::Restaurants(result) => {
                // the home screen may have been left while the fetch ran
                if let Some(home) = self.home.as_mut() {
                    home.on_restaurants(result);
                }
                Vec::new()
            }
        };
        self.apply(commands)
    }

    /// Drops the session and returns to registration.
    pub fn logout(&mut self) -> Vec<Command> {
        info!("logging out");
        self.flow.reset();
        self.apply(vec![Command::ClearSession, Command::Navigate(Screen::Register)])
    }

    pub fn refresh_home(&mut self) -> Vec<Command> {
        let commands = self
            .home
            .as_mut()
            .map(HomeScreen::refresh)
            .unwrap_or_default();
        self.apply(commands)
    }

    /// Advances the banner. Driven by the runtime's autoplay timer.
    pub fn banner_tick(&mut self) {
        if let Some(home) = self.home.as_mut() {
            home.banner.tick();
        }
    }

    /// Whether the runtime should keep a banner timer alive.
    pub fn banner_active(&self) -> bool {
        self.home
            .as_ref()
            .is_some_and(|home| home.banner.should_autoplay())
    }

    pub fn expire_notifications(&mut self, now: Instant) {
        self.notifications.expire(now);
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::home::LoadState;
    use crate::application::verification::Step;
    use crate::domain::PhoneNumber;
    use crate::infrastructure::api::ApiReply;
    use serde_json::json;

    fn session(token: &str) -> Session {
        Session {
            token: token.to_string(),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            user_payload: json!({}),
        }
    }

    #[test]
    fn test_starts_on_register_without_session() {
        let (app, effects) = App::new(FlowPolicy::default(), None);
        assert_eq!(app.screen, Screen::Register);
        assert!(app.home.is_none());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_stored_session_opens_home() {
        let (app, effects) = App::new(FlowPolicy::default(), Some(session("tok")));
        assert_eq!(app.screen, Screen::Home);
        assert!(app.home.is_some());
        assert_eq!(
            effects,
            vec![Command::FetchRestaurants {
                token: Some("tok".to_string())
            }]
        );
    }

    #[test]
    fn test_empty_token_fetches_without_bearer() {
        let (_, effects) = App::new(FlowPolicy::default(), Some(session("")));
        assert_eq!(effects, vec![Command::FetchRestaurants { token: None }]);
    }

    #[test]
    fn test_full_registration_flow() {
        let (mut app, _) = App::new(FlowPolicy::default(), None);
        for c in "9876543210".chars() {
            app.flow.input_phone_char(c);
        }
        let commands = app.flow.submit_phone();
        let effects = app.apply(commands);
        assert!(matches!(effects.as_slice(), [Command::Register { .. }]));

        let effects = app.on_outcome(Outcome::Registered(Ok(ApiReply::from_body(
            json!({"status": true}),
        ))));
        assert!(effects.is_empty());
        assert_eq!(app.flow.step, Step::EnteringOtp);
        assert_eq!(app.notifications.iter().count(), 1);

        for c in "123456".chars() {
            app.flow.input_otp_digit(c);
        }
        let commands = app.flow.submit_otp();
        let effects = app.apply(commands);
        assert!(matches!(effects.as_slice(), [Command::Verify { .. }]));

        let effects = app.on_outcome(Outcome::Verified(Ok(ApiReply::from_body(
            json!({"status": true, "data": {"token": "tok"}}),
        ))));
        assert_eq!(app.screen, Screen::Home);
        assert_eq!(app.session.as_ref().map(|s| s.token.as_str()), Some("tok"));
        assert!(matches!(effects[0], Command::PersistSession(_)));
        assert_eq!(
            effects[1],
            Command::FetchRestaurants {
                token: Some("tok".to_string())
            }
        );
    }

    #[test]
    fn test_verify_without_token_stays_signed_out() {
        let (mut app, _) = App::new(FlowPolicy::default(), None);
        app.flow.phone = Some(PhoneNumber::parse("9876543210").unwrap());
        app.flow.step = Step::EnteringOtp;
        for c in "123456".chars() {
            app.flow.input_otp_digit(c);
        }
        let commands = app.flow.submit_otp();
        app.apply(commands);

        let effects = app.on_outcome(Outcome::Verified(Ok(ApiReply::from_body(
            json!({"status": true}),
        ))));
        assert!(effects.is_empty());
        assert_eq!(app.screen, Screen::Register);
        assert!(app.session.is_none());
        assert!(app.home.is_none());
    }

    #[test]
    fn test_restaurants_outcome_after_logout_is_dropped() {
        let (mut app, _) = App::new(FlowPolicy::default(), Some(session("tok")));
        let effects = app.logout();
        assert_eq!(effects, vec![Command::ClearSession]);
        assert_eq!(app.screen, Screen::Register);
        assert!(app.session.is_none());

        let effects = app.on_outcome(Outcome::Restaurants(Ok(vec![json!({})])));
        assert!(effects.is_empty());
        assert!(app.home.is_none());
    }

    #[test]
    fn test_restaurants_outcome_updates_home() {
        let (mut app, _) = App::new(FlowPolicy::default(), Some(session("tok")));
        app.on_outcome(Outcome::Restaurants(Ok(vec![json!({"name": "Sagar"})])));
        let home = app.home.as_ref().unwrap();
        assert_eq!(home.load, LoadState::Loaded);
        assert_eq!(home.listings[0].name, "Sagar");
    }

    #[test]
    fn test_banner_ticks_only_on_home() {
        let (mut app, _) = App::new(FlowPolicy::default(), None);
        assert!(!app.banner_active());
        app.banner_tick();

        let (mut app, _) = App::new(FlowPolicy::default(), Some(session("tok")));
        assert!(app.banner_active());
        app.banner_tick();
        assert_eq!(app.home.as_ref().unwrap().banner.index(), 1);
    }

    #[test]
    fn test_logout_resets_flow() {
        let (mut app, _) = App::new(FlowPolicy::default(), Some(session("tok")));
        app.flow.input_phone_char('9');
        app.logout();
        assert_eq!(app.flow.phone_input.value(), "");
        assert_eq!(app.flow.phone, None);
    }
}
