//! Executes commands emitted by the application layer.
//!
//! Network requests run as spawned tasks on the current runtime and report
//! back through an unbounded channel; they are never cancelled. Session
//! persistence happens inline.

use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::application::{App, Command, Notification, Outcome};
use crate::infrastructure::api::FastorApi;
use crate::infrastructure::session_store::SessionStore;

pub struct Dispatcher {
    api: Arc<dyn FastorApi>,
    store: SessionStore,
    outcomes: UnboundedSender<Outcome>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn FastorApi>, store: SessionStore) -> (Self, UnboundedReceiver<Outcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        (
            Self {
                api,
                store,
                outcomes,
            },
            receiver,
        )
    }

    /// Lets the app handle what it can, then runs the remaining effects.
    ///
    /// Network requests are spawned on the current runtime, so this must be
    /// called from inside one. Commands that `app` already applied may be
    /// passed again; applying them twice has no further effect.
    ///
    /// # Arguments
    ///
    /// * `app` - State to update; also receives failures as notifications
    /// * `commands` - Output of an `App` or `VerificationFlow` operation
    pub fn dispatch(&self, app: &mut App, commands: Vec<Command>) {
        for effect in app.apply(commands) {
            self.execute(app, effect);
        }
    }

    fn execute(&self, app: &mut App, command: Command) {
        match command {
            Command::Register { phone } => {
                let api = Arc::clone(&self.api);
                self.spawn(async move { Outcome::Registered(api.register(&phone).await) });
            }
            Command::Verify {
                phone,
                otp,
                endpoint,
            } => {
                let api = Arc::clone(&self.api);
                self.spawn(async move { Outcome::Verified(api.verify(&phone, &otp, endpoint).await) });
            }
            Command::Resend { phone } => {
                let api = Arc::clone(&self.api);
                self.spawn(async move { Outcome::Resent(api.resend(&phone).await) });
            }
            Command::FetchRestaurants { token } => {
                let api = Arc::clone(&self.api);
                self.spawn(async move {
                    Outcome::Restaurants(api.restaurants(token.as_deref()).await)
                });
            }
            Command::PersistSession(session) => {
                if let Err(e) = self.store.save(&session) {
                    warn!(error = %e, "could not persist session");
                    app.notify(Notification::error(format!("Could not save session: {}", e)));
                }
            }
            Command::ClearSession => {
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "could not remove session");
                }
            }
            Command::Navigate(_) | Command::Notify(_) => {
                debug!(?command, "already handled by the app");
            }
        }
    }

    fn spawn<F>(&self, request: F)
    where
        F: std::future::Future<Output = Outcome> + Send + 'static,
    {
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let outcome = request.await;
            if outcomes.send(outcome).is_err() {
                debug!("outcome dropped, receiver closed");
            }
        });
    }
}
