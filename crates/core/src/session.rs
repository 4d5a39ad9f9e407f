//! Authenticated session context
//!
//! A [`SessionContext`] is an explicitly passed handle holding the current
//! user. Components that need the user's identity receive a clone of the
//! handle instead of reaching for ambient global state. Interested parties
//! subscribe to [`AuthEvent`]s and unsubscribe with the returned id.
//!
//! The login time is captured once at sign-in and kept on the session, so it
//! stays stable for the lifetime of the session.

use crate::core_types::UserId;
use chrono::{DateTime, Local, Timelike, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Backend user id
    pub user_id: UserId,
    /// Profile display name
    pub full_name: String,
    /// When the user signed in
    pub login_time: DateTime<Utc>,
}

impl UserSession {
    /// Session starting now
    pub fn new(user_id: UserId, full_name: impl Into<String>) -> Self {
        Self::with_login_time(user_id, full_name, Utc::now())
    }

    /// Session with an explicit login time
    pub fn with_login_time(
        user_id: UserId,
        full_name: impl Into<String>,
        login_time: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            full_name: full_name.into(),
            login_time,
        }
    }
}

/// Authentication state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A user signed in
    SignedIn(UserSession),
    /// The current user signed out
    SignedOut,
}

/// Handle returned by [`SessionContext::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

#[derive(Default)]
struct SessionState {
    current: Option<UserSession>,
    listeners: FxHashMap<SubscriptionId, Listener>,
    next_subscription: u64,
}

/// Shared session handle; clones observe the same session
#[derive(Clone, Default)]
pub struct SessionContext {
    state: Arc<RwLock<SessionState>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (current, listeners) = match self.state.read() {
            Ok(state) => (state.current.clone(), state.listeners.len()),
            Err(_) => (None, 0),
        };
        f.debug_struct("SessionContext")
            .field("current", &current)
            .field("listeners", &listeners)
            .finish()
    }
}

impl SessionContext {
    /// Context with nobody signed in
    pub fn new() -> Self {
        Self::default()
    }

    /// Context already holding `session`
    pub fn signed_in(session: UserSession) -> Self {
        let ctx = Self::new();
        ctx.sign_in(session);
        ctx
    }

    /// Current session, if any
    pub fn current(&self) -> Option<UserSession> {
        self.state.read().ok().and_then(|s| s.current.clone())
    }

    /// Current user id, if any
    pub fn current_user(&self) -> Option<UserId> {
        self.current().map(|s| s.user_id)
    }

    /// Replace the current session and notify listeners.
    ///
    /// Signing in again as the same user keeps the original session (and its
    /// login time) and emits nothing.
    pub fn sign_in(&self, session: UserSession) {
        let listeners = {
            let Ok(mut state) = self.state.write() else {
                return;
            };
            if state
                .current
                .as_ref()
                .is_some_and(|c| c.user_id == session.user_id)
            {
                debug!("Sign-in for {} ignored, already signed in", session.user_id);
                return;
            }
            info!("User {} signed in", session.user_id);
            state.current = Some(session.clone());
            state.listeners.values().cloned().collect::<Vec<_>>()
        };
        Self::notify(&listeners, &AuthEvent::SignedIn(session));
    }

    /// Clear the current session and notify listeners (no-op when signed out)
    pub fn sign_out(&self) {
        let listeners = {
            let Ok(mut state) = self.state.write() else {
                return;
            };
            let Some(previous) = state.current.take() else {
                return;
            };
            info!("User {} signed out", previous.user_id);
            state.listeners.values().cloned().collect::<Vec<_>>()
        };
        Self::notify(&listeners, &AuthEvent::SignedOut);
    }

    /// Register a callback for auth events
    pub fn subscribe<F>(&self, listener: F) -> Option<SubscriptionId>
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        let mut state = self.state.write().ok()?;
        let id = SubscriptionId(state.next_subscription);
        state.next_subscription += 1;
        state.listeners.insert(id, Arc::new(listener));
        Some(id)
    }

    /// Remove a callback; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state
            .write()
            .is_ok_and(|mut state| state.listeners.remove(&id).is_some())
    }

    /// Number of registered callbacks
    pub fn listener_count(&self) -> usize {
        self.state.read().map_or(0, |s| s.listeners.len())
    }

    /// Time-of-day greeting, personalised when signed in
    pub fn greeting_at<T: Timelike>(&self, now: &T) -> String {
        let period = DayPeriod::from_hour(now.hour());
        match self.current() {
            Some(session) if !session.full_name.is_empty() => {
                format!("{}, {}!", period.greeting(), session.full_name)
            }
            _ => format!("{}!", period.greeting()),
        }
    }

    /// Greeting for the local wall-clock time
    pub fn greeting_now(&self) -> String {
        self.greeting_at(&Local::now())
    }

    // Listeners run outside the lock so they may call back into the context.
    fn notify(listeners: &[Listener], event: &AuthEvent) {
        for listener in listeners {
            listener(event);
        }
    }
}

/// Part of the day, used for greetings and the dashboard background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPeriod {
    /// 05:00-11:59
    Morning,
    /// 12:00-17:59
    Afternoon,
    /// 18:00-04:59
    Evening,
}

impl DayPeriod {
    /// Period for an hour of the day (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayPeriod::Morning,
            12..=17 => DayPeriod::Afternoon,
            _ => DayPeriod::Evening,
        }
    }

    /// Greeting phrase
    pub fn greeting(self) -> &'static str {
        match self {
            DayPeriod::Morning => "Good morning",
            DayPeriod::Afternoon => "Good afternoon",
            DayPeriod::Evening => "Good evening",
        }
    }

    /// Evening counts as night for theming
    pub fn is_night(self) -> bool {
        self == DayPeriod::Evening
    }
}
