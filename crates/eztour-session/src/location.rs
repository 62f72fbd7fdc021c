//! Location permission state machine and position publication.
//!
//! The platform delivers authorization notifications and batches of position
//! samples; the controller reacts to the former by asking for permission or
//! starting updates, and republishes the latest sample through a
//! `tokio::sync::watch` channel.

use eztour_core::Position;
use thiserror::Error;
use tokio::sync::watch;

/// Raw authorization status as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedAlways,
    AuthorizedWhenInUse,
    /// A value outside the known enumeration.
    Unsupported(i32),
}

impl AuthorizationStatus {
    /// Maps the platform's integer code.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => AuthorizationStatus::NotDetermined,
            1 => AuthorizationStatus::Restricted,
            2 => AuthorizationStatus::Denied,
            3 => AuthorizationStatus::AuthorizedAlways,
            4 => AuthorizationStatus::AuthorizedWhenInUse,
            other => AuthorizationStatus::Unsupported(other),
        }
    }
}

/// Controller state. `Denied` and `Restricted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationState {
    Undetermined,
    Authorized,
    Denied,
    Restricted,
}

impl AuthorizationState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, AuthorizationState::Denied | AuthorizationState::Restricted)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    /// The platform reported a status this controller does not understand.
    /// Hosts must shut down: the platform contract has changed.
    #[error("unsupported location authorization status: {0}")]
    UnsupportedAuthorization(i32),
}

/// The device permission subsystem.
pub trait LocationPlatform {
    /// Prompts the user for when-in-use permission.
    fn request_authorization(&self);

    /// Begins continuous delivery of position samples.
    fn start_updating_location(&self);
}

pub struct LocationAuthorizationController<P> {
    platform: P,
    state: Option<AuthorizationState>,
    updating: bool,
    positions: watch::Sender<Option<Position>>,
}

impl<P: LocationPlatform> LocationAuthorizationController<P> {
    #[must_use]
    pub fn new(platform: P) -> Self {
        let (positions, _) = watch::channel(None);
        Self {
            platform,
            state: None,
            updating: false,
            positions,
        }
    }

    /// `None` until the first notification arrives.
    #[must_use]
    pub fn state(&self) -> Option<AuthorizationState> {
        self.state
    }

    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// A receiver that always observes the most recent position.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Position>> {
        self.positions.subscribe()
    }

    #[must_use]
    pub fn latest_position(&self) -> Option<Position> {
        *self.positions.borrow()
    }

    /// Applies an authorization notification and returns the resulting state.
    ///
    /// Entering `Undetermined` requests permission; entering `Authorized`
    /// starts updates (at most once). Notifications that would leave a
    /// terminal state, or that describe a transition the machine does not
    /// define, are logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::UnsupportedAuthorization`] for a status
    /// outside the known enumeration. The state is left unchanged.
    pub fn handle_authorization_change(
        &mut self,
        status: AuthorizationStatus,
    ) -> Result<AuthorizationState, LocationError> {
        let target = match status {
            AuthorizationStatus::NotDetermined => AuthorizationState::Undetermined,
            AuthorizationStatus::Restricted => AuthorizationState::Restricted,
            AuthorizationStatus::Denied => AuthorizationState::Denied,
            AuthorizationStatus::AuthorizedAlways | AuthorizationStatus::AuthorizedWhenInUse => {
                AuthorizationState::Authorized
            }
            AuthorizationStatus::Unsupported(raw) => {
                tracing::error!(raw, "platform reported an unknown authorization status");
                return Err(LocationError::UnsupportedAuthorization(raw));
            }
        };

        let allowed = match self.state {
            None => true,
            Some(current) if current == target => false,
            Some(AuthorizationState::Undetermined) => true,
            Some(_) => false,
        };
        if !allowed {
            if self.state != Some(target) {
                tracing::info!(from = ?self.state, to = ?target, "ignoring authorization transition");
            }
            return Ok(self.state.unwrap_or(target));
        }

        self.state = Some(target);
        match target {
            AuthorizationState::Undetermined => {
                tracing::debug!("requesting location authorization");
                self.platform.request_authorization();
            }
            AuthorizationState::Authorized => {
                if !self.updating {
                    tracing::info!("location authorized; starting updates");
                    self.platform.start_updating_location();
                    self.updating = true;
                }
            }
            AuthorizationState::Denied | AuthorizationState::Restricted => {
                tracing::info!(state = ?target, "location access unavailable");
            }
        }
        Ok(target)
    }

    /// Publishes the last sample of a batch; earlier samples are dropped.
    pub fn handle_location_update(&self, samples: &[Position]) {
        if let Some(latest) = samples.last() {
            tracing::trace!(position = %latest, "position updated");
            self.positions.send_replace(Some(*latest));
        }
    }
}
