//! Search coordination for eztour: the location authorization controller,
//! the search session reducer and its async driver, and the favorites store.

pub mod driver;
pub mod favorites;
pub mod location;
pub mod session;

pub use driver::SearchDriver;
pub use favorites::FavoritesStore;
pub use location::{
    AuthorizationState, AuthorizationStatus, LocationAuthorizationController, LocationError,
    LocationPlatform,
};
pub use session::{FetchKind, FetchRequest, FetchTicket, SearchSession, SessionEvent, Transition};
