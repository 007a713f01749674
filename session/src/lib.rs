//! # Load Forecasting Session
//!
//! The session store: the only shared mutable state of the client.
//!
//! ```text
//! Anonymous ──login/register/restore ok──▶ Authenticated
//!     ▲                                         │
//!     └──────────── logout / expire ────────────┘
//! ```
//!
//! The state machine is a reducer run by a [`Store`](loadforecast_runtime::Store),
//! so transitions are serialized under its write lock. [`SessionStore`] wraps
//! it in plain async calls.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;
pub mod store;

// Re-export main types for convenience
pub use actions::SessionAction;
pub use environment::SessionEnvironment;
pub use reducer::SessionReducer;
pub use state::{PendingSignIn, Session, SessionState, SignIn};
pub use store::{SessionRuntime, SessionStore};
