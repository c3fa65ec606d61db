//! # MCC User Interface (mcc-ui)
//!
//! Thin admin console for a remote media player:
//! - [`session`]: Session Gate (credentials in, persisted token out)
//! - [`dashboard`]: Realtime Control Client (media list, push-channel status, transport commands)
//! - [`render`]: text rendering of the dashboard state
//! - [`console`]: operator command parsing for the interactive binary
//!
//! External services are reached through the traits in [`api`] and
//! [`channel`], so every component can be driven by in-process fakes.

pub mod api;
pub mod channel;
pub mod console;
pub mod dashboard;
pub mod render;
pub mod session;

pub use api::{AuthApi, HttpApi, MediaLibrary};
pub use channel::{Connector, PushChannel, WsConnector};
pub use dashboard::{ConnectionState, Dashboard, DashboardHandle, DashboardState, Notice, NoticeKind};
pub use session::{Credentials, FileTokenStore, LoginError, MemoryTokenStore, Redirect, SessionGate, TokenStore};
