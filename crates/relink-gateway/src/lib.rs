//! HTTP gateway for the Relink dynamic link service.
//!
//! Exposes link creation, retargeting, lookups and the public redirect
//! endpoint over axum, and renders each link's redirect URL as a QR code.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod render;
pub mod state;
pub mod target;

pub use app::App;
pub use error::AppError;
pub use render::{CodeRenderer, RenderError, SvgQrRenderer};
pub use state::AppState;
pub use target::{RedirectTargets, RequestOrigin, TargetError};
