//! Decisions consumers act on: route-level navigation gating and in-page
//! conditional rendering. Both read the same [`AccessSnapshot`] type, so a
//! role requirement gets the same verdict from either side.
//!
//! [`AccessSnapshot`]: crate::services::authorization::AccessSnapshot

pub mod render;
pub mod route;

pub use render::{RenderGate, Requirement};
pub use route::{Decision, Navigation, RedirectTarget, RouteGuard, RouteTable};
