//! Request-facing modules for the marketing site backend.
//!
//! `careers` serves the public vacancy surface and the admin stats
//! dashboard; `leads` captures marketing contacts from the public
//! forms. `auth` and `throttle` are the middleware collaborators both
//! routers mount.

pub mod auth;
pub mod careers;
pub mod db;
pub mod leads;
pub(crate) mod patterns;
pub mod throttle;
