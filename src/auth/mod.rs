//! User authentication: cookie handling, the log-in and log-out routes, and
//! the middleware that guards authenticated pages.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;

pub(crate) use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_EXPIRY, COOKIE_USER_ID};

#[cfg(test)]
pub(crate) use middleware::AuthState;
