//! Cookie-based authentication.
//!
//! A successful log in stores a signed, encrypted token in a private cookie.
//! The middleware in this module validates the token on protected routes and
//! extends its expiry on activity so that active users stay logged in.

mod cookie;
mod middleware;
mod redirect;
mod token;

pub use cookie::{
    DEFAULT_COOKIE_DURATION, get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
};
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use redirect::{build_log_in_redirect_url, normalize_redirect_url};
pub(crate) use token::Token;

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;
