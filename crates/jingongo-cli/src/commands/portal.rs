//! `jingongo login-url` and `jingongo signup-url` command implementations

use jingongo::{login_url, signup_url};

/// Print the portal sign-in page
pub fn login(portal_url: Option<&str>) {
    println!("{}", login_url(portal_url));
}

/// Print the portal sign-up page
pub fn signup(portal_url: Option<&str>) {
    println!("{}", signup_url(portal_url));
}
