//! Shared UI crate for pixpoll. The survey logic and every view live here;
//! the `web` and `desktop` crates only launch it.

pub mod core;
pub mod i18n;
pub mod survey;
pub mod views;

pub mod components {
    // Localized application header (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::AppNavbar;
}
