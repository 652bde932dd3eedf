pub mod config;
pub mod driver;
pub mod session;

#[cfg(test)]
pub(crate) mod fake;

pub use config::{ConnectionOptions, LaunchOptions, SessionConfig};
pub use driver::{By, Detached, ElementHandle, NoElement, SessionAdapter};
pub use session::{BrowserSession, ChromeElement};
