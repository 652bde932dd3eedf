//! # browser-assert
//!
//! A fluent page-assertion and element-resolution layer for browser tests, driving
//! Chrome over the Chrome DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Test session façade**: visit pages, assert on their content, and interact with
//!   links, buttons, and form fields through chainable methods
//! - **Forgiving element lookup**: a bare name tries id, name, class, and tag in turn;
//!   links and buttons are found by their text first
//! - **Assertion predicates**: reusable constraints with readable failure messages
//! - **Check plans**: JSON step lists run by the `page-check` binary
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use browser_assert::{BrowserSession, LaunchOptions, SessionConfig, TestSession};
//!
//! # fn main() -> browser_assert::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let mut page = TestSession::new(session, SessionConfig::new("http://localhost:8000"));
//!
//! page.visit("/login")?
//!     .see("Login")?
//!     .type_text("taylor@laravel.com", "email")?
//!     .check("remember")?
//!     .press("Sign in")?
//!     .see_page_is("/home")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Querying the document directly
//!
//! ```rust,no_run
//! # use browser_assert::{BrowserSession, LaunchOptions, SessionConfig, TestSession};
//! # fn main() -> browser_assert::Result<()> {
//! # let session = BrowserSession::launch(LaunchOptions::default())?;
//! # let mut page = TestSession::new(session, SessionConfig::new("http://localhost:8000"));
//! # page.visit("/")?;
//! let crawler = page.crawler()?;
//! let menu = crawler.filter("#menu a, .menu-item");
//! println!("Found {} menu entries", menu.count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: the session adapter traits, the Chrome binding, and configuration
//! - [`dom`]: selector classification, resolution strategies, and element collections
//! - [`constraints`]: assertion predicates
//! - [`page`]: the [`TestSession`] façade
//! - [`plan`]: JSON check plans
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod constraints;
pub mod dom;
pub mod error;
pub mod page;
pub mod plan;
pub mod utils;

pub use browser::{By, BrowserSession, ConnectionOptions, ElementHandle, LaunchOptions, SessionAdapter, SessionConfig};
pub use constraints::{Negated, PageConstraint};
pub use dom::{ElementCollection, SelectorExpression};
pub use error::{AssertionFailure, BrowserError, DriverError, Result};
pub use page::{PageState, TestSession};
pub use plan::{Plan, PlanReport, Step};
