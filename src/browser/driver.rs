//! The narrow interface consumed from a live browser session
//!
//! Everything above this module talks to the browser only through [`SessionAdapter`]
//! and [`ElementHandle`]. The headless_chrome binding in [`crate::browser::session`]
//! is one implementation; tests use an in-memory one.

use crate::error::DriverResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;

/// Lookup criterion understood by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    XPath,
    Css,
    Id,
    Name,
    ClassName,
    TagName,
    LinkText,
}

impl By {
    /// The WebDriver name of this criterion
    pub fn as_str(&self) -> &'static str {
        match self {
            By::XPath => "xpath",
            By::Css => "css selector",
            By::Id => "id",
            By::Name => "name",
            By::ClassName => "class name",
            By::TagName => "tag name",
            By::LinkText => "link text",
        }
    }
}

/// Whether the value can be looked up [`By::TagName`]: a single element name or `*`
pub fn is_tag_name(value: &str) -> bool {
    if value == "*" {
        return true;
    }
    value.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque reference to one matched DOM node
pub trait ElementHandle: Clone {
    /// Driver-assigned identity; two handles with equal ids are the same node
    type Id: Eq + Hash + Clone + Debug;

    fn identity(&self) -> Self::Id;

    /// Lower-case tag name (`input`, `select`, ...)
    fn tag_name(&self) -> DriverResult<String>;

    fn text(&self) -> DriverResult<String>;

    fn inner_html(&self) -> DriverResult<String>;

    fn attribute(&self, name: &str) -> DriverResult<Option<String>>;

    fn is_selected(&self) -> DriverResult<bool>;

    fn is_enabled(&self) -> DriverResult<bool>;

    /// Values of the selected options of a `<select>`
    fn selected_values(&self) -> DriverResult<Vec<String>>;

    fn click(&self) -> DriverResult<()>;

    fn set_value(&self, text: &str) -> DriverResult<()>;

    fn clear(&self) -> DriverResult<()>;

    /// Fails when no option carries the given visible label
    fn select_option_by_label(&self, label: &str) -> DriverResult<()>;
}

/// A live browser session/document that element lookups run against
pub trait SessionAdapter {
    type Element<'a>: ElementHandle
    where
        Self: 'a;

    fn navigate(&self, uri: &str) -> DriverResult<()>;

    fn current_url(&self) -> DriverResult<String>;

    /// Three-digit HTTP status of the given URI, as text
    fn status_of(&self, uri: &str) -> DriverResult<String>;

    /// Find all elements matching `value` under the given criterion.
    ///
    /// Returns an empty list when nothing matches and a [`DriverError`](crate::DriverError)
    /// when the criterion/value pair is rejected.
    fn find_elements(&self, by: By, value: &str) -> DriverResult<Vec<Self::Element<'_>>>;
}

/// A session that never exists, used as the session type of detached collections
/// built from raw markup
#[derive(Debug)]
pub enum Detached {}

/// Element type of [`Detached`]; it has no values
#[derive(Debug, Clone)]
pub enum NoElement {}

impl ElementHandle for NoElement {
    type Id = ();

    fn identity(&self) -> Self::Id {
        match *self {}
    }

    fn tag_name(&self) -> DriverResult<String> {
        match *self {}
    }

    fn text(&self) -> DriverResult<String> {
        match *self {}
    }

    fn inner_html(&self) -> DriverResult<String> {
        match *self {}
    }

    fn attribute(&self, _name: &str) -> DriverResult<Option<String>> {
        match *self {}
    }

    fn is_selected(&self) -> DriverResult<bool> {
        match *self {}
    }

    fn is_enabled(&self) -> DriverResult<bool> {
        match *self {}
    }

    fn selected_values(&self) -> DriverResult<Vec<String>> {
        match *self {}
    }

    fn click(&self) -> DriverResult<()> {
        match *self {}
    }

    fn set_value(&self, _text: &str) -> DriverResult<()> {
        match *self {}
    }

    fn clear(&self) -> DriverResult<()> {
        match *self {}
    }

    fn select_option_by_label(&self, _label: &str) -> DriverResult<()> {
        match *self {}
    }
}

impl SessionAdapter for Detached {
    type Element<'a> = NoElement;

    fn navigate(&self, _uri: &str) -> DriverResult<()> {
        match *self {}
    }

    fn current_url(&self) -> DriverResult<String> {
        match *self {}
    }

    fn status_of(&self, _uri: &str) -> DriverResult<String> {
        match *self {}
    }

    fn find_elements(&self, _by: By, _value: &str) -> DriverResult<Vec<NoElement>> {
        match *self {}
    }
}
