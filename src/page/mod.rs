//! The fluent test-authoring surface
//!
//! [`TestSession`] owns a [`SessionAdapter`] and exposes navigation, assertions, and
//! interactions as chainable methods. Every method returns `Result<&mut Self>`, so a
//! test reads as a sequence of `?`-terminated steps:
//!
//! ```rust,ignore
//! use browser_assert::{BrowserSession, SessionConfig, TestSession};
//!
//! let session = BrowserSession::new()?;
//! let mut page = TestSession::new(session, SessionConfig::new("http://localhost:8000"));
//!
//! page.visit("/login")?
//!     .type_text("taylor@laravel.com", "email")?
//!     .press("Sign in")?
//!     .see_page_is("/home")?
//!     .see("Welcome back")?;
//! ```

use crate::{browser::{ElementHandle, SessionAdapter, SessionConfig},
            constraints::{HasButton, HasElement, HasInElement, HasLink, HasSource, HasText, HasValue, IsChecked,
                          IsDisabled, IsSelected, Negated, PageConstraint},
            dom::{ElementCollection, FieldKind},
            error::{AssertionFailure, BrowserError, Result},
            utils::{full_url, has_scheme, strip_trailing_slash}};
use indexmap::IndexMap;

/// Where the session is in its page lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// Nothing visited yet; page operations fail
    Unvisited,

    /// A page was visited and passed the load check
    Loaded { uri: String },
}

pub struct TestSession<S: SessionAdapter> {
    session: S,
    config: SessionConfig,
    state: PageState,
}

impl<S: SessionAdapter> TestSession<S> {
    pub fn new(session: S, config: SessionConfig) -> Self {
        Self {
            session,
            config,
            state: PageState::Unvisited,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn into_inner(self) -> S {
        self.session
    }

    fn current_uri(&self) -> Result<&str> {
        match &self.state {
            PageState::Unvisited => Err(BrowserError::InvalidInput(
                "No page has been visited yet; call visit() first".to_string(),
            )),
            PageState::Loaded { uri } => Ok(uri.as_str()),
        }
    }

    /// A fresh collection over the current document
    pub fn crawler(&self) -> Result<ElementCollection<'_, S>> {
        let uri = self.current_uri()?;
        Ok(ElementCollection::root(&self.session).with_uri(uri))
    }

    fn with_page<'s, T>(&'s self, f: impl FnOnce(&ElementCollection<'s, S>) -> Result<T>) -> Result<T> {
        let page = self.crawler()?;
        f(&page)
    }

    /// Navigate to the URI (joined to the base URL) and check that it loaded
    pub fn visit(&mut self, uri: &str) -> Result<&mut Self> {
        let url = full_url(&self.config.base_url, uri);
        log::info!("Visiting {}", url);

        self.session
            .navigate(&url)
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;

        self.assert_page_loaded(uri, &url)?;

        self.state = PageState::Loaded { uri: url };
        Ok(self)
    }

    fn assert_page_loaded(&self, uri: &str, url: &str) -> Result<()> {
        // Only HTTP(S) pages have a status to probe
        if has_scheme(url) && !(url.starts_with("http://") || url.starts_with("https://")) {
            log::debug!("Skipping the status check of {}", url);
            return Ok(());
        }

        let status = self.session.status_of(url).map_err(|e| BrowserError::PageLoadFailed {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        if !self.config.accepts(&status) {
            return Err(BrowserError::Http {
                uri: uri.to_string(),
                status,
            });
        }

        log::debug!("{} loaded with status {}", url, status);
        Ok(())
    }

    /// Pick up the URL the browser is on after an interaction that may navigate
    fn refresh_uri(&mut self) {
        match self.session.current_url() {
            Ok(url) => self.state = PageState::Loaded { uri: url },
            Err(e) => log::debug!("Keeping the previous page URI: {}", e),
        }
    }

    /// The browser is on the URI (joined to the base URL), ignoring trailing slashes
    pub fn see_page_is(&mut self, uri: &str) -> Result<&mut Self> {
        self.current_uri()?;

        let expected = full_url(&self.config.base_url, uri);
        let current = self.session.current_url()?;

        if strip_trailing_slash(&expected) != strip_trailing_slash(&current) {
            return Err(AssertionFailure::new(format!("the current URL [{}] is [{}]", current, expected))
                .with_detail(format!("Did not land on expected page [{}].", uri))
                .into());
        }

        Ok(self)
    }

    /// Evaluate a constraint against the current page, inverted when `negate` is set
    pub fn assert_in_page<C: PageConstraint>(&mut self, constraint: C, negate: bool) -> Result<&mut Self> {
        self.with_page(|page| {
            if negate {
                Negated::new(constraint).evaluate(page)
            } else {
                constraint.evaluate(page)
            }
        })?;
        Ok(self)
    }

    /// The page source contains the text, raw or HTML-escaped
    pub fn see(&mut self, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasSource::new(text), false)
    }

    pub fn dont_see(&mut self, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasSource::new(text), true)
    }

    /// The rendered text of the page contains the text
    pub fn see_text(&mut self, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasText::new(text), false)
    }

    pub fn dont_see_text(&mut self, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasText::new(text), true)
    }

    pub fn see_element(&mut self, selector: &str) -> Result<&mut Self> {
        self.assert_in_page(HasElement::new(selector), false)
    }

    pub fn dont_see_element(&mut self, selector: &str) -> Result<&mut Self> {
        self.assert_in_page(HasElement::new(selector), true)
    }

    /// Elements matching the selector carry the attributes; with a count, exactly that many do
    pub fn see_element_matching(
        &mut self,
        selector: &str,
        attributes: IndexMap<String, String>,
        count: Option<usize>,
    ) -> Result<&mut Self> {
        self.assert_in_page(element_constraint(selector, attributes, count), false)
    }

    /// Negation of [`see_element_matching`](Self::see_element_matching); with a count,
    /// passes when the number of matching elements differs from it
    pub fn dont_see_element_matching(
        &mut self,
        selector: &str,
        attributes: IndexMap<String, String>,
        count: Option<usize>,
    ) -> Result<&mut Self> {
        self.assert_in_page(element_constraint(selector, attributes, count), true)
    }

    pub fn see_in_element(&mut self, selector: &str, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasInElement::new(selector, text), false)
    }

    pub fn dont_see_in_element(&mut self, selector: &str, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasInElement::new(selector, text), true)
    }

    pub fn see_link(&mut self, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasLink::new(text), false)
    }

    pub fn dont_see_link(&mut self, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasLink::new(text), true)
    }

    /// A link with the text points at the URL, with or without scheme and trailing slash
    pub fn see_link_to(&mut self, text: &str, url: &str) -> Result<&mut Self> {
        self.assert_in_page(HasLink::new(text).url(url), false)
    }

    pub fn dont_see_link_to(&mut self, text: &str, url: &str) -> Result<&mut Self> {
        self.assert_in_page(HasLink::new(text).url(url), true)
    }

    pub fn see_button(&mut self, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasButton::new(text), false)
    }

    pub fn dont_see_button(&mut self, text: &str) -> Result<&mut Self> {
        self.assert_in_page(HasButton::new(text), true)
    }

    pub fn see_in_field(&mut self, selector: &str, value: &str) -> Result<&mut Self> {
        self.assert_in_page(HasValue::new(selector, value), false)
    }

    pub fn dont_see_in_field(&mut self, selector: &str, value: &str) -> Result<&mut Self> {
        self.assert_in_page(HasValue::new(selector, value), true)
    }

    pub fn see_is_selected(&mut self, selector: &str, value: &str) -> Result<&mut Self> {
        self.assert_in_page(IsSelected::new(selector, value), false)
    }

    pub fn dont_see_is_selected(&mut self, selector: &str, value: &str) -> Result<&mut Self> {
        self.assert_in_page(IsSelected::new(selector, value), true)
    }

    pub fn see_is_checked(&mut self, selector: &str) -> Result<&mut Self> {
        self.assert_in_page(IsChecked::new(selector), false)
    }

    pub fn dont_see_is_checked(&mut self, selector: &str) -> Result<&mut Self> {
        self.assert_in_page(IsChecked::new(selector), true)
    }

    pub fn see_is_disabled(&mut self, selector: &str) -> Result<&mut Self> {
        self.assert_in_page(IsDisabled::new(selector), false)
    }

    pub fn dont_see_is_disabled(&mut self, selector: &str) -> Result<&mut Self> {
        self.assert_in_page(IsDisabled::new(selector), true)
    }

    /// Click a link by its text, or an `<a>` by id or name
    pub fn click(&mut self, name: &str) -> Result<&mut Self> {
        self.with_page(|page| {
            let mut link = page.select_links(name);
            if link.is_empty() {
                link = page.select_field(FieldKind::Link.valid_elements(), name);
            }

            let target = link.first().ok_or_else(|| {
                BrowserError::InvalidArgument(format!(
                    "Could not find a link with the text, name, or ID attribute of [{}].",
                    name
                ))
            })?;
            Ok(target.click()?)
        })?;

        self.refresh_uri();
        Ok(self)
    }

    /// Click a button by its text, id, or name
    pub fn press(&mut self, name: &str) -> Result<&mut Self> {
        self.with_page(|page| {
            let mut button = page.select_buttons(name);
            if button.is_empty() {
                button = page.select_field(FieldKind::Button.valid_elements(), name);
            }

            let target = button.first().ok_or_else(|| {
                BrowserError::InvalidArgument(format!(
                    "Could not find a button with the text, name, or ID attribute of [{}].",
                    name
                ))
            })?;
            Ok(target.click()?)
        })?;

        self.refresh_uri();
        Ok(self)
    }

    /// Click any element containing the text, or with the id or name
    pub fn click_on_element(&mut self, name: &str) -> Result<&mut Self> {
        self.with_page(|page| {
            let mut element = page.select_clickable(name);
            if element.is_empty() {
                element = page.select_field(FieldKind::Any.valid_elements(), name);
            }

            let target = element.first().ok_or_else(|| {
                BrowserError::InvalidArgument(format!(
                    "Could not find an element with the text, name, or ID attribute of [{}].",
                    name
                ))
            })?;
            Ok(target.click()?)
        })?;

        self.refresh_uri();
        Ok(self)
    }

    /// Type into a text field found by name or id
    pub fn type_text(&mut self, text: &str, selector: &str) -> Result<&mut Self> {
        self.with_page(|page| {
            let field = page.select_field(FieldKind::TextField.valid_elements(), selector);
            Ok(text_field(&field, selector)?.set_value(text)?)
        })?;
        Ok(self)
    }

    pub fn clear(&mut self, selector: &str) -> Result<&mut Self> {
        self.with_page(|page| {
            let field = page.select_field(FieldKind::TextField.valid_elements(), selector);
            Ok(text_field(&field, selector)?.clear()?)
        })?;
        Ok(self)
    }

    /// Check a checkbox; fails if it is already checked
    pub fn check(&mut self, selector: &str) -> Result<&mut Self> {
        self.set_checked(selector, false)
    }

    /// Uncheck a checkbox; fails if it is already unchecked
    pub fn uncheck(&mut self, selector: &str) -> Result<&mut Self> {
        self.set_checked(selector, true)
    }

    fn set_checked(&mut self, selector: &str, negate: bool) -> Result<&mut Self> {
        self.with_page(|page| {
            let field = page.select_field(FieldKind::Checkbox.valid_elements(), selector);
            let checkbox = field.first().ok_or_else(|| {
                BrowserError::InvalidArgument(format!(
                    "Could not find any checkbox elements with a name or ID attribute of [{}].",
                    selector
                ))
            })?;

            if checkbox.is_selected()? != negate {
                return Err(BrowserError::InvalidArgument(format!(
                    "Checkbox element [{}] is already {}.",
                    selector,
                    if negate { "unchecked" } else { "checked" }
                )));
            }

            Ok(checkbox.click()?)
        })?;
        Ok(self)
    }

    /// Select the option with the visible label in a drop-down found by name or id
    pub fn select(&mut self, label: &str, selector: &str) -> Result<&mut Self> {
        self.with_page(|page| {
            let field = page.select_field(FieldKind::Select.valid_elements(), selector);
            let select = field.first().ok_or_else(|| {
                BrowserError::InvalidArgument(format!(
                    "Could not find any select elements with a name or ID attribute of [{}].",
                    selector
                ))
            })?;

            select.select_option_by_label(label).map_err(|e| {
                log::debug!("Selecting [{}] in [{}] failed: {}", label, selector, e);
                BrowserError::InvalidArgument(format!(
                    "The option labelled [{}] is not present on the drop down list.",
                    label
                ))
            })
        })?;
        Ok(self)
    }
}

fn element_constraint(selector: &str, attributes: IndexMap<String, String>, count: Option<usize>) -> HasElement {
    let constraint = HasElement::new(selector).attributes(attributes);
    match count {
        Some(count) => constraint.count(count),
        None => constraint,
    }
}

fn text_field<'c, 's, S: SessionAdapter + 's>(
    field: &'c ElementCollection<'s, S>,
    selector: &str,
) -> Result<&'c crate::dom::Handle<'s, S>> {
    field.first().ok_or_else(|| {
        BrowserError::InvalidArgument(format!(
            "Could not find any text field elements with a name or ID attribute of [{}].",
            selector
        ))
    })
}
