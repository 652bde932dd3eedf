//! Lookup strategies and the ordered fallback chains built from them
//!
//! A [`Chain`] tries its strategies in order and stops at the first one that finds
//! anything. Finders that need several independent chains (form fields, one per id
//! and name lookup of each tag) union the results of each chain.
//!
//! A strategy the session rejects is logged and counts as "no matches", so a
//! malformed generated selector only shows up once every fallback has been tried.

use crate::{browser::{By, SessionAdapter},
            dom::selector::{classify, strip_css_prefix, QualifiedTag, SelectorKind},
            error::DriverError};
use std::fmt;

/// One lookup against the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub by: By,
    pub value: String,
}

impl Strategy {
    pub fn new(by: By, value: impl Into<String>) -> Self {
        Self {
            by,
            value: value.into(),
        }
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(By::XPath, value)
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::new(By::Css, value)
    }

    pub fn run<'s, S: SessionAdapter>(&self, session: &'s S) -> Result<Vec<S::Element<'s>>, LookupIssue> {
        session.find_elements(self.by, &self.value).map_err(|error| LookupIssue {
            strategy: self.clone(),
            error,
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.by, self.value)
    }
}

/// A strategy the session refused to run
#[derive(Debug, Clone)]
pub struct LookupIssue {
    pub strategy: Strategy,
    pub error: DriverError,
}

/// Strategies tried in order until one yields at least one element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chain {
    strategies: Vec<Strategy>,
}

impl Chain {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn resolve<'s, S: SessionAdapter>(&self, session: &'s S) -> Vec<S::Element<'s>> {
        for strategy in &self.strategies {
            match strategy.run(session) {
                Ok(found) if !found.is_empty() => {
                    log::debug!("{} matched {} element(s)", strategy, found.len());
                    return found;
                }
                Ok(_) => {}
                Err(issue) => {
                    log::debug!("Treating {} as no matches: {}", issue.strategy, issue.error);
                }
            }
        }

        Vec::new()
    }
}

/// The kinds of element a finder is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    TextField,
    Selection,
    Checkbox,
    Select,
    Link,
    Button,
    Any,
}

impl FieldKind {
    /// Comma-separated tag list, as named in lookup failure messages
    pub fn valid_elements(&self) -> &'static str {
        match self {
            FieldKind::TextField => "input,textarea",
            FieldKind::Selection => "select,input[type='radio']",
            FieldKind::Checkbox => "input[type='checkbox']",
            FieldKind::Select => "select",
            FieldKind::Link => "a",
            FieldKind::Button => "button",
            FieldKind::Any => "*",
        }
    }

    pub fn tags(&self) -> Vec<QualifiedTag> {
        QualifiedTag::parse_list(self.valid_elements())
    }
}

/// Bare tokens fall back id, name, class, tag; CSS and XPath are used verbatim
pub fn selector_chain(atom: &str) -> Chain {
    let atom = atom.trim();

    match classify(atom) {
        SelectorKind::XPath => Chain::new(vec![Strategy::xpath(atom)]),
        SelectorKind::Css => Chain::new(vec![Strategy::css(atom)]),
        SelectorKind::Bare => {
            let token = strip_css_prefix(atom);
            Chain::new(vec![
                Strategy::new(By::Id, token),
                Strategy::new(By::Name, token),
                Strategy::new(By::ClassName, token),
                Strategy::new(By::TagName, token),
            ])
        }
    }
}

/// Exact link text, then an `<a>` with a matching id
pub fn link_chain(text: &str) -> Chain {
    Chain::new(vec![
        Strategy::new(By::LinkText, text),
        Strategy::xpath(format!("//a[@id='{}']", strip_css_prefix(text))),
    ])
}

/// A `<button>` containing the text, then by id, then by name
pub fn button_chain(text: &str) -> Chain {
    let token = strip_css_prefix(text);
    Chain::new(vec![
        Strategy::xpath(format!("//button[contains(text(),'{}')]", text)),
        Strategy::xpath(format!("//button[@id='{}']", token)),
        Strategy::xpath(format!("//button[@name='{}']", token)),
    ])
}

/// Any element containing the text, then any element with the id
pub fn clickable_chain(text: &str) -> Chain {
    Chain::new(vec![
        Strategy::xpath(format!("//*[contains(text(),'{}')]", text)),
        Strategy::xpath(format!("//*[@id='{}']", strip_css_prefix(text))),
    ])
}

/// `tag#token` and `//tag[@name='token']` for every tag of the field kind, each its
/// own chain so the matches of all of them are unioned
pub fn field_chains(valid_elements: &str, selector: &str) -> Vec<Chain> {
    let token = strip_css_prefix(selector);

    QualifiedTag::parse_list(valid_elements)
        .iter()
        .flat_map(|tag| {
            [
                Chain::new(vec![Strategy::css(tag.css_with_id(token))]),
                Chain::new(vec![Strategy::xpath(tag.xpath_with_name(token))]),
            ]
        })
        .collect()
}

/// `//tag[@attribute='name']` for every tag and attribute, first hit wins
pub fn attribute_chain(name: &str, attributes: &[&str], tags: &[&str]) -> Chain {
    let token = strip_css_prefix(name);
    let tags: &[&str] = if tags.is_empty() { &["*"] } else { tags };

    Chain::new(
        tags.iter()
            .flat_map(|tag| {
                attributes
                    .iter()
                    .map(move |attribute| Strategy::xpath(format!("//{}[@{}='{}']", tag, attribute, token)))
            })
            .collect(),
    )
}

/// `//tag[contains(text(),'text')]` for every tag, first hit wins
pub fn text_chain(text: &str, tags: &[&str]) -> Chain {
    let tags: &[&str] = if tags.is_empty() { &["*"] } else { tags };

    Chain::new(
        tags.iter()
            .map(|tag| Strategy::xpath(format!("//{}[contains(text(),'{}')]", tag, text)))
            .collect(),
    )
}
