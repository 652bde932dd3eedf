//! JSON check plans
//!
//! A plan is a list of façade steps that can be written without Rust:
//!
//! ```json
//! {
//!   "base_url": "http://localhost:8000",
//!   "steps": [
//!     { "action": "visit", "uri": "/login" },
//!     { "action": "type", "text": "taylor@laravel.com", "selector": "email" },
//!     { "action": "press", "name": "Sign in" },
//!     { "action": "see_text", "text": "Invalid credentials", "negate": true }
//!   ]
//! }
//! ```

use crate::{browser::{SessionAdapter, SessionConfig},
            error::{BrowserError, Result},
            page::TestSession};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};

/// One façade operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate to a URI relative to the base URL
    Visit { uri: String },

    /// The browser is on this URI
    SeePageIs { uri: String },

    /// The page source contains the text
    See {
        text: String,
        #[serde(default)]
        negate: bool,
    },

    /// The rendered page text contains the text
    SeeText {
        text: String,
        #[serde(default)]
        negate: bool,
    },

    /// Elements matching the selector exist, optionally with attributes and a count
    SeeElement {
        selector: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        attributes: IndexMap<String, String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<usize>,
        #[serde(default)]
        negate: bool,
    },

    /// An element matching the selector contains the text
    SeeInElement {
        selector: String,
        text: String,
        #[serde(default)]
        negate: bool,
    },

    /// A link with the text exists, pointing at the URL when given
    SeeLink {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default)]
        negate: bool,
    },

    SeeButton {
        text: String,
        #[serde(default)]
        negate: bool,
    },

    SeeInField {
        selector: String,
        value: String,
        #[serde(default)]
        negate: bool,
    },

    SeeIsSelected {
        selector: String,
        value: String,
        #[serde(default)]
        negate: bool,
    },

    SeeIsChecked {
        selector: String,
        #[serde(default)]
        negate: bool,
    },

    SeeIsDisabled {
        selector: String,
        #[serde(default)]
        negate: bool,
    },

    /// Click a link by text, id, or name
    Click { name: String },

    /// Click a button by text, id, or name
    Press { name: String },

    /// Click any element by text, id, or name
    ClickOnElement { name: String },

    /// Type into a text field
    Type { text: String, selector: String },

    Clear { selector: String },

    Check { selector: String },

    Uncheck { selector: String },

    /// Select a drop-down option by its visible label
    Select { label: String, selector: String },
}

impl Step {
    /// Apply this step to the session
    pub fn apply<S: SessionAdapter>(&self, page: &mut TestSession<S>) -> Result<()> {
        match self {
            Step::Visit { uri } => page.visit(uri)?,
            Step::SeePageIs { uri } => page.see_page_is(uri)?,
            Step::See { text, negate: false } => page.see(text)?,
            Step::See { text, negate: true } => page.dont_see(text)?,
            Step::SeeText { text, negate: false } => page.see_text(text)?,
            Step::SeeText { text, negate: true } => page.dont_see_text(text)?,
            Step::SeeElement {
                selector,
                attributes,
                count,
                negate,
            } => {
                if attributes.is_empty() && count.is_none() {
                    if *negate {
                        page.dont_see_element(selector)?
                    } else {
                        page.see_element(selector)?
                    }
                } else if *negate {
                    page.dont_see_element_matching(selector, attributes.clone(), *count)?
                } else {
                    page.see_element_matching(selector, attributes.clone(), *count)?
                }
            }
            Step::SeeInElement { selector, text, negate: false } => page.see_in_element(selector, text)?,
            Step::SeeInElement { selector, text, negate: true } => page.dont_see_in_element(selector, text)?,
            Step::SeeLink { text, url, negate } => match (url, negate) {
                (None, false) => page.see_link(text)?,
                (None, true) => page.dont_see_link(text)?,
                (Some(url), false) => page.see_link_to(text, url)?,
                (Some(url), true) => page.dont_see_link_to(text, url)?,
            },
            Step::SeeButton { text, negate: false } => page.see_button(text)?,
            Step::SeeButton { text, negate: true } => page.dont_see_button(text)?,
            Step::SeeInField { selector, value, negate: false } => page.see_in_field(selector, value)?,
            Step::SeeInField { selector, value, negate: true } => page.dont_see_in_field(selector, value)?,
            Step::SeeIsSelected { selector, value, negate: false } => page.see_is_selected(selector, value)?,
            Step::SeeIsSelected { selector, value, negate: true } => page.dont_see_is_selected(selector, value)?,
            Step::SeeIsChecked { selector, negate: false } => page.see_is_checked(selector)?,
            Step::SeeIsChecked { selector, negate: true } => page.dont_see_is_checked(selector)?,
            Step::SeeIsDisabled { selector, negate: false } => page.see_is_disabled(selector)?,
            Step::SeeIsDisabled { selector, negate: true } => page.dont_see_is_disabled(selector)?,
            Step::Click { name } => page.click(name)?,
            Step::Press { name } => page.press(name)?,
            Step::ClickOnElement { name } => page.click_on_element(name)?,
            Step::Type { text, selector } => page.type_text(text, selector)?,
            Step::Clear { selector } => page.clear(selector)?,
            Step::Check { selector } => page.check(selector)?,
            Step::Uncheck { selector } => page.uncheck(selector)?,
            Step::Select { label, selector } => page.select(label, selector)?,
        };
        Ok(())
    }

    /// The `action` tag of this step
    pub fn action(&self) -> &'static str {
        match self {
            Step::Visit { .. } => "visit",
            Step::SeePageIs { .. } => "see_page_is",
            Step::See { .. } => "see",
            Step::SeeText { .. } => "see_text",
            Step::SeeElement { .. } => "see_element",
            Step::SeeInElement { .. } => "see_in_element",
            Step::SeeLink { .. } => "see_link",
            Step::SeeButton { .. } => "see_button",
            Step::SeeInField { .. } => "see_in_field",
            Step::SeeIsSelected { .. } => "see_is_selected",
            Step::SeeIsChecked { .. } => "see_is_checked",
            Step::SeeIsDisabled { .. } => "see_is_disabled",
            Step::Click { .. } => "click",
            Step::Press { .. } => "press",
            Step::ClickOnElement { .. } => "click_on_element",
            Step::Type { .. } => "type",
            Step::Clear { .. } => "clear",
            Step::Check { .. } => "check",
            Step::Uncheck { .. } => "uncheck",
            Step::Select { .. } => "select",
        }
    }

    fn is_negated(&self) -> bool {
        match self {
            Step::See { negate, .. }
            | Step::SeeText { negate, .. }
            | Step::SeeElement { negate, .. }
            | Step::SeeInElement { negate, .. }
            | Step::SeeLink { negate, .. }
            | Step::SeeButton { negate, .. }
            | Step::SeeInField { negate, .. }
            | Step::SeeIsSelected { negate, .. }
            | Step::SeeIsChecked { negate, .. }
            | Step::SeeIsDisabled { negate, .. } => *negate,
            _ => false,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = match self {
            Step::Visit { uri } | Step::SeePageIs { uri } => format!("[{}]", uri),
            Step::See { text, .. } | Step::SeeText { text, .. } | Step::SeeButton { text, .. } => {
                format!("[{}]", text)
            }
            Step::SeeElement { selector, .. }
            | Step::SeeIsChecked { selector, .. }
            | Step::SeeIsDisabled { selector, .. }
            | Step::Clear { selector }
            | Step::Check { selector }
            | Step::Uncheck { selector } => format!("[{}]", selector),
            Step::SeeInElement { selector, text, .. } => format!("[{}] [{}]", selector, text),
            Step::SeeLink { text, url: None, .. } => format!("[{}]", text),
            Step::SeeLink { text, url: Some(url), .. } => format!("[{}] [{}]", text, url),
            Step::SeeInField { selector, value, .. } | Step::SeeIsSelected { selector, value, .. } => {
                format!("[{}] [{}]", selector, value)
            }
            Step::Click { name } | Step::Press { name } | Step::ClickOnElement { name } => format!("[{}]", name),
            Step::Type { text, selector } => format!("[{}] into [{}]", text, selector),
            Step::Select { label, selector } => format!("[{}] in [{}]", label, selector),
        };

        if self.is_negated() {
            write!(f, "not {} {}", self.action(), subject)
        } else {
            write!(f, "{} {}", self.action(), subject)
        }
    }
}

/// A base URL plus the steps to run against it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    /// Base URL relative URIs are joined to; falls back to the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    pub steps: Vec<Step>,
}

impl Plan {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| BrowserError::InvalidInput(format!("Invalid check plan: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| BrowserError::InvalidInput(format!("Cannot read check plan {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// JSON schema of the plan format
    pub fn schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Plan)).unwrap_or_default()
    }

    /// Session configuration for this plan. An explicit base URL wins over the plan's,
    /// which wins over the environment.
    pub fn session_config(&self, base_url: Option<&str>) -> Result<SessionConfig> {
        let config = match base_url.or(self.base_url.as_deref()) {
            Some(url) => SessionConfig::new(url),
            None => SessionConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Run every step in order, stopping at the first failure
    pub fn run<S: SessionAdapter>(&self, page: &mut TestSession<S>) -> PlanReport {
        let mut outcomes = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            log::debug!("Step {}: {}", index + 1, step);

            match step.apply(page) {
                Ok(()) => outcomes.push(StepOutcome::success(index, step)),
                Err(e) => {
                    log::info!("Step {} failed: {}", index + 1, e);
                    outcomes.push(StepOutcome::failure(index, step, &e));
                    break;
                }
            }
        }

        PlanReport {
            skipped: self.steps.len() - outcomes.len(),
            outcomes,
        }
    }
}

/// Result of one executed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Zero-based position in the plan
    pub index: usize,

    /// Human readable form of the step
    pub step: String,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// True when the failure was an assertion rather than a lookup or driver problem
    #[serde(default)]
    pub assertion: bool,
}

impl StepOutcome {
    fn success(index: usize, step: &Step) -> Self {
        Self {
            index,
            step: step.to_string(),
            success: true,
            error: None,
            assertion: false,
        }
    }

    fn failure(index: usize, step: &Step, error: &BrowserError) -> Self {
        Self {
            index,
            step: step.to_string(),
            success: false,
            error: Some(error.to_string()),
            assertion: error.is_assertion(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub outcomes: Vec<StepOutcome>,

    /// Steps not run because an earlier one failed
    pub skipped: usize,
}

impl PlanReport {
    pub fn passed(&self) -> bool {
        self.skipped == 0 && self.outcomes.iter().all(|o| o.success)
    }

    pub fn failure(&self) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| !o.success)
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match &outcome.error {
                None => writeln!(f, "ok   {}", outcome.step)?,
                Some(error) => writeln!(f, "FAIL {}\n     {}", outcome.step, error)?,
            }
        }

        let passed = self.outcomes.iter().filter(|o| o.success).count();
        write!(f, "{} passed, {} failed, {} skipped", passed, self.outcomes.len() - passed, self.skipped)
    }
}
