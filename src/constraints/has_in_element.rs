use crate::{browser::{ElementHandle, SessionAdapter},
            constraints::PageConstraint,
            dom::ElementCollection,
            error::Result};

/// Some element matching the selector contains the text (case-sensitive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasInElement {
    selector: String,
    text: String,
}

impl HasInElement {
    pub fn new(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            text: text.into(),
        }
    }
}

impl PageConstraint for HasInElement {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        for element in &page.filter(self.selector.as_str()) {
            if element.text()?.contains(&self.text) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn describe(&self) -> String {
        format!("[{}] {}", self.selector, self.text)
    }

    fn failure_description(&self) -> String {
        format!("[{}] contains {}", self.selector, self.text)
    }

    fn reverse_failure_description(&self) -> String {
        format!("[{}] does not contain {}", self.selector, self.text)
    }
}
