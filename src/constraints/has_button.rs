use crate::{browser::SessionAdapter, constraints::PageConstraint, dom::ElementCollection, error::Result};

/// A button with the text, id, or name exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasButton {
    text: String,
}

impl HasButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PageConstraint for HasButton {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        Ok(!page.select_buttons(&self.text).is_empty())
    }

    fn describe(&self) -> String {
        format!("a button with the text [{}]", self.text)
    }

    fn failure_description(&self) -> String {
        format!("the page has {}", self.describe())
    }

    fn reverse_failure_description(&self) -> String {
        format!("the page does not have {}", self.describe())
    }
}
