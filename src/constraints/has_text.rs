use crate::{browser::SessionAdapter,
            constraints::PageConstraint,
            dom::ElementCollection,
            error::Result,
            utils::contains_ignore_case};

/// The rendered text of the page contains the given text, ignoring case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasText {
    text: String,
}

impl HasText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PageConstraint for HasText {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        let text = match page.markup() {
            Some(markup) => markup.to_string(),
            None if page.is_empty() => return Ok(false),
            None => page.text()?,
        };

        Ok(contains_ignore_case(&text, &self.text))
    }

    fn describe(&self) -> String {
        format!("the text [{}]", self.text)
    }
}
