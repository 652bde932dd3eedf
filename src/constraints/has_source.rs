use crate::{browser::SessionAdapter,
            constraints::PageConstraint,
            dom::ElementCollection,
            error::Result,
            utils::{contains_ignore_case, html_escape}};

/// The page source contains the given HTML, raw or escaped, ignoring case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasSource {
    source: String,
}

impl HasSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }
}

impl PageConstraint for HasSource {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        let html = match page.markup() {
            Some(markup) => markup.to_string(),
            None if page.is_empty() => String::new(),
            None => page.html()?,
        };

        if contains_ignore_case(&html, &self.source) || contains_ignore_case(&html, &html_escape(&self.source)) {
            return Ok(true);
        }

        if page.is_empty() {
            return Ok(false);
        }

        Ok(contains_ignore_case(&page.text()?, &self.source))
    }

    fn describe(&self) -> String {
        format!("the HTML [{}]", self.source)
    }
}
