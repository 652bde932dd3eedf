use crate::{browser::{ElementHandle, SessionAdapter},
            constraints::PageConstraint,
            dom::ElementCollection,
            error::Result,
            utils::{strip_trailing_slash, url_variants}};

/// A link with the text exists, optionally pointing at the URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasLink {
    text: String,
    url: Option<String>,
}

impl HasLink {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }

    /// Builder method: the link must point at this URL (scheme and trailing slash optional)
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    fn url_suffix(&self) -> String {
        match &self.url {
            Some(url) => format!(" and the URL [{}]", url),
            None => String::new(),
        }
    }
}

impl PageConstraint for HasLink {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        let links = page.select_links(&self.text);

        if links.is_empty() {
            return Ok(false);
        }

        let Some(url) = &self.url else {
            return Ok(true);
        };

        let candidates = url_variants(url);
        for link in &links {
            let href = link.attribute("href")?.unwrap_or_default();
            let href = strip_trailing_slash(&href);
            if candidates.iter().any(|candidate| candidate == href) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn describe(&self) -> String {
        format!("a link with the text [{}]{}", self.text, self.url_suffix())
    }

    fn failure_description(&self) -> String {
        format!("the page has {}", self.describe())
    }

    fn reverse_failure_description(&self) -> String {
        format!("the page does not have {}", self.describe())
    }
}
