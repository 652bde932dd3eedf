use crate::{browser::{ElementHandle, SessionAdapter},
            constraints::PageConstraint,
            dom::ElementCollection,
            error::{CountMismatch, Result}};
use indexmap::IndexMap;
use std::cell::Cell;

/// Elements matching a selector exist, optionally with attributes and an exact count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasElement {
    selector: String,
    attributes: IndexMap<String, String>,
    count: Option<usize>,
    /// Observed count of the last evaluation, for the failure message only
    actual: Cell<Option<usize>>,
}

impl HasElement {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            attributes: IndexMap::new(),
            count: None,
            actual: Cell::new(None),
        }
    }

    /// Builder method: every counted element must have this attribute value
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder method: replace all expected attributes
    pub fn attributes(mut self, attributes: IndexMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: expect exactly this many matching elements
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    fn has_attributes<E: ElementHandle>(&self, element: &E) -> Result<bool> {
        for (name, value) in &self.attributes {
            if element.attribute(name)?.as_deref() != Some(value.as_str()) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl PageConstraint for HasElement {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        let mut elements = page.filter(self.selector.as_str());
        if elements.is_empty() {
            if self.count.is_some() {
                self.actual.set(Some(0));
            }
            return Ok(false);
        }

        if !self.attributes.is_empty() {
            elements = elements.try_reduce(|element| self.has_attributes(element))?;
        }

        match self.count {
            Some(expected) => {
                let actual = elements.count();
                self.actual.set(Some(actual));
                Ok(actual == expected)
            }
            None => Ok(!elements.is_empty()),
        }
    }

    fn describe(&self) -> String {
        let mut message = format!("the element [{}]", self.selector);

        if !self.attributes.is_empty() {
            let attributes = serde_json::to_string(&self.attributes).unwrap_or_default();
            message.push_str(&format!(" with the attributes {}", attributes));
        }

        if let Some(count) = self.count {
            let actual = self.actual.get().map(|a| a.to_string()).unwrap_or_default();
            message.push_str(&format!(" with an expected count of {} [actual count was {}]", count, actual));
        }

        message
    }

    fn count_mismatch(&self) -> Option<CountMismatch> {
        let expected = self.count?;
        let actual = self.actual.get()?;
        Some(CountMismatch { expected, actual })
    }
}
