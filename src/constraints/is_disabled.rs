use crate::{browser::SessionAdapter,
            constraints::{form_field, PageConstraint},
            dom::{ElementCollection, FieldKind},
            error::Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsDisabled {
    selector: String,
}

impl IsDisabled {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl PageConstraint for IsDisabled {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        Ok(!form_field::field(page, FieldKind::Any, &self.selector)?.is_enabled()?)
    }

    fn describe(&self) -> String {
        format!("[{}]", self.selector)
    }

    fn failure_description(&self) -> String {
        format!("the element [{}] is disabled", self.selector)
    }

    fn reverse_failure_description(&self) -> String {
        format!("the element [{}] is not disabled", self.selector)
    }
}
