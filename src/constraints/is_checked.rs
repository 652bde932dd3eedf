use crate::{browser::SessionAdapter,
            constraints::{form_field, PageConstraint},
            dom::{ElementCollection, FieldKind},
            error::Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsChecked {
    selector: String,
}

impl IsChecked {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl PageConstraint for IsChecked {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        form_field::field(page, FieldKind::Checkbox, &self.selector)?.is_selected()
    }

    fn describe(&self) -> String {
        format!("[{}]", self.selector)
    }

    fn failure_description(&self) -> String {
        format!("the checkbox [{}] is checked", self.selector)
    }

    fn reverse_failure_description(&self) -> String {
        format!("the checkbox [{}] is not checked", self.selector)
    }
}
