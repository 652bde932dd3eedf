use crate::{browser::{ElementHandle, SessionAdapter},
            constraints::{form_field, PageConstraint},
            dom::{ElementCollection, FieldKind},
            error::Result};

/// A select has the value among its selected options, or a radio group has it checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsSelected {
    selector: String,
    value: String,
}

impl IsSelected {
    pub fn new(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            value: value.into(),
        }
    }

    fn selected_values<'s, S: SessionAdapter + 's>(field: &ElementCollection<'s, S>) -> Result<Vec<String>> {
        if field.element_kind()? == "select" {
            return field.selected_values();
        }

        for radio in field {
            if radio.is_selected()? {
                return Ok(radio.attribute("value")?.into_iter().collect());
            }
        }
        Ok(Vec::new())
    }
}

impl PageConstraint for IsSelected {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        let field = form_field::field(page, FieldKind::Selection, &self.selector)?;

        Ok(Self::selected_values(&field)?.contains(&self.value))
    }

    fn describe(&self) -> String {
        format!("[{}] [{}]", self.selector, self.value)
    }

    fn failure_description(&self) -> String {
        format!("the element [{}] has the selected value [{}]", self.selector, self.value)
    }

    fn reverse_failure_description(&self) -> String {
        format!("the element [{}] does not have the selected value [{}]", self.selector, self.value)
    }
}
