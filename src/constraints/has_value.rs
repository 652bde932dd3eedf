use crate::{browser::SessionAdapter,
            constraints::{form_field, PageConstraint},
            dom::{ElementCollection, FieldKind},
            error::Result};

/// The text field holds exactly the expected value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasValue {
    selector: String,
    value: String,
}

impl HasValue {
    pub fn new(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            value: value.into(),
        }
    }
}

impl PageConstraint for HasValue {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        let field = form_field::field(page, FieldKind::TextField, &self.selector)?;

        let value = if field.element_kind()? == "textarea" {
            field.text()?
        } else {
            field.attribute("value")?.unwrap_or_default()
        };

        Ok(value == self.value)
    }

    fn describe(&self) -> String {
        format!("[{}] [{}]", self.selector, self.value)
    }

    fn failure_description(&self) -> String {
        format!("the field [{}] contains the expected value [{}]", self.selector, self.value)
    }

    fn reverse_failure_description(&self) -> String {
        format!("the field [{}] does not contain the expected value [{}]", self.selector, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeNode, FakeSession};
    use crate::error::BrowserError;

    #[test]
    fn test_input_and_textarea_values() {
        let session = FakeSession::new()
            .with(FakeNode::new("input").attr("id", "email").attr("value", "taylor@laravel.com"))
            .with(FakeNode::new("textarea").attr("name", "bio").attr("value", "Hello"));
        let page = ElementCollection::root(&session);

        assert!(HasValue::new("email", "taylor@laravel.com").matches(&page).unwrap());
        assert!(HasValue::new("#email", "taylor@laravel.com").matches(&page).unwrap());
        assert!(HasValue::new("bio", "Hello").matches(&page).unwrap());
        assert!(!HasValue::new("bio", "Bye").matches(&page).unwrap());
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let session = FakeSession::new();
        let page = ElementCollection::root(&session);

        let err = HasValue::new("email", "x").matches(&page).unwrap_err();
        assert!(matches!(err, BrowserError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "There is no input,textarea with the name or ID [email]");
    }
}
