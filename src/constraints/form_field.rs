use crate::{browser::SessionAdapter,
            dom::{ElementCollection, FieldKind},
            error::{BrowserError, Result}};

/// Resolve the form field a constraint reasons about; a missing field is an error
pub fn field<'s, S: SessionAdapter + 's>(
    page: &ElementCollection<'s, S>,
    kind: FieldKind,
    selector: &str,
) -> Result<ElementCollection<'s, S>> {
    let found = page.select_field(kind.valid_elements(), selector);

    if found.is_empty() {
        return Err(BrowserError::InvalidArgument(format!(
            "There is no {} with the name or ID [{}]",
            kind.valid_elements(),
            selector
        )));
    }

    Ok(found)
}
