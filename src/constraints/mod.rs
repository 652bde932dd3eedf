//! Assertion predicates over a page
//!
//! Every constraint evaluates to a boolean against an [`ElementCollection`] and carries
//! the affirmative and negative descriptions used in the failure message. Wrapping a
//! constraint in [`Negated`] inverts the result and swaps the descriptions.
//!
//! Form-field constraints ([`HasValue`], [`IsSelected`], [`IsChecked`], [`IsDisabled`])
//! fail with [`BrowserError::InvalidArgument`](crate::BrowserError::InvalidArgument)
//! when the field does not exist, instead of evaluating to false.

pub mod form_field;
pub mod has_button;
pub mod has_element;
pub mod has_in_element;
pub mod has_link;
pub mod has_source;
pub mod has_text;
pub mod has_value;
pub mod is_checked;
pub mod is_disabled;
pub mod is_selected;

pub use has_button::HasButton;
pub use has_element::HasElement;
pub use has_in_element::HasInElement;
pub use has_link::HasLink;
pub use has_source::HasSource;
pub use has_text::HasText;
pub use has_value::HasValue;
pub use is_checked::IsChecked;
pub use is_disabled::IsDisabled;
pub use is_selected::IsSelected;

use crate::{browser::{Detached, SessionAdapter},
            dom::ElementCollection,
            error::{AssertionFailure, CountMismatch, Result}};

pub trait PageConstraint {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool>;

    /// What the constraint looks for, e.g. "the text [Login]"
    fn describe(&self) -> String;

    fn failure_description(&self) -> String {
        format!("the page contains {}", self.describe())
    }

    fn reverse_failure_description(&self) -> String {
        format!("the page does not contain {}", self.describe())
    }

    /// Expected vs actual count, known once a count-bearing constraint was evaluated
    fn count_mismatch(&self) -> Option<CountMismatch> {
        None
    }

    /// `Ok(())` when the constraint holds, an assertion failure otherwise
    fn evaluate<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<()> {
        if self.matches(page)? {
            return Ok(());
        }

        Err(AssertionFailure::new(self.failure_description())
            .with_counts(self.count_mismatch())
            .into())
    }

    /// Evaluate against a raw page source instead of a live document
    fn evaluate_markup(&self, markup: &str) -> Result<()> {
        self.evaluate(&ElementCollection::<Detached>::from_markup(markup))
    }
}

/// Inverts a constraint and swaps its failure descriptions
#[derive(Debug, Clone)]
pub struct Negated<C> {
    inner: C,
}

impl<C: PageConstraint> Negated<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: PageConstraint> PageConstraint for Negated<C> {
    fn matches<'s, S: SessionAdapter + 's>(&self, page: &ElementCollection<'s, S>) -> Result<bool> {
        Ok(!self.inner.matches(page)?)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn failure_description(&self) -> String {
        self.inner.reverse_failure_description()
    }

    fn reverse_failure_description(&self) -> String {
        self.inner.failure_description()
    }

    fn count_mismatch(&self) -> Option<CountMismatch> {
        self.inner.count_mismatch()
    }
}
