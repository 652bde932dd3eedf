use crate::{browser::{ElementHandle, SessionAdapter},
            dom::{resolver::{self, Chain, Strategy},
                  selector::SelectorExpression},
            error::{BrowserError, Result}};
use indexmap::IndexMap;
use std::fmt;

/// Element handle type of a session
pub type Handle<'s, S> = <S as SessionAdapter>::Element<'s>;

type HandleId<'s, S> = <Handle<'s, S> as ElementHandle>::Id;

/// Something that can be added to a collection
pub enum Node<'s, S: SessionAdapter + 's> {
    /// The session/document the collection resolves against
    Document(&'s S),
    Element(Handle<'s, S>),
    Elements(Vec<Handle<'s, S>>),
    Empty,
}

/// An ordered set of matched elements, unique by driver identity
///
/// Derived collections (from [`filter`](Self::filter), [`reduce`](Self::reduce) and the
/// finders) reference the same session and never modify the collection they came from.
pub struct ElementCollection<'s, S: SessionAdapter + 's> {
    session: Option<&'s S>,
    markup: Option<String>,
    uri: Option<String>,
    base_href: Option<String>,
    nodes: IndexMap<HandleId<'s, S>, Handle<'s, S>>,
}

impl<'s, S: SessionAdapter + 's> Clone for ElementCollection<'s, S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session,
            markup: self.markup.clone(),
            uri: self.uri.clone(),
            base_href: self.base_href.clone(),
            nodes: self.nodes.clone(),
        }
    }
}

impl<'s, S: SessionAdapter + 's> fmt::Debug for ElementCollection<'s, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementCollection")
            .field("count", &self.nodes.len())
            .field("ids", &self.nodes.keys().collect::<Vec<_>>())
            .field("uri", &self.uri)
            .field("base_href", &self.base_href)
            .field("detached", &self.session.is_none())
            .finish()
    }
}

impl<'s, S: SessionAdapter + 's> Default for ElementCollection<'s, S> {
    fn default() -> Self {
        Self {
            session: None,
            markup: None,
            uri: None,
            base_href: None,
            nodes: IndexMap::new(),
        }
    }
}

impl<'s, S: SessionAdapter + 's> ElementCollection<'s, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection over the whole document: the session plus its `<html>` element
    pub fn root(session: &'s S) -> Self {
        let mut collection = Self {
            session: Some(session),
            ..Self::default()
        };
        collection.extend(Chain::new(vec![Strategy::xpath("/html")]).resolve(session));
        collection
    }

    /// A detached collection whose page source is the given string
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self {
            markup: Some(markup.into()),
            ..Self::default()
        }
    }

    /// Builder method: set the current URI (also the base href unless one is set)
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        if self.base_href.is_none() {
            self.base_href = Some(uri.clone());
        }
        self.uri = Some(uri);
        self
    }

    /// Builder method: set the base href
    pub fn with_base_href(mut self, base_href: impl Into<String>) -> Self {
        self.base_href = Some(base_href.into());
        self
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn base_href(&self) -> Option<&str> {
        self.base_href.as_deref()
    }

    pub fn session(&self) -> Option<&'s S> {
        self.session
    }

    /// Raw page source of a collection built with [`from_markup`](Self::from_markup)
    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// Add a document or element handles; handles already present are skipped
    pub fn add(&mut self, node: Node<'s, S>) -> Result<()> {
        match node {
            Node::Document(session) => match self.session {
                Some(current) if !std::ptr::eq(current, session) => {
                    return Err(BrowserError::InvalidInput(
                        "Expecting the document this collection was created from, but got another session".to_string(),
                    ));
                }
                _ => self.session = Some(session),
            },
            Node::Element(handle) => self.insert(handle),
            Node::Elements(handles) => self.extend(handles),
            Node::Empty => {}
        }
        Ok(())
    }

    fn insert(&mut self, handle: Handle<'s, S>) {
        self.nodes.entry(handle.identity()).or_insert(handle);
    }

    fn extend(&mut self, handles: impl IntoIterator<Item = Handle<'s, S>>) {
        for handle in handles {
            self.insert(handle);
        }
    }

    /// An empty collection sharing this one's session and URIs
    fn derive(&self) -> Self {
        Self {
            session: self.session,
            markup: None,
            uri: self.uri.clone(),
            base_href: self.base_href.clone(),
            nodes: IndexMap::new(),
        }
    }

    /// Union of the results of every chain, in chain order
    pub fn resolve(&self, chains: &[Chain]) -> Self {
        let mut collection = self.derive();
        if let Some(session) = self.session {
            for chain in chains {
                collection.extend(chain.resolve(session));
            }
        }
        collection
    }

    /// Resolve every atomic selector of the expression and union the matches
    ///
    /// An empty result is not an error; callers decide whether "not found" matters.
    pub fn filter(&self, selector: impl Into<SelectorExpression>) -> Self {
        let expression = selector.into();
        let chains: Vec<Chain> = expression.atoms().iter().map(|atom| resolver::selector_chain(atom)).collect();
        self.resolve(&chains)
    }

    /// Keep the elements the predicate accepts, in order
    pub fn reduce(&self, mut predicate: impl FnMut(&Handle<'s, S>) -> bool) -> Self {
        let mut collection = self.derive();
        collection.extend(self.nodes.values().filter(|handle| predicate(*handle)).cloned());
        collection
    }

    /// Like [`reduce`](Self::reduce), stopping at the first predicate error
    pub fn try_reduce(&self, mut predicate: impl FnMut(&Handle<'s, S>) -> Result<bool>) -> Result<Self> {
        let mut collection = self.derive();
        for handle in self.nodes.values() {
            if predicate(handle)? {
                collection.insert(handle.clone());
            }
        }
        Ok(collection)
    }

    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handle<'s, S>> {
        self.nodes.values()
    }

    pub fn at(&self, index: usize) -> Option<&Handle<'s, S>> {
        self.nodes.get_index(index).map(|(_, handle)| handle)
    }

    pub fn first(&self) -> Option<&Handle<'s, S>> {
        self.at(0)
    }

    fn first_or_invalid(&self, what: &str) -> Result<&Handle<'s, S>> {
        self.first().ok_or_else(|| {
            BrowserError::InvalidInput(format!("Cannot read the {} of an empty element collection", what))
        })
    }

    /// Text of the first element
    pub fn text(&self) -> Result<String> {
        Ok(self.first_or_invalid("text")?.text()?)
    }

    /// Inner HTML of the first element
    pub fn html(&self) -> Result<String> {
        Ok(self.first_or_invalid("html")?.inner_html()?)
    }

    pub fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.first_or_invalid("attributes")?.attribute(name)?)
    }

    /// Tag name of the first element
    pub fn element_kind(&self) -> Result<String> {
        Ok(self.first_or_invalid("element kind")?.tag_name()?)
    }

    pub fn selected_values(&self) -> Result<Vec<String>> {
        Ok(self.first_or_invalid("selected values")?.selected_values()?)
    }

    pub fn is_selected(&self) -> Result<bool> {
        Ok(self.first_or_invalid("selected state")?.is_selected()?)
    }

    pub fn is_enabled(&self) -> Result<bool> {
        Ok(self.first_or_invalid("enabled state")?.is_enabled()?)
    }

    /// Links by exact text, falling back to `<a>` elements with the id
    pub fn select_links(&self, text: &str) -> Self {
        self.resolve(&[resolver::link_chain(text)])
    }

    /// Buttons containing the text, falling back to id and then name
    pub fn select_buttons(&self, text: &str) -> Self {
        self.resolve(&[resolver::button_chain(text)])
    }

    /// Any element containing the text, falling back to id
    pub fn select_clickable(&self, text: &str) -> Self {
        self.resolve(&[resolver::clickable_chain(text)])
    }

    /// Form fields of the given tags (e.g. `input,textarea`) by id or name
    pub fn select_field(&self, valid_elements: &str, selector: &str) -> Self {
        self.resolve(&resolver::field_chains(valid_elements, selector))
    }

    /// Every element with the given tag (`*` for all)
    pub fn select_elements(&self, tag: &str) -> Self {
        let tag = if tag.trim().is_empty() { "*" } else { tag.trim() };
        self.resolve(&[Chain::new(vec![Strategy::xpath(format!("//{}", tag))])])
    }

    pub fn select_elements_by_attribute(&self, name: &str, attributes: &[&str], tags: &[&str]) -> Self {
        if attributes.is_empty() {
            return self.derive();
        }
        self.resolve(&[resolver::attribute_chain(name, attributes, tags)])
    }

    pub fn select_elements_with_text(&self, text: &str, tags: &[&str]) -> Self {
        self.resolve(&[resolver::text_chain(text, tags)])
    }
}

impl<'c, 's, S: SessionAdapter + 's> IntoIterator for &'c ElementCollection<'s, S> {
    type Item = &'c Handle<'s, S>;
    type IntoIter = indexmap::map::Values<'c, HandleId<'s, S>, Handle<'s, S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.values()
    }
}
