//! In-memory session used by unit tests
//!
//! Nodes live in a flat list in document order. Lookups understand the criteria of
//! [`By`] plus the CSS and XPath shapes the resolver generates; anything else is
//! rejected with [`DriverError::InvalidSelector`], like a real driver would.

use crate::{browser::driver::{is_tag_name, By, ElementHandle, SessionAdapter},
            error::{DriverError, DriverResult}};
use indexmap::IndexMap;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    id: usize,
    root: bool,
    tag: String,
    attributes: IndexMap<String, String>,
    text: String,
    html: String,
    /// (label, value) pairs of a `<select>`
    options: Vec<(String, String)>,
    selected: Vec<String>,
    broken: bool,
    clicks: usize,
}

impl FakeNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn option(mut self, label: &str, value: &str, selected: bool) -> Self {
        self.options.push((label.to_string(), value.to_string()));
        if selected {
            self.selected.push(value.to_string());
        }
        self
    }

    /// Every accessor of this node fails with a driver error
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    fn has_class(&self, class: &str) -> bool {
        self.attributes
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    fn matches_tag(&self, tag: &str) -> bool {
        tag == "*" || self.tag == tag
    }
}

type Shared = Rc<RefCell<FakeNode>>;

#[derive(Default)]
struct FakeState {
    nodes: Vec<Shared>,
    url: String,
    statuses: HashMap<String, String>,
    unreachable: Vec<String>,
    rejects: Vec<(By, String)>,
    lookups: Vec<(By, String)>,
}

#[derive(Clone)]
pub struct FakeSession {
    state: Rc<RefCell<FakeState>>,
}

impl FakeSession {
    pub fn new() -> Self {
        let session = Self {
            state: Rc::new(RefCell::new(FakeState::default())),
        };
        let mut html = FakeNode::new("html");
        html.root = true;
        session.push(html);
        session
    }

    fn push(&self, mut node: FakeNode) {
        let mut state = self.state.borrow_mut();
        node.id = state.nodes.len() + 1;
        state.nodes.push(Rc::new(RefCell::new(node)));
    }

    /// Set the rendered text and markup of the whole page
    pub fn page(self, text: &str, html: &str) -> Self {
        {
            let state = self.state.borrow();
            let mut root = state.nodes[0].borrow_mut();
            root.text = text.to_string();
            root.html = html.to_string();
        }
        self
    }

    pub fn with(self, node: FakeNode) -> Self {
        self.push(node);
        self
    }

    pub fn status(self, uri: &str, status: &str) -> Self {
        self.state.borrow_mut().statuses.insert(uri.to_string(), status.to_string());
        self
    }

    /// The status probe of this uri fails at the transport level
    pub fn unreachable(self, uri: &str) -> Self {
        self.state.borrow_mut().unreachable.push(uri.to_string());
        self
    }

    /// Reject this exact lookup, as a driver does with a malformed selector
    pub fn reject(self, by: By, value: &str) -> Self {
        self.state.borrow_mut().rejects.push((by, value.to_string()));
        self
    }

    pub fn set_url(&self, url: &str) {
        self.state.borrow_mut().url = url.to_string();
    }

    /// Every lookup issued so far, in order
    pub fn lookups(&self) -> Vec<(By, String)> {
        self.state.borrow().lookups.clone()
    }

    pub fn clear_lookups(&self) {
        self.state.borrow_mut().lookups.clear();
    }

    /// Number of clicks received by the first node with the given id attribute
    pub fn clicks(&self, id: &str) -> usize {
        self.state
            .borrow()
            .nodes
            .iter()
            .find(|n| n.borrow().attributes.get("id").is_some_and(|v| v == id))
            .map(|n| n.borrow().clicks)
            .unwrap_or(0)
    }

    fn select_where(&self, predicate: impl Fn(&FakeNode) -> bool) -> Vec<FakeElement> {
        self.state
            .borrow()
            .nodes
            .iter()
            .filter(|n| predicate(&n.borrow()))
            .map(|n| FakeElement {
                node: n.clone(),
                state: self.state.clone(),
            })
            .collect()
    }
}

/// A single attribute test parsed from a CSS or XPath predicate
#[derive(Debug, Clone, PartialEq)]
enum Test {
    Tag(String),
    Id(String),
    Class(String),
    Attr(String, Option<String>),
    ContainsText(String),
}

impl Test {
    fn holds(&self, node: &FakeNode) -> bool {
        match self {
            Test::Tag(tag) => node.matches_tag(tag),
            Test::Id(id) => node.attributes.get("id").is_some_and(|v| v == id),
            Test::Class(class) => node.has_class(class),
            Test::Attr(name, None) => node.attributes.contains_key(name),
            Test::Attr(name, Some(value)) => node.attributes.get(name).is_some_and(|v| v == value),
            Test::ContainsText(text) => !node.root && node.text.contains(text.as_str()),
        }
    }
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Offset of the `]` closing a predicate, skipping quoted text
fn bracket_end(inner: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn unquote(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.len() >= 2
        && ((raw.starts_with('\'') && raw.ends_with('\'')) || (raw.starts_with('"') && raw.ends_with('"')))
    {
        return Some(raw[1..raw.len() - 1].to_string());
    }
    if !raw.is_empty() && raw.chars().all(is_ident) {
        return Some(raw.to_string());
    }
    None
}

/// `tag`, `*`, `#id`, `.class`, `tag#id`, `tag[a='v']#id` and `[a='v']`
fn parse_css(selector: &str) -> Option<Vec<Test>> {
    let mut tests = Vec::new();
    let mut rest = selector.trim();

    let tag_len = rest.find(|c: char| !(is_ident(c) || c == '*')).unwrap_or(rest.len());
    if tag_len > 0 {
        tests.push(Test::Tag(rest[..tag_len].to_lowercase()));
        rest = &rest[tag_len..];
    }

    while let Some(inner) = rest.strip_prefix('[') {
        let end = bracket_end(inner)?;
        let body = &inner[..end];
        match body.split_once('=') {
            Some((name, value)) => tests.push(Test::Attr(name.trim().to_string(), Some(unquote(value)?))),
            None => tests.push(Test::Attr(body.trim().to_string(), None)),
        }
        rest = &inner[end + 1..];
    }

    if let Some(id) = rest.strip_prefix('#') {
        if id.is_empty() || !id.chars().all(is_ident) {
            return None;
        }
        tests.push(Test::Id(id.to_string()));
        rest = "";
    } else if let Some(class) = rest.strip_prefix('.') {
        if class.is_empty() || !class.chars().all(is_ident) {
            return None;
        }
        tests.push(Test::Class(class.to_string()));
        rest = "";
    }

    if !rest.is_empty() || tests.is_empty() {
        return None;
    }
    Some(tests)
}

/// `//tag` or `//*` followed by `[@a='v']` and `[contains(text(),'t')]` predicates
fn parse_xpath(expression: &str) -> Option<Vec<Test>> {
    let rest = expression.trim().strip_prefix("//")?;
    let tag_len = rest.find(|c: char| !(is_ident(c) || c == '*')).unwrap_or(rest.len());
    if tag_len == 0 {
        return None;
    }

    let mut tests = vec![Test::Tag(rest[..tag_len].to_lowercase())];
    let mut rest = &rest[tag_len..];

    while let Some(inner) = rest.strip_prefix('[') {
        let end = bracket_end(inner)?;
        let body = &inner[..end];
        if let Some(attr) = body.strip_prefix('@') {
            match attr.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim();
                    if !(value.starts_with('\'') || value.starts_with('"')) {
                        return None;
                    }
                    tests.push(Test::Attr(name.trim().to_string(), Some(unquote(value)?)))
                }
                None => tests.push(Test::Attr(attr.trim().to_string(), None)),
            }
        } else if let Some(args) = body.strip_prefix("contains(text(),").and_then(|b| b.strip_suffix(')')) {
            let value = args.trim();
            if !(value.starts_with('\'') || value.starts_with('"')) {
                return None;
            }
            tests.push(Test::ContainsText(unquote(value)?));
        } else {
            return None;
        }
        rest = &inner[end + 1..];
    }

    if !rest.is_empty() {
        return None;
    }
    Some(tests)
}

impl SessionAdapter for FakeSession {
    type Element<'a> = FakeElement;

    fn navigate(&self, uri: &str) -> DriverResult<()> {
        self.set_url(uri);
        Ok(())
    }

    fn current_url(&self) -> DriverResult<String> {
        Ok(self.state.borrow().url.clone())
    }

    fn status_of(&self, uri: &str) -> DriverResult<String> {
        let state = self.state.borrow();
        if state.unreachable.iter().any(|u| u == uri) {
            return Err(DriverError::command(format!("connection refused: {}", uri)));
        }
        Ok(state.statuses.get(uri).cloned().unwrap_or_else(|| "200".to_string()))
    }

    fn find_elements(&self, by: By, value: &str) -> DriverResult<Vec<FakeElement>> {
        {
            let mut state = self.state.borrow_mut();
            state.lookups.push((by, value.to_string()));
            if state.rejects.iter().any(|(b, v)| *b == by && v == value) {
                return Err(DriverError::invalid_selector(by, value, "rejected by fixture"));
            }
        }

        let found = match by {
            By::Id => self.select_where(|n| n.attributes.get("id").is_some_and(|v| v == value)),
            By::Name => self.select_where(|n| n.attributes.get("name").is_some_and(|v| v == value)),
            By::ClassName => {
                if value.is_empty() || value.chars().any(char::is_whitespace) {
                    return Err(DriverError::invalid_selector(by, value, "compound class names are not permitted"));
                }
                self.select_where(|n| n.has_class(value))
            }
            By::TagName => {
                if !is_tag_name(value) {
                    return Err(DriverError::invalid_selector(by, value, "not a valid tag name"));
                }
                self.select_where(|n| n.matches_tag(value))
            }
            By::LinkText => self.select_where(|n| n.tag == "a" && n.text.trim() == value.trim()),
            By::Css => {
                let tests = parse_css(value)
                    .ok_or_else(|| DriverError::invalid_selector(by, value, "unsupported selector"))?;
                self.select_where(|n| tests.iter().all(|t| t.holds(n)))
            }
            By::XPath if value == "/html" => self.select_where(|n| n.root),
            By::XPath => {
                let tests = parse_xpath(value)
                    .ok_or_else(|| DriverError::invalid_selector(by, value, "unsupported expression"))?;
                self.select_where(|n| tests.iter().all(|t| t.holds(n)))
            }
        };

        Ok(found)
    }
}

#[derive(Clone)]
pub struct FakeElement {
    node: Shared,
    state: Rc<RefCell<FakeState>>,
}

impl FakeElement {
    fn read<T>(&self, f: impl FnOnce(&FakeNode) -> T) -> DriverResult<T> {
        let node = self.node.borrow();
        if node.broken {
            return Err(DriverError::command("stale element reference"));
        }
        Ok(f(&node))
    }

    fn write(&self, f: impl FnOnce(&mut FakeNode)) -> DriverResult<()> {
        let mut node = self.node.borrow_mut();
        if node.broken {
            return Err(DriverError::command("stale element reference"));
        }
        f(&mut node);
        Ok(())
    }
}

impl ElementHandle for FakeElement {
    type Id = usize;

    fn identity(&self) -> usize {
        self.node.borrow().id
    }

    fn tag_name(&self) -> DriverResult<String> {
        self.read(|n| n.tag.clone())
    }

    fn text(&self) -> DriverResult<String> {
        self.read(|n| {
            if n.tag == "textarea" {
                n.attributes.get("value").cloned().unwrap_or_default()
            } else {
                n.text.clone()
            }
        })
    }

    fn inner_html(&self) -> DriverResult<String> {
        self.read(|n| n.html.clone())
    }

    fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        self.read(|n| n.attributes.get(name).cloned())
    }

    fn is_selected(&self) -> DriverResult<bool> {
        self.read(|n| n.attributes.contains_key("checked") || n.attributes.contains_key("selected"))
    }

    fn is_enabled(&self) -> DriverResult<bool> {
        self.read(|n| !n.attributes.contains_key("disabled"))
    }

    fn selected_values(&self) -> DriverResult<Vec<String>> {
        self.read(|n| n.selected.clone())
    }

    fn click(&self) -> DriverResult<()> {
        let mut target = None;
        self.write(|n| {
            n.clicks += 1;
            match n.attributes.get("type").map(String::as_str) {
                Some("checkbox") => {
                    if n.attributes.shift_remove("checked").is_none() {
                        n.attributes.insert("checked".to_string(), "true".to_string());
                    }
                }
                Some("radio") => {
                    n.attributes.insert("checked".to_string(), "true".to_string());
                }
                _ => {}
            }
            if n.tag == "a" {
                target = n.attributes.get("href").cloned();
            }
        })?;

        if let Some(href) = target {
            self.state.borrow_mut().url = href;
        }
        Ok(())
    }

    fn set_value(&self, text: &str) -> DriverResult<()> {
        self.write(|n| n.attributes.entry("value".to_string()).or_default().push_str(text))
    }

    fn clear(&self) -> DriverResult<()> {
        self.write(|n| {
            n.attributes.insert("value".to_string(), String::new());
        })
    }

    fn select_option_by_label(&self, label: &str) -> DriverResult<()> {
        let mut found = false;
        self.write(|n| {
            if let Some((_, value)) = n.options.iter().find(|(l, _)| l == label) {
                n.selected = vec![value.clone()];
                found = true;
            }
        })?;

        if found {
            Ok(())
        } else {
            Err(DriverError::command(format!("No option labelled [{}]", label)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_shapes() {
        assert_eq!(parse_css("#app"), Some(vec![Test::Id("app".to_string())]));
        assert_eq!(parse_css(".nav"), Some(vec![Test::Class("nav".to_string())]));
        assert_eq!(
            parse_css("input[type='checkbox']#agree"),
            Some(vec![
                Test::Tag("input".to_string()),
                Test::Attr("type".to_string(), Some("checkbox".to_string())),
                Test::Id("agree".to_string()),
            ])
        );
        assert_eq!(parse_css("#a["), None);
        assert_eq!(parse_css("div > p"), None);
    }

    #[test]
    fn test_parse_xpath_shapes() {
        assert_eq!(
            parse_xpath("//input[@type='radio'][@name='color']"),
            Some(vec![
                Test::Tag("input".to_string()),
                Test::Attr("type".to_string(), Some("radio".to_string())),
                Test::Attr("name".to_string(), Some("color".to_string())),
            ])
        );
        assert_eq!(
            parse_xpath("//button[contains(text(),'Save')]"),
            Some(vec![Test::Tag("button".to_string()), Test::ContainsText("Save".to_string())])
        );
        assert_eq!(parse_xpath("//a[@id='it's']"), None);
        assert_eq!(parse_xpath("div"), None);
    }

    #[test]
    fn test_fake_lookups_and_identity() {
        let session = FakeSession::new()
            .with(FakeNode::new("div").attr("id", "app").attr("class", "main wide"))
            .with(FakeNode::new("input").attr("name", "email"));

        let by_id = session.find_elements(By::Id, "app").unwrap();
        let by_class = session.find_elements(By::ClassName, "wide").unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].identity(), by_class[0].identity());

        assert!(session.find_elements(By::ClassName, "main wide").is_err());
        assert_eq!(session.find_elements(By::XPath, "/html").unwrap().len(), 1);
        assert_eq!(session.lookups().len(), 4);
    }
}
