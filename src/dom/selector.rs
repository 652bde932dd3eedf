//! Selector expressions and their classification

use std::fmt;

/// How an atomic selector is handed to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// Starts with `//`, used verbatim as XPath
    XPath,

    /// Starts with `#` or `.`, used verbatim as a CSS selector
    Css,

    /// Anything else; resolved by id, then name, then class, then tag
    Bare,
}

pub fn classify(selector: &str) -> SelectorKind {
    let selector = selector.trim();

    if selector.starts_with("//") {
        SelectorKind::XPath
    } else if selector.starts_with('#') || selector.starts_with('.') {
        SelectorKind::Css
    } else {
        SelectorKind::Bare
    }
}

/// Strip a leading `#` and then a leading `.` from a token
pub fn strip_css_prefix(token: &str) -> &str {
    token.trim().trim_start_matches('#').trim_start_matches('.')
}

/// Split on commas that are not inside brackets, parentheses, or quotes
pub fn split_selectors(expression: &str) -> Vec<String> {
    let mut atoms = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in expression.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            current.push(c);
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                atoms.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    atoms.push(current);

    atoms
        .into_iter()
        .map(|atom| atom.trim().to_string())
        .filter(|atom| !atom.is_empty())
        .collect()
}

/// One or more atomic selectors, in the order given
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorExpression {
    atoms: Vec<String>,
}

impl SelectorExpression {
    pub fn parse(expression: &str) -> Self {
        Self {
            atoms: split_selectors(expression),
        }
    }

    pub fn atoms(&self) -> &[String] {
        &self.atoms
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

impl fmt::Display for SelectorExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.atoms.join(", "))
    }
}

impl From<&str> for SelectorExpression {
    fn from(expression: &str) -> Self {
        Self::parse(expression)
    }
}

impl From<String> for SelectorExpression {
    fn from(expression: String) -> Self {
        Self::parse(&expression)
    }
}

impl From<&String> for SelectorExpression {
    fn from(expression: &String) -> Self {
        Self::parse(expression)
    }
}

impl<S: AsRef<str>> From<Vec<S>> for SelectorExpression {
    fn from(list: Vec<S>) -> Self {
        list.as_slice().into()
    }
}

impl<S: AsRef<str>> From<&[S]> for SelectorExpression {
    fn from(list: &[S]) -> Self {
        Self {
            atoms: list.iter().flat_map(|s| split_selectors(s.as_ref())).collect(),
        }
    }
}

/// A tag with an optional attribute-qualifier suffix, e.g. `input[type='checkbox']`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedTag {
    pub tag: String,
    pub qualifiers: Vec<String>,
}

impl QualifiedTag {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let (Some(open), true) = (raw.find('['), raw.ends_with(']')) {
            let qualifiers = split_selectors(&raw[open + 1..raw.len() - 1]);
            return Self {
                tag: raw[..open].trim().to_string(),
                qualifiers,
            };
        }

        Self {
            tag: raw.to_string(),
            qualifiers: Vec::new(),
        }
    }

    /// Parse a comma-separated list such as `select,input[type='radio']`
    pub fn parse_list(raw: &str) -> Vec<Self> {
        split_selectors(raw).iter().map(|t| Self::parse(t)).collect()
    }

    pub fn is_qualified(&self) -> bool {
        !self.qualifiers.is_empty()
    }

    /// `tag#id`, keeping the qualifiers as CSS attribute selectors
    pub fn css_with_id(&self, id: &str) -> String {
        let qualifiers: String = self.qualifiers.iter().map(|q| format!("[{}]", q)).collect();
        format!("{}{}#{}", self.tag, qualifiers, id)
    }

    /// `//tag[@q]...[@name='name']`
    pub fn xpath_with_name(&self, name: &str) -> String {
        let qualifiers: String = self.qualifiers.iter().map(|q| format!("[@{}]", q)).collect();
        format!("//{}{}[@name='{}']", self.tag, qualifiers, name)
    }
}

impl fmt::Display for QualifiedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualifiers.is_empty() {
            f.write_str(&self.tag)
        } else {
            write!(f, "{}[{}]", self.tag, self.qualifiers.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("//div[@id='x']"), SelectorKind::XPath);
        assert_eq!(classify("#app"), SelectorKind::Css);
        assert_eq!(classify(".nav"), SelectorKind::Css);
        assert_eq!(classify("email"), SelectorKind::Bare);
        assert_eq!(classify("input#email"), SelectorKind::Bare);
        assert_eq!(classify("/html"), SelectorKind::Bare);
    }

    #[test]
    fn test_strip_css_prefix() {
        assert_eq!(strip_css_prefix("#foo"), "foo");
        assert_eq!(strip_css_prefix(".foo"), "foo");
        assert_eq!(strip_css_prefix("#.foo"), "foo");
        assert_eq!(strip_css_prefix("foo"), "foo");
    }

    #[test]
    fn test_split_respects_brackets_and_quotes() {
        assert_eq!(split_selectors("#a, .b ,c"), vec!["#a", ".b", "c"]);
        assert_eq!(
            split_selectors("select,input[type='radio']"),
            vec!["select", "input[type='radio']"]
        );
        assert_eq!(split_selectors("//a[contains(text(),'x, y')], b"), vec!["//a[contains(text(),'x, y')]", "b"]);
        assert!(split_selectors(" , ").is_empty());
    }

    #[test]
    fn test_expression_from_list() {
        let expression = SelectorExpression::from(vec!["#a, #b", "c"]);
        assert_eq!(expression.atoms(), ["#a", "#b", "c"]);
        assert_eq!(expression.to_string(), "#a, #b, c");
    }

    #[test]
    fn test_qualified_tag() {
        let plain = QualifiedTag::parse("textarea");
        assert!(!plain.is_qualified());
        assert_eq!(plain.css_with_id("bio"), "textarea#bio");
        assert_eq!(plain.xpath_with_name("bio"), "//textarea[@name='bio']");

        let checkbox = QualifiedTag::parse("input[type='checkbox']");
        assert_eq!(checkbox.tag, "input");
        assert_eq!(checkbox.qualifiers, vec!["type='checkbox'"]);
        assert_eq!(checkbox.css_with_id("agree"), "input[type='checkbox']#agree");
        assert_eq!(checkbox.xpath_with_name("agree"), "//input[@type='checkbox'][@name='agree']");
        assert_eq!(checkbox.to_string(), "input[type='checkbox']");
    }

    #[test]
    fn test_qualified_tag_with_several_attributes() {
        let tag = QualifiedTag::parse("input[type='text',required]");
        assert_eq!(tag.qualifiers, vec!["type='text'", "required"]);
        assert_eq!(tag.xpath_with_name("q"), "//input[@type='text'][@required][@name='q']");
    }

    #[test]
    fn test_parse_list() {
        let tags = QualifiedTag::parse_list("select,input[type='radio']");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].tag, "select");
        assert_eq!(tags[1].qualifiers, vec!["type='radio'"]);
    }
}
