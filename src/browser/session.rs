use crate::{browser::{config::{ConnectionOptions, LaunchOptions},
                      driver::{is_tag_name, By, ElementHandle, SessionAdapter}},
            error::{BrowserError, DriverError, DriverResult, Result}};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, rc::Rc, sync::Arc, time::Duration};

const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(10);

/// Browser session over a single Chrome/Chromium tab
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Tab that all navigation and lookups run in
    tab: Arc<Tab>,

    /// Client used to probe page status codes, redirects are not followed
    http: reqwest::blocking::Client,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));

        // Keep the browser alive across long test runs (default is 30 seconds)
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let tab = browser.new_tab().map_err(|e| BrowserError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Self::from_parts(browser, tab)
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::ConnectionFailed(format!("Failed to create tab: {}", e)))?;

        Self::from_parts(browser, tab)
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    fn from_parts(browser: Browser, tab: Arc<Tab>) -> Result<Self> {
        let http = status_client(DEFAULT_STATUS_TIMEOUT)?;
        Ok(Self { browser, tab, http })
    }

    /// Builder method: set the timeout of the status probe
    pub fn status_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = status_client(timeout)?;
        Ok(self)
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Count the matches of a lookup in the page, reporting malformed selectors
    /// instead of letting the query throw
    fn count_matches(&self, by: By, value: &str) -> DriverResult<usize> {
        let literal = serde_json::to_string(value).map_err(DriverError::command)?;
        let query = match by {
            By::XPath => format!(
                "document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
                literal
            ),
            _ => format!("document.querySelectorAll({}).length", literal),
        };
        let script = format!(
            "(function() {{ try {{ return String({}); }} catch (e) {{ return 'error:' + e.message; }} }})()",
            query
        );

        let result = self.tab.evaluate(&script, false).map_err(DriverError::command)?;
        let raw = result
            .value
            .and_then(|v| v.as_str().map(String::from))
            .ok_or_else(|| DriverError::command("Lookup query returned no value"))?;

        if let Some(reason) = raw.strip_prefix("error:") {
            return Err(DriverError::invalid_selector(by, value, reason.trim()));
        }

        raw.parse().map_err(DriverError::command)
    }
}

fn status_client(timeout: Duration) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .build()
        .map_err(|e| BrowserError::Config(format!("Failed to build status client: {}", e)))
}

/// Translate a lookup criterion into the CSS or XPath query run in the page
fn translate(by: By, value: &str) -> DriverResult<(By, String)> {
    match by {
        By::XPath => Ok((By::XPath, value.to_string())),
        By::Css => Ok((By::Css, value.to_string())),
        By::Id => Ok((By::Css, format!("[id={}]", css_string(value)))),
        By::Name => Ok((By::Css, format!("[name={}]", css_string(value)))),
        By::ClassName => {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(DriverError::invalid_selector(by, value, "compound class names are not permitted"));
            }
            Ok((By::Css, format!("[class~={}]", css_string(value))))
        }
        By::TagName => {
            if !is_tag_name(value) {
                return Err(DriverError::invalid_selector(by, value, "not a valid tag name"));
            }
            Ok((By::Css, value.to_string()))
        }
        By::LinkText => Ok((By::XPath, format!("//a[normalize-space()={}]", xpath_string(value.trim())))),
    }
}

fn css_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn xpath_string(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let parts: Vec<String> = value.split('\'').map(|p| format!("'{}'", p)).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

impl SessionAdapter for BrowserSession {
    type Element<'a> = ChromeElement<'a>;

    fn navigate(&self, uri: &str) -> DriverResult<()> {
        self.tab
            .navigate_to(uri)
            .map_err(|e| DriverError::command(format!("Failed to navigate to {}: {}", uri, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| DriverError::command(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    fn current_url(&self) -> DriverResult<String> {
        Ok(self.tab.get_url())
    }

    fn status_of(&self, uri: &str) -> DriverResult<String> {
        let response = self.http.get(uri).send().map_err(DriverError::command)?;
        Ok(response.status().as_u16().to_string())
    }

    fn find_elements(&self, by: By, value: &str) -> DriverResult<Vec<ChromeElement<'_>>> {
        let (kind, query) = translate(by, value)?;

        let matches = self.count_matches(kind, &query).map_err(|e| match e {
            DriverError::InvalidSelector { reason, .. } => DriverError::invalid_selector(by, value, reason),
            other => other,
        })?;
        if matches == 0 {
            return Ok(Vec::new());
        }

        let elements = match kind {
            By::XPath => self.tab.find_elements_by_xpath(&query),
            _ => self.tab.find_elements(&query),
        }
        .map_err(DriverError::command)?;

        log::debug!("{} [{}] matched {} element(s)", by, value, elements.len());

        Ok(elements.into_iter().map(|e| ChromeElement { inner: Rc::new(e) }).collect())
    }
}

/// A matched element in the session's tab
#[derive(Clone)]
pub struct ChromeElement<'a> {
    inner: Rc<headless_chrome::Element<'a>>,
}

impl ChromeElement<'_> {
    fn call_string(&self, function: &str, args: Vec<serde_json::Value>) -> DriverResult<Option<String>> {
        let result = self.inner.call_js_fn(function, args, false).map_err(DriverError::command)?;
        Ok(result.value.and_then(|v| match v {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }))
    }

    fn call_bool(&self, function: &str, args: Vec<serde_json::Value>) -> DriverResult<bool> {
        let result = self.inner.call_js_fn(function, args, false).map_err(DriverError::command)?;
        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

const TEXT_JS: &str = r#"function() {
    if (this.tagName === 'TEXTAREA') { return this.value; }
    return this.innerText === undefined ? this.textContent : this.innerText;
}"#;

const ATTRIBUTE_JS: &str = r#"function(name) {
    if (name === 'value' && 'value' in this) { return String(this.value); }
    const booleans = ['checked', 'selected', 'disabled', 'readonly', 'required', 'multiple'];
    if (booleans.includes(name)) {
        const prop = name === 'readonly' ? this.readOnly : this[name];
        return prop ? 'true' : null;
    }
    return this.getAttribute(name);
}"#;

const SELECTED_JS: &str = r#"function() {
    if (this.tagName === 'OPTION') { return this.selected; }
    return !!this.checked;
}"#;

const SELECTED_VALUES_JS: &str = r#"function() {
    if (!this.options) { return JSON.stringify([]); }
    return JSON.stringify(Array.from(this.options).filter(o => o.selected).map(o => o.value));
}"#;

const CLEAR_JS: &str = r#"function() {
    this.value = '';
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
}"#;

const SELECT_OPTION_JS: &str = r#"function(label) {
    const option = Array.from(this.options || []).find(o => o.text.trim() === label.trim());
    if (!option) { return false; }
    option.selected = true;
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}"#;

impl ElementHandle for ChromeElement<'_> {
    type Id = u32;

    fn identity(&self) -> u32 {
        self.inner.backend_node_id
    }

    fn tag_name(&self) -> DriverResult<String> {
        Ok(self.inner.tag_name.to_lowercase())
    }

    fn text(&self) -> DriverResult<String> {
        Ok(self.call_string(TEXT_JS, vec![])?.unwrap_or_default())
    }

    fn inner_html(&self) -> DriverResult<String> {
        Ok(self.call_string("function() { return this.innerHTML; }", vec![])?.unwrap_or_default())
    }

    fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        self.call_string(ATTRIBUTE_JS, vec![serde_json::json!(name)])
    }

    fn is_selected(&self) -> DriverResult<bool> {
        self.call_bool(SELECTED_JS, vec![])
    }

    fn is_enabled(&self) -> DriverResult<bool> {
        self.call_bool("function() { return !this.disabled; }", vec![])
    }

    fn selected_values(&self) -> DriverResult<Vec<String>> {
        let raw = self.call_string(SELECTED_VALUES_JS, vec![])?.unwrap_or_else(|| "[]".to_string());
        serde_json::from_str(&raw).map_err(DriverError::command)
    }

    fn click(&self) -> DriverResult<()> {
        self.inner.click().map_err(DriverError::command)?;
        Ok(())
    }

    fn set_value(&self, text: &str) -> DriverResult<()> {
        self.inner.click().map_err(DriverError::command)?;
        self.inner.type_into(text).map_err(DriverError::command)?;
        Ok(())
    }

    fn clear(&self) -> DriverResult<()> {
        self.inner.call_js_fn(CLEAR_JS, vec![], false).map_err(DriverError::command)?;
        Ok(())
    }

    fn select_option_by_label(&self, label: &str) -> DriverResult<()> {
        if self.call_bool(SELECT_OPTION_JS, vec![serde_json::json!(label)])? {
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
    fn test_translate_id_and_name() {
        assert_eq!(translate(By::Id, "email").unwrap(), (By::Css, "[id=\"email\"]".to_string()));
        assert_eq!(translate(By::Name, "user[name]").unwrap(), (By::Css, "[name=\"user[name]\"]".to_string()));
    }

    #[test]
    fn test_translate_rejects_compound_class() {
        let err = translate(By::ClassName, "btn primary").unwrap_err();
        assert!(matches!(err, DriverError::InvalidSelector { by: By::ClassName, .. }));

        assert_eq!(translate(By::ClassName, "btn").unwrap(), (By::Css, "[class~=\"btn\"]".to_string()));
    }

    #[test]
    fn test_translate_rejects_compound_tag_name() {
        assert_eq!(translate(By::TagName, "span").unwrap(), (By::Css, "span".to_string()));

        for value in ["nav a", "input[type=x]", ""] {
            let err = translate(By::TagName, value).unwrap_err();
            assert!(matches!(err, DriverError::InvalidSelector { by: By::TagName, .. }));
        }
    }

    #[test]
    fn test_translate_link_text() {
        assert_eq!(translate(By::LinkText, " Home ").unwrap(), (By::XPath, "//a[normalize-space()='Home']".to_string()));
        assert_eq!(
            translate(By::LinkText, "Bob's page").unwrap(),
            (By::XPath, "//a[normalize-space()=\"Bob's page\"]".to_string())
        );
    }

    #[test]
    fn test_xpath_string_with_both_quotes() {
        assert_eq!(xpath_string(r#"a'b"c"#), r#"concat('a', "'", 'b"c')"#);
    }

    // Integration tests (require Chrome to be installed)
    #[test]
    #[ignore] // Ignore by default, run with: cargo test -- --ignored
    fn test_launch_browser() {
        let result = BrowserSession::launch(LaunchOptions::new().headless(true));
        assert!(result.is_ok());
    }

    #[test]
    #[ignore]
    fn test_find_elements_by_criteria() {
        let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
        session
            .navigate("data:text/html,<div id='a' class='x y'><a href='/h'>Home</a></div>")
            .expect("Failed to navigate");

        assert_eq!(session.find_elements(By::Id, "a").unwrap().len(), 1);
        assert_eq!(session.find_elements(By::ClassName, "y").unwrap().len(), 1);
        assert_eq!(session.find_elements(By::LinkText, "Home").unwrap().len(), 1);
        assert!(session.find_elements(By::Css, "#missing").unwrap().is_empty());
        assert!(session.find_elements(By::Css, "#a[").is_err());
    }
}
