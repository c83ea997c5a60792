//! JavaScript snippets injected into the listing page during browser-driven
//! discovery.
//!
//! Each script is a template: `__SELECTOR__` / `__SELECTORS__` placeholders
//! are substituted with JSON-encoded values before evaluation, so arbitrary
//! selector strings cannot break out of the script.

/// Collect absolute http(s) hrefs of all elements matching the detail-link
/// selector. Elements without an href or with unparseable hrefs are skipped.
pub const COLLECT_ANCHORS_SCRIPT: &str = r#"
    (() => {
        const selector = __SELECTOR__;
        const out = [];
        for (const el of document.querySelectorAll(selector)) {
            const href = el.getAttribute('href');
            if (!href) continue;
            try {
                const absolute = new URL(href, window.location.href);
                if (absolute.protocol === 'http:' || absolute.protocol === 'https:') {
                    out.push(absolute.href);
                }
            } catch (e) {
                continue;
            }
        }
        return out;
    })()
"#;

/// Find the first visible, enabled "next" control from the ordered candidate
/// list and scroll it into view. Returns true if one was found.
pub const SCROLL_NEXT_INTO_VIEW_SCRIPT: &str = r#"
    (() => {
        const candidates = __SELECTORS__;
        const usable = (el) => {
            if (!el) return false;
            const style = window.getComputedStyle(el);
            if (style.display === 'none' || style.visibility === 'hidden') return false;
            const rect = el.getBoundingClientRect();
            if (rect.width === 0 && rect.height === 0) return false;
            return !el.disabled
                && el.getAttribute('aria-disabled') !== 'true'
                && !el.classList.contains('disabled');
        };
        for (const selector of candidates) {
            let control = null;
            try {
                control = document.querySelector(selector);
            } catch (e) {
                continue;
            }
            if (usable(control)) {
                control.scrollIntoView({behavior: 'smooth', block: 'center'});
                return true;
            }
        }
        return false;
    })()
"#;

/// Click the first usable "next" control. Returns true on click.
///
/// Re-resolves the control rather than holding a reference across the scroll
/// settle delay; listings re-render their pagination widgets freely.
pub const CLICK_NEXT_SCRIPT: &str = r#"
    (() => {
        const candidates = __SELECTORS__;
        const usable = (el) => {
            if (!el) return false;
            const style = window.getComputedStyle(el);
            if (style.display === 'none' || style.visibility === 'hidden') return false;
            return !el.disabled
                && el.getAttribute('aria-disabled') !== 'true'
                && !el.classList.contains('disabled');
        };
        for (const selector of candidates) {
            let control = null;
            try {
                control = document.querySelector(selector);
            } catch (e) {
                continue;
            }
            if (usable(control)) {
                control.click();
                return true;
            }
        }
        return false;
    })()
"#;

/// Substitute the detail-link selector into a script template.
#[must_use]
pub fn with_selector(template: &str, selector: &str) -> String {
    let encoded = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
    template.replace("__SELECTOR__", &encoded)
}

/// Substitute the next-control candidate list into a script template.
#[must_use]
pub fn with_selectors(template: &str, selectors: &[String]) -> String {
    let encoded = serde_json::to_string(selectors).unwrap_or_else(|_| "[]".to_string());
    template.replace("__SELECTORS__", &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_substitution_is_json_escaped() {
        let script = with_selector(COLLECT_ANCHORS_SCRIPT, "a[title=\"x\"]");
        assert!(script.contains(r#"const selector = "a[title=\"x\"]";"#));
        assert!(!script.contains("__SELECTOR__"));
    }

    #[test]
    fn selector_list_substitution() {
        let selectors = vec!["a.next".to_string(), "[aria-label='Next']".to_string()];
        let script = with_selectors(CLICK_NEXT_SCRIPT, &selectors);
        assert!(script.contains(r#"["a.next","[aria-label='Next']"]"#));
        assert!(!script.contains("__SELECTORS__"));
    }
}
