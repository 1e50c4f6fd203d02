//! A minimal element tree the widget attaches to.
//!
//! Containers hold sibling panel elements; each panel holds an inner content
//! element. Selectors only ever match direct children, so `section` and
//! `> section` are equivalent.

use crate::error::FlipError;

/// One node of the element tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: Vec<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_text<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Direct children matching `selector`, in document order.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| selector.matches(child))
    }

    /// Text of this element followed by the text of its descendants.
    pub fn text_content(&self) -> Vec<String> {
        let mut lines = self.text.clone();
        for child in &self.children {
            lines.extend(child.text_content());
        }
        lines
    }
}

/// A `tag`, `.class` or `tag.class` selector over direct children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    tag: Option<String>,
    class: Option<String>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, FlipError> {
        let invalid = || FlipError::InvalidSelector {
            selector: source.to_string(),
        };
        let body = source.trim();
        let body = body.strip_prefix('>').unwrap_or(body).trim();
        if body.is_empty() || body.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let (tag, class) = match body.split_once('.') {
            Some((tag, class)) => (tag, Some(class)),
            None => (body, None),
        };
        let valid_ident =
            |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !tag.is_empty() && !valid_ident(tag) {
            return Err(invalid());
        }
        if let Some(class) = class {
            if !valid_ident(class) {
                return Err(invalid());
            }
        }

        Ok(Selector {
            source: source.to_string(),
            tag: (!tag.is_empty()).then(|| tag.to_string()),
            class: class.map(str::to_string),
        })
    }

    pub fn matches(&self, element: &Element) -> bool {
        let tag_ok = self.tag.as_deref().map_or(true, |tag| element.tag == tag);
        let class_ok = self
            .class
            .as_deref()
            .map_or(true, |class| element.has_class(class));
        tag_ok && class_ok
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Builds a container from a plain text deck.
///
/// Panels are separated by lines consisting solely of `---`. Each panel
/// becomes `<section><div class="inner">...</div></section>`.
pub fn parse_deck(container_id: &str, source: &str) -> Element {
    let mut container = Element::new("div").with_id(container_id).with_class("board");
    let mut lines: Vec<&str> = Vec::new();

    let flush = |lines: &mut Vec<&str>, container: &mut Element| {
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        let start = lines.iter().take_while(|l| l.trim().is_empty()).count();
        if start < lines.len() {
            let inner = Element::new("div")
                .with_class("inner")
                .with_text(lines[start..].iter().copied());
            container.children.push(Element::new("section").with_child(inner));
        }
        lines.clear();
    };

    for line in source.lines() {
        if line.trim_end() == "---" {
            flush(&mut lines, &mut container);
        } else {
            lines.push(line.trim_end());
        }
    }
    flush(&mut lines, &mut container);
    container
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_forms() {
        let section = Element::new("section").with_class("page");
        assert!(Selector::parse("> section").unwrap().matches(&section));
        assert!(Selector::parse(".page").unwrap().matches(&section));
        assert!(Selector::parse("section.page").unwrap().matches(&section));
        assert!(!Selector::parse("div.page").unwrap().matches(&section));
        assert!(!Selector::parse("> .inner").unwrap().matches(&section));
    }

    #[test]
    fn rejects_malformed_selectors() {
        for bad in ["", ">", "section div", "a.", ".x.y!"] {
            assert!(
                matches!(Selector::parse(bad), Err(FlipError::InvalidSelector { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn deck_splits_on_rulers() {
        let deck = parse_deck("board", "Alpha\nfirst\n---\n\nBeta\n\n---\nGamma\n---\n");
        assert_eq!(deck.id.as_deref(), Some("board"));
        assert_eq!(deck.children.len(), 3);
        assert_eq!(deck.children[1].text_content(), vec!["Beta"]);
        assert!(deck.children[0].children[0].has_class("inner"));
    }
}
