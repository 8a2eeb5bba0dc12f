use std::collections::{BTreeMap, HashMap};

use scraper::{ElementRef, Html, node::Element};

// ============================================================================
// Parsed document and element helpers
// ============================================================================

/// A rendered HTML document parsed leniently.
///
/// html5ever recovers from malformed markup, so any input string yields a
/// tree; broken fragments simply contribute fewer elements.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// All elements in document order, the root included.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Elements with the given tag name, in document order.
    pub fn elements_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.elements().filter(move |e| e.value().name() == tag)
    }
}

// ============================================================================
// Label index
// ============================================================================

/// Labels of a document, indexed once so per-control lookups stay constant time.
pub struct LabelIndex<'d> {
    /// First `<label for=...>` per target id.
    by_for: HashMap<&'d str, ElementRef<'d>>,
    /// Nearest `<label>` opening before each control, keyed by element address.
    preceding: HashMap<*const Element, ElementRef<'d>>,
}

impl<'d> LabelIndex<'d> {
    /// Single pre-order pass over the document.
    pub fn build(doc: &'d Document) -> Self {
        let mut by_for = HashMap::new();
        let mut preceding = HashMap::new();
        let mut last_label = None;

        for el in doc.elements() {
            match el.value().name() {
                "label" => {
                    if let Some(target) = attr(el.value(), "for") {
                        by_for.entry(target).or_insert(el);
                    }
                    last_label = Some(el);
                }
                "input" | "select" | "textarea" => {
                    if let Some(label) = last_label {
                        preceding.insert(el.value() as *const Element, label);
                    }
                }
                _ => {}
            }
        }

        Self { by_for, preceding }
    }

    pub fn label_for(&self, id: &str) -> Option<ElementRef<'d>> {
        self.by_for.get(id).copied()
    }

    /// Last label that opens before `control` in document order.
    pub fn preceding(&self, control: &ElementRef<'_>) -> Option<ElementRef<'d>> {
        self.preceding.get(&(control.value() as *const Element)).copied()
    }
}

/// Attribute value, treating an empty string the same as a missing attribute.
pub fn attr<'a>(el: &'a Element, name: &str) -> Option<&'a str> {
    el.attr(name).filter(|v| !v.is_empty())
}

/// Concatenated descendant text, trimmed.
pub fn text_content(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Every attribute of the element, keyed by name.
pub fn raw_attributes(el: &Element) -> BTreeMap<String, String> {
    el.attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Descendant elements of `el` (excluding `el` itself) in document order.
pub fn descendant_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}
