use scraper::ElementRef;

use crate::extract::document::{Document, attr};

// ============================================================================
// Container discovery
// ============================================================================

/// How a container was found. Recorded for tracing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Element whose id or class carries a step token.
    Step,
    /// A `<form>` element (no step containers present).
    Form,
    /// The whole document (no step containers and no forms).
    Document,
}

/// A subtree presumed to hold one logical step of a multi-part form.
pub struct Container<'a> {
    pub element: ElementRef<'a>,
    pub kind: ContainerKind,
    pub step: u32,
}

/// Locate containers in document order.
///
/// Step containers win; otherwise every `<form>`; otherwise the whole
/// document. Step containers may nest, in which case their controls are
/// visited once per enclosing container.
pub fn discover<'a>(
    doc: &'a Document,
    tokens: &[String],
    step_one: &[String],
    step_two: &[String],
) -> Vec<Container<'a>> {
    let step_containers: Vec<ElementRef<'a>> = doc
        .elements()
        .filter(|el| has_step_signature(el, tokens))
        .collect();

    let (elements, kind) = if !step_containers.is_empty() {
        (step_containers, ContainerKind::Step)
    } else {
        let forms: Vec<ElementRef<'a>> = doc.elements_named("form").collect();
        if forms.is_empty() {
            (vec![doc.root()], ContainerKind::Document)
        } else {
            (forms, ContainerKind::Form)
        }
    };

    elements
        .into_iter()
        .map(|element| Container {
            step: guess_step(&element, step_one, step_two),
            element,
            kind,
        })
        .collect()
}

/// True when the element's id, or any of its class names, contains one of
/// the tokens (case-insensitive).
pub fn has_step_signature(el: &ElementRef<'_>, tokens: &[String]) -> bool {
    let matches = |value: &str| {
        let lower = value.to_lowercase();
        tokens.iter().any(|t| lower.contains(&t.to_lowercase()))
    };

    let value = el.value();
    attr(value, "id").is_some_and(matches) || value.classes().any(matches)
}

// ============================================================================
// Step guess
// ============================================================================

/// Coarse step for every field in a container, from keywords in its text.
///
/// Step-one keywords are checked first, so a container mentioning both
/// groups lands on step 1. No keyword at all also means step 1.
pub fn guess_step(container: &ElementRef<'_>, step_one: &[String], step_two: &[String]) -> u32 {
    let text = container.text().collect::<String>().to_uppercase();
    let mentions = |keywords: &[String]| keywords.iter().any(|k| text.contains(&k.to_uppercase()));

    if mentions(step_one) {
        1
    } else if mentions(step_two) {
        2
    } else {
        1
    }
}
