use std::collections::HashMap;

use scraper::ElementRef;
use tracing::debug;

use crate::extract::containers::{Container, ContainerKind, discover};
use crate::extract::document::{Document, LabelIndex, attr, descendant_elements, raw_attributes};
use crate::extract::label::{LabelContext, LabelSource, resolve_label};
use crate::extract::rules::{RuleInput, infer_validation};
use crate::schema::field_model::{FieldDescriptor, SelectOption};
use crate::schema::identifier::to_camel;

/// Visibility of controls keyed by id (or name when the control has no id).
pub type VisibilityMap = HashMap<String, bool>;

// ============================================================================
// Extraction options
// ============================================================================

/// Keyword sets driving container discovery and the step guess.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Id/class fragments marking a step container.
    pub container_tokens: Vec<String>,
    /// Container text keywords that put its fields on step 1.
    pub step_one_keywords: Vec<String>,
    /// Container text keywords that put its fields on step 2.
    pub step_two_keywords: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            container_tokens: vec!["step1".into(), "step2".into()],
            step_one_keywords: vec!["AADHAAR".into(), "OTP".into()],
            step_two_keywords: vec!["PAN".into()],
        }
    }
}

/// Result of one extraction pass, with the counters the trace records.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub fields: Vec<FieldDescriptor>,
    pub containers: usize,
    pub container_kind: Option<ContainerKind>,
    pub skipped_hidden: usize,
}

// ============================================================================
// Entry points
// ============================================================================

/// Extract the field schema of a rendered HTML document with default options.
pub fn extract(html: &str, visibility: Option<&VisibilityMap>) -> Vec<FieldDescriptor> {
    extract_with(html, visibility, &ExtractOptions::default()).fields
}

/// Extract the field schema, reporting container and skip counts.
///
/// Descriptors follow container-then-element traversal. A control inside
/// two overlapping containers is emitted once per container.
pub fn extract_with(
    html: &str,
    visibility: Option<&VisibilityMap>,
    options: &ExtractOptions,
) -> Extraction {
    let doc = Document::parse(html);
    let containers = discover(
        &doc,
        &options.container_tokens,
        &options.step_one_keywords,
        &options.step_two_keywords,
    );

    let labels = LabelIndex::build(&doc);
    let mut fields = Vec::new();
    let mut skipped_hidden = 0;

    for container in &containers {
        debug!(kind = ?container.kind, step = container.step, "scanning container");
        for el in controls(container) {
            match describe(&labels, el, container.step, visibility) {
                Some(field) => fields.push(field),
                None => skipped_hidden += 1,
            }
        }
    }

    Extraction {
        fields,
        containers: containers.len(),
        container_kind: containers.first().map(|c| c.kind),
        skipped_hidden,
    }
}

// ============================================================================
// Per-control classification
// ============================================================================

fn controls<'a>(container: &Container<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    descendant_elements(container.element)
        .filter(|el| matches!(el.value().name(), "input" | "select" | "textarea"))
}

/// Control type vocabulary: the input's declared type, or the tag name.
pub fn control_type(el: &ElementRef<'_>) -> String {
    match el.value().name() {
        "input" => attr(el.value(), "type")
            .map(|t| t.to_lowercase())
            .unwrap_or_else(|| "text".to_string()),
        "select" => "select".to_string(),
        "textarea" => "textarea".to_string(),
        _ => "text".to_string(),
    }
}

/// `name`, then `id`, then an identifier built from title and placeholder.
pub fn resolve_name(el: &ElementRef<'_>) -> String {
    let value = el.value();
    if let Some(name) = attr(value, "name").or_else(|| attr(value, "id")) {
        return name.to_string();
    }
    let title = attr(value, "title").unwrap_or("");
    let placeholder = attr(value, "placeholder").unwrap_or("");
    to_camel(&format!("{} {}", title, placeholder))
}

/// `None` for hidden controls, which are never part of the schema.
fn describe(
    labels: &LabelIndex<'_>,
    el: ElementRef<'_>,
    step: u32,
    visibility: Option<&VisibilityMap>,
) -> Option<FieldDescriptor> {
    let control_type = control_type(&el);
    if control_type == "hidden" {
        return None;
    }

    let value = el.value();
    let id = attr(value, "id");
    let name = resolve_name(&el);

    let ctx = LabelContext {
        labels,
        element: el,
        id,
        control_type: &control_type,
    };
    let (label, source) = resolve_label(&ctx, &name);
    let found_label = (source != LabelSource::Name).then_some(label.as_str());

    let validation = infer_validation(&RuleInput {
        pattern: attr(value, "pattern"),
        min_length: attr(value, "minlength"),
        max_length: attr(value, "maxlength"),
        label: found_label,
        name: &name,
    });

    let options = (value.name() == "select").then(|| select_options(&el));

    let key = id.unwrap_or(name.as_str());
    let visible = visibility
        .and_then(|map| map.get(key).copied())
        .unwrap_or(true);

    debug!(
        name = %name,
        label_source = ?source,
        control_type = %control_type,
        has_validation = validation.is_some(),
        "described field"
    );

    Some(FieldDescriptor {
        id: id.map(str::to_string),
        label,
        step,
        placeholder: attr(value, "placeholder").unwrap_or("").to_string(),
        required: value.attr("required").is_some(),
        validation,
        options,
        visible,
        raw_attributes: raw_attributes(value),
        r#type: control_type,
        name,
    })
}

/// One entry per `<option>`, in native order.
pub fn select_options(select: &ElementRef<'_>) -> Vec<SelectOption> {
    descendant_elements(*select)
        .filter(|el| el.value().name() == "option")
        .map(|opt| SelectOption {
            value: opt.value().attr("value").unwrap_or("").to_string(),
            label: opt.text().collect::<String>().trim().to_string(),
        })
        .collect()
}
