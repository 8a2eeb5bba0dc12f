use scraper::ElementRef;

use crate::extract::document::{LabelIndex, text_content};

// ============================================================================
// Label resolution: ordered strategies, first non-empty result wins
// ============================================================================

/// Which strategy produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    ForAttribute,
    WrappingLabel,
    PrecedingLabel,
    OwnText,
    Name,
}

/// Everything a label strategy may look at.
pub struct LabelContext<'a, 'd> {
    pub labels: &'d LabelIndex<'d>,
    pub element: ElementRef<'d>,
    pub id: Option<&'a str>,
    pub control_type: &'a str,
}

type LabelStrategy = for<'a, 'd> fn(&LabelContext<'a, 'd>) -> Option<String>;

/// Strategies in priority order. The proximity match runs only after both
/// structural matches fail; it can attach an unrelated label on reordered
/// markup.
const STRATEGIES: [(LabelSource, LabelStrategy); 4] = [
    (LabelSource::ForAttribute, label_for_id),
    (LabelSource::WrappingLabel, wrapping_label),
    (LabelSource::PrecedingLabel, preceding_label),
    (LabelSource::OwnText, own_text),
];

/// Resolve the label for a control, falling back to its resolved `name`.
pub fn resolve_label(ctx: &LabelContext<'_, '_>, name: &str) -> (String, LabelSource) {
    STRATEGIES
        .iter()
        .find_map(|(source, strategy)| strategy(ctx).map(|label| (label, *source)))
        .unwrap_or_else(|| (name.to_string(), LabelSource::Name))
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

/// `<label for="...">` matching the control's id; the first such label counts.
pub fn label_for_id(ctx: &LabelContext<'_, '_>) -> Option<String> {
    let id = ctx.id?;
    let label = ctx.labels.label_for(id)?;
    non_empty(text_content(&label))
}

/// Nearest ancestor `<label>` wrapping the control.
pub fn wrapping_label(ctx: &LabelContext<'_, '_>) -> Option<String> {
    let label = ctx
        .element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "label")?;
    non_empty(text_content(&label))
}

/// Nearest `<label>` opening anywhere before the control.
pub fn preceding_label(ctx: &LabelContext<'_, '_>) -> Option<String> {
    let label = ctx.labels.preceding(&ctx.element)?;
    non_empty(text_content(&label))
}

/// Text content of button-like and checkable controls.
///
/// A void `<input>` has no text content, so its `value` is never used as
/// a caption; such controls fall through to the name.
pub fn own_text(ctx: &LabelContext<'_, '_>) -> Option<String> {
    match ctx.control_type {
        "submit" | "button" | "reset" | "checkbox" | "radio" => {
            non_empty(text_content(&ctx.element))
        }
        _ => None,
    }
}
