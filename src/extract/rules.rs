use crate::schema::field_model::Validation;

// ============================================================================
// Validation inference
// ============================================================================

pub const AADHAAR_PATTERN: &str = r"^\d{12}$";
pub const AADHAAR_MESSAGE: &str = "Aadhaar must be exactly 12 digits";
pub const PAN_PATTERN: &str = r"^[A-Za-z]{5}[0-9]{4}[A-Za-z]{1}$";
pub const PAN_MESSAGE: &str = "PAN must be in the format ABCDE1234F";
pub const NATIVE_MESSAGE: &str = "Invalid format";
pub const DEFAULT_MESSAGE: &str = "Invalid value";

/// Inputs the validation rules read from a control.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// Native `pattern` attribute, if non-empty.
    pub pattern: Option<&'a str>,
    pub min_length: Option<&'a str>,
    pub max_length: Option<&'a str>,
    /// Label text found by a label strategy, before the name fallback.
    pub label: Option<&'a str>,
    pub name: &'a str,
}

/// A pattern together with the message shown when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pub pattern: String,
    pub message: String,
}

type HeuristicRule = fn(&RuleInput<'_>) -> Option<PatternRule>;

/// Keyword rules, evaluated in order; a later match replaces an earlier one,
/// so a caption naming both Aadhaar and PAN ends up with the PAN rule.
const HEURISTICS: [HeuristicRule; 2] = [aadhaar_rule, pan_rule];

/// Native pattern if declared, otherwise the last matching keyword rule.
pub fn infer_pattern(input: &RuleInput<'_>) -> Option<PatternRule> {
    native_rule(input).or_else(|| HEURISTICS.iter().filter_map(|rule| rule(input)).last())
}

/// Build the validation object, or `None` when nothing constrains the field.
///
/// Length bounds that do not parse as integers are dropped and do not on
/// their own produce a validation object.
pub fn infer_validation(input: &RuleInput<'_>) -> Option<Validation> {
    let rule = infer_pattern(input);
    let min_length = input.min_length.and_then(parse_length);
    let max_length = input.max_length.and_then(parse_length);

    if rule.is_none() && min_length.is_none() && max_length.is_none() {
        return None;
    }

    let (pattern, message) = match rule {
        Some(r) => (r.pattern, r.message),
        None => (String::new(), DEFAULT_MESSAGE.to_string()),
    };

    Some(Validation {
        pattern,
        message,
        min_length,
        max_length,
    })
}

fn parse_length(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn caption_upper(input: &RuleInput<'_>) -> String {
    input.label.unwrap_or(input.name).to_uppercase()
}

pub fn native_rule(input: &RuleInput<'_>) -> Option<PatternRule> {
    input.pattern.map(|p| PatternRule {
        pattern: p.to_string(),
        message: NATIVE_MESSAGE.to_string(),
    })
}

pub fn aadhaar_rule(input: &RuleInput<'_>) -> Option<PatternRule> {
    let caption = caption_upper(input);
    let hit = caption.contains("AADHAAR")
        || caption.contains("AADHAR")
        || input.name.to_lowercase().starts_with("aadhaar");

    hit.then(|| PatternRule {
        pattern: AADHAAR_PATTERN.to_string(),
        message: AADHAAR_MESSAGE.to_string(),
    })
}

pub fn pan_rule(input: &RuleInput<'_>) -> Option<PatternRule> {
    let hit = caption_upper(input).contains("PAN") || input.name.to_lowercase().starts_with("pan");

    hit.then(|| PatternRule {
        pattern: PAN_PATTERN.to_string(),
        message: PAN_MESSAGE.to_string(),
    })
}
