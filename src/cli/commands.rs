use std::path::Path;

use tracing::info;

use crate::check::validator::{FieldError, validate_step, validate_values};
use crate::cli::config::{AppConfig, build_extract_options, resolve_output};
use crate::error::SchemaError;
use crate::extract::extractor::{Extraction, ExtractOptions, VisibilityMap, extract_with};
use crate::output::writer::{
    load_schema, load_values, load_visibility, resolve_output_path, schema_json, write_schema,
};
use crate::schema::identifier::to_camel;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::ExtractionEvent;

// ============================================================================
// extract subcommand
// ============================================================================

pub struct ExtractArgs<'a> {
    pub html: &'a str,
    pub visibility: Option<&'a str>,
    pub output: Option<&'a str>,
    pub stdout: bool,
    pub trace: Option<&'a str>,
}

pub fn cmd_extract(args: &ExtractArgs<'_>, config: &AppConfig) -> Result<Extraction, SchemaError> {
    if args.stdout && args.output.is_some() {
        return Err(SchemaError::Config("--stdout and --output cannot be combined".into()));
    }

    let html = std::fs::read_to_string(args.html).map_err(|e| SchemaError::io(args.html, e))?;
    let visibility = args
        .visibility
        .map(|p| load_visibility(Path::new(p)))
        .transpose()?;

    let options = build_extract_options(&config.extract);
    let trace_path = args.trace.or(config.output.trace.as_deref());
    let tracer = match trace_path {
        Some(p) => TraceLogger::new(Path::new(p)),
        None => TraceLogger::disabled(),
    };

    if args.stdout {
        let extraction = run_extraction(&html, visibility.as_ref(), &options, None, &tracer)?;
        println!("{}", schema_json(&extraction.fields)?);
        return Ok(extraction);
    }

    let cwd = std::env::current_dir().map_err(|e| SchemaError::io(".", e))?;
    let output = resolve_output_path(&cwd, Path::new(resolve_output(args.output, &config.output)));
    run_extraction(&html, visibility.as_ref(), &options, Some(&output), &tracer)
}

/// Extract, optionally write the schema, and record one trace event.
pub fn run_extraction(
    html: &str,
    visibility: Option<&VisibilityMap>,
    options: &ExtractOptions,
    output: Option<&Path>,
    tracer: &TraceLogger,
) -> Result<Extraction, SchemaError> {
    let extraction = extract_with(html, visibility, options);
    info!(
        fields = extraction.fields.len(),
        containers = extraction.containers,
        skipped_hidden = extraction.skipped_hidden,
        "extraction complete"
    );

    let mut event = ExtractionEvent::now(html, &extraction);
    if let Some(path) = output {
        write_schema(path, &extraction.fields)?;
        event = event.with_output(path.display());
    }
    tracer.log(&event);

    Ok(extraction)
}

// ============================================================================
// validate subcommand
// ============================================================================

/// Validate a values file and return the errors found.
pub fn cmd_validate(
    schema: &str,
    values: &str,
    step: Option<u32>,
) -> Result<Vec<FieldError>, SchemaError> {
    let fields = load_schema(Path::new(schema))?;
    let values = load_values(Path::new(values))?;

    let errors = match step {
        Some(s) => validate_step(&fields, &values, s),
        None => validate_values(&fields, &values),
    };

    for e in &errors {
        println!("{}: {}", e.name, e.message);
    }
    if errors.is_empty() {
        println!("All {} fields valid", fields.len());
    }

    Ok(errors)
}

// ============================================================================
// normalize subcommand
// ============================================================================

pub fn cmd_normalize(text: &str) -> String {
    to_camel(text)
}
