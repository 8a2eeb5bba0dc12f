use std::collections::HashMap;
use std::path::Path;

use clap::Parser;
use form_schema::SchemaError;
use form_schema::cli::commands::{ExtractArgs, cmd_extract, cmd_normalize, cmd_validate, run_extraction};
use form_schema::cli::config::{
    AppConfig, Cli, Commands, DEFAULT_OUTPUT_PATH, build_extract_options, load_config, log_level,
    resolve_output,
};
use form_schema::extract::extractor::ExtractOptions;
use form_schema::output::writer::{load_schema, parse_visibility, resolve_output_path, write_schema};
use form_schema::trace::logger::TraceLogger;
use form_schema::trace::trace::{ExtractionEvent, document_fingerprint};

const FORM: &str = r#"
<html><body>
  <div id="step1">
    <p>Aadhaar OTP</p>
    <label for="aadhaar">Aadhaar Number</label>
    <input id="aadhaar" name="aadhaarNumber" required>
    <input type="hidden" name="__EVENTTARGET">
  </div>
  <div id="step2">
    <p>PAN</p>
    <label for="pan">PAN</label>
    <input id="pan" name="pan">
  </div>
</body></html>
"#;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_extract_minimal() {
    let cli = Cli::parse_from(["form-schema", "extract", "--html", "page.html"]);
    match cli.command {
        Commands::Extract {
            html,
            visibility,
            output,
            stdout,
            trace,
        } => {
            assert_eq!(html, "page.html");
            assert!(visibility.is_none());
            assert!(output.is_none());
            assert!(!stdout);
            assert!(trace.is_none());
        }
        _ => panic!("Expected Extract command"),
    }
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parse_extract_all_args() {
    let cli = Cli::parse_from([
        "form-schema",
        "-vv",
        "extract",
        "--html",
        "page.html",
        "--visibility",
        "vis.json",
        "-o",
        "out/schema.json",
        "--stdout",
        "--trace",
        "trace.jsonl",
        "--config",
        "custom.yaml",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::Extract {
            visibility,
            output,
            stdout,
            trace,
            ..
        } => {
            assert_eq!(visibility.as_deref(), Some("vis.json"));
            assert_eq!(output.as_deref(), Some("out/schema.json"));
            assert!(stdout);
            assert_eq!(trace.as_deref(), Some("trace.jsonl"));
        }
        _ => panic!("Expected Extract command"),
    }
}

#[test]
fn cli_parse_validate_with_step() {
    let cli = Cli::parse_from([
        "form-schema",
        "validate",
        "--schema",
        "schema.json",
        "--values",
        "values.json",
        "--step",
        "2",
    ]);
    match cli.command {
        Commands::Validate { schema, values, step } => {
            assert_eq!(schema, "schema.json");
            assert_eq!(values, "values.json");
            assert_eq!(step, Some(2));
        }
        _ => panic!("Expected Validate command"),
    }
}

#[test]
fn cli_parse_normalize() {
    let cli = Cli::parse_from(["form-schema", "normalize", "Name of Entrepreneur"]);
    match cli.command {
        Commands::Normalize { text } => assert_eq!(cmd_normalize(&text), "nameOfEntrepreneur"),
        _ => panic!("Expected Normalize command"),
    }
}

#[test]
fn cli_rejects_missing_html() {
    assert!(Cli::try_parse_from(["form-schema", "extract"]).is_err());
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn load_config_missing_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/form-schema.yaml"));
    assert_eq!(config.output.path, DEFAULT_OUTPUT_PATH);
    assert!(config.output.trace.is_none());
    assert_eq!(build_extract_options(&config.extract), ExtractOptions::default());
}

#[test]
fn load_config_partial_yaml_fills_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("form-schema.yaml");
    std::fs::write(
        &path,
        "extract:\n  container_tokens: [\"wizard\"]\noutput:\n  trace: run.jsonl\n",
    )
    .expect("write config");

    let config = load_config(path.to_str());
    assert_eq!(config.extract.container_tokens, vec!["wizard".to_string()]);
    assert_eq!(config.extract.step_two_keywords, vec!["PAN".to_string()]);
    assert_eq!(config.output.path, DEFAULT_OUTPUT_PATH);
    assert_eq!(config.output.trace.as_deref(), Some("run.jsonl"));
}

#[test]
fn load_config_malformed_yaml_gives_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "extract: [this is: not valid").expect("write config");

    let config = load_config(path.to_str());
    assert_eq!(config.output.path, DEFAULT_OUTPUT_PATH);
}

#[test]
fn cli_output_overrides_config() {
    let config = AppConfig::default();
    assert_eq!(resolve_output(Some("mine.json"), &config.output), "mine.json");
    assert_eq!(resolve_output(None, &config.output), DEFAULT_OUTPUT_PATH);
}

#[test]
fn log_level_from_verbosity() {
    assert_eq!(log_level(0), "warn");
    assert_eq!(log_level(1), "info");
    assert_eq!(log_level(2), "debug");
    assert_eq!(log_level(7), "trace");
}

// ============================================================================
// Output and trace
// ============================================================================

#[test]
fn relative_output_resolves_against_base() {
    let base = Path::new("/work");
    assert_eq!(
        resolve_output_path(base, Path::new("backend/schema/formSchema.json")),
        Path::new("/work/backend/schema/formSchema.json")
    );
    assert_eq!(resolve_output_path(base, Path::new("/abs/x.json")), Path::new("/abs/x.json"));
}

#[test]
fn run_extraction_writes_schema_and_trace() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("backend").join("schema").join("formSchema.json");
    let trace_path = dir.path().join("trace.jsonl");
    let tracer = TraceLogger::new(&trace_path);
    assert!(tracer.is_enabled());

    let visibility = HashMap::from([("pan".to_string(), false)]);
    let extraction = run_extraction(
        FORM,
        Some(&visibility),
        &ExtractOptions::default(),
        Some(&output),
        &tracer,
    )
    .expect("extraction");

    assert_eq!(extraction.fields.len(), 2);
    assert_eq!(extraction.skipped_hidden, 1);

    let written = std::fs::read_to_string(&output).expect("schema written");
    assert!(written.starts_with("[\n  {\n    \"name\": \"aadhaarNumber\""), "{}", written);

    let loaded = load_schema(&output).expect("schema loads");
    assert_eq!(loaded, extraction.fields);
    assert_eq!(loaded[0].step, 1);
    assert_eq!(loaded[1].step, 2);
    assert!(!loaded[1].visible);

    let trace = std::fs::read_to_string(&trace_path).expect("trace written");
    let lines: Vec<&str> = trace.lines().collect();
    assert_eq!(lines.len(), 1);
    let event: serde_json::Value = serde_json::from_str(lines[0]).expect("trace json");
    assert_eq!(event["fields"], 2);
    assert_eq!(event["skipped_hidden"], 1);
    assert_eq!(event["hidden_by_layout"], 1);
    assert_eq!(event["container_kind"], "Step");
    assert_eq!(event["fields_per_step"]["1"], 1);
    assert_eq!(event["fields_per_step"]["2"], 1);
    assert_eq!(event["document"], document_fingerprint(FORM));
}

#[test]
fn trace_logger_appends_events() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("t.jsonl");
    let tracer = TraceLogger::new(&path);
    let extraction = form_schema::extract_with(FORM, None, &ExtractOptions::default());

    tracer.log(&ExtractionEvent::now(FORM, &extraction));
    tracer.log(&ExtractionEvent::now(FORM, &extraction).with_output("x.json"));

    let content = std::fs::read_to_string(&path).expect("trace");
    assert_eq!(content.lines().count(), 2);
    assert!(content.lines().nth(1).is_some_and(|l| l.contains("\"output\":\"x.json\"")));
}

#[test]
fn unopenable_trace_file_disables_tracing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let tracer = TraceLogger::new(&dir.path().join("missing").join("t.jsonl"));
    assert!(!tracer.is_enabled());
    assert!(!TraceLogger::disabled().is_enabled());
}

#[test]
fn fingerprint_is_stable_sha1_hex() {
    let fp = document_fingerprint("<html></html>");
    assert_eq!(fp.len(), 40);
    assert_eq!(fp, document_fingerprint("<html></html>"));
    assert_ne!(fp, document_fingerprint("<html> </html>"));
}

#[test]
fn write_schema_surfaces_io_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").expect("write blocker");

    let err = write_schema(&blocker.join("schema.json"), &[]).expect_err("parent is a file");
    assert!(matches!(err, SchemaError::Io { .. }));
}

#[test]
fn parse_visibility_keeps_only_booleans() {
    let map = parse_visibility(r#"{"a": true, "b": false, "c": 1, "d": null}"#).expect("parse");
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("a"), Some(&true));
    assert_eq!(map.get("b"), Some(&false));

    assert!(matches!(parse_visibility("[1,2]"), Err(SchemaError::Json { .. })));
}

// ============================================================================
// Commands against files
// ============================================================================

#[test]
fn cmd_extract_reads_inputs_and_writes_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let html = dir.path().join("page.html");
    let vis = dir.path().join("vis.json");
    let out = dir.path().join("out").join("schema.json");
    std::fs::write(&html, FORM).expect("write html");
    std::fs::write(&vis, r#"{"aadhaar": false}"#).expect("write visibility");

    let args = ExtractArgs {
        html: html.to_str().expect("utf-8 path"),
        visibility: vis.to_str(),
        output: out.to_str(),
        stdout: false,
        trace: None,
    };
    let extraction = cmd_extract(&args, &AppConfig::default()).expect("extract");

    assert!(!extraction.fields[0].visible);
    assert_eq!(load_schema(&out).expect("load").len(), 2);
}

#[test]
fn cmd_extract_missing_html_is_io_error() {
    let args = ExtractArgs {
        html: "/nonexistent/page.html",
        visibility: None,
        output: None,
        stdout: true,
        trace: None,
    };
    let err = cmd_extract(&args, &AppConfig::default()).expect_err("missing input");
    assert!(matches!(err, SchemaError::Io { .. }));
}

#[test]
fn cmd_extract_rejects_stdout_with_output() {
    let args = ExtractArgs {
        html: "/nonexistent/page.html",
        visibility: None,
        output: Some("schema.json"),
        stdout: true,
        trace: None,
    };
    let err = cmd_extract(&args, &AppConfig::default()).expect_err("conflicting flags");
    assert!(matches!(err, SchemaError::Config(_)));
}

#[test]
fn cmd_validate_reports_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema = dir.path().join("schema.json");
    let good = dir.path().join("good.json");
    let bad = dir.path().join("bad.json");

    let extraction = form_schema::extract_with(FORM, None, &ExtractOptions::default());
    write_schema(&schema, &extraction.fields).expect("write schema");
    std::fs::write(&good, r#"{"aadhaarNumber": "988350854804", "pan": "ABCDE1234F"}"#).expect("write");
    std::fs::write(&bad, r#"{"aadhaarNumber": "1234", "pan": "nope"}"#).expect("write");

    let schema = schema.to_str().expect("utf-8 path");
    assert!(cmd_validate(schema, good.to_str().expect("utf-8"), None).expect("validate").is_empty());

    let errors = cmd_validate(schema, bad.to_str().expect("utf-8"), None).expect("validate");
    let names: Vec<&str> = errors.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["aadhaarNumber", "pan"]);

    let step_one = cmd_validate(schema, bad.to_str().expect("utf-8"), Some(1)).expect("validate");
    assert_eq!(step_one.len(), 1);
}
