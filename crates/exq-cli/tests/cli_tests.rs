use clap::Parser;
use exq_cli::args::{CallPosition, CliArgs, NullGuard, OutputFormat};
use exq_cli::driver;
use exq_transform::{CallPositionMode, ExistentialOptions, NullGuardOperand};
use std::fs;
use tempfile::TempDir;

const ASSIGN_EX: &str = r#"{
  "type": "Program",
  "body": [{
    "type": "ExpressionStatement",
    "expression": {
      "type": "AssignmentExpression",
      "operator": "=",
      "left": { "type": "Identifier", "name": "b" },
      "right": {
        "type": "CallExpression",
        "callee": {
          "type": "MemberExpression",
          "object": { "type": "Identifier", "name": "a" },
          "property": { "type": "Identifier", "name": "ex" },
          "computed": false
        },
        "arguments": []
      }
    }
  }]
}"#;

const NO_EX: &str = r#"{
  "type": "Program",
  "body": [{
    "type": "ExpressionStatement",
    "expression": {
      "type": "MemberExpression",
      "object": { "type": "Identifier", "name": "a" },
      "property": { "type": "Identifier", "name": "b" },
      "computed": false
    }
  }]
}"#;

fn write_input(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("input.json");
    fs::write(&path, text).expect("write input");
    path
}

#[test]
fn test_parse_flags() {
    let args = CliArgs::try_parse_from([
        "exq",
        "in.json",
        "--call-position",
        "call",
        "--nullGuard",
        "name",
        "--sentinel",
        "maybe",
        "-f",
        "js",
        "--check",
    ])
    .expect("valid flags");

    assert_eq!(args.input.as_deref(), Some(std::path::Path::new("in.json")));
    assert_eq!(args.call_position, Some(CallPosition::Call));
    assert_eq!(args.null_guard, Some(NullGuard::Name));
    assert_eq!(args.sentinel.as_deref(), Some("maybe"));
    assert_eq!(args.format, OutputFormat::Js);
    assert!(args.check);
}

#[test]
fn test_unknown_call_position_is_rejected() {
    assert!(CliArgs::try_parse_from(["exq", "--call-position", "sometimes"]).is_err());
}

#[test]
fn test_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("exq.json");
    fs::write(
        &config,
        r#"{ "callPosition": "callBranch", "nullGuard": "propertyName", "sentinel": "maybe" }"#,
    )
    .unwrap();

    let args = CliArgs {
        config: Some(config.clone()),
        ..Default::default()
    };
    let options = driver::resolve_options(&args).unwrap();
    assert_eq!(
        options,
        ExistentialOptions::default()
            .with_call_position(CallPositionMode::CallBranch)
            .with_null_guard(NullGuardOperand::PropertyName)
            .with_sentinel("maybe")
    );

    let args = CliArgs {
        config: Some(config),
        call_position: Some(CallPosition::Member),
        sentinel: Some("ex".to_string()),
        ..Default::default()
    };
    let options = driver::resolve_options(&args).unwrap();
    assert_eq!(options.call_position, CallPositionMode::MemberBranch);
    assert_eq!(options.null_guard, NullGuardOperand::PropertyName);
    assert_eq!(options.sentinel, "ex");
}

#[test]
fn test_invalid_config_reports_path() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{ "callPosition": "sometimes" }"#).unwrap();

    let args = CliArgs {
        config: Some(config),
        ..Default::default()
    };
    let err = driver::resolve_options(&args).unwrap_err();
    assert!(format!("{err}").contains("bad.json"));
}

#[test]
fn test_empty_sentinel_is_rejected() {
    let args = CliArgs {
        sentinel: Some(String::new()),
        ..Default::default()
    };
    assert!(driver::resolve_options(&args).is_err());
}

#[test]
fn test_run_writes_javascript_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, ASSIGN_EX);
    let output = dir.path().join("out.js");

    let args = CliArgs {
        input: Some(input),
        output: Some(output.clone()),
        format: OutputFormat::Js,
        call_position: Some(CallPosition::Call),
        ..Default::default()
    };
    let result = driver::run(&args).unwrap();

    assert!(result.changed());
    assert_eq!(result.stats.call_branches, 1);
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "b = typeof a !== \"undefined\" && a !== null && typeof a !== \"function\" ? a() : void 0;\n"
    );
}

#[test]
fn test_run_writes_estree_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, ASSIGN_EX);
    let output = dir.path().join("out.json");

    let args = CliArgs {
        input: Some(input),
        output: Some(output.clone()),
        ..Default::default()
    };
    driver::run(&args).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    let callee = &written["body"][0]["expression"]["right"]["callee"];
    assert_eq!(callee["type"], "ConditionalExpression");
    assert_eq!(callee["test"]["type"], "LogicalExpression");
    assert_eq!(callee["consequent"]["name"], "a");
    assert_eq!(callee["alternate"]["operator"], "void");
}

#[test]
fn test_check_mode_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.json");

    let args = CliArgs {
        input: Some(write_input(&dir, ASSIGN_EX)),
        output: Some(output.clone()),
        check: true,
        ..Default::default()
    };
    let result = driver::run(&args).unwrap();
    assert!(result.changed());
    assert!(!output.exists());

    let args = CliArgs {
        input: Some(write_input(&dir, NO_EX)),
        check: true,
        ..Default::default()
    };
    assert!(!driver::run(&args).unwrap().changed());
}

#[test]
fn test_rewrite_document_rejects_unsupported_input() {
    let source = r#"{ "type": "BinaryExpression", "operator": "in",
        "left": { "type": "Identifier", "name": "a" },
        "right": { "type": "Identifier", "name": "b" } }"#;
    let err = driver::rewrite_document(source, &ExistentialOptions::default(), OutputFormat::Js)
        .unwrap_err();
    assert!(format!("{err:#}").contains("unsupported operator"));
}

#[test]
fn test_missing_input_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = driver::read_input(Some(&dir.path().join("missing.json"))).unwrap_err();
    assert!(format!("{err}").contains("missing.json"));
}
