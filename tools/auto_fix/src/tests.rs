use super::*;
use autofix_core::diagnostic::DiagnosticFormat;
use autofix_core::test_util::{MockRepairService, tempdir};

fn config(root: &Path, dry_run: bool) -> FixConfig {
    FixConfig {
        dry_run,
        root: Some(root.to_path_buf()),
        ..FixConfig::default()
    }
}

/// A service that replaces every `var` with `let`, once per call.
fn var_to_let() -> MockRepairService {
    MockRepairService::new()
        .respond(|request| Some(request.file_content.replacen("var", "let", 1)))
}

#[test]
fn group_by_file_preserves_first_seen_order() {
    let errors = LintParser.parse(
        "./b.ts\n  1:1  error  one  r\n\
         ./a.ts\n  2:1  error  two  r\n\
         ./b.ts\n  3:1  error  three  r\n",
    );
    let groups = group_by_file(errors);
    let summary: Vec<_> = groups
        .iter()
        .map(|(file, errors)| (file.as_str(), errors.iter().map(|e| e.line).collect::<Vec<_>>()))
        .collect();
    assert_eq!(summary, [("./b.ts", vec![1, 3]), ("./a.ts", vec![2])]);
}

#[test]
fn lint_scenario_fixes_both_files_independently() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.ts"), "var x = 1;\nvar y = 2;\n").unwrap();
    std::fs::write(dir.path().join("b.ts"), "var z = 3;\n").unwrap();
    let errors = LintParser.parse(
        "./a.ts\n  1:1  error  Unexpected var  no-var\n  2:1  error  Unexpected var  no-var\n\
         ./b.ts\n  1:1  error  Unexpected var  no-var\n",
    );
    // Paths are relative to the temp root.
    let errors: Vec<_> = errors
        .into_iter()
        .map(|mut e| {
            e.file = e.file.trim_start_matches("./").to_string();
            e
        })
        .collect();

    let service = var_to_let();
    let summary = fix_errors(errors, &service, &config(dir.path(), false));

    assert_eq!((summary.fixed, summary.failed), (3, 0));
    assert!(summary.all_fixed());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("a.ts")).unwrap(),
        "let x = 1;\nlet y = 2;\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("b.ts")).unwrap(),
        "let z = 3;\n"
    );

    let calls = service.calls();
    assert_eq!(calls.len(), 3);
    // The second a.ts request sees the first fix; b.ts starts from its own disk content.
    assert_eq!(calls[1].file_content, "let x = 1;\nvar y = 2;\n");
    assert_eq!(calls[2].file, "b.ts");
    assert_eq!(calls[2].file_content, "var z = 3;\n");
}

#[test]
fn structured_result_for_missing_file_fails_without_service_call() {
    let dir = tempdir().unwrap();
    let errors = StructuredParser.parse(
        r#"{"results": [{"check_id": "python.lang.security.audit.eval", "path": "gone.py",
            "start": {"line": 3}, "end": {"line": 3}, "extra": {"message": "eval is dangerous"}}]}"#,
    );
    let service = var_to_let();
    let summary = fix_errors(errors, &service, &config(dir.path(), false));

    assert_eq!((summary.fixed, summary.failed), (0, 1));
    assert!(!summary.all_fixed());
    assert_eq!(service.call_count(), 0);
    assert_eq!(
        summary.files[0].attempts[0].outcome,
        FixOutcome::Failed(FailureReason::FileMissing)
    );
}

#[test]
fn dry_run_leaves_every_file_untouched() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.ts"), "var x = 1;\nvar y = 2;\n").unwrap();
    let errors = TypeCheckParser.parse(
        "a.ts(1,1): error TS1000: first\na.ts(2,1): error TS1000: second\n",
    );
    let service = var_to_let();
    let summary = fix_errors(errors, &service, &config(dir.path(), true));

    assert_eq!((summary.fixed, summary.failed), (2, 0));
    assert!(summary.dry_run);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("a.ts")).unwrap(),
        "var x = 1;\nvar y = 2;\n"
    );
    let calls = service.calls();
    assert_eq!(calls[0].file_content, calls[1].file_content);
}

#[test]
fn rerunning_on_fixed_content_accepts_nothing() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.ts"), "let x = 1;\n").unwrap();
    let errors = TypeCheckParser.parse("a.ts(1,1): error TS1000: first\n");
    let summary = fix_errors(errors, &var_to_let(), &config(dir.path(), false));
    assert_eq!((summary.fixed, summary.failed), (0, 1));
    assert!(!summary.files[0].attempts[0].outcome.accepted());
}

#[test]
fn empty_error_set_is_all_fixed() {
    let summary = fix_errors(vec![], &var_to_let(), &FixConfig::default());
    assert!(summary.all_fixed());
    assert!(summary.files.is_empty());
}

#[test]
fn summary_is_written_as_json() {
    let dir = tempdir().unwrap();
    let errors = StructuredParser.parse(
        r#"{"results": [{"check_id": "r", "path": "gone.py", "start": {"line": 3},
            "end": {"line": 3}, "extra": {"message": "m"}}]}"#,
    );
    let summary = fix_errors(errors, &var_to_let(), &config(dir.path(), false));
    let path = dir.path().join("summary.json");
    summary.write_json(&path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["failed"], 1);
    assert_eq!(json["files"][0]["file"], "gone.py");
    assert_eq!(
        json["files"][0]["attempts"][0]["outcome"]["failed"],
        "file_missing"
    );
}

#[test]
fn resolve_joins_relative_paths_only() {
    let config = config(Path::new("/repo"), false);
    assert_eq!(config.resolve("src/a.ts"), PathBuf::from("/repo/src/a.ts"));
    assert_eq!(config.resolve("/abs/a.ts"), PathBuf::from("/abs/a.ts"));
    assert_eq!(FixConfig::default().resolve("a.ts"), PathBuf::from("a.ts"));
}

#[test]
fn missing_credential() {
    let var = "AUTOFIX_TEST_CREDENTIAL_THAT_IS_NEVER_SET";
    assert!(matches!(
        read_credential(var),
        Err(Error::MissingCredential(name)) if name == var
    ));
}

#[test]
fn errors_keep_format_tag() {
    let errors = TypeCheckParser.parse("a.ts(1,1): error TS1000: x\n");
    assert_eq!(errors[0].format, DiagnosticFormat::TypeCheck);
}
