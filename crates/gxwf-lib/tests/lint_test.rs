#![allow(unused_crate_dependencies)]

use std::fs;
use std::path::{Path, PathBuf};

use gxwf_lib::commands::lint::{LintContext, LintError, lint_workflow_artifacts_on_paths};
use gxwf_lib::config::{Level, LintConfig, SKIP_DOCKSTORE, SKIP_TESTS, SkipSet};

const FORMAT2_WORKFLOW: &str = "class: GalaxyWorkflow
inputs:
  reference_genome: data
outputs:
  out:
    outputSource: cat/out_file1
steps:
  cat:
    tool_id: cat1
    in:
      input1: reference_genome
";

const NATIVE_WORKFLOW: &str = r#"{
  "a_galaxy_workflow": "true",
  "format-version": "0.1",
  "name": "native",
  "steps": {
    "0": {"id": 0, "type": "data_input", "label": "reads"},
    "1": {
      "id": 1,
      "type": "tool",
      "tool_id": "cat1",
      "workflow_outputs": [{"label": "merged", "output_name": "out_file1"}]
    }
  }
}"#;

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn lint(root: &Path, config: &LintConfig) -> LintContext {
    let mut ctx = LintContext::new();
    lint_workflow_artifacts_on_paths(&mut ctx, &[root.to_path_buf()], config).unwrap();
    ctx
}

fn skipping(name: &str) -> LintConfig {
    LintConfig {
        skip: SkipSet::parse([name]),
        ..LintConfig::default()
    }
}

fn messages(ctx: &LintContext) -> Vec<&str> {
    ctx.diagnostics().iter().map(|d| d.message.as_str()).collect()
}

#[test]
fn workflow_without_tests_only_warns() {
    let temp_dir = tempfile::tempdir().unwrap();
    let wf = write(temp_dir.path(), "wf.gxwf.yml", FORMAT2_WORKFLOW);

    let ctx = lint(temp_dir.path(), &LintConfig::default());

    assert_eq!(ctx.error_count(), 0);
    assert_eq!(messages(&ctx), vec!["Workflow missing test cases."]);
    assert_eq!(ctx.diagnostics()[0].path.as_deref(), Some(wf.as_path()));
    assert!(ctx.verdict(Level::Error).is_ok());
    assert!(ctx.verdict(Level::Warn).is_err());
}

#[test]
fn matching_test_job_is_clean() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "wf.gxwf.yml", FORMAT2_WORKFLOW);
    write(
        temp_dir.path(),
        "wf-tests.yml",
        "- doc: simple\n  job:\n    reference_genome: hg38\n  outputs:\n    out: {}\n",
    );

    let ctx = lint(temp_dir.path(), &LintConfig::default());

    assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
}

#[test]
fn typo_in_test_job_warns_and_errors() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "wf.gxwf.yml", FORMAT2_WORKFLOW);
    write(
        temp_dir.path(),
        "wf-tests.yml",
        "- job:\n    typo_key: hg38\n",
    );

    let ctx = lint(temp_dir.path(), &LintConfig::default());

    let warnings: Vec<_> = ctx.at_level(Level::Warn).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("[typo_key]"));
    assert!(warnings[0].message.contains("[reference_genome]"));

    let errors: Vec<_> = ctx.at_level(Level::Error).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("[reference_genome]"));
    assert!(matches!(
        ctx.verdict(Level::Error),
        Err(LintError::ViolationsFound {
            errors: 1,
            warnings: 1
        })
    ));
}

#[test]
fn job_file_referenced_by_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "wf.gxwf.yml", FORMAT2_WORKFLOW);
    write(temp_dir.path(), "wf-tests.yml", "- job: jobs/job1.yml\n");
    write(temp_dir.path(), "jobs/job1.yml", "reference_genome: hg38\n");

    let ctx = lint(temp_dir.path(), &LintConfig::default());

    assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
}

#[test]
fn native_workflow_is_linted() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "native.ga", NATIVE_WORKFLOW);
    write(
        temp_dir.path(),
        "native-tests.yml",
        "- job:\n    reads: reads.fastq\n",
    );

    let ctx = lint(temp_dir.path(), &LintConfig::default());

    assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
}

#[test]
fn skip_tests_suppresses_test_checks() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "wf.gxwf.yml", FORMAT2_WORKFLOW);
    write(temp_dir.path(), "wf-tests.yml", "- job:\n    typo_key: hg38\n");

    let ctx = lint(temp_dir.path(), &skipping(SKIP_TESTS));

    assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
}

#[test]
fn skip_dockstore_bypasses_manifest() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), ".dockstore.yml", "workflows: [\n");

    let ctx = lint(temp_dir.path(), &skipping(SKIP_DOCKSTORE));
    assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());

    let ctx = lint(temp_dir.path(), &LintConfig::default());
    assert_eq!(messages(&ctx), vec!["Invalid YAML found in .dockstore.yml"]);
}

#[test]
fn excluded_directories_are_not_linted() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), ".git/wf.gxwf.yml", "class: GalaxyWorkflow\n");
    write(temp_dir.path(), ".venv/lib/bad.yml", "key: [\n");

    let ctx = lint(temp_dir.path(), &LintConfig::default());

    assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
}

#[test]
fn non_workflow_yaml_is_ignored() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "ci.yml", "name: CI\njobs: {}\n");
    write(temp_dir.path(), "list.yaml", "- a\n- b\n");

    let ctx = lint(temp_dir.path(), &LintConfig::default());

    assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
}

#[test]
fn malformed_candidate_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "bad.yml", "key: [\n");

    let mut ctx = LintContext::new();
    let result =
        lint_workflow_artifacts_on_paths(&mut ctx, &[temp_dir.path().to_path_buf()], &LintConfig::default());

    assert!(matches!(result, Err(LintError::Document(_))));
}

#[test]
fn findings_survive_a_missing_later_root() {
    let temp_dir = tempfile::tempdir().unwrap();
    let first = temp_dir.path().join("first");
    write(&first, "wf.gxwf.yml", FORMAT2_WORKFLOW);
    let missing = temp_dir.path().join("missing");

    let mut ctx = LintContext::new();
    let result = lint_workflow_artifacts_on_paths(&mut ctx, &[first, missing], &LintConfig::default());

    assert!(matches!(result, Err(LintError::Scan(_))));
    assert_eq!(messages(&ctx), vec!["Workflow missing test cases."]);
}

#[test]
fn linting_is_idempotent() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "a/wf.gxwf.yml", FORMAT2_WORKFLOW);
    write(temp_dir.path(), "a/wf-tests.yml", "- job:\n    typo_key: hg38\n");
    write(temp_dir.path(), "b/native.ga", NATIVE_WORKFLOW);
    write(temp_dir.path(), ".dockstore.yml", "version: 1.2\n");

    let first = lint(temp_dir.path(), &LintConfig::default());
    let second = lint(temp_dir.path(), &LintConfig::default());

    assert_eq!(first.diagnostics(), second.diagnostics());
    assert_eq!(
        first.verdict(Level::Warn).is_ok(),
        second.verdict(Level::Warn).is_ok()
    );
}

#[test]
fn repeated_keys_in_unrelated_yaml_do_not_stop_the_lint() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "env.yml", "name: a\nname: b\n");
    write(temp_dir.path(), "wf.gxwf.yml", FORMAT2_WORKFLOW);
    write(
        temp_dir.path(),
        "wf-tests.yml",
        "- job:\n    reference_genome: hg38\n",
    );

    let ctx = lint(temp_dir.path(), &LintConfig::default());

    assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
}
