//! Tests for the `percolate` binary

use anyhow::Result;
use predicates::prelude::*;

use crate::common::{FAKE_TOOLS_CONFIG, TestProject};

#[test]
fn test_list_text() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(FAKE_TOOLS_CONFIG)?;

    project
        .percolate()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profiles in"))
        .stdout(predicate::str::contains("app main ->"))
        .stdout(predicate::str::contains("app.debug.js"))
        .stdout(predicate::str::contains("minified with uglify"))
        .stdout(predicate::str::contains("not minified"));
    Ok(())
}

#[test]
fn test_list_json() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(FAKE_TOOLS_CONFIG)?;

    let output = project.percolate().args(["list", "--format", "json"]).output()?;
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let rows = rows.as_array().expect("list output is an array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "app");
    assert_eq!(rows[0]["compression"], "uglify");
    assert_eq!(rows[0]["depth"], 3);
    assert_eq!(rows[1]["name"], "debug");
    assert_eq!(rows[1]["depth"], 2);
    assert_eq!(rows[1]["compiled"], false);
    Ok(())
}

#[test]
fn test_list_empty_config() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config("base_dir = \"global\"\n")?;

    project
        .percolate()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No output profiles"));
    Ok(())
}

#[test]
fn test_missing_config() -> Result<()> {
    let project = TestProject::new()?;

    project
        .percolate()
        .args(["check", "app"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("percolate.toml not found"))
        .stderr(predicate::str::contains("PERCOLATE_CONFIG"));
    Ok(())
}

#[test]
fn test_explicit_config_path() -> Result<()> {
    let project = TestProject::new()?;
    project.write("conf/site.toml", FAKE_TOOLS_CONFIG)?;

    project
        .percolate()
        .args(["-c", "conf/site.toml", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("site.toml"));

    project
        .percolate()
        .args(["list"])
        .env("PERCOLATE_CONFIG", project.path("conf/missing.toml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}

#[test]
fn test_unknown_profile_suggestion() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(FAKE_TOOLS_CONFIG)?;

    project
        .percolate()
        .args(["check", "dbug"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Output profile 'dbug' is not configured"))
        .stderr(predicate::str::contains("Did you mean 'debug'?"));
    Ok(())
}

#[test]
fn test_invalid_var_flag() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(FAKE_TOOLS_CONFIG)?;

    project
        .percolate()
        .args(["print", "app", "--var", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
    Ok(())
}

#[cfg(unix)]
mod with_tools {
    use super::*;
    use crate::common::write_sample_app;

    fn sample_project() -> Result<TestProject> {
        let project = TestProject::new()?;
        project.write_config(FAKE_TOOLS_CONFIG)?;
        project.install_fake_tools()?;
        write_sample_app(&project)?;
        Ok(project)
    }

    #[test]
    fn test_build_creates_then_updates() -> Result<()> {
        let project = sample_project()?;

        project
            .percolate()
            .args(["build", "app"])
            .assert()
            .success()
            .stdout(predicate::str::contains("✓ Created"))
            .stdout(predicate::str::contains("app.js"));

        let artifact = project.read("public/js/app.js")?;
        assert!(artifact.contains("window.legacy = {ready: true};"));
        assert!(artifact.contains("VERSION = '1.0.0'"));
        assert!(!artifact.contains("raw_dump"));
        assert!(!artifact.contains('\n'));

        project
            .percolate()
            .args(["build", "app"])
            .assert()
            .success()
            .stdout(predicate::str::contains("✓ Updated"));
        assert_eq!(project.read("public/js/app.js")?, artifact);
        Ok(())
    }

    #[test]
    fn test_build_output_overrides() -> Result<()> {
        let project = sample_project()?;

        project
            .percolate()
            .args(["build", "debug", "--output-dir", "dist", "--output-file", "bundle.js"])
            .assert()
            .success();

        let artifact = project.read("dist/bundle.js")?;
        assert!(artifact.contains("window.legacy = {ready: true};"));
        assert!(artifact.contains('\n'));
        assert!(!project.path("public/js/app.debug.js").exists());
        Ok(())
    }

    #[test]
    fn test_print_stage_zero_with_var_override() -> Result<()> {
        let project = sample_project()?;

        project
            .percolate()
            .args(["print", "app", "--depth", "0", "--var", "version=2.0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("`{% raw_dump(\"legacy\") %}`"))
            .stdout(predicate::str::contains("VERSION = '2.0'"));
        Ok(())
    }

    #[test]
    fn test_print_without_minification() -> Result<()> {
        let project = sample_project()?;

        let output = project.percolate().args(["print", "app", "--no-compiled"]).output()?;
        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout)?;
        assert!(stdout.contains("tmpl['list'] = _.template("));
        assert!(stdout.contains("window.legacy = {ready: true};"));
        assert!(stdout.lines().count() > 1);
        Ok(())
    }

    #[test]
    fn test_check_reports_transpile_error() -> Result<()> {
        let project = sample_project()?;
        project.write("app/main.coffee", "ok = 1\nSYNTAX ERROR here\n")?;

        project
            .percolate()
            .args(["check", "app"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("CoffeeScript compilation failed"))
            .stderr(predicate::str::contains("> 2 | SYNTAX ERROR here"));
        assert!(!project.path("public/js/app.js").exists());
        Ok(())
    }

    #[test]
    fn test_check_reports_missing_fragment() -> Result<()> {
        let project = sample_project()?;
        project.write("app/main.coffee", "{% mixins(\"nowhere\") %}\n")?;

        project
            .percolate()
            .args(["check", "app"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Path not resolved: 'nowhere' in category 'mixins'"));
        Ok(())
    }

    #[test]
    fn test_check_succeeds() -> Result<()> {
        let project = sample_project()?;

        project
            .percolate()
            .args(["check", "app"])
            .assert()
            .success()
            .stdout(predicate::str::contains("✓ Profile 'app' compiles"));
        assert!(!project.path("public/js/app.js").exists());
        Ok(())
    }
}
