//! Staged compilation of a complete app through the library API

use anyhow::Result;
use percolate::compile::{CompilationContext, Compression, Depth, Session};
use percolate::core::PercolateError;
use percolate::test_utils::{FakeMinifier, FakeTranspiler, ProjectFixture, percolate_error};

use crate::common::SAMPLE_APP;

fn sample_fixture() -> ProjectFixture {
    let fixture = ProjectFixture::new();
    for (path, content) in SAMPLE_APP {
        fixture.write(path, content);
    }
    fixture
}

fn session_for(fixture: &ProjectFixture) -> Result<Session> {
    Ok(Session::new(fixture.path("global"), FakeTranspiler)?.with_minifier(Compression::Uglify, FakeMinifier))
}

fn sample_context(fixture: &ProjectFixture, depth: Depth) -> CompilationContext {
    CompilationContext::forge(fixture.path("app"), "main")
        .depth(depth)
        .compiled(true)
        .compression(Compression::Uglify)
        .set_var("version", "1.0.0")
}

#[test]
fn test_stage_zero_expands_every_directive() -> Result<()> {
    let fixture = sample_fixture();
    let mut session = session_for(&fixture)?;

    let output = session.render(&mut sample_context(&fixture, Depth::Raw))?;

    // The explicit entry and the expanded pattern each open one `_.mixin` call
    assert_eq!(output.matches("_.mixin").count(), 2);
    assert!(output.contains("\n_.mixin\n  capitalize"));
    assert!(output.contains("\n_.mixin\n  byId"));
    assert!(output.contains("capitalize: (s) -> s.toUpperCase()"));
    assert!(output.contains("byId: (id) -> document.getElementById(id)"));
    assert!(output.contains("tmpl['list'] = _.template(\"\"\"<ul>"));
    assert!(output.contains("`{% raw_dump(\"legacy\") %}`"));
    assert!(output.contains("VERSION = '1.0.0'"));
    assert!(output.contains("\n  Templates.list(items: [])"));
    assert!(!output.contains('\t'));
    Ok(())
}

#[test]
fn test_each_depth_stops_after_its_stage() -> Result<()> {
    let fixture = sample_fixture();
    let mut session = session_for(&fixture)?;

    let transpiled = session.render(&mut sample_context(&fixture, Depth::Transpiled))?;
    assert!(!transpiled.contains('`'));
    assert!(transpiled.contains("{% raw_dump(\"legacy\") %}"));

    let retemplated = session.render(&mut sample_context(&fixture, Depth::Retemplated))?;
    assert!(retemplated.contains("window.legacy = {ready: true};"));
    assert!(!retemplated.contains("raw_dump"));
    assert!(retemplated.contains('\n'));

    let full = session.render(&mut sample_context(&fixture, Depth::Full))?;
    assert!(!full.contains('\n'));
    assert!(full.contains("window.legacy = {ready: true};"));
    assert!(full.contains("VERSION = '1.0.0'"));

    // Without `compiled` the full pipeline equals stage 2
    let uncompiled = session.render(&mut sample_context(&fixture, Depth::Full).compiled(false))?;
    assert_eq!(uncompiled, retemplated);

    assert!(session.stack().is_empty());
    Ok(())
}

#[test]
fn test_bare_flag_reaches_transpiler() -> Result<()> {
    let fixture = sample_fixture();
    let mut session = session_for(&fixture)?;

    let wrapped =
        session.render(&mut sample_context(&fixture, Depth::Transpiled).bare(false))?;
    assert!(wrapped.starts_with("(function() {\n"));

    let bare = session.render(&mut sample_context(&fixture, Depth::Transpiled))?;
    assert!(!bare.starts_with("(function() {"));
    Ok(())
}

#[test]
fn test_raw_registry_last_write_wins() -> Result<()> {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "{% raw(\"legacy\") %}{% raw(\"legacy\", \".txt\") %}");
    fixture.write("global/raw/legacy.js", "one");
    fixture.write("app/raw/legacy.txt", "two");

    let mut session = session_for(&fixture)?;
    let mut ctx = CompilationContext::forge(fixture.path("app"), "main").depth(Depth::Retemplated);

    assert_eq!(session.render(&mut ctx)?, "two\ntwo\n");
    assert_eq!(session.raw_scripts().lookup("legacy")?, "two");
    assert_eq!(session.raw_scripts().len(), 1);
    Ok(())
}

/// Directives produced by the transpiler are only seen by stage 2
#[test]
fn test_stage_two_failure_restores_context() -> Result<()> {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "x = 1\n{`% raw_dump(\"ghost\") %}\n");

    let mut session = session_for(&fixture)?;
    let mut ctx = CompilationContext::forge(fixture.path("app"), "main").depth(Depth::Transpiled);
    assert_eq!(session.render(&mut ctx)?, "x = 1\n{% raw_dump(\"ghost\") %}\n");

    let mut ctx = CompilationContext::forge(fixture.path("app"), "main").depth(Depth::Retemplated);
    let err = session.render(&mut ctx).unwrap_err();
    assert!(matches!(
        percolate_error(&err),
        Some(PercolateError::RawScriptNotRegistered { name }) if name == "ghost"
    ));

    assert!(session.stack().is_empty());
    assert_eq!(ctx.template, "main");
    assert_eq!(ctx.depth, Depth::Retemplated);
    assert!(ctx.rendered().is_none());
    Ok(())
}

#[test]
fn test_end_to_end_mixins_and_templates() -> Result<()> {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "{% mixins(\"util\") %}\n{% templates(\"list\") %}\nrender = -> Templates.list()\n");
    fixture.write("app/mixins/util.coffee", "_.mixin\n  util: -> 1");
    fixture.write("app/templates/list.jst", "<li><%= item %></li>");

    let mut session = session_for(&fixture)?;
    let compiled = CompilationContext::forge(fixture.path("app"), "main")
        .compiled(true)
        .compression(Compression::Uglify);
    let output = session.render(&mut compiled.clone())?;
    let stage_two = session.render(&mut compiled.depth(Depth::Retemplated))?;

    assert_eq!(output, stage_two.split_whitespace().collect::<Vec<_>>().join(" "));
    assert!(output.contains("_.mixin util: -> 1"));
    assert!(output.contains("tmpl['list'] = _.template(\"\"\"<li><%= item %></li>\"\"\")"));
    assert!(!output.contains("raw_dump"));
    assert!(!output.contains("{%"));
    Ok(())
}

#[test]
fn test_rendered_output_is_cached_on_context() -> Result<()> {
    let fixture = sample_fixture();
    let mut session = session_for(&fixture)?;
    let mut ctx = sample_context(&fixture, Depth::Full);

    let first = session.render(&mut ctx)?;
    fixture.write("app/main.coffee", "changed = true");
    let second = session.render(&mut ctx)?;

    assert_eq!(first, second);
    assert_eq!(ctx.rendered(), Some(first.as_str()));
    Ok(())
}
