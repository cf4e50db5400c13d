//! Writing artifacts with `Session::save`

use anyhow::Result;
use percolate::compile::{CompilationContext, Compression, Depth, SaveAction, Session};
use percolate::core::PercolateError;
use percolate::test_utils::{FailingMinifier, FakeMinifier, FakeTranspiler, ProjectFixture, percolate_error};

use crate::common::SAMPLE_APP;

fn sample_fixture() -> ProjectFixture {
    let fixture = ProjectFixture::new();
    for (path, content) in SAMPLE_APP {
        fixture.write(path, content);
    }
    fixture
}

fn compiled_context(fixture: &ProjectFixture) -> CompilationContext {
    CompilationContext::forge(fixture.path("app"), "main")
        .compiled(true)
        .compression(Compression::Uglify)
        .output_dir(fixture.path("public/js"))
        .output_file("app.js")
        .set_var("version", "1.0.0")
}

#[test]
fn test_create_then_update_is_reproducible() -> Result<()> {
    let fixture = sample_fixture();

    let mut session = Session::new(fixture.path("global"), FakeTranspiler)?
        .with_minifier(Compression::Uglify, FakeMinifier);
    let first = session.save(&mut compiled_context(&fixture), None, None)?;
    assert_eq!(first.action, SaveAction::Create);
    assert_eq!(first.destination, fixture.path("public/js/app.js"));
    let written = fixture.read("public/js/app.js");
    assert_eq!(written.len(), first.bytes);

    // A fresh session over unchanged sources writes the same bytes
    let mut session = Session::new(fixture.path("global"), FakeTranspiler)?
        .with_minifier(Compression::Uglify, FakeMinifier);
    let second = session.save(&mut compiled_context(&fixture), None, None)?;
    assert_eq!(second.action, SaveAction::Update);
    assert_eq!(second.checksum, first.checksum);
    assert_eq!(fixture.read("public/js/app.js"), written);
    Ok(())
}

#[test]
fn test_explicit_destination_overrides_context() -> Result<()> {
    let fixture = sample_fixture();
    let mut session = Session::new(fixture.path("global"), FakeTranspiler)?;

    let mut ctx = CompilationContext::forge(fixture.path("app"), "main")
        .depth(Depth::Raw)
        .set_var("version", "dev");
    let status = session.save(&mut ctx, Some(fixture.path("dist").as_path()), Some("stage0.coffee"))?;

    assert_eq!(status.destination, fixture.path("dist/stage0.coffee"));
    assert!(fixture.read("dist/stage0.coffee").contains("VERSION = 'dev'"));
    Ok(())
}

#[test]
fn test_failed_render_writes_nothing() -> Result<()> {
    let fixture = sample_fixture();
    let mut session = Session::new(fixture.path("global"), FakeTranspiler)?
        .with_minifier(Compression::Uglify, FailingMinifier::new("Unexpected token: punc (})"));

    let err = session.save(&mut compiled_context(&fixture), None, None).unwrap_err();
    assert!(matches!(
        percolate_error(&err),
        Some(PercolateError::MinifyFailed { backend: Compression::Uglify, .. })
    ));
    assert!(!fixture.path("public/js/app.js").exists());
    Ok(())
}

#[test]
fn test_missing_destination() -> Result<()> {
    let fixture = sample_fixture();
    let mut session = Session::new(fixture.path("global"), FakeTranspiler)?;

    let mut ctx = CompilationContext::forge(fixture.path("app"), "main").set_var("version", "1");
    let err = session.save(&mut ctx, None, None).unwrap_err();
    assert!(matches!(
        percolate_error(&err),
        Some(PercolateError::MissingOutputDestination { field: "output_dir" })
    ));
    assert!(ctx.rendered().is_none());
    Ok(())
}
