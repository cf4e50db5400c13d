//! Name resolution and star expansion through directive expansion

use anyhow::Result;
use percolate::compile::{CompilationContext, Depth, KeyNode, Session, collapse};
use percolate::core::PercolateError;
use percolate::test_utils::{FakeTranspiler, ProjectFixture, percolate_error};

fn raw_output(fixture: &ProjectFixture, template: &str) -> Result<String> {
    let mut session = Session::new(fixture.path("global"), FakeTranspiler)?;
    let mut ctx = CompilationContext::forge(fixture.path("app"), template).depth(Depth::Raw);
    session.render(&mut ctx)
}

/// The profile's base directory shadows the global one, name by name
#[test]
fn test_context_shadows_global_per_name() -> Result<()> {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "{% lib([\"util\", \"shared\"]) %}");
    fixture.write("app/lib/util.coffee", "util = 'app'");
    fixture.write("global/lib/util.coffee", "util = 'global'");
    fixture.write("global/lib/shared.coffee", "shared = 'global'");

    let output = raw_output(&fixture, "main")?;
    assert_eq!(output, "\nutil = 'app'\n\nshared = 'global'\n");
    Ok(())
}

/// Categories that only exist globally are usable from every profile
#[test]
fn test_global_only_category() -> Result<()> {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "{% vendor(\"jquery-ext\") %}main = 1");
    fixture.write("global/vendor/jquery-ext.coffee", "$.fn.ext = -> this");

    let output = raw_output(&fixture, "main")?;
    assert_eq!(output, "$.fn.ext = -> this\nmain = 1");
    Ok(())
}

/// A name with a dot keeps its extension; a missing fragment names its category
#[test]
fn test_extension_inference_and_failure() -> Result<()> {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "{% lib(\"settings.json\") %}");
    fixture.write("app/lib/settings.json", "{\"debug\": false}");
    fixture.write("app/lib/settings.json.coffee", "never = 'used'");
    fixture.write("app/broken.coffee", "{% lib(\"helpers\") %}");
    fixture.write("app/lib/helpers.js", "var helpers;");

    assert_eq!(raw_output(&fixture, "main")?, "{\"debug\": false}\n");

    let err = raw_output(&fixture, "broken").unwrap_err();
    match percolate_error(&err) {
        Some(PercolateError::ResolutionFailed { name, category }) => {
            assert_eq!(name, "helpers");
            assert_eq!(category.as_deref(), Some("lib"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

/// Included fragments are processed with the including context
#[test]
fn test_nested_includes_resolve_against_same_roots() -> Result<()> {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "{% lib(\"outer\") %}");
    fixture.write("app/lib/outer.coffee", "outer = 1\n{% lib(\"inner\") %}");
    fixture.write("global/lib/inner.coffee", "inner = 2");

    assert_eq!(raw_output(&fixture, "main")?, "outer = 1\ninner = 2\n\n");
    Ok(())
}

/// Star expansion walks the tree in name order and skips hidden entries
#[test]
fn test_star_expansion_is_deterministic() -> Result<()> {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "{% lib(\"*\") %}");
    fixture.write("app/lib/zeta.coffee", "z = 1");
    fixture.write("app/lib/alpha.coffee", "a = 1");
    fixture.write("app/lib/mid/beta.coffee", "b = 1");
    fixture.write("app/lib/.cache/ignored.coffee", "ignored = 1");
    fixture.write("app/lib/.swp", "junk");

    let first = raw_output(&fixture, "main")?;
    let second = raw_output(&fixture, "main")?;
    assert_eq!(first, second);
    assert_eq!(first, "\na = 1\n\nb = 1\n\nz = 1\n");
    Ok(())
}

/// A wildcard over a missing directory expands to nothing
#[test]
fn test_star_over_missing_directory() -> Result<()> {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "before\n{% lib(\"none/*\") %}after");
    fixture.mkdir("app/lib");

    assert_eq!(raw_output(&fixture, "main")?, "before\nafter");
    Ok(())
}

/// Directory-shaped trees collapse to concatenated keys
#[test]
fn test_key_collapse() {
    let tree = vec![
        KeyNode::group("a", vec![KeyNode::leaf("b", "1"), KeyNode::leaf("c", "2")]),
        KeyNode::leaf("d", "3"),
    ];
    assert_eq!(collapse(&tree), vec!["ab", "ac", "d"]);
    assert!(collapse(&[]).is_empty());
}

/// Unknown directive names are rejected with the closest category suggested
#[test]
fn test_unknown_category_suggestion() {
    let fixture = ProjectFixture::new();
    fixture.write("app/main.coffee", "{% mixin(\"util\") %}");
    fixture.write("app/mixins/util.coffee", "_.mixin util: -> 1");

    let err = raw_output(&fixture, "main").unwrap_err();
    match percolate_error(&err) {
        Some(PercolateError::UnknownCategory { name, suggestion }) => {
            assert_eq!(name, "mixin");
            assert_eq!(suggestion.as_deref(), Some("mixins"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
