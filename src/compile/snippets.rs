//! Text emitted in place of directives.
//!
//! Kept apart from the dispatch logic so the exact output bytes are easy to
//! audit: any change here changes every generated script.

use crate::constants::{MIXIN_MARKER, RAW_DUMP_DIRECTIVE};

/// A single included fragment.
#[must_use]
pub fn line(content: &str) -> String {
    format!("{content}\n")
}

/// One entry of an included list.
#[must_use]
pub fn block(content: &str) -> String {
    format!("\n{content}\n")
}

/// One entry of a mixin list.
///
/// The first mixin keeps its `_.mixin` call; later ones are merged into the
/// same object literal by dropping the marker.
#[must_use]
pub fn mixin_entry(content: &str, position: usize) -> String {
    if position == 0 {
        block(content)
    } else {
        block(&strip_mixin_marker(content))
    }
}

/// Remove every `_.mixin` marker from `content`.
#[must_use]
pub fn strip_mixin_marker(content: &str) -> String {
    content.replace(MIXIN_MARKER, "")
}

/// CoffeeScript registering `content` as compiled template `name`.
///
/// ```text
/// Templates = do (tmpl = Templates or {}) ->
///   tmpl['list'] = _.template("""<li><%= item %></li>""")
///   tmpl
/// ```
#[must_use]
pub fn template_registration(name: &str, content: &str) -> String {
    format!(
        "Templates = do (tmpl = Templates or {{}}) ->\n  tmpl['{name}'] = _.template(\"\"\"{content}\"\"\")\n  tmpl\n"
    )
}

/// Backtick-embedded directive that pulls raw script `name` back in when the
/// transpiled output is re-templated.
#[must_use]
pub fn raw_marker(name: &str) -> String {
    let quoted = serde_json::Value::String(name.to_string());
    format!("`{{% {RAW_DUMP_DIRECTIVE}({quoted}) %}}`\n")
}
