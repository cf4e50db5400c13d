//! Directive parsing and dispatch.
//!
//! Directives look like `{% name(args) %}` where `args` is a comma separated
//! list of JSON values: a name or an array of names, optionally followed by
//! an extension override. Text produced by a directive is spliced into the
//! output as-is and is not scanned again; fragments pulled in by a directive
//! have their own directives expanded when they are resolved.

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use super::Session;
use super::expander::is_wildcard;
use super::snippets;
use crate::constants::{
    DEFAULT_EXTENSION, MIXINS_CATEGORY, RAW_CATEGORY, RAW_DUMP_DIRECTIVE, RAW_EXTENSION,
    TEMPLATE_EXTENSION, TEMPLATES_CATEGORY, VAR_DIRECTIVE,
};
use crate::core::PercolateError;
use crate::utils::closest_match;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{%\s*([A-Za-z_][A-Za-z0-9_-]*)\s*\((.*?)\)\s*%\}")
        .expect("directive pattern is valid")
});

/// One name or a list of names passed to a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Names {
    /// `"util"` or `"helpers/*"`
    One(String),
    /// `["core", "helpers/*"]`
    Many(Vec<String>),
}

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Self::One(name.to_string())
    }
}

impl From<String> for Names {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl From<Vec<String>> for Names {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl From<Vec<&str>> for Names {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl Names {
    fn as_slice(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }
}

/// A parsed `{% name(args) %}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveCall {
    /// Directive name: a category or a built-in
    pub name: String,
    /// First argument
    pub names: Names,
    /// Optional second argument overriding the default extension
    pub extension: Option<String>,
}

/// How a category's fragments are turned into output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryHandler {
    /// Underscore mixins merged into one `_.mixin` call
    Mixins,
    /// `.jst` files registered as compiled templates
    Templates,
    /// Verbatim JavaScript carried past the transpiler
    Raw,
    /// Plain inclusion
    Generic,
}

impl CategoryHandler {
    /// Handler for category directory `name`.
    #[must_use]
    pub fn for_category(name: &str) -> Self {
        match name {
            MIXINS_CATEGORY => Self::Mixins,
            TEMPLATES_CATEGORY => Self::Templates,
            RAW_CATEGORY => Self::Raw,
            _ => Self::Generic,
        }
    }
}

/// Parse the argument list of directive `name`.
///
/// # Errors
///
/// Returns [`PercolateError::DirectiveSyntax`] when the arguments are not
/// JSON, the first is neither a string nor an array of strings, or there are
/// more than two.
pub fn parse_call(name: &str, args: &str) -> Result<DirectiveCall, PercolateError> {
    let syntax = |reason: String| PercolateError::DirectiveSyntax {
        directive: format!("{name}({args})"),
        reason,
    };

    let values: Vec<Value> = serde_json::from_str(&format!("[{args}]"))
        .map_err(|e| syntax(format!("arguments must be JSON strings or arrays ({e})")))?;
    let mut values = values.into_iter();

    let names = match values.next() {
        Some(Value::String(single)) => Names::One(single),
        Some(Value::Array(items)) => Names::Many(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(entry) => Ok(entry),
                    other => Err(syntax(format!("list entries must be strings, found {other}"))),
                })
                .collect::<Result<_, _>>()?,
        ),
        Some(other) => return Err(syntax(format!("expected a name or a list of names, found {other}"))),
        None => return Err(syntax("expected a name or a list of names".to_string())),
    };

    let extension = match values.next() {
        None => None,
        Some(Value::String(ext)) => Some(ext),
        Some(other) => return Err(syntax(format!("extension must be a string, found {other}"))),
    };

    if values.next().is_some() {
        return Err(syntax("expected at most two arguments".to_string()));
    }

    Ok(DirectiveCall {
        name: name.to_string(),
        names,
        extension,
    })
}

impl Session {
    /// Replace every directive in `source` with its output.
    pub(crate) fn expand_directives(&mut self, source: &str) -> Result<String> {
        let mut output = String::with_capacity(source.len());
        let mut last = 0;

        for caps in DIRECTIVE.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            output.push_str(&source[last..whole.start()]);

            let call = parse_call(&caps[1], &caps[2])?;
            let emitted = self
                .dispatch(&call)
                .with_context(|| format!("Failed to expand {}", whole.as_str()))?;
            output.push_str(&emitted);

            last = whole.end();
        }

        output.push_str(&source[last..]);
        Ok(output)
    }

    /// Run one parsed directive.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures and rejects unknown categories with
    /// [`PercolateError::UnknownCategory`].
    pub fn dispatch(&mut self, call: &DirectiveCall) -> Result<String> {
        debug!(target: "pipeline", "Directive {}({:?})", call.name, call.names);
        let ext = call.extension.as_deref();

        match call.name.as_str() {
            RAW_DUMP_DIRECTIVE => self.lookup_raw(&call.names),
            VAR_DIRECTIVE => self.var(&call.names),
            category => match self.category_handler(category)? {
                CategoryHandler::Mixins => self.mixins(&call.names, ext),
                CategoryHandler::Templates => self.templates(&call.names, ext),
                CategoryHandler::Raw => self.register_raw(&call.names, ext),
                CategoryHandler::Generic => self.include(category, &call.names, ext),
            },
        }
    }

    /// Handler for `category`, if it exists for the current context.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::UnknownCategory`] when neither the context's
    /// base directory nor the global one has a directory of that name.
    pub fn category_handler(&self, category: &str) -> Result<CategoryHandler, PercolateError> {
        let frame = self.stack.current_frame()?;
        if frame.categories.contains(category) || self.global_categories.contains(category) {
            return Ok(CategoryHandler::for_category(category));
        }

        let known = frame
            .categories
            .iter()
            .chain(self.global_categories.iter())
            .map(String::as_str);
        Err(PercolateError::UnknownCategory {
            name: category.to_string(),
            suggestion: closest_match(category, known),
        })
    }

    /// Include fragments from a plain category.
    ///
    /// A single name emits its content followed by a newline; every entry of
    /// a list is wrapped in newlines.
    ///
    /// # Errors
    ///
    /// Fails if any name does not resolve.
    pub fn include(&mut self, category: &str, names: &Names, ext: Option<&str>) -> Result<String> {
        let ext = ext.unwrap_or(DEFAULT_EXTENSION);
        match names {
            Names::One(name) if !is_wildcard(name) => {
                Ok(snippets::line(&self.resolve(name, Some(category), ext)?))
            }
            _ => {
                let mut output = String::new();
                for name in self.flatten_names(names.as_slice(), category)? {
                    output.push_str(&snippets::block(&self.resolve(&name, Some(category), ext)?));
                }
                Ok(output)
            }
        }
    }

    /// Include underscore mixins.
    ///
    /// A single mixin is emitted untouched. In a list the first entry keeps
    /// its `_.mixin` marker and the rest have it stripped so they merge into
    /// the first call. A pattern expands into a list of its own, so the
    /// first expanded mixin keeps its marker wherever the pattern appears.
    ///
    /// # Errors
    ///
    /// Fails if any name does not resolve.
    pub fn mixins(&mut self, names: &Names, ext: Option<&str>) -> Result<String> {
        match names {
            Names::One(name) if is_wildcard(name) => {
                let expanded = self.expand_star(name, MIXINS_CATEGORY)?;
                if expanded.is_empty() {
                    return Ok(String::new());
                }
                self.mixins(&Names::Many(expanded), ext)
            }
            Names::One(name) => {
                self.resolve(name, Some(MIXINS_CATEGORY), ext.unwrap_or(DEFAULT_EXTENSION))
            }
            Names::Many(list) => {
                let mut output = String::new();
                for (position, name) in list.iter().enumerate() {
                    if is_wildcard(name) {
                        output.push_str(&self.mixins(&Names::One(name.clone()), ext)?);
                        continue;
                    }
                    let content =
                        self.resolve(name, Some(MIXINS_CATEGORY), ext.unwrap_or(DEFAULT_EXTENSION))?;
                    output.push_str(&snippets::mixin_entry(&content, position));
                }
                output.push('\n');
                Ok(output)
            }
        }
    }

    /// Register templates with the client-side template table.
    ///
    /// Templates default to `.jst`. A trailing extension on a name is
    /// dropped, so `list` and `list.jst` both register `Templates['list']`.
    ///
    /// # Errors
    ///
    /// Fails if any name does not resolve.
    pub fn templates(&mut self, names: &Names, ext: Option<&str>) -> Result<String> {
        let ext = ext.unwrap_or(TEMPLATE_EXTENSION);
        let mut output = String::new();
        for name in self.flatten_names(names.as_slice(), TEMPLATES_CATEGORY)? {
            let logical = name.strip_suffix(ext).unwrap_or(&name);
            let content = self.resolve(logical, Some(TEMPLATES_CATEGORY), ext)?;
            output.push_str(&snippets::template_registration(logical, &content));
        }
        Ok(output)
    }

    /// Register raw scripts and emit the markers that bring them back after
    /// transpilation.
    ///
    /// # Errors
    ///
    /// Fails if any name does not resolve.
    pub fn register_raw(&mut self, names: &Names, ext: Option<&str>) -> Result<String> {
        let ext = ext.unwrap_or(RAW_EXTENSION);
        let mut output = String::new();
        for name in self.flatten_names(names.as_slice(), RAW_CATEGORY)? {
            let content = self.resolve(&name, Some(RAW_CATEGORY), ext)?;
            self.raw_scripts.register(name.as_str(), content);
            output.push_str(&snippets::raw_marker(&name));
        }
        Ok(output)
    }

    /// Content of previously registered raw scripts, concatenated.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::RawScriptNotRegistered`] for unknown names.
    pub fn lookup_raw(&self, names: &Names) -> Result<String> {
        let mut output = String::new();
        for name in names.as_slice() {
            output.push_str(self.raw_scripts.lookup(name)?);
        }
        Ok(output)
    }

    /// Value of a variable defined on the current context.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::UnknownVariable`] for undefined names and
    /// [`PercolateError::DirectiveSyntax`] when given a list.
    pub fn var(&self, names: &Names) -> Result<String> {
        let Names::One(name) = names else {
            return Err(PercolateError::DirectiveSyntax {
                directive: VAR_DIRECTIVE.to_string(),
                reason: "expects a single variable name".to_string(),
            }
            .into());
        };

        let ctx = self.stack.current()?;
        ctx.vars
            .get(name)
            .cloned()
            .ok_or_else(|| PercolateError::UnknownVariable { name: name.clone() }.into())
    }
}
