//! Template resolution and staged script compilation.
//!
//! A [`Session`] owns everything that must stay consistent across re-entrant
//! calls: the [`ContextStack`] of in-flight compilations and the
//! [`RawScriptRegistry`]. It is threaded explicitly (`&mut Session`) through
//! the resolver, the directive layer and the pipeline.
//!
//! # Pipeline
//!
//! [`Session::render`] drives a context through up to four stages:
//!
//! | Depth | Stage        | Result                                            |
//! |-------|--------------|---------------------------------------------------|
//! | 0     | load         | template with directives expanded, tabs normalized |
//! | 1     | transpile    | JavaScript from the [`Transpiler`]                 |
//! | 2     | re-template  | stage 1 output processed again as a template       |
//! | 3+    | minify       | [`Minifier`] output when the context is compiled   |
//!
//! # Directives
//!
//! Templates pull in fragments with `{% name(args) %}` directives. `name` is
//! a category directory found under the context's base directory or the
//! global base directory (`mixins`, `templates`, `raw` have dedicated
//! handlers, anything else is a plain include) or one of the built-ins
//! `raw_dump` and `var`. Arguments are JSON: a name, an array of names or a
//! `*`-suffixed directory pattern, optionally followed by an extension.
//!
//! ```coffee
//! {% mixins(["core", "helpers/*"]) %}
//! {% templates("list") %}
//! {% raw("jquery.cookie") %}
//! VERSION = "{% var("version") %}"
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use percolate::compile::{CompilationContext, Compression, Session};
//! use percolate::tools::{CoffeeTranspiler, UglifyMinifier};
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut session = Session::new("assets/coffee", CoffeeTranspiler::default())?
//!     .with_minifier(Compression::Uglify, UglifyMinifier::default());
//!
//! let mut ctx = CompilationContext::forge("assets/app", "app.coffee")
//!     .compiled(true)
//!     .compression(Compression::Uglify)
//!     .output_dir("public/js")
//!     .output_file("app.js");
//!
//! let status = session.save(&mut ctx, None, None)?;
//! println!("{} {}", status.action, status.destination.display());
//! # Ok(())
//! # }
//! ```

pub mod collapse;
pub mod context;
pub mod directives;
pub mod expander;
pub mod persist;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod snippets;
pub mod stack;

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::tools::{Minifier, Transpiler};

pub use collapse::{Key, KeyNode, collapse};
pub use context::{CompilationContext, Compression, Depth};
pub use directives::{CategoryHandler, DirectiveCall, Names};
pub use persist::{SaveAction, SaveStatus};
pub use registry::RawScriptRegistry;
pub use resolver::{normalize, with_default_extension};
pub use stack::ContextStack;

/// Shared state for one compilation session.
pub struct Session {
    global_base_dir: PathBuf,
    global_categories: BTreeSet<String>,
    stack: ContextStack,
    raw_scripts: RawScriptRegistry,
    transpiler: Box<dyn Transpiler>,
    minifiers: HashMap<Compression, Box<dyn Minifier>>,
}

impl Session {
    /// Start a session over `global_base_dir` using `transpiler` for stage 1.
    ///
    /// Category directories under the global base directory are discovered
    /// here; a missing global base directory simply contributes none.
    ///
    /// # Errors
    ///
    /// Returns an error if the global base directory exists but cannot be read.
    pub fn new(
        global_base_dir: impl Into<PathBuf>,
        transpiler: impl Transpiler + 'static,
    ) -> Result<Self> {
        let global_base_dir = global_base_dir.into();
        let global_categories = discover_categories(&global_base_dir)?;
        tracing::debug!(
            target: "pipeline",
            "Session over {} with categories {:?}",
            global_base_dir.display(),
            global_categories
        );

        Ok(Self {
            global_base_dir,
            global_categories,
            stack: ContextStack::new(),
            raw_scripts: RawScriptRegistry::new(),
            transpiler: Box::new(transpiler),
            minifiers: HashMap::new(),
        })
    }

    /// Register the minifier used for contexts selecting `backend`.
    #[must_use]
    pub fn with_minifier(mut self, backend: Compression, minifier: impl Minifier + 'static) -> Self {
        self.minifiers.insert(backend, Box::new(minifier));
        self
    }

    /// The global base directory, consulted after the context's own.
    pub fn global_base_dir(&self) -> &Path {
        &self.global_base_dir
    }

    /// Push `context`, discovering the categories under its base directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the context's base directory exists but cannot be read.
    pub fn push(&mut self, context: CompilationContext) -> Result<()> {
        let categories = discover_categories(&context.base_dir)?;
        self.stack.push_frame(context, categories);
        Ok(())
    }

    /// Pop the innermost context.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::StackEmpty`](crate::core::PercolateError::StackEmpty)
    /// when no context is active.
    pub fn pop(&mut self) -> Result<CompilationContext> {
        Ok(self.stack.pop()?)
    }

    /// The innermost active context.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::StackEmpty`](crate::core::PercolateError::StackEmpty)
    /// when no context is active.
    pub fn current(&self) -> Result<&CompilationContext> {
        Ok(self.stack.current()?)
    }

    /// The stack of active contexts.
    pub fn stack(&self) -> &ContextStack {
        &self.stack
    }

    /// Raw scripts registered so far in this session.
    pub fn raw_scripts(&self) -> &RawScriptRegistry {
        &self.raw_scripts
    }

    /// Categories available to the innermost context, local and global.
    ///
    /// # Errors
    ///
    /// Fails when no context is active.
    pub fn categories(&self) -> Result<BTreeSet<String>> {
        let frame = self.stack.current_frame()?;
        Ok(frame.categories.union(&self.global_categories).cloned().collect())
    }
}

/// Names of the non-hidden directories directly under `base_dir`.
///
/// Symlinked directories count as categories. A missing directory yields an
/// empty set.
///
/// # Errors
///
/// Returns an error if `base_dir` exists but cannot be listed.
pub fn discover_categories(base_dir: &Path) -> Result<BTreeSet<String>> {
    let mut categories = BTreeSet::new();
    if !base_dir.is_dir() {
        return Ok(categories);
    }

    let walker = WalkDir::new(base_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !expander::is_hidden(entry));

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to list categories in {}", base_dir.display()))?;
        if entry.file_type().is_dir() {
            categories.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(categories)
}
