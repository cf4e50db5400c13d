//! The depth-staged compilation pipeline.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::context::{CompilationContext, Compression, Depth};
use super::resolver::with_default_extension;
use super::{Session, discover_categories};
use crate::constants::{DEFAULT_EXTENSION, RAW_EXTENSION, RETEMPLATE_PREFIX};
use crate::core::PercolateError;
use crate::tools::diagnostic;
use crate::utils::create_temp_file;

impl Session {
    /// Run `ctx` through the pipeline up to its depth.
    ///
    /// The context is moved onto the stack for the duration of the run and
    /// handed back afterwards, whether the run succeeded or not. Successful
    /// output is cached on the context, so rendering it again returns the
    /// same string without touching the filesystem or the external tools.
    ///
    /// # Errors
    ///
    /// - [`PercolateError::ResolutionFailed`] if the template or a fragment is missing
    /// - [`PercolateError::TranspileFailed`] if the transpiler rejects the source
    /// - [`PercolateError::MinifyFailed`] if the minifier rejects the script
    /// - [`PercolateError::ToolNotFound`] if no minifier is registered for the backend
    pub fn render(&mut self, ctx: &mut CompilationContext) -> Result<String> {
        if let Some(output) = ctx.rendered() {
            debug!(target: "pipeline", "Reusing rendered output of '{}'", ctx.template);
            return Ok(output.to_string());
        }

        let categories = discover_categories(&ctx.base_dir)?;
        self.stack.push_frame(std::mem::take(ctx), categories);
        debug!(target: "pipeline", "Rendering at stack depth {}", self.stack.len());

        let result = self.run_stages();
        *ctx = self.stack.pop()?;

        let output = result?;
        ctx.cache_rendered(output.clone());
        Ok(output)
    }

    fn run_stages(&mut self) -> Result<String> {
        let ctx = self.stack.current()?;
        let template = ctx.template.clone();
        let (depth, bare, compiled, compression) = (ctx.depth, ctx.bare, ctx.compiled, ctx.compression);

        let source = self.load_template(&template)?;
        if depth == Depth::Raw {
            return Ok(source);
        }

        let script = self.transpile(&source, bare)?;
        if depth == Depth::Transpiled {
            return Ok(script);
        }

        let script = self.retemplate(&script)?;
        if depth == Depth::Retemplated || !compiled {
            return Ok(script);
        }

        self.minify(&script, compression)
    }

    /// Stage 0: read the template and expand its directives.
    fn load_template(&mut self, template: &str) -> Result<String> {
        let path = self.locate_template(template)?;
        info!(target: "pipeline", "Loading template {}", path.display());
        self.process_file(&path)
    }

    /// Templates live directly in a base directory rather than in a category.
    fn locate_template(&self, template: &str) -> Result<PathBuf, PercolateError> {
        let ctx = self.stack.current()?;
        let file = with_default_extension(template, DEFAULT_EXTENSION);

        [ctx.base_dir.join(&file), self.global_base_dir.join(&file), PathBuf::from(template)]
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| PercolateError::ResolutionFailed {
                name: template.to_string(),
                category: None,
            })
    }

    /// Stage 1.
    fn transpile(&self, source: &str, bare: bool) -> Result<String> {
        debug!(target: "pipeline", "Transpiling {} bytes (bare: {})", source.len(), bare);
        self.transpiler.transpile(source, bare).map_err(|e| {
            PercolateError::TranspileFailed {
                message: diagnostic(&e),
                source_text: source.to_string(),
            }
            .into()
        })
    }

    /// Stage 2: process the transpiled script as a template of its own.
    ///
    /// The temporary file is removed when `temp` drops, on success and on
    /// failure alike.
    fn retemplate(&mut self, script: &str) -> Result<String> {
        let temp = create_temp_file(RETEMPLATE_PREFIX, RAW_EXTENSION, script)?;
        let path: &Path = &temp;
        debug!(target: "pipeline", "Re-templating through {}", path.display());

        let mut nested = self.stack.current()?.nested_at(path);
        self.render(&mut nested)
    }

    /// Stage 3.
    fn minify(&self, script: &str, backend: Compression) -> Result<String> {
        let minifier = self.minifiers.get(&backend).ok_or_else(|| PercolateError::ToolNotFound {
            tool: format!("{backend} minifier"),
        })?;

        debug!(target: "pipeline", "Minifying {} bytes with {}", script.len(), backend);
        minifier.minify(script).map_err(|e| {
            PercolateError::MinifyFailed {
                backend,
                message: diagnostic(&e),
                source_text: script.to_string(),
            }
            .into()
        })
    }
}
