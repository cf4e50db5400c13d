//! The stack of in-flight compilation contexts.
//!
//! Re-templating and nested directive resolution push further contexts while
//! an outer one is still running, so the stack depth follows the call graph.
//! Pushes and pops are strictly nested.

use std::collections::BTreeSet;

use super::context::CompilationContext;
use crate::core::PercolateError;

/// One active context plus the categories found under its base directory.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) context: CompilationContext,
    pub(crate) categories: BTreeSet<String>,
}

/// LIFO stack of active compilation contexts.
#[derive(Debug, Default)]
pub struct ContextStack {
    frames: Vec<Frame>,
}

impl ContextStack {
    /// Create an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames: Vec::new(),
        }
    }

    /// Push a context without any context-local categories.
    pub fn push(&mut self, context: CompilationContext) {
        self.push_frame(context, BTreeSet::new());
    }

    pub(crate) fn push_frame(&mut self, context: CompilationContext, categories: BTreeSet<String>) {
        self.frames.push(Frame {
            context,
            categories,
        });
    }

    /// Remove and return the top context.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::StackEmpty`] when no context is active.
    pub fn pop(&mut self) -> Result<CompilationContext, PercolateError> {
        self.frames.pop().map(|frame| frame.context).ok_or(PercolateError::StackEmpty)
    }

    /// The top context.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::StackEmpty`] when no context is active.
    pub fn current(&self) -> Result<&CompilationContext, PercolateError> {
        self.frames.last().map(|frame| &frame.context).ok_or(PercolateError::StackEmpty)
    }

    pub(crate) fn current_frame(&self) -> Result<&Frame, PercolateError> {
        self.frames.last().ok_or(PercolateError::StackEmpty)
    }

    /// Number of active contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no context is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
