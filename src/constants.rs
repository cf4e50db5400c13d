//! Constants used throughout the percolate codebase.
//!
//! File names, default extensions and the directive vocabulary live here so
//! the resolver, the directive layer and the configuration agree on them.

/// Extension appended to names without a literal `.` when no override is given.
pub const DEFAULT_EXTENSION: &str = ".coffee";

/// Extension for fragments in the `templates` category.
pub const TEMPLATE_EXTENSION: &str = ".jst";

/// Extension for fragments in the `raw` category.
pub const RAW_EXTENSION: &str = ".js";

/// Category holding underscore mixin fragments.
pub const MIXINS_CATEGORY: &str = "mixins";

/// Category holding client-side `.jst` templates.
pub const TEMPLATES_CATEGORY: &str = "templates";

/// Category holding verbatim JavaScript.
pub const RAW_CATEGORY: &str = "raw";

/// Suffix marking a directive argument as a directory wildcard.
pub const WILDCARD_MARKER: char = '*';

/// Marker stripped from every mixin after the first in a list.
pub const MIXIN_MARKER: &str = "_.mixin";

/// Built-in directive that substitutes a registered raw script.
pub const RAW_DUMP_DIRECTIVE: &str = "raw_dump";

/// Built-in directive that emits a context variable.
pub const VAR_DIRECTIVE: &str = "var";

/// Configuration file searched for in the working directory and its parents.
pub const CONFIG_FILE_NAME: &str = "percolate.toml";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "PERCOLATE_CONFIG";

/// Prefix of the scoped temporary file used for re-templating.
pub const RETEMPLATE_PREFIX: &str = "percolate-";

/// Similarity threshold for "did you mean" suggestions, as a percentage of the
/// length of the misspelled name.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;
