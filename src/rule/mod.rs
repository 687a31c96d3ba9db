//! The rule table: asset-classification and loader-chain resolution.
//!
//! # Module Structure
//!
//! ```text
//! rule/
//! ├── pattern    # glob / `re:` regex path patterns
//! ├── step       # TransformStep + precedence groups
//! ├── output     # naming templates and output placement
//! ├── table      # Rule, RuleTable::compile (validation)
//! └── resolve    # first-match-wins resolution
//! ```

mod output;
mod pattern;
mod resolve;
mod step;
mod table;

pub use output::{NamingTemplate, OutputSpec, TemplateError};
pub use pattern::{Pattern, PatternError};
pub use resolve::{Resolution, ResolutionResult, ResolveError};
pub use step::{StepOrder, TransformStep};
pub use table::{Rule, RuleTable};
