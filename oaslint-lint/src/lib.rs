//! Rule runtime and bundled rules for linting OpenAPI documents.
//!
//! [`Linter`] drives the bundled (or a caller-supplied) [`Rule`] set over
//! an `oaslint-analysis` project, producing sorted, deterministic
//! diagnostics and advisory fixes (§4.8).

#![warn(missing_docs)]

pub mod fix;
pub mod rule;
pub mod rules;
pub mod runtime;
pub mod validators;

pub use fix::FixBuilder;
pub use rule::Rule;
pub use rule::RuleMeta;
pub use rule::RuleType;
pub use rule::Scope;
pub use runtime::EngineOutput;
pub use runtime::Linter;
pub use runtime::RuleCtx;
pub use runtime::RuleOverrides;
pub use runtime::PARSE_ERROR_RULE_ID;
pub use tokio_util::sync::CancellationToken;
