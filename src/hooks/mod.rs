//! Hook planning and execution
//!
//! A [`RunPlan`] resolves every hook registration against a file set and a
//! stage: which files it would receive, which argv it would run, or why it
//! is skipped. [`HookExecutor`] then runs the in-tree part of the plan.
//!
//! ## What runs here
//!
//! - `repo: local` hooks: `entry` + `args` are spawned directly (no shell),
//!   with filenames appended in batches unless `pass_filenames: false`
//! - `language: pygrep` and `language: fail` are handled natively
//! - `repo: meta` hooks (`identity`, `check-hooks-apply`,
//!   `check-useless-excludes`) are implemented natively
//!
//! Remote hooks need their repository cloned and an environment built,
//! which is the external runner's job; they are planned and reported as
//! delegated.
//!
//! ```yaml
//! repos:
//!   - repo: local
//!     hooks:
//!       - id: ci-generate
//!         entry: .pfnci/generate.py --dry-run
//!         pass_filenames: false
//!         language: python
//! ```

mod executor;
mod meta;
mod plan;

pub use executor::{
    ExecutorOptions, HookExecutor, HookOutcome, HookStatus, RunSummary, partition,
};
pub use meta::{MetaContext, MetaOutcome, run_meta};
pub use plan::{
    FileClassifier, HookSelector, Invocation, PlanOptions, PlannedHook, RunPlan, SkipReason,
};
