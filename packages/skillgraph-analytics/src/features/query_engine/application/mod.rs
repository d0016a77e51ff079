//! Query Engine Application Layer (UseCase)
//!
//! Clean entry point for external callers. The CLI and library users go
//! through [`SkillQueryUseCase`]; the stages below it stay internal.
//!
//! # Architecture
//! ```text
//! External (CLI / library callers)
//!           ↓
//! application/ (this module)
//!           ↓
//! filter → join → aggregation → ranking → composition
//!           ↓
//! skillgraph-storage (DatasetStore)
//! ```

mod query_usecase;

pub use query_usecase::{SkillQueryUseCase, SkillQueryUseCaseImpl};
