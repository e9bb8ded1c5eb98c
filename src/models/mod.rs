//! Domain models for project-ledger.
//!
//! - [`ProjectDetails`]: the metadata record stored as `details.json` inside
//!   each project directory. The directory name is the project's identity.
//! - [`CreateProjectInput`] / [`UpdateProjectInput`]: operation inputs.
//! - [`SearchQuery`] / [`SearchResults`]: keyword and date-range search.

mod project;
mod search;

pub use project::*;
pub use search::*;
