//! daylog: summarize recent commit activity across all branches of a GitLab
//! project with a language model and record it as a spreadsheet row.

pub mod cmd;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use context::AppContext;
pub use domain::record::{Record, SheetRange};
pub use domain::summary::Summary;
pub use error::{AppError, AppResult};
