pub mod language_model;
pub mod source_control;
pub mod spreadsheet;

pub use language_model::LanguageModelService;
pub use source_control::SourceControlService;
pub use spreadsheet::SpreadsheetService;
