use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{LanguageModelService, SourceControlService, SpreadsheetService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub source_control: Arc<dyn SourceControlService>,
    pub language_model: Arc<dyn LanguageModelService>,
    pub spreadsheet: Arc<dyn SpreadsheetService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        source_control: Arc<dyn SourceControlService>,
        language_model: Arc<dyn LanguageModelService>,
        spreadsheet: Arc<dyn SpreadsheetService>,
    ) -> Self {
        Self {
            config,
            source_control,
            language_model,
            spreadsheet,
        }
    }
}
