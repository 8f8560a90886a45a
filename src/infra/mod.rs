pub mod gitlab;
pub mod openai;
pub mod sheets;

pub use gitlab::GitLabClient;
pub use openai::OpenAiClient;
pub use sheets::GoogleSheetsClient;
