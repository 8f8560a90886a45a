use std::fmt;

const LABEL_PREFIX: &str = "Summary message:";
const NO_COMMITS: &str = "No commits.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary(String);

impl Summary {
    /// Strips the label the model tends to prepend, then trims.
    pub fn from_completion(text: &str) -> Self {
        let stripped = text.replacen(LABEL_PREFIX, "", 1);
        Self(stripped.trim().to_string())
    }

    pub fn no_commits() -> Self {
        Self(NO_COMMITS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
