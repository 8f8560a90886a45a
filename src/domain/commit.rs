use crate::domain::branch::Branch;

/// Commit messages collected from one branch, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitMessageBatch {
    pub branch: String,
    pub messages: Vec<String>,
}

impl CommitMessageBatch {
    pub fn new(branch: &Branch, messages: Vec<String>) -> Self {
        Self {
            branch: branch.name.clone(),
            messages,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Commit messages of every branch, flattened in branch-enumeration order and
/// then commit order within each branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedMessages(Vec<String>);

impl AggregatedMessages {
    pub fn aggregate<I>(batches: I) -> Self
    where
        I: IntoIterator<Item = CommitMessageBatch>,
    {
        let messages = batches
            .into_iter()
            .filter(|batch| !batch.is_empty())
            .flat_map(|batch| batch.messages)
            .collect();
        Self(messages)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One message per line, each encoded as a JSON string literal so that
    /// newlines and quotes inside a message cannot be mistaken for the
    /// separator.
    pub fn join_for_prompt(&self) -> String {
        self.0
            .iter()
            .map(|message| {
                serde_json::to_string(message.trim_end())
                    .unwrap_or_else(|_| format!("\"{}\"", message.escape_default()))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<String>> for AggregatedMessages {
    fn from(messages: Vec<String>) -> Self {
        Self(messages)
    }
}
