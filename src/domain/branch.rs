use std::fmt;

/// Provider-side identifier of a repository: a numeric project id or a
/// `namespace/project` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryId(String);

impl RepositoryId {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim().trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_repository_id() {
        let id = RepositoryId::new(" /group/project/ ").unwrap();
        assert_eq!(id.as_str(), "group/project");
        assert_eq!(id.to_string(), "group/project");
    }

    #[test]
    fn rejects_blank_repository_id() {
        assert!(RepositoryId::new("   ").is_none());
        assert!(RepositoryId::new("/").is_none());
    }
}
