use std::fmt;

use serde::Serialize;

/// What the caller intends to do with a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Mutate,
    Delete,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Mutate => f.write_str("mutate"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Predicate verdict on deny
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// 401
    Unauthenticated,
    /// 403
    Forbidden,
    /// 404, also used where existence must stay hidden
    NotFound,
}

impl Denial {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
        }
    }
}

/// Count of rows of one type that reference the entity being deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentCount {
    pub kind: String,
    pub count: u64,
}

/// Itemized dependents blocking a delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub entity: String,
    pub id: String,
    pub dependents: Vec<DependentCount>,
}

impl DependencyReport {
    pub fn new(entity: &str, id: &str) -> Self {
        Self {
            entity: entity.to_string(),
            id: id.to_string(),
            dependents: Vec::new(),
        }
    }

    pub fn with(mut self, kind: &str, count: u64) -> Self {
        self.dependents.push(DependentCount {
            kind: kind.to_string(),
            count,
        });
        self
    }

    pub fn total(&self) -> u64 {
        self.dependents.iter().map(|d| d.count).sum()
    }

    pub fn is_clear(&self) -> bool {
        self.total() == 0
    }

    pub fn count_of(&self, kind: &str) -> Option<u64> {
        self.dependents.iter().find(|d| d.kind == kind).map(|d| d.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_is_clear_only_when_every_count_is_zero() {
        let report = DependencyReport::new("region", "r1")
            .with("locations", 0)
            .with("studios", 0);
        assert!(report.is_clear());

        let blocked = report.with("profiles", 2);
        assert!(!blocked.is_clear());
        assert_eq!(blocked.total(), 2);
        assert_eq!(blocked.count_of("profiles"), Some(2));
        assert_eq!(blocked.count_of("casting_calls"), None);
    }
}
