//! Action and op vocabularies
//!
//! Raw `action` and `op` strings are decoded into closed enums. Unknown op
//! strings are kept in an `Unrecognized` arm so the dispatcher decides what
//! an unknown op means at each scope.

use std::fmt;

/// Top-level request action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Find,
    FindById,
    Update,
    Remove,
    Distinct,
    Explain,
}

impl Action {
    /// Decode an action; unknown or missing actions fall back to `Find`
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some("findById") => Action::FindById,
            Some("update") => Action::Update,
            Some("remove") => Action::Remove,
            Some("distinct") => Action::Distinct,
            Some("explain") => Action::Explain,
            _ => Action::Find,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Find => "find",
            Action::FindById => "findById",
            Action::Update => "update",
            Action::Remove => "remove",
            Action::Distinct => "distinct",
            Action::Explain => "explain",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation on a whole database (no collection selected)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseOp {
    Stats,
    ProcessList,
    NewCollection,
    Command,
    Export,
    Import,
    Repair,
    Auth,
    AddUser,
    Dup,
    Unrecognized(String),
}

impl DatabaseOp {
    pub fn parse(op: &str) -> Self {
        match op {
            "stats" => DatabaseOp::Stats,
            "processlist" => DatabaseOp::ProcessList,
            "newcollection" => DatabaseOp::NewCollection,
            "command" => DatabaseOp::Command,
            "export" => DatabaseOp::Export,
            "import" => DatabaseOp::Import,
            "repair" => DatabaseOp::Repair,
            "auth" => DatabaseOp::Auth,
            "add-user" => DatabaseOp::AddUser,
            "dup" => DatabaseOp::Dup,
            other => DatabaseOp::Unrecognized(other.to_string()),
        }
    }
}

/// Operation on a selected collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionOp {
    Stats,
    Validate,
    Indexes,
    CreateIndex,
    Rename,
    Dup,
    Insert,
    Import,
    Error,
    Unrecognized(String),
}

impl CollectionOp {
    pub fn parse(op: &str) -> Self {
        match op {
            "stats" => CollectionOp::Stats,
            "validate" => CollectionOp::Validate,
            "indexes" => CollectionOp::Indexes,
            "create-index" => CollectionOp::CreateIndex,
            "rename" => CollectionOp::Rename,
            "dup" => CollectionOp::Dup,
            "insert" => CollectionOp::Insert,
            "import" => CollectionOp::Import,
            "error" => CollectionOp::Error,
            other => CollectionOp::Unrecognized(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_fallback() {
        assert_eq!(Action::parse(None), Action::Find);
        assert_eq!(Action::parse(Some("drop")), Action::Find);
        assert_eq!(Action::parse(Some("findById")), Action::FindById);
        assert_eq!(Action::parse(Some("explain")).to_string(), "explain");
    }

    #[test]
    fn test_op_vocabularies() {
        assert_eq!(DatabaseOp::parse("add-user"), DatabaseOp::AddUser);
        assert_eq!(
            DatabaseOp::parse("validate"),
            DatabaseOp::Unrecognized("validate".to_string())
        );
        assert_eq!(CollectionOp::parse("create-index"), CollectionOp::CreateIndex);
        assert_eq!(
            CollectionOp::parse("auth"),
            CollectionOp::Unrecognized("auth".to_string())
        );
    }
}
