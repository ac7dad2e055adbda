//! Procedure label
//!
//! Distinguishes exec-path from query-path calls in metrics and logs.

use std::fmt;

use serde::Serialize;

/// The two kinds of engine call the gateway makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Procedure {
    /// Mutating statement
    Exec,
    /// Reading statement
    Query,
}

impl Procedure {
    /// All procedures, in label order
    pub const ALL: [Procedure; 2] = [Procedure::Exec, Procedure::Query];

    /// Label value used for the `procedure` tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Procedure::Exec => "exec",
            Procedure::Query => "query",
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
