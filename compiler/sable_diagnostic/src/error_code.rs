//! Error codes for all lowering diagnostics.
//!
//! Format: E#### where the first digit is the failing concern:
//! - E1xxx: declaration errors
//! - E2xxx: name, call and field resolution errors
//! - E3xxx: numeric and type errors
//! - E9xxx: internal engine errors

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Declaration Errors (E1xxx)
    /// Record declares or initializes a field twice
    E1001,
    /// Constants refer to each other in a cycle
    E1002,

    // Resolution Errors (E2xxx)
    /// Call to a function that is not declared
    E2001,
    /// No function implements the capability for the receiver type
    E2002,
    /// Several functions implement the capability for the receiver type
    E2003,
    /// Several overloads accept the call's arguments
    E2004,
    /// Reference to a constant that is not declared
    E2005,
    /// Reference matches several same-named constants
    E2006,
    /// Reference to a local that is not in scope
    E2007,
    /// Field does not exist on the record
    E2008,
    /// Record construction omits a field
    E2009,
    /// Wrong number of call arguments
    E2010,

    // Numeric and Type Errors (E3xxx)
    /// Literal of the wrong kind for the required type
    E3001,
    /// Integer literal outside the range of its type
    E3002,
    /// Literal has no context to bind its type
    E3003,
    /// Exponent not permitted for an integer base
    E3004,
    /// Expression type differs from the required type
    E3005,

    // Internal Errors (E9xxx)
    /// Renamer failed to reach a fixed point
    E9001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Internal errors indicate an engine bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
