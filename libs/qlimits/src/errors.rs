//! Error catalog - problem definitions for every `qlimits::Error` kind
//!
//! Used by `problem_mapping` to render RFC 9457 Problem responses.
use qlimits_errors::ErrDef;

/// A requested value exceeded a global or structural ceiling (400).
pub const LIMIT_EXCEEDED: ErrDef = ErrDef {
    status: 400,
    title: "Query Limit Exceeded",
    code: "qlimits.limit_exceeded.v1",
    type_url: "https://errors.qlimits.dev/limit_exceeded",
};

/// A query option value could not be read (400).
pub const INVALID_VALUE: ErrDef = ErrDef {
    status: 400,
    title: "Invalid Query Option",
    code: "qlimits.invalid_value.v1",
    type_url: "https://errors.qlimits.dev/invalid_value",
};

/// Integration error inside the validation pipeline (500).
pub const INTERNAL: ErrDef = ErrDef {
    status: 500,
    title: "Internal Server Error",
    code: "qlimits.internal.v1",
    type_url: "https://errors.qlimits.dev/internal",
};
