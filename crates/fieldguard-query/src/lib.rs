//! # fieldguard-query
//!
//! Recovers the fields a read-only query touches from its text alone.
//!
//! This crate provides functionality to:
//! - Split a query into its clauses (`SELECT`, `FROM`, `WHERE`, `ORDER`, `LIMIT`, `OFFSET`)
//! - Collect field tokens from the selection list and the filter predicate
//! - Collapse relationship traversals to the local field that gates them
//!
//! ## How It Works
//!
//! ```text
//! SELECT Name, Owner__r.Email FROM Case__c WHERE Manager.Name LIKE 'A%'
//!        └─ select ─────────┘      └ from ┘       └── where ─────────┘
//!
//! select fields: NAME, OWNER__R.EMAIL
//! where fields:  MANAGER.NAME
//! normalized:    MANAGERID, NAME, OWNER__C
//! ```
//!
//! Parsing is deliberately heuristic: predicates are scanned for identifiers sitting
//! before an operator rather than parsed into an expression tree.
//!
//! ## Known Limitations
//!
//! | Input | Behavior |
//! |-------|----------|
//! | Sub-selects, multiple statements | Not supported |
//! | `FORMAT(Amount, 'x')` in the selection list | Split on the inner comma |
//! | `MAX(Owner.Name)` | Parentheses stripped, then collapsed to `MAXOWNERID` |

pub mod decomposer;
pub mod error;
mod literal;
pub mod normalizer;
pub mod predicate;
pub mod select;

pub use decomposer::{Clause, QueryDecomposer, QuerySegments};
pub use error::QueryError;
pub use normalizer::FieldNormalizer;
pub use predicate::WhereFieldExtractor;
pub use select::{SelectFieldExtractor, SelectFields};
