//! # Spec Test Metadata
//!
//! Model and header parser for tests that link themselves to sentences of the
//! language specification.
//!
//! ## Header
//!
//! ```text
//! /*
//!  * KOTLIN DIAGNOSTICS SPEC TEST (POSITIVE)
//!  *
//!  * SPEC VERSION: 0.1-218
//!  * MAIN LINK: expressions, when-expression -> paragraph 2 -> sentence 5
//!  * PRIMARY LINKS: expressions, when-expression -> paragraph 6 -> sentence 1
//!  * NUMBER: 3
//!  * DESCRIPTION: Exhaustive when with sealed subjects.
//!  */
//! ```
//!
//! Implementation tests use a `RELEVANT SPEC SENTENCES (spec version: …, test type: …)`
//! block instead; its first sentence is the main link.
//!
//! ## Example
//!
//! ```rust
//! use specmap_metadata::{AreaLabel, HeaderParser, ParsedFile, TestOrigin};
//!
//! let parser = HeaderParser::new(vec![AreaLabel::new("PSI", "psi")]);
//! let source = "/*\n * KOTLIN PSI SPEC TEST (POSITIVE)\n * SPEC VERSION: 0.1\n \
//!               * MAIN LINK: statements -> paragraph 1 -> sentence 2\n */\n";
//!
//! match parser.parse("t.kt", source, TestOrigin::Spec, "psi").unwrap() {
//!     ParsedFile::Linked(test) => assert_eq!(test.link_count(), 1),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod error;
mod parser;
mod types;

pub use error::{ParseError, Result};
pub use parser::{has_implementation_test_info, parse_link, AreaLabel, HeaderParser, ParsedFile};
pub use types::{
    LinkRole, LinkedTest, SpecCoordinate, TestCase, TestCases, TestOrigin, TestType,
};
