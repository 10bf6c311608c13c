//! # Unitshift Rewrite
//!
//! Text-level migration of C++ sources from the `units` library syntax to
//! mp-units, without parsing the language.
//!
//! ## Architecture
//!
//! ```text
//! Source lines
//!     │
//!     ├──> Buffer (lines keep their terminators)
//!     │
//!     ├──> Pipeline, one full traversal per stage
//!     │    ├─> Includes → renames → .to<>() calls
//!     │    ├─> Types (parameters first, then everywhere), bare units, literals
//!     │    ├─> decltype blocks → .value() extraction → cleanup
//!     │    └─> Residual count, secondary include, include advisories
//!     │
//!     └──> Transformed { lines, changed, diagnostics }
//! ```
//!
//! Passes locate their edits with a small set of scanning primitives:
//! bracket matching across lines, receiver-expression boundaries, numeric
//! literal boundaries and "is this the end of a unit value" recognition.
//! Anything too ambiguous to rewrite safely is left as-is and reported.
//!
//! ## Example
//!
//! ```rust
//! use unitshift_rewrite::Rewriter;
//!
//! let rewriter = Rewriter::default();
//! let out = rewriter.transform_str("units::meter_t x = 5_m;\n").unwrap();
//!
//! assert!(out.changed);
//! assert_eq!(out.text(), "mp::quantity<mp::m> x = 5.0 * mp::m;\n");
//! ```

mod buffer;
mod config;
mod context;
mod conversion;
mod cursor;
mod diagnostics;
mod error;
mod expr;
mod passes;
mod pipeline;
mod recognize;
mod scan;
pub mod selftest;
mod symbols;

pub use buffer::{Buffer, Pos};
pub use config::RewriteConfig;
pub use cursor::LineCursor;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{Result, RewriteError};
pub use expr::find_expr_start;
pub use pipeline::{transform, IncludeState, PassResult, Rewriter, Transformed};
pub use scan::{find_match, first_non_space, prev_non_space, NumericLiteral};
pub use symbols::{BareUnit, Rename, SymbolEntry, Tier, TierTable, UnitSymbolTable};
