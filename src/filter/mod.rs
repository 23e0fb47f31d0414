//! Helpers for turning raw `actool` output into a build-friendly diagnostic report.
//!
//! The responsibilities are split into focused submodules so that path rewriting and the
//! section-aware filtering can be tested independently. The compiler driver combines both
//! when deciding whether a run succeeded.

mod rewrite;
mod sections;

pub use rewrite::{PathRewriteTable, PathRewriteTableBuilder, fix_absolute_path_in_line};
pub use sections::{
    NOTICE_SECTION, filter_compiler_output, parse_section_header, rewrite_all_lines,
};
