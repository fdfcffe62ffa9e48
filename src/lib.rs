//! Build-time scoping for CSS module stylesheets.
//!
//! Identically-named classes declared in different files must not collide
//! once bundled into one global stylesheet. This crate implements the
//! deterministic scoping scheme that prevents that: [`scope`] derives a
//! short fingerprint from the declaring file's path, [`stylesheet`] rewrites
//! class selectors in place, and [`pipeline`] drives both over a project
//! tree, emitting rewritten stylesheets and a JSON [`manifest`].
//!
//! The root module re-exports the main entry points so embedders can drive
//! the pipeline without digging through the module hierarchy.

pub mod app_dirs;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod scan;
pub mod scope;
pub mod stylesheet;

pub use manifest::ScopeManifest;
pub use pipeline::{FileReport, Pipeline, PipelineError, PipelineReport};
pub use scan::ScanOptions;
pub use scope::{FINGERPRINT_LEN, SEPARATOR, fingerprint, scoped_class_name};
pub use stylesheet::{RewriteOutcome, rewrite_classes};
