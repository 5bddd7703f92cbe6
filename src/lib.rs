// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Numeric allowances: float compares against exact constants and
// int/float casts are deliberate in the algebra
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
// Fallible APIs describe their error in the summary line
#![allow(clippy::missing_errors_doc)]

//! Spatial-transform kernel: vector, matrix, quaternion and Euler-angle
//! algebra, plus a free-flight camera built on it.
//!
//! # Key entry points
//!
//! - [`math`] - `Vector3`, `Vector4`, `Matrix4`, `Quaternion`, `Rotator`
//!   and the shared tolerances
//! - [`camera::Camera`] - orthonormal view basis, view/projection matrices
//!   and navigator ownership
//! - [`camera::FreeFlightNavigator`] - accelerate/damp movement and
//!   mouse-look
//! - [`input::InputProcessor`] - raw events and key strings to latched
//!   navigation input
//! - [`options::Options`] - TOML-backed camera, navigator and keybinding
//!   settings
//!
//! # Conventions
//!
//! Matrices are row-major and act on row vectors (`v' = v * M`), so
//! `a * b` applies `a` first and the translation lives in row 3. Angles on
//! the camera and quaternions are radians; [`math::Rotator`] and the
//! camera field of view are degrees.
//!
//! Degenerate numerical input never panics. The algebra substitutes
//! identity or zero values and reports through the `log` facade; the few
//! caller mistakes that are worth surfacing are returned as
//! [`error::KernelError`].

pub mod camera;
pub mod error;
pub mod input;
pub mod math;
pub mod options;
pub mod util;
