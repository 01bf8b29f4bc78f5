// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! adtape: a tape based automatic differentiation engine.
//!
//! A [record::Recorder] intercepts scalar operations and appends them to a
//! tape. Sealing the tape yields an [AdFun] which can replay it:
//!
//! * [AdFun::forward] computes Taylor coefficients of every variable,
//! * [AdFun::reverse] back propagates derivatives of a scalar objective,
//! * [AdFun::for_jac_sparsity] and friends propagate sparsity patterns,
//! * [AdFun::optimize] rewrites the tape into an equivalent smaller tape.
//!
// ---------------------------------------------------------------------------
// sub-modules
//
pub mod base;
pub mod error;
pub mod op;
pub mod record;
pub mod fun;
pub mod sweep;
pub mod sparse;
pub mod optimize;
pub mod atom;
pub mod discrete;
//
pub(crate) mod play;
// ---------------------------------------------------------------------------
//
// IndexT
/// The type used, instead of usize, for addresses stored on a tape.
/// It saves space in the argument vector and fixes the serialized
/// address width.
pub type IndexT = u32;
//
// re-exports
pub use base::Base;
pub use error::{Error, Result};
pub use record::{AdType, Operand, Recorder, VecAd};
pub use fun::AdFun;
pub use sweep::{Taylor, TaylorDir};
pub use sparse::{Pattern, PatternRep};
pub use op::compare::Rel;
pub use atom::{AtomEval, register_atom};
pub use discrete::register_discrete;
//
// YEAR_MONTH_DAY
/// The date corresponding to this version of the software as year.month.day
///
/// # Example
/// ```
/// let version = &*adtape::YEAR_MONTH_DAY;
/// assert_eq!(version, "2026.7.20");
/// ```
pub const YEAR_MONTH_DAY: std::sync::LazyLock<&str> =
   std::sync::LazyLock::new( || "2026.7.20" );
