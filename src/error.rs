// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Typed errors reported at the engine boundary.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
//
/// The result type used by fallible tape operations.
pub type Result<T> = std::result::Result<T, Error>;
//
// Error
/// Errors are local: the tape and buffers involved are left in a
/// well defined state (pre-operation for recording errors, best effort
/// partial output for sweep errors). There is no cross tape propagation.
///
/// Compare changes are not an error; see
/// [AdFun::compare_change_count](crate::AdFun::compare_change_count) .
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    //
    // RecordingInvariant
    /// An append would violate the tape's single assignment (DAG)
    /// or arity invariant.
    RecordingInvariant { what : String },
    //
    // AbortOpIndex
    /// The operator index pre-declared with
    /// [Recorder::set_abort_op_index](crate::Recorder::set_abort_op_index)
    /// was reached.
    AbortOpIndex { op_index : usize },
    //
    // NumericDomain
    /// A replay time domain error; e.g., log of zero during a forward
    /// sweep. The operator index on the tape is reported.
    NumericDomain { op_index : usize, what : &'static str },
    //
    // VecAdIndexOutOfRange
    /// A dynamic vector load or store used an index that is greater than
    /// or equal to the vector length.
    VecAdIndexOutOfRange { op_index : usize, index : usize, length : usize },
    //
    // SparsityShapeMismatch
    /// An input sparsity pattern's dimensions disagree with the tape,
    /// or a Hessian sweep was requested before its Jacobian pattern.
    SparsityShapeMismatch { what : String },
    //
    // AtomicFailure
    /// An atomic function callback returned not ok.
    AtomicFailure { atom_index : usize, call_id : usize },
    //
    // OptimizerConsistency
    /// The optimized tape failed its structural or zero order replay check.
    OptimizerConsistency { what : String },
    //
    // Serialize
    /// A serialized tape record was malformed or has an
    /// incompatible layout.
    Serialize { what : String },
}
//
impl std::fmt::Display for Error {
    fn fmt(&self, f : &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::RecordingInvariant { what } =>
                write!(f, "recording invariant violated: {what}"),
            Error::AbortOpIndex { op_index } =>
                write!(f, "recording aborted at operator index {op_index}"),
            Error::NumericDomain { op_index, what } =>
                write!(f, "numeric domain error at operator {op_index}: {what}"),
            Error::VecAdIndexOutOfRange { op_index, index, length } =>
                write!(f,
                    "vector index {index} >= length {length} at operator {op_index}"
                ),
            Error::SparsityShapeMismatch { what } =>
                write!(f, "sparsity shape mismatch: {what}"),
            Error::AtomicFailure { atom_index, call_id } =>
                write!(f,
                    "atomic function {atom_index} (call id {call_id}) returned not ok"
                ),
            Error::OptimizerConsistency { what } =>
                write!(f, "optimizer consistency check failed: {what}"),
            Error::Serialize { what } =>
                write!(f, "tape record error: {what}"),
        }
    }
}
//
impl std::error::Error for Error {}
