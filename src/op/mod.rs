// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! This pub module defines the operator set and the Taylor kernels
//! used to replay an operation sequence.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// sub-modules
//
pub mod id;
pub mod info;
pub mod compare;
//
pub(crate) mod arith;
pub(crate) mod zmul;
pub(crate) mod pow;
pub(crate) mod unary;
pub(crate) mod trig;
pub(crate) mod inv_trig;
pub(crate) mod erf;
pub(crate) mod cexp;
pub(crate) mod csum;
pub(crate) mod call;
// ---------------------------------------------------------------------------
//
// KernelResult
/// kernels report domain faults without knowing their operator index;
/// the sweep attaches the index
pub(crate) type KernelResult = Result<(), &'static str>;
//
// at
/// index of the order k Taylor coefficient for variable i,
/// row stride n_ord
#[inline]
pub(crate) fn at(n_ord : usize, i : usize, k : usize) -> usize {
    i * n_ord + k
}
//
// dir_at
/// index of the order k, direction ell Taylor coefficient for variable i
/// in the multi direction layout (order zero is shared by all directions,
/// row stride n_col = 1 + q_max * r)
#[inline]
pub(crate) fn dir_at(
    n_col : usize, r : usize, i : usize, k : usize, ell : usize
) -> usize {
    if k == 0 {
        i * n_col
    } else {
        i * n_col + 1 + (k - 1) * r + ell
    }
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use crate::op::id::NUMBER_OP;
    use crate::op::info::OP_INFO_VEC;
    //
    // Every operator has a distinct name; this would fail if two operator
    // identifiers were assigned the same value.
    #[test]
    fn test_op_names_unique() {
        let mut names : Vec<&'static str> = Vec::new();
        for op in 0 .. NUMBER_OP as usize {
            let name = OP_INFO_VEC[op].name;
            assert_ne!( name, "invalid" );
            assert!( ! names.contains( &name ), "duplicate name {name}" );
            names.push( name );
        }
    }
    //
    // The numeric operator codes are part of the serialized tape layout.
    #[test]
    fn test_op_codes_stable() {
        use crate::op::id::*;
        assert_eq!( BEGIN_OP,  0 );
        assert_eq!( END_OP,    1 );
        assert_eq!( INV_OP,    2 );
        assert_eq!( ADD_VV_OP, 5 );
        assert_eq!( FUNRV_OP + 1, NUMBER_OP );
    }
}
