// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Taylor kernels for the cumulative sum operator.
//!
//! Link to [parent module](super)
//!
//! * arg
//!     * arg\[0\]:  n_add, the number of variable addends
//!     * arg\[1\]:  n_sub, the number of variable subtrahends
//!     * arg\[2\]:  parameter index of the net constant offset
//!     * arg\[3 .. 3 + n_add\]:  variable indices of the addends
//!     * arg\[3 + n_add .. 3 + n_add + n_sub\]:  variable indices of the
//!       subtrahends
//!     * arg\[3 + n_add + n_sub\]:  the total slot count
//!       4 + n_add + n_sub, so a reverse scanner can jump backward over
//!       the block
// --------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::op::{at, dir_at};
// --------------------------------------------------------------------------
//
// split
/// the addend and subtrahend variable index slices
pub(crate) fn split(arg : &[IndexT]) -> (&[IndexT], &[IndexT]) {
    let n_add = arg[0] as usize;
    let n_sub = arg[1] as usize;
    debug_assert_eq!( arg[3 + n_add + n_sub] as usize, 4 + n_add + n_sub );
    ( &arg[3 .. 3 + n_add], &arg[3 + n_add .. 3 + n_add + n_sub] )
}
// --------------------------------------------------------------------------
// csum_forward
pub(crate) fn csum_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let (add, sub) = split(arg);
    for k in q_low ..= q_up {
        let mut sum = if k == 0 {
            par[ arg[2] as usize ].clone()
        } else {
            B::zero()
        };
        for a in add {
            sum = sum.add( &taylor[ at(n_ord, *a as usize, k) ] );
        }
        for s in sub {
            sum = sum.sub( &taylor[ at(n_ord, *s as usize, k) ] );
        }
        taylor[ at(n_ord, i_z, k) ] = sum;
    }
}
//
// csum_dir
pub(crate) fn csum_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let (add, sub) = split(arg);
    for ell in 0 .. r {
        let mut sum = B::zero();
        for a in add {
            sum = sum.add( &taylor[ dir_at(n_col, r, *a as usize, q, ell) ] );
        }
        for s in sub {
            sum = sum.sub( &taylor[ dir_at(n_col, r, *s as usize, q, ell) ] );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = sum;
    }
}
//
// csum_reverse
pub(crate) fn csum_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let (add, sub) = split(arg);
    for k in 0 ..= d {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        for a in add {
            let i = *a as usize;
            partial[ at(n_ord, i, k) ] = partial[ at(n_ord, i, k) ].add( &pz );
        }
        for s in sub {
            let i = *s as usize;
            partial[ at(n_ord, i, k) ] = partial[ at(n_ord, i, k) ].sub( &pz );
        }
    }
}
