// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Taylor kernels for the Add, Sub, Mul, and Div operators.
//!
//! Link to [parent module](super)
//!
//! * B : see [doc_generic_b](crate::base::doc_generic_b)
//!
//! * arg
//!     * arg\[0\]:  variable or parameter index of the left operand
//!     * arg\[1\]:  variable or parameter index of the right operand
//!
//! Kernel arguments follow one convention:
//!
//! * `taylor` (`partial`) is the flat coefficient (partial) matrix with
//!   row stride `n_ord`; the coefficient of order k for variable i is at
//!   `i * n_ord + k` .
//! * `i_z` is the variable index of the primary result.
//! * forward kernels compute orders `q_low ..= q_up` of the results;
//!   multi direction (`_dir`) kernels compute order `q` for each of the
//!   `r` directions in the shared order zero layout; reverse kernels
//!   accumulate partials for orders `0 ..= d` .
// --------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::op::{at, dir_at};
// --------------------------------------------------------------------------
// linear family
//
/// Forward and multi direction kernels for the variable (op) variable
/// case of a linear operator; i.e., Add or Sub.
macro_rules! linear_vv_kernels { ($Name:ident, $method:ident) => {
    paste::paste! {
    //
    pub(crate) fn [< $Name:lower _vv_forward >] <B : Base> (
        q_low : usize, q_up : usize, n_ord : usize,
        taylor : &mut [B], arg : &[IndexT], i_z : usize,
    )
    where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
    {
        let x = arg[0] as usize;
        let y = arg[1] as usize;
        for k in q_low ..= q_up {
            taylor[ at(n_ord, i_z, k) ] = taylor[ at(n_ord, x, k) ]
                .$method( &taylor[ at(n_ord, y, k) ] );
        }
    }
    //
    pub(crate) fn [< $Name:lower _vv_dir >] <B : Base> (
        q : usize, r : usize, n_col : usize,
        taylor : &mut [B], arg : &[IndexT], i_z : usize,
    )
    where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
    {
        let x = arg[0] as usize;
        let y = arg[1] as usize;
        for ell in 0 .. r {
            taylor[ dir_at(n_col, r, i_z, q, ell) ] =
                taylor[ dir_at(n_col, r, x, q, ell) ]
                    .$method( &taylor[ dir_at(n_col, r, y, q, ell) ] );
        }
    }
} } }
linear_vv_kernels!(Add, add);
linear_vv_kernels!(Sub, sub);
// --------------------------------------------------------------------------
// add_pv
//
pub(crate) fn add_pv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p = arg[0] as usize;
    let y = arg[1] as usize;
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] = if k == 0 {
            par[p].add( &taylor[ at(n_ord, y, 0) ] )
        } else {
            taylor[ at(n_ord, y, k) ].clone()
        };
    }
}
//
pub(crate) fn add_pv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let y = arg[1] as usize;
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            taylor[ dir_at(n_col, r, y, q, ell) ].clone();
    }
}
// --------------------------------------------------------------------------
// sub_pv, sub_vp
//
pub(crate) fn sub_pv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p = arg[0] as usize;
    let y = arg[1] as usize;
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] = if k == 0 {
            par[p].sub( &taylor[ at(n_ord, y, 0) ] )
        } else {
            taylor[ at(n_ord, y, k) ].neg()
        };
    }
}
//
pub(crate) fn sub_pv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let y = arg[1] as usize;
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            taylor[ dir_at(n_col, r, y, q, ell) ].neg();
    }
}
//
pub(crate) fn sub_vp_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let p = arg[1] as usize;
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] = if k == 0 {
            taylor[ at(n_ord, x, 0) ].sub( &par[p] )
        } else {
            taylor[ at(n_ord, x, k) ].clone()
        };
    }
}
//
pub(crate) fn sub_vp_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            taylor[ dir_at(n_col, r, x, q, ell) ].clone();
    }
}
// --------------------------------------------------------------------------
// mul
//
pub(crate) fn mul_vv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    mul_rows_forward(q_low, q_up, n_ord, taylor, x, y, i_z);
}
//
// mul_rows_forward
/// convolution z = x * y on explicit rows; also used by the Pow triple
pub(crate) fn mul_rows_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], x : usize, y : usize, i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in q_low ..= q_up {
        let mut sum = B::zero();
        for j in 0 ..= k {
            let term = taylor[ at(n_ord, x, j) ]
                .mul( &taylor[ at(n_ord, y, k - j) ] );
            sum = sum.add( &term );
        }
        taylor[ at(n_ord, i_z, k) ] = sum;
    }
}
//
pub(crate) fn mul_vv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    mul_rows_dir(q, r, n_col, taylor, x, y, i_z);
}
//
pub(crate) fn mul_rows_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], x : usize, y : usize, i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for ell in 0 .. r {
        let mut sum = B::zero();
        for j in 0 ..= q {
            let term = taylor[ dir_at(n_col, r, x, j, ell) ]
                .mul( &taylor[ dir_at(n_col, r, y, q - j, ell) ] );
            sum = sum.add( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = sum;
    }
}
//
pub(crate) fn mul_pv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p = arg[0] as usize;
    let y = arg[1] as usize;
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] =
            par[p].mul( &taylor[ at(n_ord, y, k) ] );
    }
}
//
pub(crate) fn mul_pv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p = arg[0] as usize;
    let y = arg[1] as usize;
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            par[p].mul( &taylor[ dir_at(n_col, r, y, q, ell) ] );
    }
}
// --------------------------------------------------------------------------
// div
//
pub(crate) fn div_vv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in q_low ..= q_up {
        let mut sum = taylor[ at(n_ord, x, k) ].clone();
        for j in 0 .. k {
            let term = taylor[ at(n_ord, i_z, j) ]
                .mul( &taylor[ at(n_ord, y, k - j) ] );
            sum = sum.sub( &term );
        }
        taylor[ at(n_ord, i_z, k) ] = sum.div( &taylor[ at(n_ord, y, 0) ] );
    }
}
//
pub(crate) fn div_vv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for ell in 0 .. r {
        let mut sum = taylor[ dir_at(n_col, r, x, q, ell) ].clone();
        for j in 1 ..= q {
            let term = taylor[ dir_at(n_col, r, y, j, ell) ]
                .mul( &taylor[ dir_at(n_col, r, i_z, q - j, ell) ] );
            sum = sum.sub( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            sum.div( &taylor[ dir_at(n_col, r, y, 0, 0) ] );
    }
}
//
pub(crate) fn div_pv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p = arg[0] as usize;
    let y = arg[1] as usize;
    for k in q_low ..= q_up {
        let mut sum = if k == 0 { par[p].clone() } else { B::zero() };
        for j in 0 .. k {
            let term = taylor[ at(n_ord, i_z, j) ]
                .mul( &taylor[ at(n_ord, y, k - j) ] );
            sum = sum.sub( &term );
        }
        taylor[ at(n_ord, i_z, k) ] = sum.div( &taylor[ at(n_ord, y, 0) ] );
    }
}
//
pub(crate) fn div_pv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let y = arg[1] as usize;
    for ell in 0 .. r {
        let mut sum = B::zero();
        for j in 1 ..= q {
            let term = taylor[ dir_at(n_col, r, y, j, ell) ]
                .mul( &taylor[ dir_at(n_col, r, i_z, q - j, ell) ] );
            sum = sum.sub( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            sum.div( &taylor[ dir_at(n_col, r, y, 0, 0) ] );
    }
}
//
pub(crate) fn div_vp_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let p = arg[1] as usize;
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] =
            taylor[ at(n_ord, x, k) ].div( &par[p] );
    }
}
//
pub(crate) fn div_vp_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let p = arg[1] as usize;
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            taylor[ dir_at(n_col, r, x, q, ell) ].div( &par[p] );
    }
}
// --------------------------------------------------------------------------
// reverse kernels
// --------------------------------------------------------------------------
//
// add_vv_reverse
pub(crate) fn add_vv_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in 0 ..= d {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].add( &pz );
        partial[ at(n_ord, y, k) ] = partial[ at(n_ord, y, k) ].add( &pz );
    }
}
//
// add_pv_reverse
pub(crate) fn add_pv_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let y = arg[1] as usize;
    for k in 0 ..= d {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        partial[ at(n_ord, y, k) ] = partial[ at(n_ord, y, k) ].add( &pz );
    }
}
//
// sub_vv_reverse
pub(crate) fn sub_vv_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in 0 ..= d {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].add( &pz );
        partial[ at(n_ord, y, k) ] = partial[ at(n_ord, y, k) ].sub( &pz );
    }
}
//
// sub_pv_reverse
pub(crate) fn sub_pv_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let y = arg[1] as usize;
    for k in 0 ..= d {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        partial[ at(n_ord, y, k) ] = partial[ at(n_ord, y, k) ].sub( &pz );
    }
}
//
// sub_vp_reverse
pub(crate) fn sub_vp_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    for k in 0 ..= d {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].add( &pz );
    }
}
//
// mul_vv_reverse
pub(crate) fn mul_vv_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    mul_rows_reverse(d, n_ord, taylor, partial, x, y, i_z);
}
//
pub(crate) fn mul_rows_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], x : usize, y : usize, i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in (0 ..= d).rev() {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        for j in 0 ..= k {
            let dx = pz.mul( &taylor[ at(n_ord, y, k - j) ] );
            partial[ at(n_ord, x, j) ] =
                partial[ at(n_ord, x, j) ].add( &dx );
            let dy = pz.mul( &taylor[ at(n_ord, x, j) ] );
            partial[ at(n_ord, y, k - j) ] =
                partial[ at(n_ord, y, k - j) ].add( &dy );
        }
    }
}
//
// mul_pv_reverse
pub(crate) fn mul_pv_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], par : &[B], arg : &[IndexT],
    i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p = arg[0] as usize;
    let y = arg[1] as usize;
    for k in 0 ..= d {
        let dy = par[p].mul( &partial[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, y, k) ] = partial[ at(n_ord, y, k) ].add( &dy );
    }
}
//
// div_vv_reverse
//
// The recursion for z = x / y is
//     z[k] = ( x[k] - sum_{j=1..k} y[j] * z[k-j] ) / y[0]
// so the partial of z[k] w.r.t. x[k] is 1/y[0], w.r.t. y[j] is -z[k-j]/y[0],
// w.r.t. z[k-j] is -y[j]/y[0], and w.r.t. y[0] is -z[k]/y[0].
pub(crate) fn div_vv_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in (0 ..= d).rev() {
        let pz = partial[ at(n_ord, i_z, k) ]
            .div( &taylor[ at(n_ord, y, 0) ] );
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].add( &pz );
        let dy0 = pz.mul( &taylor[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, y, 0) ] = partial[ at(n_ord, y, 0) ].sub( &dy0 );
        for j in 1 ..= k {
            let dy = pz.mul( &taylor[ at(n_ord, i_z, k - j) ] );
            partial[ at(n_ord, y, j) ] =
                partial[ at(n_ord, y, j) ].sub( &dy );
            let dz = pz.mul( &taylor[ at(n_ord, y, j) ] );
            partial[ at(n_ord, i_z, k - j) ] =
                partial[ at(n_ord, i_z, k - j) ].sub( &dz );
        }
    }
}
//
// div_pv_reverse
pub(crate) fn div_pv_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let y = arg[1] as usize;
    for k in (0 ..= d).rev() {
        let pz = partial[ at(n_ord, i_z, k) ]
            .div( &taylor[ at(n_ord, y, 0) ] );
        let dy0 = pz.mul( &taylor[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, y, 0) ] = partial[ at(n_ord, y, 0) ].sub( &dy0 );
        for j in 1 ..= k {
            let dy = pz.mul( &taylor[ at(n_ord, i_z, k - j) ] );
            partial[ at(n_ord, y, j) ] =
                partial[ at(n_ord, y, j) ].sub( &dy );
            let dz = pz.mul( &taylor[ at(n_ord, y, j) ] );
            partial[ at(n_ord, i_z, k - j) ] =
                partial[ at(n_ord, i_z, k - j) ].sub( &dz );
        }
    }
}
//
// div_vp_reverse
pub(crate) fn div_vp_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], par : &[B], arg : &[IndexT],
    i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let p = arg[1] as usize;
    for k in 0 ..= d {
        let dx = partial[ at(n_ord, i_z, k) ].div( &par[p] );
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].add( &dx );
    }
}
