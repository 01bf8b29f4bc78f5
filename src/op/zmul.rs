// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Taylor kernels for the absolute zero product operators.
//!
//! If the left factor's zero order coefficient is exactly zero, the
//! result is identically zero across all orders, even when the right
//! factor is nan or infinite at replay.
//!
//! Link to [parent module](super)
//!
//! * arg
//!     * arg\[0\]:  variable or parameter index of the left factor
//!     * arg\[1\]:  variable or parameter index of the right factor
// --------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::op::{at, dir_at};
use crate::op::arith;
// --------------------------------------------------------------------------
//
// zmul_vv_forward
pub(crate) fn zmul_vv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    if taylor[ at(n_ord, x, 0) ] == B::zero() {
        for k in q_low ..= q_up {
            taylor[ at(n_ord, i_z, k) ] = B::zero();
        }
        return;
    }
    arith::mul_vv_forward(q_low, q_up, n_ord, taylor, arg, i_z);
}
//
// zmul_vv_dir
pub(crate) fn zmul_vv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    if taylor[ dir_at(n_col, r, x, 0, 0) ] == B::zero() {
        for ell in 0 .. r {
            taylor[ dir_at(n_col, r, i_z, q, ell) ] = B::zero();
        }
        return;
    }
    arith::mul_vv_dir(q, r, n_col, taylor, arg, i_z);
}
//
// zmul_pv_forward
pub(crate) fn zmul_pv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p = arg[0] as usize;
    let y = arg[1] as usize;
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] =
            par[p].azmul( &taylor[ at(n_ord, y, k) ] );
    }
}
//
// zmul_pv_dir
pub(crate) fn zmul_pv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p = arg[0] as usize;
    let y = arg[1] as usize;
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            par[p].azmul( &taylor[ dir_at(n_col, r, y, q, ell) ] );
    }
}
//
// zmul_vp_forward
pub(crate) fn zmul_vp_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let p = arg[1] as usize;
    if taylor[ at(n_ord, x, 0) ] == B::zero() {
        for k in q_low ..= q_up {
            taylor[ at(n_ord, i_z, k) ] = B::zero();
        }
        return;
    }
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] =
            taylor[ at(n_ord, x, k) ].mul( &par[p] );
    }
}
//
// zmul_vp_dir
pub(crate) fn zmul_vp_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let p = arg[1] as usize;
    if taylor[ dir_at(n_col, r, x, 0, 0) ] == B::zero() {
        for ell in 0 .. r {
            taylor[ dir_at(n_col, r, i_z, q, ell) ] = B::zero();
        }
        return;
    }
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            taylor[ dir_at(n_col, r, x, q, ell) ].mul( &par[p] );
    }
}
// --------------------------------------------------------------------------
// reverse
//
// The absolute zero semantics carry to reverse mode: partials are
// accumulated with azmul so that a zero adjoint annihilates an infinite
// or nan factor.
//
// zmul_vv_reverse
pub(crate) fn zmul_vv_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in (0 ..= d).rev() {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        for j in 0 ..= k {
            let dx = pz.azmul( &taylor[ at(n_ord, y, k - j) ] );
            partial[ at(n_ord, x, j) ] =
                partial[ at(n_ord, x, j) ].add( &dx );
            let dy = pz.azmul( &taylor[ at(n_ord, x, j) ] );
            partial[ at(n_ord, y, k - j) ] =
                partial[ at(n_ord, y, k - j) ].add( &dy );
        }
    }
}
//
// zmul_pv_reverse
pub(crate) fn zmul_pv_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], par : &[B], arg : &[IndexT],
    i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p = arg[0] as usize;
    let y = arg[1] as usize;
    for k in 0 ..= d {
        let dy = par[p].azmul( &partial[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, y, k) ] = partial[ at(n_ord, y, k) ].add( &dy );
    }
}
//
// zmul_vp_reverse
pub(crate) fn zmul_vp_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], par : &[B], arg : &[IndexT],
    i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    let p = arg[1] as usize;
    for k in 0 ..= d {
        let dx = partial[ at(n_ord, i_z, k) ].azmul( &par[p] );
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].add( &dx );
    }
}
