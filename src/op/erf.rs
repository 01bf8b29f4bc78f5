// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Taylor kernels for the Erf and Erfc operators.
//!
//! Each produces three results: the companions u = -x * x and
//! w = exp(u), then the primary result z at `i_z` . With
//! c = 2 / sqrt(pi) the derivative of erf is c * w, so
//!     z[k] = e * (c/k) * sum_{j=1..k} j * x[j] * w[k-j]
//! where e = +1 for Erf and e = -1 for Erfc.
//!
//! Link to [parent module](super)
//!
//! * arg
//!     * arg\[0\]:  variable index of the operand
// --------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::op::{at, dir_at};
use crate::op::unary;
// --------------------------------------------------------------------------
//
// two_over_root_pi
fn two_over_root_pi<B : Base>() -> B {
    B::from_f64( 2.0 / std::f64::consts::PI.sqrt() )
}
// --------------------------------------------------------------------------
// erf_forward
pub(crate) fn erf_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], i_x : usize, i_z : usize,
    complement : bool,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_u = i_z - 2;
    let i_w = i_z - 1;
    let c   = two_over_root_pi::<B>();
    //
    // u[k] = - sum_{j=0..k} x[j] x[k-j]
    for k in q_low ..= q_up {
        let mut u_k = B::zero();
        for j in 0 ..= k {
            let term = taylor[ at(n_ord, i_x, j) ].mul( &taylor[ at(n_ord, i_x, k - j) ] );
            u_k = u_k.sub( &term );
        }
        taylor[ at(n_ord, i_u, k) ] = u_k;
    }
    //
    // w = exp(u)
    unary::exp_rows_forward(q_low, q_up, n_ord, taylor, i_u, i_w);
    //
    // z
    for k in q_low ..= q_up {
        if k == 0 {
            let x_0 = taylor[ at(n_ord, i_x, 0) ].clone();
            taylor[ at(n_ord, i_z, 0) ] =
                if complement { x_0.erfc() } else { x_0.erf() };
            continue;
        }
        let mut sum = B::zero();
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let term   = ( factor.mul( &taylor[ at(n_ord, i_x, j) ] ) ).mul( &taylor[ at(n_ord, i_w, k - j) ] );
            sum = sum.add( &term );
        }
        sum = c.mul( &sum );
        taylor[ at(n_ord, i_z, k) ] = if complement { sum.neg() } else { sum };
    }
}
//
// erf_dir
pub(crate) fn erf_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], i_x : usize, i_z : usize,
    complement : bool,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_u = i_z - 2;
    let i_w = i_z - 1;
    let c   = two_over_root_pi::<B>();
    //
    for ell in 0 .. r {
        let mut u_q = B::zero();
        for j in 0 ..= q {
            let term = taylor[ dir_at(n_col, r, i_x, j, ell) ].mul( &taylor[ dir_at(n_col, r, i_x, q - j, ell) ] );
            u_q = u_q.sub( &term );
        }
        taylor[ dir_at(n_col, r, i_u, q, ell) ] = u_q;
    }
    unary::exp_rows_dir(q, r, n_col, taylor, i_u, i_w);
    for ell in 0 .. r {
        let mut sum = B::zero();
        for j in 1 ..= q {
            let factor = B::from_f64( j as f64 / q as f64 );
            let term   = ( factor.mul( &taylor[ dir_at(n_col, r, i_x, j, ell) ] ) ).mul( &taylor[ dir_at(n_col, r, i_w, q - j, ell) ] );
            sum = sum.add( &term );
        }
        sum = c.mul( &sum );
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            if complement { sum.neg() } else { sum };
    }
}
//
// erf_reverse
pub(crate) fn erf_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], i_x : usize, i_z : usize,
    complement : bool,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_u = i_z - 2;
    let i_w = i_z - 1;
    let c   = two_over_root_pi::<B>();
    let e_c = if complement { c.neg() } else { c.clone() };
    //
    // z[k] = e * c * sum_{j=1..k} (j/k) x[j] w[k-j],  k >= 1
    for k in (1 ..= d).rev() {
        let pz = e_c.mul( &partial[ at(n_ord, i_z, k) ] );
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let dx = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_w, k - j) ] );
            partial[ at(n_ord, i_x, j) ] =
                partial[ at(n_ord, i_x, j) ].add( &dx );
            let dw = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_x, j) ] );
            partial[ at(n_ord, i_w, k - j) ] =
                partial[ at(n_ord, i_w, k - j) ].add( &dw );
        }
    }
    // z[0]: d erf / dx = c * w[0]
    let dz0 = ( e_c.mul( &partial[ at(n_ord, i_z, 0) ] ) ).mul( &taylor[ at(n_ord, i_w, 0) ] );
    partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].add( &dz0 );
    //
    // w = exp(u)
    unary::exp_rows_reverse(d, n_ord, taylor, partial, i_u, i_w);
    //
    // u[k] = - sum_{j=0..k} x[j] x[k-j]
    for k in (0 ..= d).rev() {
        let pu = partial[ at(n_ord, i_u, k) ].clone();
        for j in 0 ..= k {
            let dx = pu.mul( &taylor[ at(n_ord, i_x, k - j) ] );
            partial[ at(n_ord, i_x, j) ] =
                partial[ at(n_ord, i_x, j) ].sub( &dx );
            let dx = pu.mul( &taylor[ at(n_ord, i_x, j) ] );
            partial[ at(n_ord, i_x, k - j) ] =
                partial[ at(n_ord, i_x, k - j) ].sub( &dx );
        }
    }
}
