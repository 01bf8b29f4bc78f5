// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Taylor kernels for the paired trigonometric and hyperbolic operators:
//! Sin, Cos, Sinh, Cosh, Tan, Tanh.
//!
//! Each of these operators produces two results; the companion comes
//! first and the primary result is at `i_z` . For Sin the companion is
//! the cosine (and conversely); for Tan and Tanh the companion is the
//! square of the primary.
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
// --------------------------------------------------------------------------
// sin, cos, sinh, cosh
//
// With s and c the sine and cosine rows (or their hyperbolic versions),
//     s[k] = (1/k) sum_{j=1..k} j * x[j] * c[k-j]
//     c[k] = -+ (1/k) sum_{j=1..k} j * x[j] * s[k-j]
// where the upper sign is the circular and the lower the hyperbolic case.
//
// sincos_forward
pub(crate) fn sincos_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], i_x : usize, i_s : usize, i_c : usize,
    hyperbolic : bool,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in q_low ..= q_up {
        if k == 0 {
            let x_0 = taylor[ at(n_ord, i_x, 0) ].clone();
            if hyperbolic {
                taylor[ at(n_ord, i_s, 0) ] = x_0.sinh();
                taylor[ at(n_ord, i_c, 0) ] = x_0.cosh();
            } else {
                taylor[ at(n_ord, i_s, 0) ] = x_0.sin();
                taylor[ at(n_ord, i_c, 0) ] = x_0.cos();
            }
            continue;
        }
        let mut s_k = B::zero();
        let mut c_k = B::zero();
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let fx     = factor.mul( &taylor[ at(n_ord, i_x, j) ] );
            s_k = s_k.add( &( fx.mul( &taylor[ at(n_ord, i_c, k - j) ] ) ) );
            c_k = c_k.add( &( fx.mul( &taylor[ at(n_ord, i_s, k - j) ] ) ) );
        }
        if ! hyperbolic {
            c_k = c_k.neg();
        }
        taylor[ at(n_ord, i_s, k) ] = s_k;
        taylor[ at(n_ord, i_c, k) ] = c_k;
    }
}
//
// sincos_dir
pub(crate) fn sincos_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], i_x : usize, i_s : usize, i_c : usize,
    hyperbolic : bool,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for ell in 0 .. r {
        let mut s_q = B::zero();
        let mut c_q = B::zero();
        for j in 1 ..= q {
            let factor = B::from_f64( j as f64 / q as f64 );
            let fx     = factor.mul( &taylor[ dir_at(n_col, r, i_x, j, ell) ] );
            s_q = s_q.add( &( fx.mul( &taylor[ dir_at(n_col, r, i_c, q - j, ell) ] ) ) );
            c_q = c_q.add( &( fx.mul( &taylor[ dir_at(n_col, r, i_s, q - j, ell) ] ) ) );
        }
        if ! hyperbolic {
            c_q = c_q.neg();
        }
        taylor[ dir_at(n_col, r, i_s, q, ell) ] = s_q;
        taylor[ dir_at(n_col, r, i_c, q, ell) ] = c_q;
    }
}
//
// sincos_reverse
pub(crate) fn sincos_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B],
    i_x : usize, i_s : usize, i_c : usize,
    hyperbolic : bool,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in (1 ..= d).rev() {
        let ps = partial[ at(n_ord, i_s, k) ].clone();
        let pc = partial[ at(n_ord, i_c, k) ].clone();
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let fps    = factor.mul( &ps );
            let fpc    = factor.mul( &pc );
            //
            // s[k] = (1/k) sum j x[j] c[k-j]
            let dx = fps.mul( &taylor[ at(n_ord, i_c, k - j) ] );
            partial[ at(n_ord, i_x, j) ] =
                partial[ at(n_ord, i_x, j) ].add( &dx );
            let dc = fps.mul( &taylor[ at(n_ord, i_x, j) ] );
            partial[ at(n_ord, i_c, k - j) ] =
                partial[ at(n_ord, i_c, k - j) ].add( &dc );
            //
            // c[k] = -+ (1/k) sum j x[j] s[k-j]
            let dx = fpc.mul( &taylor[ at(n_ord, i_s, k - j) ] );
            let ds = fpc.mul( &taylor[ at(n_ord, i_x, j) ] );
            if hyperbolic {
                partial[ at(n_ord, i_x, j) ] =
                    partial[ at(n_ord, i_x, j) ].add( &dx );
                partial[ at(n_ord, i_s, k - j) ] =
                    partial[ at(n_ord, i_s, k - j) ].add( &ds );
            } else {
                partial[ at(n_ord, i_x, j) ] =
                    partial[ at(n_ord, i_x, j) ].sub( &dx );
                partial[ at(n_ord, i_s, k - j) ] =
                    partial[ at(n_ord, i_s, k - j) ].sub( &ds );
            }
        }
    }
    // order zero
    let ps  = partial[ at(n_ord, i_s, 0) ].clone();
    let pc  = partial[ at(n_ord, i_c, 0) ].clone();
    let s_0 = taylor[ at(n_ord, i_s, 0) ].clone();
    let c_0 = taylor[ at(n_ord, i_c, 0) ].clone();
    let mut dx0 = ps.mul( &c_0 );
    if hyperbolic {
        dx0 = dx0.add( &( pc.mul( &s_0 ) ) );
    } else {
        dx0 = dx0.sub( &( pc.mul( &s_0 ) ) );
    }
    partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].add( &dx0 );
}
// --------------------------------------------------------------------------
// tan, tanh
//
// With z the primary result and y = z * z the companion,
//     z[k] = x[k] +- (1/k) sum_{j=1..k} j * x[j] * y[k-j]
//     y[k] = sum_{j=0..k} z[j] * z[k-j]
// where the upper sign is tan and the lower tanh.
//
// tan_forward
pub(crate) fn tan_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], i_x : usize, i_y : usize, i_z : usize,
    hyperbolic : bool,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in q_low ..= q_up {
        if k == 0 {
            let x_0 = taylor[ at(n_ord, i_x, 0) ].clone();
            let z_0 = if hyperbolic { x_0.tanh() } else { x_0.tan() };
            taylor[ at(n_ord, i_y, 0) ] = z_0.mul( &z_0 );
            taylor[ at(n_ord, i_z, 0) ] = z_0;
            continue;
        }
        let mut sum = B::zero();
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let term   = ( factor.mul( &taylor[ at(n_ord, i_x, j) ] ) ).mul( &taylor[ at(n_ord, i_y, k - j) ] );
            sum = sum.add( &term );
        }
        let z_k = if hyperbolic {
            taylor[ at(n_ord, i_x, k) ].sub( &sum )
        } else {
            taylor[ at(n_ord, i_x, k) ].add( &sum )
        };
        taylor[ at(n_ord, i_z, k) ] = z_k;
        //
        let mut y_k = B::zero();
        for j in 0 ..= k {
            let term = taylor[ at(n_ord, i_z, j) ].mul( &taylor[ at(n_ord, i_z, k - j) ] );
            y_k = y_k.add( &term );
        }
        taylor[ at(n_ord, i_y, k) ] = y_k;
    }
}
//
// tan_dir
pub(crate) fn tan_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], i_x : usize, i_y : usize, i_z : usize,
    hyperbolic : bool,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for ell in 0 .. r {
        let mut sum = B::zero();
        for j in 1 ..= q {
            let factor = B::from_f64( j as f64 / q as f64 );
            let term   = ( factor.mul( &taylor[ dir_at(n_col, r, i_x, j, ell) ] ) ).mul( &taylor[ dir_at(n_col, r, i_y, q - j, ell) ] );
            sum = sum.add( &term );
        }
        let z_q = if hyperbolic {
            taylor[ dir_at(n_col, r, i_x, q, ell) ].sub( &sum )
        } else {
            taylor[ dir_at(n_col, r, i_x, q, ell) ].add( &sum )
        };
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = z_q;
        //
        let mut y_q = B::zero();
        for j in 0 ..= q {
            let term = taylor[ dir_at(n_col, r, i_z, j, ell) ].mul( &taylor[ dir_at(n_col, r, i_z, q - j, ell) ] );
            y_q = y_q.add( &term );
        }
        taylor[ dir_at(n_col, r, i_y, q, ell) ] = y_q;
    }
}
//
// tan_reverse
pub(crate) fn tan_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B],
    i_x : usize, i_y : usize, i_z : usize,
    hyperbolic : bool,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in (1 ..= d).rev() {
        //
        // y[k] = sum_{j=0..k} z[j] z[k-j]
        let py = partial[ at(n_ord, i_y, k) ].clone();
        for j in 0 ..= k {
            let dz = py.mul( &taylor[ at(n_ord, i_z, k - j) ] );
            partial[ at(n_ord, i_z, j) ] =
                partial[ at(n_ord, i_z, j) ].add( &dz );
            let dz = py.mul( &taylor[ at(n_ord, i_z, j) ] );
            partial[ at(n_ord, i_z, k - j) ] =
                partial[ at(n_ord, i_z, k - j) ].add( &dz );
        }
        //
        // z[k] = x[k] +- (1/k) sum_{j=1..k} j x[j] y[k-j]
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        partial[ at(n_ord, i_x, k) ] = partial[ at(n_ord, i_x, k) ].add( &pz );
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let dx = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_y, k - j) ] );
            let dy = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_x, j) ] );
            if hyperbolic {
                partial[ at(n_ord, i_x, j) ] =
                    partial[ at(n_ord, i_x, j) ].sub( &dx );
                partial[ at(n_ord, i_y, k - j) ] =
                    partial[ at(n_ord, i_y, k - j) ].sub( &dy );
            } else {
                partial[ at(n_ord, i_x, j) ] =
                    partial[ at(n_ord, i_x, j) ].add( &dx );
                partial[ at(n_ord, i_y, k - j) ] =
                    partial[ at(n_ord, i_y, k - j) ].add( &dy );
            }
        }
    }
    // order zero: y[0] = z[0]^2 then z[0] = tan(x[0])
    let py  = partial[ at(n_ord, i_y, 0) ].clone();
    let z_0 = taylor[ at(n_ord, i_z, 0) ].clone();
    let dz  = ( B::from_f64(2.0).mul( &py ) ).mul( &z_0 );
    partial[ at(n_ord, i_z, 0) ] = partial[ at(n_ord, i_z, 0) ].add( &dz );
    //
    let pz  = partial[ at(n_ord, i_z, 0) ].clone();
    let y_0 = taylor[ at(n_ord, i_y, 0) ].clone();
    let slope = if hyperbolic {
        B::one().sub( &y_0 )
    } else {
        B::one().add( &y_0 )
    };
    let dx0 = pz.mul( &slope );
    partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].add( &dx0 );
}
