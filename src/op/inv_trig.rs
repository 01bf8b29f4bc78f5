// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Taylor kernels for the inverse trigonometric operators
//! Asin, Acos, Atan.
//!
//! Each produces two results: the companion b comes first and the
//! primary result z is at `i_z` . For Asin and Acos the companion is
//! b = sqrt(1 - x * x); for Atan it is b = 1 + x * x. In all three
//! cases the defining relation is b * z' = e * x' with e = -1 for
//! Acos and e = +1 otherwise.
//!
//! Link to [parent module](super)
//!
//! * arg
//!     * arg\[0\]:  variable index of the operand
// --------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::op::{at, dir_at, KernelResult};
// --------------------------------------------------------------------------
// asin, acos
//
// asin_forward
pub(crate) fn asin_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], i_x : usize, i_b : usize, i_z : usize,
    acos : bool,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in q_low ..= q_up {
        if k == 0 {
            let x_0 = taylor[ at(n_ord, i_x, 0) ].clone();
            let u_0 = B::one().sub( &( x_0.mul( &x_0 ) ) );
            taylor[ at(n_ord, i_b, 0) ] = u_0.sqrt();
            taylor[ at(n_ord, i_z, 0) ] =
                if acos { x_0.acos() } else { x_0.asin() };
            continue;
        }
        let b_0 = taylor[ at(n_ord, i_b, 0) ].clone();
        if b_0 == B::zero() {
            return Err( "asin or acos: higher order coefficient at x = 1" );
        }
        //
        // u[k] = - sum_{j=0..k} x[j] x[k-j]
        let mut u_k = B::zero();
        for j in 0 ..= k {
            let term = taylor[ at(n_ord, i_x, j) ].mul( &taylor[ at(n_ord, i_x, k - j) ] );
            u_k = u_k.sub( &term );
        }
        //
        // b[k] = ( u[k] - sum_{j=1..k-1} b[j] b[k-j] ) / (2 b[0])
        let mut sum = u_k;
        for j in 1 .. k {
            let term = taylor[ at(n_ord, i_b, j) ].mul( &taylor[ at(n_ord, i_b, k - j) ] );
            sum = sum.sub( &term );
        }
        let den = B::from_f64(2.0).mul( &b_0 );
        taylor[ at(n_ord, i_b, k) ] = sum.div( &den );
        //
        // z[k] = ( e x[k] - sum_{j=1..k-1} (j/k) z[j] b[k-j] ) / b[0]
        let mut sum = if acos {
            taylor[ at(n_ord, i_x, k) ].neg()
        } else {
            taylor[ at(n_ord, i_x, k) ].clone()
        };
        for j in 1 .. k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let term   = ( factor.mul( &taylor[ at(n_ord, i_z, j) ] ) ).mul( &taylor[ at(n_ord, i_b, k - j) ] );
            sum = sum.sub( &term );
        }
        taylor[ at(n_ord, i_z, k) ] = sum.div( &b_0 );
    }
    Ok(())
}
//
// asin_dir
pub(crate) fn asin_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], i_x : usize, i_b : usize, i_z : usize,
    acos : bool,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let b_0 = taylor[ dir_at(n_col, r, i_b, 0, 0) ].clone();
    if b_0 == B::zero() {
        return Err( "asin or acos: higher order coefficient at x = 1" );
    }
    let den = B::from_f64(2.0).mul( &b_0 );
    for ell in 0 .. r {
        let mut u_q = B::zero();
        for j in 0 ..= q {
            let term = taylor[ dir_at(n_col, r, i_x, j, ell) ].mul( &taylor[ dir_at(n_col, r, i_x, q - j, ell) ] );
            u_q = u_q.sub( &term );
        }
        let mut sum = u_q;
        for j in 1 .. q {
            let term = taylor[ dir_at(n_col, r, i_b, j, ell) ].mul( &taylor[ dir_at(n_col, r, i_b, q - j, ell) ] );
            sum = sum.sub( &term );
        }
        taylor[ dir_at(n_col, r, i_b, q, ell) ] = sum.div( &den );
        //
        let mut sum = if acos {
            taylor[ dir_at(n_col, r, i_x, q, ell) ].neg()
        } else {
            taylor[ dir_at(n_col, r, i_x, q, ell) ].clone()
        };
        for j in 1 .. q {
            let factor = B::from_f64( j as f64 / q as f64 );
            let term   = ( factor.mul( &taylor[ dir_at(n_col, r, i_z, j, ell) ] ) ).mul( &taylor[ dir_at(n_col, r, i_b, q - j, ell) ] );
            sum = sum.sub( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = sum.div( &b_0 );
    }
    Ok(())
}
//
// asin_reverse
pub(crate) fn asin_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B],
    i_x : usize, i_b : usize, i_z : usize,
    acos : bool,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let b_0 = taylor[ at(n_ord, i_b, 0) ].clone();
    if b_0 == B::zero() && d > 0 {
        return Err( "asin or acos: higher order reverse at x = 1" );
    }
    let two = B::from_f64(2.0);
    for k in (1 ..= d).rev() {
        //
        // z[k] = ( e x[k] - sum_{j=1..k-1} (j/k) z[j] b[k-j] ) / b[0]
        let pz = partial[ at(n_ord, i_z, k) ].div( &b_0 );
        if acos {
            partial[ at(n_ord, i_x, k) ] =
                partial[ at(n_ord, i_x, k) ].sub( &pz );
        } else {
            partial[ at(n_ord, i_x, k) ] =
                partial[ at(n_ord, i_x, k) ].add( &pz );
        }
        let db0 = pz.mul( &taylor[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, i_b, 0) ] =
            partial[ at(n_ord, i_b, 0) ].sub( &db0 );
        for j in 1 .. k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let dz = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_b, k - j) ] );
            partial[ at(n_ord, i_z, j) ] =
                partial[ at(n_ord, i_z, j) ].sub( &dz );
            let db = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_z, j) ] );
            partial[ at(n_ord, i_b, k - j) ] =
                partial[ at(n_ord, i_b, k - j) ].sub( &db );
        }
        //
        // b[k] = ( u[k] - sum_{j=1..k-1} b[j] b[k-j] ) / (2 b[0])
        // with u[k] = - sum_{j=0..k} x[j] x[k-j]
        let pb = partial[ at(n_ord, i_b, k) ].div( &( two.mul( &b_0 ) ) );
        let db0 = ( two.mul( &pb ) ).mul( &taylor[ at(n_ord, i_b, k) ] );
        partial[ at(n_ord, i_b, 0) ] =
            partial[ at(n_ord, i_b, 0) ].sub( &db0 );
        for j in 1 .. k {
            let db = ( two.mul( &pb ) ).mul( &taylor[ at(n_ord, i_b, k - j) ] );
            partial[ at(n_ord, i_b, j) ] =
                partial[ at(n_ord, i_b, j) ].sub( &db );
        }
        for j in 0 ..= k {
            let dx = pb.mul( &taylor[ at(n_ord, i_x, k - j) ] );
            partial[ at(n_ord, i_x, j) ] =
                partial[ at(n_ord, i_x, j) ].sub( &dx );
            let dx = pb.mul( &taylor[ at(n_ord, i_x, j) ] );
            partial[ at(n_ord, i_x, k - j) ] =
                partial[ at(n_ord, i_x, k - j) ].sub( &dx );
        }
    }
    // order zero: z[0] = asin(x[0]) (or acos), b[0] = sqrt(1 - x[0]^2)
    let pz  = partial[ at(n_ord, i_z, 0) ].div( &b_0 );
    if acos {
        partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].sub( &pz );
    } else {
        partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].add( &pz );
    }
    let pu  = partial[ at(n_ord, i_b, 0) ].div( &( two.mul( &b_0 ) ) );
    let dx0 = ( two.mul( &pu ) ).mul( &taylor[ at(n_ord, i_x, 0) ] );
    partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].sub( &dx0 );
    Ok(())
}
// --------------------------------------------------------------------------
// atan
//
// atan_forward
pub(crate) fn atan_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], i_x : usize, i_b : usize, i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in q_low ..= q_up {
        if k == 0 {
            let x_0 = taylor[ at(n_ord, i_x, 0) ].clone();
            taylor[ at(n_ord, i_b, 0) ] = B::one().add( &( x_0.mul( &x_0 ) ) );
            taylor[ at(n_ord, i_z, 0) ] = x_0.atan();
            continue;
        }
        //
        // b[k] = sum_{j=0..k} x[j] x[k-j]
        let mut b_k = B::zero();
        for j in 0 ..= k {
            let term = taylor[ at(n_ord, i_x, j) ].mul( &taylor[ at(n_ord, i_x, k - j) ] );
            b_k = b_k.add( &term );
        }
        taylor[ at(n_ord, i_b, k) ] = b_k;
        //
        // z[k] = ( x[k] - sum_{j=1..k-1} (j/k) z[j] b[k-j] ) / b[0]
        let mut sum = taylor[ at(n_ord, i_x, k) ].clone();
        for j in 1 .. k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let term   = ( factor.mul( &taylor[ at(n_ord, i_z, j) ] ) ).mul( &taylor[ at(n_ord, i_b, k - j) ] );
            sum = sum.sub( &term );
        }
        taylor[ at(n_ord, i_z, k) ] = sum.div( &taylor[ at(n_ord, i_b, 0) ] );
    }
}
//
// atan_dir
pub(crate) fn atan_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], i_x : usize, i_b : usize, i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let b_0 = taylor[ dir_at(n_col, r, i_b, 0, 0) ].clone();
    for ell in 0 .. r {
        let mut b_q = B::zero();
        for j in 0 ..= q {
            let term = taylor[ dir_at(n_col, r, i_x, j, ell) ].mul( &taylor[ dir_at(n_col, r, i_x, q - j, ell) ] );
            b_q = b_q.add( &term );
        }
        taylor[ dir_at(n_col, r, i_b, q, ell) ] = b_q;
        //
        let mut sum = taylor[ dir_at(n_col, r, i_x, q, ell) ].clone();
        for j in 1 .. q {
            let factor = B::from_f64( j as f64 / q as f64 );
            let term   = ( factor.mul( &taylor[ dir_at(n_col, r, i_z, j, ell) ] ) ).mul( &taylor[ dir_at(n_col, r, i_b, q - j, ell) ] );
            sum = sum.sub( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = sum.div( &b_0 );
    }
}
//
// atan_reverse
pub(crate) fn atan_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B],
    i_x : usize, i_b : usize, i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let b_0 = taylor[ at(n_ord, i_b, 0) ].clone();
    for k in (1 ..= d).rev() {
        //
        // z[k] = ( x[k] - sum_{j=1..k-1} (j/k) z[j] b[k-j] ) / b[0]
        let pz = partial[ at(n_ord, i_z, k) ].div( &b_0 );
        partial[ at(n_ord, i_x, k) ] = partial[ at(n_ord, i_x, k) ].add( &pz );
        let db0 = pz.mul( &taylor[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, i_b, 0) ] =
            partial[ at(n_ord, i_b, 0) ].sub( &db0 );
        for j in 1 .. k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let dz = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_b, k - j) ] );
            partial[ at(n_ord, i_z, j) ] =
                partial[ at(n_ord, i_z, j) ].sub( &dz );
            let db = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_z, j) ] );
            partial[ at(n_ord, i_b, k - j) ] =
                partial[ at(n_ord, i_b, k - j) ].sub( &db );
        }
        //
        // b[k] = sum_{j=0..k} x[j] x[k-j]
        let pb = partial[ at(n_ord, i_b, k) ].clone();
        for j in 0 ..= k {
            let dx = pb.mul( &taylor[ at(n_ord, i_x, k - j) ] );
            partial[ at(n_ord, i_x, j) ] =
                partial[ at(n_ord, i_x, j) ].add( &dx );
            let dx = pb.mul( &taylor[ at(n_ord, i_x, j) ] );
            partial[ at(n_ord, i_x, k - j) ] =
                partial[ at(n_ord, i_x, k - j) ].add( &dx );
        }
    }
    // order zero: z[0] = atan(x[0]), b[0] = 1 + x[0]^2
    let pz  = partial[ at(n_ord, i_z, 0) ].div( &b_0 );
    partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].add( &pz );
    let pb  = partial[ at(n_ord, i_b, 0) ].clone();
    let dx0 = ( B::from_f64(2.0).mul( &pb ) ).mul( &taylor[ at(n_ord, i_x, 0) ] );
    partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].add( &dx0 );
}
