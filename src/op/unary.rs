// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Taylor kernels for the one result unary operators:
//! Neg, Abs, Sign, Sqrt, Exp, Expm1, Log, Log1p.
//!
//! Link to [parent module](super)
//!
//! * arg
//!     * arg\[0\]:  variable index of the operand
//!
//! The Exp and Log kernels are also exposed on explicit rows because the
//! Pow operators encode x^y as the triple log, mul, exp.
// --------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::op::{at, dir_at, KernelResult};
// --------------------------------------------------------------------------
// neg
//
pub(crate) fn neg_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] = taylor[ at(n_ord, x, k) ].neg();
    }
}
//
pub(crate) fn neg_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            taylor[ dir_at(n_col, r, x, q, ell) ].neg();
    }
}
//
pub(crate) fn neg_reverse<B : Base>(
    d : usize, n_ord : usize,
    _taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    for k in 0 ..= d {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].sub( &pz );
    }
}
// --------------------------------------------------------------------------
// abs
//
// z[0] = |x[0]| and z[k] = sign(x[0]) * x[k]; at x[0] == 0 the sign is
// zero so all orders k >= 1 are zero.
//
pub(crate) fn abs_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x    = arg[0] as usize;
    let sign = taylor[ at(n_ord, x, 0) ].sign();
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] = if k == 0 {
            taylor[ at(n_ord, x, 0) ].abs()
        } else {
            sign.mul( &taylor[ at(n_ord, x, k) ] )
        };
    }
}
//
pub(crate) fn abs_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x    = arg[0] as usize;
    let sign = taylor[ dir_at(n_col, r, x, 0, 0) ].sign();
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] =
            sign.mul( &taylor[ dir_at(n_col, r, x, q, ell) ] );
    }
}
//
pub(crate) fn abs_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x    = arg[0] as usize;
    let sign = taylor[ at(n_ord, x, 0) ].sign();
    for k in 0 ..= d {
        let dx = sign.mul( &partial[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].add( &dx );
    }
}
// --------------------------------------------------------------------------
// sign
//
// The derivative of the sign function is treated as identically zero.
//
pub(crate) fn sign_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x = arg[0] as usize;
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] = if k == 0 {
            taylor[ at(n_ord, x, 0) ].sign()
        } else {
            B::zero()
        };
    }
}
//
pub(crate) fn sign_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], _arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = B::zero();
    }
}
// --------------------------------------------------------------------------
// sqrt
//
// z[0] = sqrt(x[0]) and for k >= 1, from z * z = x,
//     z[k] = ( x[k] - sum_{j=1..k-1} z[j] * z[k-j] ) / (2 * z[0])
//
pub(crate) fn sqrt_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x   = arg[0] as usize;
    let two = B::from_f64(2.0);
    for k in q_low ..= q_up {
        if k == 0 {
            taylor[ at(n_ord, i_z, 0) ] = taylor[ at(n_ord, x, 0) ].sqrt();
            continue;
        }
        if taylor[ at(n_ord, i_z, 0) ] == B::zero() {
            return Err( "sqrt: higher order coefficient at zero" );
        }
        let mut sum = taylor[ at(n_ord, x, k) ].clone();
        for j in 1 .. k {
            let term = taylor[ at(n_ord, i_z, j) ].mul( &taylor[ at(n_ord, i_z, k - j) ] );
            sum = sum.sub( &term );
        }
        let den = two.mul( &taylor[ at(n_ord, i_z, 0) ] );
        taylor[ at(n_ord, i_z, k) ] = sum.div( &den );
    }
    Ok(())
}
//
pub(crate) fn sqrt_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x   = arg[0] as usize;
    let z_0 = taylor[ dir_at(n_col, r, i_z, 0, 0) ].clone();
    if z_0 == B::zero() {
        return Err( "sqrt: higher order coefficient at zero" );
    }
    let den = B::from_f64(2.0).mul( &z_0 );
    for ell in 0 .. r {
        let mut sum = taylor[ dir_at(n_col, r, x, q, ell) ].clone();
        for j in 1 .. q {
            let term = taylor[ dir_at(n_col, r, i_z, j, ell) ].mul( &taylor[ dir_at(n_col, r, i_z, q - j, ell) ] );
            sum = sum.sub( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = sum.div( &den );
    }
    Ok(())
}
//
pub(crate) fn sqrt_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x   = arg[0] as usize;
    let z_0 = taylor[ at(n_ord, i_z, 0) ].clone();
    if z_0 == B::zero() {
        if d == 0 {
            // d/dx sqrt at zero is infinite; let Base arithmetic decide
            let dx = partial[ at(n_ord, i_z, 0) ].div( &( B::from_f64(2.0).mul( &z_0 ) ) );
            partial[ at(n_ord, x, 0) ] = partial[ at(n_ord, x, 0) ].add( &dx );
            return Ok(());
        }
        return Err( "sqrt: higher order reverse at zero" );
    }
    let den = B::from_f64(2.0).mul( &z_0 );
    let two = B::from_f64(2.0);
    for k in (1 ..= d).rev() {
        let pz = partial[ at(n_ord, i_z, k) ].div( &den );
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].add( &pz );
        let dz0 = ( two.mul( &pz ) ).mul( &taylor[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, i_z, 0) ] =
            partial[ at(n_ord, i_z, 0) ].sub( &dz0 );
        for j in 1 .. k {
            let dz = ( two.mul( &pz ) ).mul( &taylor[ at(n_ord, i_z, k - j) ] );
            partial[ at(n_ord, i_z, j) ] =
                partial[ at(n_ord, i_z, j) ].sub( &dz );
        }
    }
    let dx0 = partial[ at(n_ord, i_z, 0) ].div( &den );
    partial[ at(n_ord, x, 0) ] = partial[ at(n_ord, x, 0) ].add( &dx0 );
    Ok(())
}
// --------------------------------------------------------------------------
// exp (rows form, shared with the Pow triple)
//
// z[0] = exp(x[0]) and for k >= 1
//     z[k] = (1/k) * sum_{j=1..k} j * x[j] * z[k-j]
//
pub(crate) fn exp_rows_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], i_x : usize, i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in q_low ..= q_up {
        if k == 0 {
            taylor[ at(n_ord, i_z, 0) ] = taylor[ at(n_ord, i_x, 0) ].exp();
            continue;
        }
        let mut sum = B::zero();
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let term   = ( factor.mul( &taylor[ at(n_ord, i_x, j) ] ) ).mul( &taylor[ at(n_ord, i_z, k - j) ] );
            sum = sum.add( &term );
        }
        taylor[ at(n_ord, i_z, k) ] = sum;
    }
}
//
pub(crate) fn exp_rows_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], i_x : usize, i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for ell in 0 .. r {
        let mut sum = B::zero();
        for j in 1 ..= q {
            let factor = B::from_f64( j as f64 / q as f64 );
            let term   = ( factor.mul( &taylor[ dir_at(n_col, r, i_x, j, ell) ] ) ).mul( &taylor[ dir_at(n_col, r, i_z, q - j, ell) ] );
            sum = sum.add( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = sum;
    }
}
//
pub(crate) fn exp_rows_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], i_x : usize, i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    for k in (1 ..= d).rev() {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let dx = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_z, k - j) ] );
            partial[ at(n_ord, i_x, j) ] =
                partial[ at(n_ord, i_x, j) ].add( &dx );
            let dz = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_x, j) ] );
            partial[ at(n_ord, i_z, k - j) ] =
                partial[ at(n_ord, i_z, k - j) ].add( &dz );
        }
    }
    let dx0 = partial[ at(n_ord, i_z, 0) ].mul( &taylor[ at(n_ord, i_z, 0) ] );
    partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].add( &dx0 );
}
//
pub(crate) fn exp_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    exp_rows_forward(q_low, q_up, n_ord, taylor, arg[0] as usize, i_z);
}
pub(crate) fn exp_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    exp_rows_dir(q, r, n_col, taylor, arg[0] as usize, i_z);
}
pub(crate) fn exp_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    exp_rows_reverse(d, n_ord, taylor, partial, arg[0] as usize, i_z);
}
// --------------------------------------------------------------------------
// expm1
//
// Same recursion as exp with w = z + 1 in place of z.
//
pub(crate) fn expm1_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x   = arg[0] as usize;
    let one = B::one();
    for k in q_low ..= q_up {
        if k == 0 {
            taylor[ at(n_ord, i_z, 0) ] = taylor[ at(n_ord, x, 0) ].expm1();
            continue;
        }
        let mut sum = B::zero();
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let w = if k == j {
                taylor[ at(n_ord, i_z, 0) ].add( &one )
            } else {
                taylor[ at(n_ord, i_z, k - j) ].clone()
            };
            let term = ( factor.mul( &taylor[ at(n_ord, x, j) ] ) ).mul( &w );
            sum = sum.add( &term );
        }
        taylor[ at(n_ord, i_z, k) ] = sum;
    }
}
//
pub(crate) fn expm1_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x   = arg[0] as usize;
    let one = B::one();
    for ell in 0 .. r {
        let mut sum = B::zero();
        for j in 1 ..= q {
            let factor = B::from_f64( j as f64 / q as f64 );
            let w = if q == j {
                taylor[ dir_at(n_col, r, i_z, 0, 0) ].add( &one )
            } else {
                taylor[ dir_at(n_col, r, i_z, q - j, ell) ].clone()
            };
            let term = ( factor.mul( &taylor[ dir_at(n_col, r, x, j, ell) ] ) ).mul( &w );
            sum = sum.add( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = sum;
    }
}
//
pub(crate) fn expm1_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x   = arg[0] as usize;
    let one = B::one();
    let w_0 = taylor[ at(n_ord, i_z, 0) ].add( &one );
    for k in (1 ..= d).rev() {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        for j in 1 ..= k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let w = if k == j {
                w_0.clone()
            } else {
                taylor[ at(n_ord, i_z, k - j) ].clone()
            };
            let dx = ( factor.mul( &pz ) ).mul( &w );
            partial[ at(n_ord, x, j) ] =
                partial[ at(n_ord, x, j) ].add( &dx );
            let dz = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, x, j) ] );
            partial[ at(n_ord, i_z, k - j) ] =
                partial[ at(n_ord, i_z, k - j) ].add( &dz );
        }
    }
    let dx0 = partial[ at(n_ord, i_z, 0) ].mul( &w_0 );
    partial[ at(n_ord, x, 0) ] = partial[ at(n_ord, x, 0) ].add( &dx0 );
}
// --------------------------------------------------------------------------
// log (rows form, shared with the Pow triple)
//
// z[0] = log(x[0]) and for k >= 1
//     z[k] = ( x[k] - sum_{j=1..k-1} (j/k) * z[j] * x[k-j] ) / x[0]
//
pub(crate) fn log_rows_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], i_x : usize, i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    if taylor[ at(n_ord, i_x, 0) ] == B::zero() {
        return Err( "log of zero" );
    }
    for k in q_low ..= q_up {
        if k == 0 {
            taylor[ at(n_ord, i_z, 0) ] = taylor[ at(n_ord, i_x, 0) ].log();
            continue;
        }
        let mut sum = taylor[ at(n_ord, i_x, k) ].clone();
        for j in 1 .. k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let term   = ( factor.mul( &taylor[ at(n_ord, i_z, j) ] ) ).mul( &taylor[ at(n_ord, i_x, k - j) ] );
            sum = sum.sub( &term );
        }
        taylor[ at(n_ord, i_z, k) ] = sum.div( &taylor[ at(n_ord, i_x, 0) ] );
    }
    Ok(())
}
//
pub(crate) fn log_rows_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], i_x : usize, i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x_0 = taylor[ dir_at(n_col, r, i_x, 0, 0) ].clone();
    if x_0 == B::zero() {
        return Err( "log of zero" );
    }
    for ell in 0 .. r {
        let mut sum = taylor[ dir_at(n_col, r, i_x, q, ell) ].clone();
        for j in 1 .. q {
            let factor = B::from_f64( j as f64 / q as f64 );
            let term   = ( factor.mul( &taylor[ dir_at(n_col, r, i_z, j, ell) ] ) ).mul( &taylor[ dir_at(n_col, r, i_x, q - j, ell) ] );
            sum = sum.sub( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = sum.div( &x_0 );
    }
    Ok(())
}
//
pub(crate) fn log_rows_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], i_x : usize, i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x_0 = taylor[ at(n_ord, i_x, 0) ].clone();
    if x_0 == B::zero() {
        return Err( "log of zero" );
    }
    for k in (1 ..= d).rev() {
        let pz = partial[ at(n_ord, i_z, k) ].div( &x_0 );
        partial[ at(n_ord, i_x, k) ] = partial[ at(n_ord, i_x, k) ].add( &pz );
        let dx0 = pz.mul( &taylor[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, i_x, 0) ] =
            partial[ at(n_ord, i_x, 0) ].sub( &dx0 );
        for j in 1 .. k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let dx = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_z, j) ] );
            partial[ at(n_ord, i_x, k - j) ] =
                partial[ at(n_ord, i_x, k - j) ].sub( &dx );
            let dz = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_x, k - j) ] );
            partial[ at(n_ord, i_z, j) ] =
                partial[ at(n_ord, i_z, j) ].sub( &dz );
        }
    }
    let dx0 = partial[ at(n_ord, i_z, 0) ].div( &x_0 );
    partial[ at(n_ord, i_x, 0) ] = partial[ at(n_ord, i_x, 0) ].add( &dx0 );
    Ok(())
}
//
pub(crate) fn log_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    log_rows_forward(q_low, q_up, n_ord, taylor, arg[0] as usize, i_z)
}
pub(crate) fn log_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    log_rows_dir(q, r, n_col, taylor, arg[0] as usize, i_z)
}
pub(crate) fn log_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    log_rows_reverse(d, n_ord, taylor, partial, arg[0] as usize, i_z)
}
// --------------------------------------------------------------------------
// log1p
//
// Same recursion as log with the denominator 1 + x[0].
//
pub(crate) fn log1p_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x   = arg[0] as usize;
    let den = B::one().add( &taylor[ at(n_ord, x, 0) ] );
    if den == B::zero() {
        return Err( "log1p of minus one" );
    }
    for k in q_low ..= q_up {
        if k == 0 {
            taylor[ at(n_ord, i_z, 0) ] = taylor[ at(n_ord, x, 0) ].log1p();
            continue;
        }
        let mut sum = taylor[ at(n_ord, x, k) ].clone();
        for j in 1 .. k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let term   = ( factor.mul( &taylor[ at(n_ord, i_z, j) ] ) ).mul( &taylor[ at(n_ord, x, k - j) ] );
            sum = sum.sub( &term );
        }
        taylor[ at(n_ord, i_z, k) ] = sum.div( &den );
    }
    Ok(())
}
//
pub(crate) fn log1p_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x   = arg[0] as usize;
    let den = B::one().add( &taylor[ dir_at(n_col, r, x, 0, 0) ] );
    if den == B::zero() {
        return Err( "log1p of minus one" );
    }
    for ell in 0 .. r {
        let mut sum = taylor[ dir_at(n_col, r, x, q, ell) ].clone();
        for j in 1 .. q {
            let factor = B::from_f64( j as f64 / q as f64 );
            let term   = ( factor.mul( &taylor[ dir_at(n_col, r, i_z, j, ell) ] ) ).mul( &taylor[ dir_at(n_col, r, x, q - j, ell) ] );
            sum = sum.sub( &term );
        }
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = sum.div( &den );
    }
    Ok(())
}
//
pub(crate) fn log1p_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let x   = arg[0] as usize;
    let den = B::one().add( &taylor[ at(n_ord, x, 0) ] );
    if den == B::zero() {
        return Err( "log1p of minus one" );
    }
    for k in (1 ..= d).rev() {
        let pz = partial[ at(n_ord, i_z, k) ].div( &den );
        partial[ at(n_ord, x, k) ] = partial[ at(n_ord, x, k) ].add( &pz );
        let dx0 = pz.mul( &taylor[ at(n_ord, i_z, k) ] );
        partial[ at(n_ord, x, 0) ] = partial[ at(n_ord, x, 0) ].sub( &dx0 );
        for j in 1 .. k {
            let factor = B::from_f64( j as f64 / k as f64 );
            let dx = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, i_z, j) ] );
            partial[ at(n_ord, x, k - j) ] =
                partial[ at(n_ord, x, k - j) ].sub( &dx );
            let dz = ( factor.mul( &pz ) ).mul( &taylor[ at(n_ord, x, k - j) ] );
            partial[ at(n_ord, i_z, j) ] =
                partial[ at(n_ord, i_z, j) ].sub( &dz );
        }
    }
    let dx0 = partial[ at(n_ord, i_z, 0) ].div( &den );
    partial[ at(n_ord, x, 0) ] = partial[ at(n_ord, x, 0) ].add( &dx0 );
    Ok(())
}
