// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Taylor kernels for the Pow operators.
//!
//! The tape encodes x^y through the identity x^y = exp(y * log(x)) as
//! three results: z0 = log(x), z1 = y * z0, z2 = exp(z1); the primary
//! result is z2 at `i_z` . The Taylor recursions for log, mul, and exp
//! therefore suffice. At x = 0 the encoding faults (log of zero) even
//! for integer exponents; this is the documented contract.
//!
//! Link to [parent module](super)
//!
//! * arg
//!     * arg\[0\]:  variable or parameter index of the base x
//!     * arg\[1\]:  variable or parameter index of the exponent y
// --------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::op::{at, dir_at, KernelResult};
use crate::op::arith;
use crate::op::unary;
// --------------------------------------------------------------------------
// pow_vv
//
pub(crate) fn pow_vv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_x  = arg[0] as usize;
    let i_y  = arg[1] as usize;
    let i_z0 = i_z - 2;
    let i_z1 = i_z - 1;
    unary::log_rows_forward(q_low, q_up, n_ord, taylor, i_x, i_z0)?;
    arith::mul_rows_forward(q_low, q_up, n_ord, taylor, i_y, i_z0, i_z1);
    unary::exp_rows_forward(q_low, q_up, n_ord, taylor, i_z1, i_z);
    Ok(())
}
//
pub(crate) fn pow_vv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_x  = arg[0] as usize;
    let i_y  = arg[1] as usize;
    let i_z0 = i_z - 2;
    let i_z1 = i_z - 1;
    unary::log_rows_dir(q, r, n_col, taylor, i_x, i_z0)?;
    arith::mul_rows_dir(q, r, n_col, taylor, i_y, i_z0, i_z1);
    unary::exp_rows_dir(q, r, n_col, taylor, i_z1, i_z);
    Ok(())
}
//
pub(crate) fn pow_vv_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_x  = arg[0] as usize;
    let i_y  = arg[1] as usize;
    let i_z0 = i_z - 2;
    let i_z1 = i_z - 1;
    unary::exp_rows_reverse(d, n_ord, taylor, partial, i_z1, i_z);
    arith::mul_rows_reverse(d, n_ord, taylor, partial, i_y, i_z0, i_z1);
    unary::log_rows_reverse(d, n_ord, taylor, partial, i_x, i_z0)?;
    Ok(())
}
// --------------------------------------------------------------------------
// pow_pv
//
// z0 = log(p) is a constant valued variable row.
//
pub(crate) fn pow_pv_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let p    = arg[0] as usize;
    let i_y  = arg[1] as usize;
    let i_z0 = i_z - 2;
    let i_z1 = i_z - 1;
    if par[p] == B::zero() {
        return Err( "pow: log of zero base" );
    }
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z0, k) ] = if k == 0 {
            par[p].log()
        } else {
            B::zero()
        };
    }
    arith::mul_rows_forward(q_low, q_up, n_ord, taylor, i_y, i_z0, i_z1);
    unary::exp_rows_forward(q_low, q_up, n_ord, taylor, i_z1, i_z);
    Ok(())
}
//
pub(crate) fn pow_pv_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_y  = arg[1] as usize;
    let i_z0 = i_z - 2;
    let i_z1 = i_z - 1;
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z0, q, ell) ] = B::zero();
    }
    arith::mul_rows_dir(q, r, n_col, taylor, i_y, i_z0, i_z1);
    unary::exp_rows_dir(q, r, n_col, taylor, i_z1, i_z);
    Ok(())
}
//
pub(crate) fn pow_pv_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_y  = arg[1] as usize;
    let i_z0 = i_z - 2;
    let i_z1 = i_z - 1;
    unary::exp_rows_reverse(d, n_ord, taylor, partial, i_z1, i_z);
    // the z0 partials accumulated here have no further destination
    arith::mul_rows_reverse(d, n_ord, taylor, partial, i_y, i_z0, i_z1);
    Ok(())
}
// --------------------------------------------------------------------------
// pow_vp
//
pub(crate) fn pow_vp_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_x  = arg[0] as usize;
    let p    = arg[1] as usize;
    let i_z0 = i_z - 2;
    let i_z1 = i_z - 1;
    unary::log_rows_forward(q_low, q_up, n_ord, taylor, i_x, i_z0)?;
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z1, k) ] = par[p].mul( &taylor[ at(n_ord, i_z0, k) ] );
    }
    unary::exp_rows_forward(q_low, q_up, n_ord, taylor, i_z1, i_z);
    Ok(())
}
//
pub(crate) fn pow_vp_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_x  = arg[0] as usize;
    let p    = arg[1] as usize;
    let i_z0 = i_z - 2;
    let i_z1 = i_z - 1;
    unary::log_rows_dir(q, r, n_col, taylor, i_x, i_z0)?;
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z1, q, ell) ] =
            par[p].mul( &taylor[ dir_at(n_col, r, i_z0, q, ell) ] );
    }
    unary::exp_rows_dir(q, r, n_col, taylor, i_z1, i_z);
    Ok(())
}
//
pub(crate) fn pow_vp_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], par : &[B], arg : &[IndexT],
    i_z : usize,
) -> KernelResult
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let i_x  = arg[0] as usize;
    let p    = arg[1] as usize;
    let i_z0 = i_z - 2;
    let i_z1 = i_z - 1;
    unary::exp_rows_reverse(d, n_ord, taylor, partial, i_z1, i_z);
    for k in 0 ..= d {
        let dz0 = par[p].mul( &partial[ at(n_ord, i_z1, k) ] );
        partial[ at(n_ord, i_z0, k) ] =
            partial[ at(n_ord, i_z0, k) ].add( &dz0 );
    }
    unary::log_rows_reverse(d, n_ord, taylor, partial, i_x, i_z0)?;
    Ok(())
}
