// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Taylor kernels for the conditional expression operator.
//!
//! Link to [parent module](super)
//!
//! * arg
//!     * arg\[0\]:  relation code; see [Rel](crate::Rel)
//!     * arg\[1\]:  operand mask; bits 0 to 3 set mean left, right,
//!       if_true, if_false are variable indices, otherwise parameters
//!     * arg\[2\]:  left operand of the comparison
//!     * arg\[3\]:  right operand of the comparison
//!     * arg\[4\]:  result when the relation holds
//!     * arg\[5\]:  result when the relation does not hold
//!
//! The branch is selected by the relation on the zero order coefficients
//! of left and right; higher orders propagate from the selected branch
//! only.
// --------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::op::{at, dir_at};
use crate::op::compare::{
    Rel,
    MASK_LEFT_VAR,
    MASK_RIGHT_VAR,
    MASK_TRUE_VAR,
    MASK_FALSE_VAR,
};
// --------------------------------------------------------------------------
//
// cond
/// evaluate the relation on the zero order operand values
fn cond<B : Base>(
    n_ord : usize, taylor : &[B], par : &[B], arg : &[IndexT]
) -> bool
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let rel  = Rel::from_index( arg[0] );
    let mask = arg[1];
    let left = if mask & MASK_LEFT_VAR != 0 {
        taylor[ at(n_ord, arg[2] as usize, 0) ].clone()
    } else {
        par[ arg[2] as usize ].clone()
    };
    let right = if mask & MASK_RIGHT_VAR != 0 {
        taylor[ at(n_ord, arg[3] as usize, 0) ].clone()
    } else {
        par[ arg[3] as usize ].clone()
    };
    rel.eval( &left, &right )
}
//
// select
/// the selected branch operand and whether it is a variable
pub(crate) fn select(arg : &[IndexT], relation_holds : bool) -> (usize, bool) {
    let mask = arg[1];
    if relation_holds {
        ( arg[4] as usize, mask & MASK_TRUE_VAR  != 0 )
    } else {
        ( arg[5] as usize, mask & MASK_FALSE_VAR != 0 )
    }
}
// --------------------------------------------------------------------------
// cexp_forward
pub(crate) fn cexp_forward<B : Base>(
    q_low : usize, q_up : usize, n_ord : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let holds = cond(n_ord, taylor, par, arg);
    let (sel, sel_var) = select(arg, holds);
    for k in q_low ..= q_up {
        taylor[ at(n_ord, i_z, k) ] = if sel_var {
            taylor[ at(n_ord, sel, k) ].clone()
        } else if k == 0 {
            par[sel].clone()
        } else {
            B::zero()
        };
    }
}
//
// cexp_dir
pub(crate) fn cexp_dir<B : Base>(
    q : usize, r : usize, n_col : usize,
    taylor : &mut [B], par : &[B], arg : &[IndexT], i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    // the zero order coefficients are shared by all directions, so the
    // selection is the same for every direction
    let rel  = Rel::from_index( arg[0] );
    let mask = arg[1];
    let left = if mask & MASK_LEFT_VAR != 0 {
        taylor[ dir_at(n_col, r, arg[2] as usize, 0, 0) ].clone()
    } else {
        par[ arg[2] as usize ].clone()
    };
    let right = if mask & MASK_RIGHT_VAR != 0 {
        taylor[ dir_at(n_col, r, arg[3] as usize, 0, 0) ].clone()
    } else {
        par[ arg[3] as usize ].clone()
    };
    let (sel, sel_var) = select( arg, rel.eval(&left, &right) );
    for ell in 0 .. r {
        taylor[ dir_at(n_col, r, i_z, q, ell) ] = if sel_var {
            taylor[ dir_at(n_col, r, sel, q, ell) ].clone()
        } else {
            B::zero()
        };
    }
}
//
// cexp_reverse
pub(crate) fn cexp_reverse<B : Base>(
    d : usize, n_ord : usize,
    taylor : &[B], partial : &mut [B], par : &[B], arg : &[IndexT],
    i_z : usize,
)
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let holds = cond(n_ord, taylor, par, arg);
    let (sel, sel_var) = select(arg, holds);
    if ! sel_var {
        return;
    }
    for k in 0 ..= d {
        let pz = partial[ at(n_ord, i_z, k) ].clone();
        partial[ at(n_ord, sel, k) ] = partial[ at(n_ord, sel, k) ].add( &pz );
    }
}
