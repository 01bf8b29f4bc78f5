// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Reverse Hessian sparsity sweep.
//!
//! Two structures run backward in parallel: a per variable activity
//! flag (is the variable an argument of something nonlinear on the path
//! to a selected dependent), and a per variable Hessian row. A
//! nonlinear operator whose result is active adds the forward Jacobian
//! rows of its operands to their Hessian rows.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use crate::base::Base;
use crate::error::Result;
use crate::fun::AdFun;
use crate::op::id::*;
use crate::op::info;
use crate::op::call;
use crate::op::compare::{MASK_TRUE_VAR, MASK_FALSE_VAR};
use crate::play::RevIter;
use crate::sparse::SparsityStore;
use crate::atom;
use crate::atom::AtomRegistry;
// ---------------------------------------------------------------------------
//
// rev_hes_store
/// Reverse Hessian sparsity over a generic row store.
///
/// * jac : the forward Jacobian row of every variable and aggregate
///   (the cache left behind by a forward Jacobian sparsity sweep).
/// * active : per variable and aggregate reverse activity flag, seeded
///   true on the selected dependent variables.
/// * hes : the Hessian rows being built; on return the rows of the
///   independent variables hold the result.
pub(crate) fn rev_hes_store<B, S>(
    fun    : &AdFun<B>,
    jac    : &[ Vec<usize> ],
    active : &mut [bool],
    hes    : &mut S,
    trace  : bool,
) -> Result<()>
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
    S : SparsityStore,
{
    if trace {
        println!( "Begin Trace: rev_hes_sparsity" );
    }
    //
    // agg
    let agg = | offset : usize | {
        fun.size_var() + fun.vecad_index(offset)
    };
    //
    let mut in_block = false;
    let iter = RevIter::new( &fun.op_vec, &fun.arg_vec, fun.size_var() );
    for step in iter {
        let op  = step.op;
        let arg = step.arg;
        let i_z = step.i_var + step.n_res.max(1) - 1;
        //
        if in_block {
            match op {
                FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => continue,
                AFUN_OP => {
                    let block = call::scan_call(
                        &fun.op_vec, &fun.arg_vec, step.i_op, step.i_arg,
                        step.i_var,
                    );
                    rev_hes_call( fun, &block, jac, active, hes );
                    in_block = false;
                    continue;
                }
                other => panic!(
                    "rev_hes_sparsity: operator {other} inside a call block"
                ),
            }
        }
        //
        // linear propagation: operand inherits activity and Hessian row
        let linear = | hes : &mut S, active : &mut [bool], x : usize | {
            active[x] = active[x] || active[i_z];
            hes.union_into( x, i_z );
        };
        //
        // nonlinear in x: additionally the operand's Jacobian columns
        // (and possibly a partner's) join the operand's Hessian row
        match op {
            BEGIN_OP | END_OP | INV_OP | PAR_OP => {}
            COM_OP | CSKIP_OP | PRIP_OP | PRIV_OP => {}
            DIS_OP | SIGN_OP => {}
            //
            ADD_VV_OP => {
                linear( hes, active, arg[0] as usize );
                linear( hes, active, arg[1] as usize );
            }
            ADD_PV_OP | SUB_PV_OP => {
                linear( hes, active, arg[1] as usize );
            }
            SUB_VV_OP => {
                linear( hes, active, arg[0] as usize );
                linear( hes, active, arg[1] as usize );
            }
            SUB_VP_OP | DIV_VP_OP | ZMUL_VP_OP => {
                linear( hes, active, arg[0] as usize );
            }
            MUL_PV_OP | ZMUL_PV_OP => {
                linear( hes, active, arg[1] as usize );
            }
            //
            MUL_VV_OP | ZMUL_VV_OP => {
                let x = arg[0] as usize;
                let y = arg[1] as usize;
                linear( hes, active, x );
                linear( hes, active, y );
                if active[i_z] {
                    hes.add_all( x, &jac[y] );
                    hes.add_all( y, &jac[x] );
                }
            }
            //
            DIV_VV_OP => {
                let x = arg[0] as usize;
                let y = arg[1] as usize;
                linear( hes, active, x );
                linear( hes, active, y );
                if active[i_z] {
                    hes.add_all( x, &jac[y] );
                    hes.add_all( y, &jac[x] );
                    hes.add_all( y, &jac[y] );
                }
            }
            DIV_PV_OP => {
                let y = arg[1] as usize;
                linear( hes, active, y );
                if active[i_z] {
                    hes.add_all( y, &jac[y] );
                }
            }
            //
            POW_VV_OP | POW_PV_OP | POW_VP_OP => {
                let mut vars : Vec<usize> = Vec::new();
                if info::binary_left_is_var(op) {
                    vars.push( arg[0] as usize );
                }
                if info::binary_right_is_var(op) {
                    vars.push( arg[1] as usize );
                }
                for v in vars.iter() {
                    linear( hes, active, *v );
                }
                if active[i_z] {
                    for v in vars.iter() {
                        for w in vars.iter() {
                            let columns = jac[*w].clone();
                            hes.add_all( *v, &columns );
                        }
                    }
                }
            }
            //
            NEG_OP | ABS_OP => {
                linear( hes, active, arg[0] as usize );
            }
            //
            SQRT_OP | EXP_OP | EXPM1_OP | LOG_OP | LOG1P_OP
            | SIN_OP | COS_OP | SINH_OP | COSH_OP | TAN_OP | TANH_OP
            | ASIN_OP | ACOS_OP | ATAN_OP | ERF_OP | ERFC_OP => {
                let x = arg[0] as usize;
                linear( hes, active, x );
                if active[i_z] {
                    let columns = jac[x].clone();
                    hes.add_all( x, &columns );
                }
            }
            //
            CEXP_OP => {
                if arg[1] & MASK_TRUE_VAR != 0 {
                    linear( hes, active, arg[4] as usize );
                }
                if arg[1] & MASK_FALSE_VAR != 0 {
                    linear( hes, active, arg[5] as usize );
                }
            }
            //
            CSUM_OP => {
                let (add, sub) = crate::op::csum::split(arg);
                for a in add { linear( hes, active, *a as usize ); }
                for s in sub { linear( hes, active, *s as usize ); }
            }
            //
            LDP_OP | LDV_OP => {
                let row = agg( arg[0] as usize );
                active[row] = active[row] || active[i_z];
                hes.union_into( row, i_z );
            }
            STPV_OP | STVV_OP => {
                let row   = agg( arg[0] as usize );
                let value = arg[2] as usize;
                active[value] = active[value] || active[row];
                hes.union_into( value, row );
            }
            STPP_OP | STVP_OP => {}
            //
            AFUN_OP => {
                in_block = true;
            }
            FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => panic!(
                "rev_hes_sparsity: call marker outside a call block"
            ),
            //
            other => panic!( "rev_hes_sparsity: invalid operator {other}" ),
        }
    }
    if trace {
        println!( "End Trace: rev_hes_sparsity" );
    }
    Ok(())
}
// ---------------------------------------------------------------------------
//
// rev_hes_call
/// Hessian propagation through one atomic call block: first order
/// chaining along the local Jacobian pattern, plus the local Hessian
/// pairs when some selected result is active.
fn rev_hes_call<B, S>(
    fun    : &AdFun<B>,
    block  : &call::CallBlock,
    jac    : &[ Vec<usize> ],
    active : &mut [bool],
    hes    : &mut S,
)
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
    S : SparsityStore,
{
    let _ = fun;
    //
    let jac_local = atom::jac_sparsity::<B>(
        block.atom_index, block.call_id, false,
        &block.arg_is_var, &block.res_is_var,
    );
    //
    // chain rule along the local Jacobian
    let mut any_active = false;
    for [i, j] in jac_local.iter() {
        if block.res_is_var[*i] && block.arg_is_var[*j] {
            let res = block.res_index[*i] as usize;
            let x   = block.arg_index[*j] as usize;
            active[x] = active[x] || active[res];
            any_active = any_active || active[res];
            hes.union_into( x, res );
        }
    }
    //
    // local second derivative pairs
    if any_active {
        let hes_local = atom::hes_sparsity::<B>(
            block.atom_index, block.call_id,
            &block.arg_is_var, &block.res_is_var,
        );
        for [j1, j2] in hes_local {
            if block.arg_is_var[j1] && block.arg_is_var[j2] {
                let x1 = block.arg_index[j1] as usize;
                let x2 = block.arg_index[j2] as usize;
                let columns = jac[x2].clone();
                hes.add_all( x1, &columns );
            }
        }
    }
}
