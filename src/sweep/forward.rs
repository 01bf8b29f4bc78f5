// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! The forward sweeps: replay the tape computing Taylor coefficients
//! for orders q_low ..= q_up (single direction) or order q in r
//! directions at once.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use crate::base::Base;
use crate::error::{Error, Result};
use crate::fun::AdFun;
use crate::op::id::*;
use crate::op::info;
use crate::op::{at, dir_at, KernelResult};
use crate::op::{arith, zmul, pow, unary, trig, inv_trig, erf};
use crate::op::{cexp, csum, call};
use crate::op::compare::{Rel, MASK_LEFT_VAR, MASK_RIGHT_VAR};
use crate::play::SeqIter;
use crate::record::AdType;
use crate::sweep::ReplayState;
use crate::atom;
use crate::atom::AtomRegistry;
use crate::discrete;
use crate::discrete::DisRegistry;
use crate::IndexT;
// ---------------------------------------------------------------------------
//
// fault
/// attach the operator index to a kernel domain fault
fn fault(result : KernelResult, op_index : usize) -> Result<()> {
    result.map_err( |what| Error::NumericDomain { op_index, what } )
}
//
// text_at
/// the NUL terminated label starting at a text table offset
fn text_at(text_vec : &[u8], offset : usize) -> &str {
    let mut end = offset;
    while text_vec[end] != 0u8 {
        end += 1;
    }
    std::str::from_utf8( &text_vec[offset .. end] ).unwrap_or( "?" )
}
//
// vecad_slot
/// resolve a load or store index operand to a side table slot
fn vecad_slot<B : Base>(
    index_value : &B,
    offset      : usize,
    vecad_ind   : &[IndexT],
    op_index    : usize,
) -> Result<usize>
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let length = vecad_ind[offset - 1] as usize;
    let index  = index_value.to_index().ok_or(
        Error::VecAdIndexOutOfRange {
            op_index, index : usize::MAX, length
        }
    )?;
    if index >= length {
        return Err( Error::VecAdIndexOutOfRange { op_index, index, length } );
    }
    Ok( offset + index )
}
// ---------------------------------------------------------------------------
//
// forward_sweep
/// Replay the whole tape for orders q_low ..= q_up of every variable.
///
/// * n_ord : the row stride of *taylor* . When this sweep fills order
///   zero of a multi direction workspace, the stride is its n_col and
///   the order zero columns of both layouts coincide.
/// * check_compare : re-evaluate recorded comparisons (order zero only).
pub(crate) fn forward_sweep<B>(
    fun           : &AdFun<B>,
    q_low         : usize,
    q_up          : usize,
    n_ord         : usize,
    taylor        : &mut [B],
    state         : &mut ReplayState,
    check_compare : bool,
    trace         : bool,
) -> Result<()>
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let par       = &fun.par_vec;
    let vecad_ind = &fun.vecad_ind;
    let zero_low  = q_low == 0;
    //
    if trace {
        println!(
            "Begin Trace: forward: q_low = {q_low}, q_up = {q_up}, \
             n_var = {}", fun.size_var()
        );
        println!( "op_index, var_index, op_name, arg" );
    }
    //
    let mut iter = SeqIter::new( &fun.op_vec, &fun.arg_vec );
    while let Some(step) = iter.next() {
        //
        // conditional skips turn operators off for every order
        if state.cskip[step.i_op] {
            continue;
        }
        let op  = step.op;
        let arg = step.arg;
        let i_z = step.i_var + step.n_res.max(1) - 1;
        match op {
            BEGIN_OP | END_OP | INV_OP => {}
            //
            PAR_OP => {
                for k in q_low ..= q_up {
                    taylor[ at(n_ord, i_z, k) ] = if k == 0 {
                        par[ arg[0] as usize ].clone()
                    } else {
                        B::zero()
                    };
                }
            }
            //
            DIS_OP => {
                for k in q_low ..= q_up {
                    taylor[ at(n_ord, i_z, k) ] = if k == 0 {
                        let x = &taylor[ at(n_ord, arg[1] as usize, 0) ];
                        discrete::call::<B>( arg[0] as usize, x )
                    } else {
                        B::zero()
                    };
                }
            }
            //
            ADD_VV_OP =>
                arith::add_vv_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            ADD_PV_OP =>
                arith::add_pv_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            SUB_VV_OP =>
                arith::sub_vv_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            SUB_PV_OP =>
                arith::sub_pv_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            SUB_VP_OP =>
                arith::sub_vp_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            MUL_VV_OP =>
                arith::mul_vv_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            MUL_PV_OP =>
                arith::mul_pv_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            DIV_VV_OP =>
                arith::div_vv_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            DIV_PV_OP =>
                arith::div_pv_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            DIV_VP_OP =>
                arith::div_vp_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            ZMUL_VV_OP =>
                zmul::zmul_vv_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            ZMUL_PV_OP =>
                zmul::zmul_pv_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            ZMUL_VP_OP =>
                zmul::zmul_vp_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            POW_VV_OP => fault(
                pow::pow_vv_forward(q_low, q_up, n_ord, taylor, arg, i_z),
                step.i_op,
            )?,
            POW_PV_OP => fault(
                pow::pow_pv_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
                step.i_op,
            )?,
            POW_VP_OP => fault(
                pow::pow_vp_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
                step.i_op,
            )?,
            //
            NEG_OP =>
                unary::neg_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            ABS_OP =>
                unary::abs_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            SIGN_OP =>
                unary::sign_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            SQRT_OP => fault(
                unary::sqrt_forward(q_low, q_up, n_ord, taylor, arg, i_z),
                step.i_op,
            )?,
            EXP_OP =>
                unary::exp_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            EXPM1_OP =>
                unary::expm1_forward(q_low, q_up, n_ord, taylor, arg, i_z),
            LOG_OP => fault(
                unary::log_forward(q_low, q_up, n_ord, taylor, arg, i_z),
                step.i_op,
            )?,
            LOG1P_OP => fault(
                unary::log1p_forward(q_low, q_up, n_ord, taylor, arg, i_z),
                step.i_op,
            )?,
            //
            SIN_OP => trig::sincos_forward(
                q_low, q_up, n_ord, taylor,
                arg[0] as usize, i_z, i_z - 1, false,
            ),
            COS_OP => trig::sincos_forward(
                q_low, q_up, n_ord, taylor,
                arg[0] as usize, i_z - 1, i_z, false,
            ),
            SINH_OP => trig::sincos_forward(
                q_low, q_up, n_ord, taylor,
                arg[0] as usize, i_z, i_z - 1, true,
            ),
            COSH_OP => trig::sincos_forward(
                q_low, q_up, n_ord, taylor,
                arg[0] as usize, i_z - 1, i_z, true,
            ),
            TAN_OP => trig::tan_forward(
                q_low, q_up, n_ord, taylor,
                arg[0] as usize, i_z - 1, i_z, false,
            ),
            TANH_OP => trig::tan_forward(
                q_low, q_up, n_ord, taylor,
                arg[0] as usize, i_z - 1, i_z, true,
            ),
            ASIN_OP => fault(
                inv_trig::asin_forward(
                    q_low, q_up, n_ord, taylor,
                    arg[0] as usize, i_z - 1, i_z, false,
                ),
                step.i_op,
            )?,
            ACOS_OP => fault(
                inv_trig::asin_forward(
                    q_low, q_up, n_ord, taylor,
                    arg[0] as usize, i_z - 1, i_z, true,
                ),
                step.i_op,
            )?,
            ATAN_OP => inv_trig::atan_forward(
                q_low, q_up, n_ord, taylor, arg[0] as usize, i_z - 1, i_z,
            ),
            ERF_OP => erf::erf_forward(
                q_low, q_up, n_ord, taylor, arg[0] as usize, i_z, false,
            ),
            ERFC_OP => erf::erf_forward(
                q_low, q_up, n_ord, taylor, arg[0] as usize, i_z, true,
            ),
            //
            CEXP_OP =>
                cexp::cexp_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            //
            COM_OP => {
                if zero_low && check_compare {
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
                    if ! rel.eval( &left, &right ) {
                        state.compare_change_count += 1;
                        if state.compare_change_op_index.is_none() {
                            state.compare_change_op_index = Some( step.i_op );
                        }
                    }
                }
            }
            //
            CSKIP_OP => {
                if zero_low {
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
                    let n_true  = arg[4] as usize;
                    let n_false = arg[5] as usize;
                    let run = if rel.eval( &left, &right ) {
                        &arg[6 .. 6 + n_true]
                    } else {
                        &arg[6 + n_true .. 6 + n_true + n_false]
                    };
                    for op_index in run {
                        let op_index = *op_index as usize;
                        // the sentinel one past the last operator index
                        // never matches
                        if op_index < state.cskip.len() {
                            state.cskip[op_index] = true;
                            state.n_skipped      += 1;
                        }
                    }
                }
            }
            //
            CSUM_OP =>
                csum::csum_forward(q_low, q_up, n_ord, taylor, par, arg, i_z),
            //
            LDP_OP | LDV_OP => {
                let load_id = arg[2] as usize;
                if zero_low {
                    let index_value = if op == LDV_OP {
                        taylor[ at(n_ord, arg[1] as usize, 0) ].clone()
                    } else {
                        par[ arg[1] as usize ].clone()
                    };
                    let slot = vecad_slot(
                        &index_value, arg[0] as usize, vecad_ind, step.i_op,
                    )?;
                    state.load_var[load_id] = state.vecad_var[slot];
                    state.load_par[load_id] = state.vecad_par[slot];
                }
                let source = state.load_var[load_id] as usize;
                for k in q_low ..= q_up {
                    taylor[ at(n_ord, i_z, k) ] = if source != 0 {
                        taylor[ at(n_ord, source, k) ].clone()
                    } else if k == 0 {
                        par[ state.load_par[load_id] as usize ].clone()
                    } else {
                        B::zero()
                    };
                }
            }
            //
            STPP_OP | STPV_OP | STVP_OP | STVV_OP => {
                if zero_low {
                    let index_value = if op == STVP_OP || op == STVV_OP {
                        taylor[ at(n_ord, arg[1] as usize, 0) ].clone()
                    } else {
                        par[ arg[1] as usize ].clone()
                    };
                    let slot = vecad_slot(
                        &index_value, arg[0] as usize, vecad_ind, step.i_op,
                    )?;
                    if op == STPV_OP || op == STVV_OP {
                        state.vecad_var[slot] = arg[2];
                    } else {
                        state.vecad_var[slot] = 0;
                        state.vecad_par[slot] = arg[2];
                    }
                }
            }
            //
            PRIP_OP | PRIV_OP => {
                if zero_low {
                    let label = text_at( &fun.text_vec, arg[0] as usize );
                    if op == PRIV_OP {
                        let value = &taylor[ at(n_ord, arg[1] as usize, 0) ];
                        println!( "{label}{value}" );
                    } else {
                        let value = &par[ arg[1] as usize ];
                        println!( "{label}{value}" );
                    }
                }
            }
            //
            AFUN_OP => {
                let block = call::scan_call(
                    &fun.op_vec, &fun.arg_vec, step.i_op, step.i_arg,
                    step.i_var,
                );
                forward_call(
                    fun, &block, q_low, q_up, n_ord, taylor, step.i_op,
                )?;
                // consume the rest of the block, closing bracket included
                for _i in 1 .. block.n_op {
                    iter.next();
                }
            }
            FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => {
                // only reachable when the opening bracket was skipped
                debug_assert!( false,
                    "atomic call marker outside a call block"
                );
            }
            //
            other => panic!( "forward: invalid operator id {other}" ),
        }
        if trace && step.n_res > 0 {
            println!(
                "{}, {}, {}, {:?}",
                step.i_op, i_z, info::name(op), arg
            );
        }
    }
    if trace {
        println!( "End Trace: forward" );
    }
    Ok(())
}
// ---------------------------------------------------------------------------
//
// forward_call
/// evaluate one atomic call block for orders q_low ..= q_up
fn forward_call<B>(
    fun      : &AdFun<B>,
    block    : &call::CallBlock,
    q_low    : usize,
    q_up     : usize,
    n_ord    : usize,
    taylor   : &mut [B],
    op_index : usize,
) -> Result<()>
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let n     = block.arg_index.len();
    let m     = block.res_index.len();
    let n_col = q_up + 1;
    //
    // type_x, tx
    let mut type_x = Vec::with_capacity(n);
    let mut tx     = vec![ B::zero() ; n * n_col ];
    for j in 0 .. n {
        let index = block.arg_index[j] as usize;
        if block.arg_is_var[j] {
            type_x.push( AdType::Variable );
            for k in 0 ..= q_up {
                tx[ j * n_col + k ] = taylor[ at(n_ord, index, k) ].clone();
            }
        } else {
            if fun.dyn_is[index] {
                type_x.push( AdType::Dynamic );
            } else {
                type_x.push( AdType::Constant );
            }
            tx[ j * n_col ] = fun.par_vec[index].clone();
        }
    }
    //
    // select_y, ty
    let select_y : Vec<bool> = block.res_is_var.clone();
    let mut ty = vec![ B::zero() ; m * n_col ];
    for i in 0 .. m {
        let index = block.res_index[i] as usize;
        if block.res_is_var[i] {
            for k in 0 .. q_low {
                ty[ i * n_col + k ] = taylor[ at(n_ord, index, k) ].clone();
            }
        } else {
            ty[ i * n_col ] = fun.par_vec[index].clone();
        }
    }
    //
    let ok = atom::forward::<B>(
        block.atom_index, block.call_id, q_low, q_up,
        &type_x, &select_y, &tx, &mut ty,
    );
    if ! ok {
        return Err( Error::AtomicFailure {
            atom_index : block.atom_index,
            call_id    : block.call_id as usize,
        } );
    }
    let _ = op_index;
    //
    // write back the variable results
    for i in 0 .. m {
        if block.res_is_var[i] {
            let index = block.res_index[i] as usize;
            for k in q_low ..= q_up {
                taylor[ at(n_ord, index, k) ] =
                    ty[ i * n_col + k ].clone();
            }
        }
    }
    Ok(())
}
// ---------------------------------------------------------------------------
//
// forward_dir_sweep
/// Replay the tape computing order q in each of r directions; the
/// replay state (loads, skips, branch selections) was resolved by the
/// zero order sweep over the same workspace.
pub(crate) fn forward_dir_sweep<B>(
    fun    : &AdFun<B>,
    q      : usize,
    r      : usize,
    n_col  : usize,
    taylor : &mut [B],
    state  : &mut ReplayState,
    trace  : bool,
) -> Result<()>
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    debug_assert!( q >= 1 );
    let par = &fun.par_vec;
    //
    if trace {
        println!( "Begin Trace: forward_dir: q = {q}, r = {r}" );
    }
    //
    let mut iter = SeqIter::new( &fun.op_vec, &fun.arg_vec );
    while let Some(step) = iter.next() {
        if state.cskip[step.i_op] {
            continue;
        }
        let op  = step.op;
        let arg = step.arg;
        let i_z = step.i_var + step.n_res.max(1) - 1;
        match op {
            BEGIN_OP | END_OP | INV_OP => {}
            COM_OP | CSKIP_OP | PRIP_OP | PRIV_OP => {}
            STPP_OP | STPV_OP | STVP_OP | STVV_OP => {}
            //
            PAR_OP | DIS_OP | SIGN_OP => {
                // all derivative orders are zero
                for ell in 0 .. r {
                    taylor[ dir_at(n_col, r, i_z, q, ell) ] = B::zero();
                }
            }
            //
            ADD_VV_OP  => arith::add_vv_dir(q, r, n_col, taylor, arg, i_z),
            ADD_PV_OP  => arith::add_pv_dir(q, r, n_col, taylor, arg, i_z),
            SUB_VV_OP  => arith::sub_vv_dir(q, r, n_col, taylor, arg, i_z),
            SUB_PV_OP  => arith::sub_pv_dir(q, r, n_col, taylor, arg, i_z),
            SUB_VP_OP  => arith::sub_vp_dir(q, r, n_col, taylor, arg, i_z),
            MUL_VV_OP  => arith::mul_vv_dir(q, r, n_col, taylor, arg, i_z),
            MUL_PV_OP  => arith::mul_pv_dir(q, r, n_col, taylor, par, arg, i_z),
            DIV_VV_OP  => arith::div_vv_dir(q, r, n_col, taylor, arg, i_z),
            DIV_PV_OP  => arith::div_pv_dir(q, r, n_col, taylor, arg, i_z),
            DIV_VP_OP  => arith::div_vp_dir(q, r, n_col, taylor, par, arg, i_z),
            ZMUL_VV_OP => zmul::zmul_vv_dir(q, r, n_col, taylor, arg, i_z),
            ZMUL_PV_OP => zmul::zmul_pv_dir(q, r, n_col, taylor, par, arg, i_z),
            ZMUL_VP_OP => zmul::zmul_vp_dir(q, r, n_col, taylor, par, arg, i_z),
            POW_VV_OP  => fault(
                pow::pow_vv_dir(q, r, n_col, taylor, arg, i_z), step.i_op,
            )?,
            POW_PV_OP  => fault(
                pow::pow_pv_dir(q, r, n_col, taylor, arg, i_z), step.i_op,
            )?,
            POW_VP_OP  => fault(
                pow::pow_vp_dir(q, r, n_col, taylor, par, arg, i_z), step.i_op,
            )?,
            //
            NEG_OP   => unary::neg_dir(q, r, n_col, taylor, arg, i_z),
            ABS_OP   => unary::abs_dir(q, r, n_col, taylor, arg, i_z),
            SQRT_OP  => fault(
                unary::sqrt_dir(q, r, n_col, taylor, arg, i_z), step.i_op,
            )?,
            EXP_OP   => unary::exp_dir(q, r, n_col, taylor, arg, i_z),
            EXPM1_OP => unary::expm1_dir(q, r, n_col, taylor, arg, i_z),
            LOG_OP   => fault(
                unary::log_dir(q, r, n_col, taylor, arg, i_z), step.i_op,
            )?,
            LOG1P_OP => fault(
                unary::log1p_dir(q, r, n_col, taylor, arg, i_z), step.i_op,
            )?,
            //
            SIN_OP  => trig::sincos_dir(
                q, r, n_col, taylor, arg[0] as usize, i_z, i_z - 1, false,
            ),
            COS_OP  => trig::sincos_dir(
                q, r, n_col, taylor, arg[0] as usize, i_z - 1, i_z, false,
            ),
            SINH_OP => trig::sincos_dir(
                q, r, n_col, taylor, arg[0] as usize, i_z, i_z - 1, true,
            ),
            COSH_OP => trig::sincos_dir(
                q, r, n_col, taylor, arg[0] as usize, i_z - 1, i_z, true,
            ),
            TAN_OP  => trig::tan_dir(
                q, r, n_col, taylor, arg[0] as usize, i_z - 1, i_z, false,
            ),
            TANH_OP => trig::tan_dir(
                q, r, n_col, taylor, arg[0] as usize, i_z - 1, i_z, true,
            ),
            ASIN_OP => fault(
                inv_trig::asin_dir(
                    q, r, n_col, taylor, arg[0] as usize, i_z - 1, i_z, false,
                ),
                step.i_op,
            )?,
            ACOS_OP => fault(
                inv_trig::asin_dir(
                    q, r, n_col, taylor, arg[0] as usize, i_z - 1, i_z, true,
                ),
                step.i_op,
            )?,
            ATAN_OP => inv_trig::atan_dir(
                q, r, n_col, taylor, arg[0] as usize, i_z - 1, i_z,
            ),
            ERF_OP  => erf::erf_dir(
                q, r, n_col, taylor, arg[0] as usize, i_z, false,
            ),
            ERFC_OP => erf::erf_dir(
                q, r, n_col, taylor, arg[0] as usize, i_z, true,
            ),
            //
            CEXP_OP => cexp::cexp_dir(q, r, n_col, taylor, par, arg, i_z),
            CSUM_OP => csum::csum_dir(q, r, n_col, taylor, arg, i_z),
            //
            LDP_OP | LDV_OP => {
                let source = state.load_var[ arg[2] as usize ] as usize;
                for ell in 0 .. r {
                    taylor[ dir_at(n_col, r, i_z, q, ell) ] = if source != 0 {
                        taylor[ dir_at(n_col, r, source, q, ell) ].clone()
                    } else {
                        B::zero()
                    };
                }
            }
            //
            AFUN_OP => {
                let block = call::scan_call(
                    &fun.op_vec, &fun.arg_vec, step.i_op, step.i_arg,
                    step.i_var,
                );
                forward_dir_call(
                    fun, &block, q, r, n_col, taylor,
                )?;
                for _i in 1 .. block.n_op {
                    iter.next();
                }
            }
            FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => {
                debug_assert!( false,
                    "atomic call marker outside a call block"
                );
            }
            //
            other => panic!( "forward_dir: invalid operator id {other}" ),
        }
    }
    if trace {
        println!( "End Trace: forward_dir" );
    }
    Ok(())
}
//
// forward_dir_call
/// evaluate one atomic call block at order q, one direction at a time
fn forward_dir_call<B>(
    fun    : &AdFun<B>,
    block  : &call::CallBlock,
    q      : usize,
    r      : usize,
    n_col  : usize,
    taylor : &mut [B],
) -> Result<()>
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let n    = block.arg_index.len();
    let m    = block.res_index.len();
    let n_tx = q + 1;
    //
    let mut type_x = Vec::with_capacity(n);
    for j in 0 .. n {
        let index = block.arg_index[j] as usize;
        if block.arg_is_var[j] {
            type_x.push( AdType::Variable );
        } else if fun.dyn_is[index] {
            type_x.push( AdType::Dynamic );
        } else {
            type_x.push( AdType::Constant );
        }
    }
    let select_y : Vec<bool> = block.res_is_var.clone();
    //
    for ell in 0 .. r {
        let mut tx = vec![ B::zero() ; n * n_tx ];
        for j in 0 .. n {
            let index = block.arg_index[j] as usize;
            if block.arg_is_var[j] {
                for k in 0 ..= q {
                    tx[ j * n_tx + k ] =
                        taylor[ dir_at(n_col, r, index, k, ell) ].clone();
                }
            } else {
                tx[ j * n_tx ] = fun.par_vec[index].clone();
            }
        }
        let mut ty = vec![ B::zero() ; m * n_tx ];
        for i in 0 .. m {
            let index = block.res_index[i] as usize;
            if block.res_is_var[i] {
                for k in 0 .. q {
                    ty[ i * n_tx + k ] =
                        taylor[ dir_at(n_col, r, index, k, ell) ].clone();
                }
            } else {
                ty[ i * n_tx ] = fun.par_vec[index].clone();
            }
        }
        let ok = atom::forward::<B>(
            block.atom_index, block.call_id, q, q,
            &type_x, &select_y, &tx, &mut ty,
        );
        if ! ok {
            return Err( Error::AtomicFailure {
                atom_index : block.atom_index,
                call_id    : block.call_id as usize,
            } );
        }
        for i in 0 .. m {
            if block.res_is_var[i] {
                let index = block.res_index[i] as usize;
                taylor[ dir_at(n_col, r, index, q, ell) ] =
                    ty[ i * n_tx + q ].clone();
            }
        }
    }
    Ok(())
}
