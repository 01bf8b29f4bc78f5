// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! The reverse sweep: traverse the tape from the end marker to the
//! begin marker applying, for each operator, the reverse rule dual to
//! its forward Taylor recursion.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use crate::base::Base;
use crate::error::{Error, Result};
use crate::fun::AdFun;
use crate::op::id::*;
use crate::op::{at, KernelResult};
use crate::op::{arith, zmul, pow, unary, trig, inv_trig, erf};
use crate::op::{cexp, csum, call};
use crate::play::RevIter;
use crate::sweep::ReplayState;
use crate::atom;
use crate::atom::AtomRegistry;
use crate::discrete::DisRegistry;
// ---------------------------------------------------------------------------
//
// fault
fn fault(result : KernelResult, op_index : usize) -> Result<()> {
    result.map_err( |what| Error::NumericDomain { op_index, what } )
}
// ---------------------------------------------------------------------------
//
// reverse_sweep
/// Back propagate the partials in *partial* (seeded on the dependent
/// variables, orders 0 ..= d) down to the independent variables.
///
/// * taylor : the coefficients from a forward sweep of order d or more,
///   with the same row stride n_ord.
/// * state : the replay state that forward sweep filled (conditional
///   skips and load resolutions).
pub(crate) fn reverse_sweep<B>(
    fun     : &AdFun<B>,
    d       : usize,
    n_ord   : usize,
    taylor  : &[B],
    partial : &mut [B],
    state   : &ReplayState,
    trace   : bool,
) -> Result<()>
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let par = &fun.par_vec;
    //
    if trace {
        println!( "Begin Trace: reverse: d = {d}" );
    }
    //
    // in_block
    // scanning between the closing and opening bracket of an atomic call
    let mut in_block = false;
    //
    let iter = RevIter::new( &fun.op_vec, &fun.arg_vec, fun.size_var() );
    for step in iter {
        if state.cskip[step.i_op] {
            continue;
        }
        let op  = step.op;
        let arg = step.arg;
        let i_z = step.i_var + step.n_res.max(1) - 1;
        //
        if in_block {
            match op {
                FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => continue,
                AFUN_OP => {
                    // reached the opening bracket
                    let block = call::scan_call(
                        &fun.op_vec, &fun.arg_vec, step.i_op, step.i_arg,
                        step.i_var,
                    );
                    reverse_call(
                        fun, &block, d, n_ord, taylor, partial,
                    )?;
                    in_block = false;
                    continue;
                }
                other => panic!(
                    "reverse: operator {other} inside an atomic call block"
                ),
            }
        }
        match op {
            BEGIN_OP | END_OP | INV_OP | PAR_OP | DIS_OP | SIGN_OP => {}
            COM_OP | CSKIP_OP | PRIP_OP | PRIV_OP => {}
            STPP_OP | STPV_OP | STVP_OP | STVV_OP => {}
            //
            ADD_VV_OP =>
                arith::add_vv_reverse(d, n_ord, taylor, partial, arg, i_z),
            ADD_PV_OP =>
                arith::add_pv_reverse(d, n_ord, taylor, partial, arg, i_z),
            SUB_VV_OP =>
                arith::sub_vv_reverse(d, n_ord, taylor, partial, arg, i_z),
            SUB_PV_OP =>
                arith::sub_pv_reverse(d, n_ord, taylor, partial, arg, i_z),
            SUB_VP_OP =>
                arith::sub_vp_reverse(d, n_ord, taylor, partial, arg, i_z),
            MUL_VV_OP =>
                arith::mul_vv_reverse(d, n_ord, taylor, partial, arg, i_z),
            MUL_PV_OP =>
                arith::mul_pv_reverse(d, n_ord, taylor, partial, par, arg, i_z),
            DIV_VV_OP =>
                arith::div_vv_reverse(d, n_ord, taylor, partial, arg, i_z),
            DIV_PV_OP =>
                arith::div_pv_reverse(d, n_ord, taylor, partial, arg, i_z),
            DIV_VP_OP =>
                arith::div_vp_reverse(d, n_ord, taylor, partial, par, arg, i_z),
            ZMUL_VV_OP =>
                zmul::zmul_vv_reverse(d, n_ord, taylor, partial, arg, i_z),
            ZMUL_PV_OP =>
                zmul::zmul_pv_reverse(d, n_ord, taylor, partial, par, arg, i_z),
            ZMUL_VP_OP =>
                zmul::zmul_vp_reverse(d, n_ord, taylor, partial, par, arg, i_z),
            POW_VV_OP => fault(
                pow::pow_vv_reverse(d, n_ord, taylor, partial, arg, i_z),
                step.i_op,
            )?,
            POW_PV_OP => fault(
                pow::pow_pv_reverse(d, n_ord, taylor, partial, arg, i_z),
                step.i_op,
            )?,
            POW_VP_OP => fault(
                pow::pow_vp_reverse(d, n_ord, taylor, partial, par, arg, i_z),
                step.i_op,
            )?,
            //
            NEG_OP =>
                unary::neg_reverse(d, n_ord, taylor, partial, arg, i_z),
            ABS_OP =>
                unary::abs_reverse(d, n_ord, taylor, partial, arg, i_z),
            SQRT_OP => fault(
                unary::sqrt_reverse(d, n_ord, taylor, partial, arg, i_z),
                step.i_op,
            )?,
            EXP_OP =>
                unary::exp_reverse(d, n_ord, taylor, partial, arg, i_z),
            EXPM1_OP =>
                unary::expm1_reverse(d, n_ord, taylor, partial, arg, i_z),
            LOG_OP => fault(
                unary::log_reverse(d, n_ord, taylor, partial, arg, i_z),
                step.i_op,
            )?,
            LOG1P_OP => fault(
                unary::log1p_reverse(d, n_ord, taylor, partial, arg, i_z),
                step.i_op,
            )?,
            //
            SIN_OP => trig::sincos_reverse(
                d, n_ord, taylor, partial,
                arg[0] as usize, i_z, i_z - 1, false,
            ),
            COS_OP => trig::sincos_reverse(
                d, n_ord, taylor, partial,
                arg[0] as usize, i_z - 1, i_z, false,
            ),
            SINH_OP => trig::sincos_reverse(
                d, n_ord, taylor, partial,
                arg[0] as usize, i_z, i_z - 1, true,
            ),
            COSH_OP => trig::sincos_reverse(
                d, n_ord, taylor, partial,
                arg[0] as usize, i_z - 1, i_z, true,
            ),
            TAN_OP => trig::tan_reverse(
                d, n_ord, taylor, partial,
                arg[0] as usize, i_z - 1, i_z, false,
            ),
            TANH_OP => trig::tan_reverse(
                d, n_ord, taylor, partial,
                arg[0] as usize, i_z - 1, i_z, true,
            ),
            ASIN_OP => fault(
                inv_trig::asin_reverse(
                    d, n_ord, taylor, partial,
                    arg[0] as usize, i_z - 1, i_z, false,
                ),
                step.i_op,
            )?,
            ACOS_OP => fault(
                inv_trig::asin_reverse(
                    d, n_ord, taylor, partial,
                    arg[0] as usize, i_z - 1, i_z, true,
                ),
                step.i_op,
            )?,
            ATAN_OP => inv_trig::atan_reverse(
                d, n_ord, taylor, partial, arg[0] as usize, i_z - 1, i_z,
            ),
            ERF_OP => erf::erf_reverse(
                d, n_ord, taylor, partial, arg[0] as usize, i_z, false,
            ),
            ERFC_OP => erf::erf_reverse(
                d, n_ord, taylor, partial, arg[0] as usize, i_z, true,
            ),
            //
            CEXP_OP =>
                cexp::cexp_reverse(d, n_ord, taylor, partial, par, arg, i_z),
            CSUM_OP =>
                csum::csum_reverse(d, n_ord, taylor, partial, arg, i_z),
            //
            LDP_OP | LDV_OP => {
                // the adjoint of a load flows to the variable that was
                // stored into the element it resolved to
                let source = state.load_var[ arg[2] as usize ] as usize;
                if source != 0 {
                    for k in 0 ..= d {
                        let pz = partial[ at(n_ord, i_z, k) ].clone();
                        partial[ at(n_ord, source, k) ] =
                            partial[ at(n_ord, source, k) ].add( &pz );
                    }
                }
            }
            //
            AFUN_OP => {
                // first bracket seen from the end is the closing one
                in_block = true;
            }
            FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => panic!(
                "reverse: atomic call marker outside a call block"
            ),
            //
            other => panic!( "reverse: invalid operator id {other}" ),
        }
    }
    if trace {
        println!( "End Trace: reverse" );
    }
    Ok(())
}
// ---------------------------------------------------------------------------
//
// reverse_call
/// back propagate adjoints through one atomic call block
fn reverse_call<B>(
    fun     : &AdFun<B>,
    block   : &call::CallBlock,
    d       : usize,
    n_ord   : usize,
    taylor  : &[B],
    partial : &mut [B],
) -> Result<()>
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let n     = block.arg_index.len();
    let m     = block.res_index.len();
    let n_col = d + 1;
    //
    // tx
    let mut tx = vec![ B::zero() ; n * n_col ];
    for j in 0 .. n {
        let index = block.arg_index[j] as usize;
        if block.arg_is_var[j] {
            for k in 0 ..= d {
                tx[ j * n_col + k ] = taylor[ at(n_ord, index, k) ].clone();
            }
        } else {
            tx[ j * n_col ] = fun.par_vec[index].clone();
        }
    }
    //
    // ty, py
    let mut ty = vec![ B::zero() ; m * n_col ];
    let mut py = vec![ B::zero() ; m * n_col ];
    for i in 0 .. m {
        let index = block.res_index[i] as usize;
        if block.res_is_var[i] {
            for k in 0 ..= d {
                ty[ i * n_col + k ] = taylor[ at(n_ord, index, k) ].clone();
                py[ i * n_col + k ] = partial[ at(n_ord, index, k) ].clone();
            }
        } else {
            ty[ i * n_col ] = fun.par_vec[index].clone();
        }
    }
    //
    // px
    let mut px = vec![ B::zero() ; n * n_col ];
    let ok = atom::reverse::<B>(
        block.atom_index, block.call_id, d, &tx, &ty, &mut px, &py,
    );
    if ! ok {
        return Err( Error::AtomicFailure {
            atom_index : block.atom_index,
            call_id    : block.call_id as usize,
        } );
    }
    //
    // accumulate into the variable arguments
    for j in 0 .. n {
        if block.arg_is_var[j] {
            let index = block.arg_index[j] as usize;
            for k in 0 ..= d {
                let dx = px[ j * n_col + k ].clone();
                partial[ at(n_ord, index, k) ] =
                    partial[ at(n_ord, index, k) ].add( &dx );
            }
        }
    }
    Ok(())
}
