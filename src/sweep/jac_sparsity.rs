// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Jacobian sparsity sweeps: propagate per variable column sets forward
//! (each result is the union of its variable operands) or backward
//! (each operand accumulates its results).
//!
//! Dynamic vectors are aggregated: every load reads, and every store
//! writes, a single row per vector, kept after the variable rows.
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
use crate::play::{SeqIter, RevIter};
use crate::sparse::SparsityStore;
use crate::atom;
use crate::atom::AtomRegistry;
// ---------------------------------------------------------------------------
//
// agg_row
/// the aggregate store row for the dynamic vector with the given side
/// table offset
fn agg_row<B : Base>(fun : &AdFun<B>, offset : usize) -> usize {
    fun.size_var() + fun.vecad_index(offset)
}
//
// binary_var_args
/// the variable operands of a binary operator
fn binary_var_args(op : u8, arg : &[crate::IndexT]) -> Vec<usize> {
    let mut result = Vec::with_capacity(2);
    if info::binary_left_is_var(op) {
        result.push( arg[0] as usize );
    }
    if info::binary_right_is_var(op) {
        result.push( arg[1] as usize );
    }
    result
}
// ---------------------------------------------------------------------------
//
// for_jac_store
/// Forward Jacobian sparsity over a generic row store. The caller seeds
/// the independent variable rows; on return every variable row (and
/// every aggregate row) holds its column set.
pub(crate) fn for_jac_store<B, S>(
    fun   : &AdFun<B>,
    store : &mut S,
    trace : bool,
) -> Result<()>
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
    S : SparsityStore,
{
    if trace {
        println!( "Begin Trace: for_jac_sparsity" );
        println!( "var_index, op_name, columns" );
    }
    let mut iter = SeqIter::new( &fun.op_vec, &fun.arg_vec );
    while let Some(step) = iter.next() {
        let op  = step.op;
        let arg = step.arg;
        //
        // union the source rows into every result row
        let mut source_rows : Vec<usize> = Vec::new();
        match op {
            BEGIN_OP | END_OP | INV_OP | PAR_OP => {}
            COM_OP | CSKIP_OP | PRIP_OP | PRIV_OP => {}
            //
            // derivative of a discrete function or sign is zero
            DIS_OP | SIGN_OP => {}
            //
            op if info::is_binary(op) => {
                source_rows = binary_var_args(op, arg);
            }
            op if info::is_unary(op) => {
                source_rows.push( arg[0] as usize );
            }
            //
            CEXP_OP => {
                if arg[1] & MASK_TRUE_VAR != 0 {
                    source_rows.push( arg[4] as usize );
                }
                if arg[1] & MASK_FALSE_VAR != 0 {
                    source_rows.push( arg[5] as usize );
                }
            }
            //
            CSUM_OP => {
                let (add, sub) = crate::op::csum::split(arg);
                for a in add { source_rows.push( *a as usize ); }
                for s in sub { source_rows.push( *s as usize ); }
            }
            //
            LDP_OP | LDV_OP => {
                source_rows.push( agg_row(fun, arg[0] as usize) );
            }
            STPV_OP | STVV_OP => {
                let dest = agg_row(fun, arg[0] as usize);
                store.union_into( dest, arg[2] as usize );
            }
            STPP_OP | STVP_OP => {}
            //
            AFUN_OP => {
                let block = call::scan_call(
                    &fun.op_vec, &fun.arg_vec, step.i_op, step.i_arg,
                    step.i_var,
                );
                let local = atom::jac_sparsity::<B>(
                    block.atom_index, block.call_id, false,
                    &block.arg_is_var, &block.res_is_var,
                );
                for [i, j] in local {
                    if block.res_is_var[i] && block.arg_is_var[j] {
                        store.union_into(
                            block.res_index[i] as usize,
                            block.arg_index[j] as usize,
                        );
                    }
                }
                for _i in 1 .. block.n_op {
                    iter.next();
                }
                continue;
            }
            FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => unreachable!(),
            //
            other => panic!( "for_jac_sparsity: invalid operator {other}" ),
        }
        for res in 0 .. step.n_res {
            for src in source_rows.iter() {
                store.union_into( step.i_var + res, *src );
            }
        }
        if trace && step.n_res > 0 {
            let i_z = step.i_var + step.n_res - 1;
            println!(
                "{}, {}, {:?}", i_z, info::name(op), store.row(i_z)
            );
        }
    }
    if trace {
        println!( "End Trace: for_jac_sparsity" );
    }
    Ok(())
}
// ---------------------------------------------------------------------------
//
// rev_jac_store
/// Reverse Jacobian sparsity over a generic row store. The caller seeds
/// the dependent variable rows; on return the independent variable rows
/// hold their column sets.
///
/// * dependency : when true, edges that carry dependency but not
///   derivative are included: the condition operands of a conditional
///   expression, the argument of a discrete function, and the index
///   variables of dynamic vector loads and stores. The optimizer uses
///   this mode.
pub(crate) fn rev_jac_store<B, S>(
    fun        : &AdFun<B>,
    store      : &mut S,
    dependency : bool,
    trace      : bool,
) -> Result<()>
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
    S : SparsityStore,
{
    if trace {
        println!( "Begin Trace: rev_jac_sparsity, dependency = {dependency}" );
    }
    let mut in_block = false;
    let iter = RevIter::new( &fun.op_vec, &fun.arg_vec, fun.size_var() );
    for step in iter {
        let op  = step.op;
        let arg = step.arg;
        //
        if in_block {
            match op {
                FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => continue,
                AFUN_OP => {
                    let block = call::scan_call(
                        &fun.op_vec, &fun.arg_vec, step.i_op, step.i_arg,
                        step.i_var,
                    );
                    let local = atom::jac_sparsity::<B>(
                        block.atom_index, block.call_id, dependency,
                        &block.arg_is_var, &block.res_is_var,
                    );
                    for [i, j] in local {
                        if block.res_is_var[i] && block.arg_is_var[j] {
                            store.union_into(
                                block.arg_index[j] as usize,
                                block.res_index[i] as usize,
                            );
                        }
                    }
                    in_block = false;
                    continue;
                }
                other => panic!(
                    "rev_jac_sparsity: operator {other} inside a call block"
                ),
            }
        }
        //
        // dest_rows accumulate every result row of this operator
        let mut dest_rows : Vec<usize> = Vec::new();
        match op {
            BEGIN_OP | END_OP | INV_OP | PAR_OP => {}
            COM_OP | CSKIP_OP | PRIP_OP | PRIV_OP => {}
            SIGN_OP => {}
            //
            DIS_OP => {
                if dependency {
                    dest_rows.push( arg[1] as usize );
                }
            }
            //
            op if info::is_binary(op) => {
                dest_rows = binary_var_args(op, arg);
            }
            op if info::is_unary(op) => {
                dest_rows.push( arg[0] as usize );
            }
            //
            CEXP_OP => {
                if arg[1] & MASK_TRUE_VAR != 0 {
                    dest_rows.push( arg[4] as usize );
                }
                if arg[1] & MASK_FALSE_VAR != 0 {
                    dest_rows.push( arg[5] as usize );
                }
                if dependency {
                    if arg[1] & crate::op::compare::MASK_LEFT_VAR != 0 {
                        dest_rows.push( arg[2] as usize );
                    }
                    if arg[1] & crate::op::compare::MASK_RIGHT_VAR != 0 {
                        dest_rows.push( arg[3] as usize );
                    }
                }
            }
            //
            CSUM_OP => {
                let (add, sub) = crate::op::csum::split(arg);
                for a in add { dest_rows.push( *a as usize ); }
                for s in sub { dest_rows.push( *s as usize ); }
            }
            //
            LDP_OP | LDV_OP => {
                let agg = agg_row(fun, arg[0] as usize);
                let i_z = step.i_var;
                store.union_into( agg, i_z );
                if dependency && op == LDV_OP {
                    store.union_into( arg[1] as usize, i_z );
                }
                continue;
            }
            STPV_OP | STVV_OP => {
                let agg = agg_row(fun, arg[0] as usize);
                store.union_into( arg[2] as usize, agg );
                if dependency && op == STVV_OP {
                    store.union_into( arg[1] as usize, agg );
                }
                continue;
            }
            STPP_OP | STVP_OP => {
                if dependency && op == STVP_OP {
                    let agg = agg_row(fun, arg[0] as usize);
                    store.union_into( arg[1] as usize, agg );
                }
                continue;
            }
            //
            AFUN_OP => {
                in_block = true;
                continue;
            }
            FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => panic!(
                "rev_jac_sparsity: call marker outside a call block"
            ),
            //
            other => panic!( "rev_jac_sparsity: invalid operator {other}" ),
        }
        for dest in dest_rows {
            for res in 0 .. step.n_res {
                store.union_into( dest, step.i_var + res );
            }
        }
    }
    if trace {
        println!( "End Trace: rev_jac_sparsity" );
    }
    Ok(())
}
