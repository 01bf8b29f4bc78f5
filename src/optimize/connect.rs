// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Optimizer pass one: reverse dependency marking.
//!
//! Walking from the end marker to the begin marker, every variable gets
//! a connection type. Sum family parents mark their operands as sum
//! connected so whole addition chains can later fuse into one
//! cumulative sum; variables used only inside one branch of a
//! conditional expression are credited to that branch and become
//! conditional skip candidates.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use rustc_hash::FxHashMap;
//
use crate::IndexT;
use crate::base::Base;
use crate::fun::AdFun;
use crate::op::id::*;
use crate::op::info;
use crate::op::call;
use crate::op::compare::Rel;
use crate::play::RevIter;
use crate::atom;
use crate::atom::AtomRegistry;
use crate::optimize::Options;
// ---------------------------------------------------------------------------
//
// Connect
/// connection type of one variable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Connect {
    //
    /// no dependent depends on it
    No,
    //
    /// some dependent depends on it, with no better classification
    Yes,
    //
    /// every use is as an operand of a sum family operator
    Sum,
    //
    /// sum connected and itself produced by a sum family operator, so
    /// it can be absorbed into its parent's cumulative sum
    CSum,
    //
    /// used only inside the true branch of the identified conditional
    CexpTrue(u32),
    //
    /// used only inside the false branch of the identified conditional
    CexpFalse(u32),
}
//
// mark
/// combine an operand's existing connection with one more use
fn mark(connect : &mut [Connect], var : usize, with : Connect) {
    if var == 0 {
        return;
    }
    let old = connect[var];
    connect[var] = match (old, with) {
        ( Connect::No, new ) => new,
        //
        // a second sum parent would duplicate the operand's chain
        ( Connect::Sum, Connect::Sum ) => Connect::Yes,
        //
        ( old, new ) if old == new => old,
        _ => Connect::Yes,
    };
}
// ---------------------------------------------------------------------------
//
// CexpInfo
/// conditional skip candidate built for one conditional expression
pub(crate) struct CexpInfo {
    //
    /// guard relation, operand mask, and old operand addresses
    pub rel   : Rel,
    pub mask  : IndexT,
    pub left  : IndexT,
    pub right : IndexT,
    //
    /// the largest old variable index among the guard operands
    /// (zero when both are parameters)
    pub max_guard_var : usize,
    //
    /// old operator indices to skip when the relation holds
    /// (they feed only the false branch)
    pub skip_when_true  : Vec<usize>,
    //
    /// old operator indices to skip when the relation does not hold
    pub skip_when_false : Vec<usize>,
}
//
// CallKeep
/// what pass two keeps of one atomic call block
pub(crate) struct CallKeep {
    //
    /// false: the whole block is dead
    pub keep     : bool,
    //
    /// per argument: still needed by some connected result
    pub depend_x : Vec<bool>,
    //
    /// per result: some dependent depends on it
    pub depend_y : Vec<bool>,
}
//
// DependInfo
/// everything pass one learned
pub(crate) struct DependInfo {
    //
    /// per old variable
    pub connect  : Vec<Connect>,
    //
    /// per dynamic vector: some connected load reads it
    pub vec_live : Vec<bool>,
    //
    /// conditional skip candidates, indexed by the ids inside connect
    pub cexp     : Vec<CexpInfo>,
    //
    /// opening bracket operator index to call keep information
    pub call     : FxHashMap<usize, CallKeep>,
}
// ---------------------------------------------------------------------------
//
// reverse_depend
/// run pass one over a sealed tape
pub(crate) fn reverse_depend<B>(
    fun     : &AdFun<B>,
    options : &Options,
    trace   : bool,
) -> DependInfo
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let n_var = fun.size_var();
    let mut depend = DependInfo {
        connect  : vec![ Connect::No ; n_var ],
        vec_live : vec![ false ; fun.num_vecad_vec() ],
        cexp     : Vec::new(),
        call     : FxHashMap::default(),
    };
    //
    // dependents
    for i in 0 .. fun.size_dep() {
        depend.connect[ fun.dep_var_index(i) ] = Connect::Yes;
    }
    //
    if trace {
        println!( "Begin Trace: reverse_depend" );
        println!( "op_index, op_name, connect" );
    }
    //
    let mut in_block = false;
    let iter = RevIter::new( &fun.op_vec, &fun.arg_vec, n_var );
    let mut var_args : Vec<usize> = Vec::new();
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
                    let keep = call_depend::<B>( &block, &mut depend.connect );
                    depend.call.insert( step.i_op, keep );
                    in_block = false;
                    continue;
                }
                other => panic!(
                    "reverse_depend: operator {other} inside a call block"
                ),
            }
        }
        //
        // c : connection of this operator's primary result
        let primary = step.i_var + step.n_res.max(1) - 1;
        let mut c   = if step.n_res == 0 {
            Connect::No
        } else {
            depend.connect[primary]
        };
        //
        match op {
            BEGIN_OP | END_OP | INV_OP | PAR_OP => {}
            //
            // old conditional skips are dropped and rebuilt
            CSKIP_OP => {}
            //
            COM_OP => {
                if ! options.no_compare_op {
                    var_args.clear();
                    info::op_var_args( op, arg, &mut var_args );
                    for a in var_args.iter() {
                        mark( &mut depend.connect, *a, Connect::Yes );
                    }
                }
            }
            //
            PRIP_OP | PRIV_OP => {
                if ! options.no_print_op {
                    var_args.clear();
                    info::op_var_args( op, arg, &mut var_args );
                    for a in var_args.iter() {
                        mark( &mut depend.connect, *a, Connect::Yes );
                    }
                }
            }
            //
            LDP_OP | LDV_OP => {
                if c != Connect::No {
                    let vec_index = fun.vecad_index( arg[0] as usize );
                    depend.vec_live[vec_index] = true;
                    if op == LDV_OP {
                        mark(
                            &mut depend.connect, arg[1] as usize,
                            Connect::Yes,
                        );
                    }
                }
            }
            //
            STPP_OP | STPV_OP | STVP_OP | STVV_OP => {
                // a store after every connected load of its vector was
                // already visited, so liveness is known here
                let vec_index = fun.vecad_index( arg[0] as usize );
                if depend.vec_live[vec_index] {
                    var_args.clear();
                    info::op_var_args( op, arg, &mut var_args );
                    for a in var_args.iter() {
                        mark( &mut depend.connect, *a, Connect::Yes );
                    }
                }
            }
            //
            DIS_OP => {
                if c != Connect::No {
                    mark( &mut depend.connect, arg[1] as usize, Connect::Yes );
                }
            }
            //
            AFUN_OP => {}
            //
            CEXP_OP => {
                if c != Connect::No {
                    use crate::op::compare::{
                        MASK_LEFT_VAR, MASK_RIGHT_VAR,
                        MASK_TRUE_VAR, MASK_FALSE_VAR,
                    };
                    let mask = arg[1];
                    let mut max_guard_var = 0usize;
                    if mask & MASK_LEFT_VAR != 0 {
                        mark(
                            &mut depend.connect, arg[2] as usize, Connect::Yes,
                        );
                        max_guard_var = max_guard_var.max( arg[2] as usize );
                    }
                    if mask & MASK_RIGHT_VAR != 0 {
                        mark(
                            &mut depend.connect, arg[3] as usize, Connect::Yes,
                        );
                        max_guard_var = max_guard_var.max( arg[3] as usize );
                    }
                    let id = depend.cexp.len() as u32;
                    depend.cexp.push( CexpInfo {
                        rel             : Rel::from_index( arg[0] ),
                        mask,
                        left            : arg[2],
                        right           : arg[3],
                        max_guard_var,
                        skip_when_true  : Vec::new(),
                        skip_when_false : Vec::new(),
                    } );
                    if mask & MASK_TRUE_VAR != 0 {
                        mark(
                            &mut depend.connect, arg[4] as usize,
                            Connect::CexpTrue(id),
                        );
                    }
                    if mask & MASK_FALSE_VAR != 0 {
                        mark(
                            &mut depend.connect, arg[5] as usize,
                            Connect::CexpFalse(id),
                        );
                    }
                }
            }
            //
            _ => {
                if c == Connect::No {
                    // result unused; operands get nothing
                } else {
                    //
                    // a sum connected sum operator fuses into its parent
                    let sum_family = info::is_sum_family(op)
                        && ! options.no_cumulative_sum_op;
                    if c == Connect::Sum && sum_family {
                        c = Connect::CSum;
                        depend.connect[primary] = c;
                    }
                    //
                    // operand classification
                    let with = if sum_family {
                        Connect::Sum
                    } else {
                        match c {
                            Connect::CexpTrue(id)  => Connect::CexpTrue(id),
                            Connect::CexpFalse(id) => Connect::CexpFalse(id),
                            _                      => Connect::Yes,
                        }
                    };
                    var_args.clear();
                    info::op_var_args( op, arg, &mut var_args );
                    for a in var_args.iter() {
                        mark( &mut depend.connect, *a, with );
                    }
                }
            }
        }
        //
        // conditional skip candidates: final classification is known
        // the moment the producer is visited; independents always run
        if step.n_res > 0 && op != INV_OP {
            match depend.connect[primary] {
                Connect::CexpTrue(id) => {
                    depend.cexp[id as usize]
                        .skip_when_false.push( step.i_op );
                }
                Connect::CexpFalse(id) => {
                    depend.cexp[id as usize]
                        .skip_when_true.push( step.i_op );
                }
                _ => {}
            }
        }
        if op == AFUN_OP {
            in_block = true;
        }
        if trace && step.n_res > 0 {
            println!(
                "{}, {}, {:?}",
                step.i_op, info::name(op), depend.connect[primary]
            );
        }
    }
    if trace {
        println!( "End Trace: reverse_depend" );
    }
    depend
}
// ---------------------------------------------------------------------------
//
// call_depend
/// dependency through one atomic call block
fn call_depend<B>(
    block   : &call::CallBlock,
    connect : &mut [Connect],
) -> CallKeep
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let n = block.arg_index.len();
    let m = block.res_index.len();
    //
    // depend_y
    let mut depend_y = vec![ false ; m ];
    let mut any      = false;
    for i in 0 .. m {
        if block.res_is_var[i] {
            let res = block.res_index[i] as usize;
            depend_y[i] = connect[res] != Connect::No;
            any = any || depend_y[i];
        }
    }
    if ! any {
        return CallKeep { keep : false, depend_x : vec![ false ; n ], depend_y };
    }
    //
    // depend_x
    let depend_x = atom::rev_depend::<B>(
        block.atom_index, block.call_id, n, &depend_y,
    );
    for j in 0 .. n {
        if depend_x[j] && block.arg_is_var[j] {
            mark( connect, block.arg_index[j] as usize, Connect::Yes );
        }
    }
    CallKeep { keep : true, depend_x, depend_y }
}
