// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! The tape optimizer: rewrite a playable tape into an equivalent
//! playable tape that computes the same dependents with fewer
//! operators.
//!
//! Pass one ([connect]) classifies every variable from the dependents
//! backward. Pass two walks forward re-recording the connected
//! operators into a fresh recorder, folding addition chains into
//! cumulative sums, reusing earlier equivalent operators
//! ([hash_op]), and inserting conditional skips in front of the
//! operators that only one branch of a conditional expression needs.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// sub-modules
pub(crate) mod connect;
pub(crate) mod hash_op;
// ---------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::error::{Error, Result};
use crate::fun::AdFun;
use crate::op::id::*;
use crate::op::info;
use crate::op::call;
use crate::op::compare::{MASK_LEFT_VAR, MASK_RIGHT_VAR};
use crate::op::compare::{MASK_TRUE_VAR, MASK_FALSE_VAR};
use crate::play;
use crate::play::SeqIter;
use crate::record::{Operand, Recorder};
use crate::atom::AtomRegistry;
use crate::discrete::DisRegistry;
//
use connect::{Connect, DependInfo, reverse_depend};
use hash_op::{ArgKey, OpHashMap};
// ---------------------------------------------------------------------------
//
// INVALID
/// placeholder in the old to new maps
const INVALID : IndexT = IndexT::MAX;
//
// Options
/// parsed optimizer options
#[derive(Clone, Debug, Default)]
pub(crate) struct Options {
    pub no_compare_op        : bool,
    pub no_conditional_skip  : bool,
    pub no_cumulative_sum_op : bool,
    pub no_print_op          : bool,
}
//
impl Options {
    //
    /// parse a space separated option string
    pub(crate) fn parse(options : &str) -> Self {
        let mut result = Options::default();
        for word in options.split_whitespace() {
            match word {
                "no_compare_op"        => result.no_compare_op        = true,
                "no_conditional_skip"  => result.no_conditional_skip  = true,
                "no_cumulative_sum_op" => result.no_cumulative_sum_op = true,
                "no_print_op"          => result.no_print_op          = true,
                other => panic!( "optimize: unknown option {other}" ),
            }
        }
        result
    }
}
// ---------------------------------------------------------------------------
//
// PatchJob
/// a conditional skip whose operator index runs await resolution
struct PatchJob {
    patch_start  : usize,
    cskip_new_op : usize,
    true_run     : Vec<usize>,
    false_run    : Vec<usize>,
}
// ---------------------------------------------------------------------------
impl<B> AdFun<B>
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    //
    // optimize
    /// Rewrite this tape into an equivalent smaller tape.
    ///
    /// * options : space separated words among `no_compare_op` (drop
    ///   recorded comparisons), `no_conditional_skip`,
    ///   `no_cumulative_sum_op`, `no_print_op`.
    ///
    /// The rewritten tape is checked against the structural tape
    /// invariants; a violation reports
    /// [Error::OptimizerConsistency]. Zero order value agreement can be
    /// checked at a probe point with [AdFun::optimize_with_check].
    ///
    /// # Example
    /// ```
    /// use adtape::{Recorder, Operand, record::BinOp};
    /// let mut rec : Recorder<f64> = Recorder::new();
    /// let x  = rec.independent(2).unwrap();
    /// let x0 = Operand::Var( x[0] );
    /// let x1 = Operand::Var( x[1] );
    /// // the same product twice: one survives optimization
    /// let p1 = rec.binary(BinOp::Mul, &x0, &x1).unwrap();
    /// let p2 = rec.binary(BinOp::Mul, &x1, &x0).unwrap();
    /// let s  = rec.binary(BinOp::Div, &p1, &p2).unwrap();
    /// let f  = rec.stop( vec![s] ).unwrap();
    /// let g  = f.optimize( "" ).unwrap();
    /// assert!( g.size_op() < f.size_op() );
    /// ```
    pub fn optimize(&self, options : &str) -> Result< AdFun<B> > {
        optimize_run( self, &Options::parse(options), false )
    }
    //
    // optimize_with_check
    /// [AdFun::optimize], then replay both tapes at zero order for the
    /// probe point x and require identical dependents.
    pub fn optimize_with_check(
        &mut self, options : &str, x : &[B]
    ) -> Result< AdFun<B> > {
        let mut new_fun = optimize_run( self, &Options::parse(options), false )?;
        //
        let mut taylor_old = self.new_taylor(0);
        let y_old = self.forward( 0, 0, x, &mut taylor_old, false )?;
        let mut taylor_new = new_fun.new_taylor(0);
        let y_new = new_fun.forward( 0, 0, x, &mut taylor_new, false )?;
        for i in 0 .. y_old.len() {
            if y_old[i] != y_new[i] {
                return Err( Error::OptimizerConsistency {
                    what : format!(
                        "dependent {i} changed from {} to {}",
                        y_old[i], y_new[i],
                    )
                } );
            }
        }
        Ok( new_fun )
    }
}
// ---------------------------------------------------------------------------
//
// remap
/// a rewritten variable address; panics if the variable was removed
fn remap(old_var2new_var : &[IndexT], old : IndexT) -> IndexT {
    let new = old_var2new_var[old as usize];
    debug_assert!( new != INVALID, "optimize: unresolved variable {old}" );
    new
}
// ---------------------------------------------------------------------------
//
// optimize_run
fn optimize_run<B>(
    fun     : &AdFun<B>,
    options : &Options,
    trace   : bool,
) -> Result< AdFun<B> >
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    //
    // pass one
    let depend = reverse_depend( fun, options, trace );
    //
    // random access over the old tape, for sum chain expansion
    let random = play::build_random( &fun.op_vec, &fun.arg_vec, fun.size_var() );
    //
    // the new recording
    let mut rec : Recorder<B> = Recorder::new();
    rec.seed_from( fun );
    rec.independent( fun.size_ind() ).map_err( |e|
        Error::OptimizerConsistency { what : e.to_string() }
    )?;
    //
    // old to new maps
    let mut old_var2new_var = vec![ INVALID ; fun.size_var() ];
    let mut old_op2new_op   = vec![ INVALID ; fun.size_op() ];
    old_var2new_var[0] = 0;
    for j in 0 .. fun.size_ind() {
        old_var2new_var[1 + j] = (1 + j) as IndexT;
        old_op2new_op[1 + j]   = (1 + j) as IndexT;
    }
    old_op2new_op[0] = 0;
    //
    // pending conditional skips ordered by guard availability
    let mut pending : Vec<usize> = (0 .. depend.cexp.len())
        .filter( |id| {
            ! options.no_conditional_skip && (
                ! depend.cexp[*id].skip_when_true.is_empty()
                || ! depend.cexp[*id].skip_when_false.is_empty()
            )
        } )
        .collect();
    pending.sort_by_key( |id| depend.cexp[*id].max_guard_var );
    pending.reverse();  // pop from the back, smallest guard first
    let mut patch_jobs : Vec<PatchJob> = Vec::new();
    //
    // hash map for common subexpressions
    let mut cse = OpHashMap::new();
    //
    let err = |what : String| Error::OptimizerConsistency { what };
    //
    let mut iter = SeqIter::new( &fun.op_vec, &fun.arg_vec );
    while let Some(step) = iter.next() {
        let op  = step.op;
        let arg = step.arg;
        //
        // emit pending conditional skips whose guards are now resolved
        while let Some(id) = pending.last().copied() {
            let info = &depend.cexp[id];
            if info.max_guard_var >= step.i_var {
                break;
            }
            pending.pop();
            let left = if info.mask & MASK_LEFT_VAR != 0 {
                remap( &old_var2new_var, info.left )
            } else {
                info.left
            };
            let right = if info.mask & MASK_RIGHT_VAR != 0 {
                remap( &old_var2new_var, info.right )
            } else {
                info.right
            };
            let cskip_new_op = rec.op_vec.len();
            let patch_start  = rec.put_cskip_raw(
                info.rel,
                info.mask & ( MASK_LEFT_VAR | MASK_RIGHT_VAR ),
                left,
                right,
                info.skip_when_true.len(),
                info.skip_when_false.len(),
            ).map_err( |e| err( e.to_string() ) )?;
            patch_jobs.push( PatchJob {
                patch_start,
                cskip_new_op,
                true_run  : info.skip_when_true.clone(),
                false_run : info.skip_when_false.clone(),
            } );
        }
        //
        let primary = step.i_var + step.n_res.max(1) - 1;
        let connect = if step.n_res == 0 {
            Connect::Yes
        } else {
            depend.connect[primary]
        };
        //
        // csum absorbed operators disappear; their parent expands them
        let absorbed = step.n_res > 0
            && connect == Connect::CSum
            && ! options.no_cumulative_sum_op;
        if step.n_res > 0 && ( connect == Connect::No || absorbed ) {
            continue;
        }
        //
        match op {
            BEGIN_OP | END_OP | INV_OP => {}
            //
            // the old skips are rebuilt from scratch
            CSKIP_OP => {}
            //
            COM_OP => {
                if ! options.no_compare_op {
                    let mut new_arg = [ arg[0], arg[1], arg[2], arg[3] ];
                    if arg[1] & MASK_LEFT_VAR != 0 {
                        new_arg[2] = remap( &old_var2new_var, arg[2] );
                    }
                    if arg[1] & MASK_RIGHT_VAR != 0 {
                        new_arg[3] = remap( &old_var2new_var, arg[3] );
                    }
                    old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                    rec.put_op_raw( COM_OP, &new_arg )
                        .map_err( |e| err( e.to_string() ) )?;
                }
            }
            //
            PRIP_OP => {
                if ! options.no_print_op {
                    old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                    rec.put_op_raw( PRIP_OP, arg )
                        .map_err( |e| err( e.to_string() ) )?;
                }
            }
            PRIV_OP => {
                if ! options.no_print_op {
                    let new_arg = [
                        arg[0], remap( &old_var2new_var, arg[1] ),
                    ];
                    old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                    rec.put_op_raw( PRIV_OP, &new_arg )
                        .map_err( |e| err( e.to_string() ) )?;
                }
            }
            //
            STPP_OP | STPV_OP | STVP_OP | STVV_OP => {
                let vec_index = fun.vecad_index( arg[0] as usize );
                if depend.vec_live[vec_index] {
                    let mut new_arg = [ arg[0], arg[1], arg[2] ];
                    if op == STVP_OP || op == STVV_OP {
                        new_arg[1] = remap( &old_var2new_var, arg[1] );
                    }
                    if op == STPV_OP || op == STVV_OP {
                        new_arg[2] = remap( &old_var2new_var, arg[2] );
                    }
                    old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                    rec.put_op_raw( op, &new_arg )
                        .map_err( |e| err( e.to_string() ) )?;
                }
            }
            //
            LDP_OP | LDV_OP => {
                let mut new_arg = [ arg[0], arg[1], rec.n_load_op as IndexT ];
                if op == LDV_OP {
                    new_arg[1] = remap( &old_var2new_var, arg[1] );
                }
                rec.n_load_op += 1;
                old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                let new_var = rec.put_op_raw( op, &new_arg )
                    .map_err( |e| err( e.to_string() ) )?;
                old_var2new_var[primary] = new_var;
            }
            //
            PAR_OP => {
                old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                let new_var = rec.put_op_raw( PAR_OP, arg )
                    .map_err( |e| err( e.to_string() ) )?;
                old_var2new_var[primary] = new_var;
            }
            //
            DIS_OP => {
                let new_arg = [ arg[0], remap( &old_var2new_var, arg[1] ) ];
                old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                let new_var = rec.put_op_raw( DIS_OP, &new_arg )
                    .map_err( |e| err( e.to_string() ) )?;
                old_var2new_var[primary] = new_var;
            }
            //
            CEXP_OP => {
                let mask = arg[1];
                let mut new_arg = [
                    arg[0], mask, arg[2], arg[3], arg[4], arg[5],
                ];
                let masks = [
                    MASK_LEFT_VAR, MASK_RIGHT_VAR,
                    MASK_TRUE_VAR, MASK_FALSE_VAR,
                ];
                for (slot, bit) in masks.iter().enumerate() {
                    if mask & bit != 0 {
                        new_arg[2 + slot] =
                            remap( &old_var2new_var, arg[2 + slot] );
                    }
                }
                old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                let new_var = rec.put_op_raw( CEXP_OP, &new_arg )
                    .map_err( |e| err( e.to_string() ) )?;
                old_var2new_var[primary] = new_var;
            }
            //
            AFUN_OP => {
                let block = call::scan_call(
                    &fun.op_vec, &fun.arg_vec, step.i_op, step.i_arg,
                    step.i_var,
                );
                let keep = &depend.call[&step.i_op];
                if keep.keep {
                    emit_call(
                        fun, &mut rec, &mut cse,
                        &mut old_var2new_var, &mut old_op2new_op,
                        step.i_op, &block, keep,
                    )?;
                }
                for _i in 1 .. block.n_op {
                    iter.next();
                }
            }
            FUNAP_OP | FUNAV_OP | FUNRP_OP | FUNRV_OP => unreachable!(),
            //
            // sum family roots fuse their chains
            _ if info::is_sum_family(op)
                && ! options.no_cumulative_sum_op
                && has_csum_operand( fun, &depend, op, arg ) =>
            {
                let (add, sub, offset) = expand_sum_chain(
                    fun, &depend, &random, &mut rec, &mut old_var2new_var,
                    op, arg,
                )?;
                let offset_par = rec.put_con_par( &offset );
                old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                let new_var = rec.put_csum_raw( &add, &sub, offset_par )
                    .map_err( |e| err( e.to_string() ) )?;
                old_var2new_var[primary] = new_var;
            }
            //
            CSUM_OP => {
                // an existing cumulative sum with nothing to absorb is
                // re-emitted with remapped addends
                let (add_old, sub_old) = crate::op::csum::split(arg);
                let add : Vec<IndexT> = add_old.iter()
                    .map( |a| remap( &old_var2new_var, *a ) ).collect();
                let sub : Vec<IndexT> = sub_old.iter()
                    .map( |s| remap( &old_var2new_var, *s ) ).collect();
                old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                let new_var = rec.put_csum_raw( &add, &sub, arg[2] )
                    .map_err( |e| err( e.to_string() ) )?;
                old_var2new_var[primary] = new_var;
            }
            //
            op if info::is_binary(op) || info::is_unary(op) => {
                //
                // canonical argument keys
                let mut keys : Vec<ArgKey> = Vec::with_capacity(2);
                if info::is_binary(op) {
                    keys.push( if info::binary_left_is_var(op) {
                        ArgKey::Var( remap( &old_var2new_var, arg[0] ) )
                    } else {
                        ArgKey::Par( arg[0] )
                    } );
                    keys.push( if info::binary_right_is_var(op) {
                        ArgKey::Var( remap( &old_var2new_var, arg[1] ) )
                    } else {
                        ArgKey::Par( arg[1] )
                    } );
                } else {
                    keys.push(
                        ArgKey::Var( remap( &old_var2new_var, arg[0] ) )
                    );
                }
                OpHashMap::canonicalize( op, &mut keys, &rec.par_vec );
                //
                if let Some(results) = cse.try_match( op, &keys, &rec.par_vec )
                {
                    old_var2new_var[primary] = results[0];
                    continue;
                }
                //
                let new_arg : Vec<IndexT> = keys.iter().map( |k| match k {
                    ArgKey::Var(i) => *i,
                    ArgKey::Par(i) => *i,
                    ArgKey::Lit(i) => *i,
                } ).collect();
                old_op2new_op[step.i_op] = rec.op_vec.len() as IndexT;
                let new_var = rec.put_op_raw( op, &new_arg )
                    .map_err( |e| err( e.to_string() ) )?;
                old_var2new_var[primary] = new_var;
                cse.insert( op, keys, &rec.par_vec, &[new_var] );
            }
            //
            other => panic!( "optimize: invalid operator id {other}" ),
        }
    }
    //
    // resolve the conditional skip runs; operators that were removed or
    // merged, or that come before their skip, get the one past the end
    // sentinel and are never skipped
    let sentinel = ( rec.op_vec.len() + 1 ) as IndexT;
    for job in patch_jobs {
        let mut slot = job.patch_start;
        for old_op in job.true_run.iter().chain( job.false_run.iter() ) {
            let new_op = old_op2new_op[*old_op];
            let value  = if new_op == INVALID
                || (new_op as usize) <= job.cskip_new_op
            {
                sentinel
            } else {
                new_op
            };
            rec.patch_arg( slot, value );
            slot += 1;
        }
    }
    //
    // dependents
    let deps : Vec< Operand<B> > = (0 .. fun.size_dep())
        .map( |i| Operand::Var(
            remap( &old_var2new_var, fun.dep_var_index(i) as IndexT )
        ) )
        .collect();
    let new_fun = rec.stop( deps ).map_err( |e|
        Error::OptimizerConsistency { what : e.to_string() }
    )?;
    Ok( new_fun )
}
// ---------------------------------------------------------------------------
//
// has_csum_operand
/// does this sum family operator have an operand that fuses into it
fn has_csum_operand<B : Base>(
    fun    : &AdFun<B>,
    depend : &DependInfo,
    op     : u8,
    arg    : &[IndexT],
) -> bool
where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
{
    let mut var_args : Vec<usize> = Vec::new();
    info::op_var_args( op, arg, &mut var_args );
    let _ = fun;
    var_args.iter().any( |v| depend.connect[*v] == Connect::CSum )
}
// ---------------------------------------------------------------------------
//
// expand_sum_chain
/// Collect the whole addition chain under one sum family root: variable
/// addends and subtrahends (signs flipped under subtraction), with the
/// constant operands folded into one net offset. Dynamic parameter
/// operands are promoted to variables so the offset stays constant.
fn expand_sum_chain<B>(
    fun             : &AdFun<B>,
    depend          : &DependInfo,
    random          : &play::Random,
    rec             : &mut Recorder<B>,
    old_var2new_var : &mut [IndexT],
    root_op         : u8,
    root_arg        : &[IndexT],
) -> Result< (Vec<IndexT>, Vec<IndexT>, B) >
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let mut add    : Vec<IndexT> = Vec::new();
    let mut sub    : Vec<IndexT> = Vec::new();
    let mut offset : B = B::zero();
    //
    // work stack of (old operand address, is_variable, positive sign)
    let mut stack : Vec<(IndexT, bool, bool)> = Vec::new();
    //
    // push the operands of one sum family operator
    let push_operands = | stack : &mut Vec<(IndexT, bool, bool)>,
                          op : u8, arg : &[IndexT], positive : bool | {
        match op {
            ADD_VV_OP => {
                stack.push( (arg[0], true, positive) );
                stack.push( (arg[1], true, positive) );
            }
            ADD_PV_OP => {
                stack.push( (arg[0], false, positive) );
                stack.push( (arg[1], true, positive) );
            }
            SUB_VV_OP => {
                stack.push( (arg[0], true, positive) );
                stack.push( (arg[1], true, ! positive) );
            }
            SUB_PV_OP => {
                stack.push( (arg[0], false, positive) );
                stack.push( (arg[1], true, ! positive) );
            }
            SUB_VP_OP => {
                stack.push( (arg[0], true, positive) );
                stack.push( (arg[1], false, ! positive) );
            }
            CSUM_OP => {
                let n_add = arg[0] as usize;
                let n_sub = arg[1] as usize;
                stack.push( (arg[2], false, positive) );
                for a in &arg[3 .. 3 + n_add] {
                    stack.push( (*a, true, positive) );
                }
                for s in &arg[3 + n_add .. 3 + n_add + n_sub] {
                    stack.push( (*s, true, ! positive) );
                }
            }
            other => panic!( "expand_sum_chain: not a sum operator {other}" ),
        }
    };
    push_operands( &mut stack, root_op, root_arg, true );
    //
    while let Some( (address, is_var, positive) ) = stack.pop() {
        if is_var {
            let old_var = address as usize;
            if depend.connect[old_var] == Connect::CSum {
                //
                // absorb the producing operator's own operands
                let i_op  = random.var2op.get( old_var );
                let op    = fun.op_vec[i_op];
                let start = random.op2arg.get( i_op );
                let n_arg = info::forward_arg_len(
                    op, &fun.arg_vec[start ..]
                );
                let arg   = &fun.arg_vec[start .. start + n_arg];
                push_operands( &mut stack, op, arg, positive );
            } else {
                let new_var = remap( old_var2new_var, address );
                if positive {
                    add.push( new_var );
                } else {
                    sub.push( new_var );
                }
            }
        } else {
            let par = address as usize;
            if fun.dyn_is[par] {
                let new_var = rec.promote( &Operand::Par(address) )?;
                if positive {
                    add.push( new_var );
                } else {
                    sub.push( new_var );
                }
            } else if positive {
                offset = offset.add( &fun.par_vec[par] );
            } else {
                offset = offset.sub( &fun.par_vec[par] );
            }
        }
    }
    add.sort();
    sub.sort();
    Ok( (add, sub, offset) )
}
// ---------------------------------------------------------------------------
//
// emit_call
/// re-emit one atomic call block: dead variable arguments become the
/// nan parameter, dead variable results become parameter results, and
/// a block equivalent to an earlier one is merged away.
fn emit_call<B>(
    fun             : &AdFun<B>,
    rec             : &mut Recorder<B>,
    cse             : &mut OpHashMap,
    old_var2new_var : &mut [IndexT],
    old_op2new_op   : &mut [IndexT],
    i_op            : usize,
    block           : &call::CallBlock,
    keep            : &connect::CallKeep,
) -> Result<()>
where
    B : Base + AtomRegistry + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let n = block.arg_index.len();
    let m = block.res_index.len();
    //
    // argument markers and the hash key
    let nan_par = rec.put_con_par( &B::nan() );
    let mut arg_ops  : Vec<(u8, IndexT)> = Vec::with_capacity(n);
    let mut keys     : Vec<ArgKey> = Vec::new();
    keys.push( ArgKey::Lit( block.atom_index as IndexT ) );
    keys.push( ArgKey::Lit( block.call_id ) );
    for j in 0 .. n {
        if block.arg_is_var[j] && keep.depend_x[j] {
            let new_var = remap( old_var2new_var, block.arg_index[j] );
            arg_ops.push( (FUNAV_OP, new_var) );
            keys.push( ArgKey::Var(new_var) );
        } else if block.arg_is_var[j] {
            // dead variable argument: observing it is diagnostic
            arg_ops.push( (FUNAP_OP, nan_par) );
            keys.push( ArgKey::Par(nan_par) );
        } else {
            arg_ops.push( (FUNAP_OP, block.arg_index[j]) );
            keys.push( ArgKey::Par( block.arg_index[j] ) );
        }
    }
    //
    // result pattern is part of the key: merged calls must agree on
    // which results stay variables
    let res_var : Vec<bool> = (0 .. m)
        .map( |i| block.res_is_var[i] && keep.depend_y[i] )
        .collect();
    for flag in res_var.iter() {
        keys.push( ArgKey::Lit( *flag as IndexT ) );
    }
    //
    if let Some(results) = cse.try_match( AFUN_OP, &keys, &rec.par_vec ) {
        let mut cursor = 0;
        for i in 0 .. m {
            if res_var[i] {
                old_var2new_var[ block.res_index[i] as usize ] =
                    results[cursor];
                cursor += 1;
            }
        }
        return Ok(());
    }
    //
    // emit the block
    let head = [
        block.atom_index as IndexT, block.call_id,
        n as IndexT, m as IndexT,
    ];
    old_op2new_op[i_op] = rec.op_vec.len() as IndexT;
    rec.put_op_raw( AFUN_OP, &head )?;
    for (marker, address) in arg_ops {
        rec.put_op_raw( marker, &[address] )?;
    }
    let mut results : Vec<IndexT> = Vec::new();
    for i in 0 .. m {
        if res_var[i] {
            let new_var = rec.put_op_raw( FUNRV_OP, &[] )?;
            old_var2new_var[ block.res_index[i] as usize ] = new_var;
            results.push( new_var );
        } else if block.res_is_var[i] {
            // dead variable result becomes a parameter result
            rec.put_op_raw( FUNRP_OP, &[nan_par] )?;
        } else {
            rec.put_op_raw( FUNRP_OP, &[ block.res_index[i] ] )?;
        }
    }
    rec.put_op_raw( AFUN_OP, &head )?;
    cse.insert( AFUN_OP, keys, &rec.par_vec, &results );
    Ok(())
}
