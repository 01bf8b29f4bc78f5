// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Fixed information about an operator given its operator id.
//!
//! The sweeps, the player, and the optimizer rely exclusively on these
//! tables and on the argument layouts documented in [op::id](crate::op::id).
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::op::id::*;
// ---------------------------------------------------------------------------
//
// VARIADIC
/// the n_arg value for operators whose argument count is encoded
/// in their own argument slots (CSUM_OP, CSKIP_OP)
pub(crate) const VARIADIC : u8 = u8::MAX;
//
// OpInfo
/// Fixed information for one operator.
#[derive(Clone)]
pub struct OpInfo {
    //
    /// name the user sees for this operator
    pub name  : &'static str,
    //
    /// number of arguments consumed from the argument stream,
    /// or [VARIADIC]
    pub n_arg : u8,
    //
    /// number of new variables this operator produces;
    /// the primary result is the last one
    pub n_res : u8,
}
// ---------------------------------------------------------------------------
// op_info_vec
/// returns the vector of length NUMBER_OP that maps each operator id
/// to its [OpInfo] .
fn op_info_vec() -> Vec<OpInfo> {
    let empty = OpInfo { name : "invalid", n_arg : 0, n_res : 0 };
    let mut result = vec![ empty ; NUMBER_OP as usize ];
    let mut set = | op : u8, name : &'static str, n_arg : u8, n_res : u8 | {
        result[op as usize] = OpInfo { name, n_arg, n_res };
    };
    //
    set(BEGIN_OP,   "begin",    0, 0);
    set(END_OP,     "end",      0, 0);
    set(INV_OP,     "inv",      0, 1);
    set(PAR_OP,     "par",      1, 1);
    set(DIS_OP,     "dis",      2, 1);
    //
    set(ADD_VV_OP,  "add_vv",   2, 1);
    set(ADD_PV_OP,  "add_pv",   2, 1);
    set(SUB_VV_OP,  "sub_vv",   2, 1);
    set(SUB_PV_OP,  "sub_pv",   2, 1);
    set(SUB_VP_OP,  "sub_vp",   2, 1);
    set(MUL_VV_OP,  "mul_vv",   2, 1);
    set(MUL_PV_OP,  "mul_pv",   2, 1);
    set(DIV_VV_OP,  "div_vv",   2, 1);
    set(DIV_PV_OP,  "div_pv",   2, 1);
    set(DIV_VP_OP,  "div_vp",   2, 1);
    set(ZMUL_VV_OP, "zmul_vv",  2, 1);
    set(ZMUL_PV_OP, "zmul_pv",  2, 1);
    set(ZMUL_VP_OP, "zmul_vp",  2, 1);
    set(POW_VV_OP,  "pow_vv",   2, 3);
    set(POW_PV_OP,  "pow_pv",   2, 3);
    set(POW_VP_OP,  "pow_vp",   2, 3);
    //
    set(NEG_OP,     "neg",      1, 1);
    set(ABS_OP,     "abs",      1, 1);
    set(SIGN_OP,    "sign",     1, 1);
    set(SQRT_OP,    "sqrt",     1, 1);
    set(EXP_OP,     "exp",      1, 1);
    set(EXPM1_OP,   "expm1",    1, 1);
    set(LOG_OP,     "log",      1, 1);
    set(LOG1P_OP,   "log1p",    1, 1);
    //
    set(SIN_OP,     "sin",      1, 2);
    set(COS_OP,     "cos",      1, 2);
    set(SINH_OP,    "sinh",     1, 2);
    set(COSH_OP,    "cosh",     1, 2);
    set(TAN_OP,     "tan",      1, 2);
    set(TANH_OP,    "tanh",     1, 2);
    set(ASIN_OP,    "asin",     1, 2);
    set(ACOS_OP,    "acos",     1, 2);
    set(ATAN_OP,    "atan",     1, 2);
    set(ERF_OP,     "erf",      1, 3);
    set(ERFC_OP,    "erfc",     1, 3);
    //
    set(CEXP_OP,    "cexp",     6, 1);
    set(COM_OP,     "com",      4, 0);
    set(CSKIP_OP,   "cskip",    VARIADIC, 0);
    set(CSUM_OP,    "csum",     VARIADIC, 1);
    //
    set(LDP_OP,     "ldp",      3, 1);
    set(LDV_OP,     "ldv",      3, 1);
    set(STPP_OP,    "stpp",     3, 0);
    set(STPV_OP,    "stpv",     3, 0);
    set(STVP_OP,    "stvp",     3, 0);
    set(STVV_OP,    "stvv",     3, 0);
    //
    set(PRIP_OP,    "prip",     2, 0);
    set(PRIV_OP,    "priv",     2, 0);
    //
    set(AFUN_OP,    "afun",     4, 0);
    set(FUNAP_OP,   "funap",    1, 0);
    set(FUNAV_OP,   "funav",    1, 0);
    set(FUNRP_OP,   "funrp",    1, 0);
    set(FUNRV_OP,   "funrv",    0, 1);
    //
    result
}
//
// OP_INFO_VEC
/// the map from operator id to [OpInfo]
pub static OP_INFO_VEC : std::sync::LazyLock< Vec<OpInfo> > =
    std::sync::LazyLock::new( || op_info_vec() );
//
// name
/// name corresponding to an operator id
pub fn name(op : u8) -> &'static str {
    OP_INFO_VEC[op as usize].name
}
//
// n_res
/// number of results for an operator id
pub fn n_res(op : u8) -> usize {
    OP_INFO_VEC[op as usize].n_res as usize
}
// ---------------------------------------------------------------------------
// forward_arg_len
/// Number of argument slots for the operator whose arguments begin at
/// the front of *tail* ; resolves the variadic operators from their own
/// argument slots.
pub(crate) fn forward_arg_len(op : u8, tail : &[IndexT]) -> usize {
    match op {
        CSUM_OP  => 4 + tail[0] as usize + tail[1] as usize,
        CSKIP_OP => 7 + tail[4] as usize + tail[5] as usize,
        _        => OP_INFO_VEC[op as usize].n_arg as usize,
    }
}
//
// reverse_arg_len
/// Number of argument slots for the operator whose arguments end at
/// *i_arg_end* in *arg_vec* ; the variadic operators are resolved from
/// their trailing total slot count.
pub(crate) fn reverse_arg_len(
    op : u8, arg_vec : &[IndexT], i_arg_end : usize
) -> usize {
    match op {
        CSUM_OP | CSKIP_OP => arg_vec[i_arg_end - 1] as usize,
        _                  => OP_INFO_VEC[op as usize].n_arg as usize,
    }
}
// ---------------------------------------------------------------------------
// classification
//
/// is this one of the two argument arithmetic operators
pub(crate) fn is_binary(op : u8) -> bool {
    ADD_VV_OP <= op && op <= POW_VP_OP
}
//
/// is this a one argument operator with Taylor kernels
pub(crate) fn is_unary(op : u8) -> bool {
    NEG_OP <= op && op <= ERFC_OP
}
//
/// binary operators whose argument order does not matter
pub(crate) fn is_commutative(op : u8) -> bool {
    op == ADD_VV_OP || op == MUL_VV_OP
}
//
/// operators eligible to fuse into a cumulative sum
pub(crate) fn is_sum_family(op : u8) -> bool {
    matches!(op,
        ADD_VV_OP | ADD_PV_OP | SUB_VV_OP | SUB_PV_OP | SUB_VP_OP | CSUM_OP
    )
}
//
/// for a binary operator, is the left argument a variable index
pub(crate) fn binary_left_is_var(op : u8) -> bool {
    debug_assert!( is_binary(op) );
    ! matches!(op,
        ADD_PV_OP | SUB_PV_OP | MUL_PV_OP | DIV_PV_OP | ZMUL_PV_OP | POW_PV_OP
    )
}
//
/// for a binary operator, is the right argument a variable index
pub(crate) fn binary_right_is_var(op : u8) -> bool {
    debug_assert!( is_binary(op) );
    ! matches!(op,
        SUB_VP_OP | DIV_VP_OP | ZMUL_VP_OP | POW_VP_OP
    )
}
// ---------------------------------------------------------------------------
// op_var_args
/// Append the variable indices among this operator's arguments to
/// *result* . The atomic call markers are classified individually, so
/// a plain operator walk covers call blocks too.
pub(crate) fn op_var_args(
    op : u8, arg : &[IndexT], result : &mut Vec<usize>
) {
    use crate::op::compare::{MASK_LEFT_VAR, MASK_RIGHT_VAR};
    use crate::op::compare::{MASK_TRUE_VAR, MASK_FALSE_VAR};
    match op {
        BEGIN_OP | END_OP | INV_OP | PAR_OP => {}
        AFUN_OP | FUNAP_OP | FUNRP_OP | FUNRV_OP => {}
        PRIP_OP | LDP_OP | STPP_OP => {}
        //
        DIS_OP            => result.push( arg[1] as usize ),
        PRIV_OP           => result.push( arg[1] as usize ),
        LDV_OP            => result.push( arg[1] as usize ),
        STPV_OP           => result.push( arg[2] as usize ),
        STVP_OP           => result.push( arg[1] as usize ),
        STVV_OP           => {
            result.push( arg[1] as usize );
            result.push( arg[2] as usize );
        }
        FUNAV_OP          => result.push( arg[0] as usize ),
        //
        CEXP_OP => {
            let mask = arg[1];
            if mask & MASK_LEFT_VAR  != 0 { result.push( arg[2] as usize ); }
            if mask & MASK_RIGHT_VAR != 0 { result.push( arg[3] as usize ); }
            if mask & MASK_TRUE_VAR  != 0 { result.push( arg[4] as usize ); }
            if mask & MASK_FALSE_VAR != 0 { result.push( arg[5] as usize ); }
        }
        COM_OP | CSKIP_OP => {
            let mask = arg[1];
            if mask & MASK_LEFT_VAR  != 0 { result.push( arg[2] as usize ); }
            if mask & MASK_RIGHT_VAR != 0 { result.push( arg[3] as usize ); }
        }
        //
        CSUM_OP => {
            let n_add = arg[0] as usize;
            let n_sub = arg[1] as usize;
            for a in &arg[3 .. 3 + n_add + n_sub] {
                result.push( *a as usize );
            }
        }
        //
        op if is_binary(op) => {
            if binary_left_is_var(op)  { result.push( arg[0] as usize ); }
            if binary_right_is_var(op) { result.push( arg[1] as usize ); }
        }
        op if is_unary(op) => result.push( arg[0] as usize ),
        //
        other => panic!( "op_var_args: invalid operator id {other}" ),
    }
}
