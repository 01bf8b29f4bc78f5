// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Scanning of atomic function call blocks.
//!
//! An atomic invocation is a bracketed subsequence on the tape:
//! an opening AFUN_OP, then n argument markers (FUNAP_OP or FUNAV_OP),
//! then m result markers (FUNRP_OP or FUNRV_OP), then a closing AFUN_OP
//! that repeats the opening arguments so backward scans can skip the
//! block.
//!
//! Link to [parent module](super)
//!
//! * arg (AFUN_OP)
//!     * arg\[0\]:  index of the atomic function in its registry
//!     * arg\[1\]:  call id passed back to every callback
//!     * arg\[2\]:  n, the number of arguments
//!     * arg\[3\]:  m, the number of results
// --------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::op::id::{AFUN_OP, FUNAP_OP, FUNAV_OP, FUNRP_OP, FUNRV_OP};
// --------------------------------------------------------------------------
//
// CallBlock
/// one scanned atomic call block
pub(crate) struct CallBlock {
    //
    /// index of the atomic function in its registry
    pub atom_index : usize,
    //
    /// call id recorded with this invocation
    pub call_id    : IndexT,
    //
    /// per argument: is it a variable index (else a parameter index)
    pub arg_is_var : Vec<bool>,
    //
    /// per argument: the variable or parameter index
    pub arg_index  : Vec<IndexT>,
    //
    /// per result: is it a variable (else a parameter index)
    pub res_is_var : Vec<bool>,
    //
    /// per result: the variable index (FUNRV) or parameter index (FUNRP)
    pub res_index  : Vec<IndexT>,
    //
    /// operators consumed, both AFUN_OPs included
    pub n_op       : usize,
    //
    /// argument slots consumed by the whole block
    #[allow(dead_code)]
    pub n_arg_slot : usize,
    //
    /// new variables produced by the block (one per FUNRV)
    #[allow(dead_code)]
    pub n_var_res  : usize,
}
//
// scan_call
/// Scan a call block starting at the opening AFUN_OP.
///
/// * i_op : operator index of the opening AFUN_OP.
/// * i_arg : offset of the opening AFUN_OP arguments in arg_vec.
/// * i_var : the next new variable index at the start of the block;
///   FUNRV results are assigned consecutive indices from here.
pub(crate) fn scan_call(
    op_vec  : &[u8],
    arg_vec : &[IndexT],
    i_op    : usize,
    i_arg   : usize,
    i_var   : usize,
) -> CallBlock {
    debug_assert_eq!( op_vec[i_op], AFUN_OP );
    let atom_index = arg_vec[i_arg] as usize;
    let call_id    = arg_vec[i_arg + 1];
    let n          = arg_vec[i_arg + 2] as usize;
    let m          = arg_vec[i_arg + 3] as usize;
    //
    let mut block = CallBlock {
        atom_index ,
        call_id    ,
        arg_is_var : Vec::with_capacity(n) ,
        arg_index  : Vec::with_capacity(n) ,
        res_is_var : Vec::with_capacity(m) ,
        res_index  : Vec::with_capacity(m) ,
        n_op       : 2 + n + m ,
        n_arg_slot : 8 ,
        n_var_res  : 0 ,
    };
    //
    let mut op_cursor  = i_op + 1;
    let mut arg_cursor = i_arg + 4;
    let mut var_cursor = i_var;
    for _j in 0 .. n {
        match op_vec[op_cursor] {
            FUNAP_OP => {
                block.arg_is_var.push( false );
                block.arg_index.push( arg_vec[arg_cursor] );
                arg_cursor += 1;
                block.n_arg_slot += 1;
            }
            FUNAV_OP => {
                block.arg_is_var.push( true );
                block.arg_index.push( arg_vec[arg_cursor] );
                arg_cursor += 1;
                block.n_arg_slot += 1;
            }
            other => panic!(
                "atomic call block: expected argument marker, found op {other}"
            ),
        }
        op_cursor += 1;
    }
    for _i in 0 .. m {
        match op_vec[op_cursor] {
            FUNRP_OP => {
                block.res_is_var.push( false );
                block.res_index.push( arg_vec[arg_cursor] );
                arg_cursor += 1;
                block.n_arg_slot += 1;
            }
            FUNRV_OP => {
                block.res_is_var.push( true );
                block.res_index.push( var_cursor as IndexT );
                var_cursor      += 1;
                block.n_var_res += 1;
            }
            other => panic!(
                "atomic call block: expected result marker, found op {other}"
            ),
        }
        op_cursor += 1;
    }
    debug_assert_eq!( op_vec[op_cursor], AFUN_OP );
    block
}
