// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Caller owned replay workspaces and the forward / reverse sweeps.
//!
//! A sealed tape is immutable; everything that varies during replay
//! lives in these workspaces, including the dynamic vector element
//! state, the per load resolution cache, and the conditional skip
//! flags, all of which are filled by the zero order sweep and reused
//! by higher orders and by reverse mode.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// sub-modules
//
pub(crate) mod forward;
pub(crate) mod reverse;
pub(crate) mod jac_sparsity;
pub(crate) mod hes_sparsity;
// ---------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::fun::AdFun;
use crate::op::{at, dir_at};
// ---------------------------------------------------------------------------
//
// ReplayState
/// replay state shared by the single and multi direction workspaces
pub(crate) struct ReplayState {
    //
    // load_var
    /// per load operator: the variable index its element resolved to at
    /// order zero, or zero when the element was a parameter
    pub(crate) load_var  : Vec<IndexT>,
    //
    // load_par
    /// per load operator: the parameter index when load_var is zero
    pub(crate) load_par  : Vec<IndexT>,
    //
    // vecad_var, vecad_par
    /// per side table slot: the source variable (zero for a parameter)
    /// and the parameter index; initialized from the side table and
    /// rewritten by store operators during the zero order sweep
    pub(crate) vecad_var : Vec<IndexT>,
    pub(crate) vecad_par : Vec<IndexT>,
    //
    // cskip
    /// per operator: true when a conditional skip turned it off
    pub(crate) cskip     : Vec<bool>,
    pub(crate) n_skipped : usize,
    //
    // compare changes observed by the zero order sweep
    pub(crate) compare_change_count    : usize,
    pub(crate) compare_change_op_index : Option<usize>,
}
//
impl ReplayState {
    pub(crate) fn new(
        n_op : usize, n_load_op : usize, vecad_ind : &[IndexT]
    ) -> Self {
        Self {
            load_var  : vec![ 0 ; n_load_op ],
            load_par  : vec![ 0 ; n_load_op ],
            vecad_var : vec![ 0 ; vecad_ind.len() ],
            vecad_par : vecad_ind.to_vec(),
            cskip     : vec![ false ; n_op ],
            n_skipped : 0,
            compare_change_count    : 0,
            compare_change_op_index : None,
        }
    }
    //
    /// forget everything the previous zero order sweep recorded
    pub(crate) fn reset(&mut self, vecad_ind : &[IndexT]) {
        for flag in self.cskip.iter_mut() {
            *flag = false;
        }
        self.n_skipped = 0;
        for v in self.load_var.iter_mut() { *v = 0; }
        for v in self.load_par.iter_mut() { *v = 0; }
        for v in self.vecad_var.iter_mut() { *v = 0; }
        self.vecad_par.clear();
        self.vecad_par.extend_from_slice( vecad_ind );
        self.compare_change_count    = 0;
        self.compare_change_op_index = None;
    }
}
// ---------------------------------------------------------------------------
//
// Taylor
/// The Taylor coefficient matrix for one tape: one row per variable,
/// one column per order. Created by [AdFun::new_taylor]; owned by the
/// caller and passed to [AdFun::forward] and [AdFun::reverse].
pub struct Taylor<B> {
    pub(crate) n_var  : usize,
    //
    /// allocated orders, q_max + 1
    pub(crate) n_ord  : usize,
    //
    /// the next order [AdFun::forward] may compute
    pub(crate) q_next : usize,
    //
    pub(crate) data   : Vec<B>,
    pub(crate) state  : ReplayState,
}
//
impl<B : Base> Taylor<B> {
    //
    pub(crate) fn new(fun : &AdFun<B>, q_max : usize) -> Self {
        let n_var = fun.size_var();
        let n_ord = q_max + 1;
        Self {
            n_var,
            n_ord,
            q_next : 0,
            data   : vec![ B::nan() ; n_var * n_ord ],
            state  : ReplayState::new(
                fun.size_op(), fun.size_load_op(), fun.vecad_ind()
            ),
        }
    }
    //
    // coefficient
    /// the order k Taylor coefficient of variable i from the last sweep
    pub fn coefficient(&self, i_var : usize, k : usize) -> &B {
        &self.data[ at(self.n_ord, i_var, k) ]
    }
    //
    // order_count
    /// number of orders computed so far
    pub fn order_count(&self) -> usize { self.q_next }
    //
    // num_skipped
    /// operators turned off by conditional skips in the last zero order
    /// sweep
    pub fn num_skipped(&self) -> usize { self.state.n_skipped }
}
// ---------------------------------------------------------------------------
//
// TaylorDir
/// The multi direction Taylor workspace: order zero is shared and each
/// order `1 ..= q_max` holds `r` directions. Created by
/// [AdFun::new_taylor_dir] and passed to [AdFun::forward_dir].
pub struct TaylorDir<B> {
    pub(crate) n_var  : usize,
    pub(crate) q_max  : usize,
    pub(crate) r      : usize,
    //
    /// row stride, 1 + q_max * r
    pub(crate) n_col  : usize,
    pub(crate) q_next : usize,
    pub(crate) data   : Vec<B>,
    pub(crate) state  : ReplayState,
}
//
impl<B : Base> TaylorDir<B> {
    //
    pub(crate) fn new(fun : &AdFun<B>, q_max : usize, r : usize) -> Self {
        let n_var = fun.size_var();
        let n_col = 1 + q_max * r;
        Self {
            n_var,
            q_max,
            r,
            n_col,
            q_next : 0,
            data   : vec![ B::nan() ; n_var * n_col ],
            state  : ReplayState::new(
                fun.size_op(), fun.size_load_op(), fun.vecad_ind()
            ),
        }
    }
    //
    // coefficient
    /// the order k, direction ell coefficient of variable i
    pub fn coefficient(&self, i_var : usize, k : usize, ell : usize) -> &B {
        &self.data[ dir_at(self.n_col, self.r, i_var, k, ell) ]
    }
    //
    pub fn order_count(&self) -> usize { self.q_next }
}
