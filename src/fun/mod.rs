// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! The sealed, playable function object.
//!
//! An [AdFun] owns its operator, argument, parameter, text, and dynamic
//! vector tables and is read only after sealing. Replay state lives in
//! caller owned workspaces ([Taylor], [TaylorDir]); the random access
//! tables are the one per tape cache, built and cleared on request.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// sub-modules
pub mod serialize;
// ---------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::error::{Error, Result};
use crate::op::id::*;
use crate::op::info;
use crate::play;
use crate::play::SeqIter;
use crate::record;
use crate::sweep::{Taylor, TaylorDir};
use crate::sweep::forward::{forward_sweep, forward_dir_sweep};
use crate::sweep::reverse::reverse_sweep;
use crate::sweep::jac_sparsity::{for_jac_store, rev_jac_store};
use crate::sweep::hes_sparsity::rev_hes_store;
use crate::sparse::{Pattern, PatternRep, SparsityStore, BoolStore, SetStore};
use crate::sparse::coloring::{Coloring, n_colors};
use crate::atom::AtomRegistry;
use crate::discrete::DisRegistry;
// ---------------------------------------------------------------------------
//
// AdFun
/// A sealed tape together with its parameter, text, and dynamic vector
/// tables; see [Recorder::stop](crate::Recorder::stop).
///
/// One AdFun is a sequential object: all sweeps and rewrites on it must
/// be driven by one logical thread at a time. Independent AdFun objects
/// may be used from different threads.
pub struct AdFun<B : Base> {
    //
    pub(crate) op_vec    : Vec<u8>,
    pub(crate) arg_vec   : Vec<IndexT>,
    pub(crate) n_var     : usize,
    pub(crate) n_ind     : usize,
    //
    pub(crate) par_vec   : Vec<B>,
    pub(crate) dyn_is    : Vec<bool>,
    pub(crate) dyn2par   : Vec<IndexT>,
    pub(crate) dyn_op    : Vec<u8>,
    pub(crate) dyn_arg   : Vec<IndexT>,
    pub(crate) n_dyn_ind : usize,
    //
    pub(crate) text_vec  : Vec<u8>,
    pub(crate) vecad_ind : Vec<IndexT>,
    pub(crate) n_load_op : usize,
    pub(crate) dep_vec   : Vec<IndexT>,
    //
    // random
    /// the random access table cache; see [AdFun::setup_random]
    random : Option< play::Random >,
    //
    // compare change reporting
    compare_bound           : usize,
    compare_change_count    : usize,
    compare_change_op_index : Option<usize>,
    //
    // for_jac_cache
    /// column sets per variable and aggregate row from the last
    /// [AdFun::for_jac_sparsity] call, consumed by
    /// [AdFun::rev_hes_sparsity]
    for_jac_cache : Option< (usize, Vec< Vec<usize> >) >,
}
// ---------------------------------------------------------------------------
impl<B : Base> AdFun<B> {
    //
    // from_parts
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        op_vec    : Vec<u8>,
        arg_vec   : Vec<IndexT>,
        n_var     : usize,
        n_ind     : usize,
        par_vec   : Vec<B>,
        dyn_is    : Vec<bool>,
        dyn2par   : Vec<IndexT>,
        dyn_op    : Vec<u8>,
        dyn_arg   : Vec<IndexT>,
        n_dyn_ind : usize,
        text_vec  : Vec<u8>,
        vecad_ind : Vec<IndexT>,
        n_load_op : usize,
        dep_vec   : Vec<IndexT>,
    ) -> Self {
        Self {
            op_vec, arg_vec, n_var, n_ind,
            par_vec, dyn_is, dyn2par, dyn_op, dyn_arg, n_dyn_ind,
            text_vec, vecad_ind, n_load_op, dep_vec,
            random                  : None,
            compare_bound           : usize::MAX,
            compare_change_count    : 0,
            compare_change_op_index : None,
            for_jac_cache           : None,
        }
    }
    // -----------------------------------------------------------------------
    // sizes
    //
    /// number of variables, the reserved index zero included
    pub fn size_var(&self) -> usize { self.n_var }
    /// number of independent variables
    pub fn size_ind(&self) -> usize { self.n_ind }
    /// number of dependent variables
    pub fn size_dep(&self) -> usize { self.dep_vec.len() }
    /// number of operators
    pub fn size_op(&self) -> usize { self.op_vec.len() }
    /// number of argument slots
    pub fn size_arg(&self) -> usize { self.arg_vec.len() }
    /// number of parameters, dynamic parameters included
    pub fn size_par(&self) -> usize { self.par_vec.len() }
    /// bytes in the text table
    pub fn size_text(&self) -> usize { self.text_vec.len() }
    /// slots in the dynamic vector side table
    pub fn size_vec_ad(&self) -> usize { self.vecad_ind.len() }
    /// number of load operators
    pub fn size_load_op(&self) -> usize { self.n_load_op }
    /// number of independent dynamic parameters
    pub fn size_dyn_ind(&self) -> usize { self.n_dyn_ind }
    //
    /// bytes used by the operation sequence proper
    pub fn size_op_seq(&self) -> usize {
        self.op_vec.len()
            + self.arg_vec.len() * std::mem::size_of::<IndexT>()
            + self.par_vec.len() * B::BYTE_WIDTH
            + self.text_vec.len()
            + self.vecad_ind.len() * std::mem::size_of::<IndexT>()
    }
    //
    /// bytes used by the random access tables (zero when not set up)
    pub fn size_random(&self) -> usize {
        match &self.random {
            None         => 0,
            Some(random) => random.byte_size(),
        }
    }
    //
    // setup_random, clear_random
    /// build the random access tables op2arg, op2var, var2op
    pub fn setup_random(&mut self) {
        if self.random.is_none() {
            self.random = Some( play::build_random(
                &self.op_vec, &self.arg_vec, self.n_var,
            ) );
        }
    }
    /// drop the random access tables
    pub fn clear_random(&mut self) {
        self.random = None;
    }
    //
    // introspection
    //
    /// the operator id at one operator index
    pub fn op_id(&self, op_index : usize) -> u8 {
        self.op_vec[op_index]
    }
    /// the operator name at one operator index
    pub fn op_name(&self, op_index : usize) -> &'static str {
        info::name( self.op_vec[op_index] )
    }
    /// the whole operator sequence as (id, arguments) pairs
    pub fn op_sequence(&self) -> Vec< (u8, Vec<IndexT>) > {
        SeqIter::new( &self.op_vec, &self.arg_vec )
            .map( |step| ( step.op, step.arg.to_vec() ) )
            .collect()
    }
    /// the variable index of the i-th dependent
    pub fn dep_var_index(&self, i : usize) -> usize {
        self.dep_vec[i] as usize
    }
    //
    // vecad accessors
    pub(crate) fn vecad_ind(&self) -> &[IndexT] { &self.vecad_ind }
    //
    /// number of dynamic vectors in the side table
    pub(crate) fn num_vecad_vec(&self) -> usize {
        let mut count = 0;
        let mut i     = 0;
        while i < self.vecad_ind.len() {
            count += 1;
            i     += 1 + self.vecad_ind[i] as usize;
        }
        count
    }
    //
    /// the order of the dynamic vector with the given side table offset
    pub(crate) fn vecad_index(&self, offset : usize) -> usize {
        let mut index = 0;
        let mut i     = 0;
        while i < self.vecad_ind.len() {
            if i + 1 == offset {
                return index;
            }
            index += 1;
            i     += 1 + self.vecad_ind[i] as usize;
        }
        panic!( "invalid dynamic vector offset {offset}" )
    }
    // -----------------------------------------------------------------------
    // compare change reporting
    //
    /// number of recorded comparisons that had a different truth value
    /// during the last zero order forward sweep
    pub fn compare_change_count(&self) -> usize {
        self.compare_change_count
    }
    //
    /// operator index of the first comparison that changed
    pub fn compare_change_op_index(&self) -> Option<usize> {
        self.compare_change_op_index
    }
    //
    /// zero disables comparison re-evaluation during forward sweeps
    pub fn compare_change_bound(&mut self, bound : usize) {
        self.compare_bound = bound;
    }
    // -----------------------------------------------------------------------
    //
    // new_taylor
    /// a Taylor workspace able to hold orders 0 ..= q_max
    pub fn new_taylor(&self, q_max : usize) -> Taylor<B> {
        Taylor::new( self, q_max )
    }
    //
    // new_taylor_dir
    /// a multi direction workspace for orders 0 ..= q_max and r
    /// directions
    pub fn new_taylor_dir(&self, q_max : usize, r : usize) -> TaylorDir<B> {
        TaylorDir::new( self, q_max, r )
    }
    //
    // new_dynamic
    /// supply new values for the independent dynamic parameters and
    /// recompute every dependent dynamic parameter
    pub fn new_dynamic(&mut self, values : &[B]) -> Result<()>
    where
        B : DisRegistry,
    {
        assert_eq!(
            values.len(), self.n_dyn_ind,
            "new_dynamic: wrong number of independent dynamic parameters"
        );
        for i in 0 .. self.n_dyn_ind {
            let index = self.dyn2par[i] as usize;
            self.par_vec[index] = values[i].clone();
        }
        let mut cursor = 0;
        for i in self.n_dyn_ind .. self.dyn2par.len() {
            let op    = self.dyn_op[i];
            let n_arg = record::dyn_arity(op);
            let arg   = &self.dyn_arg[cursor .. cursor + n_arg];
            let value = record::eval_dyn_op( op, arg, &self.par_vec );
            let index = self.dyn2par[i] as usize;
            self.par_vec[index] = value;
            cursor += n_arg;
        }
        Ok(())
    }
    // -----------------------------------------------------------------------
    //
    // forward
    /// Forward sweep for orders q_low ..= q_up.
    ///
    /// * x : the independent variables' Taylor coefficients for the
    ///   requested orders; `x[ j * n_k + (k - q_low) ]` is the order k
    ///   coefficient of independent j, with n_k = q_up - q_low + 1.
    /// * taylor : the workspace; orders below q_low must already be
    ///   there (so q_low is at most [Taylor::order_count]).
    /// * return : the dependents' coefficients for the requested orders
    ///   in the same layout.
    ///
    /// Order zero resolves the dynamic vector loads, evaluates the
    /// conditional skips, and re-evaluates the recorded comparisons;
    /// see [AdFun::compare_change_count].
    ///
    /// # Example
    /// ```
    /// use adtape::{Recorder, Operand, record::BinOp};
    /// let mut rec : Recorder<f64> = Recorder::new();
    /// let x  = rec.independent(1).unwrap();
    /// let y  = rec.binary(
    ///     BinOp::Mul, &Operand::Var(x[0]), &Operand::Var(x[0])
    /// ).unwrap();
    /// let mut f = rec.stop( vec![y] ).unwrap();
    /// //
    /// // value and first derivative of x * x at x = 3
    /// let mut taylor = f.new_taylor(1);
    /// let y0 = f.forward(0, 0, &[3.0], &mut taylor, false).unwrap();
    /// let y1 = f.forward(1, 1, &[1.0], &mut taylor, false).unwrap();
    /// assert_eq!( y0[0], 9.0 );
    /// assert_eq!( y1[0], 6.0 );
    /// ```
    pub fn forward(
        &mut self,
        q_low  : usize,
        q_up   : usize,
        x      : &[B],
        taylor : &mut Taylor<B>,
        trace  : bool,
    ) -> Result< Vec<B> >
    where
        B : AtomRegistry + DisRegistry,
    {
        assert!( q_low <= q_up, "forward: q_low > q_up" );
        assert!(
            q_up < taylor.n_ord,
            "forward: q_up exceeds the workspace order bound"
        );
        assert!(
            q_low <= taylor.q_next,
            "forward: orders below q_low have not been computed"
        );
        assert_eq!( taylor.n_var, self.n_var,
            "forward: workspace belongs to a different tape"
        );
        let n_k = q_up - q_low + 1;
        assert_eq!(
            x.len(), self.n_ind * n_k,
            "forward: wrong number of independent coefficients"
        );
        //
        // independents
        let n_ord = taylor.n_ord;
        for j in 0 .. self.n_ind {
            for k in q_low ..= q_up {
                taylor.data[ (1 + j) * n_ord + k ] =
                    x[ j * n_k + (k - q_low) ].clone();
            }
        }
        //
        if q_low == 0 {
            taylor.state.reset( &self.vecad_ind );
        }
        let check_compare = self.compare_bound > 0;
        forward_sweep(
            self, q_low, q_up, n_ord,
            &mut taylor.data, &mut taylor.state, check_compare, trace,
        )?;
        if q_low == 0 {
            self.compare_change_count    = taylor.state.compare_change_count;
            self.compare_change_op_index =
                taylor.state.compare_change_op_index;
        }
        taylor.q_next = q_up + 1;
        //
        // dependents
        let mut y = Vec::with_capacity( self.dep_vec.len() * n_k );
        for dep in self.dep_vec.iter() {
            for k in q_low ..= q_up {
                y.push( taylor.data[ (*dep as usize) * n_ord + k ].clone() );
            }
        }
        Ok( y )
    }
    //
    // forward_dir
    /// Multi direction forward: order q in each of the workspace's r
    /// directions at once. Order zero (q = 0) takes one coefficient per
    /// independent; higher orders take `xq[ j * r + ell ]` and must be
    /// requested in sequence. Returns the dependents' order q
    /// coefficients, `y[ i * r + ell ]` for q > 0.
    pub fn forward_dir(
        &mut self,
        q      : usize,
        xq     : &[B],
        taylor : &mut TaylorDir<B>,
        trace  : bool,
    ) -> Result< Vec<B> >
    where
        B : AtomRegistry + DisRegistry,
    {
        assert_eq!( taylor.n_var, self.n_var,
            "forward_dir: workspace belongs to a different tape"
        );
        let r     = taylor.r;
        let n_col = taylor.n_col;
        if q == 0 {
            assert_eq!( xq.len(), self.n_ind,
                "forward_dir: wrong number of order zero coefficients"
            );
            for j in 0 .. self.n_ind {
                taylor.data[ (1 + j) * n_col ] = xq[j].clone();
            }
            taylor.state.reset( &self.vecad_ind );
            let check_compare = self.compare_bound > 0;
            forward_sweep(
                self, 0, 0, n_col,
                &mut taylor.data, &mut taylor.state, check_compare, trace,
            )?;
            self.compare_change_count    = taylor.state.compare_change_count;
            self.compare_change_op_index =
                taylor.state.compare_change_op_index;
            taylor.q_next = 1;
            //
            let y = self.dep_vec.iter().map( |dep|
                taylor.data[ (*dep as usize) * n_col ].clone()
            ).collect();
            return Ok( y );
        }
        //
        assert!( q <= taylor.q_max,
            "forward_dir: q exceeds the workspace order bound"
        );
        assert_eq!( q, taylor.q_next,
            "forward_dir: orders must be computed in sequence"
        );
        assert_eq!( xq.len(), self.n_ind * r,
            "forward_dir: wrong number of direction coefficients"
        );
        for j in 0 .. self.n_ind {
            for ell in 0 .. r {
                taylor.data[
                    crate::op::dir_at(n_col, r, 1 + j, q, ell)
                ] = xq[ j * r + ell ].clone();
            }
        }
        forward_dir_sweep(
            self, q, r, n_col, &mut taylor.data, &mut taylor.state, trace,
        )?;
        taylor.q_next = q + 1;
        //
        let mut y = Vec::with_capacity( self.dep_vec.len() * r );
        for dep in self.dep_vec.iter() {
            for ell in 0 .. r {
                y.push( taylor.data[
                    crate::op::dir_at(n_col, r, *dep as usize, q, ell)
                ].clone() );
            }
        }
        Ok( y )
    }
    //
    // reverse
    /// Reverse sweep of order d over a workspace whose forward orders
    /// 0 ..= d are already computed.
    ///
    /// * w : partials of a scalar objective with respect to the
    ///   dependents' coefficients, `w[ i * (d+1) + k ]` for order k.
    /// * return : partials with respect to the independents'
    ///   coefficients in the same layout.
    ///
    /// # Example
    /// ```
    /// use adtape::{Recorder, Operand, record::BinOp};
    /// let mut rec : Recorder<f64> = Recorder::new();
    /// let x  = rec.independent(2).unwrap();
    /// let y  = rec.binary(
    ///     BinOp::Mul, &Operand::Var(x[0]), &Operand::Var(x[1])
    /// ).unwrap();
    /// let mut f = rec.stop( vec![y] ).unwrap();
    /// //
    /// let mut taylor = f.new_taylor(0);
    /// f.forward(0, 0, &[3.0, 5.0], &mut taylor, false).unwrap();
    /// let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
    /// assert_eq!( g, vec![5.0, 3.0] );
    /// ```
    pub fn reverse(
        &self,
        d      : usize,
        w      : &[B],
        taylor : &Taylor<B>,
        trace  : bool,
    ) -> Result< Vec<B> >
    where
        B : AtomRegistry + DisRegistry,
    {
        assert!( d < taylor.q_next,
            "reverse: forward order d has not been computed"
        );
        assert_eq!( w.len(), self.dep_vec.len() * (d + 1),
            "reverse: wrong number of dependent partials"
        );
        let n_ord = taylor.n_ord;
        //
        // partial
        let mut partial = vec![ B::zero() ; self.n_var * n_ord ];
        for (i, dep) in self.dep_vec.iter().enumerate() {
            let row = *dep as usize;
            for k in 0 ..= d {
                let seed = &w[ i * (d + 1) + k ];
                partial[ row * n_ord + k ] =
                    partial[ row * n_ord + k ].add( seed );
            }
        }
        //
        reverse_sweep(
            self, d, n_ord, &taylor.data, &mut partial, &taylor.state, trace,
        )?;
        //
        let mut result = Vec::with_capacity( self.n_ind * (d + 1) );
        for j in 0 .. self.n_ind {
            for k in 0 ..= d {
                result.push( partial[ (1 + j) * n_ord + k ].clone() );
            }
        }
        Ok( result )
    }
    // -----------------------------------------------------------------------
    // sparsity
    //
    // for_jac_sparsity
    /// Forward Jacobian sparsity: given a pattern for the independents
    /// (n_ind rows), return the dependents' pattern (n_dep rows) in the
    /// same representation. The full per variable pattern is cached for
    /// [AdFun::rev_hes_sparsity].
    pub fn for_jac_sparsity(
        &mut self, pattern_in : &Pattern, trace : bool
    ) -> Result<Pattern>
    where
        B : AtomRegistry,
    {
        if pattern_in.n_row() != self.n_ind {
            return Err( Error::SparsityShapeMismatch {
                what : format!(
                    "for_jac_sparsity: {} rows, tape has {} independents",
                    pattern_in.n_row(), self.n_ind,
                )
            } );
        }
        let q      = pattern_in.n_col();
        let n_row  = self.n_var + self.num_vecad_vec();
        //
        let rows = match pattern_in.rep() {
            PatternRep::Bool => {
                let mut store = BoolStore::new( n_row, q );
                self.seed_and_run_for_jac( &mut store, pattern_in, trace )?;
                (0 .. n_row).map( |i| store.row(i) ).collect::<Vec<_>>()
            }
            PatternRep::Sets => {
                let mut store = SetStore::new( n_row );
                self.seed_and_run_for_jac( &mut store, pattern_in, trace )?;
                (0 .. n_row).map( |i| store.row(i) ).collect::<Vec<_>>()
            }
        };
        //
        // output pattern for the dependents
        let mut out = Pattern::new(
            self.dep_vec.len(), q, pattern_in.rep()
        );
        for (i, dep) in self.dep_vec.iter().enumerate() {
            for j in rows[*dep as usize].iter() {
                out.set( i, *j );
            }
        }
        self.for_jac_cache = Some( (q, rows) );
        Ok( out )
    }
    //
    // seed_and_run_for_jac
    fn seed_and_run_for_jac<S : SparsityStore>(
        &self, store : &mut S, pattern_in : &Pattern, trace : bool
    ) -> Result<()>
    where
        B : AtomRegistry,
    {
        for j in 0 .. self.n_ind {
            store.add_all( 1 + j, &pattern_in.row(j) );
        }
        for_jac_store( self, store, trace )
    }
    //
    // rev_jac_sparsity
    /// Reverse Jacobian sparsity: given a pattern for the dependents
    /// (n_dep rows), return the independents' pattern (n_ind rows).
    /// With *dependency* true, edges that carry dependency but no
    /// derivative are included (conditional expression conditions,
    /// discrete function arguments, dynamic vector indices).
    pub fn rev_jac_sparsity(
        &self, pattern_in : &Pattern, dependency : bool, trace : bool
    ) -> Result<Pattern>
    where
        B : AtomRegistry,
    {
        if pattern_in.n_row() != self.dep_vec.len() {
            return Err( Error::SparsityShapeMismatch {
                what : format!(
                    "rev_jac_sparsity: {} rows, tape has {} dependents",
                    pattern_in.n_row(), self.dep_vec.len(),
                )
            } );
        }
        let q     = pattern_in.n_col();
        let n_row = self.n_var + self.num_vecad_vec();
        //
        let rows = match pattern_in.rep() {
            PatternRep::Bool => {
                let mut store = BoolStore::new( n_row, q );
                for (i, dep) in self.dep_vec.iter().enumerate() {
                    store.add_all( *dep as usize, &pattern_in.row(i) );
                }
                rev_jac_store( self, &mut store, dependency, trace )?;
                (1 ..= self.n_ind)
                    .map( |i| store.row(i) ).collect::<Vec<_>>()
            }
            PatternRep::Sets => {
                let mut store = SetStore::new( n_row );
                for (i, dep) in self.dep_vec.iter().enumerate() {
                    store.add_all( *dep as usize, &pattern_in.row(i) );
                }
                rev_jac_store( self, &mut store, dependency, trace )?;
                (1 ..= self.n_ind)
                    .map( |i| store.row(i) ).collect::<Vec<_>>()
            }
        };
        //
        let mut out = Pattern::new( self.n_ind, q, pattern_in.rep() );
        for (j, row) in rows.iter().enumerate() {
            for e in row {
                out.set( j, *e );
            }
        }
        Ok( out )
    }
    //
    // rev_hes_sparsity
    /// Reverse Hessian sparsity for the scalar objective
    /// sum of the selected dependents. Requires a prior
    /// [AdFun::for_jac_sparsity] call (normally with the identity
    /// pattern), whose cached column sets are chained into the second
    /// derivative rows. Returns one row per independent.
    pub fn rev_hes_sparsity(
        &self,
        select_range : &[bool],
        rep          : PatternRep,
        trace        : bool,
    ) -> Result<Pattern>
    where
        B : AtomRegistry,
    {
        let (q, jac) = match &self.for_jac_cache {
            Some( (q, rows) ) => ( *q, rows ),
            None => {
                return Err( Error::SparsityShapeMismatch {
                    what : "rev_hes_sparsity: no forward Jacobian \
                            sparsity has been computed".to_string()
                } );
            }
        };
        if select_range.len() != self.dep_vec.len() {
            return Err( Error::SparsityShapeMismatch {
                what : format!(
                    "rev_hes_sparsity: select_range length {}, tape has \
                     {} dependents",
                    select_range.len(), self.dep_vec.len(),
                )
            } );
        }
        let n_row = self.n_var + self.num_vecad_vec();
        //
        // active
        let mut active = vec![ false ; n_row ];
        for (i, dep) in self.dep_vec.iter().enumerate() {
            if select_range[i] {
                active[ *dep as usize ] = true;
            }
        }
        //
        let rows = match rep {
            PatternRep::Bool => {
                let mut store = BoolStore::new( n_row, q );
                rev_hes_store( self, jac, &mut active, &mut store, trace )?;
                (1 ..= self.n_ind)
                    .map( |i| store.row(i) ).collect::<Vec<_>>()
            }
            PatternRep::Sets => {
                let mut store = SetStore::new( n_row );
                rev_hes_store( self, jac, &mut active, &mut store, trace )?;
                (1 ..= self.n_ind)
                    .map( |i| store.row(i) ).collect::<Vec<_>>()
            }
        };
        //
        let mut out = Pattern::new( self.n_ind, q, rep );
        for (j, row) in rows.iter().enumerate() {
            for e in row {
                out.set( j, *e );
            }
        }
        Ok( out )
    }
    // -----------------------------------------------------------------------
    // coloring based sparse drivers
    //
    // sparse_jac
    /// Evaluate the Jacobian entries listed in *pattern* (n_dep by
    /// n_ind) at the point x, using one forward direction bundle per
    /// color. Returns (row, column, value) triples.
    pub fn sparse_jac(
        &mut self,
        x        : &[B],
        pattern  : &Pattern,
        coloring : &dyn Coloring,
        trace    : bool,
    ) -> Result< Vec<(usize, usize, B)> >
    where
        B : AtomRegistry + DisRegistry,
    {
        assert_eq!( pattern.n_row(), self.dep_vec.len() );
        assert_eq!( pattern.n_col(), self.n_ind );
        //
        let rows : Vec< Vec<usize> > =
            (0 .. pattern.n_row()).map( |i| pattern.row(i) ).collect();
        let color = coloring.color( self.n_ind, &rows );
        let n_c   = n_colors( &color );
        if n_c == 0 {
            return Ok( Vec::new() );
        }
        //
        let mut taylor = self.new_taylor_dir( 1, n_c );
        self.forward_dir( 0, x, &mut taylor, trace )?;
        //
        // one unit bundle per color
        let mut xq = vec![ B::zero() ; self.n_ind * n_c ];
        for j in 0 .. self.n_ind {
            xq[ j * n_c + color[j] ] = B::one();
        }
        self.forward_dir( 1, &xq, &mut taylor, trace )?;
        //
        let mut result = Vec::with_capacity( pattern.count() );
        for i in 0 .. pattern.n_row() {
            let dep = self.dep_vec[i] as usize;
            for j in rows[i].iter() {
                let value = taylor.coefficient( dep, 1, color[*j] ).clone();
                result.push( (i, *j, value) );
            }
        }
        Ok( result )
    }
    //
    // sparse_hes
    /// Evaluate the entries of the weighted Hessian
    /// sum_i w\[i\] * f_i''(x) listed in *pattern* (n_ind by n_ind),
    /// one forward + reverse pair per color.
    pub fn sparse_hes(
        &mut self,
        x        : &[B],
        w        : &[B],
        pattern  : &Pattern,
        coloring : &dyn Coloring,
        trace    : bool,
    ) -> Result< Vec<(usize, usize, B)> >
    where
        B : AtomRegistry + DisRegistry,
    {
        assert_eq!( pattern.n_row(), self.n_ind );
        assert_eq!( pattern.n_col(), self.n_ind );
        assert_eq!( w.len(), self.dep_vec.len() );
        //
        let rows : Vec< Vec<usize> > =
            (0 .. pattern.n_row()).map( |i| pattern.row(i) ).collect();
        let color = coloring.color( self.n_ind, &rows );
        let n_c   = n_colors( &color );
        //
        // the objective's adjoint: weight on the order one coefficients
        let mut w_full = vec![ B::zero() ; self.dep_vec.len() * 2 ];
        for i in 0 .. self.dep_vec.len() {
            w_full[ 2 * i + 1 ] = w[i].clone();
        }
        //
        let mut columns : Vec< Vec<B> > = Vec::with_capacity( n_c );
        for c in 0 .. n_c {
            let mut taylor = self.new_taylor( 1 );
            self.forward( 0, 0, x, &mut taylor, trace )?;
            let mut x1 = vec![ B::zero() ; self.n_ind ];
            for j in 0 .. self.n_ind {
                if color[j] == c {
                    x1[j] = B::one();
                }
            }
            self.forward( 1, 1, &x1, &mut taylor, trace )?;
            let px = self.reverse( 1, &w_full, &taylor, trace )?;
            // order zero partials are the rows of w^T f'' times the bundle
            let column : Vec<B> =
                (0 .. self.n_ind).map( |j| px[ 2 * j ].clone() ).collect();
            columns.push( column );
        }
        //
        let mut result = Vec::with_capacity( pattern.count() );
        for j1 in 0 .. self.n_ind {
            for j2 in rows[j1].iter() {
                let value = columns[ color[*j2] ][ j1 ].clone();
                result.push( (j1, *j2, value) );
            }
        }
        Ok( result )
    }
    // -----------------------------------------------------------------------
    //
    // check_invariants
    /// the structural invariants every sealed tape satisfies;
    /// returns a description of the first violation
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        let n_op = self.op_vec.len();
        if n_op < 2 || self.op_vec[0] != BEGIN_OP {
            return Err( "tape does not start with the begin marker".into() );
        }
        if self.op_vec[n_op - 1] != END_OP {
            return Err( "tape does not end with the end marker".into() );
        }
        //
        // the independents come first
        for j in 0 .. self.n_ind {
            if self.op_vec[1 + j] != INV_OP {
                return Err( format!(
                    "operator {} is not an independent declaration", 1 + j
                ) );
            }
        }
        //
        // single assignment: variable arguments precede their operator
        let mut var_args : Vec<usize> = Vec::new();
        let mut last_var = 0usize;
        for step in SeqIter::new( &self.op_vec, &self.arg_vec ) {
            if step.op == INV_OP && step.i_op > self.n_ind {
                return Err( format!(
                    "independent declaration at operator {}", step.i_op
                ) );
            }
            var_args.clear();
            info::op_var_args( step.op, step.arg, &mut var_args );
            for a in var_args.iter() {
                if *a == 0 || *a >= step.i_var {
                    return Err( format!(
                        "operator {} uses variable {} before assignment",
                        step.i_op, a
                    ) );
                }
            }
            last_var = step.i_var + step.n_res;
        }
        if last_var != self.n_var {
            return Err( format!(
                "variable count {} does not match the result total {}",
                self.n_var, last_var
            ) );
        }
        //
        // dynamic parameter DAG is topologically ordered
        let mut cursor = 0;
        for i in self.n_dyn_ind .. self.dyn2par.len() {
            let op    = self.dyn_op[i];
            let n_arg = record::dyn_arity(op);
            let index = self.dyn2par[i];
            let arg   = &self.dyn_arg[cursor .. cursor + n_arg];
            // the relation and mask slots of a dynamic conditional, and
            // the function index of a dynamic discrete call, are not
            // parameter indices
            let first_par_slot = match op {
                CEXP_OP => 2,
                DIS_OP  => 1,
                _       => 0,
            };
            for a in &arg[first_par_slot ..] {
                if *a >= index {
                    return Err( format!(
                        "dynamic parameter {index} uses parameter {a}"
                    ) );
                }
            }
            cursor += n_arg;
        }
        //
        // side table blocks
        let mut i = 0;
        while i < self.vecad_ind.len() {
            let length = self.vecad_ind[i] as usize;
            if length == 0 || i + length >= self.vecad_ind.len() {
                return Err( "malformed dynamic vector side table".into() );
            }
            i += 1 + length;
        }
        //
        // dependents are variables
        for dep in self.dep_vec.iter() {
            let index = *dep as usize;
            if index == 0 || index >= self.n_var {
                return Err( format!( "dependent variable {index} invalid" ) );
            }
        }
        Ok(())
    }
}
