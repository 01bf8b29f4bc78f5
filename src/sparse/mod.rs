// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Sparsity patterns and their two internal representations.
//!
//! A pattern is a tagged variant: a row major boolean matrix, fastest
//! for dense patterns, or a vector of ordered index sets, fastest for
//! very sparse ones. The sweeps are generic over a row store trait with
//! one concrete store per representation.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// sub-modules
//
pub mod vec_set;
pub mod coloring;
//
pub use vec_set::VecSet;
// ---------------------------------------------------------------------------
//
// PatternRep
/// which concrete representation a [Pattern] uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternRep {
    /// row major boolean matrix
    Bool,
    /// one ordered set of column indices per row
    Sets,
}
// ---------------------------------------------------------------------------
//
// Pattern
/// A sparsity pattern for a matrix relationship: entry (i, j) present
/// means row i may depend on column j; false positives are allowed,
/// false negatives are not.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Bool {
        n_row : usize,
        n_col : usize,
        data  : Vec<bool>,
    },
    Sets {
        n_row : usize,
        n_col : usize,
        rows  : Vec< Vec<usize> >,
    },
}
//
impl Pattern {
    //
    // new
    /// an empty pattern in the given representation
    pub fn new(n_row : usize, n_col : usize, rep : PatternRep) -> Self {
        match rep {
            PatternRep::Bool => Pattern::Bool {
                n_row, n_col, data : vec![ false ; n_row * n_col ],
            },
            PatternRep::Sets => Pattern::Sets {
                n_row, n_col, rows : vec![ Vec::new() ; n_row ],
            },
        }
    }
    //
    // identity
    /// the n by n identity pattern
    ///
    /// # Example
    /// ```
    /// use adtape::{Pattern, PatternRep};
    /// let eye = Pattern::identity(3, PatternRep::Sets);
    /// assert!( eye.contains(1, 1) );
    /// assert!( ! eye.contains(1, 2) );
    /// ```
    pub fn identity(n : usize, rep : PatternRep) -> Self {
        let mut pattern = Self::new(n, n, rep);
        for i in 0 .. n {
            pattern.set(i, i);
        }
        pattern
    }
    //
    // rep
    pub fn rep(&self) -> PatternRep {
        match self {
            Pattern::Bool { .. } => PatternRep::Bool,
            Pattern::Sets { .. } => PatternRep::Sets,
        }
    }
    //
    // n_row, n_col
    pub fn n_row(&self) -> usize {
        match self {
            Pattern::Bool { n_row, .. } => *n_row,
            Pattern::Sets { n_row, .. } => *n_row,
        }
    }
    pub fn n_col(&self) -> usize {
        match self {
            Pattern::Bool { n_col, .. } => *n_col,
            Pattern::Sets { n_col, .. } => *n_col,
        }
    }
    //
    // set
    /// add the entry (i, j)
    pub fn set(&mut self, i : usize, j : usize) {
        match self {
            Pattern::Bool { n_col, data, .. } => {
                data[ i * *n_col + j ] = true;
            }
            Pattern::Sets { rows, .. } => {
                match rows[i].binary_search(&j) {
                    Ok(_)    => {}
                    Err(pos) => rows[i].insert(pos, j),
                }
            }
        }
    }
    //
    // contains
    pub fn contains(&self, i : usize, j : usize) -> bool {
        match self {
            Pattern::Bool { n_col, data, .. } => data[ i * *n_col + j ],
            Pattern::Sets { rows, .. } =>
                rows[i].binary_search(&j).is_ok(),
        }
    }
    //
    // row
    /// the column indices present in row i, in increasing order
    pub fn row(&self, i : usize) -> Vec<usize> {
        match self {
            Pattern::Bool { n_col, data, .. } => {
                (0 .. *n_col)
                    .filter( |j| data[ i * *n_col + j ] )
                    .collect()
            }
            Pattern::Sets { rows, .. } => rows[i].clone(),
        }
    }
    //
    // pairs
    /// all (row, column) entries in row major order
    pub fn pairs(&self) -> Vec<[usize; 2]> {
        let mut result = Vec::new();
        for i in 0 .. self.n_row() {
            for j in self.row(i) {
                result.push( [i, j] );
            }
        }
        result
    }
    //
    // count
    /// number of entries
    pub fn count(&self) -> usize {
        (0 .. self.n_row()).map( |i| self.row(i).len() ).sum()
    }
}
// ---------------------------------------------------------------------------
//
// SparsityStore
/// Row store used by the sparsity sweeps; one row per variable plus one
/// aggregate row per dynamic vector.
pub(crate) trait SparsityStore {
    //
    /// add one element to row i
    fn add(&mut self, i : usize, element : usize);
    //
    /// row dest gets the union of itself and row src
    fn union_into(&mut self, dest : usize, src : usize);
    //
    /// add a whole element list to row i
    fn add_all(&mut self, i : usize, elements : &[usize]);
    //
    /// the elements of row i, in increasing order
    fn row(&self, i : usize) -> Vec<usize>;
    //
    fn row_is_empty(&self, i : usize) -> bool;
}
// ---------------------------------------------------------------------------
//
// BoolStore
pub(crate) struct BoolStore {
    n_col : usize,
    data  : Vec<bool>,
}
//
impl BoolStore {
    pub fn new(n_row : usize, n_col : usize) -> Self {
        Self { n_col, data : vec![ false ; n_row * n_col ] }
    }
}
//
impl SparsityStore for BoolStore {
    fn add(&mut self, i : usize, element : usize) {
        self.data[ i * self.n_col + element ] = true;
    }
    fn union_into(&mut self, dest : usize, src : usize) {
        if dest == src {
            return;
        }
        for j in 0 .. self.n_col {
            if self.data[ src * self.n_col + j ] {
                self.data[ dest * self.n_col + j ] = true;
            }
        }
    }
    fn add_all(&mut self, i : usize, elements : &[usize]) {
        for element in elements {
            self.data[ i * self.n_col + *element ] = true;
        }
    }
    fn row(&self, i : usize) -> Vec<usize> {
        (0 .. self.n_col)
            .filter( |j| self.data[ i * self.n_col + j ] )
            .collect()
    }
    fn row_is_empty(&self, i : usize) -> bool {
        (0 .. self.n_col).all( |j| ! self.data[ i * self.n_col + j ] )
    }
}
// ---------------------------------------------------------------------------
//
// SetStore
/// rows held in a [VecSet]; row updates re-point the row at a new set
pub(crate) struct SetStore {
    vs     : VecSet,
    row_id : Vec<usize>,
}
//
impl SetStore {
    pub fn new(n_row : usize) -> Self {
        let mut vs = VecSet::new();
        let empty  = vs.empty();
        Self { vs, row_id : vec![ empty ; n_row ] }
    }
}
//
impl SparsityStore for SetStore {
    fn add(&mut self, i : usize, element : usize) {
        let single     = self.vs.singleton( element );
        self.row_id[i] = self.vs.union( &[ self.row_id[i], single ] );
    }
    fn union_into(&mut self, dest : usize, src : usize) {
        self.row_id[dest] =
            self.vs.union( &[ self.row_id[dest], self.row_id[src] ] );
    }
    fn add_all(&mut self, i : usize, elements : &[usize]) {
        for element in elements {
            self.add( i, *element );
        }
    }
    fn row(&self, i : usize) -> Vec<usize> {
        self.vs.get( self.row_id[i] ).to_vec()
    }
    fn row_is_empty(&self, i : usize) -> bool {
        self.vs.get( self.row_id[i] ).is_empty()
    }
}
