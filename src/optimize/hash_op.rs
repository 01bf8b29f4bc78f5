// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! A hash map that identifies operator uses that always yield the same
//! results; the common subexpression side of the optimizer.
//!
//! Keys combine the operator id with canonicalized argument addresses:
//! variables by their rewritten index, parameters by their value (so
//! two equal constants interned at different indices still match), and
//! literal slots (atomic function identity, call id) verbatim.
//! Commutative binary operators sort their two operands.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
//
use crate::IndexT;
use crate::base::Base;
use crate::op::info;
// ---------------------------------------------------------------------------
//
// ArgKey
/// one canonicalized argument slot
#[derive(Clone, Copy, Debug)]
pub(crate) enum ArgKey {
    //
    /// a variable by its new tape index
    Var(IndexT),
    //
    /// a parameter by index; hashing and equality use its value
    Par(IndexT),
    //
    /// a literal slot compared verbatim
    Lit(IndexT),
}
//
impl ArgKey {
    //
    // sort_key
    /// canonical ordering for commutative operand pairs
    fn sort_key<B : Base>(&self, par : &[B]) -> (u8, u64) {
        match self {
            ArgKey::Var(i) => ( 0, *i as u64 ),
            ArgKey::Par(i) => ( 1, par[*i as usize].value_hash() ),
            ArgKey::Lit(i) => ( 2, *i as u64 ),
        }
    }
    //
    // equal
    fn equal<B : Base>(&self, other : &ArgKey, par : &[B]) -> bool {
        match (self, other) {
            ( ArgKey::Var(a), ArgKey::Var(b) ) => a == b,
            ( ArgKey::Lit(a), ArgKey::Lit(b) ) => a == b,
            ( ArgKey::Par(a), ArgKey::Par(b) ) =>
                par[*a as usize] == par[*b as usize],
            _ => false,
        }
    }
}
// ---------------------------------------------------------------------------
//
// Entry
struct Entry {
    op      : u8,
    args    : Vec<ArgKey>,
    results : Vec<IndexT>,
}
//
// OpHashMap
/// code to recent new variable index map
pub(crate) struct OpHashMap {
    map : FxHashMap< u64, Vec<Entry> >,
}
//
impl OpHashMap {
    //
    pub(crate) fn new() -> Self {
        Self { map : FxHashMap::default() }
    }
    //
    // canonicalize
    /// sort the operand pair of a commutative binary operator
    pub(crate) fn canonicalize<B : Base>(
        op : u8, args : &mut [ArgKey], par : &[B]
    )
    where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
    {
        if info::is_commutative(op) {
            debug_assert_eq!( args.len(), 2 );
            if args[0].sort_key(par) > args[1].sort_key(par) {
                args.swap(0, 1);
            }
        }
    }
    //
    // hash
    fn hash<B : Base>(op : u8, args : &[ArgKey], par : &[B]) -> u64 {
        let mut state = FxHasher::default();
        op.hash( &mut state );
        for key in args {
            match key {
                ArgKey::Var(i) => { 0u8.hash(&mut state); i.hash(&mut state); }
                ArgKey::Par(i) => {
                    1u8.hash( &mut state );
                    par[*i as usize].value_hash().hash( &mut state );
                }
                ArgKey::Lit(i) => { 2u8.hash(&mut state); i.hash(&mut state); }
            }
        }
        state.finish()
    }
    //
    // try_match
    /// the results of an earlier operator that always computes the same
    /// function, if one was recorded
    pub(crate) fn try_match<B : Base>(
        &self, op : u8, args : &[ArgKey], par : &[B]
    ) -> Option< Vec<IndexT> >
    where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
    {
        let hash = Self::hash(op, args, par);
        if let Some(entries) = self.map.get(&hash) {
            for entry in entries.iter() {
                let same = entry.op == op
                    && entry.args.len() == args.len()
                    && entry.args.iter().zip( args.iter() )
                        .all( |(a, b)| a.equal(b, par) );
                if same {
                    return Some( entry.results.clone() );
                }
            }
        }
        None
    }
    //
    // insert
    /// record an emitted operator and its result variables
    pub(crate) fn insert<B : Base>(
        &mut self,
        op      : u8,
        args    : Vec<ArgKey>,
        par     : &[B],
        results : &[IndexT],
    )
    where for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>
    {
        let hash = Self::hash(op, &args, par);
        self.map.entry(hash).or_default().push( Entry {
            op,
            args,
            results : results.to_vec(),
        } );
    }
}
