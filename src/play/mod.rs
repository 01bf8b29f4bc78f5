// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Sequential and random access iteration over a sealed tape.
//!
//! The sequential iterators resolve the length of the variadic
//! operators (cumulative sum, conditional skip) before advancing, so a
//! sweep never needs to know their encodings. The random access tables
//! are a per tape cache whose element width adapts to the tape size.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::op::info;
// ---------------------------------------------------------------------------
//
// OpStep
/// One operator as visited by an iterator.
pub(crate) struct OpStep<'a> {
    //
    /// operator index on the tape
    pub i_op  : usize,
    //
    /// operator id
    pub op    : u8,
    //
    /// this operator's slice of the argument stream
    pub arg   : &'a [IndexT],
    //
    /// offset of `arg` in the argument stream
    pub i_arg : usize,
    //
    /// first new variable index produced by this operator
    /// (only meaningful when n_res > 0)
    pub i_var : usize,
    //
    /// number of new variables produced
    pub n_res : usize,
}
// ---------------------------------------------------------------------------
//
// SeqIter
/// forward iteration from the begin marker to the end marker
pub(crate) struct SeqIter<'a> {
    op_vec  : &'a [u8],
    arg_vec : &'a [IndexT],
    i_op    : usize,
    i_arg   : usize,
    i_var   : usize,
}
//
impl<'a> SeqIter<'a> {
    pub fn new(op_vec : &'a [u8], arg_vec : &'a [IndexT]) -> Self {
        Self { op_vec, arg_vec, i_op : 0, i_arg : 0, i_var : 1 }
    }
}
//
impl<'a> Iterator for SeqIter<'a> {
    type Item = OpStep<'a>;
    fn next(&mut self) -> Option< OpStep<'a> > {
        if self.i_op >= self.op_vec.len() {
            return None;
        }
        let op    = self.op_vec[self.i_op];
        let n_arg = info::forward_arg_len( op, &self.arg_vec[self.i_arg ..] );
        let n_res = info::n_res(op);
        let step  = OpStep {
            i_op  : self.i_op,
            op,
            arg   : &self.arg_vec[self.i_arg .. self.i_arg + n_arg],
            i_arg : self.i_arg,
            i_var : self.i_var,
            n_res,
        };
        self.i_op  += 1;
        self.i_arg += n_arg;
        self.i_var += n_res;
        Some( step )
    }
}
// ---------------------------------------------------------------------------
//
// RevIter
/// backward iteration from the end marker to the begin marker;
/// the variadic operators are resolved from their trailing slot count
pub(crate) struct RevIter<'a> {
    op_vec  : &'a [u8],
    arg_vec : &'a [IndexT],
    i_op    : usize,
    i_arg   : usize,
    i_var   : usize,
}
//
impl<'a> RevIter<'a> {
    pub fn new(
        op_vec : &'a [u8], arg_vec : &'a [IndexT], n_var : usize
    ) -> Self {
        Self {
            op_vec,
            arg_vec,
            i_op  : op_vec.len(),
            i_arg : arg_vec.len(),
            i_var : n_var,
        }
    }
}
//
impl<'a> Iterator for RevIter<'a> {
    type Item = OpStep<'a>;
    fn next(&mut self) -> Option< OpStep<'a> > {
        if self.i_op == 0 {
            return None;
        }
        self.i_op -= 1;
        let op    = self.op_vec[self.i_op];
        let n_arg = info::reverse_arg_len( op, self.arg_vec, self.i_arg );
        let n_res = info::n_res(op);
        self.i_arg -= n_arg;
        self.i_var -= n_res;
        Some( OpStep {
            i_op  : self.i_op,
            op,
            arg   : &self.arg_vec[self.i_arg .. self.i_arg + n_arg],
            i_arg : self.i_arg,
            i_var : self.i_var,
            n_res,
        } )
    }
}
// ---------------------------------------------------------------------------
//
// AddrVec
/// A vector of tape addresses whose element width is chosen at build
/// time from the largest value it must hold.
pub(crate) enum AddrVec {
    U16( Vec<u16> ),
    U32( Vec<u32> ),
    U64( Vec<u64> ),
}
//
impl AddrVec {
    //
    // AddrVec::new
    /// choose the width from the maximum value to be stored
    pub fn new(max_value : usize, capacity : usize) -> Self {
        if max_value <= u16::MAX as usize {
            AddrVec::U16( Vec::with_capacity(capacity) )
        } else if max_value <= u32::MAX as usize {
            AddrVec::U32( Vec::with_capacity(capacity) )
        } else {
            AddrVec::U64( Vec::with_capacity(capacity) )
        }
    }
    //
    pub fn push(&mut self, value : usize) {
        match self {
            AddrVec::U16(v) => v.push( value as u16 ),
            AddrVec::U32(v) => v.push( value as u32 ),
            AddrVec::U64(v) => v.push( value as u64 ),
        }
    }
    //
    pub fn set(&mut self, index : usize, value : usize) {
        match self {
            AddrVec::U16(v) => v[index] = value as u16,
            AddrVec::U32(v) => v[index] = value as u32,
            AddrVec::U64(v) => v[index] = value as u64,
        }
    }
    //
    pub fn get(&self, index : usize) -> usize {
        match self {
            AddrVec::U16(v) => v[index] as usize,
            AddrVec::U32(v) => v[index] as usize,
            AddrVec::U64(v) => v[index] as usize,
        }
    }
    //
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        match self {
            AddrVec::U16(v) => v.len(),
            AddrVec::U32(v) => v.len(),
            AddrVec::U64(v) => v.len(),
        }
    }
    //
    /// memory used by the elements, in bytes
    pub fn byte_size(&self) -> usize {
        match self {
            AddrVec::U16(v) => 2 * v.len(),
            AddrVec::U32(v) => 4 * v.len(),
            AddrVec::U64(v) => 8 * v.len(),
        }
    }
    //
    pub fn resize(&mut self, len : usize) {
        match self {
            AddrVec::U16(v) => v.resize(len, 0),
            AddrVec::U32(v) => v.resize(len, 0),
            AddrVec::U64(v) => v.resize(len, 0),
        }
    }
}
// ---------------------------------------------------------------------------
//
// Random
/// Random access tables for one sealed tape:
/// operator index to argument offset, operator index to primary result
/// variable (zero when the operator has no result), and variable index
/// to the operator that produced it.
pub(crate) struct Random {
    pub op2arg : AddrVec,
    pub op2var : AddrVec,
    pub var2op : AddrVec,
}
//
// build_random
pub(crate) fn build_random(
    op_vec : &[u8], arg_vec : &[IndexT], n_var : usize
) -> Random {
    let n_op  = op_vec.len();
    let n_arg = arg_vec.len();
    let width = n_var.max(n_op).max(n_arg);
    //
    let mut op2arg = AddrVec::new( width, n_op );
    let mut op2var = AddrVec::new( width, n_op );
    let mut var2op = AddrVec::new( width, n_var );
    var2op.resize( n_var );
    //
    for step in SeqIter::new(op_vec, arg_vec) {
        op2arg.push( step.i_arg );
        if step.n_res == 0 {
            op2var.push( 0 );
        } else {
            op2var.push( step.i_var + step.n_res - 1 );
            for res in 0 .. step.n_res {
                var2op.set( step.i_var + res, step.i_op );
            }
        }
    }
    Random { op2arg, op2var, var2op }
}
//
impl Random {
    /// memory used by all three tables, in bytes
    pub fn byte_size(&self) -> usize {
        self.op2arg.byte_size()
            + self.op2var.byte_size()
            + self.var2op.byte_size()
    }
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::id::*;
    //
    // A tiny tape: begin, two independents, one add, end.
    fn tape() -> ( Vec<u8>, Vec<IndexT> ) {
        let op_vec  = vec![ BEGIN_OP, INV_OP, INV_OP, ADD_VV_OP, END_OP ];
        let arg_vec = vec![ 1, 2 ];
        ( op_vec, arg_vec )
    }
    //
    #[test]
    fn test_seq_then_rev() {
        let (op_vec, arg_vec) = tape();
        let forward : Vec<usize> =
            SeqIter::new(&op_vec, &arg_vec).map( |s| s.i_op ).collect();
        assert_eq!( forward, vec![0, 1, 2, 3, 4] );
        //
        let backward : Vec<usize> =
            RevIter::new(&op_vec, &arg_vec, 4).map( |s| s.i_op ).collect();
        assert_eq!( backward, vec![4, 3, 2, 1, 0] );
    }
    //
    #[test]
    fn test_random_tables() {
        let (op_vec, arg_vec) = tape();
        let random = build_random(&op_vec, &arg_vec, 4);
        assert_eq!( random.op2var.get(3), 3 );
        assert_eq!( random.var2op.get(3), 3 );
        assert_eq!( random.var2op.get(1), 1 );
        assert_eq!( random.op2arg.get(3), 0 );
    }
}
