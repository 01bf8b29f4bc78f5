// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Byte serialization of a sealed tape.
//!
//! The record layout is compatibility critical: the numeric operator
//! codes, their slot counts, and the slot meanings must not change
//! between a writer and a reader.
//!
//! Record layout:
//! 1. a 16 byte header: the magic string, a format version byte, the
//!    opcode width, the address width, the value width, and padding;
//! 2. ten little endian u64 counts: independents, variables, operators,
//!    argument slots, parameters, text bytes, side table slots,
//!    independent dynamic parameters, dynamic parameters, dependents;
//! 3. the operator stream, one byte per operator;
//! 4. the argument stream, address width bytes per entry;
//! 5. the parameter vector, value width bytes per entry;
//! 6. the dynamic parameter tables: flags, index map, operators,
//!    arguments (the argument count follows from the operators);
//! 7. the text table; 8. the side table; 9. the dependent list.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
use crate::error::{Error, Result};
use crate::fun::AdFun;
use crate::op::id::{LDP_OP, LDV_OP, NUMBER_OP};
use crate::record::dyn_arity;
// ---------------------------------------------------------------------------
//
// MAGIC
const MAGIC : &[u8; 8] = b"adtape\0\0";
const FORMAT_VERSION : u8 = 1;
const ADDRESS_WIDTH  : usize = std::mem::size_of::<IndexT>();
// ---------------------------------------------------------------------------
//
// Reader
/// cursor over a serialized record
struct Reader<'a> {
    bytes  : &'a [u8],
    cursor : usize,
}
//
impl<'a> Reader<'a> {
    fn new(bytes : &'a [u8]) -> Self {
        Self { bytes, cursor : 0 }
    }
    //
    fn take(&mut self, n : usize) -> Result<&'a [u8]> {
        if self.cursor + n > self.bytes.len() {
            return Err( Error::Serialize {
                what : "record truncated".to_string()
            } );
        }
        let slice = &self.bytes[self.cursor .. self.cursor + n];
        self.cursor += n;
        Ok( slice )
    }
    //
    fn u64(&mut self) -> Result<u64> {
        let bytes = self.take(8)?;
        Ok( u64::from_le_bytes( bytes.try_into().unwrap() ) )
    }
    //
    fn index(&mut self) -> Result<IndexT> {
        let bytes = self.take(ADDRESS_WIDTH)?;
        Ok( IndexT::from_le_bytes( bytes.try_into().unwrap() ) )
    }
    //
    fn index_vec(&mut self, count : usize) -> Result< Vec<IndexT> > {
        let mut result = Vec::with_capacity(count);
        for _i in 0 .. count {
            result.push( self.index()? );
        }
        Ok( result )
    }
}
// ---------------------------------------------------------------------------
impl<B : Base> AdFun<B> {
    //
    // serialize
    /// Write this tape as a byte record; see the module layout notes.
    ///
    /// # Example
    /// ```
    /// use adtape::{Recorder, Operand, record::BinOp, AdFun};
    /// let mut rec : Recorder<f64> = Recorder::new();
    /// let x = rec.independent(1).unwrap();
    /// let y = rec.binary(
    ///     BinOp::Mul, &Operand::Var(x[0]), &Operand::Var(x[0])
    /// ).unwrap();
    /// let f     = rec.stop( vec![y] ).unwrap();
    /// let bytes = f.serialize();
    /// let g     = AdFun::<f64>::deserialize( &bytes ).unwrap();
    /// assert_eq!( g.size_op(), f.size_op() );
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let mut out : Vec<u8> = Vec::new();
        //
        // header
        out.extend_from_slice( MAGIC );
        out.push( FORMAT_VERSION );
        out.push( 1u8 );
        out.push( ADDRESS_WIDTH as u8 );
        out.push( B::BYTE_WIDTH as u8 );
        while out.len() < 16 {
            out.push( 0u8 );
        }
        //
        // counts
        let counts = [
            self.n_ind as u64,
            self.n_var as u64,
            self.op_vec.len() as u64,
            self.arg_vec.len() as u64,
            self.par_vec.len() as u64,
            self.text_vec.len() as u64,
            self.vecad_ind.len() as u64,
            self.n_dyn_ind as u64,
            self.dyn2par.len() as u64,
            self.dep_vec.len() as u64,
        ];
        for count in counts {
            out.extend_from_slice( &count.to_le_bytes() );
        }
        //
        // op_vec
        out.extend_from_slice( &self.op_vec );
        //
        // arg_vec
        for a in self.arg_vec.iter() {
            out.extend_from_slice( &a.to_le_bytes() );
        }
        //
        // par_vec
        for p in self.par_vec.iter() {
            p.write_le( &mut out );
        }
        //
        // dynamic parameter tables
        for flag in self.dyn_is.iter() {
            out.push( *flag as u8 );
        }
        for d in self.dyn2par.iter() {
            out.extend_from_slice( &d.to_le_bytes() );
        }
        out.extend_from_slice( &self.dyn_op );
        for a in self.dyn_arg.iter() {
            out.extend_from_slice( &a.to_le_bytes() );
        }
        //
        // text, side table, dependents
        out.extend_from_slice( &self.text_vec );
        for v in self.vecad_ind.iter() {
            out.extend_from_slice( &v.to_le_bytes() );
        }
        for d in self.dep_vec.iter() {
            out.extend_from_slice( &d.to_le_bytes() );
        }
        out
    }
    //
    // deserialize
    /// Rebuild a tape from a byte record produced by [AdFun::serialize].
    pub fn deserialize(bytes : &[u8]) -> Result< AdFun<B> > {
        let mut reader = Reader::new( bytes );
        //
        // header
        let magic = reader.take(8)?;
        if magic != MAGIC {
            return Err( Error::Serialize {
                what : "bad magic header".to_string()
            } );
        }
        let header = reader.take(8)?;
        if header[0] != FORMAT_VERSION {
            return Err( Error::Serialize {
                what : format!( "unknown format version {}", header[0] )
            } );
        }
        if header[1] != 1u8 || header[2] != ADDRESS_WIDTH as u8 {
            return Err( Error::Serialize {
                what : "incompatible opcode or address width".to_string()
            } );
        }
        if header[3] != B::BYTE_WIDTH as u8 {
            return Err( Error::Serialize {
                what : format!(
                    "value width {} does not match the base type", header[3]
                )
            } );
        }
        //
        // counts
        let n_ind     = reader.u64()? as usize;
        let n_var     = reader.u64()? as usize;
        let n_op      = reader.u64()? as usize;
        let n_arg     = reader.u64()? as usize;
        let n_par     = reader.u64()? as usize;
        let n_text    = reader.u64()? as usize;
        let n_vecad   = reader.u64()? as usize;
        let n_dyn_ind = reader.u64()? as usize;
        let n_dyn     = reader.u64()? as usize;
        let n_dep     = reader.u64()? as usize;
        //
        // op_vec
        let op_vec = reader.take(n_op)?.to_vec();
        for op in op_vec.iter() {
            if *op >= NUMBER_OP {
                return Err( Error::Serialize {
                    what : format!( "invalid operator code {op}" )
                } );
            }
        }
        //
        // arg_vec
        let arg_vec = reader.index_vec(n_arg)?;
        //
        // par_vec
        let mut par_vec : Vec<B> = Vec::with_capacity(n_par);
        for _i in 0 .. n_par {
            let chunk = reader.take( B::BYTE_WIDTH )?;
            par_vec.push( B::read_le(chunk) );
        }
        //
        // dynamic parameter tables
        let mut dyn_is : Vec<bool> = Vec::with_capacity(n_par);
        for byte in reader.take(n_par)? {
            dyn_is.push( *byte != 0 );
        }
        let dyn2par = reader.index_vec(n_dyn)?;
        let dyn_op  = reader.take(n_dyn)?.to_vec();
        let n_dyn_arg : usize = dyn_op.iter()
            .map( |op| dyn_arity(*op) ).sum();
        let dyn_arg = reader.index_vec(n_dyn_arg)?;
        //
        // text, side table, dependents
        let text_vec  = reader.take(n_text)?.to_vec();
        let vecad_ind = reader.index_vec(n_vecad)?;
        let dep_vec   = reader.index_vec(n_dep)?;
        //
        // n_load_op
        let n_load_op = op_vec.iter()
            .filter( |op| **op == LDP_OP || **op == LDV_OP )
            .count();
        //
        let fun = AdFun::from_parts(
            op_vec, arg_vec, n_var, n_ind,
            par_vec, dyn_is, dyn2par, dyn_op, dyn_arg, n_dyn_ind,
            text_vec, vecad_ind, n_load_op, dep_vec,
        );
        fun.check_invariants().map_err( |what| Error::Serialize { what } )?;
        Ok( fun )
    }
}
