// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module defines the [Recorder] that builds a tape in a single
//! pass as the user program executes scalar operations.
//!
//! The recorder is an explicit context object: a host language number
//! type holds on to one recorder and calls into it whenever at least one
//! operand of a scalar operation is tracked. There is no process wide
//! mutable tape slot.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use rustc_hash::FxHashMap;
//
use crate::IndexT;
use crate::base::Base;
use crate::error::{Error, Result};
use crate::fun::AdFun;
use crate::op::id::*;
use crate::op::info;
use crate::op::compare::{
    Rel,
    MASK_LEFT_VAR,
    MASK_RIGHT_VAR,
    MASK_TRUE_VAR,
    MASK_FALSE_VAR,
};
use crate::atom;
use crate::discrete;
// ---------------------------------------------------------------------------
//
// AdType
/// Classification of a value during recording.
///
/// The types satisfy the order
/// constants < dynamic parameters < variables;
/// if a result depends on two operands its type is the maximum of the
/// operand types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AdType {
    //
    /// does not depend on the independent variables or the independent
    /// dynamic parameters
    Constant,
    //
    /// depends on the independent dynamic parameters but not on the
    /// independent variables
    Dynamic,
    //
    /// depends on the independent variables
    Variable,
}
// ---------------------------------------------------------------------------
//
// Operand
/// One operand (or result) of a recorded operation.
#[derive(Clone, Debug)]
pub enum Operand<B> {
    //
    /// a tape variable by its variable index (one based; zero is never
    /// a valid variable)
    Var(IndexT),
    //
    /// a parameter by its index in the parameter vector; it may be a
    /// constant or a dynamic parameter
    Par(IndexT),
    //
    /// a constant by value; the recorder interns it on use
    Con(B),
}
//
impl<B : Base> Operand<B> {
    //
    /// shorthand for a constant operand
    pub fn con(value : f64) -> Self {
        Operand::Con( B::from_f64(value) )
    }
}
// ---------------------------------------------------------------------------
//
// VecAd
/// Handle for a dynamic (variable indexed) vector recorded on a tape.
///
/// The handle stores the offset one past the vector's length slot in the
/// side table, which is how load and store operators refer to the vector.
#[derive(Clone, Copy, Debug)]
pub struct VecAd {
    pub(crate) offset : IndexT,
    pub(crate) length : usize,
}
//
impl VecAd {
    /// number of elements
    pub fn len(&self) -> usize { self.length }
    /// a vector always has at least one element
    pub fn is_empty(&self) -> bool { false }
}
// ---------------------------------------------------------------------------
//
// BinOp
/// The two operand arithmetic families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp { Add, Sub, Mul, Div, Zmul, Pow }
//
// UnOp
/// The one operand families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg, Abs, Sign, Sqrt, Exp, Expm1, Log, Log1p,
    Sin, Cos, Sinh, Cosh, Tan, Tanh, Asin, Acos, Atan, Erf, Erfc,
}
//
impl UnOp {
    /// the operator id for the variable case
    fn op_id(self) -> u8 {
        match self {
            UnOp::Neg   => NEG_OP,
            UnOp::Abs   => ABS_OP,
            UnOp::Sign  => SIGN_OP,
            UnOp::Sqrt  => SQRT_OP,
            UnOp::Exp   => EXP_OP,
            UnOp::Expm1 => EXPM1_OP,
            UnOp::Log   => LOG_OP,
            UnOp::Log1p => LOG1P_OP,
            UnOp::Sin   => SIN_OP,
            UnOp::Cos   => COS_OP,
            UnOp::Sinh  => SINH_OP,
            UnOp::Cosh  => COSH_OP,
            UnOp::Tan   => TAN_OP,
            UnOp::Tanh  => TANH_OP,
            UnOp::Asin  => ASIN_OP,
            UnOp::Acos  => ACOS_OP,
            UnOp::Atan  => ATAN_OP,
            UnOp::Erf   => ERF_OP,
            UnOp::Erfc  => ERFC_OP,
        }
    }
}
// ---------------------------------------------------------------------------
// value evaluation used for constant folding and dynamic parameters
//
// eval_binary_value
pub(crate) fn eval_binary_value<B : Base>(bin : BinOp, x : &B, y : &B) -> B {
    match bin {
        BinOp::Add  => x.add(y),
        BinOp::Sub  => x.sub(y),
        BinOp::Mul  => x.mul(y),
        BinOp::Div  => x.div(y),
        BinOp::Zmul => x.azmul(y),
        BinOp::Pow  => y.mul( &x.log() ).exp(),
    }
}
//
// eval_unary_value
pub(crate) fn eval_unary_value<B : Base>(un : UnOp, x : &B) -> B {
    match un {
        UnOp::Neg   => x.neg(),
        UnOp::Abs   => x.abs(),
        UnOp::Sign  => x.sign(),
        UnOp::Sqrt  => x.sqrt(),
        UnOp::Exp   => x.exp(),
        UnOp::Expm1 => x.expm1(),
        UnOp::Log   => x.log(),
        UnOp::Log1p => x.log1p(),
        UnOp::Sin   => x.sin(),
        UnOp::Cos   => x.cos(),
        UnOp::Sinh  => x.sinh(),
        UnOp::Cosh  => x.cosh(),
        UnOp::Tan   => x.tan(),
        UnOp::Tanh  => x.tanh(),
        UnOp::Asin  => x.asin(),
        UnOp::Acos  => x.acos(),
        UnOp::Atan  => x.atan(),
        UnOp::Erf   => x.erf(),
        UnOp::Erfc  => x.erfc(),
    }
}
//
// dyn_arity
/// number of dyn_arg slots for one dynamic parameter operator
pub(crate) fn dyn_arity(op : u8) -> usize {
    match op {
        CEXP_OP => 6,
        DIS_OP  => 2,
        INV_OP  => 0,
        op if info::is_binary(op) => 2,
        _       => 1,
    }
}
//
// eval_dyn_op
/// evaluate one dynamic parameter operator given the parameter vector
pub(crate) fn eval_dyn_op<B>(
    op : u8, arg : &[IndexT], par : &[B]
) -> B
where
    B : Base + discrete::DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let bin = | b : BinOp | {
        eval_binary_value(b, &par[ arg[0] as usize ], &par[ arg[1] as usize ])
    };
    match op {
        ADD_VV_OP  => bin( BinOp::Add ),
        SUB_VV_OP  => bin( BinOp::Sub ),
        MUL_VV_OP  => bin( BinOp::Mul ),
        DIV_VV_OP  => bin( BinOp::Div ),
        ZMUL_VV_OP => bin( BinOp::Zmul ),
        POW_VV_OP  => bin( BinOp::Pow ),
        DIS_OP     => {
            let fn_index = arg[0] as usize;
            discrete::call::<B>( fn_index, &par[ arg[1] as usize ] )
        }
        CEXP_OP    => {
            let rel   = Rel::from_index( arg[0] );
            let left  = &par[ arg[2] as usize ];
            let right = &par[ arg[3] as usize ];
            if rel.eval(left, right) {
                par[ arg[4] as usize ].clone()
            } else {
                par[ arg[5] as usize ].clone()
            }
        }
        NEG_OP     => eval_unary_value( UnOp::Neg,   &par[ arg[0] as usize ] ),
        ABS_OP     => eval_unary_value( UnOp::Abs,   &par[ arg[0] as usize ] ),
        SIGN_OP    => eval_unary_value( UnOp::Sign,  &par[ arg[0] as usize ] ),
        SQRT_OP    => eval_unary_value( UnOp::Sqrt,  &par[ arg[0] as usize ] ),
        EXP_OP     => eval_unary_value( UnOp::Exp,   &par[ arg[0] as usize ] ),
        EXPM1_OP   => eval_unary_value( UnOp::Expm1, &par[ arg[0] as usize ] ),
        LOG_OP     => eval_unary_value( UnOp::Log,   &par[ arg[0] as usize ] ),
        LOG1P_OP   => eval_unary_value( UnOp::Log1p, &par[ arg[0] as usize ] ),
        SIN_OP     => eval_unary_value( UnOp::Sin,   &par[ arg[0] as usize ] ),
        COS_OP     => eval_unary_value( UnOp::Cos,   &par[ arg[0] as usize ] ),
        SINH_OP    => eval_unary_value( UnOp::Sinh,  &par[ arg[0] as usize ] ),
        COSH_OP    => eval_unary_value( UnOp::Cosh,  &par[ arg[0] as usize ] ),
        TAN_OP     => eval_unary_value( UnOp::Tan,   &par[ arg[0] as usize ] ),
        TANH_OP    => eval_unary_value( UnOp::Tanh,  &par[ arg[0] as usize ] ),
        ASIN_OP    => eval_unary_value( UnOp::Asin,  &par[ arg[0] as usize ] ),
        ACOS_OP    => eval_unary_value( UnOp::Acos,  &par[ arg[0] as usize ] ),
        ATAN_OP    => eval_unary_value( UnOp::Atan,  &par[ arg[0] as usize ] ),
        ERF_OP     => eval_unary_value( UnOp::Erf,   &par[ arg[0] as usize ] ),
        ERFC_OP    => eval_unary_value( UnOp::Erfc,  &par[ arg[0] as usize ] ),
        _ => panic!( "invalid dynamic parameter operator {op}" ),
    }
}
// ---------------------------------------------------------------------------
//
// Recorder
/// Builds a well formed tape in a single pass.
///
/// The lifecycle is `new -> independent -> (operations) -> stop` ;
/// [Recorder::stop] seals the tape into an [AdFun].
///
/// * B : see [doc_generic_b](crate::base::doc_generic_b)
///
/// # Example
/// ```
/// use adtape::{Recorder, Operand, record::BinOp};
/// let mut rec : Recorder<f64> = Recorder::new();
/// let x  = rec.independent(2).unwrap();
/// let x0 = Operand::Var( x[0] );
/// let x1 = Operand::Var( x[1] );
/// let y  = rec.binary(BinOp::Mul, &x0, &x1).unwrap();
/// let f  = rec.stop( vec![y] ).unwrap();
/// assert_eq!( f.size_ind(), 2 );
/// assert_eq!( f.size_dep(), 1 );
/// ```
pub struct Recorder<B : Base> {
    //
    pub(crate) op_vec    : Vec<u8>,
    pub(crate) arg_vec   : Vec<IndexT>,
    //
    // n_var
    /// the next new variable index; index 0 is reserved
    pub(crate) n_var     : usize,
    pub(crate) n_ind     : usize,
    //
    // parameters
    pub(crate) par_vec   : Vec<B>,
    pub(crate) dyn_is    : Vec<bool>,
    pub(crate) dyn2par   : Vec<IndexT>,
    pub(crate) dyn_op    : Vec<u8>,
    pub(crate) dyn_arg   : Vec<IndexT>,
    pub(crate) n_dyn_ind : usize,
    //
    // par_hash
    /// constant parameter deduplication: value hash to parameter indices
    par_hash  : FxHashMap<u64, Vec<IndexT>>,
    //
    pub(crate) text_vec  : Vec<u8>,
    pub(crate) vecad_ind : Vec<IndexT>,
    pub(crate) n_load_op : usize,
    //
    abort_op_index  : Option<usize>,
    compare_enabled : bool,
    ind_done        : bool,
}
//
impl<B : Base> Recorder<B> {
    //
    // new
    /// start a recording; appends the begin marker
    pub fn new() -> Self {
        let mut rec = Self {
            op_vec          : Vec::new(),
            arg_vec         : Vec::new(),
            n_var           : 1,
            n_ind           : 0,
            par_vec         : Vec::new(),
            dyn_is          : Vec::new(),
            dyn2par         : Vec::new(),
            dyn_op          : Vec::new(),
            dyn_arg         : Vec::new(),
            n_dyn_ind       : 0,
            par_hash        : FxHashMap::default(),
            text_vec        : Vec::new(),
            vecad_ind       : Vec::new(),
            n_load_op       : 0,
            abort_op_index  : None,
            compare_enabled : true,
            ind_done        : false,
        };
        rec.op_vec.push( BEGIN_OP );
        rec
    }
    //
    // set_abort_op_index
    /// if recording reaches this operator index, it fails with
    /// [Error::AbortOpIndex]
    pub fn set_abort_op_index(&mut self, op_index : usize) {
        self.abort_op_index = Some(op_index);
    }
    //
    // set_compare_enabled
    /// when false, [Recorder::compare] records nothing (default true)
    pub fn set_compare_enabled(&mut self, enabled : bool) {
        self.compare_enabled = enabled;
    }
    // -----------------------------------------------------------------------
    // low level appends
    //
    // put_op
    fn put_op(&mut self, op : u8) -> Result<usize> {
        let op_index = self.op_vec.len();
        if self.abort_op_index == Some(op_index) {
            return Err( Error::AbortOpIndex { op_index } );
        }
        self.op_vec.push( op );
        Ok( op_index )
    }
    //
    // put_op_raw
    /// append one operator and its arguments; returns the primary result
    /// variable index, or 0 when the operator has no result.
    /// The typed recording methods check the single assignment invariant;
    /// this entry is for rewrites that maintain it themselves.
    pub(crate) fn put_op_raw(
        &mut self, op : u8, arg : &[IndexT]
    ) -> Result<IndexT> {
        self.put_op(op)?;
        self.arg_vec.extend_from_slice( arg );
        let n_res = info::n_res(op);
        self.n_var += n_res;
        if n_res == 0 {
            Ok( 0 )
        } else {
            Ok( (self.n_var - 1) as IndexT )
        }
    }
    //
    // put_con_par
    /// intern a constant parameter, with value deduplication
    pub fn put_con_par(&mut self, value : &B) -> IndexT {
        let hash = value.value_hash();
        if let Some(indices) = self.par_hash.get(&hash) {
            for index in indices {
                let i = *index as usize;
                if ! self.dyn_is[i] && self.par_vec[i] == *value {
                    return *index;
                }
            }
        }
        let index = self.par_vec.len() as IndexT;
        self.par_vec.push( value.clone() );
        self.dyn_is.push( false );
        self.par_hash.entry(hash).or_default().push( index );
        index
    }
    //
    // put_dyn_par
    /// append one dependent dynamic parameter to the parameter DAG
    fn put_dyn_par(&mut self, op : u8, arg : &[IndexT], value : B) -> IndexT {
        debug_assert_eq!( dyn_arity(op), arg.len() );
        for a in arg {
            debug_assert!( (*a as usize) < self.par_vec.len() );
        }
        let index = self.par_vec.len() as IndexT;
        self.par_vec.push( value );
        self.dyn_is.push( true );
        self.dyn2par.push( index );
        self.dyn_op.push( op );
        self.dyn_arg.extend_from_slice( arg );
        index
    }
    // -----------------------------------------------------------------------
    // operand helpers
    //
    // ad_type
    fn ad_type(&self, operand : &Operand<B>) -> AdType {
        match operand {
            Operand::Var(_)   => AdType::Variable,
            Operand::Con(_)   => AdType::Constant,
            Operand::Par(i)   => {
                if self.dyn_is[*i as usize] {
                    AdType::Dynamic
                } else {
                    AdType::Constant
                }
            }
        }
    }
    //
    // par_value
    /// current value of a parameter operand
    fn par_value(&self, operand : &Operand<B>) -> B {
        match operand {
            Operand::Con(v) => v.clone(),
            Operand::Par(i) => self.par_vec[*i as usize].clone(),
            Operand::Var(_) => panic!( "par_value of a variable" ),
        }
    }
    //
    // par_index
    /// parameter index of a parameter operand, interning constants
    fn par_index(&mut self, operand : &Operand<B>) -> IndexT {
        match operand {
            Operand::Con(v) => self.put_con_par( &v.clone() ),
            Operand::Par(i) => *i,
            Operand::Var(_) => panic!( "par_index of a variable" ),
        }
    }
    //
    // var_index
    fn var_index(&self, operand : &Operand<B>) -> Result<IndexT> {
        match operand {
            Operand::Var(i) => {
                let index = *i as usize;
                if index == 0 || index >= self.n_var {
                    return Err( Error::RecordingInvariant {
                        what : format!( "variable index {index} out of range" )
                    } );
                }
                Ok( *i )
            }
            _ => panic!( "var_index of a parameter" ),
        }
    }
    //
    // is_con_value
    /// is this operand a constant with exactly the given value
    fn is_con_value(&self, operand : &Operand<B>, value : f64) -> bool {
        self.ad_type(operand) == AdType::Constant
            && self.par_value(operand) == B::from_f64(value)
    }
    // -----------------------------------------------------------------------
    //
    // independent
    /// Declare the independent variables; must be called exactly once,
    /// before any variable producing operation. Returns their variable
    /// indices (1 ..= n).
    pub fn independent(&mut self, n : usize) -> Result< Vec<IndexT> > {
        if self.ind_done {
            return Err( Error::RecordingInvariant {
                what : "independent called twice".to_string()
            } );
        }
        if self.op_vec.len() != 1 {
            return Err( Error::RecordingInvariant {
                what : "independent must precede all other operations"
                    .to_string()
            } );
        }
        let mut result = Vec::with_capacity(n);
        for _j in 0 .. n {
            self.put_op( INV_OP )?;
            result.push( self.n_var as IndexT );
            self.n_var += 1;
        }
        self.n_ind   = n;
        self.ind_done = true;
        Ok( result )
    }
    //
    // dynamic_independent
    /// Declare the independent dynamic parameters with their initial
    /// values; must precede [Recorder::independent]. Returns their
    /// parameter indices.
    pub fn dynamic_independent(&mut self, values : Vec<B>) -> Result< Vec<IndexT> > {
        if self.ind_done || self.n_dyn_ind != 0 {
            return Err( Error::RecordingInvariant {
                what : "dynamic_independent must come first".to_string()
            } );
        }
        let mut result = Vec::with_capacity( values.len() );
        for value in values {
            let index = self.put_dyn_par( INV_OP, &[], value );
            result.push( index );
        }
        self.n_dyn_ind = result.len();
        Ok( result )
    }
    // -----------------------------------------------------------------------
    //
    // binary
    /// Record one two operand arithmetic operation.
    ///
    /// The result operand kind is determined by the operands: two
    /// constants fold, parameters with at least one dynamic go to the
    /// dynamic parameter DAG, and anything with a variable operand
    /// produces a new tape variable whose index is returned.
    /// The additive and multiplicative identities
    /// (x + 0, 0 + x, x * 1, 1 * x, x * 0, 0 * x, x / 1) collapse
    /// without recording an operator.
    pub fn binary(
        &mut self, bin : BinOp, lhs : &Operand<B>, rhs : &Operand<B>
    ) -> Result< Operand<B> > {
        let type_l = self.ad_type(lhs);
        let type_r = self.ad_type(rhs);
        //
        // both operands are parameters
        if type_l != AdType::Variable && type_r != AdType::Variable {
            let value = eval_binary_value(
                bin, &self.par_value(lhs), &self.par_value(rhs)
            );
            if type_l == AdType::Constant && type_r == AdType::Constant {
                return Ok( Operand::Con(value) );
            }
            let arg = [ self.par_index(lhs), self.par_index(rhs) ];
            let op  = match bin {
                BinOp::Add  => ADD_VV_OP,
                BinOp::Sub  => SUB_VV_OP,
                BinOp::Mul  => MUL_VV_OP,
                BinOp::Div  => DIV_VV_OP,
                BinOp::Zmul => ZMUL_VV_OP,
                BinOp::Pow  => POW_VV_OP,
            };
            let index = self.put_dyn_par( op, &arg, value );
            return Ok( Operand::Par(index) );
        }
        //
        // identity collapses on constant operands
        match bin {
            BinOp::Add => {
                if self.is_con_value(lhs, 0.0) { return Ok( rhs.clone() ); }
                if self.is_con_value(rhs, 0.0) { return Ok( lhs.clone() ); }
            }
            BinOp::Sub => {
                if self.is_con_value(rhs, 0.0) { return Ok( lhs.clone() ); }
            }
            BinOp::Mul => {
                if self.is_con_value(lhs, 1.0) { return Ok( rhs.clone() ); }
                if self.is_con_value(rhs, 1.0) { return Ok( lhs.clone() ); }
                if self.is_con_value(lhs, 0.0) || self.is_con_value(rhs, 0.0) {
                    return Ok( Operand::Con( B::zero() ) );
                }
            }
            BinOp::Div => {
                if self.is_con_value(rhs, 1.0) { return Ok( lhs.clone() ); }
            }
            BinOp::Zmul => {
                if self.is_con_value(lhs, 0.0) {
                    return Ok( Operand::Con( B::zero() ) );
                }
            }
            BinOp::Pow => {}
        }
        //
        // operator id and argument addresses; Add and Mul normalize the
        // parameter to the left so common subexpressions match
        let var_l = type_l == AdType::Variable;
        let var_r = type_r == AdType::Variable;
        let (op, arg_0, arg_1) = match (bin, var_l, var_r) {
            (BinOp::Add, true,  true ) =>
                (ADD_VV_OP, self.var_index(lhs)?, self.var_index(rhs)?),
            (BinOp::Add, false, true ) =>
                (ADD_PV_OP, self.par_index(lhs), self.var_index(rhs)?),
            (BinOp::Add, true,  false) =>
                (ADD_PV_OP, self.par_index(rhs), self.var_index(lhs)?),
            //
            (BinOp::Sub, true,  true ) =>
                (SUB_VV_OP, self.var_index(lhs)?, self.var_index(rhs)?),
            (BinOp::Sub, false, true ) =>
                (SUB_PV_OP, self.par_index(lhs), self.var_index(rhs)?),
            (BinOp::Sub, true,  false) =>
                (SUB_VP_OP, self.var_index(lhs)?, self.par_index(rhs)),
            //
            (BinOp::Mul, true,  true ) =>
                (MUL_VV_OP, self.var_index(lhs)?, self.var_index(rhs)?),
            (BinOp::Mul, false, true ) =>
                (MUL_PV_OP, self.par_index(lhs), self.var_index(rhs)?),
            (BinOp::Mul, true,  false) =>
                (MUL_PV_OP, self.par_index(rhs), self.var_index(lhs)?),
            //
            (BinOp::Div, true,  true ) =>
                (DIV_VV_OP, self.var_index(lhs)?, self.var_index(rhs)?),
            (BinOp::Div, false, true ) =>
                (DIV_PV_OP, self.par_index(lhs), self.var_index(rhs)?),
            (BinOp::Div, true,  false) =>
                (DIV_VP_OP, self.var_index(lhs)?, self.par_index(rhs)),
            //
            (BinOp::Zmul, true,  true ) =>
                (ZMUL_VV_OP, self.var_index(lhs)?, self.var_index(rhs)?),
            (BinOp::Zmul, false, true ) =>
                (ZMUL_PV_OP, self.par_index(lhs), self.var_index(rhs)?),
            (BinOp::Zmul, true,  false) =>
                (ZMUL_VP_OP, self.var_index(lhs)?, self.par_index(rhs)),
            //
            (BinOp::Pow, true,  true ) =>
                (POW_VV_OP, self.var_index(lhs)?, self.var_index(rhs)?),
            (BinOp::Pow, false, true ) =>
                (POW_PV_OP, self.par_index(lhs), self.var_index(rhs)?),
            (BinOp::Pow, true,  false) =>
                (POW_VP_OP, self.var_index(lhs)?, self.par_index(rhs)),
            //
            (_, false, false) => unreachable!(),
        };
        let result = self.put_op_raw( op, &[arg_0, arg_1] )?;
        Ok( Operand::Var(result) )
    }
    //
    // unary
    /// Record one one operand operation; same result typing rules as
    /// [Recorder::binary].
    pub fn unary(
        &mut self, un : UnOp, operand : &Operand<B>
    ) -> Result< Operand<B> > {
        match self.ad_type(operand) {
            AdType::Constant => {
                let value = eval_unary_value( un, &self.par_value(operand) );
                Ok( Operand::Con(value) )
            }
            AdType::Dynamic => {
                let value = eval_unary_value( un, &self.par_value(operand) );
                let arg   = [ self.par_index(operand) ];
                let index = self.put_dyn_par( un.op_id(), &arg, value );
                Ok( Operand::Par(index) )
            }
            AdType::Variable => {
                let arg    = [ self.var_index(operand)? ];
                let result = self.put_op_raw( un.op_id(), &arg )?;
                Ok( Operand::Var(result) )
            }
        }
    }
    // -----------------------------------------------------------------------
    //
    // cexp
    /// Record a conditional expression: if rel(left, right) then if_true
    /// else if_false, selected at replay time by the zero order values.
    pub fn cexp(
        &mut self,
        rel      : Rel,
        left     : &Operand<B>,
        right    : &Operand<B>,
        if_true  : &Operand<B>,
        if_false : &Operand<B>,
    ) -> Result< Operand<B> > {
        let operands = [left, right, if_true, if_false];
        let max_type = operands.iter()
            .map( |o| self.ad_type(o) )
            .max()
            .unwrap();
        //
        if max_type == AdType::Constant {
            let holds = rel.eval(
                &self.par_value(left), &self.par_value(right)
            );
            let sel = if holds { if_true } else { if_false };
            return Ok( Operand::Con( self.par_value(sel) ) );
        }
        if max_type == AdType::Dynamic {
            let holds = rel.eval(
                &self.par_value(left), &self.par_value(right)
            );
            let sel   = if holds { if_true } else { if_false };
            let value = self.par_value(sel);
            let arg   = [
                rel.as_index(),
                0,
                self.par_index(left),
                self.par_index(right),
                self.par_index(if_true),
                self.par_index(if_false),
            ];
            let index = self.put_dyn_par( CEXP_OP, &arg, value );
            return Ok( Operand::Par(index) );
        }
        //
        let mut mask : IndexT = 0;
        let mut addr = | rec : &mut Self, o : &Operand<B>, bit : IndexT | {
            match rec.ad_type(o) {
                AdType::Variable => { mask |= bit; rec.var_index(o) }
                _                => Ok( rec.par_index(o) ),
            }
        };
        let a_left  = addr( self, left,     MASK_LEFT_VAR  )?;
        let a_right = addr( self, right,    MASK_RIGHT_VAR )?;
        let a_true  = addr( self, if_true,  MASK_TRUE_VAR  )?;
        let a_false = addr( self, if_false, MASK_FALSE_VAR )?;
        let arg = [
            rel.as_index(), mask, a_left, a_right, a_true, a_false,
        ];
        let result = self.put_op_raw( CEXP_OP, &arg )?;
        Ok( Operand::Var(result) )
    }
    //
    // compare
    /// Record a comparison together with its observed truth value so
    /// that replay can report compare changes. Comparisons between two
    /// parameters are never recorded; when comparison capture is
    /// disabled nothing is recorded.
    pub fn compare(
        &mut self,
        rel      : Rel,
        left     : &Operand<B>,
        right    : &Operand<B>,
        observed : bool,
    ) -> Result<()> {
        if ! self.compare_enabled {
            return Ok(());
        }
        let var_l = self.ad_type(left)  == AdType::Variable;
        let var_r = self.ad_type(right) == AdType::Variable;
        if ! var_l && ! var_r {
            return Ok(());
        }
        // record the relation that held at record time
        let held = if observed { rel } else { rel.not() };
        let mut mask : IndexT = 0;
        let a_left = if var_l {
            mask |= MASK_LEFT_VAR;
            self.var_index(left)?
        } else {
            self.par_index(left)
        };
        let a_right = if var_r {
            mask |= MASK_RIGHT_VAR;
            self.var_index(right)?
        } else {
            self.par_index(right)
        };
        self.put_op_raw( COM_OP, &[held.as_index(), mask, a_left, a_right] )?;
        Ok(())
    }
    //
    // discrete
    /// Record a discrete function evaluation; the derivative of the
    /// result is treated as identically zero.
    pub fn discrete(
        &mut self, fn_index : usize, operand : &Operand<B>
    ) -> Result< Operand<B> >
    where
        B : discrete::DisRegistry,
    {
        match self.ad_type(operand) {
            AdType::Constant => {
                let value = discrete::call::<B>(
                    fn_index, &self.par_value(operand)
                );
                Ok( Operand::Con(value) )
            }
            AdType::Dynamic => {
                let value = discrete::call::<B>(
                    fn_index, &self.par_value(operand)
                );
                let arg   = [ fn_index as IndexT, self.par_index(operand) ];
                let index = self.put_dyn_par( DIS_OP, &arg, value );
                Ok( Operand::Par(index) )
            }
            AdType::Variable => {
                let arg = [ fn_index as IndexT, self.var_index(operand)? ];
                let result = self.put_op_raw( DIS_OP, &arg )?;
                Ok( Operand::Var(result) )
            }
        }
    }
    //
    // print
    /// Record a print operator: at zero order replay the label is
    /// printed followed by the value.
    pub fn print(&mut self, label : &str, value : &Operand<B>) -> Result<()> {
        let offset = self.text_vec.len() as IndexT;
        self.text_vec.extend_from_slice( label.as_bytes() );
        self.text_vec.push( 0u8 );
        match self.ad_type(value) {
            AdType::Variable => {
                let arg = [ offset, self.var_index(value)? ];
                self.put_op_raw( PRIV_OP, &arg )?;
            }
            _ => {
                let arg = [ offset, self.par_index(value) ];
                self.put_op_raw( PRIP_OP, &arg )?;
            }
        }
        Ok(())
    }
    // -----------------------------------------------------------------------
    // dynamic vectors
    //
    // vecad
    /// Create a dynamic vector with the given initial values; the
    /// initial values must be parameters.
    pub fn vecad(&mut self, initial : &[Operand<B>]) -> Result<VecAd> {
        if initial.is_empty() {
            return Err( Error::RecordingInvariant {
                what : "vecad: a dynamic vector cannot be empty".to_string()
            } );
        }
        for operand in initial {
            if self.ad_type(operand) == AdType::Variable {
                return Err( Error::RecordingInvariant {
                    what : "vecad: initial values must be parameters"
                        .to_string()
                } );
            }
        }
        self.vecad_ind.push( initial.len() as IndexT );
        let offset = self.vecad_ind.len() as IndexT;
        for operand in initial {
            let index = self.par_index(operand);
            self.vecad_ind.push( index );
        }
        Ok( VecAd { offset, length : initial.len() } )
    }
    //
    // load
    /// Record a load from a dynamic vector; the result is always a new
    /// variable because stores with variable indices can change which
    /// element it reads.
    pub fn load(
        &mut self, vec : &VecAd, index : &Operand<B>
    ) -> Result< Operand<B> > {
        let load_id = self.n_load_op as IndexT;
        self.n_load_op += 1;
        let result = match self.ad_type(index) {
            AdType::Variable => {
                let arg = [ vec.offset, self.var_index(index)?, load_id ];
                self.put_op_raw( LDV_OP, &arg )?
            }
            _ => {
                let arg = [ vec.offset, self.par_index(index), load_id ];
                self.put_op_raw( LDP_OP, &arg )?
            }
        };
        Ok( Operand::Var(result) )
    }
    //
    // store
    /// Record a store into a dynamic vector.
    pub fn store(
        &mut self,
        vec   : &VecAd,
        index : &Operand<B>,
        value : &Operand<B>,
    ) -> Result<()> {
        let var_i = self.ad_type(index) == AdType::Variable;
        let var_v = self.ad_type(value) == AdType::Variable;
        let a_index = if var_i {
            self.var_index(index)?
        } else {
            self.par_index(index)
        };
        let a_value = if var_v {
            self.var_index(value)?
        } else {
            self.par_index(value)
        };
        let op = match (var_i, var_v) {
            (false, false) => STPP_OP,
            (false, true ) => STPV_OP,
            (true,  false) => STVP_OP,
            (true,  true ) => STVV_OP,
        };
        self.put_op_raw( op, &[vec.offset, a_index, a_value] )?;
        Ok(())
    }
    // -----------------------------------------------------------------------
    //
    // csum
    /// Record a cumulative sum: the sum of the addends minus the sum of
    /// the subtrahends. Constant operands fold into a net parameter
    /// offset; dynamic parameters are promoted to variables first.
    pub fn csum(
        &mut self, add : &[Operand<B>], sub : &[Operand<B>]
    ) -> Result< Operand<B> > {
        let mut offset   = B::zero();
        let mut add_var : Vec<IndexT> = Vec::new();
        let mut sub_var : Vec<IndexT> = Vec::new();
        for (operands, vars, positive) in
            [ (add, &mut add_var, true), (sub, &mut sub_var, false) ]
        {
            for operand in operands {
                match self.ad_type(operand) {
                    AdType::Constant => {
                        let value = self.par_value(operand);
                        offset = if positive {
                            offset.add( &value )
                        } else {
                            offset.sub( &value )
                        };
                    }
                    AdType::Dynamic => {
                        let index = self.promote(operand)?;
                        vars.push( index );
                    }
                    AdType::Variable => {
                        vars.push( self.var_index(operand)? );
                    }
                }
            }
        }
        if add_var.is_empty() && sub_var.is_empty() {
            return Ok( Operand::Con(offset) );
        }
        let offset_par = self.put_con_par( &offset );
        let result = self.put_csum_raw( &add_var, &sub_var, offset_par )?;
        Ok( Operand::Var(result) )
    }
    //
    // put_csum_raw
    /// append a cumulative sum with already resolved variable addresses
    pub(crate) fn put_csum_raw(
        &mut self,
        add_var    : &[IndexT],
        sub_var    : &[IndexT],
        offset_par : IndexT,
    ) -> Result<IndexT> {
        let n_add = add_var.len();
        let n_sub = sub_var.len();
        let mut arg : Vec<IndexT> = Vec::with_capacity( 4 + n_add + n_sub );
        arg.push( n_add as IndexT );
        arg.push( n_sub as IndexT );
        arg.push( offset_par );
        arg.extend_from_slice( add_var );
        arg.extend_from_slice( sub_var );
        arg.push( (4 + n_add + n_sub) as IndexT );
        self.put_op_raw( CSUM_OP, &arg )
    }
    //
    // put_cskip_raw
    /// Append a conditional skip with placeholder operator index runs;
    /// returns the position in the argument stream where the runs begin
    /// so the caller can patch them once the indices are known.
    pub(crate) fn put_cskip_raw(
        &mut self,
        rel     : Rel,
        mask    : IndexT,
        left    : IndexT,
        right   : IndexT,
        n_true  : usize,
        n_false : usize,
    ) -> Result<usize> {
        let mut arg : Vec<IndexT> = Vec::with_capacity( 7 + n_true + n_false );
        arg.push( rel.as_index() );
        arg.push( mask );
        arg.push( left );
        arg.push( right );
        arg.push( n_true as IndexT );
        arg.push( n_false as IndexT );
        for _i in 0 .. n_true + n_false {
            arg.push( 0 );
        }
        arg.push( (7 + n_true + n_false) as IndexT );
        let patch_start = self.arg_vec.len() + 6;
        self.put_op_raw( CSKIP_OP, &arg )?;
        Ok( patch_start )
    }
    //
    // patch_arg
    /// overwrite one slot in the argument stream; used to resolve
    /// conditional skip runs
    pub(crate) fn patch_arg(&mut self, position : usize, value : IndexT) {
        self.arg_vec[position] = value;
    }
    //
    // promote
    /// promote a parameter operand to a variable via the parameter
    /// operator; a variable operand passes through
    pub fn promote(&mut self, operand : &Operand<B>) -> Result<IndexT> {
        match self.ad_type(operand) {
            AdType::Variable => self.var_index(operand),
            _ => {
                let arg = [ self.par_index(operand) ];
                self.put_op_raw( PAR_OP, &arg )
            }
        }
    }
    // -----------------------------------------------------------------------
    //
    // call
    /// Record an atomic function invocation as a bracketed block.
    ///
    /// The atomic's `for_type` callback classifies each result;
    /// variable (and dynamic) results get new tape variables, constant
    /// results are evaluated once now and become parameters.
    pub fn call(
        &mut self,
        atom_index : usize,
        call_id    : IndexT,
        args       : &[Operand<B>],
    ) -> Result< Vec< Operand<B> > >
    where
        B : atom::AtomRegistry,
    {
        let mut type_x : Vec<AdType> =
            args.iter().map( |a| self.ad_type(a) ).collect();
        //
        // with no variable arguments, promote dynamic arguments so the
        // call still happens on the variable tape and new_dynamic stays
        // correct
        let any_var = type_x.contains( &AdType::Variable );
        let any_dyn = type_x.contains( &AdType::Dynamic );
        let mut args : Vec< Operand<B> > = args.to_vec();
        if ! any_var && any_dyn {
            for j in 0 .. args.len() {
                if type_x[j] == AdType::Dynamic {
                    let var = self.promote( &args[j] )?;
                    args[j]   = Operand::Var(var);
                    type_x[j] = AdType::Variable;
                }
            }
        }
        //
        let type_y = atom::for_type::<B>( atom_index, call_id, &type_x )
            .ok_or( Error::AtomicFailure {
                atom_index, call_id : call_id as usize
            } )?;
        let n = args.len();
        let m = type_y.len();
        //
        // all arguments constant: evaluate now and fold
        if ! type_x.contains( &AdType::Variable ) {
            let tx : Vec<B> =
                args.iter().map( |a| self.par_value(a) ).collect();
            let mut ty = vec![ B::nan() ; m ];
            let select_y = vec![ true ; m ];
            let ok = atom::forward::<B>(
                atom_index, call_id, 0, 0, &type_x, &select_y, &tx, &mut ty,
            );
            if ! ok {
                return Err( Error::AtomicFailure {
                    atom_index, call_id : call_id as usize
                } );
            }
            return Ok( ty.into_iter().map( Operand::Con ).collect() );
        }
        //
        // constant results are computed once at record time
        let mut con_y = vec![ B::nan() ; m ];
        let select_con : Vec<bool> =
            type_y.iter().map( |t| *t == AdType::Constant ).collect();
        if select_con.contains( &true ) {
            let tx : Vec<B> = args.iter().map( |a| {
                match self.ad_type(a) {
                    AdType::Variable => B::nan(),
                    _                => self.par_value(a),
                }
            } ).collect();
            let ok = atom::forward::<B>(
                atom_index, call_id, 0, 0, &type_x, &select_con,
                &tx, &mut con_y,
            );
            if ! ok {
                return Err( Error::AtomicFailure {
                    atom_index, call_id : call_id as usize
                } );
            }
        }
        //
        // opening bracket
        let head = [
            atom_index as IndexT, call_id, n as IndexT, m as IndexT,
        ];
        self.put_op_raw( AFUN_OP, &head )?;
        //
        // argument markers
        for operand in args.iter() {
            match self.ad_type(operand) {
                AdType::Variable => {
                    let arg = [ self.var_index(operand)? ];
                    self.put_op_raw( FUNAV_OP, &arg )?;
                }
                _ => {
                    let arg = [ self.par_index(operand) ];
                    self.put_op_raw( FUNAP_OP, &arg )?;
                }
            }
        }
        //
        // result markers
        let mut result : Vec< Operand<B> > = Vec::with_capacity(m);
        for i in 0 .. m {
            if type_y[i] == AdType::Constant {
                let index = self.put_con_par( &con_y[i].clone() );
                self.put_op_raw( FUNRP_OP, &[index] )?;
                result.push( Operand::Par(index) );
            } else {
                let var = self.put_op_raw( FUNRV_OP, &[] )?;
                result.push( Operand::Var(var) );
            }
        }
        //
        // closing bracket
        self.put_op_raw( AFUN_OP, &head )?;
        Ok( result )
    }
    // -----------------------------------------------------------------------
    //
    // seed_from
    /// Copy a sealed tape's parameter, dynamic parameter, text, and
    /// side tables into this fresh recorder so that a rewrite can reuse
    /// the original addresses verbatim. The constant pool hash is
    /// rebuilt so new constants still deduplicate.
    pub(crate) fn seed_from(&mut self, fun : &AdFun<B>) {
        debug_assert_eq!( self.op_vec.len(), 1 );
        debug_assert!( self.par_vec.is_empty() );
        self.par_vec   = fun.par_vec.clone();
        self.dyn_is    = fun.dyn_is.clone();
        self.dyn2par   = fun.dyn2par.clone();
        self.dyn_op    = fun.dyn_op.clone();
        self.dyn_arg   = fun.dyn_arg.clone();
        self.n_dyn_ind = fun.n_dyn_ind;
        self.text_vec  = fun.text_vec.clone();
        self.vecad_ind = fun.vecad_ind.clone();
        //
        let par_vec  = &self.par_vec;
        let dyn_is   = &self.dyn_is;
        let par_hash = &mut self.par_hash;
        for (i, value) in par_vec.iter().enumerate() {
            if ! dyn_is[i] {
                par_hash.entry( value.value_hash() )
                    .or_default().push( i as IndexT );
            }
        }
    }
    // -----------------------------------------------------------------------
    //
    // stop
    /// Seal the tape: nominate the dependents, append the end marker,
    /// and move the recording into a playable [AdFun]. Parameter
    /// dependents are promoted to variables first.
    pub fn stop(mut self, dependents : Vec< Operand<B> >) -> Result< AdFun<B> > {
        let mut dep_vec : Vec<IndexT> =
            Vec::with_capacity( dependents.len() );
        for operand in dependents.iter() {
            let index = self.promote(operand)?;
            dep_vec.push( index );
        }
        self.put_op( END_OP )?;
        //
        let fun = AdFun::from_parts(
            self.op_vec,
            self.arg_vec,
            self.n_var,
            self.n_ind,
            self.par_vec,
            self.dyn_is,
            self.dyn2par,
            self.dyn_op,
            self.dyn_arg,
            self.n_dyn_ind,
            self.text_vec,
            self.vecad_ind,
            self.n_load_op,
            dep_vec,
        );
        fun.check_invariants().map_err( |what|
            Error::RecordingInvariant { what }
        )?;
        Ok( fun )
    }
}
//
impl<B : Base> Default for Recorder<B> {
    fn default() -> Self { Self::new() }
}
