// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This module implements AD atomic functions.
//!
//! They are called atomic functions because an entire user supplied
//! vector function is recorded as a single bracketed block on a tape.
//! Numeric evaluation, reverse differentiation, and sparsity
//! propagation are delegated to the callbacks registered here.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use std::sync::RwLock;
//
use crate::IndexT;
use crate::base::Base;
use crate::record::AdType;
//
#[cfg(doc)]
use crate::base::doc_generic_b;
// ---------------------------------------------------------------------------
//
// AtomForType
/// Callback that classifies the results of an atomic call.
///
/// * Required for all atomic functions; used during recording to decide
///   whether each result gets a variable slot on the tape.
///
/// * call_id : the value recorded with this invocation.
/// * type_x : the [AdType] of each argument.
/// * return : the [AdType] of each result. If a result depends on two
///   arguments its type is the maximum of their types.
pub type AtomForType = fn(
    _call_id : IndexT,
    _type_x  : &[AdType],
) -> Vec<AdType>;
//
// AtomForward
/// Callback that computes result Taylor coefficients.
///
/// * Required for all atomic functions.
///
/// * order_low, order_up : the requested order range.
/// * type_x : the [AdType] of each argument (parameters have all orders
///   above zero equal to zero).
/// * select_y : which results must actually be produced.
/// * tx : argument coefficients, `tx[ j * (order_up + 1) + k ]` is the
///   order k coefficient of argument j.
/// * ty : result coefficients in the same layout; orders below
///   order_low are valid on input.
/// * return : ok. A false return aborts the sweep with
///   [Error::AtomicFailure](crate::Error::AtomicFailure) .
pub type AtomForward<B> = fn(
    _call_id   : IndexT,
    _order_low : usize,
    _order_up  : usize,
    _type_x    : &[AdType],
    _select_y  : &[bool],
    _tx        : &[B],
    _ty        : &mut [B],
) -> bool;
//
// AtomReverse
/// Callback that back propagates adjoints through an atomic call.
///
/// * Optional; required only to use [AdFun::reverse](crate::AdFun::reverse)
///   over a tape containing this atomic.
///
/// * order_up : adjoints cover orders `0 ..= order_up` .
/// * tx, ty : argument and result Taylor coefficients as in [AtomForward].
/// * px : argument adjoints, accumulated by the callback (same layout).
/// * py : result adjoints.
pub type AtomReverse<B> = fn(
    _call_id  : IndexT,
    _order_up : usize,
    _tx       : &[B],
    _ty       : &[B],
    _px       : &mut [B],
    _py       : &[B],
) -> bool;
//
// AtomJacSparsity
/// Callback for the Jacobian sparsity of the atomic's local n by m graph.
///
/// * Optional; a missing callback is treated as dense between the
///   selected arguments and results.
///
/// * dependency : when true, report dependency (not just derivative)
///   relations; used by the optimizer.
/// * select_x, select_y : which arguments and results participate.
/// * return : the (result, argument) index pairs of the local pattern.
pub type AtomJacSparsity = fn(
    _call_id    : IndexT,
    _dependency : bool,
    _select_x   : &[bool],
    _select_y   : &[bool],
) -> Vec<[usize; 2]>;
//
// AtomHesSparsity
/// Callback for the local Hessian sparsity: (argument, argument) pairs
/// that can interact through second derivatives of some selected result.
///
/// * Optional; a missing callback is treated as dense over the selected
///   arguments.
pub type AtomHesSparsity = fn(
    _call_id  : IndexT,
    _select_x : &[bool],
    _select_y : &[bool],
) -> Vec<[usize; 2]>;
//
// AtomRevDepend
/// Callback that reports which arguments the selected results depend on;
/// used by the tape optimizer to drop dead atomic arguments.
///
/// * Optional; a missing callback keeps every argument alive.
pub type AtomRevDepend = fn(
    _call_id  : IndexT,
    _depend_y : &[bool],
) -> Vec<bool>;
// ---------------------------------------------------------------------------
//
// AtomEval
/// The callbacks for one atomic function.
#[derive(Clone)]
pub struct AtomEval<B : Base> {
    //
    /// name used in error messages and traces
    pub name         : String,
    //
    pub for_type     : AtomForType,
    pub forward      : AtomForward<B>,
    pub reverse      : Option< AtomReverse<B> >,
    pub jac_sparsity : Option< AtomJacSparsity >,
    pub hes_sparsity : Option< AtomHesSparsity >,
    pub rev_depend   : Option< AtomRevDepend >,
}
// ---------------------------------------------------------------------------
// sealed::AtomRegistry
pub(crate) mod sealed {
    //! seals the registry trait to the base types that invoke the
    //! implementation macro
    use super::AtomEval;
    use crate::base::Base;
    use std::sync::RwLock;
    //
    /// Access to the process wide registry of atomic functions for one
    /// base type. Independent tapes on different threads share it, so
    /// it sits behind a read write lock.
    pub trait AtomRegistry
    where
        Self : Base,
    {
        fn registry() -> &'static RwLock< Vec< AtomEval<Self> > >;
    }
}
/// public name for the registry trait; implemented for `f32` and `f64`
pub use sealed::AtomRegistry;
//
// impl_atom_registry!
/// Implement the atomic function registry for one base type.
macro_rules! impl_atom_registry { ($B:ty) => {
    impl sealed::AtomRegistry for $B {
        fn registry() -> &'static RwLock< Vec< AtomEval<$B> > > {
            static REGISTRY : RwLock< Vec< AtomEval<$B> > > =
                RwLock::new( Vec::new() );
            &REGISTRY
        }
    }
} }
impl_atom_registry!(f32);
impl_atom_registry!(f64);
// ---------------------------------------------------------------------------
//
// register_atom
/// Register an atomic function; the returned index identifies it on
/// tapes recorded afterwards.
///
/// # Example
/// ```
/// use adtape::{AtomEval, AdType, register_atom, IndexT};
/// fn sum_type(_call_id : IndexT, type_x : &[AdType]) -> Vec<AdType> {
///     vec![ *type_x.iter().max().unwrap() ]
/// }
/// fn sum_forward(
///     _call_id : IndexT, order_low : usize, order_up : usize,
///     _type_x : &[AdType], _select_y : &[bool],
///     tx : &[f64], ty : &mut [f64],
/// ) -> bool {
///     let n = tx.len() / (order_up + 1);
///     for k in order_low ..= order_up {
///         ty[k] = (0 .. n).map( |j| tx[ j * (order_up + 1) + k ] ).sum();
///     }
///     true
/// }
/// let atom_index = register_atom( AtomEval {
///     name         : "sum".to_string(),
///     for_type     : sum_type,
///     forward      : sum_forward,
///     reverse      : None,
///     jac_sparsity : None,
///     hes_sparsity : None,
///     rev_depend   : None,
/// } );
/// let _ = atom_index;
/// ```
pub fn register_atom<B>(eval : AtomEval<B>) -> usize
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let mut registry = B::registry().write().unwrap();
    registry.push( eval );
    registry.len() - 1
}
//
// get
/// clone the callbacks for one atomic function out of the registry
fn get<B>(atom_index : usize) -> AtomEval<B>
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let registry = B::registry().read().unwrap();
    registry[atom_index].clone()
}
//
// name
#[allow(dead_code)]
pub(crate) fn name<B>(atom_index : usize) -> String
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    get::<B>(atom_index).name
}
//
// for_type
pub(crate) fn for_type<B>(
    atom_index : usize, call_id : IndexT, type_x : &[AdType]
) -> Option< Vec<AdType> >
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let eval = get::<B>(atom_index);
    Some( (eval.for_type)(call_id, type_x) )
}
//
// forward
pub(crate) fn forward<B>(
    atom_index : usize,
    call_id    : IndexT,
    order_low  : usize,
    order_up   : usize,
    type_x     : &[AdType],
    select_y   : &[bool],
    tx         : &[B],
    ty         : &mut [B],
) -> bool
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let eval = get::<B>(atom_index);
    (eval.forward)(call_id, order_low, order_up, type_x, select_y, tx, ty)
}
//
// reverse
/// false when the reverse callback is missing or returns not ok
pub(crate) fn reverse<B>(
    atom_index : usize,
    call_id    : IndexT,
    order_up   : usize,
    tx         : &[B],
    ty         : &[B],
    px         : &mut [B],
    py         : &[B],
) -> bool
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let eval = get::<B>(atom_index);
    match eval.reverse {
        Some(callback) => callback(call_id, order_up, tx, ty, px, py),
        None           => false,
    }
}
//
// jac_sparsity
/// the local pattern, dense between selected components when the
/// callback is missing
pub(crate) fn jac_sparsity<B>(
    atom_index : usize,
    call_id    : IndexT,
    dependency : bool,
    select_x   : &[bool],
    select_y   : &[bool],
) -> Vec<[usize; 2]>
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let eval = get::<B>(atom_index);
    match eval.jac_sparsity {
        Some(callback) => callback(call_id, dependency, select_x, select_y),
        None => {
            let mut pattern = Vec::new();
            for i in 0 .. select_y.len() { if select_y[i] {
                for j in 0 .. select_x.len() { if select_x[j] {
                    pattern.push( [i, j] );
                } }
            } }
            pattern
        }
    }
}
//
// hes_sparsity
pub(crate) fn hes_sparsity<B>(
    atom_index : usize,
    call_id    : IndexT,
    select_x   : &[bool],
    select_y   : &[bool],
) -> Vec<[usize; 2]>
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let eval = get::<B>(atom_index);
    match eval.hes_sparsity {
        Some(callback) => callback(call_id, select_x, select_y),
        None => {
            let mut pattern = Vec::new();
            if select_y.contains( &true ) {
                for j1 in 0 .. select_x.len() { if select_x[j1] {
                    for j2 in 0 .. select_x.len() { if select_x[j2] {
                        pattern.push( [j1, j2] );
                    } }
                } }
            }
            pattern
        }
    }
}
//
// rev_depend
/// which arguments the selected results depend on; everything when the
/// callback is missing
pub(crate) fn rev_depend<B>(
    atom_index : usize,
    call_id    : IndexT,
    n_arg      : usize,
    depend_y   : &[bool],
) -> Vec<bool>
where
    B : Base + AtomRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let eval = get::<B>(atom_index);
    match eval.rev_depend {
        Some(callback) => callback(call_id, depend_y),
        None           => vec![ true ; n_arg ],
    }
}
