// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Discrete functions: piecewise functions of one value whose
//! derivative is treated as identically zero.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
use std::sync::RwLock;
//
use crate::base::Base;
// ---------------------------------------------------------------------------
//
// DisEval
/// One registered discrete function.
#[derive(Clone)]
pub struct DisEval<B : Base> {
    pub name : String,
    pub eval : fn(&B) -> B,
}
// ---------------------------------------------------------------------------
// sealed::DisRegistry
pub(crate) mod sealed {
    use super::DisEval;
    use crate::base::Base;
    use std::sync::RwLock;
    //
    /// Process wide registry of discrete functions for one base type.
    pub trait DisRegistry
    where
        Self : Base,
    {
        fn registry() -> &'static RwLock< Vec< DisEval<Self> > >;
    }
}
/// public name for the registry trait; implemented for `f32` and `f64`
pub use sealed::DisRegistry;
//
// impl_dis_registry!
/// Implement the discrete function registry for one base type.
macro_rules! impl_dis_registry { ($B:ty) => {
    impl sealed::DisRegistry for $B {
        fn registry() -> &'static RwLock< Vec< DisEval<$B> > > {
            static REGISTRY : RwLock< Vec< DisEval<$B> > > =
                RwLock::new( Vec::new() );
            &REGISTRY
        }
    }
} }
impl_dis_registry!(f32);
impl_dis_registry!(f64);
// ---------------------------------------------------------------------------
//
// register_discrete
/// Register a discrete function; the returned index identifies it in
/// [Recorder::discrete](crate::Recorder::discrete) calls.
///
/// # Example
/// ```
/// fn heaviside(x : &f64) -> f64 {
///     if *x >= 0.0 { 1.0 } else { 0.0 }
/// }
/// let index = adtape::register_discrete::<f64>(
///     "heaviside".to_string(), heaviside
/// );
/// let _ = index;
/// ```
pub fn register_discrete<B>(name : String, eval : fn(&B) -> B) -> usize
where
    B : Base + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let mut registry = B::registry().write().unwrap();
    registry.push( DisEval { name, eval } );
    registry.len() - 1
}
//
// call
/// evaluate a registered discrete function
pub(crate) fn call<B>(fn_index : usize, x : &B) -> B
where
    B : Base + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let eval = {
        let registry = B::registry().read().unwrap();
        registry[fn_index].eval
    };
    eval(x)
}
//
// name
#[allow(dead_code)]
pub(crate) fn name<B>(fn_index : usize) -> String
where
    B : Base + DisRegistry,
    for<'a> &'a B : std::ops::Add<&'a B, Output = B> + std::ops::Sub<&'a B, Output = B> + std::ops::Mul<&'a B, Output = B> + std::ops::Div<&'a B, Output = B> + std::ops::Neg<Output = B>,
{
    let registry = B::registry().read().unwrap();
    registry[fn_index].name.clone()
}
