// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module defines the [Base] trait.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
//
/// Documentation for the adtape generic type parameter B.
///
/// The generic parameter *B* is the scalar type the engine replays a tape
/// with. Taylor and sparsity recursions are expressed using only the
/// operations of this trait; in particular the engine does not assume
/// IEEE-754 semantics beyond a total order, a sign test, and equality.
pub fn doc_generic_b() {}
//
// Base
/// The scalar contract required to record and replay a tape.
///
/// * B : see [doc_generic_b]
///
/// Implementations for `f32` and `f64` ship with this crate.
/// Complex types are not supported because [Base::sign] and the
/// piecewise operators (`abs`) have no contract for them.
pub trait Base
where
    Self : Clone + PartialEq + PartialOrd + 'static,
    Self : std::fmt::Debug + std::fmt::Display,
    for<'a> &'a Self : std::ops::Add<&'a Self, Output = Self>,
    for<'a> &'a Self : std::ops::Sub<&'a Self, Output = Self>,
    for<'a> &'a Self : std::ops::Mul<&'a Self, Output = Self>,
    for<'a> &'a Self : std::ops::Div<&'a Self, Output = Self>,
    for<'a> &'a Self : std::ops::Neg<Output = Self>,
{
    //
    /// number of bytes for one value in a serialized tape record
    const BYTE_WIDTH : usize;
    //
    // arithmetic by reference
    //
    // The reference operator bounds above are available inside this
    // trait but are not implied at a `B : Base` use site, so generic
    // code reaches the operators through these methods.
    fn add(&self, rhs : &Self) -> Self { self + rhs }
    fn sub(&self, rhs : &Self) -> Self { self - rhs }
    fn mul(&self, rhs : &Self) -> Self { self * rhs }
    fn div(&self, rhs : &Self) -> Self { self / rhs }
    fn neg(&self) -> Self { - self }
    //
    fn zero() -> Self;
    fn one()  -> Self;
    fn nan()  -> Self;
    //
    /// exact conversion of small integers and test values
    fn from_f64(value : f64) -> Self;
    //
    // sign
    /// the sign of this value as an element of {-1, 0, +1}
    fn sign(&self) -> Self;
    //
    // abs
    fn abs(&self) -> Self;
    //
    // azmul
    /// absolute zero product: exactly zero whenever the left factor is
    /// exactly zero, before any multiplication; otherwise `self * rhs` .
    ///
    /// # Example
    /// ```
    /// use adtape::Base;
    /// let zero = f64::zero();
    /// let inf  = f64::from_f64( f64::INFINITY );
    /// assert_eq!( zero.azmul(&inf), 0.0 );
    /// ```
    fn azmul(&self, rhs : &Self) -> Self {
        if *self == Self::zero() {
            return Self::zero();
        }
        self * rhs
    }
    //
    // transcendental functions used by the operator set
    fn exp(&self)   -> Self;
    fn expm1(&self) -> Self;
    fn log(&self)   -> Self;
    fn log1p(&self) -> Self;
    fn sqrt(&self)  -> Self;
    fn sin(&self)   -> Self;
    fn cos(&self)   -> Self;
    fn tan(&self)   -> Self;
    fn sinh(&self)  -> Self;
    fn cosh(&self)  -> Self;
    fn tanh(&self)  -> Self;
    fn asin(&self)  -> Self;
    fn acos(&self)  -> Self;
    fn atan(&self)  -> Self;
    fn erf(&self)   -> Self;
    fn erfc(&self)  -> Self;
    //
    // to_index
    /// floor of this value as a vector index;
    /// None if the value is negative or not finite.
    fn to_index(&self) -> Option<usize>;
    //
    // value_hash
    /// Hash of this value with floating point identity; used for
    /// constant parameter deduplication and for parameter value matching
    /// during common subexpression elimination.
    fn value_hash(&self) -> u64;
    //
    // write_le, read_le
    /// append exactly [Base::BYTE_WIDTH] little endian bytes
    fn write_le(&self, out : &mut Vec<u8>);
    /// read one value from exactly [Base::BYTE_WIDTH] little endian bytes
    fn read_le(bytes : &[u8]) -> Self;
}
// ---------------------------------------------------------------------------
// erf_value
/// erf for f64: Maclaurin series for |x| < 2, a continued fraction for
/// the complement on the tail.
pub(crate) fn erf_value(x : f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    let ax = x.abs();
    if ax < 2.0 {
        // sum_n (-1)^n x^(2n+1) / ( n! (2n+1) )
        let two_over_root_pi = 2.0 / std::f64::consts::PI.sqrt();
        let x2       = x * x;
        let mut sum  = 0.0;
        let mut pow  = x;
        let mut fact = 1.0;
        let mut n    = 0u32;
        loop {
            let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
            let term = sign * pow / (fact * (2 * n + 1) as f64);
            sum += term;
            n   += 1;
            if term.abs() <= 1e-18 || n > 60 {
                break;
            }
            pow  *= x2;
            fact *= n as f64;
        }
        return two_over_root_pi * sum;
    }
    let tail = erfc_tail(ax);
    if x > 0.0 { 1.0 - tail } else { tail - 1.0 }
}
//
// erfc_tail
/// erfc(x) for x >= 2 using the Legendre continued fraction
/// sqrt(pi) exp(x^2) erfc(x) = 1 / (x + (1/2)/(x + 1/(x + (3/2)/(x + ...))))
/// evaluated with the modified Lentz method.
fn erfc_tail(x : f64) -> f64 {
    debug_assert!( x >= 2.0 );
    if x > 26.5 {
        // exp(-x^2) underflows
        return 0.0;
    }
    let tiny  = 1e-300;
    let mut f = x;
    let mut c = f;
    let mut d = 0.0;
    for n in 1 .. 200 {
        let a = 0.5 * n as f64;
        d = x + a * d;
        if d == 0.0 { d = tiny; }
        c = x + a / c;
        if c == 0.0 { c = tiny; }
        d = 1.0 / d;
        let delta = c * d;
        f *= delta;
        if (delta - 1.0).abs() < 1e-17 {
            break;
        }
    }
    (-x * x).exp() / (std::f64::consts::PI.sqrt() * f)
}
// ---------------------------------------------------------------------------
// impl_base_float!
/// Implement [Base] for a primitive float type.
macro_rules! impl_base_float { ($F:ident, $width:expr) => {
    impl Base for $F {
        //
        const BYTE_WIDTH : usize = $width;
        //
        fn zero() -> Self { 0 as $F }
        fn one()  -> Self { 1 as $F }
        fn nan()  -> Self { $F::NAN }
        //
        fn from_f64(value : f64) -> Self { value as $F }
        //
        fn sign(&self) -> Self {
            if *self > 0 as $F {
                1 as $F
            } else if *self < 0 as $F {
                -1 as $F
            } else {
                // sign(0) is 0; sign(nan) propagates nan
                *self * 0 as $F
            }
        }
        //
        fn abs(&self)   -> Self { $F::abs(*self) }
        fn exp(&self)   -> Self { $F::exp(*self) }
        fn expm1(&self) -> Self { $F::exp_m1(*self) }
        fn log(&self)   -> Self { $F::ln(*self) }
        fn log1p(&self) -> Self { $F::ln_1p(*self) }
        fn sqrt(&self)  -> Self { $F::sqrt(*self) }
        fn sin(&self)   -> Self { $F::sin(*self) }
        fn cos(&self)   -> Self { $F::cos(*self) }
        fn tan(&self)   -> Self { $F::tan(*self) }
        fn sinh(&self)  -> Self { $F::sinh(*self) }
        fn cosh(&self)  -> Self { $F::cosh(*self) }
        fn tanh(&self)  -> Self { $F::tanh(*self) }
        fn asin(&self)  -> Self { $F::asin(*self) }
        fn acos(&self)  -> Self { $F::acos(*self) }
        fn atan(&self)  -> Self { $F::atan(*self) }
        fn erf(&self)   -> Self { crate::base::erf_value(*self as f64) as $F }
        fn erfc(&self)  -> Self {
            (1.0 - crate::base::erf_value(*self as f64)) as $F
        }
        //
        fn to_index(&self) -> Option<usize> {
            if ! self.is_finite() || *self < 0 as $F {
                return None;
            }
            Some( self.floor() as usize )
        }
        //
        fn value_hash(&self) -> u64 {
            use std::hash::{Hash, Hasher};
            let mut state = rustc_hash::FxHasher::default();
            ordered_float::OrderedFloat(*self).hash(&mut state);
            state.finish()
        }
        //
        fn write_le(&self, out : &mut Vec<u8>) {
            out.extend_from_slice( &self.to_le_bytes() );
        }
        fn read_le(bytes : &[u8]) -> Self {
            let array : [u8; $width] = bytes.try_into().unwrap();
            $F::from_le_bytes(array)
        }
    }
} }
impl_base_float!(f32, 4);
impl_base_float!(f64, 8);
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    //
    #[test]
    fn test_sign() {
        assert_eq!( (3.0f64).sign(),  1.0 );
        assert_eq!( (-2.0f64).sign(), -1.0 );
        assert_eq!( (0.0f64).sign(),  0.0 );
        assert!( f64::NAN.sign().is_nan() );
    }
    //
    #[test]
    fn test_azmul() {
        let zero = f64::zero();
        assert_eq!( zero.azmul( &f64::INFINITY ), 0.0 );
        assert_eq!( zero.azmul( &f64::NAN ), 0.0 );
        assert_eq!( (2.0f64).azmul( &3.0 ), 6.0 );
    }
    //
    #[test]
    fn test_erf() {
        // reference values to 1e-14
        let check = [
            (0.0,  0.0),
            (0.5,  0.5204998778130465),
            (1.0,  0.8427007929497149),
            (2.0,  0.9953222650189527),
            (3.0,  0.9999779095030014),
            (-1.0, -0.8427007929497149),
        ];
        for (x, e) in check {
            assert!( (erf_value(x) - e).abs() < 1e-13, "erf({x})" );
        }
        assert!( (6.0f64).erf() > 1.0 - 1e-15 );
    }
    //
    #[test]
    fn test_to_index() {
        assert_eq!( (2.7f64).to_index(), Some(2) );
        assert_eq!( (0.0f64).to_index(), Some(0) );
        assert_eq!( (-1.0f64).to_index(), None );
        assert_eq!( f64::NAN.to_index(), None );
    }
}
