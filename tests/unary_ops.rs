// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Every unary operator: value, first and second Taylor coefficients,
// and the reverse mode derivative, all against closed forms.
//
use adtape::{Recorder, Operand, AdFun};
use adtape::record::UnOp;
//
type V = f64;
//
fn close(a : V, b : V) -> bool {
    (a - b).abs() <= 1e-9 * ( 1.0 + a.abs() + b.abs() )
}
//
fn record_unary(un : UnOp) -> AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(1).unwrap();
    let y = rec.unary( un, &Operand::Var(x[0]) ).unwrap();
    rec.stop( vec![y] ).unwrap()
}
//
// check_unary
// value, first derivative (forward and reverse), and the order two
// coefficient against the closed form second derivative
fn check_unary(un : UnOp, x : V, f0 : V, f1 : V, f2 : V) {
    let mut f = record_unary(un);
    let mut taylor = f.new_taylor(2);
    //
    let y0 = f.forward(0, 0, &[x], &mut taylor, false).unwrap();
    assert!( close(y0[0], f0), "{un:?} value: {} vs {f0}", y0[0] );
    //
    let y1 = f.forward(1, 1, &[1.0], &mut taylor, false).unwrap();
    assert!( close(y1[0], f1), "{un:?} first: {} vs {f1}", y1[0] );
    //
    // along x(t) = x + t the order two coefficient is f''(x) / 2
    let y2 = f.forward(2, 2, &[0.0], &mut taylor, false).unwrap();
    assert!( close(y2[0], f2 / 2.0), "{un:?} second: {} vs {}", y2[0],
        f2 / 2.0 );
    //
    let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
    assert!( close(g[0], f1), "{un:?} reverse: {} vs {f1}", g[0] );
    //
    // second order reverse: the partial of the order one result
    // coefficient with respect to the domain value is f''(x)
    let g2 = f.reverse(1, &[0.0, 1.0], &taylor, false).unwrap();
    assert!( close(g2[0], f2), "{un:?} reverse two: {} vs {f2}", g2[0] );
}
//
#[test]
fn test_neg() {
    check_unary( UnOp::Neg, 1.5, -1.5, -1.0, 0.0 );
}
//
#[test]
fn test_abs() {
    check_unary( UnOp::Abs,  1.5, 1.5,  1.0, 0.0 );
    check_unary( UnOp::Abs, -1.5, 1.5, -1.0, 0.0 );
}
//
#[test]
fn test_sign() {
    check_unary( UnOp::Sign, 1.5, 1.0, 0.0, 0.0 );
    check_unary( UnOp::Sign, -0.5, -1.0, 0.0, 0.0 );
}
//
#[test]
fn test_sqrt() {
    let x : V = 2.25;
    check_unary(
        UnOp::Sqrt, x, x.sqrt(),
        0.5 / x.sqrt(),
        -0.25 / ( x * x.sqrt() ),
    );
}
//
#[test]
fn test_exp() {
    let x : V = 0.8;
    check_unary( UnOp::Exp, x, x.exp(), x.exp(), x.exp() );
}
//
#[test]
fn test_expm1() {
    let x : V = 0.8;
    check_unary( UnOp::Expm1, x, x.exp_m1(), x.exp(), x.exp() );
}
//
#[test]
fn test_log() {
    let x : V = 1.7;
    check_unary( UnOp::Log, x, x.ln(), 1.0 / x, -1.0 / (x * x) );
}
//
#[test]
fn test_log1p() {
    let x : V = 0.7;
    check_unary(
        UnOp::Log1p, x, x.ln_1p(),
        1.0 / (1.0 + x),
        -1.0 / ( (1.0 + x) * (1.0 + x) ),
    );
}
//
#[test]
fn test_sin() {
    let x : V = 0.6;
    check_unary( UnOp::Sin, x, x.sin(), x.cos(), -x.sin() );
}
//
#[test]
fn test_cos() {
    let x : V = 0.6;
    check_unary( UnOp::Cos, x, x.cos(), -x.sin(), -x.cos() );
}
//
#[test]
fn test_sinh() {
    let x : V = 0.6;
    check_unary( UnOp::Sinh, x, x.sinh(), x.cosh(), x.sinh() );
}
//
#[test]
fn test_cosh() {
    let x : V = 0.6;
    check_unary( UnOp::Cosh, x, x.cosh(), x.sinh(), x.cosh() );
}
//
#[test]
fn test_tan() {
    let x : V = 0.6;
    let t = x.tan();
    check_unary(
        UnOp::Tan, x, t,
        1.0 + t * t,
        2.0 * t * (1.0 + t * t),
    );
}
//
#[test]
fn test_tanh() {
    let x : V = 0.6;
    let t = x.tanh();
    check_unary(
        UnOp::Tanh, x, t,
        1.0 - t * t,
        -2.0 * t * (1.0 - t * t),
    );
}
//
#[test]
fn test_asin() {
    let x : V = 0.4;
    let b = (1.0 - x * x).sqrt();
    check_unary( UnOp::Asin, x, x.asin(), 1.0 / b, x / (b * b * b) );
}
//
#[test]
fn test_acos() {
    let x : V = 0.4;
    let b = (1.0 - x * x).sqrt();
    check_unary( UnOp::Acos, x, x.acos(), -1.0 / b, -x / (b * b * b) );
}
//
#[test]
fn test_atan() {
    let x : V = 0.9;
    let b = 1.0 + x * x;
    check_unary( UnOp::Atan, x, x.atan(), 1.0 / b, -2.0 * x / (b * b) );
}
//
#[test]
fn test_erf() {
    let x : V = 0.5;
    let c = 2.0 / std::f64::consts::PI.sqrt();
    let w = (-x * x).exp();
    check_unary(
        UnOp::Erf, x, 0.5204998778130465,
        c * w,
        -2.0 * x * c * w,
    );
}
//
#[test]
fn test_erfc() {
    let x : V = 0.5;
    let c = 2.0 / std::f64::consts::PI.sqrt();
    let w = (-x * x).exp();
    check_unary(
        UnOp::Erfc, x, 1.0 - 0.5204998778130465,
        -c * w,
        2.0 * x * c * w,
    );
}
