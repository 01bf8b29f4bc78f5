// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Binary operator variants: variable and parameter operand
// combinations, the power triple, and the absolute zero product.
//
use adtape::{Recorder, Operand, AdFun};
use adtape::record::BinOp;
//
type V = f64;
//
fn close(a : V, b : V) -> bool {
    (a - b).abs() <= 1e-10 * ( 1.0 + a.abs() + b.abs() )
}
//
// record one binary operation of each operand pattern
fn record_binary(
    bin : BinOp, lhs_var : bool, rhs_var : bool, p : V
) -> AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(2).unwrap();
    let lhs = if lhs_var {
        Operand::Var( x[0] )
    } else {
        Operand::con(p)
    };
    let rhs = if rhs_var {
        Operand::Var( x[1] )
    } else {
        Operand::con(p)
    };
    let y = rec.binary(bin, &lhs, &rhs).unwrap();
    rec.stop( vec![y] ).unwrap()
}
//
// gradient by reverse, value by forward, for each operand pattern
fn check_binary(
    bin : BinOp, x0 : V, x1 : V, p : V,
    value : impl Fn(V, V) -> V,
    dl    : impl Fn(V, V) -> V,
    dr    : impl Fn(V, V) -> V,
) {
    // variable op variable
    let mut f = record_binary(bin, true, true, p);
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &[x0, x1], &mut taylor, false).unwrap();
    assert!( close( y[0], value(x0, x1) ), "{bin:?} vv value" );
    let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
    assert!( close( g[0], dl(x0, x1) ), "{bin:?} vv left" );
    assert!( close( g[1], dr(x0, x1) ), "{bin:?} vv right" );
    //
    // parameter op variable
    let mut f = record_binary(bin, false, true, p);
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &[x0, x1], &mut taylor, false).unwrap();
    assert!( close( y[0], value(p, x1) ), "{bin:?} pv value" );
    let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
    assert!( close( g[1], dr(p, x1) ), "{bin:?} pv right" );
    //
    // variable op parameter
    let mut f = record_binary(bin, true, false, p);
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &[x0, x1], &mut taylor, false).unwrap();
    assert!( close( y[0], value(x0, p) ), "{bin:?} vp value" );
    let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
    assert!( close( g[0], dl(x0, p) ), "{bin:?} vp left" );
}
//
#[test]
fn test_add() {
    check_binary(
        BinOp::Add, 1.5, 2.5, 4.0,
        |a, b| a + b, |_, _| 1.0, |_, _| 1.0,
    );
}
//
#[test]
fn test_sub() {
    check_binary(
        BinOp::Sub, 1.5, 2.5, 4.0,
        |a, b| a - b, |_, _| 1.0, |_, _| -1.0,
    );
}
//
#[test]
fn test_mul() {
    check_binary(
        BinOp::Mul, 1.5, 2.5, 4.0,
        |a, b| a * b, |_, b| b, |a, _| a,
    );
}
//
#[test]
fn test_div() {
    check_binary(
        BinOp::Div, 1.5, 2.5, 4.0,
        |a, b| a / b, |_, b| 1.0 / b, |a, b| -a / (b * b),
    );
}
//
#[test]
fn test_zmul_nonzero() {
    check_binary(
        BinOp::Zmul, 1.5, 2.5, 4.0,
        |a, b| a * b, |_, b| b, |a, _| a,
    );
}
//
#[test]
fn test_pow() {
    check_binary(
        BinOp::Pow, 1.5, 2.5, 2.0,
        |a, b| a.powf(b),
        |a, b| b * a.powf(b - 1.0),
        |a, b| a.powf(b) * a.ln(),
    );
}
//
#[test]
fn test_pow_second_order() {
    // y = x^3 via the pow triple; Taylor coefficients along x + t
    let mut f = record_binary(BinOp::Pow, true, false, 3.0);
    let mut taylor = f.new_taylor(2);
    let x : V = 2.0;
    let y0 = f.forward(0, 0, &[x, 0.0], &mut taylor, false).unwrap();
    let y1 = f.forward(1, 1, &[1.0, 0.0], &mut taylor, false).unwrap();
    let y2 = f.forward(2, 2, &[0.0, 0.0], &mut taylor, false).unwrap();
    assert!( close( y0[0], 8.0 ) );
    assert!( close( y1[0], 12.0 ) );
    assert!( close( y2[0], 6.0 ) );
}
//
#[test]
fn test_zmul_absolute_zero() {
    // zmul(x0, x1) with x0 exactly zero is zero to all orders, even
    // when the other factor is infinite or nan at replay
    let mut f = record_binary(BinOp::Zmul, true, true, 0.0);
    let mut taylor = f.new_taylor(1);
    for bad in [ V::INFINITY, V::NAN ] {
        let y0 = f.forward(0, 0, &[0.0, bad], &mut taylor, false).unwrap();
        assert_eq!( y0[0], 0.0 );
        let y1 = f.forward(1, 1, &[0.0, 0.0], &mut taylor, false).unwrap();
        assert_eq!( y1[0], 0.0 );
    }
}
//
#[test]
fn test_identity_collapse() {
    // x + 0, 1 * x, x * 1, x / 1 record no operator at all
    let mut rec : Recorder<V> = Recorder::new();
    let x  = rec.independent(1).unwrap();
    let x0 = Operand::Var( x[0] );
    let a  = rec.binary(BinOp::Add, &x0, &Operand::con(0.0)).unwrap();
    let b  = rec.binary(BinOp::Mul, &Operand::con(1.0), &a).unwrap();
    let c  = rec.binary(BinOp::Mul, &b, &Operand::con(1.0)).unwrap();
    let d  = rec.binary(BinOp::Div, &c, &Operand::con(1.0)).unwrap();
    let mut f = rec.stop( vec![d] ).unwrap();
    //
    // begin, one independent, end
    assert_eq!( f.size_op(), 3 );
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &[5.0], &mut taylor, false).unwrap();
    assert_eq!( y, vec![ 5.0 ] );
}
