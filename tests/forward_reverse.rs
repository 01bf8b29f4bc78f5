// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Forward Taylor coefficients against closed forms, higher orders, the
// multi direction sweep, and the forward / reverse duality.
//
use adtape::{Recorder, Operand};
use adtape::record::{BinOp, UnOp};
//
type V = f64;
//
fn close(a : V, b : V) -> bool {
    (a - b).abs() <= 1e-10 * ( 1.0 + a.abs() + b.abs() )
}
//
// f(x0, x1) = sin(x0) * exp(x1) + x0 / x1
fn record_mixed() -> adtape::AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x  = rec.independent(2).unwrap();
    let x0 = Operand::Var( x[0] );
    let x1 = Operand::Var( x[1] );
    let s  = rec.unary(UnOp::Sin, &x0).unwrap();
    let e  = rec.unary(UnOp::Exp, &x1).unwrap();
    let p  = rec.binary(BinOp::Mul, &s, &e).unwrap();
    let q  = rec.binary(BinOp::Div, &x0, &x1).unwrap();
    let y  = rec.binary(BinOp::Add, &p, &q).unwrap();
    rec.stop( vec![y] ).unwrap()
}
//
#[test]
fn test_gradient_against_closed_form() {
    let mut f = record_mixed();
    let (x0, x1) = (0.7, 1.3);
    //
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &[x0, x1], &mut taylor, false).unwrap();
    assert!( close( y[0], x0.sin() * x1.exp() + x0 / x1 ) );
    //
    let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
    assert!( close( g[0], x0.cos() * x1.exp() + 1.0 / x1 ) );
    assert!( close( g[1], x0.sin() * x1.exp() - x0 / (x1 * x1) ) );
}
//
#[test]
fn test_second_order_coefficient() {
    // y = x * x * x; along x(t) = x + t the order two Taylor
    // coefficient of y is 3 x
    let mut rec : Recorder<V> = Recorder::new();
    let x  = rec.independent(1).unwrap();
    let x0 = Operand::Var( x[0] );
    let s  = rec.binary(BinOp::Mul, &x0, &x0).unwrap();
    let c  = rec.binary(BinOp::Mul, &s, &x0).unwrap();
    let mut f = rec.stop( vec![c] ).unwrap();
    //
    let mut taylor = f.new_taylor(2);
    let y0 = f.forward(0, 0, &[2.0], &mut taylor, false).unwrap();
    let y1 = f.forward(1, 1, &[1.0], &mut taylor, false).unwrap();
    let y2 = f.forward(2, 2, &[0.0], &mut taylor, false).unwrap();
    assert!( close( y0[0], 8.0 ) );
    assert!( close( y1[0], 12.0 ) );   // first derivative 3 x^2
    assert!( close( y2[0], 6.0 ) );    // (1/2) second derivative = 3 x
    //
    // second order reverse: partials of the order one coefficient
    let w = vec![ 0.0, 1.0 ];
    let g = f.reverse(1, &w, &taylor, false).unwrap();
    // d y1 / d x0 = 6 x, d y1 / d x1 = 3 x^2
    assert!( close( g[0], 12.0 ) );
    assert!( close( g[1], 12.0 ) );
}
//
#[test]
fn test_multi_direction_matches_single() {
    let mut f = record_mixed();
    let x = [0.7, 1.3];
    let directions = [ [1.0, 0.0], [0.0, 1.0], [0.5, -2.0] ];
    //
    // three directions at once
    let mut dir_ws = f.new_taylor_dir(1, 3);
    f.forward_dir(0, &x, &mut dir_ws, false).unwrap();
    let mut xq = vec![ 0.0 ; 2 * 3 ];
    for (ell, d) in directions.iter().enumerate() {
        xq[ 0 * 3 + ell ] = d[0];
        xq[ 1 * 3 + ell ] = d[1];
    }
    let y_dir = f.forward_dir(1, &xq, &mut dir_ws, false).unwrap();
    //
    // one direction at a time
    for (ell, d) in directions.iter().enumerate() {
        let mut taylor = f.new_taylor(1);
        f.forward(0, 0, &x, &mut taylor, false).unwrap();
        let y1 = f.forward(1, 1, d, &mut taylor, false).unwrap();
        assert!( close( y_dir[ell], y1[0] ), "direction {ell}" );
    }
}
//
#[test]
fn test_forward_reverse_duality() {
    // < reverse gradient, x_dot > == forward directional derivative
    let mut f = record_mixed();
    let points = [ [0.3, 0.9], [1.1, 2.0], [-0.4, 0.7] ];
    let x_dots = [ [1.0, 0.0], [0.25, -1.5], [2.0, 3.0] ];
    for x in points {
        let mut taylor = f.new_taylor(1);
        f.forward(0, 0, &x, &mut taylor, false).unwrap();
        let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
        for x_dot in x_dots {
            let y_dot = f.forward(1, 1, &x_dot, &mut taylor, false).unwrap();
            let inner = g[0] * x_dot[0] + g[1] * x_dot[1];
            assert!( close( inner, y_dot[0] ) );
        }
    }
}
