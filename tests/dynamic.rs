// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Dynamic parameters: values supplied at replay time, with a parameter
// only computation DAG re-evaluated by new_dynamic.
//
use adtape::{Recorder, Operand};
use adtape::record::{BinOp, UnOp};
//
type V = f64;
//
#[test]
fn test_new_dynamic() {
    // y = exp(p0 + p1) * x0 with p0, p1 dynamic
    let mut rec : Recorder<V> = Recorder::new();
    let p = rec.dynamic_independent( vec![ 0.0, 0.0 ] ).unwrap();
    let x = rec.independent(1).unwrap();
    //
    let sum   = rec.binary(
        BinOp::Add, &Operand::Par(p[0]), &Operand::Par(p[1]),
    ).unwrap();
    let scale = rec.unary(UnOp::Exp, &sum).unwrap();
    let y     = rec.binary(
        BinOp::Mul, &scale, &Operand::Var(x[0]),
    ).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    // sum and scale live on the dynamic parameter DAG, not the tape
    assert_eq!( f.size_dyn_ind(), 2 );
    //
    let mut taylor = f.new_taylor(0);
    let y0 = f.forward(0, 0, &[2.0], &mut taylor, false).unwrap();
    assert_eq!( y0[0], 2.0 );
    //
    f.new_dynamic( &[ 1.0, 2.0 ] ).unwrap();
    let y0 = f.forward(0, 0, &[2.0], &mut taylor, false).unwrap();
    assert!( ( y0[0] - 2.0 * (3.0 as V).exp() ).abs() < 1e-12 );
    //
    // the derivative scales the same way
    let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
    assert!( ( g[0] - (3.0 as V).exp() ).abs() < 1e-12 );
}
//
#[test]
fn test_dynamic_conditional() {
    // a conditional computed entirely from parameters
    let mut rec : Recorder<V> = Recorder::new();
    let p = rec.dynamic_independent( vec![ 1.0 ] ).unwrap();
    let x = rec.independent(1).unwrap();
    //
    let branch = rec.cexp(
        adtape::Rel::Lt,
        &Operand::Par(p[0]),
        &Operand::con(0.0),
        &Operand::con(-1.0),
        &Operand::con(1.0),
    ).unwrap();
    let y = rec.binary(BinOp::Mul, &branch, &Operand::Var(x[0])).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    let mut taylor = f.new_taylor(0);
    let y0 = f.forward(0, 0, &[3.0], &mut taylor, false).unwrap();
    assert_eq!( y0[0], 3.0 );
    //
    f.new_dynamic( &[ -2.0 ] ).unwrap();
    let y0 = f.forward(0, 0, &[3.0], &mut taylor, false).unwrap();
    assert_eq!( y0[0], -3.0 );
}
//
#[test]
fn test_dynamic_survives_optimize() {
    let mut rec : Recorder<V> = Recorder::new();
    let p = rec.dynamic_independent( vec![ 4.0 ] ).unwrap();
    let x = rec.independent(1).unwrap();
    let y = rec.binary(
        BinOp::Mul, &Operand::Par(p[0]), &Operand::Var(x[0]),
    ).unwrap();
    let f = rec.stop( vec![y] ).unwrap();
    //
    let mut opt = f.optimize("").unwrap();
    opt.new_dynamic( &[ 7.0 ] ).unwrap();
    let mut taylor = opt.new_taylor(0);
    let y0 = opt.forward(0, 0, &[2.0], &mut taylor, false).unwrap();
    assert_eq!( y0[0], 14.0 );
}
