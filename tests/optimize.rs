// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Tape optimization: semantics preservation, dead code removal, common
// subexpression elimination, and idempotence.
//
use adtape::{Recorder, Operand, Rel, AdFun};
use adtape::record::{BinOp, UnOp};
//
type V = f64;
//
fn close(a : V, b : V) -> bool {
    (a - b).abs() <= 1e-10 * ( 1.0 + a.abs() + b.abs() )
}
//
// a tape exercising most operator families
fn record_mixed() -> AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(3).unwrap();
    let v : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    //
    let s   = rec.unary(UnOp::Sin, &v[0]).unwrap();
    let e   = rec.unary(UnOp::Exp, &v[1]).unwrap();
    let p   = rec.binary(BinOp::Mul, &s, &e).unwrap();
    let q   = rec.binary(BinOp::Div, &v[2], &e).unwrap();
    let c   = rec.cexp(Rel::Le, &v[0], &v[2], &p, &q).unwrap();
    let sum = rec.binary(BinOp::Add, &c, &p).unwrap();
    let z   = rec.binary(BinOp::Zmul, &v[1], &sum).unwrap();
    //
    // dead code: never reaches a dependent
    let _dead1 = rec.unary(UnOp::Sqrt, &v[2]).unwrap();
    let _dead2 = rec.binary(BinOp::Mul, &_dead1, &v[0]).unwrap();
    //
    rec.stop( vec![z, sum] ).unwrap()
}
//
#[test]
fn test_optimize_preserves_semantics() {
    let mut f   = record_mixed();
    let mut opt = f.optimize("").unwrap();
    assert!( opt.size_op() < f.size_op() );
    //
    let points = [
        [ 0.5, 0.25, 2.0 ],
        [ 3.0, -1.0, 0.5 ],   // flips the conditional branch
        [ -0.75, 0.0, 1.5 ],
    ];
    for x in points {
        let mut t_old = f.new_taylor(1);
        let mut t_new = opt.new_taylor(1);
        let y_old = f.forward(0, 0, &x, &mut t_old, false).unwrap();
        let y_new = opt.forward(0, 0, &x, &mut t_new, false).unwrap();
        for i in 0 .. y_old.len() {
            assert!( close( y_old[i], y_new[i] ), "value at {x:?}" );
        }
        //
        // first order also agrees
        let dx = [ 1.0, -0.5, 0.25 ];
        let d_old = f.forward(1, 1, &dx, &mut t_old, false).unwrap();
        let d_new = opt.forward(1, 1, &dx, &mut t_new, false).unwrap();
        for i in 0 .. d_old.len() {
            assert!( close( d_old[i], d_new[i] ), "derivative at {x:?}" );
        }
        //
        let w = [ 1.0, -2.0 ];
        let g_old = f.reverse(0, &w, &t_old, false).unwrap();
        let g_new = opt.reverse(0, &w, &t_new, false).unwrap();
        for j in 0 .. 3 {
            assert!( close( g_old[j], g_new[j] ), "gradient at {x:?}" );
        }
    }
}
//
#[test]
fn test_optimize_with_check() {
    let mut f = record_mixed();
    let x     = [ 0.5, 0.25, 2.0 ];
    f.optimize_with_check("", &x).unwrap();
}
//
#[test]
fn test_common_subexpression() {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(2).unwrap();
    let a = Operand::Var( x[0] );
    let b = Operand::Var( x[1] );
    //
    // the same subexpression three times, once with the commutative
    // operands swapped
    let p1 = rec.binary(BinOp::Mul, &a, &b).unwrap();
    let p2 = rec.binary(BinOp::Mul, &b, &a).unwrap();
    let p3 = rec.binary(BinOp::Mul, &a, &b).unwrap();
    let s1 = rec.unary(UnOp::Sqrt, &p1).unwrap();
    let s2 = rec.unary(UnOp::Sqrt, &p2).unwrap();
    let d  = rec.binary(BinOp::Div, &s1, &s2).unwrap();
    let e  = rec.binary(BinOp::Mul, &d, &p3).unwrap();
    let f  = rec.stop( vec![e] ).unwrap();
    //
    let mut opt = f.optimize("").unwrap();
    // one mul survives of p1, p2, p3; one sqrt of s1, s2;
    // begin + 2 inv + mul + sqrt + div + mul + end
    assert_eq!( opt.size_op(), 8 );
    //
    let mut taylor = opt.new_taylor(0);
    let y = opt.forward(0, 0, &[2.0, 4.5], &mut taylor, false).unwrap();
    assert!( close( y[0], 9.0 ) );
}
//
#[test]
fn test_parameter_value_match() {
    // the same parameter value interned twice still matches in the
    // common subexpression pass
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(1).unwrap();
    let a = Operand::Var( x[0] );
    let p1 = rec.binary(BinOp::Mul, &Operand::con(2.5), &a).unwrap();
    let p2 = rec.binary(BinOp::Mul, &a, &Operand::con(2.5)).unwrap();
    let s  = rec.binary(BinOp::Sub, &p1, &p2).unwrap();
    let f  = rec.stop( vec![s] ).unwrap();
    //
    let mut opt = f.optimize("").unwrap();
    // p1 and p2 merge; begin + inv + mul + sub + end
    assert_eq!( opt.size_op(), 5 );
    let mut taylor = opt.new_taylor(0);
    let y = opt.forward(0, 0, &[3.0], &mut taylor, false).unwrap();
    assert_eq!( y[0], 0.0 );
}
//
#[test]
fn test_optimize_idempotent() {
    for f in [ record_mixed() ] {
        let once  = f.optimize("").unwrap();
        let twice = once.optimize("").unwrap();
        assert_eq!( once.op_sequence(), twice.op_sequence() );
    }
}
//
#[test]
fn test_empty_dependents() {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(2).unwrap();
    let _ = rec.binary(
        BinOp::Mul, &Operand::Var(x[0]), &Operand::Var(x[1]),
    ).unwrap();
    let mut f = rec.stop( Vec::new() ).unwrap();
    assert_eq!( f.size_dep(), 0 );
    //
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &[1.0, 2.0], &mut taylor, false).unwrap();
    assert!( y.is_empty() );
    let g = f.reverse(0, &[], &taylor, false).unwrap();
    assert_eq!( g, vec![ 0.0, 0.0 ] );
    //
    // optimization drops everything but the markers and independents
    let opt = f.optimize("").unwrap();
    assert_eq!( opt.size_op(), 4 );
}
