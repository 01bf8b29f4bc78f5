// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Conditional skip insertion: after optimization the operators feeding
// only one branch of a conditional expression are guarded by a
// conditional skip and do not execute on the other branch.
//
use adtape::{Recorder, Operand, Rel};
use adtape::record::{BinOp, UnOp};
use adtape::op::id::CSKIP_OP;
//
type V = f64;
//
// z = if x0 < x1 { exp(x2) * x2 } else { x3 * x3 * x3 }
fn record_branches() -> adtape::AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(4).unwrap();
    let v : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    //
    // true branch, two operators
    let e      = rec.unary(UnOp::Exp, &v[2]).unwrap();
    let f_true = rec.binary(BinOp::Mul, &e, &v[2]).unwrap();
    //
    // false branch, two operators, disjoint from the true branch
    let s       = rec.binary(BinOp::Mul, &v[3], &v[3]).unwrap();
    let f_false = rec.binary(BinOp::Mul, &s, &v[3]).unwrap();
    //
    let z = rec.cexp(Rel::Lt, &v[0], &v[1], &f_true, &f_false).unwrap();
    rec.stop( vec![z] ).unwrap()
}
//
#[test]
fn test_skip_inserted() {
    let f   = record_branches();
    let opt = f.optimize("").unwrap();
    //
    let n_cskip = opt.op_sequence().iter()
        .filter( |(op, _)| *op == CSKIP_OP )
        .count();
    assert_eq!( n_cskip, 1 );
}
//
#[test]
fn test_false_branch_not_executed() {
    let f       = record_branches();
    let mut opt = f.optimize("").unwrap();
    //
    // x0 < x1 holds: the two false branch operators are skipped
    let x = vec![ 0.0, 1.0, 2.0, 3.0 ];
    let mut taylor = opt.new_taylor(0);
    let y = opt.forward(0, 0, &x, &mut taylor, false).unwrap();
    assert!( (y[0] - 2.0 * (2.0 as V).exp()).abs() < 1e-12 );
    assert_eq!( taylor.num_skipped(), 2 );
    //
    // the relation fails: the true branch operators are skipped
    let x = vec![ 1.0, 0.0, 2.0, 3.0 ];
    let mut taylor = opt.new_taylor(0);
    let y = opt.forward(0, 0, &x, &mut taylor, false).unwrap();
    assert_eq!( y[0], 27.0 );
    assert_eq!( taylor.num_skipped(), 2 );
    //
    // derivatives respect the selected branch
    let g = opt.reverse(0, &[1.0], &taylor, false).unwrap();
    assert_eq!( g, vec![ 0.0, 0.0, 0.0, 27.0 ] );
}
//
#[test]
fn test_no_conditional_skip_option() {
    let f       = record_branches();
    let mut opt = f.optimize("no_conditional_skip").unwrap();
    let any = opt.op_sequence().iter()
        .any( |(op, _)| *op == CSKIP_OP );
    assert!( ! any );
    //
    let x = vec![ 0.0, 1.0, 2.0, 3.0 ];
    let mut taylor = opt.new_taylor(0);
    let y = opt.forward(0, 0, &x, &mut taylor, false).unwrap();
    assert!( (y[0] - 2.0 * (2.0 as V).exp()).abs() < 1e-12 );
    assert_eq!( taylor.num_skipped(), 0 );
}
