// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Recorded comparisons are re-evaluated at zero order replay and
// disagreements are counted with the first differing operator index.
//
use adtape::{Recorder, Operand, Rel};
use adtape::record::BinOp;
use adtape::op::id::COM_OP;
//
type V = f64;
//
fn record_with_compare() -> adtape::AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x  = rec.independent(2).unwrap();
    let x0 = Operand::Var( x[0] );
    let x1 = Operand::Var( x[1] );
    //
    // recorded while x0 < x1 was true
    rec.compare( Rel::Lt, &x0, &x1, true ).unwrap();
    let y = rec.binary(BinOp::Add, &x0, &x1).unwrap();
    rec.stop( vec![y] ).unwrap()
}
//
#[test]
fn test_compare_change_counted() {
    let mut f = record_with_compare();
    //
    // the recorded comparison's operator index
    let com_index = f.op_sequence().iter()
        .position( |(op, _)| *op == COM_OP )
        .unwrap();
    //
    // replay where the comparison still holds
    let mut taylor = f.new_taylor(0);
    f.forward(0, 0, &[1.0, 2.0], &mut taylor, false).unwrap();
    assert_eq!( f.compare_change_count(), 0 );
    assert_eq!( f.compare_change_op_index(), None );
    //
    // replay where it does not
    f.forward(0, 0, &[2.0, 1.0], &mut taylor, false).unwrap();
    assert_eq!( f.compare_change_count(), 1 );
    assert_eq!( f.compare_change_op_index(), Some(com_index) );
}
//
#[test]
fn test_compare_observed_false() {
    // an observation that the relation was false records its negation
    let mut rec : Recorder<V> = Recorder::new();
    let x  = rec.independent(1).unwrap();
    let x0 = Operand::Var( x[0] );
    rec.compare( Rel::Lt, &x0, &Operand::con(0.0), false ).unwrap();
    let y = rec.binary(BinOp::Mul, &x0, &x0).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    let mut taylor = f.new_taylor(0);
    f.forward(0, 0, &[3.0], &mut taylor, false).unwrap();
    assert_eq!( f.compare_change_count(), 0 );
    //
    f.forward(0, 0, &[-3.0], &mut taylor, false).unwrap();
    assert_eq!( f.compare_change_count(), 1 );
}
//
#[test]
fn test_compare_bound_zero_disables() {
    let mut f = record_with_compare();
    f.compare_change_bound(0);
    let mut taylor = f.new_taylor(0);
    f.forward(0, 0, &[2.0, 1.0], &mut taylor, false).unwrap();
    assert_eq!( f.compare_change_count(), 0 );
}
//
#[test]
fn test_no_compare_op_strips() {
    let f   = record_with_compare();
    let opt = f.optimize("no_compare_op").unwrap();
    let any = opt.op_sequence().iter().any( |(op, _)| *op == COM_OP );
    assert!( ! any );
    //
    let kept = f.optimize("").unwrap();
    let any  = kept.op_sequence().iter().any( |(op, _)| *op == COM_OP );
    assert!( any );
}
