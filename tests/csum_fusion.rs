// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Cumulative sum fusion: an addition and subtraction chain collapses
// into a single cumulative sum with a net constant offset.
//
use adtape::{Recorder, Operand};
use adtape::record::BinOp;
use adtape::op::id::CSUM_OP;
//
type V = f64;
//
// y0 = (x0+x1) + (x1-x2) + (x2-1) + (2-x3) + (x4+3) + (4+x5)
fn record_chain() -> adtape::AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(6).unwrap();
    let v : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    //
    let t1 = rec.binary(BinOp::Add, &v[0], &v[1]).unwrap();
    let t2 = rec.binary(BinOp::Sub, &v[1], &v[2]).unwrap();
    let t3 = rec.binary(BinOp::Sub, &v[2], &Operand::con(1.0)).unwrap();
    let t4 = rec.binary(BinOp::Sub, &Operand::con(2.0), &v[3]).unwrap();
    let t5 = rec.binary(BinOp::Add, &v[4], &Operand::con(3.0)).unwrap();
    let t6 = rec.binary(BinOp::Add, &Operand::con(4.0), &v[5]).unwrap();
    //
    let mut sum = t1;
    for t in [t2, t3, t4, t5, t6] {
        sum = rec.binary(BinOp::Add, &sum, &t).unwrap();
    }
    rec.stop( vec![sum] ).unwrap()
}
//
#[test]
fn test_chain_value() {
    let mut f = record_chain();
    // before optimization the chain is at least 6 variable producing
    // operators deep
    assert!( f.size_op() >= 2 + 6 + 6 );
    //
    let x = vec![ 2.0, 3.0, 4.0, 5.0, 6.0, 7.0 ];
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &x, &mut taylor, false).unwrap();
    assert_eq!( y, vec![ 24.0 ] );
}
//
#[test]
fn test_chain_fuses_to_one_csum() {
    let f   = record_chain();
    let mut opt = f.optimize("").unwrap();
    //
    // exactly one cumulative sum and no other arithmetic
    let csum : Vec<(u8, Vec<u32>)> = opt.op_sequence().into_iter()
        .filter( |(op, _)| *op == CSUM_OP )
        .collect();
    assert_eq!( csum.len(), 1 );
    // begin, six independents, the sum, end
    assert_eq!( opt.size_op(), 9 );
    //
    // x0 once, x1 twice, x2 once as addend; x2 once and x3 once as
    // subtrahend; net constant offset -1 + 2 + 3 + 4 = 8
    let (_, arg) = &csum[0];
    let n_add = arg[0] as usize;
    let n_sub = arg[1] as usize;
    assert_eq!( n_add, 6 );
    assert_eq!( n_sub, 2 );
    let mut add = arg[3 .. 3 + n_add].to_vec();
    let mut sub = arg[3 + n_add .. 3 + n_add + n_sub].to_vec();
    add.sort();
    sub.sort();
    assert_eq!( add, vec![ 1, 2, 2, 3, 5, 6 ] );
    assert_eq!( sub, vec![ 3, 4 ] );
    //
    let x = vec![ 2.0, 3.0, 4.0, 5.0, 6.0, 7.0 ];
    let mut taylor = opt.new_taylor(0);
    let y = opt.forward(0, 0, &x, &mut taylor, false).unwrap();
    assert_eq!( y, vec![ 24.0 ] );
    //
    // derivative through the fused sum
    let g = opt.reverse(0, &[1.0], &taylor, false).unwrap();
    assert_eq!( g, vec![ 1.0, 2.0, 0.0, -1.0, 1.0, 1.0 ] );
}
//
#[test]
fn test_no_cumulative_sum_option() {
    let f   = record_chain();
    let mut opt = f.optimize("no_cumulative_sum_op").unwrap();
    let any_csum = opt.op_sequence().iter()
        .any( |(op, _)| *op == CSUM_OP );
    assert!( ! any_csum );
    //
    let x = vec![ 2.0, 3.0, 4.0, 5.0, 6.0, 7.0 ];
    let mut taylor = opt.new_taylor(0);
    let y = opt.forward(0, 0, &x, &mut taylor, false).unwrap();
    assert_eq!( y, vec![ 24.0 ] );
}
