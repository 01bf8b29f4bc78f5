// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Tape serialization round trips and layout guards.
//
use adtape::{Recorder, Operand, AdFun, Error, Rel};
use adtape::record::{BinOp, UnOp};
//
type V = f64;
//
fn record_sample() -> AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let d = rec.dynamic_independent( vec![ 2.0 ] ).unwrap();
    let x = rec.independent(2).unwrap();
    let v0 = Operand::Var( x[0] );
    let v1 = Operand::Var( x[1] );
    //
    let scaled = rec.binary(BinOp::Mul, &Operand::Par(d[0]), &v0).unwrap();
    let s      = rec.unary(UnOp::Sqrt, &v1).unwrap();
    let c      = rec.cexp(Rel::Gt, &v0, &v1, &scaled, &s).unwrap();
    rec.stop( vec![c] ).unwrap()
}
//
#[test]
fn test_round_trip() {
    let mut f = record_sample();
    let bytes = f.serialize();
    let mut g = AdFun::<V>::deserialize( &bytes ).unwrap();
    //
    assert_eq!( g.size_var(),  f.size_var() );
    assert_eq!( g.size_op(),   f.size_op() );
    assert_eq!( g.size_arg(),  f.size_arg() );
    assert_eq!( g.size_par(),  f.size_par() );
    assert_eq!( g.op_sequence(), f.op_sequence() );
    //
    for x in [ [3.0, 1.0], [0.5, 4.0] ] {
        let mut tf = f.new_taylor(0);
        let mut tg = g.new_taylor(0);
        let yf = f.forward(0, 0, &x, &mut tf, false).unwrap();
        let yg = g.forward(0, 0, &x, &mut tg, false).unwrap();
        assert_eq!( yf, yg );
    }
    //
    // dynamic parameters survive
    g.new_dynamic( &[ 5.0 ] ).unwrap();
    let mut tg = g.new_taylor(0);
    let y = g.forward(0, 0, &[3.0, 1.0], &mut tg, false).unwrap();
    assert_eq!( y, vec![ 15.0 ] );
}
//
#[test]
fn test_bad_magic() {
    let f = record_sample();
    let mut bytes = f.serialize();
    bytes[0] = b'x';
    match AdFun::<V>::deserialize( &bytes ) {
        Err( Error::Serialize { .. } ) => {}
        other => panic!( "expected a record error, got {:?}",
            other.map( |g| g.size_op() ) ),
    }
}
//
#[test]
fn test_wrong_base_width() {
    let f = record_sample();
    let bytes = f.serialize();
    match AdFun::<f32>::deserialize( &bytes ) {
        Err( Error::Serialize { .. } ) => {}
        other => panic!( "expected a record error, got {:?}",
            other.map( |g| g.size_op() ) ),
    }
}
//
#[test]
fn test_truncated() {
    let f = record_sample();
    let bytes = f.serialize();
    let cut = &bytes[ .. bytes.len() - 3 ];
    assert!( AdFun::<V>::deserialize( cut ).is_err() );
}
