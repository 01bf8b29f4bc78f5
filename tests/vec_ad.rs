// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Dynamic (variable indexed) vectors: a store whose index is not known
// until replay time, read back by loads at every position.
//
use adtape::{Recorder, Operand, Error};
//
type V = f64;
//
// V[0 .. m] of parameter zeros; store x1 at floor(x0); dependents are
// V[j] for every j
fn record_store_load(m : usize) -> adtape::AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(2).unwrap();
    let x0 = Operand::Var( x[0] );
    let x1 = Operand::Var( x[1] );
    //
    let zeros = vec![ Operand::con(0.0) ; m ];
    let vec   = rec.vecad( &zeros ).unwrap();
    rec.store( &vec, &x0, &x1 ).unwrap();
    //
    let mut deps = Vec::with_capacity(m);
    for j in 0 .. m {
        let y_j = rec.load( &vec, &Operand::con(j as V) ).unwrap();
        deps.push( y_j );
    }
    rec.stop( deps ).unwrap()
}
//
// check_store_load
fn check_store_load(f : &mut adtape::AdFun<V>, m : usize) {
    // the store index was not known at record time; try several
    for index in 0 .. m {
        let x = vec![ index as V + 0.25, 10.0 + index as V ];
        let mut taylor = f.new_taylor(0);
        let y = f.forward(0, 0, &x, &mut taylor, false).unwrap();
        for j in 0 .. m {
            if j == index {
                assert_eq!( y[j], 10.0 + index as V );
            } else {
                assert_eq!( y[j], 0.0 );
            }
        }
        //
        // the adjoint of the loaded element flows back to x1
        let mut w = vec![ 0.0 ; m ];
        w[index]  = 1.0;
        let g = f.reverse(0, &w, &taylor, false).unwrap();
        assert_eq!( g, vec![ 0.0, 1.0 ] );
    }
}
//
#[test]
fn test_store_then_load() {
    let m     = 4;
    let mut f = record_store_load(m);
    check_store_load( &mut f, m );
}
//
#[test]
fn test_store_then_load_optimized() {
    let m       = 4;
    let f       = record_store_load(m);
    let mut opt = f.optimize("").unwrap();
    check_store_load( &mut opt, m );
}
//
#[test]
fn test_load_before_store() {
    // a load that happens before the store sees the initial parameters
    let mut rec : Recorder<V> = Recorder::new();
    let x     = rec.independent(2).unwrap();
    let init  = vec![ Operand::con(7.0), Operand::con(8.0) ];
    let vec   = rec.vecad( &init ).unwrap();
    let early = rec.load( &vec, &Operand::con(0.0) ).unwrap();
    rec.store( &vec, &Operand::con(0.0), &Operand::Var(x[0]) ).unwrap();
    let late  = rec.load( &vec, &Operand::con(0.0) ).unwrap();
    let mut f = rec.stop( vec![early, late] ).unwrap();
    //
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &[3.5, 0.0], &mut taylor, false).unwrap();
    assert_eq!( y, vec![ 7.0, 3.5 ] );
}
//
#[test]
fn test_index_out_of_range() {
    let mut f = record_store_load(3);
    let mut taylor = f.new_taylor(0);
    // floor(5.5) = 5 is past the end of the vector
    let result = f.forward(0, 0, &[5.5, 1.0], &mut taylor, false);
    match result {
        Err( Error::VecAdIndexOutOfRange { index, length, .. } ) => {
            assert_eq!( index, 5 );
            assert_eq!( length, 3 );
        }
        other => panic!( "expected an index range error, got {other:?}" ),
    }
}
