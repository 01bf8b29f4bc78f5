// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Boundary behaviors and typed failures at the engine boundary.
//
use std::sync::LazyLock;
//
use adtape::{Recorder, Operand, Error, register_discrete};
use adtape::record::{BinOp, UnOp};
//
type V = f64;
//
#[test]
fn test_abort_op_index() {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(2).unwrap();
    let v0 = Operand::Var( x[0] );
    let v1 = Operand::Var( x[1] );
    //
    // begin is operator 0, independents are 1 and 2, the add is 3
    rec.set_abort_op_index(4);
    let a = rec.binary(BinOp::Add, &v0, &v1).unwrap();
    match rec.binary(BinOp::Mul, &a, &v1) {
        Err( Error::AbortOpIndex { op_index } ) => {
            assert_eq!( op_index, 4 );
        }
        other => panic!( "expected abort, got {other:?}" ),
    }
}
//
#[test]
fn test_log_of_zero() {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(1).unwrap();
    let y = rec.unary(UnOp::Log, &Operand::Var(x[0])).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    let mut taylor = f.new_taylor(0);
    match f.forward(0, 0, &[0.0], &mut taylor, false) {
        Err( Error::NumericDomain { op_index, .. } ) => {
            // begin, the independent, then the log
            assert_eq!( op_index, 2 );
        }
        other => panic!( "expected a domain error, got {other:?}" ),
    }
    // a negative argument is not a typed failure; nan propagates
    let y = f.forward(0, 0, &[-1.0], &mut taylor, false).unwrap();
    assert!( y[0].is_nan() );
}
//
#[test]
fn test_sqrt_zero_higher_order() {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(1).unwrap();
    let y = rec.unary(UnOp::Sqrt, &Operand::Var(x[0])).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    let mut taylor = f.new_taylor(1);
    let y0 = f.forward(0, 0, &[0.0], &mut taylor, false).unwrap();
    assert_eq!( y0[0], 0.0 );
    assert!( matches!(
        f.forward(1, 1, &[1.0], &mut taylor, false),
        Err( Error::NumericDomain { .. } )
    ) );
}
//
#[test]
fn test_abs_at_zero() {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(1).unwrap();
    let y = rec.unary(UnOp::Abs, &Operand::Var(x[0])).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    // all orders above zero vanish at the kink
    let mut taylor = f.new_taylor(2);
    let y0 = f.forward(0, 0, &[0.0], &mut taylor, false).unwrap();
    let y1 = f.forward(1, 1, &[1.0], &mut taylor, false).unwrap();
    let y2 = f.forward(2, 2, &[1.0], &mut taylor, false).unwrap();
    assert_eq!( y0[0], 0.0 );
    assert_eq!( y1[0], 0.0 );
    assert_eq!( y2[0], 0.0 );
}
//
// HALF
static HALF : LazyLock<usize> = LazyLock::new( || {
    fn floor_half(x : &V) -> V { (x / 2.0).floor() }
    register_discrete::<V>( "floor_half".to_string(), floor_half )
} );
//
#[test]
fn test_discrete_zero_derivative() {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(1).unwrap();
    let h = rec.discrete( *HALF, &Operand::Var(x[0]) ).unwrap();
    let y = rec.binary(BinOp::Mul, &h, &Operand::Var(x[0])).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    let mut taylor = f.new_taylor(1);
    let y0 = f.forward(0, 0, &[7.0], &mut taylor, false).unwrap();
    assert_eq!( y0[0], 21.0 );
    //
    // the discrete factor contributes nothing to the derivative
    let y1 = f.forward(1, 1, &[1.0], &mut taylor, false).unwrap();
    assert_eq!( y1[0], 3.0 );
    let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
    assert_eq!( g[0], 3.0 );
}
//
#[test]
fn test_print_op_records() {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(1).unwrap();
    let v0 = Operand::Var( x[0] );
    rec.print( "x0 = ", &v0 ).unwrap();
    let y = rec.binary(BinOp::Mul, &v0, &v0).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    assert_eq!( f.size_text(), "x0 = ".len() + 1 );
    let mut taylor = f.new_taylor(0);
    let y0 = f.forward(0, 0, &[3.0], &mut taylor, false).unwrap();
    assert_eq!( y0[0], 9.0 );
    //
    // the optimizer can strip print operators
    let opt = f.optimize("no_print_op").unwrap();
    assert!( opt.size_op() < f.size_op() );
}
//
#[test]
fn test_storage_sizes() {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(2).unwrap();
    let y = rec.binary(
        BinOp::Mul, &Operand::Var(x[0]), &Operand::Var(x[1]),
    ).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    assert_eq!( f.size_ind(), 2 );
    assert_eq!( f.size_dep(), 1 );
    assert_eq!( f.size_var(), 4 );   // the reserved slot, x0, x1, y
    assert_eq!( f.size_op(),  5 );   // begin, two inv, mul, end
    assert_eq!( f.size_arg(), 2 );
    assert_eq!( f.size_random(), 0 );
    f.setup_random();
    assert!( f.size_random() > 0 );
    f.clear_random();
    assert_eq!( f.size_random(), 0 );
    assert!( f.size_op_seq() > 0 );
}
