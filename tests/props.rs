// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Property tests for the round trip laws: optimization preserves
// forward semantics and forward / reverse are dual, over randomly
// drawn evaluation points, directions, and weights.
//
use proptest::prelude::*;
//
use adtape::{Recorder, Operand, Rel, AdFun};
use adtape::record::{BinOp, UnOp};
//
type V = f64;
//
fn close(a : V, b : V) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    (a - b).abs() <= 1e-8 * ( 1.0 + a.abs() + b.abs() )
}
//
// a fixed tape rich enough to exercise branches, chains, and
// transcendentals; inputs are kept in a domain where every operator is
// smooth
fn record_rich() -> AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(4).unwrap();
    let v : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    //
    let e  = rec.unary(UnOp::Exp,  &v[0]).unwrap();
    let s  = rec.unary(UnOp::Sin,  &v[1]).unwrap();
    let t  = rec.unary(UnOp::Tanh, &v[2]).unwrap();
    let p  = rec.binary(BinOp::Mul, &e, &s).unwrap();
    let q  = rec.binary(BinOp::Div, &t, &e).unwrap();
    let c  = rec.cexp(Rel::Lt, &v[3], &Operand::con(0.0), &p, &q).unwrap();
    //
    let t1 = rec.binary(BinOp::Add, &c, &p).unwrap();
    let t2 = rec.binary(BinOp::Sub, &t1, &q).unwrap();
    let t3 = rec.binary(BinOp::Add, &t2, &v[3]).unwrap();
    let z  = rec.binary(BinOp::Zmul, &v[0], &t3).unwrap();
    //
    rec.stop( vec![z, t3] ).unwrap()
}
//
fn point() -> impl Strategy< Value = [V; 4] > {
    [
        -1.5 .. 1.5,
        -3.0 .. 3.0,
        -2.0 .. 2.0,
        -1.0 .. 1.0,
    ]
}
//
proptest! {
    //
    // optimize preserves forward semantics componentwise
    #[test]
    fn prop_optimize_preserves_forward(x in point(), dx in point()) {
        let mut f   = record_rich();
        let mut opt = f.optimize("").unwrap();
        //
        let mut t_old = f.new_taylor(1);
        let mut t_new = opt.new_taylor(1);
        let y_old = f.forward(0, 0, &x, &mut t_old, false).unwrap();
        let y_new = opt.forward(0, 0, &x, &mut t_new, false).unwrap();
        for i in 0 .. y_old.len() {
            prop_assert!( close( y_old[i], y_new[i] ) );
        }
        let d_old = f.forward(1, 1, &dx, &mut t_old, false).unwrap();
        let d_new = opt.forward(1, 1, &dx, &mut t_new, false).unwrap();
        for i in 0 .. d_old.len() {
            prop_assert!( close( d_old[i], d_new[i] ) );
        }
    }
    //
    // < w, forward_jvp(x_dot) > == < reverse(w), x_dot >
    #[test]
    fn prop_forward_reverse_dual(
        x in point(), x_dot in point(), w0 in -2.0 .. 2.0f64,
        w1 in -2.0 .. 2.0f64,
    ) {
        let mut f = record_rich();
        let mut taylor = f.new_taylor(1);
        f.forward(0, 0, &x, &mut taylor, false).unwrap();
        let y_dot = f.forward(1, 1, &x_dot, &mut taylor, false).unwrap();
        //
        let w = [ w0, w1 ];
        let g = f.reverse(0, &w, &taylor, false).unwrap();
        //
        let lhs : V = (0 .. 2).map( |i| w[i] * y_dot[i] ).sum();
        let rhs : V = (0 .. 4).map( |j| g[j] * x_dot[j] ).sum();
        prop_assert!( close( lhs, rhs ) );
    }
    //
    // serialize then deserialize replays identically
    #[test]
    fn prop_serialize_round_trip(x in point()) {
        let mut f = record_rich();
        let bytes = f.serialize();
        let mut g = AdFun::<V>::deserialize( &bytes ).unwrap();
        //
        let mut tf = f.new_taylor(0);
        let mut tg = g.new_taylor(0);
        let yf = f.forward(0, 0, &x, &mut tf, false).unwrap();
        let yg = g.forward(0, 0, &x, &mut tg, false).unwrap();
        prop_assert_eq!( yf, yg );
    }
}
