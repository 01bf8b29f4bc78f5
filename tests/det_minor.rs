// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Gradient of the determinant of a 4 by 4 matrix computed by expansion
// by minors, before and after tape optimization.
//
use adtape::{Recorder, Operand};
use adtape::record::BinOp;
//
type V = f64;
//
// det_of_minor
// determinant of the minor with the given rows and columns, by
// expansion along the first listed row
fn det_of_minor(
    rec  : &mut Recorder<V>,
    a    : &[ Operand<V> ],
    n    : usize,
    rows : &[usize],
    cols : &[usize],
) -> Operand<V> {
    if rows.len() == 1 {
        return a[ rows[0] * n + cols[0] ].clone();
    }
    let mut result : Operand<V> = Operand::con(0.0);
    let sub_rows : Vec<usize> = rows[1 ..].to_vec();
    for (k, col) in cols.iter().enumerate() {
        let mut sub_cols = cols.to_vec();
        sub_cols.remove(k);
        let minor = det_of_minor(rec, a, n, &sub_rows, &sub_cols);
        let term  = rec.binary(
            BinOp::Mul, &a[ rows[0] * n + col ], &minor
        ).unwrap();
        result = if k % 2 == 0 {
            rec.binary(BinOp::Add, &result, &term).unwrap()
        } else {
            rec.binary(BinOp::Sub, &result, &term).unwrap()
        };
    }
    result
}
//
// record_det
fn record_det(n : usize) -> adtape::AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(n * n).unwrap();
    let a : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    let rows : Vec<usize> = (0 .. n).collect();
    let cols : Vec<usize> = (0 .. n).collect();
    let det  = det_of_minor(&mut rec, &a, n, &rows, &cols);
    rec.stop( vec![det] ).unwrap()
}
//
// identity
fn identity(n : usize) -> Vec<V> {
    let mut x = vec![ 0.0 ; n * n ];
    for i in 0 .. n {
        x[ i * n + i ] = 1.0;
    }
    x
}
//
#[test]
fn test_det_identity_gradient() {
    let n      = 4;
    let mut f  = record_det(n);
    let x      = identity(n);
    //
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &x, &mut taylor, false).unwrap();
    assert_eq!( y, vec![ 1.0 ] );
    //
    // the gradient of det at the identity is the cofactor matrix of the
    // identity, which is the identity
    let g = f.reverse(0, &[1.0], &taylor, false).unwrap();
    assert_eq!( g, identity(n) );
    //
    // the optimized tape must match componentwise
    let mut opt = f.optimize("").unwrap();
    assert!( opt.size_op() <= f.size_op() );
    let mut taylor = opt.new_taylor(0);
    let y = opt.forward(0, 0, &x, &mut taylor, false).unwrap();
    assert_eq!( y, vec![ 1.0 ] );
    let g = opt.reverse(0, &[1.0], &taylor, false).unwrap();
    assert_eq!( g, identity(n) );
}
//
#[test]
fn test_det_general_point() {
    let n     = 3;
    let mut f = record_det(n);
    let x     = vec![ 2.0, -1.0, 0.5, 3.0, 4.0, -2.0, 1.0, 0.0, 5.0 ];
    //
    // reference value by the same expansion in plain arithmetic
    fn det3(a : &[V]) -> V {
        a[0] * (a[4] * a[8] - a[5] * a[7])
            - a[1] * (a[3] * a[8] - a[5] * a[6])
            + a[2] * (a[3] * a[7] - a[4] * a[6])
    }
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &x, &mut taylor, false).unwrap();
    assert!( (y[0] - det3(&x)).abs() < 1e-12 );
    //
    // gradient check by central differences
    let g    = f.reverse(0, &[1.0], &taylor, false).unwrap();
    let step = 1e-6;
    for j in 0 .. n * n {
        let mut xp = x.clone();
        let mut xm = x.clone();
        xp[j] += step;
        xm[j] -= step;
        let fd = ( det3(&xp) - det3(&xm) ) / (2.0 * step);
        assert!( (g[j] - fd).abs() < 1e-6, "gradient component {j}" );
    }
}
