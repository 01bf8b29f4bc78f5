// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Jacobian and Hessian sparsity patterns in both representations, and
// the coloring based sparse derivative drivers.
//
use adtape::{Recorder, Operand, Rel, AdFun, Pattern, PatternRep};
use adtape::record::{BinOp, UnOp};
use adtape::sparse::coloring::GreedyColoring;
//
type V = f64;
//
fn close(a : V, b : V) -> bool {
    (a - b).abs() <= 1e-10 * ( 1.0 + a.abs() + b.abs() )
}
//
// y0 = x0 * x1,  y1 = sin(x2),  y2 = x1 + x3
fn record_simple() -> AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(4).unwrap();
    let v : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    let y0 = rec.binary(BinOp::Mul, &v[0], &v[1]).unwrap();
    let y1 = rec.unary(UnOp::Sin, &v[2]).unwrap();
    let y2 = rec.binary(BinOp::Add, &v[1], &v[3]).unwrap();
    rec.stop( vec![y0, y1, y2] ).unwrap()
}
//
// the analytic Jacobian nonzeros of record_simple
fn simple_jacobian() -> Vec< Vec<usize> > {
    vec![ vec![0, 1], vec![2], vec![1, 3] ]
}
//
#[test]
fn test_jacobian_pattern_both_reps() {
    let mut f = record_simple();
    for rep in [ PatternRep::Bool, PatternRep::Sets ] {
        let eye = Pattern::identity(4, rep);
        let pattern = f.for_jac_sparsity( &eye, false ).unwrap();
        for (i, row) in simple_jacobian().iter().enumerate() {
            assert_eq!( &pattern.row(i), row, "row {i}" );
        }
        //
        let eye3 = Pattern::identity(3, rep);
        let reverse = f.rev_jac_sparsity( &eye3, false, false ).unwrap();
        for (i, row) in simple_jacobian().iter().enumerate() {
            for j in row {
                assert!( reverse.contains(*j, i) );
            }
        }
    }
}
//
#[test]
fn test_jacobian_conservative() {
    // computed patterns contain every analytic nonzero (no false
    // negatives) for a tape with branches and sums
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(3).unwrap();
    let v : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    let a = rec.binary(BinOp::Mul, &v[0], &v[1]).unwrap();
    let b = rec.cexp(Rel::Lt, &v[0], &v[2], &a, &v[2]).unwrap();
    let c = rec.binary(BinOp::Add, &b, &v[2]).unwrap();
    let mut f = rec.stop( vec![c] ).unwrap();
    //
    let eye = Pattern::identity(3, PatternRep::Sets);
    let pattern = f.for_jac_sparsity( &eye, false ).unwrap();
    //
    // finite difference probe at points on both branches
    for x0 in [ 0.5, 3.0 ] {
        let x = [ x0, 1.25, 2.0 ];
        let mut taylor = f.new_taylor(0);
        let y = f.forward(0, 0, &x, &mut taylor, false).unwrap();
        for j in 0 .. 3 {
            let mut xp = x;
            xp[j] += 1e-6;
            let mut tp = f.new_taylor(0);
            let yp = f.forward(0, 0, &xp, &mut tp, false).unwrap();
            if (yp[0] - y[0]).abs() > 1e-12 {
                assert!( pattern.contains(0, j),
                    "missing nonzero at column {j}"
                );
            }
        }
    }
}
//
#[test]
fn test_hessian_pattern() {
    // y = x0 * x1 + sin(x2): the Hessian nonzeros are (0,1), (1,0),
    // and (2,2)
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(3).unwrap();
    let v : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    let p = rec.binary(BinOp::Mul, &v[0], &v[1]).unwrap();
    let s = rec.unary(UnOp::Sin, &v[2]).unwrap();
    let y = rec.binary(BinOp::Add, &p, &s).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    for rep in [ PatternRep::Bool, PatternRep::Sets ] {
        let eye = Pattern::identity(3, rep);
        f.for_jac_sparsity( &eye, false ).unwrap();
        let hes = f.rev_hes_sparsity( &[true], rep, false ).unwrap();
        //
        assert!( hes.contains(0, 1) );
        assert!( hes.contains(1, 0) );
        assert!( hes.contains(2, 2) );
        assert!( ! hes.contains(0, 0) );
        assert!( ! hes.contains(1, 1) );
        assert!( ! hes.contains(0, 2) );
        assert!( ! hes.contains(3 - 1, 0) );
    }
}
//
#[test]
fn test_sparse_jac_driver() {
    let mut f = record_simple();
    let eye = Pattern::identity(4, PatternRep::Sets);
    let pattern = f.for_jac_sparsity( &eye, false ).unwrap();
    //
    let x = [ 1.5, 2.0, 0.5, 3.0 ];
    let triples = f.sparse_jac( &x, &pattern, &GreedyColoring, false )
        .unwrap();
    //
    for (i, j, value) in triples {
        let expect = match (i, j) {
            (0, 0) => x[1],
            (0, 1) => x[0],
            (1, 2) => x[2].cos(),
            (2, 1) => 1.0,
            (2, 3) => 1.0,
            _      => panic!( "unexpected entry ({i}, {j})" ),
        };
        assert!( close(value, expect), "entry ({i}, {j})" );
    }
}
//
#[test]
fn test_sparse_hes_driver() {
    // y = x0 * x1 + x2 * x2 * x2
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(3).unwrap();
    let v : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    let p  = rec.binary(BinOp::Mul, &v[0], &v[1]).unwrap();
    let s  = rec.binary(BinOp::Mul, &v[2], &v[2]).unwrap();
    let c  = rec.binary(BinOp::Mul, &s, &v[2]).unwrap();
    let y  = rec.binary(BinOp::Add, &p, &c).unwrap();
    let mut f = rec.stop( vec![y] ).unwrap();
    //
    let eye = Pattern::identity(3, PatternRep::Sets);
    f.for_jac_sparsity( &eye, false ).unwrap();
    let hes_pattern =
        f.rev_hes_sparsity( &[true], PatternRep::Sets, false ).unwrap();
    assert!( hes_pattern.contains(2, 2) );
    //
    let x = [ 1.5, 2.0, 0.5 ];
    let triples = f.sparse_hes(
        &x, &[1.0], &hes_pattern, &GreedyColoring, false
    ).unwrap();
    for (j1, j2, value) in triples {
        let expect = match (j1, j2) {
            (0, 1) | (1, 0) => 1.0,
            (2, 2)          => 6.0 * x[2],
            _ => panic!( "unexpected entry ({j1}, {j2})" ),
        };
        assert!( close(value, expect), "entry ({j1}, {j2})" );
    }
}
