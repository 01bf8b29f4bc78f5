// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// An atomic matrix multiply C = A * B with A 2 by 3 and B 3 by 2:
// values, derivatives, and the matrix multiply sparsity structure
// through both sparsity sweeps.
//
use std::sync::LazyLock;
//
use adtape::{
    AdType, AtomEval, IndexT, Operand, Pattern, PatternRep, Recorder,
    register_atom,
};
//
type V = f64;
//
const NR : usize = 2;  // rows of A and C
const NK : usize = 3;  // columns of A, rows of B
const NC : usize = 2;  // columns of B and C
const N  : usize = NR * NK + NK * NC;  // 12 arguments
const M  : usize = NR * NC;            //  4 results
//
// argument layout: vec(A) row major, then vec(B) row major
fn a_index(i : usize, k : usize) -> usize { i * NK + k }
fn b_index(k : usize, j : usize) -> usize { NR * NK + k * NC + j }
//
// mat_mul_type
fn mat_mul_type(_call_id : IndexT, type_x : &[AdType]) -> Vec<AdType> {
    let mut type_y = Vec::with_capacity(M);
    for i in 0 .. NR {
        for j in 0 .. NC {
            let mut ty = AdType::Constant;
            for k in 0 .. NK {
                ty = ty.max( type_x[ a_index(i, k) ] );
                ty = ty.max( type_x[ b_index(k, j) ] );
            }
            type_y.push( ty );
        }
    }
    type_y
}
//
// mat_mul_forward
// Taylor coefficients of C = A * B by coefficient convolution
fn mat_mul_forward(
    _call_id : IndexT, order_low : usize, order_up : usize,
    _type_x : &[AdType], select_y : &[bool],
    tx : &[V], ty : &mut [V],
) -> bool {
    let n_col = order_up + 1;
    for i in 0 .. NR {
        for j in 0 .. NC {
            let y = i * NC + j;
            if ! select_y[y] {
                continue;
            }
            for order in order_low ..= order_up {
                let mut sum = 0.0;
                for k in 0 .. NK {
                    for d in 0 ..= order {
                        sum += tx[ a_index(i, k) * n_col + d ]
                             * tx[ b_index(k, j) * n_col + (order - d) ];
                    }
                }
                ty[ y * n_col + order ] = sum;
            }
        }
    }
    true
}
//
// mat_mul_reverse
fn mat_mul_reverse(
    _call_id : IndexT, order_up : usize,
    tx : &[V], _ty : &[V], px : &mut [V], py : &[V],
) -> bool {
    let n_col = order_up + 1;
    for i in 0 .. NR {
        for j in 0 .. NC {
            let y = i * NC + j;
            for order in 0 ..= order_up {
                let w = py[ y * n_col + order ];
                for k in 0 .. NK {
                    for d in 0 ..= order {
                        px[ a_index(i, k) * n_col + d ] +=
                            w * tx[ b_index(k, j) * n_col + (order - d) ];
                        px[ b_index(k, j) * n_col + (order - d) ] +=
                            w * tx[ a_index(i, k) * n_col + d ];
                    }
                }
            }
        }
    }
    true
}
//
// mat_mul_jac_sparsity
// C[i][j] depends on row i of A and column j of B
fn mat_mul_jac_sparsity(
    _call_id : IndexT, _dependency : bool,
    _select_x : &[bool], _select_y : &[bool],
) -> Vec<[usize; 2]> {
    let mut pattern = Vec::new();
    for i in 0 .. NR {
        for j in 0 .. NC {
            let y = i * NC + j;
            for k in 0 .. NK {
                pattern.push( [ y, a_index(i, k) ] );
                pattern.push( [ y, b_index(k, j) ] );
            }
        }
    }
    pattern
}
//
// MAT_MUL
static MAT_MUL : LazyLock<usize> = LazyLock::new( || {
    register_atom( AtomEval::<V> {
        name         : "mat_mul_2_3_2".to_string(),
        for_type     : mat_mul_type,
        forward      : mat_mul_forward,
        reverse      : Some( mat_mul_reverse ),
        jac_sparsity : Some( mat_mul_jac_sparsity ),
        hes_sparsity : None,
        rev_depend   : None,
    } )
} );
//
// record_mat_mul
fn record_mat_mul() -> adtape::AdFun<V> {
    let mut rec : Recorder<V> = Recorder::new();
    let x = rec.independent(N).unwrap();
    let args : Vec< Operand<V> > =
        x.iter().map( |i| Operand::Var(*i) ).collect();
    let c = rec.call( *MAT_MUL, 0, &args ).unwrap();
    rec.stop( c ).unwrap()
}
//
// the expected matrix multiply structure
fn expected(i : usize, j : usize) -> bool {
    let row = i / NC;
    let col = i % NC;
    if j < NR * NK {
        j / NK == row
    } else {
        ( j - NR * NK ) % NC == col
    }
}
//
#[test]
fn test_values_and_derivative() {
    let mut f = record_mat_mul();
    let a = [ 1.0, 2.0, 3.0, 4.0, 5.0, 6.0 ];
    let b = [ 7.0, 8.0, 9.0, 10.0, 11.0, 12.0 ];
    let x : Vec<V> = a.iter().chain( b.iter() ).cloned().collect();
    //
    let mut taylor = f.new_taylor(0);
    let y = f.forward(0, 0, &x, &mut taylor, false).unwrap();
    // C = [ [58, 64], [139, 154] ]
    assert_eq!( y, vec![ 58.0, 64.0, 139.0, 154.0 ] );
    //
    // d C[0][0] / d x : row 0 of A gets B column 0, B column 0 gets A row 0
    let w = vec![ 1.0, 0.0, 0.0, 0.0 ];
    let g = f.reverse(0, &w, &taylor, false).unwrap();
    assert_eq!(
        g,
        vec![
            7.0, 9.0, 11.0, 0.0, 0.0, 0.0,
            1.0, 0.0, 2.0, 0.0, 3.0, 0.0,
        ]
    );
}
//
#[test]
fn test_jac_sparsity_both_directions() {
    let mut f = record_mat_mul();
    //
    for rep in [ PatternRep::Bool, PatternRep::Sets ] {
        // forward: 4 by 12 with the matrix multiply structure
        let eye     = Pattern::identity( N, rep );
        let forward = f.for_jac_sparsity( &eye, false ).unwrap();
        assert_eq!( forward.n_row(), M );
        assert_eq!( forward.n_col(), N );
        for i in 0 .. M {
            for j in 0 .. N {
                assert_eq!(
                    forward.contains(i, j), expected(i, j),
                    "forward entry ({i}, {j})"
                );
            }
        }
        //
        // reverse must agree
        let eye_m   = Pattern::identity( M, rep );
        let reverse = f.rev_jac_sparsity( &eye_m, false, false ).unwrap();
        assert_eq!( reverse.n_row(), N );
        for j in 0 .. N {
            for i in 0 .. M {
                assert_eq!(
                    reverse.contains(j, i), expected(i, j),
                    "reverse entry ({j}, {i})"
                );
            }
        }
    }
}
