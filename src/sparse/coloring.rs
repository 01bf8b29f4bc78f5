// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Column coloring for sparse derivative evaluation.
//!
//! Two columns may share a color when no row of the pattern contains
//! both; one forward direction per color then recovers every entry.
//! The interface is pluggable so an external coloring library can be
//! substituted for the built in greedy coloring.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
//
// Coloring
/// A column coloring strategy.
pub trait Coloring {
    //
    /// Assign a color to each of the n_col columns such that two
    /// columns appearing in the same row get different colors.
    /// `rows[i]` lists the columns present in row i, increasing.
    fn color(&self, n_col : usize, rows : &[ Vec<usize> ]) -> Vec<usize>;
}
//
// GreedyColoring
/// The built in greedy distance two coloring: columns are processed in
/// order and each takes the smallest color not used by another column
/// sharing one of its rows. For a symmetric (Hessian) pattern this is
/// stronger than a star coloring and therefore also valid for
/// symmetric recovery.
pub struct GreedyColoring;
//
impl Coloring for GreedyColoring {
    fn color(&self, n_col : usize, rows : &[ Vec<usize> ]) -> Vec<usize> {
        //
        // rows_of_col
        let mut rows_of_col : Vec< Vec<usize> > = vec![ Vec::new() ; n_col ];
        for (i, row) in rows.iter().enumerate() {
            for j in row {
                rows_of_col[*j].push( i );
            }
        }
        //
        let mut color = vec![ 0usize ; n_col ];
        let mut done  = vec![ false ; n_col ];
        for j in 0 .. n_col {
            //
            // forbidden
            let mut forbidden : Vec<usize> = Vec::new();
            for i in rows_of_col[j].iter() {
                for j2 in rows[*i].iter() {
                    if *j2 != j && done[*j2] {
                        forbidden.push( color[*j2] );
                    }
                }
            }
            let mut candidate = 0;
            while forbidden.contains( &candidate ) {
                candidate += 1;
            }
            color[j] = candidate;
            done[j]  = true;
        }
        color
    }
}
//
// n_colors
/// number of distinct colors in a coloring
pub fn n_colors(color : &[usize]) -> usize {
    match color.iter().max() {
        None      => 0,
        Some(max) => max + 1,
    }
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    //
    #[test]
    fn test_greedy() {
        // rows { {0,1}, {1,2}, {3} }: columns 0 and 2 may share a color,
        // column 1 conflicts with both, column 3 with nobody
        let rows = vec![ vec![0, 1], vec![1, 2], vec![3] ];
        let coloring = GreedyColoring;
        let color = coloring.color( 4, &rows );
        assert_ne!( color[0], color[1] );
        assert_ne!( color[1], color[2] );
        assert!( n_colors(&color) <= 3 );
        //
        // validity: no row contains two columns of equal color
        for row in rows.iter() {
            for a in 0 .. row.len() {
                for b in a + 1 .. row.len() {
                    assert_ne!( color[ row[a] ], color[ row[b] ] );
                }
            }
        }
    }
}
