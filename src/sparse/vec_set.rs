// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! An append only vector of sets specialized for sparsity calculations.
//! : [parent module](super)
//
/// The sets hold usize elements in increasing order and are identified
/// by usize values. Once created a set is never modified; a union
/// creates a new set, except that a union equal to one of its operands
/// reuses the operand's identifier so long chains of unions do not
/// copy their elements over and over.
pub struct VecSet {
    //
    /// per set: offset of its first element in data
    start : Vec<usize>,
    //
    /// per set: offset one past its last element in data
    end   : Vec<usize>,
    //
    /// the elements of all the sets
    data  : Vec<usize>,
}
//
impl VecSet {
    //
    // VecSet::new
    pub fn new() -> Self {
        Self { start : Vec::new(), end : Vec::new(), data : Vec::new() }
    }
    //
    // VecSet.empty
    /// create a set with no elements
    pub fn empty(&mut self) -> usize {
        let target = self.start.len();
        self.start.push( self.data.len() );
        self.end.push( self.data.len() );
        target
    }
    //
    // VecSet.singleton
    /// create a set with one element
    ///
    /// # Example
    /// ```
    /// let mut vs  = adtape::sparse::VecSet::new();
    /// let target  = vs.singleton(3);
    /// assert_eq!( vs.get(target), &[3] );
    /// ```
    pub fn singleton(&mut self, element : usize) -> usize {
        let target = self.start.len();
        self.start.push( self.data.len() );
        self.data.push( element );
        self.end.push( self.data.len() );
        target
    }
    //
    // VecSet.get
    /// the elements of one set, in increasing order
    pub fn get(&self, id_set : usize) -> &[usize] {
        &self.data[ self.start[id_set] .. self.end[id_set] ]
    }
    //
    // VecSet.n_element
    /// total number of elements used to represent all the sets
    pub fn n_element(&self) -> usize {
        self.data.len()
    }
    //
    // VecSet.union
    /// Create the union of a list of sets. If the result equals one of
    /// the operands, that operand's identifier is returned and no new
    /// set is created.
    ///
    /// # Example
    /// ```
    /// let mut vs   = adtape::sparse::VecSet::new();
    /// let id_2     = vs.singleton(2);
    /// let id_3     = vs.singleton(3);
    /// let id_union = vs.union( &[id_2, id_3] );
    /// assert_eq!( vs.get(id_union), &[2, 3] );
    /// //
    /// // a union equal to an operand reuses its identifier
    /// let id_again = vs.union( &[id_union, id_3] );
    /// assert_eq!( id_again, id_union );
    /// ```
    pub fn union(&mut self, sub_sets : &[usize]) -> usize {
        //
        // operands, skipping duplicates and empty sets
        let mut arg : Vec<usize> = Vec::new();
        for id_set in sub_sets {
            let id_set = *id_set;
            debug_assert!( id_set < self.start.len() );
            if self.start[id_set] < self.end[id_set]
                && ! arg.contains( &id_set )
            {
                arg.push( id_set );
            }
        }
        match arg.len() {
            0 => return self.empty(),
            1 => return arg[0],
            _ => {}
        }
        //
        // merged
        let mut merged : Vec<usize> = Vec::new();
        let mut cursor : Vec<usize> =
            arg.iter().map( |id| self.start[*id] ).collect();
        loop {
            //
            // next
            let mut next = usize::MAX;
            for i in 0 .. arg.len() {
                if cursor[i] < self.end[ arg[i] ] {
                    next = next.min( self.data[ cursor[i] ] );
                }
            }
            if next == usize::MAX {
                break;
            }
            merged.push( next );
            for i in 0 .. arg.len() {
                if cursor[i] < self.end[ arg[i] ]
                    && self.data[ cursor[i] ] == next
                {
                    cursor[i] += 1;
                }
            }
        }
        //
        // result equal to an operand: reuse that operand
        for id_set in arg.iter() {
            if self.get(*id_set) == merged.as_slice() {
                return *id_set;
            }
        }
        //
        let target = self.start.len();
        self.start.push( self.data.len() );
        self.data.extend_from_slice( &merged );
        self.end.push( self.data.len() );
        target
    }
}
//
impl Default for VecSet {
    fn default() -> Self { Self::new() }
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::VecSet;
    //
    #[test]
    fn test_union() {
        let mut vs = VecSet::new();
        let id_e   = vs.empty();
        let id_1   = vs.singleton(1);
        let id_4   = vs.singleton(4);
        let id_2   = vs.singleton(2);
        //
        let id_124 = vs.union( &[id_1, id_2, id_4, id_e] );
        assert_eq!( vs.get(id_124), &[1, 2, 4] );
        //
        // union with the empty set only
        assert_eq!( vs.union( &[id_e, id_1] ), id_1 );
        //
        // union equal to one operand
        let id_12 = vs.union( &[id_1, id_2] );
        assert_eq!( vs.union( &[id_12, id_124] ), id_124 );
    }
}
