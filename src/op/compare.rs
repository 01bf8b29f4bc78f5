// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Ordering relations used by comparison, conditional expression,
//! and conditional skip operators.
//!
//! Link to [parent module](super)
//!
//! * \[op::id\](crate::op::id)
//!     * COM_OP : a comparison that held when the tape was recorded
//!
//! * arg (COM_OP)
//!     * arg\[0\]:  relation code; see [Rel]
//!     * arg\[1\]:  operand mask; bit 0 (1) set means left (right)
//!       is a variable index, otherwise a parameter index
//!     * arg\[2\]:  left operand
//!     * arg\[3\]:  right operand
// ---------------------------------------------------------------------------
// use
use crate::IndexT;
use crate::base::Base;
// ---------------------------------------------------------------------------
//
// mask bits shared by COM_OP, CEXP_OP, CSKIP_OP
pub(crate) const MASK_LEFT_VAR  : IndexT = 1;
pub(crate) const MASK_RIGHT_VAR : IndexT = 2;
pub(crate) const MASK_TRUE_VAR  : IndexT = 4;
pub(crate) const MASK_FALSE_VAR : IndexT = 8;
// ---------------------------------------------------------------------------
// Rel
/// An ordering relation between two scalar values.
///
/// The numeric codes are part of the serialized tape layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rel {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
    Ne,
}
//
impl Rel {
    //
    // as_index
    /// this relation's code in the argument stream
    pub fn as_index(self) -> IndexT {
        match self {
            Rel::Lt => 0,
            Rel::Le => 1,
            Rel::Eq => 2,
            Rel::Ge => 3,
            Rel::Gt => 4,
            Rel::Ne => 5,
        }
    }
    //
    // from_index
    /// inverse of [Rel::as_index]; panics for an invalid code
    pub(crate) fn from_index(code : IndexT) -> Self {
        match code {
            0 => Rel::Lt,
            1 => Rel::Le,
            2 => Rel::Eq,
            3 => Rel::Ge,
            4 => Rel::Gt,
            5 => Rel::Ne,
            _ => panic!( "invalid relation code {code}" ),
        }
    }
    //
    // not
    /// the negation of this relation
    pub fn not(self) -> Self {
        match self {
            Rel::Lt => Rel::Ge,
            Rel::Le => Rel::Gt,
            Rel::Eq => Rel::Ne,
            Rel::Ge => Rel::Lt,
            Rel::Gt => Rel::Le,
            Rel::Ne => Rel::Eq,
        }
    }
    //
    // eval
    /// evaluate this relation on two values
    pub fn eval<B : Base>(self, left : &B, right : &B) -> bool {
        match self {
            Rel::Lt => left <  right,
            Rel::Le => left <= right,
            Rel::Eq => left == right,
            Rel::Ge => left >= right,
            Rel::Gt => left >  right,
            Rel::Ne => left != right,
        }
    }
    //
    // name
    pub fn name(self) -> &'static str {
        match self {
            Rel::Lt => "lt",
            Rel::Le => "le",
            Rel::Eq => "eq",
            Rel::Ge => "ge",
            Rel::Gt => "gt",
            Rel::Ne => "ne",
        }
    }
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::Rel;
    //
    #[test]
    fn test_not() {
        for rel in [Rel::Lt, Rel::Le, Rel::Eq, Rel::Ge, Rel::Gt, Rel::Ne] {
            let x = 1.0f64;
            let y = 2.0f64;
            assert_eq!( rel.eval(&x, &y), ! rel.not().eval(&x, &y) );
            assert_eq!( rel, Rel::from_index( rel.as_index() ) );
        }
    }
}
