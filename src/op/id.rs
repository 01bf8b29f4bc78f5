// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
//! Define operator identifiers as `pub u8` constants
//!
//! The numeric value of each identifier is part of the serialized tape
//! layout; new operators may only be added at the end of the list.
//!
//! Link to [parent module](super)
//
/// Sets all the operator identifier values
macro_rules! set_operator_ids {
    //
    // first match
    (   $( #[$doc:meta] )+ $name:ident,
        $( $( #[$docs:meta] )+ $names:ident, )*
    ) => {
        $( #[$doc] )+
        pub const $name : u8 = 0;
        set_operator_ids!(
            @ $name,
            $( $( #[$docs] )+ $names, )*
        );
    };
    //
    // recursive match
    (
        @ $previous:ident,
        $( #[$doc:meta] )+ $name:ident,
        $( $( #[$docs:meta] )+ $names:ident, )*
    ) => {
        $( #[$doc] )+
        pub const $name : u8 = $previous + 1u8;
        set_operator_ids!(
            @ $name,
            $( $( #[$docs] )+ $names, )*
        );
    };
    //
    // last recursive match
    (@ $index:expr,) => { }
}

// Public u8 constants for each operator.
// See the test at the end of mod.rs that checks that every operator has a
// different name. This ensures that the number of operators is less than
// u8::MAX.
set_operator_ids!(
    //
    // markers and parameters
    /// first operator on every tape; variable index 0 is reserved for it
    BEGIN_OP,
    /// last operator on every tape
    END_OP,
    /// independent variable declaration
    INV_OP,
    /// promote a parameter to a variable slot
    PAR_OP,
    /// discrete function of one variable; derivative identically zero
    DIS_OP,
    //
    // ADD
    /// variable + variable
    ADD_VV_OP,
    /// parameter + variable
    ADD_PV_OP,
    //
    // SUB
    /// variable - variable
    SUB_VV_OP,
    /// parameter - variable
    SUB_PV_OP,
    /// variable - parameter
    SUB_VP_OP,
    //
    // MUL
    /// variable * variable
    MUL_VV_OP,
    /// parameter * variable
    MUL_PV_OP,
    //
    // DIV
    /// variable / variable
    DIV_VV_OP,
    /// parameter / variable
    DIV_PV_OP,
    /// variable / parameter
    DIV_VP_OP,
    //
    // ZMUL
    /// absolute zero product, variable * variable
    ZMUL_VV_OP,
    /// absolute zero product, parameter * variable
    ZMUL_PV_OP,
    /// absolute zero product, variable * parameter
    ZMUL_VP_OP,
    //
    // POW
    /// variable ^ variable as the triple log, mul, exp (three results)
    POW_VV_OP,
    /// parameter ^ variable as the triple log, mul, exp (three results)
    POW_PV_OP,
    /// variable ^ parameter as the triple log, mul, exp (three results)
    POW_VP_OP,
    //
    // unary, one result
    /// - variable
    NEG_OP,
    /// absolute value
    ABS_OP,
    /// sign function in {-1, 0, +1}
    SIGN_OP,
    /// square root
    SQRT_OP,
    /// exponential
    EXP_OP,
    /// exp(x) - 1
    EXPM1_OP,
    /// natural logarithm
    LOG_OP,
    /// log(1 + x)
    LOG1P_OP,
    //
    // unary, two results (companion first, primary second)
    /// sine; companion cosine
    SIN_OP,
    /// cosine; companion sine
    COS_OP,
    /// hyperbolic sine; companion hyperbolic cosine
    SINH_OP,
    /// hyperbolic cosine; companion hyperbolic sine
    COSH_OP,
    /// tangent; companion tangent squared
    TAN_OP,
    /// hyperbolic tangent; companion tanh squared
    TANH_OP,
    /// arcsine; companion sqrt(1 - x * x)
    ASIN_OP,
    /// arccosine; companion sqrt(1 - x * x)
    ACOS_OP,
    /// arctangent; companion 1 + x * x
    ATAN_OP,
    //
    // unary, three results (companions -x*x and exp(-x*x), then primary)
    /// error function
    ERF_OP,
    /// complementary error function
    ERFC_OP,
    //
    // conditionals and comparisons
    /// conditional expression \[rel, mask, left, right, if_true, if_false\]
    CEXP_OP,
    /// comparison that held at record time \[rel, mask, left, right\]
    COM_OP,
    /// conditional skip
    /// \[rel, mask, left, right, n_true, n_false, true ops, false ops, total\]
    CSKIP_OP,
    //
    // summation
    /// cumulative sum
    /// \[n_add, n_sub, offset par, addends, subtrahends, total\]
    CSUM_OP,
    //
    // dynamic vectors
    /// load with parameter index \[vecad offset, par index, load id\]
    LDP_OP,
    /// load with variable index \[vecad offset, var index, load id\]
    LDV_OP,
    /// store parameter at parameter index \[vecad offset, index, value\]
    STPP_OP,
    /// store variable at parameter index \[vecad offset, index, value\]
    STPV_OP,
    /// store parameter at variable index \[vecad offset, index, value\]
    STVP_OP,
    /// store variable at variable index \[vecad offset, index, value\]
    STVV_OP,
    //
    // print
    /// print a label then a parameter value \[text offset, par index\]
    PRIP_OP,
    /// print a label then a variable value \[text offset, var index\]
    PRIV_OP,
    //
    // atomic function call block
    /// open and close an atomic call \[atom index, call id, n, m\]
    AFUN_OP,
    /// parameter argument inside an atomic call block
    FUNAP_OP,
    /// variable argument inside an atomic call block
    FUNAV_OP,
    /// parameter result inside an atomic call block
    FUNRP_OP,
    /// variable result inside an atomic call block
    FUNRV_OP,
    //
    /// number of valid operator ids
    NUMBER_OP,
);
