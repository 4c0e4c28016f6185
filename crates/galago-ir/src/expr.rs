//! Content-addressed expression arena.
//!
//! Expressions are immutable nodes stored in a [`Context`]; structurally
//! equal nodes share a single [`ExprRef`] handle. Every constructor
//! sort-checks its operands, so a node that exists in the arena is
//! well-sorted by construction and its sort is cached alongside it.

use std::collections::HashMap;
use std::ops::Index;

use num::{BigUint, One, Zero};
use thiserror::Error;

use crate::sorts::Sort;

/// Handle to an interned expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprRef(u32);

impl ExprRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Role of a symbolic leaf within the transition system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarRole {
    State,
    Input,
    Aux,
}

/// Expression node kinds.
///
/// Comparisons (`Eq`, `Neq`, `BvUlt`, ...) are `Bool`-sorted; the
/// [`Context::to_bv1`] and [`Context::to_bool`] adapters bridge between
/// booleans and 1-bit vectors at sort boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    BvConst { value: BigUint, width: u32 },
    BoolConst(bool),
    Var { name: String, sort: Sort, role: VarRole },

    // Propositional
    Not(ExprRef),
    And(ExprRef, ExprRef),
    Or(ExprRef, ExprRef),
    Xor(ExprRef, ExprRef),
    Implies(ExprRef, ExprRef),
    Iff(ExprRef, ExprRef),

    // Bit-vector arithmetic
    BvAdd(ExprRef, ExprRef),
    BvSub(ExprRef, ExprRef),
    BvMul(ExprRef, ExprRef),
    BvUdiv(ExprRef, ExprRef),
    BvSdiv(ExprRef, ExprRef),
    BvUrem(ExprRef, ExprRef),
    BvSrem(ExprRef, ExprRef),
    BvSmod(ExprRef, ExprRef),

    // Bit-vector bitwise
    BvAnd(ExprRef, ExprRef),
    BvOr(ExprRef, ExprRef),
    BvXor(ExprRef, ExprRef),
    BvNot(ExprRef),
    BvNeg(ExprRef),

    // Shifts
    BvShl(ExprRef, ExprRef),
    BvLshr(ExprRef, ExprRef),
    BvAshr(ExprRef, ExprRef),

    // Comparisons
    BvUlt(ExprRef, ExprRef),
    BvUle(ExprRef, ExprRef),
    BvUgt(ExprRef, ExprRef),
    BvUge(ExprRef, ExprRef),
    BvSlt(ExprRef, ExprRef),
    BvSle(ExprRef, ExprRef),
    BvSgt(ExprRef, ExprRef),
    BvSge(ExprRef, ExprRef),

    // Structural
    BvConcat(ExprRef, ExprRef),
    BvExtract { hi: u32, lo: u32, value: ExprRef },
    BvZext { by: u32, value: ExprRef },
    BvSext { by: u32, value: ExprRef },

    Eq(ExprRef, ExprRef),
    Neq(ExprRef, ExprRef),
    Ite { cond: ExprRef, then_value: ExprRef, else_value: ExprRef },

    // Arrays
    ArrayRead { array: ExprRef, index: ExprRef },
    ArrayWrite { array: ExprRef, index: ExprRef, value: ExprRef },
    ArrayConst { index: Sort, value: ExprRef },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("sort mismatch: expected {expected}, found {found}")]
    SortMismatch { expected: String, found: String },
    #[error("width mismatch: {left} vs {right}")]
    WidthMismatch { left: u32, right: u32 },
    #[error("extract range {hi}:{lo} is invalid for width {width}")]
    BadExtract { hi: u32, lo: u32, width: u32 },
    #[error("constant {value} does not fit in {width} bits")]
    ConstOverflow { value: String, width: u32 },
    #[error("bit-vector width must be at least 1")]
    ZeroWidth,
}

fn sort_mismatch(expected: impl ToString, found: &Sort) -> ExprError {
    ExprError::SortMismatch {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

/// Arena owning all expression nodes of one model.
#[derive(Debug, Default, Clone)]
pub struct Context {
    nodes: Vec<Expr>,
    sorts: Vec<Sort>,
    interner: HashMap<Expr, ExprRef>,
}

impl Index<ExprRef> for Context {
    type Output = Expr;

    fn index(&self, e: ExprRef) -> &Expr {
        &self.nodes[e.index()]
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn sort_of(&self, e: ExprRef) -> &Sort {
        &self.sorts[e.index()]
    }

    fn intern(&mut self, node: Expr, sort: Sort) -> ExprRef {
        if let Some(&e) = self.interner.get(&node) {
            return e;
        }
        let e = ExprRef(self.nodes.len() as u32);
        self.interner.insert(node.clone(), e);
        self.nodes.push(node);
        self.sorts.push(sort);
        e
    }

    // --- Leaves ---------------------------------------------------------

    pub fn bv_const(&mut self, value: BigUint, width: u32) -> Result<ExprRef, ExprError> {
        if width == 0 {
            return Err(ExprError::ZeroWidth);
        }
        if value.bits() > u64::from(width) {
            return Err(ExprError::ConstOverflow {
                value: value.to_string(),
                width,
            });
        }
        Ok(self.intern(Expr::BvConst { value, width }, Sort::BitVec(width)))
    }

    pub fn bv_zero(&mut self, width: u32) -> Result<ExprRef, ExprError> {
        self.bv_const(BigUint::zero(), width)
    }

    pub fn bv_one(&mut self, width: u32) -> Result<ExprRef, ExprError> {
        self.bv_const(BigUint::one(), width)
    }

    pub fn bv_ones(&mut self, width: u32) -> Result<ExprRef, ExprError> {
        if width == 0 {
            return Err(ExprError::ZeroWidth);
        }
        let value = (BigUint::one() << width) - BigUint::one();
        self.bv_const(value, width)
    }

    pub fn bool_const(&mut self, value: bool) -> ExprRef {
        self.intern(Expr::BoolConst(value), Sort::Bool)
    }

    pub fn var(&mut self, name: &str, sort: Sort, role: VarRole) -> ExprRef {
        self.intern(
            Expr::Var {
                name: name.to_string(),
                sort: sort.clone(),
                role,
            },
            sort,
        )
    }

    // --- Sort adapters (B2BV / BV2B) ------------------------------------

    /// Adapt a boolean to a 1-bit vector (`ite(b, 1, 0)`); a 1-bit vector
    /// passes through unchanged.
    pub fn to_bv1(&mut self, e: ExprRef) -> Result<ExprRef, ExprError> {
        match self.sort_of(e).clone() {
            Sort::BitVec(1) => Ok(e),
            Sort::Bool => {
                let one = self.bv_one(1)?;
                let zero = self.bv_zero(1)?;
                self.ite(e, one, zero)
            }
            other => Err(sort_mismatch("bool or bitvec(1)", &other)),
        }
    }

    /// Adapt a 1-bit vector to a boolean (`x = 1`); a boolean passes
    /// through unchanged.
    pub fn to_bool(&mut self, e: ExprRef) -> Result<ExprRef, ExprError> {
        match self.sort_of(e).clone() {
            Sort::Bool => Ok(e),
            Sort::BitVec(1) => {
                let one = self.bv_one(1)?;
                self.eq(e, one)
            }
            other => Err(sort_mismatch("bool or bitvec(1)", &other)),
        }
    }

    // --- Propositional ---------------------------------------------------

    fn require_bool(&self, e: ExprRef) -> Result<(), ExprError> {
        match self.sort_of(e) {
            Sort::Bool => Ok(()),
            other => Err(sort_mismatch("bool", other)),
        }
    }

    fn bool_unary(
        &mut self,
        node: fn(ExprRef) -> Expr,
        a: ExprRef,
    ) -> Result<ExprRef, ExprError> {
        self.require_bool(a)?;
        Ok(self.intern(node(a), Sort::Bool))
    }

    fn bool_binary(
        &mut self,
        node: fn(ExprRef, ExprRef) -> Expr,
        a: ExprRef,
        b: ExprRef,
    ) -> Result<ExprRef, ExprError> {
        self.require_bool(a)?;
        self.require_bool(b)?;
        Ok(self.intern(node(a, b), Sort::Bool))
    }

    pub fn not(&mut self, a: ExprRef) -> Result<ExprRef, ExprError> {
        self.bool_unary(Expr::Not, a)
    }

    pub fn and(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bool_binary(Expr::And, a, b)
    }

    pub fn or(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bool_binary(Expr::Or, a, b)
    }

    pub fn xor(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bool_binary(Expr::Xor, a, b)
    }

    pub fn implies(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bool_binary(Expr::Implies, a, b)
    }

    pub fn iff(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bool_binary(Expr::Iff, a, b)
    }

    // --- Bit-vector helpers ----------------------------------------------

    fn bv_width(&self, e: ExprRef) -> Result<u32, ExprError> {
        self.sort_of(e)
            .bitvec_width()
            .ok_or_else(|| sort_mismatch("bitvec", self.sort_of(e)))
    }

    fn same_width(&self, a: ExprRef, b: ExprRef) -> Result<u32, ExprError> {
        let wa = self.bv_width(a)?;
        let wb = self.bv_width(b)?;
        if wa != wb {
            return Err(ExprError::WidthMismatch { left: wa, right: wb });
        }
        Ok(wa)
    }

    fn bv_binary(
        &mut self,
        node: fn(ExprRef, ExprRef) -> Expr,
        a: ExprRef,
        b: ExprRef,
    ) -> Result<ExprRef, ExprError> {
        let w = self.same_width(a, b)?;
        Ok(self.intern(node(a, b), Sort::BitVec(w)))
    }

    fn bv_compare(
        &mut self,
        node: fn(ExprRef, ExprRef) -> Expr,
        a: ExprRef,
        b: ExprRef,
    ) -> Result<ExprRef, ExprError> {
        self.same_width(a, b)?;
        Ok(self.intern(node(a, b), Sort::Bool))
    }

    // --- Bit-vector arithmetic -------------------------------------------

    pub fn bv_add(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvAdd, a, b)
    }

    pub fn bv_sub(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvSub, a, b)
    }

    pub fn bv_mul(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvMul, a, b)
    }

    pub fn bv_udiv(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvUdiv, a, b)
    }

    pub fn bv_sdiv(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvSdiv, a, b)
    }

    pub fn bv_urem(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvUrem, a, b)
    }

    pub fn bv_srem(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvSrem, a, b)
    }

    pub fn bv_smod(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvSmod, a, b)
    }

    // --- Bit-vector bitwise ----------------------------------------------

    pub fn bv_and(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvAnd, a, b)
    }

    pub fn bv_or(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvOr, a, b)
    }

    pub fn bv_xor(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvXor, a, b)
    }

    pub fn bv_not(&mut self, a: ExprRef) -> Result<ExprRef, ExprError> {
        let w = self.bv_width(a)?;
        Ok(self.intern(Expr::BvNot(a), Sort::BitVec(w)))
    }

    pub fn bv_neg(&mut self, a: ExprRef) -> Result<ExprRef, ExprError> {
        let w = self.bv_width(a)?;
        Ok(self.intern(Expr::BvNeg(a), Sort::BitVec(w)))
    }

    // --- Shifts ----------------------------------------------------------

    pub fn bv_shl(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvShl, a, b)
    }

    pub fn bv_lshr(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvLshr, a, b)
    }

    pub fn bv_ashr(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_binary(Expr::BvAshr, a, b)
    }

    // --- Comparisons ------------------------------------------------------

    pub fn bv_ult(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_compare(Expr::BvUlt, a, b)
    }

    pub fn bv_ule(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_compare(Expr::BvUle, a, b)
    }

    pub fn bv_ugt(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_compare(Expr::BvUgt, a, b)
    }

    pub fn bv_uge(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_compare(Expr::BvUge, a, b)
    }

    pub fn bv_slt(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_compare(Expr::BvSlt, a, b)
    }

    pub fn bv_sle(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_compare(Expr::BvSle, a, b)
    }

    pub fn bv_sgt(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_compare(Expr::BvSgt, a, b)
    }

    pub fn bv_sge(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        self.bv_compare(Expr::BvSge, a, b)
    }

    // --- Structural -------------------------------------------------------

    pub fn bv_concat(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        let wa = self.bv_width(a)?;
        let wb = self.bv_width(b)?;
        Ok(self.intern(Expr::BvConcat(a, b), Sort::BitVec(wa + wb)))
    }

    pub fn bv_extract(&mut self, value: ExprRef, hi: u32, lo: u32) -> Result<ExprRef, ExprError> {
        let w = self.bv_width(value)?;
        if hi < lo || hi >= w {
            return Err(ExprError::BadExtract { hi, lo, width: w });
        }
        Ok(self.intern(
            Expr::BvExtract { hi, lo, value },
            Sort::BitVec(hi - lo + 1),
        ))
    }

    pub fn bv_zext(&mut self, value: ExprRef, by: u32) -> Result<ExprRef, ExprError> {
        let w = self.bv_width(value)?;
        if by == 0 {
            return Ok(value);
        }
        Ok(self.intern(Expr::BvZext { by, value }, Sort::BitVec(w + by)))
    }

    pub fn bv_sext(&mut self, value: ExprRef, by: u32) -> Result<ExprRef, ExprError> {
        let w = self.bv_width(value)?;
        if by == 0 {
            return Ok(value);
        }
        Ok(self.intern(Expr::BvSext { by, value }, Sort::BitVec(w + by)))
    }

    pub fn eq(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        if self.sort_of(a) != self.sort_of(b) {
            return Err(sort_mismatch(self.sort_of(a), self.sort_of(b)));
        }
        Ok(self.intern(Expr::Eq(a, b), Sort::Bool))
    }

    pub fn neq(&mut self, a: ExprRef, b: ExprRef) -> Result<ExprRef, ExprError> {
        if self.sort_of(a) != self.sort_of(b) {
            return Err(sort_mismatch(self.sort_of(a), self.sort_of(b)));
        }
        Ok(self.intern(Expr::Neq(a, b), Sort::Bool))
    }

    pub fn ite(
        &mut self,
        cond: ExprRef,
        then_value: ExprRef,
        else_value: ExprRef,
    ) -> Result<ExprRef, ExprError> {
        self.require_bool(cond)?;
        if self.sort_of(then_value) != self.sort_of(else_value) {
            return Err(sort_mismatch(
                self.sort_of(then_value),
                self.sort_of(else_value),
            ));
        }
        let sort = self.sort_of(then_value).clone();
        Ok(self.intern(
            Expr::Ite {
                cond,
                then_value,
                else_value,
            },
            sort,
        ))
    }

    // --- Arrays -----------------------------------------------------------

    fn array_sorts(&self, array: ExprRef) -> Result<(Sort, Sort), ExprError> {
        match self.sort_of(array) {
            Sort::Array { index, element } => Ok((index.as_ref().clone(), element.as_ref().clone())),
            other => Err(sort_mismatch("array", other)),
        }
    }

    pub fn array_read(&mut self, array: ExprRef, index: ExprRef) -> Result<ExprRef, ExprError> {
        let (index_sort, element_sort) = self.array_sorts(array)?;
        if self.sort_of(index) != &index_sort {
            return Err(sort_mismatch(&index_sort, self.sort_of(index)));
        }
        Ok(self.intern(Expr::ArrayRead { array, index }, element_sort))
    }

    pub fn array_write(
        &mut self,
        array: ExprRef,
        index: ExprRef,
        value: ExprRef,
    ) -> Result<ExprRef, ExprError> {
        let (index_sort, element_sort) = self.array_sorts(array)?;
        if self.sort_of(index) != &index_sort {
            return Err(sort_mismatch(&index_sort, self.sort_of(index)));
        }
        if self.sort_of(value) != &element_sort {
            return Err(sort_mismatch(&element_sort, self.sort_of(value)));
        }
        let sort = self.sort_of(array).clone();
        Ok(self.intern(Expr::ArrayWrite { array, index, value }, sort))
    }

    /// Constant array mapping every index to `value`.
    pub fn array_const(&mut self, index: Sort, value: ExprRef) -> Result<ExprRef, ExprError> {
        let element = self.sort_of(value).clone();
        let sort = Sort::array(index.clone(), element);
        Ok(self.intern(Expr::ArrayConst { index, value }, sort))
    }

    // --- Consistency ------------------------------------------------------

    /// Recompute the sort of a node from its children, independent of the
    /// cached sort. Used by `ModelIR::validate` to check structural
    /// soundness of a whole model.
    pub fn recompute_sort(&self, e: ExprRef) -> Result<Sort, ExprError> {
        let bv = |x: ExprRef| -> Result<u32, ExprError> { self.bv_width(x) };
        let same = |a: ExprRef, b: ExprRef| -> Result<u32, ExprError> { self.same_width(a, b) };
        match &self[e] {
            Expr::BvConst { width, .. } => Ok(Sort::BitVec(*width)),
            Expr::BoolConst(_) => Ok(Sort::Bool),
            Expr::Var { sort, .. } => Ok(sort.clone()),
            Expr::Not(a) => {
                self.require_bool(*a)?;
                Ok(Sort::Bool)
            }
            Expr::And(a, b)
            | Expr::Or(a, b)
            | Expr::Xor(a, b)
            | Expr::Implies(a, b)
            | Expr::Iff(a, b) => {
                self.require_bool(*a)?;
                self.require_bool(*b)?;
                Ok(Sort::Bool)
            }
            Expr::BvAdd(a, b)
            | Expr::BvSub(a, b)
            | Expr::BvMul(a, b)
            | Expr::BvUdiv(a, b)
            | Expr::BvSdiv(a, b)
            | Expr::BvUrem(a, b)
            | Expr::BvSrem(a, b)
            | Expr::BvSmod(a, b)
            | Expr::BvAnd(a, b)
            | Expr::BvOr(a, b)
            | Expr::BvXor(a, b)
            | Expr::BvShl(a, b)
            | Expr::BvLshr(a, b)
            | Expr::BvAshr(a, b) => Ok(Sort::BitVec(same(*a, *b)?)),
            Expr::BvNot(a) | Expr::BvNeg(a) => Ok(Sort::BitVec(bv(*a)?)),
            Expr::BvUlt(a, b)
            | Expr::BvUle(a, b)
            | Expr::BvUgt(a, b)
            | Expr::BvUge(a, b)
            | Expr::BvSlt(a, b)
            | Expr::BvSle(a, b)
            | Expr::BvSgt(a, b)
            | Expr::BvSge(a, b) => {
                same(*a, *b)?;
                Ok(Sort::Bool)
            }
            Expr::BvConcat(a, b) => Ok(Sort::BitVec(bv(*a)? + bv(*b)?)),
            Expr::BvExtract { hi, lo, value } => {
                let w = bv(*value)?;
                if *hi < *lo || *hi >= w {
                    return Err(ExprError::BadExtract {
                        hi: *hi,
                        lo: *lo,
                        width: w,
                    });
                }
                Ok(Sort::BitVec(hi - lo + 1))
            }
            Expr::BvZext { by, value } | Expr::BvSext { by, value } => {
                Ok(Sort::BitVec(bv(*value)? + by))
            }
            Expr::Eq(a, b) | Expr::Neq(a, b) => {
                if self.sort_of(*a) != self.sort_of(*b) {
                    return Err(sort_mismatch(self.sort_of(*a), self.sort_of(*b)));
                }
                Ok(Sort::Bool)
            }
            Expr::Ite {
                cond,
                then_value,
                else_value,
            } => {
                self.require_bool(*cond)?;
                if self.sort_of(*then_value) != self.sort_of(*else_value) {
                    return Err(sort_mismatch(
                        self.sort_of(*then_value),
                        self.sort_of(*else_value),
                    ));
                }
                Ok(self.sort_of(*then_value).clone())
            }
            Expr::ArrayRead { array, index } => {
                let (index_sort, element_sort) = self.array_sorts(*array)?;
                if self.sort_of(*index) != &index_sort {
                    return Err(sort_mismatch(&index_sort, self.sort_of(*index)));
                }
                Ok(element_sort)
            }
            Expr::ArrayWrite { array, index, value } => {
                let (index_sort, element_sort) = self.array_sorts(*array)?;
                if self.sort_of(*index) != &index_sort {
                    return Err(sort_mismatch(&index_sort, self.sort_of(*index)));
                }
                if self.sort_of(*value) != &element_sort {
                    return Err(sort_mismatch(&element_sort, self.sort_of(*value)));
                }
                Ok(self.sort_of(*array).clone())
            }
            Expr::ArrayConst { index, value } => {
                Ok(Sort::array(index.clone(), self.sort_of(*value).clone()))
            }
        }
    }

    /// Invoke `f` for every direct child of `e`.
    pub fn for_each_child(&self, e: ExprRef, mut f: impl FnMut(ExprRef)) {
        match &self[e] {
            Expr::BvConst { .. } | Expr::BoolConst(_) | Expr::Var { .. } => {}
            Expr::Not(a) | Expr::BvNot(a) | Expr::BvNeg(a) => f(*a),
            Expr::BvExtract { value, .. }
            | Expr::BvZext { value, .. }
            | Expr::BvSext { value, .. }
            | Expr::ArrayConst { value, .. } => f(*value),
            Expr::And(a, b)
            | Expr::Or(a, b)
            | Expr::Xor(a, b)
            | Expr::Implies(a, b)
            | Expr::Iff(a, b)
            | Expr::BvAdd(a, b)
            | Expr::BvSub(a, b)
            | Expr::BvMul(a, b)
            | Expr::BvUdiv(a, b)
            | Expr::BvSdiv(a, b)
            | Expr::BvUrem(a, b)
            | Expr::BvSrem(a, b)
            | Expr::BvSmod(a, b)
            | Expr::BvAnd(a, b)
            | Expr::BvOr(a, b)
            | Expr::BvXor(a, b)
            | Expr::BvShl(a, b)
            | Expr::BvLshr(a, b)
            | Expr::BvAshr(a, b)
            | Expr::BvUlt(a, b)
            | Expr::BvUle(a, b)
            | Expr::BvUgt(a, b)
            | Expr::BvUge(a, b)
            | Expr::BvSlt(a, b)
            | Expr::BvSle(a, b)
            | Expr::BvSgt(a, b)
            | Expr::BvSge(a, b)
            | Expr::BvConcat(a, b)
            | Expr::Eq(a, b)
            | Expr::Neq(a, b) => {
                f(*a);
                f(*b);
            }
            Expr::Ite {
                cond,
                then_value,
                else_value,
            } => {
                f(*cond);
                f(*then_value);
                f(*else_value);
            }
            Expr::ArrayRead { array, index } => {
                f(*array);
                f(*index);
            }
            Expr::ArrayWrite { array, index, value } => {
                f(*array);
                f(*index);
                f(*value);
            }
        }
    }
}
