//! Property tests for the content-addressed arena.

use galago_ir::expr::{Context, VarRole};
use galago_ir::sorts::Sort;
use num::BigUint;
use proptest::prelude::*;

proptest! {
    #[test]
    fn equal_constants_share_one_handle(v in 0u64..1024, w in 10u32..=64) {
        let mut ctx = Context::new();
        let a = ctx.bv_const(BigUint::from(v), w).unwrap();
        let b = ctx.bv_const(BigUint::from(v), w).unwrap();
        prop_assert_eq!(a, b);
        prop_assert_eq!(ctx.sort_of(a), &Sort::BitVec(w));
        prop_assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn rebuilding_a_tree_allocates_nothing_new(ops in proptest::collection::vec(0u8..4, 1..24)) {
        let mut ctx = Context::new();
        let x = ctx.var("x", Sort::BitVec(8), VarRole::Input);
        let y = ctx.var("y", Sort::BitVec(8), VarRole::Input);
        let build = |ctx: &mut Context| {
            let mut acc = x;
            for op in &ops {
                acc = match op {
                    0 => ctx.bv_add(acc, y),
                    1 => ctx.bv_sub(acc, y),
                    2 => ctx.bv_and(acc, y),
                    _ => ctx.bv_xor(acc, y),
                }
                .unwrap();
            }
            acc
        };
        let first = build(&mut ctx);
        let nodes_after_first = ctx.len();
        let second = build(&mut ctx);
        prop_assert_eq!(first, second);
        prop_assert_eq!(ctx.len(), nodes_after_first);
    }

    #[test]
    fn recomputed_sorts_match_cached_sorts(widths in proptest::collection::vec(1u32..16, 1..8)) {
        let mut ctx = Context::new();
        let mut exprs = Vec::new();
        for (i, w) in widths.iter().enumerate() {
            let v = ctx.var(&format!("v{i}"), Sort::BitVec(*w), VarRole::Input);
            let doubled = ctx.bv_add(v, v).unwrap();
            let zero = ctx.bv_zero(*w).unwrap();
            let is_zero = ctx.eq(doubled, zero).unwrap();
            exprs.extend([v, doubled, zero, is_zero]);
        }
        for e in exprs {
            prop_assert_eq!(&ctx.recompute_sort(e).unwrap(), ctx.sort_of(e));
        }
    }
}
