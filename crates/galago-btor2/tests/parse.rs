//! Parser coverage over the full operation set and every error kind.

use galago_btor2::{parse, serialize, Btor2Reason};
use galago_ir::model::{LivenessKind, SignalRef};
use galago_ir::sorts::Sort;

#[test]
fn full_counter_model_shape() {
    let src = "\
1 sort bitvec 1
2 sort bitvec 4
3 input 1 clk
4 input 1 rst_n
5 state 2 out
6 zero 2
7 init 2 5 6
8 one 2
9 add 2 5 8
10 one 1
11 eq 1 4 10
12 ite 2 11 9 6
13 next 2 5 12
14 output 5 count
";
    let m = parse(src, "counter.btor2").unwrap();
    m.validate().unwrap();
    assert_eq!(m.states.len(), 1);
    assert_eq!(m.inputs.len(), 2);
    assert_eq!(m.outputs.len(), 1);
    assert_eq!(m.states[0].name, "out");
    assert_eq!(m.states[0].sort, Sort::BitVec(4));
    assert!(m.states[0].init.is_some());
    assert_eq!(m.sorts.len(), 2);
    assert_eq!(m.lookup("out"), Some(SignalRef::State(0)));
    assert_eq!(m.lookup("count"), Some(SignalRef::Output(0)));
}

#[test]
fn every_wordlevel_op_parses() {
    let src = "\
1 sort bitvec 8
2 input 1 a
3 input 1 b
4 const 1 00001111
5 constd 1 200
6 consth 1 ff
7 zero 1
8 one 1
9 ones 1
10 not 1 2
11 neg 1 2
12 inc 1 2
13 dec 1 2
14 sort bitvec 1
15 redand 14 2
16 redor 14 2
17 redxor 14 2
18 and 1 2 3
19 or 1 2 3
20 xor 1 2 3
21 nand 1 2 3
22 nor 1 2 3
23 xnor 1 2 3
24 implies 14 15 16
25 iff 14 15 16
26 add 1 2 3
27 sub 1 2 3
28 mul 1 2 3
29 udiv 1 2 3
30 sdiv 1 2 3
31 urem 1 2 3
32 srem 1 2 3
33 smod 1 2 3
34 sll 1 2 3
35 srl 1 2 3
36 sra 1 2 3
37 rol 1 2 3
38 ror 1 2 3
39 eq 14 2 3
40 neq 14 2 3
41 ult 14 2 3
42 ulte 14 2 3
43 ugt 14 2 3
44 ugte 14 2 3
45 slt 14 2 3
46 slte 14 2 3
47 sgt 14 2 3
48 sgte 14 2 3
49 sort bitvec 16
50 concat 49 2 3
51 slice 14 2 4 4
52 uext 49 2 8
53 sext 49 2 8
54 ite 1 39 2 3
55 state 1 q
56 next 1 55 54
57 output 54 mux
58 bad 39
59 constraint 40
";
    let m = parse(src, "ops.btor2").unwrap();
    m.validate().unwrap();
    assert_eq!(m.bads.len(), 1);
    assert_eq!(m.constraints.len(), 1);
}

#[test]
fn memory_ops_parse_and_validate() {
    let src = "\
1 sort bitvec 4
2 sort bitvec 8
3 sort array 1 2
4 state 3 mem
5 input 1 addr
6 input 2 data
7 write 3 4 5 6
8 next 3 4 7
9 read 2 4 5
10 output 9 q
";
    let m = parse(src, "mem.btor2").unwrap();
    m.validate().unwrap();
    assert_eq!(
        m.states[0].sort,
        Sort::array(Sort::BitVec(4), Sort::BitVec(8))
    );
    assert!(m.states[0].init.is_none());
}

#[test]
fn unknown_op_is_fatal_with_line_number() {
    let src = "1 sort bitvec 4\n2 frobnicate 1\n";
    let err = parse(src, "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::UnknownOp(ref op) if op == "frobnicate"));
    assert_eq!(err.line_no, 2);
}

#[test]
fn fair_and_justice_warn_but_parse() {
    let src = "\
1 sort bitvec 1
2 input 1 req
3 state 1 q
4 next 1 3 2
5 fair 2
6 justice 1 3
";
    let m = parse(src, "live.btor2").unwrap();
    assert_eq!(m.liveness.len(), 2);
    assert_eq!(m.liveness[0].kind, LivenessKind::Fair);
    assert_eq!(m.liveness[1].kind, LivenessKind::Justice);
}

#[test]
fn forward_reference_is_undefined() {
    let src = "1 sort bitvec 4\n2 not 1 3\n3 input 1 a\n";
    let err = parse(src, "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::UndefinedRef(3)));
    assert_eq!(err.line_no, 2);
}

#[test]
fn width_mismatch_in_binary_op() {
    let src = "\
1 sort bitvec 4
2 sort bitvec 8
3 input 1 a
4 input 2 b
5 add 2 3 4
";
    let err = parse(src, "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::WidthMismatch(_)));
    assert_eq!(err.line_no, 5);
}

#[test]
fn declared_sort_must_match_computed_sort() {
    let src = "\
1 sort bitvec 4
2 sort bitvec 8
3 input 1 a
4 input 1 b
5 add 2 3 4
";
    let err = parse(src, "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::SortMismatch(_)));
}

#[test]
fn const_overflow_is_a_width_error() {
    let src = "1 sort bitvec 4\n2 constd 1 16\n";
    let err = parse(src, "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::WidthMismatch(_)));

    let src = "1 sort bitvec 4\n2 consth 1 1f\n";
    assert!(parse(src, "t.btor2").is_err());

    let src = "1 sort bitvec 4\n2 const 1 1111\n";
    assert!(parse(src, "t.btor2").is_ok());
}

#[test]
fn duplicate_init_and_next_are_rejected() {
    let src = "\
1 sort bitvec 4
2 state 1 q
3 zero 1
4 init 1 2 3
5 init 1 2 3
";
    let err = parse(src, "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::DuplicateInit(ref n) if n == "q"));
    assert_eq!(err.line_no, 5);

    let src = "\
1 sort bitvec 4
2 state 1 q
3 next 1 2 2
4 next 1 2 2
";
    let err = parse(src, "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::DuplicateNext(ref n) if n == "q"));
}

#[test]
fn state_without_next_is_dangling() {
    let src = "1 sort bitvec 4\n2 state 1 q\n3 zero 1\n4 init 1 2 3\n";
    let err = parse(src, "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::DanglingState(ref n) if n == "q"));
    assert_eq!(err.line_no, 2);
}

#[test]
fn unnamed_states_and_inputs_get_nid_names() {
    let src = "1 sort bitvec 4\n2 state 1\n3 input 1\n4 next 1 2 3\n";
    let m = parse(src, "t.btor2").unwrap();
    assert_eq!(m.states[0].name, "state_2");
    assert_eq!(m.inputs[0].name, "input_3");
}

#[test]
fn slice_out_of_range_is_rejected() {
    let src = "1 sort bitvec 4\n2 input 1 a\n3 sort bitvec 2\n4 slice 3 2 4 3\n";
    let err = parse(src, "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::WidthMismatch(_)));
}

#[test]
fn zero_width_sort_is_rejected() {
    let err = parse("1 sort bitvec 0\n", "t.btor2").unwrap_err();
    assert!(matches!(err.reason, Btor2Reason::WidthMismatch(_)));
}

#[test]
fn inline_comments_are_stripped() {
    let src = "; header\n1 sort bitvec 4 ; four bits\n2 input 1 a\n3 output 2 a_o\n";
    let m = parse(src, "t.btor2").unwrap();
    assert_eq!(m.inputs.len(), 1);
}

#[test]
fn round_trip_of_a_rich_model_is_stable() {
    let src = "\
1 sort bitvec 1
2 sort bitvec 4
3 input 1 clk
4 input 2 a
5 state 2 acc
6 zero 2
7 init 2 5 6
8 slice 1 4 3 3
9 uext 2 8 3
10 add 2 5 9
11 ugte 1 10 4
12 ite 2 11 10 6
13 next 2 5 12
14 output 10 sum
15 ulte 1 5 4
16 constraint 15
17 redor 1 4
18 bad 17
";
    let m1 = parse(src, "rich.btor2").unwrap();
    m1.validate().unwrap();
    let s1 = serialize(&m1).unwrap();
    let m2 = parse(&s1, "rich2.btor2").unwrap();
    m2.validate().unwrap();
    let s2 = serialize(&m2).unwrap();
    assert_eq!(s1, s2);
}
