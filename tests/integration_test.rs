/**
End-to-end tests: Yezu source → tokens → program tree → checked stack
*/

use yezu::ast::types::{DataType, Signature, StackType};
use yezu::parser::{Lexer, Parser, without_comments};
use yezu::typechecker::{TypeChecker, TypeError};
use yezu::{Error, check_source, parse_source};

fn stack_of(source: &str) -> Vec<DataType> {
    check_source(source, "test.yz")
        .expect("program should check")
        .report
        .stack
        .as_slice()
        .to_vec()
}

fn type_error(source: &str) -> TypeError {
    match check_source(source, "test.yz") {
        Err(Error::Type(e)) => e,
        other => panic!("Expected type error, got {:?}", other),
    }
}

#[test]
fn test_arithmetic() {
    assert_eq!(stack_of("1 2 +"), vec![DataType::Int]);
    assert_eq!(stack_of("1 2 + true"), vec![DataType::Int, DataType::Bool]);
}

#[test]
fn test_type_mismatch_position() {
    match type_error("1 true +") {
        TypeError::TypeMismatch { pos, actual, .. } => {
            assert_eq!((pos.line, pos.column), (1, 7));
            assert_eq!(actual, DataType::Bool);
        }
        e => panic!("Expected TypeMismatch, got {:?}", e),
    }
}

#[test]
fn test_dup_drop_is_neutral() {
    let program = parse_source("dup drop", "test.yz").unwrap();
    let mut checker = TypeChecker::new();
    let stack = checker
        .check_instructions(&program.body, StackType::from_vec(vec![DataType::Int]))
        .unwrap();
    assert_eq!(stack.as_slice(), &[DataType::Int]);
}

#[test]
fn test_generic_binds_per_call() {
    assert_eq!(
        stack_of("1 dup 'c' dup"),
        vec![DataType::Int, DataType::Int, DataType::Char, DataType::Char]
    );
    assert!(stack_of("\"s\" println 2.5 println").is_empty());
}

#[test]
fn test_if_else_agree() {
    assert_eq!(stack_of("if 1 2 > then 1 else 2 end"), vec![DataType::Int]);
}

#[test]
fn test_if_else_diverge() {
    match type_error("if 1 2 > then 1 else 1.0 end") {
        TypeError::DivergentBranches {
            expected, actual, ..
        } => {
            assert_eq!(expected.as_slice(), &[DataType::Int]);
            assert_eq!(actual.as_slice(), &[DataType::Float]);
        }
        e => panic!("Expected DivergentBranches, got {:?}", e),
    }
}

#[test]
fn test_if_without_else_must_be_neutral() {
    assert_eq!(stack_of("5 if true then 1 + end"), vec![DataType::Int]);
    assert_eq!(type_error("if true then 1 end").name(), "DivergentBranches");
}

#[test]
fn test_elif_chain() {
    let source = "3 if dup 0 < then drop 'n' elif dup 0 = then drop 'z' else drop 'p' end";
    assert_eq!(stack_of(source), vec![DataType::Char]);

    let source = "3 if dup 0 < then drop 'n' elif dup 0 = then drop 0 else drop 'p' end";
    assert_eq!(type_error(source).name(), "DivergentBranches");
}

#[test]
fn test_condition_must_be_bool() {
    match type_error("if 1 then end") {
        TypeError::TypeMismatch { actual, context, .. } => {
            assert_eq!(actual, DataType::Int);
            assert_eq!(context, "if condition");
        }
        e => panic!("Expected TypeMismatch, got {:?}", e),
    }
    assert_eq!(type_error("while do end").name(), "StackUnderflow");
}

#[test]
fn test_loop_must_be_stack_neutral() {
    assert_eq!(type_error("while 1 2 > do 1 end").name(), "LoopEffectMismatch");
    assert_eq!(type_error("1 while 1 2 > do drop end").name(), "LoopEffectMismatch");
    assert_eq!(
        stack_of("10 while dup 0 > do 1 - end"),
        vec![DataType::Int]
    );
}

#[test]
fn test_unknown_word_and_underflow() {
    match type_error("1 frobnicate") {
        TypeError::UnknownWord { name, pos } => {
            assert_eq!(name, "frobnicate");
            assert_eq!(pos.column, 2);
        }
        e => panic!("Expected UnknownWord, got {:?}", e),
    }
    assert_eq!(type_error("1 +").name(), "StackUnderflow");
    assert_eq!(type_error("drop").name(), "StackUnderflow");
}

#[test]
fn test_underflow_reported_before_mismatch() {
    for source in ["true +", "1.0 +", "'c' swap"] {
        match type_error(source) {
            TypeError::StackUnderflow {
                required,
                available,
                ..
            } => assert_eq!((required, available), (2, 1), "{}", source),
            e => panic!("Expected StackUnderflow for {}, got {:?}", source, e),
        }
    }
    assert_eq!(type_error("1 true +").name(), "TypeMismatch");
}

#[test]
fn test_extra_builtins() {
    assert_eq!(stack_of("7 2 / 7 2 %"), vec![DataType::Int, DataType::Int]);
    assert_eq!(stack_of("true false and not"), vec![DataType::Bool]);
    assert_eq!(stack_of("true false or"), vec![DataType::Bool]);
    assert!(stack_of("\"no newline\" print 'c' print").is_empty());
    assert_eq!(
        stack_of("1 2 over"),
        vec![DataType::Int, DataType::Int, DataType::Int]
    );
    assert_eq!(
        stack_of("1 'c' over"),
        vec![DataType::Int, DataType::Char, DataType::Int]
    );

    assert_eq!(type_error("1 not").name(), "TypeMismatch");
    assert_eq!(type_error("1 true and").name(), "TypeMismatch");
    assert_eq!(type_error("1.0 2 /").name(), "TypeMismatch");
    assert_eq!(type_error("1 over").name(), "StackUnderflow");
}

#[test]
fn test_function_signatures_inferred() {
    let checked = check_source(
        "fun inc 1 + end\n\
         fun greet \"hi\" println end\n\
         fun answer 40 inc inc end\n\
         answer greet",
        "test.yz",
    )
    .unwrap();
    let signatures = &checked.report.signatures;

    assert_eq!(
        signatures["inc"],
        Signature::concrete(&[DataType::Int], &[DataType::Int])
    );
    assert_eq!(signatures["greet"], Signature::concrete(&[], &[]));
    assert_eq!(
        signatures["answer"],
        Signature::concrete(&[], &[DataType::Int])
    );
    assert_eq!(checked.report.stack.as_slice(), &[DataType::Int]);
}

#[test]
fn test_function_forward_reference() {
    assert_eq!(
        stack_of("fun first second 1 + end fun second 41 end first"),
        vec![DataType::Int]
    );
}

#[test]
fn test_function_body_errors() {
    assert_eq!(type_error("fun bad 1 true + end").name(), "TypeMismatch");
    assert_eq!(type_error("fun bad dup end").name(), "StackUnderflow");
    assert_eq!(
        type_error("fun loop 1 loop end").name(),
        "RecursiveFunction"
    );
}

#[test]
fn test_declared_signature() {
    let source = "fun count if dup 0 > then 1 - count else end end 3 count";
    let program = parse_source(source, "test.yz").unwrap();

    let mut checker = TypeChecker::new();
    checker.declare(
        "count",
        Signature::concrete(&[DataType::Int], &[DataType::Int]),
    );
    let report = checker.check_program(&program).unwrap();
    assert_eq!(report.stack.as_slice(), &[DataType::Int]);

    let program = parse_source("fun two 1 1 end two", "test.yz").unwrap();
    let mut checker = TypeChecker::new();
    checker.declare("two", Signature::concrete(&[], &[DataType::Int]));
    match checker.check_program(&program) {
        Err(TypeError::SignatureMismatch { name, inferred, .. }) => {
            assert_eq!(name, "two");
            assert_eq!(inferred.shape(), (0, 2));
        }
        other => panic!("Expected SignatureMismatch, got {:?}", other),
    }
}

#[test]
fn test_illegal_tokens_reported_together() {
    match check_source("1 \"open\n'ab' 2", "test.yz") {
        Err(Error::Lexical(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].name(), "LexicalIllegal");
        }
        other => panic!("Expected Lexical error, got {:?}", other),
    }

    match check_source("'ab' 1 a\"b\"", "test.yz") {
        Err(e @ Error::Lexical(_)) => {
            assert_eq!(
                e.to_string(),
                "test.yz:1:0: illegal token \"'ab'\"\ntest.yz:1:7: illegal token \"a\\\"b\\\"\""
            );
        }
        other => panic!("Expected Lexical error, got {:?}", other),
    }
}

#[test]
fn test_missing_end_is_syntax_error() {
    let err = check_source("if 1 then 2", "test.yz").unwrap_err();
    assert_eq!(err.name(), "SyntaxMissingExpected");
    assert!(err.to_string().contains("END"));
}

#[test]
fn test_parser_accepts_any_token_iterator() {
    let tokens = without_comments(Lexer::new("; c\n1 2 +", "test.yz"));
    let program = Parser::new(tokens, "test.yz").parse().unwrap();
    assert_eq!(program.body.len(), 3);
}

#[test]
fn test_printed_program_checks_the_same() {
    let source = "fun step 1 + 2 * end 3 step if dup 0 < then 0 swap - else end";
    let checked = check_source(source, "test.yz").unwrap();
    let printed = checked.program.to_string();
    let rechecked = check_source(&printed, "printed.yz").unwrap();

    assert_eq!(rechecked.program.to_string(), printed);
    assert_eq!(rechecked.report, checked.report);
}
