//! Comparison operator tests. All comparisons are signed.

use std::sync::Arc;

use stackasm_lang::parse;
use stackasm_runtime::{Effect, Machine};

fn run(script: &str) -> (Machine, Effect) {
    let mut machine = Machine::new(Arc::new(parse(script).unwrap()));
    let effect = machine.run();
    (machine, effect)
}

fn stack_u32(machine: &Machine) -> Vec<u32> {
    machine.stack().iter().map(|w| w.to_u32()).collect()
}

#[test]
fn equality_pushes_one_or_zero() {
    let (machine, effect) = run("3 3 =");
    assert_eq!(effect, Effect::Finished);
    assert_eq!(stack_u32(&machine), vec![1]);

    let (machine, _) = run("3 4 =");
    assert_eq!(stack_u32(&machine), vec![0]);
}

#[test]
fn equality_is_over_bits() {
    // -1 and 4294967295 are the same word.
    let (machine, _) = run("-1 4294967295 =");
    assert_eq!(stack_u32(&machine), vec![1]);
}

#[test]
fn less_than() {
    let (machine, _) = run("1 2 <");
    assert_eq!(stack_u32(&machine), vec![1]);

    let (machine, _) = run("2 2 <");
    assert_eq!(stack_u32(&machine), vec![0]);
}

#[test]
fn comparisons_are_signed() {
    // As an unsigned value this would be the largest word; signed, it is -1.
    let (machine, _) = run("4294967295 0 <");
    assert_eq!(stack_u32(&machine), vec![1]);

    let (machine, _) = run("-2147483648 2147483647 <");
    assert_eq!(stack_u32(&machine), vec![1]);
}

#[test]
fn less_or_equal() {
    let (machine, _) = run("2 2 <=");
    assert_eq!(stack_u32(&machine), vec![1]);

    let (machine, _) = run("3 2 <=");
    assert_eq!(stack_u32(&machine), vec![0]);
}

#[test]
fn greater_than() {
    let (machine, _) = run("3 2 >");
    assert_eq!(stack_u32(&machine), vec![1]);

    let (machine, _) = run("-3 2 >");
    assert_eq!(stack_u32(&machine), vec![0]);
}

#[test]
fn greater_or_equal() {
    let (machine, _) = run("2 2 >=");
    assert_eq!(stack_u32(&machine), vec![1]);

    let (machine, _) = run("-2 2 >=");
    assert_eq!(stack_u32(&machine), vec![0]);
}

#[test]
fn first_operand_is_deeper_on_the_stack() {
    // `a b <` asks whether a < b, with b popped first.
    let (machine, _) = run("1 2 <");
    assert_eq!(stack_u32(&machine), vec![1]);

    let (machine, _) = run("2 1 <");
    assert_eq!(stack_u32(&machine), vec![0]);
}
