//! Bitwise, bit-counting, rotation, and shift operator tests.

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
fn and_or_xor() {
    let (machine, effect) = run("0xff00 0x0ff0 and");
    assert_eq!(effect, Effect::Finished);
    assert_eq!(stack_u32(&machine), vec![0x0f00]);

    let (machine, _) = run("0xff00 0x0ff0 or");
    assert_eq!(stack_u32(&machine), vec![0xfff0]);

    let (machine, _) = run("0xff00 0x0ff0 xor");
    assert_eq!(stack_u32(&machine), vec![0xf0f0]);
}

#[test]
fn count_ones() {
    let (machine, _) = run("0xff count_ones");
    assert_eq!(stack_u32(&machine), vec![8]);

    let (machine, _) = run("-1 count_ones");
    assert_eq!(stack_u32(&machine), vec![32]);

    let (machine, _) = run("0 count_ones");
    assert_eq!(stack_u32(&machine), vec![0]);
}

#[test]
fn zero_counts_report_the_full_width_for_zero() {
    let (machine, _) = run("0 leading_zeros");
    assert_eq!(stack_u32(&machine), vec![32]);

    let (machine, _) = run("0 trailing_zeros");
    assert_eq!(stack_u32(&machine), vec![32]);
}

#[test]
fn leading_and_trailing_zeros() {
    let (machine, _) = run("1 leading_zeros");
    assert_eq!(stack_u32(&machine), vec![31]);

    let (machine, _) = run("8 trailing_zeros");
    assert_eq!(stack_u32(&machine), vec![3]);

    // The sign bit counts like any other bit.
    let (machine, _) = run("-1 leading_zeros");
    assert_eq!(stack_u32(&machine), vec![0]);
}

#[test]
fn rotations_carry_bits_around() {
    let (machine, _) = run("0x80000001 1 rotate_left");
    assert_eq!(stack_u32(&machine), vec![3]);

    let (machine, _) = run("3 1 rotate_right");
    assert_eq!(stack_u32(&machine), vec![0x80000001]);
}

#[test]
fn rotation_count_is_taken_modulo_32() {
    let (machine, _) = run("1 33 rotate_left");
    assert_eq!(stack_u32(&machine), vec![2]);

    let (machine, _) = run("1 64 rotate_right");
    assert_eq!(stack_u32(&machine), vec![1]);
}

#[test]
fn opposite_rotations_cancel() {
    let (machine, _) = run("0x12345678 13 rotate_right 13 rotate_left");
    assert_eq!(stack_u32(&machine), vec![0x12345678]);
}

#[test]
fn shift_left_is_logical() {
    let (machine, _) = run("1 4 shift_left");
    assert_eq!(stack_u32(&machine), vec![16]);

    // Bits shifted out are discarded.
    let (machine, _) = run("0x80000001 1 shift_left");
    assert_eq!(stack_u32(&machine), vec![2]);
}

#[test]
fn shift_count_is_taken_modulo_32() {
    let (machine, _) = run("1 32 shift_left");
    assert_eq!(stack_u32(&machine), vec![1]);

    let (machine, _) = run("-8 33 shift_right");
    assert_eq!(stack_u32(&machine), vec![(-4i32) as u32]);
}

#[test]
fn shift_right_extends_the_sign() {
    let (machine, _) = run("-8 1 shift_right");
    assert_eq!(stack_u32(&machine), vec![(-4i32) as u32]);

    // A negative word never shifts down to zero.
    let (machine, _) = run("-1 31 shift_right");
    assert_eq!(stack_u32(&machine), vec![u32::MAX]);

    let (machine, _) = run("8 2 shift_right");
    assert_eq!(stack_u32(&machine), vec![2]);
}
