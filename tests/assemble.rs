use pretty_assertions::assert_eq;
use tiny32_asm::{assemble, InstructionSet};

fn basic(src: &str) -> Vec<u32> {
    assemble(&InstructionSet::basic(), src).unwrap().words().to_vec()
}

fn extended(src: &str) -> Vec<u32> {
    assemble(&InstructionSet::extended(), src).unwrap().words().to_vec()
}

#[test]
fn basic_formats_pack_fields() {
    let words = basic(
        "add r1, r2, r3\n\
         addi r4, r5, 10h\n\
         shri r31, r0, 1010b\n",
    );
    // opcode:6 | rd:5 | rs:5 | rt:5 | 0:11
    assert_eq!(words[0], (0x00 << 26) | (1 << 21) | (2 << 16) | (3 << 11));
    assert_eq!(words[1], (0x08 << 26) | (4 << 21) | (5 << 16) | 0x10);
    assert_eq!(words[2], (0x0f << 26) | (31 << 21) | 0b1010);
}

#[test]
fn negative_immediate_is_masked_to_16_bits() {
    let words = basic("subi r1, r1, -1\naddi r1, r1, 12345h\n");
    assert_eq!(words[0] & 0xffff, 0xffff);
    assert_eq!(words[0] >> 16, (0x09 << 10) | (1 << 5) | 1);
    assert_eq!(words[1] & 0xffff, 0x2345);
}

#[test]
fn literals_wider_than_64_bits_are_masked() {
    let words = basic(
        "addi r1, r1, 1ffffffffffffffffh\n\
         addi r1, r1, 18446744073709551617\n",
    );
    assert_eq!(words[0] & 0xffff, 0xffff);
    assert_eq!(words[1] & 0xffff, 0x0001);
}

#[test]
fn extended_formats_pack_fields() {
    let words = extended(
        "cmp r1, r2\n\
         cmpi r3, -2\n\
         ld r4, 8(r5)\n\
         st r6, (r7)\n\
         trap 21h\n",
    );
    assert_eq!(words[0], 0x1001_2000);
    assert_eq!(words[1], 0x1103_fffe);
    assert_eq!(words[2], 0x1845_0008);
    assert_eq!(words[3], 0x1967_0000);
    assert_eq!(words[4], 0x3000_0021);
}

#[test]
fn backward_branch_loop() {
    let words = extended("loop: addi r1, r1, 1\n      b loop\n");
    assert_eq!(words.len(), 2);
    assert_eq!(words[1] & 0xffff, 0xfffe);
    assert_eq!(words[1] >> 24, 0x20);
}

#[test]
fn branch_to_next_word_has_zero_displacement() {
    let words = basic("j next\nnext: add r0, r0, r0\n");
    assert_eq!(words[0], 0x10 << 26);
}

#[test]
fn forward_and_backward_references_are_symmetric() {
    // the branch sits two words before / after its target in both programs
    let fwd = basic("j target\nadd r1, r1, r1\ntarget: add r2, r2, r2\n");
    let back = basic("target: add r2, r2, r2\nadd r1, r1, r1\nj target\n");
    assert_eq!(fwd[0] & 0xffff, 1);
    assert_eq!(back[2] & 0xffff, (-3i32 as u32) & 0xffff);

    // the same label is resolved identically whichever side of the branch it is on
    let before = basic("l: add r1, r1, r1\nj l\n");
    let after = basic("j l\nl: add r1, r1, r1\nj l\n");
    assert_eq!(before[1] & 0xffff, 0xfffe);
    assert_eq!(after[0] & 0xffff, 0);
    assert_eq!(after[2] & 0xffff, 0xfffe);
}

#[test]
fn labels_bind_to_next_emitted_word() {
    let words = basic(
        "# header comment\n\
         \n\
         start:\n\
         again:   # two labels, one address\n\
         addi r1, r1, 1\n\
         j start\n\
         j again\n\
         j end\n\
         end:\n",
    );
    assert_eq!(words.len(), 4);
    assert_eq!(words[1] & 0xffff, 0xfffe);
    assert_eq!(words[2] & 0xffff, 0xfffd);
    // `end` is defined past the last word
    assert_eq!(words[3] & 0xffff, 0);
}

#[test]
fn three_instructions_fill_256_lines() {
    let img = assemble(&InstructionSet::basic(), "add r1, r2, r3\nsub r1, r2, r3\nj 0\n0:\n").unwrap();
    let text = img.to_hex_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 256);
    assert_eq!(lines[0], "00221800");
    assert_eq!(lines[1], "04221800");
    assert_eq!(lines[2], "40000000");
    assert!(lines[3..].iter().all(|l| *l == "00000000"));
    assert!(text.ends_with('\n'));
}

#[test]
fn empty_source_is_all_padding() {
    let img = assemble(&InstructionSet::basic(), "").unwrap();
    assert!(img.words().is_empty());
    assert_eq!(img.padded().filter(|&w| w == 0).count(), 256);
}

#[test]
fn crlf_sources_assemble() {
    let words = basic("top: addi r1, r1, 1\r\nj top\r\n");
    assert_eq!(words[1] & 0xffff, 0xfffe);
}

#[test]
fn capacity_is_configurable() {
    let isa = InstructionSet::basic().with_capacity(4);
    let img = assemble(&isa, "add r1, r1, r1\n").unwrap();
    assert_eq!(img.to_hex_string().lines().count(), 4);
}
