
pub type Word = i16;
pub type Addr = u8;

pub const WORD_MIN: Word = -999;
pub const WORD_MAX: Word = 999;

pub const MEM_SIZE: usize = 100;
pub const ADDR_MODULUS: i32 = MEM_SIZE as i32;

// Instruction words are one opcode digit followed by a two digit operand.
pub const OPCODE_RADIX: u16 = 100;

pub fn in_word_range(val: i32) -> bool {
    (WORD_MIN as i32..=WORD_MAX as i32).contains(&val)
}
