
use num_traits::FromPrimitive;

use super::asm::*;
use super::constants::*;

fn decode_full_word_ins(input: Word) -> Option<Ins> {
    let op = Opcode::from_i16(input)?;
    if !op.is_full_word() {
        return None;
    }
    Some(Ins{op, operand: 0})
}

// Sign is ignored: -510 decodes the same as 510.
fn decode_addr_ins(input: Word) -> Option<Ins> {
    let mag = input.unsigned_abs();
    let op = Opcode::from_u16((mag / OPCODE_RADIX) % 10)?;
    let operand = (mag % OPCODE_RADIX) as Addr;
    Some(Ins{op, operand})
}

type Decoder = fn(Word) -> Option<Ins>;

const DECODERS: &[Decoder] = &[
    decode_full_word_ins,
    decode_addr_ins,
];


// None when the word doesn't name an instruction (e.g. 903).
pub fn decode(input: Word) -> Option<Ins> {
    DECODERS.iter().find_map(|decoder| decoder(input))
}
