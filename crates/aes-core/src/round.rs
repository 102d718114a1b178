//! AES round transformations over a column-major [`Block`] state.

use crate::block::{xor_in_place, Block};
use crate::gf::gmul;
use crate::sbox::{inv_sbox, sbox};

/// MixColumns coefficients, one row per output byte.
const MIX: [[u8; 4]; 4] = [[2, 3, 1, 1], [1, 2, 3, 1], [1, 1, 2, 3], [3, 1, 1, 2]];

/// InvMixColumns coefficients.
const INV_MIX: [[u8; 4]; 4] = [
    [14, 11, 13, 9],
    [9, 14, 11, 13],
    [13, 9, 14, 11],
    [11, 13, 9, 14],
];

/// Applies SubBytes to the state in place.
#[inline]
pub fn sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = sbox(*byte);
    }
}

/// Applies the inverse SubBytes transformation.
#[inline]
pub fn inv_sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = inv_sbox(*byte);
    }
}

/// Rotates row `r` left by `r` positions.
#[inline]
pub fn shift_rows(state: &mut Block) {
    let src = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[col * 4 + row] = src[((col + row) % 4) * 4 + row];
        }
    }
}

/// Rotates row `r` right by `r` positions.
#[inline]
pub fn inv_shift_rows(state: &mut Block) {
    let src = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[((col + row) % 4) * 4 + row] = src[col * 4 + row];
        }
    }
}

fn mix_single_column(col: &mut [u8; 4], matrix: &[[u8; 4]; 4]) {
    let input = *col;
    for (out, coeffs) in col.iter_mut().zip(matrix.iter()) {
        *out = coeffs
            .iter()
            .zip(input.iter())
            .fold(0u8, |acc, (&c, &a)| acc ^ gmul(a, c));
    }
}

fn for_each_column(state: &mut Block, matrix: &[[u8; 4]; 4]) {
    for chunk in state.chunks_exact_mut(4) {
        let mut column = [chunk[0], chunk[1], chunk[2], chunk[3]];
        mix_single_column(&mut column, matrix);
        chunk.copy_from_slice(&column);
    }
}

/// MixColumns over all four columns.
#[inline]
pub fn mix_columns(state: &mut Block) {
    for_each_column(state, &MIX);
}

/// Inverse MixColumns over all four columns.
#[inline]
pub fn inv_mix_columns(state: &mut Block) {
    for_each_column(state, &INV_MIX);
}

/// Adds (XORs) a round key into the state.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn sequential() -> Block {
        core::array::from_fn(|i| i as u8)
    }

    #[test]
    fn shift_rows_rotates_each_row_left() {
        let mut state = sequential();
        shift_rows(&mut state);
        assert_eq!(
            state,
            [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11]
        );
    }

    #[test]
    fn inv_shift_rows_rotates_each_row_right() {
        let mut state = sequential();
        inv_shift_rows(&mut state);
        assert_eq!(
            state,
            [0, 13, 10, 7, 4, 1, 14, 11, 8, 5, 2, 15, 12, 9, 6, 3]
        );
    }

    #[test]
    fn mix_columns_matches_published_columns() {
        let mut state: Block = [
            0xdb, 0x13, 0x53, 0x45, 0xf2, 0x0a, 0x22, 0x5c, 0x01, 0x01, 0x01, 0x01, 0xc6, 0xc6,
            0xc6, 0xc6,
        ];
        mix_columns(&mut state);
        assert_eq!(
            state,
            [
                0x8e, 0x4d, 0xa1, 0xbc, 0x9f, 0xdc, 0x58, 0x9d, 0x01, 0x01, 0x01, 0x01, 0xc6,
                0xc6, 0xc6, 0xc6,
            ]
        );
    }

    #[test]
    fn inverse_steps_undo_forward_steps() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        for _ in 0..64 {
            let mut original = [0u8; 16];
            rng.fill_bytes(&mut original);

            let mut state = original;
            mix_columns(&mut state);
            inv_mix_columns(&mut state);
            assert_eq!(state, original);

            shift_rows(&mut state);
            inv_shift_rows(&mut state);
            assert_eq!(state, original);

            sub_bytes(&mut state);
            inv_sub_bytes(&mut state);
            assert_eq!(state, original);
        }
    }

    #[test]
    fn add_round_key_is_self_inverse() {
        let key: Block = [0x5a; 16];
        let mut state = sequential();
        add_round_key(&mut state, &key);
        assert_ne!(state, sequential());
        add_round_key(&mut state, &key);
        assert_eq!(state, sequential());
    }
}
