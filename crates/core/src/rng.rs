//! RNG module - uniform random piece generation
//!
//! Every draw picks one of the seven letters of the piece alphabet with equal
//! probability; there is no bag or history. Seeding makes the sequence
//! reproducible for tests and replays.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PieceKind;

/// Kinds in the order of `PIECE_ALPHABET`.
const ALPHABET: [PieceKind; 7] = [
    PieceKind::T,
    PieceKind::O,
    PieceKind::L,
    PieceKind::Z,
    PieceKind::S,
    PieceKind::J,
    PieceKind::I,
];

/// Uniform piece generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: StdRng,
    seed: u64,
}

impl PieceGenerator {
    /// Create a generator with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a generator with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        ALPHABET[self.rng.gen_range(0..ALPHABET.len())]
    }
}
