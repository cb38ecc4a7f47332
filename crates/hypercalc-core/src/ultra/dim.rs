//! Basis of the Ultra algebra and its multiplication tables.
//!
//! A dimension is a bitmask over the three units: bit 0 is `ⅈ`, bit 1 is
//! `ⅉ`, bit 2 is `ε`. Multiplying two basis elements XORs their masks;
//! two `ⅈ` factors contribute a sign flip and two `ε` factors annihilate.

use std::fmt;

use crate::scalar::{Kind, Scalar};

/// Result index marking a product that vanishes (`ε·ε = 0`).
pub const ZERO_PRODUCT: u8 = u8::MAX;

const COMPLEX_BIT: usize = 1;
const BINARY_BIT: usize = 2;
const DUAL_BIT: usize = 4;

/// `CLOSURE[a][b]`: dimension of `e_a · e_b`, or [`ZERO_PRODUCT`].
pub const CLOSURE: [[u8; 8]; 8] = build_closure();

/// `SIGN[a][b]`: 1 when `e_a · e_b` picks up a factor −1.
pub const SIGN: [[u8; 8]; 8] = build_sign();

const fn build_closure() -> [[u8; 8]; 8] {
    let mut table = [[0u8; 8]; 8];
    let mut a = 0;
    while a < 8 {
        let mut b = 0;
        while b < 8 {
            table[a][b] = if a & b & DUAL_BIT != 0 {
                ZERO_PRODUCT
            } else {
                (a ^ b) as u8
            };
            b += 1;
        }
        a += 1;
    }
    table
}

const fn build_sign() -> [[u8; 8]; 8] {
    let mut table = [[0u8; 8]; 8];
    let mut a = 0;
    while a < 8 {
        let mut b = 0;
        while b < 8 {
            table[a][b] = (a & b & COMPLEX_BIT != 0) as u8;
            b += 1;
        }
        a += 1;
    }
    table
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dim(u8);

impl Dim {
    pub const COUNT: usize = 8;

    pub const REAL: Dim = Dim(0);
    pub const I: Dim = Dim(1);
    pub const J: Dim = Dim(2);
    pub const IJ: Dim = Dim(3);
    pub const E: Dim = Dim(4);
    pub const IE: Dim = Dim(5);
    pub const JE: Dim = Dim(6);
    pub const IJE: Dim = Dim(7);

    pub const ALL: [Dim; 8] = [
        Dim::REAL,
        Dim::I,
        Dim::J,
        Dim::IJ,
        Dim::E,
        Dim::IE,
        Dim::JE,
        Dim::IJE,
    ];

    pub fn from_index(index: usize) -> Option<Dim> {
        (index < Self::COUNT).then_some(Dim(index as u8))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_real(self) -> bool {
        self.0 == 0
    }

    pub fn has_dual(self) -> bool {
        self.index() & DUAL_BIT != 0
    }

    /// The two-dimensional algebra spanned by `1` and this unit: what the
    /// unit squares to. `None` for the real dimension.
    pub fn carrier(self) -> Option<Kind> {
        let i = self.index();
        if i == 0 {
            None
        } else if i & DUAL_BIT != 0 {
            Some(Kind::Dual)
        } else if i & BINARY_BIT != 0 && i & COMPLEX_BIT == 0 {
            Some(Kind::Binary)
        } else {
            Some(Kind::Complex)
        }
    }

    /// Product of two basis elements: resulting dimension and sign, or
    /// `None` when it vanishes.
    pub fn product(self, other: Dim) -> Option<(Dim, f64)> {
        let (a, b) = (self.index(), other.index());
        let target = CLOSURE[a][b];
        if target == ZERO_PRODUCT {
            return None;
        }
        let sign = if SIGN[a][b] == 1 { -1.0 } else { 1.0 };
        Some((Dim(target), sign))
    }

    /// Unit suffix used in text: empty for the real dimension.
    pub fn symbol(self) -> &'static str {
        match self.0 {
            0 => "",
            1 => "ⅈ",
            2 => "ⅉ",
            3 => "ⅈⅉ",
            4 => "ε",
            5 => "ⅈε",
            6 => "ⅉε",
            _ => "ⅈⅉε",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Dim> {
        Self::ALL.into_iter().find(|d| d.symbol() == symbol)
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            "" => f.write_str("1"),
            s => f.write_str(s),
        }
    }
}

/// One coefficient of an Ultra number and the dimension it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub dim: Dim,
    pub value: f64,
}

impl Component {
    pub fn new(dim: Dim, value: f64) -> Self {
        Self { dim, value }
    }

    /// The component as a number of its carrier algebra: the real part for
    /// the real dimension, the imaginary part for every other one.
    pub fn scalar(self) -> Scalar {
        match self.dim.carrier() {
            None => Scalar::real(self.value),
            Some(kind) => Scalar::new(kind, 0.0, self.value),
        }
    }
}
