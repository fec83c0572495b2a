use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Universal,
    Existential,
}

impl Quantifier {
    pub fn opposite(self) -> Self {
        match self {
            Quantifier::Universal => Quantifier::Existential,
            Quantifier::Existential => Quantifier::Universal,
        }
    }

    /// Prefix marker used by QDIMACS: `a` or `e`.
    pub fn marker(self) -> &'static str {
        match self {
            Quantifier::Universal => "a",
            Quantifier::Existential => "e",
        }
    }

    pub fn from_marker(token: &str) -> Option<Self> {
        match token {
            "a" => Some(Quantifier::Universal),
            "e" => Some(Quantifier::Existential),
            _ => None,
        }
    }
}

/// A literal over a renumbered variable. `sign == true` is the positive literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    pub var: u32,
    pub sign: bool,
}

impl Lit {
    pub fn new(var: u32, sign: bool) -> Self {
        Self { var, sign }
    }

    pub fn pos(var: u32) -> Self {
        Self::new(var, true)
    }

    pub fn neg_of(var: u32) -> Self {
        Self::new(var, false)
    }

    pub fn neg(self) -> Self {
        Self {
            var: self.var,
            sign: !self.sign,
        }
    }

    /// Dense index: `+v -> 2(v-1)`, `-v -> 2v-1`. A literal and its
    /// complement differ only in the low bit. `var` must be nonzero.
    pub fn index(self) -> usize {
        let base = 2 * (self.var as usize - 1);
        if self.sign {
            base
        } else {
            base + 1
        }
    }

    pub fn from_index(idx: usize) -> Self {
        Self {
            var: var_of_index(idx),
            sign: idx % 2 == 0,
        }
    }

    pub fn to_dimacs(self) -> i64 {
        let v = self.var as i64;
        if self.sign {
            v
        } else {
            -v
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

pub fn var_of_index(idx: usize) -> u32 {
    (idx / 2 + 1) as u32
}
