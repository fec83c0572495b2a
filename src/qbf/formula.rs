use super::literal::{Lit, Quantifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    /// Id in the input file.
    pub orig: u32,
    /// 1-based index of the quantifier block that bound the variable.
    pub depth: u32,
    pub quant: Quantifier,
}

impl Variable {
    /// Occupies slot 0 so that variable ids index `Formula::vars` directly.
    pub const SENTINEL: Variable = Variable {
        orig: 0,
        depth: 0,
        quant: Quantifier::Universal,
    };
}

/// Literals sorted by variable id, with trailing universals removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// Sorts `lits` by variable id and applies universal reduction.
    /// Every literal must refer to a variable in `vars`.
    pub fn reduced(mut lits: Vec<Lit>, vars: &[Variable]) -> Self {
        lits.sort_by_key(|l| l.var);
        while let Some(last) = lits.last() {
            if vars[last.var as usize].quant != Quantifier::Universal {
                break;
            }
            lits.pop();
        }
        Self { lits }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantCounts {
    pub universal: usize,
    pub existential: usize,
}

impl QuantCounts {
    pub fn get(&self, quant: Quantifier) -> usize {
        match quant {
            Quantifier::Universal => self.universal,
            Quantifier::Existential => self.existential,
        }
    }

    pub fn bump(&mut self, quant: Quantifier) {
        match quant {
            Quantifier::Universal => self.universal += 1,
            Quantifier::Existential => self.existential += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaStats {
    pub vars: usize,
    pub counts: QuantCounts,
    pub blocks: usize,
    pub clauses: usize,
    pub empty_clauses: usize,
    pub literals: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub max_orig_var: u32,
    /// Clause count from the `p cnf` header.
    pub declared_clauses: u32,
    pub vars: Vec<Variable>,
    pub clauses: Vec<Clause>,
    /// Original id -> new id; 0 for ids missing from the prefix.
    pub orig_to_new: Vec<u32>,
}

impl Formula {
    pub fn empty(max_orig_var: u32, declared_clauses: u32) -> Self {
        Self {
            max_orig_var,
            declared_clauses,
            vars: vec![Variable::SENTINEL],
            clauses: Vec::new(),
            orig_to_new: vec![0; max_orig_var as usize + 1],
        }
    }

    pub fn num_vars(&self) -> u32 {
        (self.vars.len() - 1) as u32
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn var(&self, id: u32) -> &Variable {
        &self.vars[id as usize]
    }

    pub fn quant(&self, id: u32) -> Quantifier {
        self.vars[id as usize].quant
    }

    /// New id of an original variable, if it was quantified.
    pub fn new_id(&self, orig: u32) -> Option<u32> {
        match self.orig_to_new.get(orig as usize) {
            Some(&id) if id != 0 => Some(id),
            _ => None,
        }
    }

    pub fn quant_counts(&self) -> QuantCounts {
        let mut counts = QuantCounts::default();
        for v in &self.vars[1..] {
            counts.bump(v.quant);
        }
        counts
    }

    /// Every universal/existential pair: the dependency set of the
    /// standard (trivial) scheme.
    pub fn trivial_deps(&self) -> u64 {
        let counts = self.quant_counts();
        counts.universal as u64 * counts.existential as u64
    }

    pub fn stats(&self) -> FormulaStats {
        let blocks = self.vars[1..]
            .iter()
            .map(|v| v.depth)
            .max()
            .unwrap_or(0) as usize;
        FormulaStats {
            vars: self.num_vars() as usize,
            counts: self.quant_counts(),
            blocks,
            clauses: self.clauses.len(),
            empty_clauses: self.clauses.iter().filter(|c| c.is_empty()).count(),
            literals: self.clauses.iter().map(Clause::len).sum(),
        }
    }
}
