use anyhow::{Result, bail};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::literal::Quantifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomQbfConfig {
    pub vars: u32,
    pub clauses: usize,
    pub clause_len: u32,
    /// Number of alternating quantifier blocks, outermost existential.
    pub blocks: u32,
    pub seed: u64,
}

/// Generates a QDIMACS instance. Original ids are shuffled before being
/// placed in the prefix, so parsing always has to renumber.
pub fn generate_qdimacs(cfg: &RandomQbfConfig) -> Result<String> {
    if cfg.vars == 0 && cfg.clauses > 0 {
        bail!("cannot generate clauses without variables");
    }
    if cfg.clause_len > cfg.vars {
        bail!(
            "clause length {} exceeds variable count {}",
            cfg.clause_len,
            cfg.vars
        );
    }
    if cfg.vars > 0 && cfg.blocks == 0 {
        bail!("blocks must be >= 1");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let mut ids = (1..=cfg.vars).collect::<Vec<_>>();
    ids.shuffle(&mut rng);

    let mut out = String::new();
    out.push_str(&format!("p cnf {} {}\n", cfg.vars, cfg.clauses));

    let blocks = cfg.blocks.min(cfg.vars.max(1)) as usize;
    let mut quant = Quantifier::Existential;
    for b in 0..blocks {
        let lo = ids.len() * b / blocks;
        let hi = ids.len() * (b + 1) / blocks;
        if lo == hi {
            continue;
        }
        out.push_str(quant.marker());
        for id in &ids[lo..hi] {
            out.push_str(&format!(" {}", id));
        }
        out.push_str(" 0\n");
        quant = quant.opposite();
    }

    for _ in 0..cfg.clauses {
        let mut picked = ids.clone();
        picked.shuffle(&mut rng);
        picked.truncate(cfg.clause_len as usize);
        for v in picked {
            let lit = if rng.random::<bool>() {
                v as i64
            } else {
                -(v as i64)
            };
            out.push_str(&format!("{} ", lit));
        }
        out.push_str("0\n");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{RandomQbfConfig, generate_qdimacs};
    use crate::qbf::qdimacs::parse_qdimacs_str;

    fn cfg(seed: u64) -> RandomQbfConfig {
        RandomQbfConfig {
            vars: 12,
            clauses: 20,
            clause_len: 3,
            blocks: 4,
            seed,
        }
    }

    #[test]
    fn same_seed_same_instance() {
        let a = generate_qdimacs(&cfg(9)).expect("gen");
        let b = generate_qdimacs(&cfg(9)).expect("gen");
        assert_eq!(a, b);
    }

    #[test]
    fn generated_instance_parses() {
        let text = generate_qdimacs(&cfg(3)).expect("gen");
        let f = parse_qdimacs_str(&text).expect("parse");
        assert_eq!(f.num_vars(), 12);
        assert_eq!(f.num_clauses(), 20);
        assert_eq!(f.stats().blocks, 4);
    }

    #[test]
    fn rejects_overlong_clauses() {
        let mut bad = cfg(1);
        bad.clause_len = 13;
        let err = match generate_qdimacs(&bad) {
            Ok(_) => panic!("expected config error"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("exceeds variable count"));
    }
}
