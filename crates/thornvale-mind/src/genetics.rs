//! Trait inheritance - two-allele genetics behind personality generation
//!
//! Each OCEAN trait carries a dominant/recessive pair. Offspring draw one
//! allele per parent uniformly; each drawn allele flips with the mutation
//! rate. Expression is dominant-high: AA and Aa express high, aa low.

use crate::personality::{Personality, TraitKind};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MUTATION_RATE: f64 = 0.05;

const EXPRESSED_HIGH: f64 = 70.0;
const EXPRESSED_LOW: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allele {
    Dominant,
    Recessive,
}

impl Allele {
    fn flipped(self) -> Self {
        match self {
            Allele::Dominant => Allele::Recessive,
            Allele::Recessive => Allele::Dominant,
        }
    }
}

/// One trait's allele pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitGenes {
    pub a: Allele,
    pub b: Allele,
}

impl TraitGenes {
    pub fn homozygous_dominant() -> Self {
        Self {
            a: Allele::Dominant,
            b: Allele::Dominant,
        }
    }

    pub fn heterozygous() -> Self {
        Self {
            a: Allele::Dominant,
            b: Allele::Recessive,
        }
    }

    pub fn homozygous_recessive() -> Self {
        Self {
            a: Allele::Recessive,
            b: Allele::Recessive,
        }
    }

    /// Uniform draw of one allele from the pair.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Allele {
        if rng.gen_bool(0.5) {
            self.a
        } else {
            self.b
        }
    }

    pub fn expresses_high(&self) -> bool {
        self.a == Allele::Dominant || self.b == Allele::Dominant
    }
}

/// Allele pairs for all five OCEAN traits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    pub openness: TraitGenes,
    pub conscientiousness: TraitGenes,
    pub extraversion: TraitGenes,
    pub agreeableness: TraitGenes,
    pub neuroticism: TraitGenes,
}

impl Genome {
    pub fn uniform(genes: TraitGenes) -> Self {
        Self {
            openness: genes,
            conscientiousness: genes,
            extraversion: genes,
            agreeableness: genes,
            neuroticism: genes,
        }
    }

    pub fn get(&self, kind: TraitKind) -> TraitGenes {
        match kind {
            TraitKind::Openness => self.openness,
            TraitKind::Conscientiousness => self.conscientiousness,
            TraitKind::Extraversion => self.extraversion,
            TraitKind::Agreeableness => self.agreeableness,
            TraitKind::Neuroticism => self.neuroticism,
        }
    }
}

/// Mutate a drawn allele with probability `rate`.
pub fn maybe_mutate<R: Rng>(allele: Allele, rate: f64, rng: &mut R) -> Allele {
    if rng.gen::<f64>() < rate {
        allele.flipped()
    } else {
        allele
    }
}

fn inherit_pair<R: Rng>(a: &TraitGenes, b: &TraitGenes, rate: f64, rng: &mut R) -> TraitGenes {
    TraitGenes {
        a: maybe_mutate(a.draw(rng), rate, rng),
        b: maybe_mutate(b.draw(rng), rate, rng),
    }
}

/// Offspring genome from two parents at the default mutation rate.
pub fn inherit<R: Rng>(parent_a: &Genome, parent_b: &Genome, rng: &mut R) -> Genome {
    inherit_with_rate(parent_a, parent_b, DEFAULT_MUTATION_RATE, rng)
}

pub fn inherit_with_rate<R: Rng>(
    parent_a: &Genome,
    parent_b: &Genome,
    rate: f64,
    rng: &mut R,
) -> Genome {
    Genome {
        openness: inherit_pair(&parent_a.openness, &parent_b.openness, rate, rng),
        conscientiousness: inherit_pair(
            &parent_a.conscientiousness,
            &parent_b.conscientiousness,
            rate,
            rng,
        ),
        extraversion: inherit_pair(&parent_a.extraversion, &parent_b.extraversion, rate, rng),
        agreeableness: inherit_pair(&parent_a.agreeableness, &parent_b.agreeableness, rate, rng),
        neuroticism: inherit_pair(&parent_a.neuroticism, &parent_b.neuroticism, rate, rng),
    }
}

/// Express a genome as a starting personality vector.
pub fn express(genome: &Genome) -> Personality {
    let value = |genes: TraitGenes| {
        if genes.expresses_high() {
            EXPRESSED_HIGH
        } else {
            EXPRESSED_LOW
        }
    };
    Personality::new(
        value(genome.openness),
        value(genome.conscientiousness),
        value(genome.extraversion),
        value(genome.agreeableness),
        value(genome.neuroticism),
    )
}
