//! Run configuration for [`VcfPipeline`](super::VcfPipeline).

/// What to do with records whose chromosome the reference does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingChromosome {
    /// Drop the records, warning once per chromosome.
    #[default]
    Skip,
    /// Stop the run with an error.
    Abort,
}

/// Switches controlling how each record is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Expand `<INS>` / `<DEL>` into literal alleles before aligning.
    pub expand_symbolic: bool,
    /// Write records that arrived symbolic back in symbolic form.
    pub restore_symbolic: bool,
    /// Policy for chromosomes absent from the reference.
    pub missing_chromosome: MissingChromosome,
    /// Drop records that fail expansion or alignment instead of aborting.
    pub skip_invalid: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::standardize()
    }
}

impl PipelineConfig {
    /// Expand symbolic alleles and write every indel with literal bases.
    pub fn standardize() -> Self {
        Self {
            expand_symbolic: true,
            restore_symbolic: false,
            missing_chromosome: MissingChromosome::Skip,
            skip_invalid: false,
        }
    }

    /// Left-align only, keeping each record in the encoding it arrived in.
    pub fn align() -> Self {
        Self {
            restore_symbolic: true,
            ..Self::standardize()
        }
    }

    /// Set the missing-chromosome policy.
    pub fn with_missing_chromosome(mut self, policy: MissingChromosome) -> Self {
        self.missing_chromosome = policy;
        self
    }

    /// Drop invalid records instead of aborting.
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Toggle symbolic expansion.
    pub fn with_expand_symbolic(mut self, expand: bool) -> Self {
        self.expand_symbolic = expand;
        self
    }
}
