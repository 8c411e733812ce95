use thiserror::Error;

pub type Result<T> = std::result::Result<T, VcfError>;

#[derive(Debug, Error)]
pub enum VcfError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The stream ended before a single byte was read. Not a fault.
    #[error("input contained no data")]
    EmptyInput,
    #[error("invalid meta-information line: {line}")]
    InvalidMetaHeader { line: String },
    #[error("fileformat is not vcf")]
    NotAVcf,
    #[error("wrong number of columns ({found}) for a VCF line")]
    TooFewColumns { found: usize },
    #[error("header needs a FORMAT column before adding samples")]
    MissingFormatColumn,
    #[error("header FORMAT column must be followed by at least one sample")]
    FormatWithoutGenotype,
    #[error("no #CHROM header line present")]
    NoHeaderLine,
    #[error("sample {sample} is not in the vcf")]
    GenotypeNotInFile { sample: String },
    #[error("genotype of sample {sample} has {found} fields, FORMAT declares {expected}")]
    MalformedGenotypeData {
        sample: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid allele {allele:?} in GT of sample {sample}")]
    InvalidAllele { sample: String, allele: String },
}

impl VcfError {
    /// Whether this is the clean end-of-input signal rather than a real failure.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, VcfError::EmptyInput)
    }
}
