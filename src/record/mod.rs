mod cache;
mod genotype;

use std::collections::HashMap;
use std::fmt;

use getset::{CopyGetters, Getters, Setters};
use itertools::Itertools;

pub(crate) use cache::GenotypeCache;
pub use cache::Shared;
pub use genotype::{Genotype, GenotypeAllele, MISSING_ALLELE};

/// Stored in place of QUAL when the column holds `.`.
pub const MISSING_QUAL: f64 = f64::MAX;

pub(crate) const MISSING_VALUE: &str = ".";

/// Notation QUAL was written in, so it can be written back the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualFormat {
    Fixed,
    Exponent,
}

impl Default for QualFormat {
    fn default() -> Self {
        QualFormat::Fixed
    }
}

/// One data line.
///
/// Sample columns are kept as raw text and decoded on demand with
/// [`Record::decode_genotype`].
#[derive(Debug, Getters, CopyGetters, Setters)]
pub struct Record {
    #[getset(get = "pub", set = "pub")]
    pub(crate) chrom: String,
    /// `None` when POS was `.` or not a number.
    #[getset(get_copy = "pub", set = "pub")]
    pub(crate) pos: Option<u64>,
    #[getset(get = "pub", set = "pub")]
    pub(crate) id: String,
    #[getset(get = "pub", set = "pub")]
    pub(crate) ref_allele: String,
    #[getset(get = "pub", set = "pub")]
    pub(crate) alt_alleles: Vec<String>,
    pub(crate) qual: f64,
    #[getset(get_copy = "pub", set = "pub")]
    pub(crate) qual_format: QualFormat,
    #[getset(get = "pub", set = "pub")]
    pub(crate) filter: String,
    /// Flags store their own key as value.
    #[getset(get = "pub")]
    pub(crate) info: HashMap<String, String>,
    /// INFO key to its position in the INFO column.
    #[getset(get = "pub")]
    pub(crate) info_order: HashMap<String, usize>,
    /// FORMAT key to its position in every sample column.
    #[getset(get = "pub")]
    pub(crate) format: HashMap<String, usize>,
    /// Undecoded sample columns, in header sample order.
    #[getset(get = "pub")]
    pub(crate) genotypes: Vec<String>,
    pub(crate) parsed_genotypes: GenotypeCache,
}

impl Default for Record {
    fn default() -> Self {
        Record {
            chrom: String::new(),
            pos: None,
            id: MISSING_VALUE.to_owned(),
            ref_allele: String::new(),
            alt_alleles: Vec::new(),
            qual: MISSING_QUAL,
            qual_format: QualFormat::default(),
            filter: MISSING_VALUE.to_owned(),
            info: HashMap::new(),
            info_order: HashMap::new(),
            format: HashMap::new(),
            genotypes: Vec::new(),
            parsed_genotypes: GenotypeCache::default(),
        }
    }
}

impl Record {
    pub fn new<C: Into<String>, R: Into<String>>(
        chrom: C,
        pos: Option<u64>,
        ref_allele: R,
        alt_alleles: Vec<String>,
    ) -> Self {
        Record {
            chrom: chrom.into(),
            pos,
            ref_allele: ref_allele.into(),
            alt_alleles,
            ..Default::default()
        }
    }

    /// Returns QUAL, or `None` if it was `.`.
    pub fn qual(&self) -> Option<f64> {
        if self.qual == MISSING_QUAL {
            None
        } else {
            Some(self.qual)
        }
    }

    /// QUAL with [`MISSING_QUAL`] standing in for `.`.
    pub fn raw_qual(&self) -> f64 {
        self.qual
    }

    pub fn set_qual(&mut self, qual: Option<f64>) -> &mut Self {
        self.qual = qual.unwrap_or(MISSING_QUAL);
        self
    }

    /// Adds an INFO entry after the existing ones; `None` adds a flag.
    /// Re-adding a key replaces its value in place.
    pub fn push_info<K: Into<String>>(&mut self, key: K, value: Option<&str>) -> &mut Self {
        let key = key.into();
        let value = value.map_or_else(|| key.clone(), str::to_owned);
        let next = self.info_order.values().max().map_or(0, |&last| last + 1);
        self.info_order.entry(key.clone()).or_insert(next);
        self.info.insert(key, value);
        self
    }

    pub fn info_value(&self, key: &str) -> Option<&str> {
        self.info.get(key).map(String::as_str)
    }

    pub fn has_flag(&self, key: &str) -> bool {
        self.info_value(key) == Some(key)
    }

    /// INFO keys in column order.
    pub fn info_keys(&self) -> Vec<&str> {
        self.info_order
            .iter()
            .sorted_by_key(|(_, position)| **position)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn set_format_keys<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.format = keys
            .into_iter()
            .enumerate()
            .map(|(position, key)| (key.into(), position))
            .collect();
        self
    }

    /// FORMAT keys in column order.
    pub fn format_keys(&self) -> Vec<&str> {
        self.format
            .iter()
            .sorted_by_key(|(_, position)| **position)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Appends a raw sample column, e.g. `0|1:48`.
    pub fn push_genotype<S: Into<String>>(&mut self, raw: S) -> &mut Self {
        self.genotypes.push(raw.into());
        self
    }

    pub fn decoded_genotype_count(&self) -> usize {
        self.parsed_genotypes.len()
    }

    pub fn is_genotype_decoded(&self, sample: &str) -> bool {
        self.parsed_genotypes.contains(sample)
    }

    /// Zero-based start; an unknown or zero position maps to 0.
    pub fn start_zero(&self) -> u64 {
        self.pos.unwrap_or(0).saturating_sub(1)
    }

    pub fn end_zero(&self) -> u64 {
        self.start_zero()
    }

    pub fn start_one(&self) -> Option<u64> {
        self.pos
    }

    pub fn end_one(&self) -> Option<u64> {
        self.start_one()
    }

    fn qual_text(&self) -> String {
        match (self.qual(), self.qual_format) {
            (None, _) => MISSING_VALUE.to_owned(),
            (Some(qual), QualFormat::Fixed) => format!("{}", qual),
            (Some(qual), QualFormat::Exponent) => exponent_text(qual),
        }
    }

    fn info_text(&self) -> String {
        if self.info_order.is_empty() {
            return MISSING_VALUE.to_owned();
        }
        self.info_keys()
            .into_iter()
            .map(|key| match self.info.get(key) {
                Some(value) if value != key => format!("{}={}", key, value),
                _ => key.to_owned(),
            })
            .join(";")
    }
}

/// Scientific notation with a signed exponent of at least two digits, e.g. `1.5e+03`.
fn exponent_text(value: f64) -> String {
    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => {
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            Err(_) => text,
        },
        None => text,
    }
}

impl fmt::Display for Record {
    /// Writes the data line without a line terminator. Sample columns are
    /// always written from the raw text, never from decoded genotypes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self
            .pos
            .map_or_else(|| MISSING_VALUE.to_owned(), |pos| pos.to_string());
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            pos,
            self.id,
            self.ref_allele,
            self.alt_alleles.iter().join(","),
            self.qual_text(),
            self.filter,
            self.info_text()
        )?;
        if !self.genotypes.is_empty() {
            write!(
                f,
                "\t{}\t{}",
                self.format_keys().iter().join(":"),
                self.genotypes.iter().join("\t")
            )?;
        }
        Ok(())
    }
}
