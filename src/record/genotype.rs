use std::collections::HashMap;
use std::convert::TryFrom;

use getset::Getters;
use indexmap::IndexMap;

use crate::error::{Result, VcfError};
use crate::record::{Record, Shared, MISSING_VALUE};

/// Allele index standing in for `.` in a GT field.
pub const MISSING_ALLELE: i32 = -1;

/// One sample's decoded genotype column.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Genotype {
    /// Sample name.
    #[getset(get = "pub")]
    pub(crate) id: String,
    /// Allele indices from GT, [`MISSING_ALLELE`] for `.`.
    #[getset(get = "pub")]
    pub(crate) gt: Vec<i32>,
    pub(crate) phased: bool,
    /// Raw value of every FORMAT key for this sample.
    #[getset(get = "pub")]
    pub(crate) fields: HashMap<String, String>,
}

impl Genotype {
    /// Whether GT used `|`.
    pub fn is_phased(&self) -> bool {
        self.phased
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn alleles(&self) -> Vec<GenotypeAllele> {
        self.gt
            .iter()
            .map(|&index| GenotypeAllele::new(index, self.phased))
            .collect()
    }
}

/// Phased or unphased alleles, represented as indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenotypeAllele {
    Unphased(i32),
    Phased(i32),
    UnphasedMissing,
    PhasedMissing,
}

impl GenotypeAllele {
    pub fn new(index: i32, phased: bool) -> Self {
        match (index, phased) {
            (MISSING_ALLELE, true) => GenotypeAllele::PhasedMissing,
            (MISSING_ALLELE, false) => GenotypeAllele::UnphasedMissing,
            (i, true) => GenotypeAllele::Phased(i),
            (i, false) => GenotypeAllele::Unphased(i),
        }
    }

    /// Get the index into the list of alleles.
    pub fn index(self) -> Option<u32> {
        match self {
            GenotypeAllele::Unphased(i) | GenotypeAllele::Phased(i) => u32::try_from(i).ok(),
            GenotypeAllele::UnphasedMissing | GenotypeAllele::PhasedMissing => None,
        }
    }
}

fn gt_alleles(sample: &str, gt: &str) -> Result<(Vec<i32>, bool)> {
    let phased = gt.contains('|');
    let separator = if phased { '|' } else { '/' };
    let alleles = gt
        .split(separator)
        .map(|allele| {
            if allele == MISSING_VALUE {
                return Ok(MISSING_ALLELE);
            }
            // allele indices are never negative; only `.` maps to MISSING_ALLELE
            match allele.parse::<i32>() {
                Ok(index) if index >= 0 => Ok(index),
                _ => Err(VcfError::InvalidAllele {
                    sample: sample.to_owned(),
                    allele: allele.to_owned(),
                }),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((alleles, phased))
}

impl Record {
    /// Decodes the genotype column of `sample`, looked up in the header's sample
    /// index. The first successful decode is cached on the record; later calls
    /// return the same handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_vcf::Reader;
    ///
    /// let mut reader = Reader::from_path("resources/example.vcf").unwrap();
    /// let record = reader.read_record().unwrap().unwrap();
    /// let genotype = record.decode_genotype("NA00002", reader.header().samples()).unwrap();
    /// assert_eq!(genotype.gt(), &[1, 0]);
    /// assert!(genotype.is_phased());
    /// assert_eq!(genotype.field("GQ"), Some("48"));
    /// ```
    pub fn decode_genotype(
        &self,
        sample: &str,
        samples: &IndexMap<String, usize>,
    ) -> Result<Shared<Genotype>> {
        let &index = samples
            .get(sample)
            .ok_or_else(|| VcfError::GenotypeNotInFile {
                sample: sample.to_owned(),
            })?;
        self.parsed_genotypes
            .get_or_try_insert_with(sample, || self.parse_genotype(sample, index))
    }

    /// Decodes several samples; one result per requested name, in request order.
    pub fn decode_genotypes<S: AsRef<str>>(
        &self,
        requested: &[S],
        samples: &IndexMap<String, usize>,
    ) -> Vec<Result<Shared<Genotype>>> {
        requested
            .iter()
            .map(|sample| self.decode_genotype(sample.as_ref(), samples))
            .collect()
    }

    /// Decodes every sample, in column order.
    pub fn decode_all_genotypes(
        &self,
        samples: &IndexMap<String, usize>,
    ) -> Vec<Result<Shared<Genotype>>> {
        let mut names: Vec<(&String, &usize)> = samples.iter().collect();
        names.sort_by_key(|(_, index)| **index);
        names
            .into_iter()
            .map(|(sample, _)| self.decode_genotype(sample, samples))
            .collect()
    }

    fn parse_genotype(&self, sample: &str, index: usize) -> Result<Genotype> {
        let malformed = |found| VcfError::MalformedGenotypeData {
            sample: sample.to_owned(),
            expected: self.format.len(),
            found,
        };
        let raw = self.genotypes.get(index).ok_or_else(|| malformed(0))?;
        let values: Vec<&str> = raw.split(':').collect();
        if values.len() != self.format.len() {
            return Err(malformed(values.len()));
        }

        let mut genotype = Genotype {
            id: sample.to_owned(),
            gt: Vec::new(),
            phased: false,
            fields: HashMap::with_capacity(self.format.len()),
        };
        for (key, &position) in &self.format {
            let value = *values.get(position).ok_or_else(|| malformed(values.len()))?;
            if key == "GT" {
                let (gt, phased) = gt_alleles(sample, value)?;
                genotype.gt = gt;
                genotype.phased = phased;
            }
            genotype.fields.insert(key.clone(), value.to_owned());
        }
        Ok(genotype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn samples(names: &[&str]) -> IndexMap<String, usize> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect()
    }

    fn record(genotypes: &[&str]) -> Record {
        let mut line = "20\t14370\trs6054257\tG\tA\t29\tPASS\tNS=3\tGT:GQ:DP:HQ".to_owned();
        for genotype in genotypes {
            line.push('\t');
            line.push_str(genotype);
        }
        parser::record(&line, genotypes.len()).unwrap()
    }

    #[test]
    fn test_decode_phased() {
        let record = record(&["0|0:48:1:51,51"]);
        let genotype = record.decode_genotype("NA00001", &samples(&["NA00001"])).unwrap();
        assert_eq!(genotype.id(), "NA00001");
        assert_eq!(genotype.gt(), &[0, 0]);
        assert!(genotype.is_phased());
        assert_eq!(genotype.fields().len(), 4);
        assert_eq!(genotype.field("GT"), Some("0|0"));
        assert_eq!(genotype.field("GQ"), Some("48"));
        assert_eq!(genotype.field("DP"), Some("1"));
        assert_eq!(genotype.field("HQ"), Some("51,51"));
    }

    #[test]
    fn test_decode_unphased_and_missing() {
        let record = record(&["0/0:48:1:51,51", ".:.:.:.", "./1:3:5:65,3"]);
        let samples = samples(&["A", "B", "C"]);

        let a = record.decode_genotype("A", &samples).unwrap();
        assert_eq!(a.gt(), &[0, 0]);
        assert!(!a.is_phased());

        let b = record.decode_genotype("B", &samples).unwrap();
        assert_eq!(b.gt(), &[MISSING_ALLELE]);
        assert_eq!(b.alleles(), [GenotypeAllele::UnphasedMissing]);

        let c = record.decode_genotype("C", &samples).unwrap();
        assert_eq!(c.gt(), &[-1, 1]);
        assert_eq!(
            c.alleles(),
            [GenotypeAllele::UnphasedMissing, GenotypeAllele::Unphased(1)]
        );
        assert_eq!(c.alleles()[1].index(), Some(1));
        assert_eq!(c.alleles()[0].index(), None);
    }

    #[test]
    fn test_decode_is_memoized() {
        let record = record(&["0|1:48:1:51,51", "1/1:43:5:.,."]);
        let samples = samples(&["NA00001", "NA00002"]);
        assert!(!record.is_genotype_decoded("NA00001"));

        let first = record.decode_genotype("NA00001", &samples).unwrap();
        let second = record.decode_genotype("NA00001", &samples).unwrap();
        assert!(Shared::ptr_eq(&first, &second));
        assert_eq!(record.decoded_genotype_count(), 1);
        assert!(record.is_genotype_decoded("NA00001"));
        assert!(!record.is_genotype_decoded("NA00002"));

        record.decode_genotype("NA00002", &samples).unwrap();
        assert_eq!(record.decoded_genotype_count(), 2);
    }

    #[test]
    fn test_decode_unknown_sample() {
        let record = record(&["0|0:48:1:51,51"]);
        let result = record.decode_genotype("NA00009", &samples(&["NA00001"]));
        assert!(matches!(result, Err(VcfError::GenotypeNotInFile { sample }) if sample == "NA00009"));
        assert_eq!(record.decoded_genotype_count(), 0);
    }

    #[test]
    fn test_decode_malformed() {
        let record = record(&["0|0:48:1:51,51", "0/0:41:3"]);
        let samples = samples(&["NA00001", "NA00002"]);
        assert!(matches!(
            record.decode_genotype("NA00002", &samples),
            Err(VcfError::MalformedGenotypeData {
                expected: 4,
                found: 3,
                ..
            })
        ));
        assert!(!record.is_genotype_decoded("NA00002"));
        assert!(record.decode_genotype("NA00001", &samples).is_ok());
    }

    #[test]
    fn test_decode_invalid_allele() {
        let record = record(&["0|x:48:1:51,51"]);
        assert!(matches!(
            record.decode_genotype("NA00001", &samples(&["NA00001"])),
            Err(VcfError::InvalidAllele { allele, .. }) if allele == "x"
        ));
    }

    #[test]
    fn test_decode_negative_allele() {
        let record = record(&["0/-2:48:1:51,51", "0/-1:48:1:51,51"]);
        let samples = samples(&["NA00001", "NA00002"]);
        assert!(matches!(
            record.decode_genotype("NA00001", &samples),
            Err(VcfError::InvalidAllele { allele, .. }) if allele == "-2"
        ));
        assert!(matches!(
            record.decode_genotype("NA00002", &samples),
            Err(VcfError::InvalidAllele { allele, .. }) if allele == "-1"
        ));
        assert_eq!(GenotypeAllele::Unphased(-2).index(), None);
        assert_eq!(GenotypeAllele::Phased(2).index(), Some(2));
    }

    #[test]
    fn test_decode_without_sample_columns() {
        let record = parser::record("20\t14370\t.\tG\tA\t29\tPASS\tNS=3", 0).unwrap();
        assert!(matches!(
            record.decode_genotype("NA00001", &samples(&["NA00001"])),
            Err(VcfError::MalformedGenotypeData { found: 0, .. })
        ));
    }

    #[test]
    fn test_decode_batches() {
        let record = record(&["0|0:48:1:51,51", "0/0:41:3", "1/1:43:5:.,."]);
        let samples = samples(&["NA00001", "NA00002", "NA00003"]);

        let some = record.decode_genotypes(&["NA00003", "missing"], &samples);
        assert_eq!(some.len(), 2);
        assert_eq!(some[0].as_ref().unwrap().gt(), &[1, 1]);
        assert!(some[1].is_err());

        let all = record.decode_all_genotypes(&samples);
        let ids: Vec<_> = all
            .iter()
            .map(|result| result.as_ref().map(|gt| gt.id().clone()).ok())
            .collect();
        assert_eq!(
            ids,
            [Some("NA00001".to_owned()), None, Some("NA00003".to_owned())]
        );
        assert_eq!(record.decoded_genotype_count(), 2);
    }
}
