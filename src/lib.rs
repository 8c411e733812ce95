pub mod error;
pub(crate) mod parser;
pub mod reader;
pub mod record;
pub mod types;
pub mod writer;

pub use error::{Result, VcfError};
pub use reader::Reader;
pub use record::{Genotype, GenotypeAllele, QualFormat, Record, Shared, MISSING_QUAL};
pub use types::{Category, Directive, Header, SingleValueDirective};
pub use writer::Writer;

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    const PATH: &str = "resources/example.vcf";

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_samples() {
        init();
        let reader = Reader::from_path(PATH).unwrap();
        assert_eq!(
            reader.header().sample_names(),
            vec!["NA00001", "NA00002", "NA00003"]
        );
    }

    #[test]
    fn test_categories() {
        let reader = Reader::from_path(PATH).unwrap();
        let header = reader.header();
        assert_eq!(header.file_format(), "VCFv4.2");
        assert_eq!(header.single_values().len(), 4);
        assert_eq!(header.infos().len(), 6);
        assert_eq!(header.filters().len(), 2);
        assert_eq!(header.formats().len(), 4);
        assert_eq!(header.alts().len(), 1);
        assert_eq!(header.contigs().len(), 1);
        assert_eq!(header.pedigrees().len(), 1);
        assert!(header.others().is_empty());
        assert_eq!(
            header.contigs()[0].value("species"),
            Some("\"Homo sapiens\"")
        );
        assert_eq!(
            header.infos()[4].description(),
            "\"dbSNP membership, build 129\""
        );
    }

    #[test]
    fn test_round_trip() -> anyhow::Result<()> {
        init();
        let original = fs::read_to_string(PATH)?;
        let mut reader = Reader::from_path(PATH)?;
        let (records, error) = reader.read_all_records();
        assert!(error.is_none());
        assert_eq!(records.len(), 5);

        let mut writer = Writer::new(Vec::new());
        writer.write_all(&records, reader.header())?;
        writer.flush()?;
        assert_eq!(String::from_utf8(writer.into_inner())?, original);
        Ok(())
    }

    #[test]
    fn test_genotypes() -> anyhow::Result<()> {
        let mut reader = Reader::from_path(PATH)?;
        let (records, error) = reader.read_all_records();
        assert!(error.is_none());
        let samples = reader.header().samples();

        let second = &records[1];
        assert!(matches!(
            second.decode_genotype("NA00003", samples),
            Err(VcfError::MalformedGenotypeData {
                expected: 4,
                found: 3,
                ..
            })
        ));
        assert_eq!(second.decode_genotype("NA00002", samples)?.gt(), &[0, 1]);

        let last = &records[4];
        let decoded = last.decode_all_genotypes(samples);
        assert!(decoded.iter().all(Result::is_ok));
        let missing = last.decode_genotype("NA00003", samples)?;
        assert_eq!(
            missing.alleles(),
            [GenotypeAllele::UnphasedMissing, GenotypeAllele::UnphasedMissing]
        );
        assert_eq!(last.decoded_genotype_count(), 3);
        Ok(())
    }

    #[test]
    fn test_record_fields() {
        let (records, error) = Reader::from_path(PATH).unwrap().read_all_records();
        assert!(error.is_none());
        let third = &records[2];
        assert_eq!(third.alt_alleles(), &["G".to_owned(), "T".to_owned()]);
        assert_eq!(third.info_value("AF"), Some("0.333,0.667"));
        assert!(third.has_flag("DB"));
        assert_eq!(records[3].alt_alleles(), &[".".to_owned()]);
        assert_eq!(records[4].format_keys(), ["GT", "GQ", "DP"]);
    }
}
