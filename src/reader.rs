use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, VcfError};
use crate::parser::{self, HeaderAssembler, HeaderState};
use crate::record::Record;
use crate::types::Header;

/// Reads a VCF stream: the header on construction, then one record per call.
pub struct Reader<R: BufRead> {
    header: Header,
    line_number: u64,
    line: String,
    inner: R,
}

impl<R: BufRead> Reader<R> {
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of the last line read, 1-based.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl Reader<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::trace!("opening {:?}", path);
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: BufRead> Reader<R> {
    /// Reads and validates the header.
    ///
    /// An empty stream fails with [`VcfError::EmptyInput`](crate::VcfError::EmptyInput),
    /// which callers may treat as "nothing to read" rather than a fault.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_vcf::Reader;
    ///
    /// let text = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";
    /// let reader = Reader::new(text.as_bytes()).unwrap();
    /// assert_eq!(reader.header().file_format(), "VCFv4.2");
    /// assert_eq!(reader.header().sample_count(), 0);
    /// ```
    pub fn new(mut inner: R) -> Result<Self> {
        let mut assembler = HeaderAssembler::new();
        let mut line = String::new();
        let mut line_number = 0;
        loop {
            line.clear();
            if inner.read_line(&mut line)? == 0 {
                break;
            }
            line_number += 1;
            if assembler.push_line(&line)? == HeaderState::Done {
                break;
            }
        }
        let header = assembler.finish()?;
        Ok(Self {
            header,
            line_number,
            line,
            inner,
        })
    }

    /// Reads the next record; `Ok(None)` at end of input.
    ///
    /// A malformed line is reported as an error and skipped; the next call
    /// continues with the following line.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        self.line.clear();
        if self.inner.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        match parser::record(&self.line, self.header.sample_count()) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                log::debug!("line {}: {}", self.line_number, e);
                Err(e)
            }
        }
    }

    /// Reads the remaining records up to the first error.
    ///
    /// The records read before a failing line are returned together with its
    /// error; calling again continues after that line.
    pub fn read_all_records(&mut self) -> (Vec<Record>, Option<VcfError>) {
        let mut records = Vec::new();
        for record in self.by_ref() {
            match record {
                Ok(record) => records.push(record),
                Err(e) => return (records, Some(e)),
            }
        }
        (records, None)
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}
