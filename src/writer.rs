use std::io::Write;

use crate::error::Result;
use crate::record::Record;
use crate::types::Header;

/// Writes a header and records back out in VCF text form, one `\n`-terminated line each.
pub struct Writer<W: Write> {
    inner: W,
    header_written: bool,
    records_written: usize,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Writer {
            inner,
            header_written: false,
            records_written: 0,
        }
    }

    /// Writes `##fileformat`, the simple directives, the structured directives in
    /// file order and the `#CHROM` line.
    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        write!(self.inner, "{}", header)?;
        self.header_written = true;
        log::trace!(
            "wrote header with {} directives",
            header.single_values().len() + header.directives().len()
        );
        Ok(())
    }

    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        writeln!(self.inner, "{}", record)?;
        self.records_written += 1;
        Ok(())
    }

    /// Writes the header, unless this writer already did, followed by `records`.
    pub fn write_all<'a, I>(&mut self, records: I, header: &Header) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        if !self.header_written {
            self.write_header(header)?;
        }
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    pub fn header_written(&self) -> bool {
        self.header_written
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
