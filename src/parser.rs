use indexmap::IndexMap;
use nom::branch::alt;
use nom::bytes::complete::{escaped, is_not, tag};
use nom::character::complete::{char, none_of, one_of};
use nom::combinator::{opt, recognize, rest};
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, separated_pair};
use nom::IResult;

use crate::error::{Result, VcfError};
use crate::record::{QualFormat, Record, MISSING_QUAL, MISSING_VALUE};
use crate::types::{Directive, Header, SingleValueDirective};

/// One `##` line, classified.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MetaLine<'a> {
    /// `##key=value`
    Simple { key: &'a str, value: &'a str },
    /// `##key=<k=v,...>`; fields keep the order of first appearance.
    Structured {
        field_type: &'a str,
        fields: IndexMap<&'a str, &'a str>,
    },
}

fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(is_not("="), char('='), rest)(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('"'),
        opt(escaped(none_of("\\\""), '\\', one_of("\\\""))),
        char('"'),
    ))(input)
}

// an unbalanced quote is taken literally
fn sub_field(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((quoted, is_not(",\""), tag("\"")))))(input)
}

fn sub_fields(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list0(char(','), sub_field)(input)
}

pub(crate) fn meta_line(line: &str) -> Result<MetaLine<'_>> {
    let invalid = || VcfError::InvalidMetaHeader {
        line: line.trim_end().to_owned(),
    };
    let content = line.trim().trim_start_matches('#').trim();
    let (_, (key, value)) = key_value(content).map_err(|_| invalid())?;
    if !value.starts_with('<') {
        return Ok(MetaLine::Simple { key, value });
    }

    let body = value.trim();
    let body = body.strip_prefix('<').unwrap_or(body);
    let body = body.strip_suffix('>').unwrap_or(body).trim();
    let (_, pieces) = sub_fields(body).map_err(|_| invalid())?;

    let mut fields = IndexMap::with_capacity(pieces.len());
    for piece in pieces {
        match key_value(piece) {
            Ok((_, (field, field_value))) => {
                fields.insert(field, field_value);
            }
            Err(_) => log::trace!("dropping sub-field {:?} of ##{} line", piece, key),
        }
    }
    Ok(MetaLine::Structured {
        field_type: key,
        fields,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderState {
    ExpectFileFormat,
    ExpectMetaOrHeader,
    Done,
}

/// Builds a [`Header`] from consecutive lines, up to the `#CHROM` line.
#[derive(Debug)]
pub(crate) struct HeaderAssembler {
    state: HeaderState,
    header: Header,
}

impl HeaderAssembler {
    pub(crate) fn new() -> Self {
        HeaderAssembler {
            state: HeaderState::ExpectFileFormat,
            header: Header::default(),
        }
    }

    pub(crate) fn push_line(&mut self, line: &str) -> Result<HeaderState> {
        let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
        self.state = match self.state {
            HeaderState::ExpectFileFormat => {
                self.file_format(line)?;
                HeaderState::ExpectMetaOrHeader
            }
            HeaderState::ExpectMetaOrHeader if line.starts_with("##") => {
                self.meta(line)?;
                HeaderState::ExpectMetaOrHeader
            }
            HeaderState::ExpectMetaOrHeader if line.starts_with('#') => {
                self.column_line(line)?;
                HeaderState::Done
            }
            HeaderState::ExpectMetaOrHeader => return Err(VcfError::NoHeaderLine),
            HeaderState::Done => HeaderState::Done,
        };
        Ok(self.state)
    }

    fn file_format(&mut self, line: &str) -> Result<()> {
        match meta_line(line) {
            Ok(MetaLine::Simple {
                key: "fileformat",
                value,
            }) => {
                self.header.file_format = value.to_owned();
                Ok(())
            }
            _ => Err(VcfError::NotAVcf),
        }
    }

    fn meta(&mut self, line: &str) -> Result<()> {
        match meta_line(line)? {
            MetaLine::Simple { key, value } => {
                log::trace!("simple directive ##{}={}", key, value);
                self.header
                    .push_single_value(SingleValueDirective::new(key, value));
            }
            MetaLine::Structured { field_type, fields } => {
                log::trace!("structured directive ##{} with {} fields", field_type, fields.len());
                self.header
                    .push_directive(Directive::from_fields(field_type, &fields));
            }
        }
        Ok(())
    }

    fn column_line(&mut self, line: &str) -> Result<()> {
        let columns: Vec<&str> = line.split('\t').collect();
        match columns.len() {
            n if n < 8 => Err(VcfError::TooFewColumns { found: n }),
            8 => Ok(()),
            _ if columns[8] != "FORMAT" => Err(VcfError::MissingFormatColumn),
            9 => Err(VcfError::FormatWithoutGenotype),
            _ => {
                for &name in &columns[9..] {
                    self.header.add_sample(name);
                }
                Ok(())
            }
        }
    }

    pub(crate) fn finish(self) -> Result<Header> {
        match self.state {
            HeaderState::Done => {
                log::debug!(
                    "parsed {} header: {} directives, {} simple directives, {} samples",
                    self.header.file_format,
                    self.header.directives.len(),
                    self.header.single_values.len(),
                    self.header.sample_count()
                );
                Ok(self.header)
            }
            HeaderState::ExpectFileFormat => Err(VcfError::EmptyInput),
            HeaderState::ExpectMetaOrHeader => Err(VcfError::NoHeaderLine),
        }
    }
}

fn qual(text: &str) -> (f64, QualFormat) {
    if text == MISSING_VALUE {
        return (MISSING_QUAL, QualFormat::Fixed);
    }
    let format = if text.contains(|c| c == 'e' || c == 'E') {
        QualFormat::Exponent
    } else {
        QualFormat::Fixed
    };
    (text.parse().unwrap_or(0.0), format)
}

/// Parses one data line. Valid lines have 8 columns, or FORMAT plus one column
/// per header sample.
pub(crate) fn record(line: &str, sample_count: usize) -> Result<Record> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    let n = fields.len();
    if !(n == 8 || (n > 9 && n == 9 + sample_count)) {
        return Err(VcfError::TooFewColumns { found: n });
    }

    let (qual, qual_format) = qual(fields[5]);
    let mut record = Record {
        chrom: fields[0].to_owned(),
        pos: fields[1].parse().ok(),
        id: fields[2].to_owned(),
        ref_allele: fields[3].to_owned(),
        alt_alleles: fields[4].split(',').map(str::to_owned).collect(),
        qual,
        qual_format,
        filter: fields[6].to_owned(),
        ..Default::default()
    };

    for (position, piece) in fields[7].split(';').enumerate() {
        let (key, value) = piece.split_once('=').unwrap_or((piece, piece));
        record.info.insert(key.to_owned(), value.to_owned());
        record.info_order.insert(key.to_owned(), position);
    }

    if n > 8 {
        record.format = fields[8]
            .split(':')
            .enumerate()
            .map(|(position, key)| (key.to_owned(), position))
            .collect();
        record.genotypes = fields[9..].iter().map(|&raw| raw.to_owned()).collect();
    }
    Ok(record)
}
