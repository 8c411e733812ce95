use std::fmt;
use std::str::FromStr;

use getset::{Getters, Setters};
use indexmap::IndexMap;
use itertools::Itertools;
use multimap::MultiMap;
use strum::EnumString;

use crate::error::VcfError;
use crate::parser::{HeaderAssembler, HeaderState};

/// Sub-field keys stored in typed [`Directive`] fields, in the order they are written
/// when a directive has no recorded field order.
pub const CANONICAL_FIELD_ORDER: [&str; 5] = ["ID", "Number", "Type", "Description", "URL"];

/// The eight mandatory columns of the `#CHROM` line.
pub const FIXED_COLUMNS: [&str; 8] = [
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO",
];

/// Collection a structured directive is filed under, keyed by its `FieldType`.
///
/// Matching is exact and case-sensitive; anything unknown is [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
pub enum Category {
    #[strum(serialize = "META")]
    Meta,
    #[strum(serialize = "INFO")]
    Info,
    #[strum(serialize = "FILTER")]
    Filter,
    #[strum(serialize = "FORMAT")]
    Format,
    #[strum(serialize = "ALT")]
    Alt,
    #[strum(serialize = "SAMPLE")]
    Sample,
    #[strum(serialize = "assembly")]
    Assembly,
    #[strum(serialize = "contig")]
    Contig,
    #[strum(serialize = "pedigree")]
    Pedigree,
    #[strum(disabled)]
    Other,
}

impl Category {
    pub fn of(field_type: &str) -> Self {
        Category::from_str(field_type).unwrap_or(Category::Other)
    }
}

/// A structured `##FieldType=<ID=...,Number=...,...>` meta-information line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Setters)]
#[getset(get = "pub", set = "pub")]
pub struct Directive {
    pub(crate) field_type: String,
    pub(crate) id: String,
    pub(crate) number: String,
    /// The `Type` sub-field.
    pub(crate) kind: String,
    pub(crate) description: String,
    pub(crate) url: String,
    /// Non-standard sub-fields.
    pub(crate) optional: IndexMap<String, String>,
    /// Sub-field keys in the order they were read; drives serialization.
    pub(crate) field_order: Vec<String>,
}

impl Directive {
    pub fn new<F: Into<String>, I: Into<String>>(field_type: F, id: I) -> Self {
        Directive {
            field_type: field_type.into(),
            id: id.into(),
            field_order: vec!["ID".to_owned()],
            ..Default::default()
        }
    }

    pub(crate) fn from_fields(field_type: &str, fields: &IndexMap<&str, &str>) -> Self {
        let mut directive = Directive {
            field_type: field_type.to_owned(),
            field_order: fields.keys().map(|&key| key.to_owned()).collect(),
            ..Default::default()
        };
        for (&key, &value) in fields {
            directive.store(key, value);
        }
        directive
    }

    /// Sets a sub-field, appending its key to the field order when it is new.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        let key = key.into();
        self.store(&key, &value.into());
        if !self.field_order.contains(&key) {
            self.field_order.push(key);
        }
        self
    }

    fn store(&mut self, key: &str, value: &str) {
        let value = value.to_owned();
        match key {
            "ID" => self.id = value,
            "Number" => self.number = value,
            "Type" => self.kind = value,
            "Description" => self.description = value,
            "URL" => self.url = value,
            _ => {
                self.optional.insert(key.to_owned(), value);
            }
        }
    }

    /// Looks a sub-field up by its wire key, typed or optional.
    pub fn value(&self, key: &str) -> Option<&str> {
        match key {
            "ID" => Some(&self.id),
            "Number" => Some(&self.number),
            "Type" => Some(&self.kind),
            "Description" => Some(&self.description),
            "URL" => Some(&self.url),
            other => self.optional.get(other).map(String::as_str),
        }
    }

    fn serialization_order(&self) -> Vec<&str> {
        if self.field_order.is_empty() {
            CANONICAL_FIELD_ORDER
                .iter()
                .copied()
                .chain(self.optional.keys().map(String::as_str))
                .collect()
        } else {
            self.field_order.iter().map(String::as_str).collect()
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .serialization_order()
            .into_iter()
            .filter_map(|key| {
                self.value(key)
                    .filter(|value| !value.is_empty())
                    .map(|value| format!("{}={}", key, value))
            })
            .join(",");
        write!(f, "##{}=<{}>", self.field_type, fields)
    }
}

/// A simple `##key=value` meta-information line.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct SingleValueDirective {
    pub(crate) field_type: String,
    pub(crate) value: String,
}

impl SingleValueDirective {
    pub fn new<F: Into<String>, V: Into<String>>(field_type: F, value: V) -> Self {
        SingleValueDirective {
            field_type: field_type.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for SingleValueDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "##{}={}", self.field_type, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Getters)]
pub struct Header {
    #[getset(get = "pub")]
    pub(crate) file_format: String,
    #[getset(get = "pub")]
    pub(crate) single_values: Vec<SingleValueDirective>,
    /// Every structured directive in file order.
    #[getset(get = "pub")]
    pub(crate) directives: Vec<Directive>,
    /// Category to positions in `directives`.
    pub(crate) categories: MultiMap<Category, usize>,
    /// Sample name to its zero-based sample column.
    #[getset(get = "pub")]
    pub(crate) samples: IndexMap<String, usize>,
}

impl Header {
    pub fn new<S: Into<String>>(file_format: S) -> Self {
        Header {
            file_format: file_format.into(),
            ..Default::default()
        }
    }

    pub fn push_directive(&mut self, directive: Directive) {
        let category = Category::of(&directive.field_type);
        self.categories.insert(category, self.directives.len());
        self.directives.push(directive);
    }

    pub fn push_single_value(&mut self, directive: SingleValueDirective) {
        self.single_values.push(directive);
    }

    /// Appends a sample column and returns its index. Adding a name twice keeps
    /// the first index.
    pub fn add_sample<S: Into<String>>(&mut self, name: S) -> usize {
        let next = self.samples.len();
        *self.samples.entry(name.into()).or_insert(next)
    }

    pub fn category(&self, category: Category) -> Vec<&Directive> {
        self.categories
            .get_vec(&category)
            .map(|positions| positions.iter().map(|&i| &self.directives[i]).collect())
            .unwrap_or_default()
    }

    pub fn metas(&self) -> Vec<&Directive> {
        self.category(Category::Meta)
    }

    pub fn infos(&self) -> Vec<&Directive> {
        self.category(Category::Info)
    }

    pub fn filters(&self) -> Vec<&Directive> {
        self.category(Category::Filter)
    }

    pub fn formats(&self) -> Vec<&Directive> {
        self.category(Category::Format)
    }

    pub fn alts(&self) -> Vec<&Directive> {
        self.category(Category::Alt)
    }

    pub fn assemblies(&self) -> Vec<&Directive> {
        self.category(Category::Assembly)
    }

    pub fn contigs(&self) -> Vec<&Directive> {
        self.category(Category::Contig)
    }

    /// `##SAMPLE=<...>` directives, not to be confused with [`Header::samples`].
    pub fn sample_directives(&self) -> Vec<&Directive> {
        self.category(Category::Sample)
    }

    pub fn pedigrees(&self) -> Vec<&Directive> {
        self.category(Category::Pedigree)
    }

    pub fn others(&self) -> Vec<&Directive> {
        self.category(Category::Other)
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Sample names in column order.
    pub fn sample_names(&self) -> Vec<&str> {
        self.samples
            .iter()
            .sorted_by_key(|(_, index)| **index)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn sample_index(&self, name: &str) -> Option<usize> {
        self.samples.get(name).copied()
    }
}

impl FromStr for Header {
    type Err = VcfError;

    /// Parses header text up to and including the `#CHROM` line; anything after it is ignored.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut assembler = HeaderAssembler::new();
        for line in text.lines() {
            if assembler.push_line(line)? == HeaderState::Done {
                break;
            }
        }
        assembler.finish()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "##fileformat={}", self.file_format)?;
        for directive in &self.single_values {
            writeln!(f, "{}", directive)?;
        }
        for directive in &self.directives {
            writeln!(f, "{}", directive)?;
        }
        write!(f, "{}", FIXED_COLUMNS.iter().join("\t"))?;
        if !self.samples.is_empty() {
            write!(f, "\tFORMAT\t{}", self.sample_names().iter().join("\t"))?;
        }
        writeln!(f)
    }
}
