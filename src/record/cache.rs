use std::collections::HashMap;

#[cfg(not(feature = "sync"))]
use std::cell::RefCell;
#[cfg(not(feature = "sync"))]
use std::rc::Rc;
#[cfg(feature = "sync")]
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::record::Genotype;

/// Handle to a decoded genotype shared between the record cache and callers.
#[cfg(not(feature = "sync"))]
pub type Shared<T> = Rc<T>;
#[cfg(feature = "sync")]
pub type Shared<T> = Arc<T>;

/// Per-record memo of decoded genotypes, keyed by sample name. Never evicted.
#[derive(Debug, Default)]
pub(crate) struct GenotypeCache {
    #[cfg(not(feature = "sync"))]
    decoded: RefCell<HashMap<String, Shared<Genotype>>>,
    #[cfg(feature = "sync")]
    decoded: Mutex<HashMap<String, Shared<Genotype>>>,
}

impl GenotypeCache {
    #[cfg(not(feature = "sync"))]
    fn with_decoded<T>(&self, f: impl FnOnce(&mut HashMap<String, Shared<Genotype>>) -> T) -> T {
        f(&mut *self.decoded.borrow_mut())
    }

    // the lock is held across decoding, so a sample is decoded at most once
    #[cfg(feature = "sync")]
    fn with_decoded<T>(&self, f: impl FnOnce(&mut HashMap<String, Shared<Genotype>>) -> T) -> T {
        let mut decoded = self.decoded.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *decoded)
    }

    pub(crate) fn get_or_try_insert_with<F>(&self, sample: &str, decode: F) -> Result<Shared<Genotype>>
    where
        F: FnOnce() -> Result<Genotype>,
    {
        self.with_decoded(|decoded| {
            if let Some(genotype) = decoded.get(sample) {
                log::trace!("genotype of {} already decoded", sample);
                return Ok(Shared::clone(genotype));
            }
            log::trace!("decoding genotype of {}", sample);
            let genotype = Shared::new(decode()?);
            decoded.insert(sample.to_owned(), Shared::clone(&genotype));
            Ok(genotype)
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.with_decoded(|decoded| decoded.len())
    }

    pub(crate) fn contains(&self, sample: &str) -> bool {
        self.with_decoded(|decoded| decoded.contains_key(sample))
    }
}
