use async_trait::async_trait;
use tenor_core::{Currency, InstrumentKind, InstrumentRef};

/// Result of one instrument universe query
///
/// An empty universe is a valid answer (nothing listed, or the listing
/// could not be fetched); it is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
    instruments: Vec<InstrumentRef>,
}

impl Universe {
    pub fn new(instruments: Vec<InstrumentRef>) -> Self {
        Self { instruments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InstrumentRef> {
        self.instruments.iter()
    }

    pub fn instruments(&self) -> &[InstrumentRef] {
        &self.instruments
    }
}

impl<'a> IntoIterator for &'a Universe {
    type Item = &'a InstrumentRef;
    type IntoIter = std::slice::Iter<'a, InstrumentRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}

/// Port for resolving the tradable (market, instrument) pairs
///
/// Implementations swallow and log their own failures, returning an empty
/// universe instead.
#[async_trait]
pub trait UniverseSource: Send + Sync {
    async fn resolve(&self, currency: Option<Currency>, kind: Option<InstrumentKind>)
    -> Universe;
}
