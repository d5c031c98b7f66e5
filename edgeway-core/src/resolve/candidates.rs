use crate::canonical::{CanonicalPath, canonicalize, is_ambiguous};

/// The canonical interpretations of one raw path, in precedence order.
///
/// `once` is the single-decode reading and always comes first. `twice` is the
/// deeper reading, present only when the raw path is ambiguous, more than one
/// decode pass is allowed, and the deeper reading actually differs.
///
/// The resolver and the dispatcher both derive candidates here so that store
/// probes and cache lookups can never disagree on precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    pub once: CanonicalPath,
    pub twice: Option<CanonicalPath>,
    pub ambiguous: bool,
}

impl Candidates {
    pub fn derive(raw: &str, decode_passes: u8) -> Self {
        let once = canonicalize(raw, decode_passes.min(1));

        if decode_passes < 2 || !is_ambiguous(raw) {
            return Self {
                once,
                twice: None,
                ambiguous: false,
            };
        }

        let twice = canonicalize(raw, decode_passes);
        let twice = (twice != once).then_some(twice);

        Self {
            once,
            twice,
            ambiguous: true,
        }
    }

    /// Candidates in precedence order: single-decode first.
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalPath> {
        std::iter::once(&self.once).chain(self.twice.as_ref())
    }

    pub fn len(&self) -> usize {
        1 + usize::from(self.twice.is_some())
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
