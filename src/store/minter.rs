//! Identifier minting for new child resources.
//!
//! A child of `parent` with naming hint "My Column" is first tried as
//! `parent/my-column`; when that IRI is already taken the minter appends a
//! random disambiguator (`parent/my-column-k3x9q2ab`). Without a hint the
//! disambiguator alone names the child.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use unicode_normalization::UnicodeNormalization;

use crate::graph::Iri;

/// Length of the random disambiguator.
const SUFFIX_LEN: usize = 8;

/// Derives collision-candidate IRIs for child resources.
#[derive(Debug)]
pub struct IdentifierMinter {
    rng: StdRng,
}

impl IdentifierMinter {
    /// A minter drawing disambiguators from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A minter with a reproducible disambiguator sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Turn a human-readable hint into a path segment.
    ///
    /// Accents are stripped through NFKD decomposition, ASCII letters and
    /// digits are kept lower-cased, and every other run of characters
    /// becomes a single `-`.
    pub fn slugify(hint: &str) -> String {
        let mut slug = String::with_capacity(hint.len());
        let mut pending_dash = false;
        for c in hint.nfkd() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c.to_ascii_lowercase());
            } else if !unicode_normalization::char::is_combining_mark(c) {
                pending_dash = true;
            }
        }
        slug
    }

    /// `parent/segment`, without doubling a trailing slash.
    pub fn child(parent: &Iri, segment: &str) -> Iri {
        let base = parent.as_str().trim_end_matches('/');
        Iri::new_unchecked(format!("{base}/{segment}"))
    }

    /// A fresh random disambiguator.
    pub fn disambiguator(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }

    /// The preferred IRI for a child: `parent/slug`, or a random child when
    /// the hint is absent or slugs to nothing.
    pub fn first_candidate(&mut self, parent: &Iri, hint: Option<&str>) -> Iri {
        match hint.map(Self::slugify).filter(|s| !s.is_empty()) {
            Some(slug) => Self::child(parent, &slug),
            None => {
                let suffix = self.disambiguator();
                Self::child(parent, &suffix)
            }
        }
    }

    /// A follow-up IRI after the previous candidate collided.
    pub fn retry_candidate(&mut self, parent: &Iri, hint: Option<&str>) -> Iri {
        let suffix = self.disambiguator();
        match hint.map(Self::slugify).filter(|s| !s.is_empty()) {
            Some(slug) => Self::child(parent, &format!("{slug}-{suffix}")),
            None => Self::child(parent, &suffix),
        }
    }
}

impl Default for IdentifierMinter {
    fn default() -> Self {
        Self::new()
    }
}
