//! Identifier management using string interning for efficient storage and comparison
//!
//! This module provides the [`Id`] type used for both nodes and edges. Ids are
//! interned strings, so they are `Copy` and cheap to compare, while still
//! carrying a stable textual form for logging and debugging. Freshly created
//! graph elements get their ids from [`Id::random`].

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use rand::Rng;
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Alphabet used by [`Id::random`]. URL-safe, matching the id shape the
/// rendering surface expects.
const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Length of randomly generated identifiers.
const ID_LENGTH: usize = 12;

/// Efficient identifier type using string interning
///
/// Ids are unique for the lifetime of the element they name and stable under
/// every mutation the store performs.
///
/// # Examples
///
/// ```
/// use trellis_core::identifier::Id;
///
/// // Create identifiers from known names
/// let start_id = Id::new("start");
///
/// // Create fresh identifiers for new graph elements
/// let node_id = Id::random();
/// assert_ne!(node_id, start_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::identifier::Id;
    ///
    /// let id = Id::new("start");
    /// assert_eq!(id, "start");
    /// ```
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }

    /// Creates a fresh random `Id` for a newly created node or edge.
    ///
    /// The id is a 12-character string drawn from a URL-safe alphabet.
    /// Collisions are possible in principle but vanishingly unlikely for
    /// graphs of interactive-editor size.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        let name: String = (0..ID_LENGTH)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self::new(&name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
