use dcbor::{CBOR, Map};

use crate::{Bdir, code::integral};

fn code_to_cbor(code: f64) -> CBOR {
    match integral(code) {
        Some(int) => CBOR::from(int),
        None => CBOR::from(code),
    }
}

/// Encodes the raw snapshot as a deterministic CBOR map.
///
/// Names are text keys mapping to codes; codes are numeric keys mapping to
/// labels.
impl From<&Bdir> for CBOR {
    fn from(bdir: &Bdir) -> Self {
        let mut map = Map::new();
        let declarations = bdir.tables.names.iter().zip(&bdir.tables.codes);
        for ((name, &code), label) in declarations.zip(&bdir.views.labels) {
            map.insert(name.as_str(), code_to_cbor(code));
            map.insert(code_to_cbor(code), label.as_str());
        }
        map.into()
    }
}

impl From<Bdir> for CBOR {
    fn from(bdir: Bdir) -> Self { CBOR::from(&bdir) }
}

impl Bdir {
    /// Returns the deterministic CBOR encoding of the raw snapshot.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdir::{Bdir, Entry};
    ///
    /// let single = Bdir::new([Entry::forward("A", 1.0)]).unwrap();
    /// // {1: "A", "A": 1}
    /// assert_eq!(
    ///     single.to_cbor_data(),
    ///     [0xa2, 0x01, 0x61, 0x41, 0x61, 0x41, 0x01]
    /// );
    /// ```
    pub fn to_cbor_data(&self) -> Vec<u8> { CBOR::from(self).to_cbor_data() }
}
