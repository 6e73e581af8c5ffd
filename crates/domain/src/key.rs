use std::fmt;

/// Natural identifier of a reference entity, matched across dataset
/// revisions independently of any generated row id.
///
/// Registry codes never contain `|`, so the canonical form joins composite
/// parts with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BusinessKey {
    /// Single registry code (the common case).
    Code(String),
    /// Composite of two codes, e.g. organisation code + country code.
    Pair(String, String),
    /// Composite of three codes, e.g. product + substance + sequence.
    Triple(String, String, String),
}

impl BusinessKey {
    pub fn code(code: impl Into<String>) -> BusinessKey {
        BusinessKey::Code(code.into())
    }

    pub fn pair(a: impl Into<String>, b: impl Into<String>) -> BusinessKey {
        BusinessKey::Pair(a.into(), b.into())
    }

    pub fn triple(
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
    ) -> BusinessKey {
        BusinessKey::Triple(a.into(), b.into(), c.into())
    }

    /// Canonical string form, also the persisted representation.
    pub fn canonical(&self) -> String {
        match self {
            BusinessKey::Code(a) => a.clone(),
            BusinessKey::Pair(a, b) => format!("{}|{}", a, b),
            BusinessKey::Triple(a, b, c) => format!("{}|{}|{}", a, b, c),
        }
    }
}

impl fmt::Display for BusinessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_forms() {
        assert_eq!(BusinessKey::code("TBL").canonical(), "TBL");
        assert_eq!(BusinessKey::pair("MAH-1", "CZ").canonical(), "MAH-1|CZ");
        assert_eq!(
            BusinessKey::triple("0254045", "S123", "1").canonical(),
            "0254045|S123|1"
        );
    }

    #[test]
    fn composite_keys_do_not_collide_with_single_codes() {
        assert_ne!(
            BusinessKey::pair("A", "B").canonical(),
            BusinessKey::code("AB").canonical()
        );
    }
}
