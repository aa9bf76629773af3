//! A hasher which just proxies for the integer it's given. Handy for integer
//! keys that are already well distributed, and for knowing exactly which
//! bucket a key is going to land in.

use std::hash::{BuildHasher, Hasher};

/// Proxies integers for themselves.
#[derive(Debug, Default)]
pub struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn write(&mut self, _bytes: &[u8]) {
        panic!("IdentityHasher can only hash integers");
    }

    fn write_u8(&mut self, i: u8) {
        self.0 = i as u64;
    }

    fn write_u16(&mut self, i: u16) {
        self.0 = i as u64;
    }

    fn write_u32(&mut self, i: u32) {
        self.0 = i as u64;
    }

    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    fn write_usize(&mut self, i: usize) {
        self.0 = i as u64;
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Builds new IdentityHashers on demand.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildIdentityHasher;

impl BuildHasher for BuildIdentityHasher {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher(0)
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{BuildHasher, Hash, Hasher};

    use super::{BuildIdentityHasher, IdentityHasher};

    #[test]
    fn test_hasher() {
        let mut h0 = IdentityHasher(0);
        h0.write_u64(0xc8c8c8c8);
        assert_eq!(0xc8c8c8c8, h0.finish());

        let mut h1 = IdentityHasher(0);
        h1.write_u64(0xc8c8c8c8c8c8c8c8);
        assert_eq!(0xc8c8c8c8c8c8c8c8, h1.finish());
    }

    #[test]
    fn test_signed_and_narrow_keys() {
        // the signed writes forward to the unsigned ones
        let mut h = BuildIdentityHasher.build_hasher();
        17i32.hash(&mut h);
        assert_eq!(17, h.finish());

        let mut h = BuildIdentityHasher.build_hasher();
        200u8.hash(&mut h);
        assert_eq!(200, h.finish());
    }

    #[test]
    #[should_panic]
    fn test_rejects_strings() {
        let mut h = BuildIdentityHasher.build_hasher();
        "nope".hash(&mut h);
    }
}
