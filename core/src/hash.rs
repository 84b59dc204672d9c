//! Hash related utils.

use md5::{Digest, Md5};

/// Hex encoded MD5 hash.
///
/// Use this function instead of `hex::encode(md5(content))` can reduce
/// extra copy.
pub fn hex_md5(content: &[u8]) -> String {
    hex::encode(Md5::digest(content).as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_md5() {
        assert_eq!(hex_md5(b""), "d41d8cd98f00b204e9800998ecf8428e");
        assert_eq!(hex_md5(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }
}
