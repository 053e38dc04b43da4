//! Bit addressing over byte-string keys.
//!
//! Bits are numbered globally from 0, most significant bit first within each
//! byte. Any bit at or past the end of a key reads as 0, so a key behaves as
//! if it were padded with zero bits forever.

#[inline]
fn bit_byte_index(bit: usize) -> usize {
    bit / 8
}

/// Shift that brings bit `bit` of its byte down to the LSB.
#[inline]
fn bit_shift_msb0(bit: usize) -> u32 {
    7 - (bit % 8) as u32
}

/// Value (0 or 1) of global bit `bit` of `key`; 0 once the key is exhausted.
#[inline]
pub fn bit_at(key: &[u8], bit: usize) -> usize {
    match key.get(bit_byte_index(bit)) {
        Some(&byte) => ((byte >> bit_shift_msb0(bit)) & 1) as usize,
        None => 0,
    }
}

/// Index of the first bit where `a` and `b` differ inside their common
/// byte prefix, or `min(len(a), len(b)) * 8` when one is a prefix of the
/// other (or both are equal).
pub fn first_divergent_bit(a: &[u8], b: &[u8]) -> usize {
    let common = a.len().min(b.len());
    for i in 0..common {
        let diff = a[i] ^ b[i];
        if diff != 0 {
            for j in (0..8).rev() {
                if (diff >> j) & 1 == 1 {
                    return i * 8 + (7 - j);
                }
            }
        }
    }
    common * 8
}

/// Index of the first bit where `bit_at(a, i) != bit_at(b, i)`.
///
/// Agrees with [`first_divergent_bit`] whenever the keys differ inside their
/// common prefix. When one key is a prefix of the other the shorter one reads
/// zeros from there on, so the split falls on the first set bit of the longer
/// key's tail. Returns `None` if the keys are equal under zero padding, which
/// for distinct keys only happens when the longer tail is all 0x00 bytes.
pub fn critical_bit(a: &[u8], b: &[u8]) -> Option<usize> {
    let divergent = first_divergent_bit(a, b);
    let common = a.len().min(b.len());
    if divergent < common * 8 {
        return Some(divergent);
    }

    let tail = if a.len() > b.len() { &a[common..] } else { &b[common..] };
    tail.iter()
        .position(|&byte| byte != 0)
        .map(|i| (common + i) * 8 + tail[i].leading_zeros() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_at_msb_first() {
        // 'a' = 0x61 = 0110_0001
        let key = b"a";
        let bits: Vec<usize> = (0..8).map(|i| bit_at(key, i)).collect();
        assert_eq!(bits, vec![0, 1, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_bit_at_out_of_range_is_zero() {
        assert_eq!(bit_at(b"", 0), 0);
        assert_eq!(bit_at(b"\xff", 7), 1);
        assert_eq!(bit_at(b"\xff", 8), 0);
        assert_eq!(bit_at(b"\xff", 1_000_000), 0);
    }

    #[test]
    fn test_first_divergent_bit_inside_prefix() {
        // 'a' = 0110_0001, 'b' = 0110_0010: MSB of the XOR is bit 6.
        assert_eq!(first_divergent_bit(b"apple", b"banana"), 6);
        // 'b' vs 'c' differ only in the last bit.
        assert_eq!(first_divergent_bit(b"b", b"c"), 7);
        // Second byte: 's' = 0111_0011, 'r' = 0111_0010.
        assert_eq!(first_divergent_bit(b"as", b"ar"), 15);
    }

    #[test]
    fn test_first_divergent_bit_prefix_pair() {
        assert_eq!(first_divergent_bit(b"a", b"ab"), 8);
        assert_eq!(first_divergent_bit(b"ab", b"a"), 8);
        assert_eq!(first_divergent_bit(b"", b"xyz"), 0);
        assert_eq!(first_divergent_bit(b"same", b"same"), 32);
    }

    #[test]
    fn test_critical_bit_prefix_pair_skips_to_first_set_bit() {
        // 'b' = 0110_0010: first set bit of the tail is bit 9.
        assert_eq!(critical_bit(b"a", b"ab"), Some(9));
        assert_eq!(critical_bit(b"ab", b"a"), Some(9));
        assert_eq!(bit_at(b"a", 9), 0);
        assert_eq!(bit_at(b"ab", 9), 1);

        // Empty key against anything non-empty.
        assert_eq!(critical_bit(b"", b"a"), Some(1));
        assert_eq!(critical_bit(b"", b"\x01"), Some(7));
    }

    #[test]
    fn test_critical_bit_matches_divergent_bit_inside_prefix() {
        let pairs: [(&[u8], &[u8]); 3] = [
            (b"apple", b"banana"),
            (b"cherry", b"banana"),
            (b"as", b"ar"),
        ];
        for (a, b) in pairs {
            assert_eq!(critical_bit(a, b), Some(first_divergent_bit(a, b)));
        }
    }

    #[test]
    fn test_critical_bit_indistinguishable() {
        assert_eq!(critical_bit(b"same", b"same"), None);
        assert_eq!(critical_bit(b"a", b"a\0\0"), None);
        assert_eq!(critical_bit(b"a", b"a\0\x80"), Some(16));
    }
}
