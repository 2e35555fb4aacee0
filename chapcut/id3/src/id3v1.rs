/*!
    ID3v1 trailer detection.

    ID3v1 is a fixed 128-byte block at the very end of the file starting
    with `TAG`. The "enhanced" variant adds a 227-byte `TAG+` block in
    front of it. Both are opaque here and only need to be kept out of the
    audio region.
*/

const V1_LEN: usize = 128;
const V1_ENHANCED_LEN: usize = 227;

/**
    Number of trailing bytes occupied by ID3v1 (and enhanced ID3v1) tags.
*/
pub fn trailer_len(data: &[u8]) -> usize {
    let len = data.len();
    if len < V1_LEN || &data[len - V1_LEN..len - V1_LEN + 3] != b"TAG" {
        return 0;
    }

    let total = V1_LEN + V1_ENHANCED_LEN;
    if len >= total && &data[len - total..len - total + 4] == b"TAG+" {
        total
    } else {
        V1_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_plain_trailer() {
        let mut data = vec![0xffu8; 1000];
        let start = data.len() - 128;
        data[start..start + 3].copy_from_slice(b"TAG");
        assert_eq!(trailer_len(&data), 128);
    }

    #[test]
    fn detects_enhanced_trailer() {
        let mut data = vec![0u8; 1000];
        let v1 = data.len() - 128;
        data[v1..v1 + 3].copy_from_slice(b"TAG");
        let plus = v1 - 227;
        data[plus..plus + 4].copy_from_slice(b"TAG+");
        assert_eq!(trailer_len(&data), 355);
    }

    #[test]
    fn no_trailer() {
        assert_eq!(trailer_len(&[0u8; 200]), 0);
        assert_eq!(trailer_len(b"TAG"), 0);
    }
}
