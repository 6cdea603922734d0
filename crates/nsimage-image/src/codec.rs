//! Section compression codecs.

use std::io::Read;

use crate::error::{ImageError, ImageResult};

/// Codec applied independently to every section body, named in the summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Codec {
    #[default]
    Identity,
    Zstd,
}

impl Codec {
    /// Resolve the codec name carried in the summary. An absent or empty
    /// name means sections are stored uncompressed.
    pub fn from_name(name: Option<&str>) -> ImageResult<Self> {
        match name {
            None | Some("") | Some("none") => Ok(Self::Identity),
            Some("zstd") => Ok(Self::Zstd),
            Some(other) => Err(ImageError::UnknownCodec(other.to_string())),
        }
    }

    /// Wrap a bounded section stream with this codec's decoder.
    pub fn wrap<'a>(&self, r: Box<dyn Read + 'a>) -> ImageResult<Box<dyn Read + 'a>> {
        match self {
            Self::Identity => Ok(r),
            Self::Zstd => Ok(Box::new(zstd::stream::read::Decoder::new(r)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_names() {
        assert_eq!(Codec::from_name(None).unwrap(), Codec::Identity);
        assert_eq!(Codec::from_name(Some("")).unwrap(), Codec::Identity);
        assert_eq!(Codec::from_name(Some("none")).unwrap(), Codec::Identity);
    }

    #[test]
    fn zstd_name() {
        assert_eq!(Codec::from_name(Some("zstd")).unwrap(), Codec::Zstd);
    }

    #[test]
    fn unknown_name_rejected() {
        let err = Codec::from_name(Some("lz4")).unwrap_err();
        assert!(matches!(err, ImageError::UnknownCodec(name) if name == "lz4"));
    }

    #[test]
    fn zstd_roundtrip() {
        let plain = b"section body bytes".to_vec();
        let compressed = zstd::encode_all(plain.as_slice(), 3).unwrap();
        let mut wrapped = Codec::Zstd
            .wrap(Box::new(compressed.as_slice()))
            .unwrap();
        let mut out = Vec::new();
        wrapped.read_to_end(&mut out).unwrap();
        assert_eq!(out, plain);
    }

    #[test]
    fn identity_passthrough() {
        let plain = b"raw".to_vec();
        let mut wrapped = Codec::Identity.wrap(Box::new(plain.as_slice())).unwrap();
        let mut out = Vec::new();
        wrapped.read_to_end(&mut out).unwrap();
        assert_eq!(out, plain);
    }
}
