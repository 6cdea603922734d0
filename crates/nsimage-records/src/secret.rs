//! Delegation-token secret manager records.

use nsimage_wire::{FieldReader, WireRecord, WireResult};

/// Header of the SECRET_MANAGER section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SecretManagerHeader {
    pub current_id: u32,
    pub token_sequence_number: u32,
    pub num_keys: u32,
    pub num_tokens: u32,
}

impl WireRecord for SecretManagerHeader {
    const RECORD: &'static str = "SecretManagerHeader";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.current_id = f.u32()?,
                2 => rec.token_sequence_number = f.u32()?,
                3 => rec.num_keys = f.u32()?,
                4 => rec.num_tokens = f.u32()?,
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// One master key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DelegationKey {
    pub id: u32,
    pub expiry_date: Option<u64>,
    pub key: Vec<u8>,
}

impl WireRecord for DelegationKey {
    const RECORD: &'static str = "DelegationKey";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.id = f.u32()?,
                2 => rec.expiry_date = Some(f.u64()?),
                3 => rec.key = f.bytes()?.to_vec(),
                _ => {}
            }
        }
        Ok(rec)
    }
}

/// One persisted delegation token. Every field is optional on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistToken {
    pub version: Option<u32>,
    pub owner: Option<String>,
    pub renewer: Option<String>,
    pub real_user: Option<String>,
    pub issue_date: Option<u64>,
    pub max_date: Option<u64>,
    pub sequence_number: Option<u32>,
    pub master_key_id: Option<u32>,
    pub expiry_date: Option<u64>,
}

impl WireRecord for PersistToken {
    const RECORD: &'static str = "PersistToken";

    fn decode(data: &[u8]) -> WireResult<Self> {
        let mut rec = Self::default();
        let mut r = FieldReader::new(Self::RECORD, data);
        while let Some(f) = r.next_field()? {
            match f.number {
                1 => rec.version = Some(f.u32()?),
                2 => rec.owner = Some(f.string()?),
                3 => rec.renewer = Some(f.string()?),
                4 => rec.real_user = Some(f.string()?),
                5 => rec.issue_date = Some(f.u64()?),
                6 => rec.max_date = Some(f.u64()?),
                7 => rec.sequence_number = Some(f.u32()?),
                8 => rec.master_key_id = Some(f.u32()?),
                9 => rec.expiry_date = Some(f.u64()?),
                _ => {}
            }
        }
        Ok(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsimage_wire::FieldWriter;

    #[test]
    fn header_decode() {
        let payload = FieldWriter::new()
            .varint(1, 5)
            .varint(2, 12)
            .varint(3, 2)
            .varint(4, 1)
            .finish();
        let h = SecretManagerHeader::decode(&payload).unwrap();
        assert_eq!(h.current_id, 5);
        assert_eq!(h.token_sequence_number, 12);
        assert_eq!(h.num_keys, 2);
        assert_eq!(h.num_tokens, 1);
    }

    #[test]
    fn delegation_key_without_expiry() {
        let payload = FieldWriter::new().varint(1, 3).bytes(3, &[0xAA, 0xBB]).finish();
        let key = DelegationKey::decode(&payload).unwrap();
        assert_eq!(key.id, 3);
        assert!(key.expiry_date.is_none());
        assert_eq!(key.key, vec![0xAA, 0xBB]);
    }

    #[test]
    fn token_partial_fields() {
        let payload = FieldWriter::new()
            .string(2, "alice")
            .varint(5, 1000)
            .varint(7, 8)
            .finish();
        let token = PersistToken::decode(&payload).unwrap();
        assert_eq!(token.owner.as_deref(), Some("alice"));
        assert_eq!(token.issue_date, Some(1000));
        assert_eq!(token.sequence_number, Some(8));
        assert!(token.version.is_none());
        assert!(token.renewer.is_none());
        assert!(token.expiry_date.is_none());
    }
}
