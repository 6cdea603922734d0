//! Secret-manager emission: delegation keys and persisted tokens.

use std::io::{Read, Write};

use nsimage_records::{DelegationKey, PersistToken, SecretManagerHeader};
use nsimage_wire::{decode_required, Counted};
use nsimage_xml::XmlEmitter;

use crate::error::DumpResult;

pub(crate) fn dump_secret_manager_section<W: Write>(
    out: &mut XmlEmitter<W>,
    r: &mut impl Read,
) -> DumpResult<()> {
    out.open("SecretManagerSection")?;
    let header: SecretManagerHeader = decode_required(r)?;
    out.elem("currentId", header.current_id)?;
    out.elem("tokenSequenceNumber", header.token_sequence_number)?;
    out.elem("numDelegationKeys", header.num_keys)?;
    out.elem("numTokens", header.num_tokens)?;

    let mut keys = Counted::<DelegationKey>::new(u64::from(header.num_keys));
    while let Some(key) = keys.next(r)? {
        out.open("delegationKey")?;
        out.elem("id", key.id)?;
        out.elem("key", hex::encode(&key.key))?;
        if let Some(expiry) = key.expiry_date {
            out.date("expiry", expiry)?;
        }
        out.close("delegationKey")?;
    }

    let mut tokens = Counted::<PersistToken>::new(u64::from(header.num_tokens));
    while let Some(token) = tokens.next(r)? {
        out.open("token")?;
        if let Some(version) = token.version {
            out.elem("version", version)?;
        }
        if let Some(owner) = &token.owner {
            out.elem("owner", owner)?;
        }
        if let Some(renewer) = &token.renewer {
            out.elem("renewer", renewer)?;
        }
        if let Some(real_user) = &token.real_user {
            out.elem("realUser", real_user)?;
        }
        if let Some(issue_date) = token.issue_date {
            out.date("issueDate", issue_date)?;
        }
        if let Some(max_date) = token.max_date {
            out.date("maxDate", max_date)?;
        }
        if let Some(sequence_number) = token.sequence_number {
            out.elem("sequenceNumber", sequence_number)?;
        }
        if let Some(master_key_id) = token.master_key_id {
            out.elem("masterKeyId", master_key_id)?;
        }
        if let Some(expiry_date) = token.expiry_date {
            out.date("expiryDate", expiry_date)?;
        }
        out.close("token")?;
    }
    out.close("SecretManagerSection")?;
    Ok(())
}
