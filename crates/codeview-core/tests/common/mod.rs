//! Byte fixtures shared by the integration tests.

#![allow(dead_code)]

pub const LF_VFTABLE: u16 = 0x151d;
pub const LF_VTSHAPE: u16 = 0x000a;

/// Frame `body` as a record: length, leaf kind, body, `0xf?` padding to 4 bytes.
pub fn record(kind: u16, body: &[u8]) -> Vec<u8>
{
    let mut payload = kind.to_le_bytes().to_vec();
    payload.extend_from_slice(body);
    let mut pad = (4 - (payload.len() + 2) % 4) % 4;
    while pad > 0 {
        payload.push(0xf0 | pad as u8);
        pad -= 1;
    }

    let mut bytes = (payload.len() as u16).to_le_bytes().to_vec();
    bytes.extend_from_slice(&payload);
    bytes
}

/// Body of an `LF_VFTABLE` record.
pub fn vftable_body(owner: u32, base: u32, vfptr_offset: i32, names: &[&str]) -> Vec<u8>
{
    let mut block = Vec::new();
    for name in names {
        block.extend_from_slice(name.as_bytes());
        block.push(0);
    }
    raw_vftable_body(owner, base, vfptr_offset, &block)
}

/// Body of an `LF_VFTABLE` record with a hand-built names block.
pub fn raw_vftable_body(owner: u32, base: u32, vfptr_offset: i32, block: &[u8]) -> Vec<u8>
{
    let mut body = Vec::new();
    body.extend_from_slice(&owner.to_le_bytes());
    body.extend_from_slice(&base.to_le_bytes());
    body.extend_from_slice(&vfptr_offset.to_le_bytes());
    body.extend_from_slice(&(block.len() as u32).to_le_bytes());
    body.extend_from_slice(block);
    body
}

/// Body of an `LF_VTSHAPE` record.
pub fn vtshape_body(descriptors: &[u8]) -> Vec<u8>
{
    let mut body = (descriptors.len() as u16).to_le_bytes().to_vec();
    for pair in descriptors.chunks(2) {
        let high = pair.get(1).copied().unwrap_or(0);
        body.push(pair[0] | (high << 4));
    }
    body
}
