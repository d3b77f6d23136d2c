use advmac::MacAddr6;

/// Locally administered prefix qemu uses for guest NICs.
pub const QEMU_MAC_PREFIX: [u8; 2] = [0x52, 0x54];

/// Derives a stable MAC address from `seed`: the qemu prefix followed by the
/// four big-endian bytes of the CRC-32 of the seed. Checksums below
/// `0x10000000` keep their leading zero octet.
pub fn generate_mac(seed: &str) -> MacAddr6 {
    let crc = crc32fast::hash(seed.as_bytes()).to_be_bytes();
    MacAddr6::new([
        QEMU_MAC_PREFIX[0],
        QEMU_MAC_PREFIX[1],
        crc[0],
        crc[1],
        crc[2],
        crc[3],
    ])
}

/// Lowercase colon notation, e.g. `52:54:e3:5e:00:df`.
pub fn format_mac(mac: &MacAddr6) -> String {
    mac.as_slice()
        .iter()
        .map(|octet| format!("{:02x}", octet))
        .collect::<Vec<_>>()
        .join(":")
}
