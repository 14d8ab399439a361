//! Classification of resolved addresses.
//!
//! An address is fetchable only if it is globally routable. Everything the
//! service could reach on a private network, on the host itself, or in
//! special-purpose space is refused. IPv6 is allowed only inside `2000::/3`,
//! and addresses that carry an IPv4 address (mapped, NAT64, 6to4) are judged
//! by that IPv4 address.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Whether a request to `ip` could land somewhere internal.
pub fn is_forbidden(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => is_forbidden_v4(ip),
        IpAddr::V6(ip) => is_forbidden_v6(ip),
    }
}

fn is_forbidden_v4(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();

    ip.is_private()                                 // 10/8, 172.16/12, 192.168/16
        || ip.is_loopback()                         // 127/8
        || ip.is_link_local()                       // 169.254/16, cloud metadata
        || ip.is_multicast()                        // 224/4
        || ip.is_broadcast()                        // 255.255.255.255
        || ip.is_unspecified()                      // 0.0.0.0
        || ip.is_documentation()                    // 192.0.2/24, 198.51.100/24, 203.0.113/24
        || a == 0                                   // 0/8 "this network"
        || a >= 240                                 // 240/4 reserved
        || (a == 100 && (b & 0xc0) == 64)           // 100.64/10 shared address space
        || (a == 192 && b == 0 && c == 0)           // 192.0.0/24 protocol assignments
        || (a == 198 && (b & 0xfe) == 18)           // 198.18/15 benchmarking
}

fn is_forbidden_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_forbidden_v4(v4);
    }
    if let Some(v4) = embedded_ipv4(ip) {
        return is_forbidden_v4(v4);
    }

    let segments = ip.segments();
    let first = segments[0];

    (first & 0xe000) != 0x2000                      // outside 2000::/3, incl. 64:ff9b:1::/48
        || (first == 0x2001 && segments[1] < 0x0200) // 2001::/23 protocol assignments
        || (first == 0x2001 && segments[1] == 0x0db8) // 2001:db8::/32 documentation
        || (first & 0xfff0) == 0x3ff0               // 3fff::/20 documentation
}

/// The IPv4 address a translation prefix forwards to.
fn embedded_ipv4(ip: Ipv6Addr) -> Option<Ipv4Addr> {
    let s = ip.segments();
    let v4 = |hi: u16, lo: u16| Ipv4Addr::from((u32::from(hi) << 16) | u32::from(lo));

    match s {
        [0x0064, 0xff9b, 0, 0, 0, 0, hi, lo] => Some(v4(hi, lo)), // 64:ff9b::/96 NAT64
        [0x2002, hi, lo, ..] => Some(v4(hi, lo)),                 // 2002::/16 6to4
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forbidden(s: &str) -> bool {
        is_forbidden(s.parse().unwrap())
    }

    #[test]
    fn test_ipv4_internal_ranges() {
        for ip in [
            "10.0.0.1",
            "172.16.5.4",
            "192.168.1.1",
            "127.0.0.1",
            "169.254.169.254",
            "224.0.0.1",
            "240.0.0.1",
            "255.255.255.255",
            "0.0.0.0",
            "100.64.0.1",
            "198.18.0.1",
            "192.0.2.10",
        ] {
            assert!(forbidden(ip), "{ip} should be forbidden");
        }
    }

    #[test]
    fn test_ipv4_public() {
        for ip in ["8.8.8.8", "93.184.216.34", "1.1.1.1", "100.128.0.1", "172.32.0.1"] {
            assert!(!forbidden(ip), "{ip} should be allowed");
        }
    }

    #[test]
    fn test_ipv6_internal_ranges() {
        for ip in [
            "::1",
            "::",
            "fe80::1",
            "fc00::1",
            "fd12:3456::1",
            "ff02::1",
            "2001:db8::1",
            "fec0::1",
            "::ffff:10.0.0.1",
            "::ffff:127.0.0.1",
            "100::1",
            "100:1::1",
            "200::1",
            "4000::1",
            "e000::1",
            "2001::1",
            "2001:10::1",
            "3fff::1",
            "64:ff9b::a00:1",
            "64:ff9b::7f00:1",
            "64:ff9b:1::1",
            "2002:a00:1::1",
            "2002:a9fe:a9fe::1",
        ] {
            assert!(forbidden(ip), "{ip} should be forbidden");
        }
    }

    #[test]
    fn test_ipv6_public() {
        for ip in [
            "2606:4700:4700::1111",
            "2a00:1450:4001:80b::200e",
            "::ffff:8.8.8.8",
            "64:ff9b::808:808",
            "2002:808:808::1",
            "2001:4860:4860::8888",
        ] {
            assert!(!forbidden(ip), "{ip} should be allowed");
        }
    }
}
