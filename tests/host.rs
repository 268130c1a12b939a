use lenient_uri::{
    host::{is_ipv4_or_reg_name, is_ipv6},
    Host, Uri,
};
use std::net::{Ipv4Addr, Ipv6Addr};

#[test]
fn ipv4() {
    for s in ["0.0.0.0", "127.0.0.1", "255.255.255.255", "199.98.55.44", "16.9.5.4"] {
        assert!(is_ipv4_or_reg_name(s), "{s}");
    }
    assert_eq!(
        Host::parse("192.168.1.10"),
        Some(Host::Ipv4(Ipv4Addr::new(192, 168, 1, 10)))
    );
    // Falls back to the registered-name grammar, where the last label
    // must start with a letter.
    for s in ["256.0.0.1", "1.2.3", "1.2.3.4.5", "49.10hh8.54.12", "1..2.3"] {
        assert!(!is_ipv4_or_reg_name(s), "{s}");
    }
}

#[test]
fn reg_name() {
    for s in [
        "localhost",
        "hosthost",
        "www.baidu.com",
        "a-b.c_d.e~f",
        "x.y",
        "123",
        "1.a",
    ] {
        assert!(is_ipv4_or_reg_name(s), "{s}");
    }
    for s in [
        "",
        ".",
        "a.",
        ".a",
        "a..b",
        "-a.com",
        "a-.com",
        "www.1hw.1com",
        "a.b.1c",
        "a b.com",
        "例子.com",
        "a.b-",
    ] {
        assert!(!is_ipv4_or_reg_name(s), "{s}");
    }
    assert_eq!(Host::parse("www.baidu.com"), Some(Host::RegName("www.baidu.com")));
}

#[test]
fn ipv6() {
    for s in [
        "1080::8:800:200C:417A",
        "::",
        "::1",
        "1::",
        "1:0:0:1:2:1:2:1",
        "::FFFF:129.144.52.38",
        "::192.9.5.5",
        "22::22:2:2%ss",
        "fe80:0000:0001:0000:0440:44ff:1233:5678",
        "fe80::0001:0000",
        "::168:169:333",
        "::192:0:5",
        "fe80::1%eth0.1_a",
        "1:2:3:4:5:6:1.2.3.4",
    ] {
        assert!(is_ipv6(s), "{s}");
    }
    for s in [
        "",
        ":",
        ":::",
        "1:0:0:sfvs1:2:1:2:1",
        "1:2:3:4:5:6:7:8:9",
        "1:2:3:4:5:6:7",
        "1::2::3",
        "12345::",
        "::1%",
        "::1%a-b",
        "::1%a%b",
        "::256.0.0.1",
        "[::1]",
        "1:",
        ":1",
    ] {
        assert!(!is_ipv6(s), "{s}");
    }
}

#[test]
fn host_parse_ipv6() {
    assert_eq!(
        Host::parse("[1080::8:800:200C:417A]"),
        Some(Host::Ipv6 {
            addr: Ipv6Addr::new(0x1080, 0, 0, 0, 0x8, 0x800, 0x200c, 0x417a),
            zone_id: None,
        })
    );
    assert_eq!(
        Host::parse("[22::22:2:2%ss]"),
        Some(Host::Ipv6 {
            addr: Ipv6Addr::new(0x22, 0, 0, 0, 0, 0x22, 2, 2),
            zone_id: Some("ss"),
        })
    );
    assert_eq!(
        Host::parse("[::FFFF:129.144.52.38]"),
        Some(Host::Ipv6 {
            addr: Ipv4Addr::new(129, 144, 52, 38).to_ipv6_mapped(),
            zone_id: None,
        })
    );
    // Brackets are required.
    assert_eq!(Host::parse("::1"), None);
    assert_eq!(Host::parse("[::1"), None);
}

#[test]
fn host_parsed_from_uri() {
    let uri = Uri::parse("http://user@[::1]:80/").unwrap();
    assert_eq!(
        uri.host_parsed(),
        Some(Host::Ipv6 {
            addr: Ipv6Addr::LOCALHOST,
            zone_id: None,
        })
    );

    let uri = Uri::parse("http://10.0.0.1/").unwrap();
    assert_eq!(uri.host_parsed(), Some(Host::Ipv4(Ipv4Addr::new(10, 0, 0, 1))));

    let uri = Uri::parse("mailto:someone@example.com").unwrap();
    assert_eq!(uri.host_parsed(), None);
}
