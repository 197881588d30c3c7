//! The recognized DNS class and record type mnemonics.
//!
//! The classifier decides whether an item is a class, a record type, or
//! something else purely by membership in these two closed tables. Both
//! are sorted byte-wise so lookup is a binary search over static data;
//! nothing is built at run time.

/// The recognized CLASS mnemonics.
static CLASSES: &[&[u8]] = &[b"CH", b"HS", b"IN"];

/// The recognized record type mnemonics.
static RTYPES: &[&[u8]] = &[
    b"A", b"A6", b"AAAA", b"AFSDB",
    b"APL", b"ATMA", b"AVC", b"AXFR",
    b"CAA", b"CDNSKEY", b"CDS", b"CERT",
    b"CNAME", b"CSYNC", b"DHCID", b"DLV",
    b"DNAME", b"DNSKEY", b"DS", b"EID",
    b"EUI48", b"EUI64", b"GID", b"GPOS",
    b"HINFO", b"HIP", b"IPSECKEY", b"ISDN",
    b"IXFR", b"KEY", b"KX", b"L32",
    b"L64", b"LOC", b"LP", b"MAILA",
    b"MAILB", b"MB", b"MD", b"MF",
    b"MG", b"MINFO", b"MR", b"MX",
    b"NAPTR", b"NID", b"NIMLOC", b"NINFO",
    b"NS", b"NSAP", b"NSAP-PTR", b"NSEC",
    b"NSEC3", b"NSEC3PARAM", b"NULL", b"NXT",
    b"OPENPGPKEY", b"OPT", b"PTR", b"PX",
    b"RKEY", b"RP", b"RRSIG", b"RT",
    b"SIG", b"SINK", b"SMIMEA", b"SOA",
    b"SPF", b"SRV", b"SSHFP", b"TA",
    b"TALINK", b"TKEY", b"TLSA", b"TSIG",
    b"TXT", b"UID", b"UINFO", b"UNSPEC",
    b"URI", b"WKS", b"X25",
];

/// Returns whether the given bytes are a recognized CLASS mnemonic.
pub fn is_class(mnemonic: &[u8]) -> bool {
    CLASSES.binary_search(&mnemonic).is_ok()
}

/// Returns whether the given bytes are a recognized record type mnemonic.
pub fn is_rtype(mnemonic: &[u8]) -> bool {
    RTYPES.binary_search(&mnemonic).is_ok()
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tables_are_sorted() {
        assert!(CLASSES.windows(2).all(|w| w[0] < w[1]));
        assert!(RTYPES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn membership() {
        assert!(is_class(b"IN"));
        assert!(is_class(b"CH"));
        assert!(!is_class(b"XX"));
        assert!(!is_class(b"in"));

        assert!(is_rtype(b"A"));
        assert!(is_rtype(b"NSAP-PTR"));
        assert!(is_rtype(b"DLV"));
        assert!(!is_rtype(b"ZZZZ"));
        assert!(!is_rtype(b"a"));
    }
}
