use super::*;

#[test]
fn content_checksum_is_stable() {
    assert_eq!(content_checksum("hello"), content_checksum("hello"));
    assert_eq!(content_checksum(""), 0x811c9dc5);
}

#[test]
fn content_checksum_detects_single_byte_change() {
    assert_ne!(content_checksum("void Foo();"), content_checksum("void Foo() ;"));
}

#[test]
fn stable_hash64_differs_from_32bit_truncation() {
    let input = "const FString&,int32";
    assert_ne!(stable_hash64(input) as u32, content_checksum(input));
}
