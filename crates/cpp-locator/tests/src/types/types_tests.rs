use expect_test::expect;

use super::*;

#[test]
fn descriptor_snapshot() {
    expect![[r#"
        TypeDescriptor {
            base_type: "TMap<FString,int32>",
            is_const: true,
            is_volatile: false,
            is_pointer: false,
            is_reference: true,
        }
    "#]]
    .assert_debug_eq(&parse_descriptor("const TMap<FString,int32>&"));
}

#[test]
fn normalize_strips_default_value_and_name() {
    assert_eq!(normalize("int32 Count = 5", true, true), "int32");
    assert_eq!(normalize("const FString& InName = TEXT(\"\")", true, true), "const FString&");
}

#[test]
fn normalize_keeps_default_when_asked() {
    assert_eq!(normalize("int32 Count = 5", false, false), "int32 Count = 5");
}

#[test]
fn normalize_preserves_qualifiers_when_stripping_name() {
    assert_eq!(normalize("const FString& InName", true, true), "const FString&");
    assert_eq!(normalize("volatile int32* Ptr", true, true), "volatile int32*");
}

#[test]
fn normalize_does_not_mutilate_multiword_fundamental_types() {
    assert_eq!(normalize("unsigned int", true, true), "unsigned int");
    assert_eq!(normalize("unsigned long long", true, true), "unsigned long long");
}

#[test]
fn normalize_does_not_strip_a_qualified_name_tail() {
    assert_eq!(normalize("Foo::Bar", true, true), "Foo::Bar");
}

#[test]
fn normalize_tightens_whitespace_around_markers() {
    assert_eq!(normalize("const  FString &", false, false), "const FString&");
    assert_eq!(normalize("TArray < int32 >", false, false), "TArray<int32>");
}

#[test]
fn normalize_is_idempotent() {
    for raw in [
        "const FString& InName = TEXT(\"\")",
        "const FString &",
        "TMap<FString , int32 > Lookup",
        "int32 Value = 5",
        "unsigned int",
        "volatile uint8* Buffer",
    ] {
        let once = normalize(raw, true, true);
        assert_eq!(normalize(&once, true, true), once, "normalize not idempotent for {raw:?}");
    }
}

#[test]
fn descriptor_extraction_covers_all_flags() {
    let d = parse_descriptor("const FString&");
    assert_eq!(d.base_type, "FString");
    assert!(d.is_const);
    assert!(d.is_reference);
    assert!(!d.is_pointer);
    assert!(!d.is_volatile);

    let d = parse_descriptor("volatile int32*");
    assert_eq!(d.base_type, "int32");
    assert!(d.is_volatile);
    assert!(d.is_pointer);
    assert!(!d.is_reference);

    let d = parse_descriptor("FVector&&");
    assert!(d.is_reference);
    assert_eq!(d.base_type, "FVector");
}

#[test]
fn descriptor_keeps_template_arguments_in_the_base_type() {
    let d = parse_descriptor("const TMap<FString,int32>&");
    assert_eq!(d.base_type, "TMap<FString,int32>");
    assert!(d.is_const);
    assert!(d.is_reference);
    assert!(!d.is_pointer);
}

#[test]
fn pointer_inside_template_is_not_an_outer_pointer() {
    let d = parse_descriptor("TArray<int32*>");
    assert_eq!(d.base_type, "TArray<int32*>");
    assert!(!d.is_pointer);
}

#[test]
fn types_match_is_symmetric() {
    assert!(types_match("const FString&", "const FString &", true));
    assert!(types_match("const FString &", "const FString&", true));
    assert!(!types_match("int32", "const int32&", true));
    assert!(!types_match("const int32&", "int32", true));
}

#[test]
fn types_match_ignores_parameter_names_and_defaults() {
    assert!(types_match("int32 A", "int32 B = 7", true));
}

#[test]
fn const_relaxation_applies_only_to_const() {
    assert!(!types_match("FString&", "const FString&", true));
    assert!(types_match("FString&", "const FString&", false));
    // A reference/value mismatch is never forgiven.
    assert!(!types_match("int32", "const int32&", false));
}

#[test]
fn volatile_is_always_significant() {
    assert!(!types_match("volatile int32", "int32", true));
    assert!(!types_match("volatile int32", "int32", false));
}
