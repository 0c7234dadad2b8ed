use crate::TagKind;


#[allow(clippy::float_cmp)]
mod tree;

mod fuzz;

macro_rules! check_tags {
    {$($tag:ident = $val:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(TagKind::$tag), $val);
            assert_eq!(TagKind::from_id($val).unwrap(), TagKind::$tag);
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
        IntArray = 11,
        LongArray = 12,
    }

    for value in 13..=u8::MAX {
        assert!(TagKind::try_from(value).is_err());
        assert!(TagKind::from_id(value).unwrap_err().is_invalid_tag());
    }
}

#[test]
fn all_kinds_in_id_order() {
    for (i, kind) in TagKind::ALL.iter().enumerate() {
        assert_eq!(kind.id() as usize, i);
    }
}

#[test]
fn kind_names() {
    assert_eq!(TagKind::End.to_string(), "END");
    assert_eq!(TagKind::ByteArray.to_string(), "BYTE_ARRAY");
    assert_eq!(TagKind::LongArray.name(), "LONG_ARRAY");
}

#[test]
fn invalid_tag_message_has_value() {
    let err = TagKind::from_id(13).unwrap_err();
    assert!(err.to_string().contains("13"));
}
