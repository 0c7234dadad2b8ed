use super::builder::Builder;
use crate::binary::{self, ReadOptions};
use crate::error::Result;
use crate::stream::{self, TokenStream, Tokens};
use crate::{
    compound, tag, tree, ArrayView, ByteArray, Compound, IntArray, List, LongArray, RootEntry, Tag,
    TagKind, ToTokens, Token,
};

fn name(n: &str, kind: TagKind) -> Token {
    Token::Name(n.to_owned(), kind)
}

fn every_kind() -> Compound {
    compound!({
        "byte": 1i8,
        "byte_nine": 0x09i8,
        "byte_min": i8::MIN,
        "byte_list": [0x01i8, 0x09i8, i8::MIN, i8::MAX],
        "short": -2i16,
        "int": 3,
        "long": i64::MIN,
        "float": 1.5f32,
        "double": -0.25,
        "doubles": [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -0.0],
        "floats": [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.0f32, -0.0f32],
        "bytes": [B; 1, -2, 3],
        "string": "hello",
        "empty_string": "",
        "strings": ["", "a", "nul\0", "😀"],
        "list": [{ "a": 1 }, { "b": [] }],
        "compound": {
            "nested": {
                "deeper": "yes",
            },
            "lists": [[1, 2], [], [3]],
        },
        "empty_compound": {},
        "ints": [I; i32::MIN, 0, i32::MAX],
        "longs": [L; -1, 1],
        "empty_ints": [I;],
        "empty_list": [],
    })
}

#[test]
fn binary_round_trip() -> Result<()> {
    let root = RootEntry::new("root", every_kind());
    let bytes = root.to_bytes()?;
    let back = binary::from_bytes(&bytes)?;
    assert_eq!(back, root);

    // And once more, to show the bytes are stable.
    assert_eq!(back.to_bytes()?, bytes);
    Ok(())
}

#[test]
fn token_round_trip_without_bytes() -> Result<()> {
    let root = RootEntry::new("", every_kind());
    let back = tree::read_root(root.tokens())?;
    assert_eq!(back, root);
    Ok(())
}

#[test]
fn order_is_preserved() -> Result<()> {
    let root = RootEntry::new("", every_kind());
    let back = binary::from_bytes(&root.to_bytes()?)?;

    let expected: Vec<&str> = root.value().keys().collect();
    let actual: Vec<&str> = back.value().keys().collect();
    assert_eq!(actual, expected);
    assert_eq!(actual[0], "byte");
    assert_eq!(actual[actual.len() - 1], "empty_list");
    Ok(())
}

#[test]
fn special_floats_are_exact() -> Result<()> {
    let nan32 = f32::from_bits(0x7fc0_0001);
    let nan64 = f64::from_bits(0x7ff8_0000_0000_0001);
    let root = RootEntry::new(
        "",
        compound!({
            "nan32": nan32,
            "nan64": nan64,
            "inf": f32::INFINITY,
            "neg_inf": f64::NEG_INFINITY,
            "zero": 0.0f32,
            "neg_zero": -0.0f32,
        }),
    );

    let back = binary::from_bytes(&root.to_bytes()?)?;
    assert_eq!(back, root);

    let value = back.value();
    match (value.get("nan32"), value.get("nan64")) {
        (Some(Tag::Float(a)), Some(Tag::Double(b))) => {
            assert_eq!(a.to_bits(), 0x7fc0_0001);
            assert_eq!(b.to_bits(), 0x7ff8_0000_0000_0001);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(value.get("neg_zero"), Some(&Tag::Float(-0.0)));
    assert_ne!(value.get("neg_zero"), value.get("zero"));
    assert_eq!(value.get("neg_inf"), Some(&Tag::Double(f64::NEG_INFINITY)));
    Ok(())
}

#[test]
fn special_floats_in_lists_are_exact() -> Result<()> {
    let nan64 = f64::from_bits(0xfff8_0000_0000_0042);
    let doubles = [nan64, f64::INFINITY, f64::NEG_INFINITY, 0.0, -0.0];
    let floats = [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.0, -0.0];
    let root = RootEntry::new(
        "",
        Compound::builder()
            .put("d", List::from_tags(doubles.iter().map(|&d| Tag::Double(d)).collect())?)
            .put("f", List::from_tags(floats.iter().map(|&f| Tag::Float(f)).collect())?)
            .build(),
    );

    let back = binary::from_bytes(&root.to_bytes()?)?;
    assert_eq!(back, root);

    let d_bits: Vec<u64> = back
        .value()
        .get("d")
        .and_then(Tag::as_list)
        .unwrap()
        .iter()
        .map(|t| match t {
            Tag::Double(d) => d.to_bits(),
            other => panic!("expected double, got {:?}", other),
        })
        .collect();
    let expected: Vec<u64> = doubles.iter().map(|d| d.to_bits()).collect();
    assert_eq!(d_bits, expected);

    let f_bits: Vec<u32> = back
        .value()
        .get("f")
        .and_then(Tag::as_list)
        .unwrap()
        .iter()
        .map(|t| match t {
            Tag::Float(f) => f.to_bits(),
            other => panic!("expected float, got {:?}", other),
        })
        .collect();
    let expected: Vec<u32> = floats.iter().map(|f| f.to_bits()).collect();
    assert_eq!(f_bits, expected);
    Ok(())
}

#[test]
fn empty_list_keeps_element_kind() -> Result<()> {
    let root = RootEntry::new(
        "",
        Compound::builder()
            .put("ints", List::empty(TagKind::Int))
            .put("nothing", List::empty(TagKind::End))
            .build(),
    );

    let back = binary::from_bytes(&root.to_bytes()?)?;
    let ints = back.value().get("ints").and_then(Tag::as_list).unwrap();
    assert_eq!(ints.element_kind(), TagKind::Int);
    assert_ne!(back.value().get("ints"), back.value().get("nothing"));
    Ok(())
}

#[test]
fn compound_disassembles_in_pre_order() -> Result<()> {
    let value = compound!({
        "a": 1,
        "l": [1i8, 2i8],
        "c": {},
    });

    let tokens = stream::collect_tokens(value.tokens())?;
    assert_eq!(
        tokens,
        [
            Token::CompoundStart,
            name("a", TagKind::Int),
            Token::Int(1),
            name("l", TagKind::List),
            Token::ListStart {
                size: 2,
                element_kind: TagKind::Byte
            },
            Token::Byte(1),
            Token::Byte(2),
            Token::ListEnd,
            name("c", TagKind::Compound),
            Token::CompoundStart,
            Token::CompoundEnd,
            Token::CompoundEnd,
        ]
    );
    Ok(())
}

#[test]
fn arrays_disassemble_as_one_shared_chunk() -> Result<()> {
    let array = LongArray::new(vec![1, 2, 3]);
    let tag = Tag::LongArray(array.clone());
    let tokens = stream::collect_tokens(tag.tokens())?;

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0], Token::LongArrayStart(3));
    match &tokens[1] {
        Token::LongArrayContent(view) => assert_eq!(view.as_ptr(), array.as_ptr()),
        other => panic!("expected content, got {:?}", other),
    }
    assert_eq!(tokens[2], Token::LongArrayEnd);

    let empty = stream::collect_tokens(Tag::from(IntArray::default()).tokens())?;
    assert_eq!(empty, [Token::IntArrayStart(0), Token::IntArrayEnd]);
    Ok(())
}

#[test]
fn chunking_does_not_change_the_tree() -> Result<()> {
    let chunked = Tokens::from(vec![
        Token::IntArrayStart(5),
        Token::IntArrayContent(ArrayView::from(vec![1, 2])),
        Token::IntArrayContent(ArrayView::from(vec![])),
        Token::IntArrayContent(ArrayView::from(vec![3])),
        Token::IntArrayContent(ArrayView::from(vec![4, 5])),
        Token::IntArrayEnd,
    ]);

    let tag = tree::read_value(chunked, TagKind::IntArray)?;
    assert_eq!(tag, tag!([I; 1, 2, 3, 4, 5]));
    Ok(())
}

#[test]
fn large_arrays_survive_chunked_reading() -> Result<()> {
    let bytes: Vec<i8> = (0..20_000).map(|i| (i % 251) as i8).collect();
    let longs: Vec<i64> = (0..3000).map(|i| i * -7).collect();
    let root = RootEntry::new(
        "",
        Compound::builder()
            .put("bytes", ByteArray::new(bytes))
            .put("longs", LongArray::new(longs))
            .build(),
    );

    let back = binary::from_bytes(&root.to_bytes()?)?;
    assert_eq!(back, root);
    Ok(())
}

#[test]
fn read_value_stops_after_its_value() -> Result<()> {
    let mut tokens = Tokens::from(vec![
        Token::CompoundStart,
        Token::CompoundEnd,
        Token::Int(2),
    ]);

    let first = tree::read_compound(&mut tokens)?;
    assert!(first.is_empty());
    assert_eq!(tokens.next_token()?, Some(Token::Int(2)));
    Ok(())
}

#[test]
fn builder_bytes_assemble() -> Result<()> {
    let payload = Builder::new()
        .start_compound("level")
        .int("DataVersion", 3465)
        .start_list("Pos", TagKind::Double, 2)
        .double_payload(1.5)
        .double_payload(-8.0)
        .end_compound()
        .build();

    let root = binary::from_bytes(&payload)?;
    assert_eq!(root.name(), "level");
    assert_eq!(
        root.value(),
        &compound!({
            "DataVersion": 3465,
            "Pos": [1.5, -8.0],
        })
    );
    Ok(())
}

#[test]
fn deep_nesting_decodes_iteratively() -> Result<()> {
    // Deep enough that recursion per level would be a risk, shallow enough
    // that dropping the tree afterwards is not.
    const DEPTH: usize = 2000;

    let mut builder = Builder::new()
        .start_compound("")
        .start_list("l", TagKind::List, 1);
    for _ in 0..DEPTH - 1 {
        builder = builder.start_anon_list(TagKind::List, 1);
    }
    let payload = builder
        .start_anon_list(TagKind::End, 0)
        .end_compound()
        .build();

    // The root compound and the outer list come on top of DEPTH.
    let opts = ReadOptions::new().max_depth(DEPTH + 2);
    let root = binary::from_bytes_with_opts(&payload, opts)?;

    let mut depth = 0;
    let mut current = root.value().get("l");
    while let Some(Tag::List(list)) = current {
        depth += 1;
        current = list.get(0);
    }
    assert_eq!(depth, DEPTH + 1);
    Ok(())
}

#[test]
fn very_deep_token_stream_decodes() -> Result<()> {
    const DEPTH: i32 = 100_000;

    let mut builder = Builder::new().start_compound("");
    for _ in 0..DEPTH {
        builder = builder.start_compound("c");
    }
    for _ in 0..=DEPTH {
        builder = builder.end_compound();
    }
    let payload = builder.build();

    let opts = ReadOptions::new().max_depth(usize::MAX);
    let mut reader = binary::read_with_opts(&payload[..], opts);
    let mut count = 0;
    while reader.next_token()?.is_some() {
        count += 1;
    }
    // Name and start for the root and each level, then the ends.
    assert_eq!(count, 3 * (DEPTH + 1));
    Ok(())
}

fn nested_compounds(depth: usize) -> Vec<u8> {
    let mut builder = Builder::new().start_compound("");
    for _ in 1..depth {
        builder = builder.start_compound("c");
    }
    for _ in 0..depth {
        builder = builder.end_compound();
    }
    builder.build()
}

#[test]
fn default_depth_limit_is_exact() -> Result<()> {
    binary::from_bytes(&nested_compounds(tree::DEFAULT_MAX_DEPTH))?;

    let err = binary::from_bytes(&nested_compounds(tree::DEFAULT_MAX_DEPTH + 1)).unwrap_err();
    assert!(err.is_malformed());
    Ok(())
}

#[test]
fn hostile_depth_is_refused_not_overflowed() {
    // About a megabyte of nested lists. Decoding this into a tree would leave
    // something too deep to drop.
    let mut builder = Builder::new()
        .start_compound("")
        .start_list("l", TagKind::List, 1);
    for _ in 0..200_000 {
        builder = builder.start_anon_list(TagKind::List, 1);
    }
    let payload = builder.build();

    let err = binary::from_bytes(&payload).unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("depth"));
}

#[test]
fn assembler_limits_depth_on_its_own() {
    // The reader is allowed anything, the assembler still refuses.
    let payload = nested_compounds(600);
    let opts = ReadOptions::new().max_depth(usize::MAX);
    let err = tree::read_root(binary::read_with_opts(&payload[..], opts)).unwrap_err();
    assert!(err.is_malformed());

    let tokens = Tokens::from(vec![
        Token::ListStart {
            size: 1,
            element_kind: TagKind::List,
        },
        Token::ListStart {
            size: 0,
            element_kind: TagKind::End,
        },
        Token::ListEnd,
        Token::ListEnd,
    ]);
    let err = tree::read_value_with_max_depth(tokens.clone(), TagKind::List, 1).unwrap_err();
    assert!(err.is_malformed());
    assert!(tree::read_value_with_max_depth(tokens, TagKind::List, 2).is_ok());
}

#[test]
fn depth_counts_back_down() -> Result<()> {
    // Many siblings, each nested a little, never go deep.
    let mut builder = Builder::new().start_compound("");
    for i in 0..1000 {
        builder = builder
            .start_compound(&format!("c{}", i))
            .start_list("l", TagKind::Compound, 1)
            .start_anon_compound()
            .end_anon_compound()
            .end_compound();
    }
    let payload = builder.end_compound().build();

    let opts = ReadOptions::new().max_depth(4);
    let root = binary::from_bytes_with_opts(&payload, opts)?;
    assert_eq!(root.value().len(), 1000);
    Ok(())
}

fn root_err(tokens: Vec<Token>) -> crate::error::Error {
    tree::read_root(Tokens::from(tokens)).unwrap_err()
}

fn doc(mut body: Vec<Token>) -> Vec<Token> {
    let mut tokens = vec![name("", TagKind::Compound), Token::CompoundStart];
    tokens.append(&mut body);
    tokens
}

#[test]
fn root_needs_compound_name() {
    assert!(root_err(vec![]).is_malformed());
    assert!(root_err(vec![Token::CompoundStart]).is_malformed());
    assert!(root_err(vec![name("", TagKind::Int), Token::Int(1)]).is_malformed());
}

#[test]
fn missing_compound_end() {
    let err = root_err(doc(vec![name("a", TagKind::Int), Token::Int(1)]));
    assert!(err.is_malformed());
}

#[test]
fn value_must_match_name_kind() {
    let err = root_err(doc(vec![name("a", TagKind::Int), Token::Short(1)]));
    assert!(err.is_malformed());
    assert!(err.to_string().contains("INT"));
}

#[test]
fn name_where_value_expected() {
    let err = root_err(doc(vec![
        name("a", TagKind::Int),
        name("b", TagKind::Int),
    ]));
    assert!(err.is_malformed());
}

#[test]
fn end_is_not_a_value() {
    let err = root_err(doc(vec![name("e", TagKind::End), Token::CompoundEnd]));
    assert!(err.is_invalid_tag());

    let err = tree::read_value(stream::once(Token::Int(1)), TagKind::End).unwrap_err();
    assert!(err.is_invalid_tag());
}

#[test]
fn list_size_must_match() {
    let over = Tokens::from(vec![
        Token::ListStart {
            size: 1,
            element_kind: TagKind::Int,
        },
        Token::Int(1),
        Token::Int(2),
    ]);
    assert!(tree::read_value(over, TagKind::List)
        .unwrap_err()
        .is_malformed());

    let under = Tokens::from(vec![
        Token::ListStart {
            size: 2,
            element_kind: TagKind::Int,
        },
        Token::Int(1),
        Token::ListEnd,
    ]);
    assert!(tree::read_value(under, TagKind::List)
        .unwrap_err()
        .is_malformed());
}

#[test]
fn list_elements_must_match_kind() {
    let tokens = Tokens::from(vec![
        Token::ListStart {
            size: 1,
            element_kind: TagKind::Int,
        },
        Token::Long(1),
        Token::ListEnd,
    ]);
    assert!(tree::read_value(tokens, TagKind::List)
        .unwrap_err()
        .is_malformed());
}

#[test]
fn list_of_end_must_be_empty() {
    let tokens = Tokens::from(vec![
        Token::ListStart {
            size: 1,
            element_kind: TagKind::End,
        },
        Token::ListEnd,
    ]);
    assert!(tree::read_value(tokens, TagKind::List)
        .unwrap_err()
        .is_malformed());
}

#[test]
fn array_overfill_fails_on_the_chunk() {
    let tokens = Tokens::from(vec![
        Token::ByteArrayStart(2),
        Token::ByteArrayContent(ArrayView::from(vec![1, 2])),
        Token::ByteArrayContent(ArrayView::from(vec![3])),
        Token::ByteArrayEnd,
    ]);
    let err = tree::read_value(tokens, TagKind::ByteArray).unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("overfilled"));
}

#[test]
fn array_underfill_fails_at_end() {
    let tokens = Tokens::from(vec![
        Token::LongArrayStart(3),
        Token::LongArrayContent(ArrayView::from(vec![1, 2])),
        Token::LongArrayEnd,
    ]);
    let err = tree::read_value(tokens, TagKind::LongArray).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn array_content_must_match_array() {
    let tokens = Tokens::from(vec![
        Token::IntArrayStart(1),
        Token::LongArrayContent(ArrayView::from(vec![1])),
        Token::IntArrayEnd,
    ]);
    assert!(tree::read_value(tokens, TagKind::IntArray)
        .unwrap_err()
        .is_malformed());
}

#[test]
fn stream_ending_inside_array() {
    let tokens = Tokens::from(vec![
        Token::IntArrayStart(1),
        Token::IntArrayContent(ArrayView::from(vec![1])),
    ]);
    assert!(tree::read_value(tokens, TagKind::IntArray)
        .unwrap_err()
        .is_malformed());
}

#[test]
fn errors_from_the_stream_pass_through() {
    let payload = Builder::new()
        .start_compound("")
        .int("a", 1)
        .build();

    // The reader runs out of bytes before the compound ends.
    let err = tree::read_root(binary::read(&payload[..])).unwrap_err();
    assert!(err.is_io());
}
