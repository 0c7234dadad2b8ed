// Compound keys are munched one token at a time up to the colon, the same
// approach serde_json's `json!` macro takes.

/// Produce a [`Tag`][`crate::Tag`] using
/// JSON/[SNBT](https://minecraft.wiki/w/NBT_format#SNBT_format)-like
/// syntax.
///
/// Example:
/// ```rust
/// use nbtstream::{tag, Tag};
/// let value = tag!({
///     "key1": "value1",
///     "key2": 42,
///     "key3": [4, 2],
/// });
/// assert!(matches!(value, Tag::Compound(_)));
/// ```
///
/// Unlike SNBT, key/field names for compounds need quoted strings or
/// expressions. `"key1"` above could not be simplified to just `key1`.
///
/// Plain integer literals become INT and float literals become DOUBLE, use a
/// suffix such as `1i8` or `0.5f32` for the other kinds. Every element of a
/// list must end up the same kind, the macro panics otherwise.
///
/// NBT Arrays are supported with
/// [SNBT](https://minecraft.wiki/w/NBT_format#SNBT_format) syntax:
///
/// ```rust
/// # use nbtstream::tag;
/// let _ = tag!({
///     "bytes": [B; 1, 2, 3],
///     "ints": [I; 1, 2, 3],
///     "longs": [L; 1, 2, 3],
/// });
/// ```
#[macro_export(local_inner_macros)]
macro_rules! tag {
    ($($tag:tt)+) => {
        tag_internal!($($tag)+)
    };
}

/// Produce a [`Compound`][`crate::Compound`] using the same syntax as
/// [`tag!`].
///
/// ```rust
/// use nbtstream::{compound, Tag};
/// let player = compound!({
///     "Health": 20.0f32,
///     "Inventory": [],
/// });
/// assert_eq!(player.get("Health"), Some(&Tag::Float(20.0)));
/// ```
#[macro_export(local_inner_macros)]
macro_rules! compound {
    ({ $($entries:tt)* }) => {{
        #[allow(unused_mut)]
        let mut builder = $crate::Compound::builder();
        tag_internal!(@entries builder () ($($entries)*));
        builder.build()
    }};
}

#[macro_export(local_inner_macros)]
#[doc(hidden)]
macro_rules! tag_internal {
    // Compound entries: (@entries builder (key so far) (remaining input)).
    // Each finished entry goes straight into the CompoundBuilder.

    (@entries $builder:ident () ()) => {};

    (@entries $builder:ident ($($key:tt)+) (: [$($value:tt)*] $(, $($rest:tt)*)?)) => {
        $builder.insert($($key)+, tag_internal!([$($value)*]));
        tag_internal!(@entries $builder () ($($($rest)*)?));
    };

    (@entries $builder:ident ($($key:tt)+) (: {$($value:tt)*} $(, $($rest:tt)*)?)) => {
        $builder.insert($($key)+, tag_internal!({$($value)*}));
        tag_internal!(@entries $builder () ($($($rest)*)?));
    };

    (@entries $builder:ident ($($key:tt)+) (: $value:expr $(, $($rest:tt)*)?)) => {
        $builder.insert($($key)+, tag_internal!($value));
        tag_internal!(@entries $builder () ($($($rest)*)?));
    };

    (@entries $builder:ident ($($key:tt)*) ($next:tt $($rest:tt)*)) => {
        tag_internal!(@entries $builder ($($key)* $next) ($($rest)*));
    };

    // List elements: (@elements [finished tags] remaining input). Nested
    // lists and compounds are expanded before they reach the expr arm.

    (@elements [$($done:expr),*]) => {
        $crate::List::from_tags(::std::vec::Vec::from([$($done),*]))
            .expect("list elements must all be of the same kind")
    };

    (@elements [$($done:expr),*] [$($value:tt)*] $(, $($rest:tt)*)?) => {
        tag_internal!(@elements [$($done,)* tag_internal!([$($value)*])] $($($rest)*)?)
    };

    (@elements [$($done:expr),*] {$($value:tt)*} $(, $($rest:tt)*)?) => {
        tag_internal!(@elements [$($done,)* tag_internal!({$($value)*})] $($($rest)*)?)
    };

    (@elements [$($done:expr),*] $value:expr $(, $($rest:tt)*)?) => {
        tag_internal!(@elements [$($done,)* tag_internal!($value)] $($($rest)*)?)
    };

    // Values.

    ([B; $($value:expr),* $(,)?]) => {
        $crate::Tag::ByteArray($crate::ByteArray::new(::std::vec::Vec::from([$($value),*])))
    };

    ([I; $($value:expr),* $(,)?]) => {
        $crate::Tag::IntArray($crate::IntArray::new(::std::vec::Vec::from([$($value),*])))
    };

    ([L; $($value:expr),* $(,)?]) => {
        $crate::Tag::LongArray($crate::LongArray::new(::std::vec::Vec::from([$($value),*])))
    };

    ([]) => {
        $crate::Tag::List($crate::List::empty($crate::TagKind::End))
    };

    ([ $($tt:tt)+ ]) => {
        $crate::Tag::List(tag_internal!(@elements [] $($tt)+))
    };

    ({ $($tt:tt)* }) => {
        $crate::Tag::Compound(compound!({ $($tt)* }))
    };

    // Anything with a From impl for Tag: numbers, strings, arrays, variables
    // holding tags etc.
    ($other:expr) => {
        $crate::Tag::from($other)
    };
}
