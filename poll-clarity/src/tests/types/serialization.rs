// Copyright (C) 2025 Stacks Open Internet Foundation
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::io::{self, Write};

use proptest::prelude::*;
use rstest::rstest;

use crate::codec::StacksMessageCodec;
use crate::errors::ClarityTypeError;
use crate::representations::{ClarityName, ContractName};
use crate::tests::{assert_round_trip, mainnet_principal};
use crate::types::serialization::{SerializationError, SerializationLimits, TypePrefix};
use crate::types::{
    PrincipalData, QualifiedContractIdentifier, StandardPrincipalData, TupleData, Value,
};

fn tuple(fields: Vec<(&str, Value)>) -> Value {
    Value::from(
        TupleData::from_data(
            fields
                .into_iter()
                .map(|(name, value)| (ClarityName::try_from(name).unwrap(), value))
                .collect(),
        )
        .unwrap(),
    )
}

/// `depth - 1` nested `some` wrappers around `true`
fn nested_some(depth: u8) -> Value {
    let mut value = Value::Bool(true);
    for _ in 1..depth {
        value = Value::some(value).unwrap();
    }
    value
}

#[test]
fn test_vectors() {
    let principal_bytes = [
        0x11, 0xde, 0xad, 0xbe, 0xef, 0x11, 0xab, 0xab, 0xff, 0xff, 0x11, 0xde, 0xad, 0xbe, 0xef,
        0x11, 0xab, 0xab, 0xff, 0xff,
    ];
    let tests = [
        ("0000000000000000000000000000000001", Value::Int(1)),
        ("00ffffffffffffffffffffffffffffffff", Value::Int(-1)),
        ("0100000000000000000000000000000001", Value::UInt(1)),
        ("0100000000000000000000000000000064", Value::UInt(100)),
        (
            "0200000004deadbeef",
            Value::buff_from(vec![0xde, 0xad, 0xbe, 0xef]).unwrap(),
        ),
        ("03", Value::Bool(true)),
        ("04", Value::Bool(false)),
        (
            "050011deadbeef11ababffff11deadbeef11ababffff",
            StandardPrincipalData::new(0x00, principal_bytes).unwrap().into(),
        ),
        (
            "060011deadbeef11ababffff11deadbeef11ababffff0461626364",
            QualifiedContractIdentifier::new(
                StandardPrincipalData::new(0x00, principal_bytes).unwrap(),
                ContractName::try_from("abcd").unwrap(),
            )
            .into(),
        ),
        (
            "0700ffffffffffffffffffffffffffffffff",
            Value::okay(Value::Int(-1)).unwrap(),
        ),
        (
            "0800ffffffffffffffffffffffffffffffff",
            Value::error(Value::Int(-1)).unwrap(),
        ),
        ("09", Value::none()),
        (
            "0a00ffffffffffffffffffffffffffffffff",
            Value::some(Value::Int(-1)).unwrap(),
        ),
        (
            "0b0000000400000000000000000000000000000000010000000000000000000000000000000002000000000000000000000000000000000300fffffffffffffffffffffffffffffffc",
            Value::list_from(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(-4)])
                .unwrap(),
        ),
        (
            "0c000000020362617a0906666f6f62617203",
            tuple(vec![("baz", Value::none()), ("foobar", Value::Bool(true))]),
        ),
        (
            "0d0000000568656c6c6f",
            Value::string_ascii_from_bytes(b"hello".to_vec()).unwrap(),
        ),
        (
            "0e00000004c3a96121",
            Value::string_utf8_from_str("éa!").unwrap(),
        ),
    ];

    for (test, expected) in tests.iter() {
        assert_eq!(test, &expected.serialize_to_hex().unwrap());
        assert_eq!(expected, &Value::try_deserialize_hex(test).unwrap());
        assert_eq!(
            expected,
            &Value::try_deserialize_hex(&format!("0x{test}")).unwrap()
        );
        // the serialized_size implementation agrees with the encoding
        assert_eq!(expected.serialized_size(), test.len() as u64 / 2);
    }
}

#[test]
fn test_type_prefixes() {
    for prefix in TypePrefix::ALL {
        assert_eq!(TypePrefix::from_u8(prefix.to_u8()), Some(*prefix));
    }
    assert_eq!(TypePrefix::ALL.len(), 15);
    assert_eq!(TypePrefix::from_u8(15), None);
}

#[rstest]
#[case::unknown_prefix("1010", SerializationError::UnsupportedVariant(0x10))]
#[case::unknown_prefix_max("ff", SerializationError::UnsupportedVariant(0xff))]
#[case::empty("", SerializationError::TruncatedInput)]
#[case::short_int("00000000", SerializationError::TruncatedInput)]
#[case::short_buffer("0200000004dead", SerializationError::TruncatedInput)]
#[case::short_list("0b0000000203", SerializationError::TruncatedInput)]
#[case::missing_some_payload("0a", SerializationError::TruncatedInput)]
#[case::trailing("0304", SerializationError::TrailingData(1))]
#[case::trailing_many("09000000", SerializationError::TrailingData(3))]
#[case::large_list("0bffffffffffffffffffffffffff", SerializationError::ValueTooLarge)]
#[case::large_tuple("0cffffffffffffffffffffffffff", SerializationError::ValueTooLarge)]
#[case::large_buffer("0200100001", SerializationError::ValueTooLarge)]
#[case::bad_ascii(
    "0d0000000100",
    SerializationError::BadTypeError(ClarityTypeError::InvalidAsciiCharacter(0))
)]
#[case::bad_utf8(
    "0e00000001ff",
    SerializationError::BadTypeError(ClarityTypeError::InvalidUtf8Encoding)
)]
#[case::bad_principal_version(
    "05200000000000000000000000000000000000000000",
    SerializationError::BadTypeError(ClarityTypeError::InvalidPrincipalVersion(32))
)]
#[case::bad_contract_name(
    "061600000000000000000000000000000000000000000131",
    SerializationError::BadTypeError(ClarityTypeError::InvalidContractName("1".into()))
)]
#[case::bad_tuple_key(
    "0c00000001033f3f3f03",
    SerializationError::BadTypeError(ClarityTypeError::InvalidClarityName("???".into()))
)]
#[case::duplicate_tuple_key(
    "0c0000000201610301610304",
    SerializationError::BadTypeError(ClarityTypeError::DuplicateTupleField("a".into()))
)]
#[case::empty_tuple(
    "0c00000000",
    SerializationError::BadTypeError(ClarityTypeError::EmptyTuplesNotAllowed)
)]
fn test_deserialize_errors(#[case] input: &str, #[case] expected: SerializationError) {
    assert_eq!(Value::try_deserialize_hex(input), Err(expected));
}

#[test]
fn test_bad_hex() {
    assert!(matches!(
        Value::try_deserialize_hex("zz"),
        Err(SerializationError::DeserializationError(_))
    ));
    assert!(matches!(
        Value::try_deserialize_hex("0x030"),
        Err(SerializationError::DeserializationError(_))
    ));
}

#[test]
fn test_depth_limit() {
    // sixteen levels is the default bound; both directions accept it
    let deepest = nested_some(16);
    assert_eq!(deepest.depth(), 16);
    assert_round_trip(&deepest);

    let too_deep = nested_some(17);
    assert_eq!(
        too_deep.serialize_to_vec(),
        Err(SerializationError::MaxDepthExceeded)
    );

    let mut bytes = vec![TypePrefix::OptionalSome as u8; 16];
    bytes.push(TypePrefix::BoolTrue as u8);
    assert_eq!(
        Value::deserialize(&bytes),
        Err(SerializationError::MaxDepthExceeded)
    );
    assert_eq!(Value::deserialize(&bytes[1..]).unwrap(), deepest);

    // a deeper bound accepts it
    let limits = SerializationLimits::new(32, 1024);
    assert_eq!(
        Value::deserialize_with_limits(&bytes, &limits).unwrap(),
        too_deep
    );
    assert_eq!(
        too_deep.serialize_to_vec_with_limits(&limits).unwrap(),
        bytes
    );
}

#[test]
fn test_failed_serialization_leaves_writer_untouched() {
    // the first element encodes fine, the second is one level too deep
    let value = Value::list_from(vec![Value::UInt(1), nested_some(17)]).unwrap();
    let mut out = vec![];
    assert_eq!(
        value.serialize_write(&mut out),
        Err(SerializationError::MaxDepthExceeded)
    );
    assert!(out.is_empty());

    let limits = SerializationLimits::new(16, 4);
    let value = tuple(vec![
        ("a", Value::UInt(7)),
        ("b", Value::buff_from(vec![0; 5]).unwrap()),
    ]);
    assert_eq!(
        value.serialize_write_with_limits(&mut out, &limits),
        Err(SerializationError::ValueTooLarge)
    );
    assert!(out.is_empty());

    // a good value written afterwards is the only thing in the buffer
    Value::Bool(true).serialize_write(&mut out).unwrap();
    assert_eq!(out, vec![TypePrefix::BoolTrue as u8]);
}

#[test]
fn test_message_codec_reports_limit_errors() {
    let too_deep = nested_some(17);
    let mut out = vec![];
    assert!(matches!(
        too_deep.consensus_serialize(&mut out),
        Err(crate::codec::Error::SerializeError(_))
    ));
    assert!(out.is_empty());
    assert!(matches!(
        StacksMessageCodec::serialize_to_vec(&too_deep),
        Err(crate::codec::Error::SerializeError(_))
    ));
}

#[test]
fn try_overflow_stack() {
    let input = "08080808080808080808070707080807080808080808080708080808080708080707080707080807080808080808080708080808080708080707080708070807080808080808080708080808080708080708080808080808080807070807080808080808070808070707080807070808070808080808070808070708070807080808080808080707080708070807080708080808080808070808080808070808070808080808080808080707080708080808080807080807070708080707080807080808080807080807070807080708080808080808070708070808080808080708080707070808070708080807080807070708";
    assert_eq!(
        Value::try_deserialize_hex(input),
        Err(SerializationError::MaxDepthExceeded)
    );
}

#[test]
fn test_size_limit() {
    let limits = SerializationLimits::new(16, 4);
    let small = Value::buff_from(vec![1, 2, 3, 4]).unwrap();
    let big = Value::buff_from(vec![1, 2, 3, 4, 5]).unwrap();

    let small_bytes = small.serialize_to_vec_with_limits(&limits).unwrap();
    assert_eq!(
        Value::deserialize_with_limits(&small_bytes, &limits).unwrap(),
        small
    );

    assert_eq!(
        big.serialize_to_vec_with_limits(&limits),
        Err(SerializationError::ValueTooLarge)
    );
    let big_bytes = big.serialize_to_vec().unwrap();
    assert_eq!(
        Value::deserialize_with_limits(&big_bytes, &limits),
        Err(SerializationError::ValueTooLarge)
    );

    let long_list = Value::list_from(vec![Value::Bool(true); 5]).unwrap();
    assert_eq!(
        Value::deserialize_with_limits(&long_list.serialize_to_vec().unwrap(), &limits),
        Err(SerializationError::ValueTooLarge)
    );

    let long_string = Value::string_utf8_from_str("ééé").unwrap();
    assert_eq!(
        long_string.serialize_to_vec_with_limits(&limits),
        Err(SerializationError::ValueTooLarge)
    );
}

#[test]
fn test_tuple_key_order() {
    let ab = tuple(vec![("a", Value::Int(1)), ("b", Value::Int(2))]);
    let ba = tuple(vec![("b", Value::Int(2)), ("a", Value::Int(1))]);
    assert_eq!(ab.serialize_to_vec(), ba.serialize_to_vec());

    // byte order, not length order: "aa" sorts before "b"
    let mixed = tuple(vec![("b", Value::Bool(true)), ("aa", Value::Bool(false))]);
    assert_eq!(
        mixed.serialize_to_hex().unwrap(),
        "0c0000000202616104016203"
    );

    // decoding keeps the encoded order; re-encoding sorts
    let unsorted = Value::try_deserialize_hex("0c00000002016203016104").unwrap();
    let decoded = unsorted.clone().expect_tuple().unwrap();
    let order: Vec<&str> = decoded.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(order, vec!["b", "a"]);
    assert_eq!(
        unsorted,
        tuple(vec![("a", Value::Bool(false)), ("b", Value::Bool(true))])
    );
    assert_eq!(
        unsorted.serialize_to_hex().unwrap(),
        "0c00000002016104016203"
    );
}

#[test]
fn test_principals() {
    let issuer =
        PrincipalData::parse_standard_principal("SM2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKQVX8X0G")
            .unwrap();
    let standard_p = Value::from(issuer.clone());

    let contract_identifier =
        QualifiedContractIdentifier::new(issuer, ContractName::try_from("foo").unwrap());
    let contract_p = Value::from(PrincipalData::Contract(contract_identifier));

    assert_round_trip(&contract_p);
    assert_round_trip(&standard_p);

    let principal = PrincipalData::parse("SP000000000000000000002Q6VF78.pox-4").unwrap();
    let bytes = principal.serialize_to_vec().unwrap();
    assert_eq!(bytes, Value::from(principal.clone()).serialize_to_vec().unwrap());
    assert_eq!(
        PrincipalData::consensus_deserialize(&mut &bytes[..]).unwrap(),
        principal
    );
    // a bool is not a principal
    assert!(PrincipalData::consensus_deserialize(&mut &[0x03u8][..]).is_err());
}

#[test]
fn test_read_count() {
    let bytes = [
        Value::UInt(7).serialize_to_vec().unwrap(),
        Value::Bool(false).serialize_to_vec().unwrap(),
    ]
    .concat();

    let mut cursor = &bytes[..];
    let (first, read) = Value::deserialize_read_count(&mut cursor).unwrap();
    assert_eq!(first, Value::UInt(7));
    assert_eq!(read, 17);
    assert_eq!(Value::deserialize_read(&mut cursor).unwrap(), Value::Bool(false));
    assert!(cursor.is_empty());
    assert_eq!(
        Value::deserialize_read(&mut cursor),
        Err(SerializationError::TruncatedInput)
    );
}

#[test]
fn test_message_codec() {
    let value = tuple(vec![
        ("owner", Value::from(mainnet_principal(3))),
        ("balance", Value::UInt(1_000_000)),
    ]);
    let bytes = StacksMessageCodec::serialize_to_vec(&value).unwrap();
    assert_eq!(bytes, value.serialize_to_vec().unwrap());
    assert_eq!(Value::consensus_deserialize(&mut &bytes[..]).unwrap(), value);
    assert!(Value::consensus_deserialize(&mut &bytes[..bytes.len() - 1]).is_err());
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_errors_surface() {
    let err = Value::Int(1).serialize_write(&mut FailingWriter).unwrap_err();
    assert!(matches!(err, SerializationError::IOError(_)));
    // wrapped IO errors never compare equal
    assert_ne!(err, Value::Int(1).serialize_write(&mut FailingWriter).unwrap_err());
}

fn clarity_name() -> impl Strategy<Value = ClarityName> {
    "[a-zA-Z][a-zA-Z0-9_!?-]{0,12}".prop_map(|s| ClarityName::try_from(s).unwrap())
}

fn principal() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0u8..32, any::<[u8; 20]>())
            .prop_map(|(v, bytes)| Value::from(StandardPrincipalData::new(v, bytes).unwrap())),
        (0u8..32, any::<[u8; 20]>(), "[a-z][a-z0-9_-]{0,39}").prop_map(|(v, bytes, name)| {
            Value::from(QualifiedContractIdentifier::new(
                StandardPrincipalData::new(v, bytes).unwrap(),
                ContractName::try_from(name).unwrap(),
            ))
        }),
    ]
}

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i128>().prop_map(Value::Int),
        any::<u128>().prop_map(Value::UInt),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::none()),
        prop::collection::vec(any::<u8>(), 0..48).prop_map(|b| Value::buff_from(b).unwrap()),
        "[ -~\t\n]{0,32}".prop_map(|s| Value::string_ascii_from_bytes(s.into_bytes()).unwrap()),
        "\\PC{0,16}".prop_map(|s| Value::string_utf8_from_str(&s).unwrap()),
        principal(),
    ]
}

/// Values of every variant, nesting at most sixteen levels deep
fn clarity_value() -> impl Strategy<Value = Value> {
    leaf_value().prop_recursive(15, 64, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|v| Value::some(v).unwrap()),
            (any::<bool>(), inner.clone()).prop_map(|(committed, v)| {
                if committed {
                    Value::okay(v).unwrap()
                } else {
                    Value::error(v).unwrap()
                }
            }),
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|items| Value::list_from(items).unwrap()),
            prop::collection::btree_map(clarity_name(), inner, 1..4).prop_map(|fields| {
                Value::from(TupleData::from_data(fields.into_iter().collect()).unwrap())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn value_round_trip(value in clarity_value()) {
        prop_assert!(value.depth() <= 16);
        let bytes = value.serialize_to_vec().unwrap();
        prop_assert_eq!(bytes.len() as u64, value.serialized_size());
        prop_assert_eq!(Value::deserialize(&bytes).unwrap(), value);
    }

    #[test]
    fn truncation_is_detected(value in clarity_value()) {
        let bytes = value.serialize_to_vec().unwrap();
        let truncated = &bytes[..bytes.len() - 1];
        prop_assert_eq!(Value::deserialize(truncated), Err(SerializationError::TruncatedInput));
    }

    #[test]
    fn tuple_order_does_not_change_encoding(
        fields in prop::collection::btree_map(clarity_name(), leaf_value(), 1..8)
    ) {
        let ordered: Vec<(ClarityName, Value)> = fields.into_iter().collect();
        let mut reversed = ordered.clone();
        reversed.reverse();

        let a = Value::from(TupleData::from_data(ordered).unwrap());
        let b = Value::from(TupleData::from_data(reversed).unwrap());
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.serialize_to_vec().unwrap(), b.serialize_to_vec().unwrap());
    }
}
