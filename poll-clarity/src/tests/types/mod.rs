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

mod serialization;

use poll_common::address::c32::c32_address;
use poll_common::types::StacksAddress;
use poll_common::util::hash::Hash160;
use rstest::rstest;

use super::mainnet_principal;
use crate::errors::ClarityTypeError;
use crate::representations::{ClarityName, ContractName};
use crate::types::{
    PrincipalData, QualifiedContractIdentifier, StandardPrincipalData, TupleData, Value,
    MAX_TYPE_DEPTH, MAX_VALUE_SIZE,
};

fn tuple(fields: &[(&str, Value)]) -> TupleData {
    TupleData::from_data(
        fields
            .iter()
            .map(|(name, value)| (ClarityName::try_from(*name).unwrap(), value.clone()))
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_depth() {
    assert_eq!(Value::Int(1).depth(), 1);
    assert_eq!(Value::none().depth(), 1);
    assert_eq!(Value::list_from(vec![]).unwrap().depth(), 1);
    assert_eq!(Value::some(Value::Int(1)).unwrap().depth(), 2);

    let nested = Value::list_from(vec![
        Value::Int(1),
        Value::some(Value::okay(Value::Bool(true)).unwrap()).unwrap(),
    ])
    .unwrap();
    assert_eq!(nested.depth(), 4);

    let t = Value::from(tuple(&[("a", Value::Int(1)), ("b", nested)]));
    assert_eq!(t.depth(), 5);
}

#[test]
fn test_builders_bound_depth() {
    let mut value = Value::Int(0);
    for _ in 1..MAX_TYPE_DEPTH {
        value = Value::some(value).unwrap();
    }
    assert_eq!(value.depth(), MAX_TYPE_DEPTH);
    assert_eq!(
        Value::some(value.clone()),
        Err(ClarityTypeError::TypeSignatureTooDeep)
    );
    assert_eq!(
        Value::okay(value.clone()),
        Err(ClarityTypeError::TypeSignatureTooDeep)
    );
    assert_eq!(
        Value::list_from(vec![value.clone()]),
        Err(ClarityTypeError::TypeSignatureTooDeep)
    );
    assert_eq!(
        TupleData::from_data(vec![(ClarityName::try_from("a").unwrap(), value)]),
        Err(ClarityTypeError::TypeSignatureTooDeep)
    );
}

#[test]
fn test_builders_bound_size() {
    let max_buff = vec![0u8; MAX_VALUE_SIZE as usize];
    assert!(Value::buff_from(max_buff.clone()).is_ok());
    assert_eq!(
        Value::buff_from(vec![0u8; MAX_VALUE_SIZE as usize + 1]),
        Err(ClarityTypeError::ValueTooLarge)
    );

    // the buffer fits on its own, but not once wrapped
    let buff = Value::buff_from(max_buff).unwrap();
    assert_eq!(Value::some(buff), Err(ClarityTypeError::ValueTooLarge));

    let half = Value::buff_from(vec![0u8; MAX_VALUE_SIZE as usize / 2]).unwrap();
    assert_eq!(
        Value::list_from(vec![half.clone(), half]),
        Err(ClarityTypeError::ValueTooLarge)
    );
}

#[rstest]
#[case::nul(vec![0x00])]
#[case::bell(vec![b'a', 0x07])]
#[case::delete(vec![0x7f])]
#[case::high_bit(vec![b'o', b'k', 0x80])]
fn test_string_ascii_rejects(#[case] bytes: Vec<u8>) {
    let bad = *bytes.iter().find(|b| !b.is_ascii_graphic()).unwrap();
    assert_eq!(
        Value::string_ascii_from_bytes(bytes),
        Err(ClarityTypeError::InvalidAsciiCharacter(bad))
    );
}

#[test]
fn test_string_builders() {
    assert!(Value::string_ascii_from_bytes(b"Hello, world!\n\t".to_vec()).is_ok());
    assert!(Value::string_ascii_from_bytes(vec![]).is_ok());

    assert_eq!(
        Value::string_utf8_from_bytes(vec![0xff, 0xfe]),
        Err(ClarityTypeError::InvalidUtf8Encoding)
    );
    assert_eq!(
        Value::string_utf8_from_bytes("héllo 🦊".as_bytes().to_vec()).unwrap(),
        Value::string_utf8_from_str("héllo 🦊").unwrap()
    );
}

#[test]
fn test_tuple_construction() {
    assert_eq!(
        TupleData::from_data(vec![]),
        Err(ClarityTypeError::EmptyTuplesNotAllowed)
    );

    let a = ClarityName::try_from("a").unwrap();
    assert_eq!(
        TupleData::from_data(vec![(a.clone(), Value::Int(1)), (a, Value::Int(2))]),
        Err(ClarityTypeError::DuplicateTupleField("a".into()))
    );

    let t = tuple(&[("b", Value::Int(1)), ("a", Value::Bool(false))]);
    assert_eq!(t.len(), 2);
    assert_eq!(t.get("b").unwrap(), &Value::Int(1));
    assert_eq!(
        t.get("c"),
        Err(ClarityTypeError::NoSuchTupleField("c".into()))
    );

    // iteration keeps construction order; sorted_fields does not
    let order: Vec<&str> = t.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(order, vec!["b", "a"]);
    let sorted: Vec<&str> = t.sorted_fields().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(sorted, vec!["a", "b"]);

    assert_eq!(t.get_owned("a").unwrap(), Value::Bool(false));
}

#[test]
fn test_tuple_equality_ignores_order() {
    let t1 = tuple(&[("x", Value::Int(1)), ("y", Value::UInt(2))]);
    let t2 = tuple(&[("y", Value::UInt(2)), ("x", Value::Int(1))]);
    let t3 = tuple(&[("y", Value::UInt(3)), ("x", Value::Int(1))]);
    let t4 = tuple(&[("x", Value::Int(1))]);
    assert_eq!(t1, t2);
    assert_ne!(t1, t3);
    assert_ne!(t1, t4);
    assert_ne!(t4, t1);
}

#[rstest]
#[case::int(Value::Int(-17), "-17")]
#[case::uint(Value::UInt(100), "u100")]
#[case::bool(Value::Bool(true), "true")]
#[case::none(Value::none(), "none")]
#[case::some(Value::some(Value::Int(1)).unwrap(), "(some 1)")]
#[case::ok(Value::okay_true(), "(ok true)")]
#[case::err(Value::err_uint(7), "(err u7)")]
#[case::buff(Value::buff_from(vec![0xde, 0xad, 0xbe, 0xef]).unwrap(), "0xdeadbeef")]
#[case::ascii(Value::string_ascii_from_bytes(b"text".to_vec()).unwrap(), "\"text\"")]
#[case::ascii_escaped(Value::string_ascii_from_bytes(b"a\"b\n".to_vec()).unwrap(), "\"a\\\"b\\n\"")]
#[case::utf8(Value::string_utf8_from_str("té").unwrap(), "u\"t\\u{c3a9}\"")]
#[case::list(Value::list_from(vec![Value::Int(1), Value::Int(2)]).unwrap(), "(list 1 2)")]
#[case::empty_list(Value::list_from(vec![]).unwrap(), "(list)")]
#[case::tuple(Value::from(tuple(&[("b", Value::Int(2)), ("a", Value::Int(1))])), "(tuple (a 1) (b 2))")]
#[case::principal(
    Value::from(StandardPrincipalData::new(22, [0; 20]).unwrap()),
    "SP000000000000000000002Q6VF78"
)]
fn test_display(#[case] value: Value, #[case] expected: &str) {
    assert_eq!(value.to_string(), expected);
}

#[test]
fn test_integer_literals() {
    assert_eq!(Value::int_from_str("-1"), Ok(Value::Int(-1)));
    assert_eq!(
        Value::int_from_str("-170141183460469231731687303715884105728"),
        Ok(Value::Int(i128::MIN))
    );
    assert_eq!(
        Value::int_from_str("170141183460469231731687303715884105728"),
        Err(ClarityTypeError::IntegerOutOfRange(
            "170141183460469231731687303715884105728".into()
        ))
    );
    assert!(Value::int_from_str("1.5").is_err());
    assert_eq!(
        Value::int_from_str("+1"),
        Err(ClarityTypeError::IntegerOutOfRange("+1".into()))
    );
    assert_eq!(
        Value::uint_from_str("+1"),
        Err(ClarityTypeError::IntegerOutOfRange("+1".into()))
    );
    assert!(Value::int_from_str("").is_err());

    assert_eq!(Value::uint_from_str("u100"), Ok(Value::UInt(100)));
    assert_eq!(Value::uint_from_str("100"), Ok(Value::UInt(100)));
    assert_eq!(
        Value::uint_from_str("340282366920938463463374607431768211455"),
        Ok(Value::UInt(u128::MAX))
    );
    assert!(Value::uint_from_str("340282366920938463463374607431768211456").is_err());
    assert!(Value::uint_from_str("-1").is_err());
    assert!(Value::uint_from_str("u+1").is_err());
}

#[test]
fn test_principal_parse() {
    let standard = PrincipalData::parse("SP000000000000000000002Q6VF78").unwrap();
    assert_eq!(
        standard,
        PrincipalData::Standard(StandardPrincipalData::new(22, [0; 20]).unwrap())
    );
    // a leading quote is allowed
    assert_eq!(
        PrincipalData::parse("'SP000000000000000000002Q6VF78").unwrap(),
        standard
    );

    let contract = PrincipalData::parse("SP000000000000000000002Q6VF78.pox-4").unwrap();
    assert_eq!(contract.version(), 22);
    assert_eq!(contract.to_string(), "SP000000000000000000002Q6VF78.pox-4");
    match contract {
        PrincipalData::Contract(id) => {
            assert_eq!(id.name, ContractName::try_from("pox-4").unwrap());
        }
        _ => panic!("expected a contract principal"),
    }
}

#[test]
fn test_principal_parse_errors() {
    assert_eq!(
        QualifiedContractIdentifier::parse("SP000000000000000000002Q6VF78"),
        Err(ClarityTypeError::QualifiedContractMissingDot)
    );
    assert_eq!(
        PrincipalData::parse("SP000000000000000000002Q6VF78."),
        Err(ClarityTypeError::InvalidContractName("".into()))
    );
    assert!(matches!(
        PrincipalData::parse("SP000000000000000000002Q6VF79"),
        Err(ClarityTypeError::InvalidPrincipalEncoding(_))
    ));
    assert!(matches!(
        PrincipalData::parse("XP000000000000000000002Q6VF78"),
        Err(ClarityTypeError::InvalidPrincipalEncoding(_))
    ));

    let short = c32_address(22, &[0u8; 19]).unwrap();
    assert_eq!(
        PrincipalData::parse_standard_principal(&short),
        Err(ClarityTypeError::InvalidPrincipalLength(19))
    );
}

#[test]
fn test_standard_principal() {
    assert_eq!(
        StandardPrincipalData::new(32, [0; 20]),
        Err(ClarityTypeError::InvalidPrincipalVersion(32))
    );

    let p = mainnet_principal(0x11);
    assert!(p.is_mainnet());
    assert!(!p.is_multisig());
    assert_eq!(p.version(), 22);

    let addr = StacksAddress::from(p.clone());
    assert_eq!(addr.bytes, Hash160([0x11; 20]));
    assert_eq!(addr.to_string(), p.to_address());
    assert_eq!(StandardPrincipalData::try_from(addr).unwrap(), p);

    let bad = StacksAddress {
        version: 40,
        bytes: Hash160([0; 20]),
    };
    assert_eq!(
        StandardPrincipalData::try_from(bad),
        Err(ClarityTypeError::InvalidPrincipalVersion(40))
    );
    assert_eq!(
        format!("{:?}", StandardPrincipalData::new(22, [0; 20]).unwrap()),
        "StandardPrincipalData(SP000000000000000000002Q6VF78)"
    );
}

#[test]
fn test_serialized_size_matches_encoding() {
    let values = vec![
        Value::Int(1),
        Value::Bool(false),
        Value::none(),
        Value::string_utf8_from_str("🦊!").unwrap(),
        Value::from(QualifiedContractIdentifier::new(
            mainnet_principal(1),
            ContractName::try_from("counter").unwrap(),
        )),
        Value::from(tuple(&[
            ("owner", Value::from(mainnet_principal(2))),
            ("amounts", Value::list_from(vec![Value::UInt(1), Value::UInt(2)]).unwrap()),
        ])),
    ];
    for value in values {
        let bytes = value.serialize_to_vec().unwrap();
        assert_eq!(value.serialized_size(), bytes.len() as u64, "{value}");
    }
}

#[test]
fn test_value_json() {
    let value = Value::from(tuple(&[
        ("id", Value::UInt(5)),
        ("memo", Value::some(Value::buff_from(vec![1, 2]).unwrap()).unwrap()),
    ]));
    let json = serde_json::to_string(&value).unwrap();
    let parsed: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, value);

    assert!(serde_json::from_str::<Value>(r#"{"Int":1}"#).is_ok());
}
