use lens_core::model::{
    AbiItem, Address, AddressError, Emission, EmissionMap, Interface, ModelError, Mutability,
};

const COUNTER_ABI: &str = r#"[
    {"type": "constructor", "inputs": [], "stateMutability": "nonpayable"},
    {"type": "function", "name": "increment", "inputs": [], "outputs": [], "stateMutability": "nonpayable"},
    {"type": "function", "name": "count", "inputs": [], "outputs": [{"name": "", "type": "uint256", "internalType": "uint256"}], "stateMutability": "view"},
    {"type": "event", "name": "Incremented", "anonymous": false, "inputs": [{"name": "count", "type": "uint256", "indexed": false, "internalType": "uint256"}]},
    {"type": "error", "name": "Overflow", "inputs": []}
]"#;

#[test]
fn parses_standard_abi_and_ignores_other_items() {
    let interface = Interface::from_json_str(COUNTER_ABI).expect("parse abi");
    assert_eq!(interface.items.len(), 5);
    assert_eq!(interface.items[0], AbiItem::Other);
    assert_eq!(interface.items[4], AbiItem::Other);

    let functions: Vec<_> = interface.functions().map(|f| f.name.as_str()).collect();
    assert_eq!(functions, vec!["increment", "count"]);

    let event = interface.events().next().expect("event");
    assert_eq!(event.name, "Incremented");
    assert_eq!(event.inputs[0].kind, "uint256");
    assert_eq!(event.inputs[0].internal_type.as_deref(), Some("uint256"));
}

#[test]
fn accepts_compiler_artifact_with_abi_field() {
    let artifact = format!(r#"{{"contractName": "Counter", "abi": {COUNTER_ABI}, "bytecode": "0x"}}"#);
    let interface = Interface::from_json_str(&artifact).expect("parse artifact");
    assert_eq!(interface.functions().count(), 2);
}

#[test]
fn rejects_non_array_input() {
    let err = Interface::from_json_str(r#"{"name": "nope"}"#).unwrap_err();
    assert!(matches!(err, ModelError::NotAnArray));

    let err = Interface::from_json_str("not json").unwrap_err();
    assert!(matches!(err, ModelError::Json(_)));
}

#[test]
fn reports_index_of_malformed_item() {
    let err = Interface::from_json_str(r#"[{"type": "event", "name": "Ok", "inputs": []}, {"type": "event"}]"#)
        .unwrap_err();
    match err {
        ModelError::InvalidItem { index, .. } => assert_eq!(index, 1),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mutability_round_trips_known_and_unknown_strings() {
    assert_eq!(Mutability::from("view"), Mutability::View);
    assert_eq!(Mutability::from("payable").as_str(), "payable");
    let odd = Mutability::from("sideeffecting");
    assert_eq!(odd, Mutability::Unrecognized("sideeffecting".to_string()));
    assert!(!odd.is_read_only());
    assert!(!odd.is_mutating());
    assert!(Mutability::Pure.is_read_only());
    assert!(Mutability::Nonpayable.is_mutating());
}

#[test]
fn address_parses_and_formats_lowercase() {
    let addr = Address::parse("0xAbCdEf0123456789abcdef0123456789ABCDEF01").expect("address");
    assert_eq!(addr.to_string(), "0xabcdef0123456789abcdef0123456789abcdef01");
    assert_eq!(addr.to_query_hex(), "abcdef0123456789abcdef0123456789abcdef01");
    assert_eq!(addr.as_bytes()[0], 0xab);

    let json = serde_json::to_string(&addr).expect("serialize");
    assert_eq!(json, "\"0xabcdef0123456789abcdef0123456789abcdef01\"");
    let back: Address = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, addr);
}

#[test]
fn address_rejects_bad_input() {
    assert!(matches!(
        Address::parse("abcdef0123456789abcdef0123456789abcdef01"),
        Err(AddressError::MissingPrefix(_))
    ));
    assert_eq!(Address::parse("0x1234"), Err(AddressError::BadLength(4)));
    assert!(matches!(
        Address::parse("0xzzcdef0123456789abcdef0123456789abcdef01"),
        Err(AddressError::InvalidHex(_))
    ));
}

#[test]
fn emission_map_distinguishes_unknown_from_known() {
    let mut map = EmissionMap::new();
    map.push_unique("transfer", "Transfer");
    map.push_unique("transfer", "Transfer");
    map.push_unique("transfer", "Approval");

    assert_eq!(
        map.lookup("transfer"),
        Emission::Known(&["Transfer".to_string(), "Approval".to_string()])
    );
    assert_eq!(map.lookup("mint"), Emission::Unknown);
    assert!(!map.contains("mint"));
    assert_eq!(map.len(), 1);
}
