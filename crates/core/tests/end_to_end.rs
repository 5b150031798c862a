use lens_core::analysis::categorize;
use lens_core::model::Interface;
use lens_core::services::{correlate, generate_analytical_queries, ContractReport, ReportConfig};
use lens_core::services::{EmissionStatus, FunctionEmission};

const ABI: &str = r#"[
    {"type": "event", "name": "Incremented", "anonymous": false, "inputs": [{"name": "count", "type": "uint256", "indexed": false}]},
    {"type": "function", "name": "increment", "inputs": [], "outputs": [], "stateMutability": "nonpayable"}
]"#;

const SOURCE: &str = "function increment() public { count++; emit Incremented(count); }";

#[test]
fn counter_contract_scenario() {
    let interface = Interface::from_json_str(ABI).expect("parse abi");

    let categorized = categorize(&interface);
    assert_eq!(categorized.write_function_names(), vec!["increment"]);
    assert_eq!(categorized.event_names(), vec!["Incremented"]);

    let emissions =
        correlate(SOURCE, &categorized.write_function_names(), &categorized.event_names());
    assert_eq!(emissions.len(), 1);
    assert_eq!(emissions.get("increment"), Some(&["Incremented".to_string()][..]));

    let queries = generate_analytical_queries(&categorized.events, "ns/name@dev", None);
    assert_eq!(queries.len(), 1);
    assert_eq!(
        queries[0].query_text,
        "SELECT block_num, count FROM \"ns/name@dev\".incremented ORDER BY block_num ASC LIMIT 50"
    );
}

#[test]
fn report_bundles_the_pipeline() {
    let interface = Interface::from_json_str(ABI).expect("parse abi");
    let report = ContractReport::build(
        "Counter",
        SOURCE,
        &interface,
        Some("ns/name@dev"),
        None,
        &ReportConfig::default(),
    );

    assert_eq!(
        report.functions,
        vec![FunctionEmission {
            function: "increment".to_string(),
            status: EmissionStatus::Known {
                events: vec!["Incremented".to_string()],
                tables: vec!["incremented".to_string()],
            },
        }]
    );
    assert!(report.unknown_functions().is_empty());
    assert_eq!(report.queries.len(), 1);

    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["functions"][0]["status"], "known");
    assert_eq!(json["functions"][0]["tables"][0], "incremented");
}

#[test]
fn report_without_dataset_has_no_queries_and_marks_unknowns() {
    let interface = Interface::from_json_str(ABI).expect("parse abi");
    let report = ContractReport::build(
        "Counter",
        "",
        &interface,
        None,
        None,
        &ReportConfig::default(),
    );
    assert!(report.queries.is_empty());
    // `increment` still matches `Incremented` by name.
    assert!(report.unknown_functions().is_empty());

    let source_free = Interface::from_json_str(
        r#"[{"type": "function", "name": "rebalance", "inputs": [], "stateMutability": "nonpayable"},
            {"type": "event", "name": "Incremented", "inputs": []}]"#,
    )
    .expect("parse abi");
    let report =
        ContractReport::build("Pool", "", &source_free, None, None, &ReportConfig::default());
    assert_eq!(report.unknown_functions(), vec!["rebalance"]);
}
