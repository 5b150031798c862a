use lens_core::model::Emission;
use lens_core::services::inference::{event_stem, function_stem, is_candidate};
use lens_core::services::{
    correlate, correlate_with, infer_emissions, parse_emissions, scan_functions, SimilarityConfig,
};

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn source_scan_wins_over_inference() {
    let source = "function increment() public { emit Incremented(count); }";
    let map = correlate(source, &names(&["increment"]), &names(&["Incremented", "Increased"]));
    assert_eq!(map.get("increment"), Some(&["Incremented".to_string()][..]));
}

#[test]
fn source_scan_overrides_a_conflicting_guess() {
    // Inference would pick `Withdrawn`; the body says otherwise.
    let source = r#"
        contract Vault {
            function withdraw(uint256 amount) external {
                balances[msg.sender] -= amount;
                emit Payout(msg.sender, amount);
            }
        }
    "#;
    let map = correlate(source, &names(&["withdraw"]), &names(&["Withdrawn", "Payout"]));
    assert_eq!(map.get("withdraw"), Some(&["Payout".to_string()][..]));
}

#[test]
fn inference_fills_functions_missing_from_source() {
    let source = "function increment() public { emit Incremented(count); }";
    let map = correlate(
        source,
        &names(&["increment", "decrementBalance"]),
        &names(&["Incremented", "Decremented"]),
    );
    assert_eq!(map.get("increment"), Some(&["Incremented".to_string()][..]));
    assert_eq!(map.get("decrementBalance"), Some(&["Decremented".to_string()][..]));
}

#[test]
fn unparseable_source_degrades_to_inference() {
    let map = correlate(
        "function increment( { emit Incremented(",
        &names(&["increment"]),
        &names(&["Incremented"]),
    );
    assert_eq!(map.get("increment"), Some(&["Incremented".to_string()][..]));
}

#[test]
fn functions_without_evidence_are_unknown() {
    let map = correlate("", &names(&["rebalance"]), &names(&["Incremented"]));
    assert_eq!(map.lookup("rebalance"), Emission::Unknown);
    assert!(map.is_empty());
}

#[test]
fn keys_are_limited_to_mutating_functions() {
    let source = r#"
        function helper() internal { emit Incremented(1); }
        function increment() public { helper(); }
    "#;
    let map = correlate(source, &names(&["increment"]), &names(&["Incremented"]));
    assert!(!map.contains("helper"));
    assert!(map.contains("increment"));
}

#[test]
fn decrement_balance_matches_decremented_by_stem() {
    assert_eq!(function_stem("decrementBalance"), "decrement");
    assert_eq!(event_stem("Decremented"), "decrement");
    let inferred = infer_emissions(
        &names(&["decrementBalance"]),
        &names(&["Decremented", "Transfer"]),
        &SimilarityConfig::default(),
    );
    assert_eq!(inferred.get("decrementBalance"), Some(&["Decremented".to_string()][..]));
}

#[test]
fn verbs_are_matched_in_list_order() {
    assert_eq!(function_stem("retFunc"), "ret");
    assert_eq!(function_stem("returnValue"), "ret");
    assert_eq!(function_stem("Mint"), "mint");
    assert_eq!(function_stem("frobnicate"), "frobnicate");
}

#[test]
fn event_stems_drop_past_tense_suffix() {
    assert_eq!(event_stem("Incremented"), "increment");
    assert_eq!(event_stem("Paid"), "pai");
    assert_eq!(event_stem("Transfer"), "transfer");
}

#[test]
fn similarity_rules() {
    let cfg = SimilarityConfig::default();
    // Event name contains the function stem.
    assert!(is_candidate("transfer", "TransferSingle", &cfg));
    // Stems equal.
    assert!(is_candidate("setValue", "Set", &cfg));
    // Function stem contains a long enough event stem.
    assert!(is_candidate("unstakeAll", "Staked", &cfg));
    // Short stems with enough overlapping characters.
    assert!(is_candidate("pay", "Paid", &cfg));
    // Unrelated names.
    assert!(!is_candidate("increment", "Transfer", &cfg));
}

#[test]
fn thresholds_are_configurable() {
    let strict = SimilarityConfig { min_char_overlap: 1.01, ..SimilarityConfig::default() };
    assert!(!is_candidate("pay", "Paid", &strict));
    let map = correlate_with("", &names(&["pay"]), &names(&["Paid"]), &strict);
    assert!(map.is_empty());
}

#[test]
fn scanner_handles_deep_nesting_and_comments() {
    let source = r#"
        contract Deep {
            // function ghost() public { emit Ghost(); }
            function run(uint256 n) public returns (uint256) {
                if (n > 0) {
                    for (uint256 i = 0; i < n; i++) {
                        if (i % 2 == 0) {
                            unchecked {
                                { emit Tick(i); }
                            }
                        }
                    }
                }
                string memory s = "emit Fake(";
                emit Done(n);
                return n;
            }
            function after_() external { emit After(); }
        }
    "#;
    let functions = scan_functions(source);
    let found: Vec<_> = functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(found, vec!["run", "after_"]);
    assert_eq!(functions[0].events, vec!["Tick", "Done"]);
    assert_eq!(functions[1].events, vec!["After"]);
    assert!(source[functions[1].span.clone()].starts_with("function after_"));
}

#[test]
fn overloads_union_their_events() {
    let source = r#"
        function mint(address to) external { emit Minted(to, 1); }
        function mint(address to, uint256 amount) external { emit Minted(to, amount); emit Supply(amount); }
    "#;
    let map = parse_emissions(source);
    assert_eq!(map.get("mint"), Some(&["Minted".to_string(), "Supply".to_string()][..]));
}

#[test]
fn interface_declarations_without_bodies_are_skipped() {
    let source = r#"
        interface ICounter { function increment() external; }
        contract Counter { function increment() external { emit Incremented(1); } }
    "#;
    let functions = scan_functions(source);
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].events, vec!["Incremented"]);
}

#[test]
fn unbalanced_bodies_do_not_panic() {
    let source = "function a() public { emit A(); function b() public { emit B(); }";
    assert!(scan_functions(source).is_empty());
    assert!(parse_emissions("}}}{{{ function ( ) ) {").is_empty());
}
