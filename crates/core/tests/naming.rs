use lens_core::model::Parameter;
use lens_core::naming::{storage_column_for, to_storage_column_name, to_storage_table_name};

#[test]
fn table_names_are_snake_case() {
    assert_eq!(to_storage_table_name("ValueReturned"), "value_returned");
    assert_eq!(to_storage_table_name("Incremented"), "incremented");
    assert_eq!(to_storage_table_name("Transfer"), "transfer");
}

#[test]
fn column_names_are_snake_case() {
    assert_eq!(to_storage_column_name("newValue"), "new_value");
    assert_eq!(to_storage_column_name("value"), "value");
    assert_eq!(to_storage_column_name("tokenIdX"), "token_id_x");
}

#[test]
fn leading_capital_only_underscored_for_columns() {
    assert_eq!(to_storage_table_name("Value"), "value");
    assert_eq!(to_storage_column_name("Value"), "_value");
}

#[test]
fn empty_names_stay_empty() {
    assert_eq!(to_storage_table_name(""), "");
    assert_eq!(to_storage_column_name(""), "");
}

#[test]
fn conversions_are_idempotent() {
    for input in ["ValueReturned", "Incremented", "newValue", "already_snake", "Value", "x"] {
        let table = to_storage_table_name(input);
        assert_eq!(to_storage_table_name(&table), table, "table name for {input}");
        let column = to_storage_column_name(input);
        assert_eq!(to_storage_column_name(&column), column, "column name for {input}");
    }
}

#[test]
fn anonymous_parameters_use_positional_names() {
    assert_eq!(storage_column_for(&Parameter::new("", "uint256"), 2), "param2");
    assert_eq!(storage_column_for(&Parameter::new("newOwner", "address"), 0), "new_owner");
}
