use json_rpc_scan::diff::{error_message, DiffComputer, DiffReporter, DiffType, Difference};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

fn compute(resp1: Value, resp2: Value) -> Vec<Difference> {
    DiffComputer::new().compute(&resp1, &resp2)
}

// --- DiffComputer ---

#[test]
fn test_identical_responses() {
    let resp = json!({"jsonrpc": "2.0", "id": 1, "result": {"foo": "bar"}});
    assert!(compute(resp.clone(), resp).is_empty());
}

#[test]
fn test_identical_arbitrary_values() {
    // compute(x, x) == [] for any JSON-compatible x
    for value in [
        json!(null),
        json!(true),
        json!(42),
        json!("text"),
        json!([1, [2, {"a": null}]]),
        json!({"result": {"deep": [{"x": 1.5}]}}),
    ] {
        assert!(compute(value.clone(), value).is_empty());
    }
}

#[test]
fn test_value_changed() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": {"value": "0x100"}}),
        json!({"jsonrpc": "2.0", "id": 1, "result": {"value": "0x200"}}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].diff_type, DiffType::ValueChanged);
    assert_eq!(diffs[0].path, "result.value");
    assert_eq!(diffs[0].value1, Some(json!("0x100")));
    assert_eq!(diffs[0].value2, Some(json!("0x200")));
}

#[test]
fn test_block_number_divergence() {
    let diffs = compute(json!({"result": "0x100"}), json!({"result": "0x200"}));
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].path, "result");
    assert_eq!(diffs[0].diff_type, DiffType::ValueChanged);
    assert_eq!(diffs[0].value1, Some(json!("0x100")));
    assert_eq!(diffs[0].value2, Some(json!("0x200")));
}

#[test]
fn test_missing_field() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": {"a": 1, "b": 2}}),
        json!({"jsonrpc": "2.0", "id": 1, "result": {"a": 1}}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].diff_type, DiffType::MissingInEndpoint2);
    assert_eq!(diffs[0].path, "result.b");
    assert_eq!(diffs[0].value1, Some(json!(2)));
}

#[test]
fn test_added_field() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": {"a": 1}}),
        json!({"jsonrpc": "2.0", "id": 1, "result": {"a": 1, "b": 2}}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].diff_type, DiffType::AddedInEndpoint2);
    assert_eq!(diffs[0].path, "result.b");
    assert_eq!(diffs[0].value2, Some(json!(2)));
}

#[test]
fn test_type_mismatch() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": {"value": "text"}}),
        json!({"jsonrpc": "2.0", "id": 1, "result": {"value": 123}}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].diff_type, DiffType::TypeMismatch);
    assert_eq!(diffs[0].extra["type1"], json!("string"));
    assert_eq!(diffs[0].extra["type2"], json!("number"));
    assert_eq!(diffs[0].value1, Some(json!("text")));
    assert_eq!(diffs[0].value2, Some(json!(123)));
}

#[test]
fn test_list_length_mismatch_suppresses_element_diffs() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": [1, 2, 3]}),
        json!({"jsonrpc": "2.0", "id": 1, "result": [1, 2]}),
    );
    let length_diffs: Vec<_> = diffs
        .iter()
        .filter(|d| d.diff_type == DiffType::LengthMismatch)
        .collect();
    assert_eq!(length_diffs.len(), 1);
    assert_eq!(length_diffs[0].extra["length1"], json!(3));
    assert_eq!(length_diffs[0].extra["length2"], json!(2));
    assert!(!diffs.iter().any(|d| d.diff_type == DiffType::ValueChanged));
}

#[test]
fn test_error_vs_success() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32600, "message": "fail"}}),
        json!({"jsonrpc": "2.0", "id": 1, "result": "ok"}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].diff_type, DiffType::ErrorVsSuccess);
    assert_eq!(diffs[0].value1, Some(json!("fail")));
}

#[test]
fn test_success_vs_error() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": "ok"}),
        json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32600, "message": "fail"}}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].diff_type, DiffType::SuccessVsError);
    assert_eq!(diffs[0].value2, Some(json!("fail")));
}

#[test]
fn test_both_errors_same_message() {
    let resp = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32600, "message": "fail"}});
    assert!(compute(resp.clone(), resp).is_empty());
}

#[test]
fn test_both_errors_different_message() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32600, "message": "fail1"}}),
        json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32600, "message": "fail2"}}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].diff_type, DiffType::ErrorMessageDiffers);
    assert_eq!(diffs[0].value1, Some(json!("fail1")));
    assert_eq!(diffs[0].value2, Some(json!("fail2")));
}

#[test]
fn test_nested_dict_difference() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": {"outer": {"inner": {"deep": "value1"}}}}),
        json!({"jsonrpc": "2.0", "id": 1, "result": {"outer": {"inner": {"deep": "value2"}}}}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].path, "result.outer.inner.deep");
    assert_eq!(diffs[0].diff_type, DiffType::ValueChanged);
}

#[test]
fn test_list_item_difference() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": [1, 2, 3]}),
        json!({"jsonrpc": "2.0", "id": 1, "result": [1, 5, 3]}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].path, "result[1]");
    assert_eq!(diffs[0].diff_type, DiffType::ValueChanged);
}

#[test]
fn test_error_in_result_dict() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": {"error": "fail"}}),
        json!({"jsonrpc": "2.0", "id": 1, "result": {"success": true}}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].diff_type, DiffType::ErrorVsSuccess);
    assert_eq!(diffs[0].path, "result");
}

#[test]
fn test_empty_dicts() {
    let resp = json!({"jsonrpc": "2.0", "id": 1, "result": {}});
    assert!(compute(resp.clone(), resp).is_empty());
}

#[test]
fn test_empty_lists() {
    let resp = json!({"jsonrpc": "2.0", "id": 1, "result": []});
    assert!(compute(resp.clone(), resp).is_empty());
}

#[test]
fn test_list_with_different_types() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": [1, 2, 3]}),
        json!({"jsonrpc": "2.0", "id": 1, "result": ["1", "2", "3"]}),
    );
    assert_eq!(diffs.len(), 3);
    assert!(diffs.iter().all(|d| d.diff_type == DiffType::TypeMismatch));
}

#[test]
fn test_nested_list_difference() {
    let diffs = compute(
        json!({"jsonrpc": "2.0", "id": 1, "result": {"items": [[1, 2], [3, 4]]}}),
        json!({"jsonrpc": "2.0", "id": 1, "result": {"items": [[1, 2], [3, 5]]}}),
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].path, "result.items[1][1]");
}

// --- error message extraction ---

#[test]
fn test_error_message_string() {
    let resp = json!({"jsonrpc": "2.0", "id": 1, "error": "Simple error"});
    assert_eq!(error_message(&resp), "Simple error");
}

#[test]
fn test_error_message_object() {
    let resp = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -1, "message": "Error msg"}});
    assert_eq!(error_message(&resp), "Error msg");
}

#[test]
fn test_error_message_object_without_message() {
    let resp = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -1}});
    assert_eq!(error_message(&resp), r#"{"code":-1}"#);
}

#[test]
fn test_error_message_unknown_format() {
    let resp = json!({"jsonrpc": "2.0", "id": 1, "result": {"data": "something"}});
    assert_eq!(error_message(&resp), "Unknown error");
}

// --- Difference ---

#[test]
fn test_difference_creation() {
    let diff = Difference::new("result.value", DiffType::ValueChanged)
        .with_values(Some(json!("old")), Some(json!("new")));

    assert_eq!(diff.path, "result.value");
    assert_eq!(diff.diff_type, DiffType::ValueChanged);
    assert_eq!(diff.value1, Some(json!("old")));
    assert_eq!(diff.value2, Some(json!("new")));
    assert!(diff.extra.is_empty());
}

#[test]
fn test_difference_with_extra() {
    let diff = Difference::new("result.value", DiffType::TypeMismatch)
        .with_values(Some(json!("text")), Some(json!(123)))
        .with_extra("type1", json!("string"))
        .with_extra("type2", json!("number"));

    assert_eq!(diff.extra["type1"], json!("string"));
    assert_eq!(diff.extra["type2"], json!("number"));
}

// --- DiffReporter ---

fn reporter(dir: &TempDir) -> DiffReporter {
    DiffReporter::new(dir.path(), "endpoint1", "endpoint2")
}

#[test]
fn test_save_diff_with_differences() {
    let tmp = TempDir::new().unwrap();
    let reporter = reporter(&tmp);

    let request = json!({"method": "eth_blockNumber", "params": []});
    let response1 = json!({"jsonrpc": "2.0", "id": 1, "result": "0x100"});
    let response2 = json!({"jsonrpc": "2.0", "id": 1, "result": "0x200"});

    let diffs = reporter
        .save_diff("eth_blockNumber", "block_1", &request, &response1, &response2)
        .unwrap();

    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].diff_type, DiffType::ValueChanged);

    let diff_dir = tmp.path().join("eth_blockNumber").join("block_1");
    assert!(diff_dir.join("request.json").exists());
    assert!(diff_dir.join("endpoint1_response.json").exists());
    assert!(diff_dir.join("endpoint2_response.json").exists());
    assert!(diff_dir.join("diff.json").exists());
    assert!(diff_dir.join("diff.txt").exists());

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(diff_dir.join("request.json")).unwrap())
            .unwrap();
    assert_eq!(written, request);

    let summary: Value =
        serde_json::from_str(&std::fs::read_to_string(diff_dir.join("diff.json")).unwrap())
            .unwrap();
    assert_eq!(summary["method"], json!("eth_blockNumber"));
    assert_eq!(summary["identifier"], json!("block_1"));
    assert_eq!(summary["difference_count"], json!(1));
}

#[test]
fn test_save_diff_no_differences() {
    let tmp = TempDir::new().unwrap();
    let reporter = reporter(&tmp);

    let request = json!({"method": "eth_blockNumber", "params": []});
    let response = json!({"jsonrpc": "2.0", "id": 1, "result": "0x100"});

    let diffs = reporter
        .save_diff("eth_blockNumber", "block_1", &request, &response, &response)
        .unwrap();

    assert!(diffs.is_empty());
    assert!(!tmp.path().join("eth_blockNumber").join("block_1").exists());
}

#[test]
fn test_format_text_value_changed() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let diff = Difference::new("result.value", DiffType::ValueChanged)
        .with_values(Some(json!("0x100")), Some(json!("0x200")));

    let text = reporter.format_text(&[diff]);
    assert!(text.contains("result.value"));
    assert!(text.contains("value_changed"));
    assert!(text.contains("0x100"));
    assert!(text.contains("0x200"));
}

#[test]
fn test_format_text_type_mismatch() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let diff = Difference::new("result.value", DiffType::TypeMismatch)
        .with_values(Some(json!("text")), Some(json!(123)))
        .with_extra("type1", json!("string"))
        .with_extra("type2", json!("number"));

    let text = reporter.format_text(&[diff]);
    assert!(text.contains("type_mismatch"));
    assert!(text.contains("string"));
    assert!(text.contains("number"));
}

#[test]
fn test_format_text_missing_field() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let diff = Difference::new("result.field", DiffType::MissingInEndpoint2)
        .with_values(Some(json!("value")), None);

    let text = reporter.format_text(&[diff]);
    assert!(text.contains("missing_in_endpoint2"));
    assert!(text.contains("(not present)"));
}

#[test]
fn test_format_text_added_field() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let diff = Difference::new("result.field", DiffType::AddedInEndpoint2)
        .with_values(None, Some(json!("value")));

    let text = reporter.format_text(&[diff]);
    assert!(text.contains("added_in_endpoint2"));
    assert!(text.contains("(not present)"));
}

#[test]
fn test_format_text_length_mismatch() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let diff = Difference::new("result.items", DiffType::LengthMismatch)
        .with_extra("length1", json!(3))
        .with_extra("length2", json!(2));

    let text = reporter.format_text(&[diff]);
    assert!(text.contains("length_mismatch"));
    assert!(text.contains("3 elements"));
    assert!(text.contains("2 elements"));
}

#[test]
fn test_format_text_error_vs_success() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let diff = Difference::new("(response)", DiffType::ErrorVsSuccess)
        .with_values(Some(json!("Error message")), Some(json!("Success response")));

    let text = reporter.format_text(&[diff]);
    assert!(text.contains("error_vs_success"));
    assert!(text.contains("Error message"));
    assert!(text.contains("Success response"));
}

#[test]
fn test_format_text_success_vs_error() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let diff = Difference::new("(response)", DiffType::SuccessVsError)
        .with_values(Some(json!("Success response")), Some(json!("Error message")));

    let text = reporter.format_text(&[diff]);
    assert!(text.contains("success_vs_error"));
    assert!(text.contains("Success response"));
    assert!(text.contains("Error message"));
}

#[test]
fn test_format_text_error_message_differs() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let diff = Difference::new("(error)", DiffType::ErrorMessageDiffers)
        .with_values(Some(json!("Error 1")), Some(json!("Error 2")));

    let text = reporter.format_text(&[diff]);
    assert!(text.contains("error_message_differs"));
    assert!(text.contains("Error 1"));
    assert!(text.contains("Error 2"));
}

#[test]
fn test_format_text_empty_list() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    assert_eq!(reporter.format_text(&[]), "No differences found.");
}

#[test]
fn test_diff_to_dict() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let diff = Difference::new("result.value", DiffType::ValueChanged)
        .with_values(Some(json!("old")), Some(json!("new")))
        .with_extra("extra_key", json!("extra_value"));

    let dict = reporter.diff_to_dict(&diff);
    assert_eq!(dict["path"], json!("result.value"));
    assert_eq!(dict["type"], json!("value_changed"));
    assert_eq!(dict["ep1_value"], json!("old"));
    assert_eq!(dict["ep2_value"], json!("new"));
    assert_eq!(dict["extra_key"], json!("extra_value"));
}

#[test]
fn test_diff_to_dict_omits_absent_values() {
    let tmp = TempDir::new().unwrap();
    let reporter = DiffReporter::new(tmp.path(), "ep1", "ep2");

    let missing = Difference::new("result.field", DiffType::MissingInEndpoint2)
        .with_values(Some(json!("value")), None);
    let dict = reporter.diff_to_dict(&missing);
    assert!(dict.get("ep1_value").is_some());
    assert!(dict.get("ep2_value").is_none());

    let added = Difference::new("result.field", DiffType::AddedInEndpoint2)
        .with_values(None, Some(json!("new_value")));
    let dict = reporter.diff_to_dict(&added);
    assert!(dict.get("ep1_value").is_none());
    assert_eq!(dict["ep2_value"], json!("new_value"));
}
