//! The tree-sitter frontend against the equivalent tree dumps.

use crate::common::{TestProject, generator, read_fixture};
use stkbind::model::{AdapterOptions, adapt, annotate_overloads};
use stkbind::parsing::{CppHeaderParser, JsonTreeReader};

fn model_from_header(rel: &str) -> stkbind::ClassModel {
    let mut parser = CppHeaderParser::new().expect("Failed to create C++ parser");
    let tree = parser.parse(&read_fixture(rel)).expect("header should parse");
    let mut model = adapt(&tree, &AdapterOptions::default()).expect("header should adapt");
    annotate_overloads(&mut model);
    model
}

fn model_from_tree(rel: &str) -> stkbind::ClassModel {
    let tree = JsonTreeReader::new("stk")
        .read_str(&read_fixture(rel))
        .expect("tree should read");
    let mut model = adapt(&tree, &AdapterOptions::default()).expect("tree should adapt");
    annotate_overloads(&mut model);
    model
}

#[test]
fn test_header_and_tree_dump_agree() {
    for name in ["ADSR", "Echo"] {
        let from_header = model_from_header(&format!("headers/{name}.h"));
        let from_tree = model_from_tree(&format!("trees/{name}.json"));
        assert_eq!(from_header, from_tree, "models differ for {name}");
    }
}

#[test]
fn test_header_overloads_and_dropped_pointer() {
    let adsr = model_from_header("headers/ADSR.h");
    assert_eq!(adsr.count_methods("tick"), 2);
    assert!(adsr.methods.iter().filter(|m| m.name == "tick").all(|m| m.is_overloaded));
    // Protected members are not part of the model
    assert_eq!(adsr.count_methods("sampleRateChanged"), 0);

    let echo = model_from_header("headers/Echo.h");
    assert_eq!(echo.dropped_params, 1);
    let set_buffer = echo.methods.iter().find(|m| m.name == "setBuffer").unwrap();
    assert_eq!(set_buffer.params.len(), 1);
    assert_eq!(set_buffer.params[0].ty(), "unsigned int");
}

#[test]
fn test_batch_over_headers() {
    let project = TestProject::new();
    project.add_fixture("headers/ADSR.h");
    project.add_fixture("headers/Echo.h");
    project.add_fixture("headers/Stk.h");
    project.add_fixture("headers/Version.h");

    let report = generator().run(project.path());

    let includes: Vec<&str> = report.rendered.iter().map(|r| r.include.as_str()).collect();
    assert_eq!(includes, vec!["ADSR.h", "Echo.h"]);

    // Version.h declares no namespace
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].header, "Version");
    assert_eq!(report.failures[0].error.kind_code(), "structure-error");

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].header, "Stk");
}
