//! End-to-end batch runs over tree dumps.

use crate::common::{TestProject, generator, generator_with};
use stkbind::{Settings, SkipReason};

const ADSR_BLOCK: &str = r#".beginClass <stk::ADSR> ("ADSR")
    .addConstructor<void ()> ()
    .addFunction("keyOn", &stk::ADSR::keyOn)
    .addFunction("setAttackRate", &stk::ADSR::setAttackRate)
    .addFunction("tick", 
        luabridge::overload<>(&stk::ADSR::tick),
        luabridge::overload<stk::StkFrames&, unsigned int>(&stk::ADSR::tick))
.endClass()"#;

const ECHO_BLOCK: &str = r#".beginClass <stk::Echo> ("Echo")
    .addConstructor<void (*) (unsigned long maximumDelay)>()
    .addFunction("clear", &stk::Echo::clear)
    .addFunction("setDelay", &stk::Echo::setDelay)
    .addFunction("setBuffer", &stk::Echo::setBuffer)
    .addFunction("tick", &stk::Echo::tick)
.endClass()"#;

#[test]
fn test_generates_full_script() {
    let project = TestProject::new();
    project.add_fixture("trees/ADSR.json");
    project.add_fixture("trees/Echo.json");

    let report = generator().run(project.path());
    assert!(report.failures.is_empty(), "{:?}", report.failures);

    let expected = format!(
        "#include \"ADSR.h\"\n#include \"Echo.h\"\n\n{ADSR_BLOCK}\n{ECHO_BLOCK}\n"
    );
    assert_eq!(report.script(), expected);
}

#[test]
fn test_unsupported_parameters_are_counted() {
    let project = TestProject::new();
    project.add_fixture("trees/Echo.json");

    let report = generator().run(project.path());
    assert_eq!(report.rendered.len(), 1);
    // setBuffer(StkFloat*, unsigned int) keeps only the second parameter
    assert_eq!(report.dropped_params, 1);
}

#[test]
fn test_missing_classes_fails_only_that_header() {
    let project = TestProject::new();
    project.add_fixture("trees/ADSR.json");
    project.add_fixture("trees/NoClasses.json");

    let report = generator().run(project.path());

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.header, "NoClasses");
    assert_eq!(failure.error.kind_code(), "structure-error");

    assert_eq!(report.rendered.len(), 1);
    let script = report.script();
    assert!(script.contains("#include \"ADSR.h\""));
    assert!(!script.contains("NoClasses"));
}

#[test]
fn test_empty_class_list_is_index_error() {
    let project = TestProject::new();
    project.add_fixture("trees/EmptyClasses.json");

    let report = generator().run(project.path());
    assert_eq!(report.failures[0].error.kind_code(), "index-error");
    assert_eq!(report.script(), "\n");
}

#[test]
fn test_malformed_json_is_parse_error() {
    let project = TestProject::new();
    project.add_file("Broken.json", "{ \"namespace\": ");

    let mut settings = Settings::default();
    settings.filter.require_method.clear();
    let report = generator_with(settings).run(project.path());

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].error.kind_code(), "parse-error");
}

#[test]
fn test_skip_list_prevents_parsing() {
    let project = TestProject::new();
    // Not a valid tree: it would fail if it were read
    project.add_fixture("trees/Stk.json");
    project.add_fixture("trees/Echo.json");

    let report = generator().run(project.path());
    assert!(report.failures.is_empty());
    assert_eq!(report.skipped_for(SkipReason::Filtered), 1);
    assert_eq!(report.skipped[0].header, "Stk");
    assert_eq!(report.rendered.len(), 1);
}

#[test]
fn test_only_list_selects_headers() {
    let project = TestProject::new();
    project.add_fixture("trees/ADSR.json");
    project.add_fixture("trees/Echo.json");

    let mut settings = Settings::default();
    settings.filter.only = vec!["Echo".to_string()];
    let report = generator_with(settings).run(project.path());

    let classes: Vec<&str> = report
        .rendered
        .iter()
        .map(|r| r.class_name.as_str())
        .collect();
    assert_eq!(classes, vec!["Echo"]);
    assert_eq!(report.skipped_for(SkipReason::Filtered), 1);
}

#[test]
fn test_required_method_policy() {
    let project = TestProject::new();
    project.add_fixture("trees/Echo.json");
    project.add_fixture("trees/Message.json");

    let report = generator().run(project.path());
    assert_eq!(report.rendered.len(), 1);
    assert_eq!(report.skipped_for(SkipReason::NoRequiredMethod), 1);
    assert!(!report.script().contains("Message"));

    let mut settings = Settings::default();
    settings.filter.require_method = String::new();
    let report = generator_with(settings).run(project.path());
    assert_eq!(report.rendered.len(), 2);

    let script = report.script();
    assert!(script.contains("#include \"Message.h\""));
    assert!(script.contains("    .addFunction(\"setText\", &stk::Message::setText)"));
}

#[test]
fn test_include_list_sorted_and_limited_to_accepted() {
    let project = TestProject::new();
    project.add_fixture("trees/Echo.json");
    project.add_fixture("trees/ADSR.json");
    project.add_fixture("trees/Message.json");
    project.add_fixture("trees/NoClasses.json");

    let report = generator().run(project.path());
    let script = report.script();
    let includes: Vec<&str> = script
        .lines()
        .take_while(|l| l.starts_with("#include"))
        .collect();
    assert_eq!(includes, vec!["#include \"ADSR.h\"", "#include \"Echo.h\""]);
}

#[test]
fn test_empty_directory_yields_blank_script() {
    let project = TestProject::new();
    let report = generator().run(project.path());
    assert!(report.rendered.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(report.script(), "\n");
}

#[test]
fn test_header_and_tree_dump_render_once() {
    let project = TestProject::new();
    project.add_fixture("headers/ADSR.h");
    project.add_fixture("trees/ADSR.json");

    let report = generator().run(project.path());

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.rendered.len(), 1);
    assert_eq!(report.skipped_for(SkipReason::Duplicate), 1);

    let script = report.script();
    assert_eq!(script.matches("#include \"ADSR.h\"").count(), 1);
    assert_eq!(script.matches(".beginClass <stk::ADSR>").count(), 1);
}

#[test]
fn test_recursive_includes_keep_subdirectory_and_order() {
    let project = TestProject::new();
    let tree = crate::common::read_fixture("trees/Echo.json");
    project.add_file("sub/Echo.json", &tree);
    project.add_file("sub-a.json", &tree.replace("Echo", "Delay"));
    project.add_fixture("trees/ADSR.json");

    let mut settings = Settings::default();
    settings.input.recursive = true;
    let report = generator_with(settings).run(project.path());
    assert!(report.failures.is_empty(), "{:?}", report.failures);

    let script = report.script();
    let includes: Vec<&str> = script
        .lines()
        .take_while(|l| l.starts_with("#include"))
        .collect();
    assert_eq!(
        includes,
        vec![
            "#include \"ADSR.h\"",
            "#include \"sub-a.h\"",
            "#include \"sub/Echo.h\""
        ]
    );

    let classes: Vec<&str> = report
        .rendered
        .iter()
        .map(|r| r.class_name.as_str())
        .collect();
    assert_eq!(classes, vec!["ADSR", "Delay", "Echo"]);
}
