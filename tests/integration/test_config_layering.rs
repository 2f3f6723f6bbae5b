//! Settings layering: defaults, then TOML, then `SB_` environment.

use crate::common::{TestProject, generator_with};
use stkbind::Settings;

#[test]
#[serial_test::serial]
fn test_toml_overrides_defaults() {
    let project = TestProject::new();
    let config = project.add_file(
        "settings.toml",
        r#"
[filter]
only = ["Echo"]
require_method = ""

[render]
bridge_namespace = "lb"
"#,
    );

    let settings = Settings::load_from(&config).unwrap();
    assert_eq!(settings.filter.only, vec!["Echo"]);
    assert_eq!(settings.filter.required_method(), None);
    assert_eq!(settings.render.bridge_namespace, "lb");
    // Untouched keys keep their defaults
    assert_eq!(settings.render.namespace, "stk");
    assert!(settings.filter.skip.iter().any(|s| s == "Stk"));
}

#[test]
#[serial_test::serial]
fn test_env_overrides_toml() {
    let project = TestProject::new();
    let config = project.add_file(
        "settings.toml",
        "[render]\ntype_prefix = \"Dsp\"\n",
    );

    unsafe {
        std::env::set_var("SB_RENDER__TYPE_PREFIX", "Audio");
    }
    let settings = Settings::load_from(&config);
    unsafe {
        std::env::remove_var("SB_RENDER__TYPE_PREFIX");
    }

    assert_eq!(settings.unwrap().render.type_prefix, "Audio");
}

#[test]
#[serial_test::serial]
fn test_loaded_settings_drive_rendering() {
    let project = TestProject::new();
    project.add_file(
        "Osc.json",
        r#"{"namespace":{"namespaces":{"dsp":{"classes":[{
            "class_decl":{"typename":{"segments":[{"name":"Osc"}]}},
            "methods":[
              {"access":"public","constructor":false,"destructor":false,
               "name":{"segments":[{"name":"run"}]},"return_type":{},
               "parameters":[{"name":"b","type":{"ref_to":{"segments":[{"name":"DspBuffer"}]}}}]}
            ]}]}}}}"#,
    );
    let config = project.add_file(
        "settings.toml",
        "[filter]\nrequire_method = \"run\"\n\n[render]\nnamespace = \"dsp\"\ntype_prefix = \"Dsp\"\n",
    );

    let settings = Settings::load_from(&config).unwrap();
    let report = generator_with(settings).run(project.path());

    assert_eq!(report.rendered.len(), 1, "{:?}", report.failures);
    assert_eq!(
        report.rendered[0].text,
        ".beginClass <dsp::Osc> (\"Osc\")\n    .addFunction(\"run\", &dsp::Osc::run)\n.endClass()"
    );
}
