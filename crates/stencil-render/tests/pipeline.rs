use std::fs;
use std::path::Path;

use stencil_render::env::MockEnv;
use stencil_render::{
    MatchPattern, Pipeline, RenderOptions, StencilError, Value, VariableSet,
    VariableSources, VariablesFormat,
};
use tempfile::TempDir;

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(dir: &Path, relative: &str) -> String {
    fs::read_to_string(dir.join(relative)).unwrap()
}

fn pipeline(options: RenderOptions) -> Pipeline {
    Pipeline::real(options).with_env(MockEnv::new().with_var("RUNNER_OS", "Linux"))
}

fn tpl_options() -> RenderOptions {
    RenderOptions::default().pattern(MatchPattern::new("*.tpl").unwrap())
}

// Nested templates land at the same relative location with the suffix stripped
#[test]
fn test_directory_tree_is_mirrored() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(templates.path(), "x.tpl", "x={{ x }}");
    write(templates.path(), "sub/y.tpl", "y={{ y }}");

    let vars = VariableSet::new().with("x", 1i64).with("y", "two");
    let report = pipeline(tpl_options().recursive(true))
        .run(templates.path(), out.path(), vars)
        .unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(read(out.path(), "x"), "x=1");
    assert_eq!(read(out.path(), "sub/y"), "y=two");
}

#[test]
fn test_flat_discovery_skips_subdirectories() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(templates.path(), "x.tpl", "x");
    write(templates.path(), "sub/y.tpl", "y");

    let report = pipeline(tpl_options())
        .run(templates.path(), out.path(), VariableSet::new())
        .unwrap();

    assert_eq!(report.written, vec![out.path().join("x")]);
    assert!(!out.path().join("sub").exists());
}

#[test]
fn test_strict_abort_leaves_no_partial_output() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(templates.path(), "broken.tpl", "value={{ not_set }}");

    let err = pipeline(tpl_options().strict(true))
        .run(templates.path(), out.path(), VariableSet::new())
        .unwrap_err();

    assert!(matches!(err, StencilError::UndefinedVariable { .. }));
    assert!(!out.path().join("broken").exists());
}

#[test]
fn test_best_effort_reports_and_continues() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(templates.path(), "a.tpl", "{{ 1 + }}");
    write(templates.path(), "b.tpl", "fine");

    let report = pipeline(tpl_options())
        .run(templates.path(), out.path(), VariableSet::new())
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].template, templates.path().join("a.tpl"));
    assert!(matches!(
        report.failures[0].error,
        StencilError::Render { .. }
    ));
    assert_eq!(read(out.path(), "b"), "fine");
    assert!(!out.path().join("a").exists());
}

#[test]
fn test_rerun_produces_identical_bytes() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(
        templates.path(),
        "list.tpl",
        "{% for item in items %}\n- {{ item }}\n{% endfor %}\n",
    );
    let vars: VariableSet = serde_json::from_str(r#"{"items": ["a", "b"]}"#).unwrap();

    let pipeline = pipeline(tpl_options());
    pipeline.run(templates.path(), out.path(), vars.clone()).unwrap();
    let first = fs::read(out.path().join("list")).unwrap();
    pipeline.run(templates.path(), out.path(), vars).unwrap();
    let second = fs::read(out.path().join("list")).unwrap();

    assert_eq!(first, second);
    assert_eq!(String::from_utf8(first).unwrap(), "- a\n- b\n");
}

#[test]
fn test_include_resolves_against_template_root() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(templates.path(), "partials/header.txt", "# {{ title }}");
    write(templates.path(), "page.md.j2", "{% include 'partials/header.txt' %} | body");

    pipeline(RenderOptions::default())
        .run(
            templates.path(),
            out.path(),
            VariableSet::new().with("title", "Docs"),
        )
        .unwrap();

    assert_eq!(read(out.path(), "page.md"), "# Docs | body");
}

#[test]
fn test_environment_is_visible_to_templates() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(templates.path(), "os.j2", "{{ env.RUNNER_OS }}");

    pipeline(RenderOptions::default())
        .run(templates.path(), out.path(), VariableSet::new())
        .unwrap();

    assert_eq!(read(out.path(), "os"), "Linux");
}

#[test]
fn test_single_template_to_single_file() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(templates.path(), "motd.j2", "hello {{ who }}");
    let destination = out.path().join("etc").join("motd.txt");

    let report = pipeline(RenderOptions::default())
        .run(
            &templates.path().join("motd.j2"),
            &destination,
            VariableSet::new().with("who", "world"),
        )
        .unwrap();

    assert_eq!(report.written, vec![destination.clone()]);
    assert_eq!(fs::read_to_string(destination).unwrap(), "hello world");
}

#[test]
fn test_html_output_is_escaped() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(templates.path(), "index.html.j2", "<p>{{ body }}</p>");
    write(templates.path(), "notes.txt.j2", "{{ body }}");

    pipeline(RenderOptions::default())
        .run(
            templates.path(),
            out.path(),
            VariableSet::new().with("body", "<b>"),
        )
        .unwrap();

    assert_eq!(read(out.path(), "index.html"), "<p>&lt;b&gt;</p>");
    assert_eq!(read(out.path(), "notes.txt"), "<b>");
}

// Variables from every source format end up typed the same way
#[test]
fn test_sources_from_disk() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "vars.yml", "region: eu-west-1\nreplicas: 2\n");
    write(dir.path(), "vars.txt", "PORT=8080\nDEBUG=yes\n");
    let fs = stencil_render::fs::RealFs;

    let yaml = VariableSources::new()
        .file(dir.path().join("vars.yml"))
        .inline("replicas=4")
        .load(&fs)
        .unwrap();
    assert_eq!(yaml.get("region"), Some(&Value::from("eu-west-1")));
    assert_eq!(yaml.get("replicas"), Some(&Value::Integer(4)));

    let dotenv = VariableSources::new()
        .file(dir.path().join("vars.txt"))
        .file_format(VariablesFormat::Env)
        .load(&fs)
        .unwrap();
    assert_eq!(dotenv.get("PORT"), Some(&Value::Integer(8080)));
    assert_eq!(dotenv.get("DEBUG"), Some(&Value::Bool(true)));
}

#[cfg(unix)]
#[test]
fn test_symlinked_template_is_rendered() {
    let templates = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(templates.path(), "plain.j2", "plain {{ n }}");
    write(shared.path(), "real.j2", "linked {{ n }}");
    std::os::unix::fs::symlink(shared.path().join("real.j2"), templates.path().join("linked.j2"))
        .unwrap();

    let report = pipeline(RenderOptions::default())
        .run(templates.path(), out.path(), VariableSet::new().with("n", 1i64))
        .unwrap();

    assert_eq!(
        report.written,
        vec![out.path().join("linked"), out.path().join("plain")]
    );
    assert_eq!(read(out.path(), "linked"), "linked 1");
}
