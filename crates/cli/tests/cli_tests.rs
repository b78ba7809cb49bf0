use graphql_persist_canonical::Manifest;
use graphql_persist_test_utils::{manifest_ids, TestTree};
use std::path::Path;
use std::process::{Command, Output};

fn run(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_graphql-persist"))
        .current_dir(cwd)
        .args(args)
        .env("NO_COLOR", "1")
        .env("CI", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_writes_default_output() {
    let tree = TestTree::new()
        .with_file("src/authors.graphql", "query ListOfAuthors { author { firstName } }")
        .with_file("src/people.graphql", "query People { people { name } }");

    let output = run(tree.path(), &["src"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "Wrote output file to extracted_queries.json.\n");

    let manifest = Manifest::load(&tree.join("extracted_queries.json")).unwrap();
    assert_eq!(manifest_ids(&manifest), vec![1, 2]);
}

#[test]
fn test_explicit_output_and_quiet() {
    let tree = TestTree::new().with_file("q.graphql", "query Q { q }");

    let output = run(tree.path(), &["q.graphql", "out/manifest.json", "--quiet"]);
    assert_eq!(output.status.code(), Some(4), "parent directory does not exist");

    std::fs::create_dir(tree.join("out")).unwrap();
    let output = run(tree.path(), &["q.graphql", "out/manifest.json", "--quiet"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
    assert!(tree.join("out/manifest.json").exists());
}

#[test]
fn test_duplicate_names_exit_code() {
    let tree = TestTree::new()
        .with_file("a.graphql", "query Author { author { id } }")
        .with_file("b.graphql", "query Author { author { name } }");

    let output = run(tree.path(), &["."]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Found the following duplicate GraphQL operation names: Author"));
    assert!(!tree.join("extracted_queries.json").exists());
}

#[test]
fn test_syntax_error_exit_code() {
    let tree = TestTree::new().with_file("broken.graphql", "query Broken { a ");
    let output = run(tree.path(), &["broken.graphql"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_js_flag_with_extensions() {
    let tree = TestTree::new().with_file(
        "src/query.js",
        "export const QUERY = gql`query Authors { author { name } }`;\n",
    );

    let output = run(tree.path(), &["src", "--js", "--extension", "js,ts"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let manifest = Manifest::load(&tree.join("extracted_queries.json")).unwrap();
    assert_eq!(manifest.len(), 1);
}

#[test]
fn test_add_typename_flag() {
    let tree = TestTree::new().with_file("q.graphql", "query Q { author { name } }");

    let output = run(tree.path(), &["q.graphql", "--add-typename"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("Using the add-typename query transformer.\n"));

    let manifest = Manifest::load(&tree.join("extracted_queries.json")).unwrap();
    let (signature, _) = manifest.iter().next().unwrap();
    assert!(signature.contains("__typename"));
}

#[test]
fn test_config_file_is_discovered() {
    let tree = TestTree::new()
        .with_file(
            ".persistgraphqlrc.yml",
            "extract:\n  output: build/queries.json\n  exclude: ['__generated__']\n",
        )
        .with_file("build/.keep", "")
        .with_file("src/q.graphql", "query Q { q }")
        .with_file("src/__generated__/q.graphql", "query Q { q }");

    let output = run(tree.path(), &["src"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(tree.join("build/queries.json").exists());
}

#[test]
fn test_invalid_config_exit_code() {
    let tree = TestTree::new()
        .with_file(".persistgraphqlrc.yml", "extract:\n  exclude: ['(']\n")
        .with_file("q.graphql", "query Q { q }");

    let output = run(tree.path(), &["q.graphql"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Configuration error"));
}

#[test]
fn test_missing_input_exit_code() {
    let tree = TestTree::new();
    let output = run(tree.path(), &["does-not-exist"]);
    assert_eq!(output.status.code(), Some(4));
}
