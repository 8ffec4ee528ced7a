use serde_json::{json, Value};
use specmap_indexer::{MemoryCorpus, RunStats, SpecMapConfig, SpecMapGenerator};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const WHEN_POSITIVE: &str = r"/*
 * KOTLIN DIAGNOSTICS SPEC TEST (POSITIVE)
 *
 * SPEC VERSION: 0.1-218
 * MAIN LINK: expressions, when-expression -> paragraph 3 -> sentence 1
 * PRIMARY LINKS: expressions, when-expression, exhaustive-when -> paragraph 1 -> sentence 2
 * NUMBER: 1
 * DESCRIPTION: When with else branch
 * HELPERS: classes
 */

// TESTCASE NUMBER: 1
fun case_1() {}
";

const WHEN_NEGATIVE: &str = r"/*
 * KOTLIN DIAGNOSTICS SPEC TEST (NEGATIVE)
 *
 * SPEC VERSION: 0.1-218
 * MAIN LINK: expressions, when-expression -> paragraph 3 -> sentence 1
 * SECONDARY LINKS: type-system -> paragraph 2 -> sentence 1
 * NUMBER: 1
 * DESCRIPTION: When without else branch
 */

// TESTCASE NUMBER: 1
fun case_1() {}

// TESTCASE NUMBER: 2
fun case_2() {
    // UNEXPECTED BEHAVIOUR
}
";

const BOX_TEST: &str = r"/*
 * KOTLIN CODEGEN BOX SPEC TEST (POSITIVE)
 *
 * SPEC VERSION: 0.1-100
 * MAIN LINK: statements, loops -> paragraph 1 -> sentence 1
 * NUMBER: 1
 * DESCRIPTION: for loop over range
 */

fun box(): String = 'OK'
";

const IMPLEMENTATION_TEST: &str = r"// FIR_IDENTICAL
/*
 * RELEVANT SPEC SENTENCES (spec version: 0.1-313, test type: pos):
 *  - expressions, when-expression -> paragraph 3 -> sentence 1
 * NUMBER: 7
 * DESCRIPTION: compiler regression
 */
fun test() {}
";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(path, content).expect("write test");
}

fn setup_repo() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write(
        root,
        "compiler/tests-spec/testData/diagnostics/linked/expressions/when-expression/p-3/pos/1.1.kt",
        WHEN_POSITIVE,
    );
    write(
        root,
        "compiler/tests-spec/testData/diagnostics/linked/expressions/when-expression/p-3/neg/1.1.kt",
        WHEN_NEGATIVE,
    );
    write(
        root,
        "compiler/tests-spec/testData/diagnostics/linked/expressions/when-expression/p-3/neg/1.1.fir.kt",
        WHEN_NEGATIVE,
    );
    write(
        root,
        "compiler/tests-spec/testData/diagnostics/linked/expressions/when-expression/p-3/neg/1.1.txt",
        "expected diagnostics",
    );
    write(
        root,
        "compiler/tests-spec/testData/codegen/box/linked/statements/loops/p-1/pos/1.1.kt",
        BOX_TEST,
    );
    write(
        root,
        "compiler/testData/diagnostics/tests/when/elseBranch.kt",
        IMPLEMENTATION_TEST,
    );
    write(
        root,
        "compiler/testData/diagnostics/tests/when/unrelated.kt",
        "fun unrelated() {}",
    );
    temp
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("read json");
    serde_json::from_str(&text).expect("valid json")
}

#[test]
fn generates_tests_and_sections_maps() {
    let temp = setup_repo();
    let root = temp.path();

    let generator =
        SpecMapGenerator::new(root, SpecMapConfig::default()).expect("generator");
    let stats = generator.generate().expect("generate");

    assert_eq!(stats.linked_tests, 4);
    assert_eq!(stats.link_records, 2 + 2 + 1 + 1);
    assert_eq!(stats.areas.get("diagnostics"), Some(&3));
    assert_eq!(stats.areas.get("codegen/box"), Some(&1));

    let testdata = root.join("compiler/tests-spec/testData");
    let diagnostics = read_json(&testdata.join("diagnostics/linked/testsMap.json"));

    let sentence = &diagnostics["expressions/when-expression"]["3"];
    let positive = sentence["pos"]["1"].as_array().expect("pos tests");
    let negative = sentence["neg"]["1"].as_array().expect("neg tests");
    assert_eq!(negative.len(), 1);
    assert_eq!(positive.len(), 2);
    assert_eq!(
        positive[0],
        json!({
            "specVersion": "0.1-218",
            "casesNumber": 1,
            "description": "When with else branch",
            "path": "compiler/tests-spec/testData/diagnostics/linked/expressions/when-expression/p-3/pos/1.1.kt",
            "unexpectedBehaviour": false,
            "linkType": "main",
            "helpers": "classes"
        })
    );
    assert_eq!(
        positive[1]["path"],
        "compiler/testData/diagnostics/tests/when/elseBranch.kt"
    );
    assert_eq!(negative[0]["unexpectedBehaviour"], true);
    assert_eq!(negative[0]["casesNumber"], 2);
    assert_eq!(
        diagnostics["type-system"]["2"]["neg"]["1"][0]["linkType"],
        "secondary"
    );
    assert_eq!(
        diagnostics["expressions/when-expression/exhaustive-when"]["1"]["pos"]["2"][0]["linkType"],
        "primary"
    );

    let sections = read_json(&testdata.join("diagnostics/linked/sectionsMap.json"));
    assert_eq!(
        sections,
        json!({
            "expressions": ["when-expression", "when-expression/exhaustive-when"],
            "type-system": []
        })
    );

    let shard = read_json(&testdata.join(
        "diagnostics/linked/expressions/when-expression/testsMap.json",
    ));
    assert_eq!(shard, diagnostics["expressions/when-expression"]);

    let codegen = read_json(&testdata.join("codegen/box/linked/sectionsMap.json"));
    assert_eq!(codegen, json!({ "statements": ["loops"] }));
    assert!(!testdata.join("psi/linked/testsMap.json").exists());
}

#[test]
fn regenerating_overwrites_tests_map_and_appends_sections_map() {
    let temp = setup_repo();
    let root = temp.path();
    let generator =
        SpecMapGenerator::new(root, SpecMapConfig::default()).expect("generator");

    generator.generate().expect("first run");
    let testdata = root.join("compiler/tests-spec/testData");
    let tests_map = fs::read_to_string(testdata.join("codegen/box/linked/testsMap.json"))
        .expect("tests map");
    let sections_map = fs::read_to_string(testdata.join("codegen/box/linked/sectionsMap.json"))
        .expect("sections map");

    generator.generate().expect("second run");
    assert_eq!(
        fs::read_to_string(testdata.join("codegen/box/linked/testsMap.json")).expect("tests map"),
        tests_map
    );
    assert_eq!(
        fs::read_to_string(testdata.join("codegen/box/linked/sectionsMap.json"))
            .expect("sections map"),
        format!("{sections_map}{sections_map}")
    );
}

#[test]
fn builds_from_memory_corpus() {
    let corpus = MemoryCorpus::new()
        .with_file(
            "/kotlin/compiler/tests-spec/testData/diagnostics/linked/a/1.kt",
            WHEN_POSITIVE,
        )
        .with_file(
            "/kotlin/compiler/tests-spec/testData/diagnostics/linked/a/2.kt",
            WHEN_NEGATIVE,
        );
    let generator = SpecMapGenerator::with_corpus("/kotlin", SpecMapConfig::default(), corpus)
        .expect("generator");

    let mut stats = RunStats::new();
    let maps = generator.build(&mut stats).expect("build");

    let diagnostics = maps.tests.get("diagnostics").expect("diagnostics index");
    assert_eq!(diagnostics.summary_count(), 4);
    assert_eq!(
        diagnostics.get("expressions/when-expression", "3", "pos", "1").map(Vec::len),
        Some(1)
    );
    assert_eq!(
        diagnostics.get("expressions/when-expression", "3", "neg", "1").map(Vec::len),
        Some(1)
    );

    let sections = maps.sections.get("diagnostics").expect("sections");
    assert_eq!(
        sections.main_sections().collect::<Vec<_>>(),
        vec!["expressions", "type-system"]
    );
    assert_eq!(stats.files, 2);
}

#[test]
fn malformed_header_aborts_the_run() {
    let temp = setup_repo();
    write(
        temp.path(),
        "compiler/tests-spec/testData/psi/linked/broken/1.kt",
        "/*\n * KOTLIN PSI SPEC TEST (POSITIVE)\n * SPEC VERSION: 0.1\n * MAIN LINK: broken\n */",
    );
    let generator =
        SpecMapGenerator::new(temp.path(), SpecMapConfig::default()).expect("generator");
    assert!(generator.generate().is_err());
}
