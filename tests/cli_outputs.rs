use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let mut f = fs::File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

const CLASS: &str = r#"
namespace Shop.Components;

public partial class ProductTile : ComponentBase
{
    [Parameter] public Product Item { get; set; }
    [Inject] public NavigationManager Nav { get; set; }
    public Badge PriceRef { get; set; }
    private bool expanded;
}
"#;

const MARKUP: &str = r#"
<div class="tile">
    <Badge @ref=@PriceRef
           Color=@BadgeColor.Success
           Count="3"
           Label="On sale" />
</div>
"#;

fn component(root: &Path) -> (PathBuf, PathBuf) {
    let class = root.join("ProductTile.razor.cs");
    let markup = root.join("ProductTile.razor");
    write_file(&class, CLASS);
    write_file(&markup, MARKUP);
    (class, markup)
}

#[test]
fn generate_json_is_well_formed() {
    let dir = tempdir().unwrap();
    let (class, markup) = component(dir.path());

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("generate").arg(&class).arg(&markup).arg("--format").arg("json");
    let out = cmd.assert().success().get_output().stdout.clone();

    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["component"], "ProductTile");
    let scenarios = v["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 3);
    assert_eq!(scenarios[0]["name"], "ShouldInitializeDefaultComponentValues");
    assert_eq!(scenarios[1]["name"], "ShouldRenderProductTileOnInitialized");
    assert_eq!(scenarios[2]["name"], "ShouldRenderProductTileWithStyles");
    // Nav and PriceRef are observable; Item is a parameter
    assert_eq!(scenarios[0]["assertions"].as_array().unwrap().len(), 2);
    assert_eq!(
        scenarios[2]["setup"],
        serde_json::json!([
            "BadgeColor expectedPriceColor = BadgeColor.Success;",
            "int expectedPriceCount = 3;",
            "string expectedPriceLabel = \"On sale\";"
        ])
    );
}

#[test]
fn generate_writes_output_file() {
    let dir = tempdir().unwrap();
    let (class, markup) = component(dir.path());
    let target = dir.path().join("ProductTileTests.cs");

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("generate").arg(&class).arg(&markup).arg("-o").arg(&target);
    cmd.assert().success().stdout(predicate::str::is_empty());

    let text = fs::read_to_string(&target).unwrap();
    assert!(text.starts_with("[Fact]\npublic void ShouldInitializeDefaultComponentValues()"));
    assert!(text.contains("initialProductTile.Nav.Should().BeNull();"));
    assert!(text.contains("this.renderedProductTile.Instance.PriceRef.Should().NotBeNull();"));
}

#[test]
fn generate_component_override_renames_everything() {
    let dir = tempdir().unwrap();
    let (class, markup) = component(dir.path());

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("generate").arg(&class).arg(&markup).arg("--component").arg("Tile");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("var initialTile = new Tile();"))
        .stdout(predicate::str::contains("public void ShouldRenderTileWithStyles()"))
        .stdout(predicate::str::contains("ProductTile").not());
}

#[test]
fn inspect_text_prints_member_and_attribute_tables() {
    let dir = tempdir().unwrap();
    let (class, markup) = component(dir.path());

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("inspect").arg(&class).arg(&markup);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Class: ProductTile"))
        .stdout(predicate::str::contains("| Order | Member"))
        .stdout(predicate::str::contains("| Item "))
        .stdout(predicate::str::contains("| Reference | Attribute | Type"))
        .stdout(predicate::str::contains("| BadgeColor "))
        .stdout(predicate::str::contains("\"On sale\""));
}

#[test]
fn inspect_reports_missing_class_and_refs() {
    let dir = tempdir().unwrap();
    let class = dir.path().join("Notes.cs");
    let markup = dir.path().join("Notes.razor");
    write_file(&class, "// scratch file\n");
    write_file(&markup, "<p>nothing bound here</p>\n");

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("inspect").arg(&class).arg(&markup);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<no class declaration found>"))
        .stdout(predicate::str::contains("<no @ref attributes found>"));
}

#[test]
fn inspect_json_exposes_elements_and_kinds() {
    let dir = tempdir().unwrap();
    let (class, markup) = component(dir.path());

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("inspect").arg(&class).arg(&markup).arg("--format").arg("json");
    let out = cmd.assert().success().get_output().stdout.clone();

    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["class"]["name"], "ProductTile");
    assert_eq!(v["elements"][0]["tag"], "Badge");
    assert_eq!(v["elements"][0]["reference"], "PriceRef");
    let kinds: Vec<&str> =
        v["facts"].as_array().unwrap().iter().map(|f| f["value"]["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["enum_like", "integer", "string"]);
}
