use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let mut f = fs::File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

fn project(root: &std::path::Path) {
    write_file(&root.join("Pages/Counter.razor"), r#"<button @ref=@IncrementRef disabled="false">+</button>"#);
    write_file(&root.join("Pages/Counter.razor.cs"), "public partial class Counter { public int Count { get; set; } }");
    // code-behind wins over a sibling .cs
    write_file(&root.join("Pages/Counter.cs"), "public class Decoy { }");
    write_file(&root.join("Shared/Footer.razor"), "<footer></footer>");
    write_file(&root.join("Shared/Footer.cs"), "public class Footer { public string Year { get; set; } }");
    write_file(&root.join("Shared/Lonely.razor"), "<div></div>");
}

#[test]
fn batch_prints_every_pair_in_path_order() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    project(root);

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("batch").arg("-p").arg(root);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();

    let counter = text.find("// ---- Counter (").unwrap();
    let footer = text.find("// ---- Footer (").unwrap();
    assert!(counter < footer);
    assert!(text.contains("bool expectedIncrementDisabled = false;"));
    assert!(text.contains("initialFooter.Year.Should().BeNull();"));
    assert!(!text.contains("Decoy"));
    assert!(!text.contains("Lonely"));
    assert_eq!(text.matches("[Fact]").count(), 6);
}

#[test]
fn batch_out_dir_writes_test_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    project(root);
    let out_dir = root.join("out/tests");

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("batch").arg("--path").arg(root).arg("--out-dir").arg(&out_dir);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Wrote"))
        .stderr(predicate::str::contains("Batch completed: 2 component(s), 0 failure(s)"));

    let counter = fs::read_to_string(out_dir.join("CounterTests.cs")).unwrap();
    assert!(counter.contains("public void ShouldRenderCounterWithStyles()"));
    assert!(out_dir.join("FooterTests.cs").exists());
}

#[test]
fn batch_respects_ignore_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    project(root);
    write_file(&root.join(".ignore"), "Shared/\n");

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("batch").arg("--path").arg(root);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("// ---- Counter ("))
        .stdout(predicate::str::contains("Footer").not());

    let mut all = Command::cargo_bin("litmus").unwrap();
    all.arg("batch").arg("--path").arg(root).arg("--no-ignore");
    all.assert().success().stdout(predicate::str::contains("// ---- Footer ("));
}

#[test]
fn batch_without_pairs_fails() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("Only.razor"), "<p></p>");

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("batch").arg("--path").arg(dir.path());
    cmd.assert().failure().stderr(predicate::str::contains("No component pairs found under"));
}

#[test]
fn batch_out_dir_rejects_colliding_class_names() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("Pages/Index.razor"), r#"<h1 @ref=@TitleRef Text="Home" />"#);
    write_file(&root.join("Pages/Index.razor.cs"), "public partial class Index { }");
    write_file(&root.join("Admin/Index.razor"), r#"<h1 @ref=@TitleRef Text="Admin" />"#);
    write_file(&root.join("Admin/Index.razor.cs"), "public partial class Index { }");
    let out_dir = root.join("generated");

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("batch").arg("--path").arg(root).arg("--out-dir").arg(&out_dir);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate output"))
        .stderr(predicate::str::contains("IndexTests.cs"))
        .stderr(predicate::str::contains("Admin"))
        .stderr(predicate::str::contains("Pages"));

    // nothing is written when targets collide
    assert!(!out_dir.join("IndexTests.cs").exists());
}

#[test]
fn batch_stdout_keeps_both_same_named_components() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("Pages/Index.razor"), r#"<h1 @ref=@TitleRef Text="Home" />"#);
    write_file(&root.join("Pages/Index.razor.cs"), "public partial class Index { }");
    write_file(&root.join("Admin/Index.razor"), r#"<h1 @ref=@TitleRef Text="Admin" />"#);
    write_file(&root.join("Admin/Index.razor.cs"), "public partial class Index { }");

    let mut cmd = Command::cargo_bin("litmus").unwrap();
    cmd.arg("batch").arg("--path").arg(root);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("// ---- Index (").count(), 2);
    assert!(text.contains(r#"string expectedTitleText = "Home";"#));
    assert!(text.contains(r#"string expectedTitleText = "Admin";"#));
}
